//! csi-caps: bootstrap a driver registry from its declaration.
//!
//! Loads the YAML declaration, builds the registry, and prints everything it
//! advertises as JSON. A trailing `controller <KIND>` or `group <KIND>`
//! validates that kind instead.
//!
//! # Environment Variables
//!
//! - `CSI_DRIVER_CONFIG`: declaration path, used when no path argument is given
//!   (an explicit path argument always wins)
//! - `RUST_LOG`: tracing filter (default: "info,csi_common=debug")
//!
//! # Usage
//!
//! ```bash
//! csi-caps driver.yaml
//! csi-caps driver.yaml controller CLONE_VOLUME
//! CSI_DRIVER_CONFIG=driver.yaml csi-caps group CREATE_DELETE_GET_VOLUME_GROUP_SNAPSHOT
//! ```

use std::process::ExitCode;

use anyhow::{bail, Context};
use csi_common::{ControllerRpc, DriverConfig, DriverRegistry, GroupControllerRpc};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,csi_common=debug".into()),
        )
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let path = resolve_path(&mut args, std::env::var("CSI_DRIVER_CONFIG").ok())?;

    let config = DriverConfig::from_file(&path)
        .with_context(|| format!("failed to load driver declaration {}", path))?;
    let registry = config.build().context("failed to build driver registry")?;

    tracing::info!(
        "Driver {} version {} on node {} (instance {})",
        registry.name(),
        registry.version(),
        registry.node_id(),
        registry.instance_id()
    );

    match args.as_slice() {
        [] => {
            let report = serde_json::to_string_pretty(&registry.report())?;
            println!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
        [domain, kind] => check(&registry, domain, kind),
        _ => bail!("expected `controller <KIND>` or `group <KIND>`"),
    }
}

/// Take the declaration path off the front of `args`, falling back to `env`.
///
/// The path argument is present when `args` has odd length: a lone path, or a
/// path followed by `<domain> <KIND>`.
fn resolve_path(args: &mut Vec<String>, env: Option<String>) -> anyhow::Result<String> {
    if args.len() % 2 == 1 {
        return Ok(args.remove(0));
    }
    match env {
        Some(path) if !path.is_empty() => Ok(path),
        _ => bail!("no declaration path given and CSI_DRIVER_CONFIG is not set"),
    }
}

fn check(registry: &DriverRegistry, domain: &str, kind: &str) -> anyhow::Result<ExitCode> {
    let result = match domain {
        "controller" => {
            registry.validate_controller_service_request(kind.parse::<ControllerRpc>()?)
        }
        "group" => {
            registry.validate_group_controller_service_request(kind.parse::<GroupControllerRpc>()?)
        }
        other => bail!("unknown capability domain: {}", other),
    };

    match result {
        Ok(()) => {
            println!("permitted: {}", kind);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("rejected: {}", e.detail());
            Ok(ExitCode::from(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_path_argument_wins_over_env() {
        let mut argv = args(&["driver.yaml", "controller", "CLONE_VOLUME"]);
        let path = resolve_path(&mut argv, Some("/etc/csi/other.yaml".into())).unwrap();
        assert_eq!(path, "driver.yaml");
        assert_eq!(argv, args(&["controller", "CLONE_VOLUME"]));

        let mut argv = args(&["driver.yaml"]);
        let path = resolve_path(&mut argv, Some("/etc/csi/other.yaml".into())).unwrap();
        assert_eq!(path, "driver.yaml");
        assert!(argv.is_empty());
    }

    #[test]
    fn test_env_used_without_path_argument() {
        let mut argv = Vec::new();
        let path = resolve_path(&mut argv, Some("/etc/csi/driver.yaml".into())).unwrap();
        assert_eq!(path, "/etc/csi/driver.yaml");

        let mut argv = args(&["group", "CREATE_DELETE_GET_VOLUME_GROUP_SNAPSHOT"]);
        let path = resolve_path(&mut argv, Some("/etc/csi/driver.yaml".into())).unwrap();
        assert_eq!(path, "/etc/csi/driver.yaml");
        assert_eq!(argv.len(), 2);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        assert!(resolve_path(&mut Vec::new(), None).is_err());
        assert!(resolve_path(&mut args(&["controller", "GET_VOLUME"]), None).is_err());
        assert!(resolve_path(&mut Vec::new(), Some(String::new())).is_err());
    }
}
