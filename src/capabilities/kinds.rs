//! Capability kinds a CSI plugin can declare.
//!
//! Each capability domain is a closed enumeration whose discriminants are the
//! CSI wire values. Value `0` is always the `Unknown` sentinel: it stands for
//! "no optional capability required" and always passes validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! capability_kind {
    (
        $(#[$meta:meta])*
        pub enum $name:ident in $domain:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[repr(i32)]
        pub enum $name {
            /// Sentinel: no specific capability applies.
            Unknown = 0,
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Domain name used in diagnostics.
            pub const DOMAIN: &'static str = $domain;

            /// Every declarable kind in wire order. Excludes `Unknown`.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Protocol name of this kind, e.g. `CREATE_DELETE_VOLUME`.
            pub fn as_str_name(&self) -> &'static str {
                match self {
                    $name::Unknown => "UNKNOWN",
                    $( $name::$variant => $text, )+
                }
            }

            /// Look up a kind by its protocol name.
            pub fn from_str_name(value: &str) -> Option<Self> {
                match value {
                    "UNKNOWN" => Some($name::Unknown),
                    $( $text => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn is_unknown(&self) -> bool {
                matches!(self, $name::Unknown)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str_name())
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_str_name(s).ok_or_else(|| ConfigError::UnknownKind {
                    domain: $domain,
                    value: s.to_string(),
                })
            }
        }

        impl TryFrom<i32> for $name {
            type Error = ConfigError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                match value {
                    0 => Ok($name::Unknown),
                    $( $value => Ok($name::$variant), )+
                    _ => Err(ConfigError::UnknownKind {
                        domain: $domain,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(kind: $name) -> i32 {
                kind as i32
            }
        }
    };
}

capability_kind! {
    /// Controller service RPCs subject to capability negotiation.
    pub enum ControllerRpc in "controller service" {
        CreateDeleteVolume = 1 => "CREATE_DELETE_VOLUME",
        PublishUnpublishVolume = 2 => "PUBLISH_UNPUBLISH_VOLUME",
        ListVolumes = 3 => "LIST_VOLUMES",
        GetCapacity = 4 => "GET_CAPACITY",
        /// Also gates `ListSnapshots` by source volume.
        CreateDeleteSnapshot = 5 => "CREATE_DELETE_SNAPSHOT",
        ListSnapshots = 6 => "LIST_SNAPSHOTS",
        /// Volumes may be created from another volume as content source.
        CloneVolume = 7 => "CLONE_VOLUME",
        PublishReadonly = 8 => "PUBLISH_READONLY",
        ExpandVolume = 9 => "EXPAND_VOLUME",
        ListVolumesPublishedNodes = 10 => "LIST_VOLUMES_PUBLISHED_NODES",
        VolumeCondition = 11 => "VOLUME_CONDITION",
        GetVolume = 12 => "GET_VOLUME",
        SingleNodeMultiWriter = 13 => "SINGLE_NODE_MULTI_WRITER",
        ModifyVolume = 14 => "MODIFY_VOLUME",
    }
}

capability_kind! {
    /// Group controller service RPCs subject to capability negotiation.
    pub enum GroupControllerRpc in "group controller service" {
        CreateDeleteGetVolumeGroupSnapshot = 1 => "CREATE_DELETE_GET_VOLUME_GROUP_SNAPSHOT",
    }
}

capability_kind! {
    /// How a volume may be mounted and shared across nodes.
    pub enum AccessMode in "volume access mode" {
        /// Published once as read/write on a single node.
        SingleNodeWriter = 1 => "SINGLE_NODE_WRITER",
        SingleNodeReaderOnly = 2 => "SINGLE_NODE_READER_ONLY",
        MultiNodeReaderOnly = 3 => "MULTI_NODE_READER_ONLY",
        /// Readonly on many nodes, read/write on at most one.
        MultiNodeSingleWriter = 4 => "MULTI_NODE_SINGLE_WRITER",
        MultiNodeMultiWriter = 5 => "MULTI_NODE_MULTI_WRITER",
        SingleNodeSingleWriter = 6 => "SINGLE_NODE_SINGLE_WRITER",
        SingleNodeMultiWriter = 7 => "SINGLE_NODE_MULTI_WRITER",
    }
}
