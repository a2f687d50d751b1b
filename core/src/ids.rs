//! Newtype identifiers shared across the workspace.
//!
//! Per the Design Note in spec §9 ("implementers should use an arena/index
//! pattern... IDs are unique within a lineage set"), identifiers are never
//! passed around as bare [`Uuid`] or [`String`] values outside this module.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID, e.g. one loaded from storage.
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

uuid_newtype!(AssetId, "Identifies an asset (a file ingested or derived by a job).");
uuid_newtype!(JobId, "Identifies a single processing/analysis job.");
uuid_newtype!(
    LineageNodeId,
    "Identifies a node within a single lineage tree. Unique only within that tree."
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(AssetId::new(), AssetId::new());
    }

    #[test]
    fn round_trips_through_uuid() {
        let raw = Uuid::new_v4();
        let id = AssetId::from_uuid(raw);
        assert_eq!(id.as_uuid(), raw);
    }

    #[test]
    fn serializes_as_bare_uuid_string() {
        let id = AssetId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).expect("AssetId is transparently serializable");
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
