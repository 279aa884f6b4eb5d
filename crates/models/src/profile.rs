use serde::{Deserialize, Serialize};

use crate::parent::Parent;

/// Discriminator for profiles derived from parent accounts.
pub const PARENT_PROFILE_TYPE: &str = "Parent";

/// Read-only view derived from a parent record. Never stored; always
/// projected from the parent collection so there is a single source of truth.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    #[serde(rename = "type")]
    pub kind: String,
    pub parent_id: u64,
}

impl Profile {
    pub fn for_parent(parent: &Parent) -> Self {
        Self { kind: PARENT_PROFILE_TYPE.to_string(), parent_id: parent.id }
    }
}
