use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Parent record as stored and returned by the API.
/// - `id` is assigned by the service, starts at 1 and only ever increments
/// - `email` is unique across all live records (enforced by the store)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parent {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

/// Creation input: no id, the service generates it.
/// Unknown fields are rejected so malformed payloads surface as 400s.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NewParent {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
}

/// Partial update input: only supplied fields are applied.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParentUpdate {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewParent {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)?;
        validate_email(&self.email)
    }
}

impl ParentUpdate {
    /// Validate whichever fields are present; an empty patch is a no-op, not an error.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("Name must not be empty".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ModelError> {
    match email.split_once('@') {
        Some((local, domain))
            if !local.trim().is_empty()
                && !domain.trim().is_empty()
                && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(ModelError::Validation(format!("invalid email: {email}"))),
    }
}
