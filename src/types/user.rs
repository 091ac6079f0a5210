// src/types/user.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{take_id, take_string};

pub const ADMIN_ROLE: &str = "admin";

/// Session user. Same id rules as job records: `_id` or `id`, string or
/// number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for User {
    fn from(mut fields: Map<String, Value>) -> Self {
        Self {
            id: take_id(&mut fields),
            email: take_string(&mut fields, "email").unwrap_or_default(),
            role: take_string(&mut fields, "role"),
            extra: fields,
        }
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}
