//! The party on whose behalf an operation runs.

use std::fmt;

use uuid::Uuid;

use super::User;

/// Resolved current actor, passed explicitly into every service operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub uuid: Uuid,
    pub name: String,
    pub email: String,
}

impl Actor {
    /// Actor for operations started from the command line.
    pub fn console() -> Self {
        Self {
            uuid: Uuid::nil(),
            name: "console".to_string(),
            email: "console".to_string(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.uuid,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.email)
    }
}
