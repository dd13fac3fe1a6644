use std::fmt;

use serde::{Deserialize, Serialize};

/// Role identifier carried in the `role` claim.
///
/// `admin` and `user` are the identifiers issued today. Anything else a token
/// carries is kept as-is so a role-less route still admits it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const USER: &'static str = "user";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_as_a_plain_string() {
        let json = serde_json::to_string(&Role::admin()).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: Role = serde_json::from_str("\"auditor\"").unwrap();
        assert_eq!(role.as_str(), "auditor");
        assert_ne!(role, Role::user());
    }
}
