use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Coarse permission class of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Role {
    Student,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Admin-tagged routes accept both admin tiers.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_backend_spellings() {
        assert_eq!(Role::from_str("student").unwrap(), Role::Student);
        assert_eq!(Role::from_str("super_admin").unwrap(), Role::SuperAdmin);
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert!(Role::from_str("lecturer").is_err());
        assert_eq!(Role::SuperAdmin.to_string(), "super_admin");
    }

    #[test]
    fn serde_uses_snake_case() {
        let r: Role = serde_json::from_str("\"super_admin\"").unwrap();
        assert_eq!(r, Role::SuperAdmin);
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    }
}
