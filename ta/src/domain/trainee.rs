//! Trainee and Role domain types
//!
//! Trainees are owned by the identity/roster service and read-only here.

use serde::{Deserialize, Serialize};

/// A trainee as returned by the roster endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainee {
    /// Backend user id
    pub id: String,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Employee id (may be absent on older records)
    #[serde(default)]
    pub employee_id: String,
}

/// User role, as assigned by the identity service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Trainer,
    MasterTrainer,
    Trainee,
    Boa,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Trainer => write!(f, "trainer"),
            Self::MasterTrainer => write!(f, "master_trainer"),
            Self::Trainee => write!(f, "trainee"),
            Self::Boa => write!(f, "boa"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "trainer" => Ok(Self::Trainer),
            "master_trainer" | "master-trainer" | "mastertrainer" => Ok(Self::MasterTrainer),
            "trainee" => Ok(Self::Trainee),
            "boa" => Ok(Self::Boa),
            _ => Err(format!(
                "Unknown role: {}. Use: admin, trainer, master-trainer, trainee, or boa",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainee_wire_format() {
        let json = r#"{"id": "u-1", "name": "Ada", "email": "ada@example.com", "employeeId": "E100"}"#;
        let trainee: Trainee = serde_json::from_str(json).unwrap();
        assert_eq!(trainee.employee_id, "E100");
    }

    #[test]
    fn test_trainee_employee_id_default() {
        let json = r#"{"id": "u-1", "name": "Ada", "email": "ada@example.com"}"#;
        let trainee: Trainee = serde_json::from_str(json).unwrap();
        assert!(trainee.employee_id.is_empty());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("trainer".parse::<Role>().unwrap(), Role::Trainer);
        assert_eq!("master-trainer".parse::<Role>().unwrap(), Role::MasterTrainer);
        assert_eq!("MASTER_TRAINER".parse::<Role>().unwrap(), Role::MasterTrainer);
        assert!("intern".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_values() {
        assert_eq!(serde_json::to_string(&Role::MasterTrainer).unwrap(), r#""master_trainer""#);
        assert_eq!(serde_json::from_str::<Role>(r#""boa""#).unwrap(), Role::Boa);
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [Role::Admin, Role::Trainer, Role::MasterTrainer, Role::Trainee, Role::Boa] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}
