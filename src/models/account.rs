use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Manager => "manager",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Specialization label shown to players, e.g. "Flex Support".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_role: Option<String>,
}

impl UserAccount {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_and_skips_missing_game_role() {
        let manager = UserAccount {
            id: "setes".to_string(),
            name: "Setes".to_string(),
            email: "setes@velora.gg".to_string(),
            role: Role::Manager,
            game_role: None,
        };
        let json = serde_json::to_value(&manager).unwrap();
        assert_eq!(json["role"], "manager");
        assert!(json.get("gameRole").is_none());

        let player = UserAccount {
            role: Role::Player,
            game_role: Some("Flex DPS".to_string()),
            ..manager
        };
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["gameRole"], "Flex DPS");
    }

    #[test]
    fn test_deserializes_without_game_role() {
        let json = r#"{"id":"x1","name":"Jo","email":"jo@example.com","role":"player"}"#;
        let user: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Player);
        assert!(user.game_role.is_none());
        assert!(!user.is_manager());
    }
}
