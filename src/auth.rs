//! Login resolution against the team's fixed account table.
//!
//! This is not authentication: passwords are compared in plain text and,
//! unless disabled in the config, any non-empty email/password pair is let in
//! as a player.

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Role, UserAccount};

pub struct PredefinedAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub game_role: Option<&'static str>,
}

pub const PREDEFINED_ACCOUNTS: &[PredefinedAccount] = &[
    PredefinedAccount {
        id: "shaka",
        email: "shaka@velora.gg",
        password: "VEL2024!",
        name: "Shaka",
        role: Role::Player,
        game_role: Some("Flex Support"),
    },
    PredefinedAccount {
        id: "mower",
        email: "mower@velora.gg",
        password: "VEL2024!",
        name: "Mower",
        role: Role::Player,
        game_role: Some("Flex DPS"),
    },
    PredefinedAccount {
        id: "setes",
        email: "setes@velora.gg",
        password: "MGR2024!",
        name: "Setes",
        role: Role::Manager,
        game_role: None,
    },
];

impl PredefinedAccount {
    fn to_user(&self) -> UserAccount {
        UserAccount {
            id: self.id.to_string(),
            name: self.name.to_string(),
            email: self.email.to_string(),
            role: self.role,
            game_role: self.game_role.map(str::to_string),
        }
    }
}

pub fn find_account(email: &str) -> Option<&'static PredefinedAccount> {
    PREDEFINED_ACCOUNTS.iter().find(|a| a.email == email)
}

pub fn resolve_login(
    email: &str,
    password: &str,
    allow_fallback: bool,
) -> Result<UserAccount, AppError> {
    if let Some(account) = find_account(email) {
        if account.password == password {
            return Ok(account.to_user());
        }
    }

    if allow_fallback && !email.is_empty() && !password.is_empty() {
        return Ok(UserAccount {
            id: fallback_user_id(email),
            name: display_name_from_email(email),
            email: email.to_string(),
            role: Role::Player,
            game_role: None,
        });
    }

    Err(AppError::AuthenticationFailure)
}

/// Stable per email (case-insensitive) so an ad-hoc player finds their
/// saved week again on the next login.
pub fn fallback_user_id(email: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, email.trim().to_lowercase().as_bytes())
        .simple()
        .to_string()
}

/// "alex.dubois@example.com" becomes "Alex Dubois".
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or(email);
    local
        .split('.')
        .filter(|token| !token.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(UserAccount),
}

impl Session {
    pub fn user(&self) -> Option<&UserAccount> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    /// Attempts a login from any state. A failed attempt leaves the session
    /// logged out.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        allow_fallback: bool,
    ) -> Result<&UserAccount, AppError> {
        *self = Session::LoggedOut;
        let user = resolve_login(email, password, allow_fallback)?;
        *self = Session::LoggedIn(user);
        self.user().ok_or(AppError::NotLoggedIn)
    }

    /// Returns the user that was logged in, if any.
    pub fn logout(&mut self) -> Option<UserAccount> {
        match std::mem::take(self) {
            Session::LoggedIn(user) => Some(user),
            Session::LoggedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predefined_player_login() {
        let user = resolve_login("shaka@velora.gg", "VEL2024!", true).unwrap();
        assert_eq!(user.id, "shaka");
        assert_eq!(user.name, "Shaka");
        assert_eq!(user.role, Role::Player);
        assert_eq!(user.game_role.as_deref(), Some("Flex Support"));
    }

    #[test]
    fn test_predefined_manager_login() {
        let user = resolve_login("setes@velora.gg", "MGR2024!", true).unwrap();
        assert_eq!(user.role, Role::Manager);
        assert!(user.game_role.is_none());
    }

    #[test]
    fn test_wrong_password_without_fallback_fails() {
        let result = resolve_login("shaka@velora.gg", "wrong", false);
        assert!(matches!(result, Err(AppError::AuthenticationFailure)));
    }

    #[test]
    fn test_wrong_password_with_fallback_is_ad_hoc_player() {
        let user = resolve_login("shaka@velora.gg", "wrong", true).unwrap();
        assert_ne!(user.id, "shaka");
        assert_eq!(user.role, Role::Player);
        assert!(user.game_role.is_none());
    }

    #[test]
    fn test_empty_credentials_fail() {
        assert!(resolve_login("", "secret", true).is_err());
        assert!(resolve_login("someone@example.com", "", true).is_err());
    }

    #[test]
    fn test_fallback_ids_follow_email() {
        let a = resolve_login("a@example.com", "x", true).unwrap();
        let again = resolve_login("A@Example.com", "y", true).unwrap();
        let b = resolve_login("b@example.com", "x", true).unwrap();
        assert_eq!(a.id, again.id);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
    }

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("alex.dubois@example.com"), "Alex Dubois");
        assert_eq!(display_name_from_email("marie@example.com"), "Marie");
        assert_eq!(display_name_from_email("jean.paul.roux@x.io"), "Jean Paul Roux");
        assert_eq!(display_name_from_email("no-at-sign"), "No-at-sign");
    }

    #[test]
    fn test_session_transitions() {
        let mut session = Session::default();
        assert!(!session.is_logged_in());

        let user = session.login("mower@velora.gg", "VEL2024!", false).unwrap();
        assert_eq!(user.name, "Mower");
        assert_eq!(session.role(), Some(Role::Player));

        assert!(session.login("mower@velora.gg", "nope", false).is_err());
        assert_eq!(session, Session::LoggedOut);

        session.login("setes@velora.gg", "MGR2024!", false).unwrap();
        let previous = session.logout().unwrap();
        assert_eq!(previous.id, "setes");
        assert!(session.logout().is_none());
    }
}
