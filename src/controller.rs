use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

use crate::auth::Session;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::export::{self, ExportFormat};
use crate::models::{is_dirty, AvailabilityRecord, Player, Role, Slot, UserAccount};
use crate::roster::{Dashboard, Roster, RosterFilter};
use crate::stats;
use crate::storage::{KeyValueStore, Persistence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Planning,
    Manager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Short user-facing message about the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Owns the session, the week being edited and the last saved copy of it.
///
/// `login` and `save` hold `&mut self` across their simulated latency, so a
/// second submission cannot start while one is still in flight.
pub struct Planner<S> {
    config: AppConfig,
    persistence: Persistence<S>,
    seed: Vec<Player>,
    session: Session,
    page: Page,
    availability: AvailabilityRecord,
    original: AvailabilityRecord,
    notice: Option<Notice>,
}

impl<S: KeyValueStore> Planner<S> {
    pub fn new(config: AppConfig, persistence: Persistence<S>, seed: Vec<Player>) -> Self {
        Self {
            config,
            persistence,
            seed,
            session: Session::LoggedOut,
            page: Page::Login,
            availability: AvailabilityRecord::new(),
            original: AvailabilityRecord::new(),
            notice: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&UserAccount> {
        self.session.user()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn availability(&self) -> &AvailabilityRecord {
        &self.availability
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
        });
    }

    fn home_page(role: Role) -> Page {
        match role {
            Role::Player => Page::Planning,
            Role::Manager => Page::Manager,
        }
    }

    fn load_week(&mut self, user: &UserAccount) -> Result<(), AppError> {
        let week = match self.persistence.load_availability(&user.id)? {
            Some(stored) => stored,
            None => self
                .seed
                .iter()
                .find(|p| p.email == user.email)
                .map(|p| p.availability.clone())
                .unwrap_or_default(),
        };
        self.original = week.clone();
        self.availability = week;
        Ok(())
    }

    fn reset_week(&mut self) {
        self.availability = AvailabilityRecord::new();
        self.original = AvailabilityRecord::new();
    }

    /// Picks up a session saved by a previous run.
    pub fn restore(&mut self) -> Result<bool, AppError> {
        let Some(user) = self.persistence.load_session()? else {
            return Ok(false);
        };

        if user.role == Role::Player {
            self.load_week(&user)?;
        }
        self.page = Self::home_page(user.role);
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "restored session");
        self.session = Session::LoggedIn(user);
        Ok(true)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserAccount, AppError> {
        tokio::time::sleep(self.config.login_delay).await;

        self.reset_week();
        let allow_fallback = self.config.allow_fallback_login;
        let attempt = self
            .session
            .login(email, password, allow_fallback)
            .cloned();
        let user = match attempt {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(email, "login rejected");
                self.persistence.clear_session()?;
                self.page = Page::Login;
                self.notify(NoticeKind::Error, "Invalid email or password");
                return Err(e);
            }
        };

        self.persistence.save_session(&user)?;
        if user.role == Role::Player {
            self.load_week(&user)?;
        }
        self.page = Self::home_page(user.role);
        self.notify(NoticeKind::Success, format!("Welcome {}!", user.name));
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "logged in");

        self.session.user().ok_or(AppError::NotLoggedIn)
    }

    pub fn logout(&mut self) -> Result<(), AppError> {
        let previous = self.session.logout();
        self.reset_week();
        self.page = Page::Login;
        self.persistence.clear_session()?;

        if let Some(user) = previous {
            if self.config.clear_availability_on_logout {
                self.persistence.remove_availability(&user.id)?;
            }
            tracing::info!(user_id = %user.id, "logged out");
        }

        self.notify(NoticeKind::Info, "Logged out");
        Ok(())
    }

    pub fn navigate(&mut self, page: Page) -> Result<(), AppError> {
        match (page, self.session.role()) {
            (Page::Login, None) => {}
            (Page::Login, Some(_)) => {
                return Err(AppError::Forbidden("already logged in".to_string()));
            }
            (_, None) => return Err(AppError::NotLoggedIn),
            (Page::Manager, Some(Role::Player)) => {
                return Err(AppError::Forbidden("manager dashboard".to_string()));
            }
            (Page::Planning | Page::Manager, Some(_)) => {}
        }
        self.page = page;
        Ok(())
    }

    fn require_player(&self) -> Result<&UserAccount, AppError> {
        let user = self.session.user().ok_or(AppError::NotLoggedIn)?;
        if user.role != Role::Player {
            return Err(AppError::Forbidden("only players have a schedule".to_string()));
        }
        Ok(user)
    }

    fn require_manager(&self) -> Result<&UserAccount, AppError> {
        let user = self.session.user().ok_or(AppError::NotLoggedIn)?;
        if !user.is_manager() {
            return Err(AppError::Forbidden("manager only".to_string()));
        }
        Ok(user)
    }

    pub fn set_slot(&mut self, slot: Slot, value: bool) -> Result<(), AppError> {
        self.require_player()?;
        self.availability = self.availability.set(slot, value);
        Ok(())
    }

    pub fn toggle_slot(&mut self, slot: Slot) -> Result<bool, AppError> {
        self.require_player()?;
        self.availability = self.availability.toggle(slot);
        let available = self.availability.get(slot);
        tracing::debug!(
            day = slot.day_label(),
            hour = %slot.hour_label(),
            available,
            "toggled slot"
        );
        Ok(available)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        is_dirty(&self.original, &self.availability)
    }

    pub fn available_days(&self) -> u8 {
        stats::available_day_count(&self.availability)
    }

    pub fn availability_percentage(&self) -> u8 {
        stats::availability_percentage(&self.availability)
    }

    /// Label for the planning page countdown, e.g. `"5d 13h"`.
    pub fn reset_countdown(&self, now: NaiveDateTime) -> String {
        stats::format_countdown(stats::time_until_reset(now))
    }

    /// Persists the edited week. Returns `false` without writing when there
    /// is nothing to save.
    pub async fn save(&mut self) -> Result<bool, AppError> {
        let user_id = self.require_player()?.id.clone();
        if !self.has_unsaved_changes() {
            return Ok(false);
        }

        tokio::time::sleep(self.config.save_delay).await;

        self.persistence
            .save_availability(&user_id, &self.availability)?;
        self.original = self.availability.clone();
        self.notify(NoticeKind::Success, "Availability saved!");
        tracing::info!(
            user_id = %user_id,
            days = self.available_days(),
            "saved availability"
        );
        Ok(true)
    }

    /// The roster with stored weeks taking precedence over the seed.
    pub fn roster(&self) -> Result<Roster, AppError> {
        Roster::load(&self.persistence, self.seed.clone())
    }

    pub fn dashboard(&self, filter: &RosterFilter) -> Result<Dashboard, AppError> {
        self.require_manager()?;
        Ok(Dashboard::build(&self.roster()?, filter))
    }

    pub fn export(
        &mut self,
        format: ExportFormat,
        dir: &Path,
        date: NaiveDate,
    ) -> Result<PathBuf, AppError> {
        self.require_manager()?;
        let roster = self.roster()?;
        let path = export::write_export(dir, format, roster.players(), date)?;
        self.notify(
            NoticeKind::Success,
            format!("{} export done!", format.extension().to_uppercase()),
        );
        Ok(path)
    }
}
