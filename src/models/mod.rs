pub mod account;
pub mod availability;
pub mod player;
pub mod slot;

pub use account::{Role, UserAccount};
pub use availability::{is_dirty, AvailabilityRecord};
pub use player::Player;
pub use slot::{Slot, DAYS_PER_WEEK, HOURS_PER_DAY, TOTAL_SLOTS};
