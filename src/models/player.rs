use serde::{Deserialize, Serialize};

use crate::models::availability::AvailabilityRecord;

/// A roster entry as shown on the manager dashboard and in exports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub email: String,
    pub availability: AvailabilityRecord,
}
