use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::slot::Slot;

/// One user's weekly availability. Slots that were never set read as
/// unavailable, so `{}` and `{"0-0": false}` describe the same week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityRecord {
    slots: BTreeMap<Slot, bool>,
}

impl AvailabilityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, slot: Slot) -> bool {
        self.slots.get(&slot).copied().unwrap_or(false)
    }

    /// Returns a copy with `slot` set to `value`; `self` is left untouched.
    #[must_use]
    pub fn set(&self, slot: Slot, value: bool) -> Self {
        let mut slots = self.slots.clone();
        slots.insert(slot, value);
        Self { slots }
    }

    #[must_use]
    pub fn toggle(&self, slot: Slot) -> Self {
        self.set(slot, !self.get(slot))
    }

    /// Available slots in grid order.
    pub fn available_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots
            .iter()
            .filter(|(_, available)| **available)
            .map(|(slot, _)| *slot)
    }

    /// Raw stored entries, explicit `false` values included.
    pub fn entries(&self) -> impl Iterator<Item = (Slot, bool)> + '_ {
        self.slots.iter().map(|(slot, available)| (*slot, *available))
    }

    pub fn is_empty(&self) -> bool {
        self.available_slots().next().is_none()
    }
}

impl FromIterator<(Slot, bool)> for AvailabilityRecord {
    fn from_iter<I: IntoIterator<Item = (Slot, bool)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl PartialEq for AvailabilityRecord {
    fn eq(&self, other: &Self) -> bool {
        self.available_slots().eq(other.available_slots())
    }
}

impl Eq for AvailabilityRecord {}

/// True when the edited record no longer matches the saved one.
pub fn is_dirty(original: &AvailabilityRecord, edited: &AvailabilityRecord) -> bool {
    original != edited
}
