use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;

pub const DAYS_PER_WEEK: u8 = 7;
pub const HOURS_PER_DAY: u8 = 8;
pub const TOTAL_SLOTS: usize = (DAYS_PER_WEEK as usize) * (HOURS_PER_DAY as usize);

pub const DAY_LABELS: [&str; DAYS_PER_WEEK as usize] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Hour index 0 is 16h, index 7 is 23h.
pub const FIRST_HOUR: u8 = 16;

/// One hour of one weekday in the 7x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    day: u8,
    hour: u8,
}

impl Slot {
    pub fn new(day: u8, hour: u8) -> Result<Self, AppError> {
        if day >= DAYS_PER_WEEK || hour >= HOURS_PER_DAY {
            return Err(AppError::SlotOutOfRange { day, hour });
        }
        Ok(Self { day, hour })
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Every slot of the grid, day-major.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..DAYS_PER_WEEK).flat_map(Self::day_slots_unchecked)
    }

    /// The eight slots of one day.
    pub fn day_slots(day: u8) -> Result<impl Iterator<Item = Slot>, AppError> {
        if day >= DAYS_PER_WEEK {
            return Err(AppError::SlotOutOfRange { day, hour: 0 });
        }
        Ok(Self::day_slots_unchecked(day))
    }

    fn day_slots_unchecked(day: u8) -> impl Iterator<Item = Slot> {
        (0..HOURS_PER_DAY).map(move |hour| Slot { day, hour })
    }

    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn day_label(&self) -> &'static str {
        DAY_LABELS[self.day as usize]
    }

    pub fn hour_label(&self) -> String {
        format!("{}h", FIRST_HOUR + self.hour)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.hour)
    }
}

impl FromStr for Slot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, hour) = s
            .split_once('-')
            .ok_or_else(|| AppError::InvalidSlotKey(s.to_string()))?;
        let day: u8 = day
            .parse()
            .map_err(|_| AppError::InvalidSlotKey(s.to_string()))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| AppError::InvalidSlotKey(s.to_string()))?;
        Slot::new(day, hour)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SlotVisitor;

        impl<'de> Visitor<'de> for SlotVisitor {
            type Value = Slot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a slot key like \"2-3\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Slot, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(SlotVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(Slot::new(6, 7).is_ok());
        assert!(matches!(
            Slot::new(7, 0),
            Err(AppError::SlotOutOfRange { day: 7, hour: 0 })
        ));
        assert!(Slot::new(0, 8).is_err());
    }

    #[test]
    fn test_key_format() {
        let slot = Slot::new(2, 3).unwrap();
        assert_eq!(slot.key(), "2-3");
        assert_eq!("2-3".parse::<Slot>().unwrap(), slot);
    }

    #[test]
    fn test_parse_invalid_keys() {
        assert!("23".parse::<Slot>().is_err());
        assert!("a-b".parse::<Slot>().is_err());
        assert!(matches!(
            "9-1".parse::<Slot>(),
            Err(AppError::SlotOutOfRange { .. })
        ));
    }

    #[test]
    fn test_all_covers_grid_in_order() {
        let slots: Vec<Slot> = Slot::all().collect();
        assert_eq!(slots.len(), TOTAL_SLOTS);
        assert_eq!(slots[0].key(), "0-0");
        assert_eq!(slots[8].key(), "1-0");
        assert_eq!(slots[TOTAL_SLOTS - 1].key(), "6-7");
    }

    #[test]
    fn test_labels() {
        let slot = Slot::new(6, 7).unwrap();
        assert_eq!(slot.day_label(), "Sunday");
        assert_eq!(slot.hour_label(), "23h");
    }

    #[test]
    fn test_serde_as_string() {
        let slot = Slot::new(4, 1).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"4-1\"");
        let back: Slot = serde_json::from_str("\"4-1\"").unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<Slot>("\"8-1\"").is_err());
    }
}
