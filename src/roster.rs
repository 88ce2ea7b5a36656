use serde::Serialize;

use crate::errors::AppError;
use crate::models::{AvailabilityRecord, Player, Slot, TOTAL_SLOTS};
use crate::stats::{self, AvailabilityTier, WeeklyOverview};
use crate::storage::{KeyValueStore, Persistence};

/// Builds a record from seven rows of eight `0`/`1` flags, Monday first.
fn grid(rows: [&str; 7]) -> AvailabilityRecord {
    Slot::all()
        .zip(rows.iter().flat_map(|row| row.chars()))
        .map(|(slot, flag)| (slot, flag == '1'))
        .collect()
}

fn player(id: &str, name: &str, email: &str, availability: AvailabilityRecord) -> Player {
    Player {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        availability,
    }
}

/// The team as it ships before anyone has saved a week.
pub fn demo_players() -> Vec<Player> {
    vec![
        player(
            "shaka",
            "Shaka",
            "shaka@velora.gg",
            grid([
                "11111011", "11111111", "00111111", "11111110", "11111100", "11111111", "11111110",
            ]),
        ),
        player(
            "mower",
            "Mower",
            "mower@velora.gg",
            grid([
                "00111111", "11111110", "11111100", "11111111", "01111111", "11111111", "11001111",
            ]),
        ),
        player(
            "3",
            "Alex Dubois",
            "alex.dubois@example.com",
            grid([
                "10101111", "11101011", "11011110", "01110101", "10011111", "11000111", "01111000",
            ]),
        ),
        player(
            "4",
            "Marie Laurent",
            "marie.laurent@example.com",
            grid([
                "11111001", "00111110", "10001111", "11100011", "01110000", "11111000", "00011111",
            ]),
        ),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    /// Seed players with any stored record taking precedence over the seed
    /// grid.
    pub fn load<S: KeyValueStore>(
        persistence: &Persistence<S>,
        seed: Vec<Player>,
    ) -> Result<Self, AppError> {
        let mut players = seed;
        for p in &mut players {
            if let Some(stored) = persistence.load_availability(&p.id)? {
                p.availability = stored;
            }
        }
        Ok(Self { players })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn find(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn filter(&self, filter: &RosterFilter) -> Vec<&Player> {
        self.players.iter().filter(|p| filter.matches(p)).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    /// Case-insensitive substring of the player name.
    pub search: String,
    pub player_id: Option<String>,
}

impl RosterFilter {
    pub fn matches(&self, player: &Player) -> bool {
        let name_ok = player
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let id_ok = self
            .player_id
            .as_deref()
            .map_or(true, |id| player.id == id);
        name_ok && id_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub available_slots: usize,
    pub total_slots: usize,
    pub percentage: u8,
    pub tier: AvailabilityTier,
}

impl PlayerSummary {
    fn from_player(player: &Player) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            email: player.email.clone(),
            initials: initials(&player.name),
            available_slots: stats::available_slot_count(&player.availability),
            total_slots: TOTAL_SLOTS,
            percentage: stats::availability_percentage(&player.availability),
            tier: AvailabilityTier::from_percentage(stats::availability_percentage(
                &player.availability,
            )),
        }
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Manager view over the filtered roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub players: Vec<PlayerSummary>,
    pub average_availability: u8,
    pub total_slots: usize,
    pub overview: WeeklyOverview,
}

impl Dashboard {
    pub fn build(roster: &Roster, filter: &RosterFilter) -> Self {
        let visible = roster.filter(filter);
        let records: Vec<&AvailabilityRecord> = visible.iter().map(|p| &p.availability).collect();

        Self {
            players: visible.iter().map(|p| PlayerSummary::from_player(p)).collect(),
            average_availability: stats::average_availability(records.iter().copied()),
            total_slots: TOTAL_SLOTS,
            overview: stats::weekly_overview(&records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn slot(day: u8, hour: u8) -> Slot {
        Slot::new(day, hour).unwrap()
    }

    #[test]
    fn test_demo_grids_are_complete() {
        for p in demo_players() {
            assert_eq!(p.availability.entries().count(), TOTAL_SLOTS, "{}", p.name);
        }
    }

    #[test]
    fn test_demo_grid_values() {
        let players = demo_players();
        let shaka = &players[0].availability;
        assert!(shaka.get(slot(0, 4)));
        assert!(!shaka.get(slot(0, 5)));
        assert!(!shaka.get(slot(2, 0)));
        let marie = &players[3].availability;
        assert!(!marie.get(slot(6, 2)));
        assert!(marie.get(slot(6, 3)));
    }

    #[test]
    fn test_load_overlays_stored_records() {
        let p = Persistence::new(MemoryStore::new(), "velora");
        let week = AvailabilityRecord::new().set(slot(1, 1), true);
        p.save_availability("mower", &week).unwrap();

        let roster = Roster::load(&p, demo_players()).unwrap();
        assert_eq!(roster.find("mower").unwrap().availability, week);
        assert_eq!(
            roster.find("shaka").unwrap().availability,
            demo_players()[0].availability
        );
    }

    #[test]
    fn test_filter_by_search_and_id() {
        let roster = Roster::new(demo_players());

        let filter = RosterFilter {
            search: "LAURENT".to_string(),
            player_id: None,
        };
        let names: Vec<&str> = roster.filter(&filter).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Marie Laurent"]);

        let filter = RosterFilter {
            search: "a".to_string(),
            player_id: Some("shaka".to_string()),
        };
        assert_eq!(roster.filter(&filter).len(), 1);

        let filter = RosterFilter {
            search: "mower".to_string(),
            player_id: Some("shaka".to_string()),
        };
        assert!(roster.filter(&filter).is_empty());

        assert_eq!(roster.filter(&RosterFilter::default()).len(), 4);
    }

    #[test]
    fn test_dashboard_heat_map() {
        let target = slot(2, 3);
        let yes = AvailabilityRecord::new().set(target, true);
        let no = AvailabilityRecord::new();
        let roster = Roster::new(vec![
            player("a", "Ann", "a@x.io", yes.clone()),
            player("b", "Ben", "b@x.io", no.clone()),
            player("c", "Cam", "c@x.io", yes),
            player("d", "Dee", "d@x.io", no),
        ]);

        let dashboard = Dashboard::build(&roster, &RosterFilter::default());
        assert_eq!(dashboard.players.len(), 4);
        assert_eq!(dashboard.total_slots, 56);
        assert_eq!(dashboard.overview.cell(target).headcount, 2);
        assert_eq!(dashboard.overview.cell(target).intensity, 0.5);
    }

    #[test]
    fn test_dashboard_follows_filter() {
        let roster = Roster::new(demo_players());
        let filter = RosterFilter {
            search: String::new(),
            player_id: Some("shaka".to_string()),
        };
        let dashboard = Dashboard::build(&roster, &filter);
        assert_eq!(dashboard.players.len(), 1);
        assert_eq!(dashboard.overview.players_in_view, 1);
        let shaka = &dashboard.players[0];
        assert_eq!(shaka.available_slots, 49);
        assert_eq!(shaka.percentage, 88);
        assert_eq!(shaka.tier, AvailabilityTier::High);
        assert_eq!(dashboard.average_availability, 88);
    }

    #[test]
    fn test_empty_dashboard() {
        let roster = Roster::new(vec![]);
        let dashboard = Dashboard::build(&roster, &RosterFilter::default());
        assert!(dashboard.players.is_empty());
        assert_eq!(dashboard.average_availability, 0);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Marie Laurent"), "ML");
        assert_eq!(initials("shaka"), "S");
    }
}
