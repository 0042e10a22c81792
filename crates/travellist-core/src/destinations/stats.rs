use serde::Serialize;

use crate::models::{Destination, Status};

/// Countries used as the denominator for world progress.
pub const COUNTRIES_IN_WORLD: usize = 195;

/// Destinations shown in the "recent" list.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TravelStats {
    pub total: usize,
    pub visited: usize,
    pub planned: usize,
    pub wishlist: usize,
}

impl TravelStats {
    pub fn from_destinations(destinations: &[Destination]) -> Self {
        let count = |status: Status| destinations.iter().filter(|d| d.status == status).count();
        Self {
            total: destinations.len(),
            visited: count(Status::Visited),
            planned: count(Status::Planned),
            wishlist: count(Status::Wishlist),
        }
    }

    /// Share of destinations already visited, rounded to a whole percent.
    pub fn completion_percent(&self) -> u32 {
        percent(self.visited, self.total)
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Newest first, at most `limit`.
pub fn recent(destinations: &[Destination], limit: usize) -> Vec<&Destination> {
    let mut sorted: Vec<&Destination> = destinations.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Distinct countries with at least one destination in `status`, in the
/// order they first appear.
pub fn countries_with_status(destinations: &[Destination], status: Status) -> Vec<&str> {
    let mut countries: Vec<&str> = Vec::new();
    for d in destinations.iter().filter(|d| d.status == status) {
        if !countries.contains(&d.country.as_str()) {
            countries.push(&d.country);
        }
    }
    countries
}

pub fn visited_countries(destinations: &[Destination]) -> Vec<&str> {
    countries_with_status(destinations, Status::Visited)
}

pub fn planned_countries(destinations: &[Destination]) -> Vec<&str> {
    countries_with_status(destinations, Status::Planned)
}

/// Visited countries as a share of all countries in the world.
pub fn world_progress_percent(destinations: &[Destination]) -> u32 {
    percent(visited_countries(destinations).len(), COUNTRIES_IN_WORLD)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

pub fn achievements(destinations: &[Destination]) -> Vec<Achievement> {
    let visited = visited_countries(destinations).len();
    let stats = TravelStats::from_destinations(destinations);

    vec![
        Achievement {
            id: "first-country",
            title: "First Country",
            description: "Visit your first country",
            unlocked: visited >= 1,
        },
        Achievement {
            id: "world-traveler",
            title: "World Traveler",
            description: "Visit 25 countries",
            unlocked: visited >= 25,
        },
        Achievement {
            id: "planning-master",
            title: "Planning Master",
            description: "Have 10 planned destinations",
            unlocked: stats.planned >= 10,
        },
    ]
}
