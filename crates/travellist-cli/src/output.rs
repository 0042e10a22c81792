//! Plain-text rendering for the shell.

use travellist_core::utils::truncate_string;
use travellist_core::{Destination, Overview, User};

/// Characters of a destination id shown in listings and accepted as a prefix.
pub const SHORT_ID_LEN: usize = 8;

const NAME_WIDTH: usize = 24;
const COUNTRY_WIDTH: usize = 18;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub fn format_user(user: &User) -> String {
    let mut out = format!("{} <{}>\n  member since {}", user.name, user.email, user.member_since());
    if let Some(ref picture) = user.profile_picture {
        out.push_str(&format!("\n  avatar {}", picture));
    }
    out
}

pub fn format_destination_row(d: &Destination) -> String {
    format!(
        "{:<8}  {:<name_w$}  {:<country_w$}  {:<8}  {:<6}  {}",
        short_id(&d.id),
        truncate_string(&d.name, NAME_WIDTH),
        truncate_string(&d.country, COUNTRY_WIDTH),
        d.status.to_string(),
        d.priority.to_string(),
        d.formatted_date(),
        name_w = NAME_WIDTH,
        country_w = COUNTRY_WIDTH,
    )
}

pub fn format_destinations(list: &[Destination]) -> String {
    if list.is_empty() {
        return "No destinations yet. Add one with: add <name> | <country>".to_string();
    }
    list.iter()
        .map(format_destination_row)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_overview(overview: &Overview) -> String {
    let s = &overview.stats;
    let mut lines = vec![
        format!(
            "{} destinations: {} visited, {} planned, {} wishlist ({}% complete)",
            s.total, s.visited, s.planned, s.wishlist, overview.completion_percent
        ),
        format!(
            "Countries visited: {} ({}% of the world)",
            overview.visited_countries.len(),
            overview.world_progress_percent
        ),
    ];
    if !overview.visited_countries.is_empty() {
        lines.push(format!("  {}", overview.visited_countries.join(", ")));
    }
    if !overview.planned_countries.is_empty() {
        lines.push(format!("Planned: {}", overview.planned_countries.join(", ")));
    }

    lines.push("Achievements:".to_string());
    for a in &overview.achievements {
        let mark = if a.unlocked { "x" } else { " " };
        lines.push(format!("  [{}] {} - {}", mark, a.title, a.description));
    }

    if !overview.recent.is_empty() {
        lines.push("Recent:".to_string());
        for d in &overview.recent {
            lines.push(format!("  {} ({}) - {}", d.name, d.country, d.status));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use travellist_core::{NewDestination, Status};

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_empty_list_hint() {
        assert!(format_destinations(&[]).contains("add <name> | <country>"));
    }

    #[test]
    fn test_overview_lists_countries() {
        let list = vec![Destination::from_draft(
            NewDestination::new("Kyoto", "Japan").with_status(Status::Visited),
        )];
        let text = format_overview(&Overview::from_destinations(&list));
        assert!(text.contains("1 visited"));
        assert!(text.contains("Japan"));
        assert!(text.contains("[x] First Country"));
    }
}
