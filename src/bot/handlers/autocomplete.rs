//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests player names and beverage names as the operator types, so commands
//! receive names that match stored rows exactly.

use crate::{
    bot::BotData,
    core::{beverage, player},
    errors::Error,
};

/// Discord caps autocomplete responses at 25 choices
const MAX_SUGGESTIONS: usize = 25;

fn matching_names(names: impl Iterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect();

    // Sort alphabetically for consistent UX
    matching.sort();
    matching
}

/// Provides autocomplete suggestions for player names.
///
/// The operator can still type a name that does not exist yet; commands that
/// register players on first use accept it.
pub async fn autocomplete_player_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(players) = player::get_all_players(db).await else {
        return Vec::new();
    };

    matching_names(players.into_iter().map(|p| p.name), partial)
}

/// Provides autocomplete suggestions for beverage names from the menu.
pub async fn autocomplete_beverage_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(beverages) = beverage::get_all_beverages(db).await else {
        return Vec::new();
    };

    matching_names(beverages.into_iter().map(|b| b.name), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_filters_and_sorts() {
        let names = ["Zoya", "asha", "Ashwin", "Ravi"]
            .into_iter()
            .map(String::from);
        assert_eq!(matching_names(names, "ash"), vec!["Ashwin", "asha"]);
    }

    #[test]
    fn test_matching_names_caps_results() {
        let names = (0..40).map(|i| format!("Player {i:02}"));
        assert_eq!(matching_names(names, "player").len(), MAX_SUGGESTIONS);
    }
}
