use chrono::Utc;

use crate::commands::common::{
    favorite_to_list_item, format_favorite_lines, open_coordinator, FavoriteListItem, Session,
};
use crate::error::CliError;

pub async fn run_list(as_json: bool, session: &Session) -> Result<(), CliError> {
    let coordinator = open_coordinator(session).await?;
    let favorites = coordinator.favorites();

    if as_json {
        let json_items = favorites
            .iter()
            .map(favorite_to_list_item)
            .collect::<Vec<FavoriteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if favorites.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    for line in format_favorite_lines(&favorites, Utc::now().timestamp_millis()) {
        println!("{line}");
    }
    Ok(())
}
