use reel_core::MovieId;

use crate::commands::common::{open_coordinator, Session};
use crate::error::CliError;

pub async fn run_check(id: u64, session: &Session) -> Result<(), CliError> {
    let coordinator = open_coordinator(session).await?;
    println!("{}", coordinator.is_favorite(MovieId::new(id)));
    Ok(())
}
