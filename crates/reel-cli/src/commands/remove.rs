use reel_core::MovieId;

use crate::commands::common::{finish_sync, open_coordinator, Session};
use crate::error::CliError;

pub async fn run_remove(id: u64, session: &Session) -> Result<(), CliError> {
    let coordinator = open_coordinator(session).await?;
    let movie_id = MovieId::new(id);

    if !coordinator.is_favorite(movie_id) {
        tracing::debug!("Movie {} is not a favorite", movie_id);
    }
    let pending = coordinator.remove(movie_id, session.identity.as_ref());
    finish_sync(pending).await;

    println!("{movie_id}");
    Ok(())
}
