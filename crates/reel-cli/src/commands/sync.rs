use crate::commands::common::{open_coordinator, Session};
use crate::error::CliError;

pub async fn run_sync(session: &Session) -> Result<(), CliError> {
    if session.identity.is_none() {
        return Err(CliError::RemoteNotConfigured(
            "no user given; pass --user or set REEL_USER_ID".to_string(),
        ));
    }

    let coordinator = open_coordinator(session).await?;
    let count = coordinator.favorites().len();
    if count == 0 {
        // A failed remote read also lands here as an empty list.
        tracing::warn!("No favorites loaded from the account; check the log for remote errors");
    }
    println!("{}", sync_summary(count));
    Ok(())
}

pub fn sync_summary(count: usize) -> String {
    format!(
        "Loaded {count} favorite{} from your account",
        if count == 1 { "" } else { "s" }
    )
}
