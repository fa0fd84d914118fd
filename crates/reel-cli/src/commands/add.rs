use crate::cli::MovieArgs;
use crate::commands::common::{finish_sync, movie_from_args, open_coordinator, Session};
use crate::error::CliError;

pub async fn run_add(args: MovieArgs, session: &Session) -> Result<(), CliError> {
    let movie = movie_from_args(args)?;
    let coordinator = open_coordinator(session).await?;

    let movie_id = movie.id;
    let pending = coordinator.add(movie, session.identity.as_ref());
    finish_sync(pending).await;

    println!("{movie_id}");
    Ok(())
}
