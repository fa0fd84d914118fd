//! Data models for Reel

mod favorite;
mod identity;
mod movie;

pub use favorite::FavoriteRecord;
pub use identity::UserId;
pub use movie::{MovieId, MovieSummary, PosterSize};
