//! SQLite storage implementation for users and their favorite currencies.

mod model;
mod repository;

pub use model::{FavoriteDB, NewUserDB, UserChangesDB, UserDB};
pub use repository::UserRepository;
