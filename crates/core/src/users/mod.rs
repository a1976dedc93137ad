//! Users module - profiles, favorite currencies, and manual quotations.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{
    is_adult, DocumentType, FavoritesChange, ManualQuotation, NewUser, UpsertUser, User,
    UserPatch,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
