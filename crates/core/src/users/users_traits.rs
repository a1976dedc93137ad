use async_trait::async_trait;

use super::users_model::{ManualQuotation, NewUser, UpsertUser, User, UserPatch};
use crate::currencies::Currency;
use crate::errors::Result;
use crate::quotations::{Quotation, QuotationUpdate};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: i32) -> Result<Option<User>>;
    fn favorite_currency_ids(&self, user_id: i32) -> Result<Vec<i32>>;
    fn user_ids_for_currency(&self, currency_id: i32) -> Result<Vec<i32>>;
    /// Inserts the user and links the favorites in one transaction.
    async fn create(&self, new_user: NewUser, favorite_currency_ids: Vec<i32>) -> Result<User>;
    async fn update(&self, user_id: i32, user: NewUser) -> Result<User>;
    /// Applies the profile fields of `patch`; `Some` favorites replace the set
    /// in the same transaction.
    async fn patch(
        &self,
        user_id: i32,
        patch: UserPatch,
        favorite_currency_ids: Option<Vec<i32>>,
    ) -> Result<User>;
    /// Links a favorite; linking twice is a no-op.
    async fn add_favorite(&self, user_id: i32, currency_id: i32) -> Result<()>;
    /// Deletes every favorite of the user and inserts the new set atomically.
    async fn replace_favorites(&self, user_id: i32, currency_ids: Vec<i32>) -> Result<()>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_user(&self, user_id: i32) -> Result<User>;
    fn favorite_currency_ids(&self, user_id: i32) -> Result<Vec<i32>>;
    fn users_for_currency(&self, currency_id: i32) -> Result<Vec<i32>>;
    async fn create_user(&self, new_user: NewUser, favorite_codes: Vec<String>) -> Result<User>;
    async fn update_user(&self, user_id: i32, user: NewUser) -> Result<User>;
    async fn patch_user(&self, user_id: i32, patch: UserPatch) -> Result<User>;
    async fn upsert_user(&self, request: UpsertUser) -> Result<User>;
    async fn replace_favorites(&self, user_id: i32, favorite_codes: Vec<String>)
        -> Result<Vec<i32>>;
    async fn add_favorite_by_name(&self, user_id: i32, currency_name: &str) -> Result<Currency>;
    async fn save_manual_quotation(
        &self,
        user_id: i32,
        quotation: ManualQuotation,
    ) -> Result<Quotation>;
    async fn update_manual_quotation(
        &self,
        user_id: i32,
        quotation_id: i32,
        update: QuotationUpdate,
    ) -> Result<Quotation>;
    async fn delete_manual_quotation(&self, quotation_id: i32) -> Result<()>;
}
