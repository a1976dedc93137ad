use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use coinquote_core::errors::Error;
use coinquote_core::users::{NewUser, User, UserPatch, UserRepositoryTrait};
use coinquote_core::Result;

use super::model::{FavoriteDB, NewUserDB, UserChangesDB, UserDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{user_favorites, users};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_user(conn: &mut SqliteConnection, user_id: i32) -> Result<User> {
    let row = users::table
        .find(user_id)
        .select(UserDB::as_select())
        .first::<UserDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found("user", user_id))?;
    Ok(User::try_from(row)?)
}

fn apply_changes(conn: &mut SqliteConnection, user_id: i32, changes: &UserChangesDB) -> Result<()> {
    let updated = diesel::update(users::table.find(user_id))
        .set(changes)
        .execute(conn)
        .into_core()?;
    if updated == 0 {
        return Err(Error::not_found("user", user_id));
    }
    Ok(())
}

/// Deletes the user's favorites and inserts `currency_ids`. Runs inside the
/// caller's write transaction.
fn write_favorites(conn: &mut SqliteConnection, user_id: i32, currency_ids: &[i32]) -> Result<()> {
    diesel::delete(user_favorites::table.filter(user_favorites::user_id.eq(user_id)))
        .execute(conn)
        .into_core()?;
    insert_favorites(conn, user_id, currency_ids)
}

fn insert_favorites(conn: &mut SqliteConnection, user_id: i32, currency_ids: &[i32]) -> Result<()> {
    if currency_ids.is_empty() {
        return Ok(());
    }
    let rows: Vec<FavoriteDB> = currency_ids
        .iter()
        .map(|&currency_id| FavoriteDB {
            user_id,
            currency_id,
        })
        .collect();
    diesel::insert_or_ignore_into(user_favorites::table)
        .values(&rows)
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: i32) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(|r| User::try_from(r).map_err(Error::from))
            .transpose()
    }

    fn favorite_currency_ids(&self, user_id: i32) -> Result<Vec<i32>> {
        let mut conn = get_connection(&self.pool)?;
        user_favorites::table
            .filter(user_favorites::user_id.eq(user_id))
            .order(user_favorites::currency_id.asc())
            .select(user_favorites::currency_id)
            .load::<i32>(&mut conn)
            .into_core()
    }

    fn user_ids_for_currency(&self, currency_id: i32) -> Result<Vec<i32>> {
        let mut conn = get_connection(&self.pool)?;
        user_favorites::table
            .filter(user_favorites::currency_id.eq(currency_id))
            .order(user_favorites::user_id.asc())
            .select(user_favorites::user_id)
            .load::<i32>(&mut conn)
            .into_core()
    }

    async fn create(&self, new_user: NewUser, favorite_currency_ids: Vec<i32>) -> Result<User> {
        let new_user_db = NewUserDB::from(new_user);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let row = diesel::insert_into(users::table)
                    .values(&new_user_db)
                    .returning(UserDB::as_returning())
                    .get_result::<UserDB>(conn)
                    .into_core()?;
                insert_favorites(conn, row.id, &favorite_currency_ids)?;
                Ok(User::try_from(row)?)
            })
            .await
    }

    async fn update(&self, user_id: i32, user: NewUser) -> Result<User> {
        let changes = UserChangesDB::from(user);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                apply_changes(conn, user_id, &changes)?;
                load_user(conn, user_id)
            })
            .await
    }

    async fn patch(
        &self,
        user_id: i32,
        patch: UserPatch,
        favorite_currency_ids: Option<Vec<i32>>,
    ) -> Result<User> {
        let changes = patch
            .has_profile_changes()
            .then(|| UserChangesDB::from(&patch));
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                // Diesel rejects an empty changeset.
                match &changes {
                    Some(changes) => apply_changes(conn, user_id, changes)?,
                    None => {
                        load_user(conn, user_id)?;
                    }
                }
                if let Some(currency_ids) = &favorite_currency_ids {
                    write_favorites(conn, user_id, currency_ids)?;
                }
                load_user(conn, user_id)
            })
            .await
    }

    async fn add_favorite(&self, user_id: i32, currency_id: i32) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                insert_favorites(conn, user_id, &[currency_id])
            })
            .await
    }

    async fn replace_favorites(&self, user_id: i32, currency_ids: Vec<i32>) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                write_favorites(conn, user_id, &currency_ids)
            })
            .await
    }
}
