//! Database models for users and favorites.

use chrono::Utc;
use diesel::prelude::*;

use coinquote_core::users::{NewUser, User, UserPatch};

use crate::errors::StorageError;
use crate::utils::{format_date, format_timestamp, parse_date, parse_timestamp};

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub user_code: String,
    pub email: String,
    pub document_type: String,
    pub registered_at: String,
    pub is_active: bool,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub user_code: String,
    pub email: String,
    pub document_type: String,
    pub registered_at: String,
    pub is_active: bool,
}

/// Profile columns to overwrite; `None` leaves the column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChangesDB {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<String>,
    pub user_code: Option<String>,
    pub email: Option<String>,
    pub document_type: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Insertable, Queryable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = crate::schema::user_favorites)]
pub struct FavoriteDB {
    pub user_id: i32,
    pub currency_id: i32,
}

impl TryFrom<UserDB> for User {
    type Error = StorageError;

    fn try_from(db: UserDB) -> Result<Self, Self::Error> {
        let document_type = db.document_type.parse().map_err(|_| {
            StorageError::Corrupt(format!("document type '{}'", db.document_type))
        })?;
        Ok(Self {
            id: db.id,
            first_name: db.first_name,
            last_name: db.last_name,
            birth_date: parse_date(&db.birth_date)?,
            user_code: db.user_code,
            email: db.email,
            document_type,
            registered_at: parse_timestamp(&db.registered_at)?,
            is_active: db.is_active,
        })
    }
}

impl From<NewUser> for NewUserDB {
    fn from(domain: NewUser) -> Self {
        Self {
            first_name: domain.first_name,
            last_name: domain.last_name,
            birth_date: format_date(&domain.birth_date),
            user_code: domain.user_code,
            email: domain.email,
            document_type: domain.document_type.to_string(),
            registered_at: format_timestamp(&Utc::now()),
            is_active: domain.is_active,
        }
    }
}

impl From<NewUser> for UserChangesDB {
    fn from(domain: NewUser) -> Self {
        Self {
            first_name: Some(domain.first_name),
            last_name: Some(domain.last_name),
            birth_date: Some(format_date(&domain.birth_date)),
            user_code: Some(domain.user_code),
            email: Some(domain.email),
            document_type: Some(domain.document_type.to_string()),
            is_active: Some(domain.is_active),
        }
    }
}

impl From<&UserPatch> for UserChangesDB {
    fn from(patch: &UserPatch) -> Self {
        Self {
            first_name: patch.first_name.clone(),
            last_name: patch.last_name.clone(),
            birth_date: patch.birth_date.as_ref().map(format_date),
            user_code: None,
            email: patch.email.clone(),
            document_type: patch.document_type.map(|d| d.to_string()),
            is_active: patch.is_active,
        }
    }
}
