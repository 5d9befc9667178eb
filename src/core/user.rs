//! User business logic - staff accounts.
//!
//! Passwords are hashed with argon2 before they are written and the hash is
//! never serialized back out. Users are library-scoped through `library_users`.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{User, library_user, user},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set, prelude::*};
use serde::Deserialize;

const ENTITY: &str = "user";

/// Shortest password accepted on create or replace.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for creating or replacing a user.
#[derive(Clone, Default, Deserialize)]
pub struct UserPayload {
    pub username: String,
    /// Plain-text password; hashed before it is stored
    pub password: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub role: Option<String>,
    /// Defaults to active
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl std::fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Validate for UserPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "username", &self.username)?;
        if self.username.trim().chars().any(char::is_whitespace) {
            return Err(Error::invalid(ENTITY, "username cannot contain whitespace"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::invalid(
                ENTITY,
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        validate::email(ENTITY, "email", &self.email)?;
        validate::optional(ENTITY, "first_name", self.first_name.as_deref())?;
        validate::optional(ENTITY, "last_name", self.last_name.as_deref())?;
        validate::optional(ENTITY, "location", self.location.as_deref())?;
        validate::optional(ENTITY, "role", self.role.as_deref())
    }
}

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks a password against a stored hash. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

impl Resource for user::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = UserPayload;
    type Active = user::ActiveModel;

    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn created_at_column() -> user::Column {
        user::Column::CreatedAt
    }

    fn created_at_of(model: &user::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: UserPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<user::ActiveModel> {
        let mut active = user::ActiveModel {
            username: Set(payload.username.trim().to_string()),
            password: Set(hash_password(&payload.password)?),
            email: Set(payload.email.trim().to_lowercase()),
            first_name: Set(payload.first_name),
            last_name: Set(payload.last_name),
            location: Set(payload.location),
            role: Set(payload.role),
            active: Set(payload.active),
            created_at: Set(timestamps.created_at),
            updated_at: Set(timestamps.updated_at),
            ..Default::default()
        };
        if let Some(id) = id {
            active.id = Set(id);
        }
        Ok(active)
    }
}

impl LibraryLink for library_user::Entity {
    type Active = library_user::ActiveModel;

    fn library_column() -> library_user::Column {
        library_user::Column::LibraryId
    }

    fn resource_column() -> library_user::Column {
        library_user::Column::UserId
    }

    fn link(library_id: i64, resource_id: i64) -> library_user::ActiveModel {
        library_user::ActiveModel {
            library_id: Set(library_id),
            user_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for user::Entity {
    type Link = library_user::Entity;

    fn link_relation() -> RelationDef {
        user::Relation::LibraryUsers.def()
    }
}

pub async fn create(
    db: &DatabaseConnection,
    payload: UserPayload,
    library_id: Option<i64>,
) -> Result<user::Model> {
    resource::create_in_library::<user::Entity>(db, payload, library_id).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<user::Model>> {
    resource::find_scoped::<user::Entity>(db, filter).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<user::Model>> {
    resource::find_by_id_in_library::<user::Entity>(db, id, library_id).await
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: UserPayload,
) -> Result<Upserted<user::Model>> {
    resource::upsert::<user::Entity>(db, id, payload).await
}

/// Deletes a user together with their memberships, links and notes.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<user::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<user::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<user::Entity>(db, library_id, id).await
}
