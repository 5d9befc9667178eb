//! User entity - A staff account.
//!
//! The password column only ever holds an argon2 hash and is skipped when the
//! model is serialized.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all users
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing, default)]
    pub password: String,
    /// E-mail address, unique across all users
    #[sea_orm(unique)]
    pub email: String,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Free-form location label
    pub location: Option<String>,
    /// Role label shown in the admin UI
    pub role: Option<String>,
    /// Disabled accounts keep their rows but are flagged inactive
    pub active: bool,
    /// When the user was created
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Users reach libraries through `library_users` and groups through `user_groups`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Library associations of this user
    #[sea_orm(has_many = "super::library_user::Entity")]
    LibraryUsers,
    /// Group memberships of this user
    #[sea_orm(has_many = "super::user_group::Entity")]
    UserGroups,
    /// Notes authored by this user
    #[sea_orm(has_many = "super::note::Entity")]
    Notes,
}

impl Related<super::library_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryUsers.def()
    }
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroups.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
