//! Group entity - A named set of users.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Group database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    /// Unique identifier for the group
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Group name, unique across all groups
    #[sea_orm(unique)]
    pub name: String,
    /// When the group was created
    pub created_at: DateTimeUtc,
    /// When the group was last modified
    pub updated_at: DateTimeUtc,
}

/// Membership is resolved through `user_groups`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Membership rows of this group
    #[sea_orm(has_many = "super::user_group::Entity")]
    UserGroups,
}

impl Related<super::user_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
