//! System entity - An integrated library system or other platform in use at a branch.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "systems")]
pub struct Model {
    /// Unique identifier for the system
    #[sea_orm(primary_key)]
    pub id: i64,
    /// System name, unique across all systems
    #[sea_orm(unique)]
    pub name: String,
    /// When the system was created
    pub created_at: DateTimeUtc,
    /// When the system was last modified
    pub updated_at: DateTimeUtc,
}

/// Systems reach libraries through `library_systems`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Library associations of this system
    #[sea_orm(has_many = "super::library_system::Entity")]
    LibrarySystems,
}

impl Related<super::library_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibrarySystems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
