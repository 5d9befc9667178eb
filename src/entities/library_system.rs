//! Association between libraries and systems.
//!
//! Rows cascade away when either the library or the system is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `library_systems` join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "library_systems")]
pub struct Model {
    /// Library side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub library_id: i64,
    /// System side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub system_id: i64,
}

/// Each row belongs to one library and one system
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Linked library
    #[sea_orm(
        belongs_to = "super::library::Entity",
        from = "Column::LibraryId",
        to = "super::library::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Library,
    /// Linked system
    #[sea_orm(
        belongs_to = "super::system::Entity",
        from = "Column::SystemId",
        to = "super::system::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    System,
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Library.def()
    }
}

impl Related<super::system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::System.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
