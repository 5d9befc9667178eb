//! Association between libraries and runs.
//!
//! Rows cascade away when either the library or the run is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `library_runs` join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "library_runs")]
pub struct Model {
    /// Library side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub library_id: i64,
    /// Run side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub run_id: i64,
}

/// Each row belongs to one library and one run
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
    /// Linked run
    #[sea_orm(
        belongs_to = "super::run::Entity",
        from = "Column::RunId",
        to = "super::run::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Run,
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Library.def()
    }
}

impl Related<super::run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Run.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
