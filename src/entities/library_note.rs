//! Association between libraries and notes.
//!
//! Rows cascade away when either the library or the note is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `library_notes` join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "library_notes")]
pub struct Model {
    /// Library side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub library_id: i64,
    /// Note side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub note_id: i64,
}

/// Each row belongs to one library and one note
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
    /// Linked note
    #[sea_orm(
        belongs_to = "super::note::Entity",
        from = "Column::NoteId",
        to = "super::note::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Note,
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Library.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
