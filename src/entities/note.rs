//! Note entity - A staff note about one or more libraries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Note database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    /// Unique identifier for the note
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User who wrote the note
    pub author: i64,
    /// One-line subject
    pub subject: String,
    /// Body text
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// When the note was created
    pub created_at: DateTimeUtc,
    /// When the note was last modified
    pub updated_at: DateTimeUtc,
}

/// Notes belong to an author and reach libraries through `library_notes`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Author of the note
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::Author",
        to = "super::user::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Author,
    /// Library associations of this note
    #[sea_orm(has_many = "super::library_note::Entity")]
    LibraryNotes,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::library_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryNotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
