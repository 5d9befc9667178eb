//! Note business logic - staff notes attached to libraries.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{User, library_note, note},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set, prelude::*};
use serde::Deserialize;

const ENTITY: &str = "note";

/// Input for creating or replacing a note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePayload {
    /// Id of the user writing the note
    pub author: i64,
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for NotePayload {
    fn validate(&self) -> Result<()> {
        if self.author <= 0 {
            return Err(Error::invalid(ENTITY, "author is required"));
        }
        validate::required(ENTITY, "subject", &self.subject)
    }
}

impl Resource for note::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = NotePayload;
    type Active = note::ActiveModel;

    fn id_column() -> note::Column {
        note::Column::Id
    }

    fn created_at_column() -> note::Column {
        note::Column::CreatedAt
    }

    fn created_at_of(model: &note::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: NotePayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<note::ActiveModel> {
        let mut active = note::ActiveModel {
            author: Set(payload.author),
            subject: Set(payload.subject.trim().to_string()),
            description: Set(payload.description),
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

impl LibraryLink for library_note::Entity {
    type Active = library_note::ActiveModel;

    fn library_column() -> library_note::Column {
        library_note::Column::LibraryId
    }

    fn resource_column() -> library_note::Column {
        library_note::Column::NoteId
    }

    fn link(library_id: i64, resource_id: i64) -> library_note::ActiveModel {
        library_note::ActiveModel {
            library_id: Set(library_id),
            note_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for note::Entity {
    type Link = library_note::Entity;

    fn link_relation() -> RelationDef {
        note::Relation::LibraryNotes.def()
    }
}

async fn ensure_author(db: &DatabaseConnection, payload: &NotePayload) -> Result<()> {
    payload.validate()?;
    User::find_by_id(payload.author)
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("user", payload.author))
}

/// Creates a note by an existing author, linking it to `library_id` when given.
///
/// # Errors
/// `NotFound` when the author or the library does not exist.
pub async fn create(
    db: &DatabaseConnection,
    payload: NotePayload,
    library_id: Option<i64>,
) -> Result<note::Model> {
    ensure_author(db, &payload).await?;
    resource::create_in_library::<note::Entity>(db, payload, library_id).await
}

/// Lists notes, restricted to `filter.author` and `filter.library` when set.
pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<note::Model>> {
    let mut select = resource::scoped::<note::Entity>(filter);
    if let Some(author) = filter.author {
        select = select.filter(note::Column::Author.eq(author));
    }
    filter
        .paginate(select, note::Column::Id)?
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<note::Model>> {
    resource::find_by_id_in_library::<note::Entity>(db, id, library_id).await
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: NotePayload,
) -> Result<Upserted<note::Model>> {
    ensure_author(db, &payload).await?;
    resource::upsert::<note::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<note::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<note::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<note::Entity>(db, library_id, id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Note;
    use crate::test_utils::*;

    fn payload(author: i64, subject: &str) -> NotePayload {
        NotePayload {
            author,
            subject: subject.to_string(),
            description: "Router replaced".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_author_not_found() -> Result<()> {
        let (db, library) = setup_with_library().await?;

        let result = create(&db, payload(42, "Outage"), Some(library.id)).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "user", .. })));
        assert!(Note::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_filters_by_author_and_library() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;

        let first = create(&db, payload(alice.id, "Outage"), Some(library.id)).await?;
        create(&db, payload(bob.id, "Upgrade"), Some(library.id)).await?;
        create(&db, payload(alice.id, "Unscoped"), None).await?;

        let by_alice = ListFilter {
            author: Some(alice.id),
            ..Default::default()
        };
        assert_eq!(find(&db, &by_alice).await?.len(), 2);

        let alice_here = find(&db, &by_alice.in_library(library.id)).await?;
        assert_eq!(alice_here.len(), 1);
        assert_eq!(alice_here[0].id, first.id);

        assert_eq!(find(&db, &ListFilter::default()).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_author_removes_notes() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;
        let note = create(&db, payload(author.id, "Outage"), None).await?;

        crate::core::user::delete(&db, author.id).await?;

        assert!(find_by_id(&db, note.id, None).await?.is_none());

        Ok(())
    }

    #[test]
    fn test_subject_required() {
        assert!(payload(1, "  ").validate().is_err());
        assert!(payload(0, "Outage").validate().is_err());
        assert!(payload(1, "Outage").validate().is_ok());
    }
}
