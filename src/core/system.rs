//! System business logic - platforms in use at library branches.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{library_system, system},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set};
use serde::Deserialize;

const ENTITY: &str = "system";

/// Input for creating or replacing a system.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemPayload {
    pub name: String,
}

impl Validate for SystemPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "name", &self.name)
    }
}

impl Resource for system::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = SystemPayload;
    type Active = system::ActiveModel;

    fn id_column() -> system::Column {
        system::Column::Id
    }

    fn created_at_column() -> system::Column {
        system::Column::CreatedAt
    }

    fn created_at_of(model: &system::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: SystemPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<system::ActiveModel> {
        let mut active = system::ActiveModel {
            name: Set(payload.name.trim().to_string()),
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

impl LibraryLink for library_system::Entity {
    type Active = library_system::ActiveModel;

    fn library_column() -> library_system::Column {
        library_system::Column::LibraryId
    }

    fn resource_column() -> library_system::Column {
        library_system::Column::SystemId
    }

    fn link(library_id: i64, resource_id: i64) -> library_system::ActiveModel {
        library_system::ActiveModel {
            library_id: Set(library_id),
            system_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for system::Entity {
    type Link = library_system::Entity;

    fn link_relation() -> RelationDef {
        system::Relation::LibrarySystems.def()
    }
}

pub async fn create(
    db: &DatabaseConnection,
    payload: SystemPayload,
    library_id: Option<i64>,
) -> Result<system::Model> {
    resource::create_in_library::<system::Entity>(db, payload, library_id).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<system::Model>> {
    resource::find_scoped::<system::Entity>(db, filter).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<system::Model>> {
    resource::find_by_id_in_library::<system::Entity>(db, id, library_id).await
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: SystemPayload,
) -> Result<Upserted<system::Model>> {
    resource::upsert::<system::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<system::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<system::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<system::Entity>(db, library_id, id).await
}
