//! Library business logic - the branches every scoped resource hangs off.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{Library, library},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;

const ENTITY: &str = "library";

/// Input for creating or replacing a library.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryPayload {
    /// Display name, unique across libraries
    pub name: String,
    pub physical_address: Option<String>,
    pub shipping_address: Option<String>,
    pub timezone: Option<String>,
    pub coordinates: Option<String>,
    pub primary_contact_name: Option<String>,
    pub primary_contact_email: Option<String>,
    pub it_contact_name: Option<String>,
    pub it_contact_email: Option<String>,
    pub opening_hours: Option<String>,
}

impl Validate for LibraryPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "name", &self.name)?;
        validate::optional(ENTITY, "physical_address", self.physical_address.as_deref())?;
        validate::optional(ENTITY, "shipping_address", self.shipping_address.as_deref())?;
        validate::optional(ENTITY, "timezone", self.timezone.as_deref())?;
        validate::optional(ENTITY, "coordinates", self.coordinates.as_deref())?;
        validate::optional(ENTITY, "primary_contact_name", self.primary_contact_name.as_deref())?;
        validate::optional_email(ENTITY, "primary_contact_email", self.primary_contact_email.as_deref())?;
        validate::optional(ENTITY, "it_contact_name", self.it_contact_name.as_deref())?;
        validate::optional_email(ENTITY, "it_contact_email", self.it_contact_email.as_deref())?;
        validate::optional(ENTITY, "opening_hours", self.opening_hours.as_deref())
    }
}

impl Resource for library::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = LibraryPayload;
    type Active = library::ActiveModel;

    fn id_column() -> library::Column {
        library::Column::Id
    }

    fn created_at_column() -> library::Column {
        library::Column::CreatedAt
    }

    fn created_at_of(model: &library::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: LibraryPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<library::ActiveModel> {
        let mut active = library::ActiveModel {
            name: Set(payload.name.trim().to_string()),
            physical_address: Set(payload.physical_address),
            shipping_address: Set(payload.shipping_address),
            timezone: Set(payload.timezone),
            coordinates: Set(payload.coordinates),
            primary_contact_name: Set(payload.primary_contact_name),
            primary_contact_email: Set(payload.primary_contact_email),
            it_contact_name: Set(payload.it_contact_name),
            it_contact_email: Set(payload.it_contact_email),
            opening_hours: Set(payload.opening_hours),
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

/// Creates a new library.
///
/// # Errors
/// Returns an error if the payload fails validation or the name is taken.
pub async fn create(db: &DatabaseConnection, payload: LibraryPayload) -> Result<library::Model> {
    resource::create::<library::Entity>(db, payload).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<library::Model>> {
    resource::find::<library::Entity>(db, filter).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<library::Model>> {
    resource::find_by_id::<library::Entity>(db, id).await
}

/// Finds a library by its exact name.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<library::Model>> {
    Library::find()
        .filter(library::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: LibraryPayload,
) -> Result<Upserted<library::Model>> {
    resource::upsert::<library::Entity>(db, id, payload).await
}

/// Deletes a library. Its association rows cascade; the linked resources stay.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<library::Entity>(db, id).await
}
