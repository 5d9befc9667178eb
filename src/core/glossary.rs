//! Glossary business logic - terms explained in the help pages.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::glossary,
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;

const ENTITY: &str = "glossary";

/// Input for creating or replacing a glossary entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlossaryPayload {
    pub term: String,
    pub definition: String,
}

impl Validate for GlossaryPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "term", &self.term)?;
        validate::max_length(ENTITY, "term", &self.term)?;
        validate::required(ENTITY, "definition", &self.definition)
    }
}

impl Resource for glossary::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = GlossaryPayload;
    type Active = glossary::ActiveModel;

    fn id_column() -> glossary::Column {
        glossary::Column::Id
    }

    fn created_at_column() -> glossary::Column {
        glossary::Column::CreatedAt
    }

    fn created_at_of(model: &glossary::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: GlossaryPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<glossary::ActiveModel> {
        let mut active = glossary::ActiveModel {
            term: Set(payload.term.trim().to_string()),
            definition: Set(payload.definition.trim().to_string()),
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

pub async fn create(db: &DatabaseConnection, payload: GlossaryPayload) -> Result<glossary::Model> {
    resource::create::<glossary::Entity>(db, payload).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<glossary::Model>> {
    resource::find::<glossary::Entity>(db, filter).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<glossary::Model>> {
    resource::find_by_id::<glossary::Entity>(db, id).await
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: GlossaryPayload,
) -> Result<Upserted<glossary::Model>> {
    resource::upsert::<glossary::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<glossary::Entity>(db, id).await
}
