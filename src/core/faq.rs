//! FAQ business logic - help-page questions and answers.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::faq,
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use serde::Deserialize;

const ENTITY: &str = "faq";

/// Input for creating or replacing an FAQ entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaqPayload {
    pub question: String,
    pub answer: String,
}

impl Validate for FaqPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "question", &self.question)?;
        validate::required(ENTITY, "answer", &self.answer)
    }
}

impl Resource for faq::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = FaqPayload;
    type Active = faq::ActiveModel;

    fn id_column() -> faq::Column {
        faq::Column::Id
    }

    fn created_at_column() -> faq::Column {
        faq::Column::CreatedAt
    }

    fn created_at_of(model: &faq::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: FaqPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<faq::ActiveModel> {
        let mut active = faq::ActiveModel {
            question: Set(payload.question.trim().to_string()),
            answer: Set(payload.answer.trim().to_string()),
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

pub async fn create(db: &DatabaseConnection, payload: FaqPayload) -> Result<faq::Model> {
    resource::create::<faq::Entity>(db, payload).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<faq::Model>> {
    resource::find::<faq::Entity>(db, filter).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<faq::Model>> {
    resource::find_by_id::<faq::Entity>(db, id).await
}

pub async fn upsert(db: &DatabaseConnection, id: i64, payload: FaqPayload) -> Result<Upserted<faq::Model>> {
    resource::upsert::<faq::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<faq::Entity>(db, id).await
}
