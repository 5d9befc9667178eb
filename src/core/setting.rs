//! Setting business logic - site-wide key/value configuration.
//!
//! Settings are keyed by name rather than by an integer id, so they are
//! written here directly instead of through the generic resource functions.

use crate::{
    core::{
        query::ListFilter,
        resource::{Timestamps, UpsertOutcome, Upserted},
        validate::{self, Validate},
    },
    entities::{Setting, setting},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};

const ENTITY: &str = "setting";

/// Input for creating a setting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingPayload {
    /// Taken from the path on replace
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Validate for SettingPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "key", &self.key)?;
        validate::max_length(ENTITY, "key", &self.key)
    }
}

fn active_model(key: &str, value: String, timestamps: Timestamps) -> setting::ActiveModel {
    setting::ActiveModel {
        key: Set(key.trim().to_string()),
        value: Set(value),
        created_at: Set(timestamps.created_at),
        updated_at: Set(timestamps.updated_at),
    }
}

/// Creates a setting. An existing key is a write error.
#[instrument(skip(db, payload), fields(key = %payload.key))]
pub async fn create(db: &DatabaseConnection, payload: SettingPayload) -> Result<setting::Model> {
    payload.validate()?;
    let row = active_model(&payload.key, payload.value, Timestamps::now())
        .insert(db)
        .await
        .map_err(Error::write(ENTITY, "create"))?;
    info!("Created setting");
    Ok(row)
}

/// Lists settings. The library filter does not apply.
pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<setting::Model>> {
    let mut select = Setting::find();
    if let Some(from) = filter.from {
        select = select.filter(setting::Column::CreatedAt.gt(from));
    }
    if let Some(to) = filter.to {
        select = select.filter(setting::Column::CreatedAt.lt(to));
    }
    filter
        .paginate(select, setting::Column::Key)?
        .all(db)
        .await
        .map_err(Into::into)
}

pub async fn find_by_key(db: &DatabaseConnection, key: &str) -> Result<Option<setting::Model>> {
    Setting::find_by_id(key.trim().to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets `key` to `value`, creating the setting if needed.
#[instrument(skip(db, value))]
pub async fn upsert(
    db: &DatabaseConnection,
    key: &str,
    value: String,
) -> Result<Upserted<setting::Model>> {
    let payload = SettingPayload {
        key: key.to_string(),
        value,
    };
    payload.validate()?;

    let txn = db.begin().await?;
    let existing = Setting::find_by_id(payload.key.trim().to_string())
        .one(&txn)
        .await?;

    let (outcome, row) = match existing {
        Some(current) => {
            let row = active_model(&payload.key, payload.value, Timestamps::refreshed(current.created_at))
                .update(&txn)
                .await
                .map_err(Error::write(ENTITY, "update"))?;
            (UpsertOutcome::Replaced, row)
        }
        None => {
            let row = active_model(&payload.key, payload.value, Timestamps::now())
                .insert(&txn)
                .await
                .map_err(Error::write(ENTITY, "create"))?;
            (UpsertOutcome::Created, row)
        }
    };

    txn.commit().await?;
    info!(?outcome, "Upserted setting");
    Ok(Upserted { outcome, row })
}

pub async fn delete(db: &DatabaseConnection, key: &str) -> Result<u64> {
    let result = Setting::delete_by_id(key.trim().to_string()).exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn payload(key: &str, value: &str) -> SettingPayload {
        SettingPayload {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_setting_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create(&db, payload("title", "Murakami Viz")).await?;
        assert_eq!(find_by_key(&db, "title").await?.unwrap(), created);

        let duplicate = create(&db, payload("title", "Other")).await;
        assert!(matches!(duplicate, Err(Error::Write { entity: "setting", .. })));

        let replaced = upsert(&db, "title", "Library Speeds".to_string()).await?;
        assert!(replaced.exists());
        assert_eq!(replaced.row.value, "Library Speeds");
        assert_eq!(replaced.row.created_at, created.created_at);

        let fresh = upsert(&db, "theme", "dark".to_string()).await?;
        assert!(!fresh.exists());

        let keys: Vec<String> = find(&db, &ListFilter::default())
            .await?
            .into_iter()
            .map(|s| s.key)
            .collect();
        assert_eq!(keys, vec!["theme", "title"]);

        assert_eq!(delete(&db, "title").await?, 1);
        assert_eq!(delete(&db, "title").await?, 0);
        assert!(find_by_key(&db, "title").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_blank_key_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = upsert(&db, "  ", "x".to_string()).await;
        assert!(matches!(result, Err(Error::Validation { entity: "setting", .. })));

        Ok(())
    }
}
