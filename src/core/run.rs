//! Run business logic - speed-test results.
//!
//! Payload fields accept both the snake_case names used by the admin UI and
//! the PascalCase keys Murakami devices emit in their result files.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{library_run, run},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set};
use serde::Deserialize;

const ENTITY: &str = "run";

/// Input for creating or replacing a run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunPayload {
    #[serde(alias = "TestName")]
    pub test_name: Option<String>,
    #[serde(alias = "TestStartTime")]
    pub test_start_time: Option<DateTime<Utc>>,
    #[serde(alias = "TestEndTime")]
    pub test_end_time: Option<DateTime<Utc>>,
    #[serde(alias = "MurakamiLocation")]
    pub murakami_location: Option<String>,
    #[serde(alias = "MurakamiNetworkType")]
    pub murakami_network_type: Option<String>,
    #[serde(alias = "MurakamiConnectionType")]
    pub murakami_connection_type: Option<String>,
    #[serde(alias = "MurakamiDeviceID")]
    pub murakami_device_id: Option<String>,
    #[serde(alias = "ServerName")]
    pub server_name: Option<String>,
    #[serde(alias = "ServerIP")]
    pub server_ip: Option<String>,
    #[serde(alias = "ClientIP")]
    pub client_ip: Option<String>,
    #[serde(alias = "DownloadUUID")]
    pub download_uuid: Option<String>,
    #[serde(alias = "DownloadValue")]
    pub download_value: Option<f64>,
    #[serde(alias = "DownloadUnit")]
    pub download_unit: Option<String>,
    #[serde(alias = "UploadValue")]
    pub upload_value: Option<f64>,
    #[serde(alias = "UploadUnit")]
    pub upload_unit: Option<String>,
    #[serde(alias = "DownloadRetransValue")]
    pub download_retrans_value: Option<f64>,
    #[serde(alias = "DownloadRetransUnit")]
    pub download_retrans_unit: Option<String>,
    #[serde(alias = "MinRTTValue")]
    pub min_rtt_value: Option<f64>,
    #[serde(alias = "MinRTTUnit")]
    pub min_rtt_unit: Option<String>,
}

impl Validate for RunPayload {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("test_name", &self.test_name),
            ("murakami_location", &self.murakami_location),
            ("murakami_network_type", &self.murakami_network_type),
            ("murakami_connection_type", &self.murakami_connection_type),
            ("murakami_device_id", &self.murakami_device_id),
            ("server_name", &self.server_name),
            ("download_uuid", &self.download_uuid),
            ("download_unit", &self.download_unit),
            ("upload_unit", &self.upload_unit),
            ("download_retrans_unit", &self.download_retrans_unit),
            ("min_rtt_unit", &self.min_rtt_unit),
        ] {
            validate::optional(ENTITY, field, value.as_deref())?;
        }
        validate::optional_ip_address(ENTITY, "server_ip", self.server_ip.as_deref())?;
        validate::optional_ip_address(ENTITY, "client_ip", self.client_ip.as_deref())?;
        validate::non_negative(ENTITY, "download_value", self.download_value)?;
        validate::non_negative(ENTITY, "upload_value", self.upload_value)?;
        validate::non_negative(ENTITY, "download_retrans_value", self.download_retrans_value)?;
        validate::non_negative(ENTITY, "min_rtt_value", self.min_rtt_value)?;

        if let (Some(start), Some(end)) = (self.test_start_time, self.test_end_time) {
            if end < start {
                return Err(crate::errors::Error::invalid(
                    ENTITY,
                    "test_end_time is before test_start_time",
                ));
            }
        }
        Ok(())
    }
}

impl Resource for run::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = RunPayload;
    type Active = run::ActiveModel;

    fn id_column() -> run::Column {
        run::Column::Id
    }

    fn created_at_column() -> run::Column {
        run::Column::CreatedAt
    }

    fn created_at_of(model: &run::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: RunPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<run::ActiveModel> {
        let mut active = run::ActiveModel {
            test_name: Set(payload.test_name),
            test_start_time: Set(payload.test_start_time),
            test_end_time: Set(payload.test_end_time),
            murakami_location: Set(payload.murakami_location),
            murakami_network_type: Set(payload.murakami_network_type),
            murakami_connection_type: Set(payload.murakami_connection_type),
            murakami_device_id: Set(payload.murakami_device_id),
            server_name: Set(payload.server_name),
            server_ip: Set(payload.server_ip),
            client_ip: Set(payload.client_ip),
            download_uuid: Set(payload.download_uuid),
            download_value: Set(payload.download_value),
            download_unit: Set(payload.download_unit),
            upload_value: Set(payload.upload_value),
            upload_unit: Set(payload.upload_unit),
            download_retrans_value: Set(payload.download_retrans_value),
            download_retrans_unit: Set(payload.download_retrans_unit),
            min_rtt_value: Set(payload.min_rtt_value),
            min_rtt_unit: Set(payload.min_rtt_unit),
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

impl LibraryLink for library_run::Entity {
    type Active = library_run::ActiveModel;

    fn library_column() -> library_run::Column {
        library_run::Column::LibraryId
    }

    fn resource_column() -> library_run::Column {
        library_run::Column::RunId
    }

    fn link(library_id: i64, resource_id: i64) -> library_run::ActiveModel {
        library_run::ActiveModel {
            library_id: Set(library_id),
            run_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for run::Entity {
    type Link = library_run::Entity;

    fn link_relation() -> RelationDef {
        run::Relation::LibraryRuns.def()
    }
}

pub async fn create(
    db: &DatabaseConnection,
    payload: RunPayload,
    library_id: Option<i64>,
) -> Result<run::Model> {
    resource::create_in_library::<run::Entity>(db, payload, library_id).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<run::Model>> {
    resource::find_scoped::<run::Entity>(db, filter).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<run::Model>> {
    resource::find_by_id_in_library::<run::Entity>(db, id, library_id).await
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: RunPayload,
) -> Result<Upserted<run::Model>> {
    resource::upsert::<run::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<run::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<run::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<run::Entity>(db, library_id, id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[test]
    fn test_payload_accepts_murakami_keys() {
        let json = r#"{
            "TestName": "ndt7",
            "TestStartTime": "2020-03-01T10:00:00Z",
            "TestEndTime": "2020-03-01T10:00:12Z",
            "ServerIP": "2001:db8::1",
            "DownloadValue": 94.3,
            "DownloadUnit": "Mbit/s",
            "MinRTTValue": 12.0,
            "MinRTTUnit": "ms"
        }"#;
        let payload: RunPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.test_name.as_deref(), Some("ndt7"));
        assert_eq!(payload.download_value, Some(94.3));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_end_before_start_rejected() {
        let payload = RunPayload {
            test_start_time: Some(Utc::now()),
            test_end_time: Some(Utc::now() - chrono::Duration::minutes(1)),
            ..Default::default()
        };
        assert!(matches!(
            payload.validate(),
            Err(Error::Validation { entity: "run", .. })
        ));
    }

    #[tokio::test]
    async fn test_runs_scoped_per_library() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let other = create_test_library(&db, "Branch Two").await?;

        let payload = RunPayload {
            test_name: Some("ndt7".to_string()),
            download_value: Some(50.0),
            ..Default::default()
        };
        let first = create(&db, payload.clone(), Some(library.id)).await?;
        let second = create(&db, payload.clone(), Some(other.id)).await?;
        create(&db, payload, None).await?;

        let mine = find(&db, &ListFilter::default().in_library(library.id)).await?;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, first.id);

        let theirs = find(&db, &ListFilter::default().in_library(other.id)).await?;
        assert_eq!(theirs[0].id, second.id);

        assert_eq!(find(&db, &ListFilter::default()).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_library_cascades_links_only() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let run = create(&db, RunPayload::default(), Some(library.id)).await?;

        crate::core::library::delete(&db, library.id).await?;

        assert!(find_by_id(&db, run.id, None).await?.is_some());
        assert!(find_by_id(&db, run.id, Some(library.id)).await?.is_none());

        Ok(())
    }
}
