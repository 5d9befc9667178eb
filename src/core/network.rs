//! Network business logic - internet connections serving libraries.
//!
//! The `ips` column is a JSON array in a text column. Writes encode the list
//! and every read decodes it into a [`NetworkRecord`], so callers never see
//! the raw text.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{library_network, network},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "network";

/// Input for creating or replacing a network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkPayload {
    /// Display name, unique across networks
    pub name: String,
    /// Internet service provider
    pub isp: Option<String>,
    /// Public addresses of the connection, in order
    #[serde(default)]
    pub ips: Vec<String>,
    /// Contracted upload speed
    pub contracted_speed_upload: Option<f64>,
    /// Contracted download speed
    pub contracted_speed_download: Option<f64>,
    /// Upload bandwidth cap
    pub bandwidth_cap_upload: Option<f64>,
    /// Download bandwidth cap
    pub bandwidth_cap_download: Option<f64>,
}

impl Validate for NetworkPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "name", &self.name)?;
        validate::optional(ENTITY, "isp", self.isp.as_deref())?;
        for ip in &self.ips {
            validate::ip_address(ENTITY, "ips", ip)?;
        }
        validate::non_negative(ENTITY, "contracted_speed_upload", self.contracted_speed_upload)?;
        validate::non_negative(ENTITY, "contracted_speed_download", self.contracted_speed_download)?;
        validate::non_negative(ENTITY, "bandwidth_cap_upload", self.bandwidth_cap_upload)?;
        validate::non_negative(ENTITY, "bandwidth_cap_download", self.bandwidth_cap_download)
    }
}

/// A network as returned to callers, with `ips` decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkRecord {
    pub id: i64,
    pub name: String,
    pub isp: Option<String>,
    pub ips: Vec<String>,
    pub contracted_speed_upload: Option<f64>,
    pub contracted_speed_download: Option<f64>,
    pub bandwidth_cap_upload: Option<f64>,
    pub bandwidth_cap_download: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<network::Model> for NetworkRecord {
    type Error = Error;

    fn try_from(model: network::Model) -> Result<Self> {
        Ok(Self {
            ips: decode_ips(&model.ips)?,
            id: model.id,
            name: model.name,
            isp: model.isp,
            contracted_speed_upload: model.contracted_speed_upload,
            contracted_speed_download: model.contracted_speed_download,
            bandwidth_cap_upload: model.bandwidth_cap_upload,
            bandwidth_cap_download: model.bandwidth_cap_download,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Decodes the stored `ips` column.
///
/// Blank text decodes to an empty list. Rows written before the column held
/// JSON store the addresses comma-joined, so text that is not a JSON array is
/// split on commas instead.
fn decode_ips(raw: &str) -> Result<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(Into::into);
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(ToString::to_string)
        .collect())
}

fn records(models: Vec<network::Model>) -> Result<Vec<NetworkRecord>> {
    models.into_iter().map(NetworkRecord::try_from).collect()
}

impl Resource for network::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = NetworkPayload;
    type Active = network::ActiveModel;

    fn id_column() -> network::Column {
        network::Column::Id
    }

    fn created_at_column() -> network::Column {
        network::Column::CreatedAt
    }

    fn created_at_of(model: &network::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: NetworkPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<network::ActiveModel> {
        let ips: Vec<String> = payload.ips.iter().map(|ip| ip.trim().to_string()).collect();
        let mut active = network::ActiveModel {
            name: Set(payload.name.trim().to_string()),
            isp: Set(payload.isp),
            ips: Set(serde_json::to_string(&ips)?),
            contracted_speed_upload: Set(payload.contracted_speed_upload),
            contracted_speed_download: Set(payload.contracted_speed_download),
            bandwidth_cap_upload: Set(payload.bandwidth_cap_upload),
            bandwidth_cap_download: Set(payload.bandwidth_cap_download),
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

impl LibraryLink for library_network::Entity {
    type Active = library_network::ActiveModel;

    fn library_column() -> library_network::Column {
        library_network::Column::LibraryId
    }

    fn resource_column() -> library_network::Column {
        library_network::Column::NetworkId
    }

    fn link(library_id: i64, resource_id: i64) -> library_network::ActiveModel {
        library_network::ActiveModel {
            library_id: Set(library_id),
            network_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for network::Entity {
    type Link = library_network::Entity;

    fn link_relation() -> RelationDef {
        network::Relation::LibraryNetworks.def()
    }
}

/// Creates a network, linking it to `library_id` when given.
pub async fn create(
    db: &DatabaseConnection,
    payload: NetworkPayload,
    library_id: Option<i64>,
) -> Result<NetworkRecord> {
    resource::create_in_library::<network::Entity>(db, payload, library_id)
        .await?
        .try_into()
}

/// Lists networks with their `ips` decoded.
pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<NetworkRecord>> {
    records(resource::find_scoped::<network::Entity>(db, filter).await?)
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<NetworkRecord>> {
    resource::find_by_id_in_library::<network::Entity>(db, id, library_id)
        .await?
        .map(NetworkRecord::try_from)
        .transpose()
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: NetworkPayload,
) -> Result<Upserted<NetworkRecord>> {
    resource::upsert::<network::Entity>(db, id, payload)
        .await?
        .try_map(NetworkRecord::try_from)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<network::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<network::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<network::Entity>(db, library_id, id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::Network;
    use crate::test_utils::*;
    use sea_orm::{ActiveModelTrait, EntityTrait};

    fn payload(name: &str, ips: &[&str]) -> NetworkPayload {
        NetworkPayload {
            name: name.to_string(),
            isp: Some("Comcast".to_string()),
            ips: ips.iter().map(ToString::to_string).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ips_round_trip_as_list() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create(&db, payload("Main", &["1.1.1.1", "2.2.2.2"]), None).await?;
        assert_eq!(created.ips, vec!["1.1.1.1", "2.2.2.2"]);

        let found = find_by_id(&db, created.id, None).await?.unwrap();
        assert_eq!(found.ips, vec!["1.1.1.1", "2.2.2.2"]);

        // Stored as a JSON array, never comma-joined
        let raw = Network::find_by_id(created.id).one(&db).await?.unwrap();
        assert_eq!(raw.ips, r#"["1.1.1.1","2.2.2.2"]"#);

        let listed = find(&db, &ListFilter::default()).await?;
        assert_eq!(listed[0].ips, vec!["1.1.1.1", "2.2.2.2"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_ip_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create(&db, payload("Main", &["1.1.1.1", "nope"]), None).await;
        assert!(matches!(result, Err(Error::Validation { entity: "network", .. })));
        assert!(Network::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[test]
    fn test_negative_speed_rejected() {
        let bad = NetworkPayload {
            contracted_speed_upload: Some(-5.0),
            ..payload("Main", &[])
        };
        assert!(bad.validate().is_err());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_write_error() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, payload("Main", &[]), None).await?;

        let result = create(&db, payload("Main", &[]), None).await;
        assert!(matches!(
            result,
            Err(Error::Write {
                entity: "network",
                operation: "create",
                ..
            })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_ips() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let created = create(&db, payload("Main", &["1.1.1.1"]), Some(library.id)).await?;

        let replaced = upsert(&db, created.id, payload("Main", &["3.3.3.3"])).await?;
        assert!(replaced.exists());
        assert_eq!(replaced.row.ips, vec!["3.3.3.3"]);

        let scoped = find(&db, &ListFilter::default().in_library(library.id)).await?;
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].ips, vec!["3.3.3.3"]);

        Ok(())
    }

    #[test]
    fn test_blank_ips_decode_empty() {
        assert!(decode_ips("").unwrap().is_empty());
        assert_eq!(decode_ips(r#"["10.0.0.1"]"#).unwrap(), vec!["10.0.0.1"]);
        assert_eq!(decode_ips("10.0.0.1, 10.0.0.2,").unwrap(), vec!["10.0.0.1", "10.0.0.2"]);
        assert!(decode_ips(r#"["10.0.0.1""#).is_err());
    }

    #[tokio::test]
    async fn test_comma_joined_rows_still_list() -> Result<()> {
        let db = setup_test_db().await?;
        let legacy = create(&db, payload("Legacy", &["1.1.1.1"]), None).await?;
        create(&db, payload("Current", &["3.3.3.3"]), None).await?;

        let mut active: network::ActiveModel = Network::find_by_id(legacy.id).one(&db).await?.unwrap().into();
        active.ips = Set("1.1.1.1,2.2.2.2".to_string());
        active.update(&db).await?;

        let all = find(&db, &ListFilter::default()).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].ips, vec!["1.1.1.1", "2.2.2.2"]);
        assert_eq!(all[1].ips, vec!["3.3.3.3"]);

        Ok(())
    }
}
