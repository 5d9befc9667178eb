//! Device business logic - Murakami measurement devices and their libraries.
//!
//! Devices are library-scoped: a device may be linked to any number of
//! libraries through `library_devices`. Every function delegates the storage
//! work to [`crate::core::resource`].

use crate::{
    core::{
        query::ListFilter,
        resource::{self, LibraryLink, LibraryScoped, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{device, library_device},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, RelationDef, RelationTrait, Set};
use serde::Deserialize;

const ENTITY: &str = "device";

/// Input for creating or replacing a device.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevicePayload {
    /// Human-readable name
    pub name: String,
    /// Network type reported by the device
    pub network_type: Option<String>,
    /// Physical connection type
    pub connection_type: Option<String>,
    /// DNS server address
    pub dns_server: Option<String>,
    /// Static IP address
    pub ip: Option<String>,
    /// Gateway address
    pub gateway: Option<String>,
    /// Hardware MAC address
    pub mac: Option<String>,
    /// Identifier reported in test results
    pub deviceid: Option<String>,
}

impl Validate for DevicePayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "name", &self.name)?;
        validate::optional(ENTITY, "network_type", self.network_type.as_deref())?;
        validate::optional(ENTITY, "connection_type", self.connection_type.as_deref())?;
        validate::optional_ip_address(ENTITY, "dns_server", self.dns_server.as_deref())?;
        validate::optional_ip_address(ENTITY, "ip", self.ip.as_deref())?;
        validate::optional_ip_address(ENTITY, "gateway", self.gateway.as_deref())?;
        validate::optional_mac_address(ENTITY, "mac", self.mac.as_deref())?;
        validate::optional(ENTITY, "deviceid", self.deviceid.as_deref())
    }
}

impl Resource for device::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = DevicePayload;
    type Active = device::ActiveModel;

    fn id_column() -> device::Column {
        device::Column::Id
    }

    fn created_at_column() -> device::Column {
        device::Column::CreatedAt
    }

    fn created_at_of(model: &device::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: DevicePayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<device::ActiveModel> {
        let mut active = device::ActiveModel {
            name: Set(payload.name.trim().to_string()),
            network_type: Set(payload.network_type),
            connection_type: Set(payload.connection_type),
            dns_server: Set(trimmed(payload.dns_server)),
            ip: Set(trimmed(payload.ip)),
            gateway: Set(trimmed(payload.gateway)),
            mac: Set(trimmed(payload.mac)),
            deviceid: Set(payload.deviceid),
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

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl LibraryLink for library_device::Entity {
    type Active = library_device::ActiveModel;

    fn library_column() -> library_device::Column {
        library_device::Column::LibraryId
    }

    fn resource_column() -> library_device::Column {
        library_device::Column::DeviceId
    }

    fn link(library_id: i64, resource_id: i64) -> library_device::ActiveModel {
        library_device::ActiveModel {
            library_id: Set(library_id),
            device_id: Set(resource_id),
        }
    }
}

impl LibraryScoped for device::Entity {
    type Link = library_device::Entity;

    fn link_relation() -> RelationDef {
        device::Relation::LibraryDevices.def()
    }
}

/// Creates a device, linking it to `library_id` when given.
///
/// # Errors
/// Returns an error if:
/// - The payload fails validation
/// - `library_id` does not name an existing library
/// - The database insert fails
pub async fn create(
    db: &DatabaseConnection,
    payload: DevicePayload,
    library_id: Option<i64>,
) -> Result<device::Model> {
    resource::create_in_library::<device::Entity>(db, payload, library_id).await
}

/// Lists devices, restricted to `filter.library` when set.
pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<device::Model>> {
    resource::find_scoped::<device::Entity>(db, filter).await
}

pub async fn find_by_id(
    db: &DatabaseConnection,
    id: i64,
    library_id: Option<i64>,
) -> Result<Option<device::Model>> {
    resource::find_by_id_in_library::<device::Entity>(db, id, library_id).await
}

/// Creates the device with `id` or replaces the existing one.
pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: DevicePayload,
) -> Result<Upserted<device::Model>> {
    resource::upsert::<device::Entity>(db, id, payload).await
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<device::Entity>(db, id).await
}

pub async fn add_to_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<()> {
    resource::add_to_library::<device::Entity>(db, library_id, id).await
}

pub async fn remove_from_library(db: &DatabaseConnection, library_id: i64, id: i64) -> Result<u64> {
    resource::remove_from_library::<device::Entity>(db, library_id, id).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{Device, LibraryDevice};
    use crate::errors::Error;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase};

    fn payload(name: &str) -> DevicePayload {
        DevicePayload {
            name: name.to_string(),
            mac: Some("ab:bc:cd:de:ef:01".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_device_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create(&db, payload("   "), None).await;
        assert!(matches!(result, Err(Error::Validation { entity: "device", .. })));

        let bad_ip = DevicePayload {
            ip: Some("300.1.1.1".to_string()),
            ..payload("murakami0")
        };
        let result = create(&db, bad_ip, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let bad_mac = DevicePayload {
            mac: Some("not-a-mac".to_string()),
            ..payload("murakami0")
        };
        let result = create(&db, bad_mac, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_addresses_stored_trimmed() -> Result<()> {
        let db = setup_test_db().await?;

        let input = DevicePayload {
            dns_server: Some(" 8.8.8.8".to_string()),
            ip: Some(" 10.0.0.1 ".to_string()),
            gateway: Some("10.0.0.254 ".to_string()),
            mac: Some("  ab:bc:cd:de:ef:01\t".to_string()),
            ..payload("murakami0")
        };
        let created = create(&db, input, None).await?;
        assert_eq!(created.dns_server.as_deref(), Some("8.8.8.8"));
        assert_eq!(created.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(created.gateway.as_deref(), Some("10.0.0.254"));
        assert_eq!(created.mac.as_deref(), Some("ab:bc:cd:de:ef:01"));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_find_by_id_round_trip() -> Result<()> {
        let db = setup_test_db().await?;

        let input = DevicePayload {
            network_type: Some("public".to_string()),
            connection_type: Some("wired".to_string()),
            ip: Some("10.0.0.5".to_string()),
            ..payload("murakami0")
        };
        let created = create(&db, input, None).await?;

        let found = find_by_id(&db, created.id, None).await?.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.name, "murakami0");
        assert_eq!(found.network_type.as_deref(), Some("public"));
        assert_eq!(found.ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(found.mac.as_deref(), Some("ab:bc:cd:de:ef:01"));

        Ok(())
    }

    #[tokio::test]
    async fn test_library_scenario() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        assert_eq!(library.id, 1);

        let device = create(&db, payload("murakami0"), Some(library.id)).await?;
        assert_eq!(device.id, 1);

        let links = LibraryDevice::find().all(&db).await?;
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].library_id, links[0].device_id), (1, 1));

        let scoped = ListFilter::default().in_library(library.id);
        let devices = find(&db, &scoped).await?;
        assert_eq!(devices, vec![device.clone()]);

        let removed = remove_from_library(&db, library.id, device.id).await?;
        assert_eq!(removed, 1);
        assert!(find(&db, &scoped).await?.is_empty());

        // Removing again is a no-op
        let removed = remove_from_library(&db, library.id, device.id).await?;
        assert_eq!(removed, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_with_missing_library_persists_nothing() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create(&db, payload("murakami0"), Some(42)).await;
        assert!(matches!(
            result,
            Err(Error::NotFound { entity: "library", .. })
        ));

        assert!(Device::find().all(&db).await?.is_empty());
        assert!(LibraryDevice::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() -> Result<()> {
        let db = setup_test_db().await?;

        let created = upsert(&db, 7, payload("murakami7")).await?;
        assert!(!created.exists());
        assert_eq!(created.row.id, 7);

        let replaced = upsert(
            &db,
            7,
            DevicePayload {
                connection_type: Some("wireless".to_string()),
                ..payload("murakami7-renamed")
            },
        )
        .await?;
        assert!(replaced.exists());
        assert_eq!(replaced.row.id, 7);
        assert_eq!(replaced.row.created_at, created.row.created_at);
        assert!(replaced.row.updated_at >= created.row.updated_at);

        let found = find_by_id(&db, 7, None).await?.unwrap();
        assert_eq!(found.name, "murakami7-renamed");
        assert_eq!(found.connection_type.as_deref(), Some("wireless"));
        assert_eq!(Device::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_keeps_library_links() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let device = create(&db, payload("murakami0"), Some(library.id)).await?;

        upsert(&db, device.id, payload("murakami0-b")).await?;

        let found = find_by_id(&db, device.id, Some(library.id)).await?;
        assert_eq!(found.unwrap().name, "murakami0-b");

        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_id_in_other_library_is_none() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let other = create_test_library(&db, "Branch Two").await?;
        let device = create(&db, payload("murakami0"), Some(library.id)).await?;

        assert!(find_by_id(&db, device.id, Some(other.id)).await?.is_none());
        assert!(find_by_id(&db, device.id, Some(library.id)).await?.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_link_requires_both_sides() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let device = create(&db, payload("murakami0"), None).await?;

        let result = add_to_library(&db, 99, device.id).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "library", .. })));

        let result = add_to_library(&db, library.id, 99).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "device", .. })));

        let result = remove_from_library(&db, library.id, 99).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "device", .. })));

        add_to_library(&db, library.id, device.id).await?;
        // Linking twice keeps a single association row
        add_to_library(&db, library.id, device.id).await?;
        assert_eq!(LibraryDevice::find().all(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_cascades_links() -> Result<()> {
        let (db, library) = setup_with_library().await?;
        let device = create(&db, payload("murakami0"), Some(library.id)).await?;

        assert_eq!(delete(&db, device.id).await?, 1);
        assert_eq!(delete(&db, device.id).await?, 0);
        assert!(LibraryDevice::find().all(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_sorting_and_paging() -> Result<()> {
        let db = setup_test_db().await?;
        for name in ["murakami0", "murakami1", "murakami2", "murakami3"] {
            create(&db, payload(name), None).await?;
        }

        let descending = ListFilter {
            asc: false,
            sort_by: Some("id".to_string()),
            ..Default::default()
        };
        let ids: Vec<i64> = find(&db, &descending).await?.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);

        let page = ListFilter {
            start: 1,
            end: Some(2),
            ..Default::default()
        };
        let ids: Vec<i64> = find(&db, &page).await?.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2]);

        let tail = ListFilter {
            start: 2,
            ..Default::default()
        };
        let ids: Vec<i64> = find(&db, &tail).await?.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let by_name = ListFilter {
            asc: false,
            sort_by: Some("name".to_string()),
            end: Some(1),
            ..Default::default()
        };
        assert_eq!(find(&db, &by_name).await?[0].name, "murakami3");

        let unknown = ListFilter {
            sort_by: Some("no_such_column".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            find(&db, &unknown).await,
            Err(Error::BadRequest { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_time_bounds() -> Result<()> {
        let db = setup_test_db().await?;
        create(&db, payload("murakami0"), None).await?;

        let later = Utc::now() + chrono::Duration::hours(1);
        let earlier = Utc::now() - chrono::Duration::hours(1);

        let before_later = ListFilter {
            to: Some(later),
            ..Default::default()
        };
        assert_eq!(find(&db, &before_later).await?.len(), 1);

        let after_later = ListFilter {
            from: Some(later),
            ..Default::default()
        };
        assert!(find(&db, &after_later).await?.is_empty());

        let window = ListFilter {
            from: Some(earlier),
            to: Some(later),
            ..Default::default()
        };
        assert_eq!(find(&db, &window).await?.len(), 1);

        Ok(())
    }
}
