//! Device entity - A Murakami measurement device installed at one or more libraries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Device database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    /// Unique identifier for the device
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g. `"murakami0"`)
    pub name: String,
    /// Network type reported by the device (e.g. `"public"`)
    pub network_type: Option<String>,
    /// Physical connection (e.g. `"wired"`, `"wireless"`)
    pub connection_type: Option<String>,
    /// DNS server the device resolves with
    pub dns_server: Option<String>,
    /// Static IP address, if any
    pub ip: Option<String>,
    /// Gateway address
    pub gateway: Option<String>,
    /// Hardware MAC address
    pub mac: Option<String>,
    /// Identifier the device reports in its test results
    pub deviceid: Option<String>,
    /// When the device was created
    pub created_at: DateTimeUtc,
    /// When the device was last modified
    pub updated_at: DateTimeUtc,
}

/// Devices reach libraries through `library_devices`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Library associations of this device
    #[sea_orm(has_many = "super::library_device::Entity")]
    LibraryDevices,
}

impl Related<super::library_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryDevices.def()
    }
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        super::library_device::Relation::Library.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::library_device::Relation::Device.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
