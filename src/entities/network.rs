//! Network entity - An internet connection serving one or more libraries.
//!
//! `ips` is stored as a JSON array encoded in a text column. Callers never see
//! it raw: the network manager decodes it into a list on every read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Network database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "networks")]
pub struct Model {
    /// Unique identifier for the network
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across all networks
    #[sea_orm(unique)]
    pub name: String,
    /// Internet service provider
    pub isp: Option<String>,
    /// JSON-encoded array of IP address strings
    #[sea_orm(column_type = "Text")]
    pub ips: String,
    /// Contracted upload speed
    pub contracted_speed_upload: Option<f64>,
    /// Contracted download speed
    pub contracted_speed_download: Option<f64>,
    /// Upload bandwidth cap
    pub bandwidth_cap_upload: Option<f64>,
    /// Download bandwidth cap
    pub bandwidth_cap_download: Option<f64>,
    /// When the network was created
    pub created_at: DateTimeUtc,
    /// When the network was last modified
    pub updated_at: DateTimeUtc,
}

/// Networks reach libraries through `library_networks`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Library associations of this network
    #[sea_orm(has_many = "super::library_network::Entity")]
    LibraryNetworks,
}

impl Related<super::library_network::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryNetworks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
