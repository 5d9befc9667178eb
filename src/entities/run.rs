//! Run entity - One completed network speed-test result.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Run database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "runs")]
pub struct Model {
    /// Unique identifier for the run
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Test protocol (e.g. `"ndt7"`, `"speedtest-cli-single-stream"`)
    pub test_name: Option<String>,
    /// When the test started, as reported by the device
    pub test_start_time: Option<DateTimeUtc>,
    /// When the test finished, as reported by the device
    pub test_end_time: Option<DateTimeUtc>,
    /// Location label configured on the device
    pub murakami_location: Option<String>,
    /// Network type configured on the device
    pub murakami_network_type: Option<String>,
    /// Connection type configured on the device
    pub murakami_connection_type: Option<String>,
    /// Device identifier configured on the device
    pub murakami_device_id: Option<String>,
    /// Measurement server hostname
    pub server_name: Option<String>,
    /// Measurement server address
    pub server_ip: Option<String>,
    /// Client address seen by the server
    pub client_ip: Option<String>,
    /// Server-side identifier of the download measurement
    pub download_uuid: Option<String>,
    /// Download throughput
    pub download_value: Option<f64>,
    /// Unit of `download_value` (e.g. `"Mbit/s"`)
    pub download_unit: Option<String>,
    /// Upload throughput
    pub upload_value: Option<f64>,
    /// Unit of `upload_value`
    pub upload_unit: Option<String>,
    /// Download retransmission rate
    pub download_retrans_value: Option<f64>,
    /// Unit of `download_retrans_value`
    pub download_retrans_unit: Option<String>,
    /// Minimum round-trip time
    pub min_rtt_value: Option<f64>,
    /// Unit of `min_rtt_value` (e.g. `"ms"`)
    pub min_rtt_unit: Option<String>,
    /// When the run was stored
    pub created_at: DateTimeUtc,
    /// When the run was last modified
    pub updated_at: DateTimeUtc,
}

/// Runs reach libraries through `library_runs`
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Library associations of this run
    #[sea_orm(has_many = "super::library_run::Entity")]
    LibraryRuns,
}

impl Related<super::library_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryRuns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
