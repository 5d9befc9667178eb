//! Association between libraries and devices.
//!
//! Rows cascade away when either the library or the device is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `library_devices` join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "library_devices")]
pub struct Model {
    /// Library side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub library_id: i64,
    /// Device side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub device_id: i64,
}

/// Each row belongs to one library and one device
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Linked library
    #[sea_orm(
        belongs_to = "super::library::Entity",
        from = "Column::LibraryId",
        to = "super::library::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Library,
    /// Linked device
    #[sea_orm(
        belongs_to = "super::device::Entity",
        from = "Column::DeviceId",
        to = "super::device::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Device,
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Library.def()
    }
}

impl Related<super::device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Device.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
