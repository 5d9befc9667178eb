//! Association between libraries and networks.
//!
//! Rows cascade away when either the library or the network is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `library_networks` join row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "library_networks")]
pub struct Model {
    /// Library side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub library_id: i64,
    /// Network side of the link
    #[sea_orm(primary_key, auto_increment = false)]
    pub network_id: i64,
}

/// Each row belongs to one library and one network
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
    /// Linked network
    #[sea_orm(
        belongs_to = "super::network::Entity",
        from = "Column::NetworkId",
        to = "super::network::Column::Id",
        on_delete = "Cascade",
        on_update = "Cascade"
    )]
    Network,
}

impl Related<super::library::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Library.def()
    }
}

impl Related<super::network::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Network.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
