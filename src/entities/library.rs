//! Library entity - The top-level scoping unit.
//!
//! A library is a physical site or branch. Devices, networks, runs, notes,
//! systems and users are attached to libraries through the `library_*`
//! association tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Library database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "libraries")]
pub struct Model {
    /// Unique identifier for the library
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique across all libraries
    #[sea_orm(unique)]
    pub name: String,
    /// Street address of the branch
    pub physical_address: Option<String>,
    /// Address used for hardware shipments
    pub shipping_address: Option<String>,
    /// IANA timezone name (e.g. `"America/New_York"`)
    pub timezone: Option<String>,
    /// Free-form coordinates string
    pub coordinates: Option<String>,
    /// Name of the primary contact
    pub primary_contact_name: Option<String>,
    /// E-mail of the primary contact
    pub primary_contact_email: Option<String>,
    /// Name of the IT contact
    pub it_contact_name: Option<String>,
    /// E-mail of the IT contact
    pub it_contact_email: Option<String>,
    /// Opening hours as entered by staff
    pub opening_hours: Option<String>,
    /// When the library was created
    pub created_at: DateTimeUtc,
    /// When the library was last modified
    pub updated_at: DateTimeUtc,
}

/// A library owns association rows for every scoped resource
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Devices installed at this library
    #[sea_orm(has_many = "super::library_device::Entity")]
    LibraryDevices,
    /// Networks serving this library
    #[sea_orm(has_many = "super::library_network::Entity")]
    LibraryNetworks,
    /// Speed-test runs recorded for this library
    #[sea_orm(has_many = "super::library_run::Entity")]
    LibraryRuns,
    /// Staff accounts attached to this library
    #[sea_orm(has_many = "super::library_user::Entity")]
    LibraryUsers,
    /// Notes written about this library
    #[sea_orm(has_many = "super::library_note::Entity")]
    LibraryNotes,
    /// Systems in use at this library
    #[sea_orm(has_many = "super::library_system::Entity")]
    LibrarySystems,
}

impl Related<super::library_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryDevices.def()
    }
}

impl Related<super::library_network::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryNetworks.def()
    }
}

impl Related<super::library_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryRuns.def()
    }
}

impl Related<super::library_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryUsers.def()
    }
}

impl Related<super::library_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryNotes.def()
    }
}

impl Related<super::library_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibrarySystems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
