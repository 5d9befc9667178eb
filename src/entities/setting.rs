//! Setting entity - Flat key/value store for site-wide configuration.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Setting database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Setting key (e.g. `"title"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Setting value stored as string
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the setting was created
    pub created_at: DateTimeUtc,
    /// When the setting was last modified
    pub updated_at: DateTimeUtc,
}

/// `Setting` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
