//! Group business logic - named sets of users and their memberships.

use crate::{
    core::{
        query::ListFilter,
        resource::{self, Resource, Timestamps, Upserted},
        validate::{self, Validate},
    },
    entities::{Group, User, UserGroup, group, user, user_group},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::*,
};
use serde::Deserialize;
use tracing::{debug, instrument};

const ENTITY: &str = "group";

/// Input for creating or replacing a group.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupPayload {
    pub name: String,
}

impl Validate for GroupPayload {
    fn validate(&self) -> Result<()> {
        validate::required(ENTITY, "name", &self.name)
    }
}

/// A group given either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Id(i64),
    Name(String),
}

impl From<i64> for GroupRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for GroupRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl Resource for group::Entity {
    const LABEL: &'static str = ENTITY;
    type Payload = GroupPayload;
    type Active = group::ActiveModel;

    fn id_column() -> group::Column {
        group::Column::Id
    }

    fn created_at_column() -> group::Column {
        group::Column::CreatedAt
    }

    fn created_at_of(model: &group::Model) -> DateTime<Utc> {
        model.created_at
    }

    fn active_model(
        payload: GroupPayload,
        id: Option<i64>,
        timestamps: Timestamps,
    ) -> Result<group::ActiveModel> {
        let mut active = group::ActiveModel {
            name: Set(payload.name.trim().to_string()),
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

pub async fn create(db: &DatabaseConnection, payload: GroupPayload) -> Result<group::Model> {
    resource::create::<group::Entity>(db, payload).await
}

pub async fn find(db: &DatabaseConnection, filter: &ListFilter) -> Result<Vec<group::Model>> {
    resource::find::<group::Entity>(db, filter).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<group::Model>> {
    resource::find_by_id::<group::Entity>(db, id).await
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<group::Model>> {
    Group::find()
        .filter(group::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

pub async fn upsert(
    db: &DatabaseConnection,
    id: i64,
    payload: GroupPayload,
) -> Result<Upserted<group::Model>> {
    resource::upsert::<group::Entity>(db, id, payload).await
}

/// Deletes a group. Memberships cascade; the users stay.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64> {
    resource::delete::<group::Entity>(db, id).await
}

/// Lists the users in a group, with the usual filter, sort and paging.
pub async fn members(
    db: &DatabaseConnection,
    group_id: i64,
    filter: &ListFilter,
) -> Result<Vec<user::Model>> {
    let select = resource::filtered::<user::Entity>(filter)
        .inner_join(UserGroup)
        .filter(user_group::Column::GroupId.eq(group_id));
    filter
        .paginate(select, user::Column::Id)?
        .all(db)
        .await
        .map_err(Into::into)
}

async fn ensure_membership_pair<C>(conn: &C, group_id: i64, user_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    Group::find_by_id(group_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::not_found(ENTITY, group_id))?;
    User::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))?;
    Ok(())
}

/// Adds a user to a group. Adding an existing member is a no-op.
///
/// # Errors
/// `NotFound` when the group or the user does not exist.
#[instrument(skip(db))]
pub async fn member_add(
    db: &DatabaseConnection,
    group_id: i64,
    user_id: i64,
) -> Result<user_group::Model> {
    let txn = db.begin().await?;
    ensure_membership_pair(&txn, group_id, user_id).await?;

    let membership = UserGroup::find_by_id((user_id, group_id)).one(&txn).await?;
    if membership.is_none() {
        UserGroup::insert(user_group::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
        })
        .exec(&txn)
        .await
        .map_err(Error::write(ENTITY, "add member to"))?;
    }

    txn.commit().await?;
    debug!(already_member = membership.is_some(), "Added group member");
    Ok(user_group::Model { user_id, group_id })
}

/// Removes a user from a group, returning the number of memberships removed.
#[instrument(skip(db))]
pub async fn member_remove(db: &DatabaseConnection, group_id: i64, user_id: i64) -> Result<u64> {
    let txn = db.begin().await?;
    ensure_membership_pair(&txn, group_id, user_id).await?;

    let result = UserGroup::delete_by_id((user_id, group_id)).exec(&txn).await?;

    txn.commit().await?;
    debug!(rows = result.rows_affected, "Removed group member");
    Ok(result.rows_affected)
}

/// True when the user belongs to the group. A name that matches no group is
/// simply not a group the user is in.
pub async fn is_member_of(db: &DatabaseConnection, group: GroupRef, user_id: i64) -> Result<bool> {
    let group_id = match group {
        GroupRef::Id(id) => id,
        GroupRef::Name(name) => match find_by_name(db, &name).await? {
            Some(found) => found.id,
            None => return Ok(false),
        },
    };
    Ok(UserGroup::find_by_id((user_id, group_id))
        .one(db)
        .await?
        .is_some())
}

/// Lists the groups a user belongs to, ordered by id.
pub async fn groups_for_user(db: &DatabaseConnection, user_id: i64) -> Result<Vec<group::Model>> {
    Group::find()
        .join(sea_orm::JoinType::InnerJoin, group::Relation::UserGroups.def())
        .filter(user_group::Column::UserId.eq(user_id))
        .order_by_asc(group::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
