//! Request handlers.
//!
//! The collection handlers are generic over [`ResourceApi`] / [`ScopedApi`];
//! the router instantiates them once per collection. Extractors are taken as
//! `Result`s so that malformed paths, query strings and bodies still answer
//! with an envelope.

use crate::{
    api::{
        AppState,
        resources::{ResourceApi, ScopedApi},
        response::{ApiError, ApiResult, Replaced, created, no_content, ok},
    },
    core::{
        group,
        query::{ListFilter, ListQuery},
        user,
    },
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde_json::json;
use tracing::debug;

type PathParam<T> = Result<Path<T>, PathRejection>;
type ListParams = Result<Query<ListQuery>, QueryRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

/// `GET /<r>`
pub async fn list<R: ResourceApi>(State(state): State<AppState>, query: ListParams) -> ApiResult {
    let Query(query) = query?;
    let filter = ListFilter::try_from(query)?;
    let rows = R::list(&state.db, &filter).await?;
    debug!(count = rows.len(), "Listed {}", R::LABEL);
    Ok(ok(rows))
}

/// `POST /<r>`
pub async fn create<R: ResourceApi>(State(state): State<AppState>, payload: Body<R::Payload>) -> ApiResult {
    let Json(payload) = payload?;
    let row = R::create(&state.db, payload).await?;
    Ok(created(row))
}

/// `GET /<r>/:id`
pub async fn show<R: ResourceApi>(State(state): State<AppState>, path: PathParam<R::Key>) -> ApiResult {
    let Path(key) = path?;
    let label = key.to_string();
    R::get(&state.db, key)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::not_found(R::LABEL, label))
}

/// `PUT /<r>/:id` - creates or replaces the row with that id.
pub async fn replace<R: ResourceApi>(
    State(state): State<AppState>,
    path: PathParam<R::Key>,
    payload: Body<R::Payload>,
) -> ApiResult {
    let Path(key) = path?;
    let Json(payload) = payload?;
    let upserted = R::put(&state.db, key, payload).await?;
    let exists = upserted.exists();
    let body = Replaced {
        row: upserted.row,
        exists,
    };
    Ok(if exists { ok(body) } else { created(body) })
}

/// `DELETE /<r>/:id`
pub async fn destroy<R: ResourceApi>(State(state): State<AppState>, path: PathParam<R::Key>) -> ApiResult {
    let Path(key) = path?;
    let label = key.to_string();
    match R::remove(&state.db, key).await? {
        0 => Err(ApiError::not_found(R::LABEL, label)),
        _ => Ok(no_content()),
    }
}

/// `POST /libraries/:id/<r>` - creates a row already linked to the library.
pub async fn create_in_library<R: ScopedApi>(
    State(state): State<AppState>,
    path: PathParam<i64>,
    payload: Body<R::Payload>,
) -> ApiResult {
    let Path(library_id) = path?;
    let Json(payload) = payload?;
    let row = R::create_in(&state.db, payload, library_id).await?;
    Ok(created(row))
}

/// `GET /libraries/:id/<r>`
pub async fn list_in_library<R: ScopedApi>(
    State(state): State<AppState>,
    path: PathParam<i64>,
    query: ListParams,
) -> ApiResult {
    let Path(library_id) = path?;
    let Query(query) = query?;
    let filter = ListFilter::try_from(query)?.in_library(library_id);
    Ok(ok(R::list(&state.db, &filter).await?))
}

/// `GET /libraries/:id/<r>/:rid`
pub async fn show_in_library<R: ScopedApi>(
    State(state): State<AppState>,
    path: PathParam<(i64, i64)>,
) -> ApiResult {
    let Path((library_id, id)) = path?;
    R::get_in(&state.db, id, library_id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::not_found(R::LABEL, id))
}

/// `PUT /libraries/:id/<r>/:rid` - links an existing row to the library.
pub async fn link<R: ScopedApi>(State(state): State<AppState>, path: PathParam<(i64, i64)>) -> ApiResult {
    let Path((library_id, id)) = path?;
    R::link(&state.db, library_id, id).await?;
    R::get_in(&state.db, id, library_id)
        .await?
        .map(ok)
        .ok_or_else(|| ApiError::not_found(R::LABEL, id))
}

/// `DELETE /libraries/:id/<r>/:rid` - unlinks the row; the row itself stays.
///
/// Unlinking a pair that is not linked succeeds; a missing library or row is 404.
pub async fn unlink<R: ScopedApi>(State(state): State<AppState>, path: PathParam<(i64, i64)>) -> ApiResult {
    let Path((library_id, id)) = path?;
    let removed = R::unlink(&state.db, library_id, id).await?;
    debug!(library_id, id, removed, "Unlinked {}", R::LABEL);
    Ok(no_content())
}

/// `GET /groups/:id/members`
pub async fn group_members(
    State(state): State<AppState>,
    path: PathParam<i64>,
    query: ListParams,
) -> ApiResult {
    let Path(group_id) = path?;
    let Query(query) = query?;
    let filter = ListFilter::try_from(query)?;
    if group::find_by_id(&state.db, group_id).await?.is_none() {
        return Err(ApiError::not_found("group", group_id));
    }
    Ok(ok(group::members(&state.db, group_id, &filter).await?))
}

/// `POST /groups/:id/members/:uid`
pub async fn add_group_member(State(state): State<AppState>, path: PathParam<(i64, i64)>) -> ApiResult {
    let Path((group_id, user_id)) = path?;
    let membership = group::member_add(&state.db, group_id, user_id).await?;
    Ok(created(membership))
}

/// `DELETE /groups/:id/members/:uid`
pub async fn remove_group_member(
    State(state): State<AppState>,
    path: PathParam<(i64, i64)>,
) -> ApiResult {
    let Path((group_id, user_id)) = path?;
    let removed = group::member_remove(&state.db, group_id, user_id).await?;
    debug!(group_id, user_id, removed, "Removed group member");
    Ok(no_content())
}

/// `GET /users/:id/groups`
pub async fn user_groups(State(state): State<AppState>, path: PathParam<i64>) -> ApiResult {
    let Path(user_id) = path?;
    if user::find_by_id(&state.db, user_id, None).await?.is_none() {
        return Err(ApiError::not_found("user", user_id));
    }
    Ok(ok(group::groups_for_user(&state.db, user_id).await?))
}

/// `GET /health` - checks that the database answers.
pub async fn health(State(state): State<AppState>) -> ApiResult {
    state
        .db
        .ping()
        .await
        .map_err(crate::errors::Error::from)?;
    Ok(ok(json!({ "database": "ok" })))
}
