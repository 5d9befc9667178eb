//! REST API - axum router over the resource managers.

/// Generic and group-membership request handlers
pub mod handlers;
/// Collection bindings between routes and managers
pub mod resources;
/// Response envelope and error mapping
pub mod response;

use crate::config::settings::ServerConfig;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use handlers::{
    add_group_member, create, create_in_library, destroy, group_members, health, link, list,
    list_in_library, remove_group_member, replace, show, show_in_library, unlink, user_groups,
};
use resources::{
    Devices, Faqs, Glossaries, Groups, Libraries, Networks, Notes, ResourceApi, Runs, ScopedApi,
    Settings, Systems, Users,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

/// Adds `/<name>` and `/<name>/:id` for one collection.
fn collection<R: ResourceApi>(router: Router<AppState>, name: &str) -> Router<AppState> {
    router
        .route(&format!("/{name}"), get(list::<R>).post(create::<R>))
        .route(
            &format!("/{name}/:id"),
            get(show::<R>).put(replace::<R>).delete(destroy::<R>),
        )
}

/// Adds the top-level routes plus `/libraries/:id/<name>[/:rid]`.
fn scoped_collection<R: ScopedApi>(router: Router<AppState>, name: &str) -> Router<AppState> {
    collection::<R>(router, name)
        .route(
            &format!("/libraries/:id/{name}"),
            get(list_in_library::<R>).post(create_in_library::<R>),
        )
        .route(
            &format!("/libraries/:id/{name}/:rid"),
            get(show_in_library::<R>).put(link::<R>).delete(unlink::<R>),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .inspect_err(|_| warn!("Ignoring invalid CORS origin '{}'", origin))
                .ok()
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full router with request tracing and CORS.
pub fn router(db: DatabaseConnection, server: &ServerConfig) -> Router {
    let mut routes = Router::new().route("/health", get(health));

    routes = collection::<Libraries>(routes, "libraries");
    routes = collection::<Groups>(routes, "groups");
    routes = collection::<Faqs>(routes, "faqs");
    routes = collection::<Glossaries>(routes, "glossaries");
    routes = collection::<Settings>(routes, "settings");

    routes = scoped_collection::<Devices>(routes, "devices");
    routes = scoped_collection::<Networks>(routes, "networks");
    routes = scoped_collection::<Runs>(routes, "runs");
    routes = scoped_collection::<Users>(routes, "users");
    routes = scoped_collection::<Notes>(routes, "notes");
    routes = scoped_collection::<Systems>(routes, "systems");

    routes
        .route("/groups/:id/members", get(group_members))
        .route(
            "/groups/:id/members/:uid",
            post(add_group_member).delete(remove_group_member),
        )
        .route("/users/:id/groups", get(user_groups))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&server.cors_origins)),
        )
        .with_state(AppState { db: Arc::new(db) })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app() -> Router {
        let db = setup_test_db().await.unwrap();
        router(db, &ServerConfig::default())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data"]["database"], "ok");
    }

    #[tokio::test]
    async fn test_create_and_fetch_envelopes() {
        let app = app().await;

        let (status, body) = send(&app, Method::POST, "/libraries", Some(json!({"name": "MLK Library"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["status"], "created");
        assert_eq!(body["data"]["id"], 1);

        let (status, body) = send(&app, Method::GET, "/libraries/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "MLK Library");

        let (status, body) = send(&app, Method::GET, "/libraries/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app().await;

        // Payload rejected by validation
        let (status, body) = send(&app, Method::POST, "/devices", Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["statusCode"], 422);

        // Storage failure on write
        send(&app, Method::POST, "/systems", Some(json!({"name": "Koha"}))).await;
        let (status, _) = send(&app, Method::POST, "/systems", Some(json!({"name": "Koha"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Malformed list parameters
        let (status, _) = send(&app, Method::GET, "/devices?start=3&end=3", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/devices?from=yesterday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, Method::GET, "/devices?sort_by=nope", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Missing parent library
        let (status, _) = send(&app, Method::POST, "/libraries/7/devices", Some(json!({"name": "murakami0"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/devices/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_query_and_path_use_envelope() {
        let app = app().await;

        for uri in ["/devices?start=-1", "/devices/abc", "/libraries/x/devices", "/groups/1/members/y"] {
            let method = if uri.contains("members") { Method::POST } else { Method::GET };
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["statusCode"], 400, "{uri}");
            assert_eq!(body["status"], "error", "{uri}");
            assert!(body["message"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_put_reports_exists() {
        let app = app().await;
        let payload = json!({"name": "Main", "ips": ["10.0.0.1"]});

        let (status, body) = send(&app, Method::PUT, "/networks/5", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 5);
        assert_eq!(body["data"]["exists"], false);

        let replaced = json!({"name": "Main", "ips": ["10.0.0.2", "10.0.0.3"]});
        let (status, body) = send(&app, Method::PUT, "/networks/5", Some(replaced)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["exists"], true);
        assert_eq!(body["data"]["ips"], json!(["10.0.0.2", "10.0.0.3"]));
    }

    #[tokio::test]
    async fn test_library_scoped_routes() {
        let app = app().await;
        send(&app, Method::POST, "/libraries", Some(json!({"name": "MLK Library"}))).await;

        let device = json!({"name": "murakami0", "mac": "ab:bc:cd:de:ef:01"});
        let (status, body) = send(&app, Method::POST, "/libraries/1/devices", Some(device)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 1);

        let (_, body) = send(&app, Method::GET, "/libraries/1/devices", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        let (_, body) = send(&app, Method::GET, "/devices?library=1", None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::DELETE, "/libraries/1/devices/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, "/libraries/1/devices", None).await;
        assert_eq!(body["data"], json!([]));
        let (status, _) = send(&app, Method::GET, "/libraries/1/devices/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        // Unlinking again is a no-op, but the parents must exist
        let (status, _) = send(&app, Method::DELETE, "/libraries/1/devices/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, "/libraries/2/devices/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Relink the device that still exists on its own
        let (status, body) = send(&app, Method::PUT, "/libraries/1/devices/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "murakami0");
    }

    #[tokio::test]
    async fn test_group_membership_routes() {
        let app = app().await;
        send(&app, Method::POST, "/groups", Some(json!({"name": "admins"}))).await;
        let user = json!({"username": "alice", "password": TEST_PASSWORD, "email": "alice@example.org"});
        let (_, body) = send(&app, Method::POST, "/users", Some(user)).await;
        assert!(body["data"].get("password").is_none());

        let (status, body) = send(&app, Method::POST, "/groups/1/members/1", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"], json!({"user_id": 1, "group_id": 1}));

        let (_, body) = send(&app, Method::GET, "/groups/1/members", None).await;
        assert_eq!(body["data"][0]["username"], "alice");
        let (_, body) = send(&app, Method::GET, "/users/1/groups", None).await;
        assert_eq!(body["data"][0]["name"], "admins");

        let (status, _) = send(&app, Method::GET, "/groups/9/members", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/groups/1/members/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&app, Method::GET, "/groups/1/members", None).await;
        assert_eq!(body["data"], json!([]));
        let (status, _) = send(&app, Method::DELETE, "/groups/1/members/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_settings_by_key() {
        let app = app().await;

        let (status, _) = send(&app, Method::PUT, "/settings/title", Some(json!({"value": "Murakami Viz"}))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::GET, "/settings/title", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["value"], "Murakami Viz");

        let (status, _) = send(&app, Method::DELETE, "/settings/title", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
