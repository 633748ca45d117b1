//! HTTP API over the service layer.
//!
//! Routing and status mapping only. Authentication happens upstream; the
//! resolved actor arrives in the `x-user-id` header and is passed down
//! explicitly. Which wire shape each action uses is decided here through the
//! operation-to-projection table, not inside the projection layer.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::entity::{ActivityId, CategoryId, EntryId, SkillId, UserId};
use crate::error::SkilltrackError;
use crate::projection::{
    projection_for, ActivityFlat, CategoryFlat, EntryFlat, Operation, ProjectionKind, Resource,
    SkillListing,
};
use crate::service::activities::ActivityInput;
use crate::service::categories::CategoryInput;
use crate::service::entries::EntryInput;
use crate::service::skills::{SkillInput, SkillUpdate};
use crate::service::{self, Page};
use crate::store::SqliteStore;

pub struct AppState {
    pub store: Mutex<SqliteStore>,
}

/// Error wrapper carrying the status mapping from the error taxonomy.
pub struct ApiError(SkilltrackError);

impl From<SkilltrackError> for ApiError {
    fn from(e: SkilltrackError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SkilltrackError::Validation(_) => StatusCode::BAD_REQUEST,
            SkilltrackError::NotFound(_) => StatusCode::NOT_FOUND,
            SkilltrackError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// The acting user, resolved by the external auth layer.
pub struct Actor(pub UserId);

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> ApiResult<Self> {
        let actor = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<UserId>().ok())
            .ok_or_else(|| {
                ApiError(SkilltrackError::PermissionDenied(
                    "missing or invalid x-user-id header".to_string(),
                ))
            })?;
        Ok(Actor(actor))
    }
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<u64>,
    per_page: Option<u64>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/api/skills", get(list_skills).post(create_skill))
        .route(
            "/api/skills/{id}",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
        .route("/api/skills/{id}/add_category", post(add_skill_category))
        .route("/api/skills/{id}/remove_category", post(remove_skill_category))
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/recent", get(recent_activities))
        .route(
            "/api/activities/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/api/activities/{id}/entries", post(create_entry))
        .route(
            "/api/activities/{id}/entries/{entry_id}",
            put(update_entry).delete(delete_entry),
        )
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(store: SqliteStore, addr: SocketAddr) -> crate::Result<()> {
    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}

// ========== Categories ==========

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> ApiResult<Json<HashMap<String, CategoryFlat>>> {
    let store = state.store.lock().await;
    Ok(Json(service::categories::list(&store, actor)?))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Json(input): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<CategoryFlat>)> {
    projection_for(Resource::Categories, Operation::Create).ensure_writable(Operation::Create)?;
    let store = state.store.lock().await;
    let created = service::categories::create(&store, actor, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<CategoryId>,
) -> ApiResult<Json<CategoryFlat>> {
    let store = state.store.lock().await;
    Ok(Json(service::categories::retrieve(&store, actor, id)?))
}

async fn update_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<CategoryId>,
    Json(input): Json<CategoryInput>,
) -> ApiResult<Json<CategoryFlat>> {
    projection_for(Resource::Categories, Operation::Update).ensure_writable(Operation::Update)?;
    let store = state.store.lock().await;
    Ok(Json(service::categories::update(&store, actor, id, input)?))
}

async fn delete_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<CategoryId>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::categories::delete(&store, actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Skills ==========

async fn list_skills(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> ApiResult<Json<SkillListing>> {
    let store = state.store.lock().await;
    Ok(Json(service::skills::list(&store, actor)?))
}

async fn create_skill(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Json(input): Json<SkillInput>,
) -> ApiResult<Response> {
    projection_for(Resource::Skills, Operation::Create).ensure_writable(Operation::Create)?;
    let store = state.store.lock().await;
    let created = service::skills::create(&store, actor, input)?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

async fn get_skill(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<SkillId>,
) -> ApiResult<Response> {
    let store = state.store.lock().await;
    let response = match projection_for(Resource::Skills, Operation::Retrieve) {
        ProjectionKind::Deep => Json(service::skills::retrieve(&store, actor, id)?).into_response(),
        _ => Json(service::skills::retrieve_flat(&store, actor, id)?).into_response(),
    };
    Ok(response)
}

async fn update_skill(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<SkillId>,
    Json(input): Json<SkillUpdate>,
) -> ApiResult<Response> {
    projection_for(Resource::Skills, Operation::Update).ensure_writable(Operation::Update)?;
    let store = state.store.lock().await;
    Ok(Json(service::skills::update(&store, actor, id, input)?).into_response())
}

async fn delete_skill(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<SkillId>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::skills::delete(&store, actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_skill_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<SkillId>,
    Json(category): Json<CategoryId>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::skills::add_category(&store, actor, id, category)?;
    Ok(StatusCode::OK)
}

async fn remove_skill_category(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<SkillId>,
    Json(category): Json<CategoryId>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::skills::remove_category(&store, actor, id, category)?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== Activities ==========

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<ActivityFlat>>> {
    let store = state.store.lock().await;
    Ok(Json(service::activities::list(&store, actor)?))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Json(input): Json<ActivityInput>,
) -> ApiResult<(StatusCode, Json<ActivityFlat>)> {
    projection_for(Resource::Activities, Operation::Create).ensure_writable(Operation::Create)?;
    let store = state.store.lock().await;
    let created = service::activities::create(&store, actor, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<ActivityId>,
) -> ApiResult<Response> {
    let store = state.store.lock().await;
    let response = match projection_for(Resource::Activities, Operation::Retrieve) {
        ProjectionKind::Deep => {
            Json(service::activities::retrieve(&store, actor, id)?).into_response()
        }
        _ => Json(service::activities::retrieve_flat(&store, actor, id)?).into_response(),
    };
    Ok(response)
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<ActivityId>,
    Json(input): Json<ActivityInput>,
) -> ApiResult<Json<ActivityFlat>> {
    projection_for(Resource::Activities, Operation::Update).ensure_writable(Operation::Update)?;
    let store = state.store.lock().await;
    Ok(Json(service::activities::update(&store, actor, id, input)?))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<ActivityId>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::activities::delete(&store, actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn recent_activities(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<ActivityFlat>>> {
    let store = state.store.lock().await;
    Ok(Json(service::activities::recent(
        &store,
        actor,
        params.page,
        params.per_page,
    )?))
}

// ========== Entries ==========

async fn create_entry(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path(id): Path<ActivityId>,
    Json(input): Json<EntryInput>,
) -> ApiResult<(StatusCode, Json<EntryFlat>)> {
    let store = state.store.lock().await;
    let created = service::entries::create(&store, actor, id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_entry(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path((activity, entry)): Path<(ActivityId, EntryId)>,
    Json(input): Json<EntryInput>,
) -> ApiResult<Json<EntryFlat>> {
    let store = state.store.lock().await;
    Ok(Json(service::entries::update(
        &store, actor, activity, entry, input,
    )?))
}

async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    Path((activity, entry)): Path<(ActivityId, EntryId)>,
) -> ApiResult<StatusCode> {
    let store = state.store.lock().await;
    service::entries::delete(&store, actor, activity, entry)?;
    Ok(StatusCode::NO_CONTENT)
}
