//! REST routes, all mounted under `/api`.

use aduan_auth::{LoginInput, RegisterInput};
use aduan_core::models::complaint::UpdateComplaint;
use aduan_core::models::settings::UpdateSettings;
use aduan_core::models::user::UpdateProfile;
use aduan_service::NewComplaint;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

type ApiResult<T> = Result<T, ApiError>;
type Body<T> = Result<Json<T>, JsonRejection>;
type Id = Result<Path<Uuid>, PathRejection>;

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ChangePasswordBody {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

/// Build the application router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/complaints", post(create_complaint).get(list_complaints))
        .route("/complaints/stats", get(complaint_stats))
        .route(
            "/complaints/{id}",
            get(get_complaint)
                .patch(update_complaint)
                .delete(delete_complaint),
        )
        .route(
            "/complaints/{id}/comments",
            get(list_comments).post(add_comment),
        )
        // `{id}` is the complaint for POST/GET and the response for DELETE.
        .route(
            "/responses/{id}",
            post(add_response).get(list_responses).delete(delete_response),
        )
        .route("/users", get(list_users))
        .route(
            "/users/profile/{id}",
            get(get_profile).patch(update_profile),
        )
        .route(
            "/users/settings/{id}",
            get(get_settings).patch(update_settings),
        )
        .route("/users/password/{id}", post(change_password));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn register(
    State(state): State<AppState>,
    body: Body<RegisterInput>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let user_id = state.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user_id": user_id })),
    ))
}

async fn login(
    State(state): State<AppState>,
    body: Body<LoginInput>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let out = state.auth.login(input).await?;
    Ok(Json(json!({
        "token": out.token,
        "expires_in": out.expires_in,
        "user": out.user,
    })))
}

async fn logout(CurrentUser(_): CurrentUser) -> impl IntoResponse {
    Json(json!({ "message": "Logged out successfully" }))
}

async fn me(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.auth.me(&actor).await?))
}

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

async fn create_complaint(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    body: Body<NewComplaint>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let complaint = state.complaints.create(&actor, input).await?;
    Ok((StatusCode::CREATED, Json(complaint)))
}

async fn list_complaints(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.complaints.list(&actor).await?))
}

async fn complaint_stats(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.complaints.statistics(&actor).await?))
}

async fn get_complaint(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    Ok(Json(state.complaints.get(id, &actor).await?))
}

async fn update_complaint(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
    body: Body<UpdateComplaint>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(patch) = body?;
    Ok(Json(state.complaints.update(id, &actor, patch).await?))
}

async fn delete_complaint(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    state.complaints.delete(id, &actor).await?;
    Ok(Json(json!({ "message": "Complaint deleted successfully" })))
}

async fn list_comments(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    Ok(Json(state.comments.list_comments(id, &actor).await?))
}

async fn add_comment(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
    body: Body<MessageBody>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(body) = body?;
    let comment = state.comments.add_comment(id, &actor, &body.message).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

async fn add_response(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    complaint_id: Id,
    body: Body<MessageBody>,
) -> ApiResult<impl IntoResponse> {
    let Path(complaint_id) = complaint_id?;
    let Json(body) = body?;
    let response = state
        .responses
        .add_response(complaint_id, &actor, &body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_responses(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    complaint_id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(complaint_id) = complaint_id?;
    Ok(Json(
        state.responses.list_responses(complaint_id, &actor).await?,
    ))
}

async fn delete_response(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    response_id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(response_id) = response_id?;
    state.responses.delete_response(response_id, &actor).await?;
    Ok(Json(json!({ "message": "Response deleted successfully" })))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

async fn list_users(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.accounts.list_users(&actor).await?))
}

async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = id?;
    Ok(Json(state.accounts.get_profile(user_id, &actor).await?))
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
    body: Body<UpdateProfile>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = id?;
    let Json(patch) = body?;
    Ok(Json(
        state.accounts.update_profile(user_id, &actor, patch).await?,
    ))
}

async fn get_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = id?;
    Ok(Json(state.accounts.get_settings(user_id, &actor).await?))
}

async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
    body: Body<UpdateSettings>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = id?;
    let Json(patch) = body?;
    Ok(Json(
        state.accounts.update_settings(user_id, &actor, patch).await?,
    ))
}

async fn change_password(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    id: Id,
    body: Body<ChangePasswordBody>,
) -> ApiResult<impl IntoResponse> {
    let Path(user_id) = id?;
    let Json(body) = body?;
    state
        .auth
        .change_password(&actor, user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
