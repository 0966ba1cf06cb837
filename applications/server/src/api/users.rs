/// Users API routes
use crate::{
    api::json::ApiJson,
    error::{Result, ServerError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    Json,
};
use roster_core::{NewUser, RosterError, User, UserChanges, UserId};
use serde_json::{json, Value};

/// Resolve the `{id}` path segment
///
/// A blank segment is a bad request. Anything that is not a UUID cannot name
/// a stored user, so it is reported as not found.
fn parse_user_id(raw: &str) -> Result<UserId> {
    if raw.trim().is_empty() {
        return Err(ServerError::BadRequest("no id received".to_string()));
    }

    UserId::parse(raw).ok_or_else(|| RosterError::not_found(raw).into())
}

/// GET /users/:id
/// Fetch a single user
pub async fn get_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<User>> {
    let id = parse_user_id(&id)?;
    let user = app_state.users.get(&id).await?;
    Ok(Json(user))
}

/// POST /users
/// Create a user; id and timestamps are assigned by the server
pub async fn create_user(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<NewUser>,
) -> Result<Json<User>> {
    let user = app_state.users.create(req).await?;
    tracing::info!(id = %user.id, "User created");
    Ok(Json(user))
}

/// PUT /users/:id
/// Replace a user's name and occupation
pub async fn update_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<UserChanges>,
) -> Result<Json<User>> {
    let id = parse_user_id(&id)?;
    let user = app_state.users.update(&id, req).await?;
    Ok(Json(user))
}

/// DELETE /users/:id
/// Delete a single user
pub async fn delete_user(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Json<Value>> {
    let id = parse_user_id(&id)?;
    app_state.users.delete(&id).await?;
    tracing::info!(%id, "User deleted");
    Ok(Json(json!({ "success": true })))
}

/// DELETE /users/all
/// Delete every user
pub async fn delete_all_users(State(app_state): State<AppState>) -> Result<Json<Value>> {
    let deleted = app_state.users.delete_all().await?;
    tracing::info!(deleted, "All users deleted");
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}
