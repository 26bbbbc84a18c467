use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            CreateUserRequest, Pagination, UpdateUserRequest, UserResponse, UserSummary,
        },
        password::hash_password,
        repo_types::{User, UserPatch},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

const MAX_NAME_LEN: usize = 100;

fn check_name(field: &str, value: &str) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len > MAX_NAME_LEN {
        warn!(field, len, "field exceeds column width");
        return Err(ApiError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Turn an update body into a typed patch, hashing any supplied
/// password. An explicitly-empty password is dropped, not applied; the
/// stored hash stays as it is.
fn build_patch(payload: UpdateUserRequest) -> Result<UserPatch, ApiError> {
    if let Some(name) = &payload.name {
        check_name("name", name)?;
    }
    if let Some(surname) = &payload.surname {
        check_name("surname", surname)?;
    }

    let password = match payload.password.as_deref() {
        None | Some("") => None,
        Some(plain) => Some(hash_password(plain)?),
    };

    Ok(UserPatch {
        name: payload.name,
        surname: payload.surname,
        password,
    })
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    check_name("name", &payload.name)?;
    check_name("surname", &payload.surname)?;

    let hash = hash_password(&payload.password)?;
    let user = User::insert(&state.db, &payload.name, &payload.surname, &hash).await?;

    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let (limit, offset) = pagination.clamped();
    let users = User::list(&state.db, limit, offset).await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let patch = build_patch(payload)?;
    let user = User::update(&state.db, id, &patch)
        .await?
        .ok_or(ApiError::NotFound(id))?;

    info!(user_id = id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let removed = User::delete(&state.db, id).await?;
    if removed {
        info!(user_id = id, "user deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
