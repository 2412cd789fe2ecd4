//! `/users` handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use buildwise_core::{User, UserRole};
use serde::Deserialize;
use tracing::info;

use super::parse_body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    email: String,
    name: Option<String>,
    role: Option<UserRole>,
}

/// `GET /users`, oldest first.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = state
        .read()
        .await
        .list_users()
        .await
        .map_err(ApiError::internal("Failed to fetch users"))?;
    Ok(Json(users))
}

/// `POST /users`: role defaults to `WORKER`.
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<User>)> {
    const FAILURE: &str = "Failed to create user";
    let req: NewUser = parse_body(&body, FAILURE)?;

    let user = User::new(req.email, req.name, req.role.unwrap_or(UserRole::Worker));
    let mut storage = state.write().await;
    storage.save_user(&user).await.map_err(ApiError::internal(FAILURE))?;
    storage
        .commit(&format!("Create user {}", user.id))
        .await
        .map_err(ApiError::internal(FAILURE))?;

    info!("Created user {} <{}>", user.id, user.email);
    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body, fixture};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_list() {
        let f = fixture().await;
        let (code, Json(user)) = create_user(
            State(f.state.clone()),
            body(json!({ "email": "op@site.test", "name": "Dave Wilson", "role": "OPERATOR" })),
        )
        .await
        .unwrap();
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(user.role, UserRole::Operator);

        let Json(users) = list_users(State(f.state.clone())).await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(users[2].id, user.id);
    }

    #[tokio::test]
    async fn test_role_defaults_to_worker() {
        let f = fixture().await;
        let (_, Json(user)) = create_user(State(f.state.clone()), body(json!({ "email": "w@site.test" })))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Worker);
        assert_eq!(user.name, None);
    }
}
