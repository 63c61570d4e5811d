use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        repo::CreateUser,
        repo_types::User,
    },
    error::{ApiError, AppJson},
    state::AppState,
};

const USER_EXISTS: &str = "User already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::Conflict(USER_EXISTS.into()));
    }

    let hash = state.passwords.hash(&payload.password)?;

    let user = match User::create(
        &state.db,
        &payload.username,
        &payload.email,
        &hash,
        payload.role,
    )
    .await?
    {
        CreateUser::Created(u) => u,
        CreateUser::Duplicate => {
            warn!(username = %payload.username, email = %payload.email, "unique constraint hit on insert");
            return Err(ApiError::Conflict(USER_EXISTS.into()));
        }
    };

    info!(user_id = user.id, username = %user.username, role = %user.role, "user registered");
    Ok(Json(MessageResponse {
        message: "User registered successfully",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = User::find_by_username(&state.db, &payload.username).await? else {
        warn!(username = %payload.username, "login unknown username");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    // A stored hash the scheme cannot parse counts as a mismatch.
    let ok = state
        .passwords
        .verify(&payload.password, &user.password_hash)
        .unwrap_or(false);

    if !ok {
        warn!(username = %payload.username, user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        username: user.username,
        role: user.role,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::{Argon2Scheme, PasswordScheme};
    use argon2::Params;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> (Router, AppState) {
        let scheme = Argon2Scheme::new(Params::new(1024, 1, 1, None).unwrap());
        let state = AppState::ephemeral(Arc::new(scheme) as Arc<dyn PasswordScheme>)
            .await
            .expect("state");
        (auth_routes().with_state(state.clone()), state)
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn register_then_duplicate_is_rejected() {
        let (app, state) = app().await;
        let body = json!({ "username": "alice", "email": "a@x.com", "password": "pw1" });

        let (status, res) = post(&app, "/register", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res, json!({ "message": "User registered successfully" }));

        let (status, res) = post(&app, "/register", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res, json!({ "message": "User already exists" }));
        assert_eq!(User::count(&state.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let (app, state) = app().await;
        post(
            &app,
            "/register",
            json!({ "username": "bob", "email": "b@x.com", "password": "hunter2" }),
        )
        .await;
        let user = User::find_by_username(&state.db, "bob").await.unwrap().unwrap();
        assert_ne!(user.password_hash, "hunter2");
        assert_eq!(user.role, "student");
    }

    #[tokio::test]
    async fn register_duplicate_email_is_rejected() {
        let (app, _) = app().await;
        post(
            &app,
            "/register",
            json!({ "username": "a1", "email": "same@x.com", "password": "p" }),
        )
        .await;
        let (status, res) = post(
            &app,
            "/register",
            json!({ "username": "a2", "email": "same@x.com", "password": "p" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["message"], "User already exists");
    }

    #[tokio::test]
    async fn register_missing_field_is_bad_request() {
        let (app, _) = app().await;
        let (status, res) = post(&app, "/register", json!({ "username": "x" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(res["message"].as_str().unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn register_unknown_role_is_bad_request() {
        let (app, _) = app().await;
        let (status, _) = post(
            &app,
            "/register",
            json!({ "username": "x", "email": "x@x.com", "password": "p", "role": "root" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_echoes_role_or_rejects() {
        let (app, _) = app().await;
        post(
            &app,
            "/register",
            json!({ "username": "carol", "email": "c@x.com", "password": "s3cret", "role": "admin" }),
        )
        .await;

        let (status, res) = post(&app, "/login", json!({ "username": "carol", "password": "s3cret" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            res,
            json!({ "message": "Login successful", "username": "carol", "role": "admin" })
        );

        let (status, res) = post(&app, "/login", json!({ "username": "carol", "password": "nope" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(res, json!({ "message": "Invalid credentials" }));

        let (status, _) = post(&app, "/login", json!({ "username": "nobody", "password": "s3cret" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_with_corrupt_stored_hash_is_unauthorized() {
        let (app, state) = app().await;
        sqlx::query("INSERT INTO users (username, email, password_hash) VALUES ('dave', 'd@x.com', 'garbage')")
            .execute(&state.db)
            .await
            .unwrap();
        let (status, _) = post(&app, "/login", json!({ "username": "dave", "password": "garbage" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
