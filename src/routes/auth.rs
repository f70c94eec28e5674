use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::middleware_auth::{issue_token, AuthUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.username.trim().is_empty() || payload.password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            "username is required and password must be at least 8 characters".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let argon = Argon2::default();

    let password_hash = argon
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| {
            eprintln!("Password hash error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not create user".to_string(),
            )
        })?
        .to_string();
    let user_id = Uuid::new_v4();

    let res = sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(&payload.username)
    .bind(&password_hash)
    .execute(&state.db)
    .await;

    match res {
        Ok(_) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                id: user_id,
                username: payload.username,
            }),
        )),
        Err(e) => {
            if let Some(db_error) = e.as_database_error() {
                if db_error.code() == Some(std::borrow::Cow::Borrowed("23505")) {
                    return Err((
                        StatusCode::CONFLICT,
                        "username already taken".to_string(),
                    ));
                }
            }
            eprintln!("DB insert error: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not create user".to_string(),
            ))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, password_hash FROM users WHERE username = $1
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        eprintln!("DB Error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "db error".to_string())
    })?;

    let row = match row {
        Some(r) => r,
        None => {
            return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
        }
    };

    let parsed_hash = PasswordHash::new(&row.password_hash).map_err(|e| {
        eprintln!("Stored hash is unparseable: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "credential error".to_string(),
        )
    })?;
    let argon = Argon2::default();
    let verify = argon
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !verify {
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    let token = issue_token(row.id, &state.jwt_secret).map_err(|e| {
        eprintln!("jwt encode error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "token error".to_string())
    })?;

    Ok(Json(LoginResponse {
        token,
        user_id: row.id,
        username: row.username,
    }))
}

/// Token introspection for the frontend: a 200 here means the token is good.
pub async fn validate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let username = sqlx::query_scalar::<_, String>(
        r#"
        SELECT username FROM users WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(|e| {
        eprintln!("DB Error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "db error".to_string())
    })?;

    match username {
        Some(username) => Ok(Json(serde_json::json!({
            "valid": true,
            "user_id": user_id,
            "username": username,
        }))),
        None => Err((StatusCode::UNAUTHORIZED, "unknown user".to_string())),
    }
}
