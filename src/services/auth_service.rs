use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{AdminLoginRequest, Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{ADMIN_ROLE, AuthUser, PLAYER_ROLE},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_PLAYER_TYPE: &str = "java";
const SESSION_HOURS: i64 = 24;
const REMEMBER_ME_DAYS: i64 = 30;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn issue_token(secret: &str, subject: Uuid, role: &str, ttl: Duration) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn validate_registration(payload: &RegisterRequest) -> AppResult<()> {
    if payload.email.trim().is_empty()
        || payload.password.is_empty()
        || payload.username.trim().is_empty()
    {
        return Err(AppError::ValidationFailed("All fields are required".into()));
    }
    let username_len = payload.username.trim().chars().count();
    if !(3..=16).contains(&username_len) {
        return Err(AppError::ValidationFailed(
            "Username must be 3-16 characters".into(),
        ));
    }
    if payload.password.chars().count() < 6 {
        return Err(AppError::ValidationFailed(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    validate_registration(&payload)?;
    let email = payload.email.trim().to_string();
    let username = payload.username.trim().to_string();

    let email_taken = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if email_taken.is_some() {
        return Err(AppError::ValidationFailed("Email already registered".into()));
    }

    let username_taken = Users::find()
        .filter(UserCol::Username.eq(username.as_str()))
        .one(&state.orm)
        .await?;
    if username_taken.is_some() {
        return Err(AppError::ValidationFailed("Username already taken".into()));
    }

    let player_type = payload
        .player_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYER_TYPE.to_string());

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        username: Set(username),
        password_hash: Set(hash_password(&payload.password)?),
        player_type: Set(player_type),
        balance: Set(0),
        total_spent: Set(0),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest {
        email,
        password,
        remember_me,
    } = payload;
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::ValidationFailed("Email and password required".into()));
    }

    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::NotAuthenticated);
    }

    let ttl = if remember_me {
        Duration::days(REMEMBER_ME_DAYS)
    } else {
        Duration::hours(SESSION_HOURS)
    };
    let token = issue_token(&state.config.jwt_secret, user.id, PLAYER_ROLE, ttl)?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

/// Store staff sign in with the credentials from configuration; there is no admin user row.
pub async fn login_admin(
    state: &AppState,
    payload: AdminLoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let config = &state.config;
    let valid = !config.admin_username.is_empty()
        && payload.username == config.admin_username
        && payload.password == config.admin_password;
    if !valid {
        tracing::warn!(username = %payload.username, "admin login rejected");
        return Err(AppError::NotAuthenticated);
    }

    let token = issue_token(
        &config.jwt_secret,
        Uuid::nil(),
        ADMIN_ROLE,
        Duration::hours(SESSION_HOURS),
    )?;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let model = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotAuthenticated)?;
    Ok(ApiResponse::success("OK", model.into(), Some(Meta::empty())))
}
