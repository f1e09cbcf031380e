use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, SignupRequest},
        extractors::AuthUser,
        repo::is_unique_violation,
        repo_types::User,
        services::{check_new_password, hash_password, is_valid_username, verify_password, JwtKeys},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup/", post(signup))
        .route("/login/", post(login))
        .route("/logout/", post(logout))
        .route("/refresh/", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me/", get(get_me))
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            id: user.id,
            username: user.username,
        },
    })
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();

    if !is_valid_username(&payload.username) {
        warn!(username = %payload.username, "invalid username");
        return Err((StatusCode::BAD_REQUEST, "Invalid username".into()));
    }

    if let Err(reason) =
        check_new_password(&payload.username, &payload.password, &payload.password_confirm)
    {
        warn!(username = %payload.username, reason, "password rejected");
        return Err((StatusCode::BAD_REQUEST, reason.into()));
    }

    match User::find_by_username(&state.db, &payload.username).await {
        Ok(Some(_)) => {
            warn!(username = %payload.username, "username already taken");
            return Err((StatusCode::CONFLICT, "Username already taken".into()));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create(&state.db, &payload.username, &hash).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %payload.username, "username taken concurrently");
            return Err((StatusCode::CONFLICT, "Username already taken".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, username = %user.username, "user signed up");
    let response = issue_tokens(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.username = payload.username.trim().to_string();

    let user = match User::find_by_username(&state.db, &payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(username = %payload.username, "login unknown username");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !ok {
        warn!(username = %payload.username, user_id = %user.id, "login invalid password");
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".into(),
        ));
    }

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

/// Tokens are stateless; the client drops them.
#[instrument]
pub async fn logout(AuthUser(user_id): AuthUser) -> StatusCode {
    info!(%user_id, "user logged out");
    StatusCode::NO_CONTENT
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, format!("{}", e)))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_id failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, (StatusCode, String)> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "user lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
    }))
}
