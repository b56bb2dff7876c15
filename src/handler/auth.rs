use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddleware},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    let protected = Router::new()
        .route("/profile", get(profile))
        .route("/user/favorites", post(add_favorite_team))
        .route("/user/favorites/:team_name", delete(remove_favorite_team))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
}

fn auth_cookie(token: &str, max_age_minutes: i64) -> Cookie<'static> {
    Cookie::build(("token", token.to_owned()))
        .path("/")
        .max_age(time::Duration::minutes(max_age_minutes))
        .http_only(true)
        .build()
}

fn login_response(
    app_state: &AppState,
    user: &crate::models::usermodel::User,
) -> Result<axum::response::Response, HttpError> {
    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = auth_cookie(&token, app_state.env.jwt_maxage);

    let body = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
        user: FilterUserDto::filter_user(user),
    });

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie".to_string()))?,
    );

    let mut response = body.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}

/// Registers a user. The very first account ever created is auto-promoted
/// to admin by the storage layer's bootstrap rule.
pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let email = body.email.to_lowercase();

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.username), Some(&email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing_user.is_some() {
        return Err(HttpError::bad_request(ErrorMessage::UserExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(body.username, email, hashed_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("registered user {} with role {}", user.username, user.role.to_str());

    login_response(&app_state, &user)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, None, Some(&body.email.to_lowercase()))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // A missing account and a wrong password are indistinguishable to the
    // caller.
    let user =
        result.ok_or(HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    login_response(&app_state, &user)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie".to_string()))?,
    );

    let body = Json(Response {
        status: "success",
        message: "Logged out successfully".to_string(),
    });

    let mut response = body.into_response();
    response.headers_mut().extend(headers);
    Ok(response)
}

pub async fn profile(
    Extension(user): Extension<JWTAuthMiddleware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserData {
        user: FilterUserDto::filter_user(&user.user),
    }))
}

pub async fn add_favorite_team(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Json(body): Json<FavoriteTeamDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .db_client
        .add_favorite_team(user.user.id, &body.team_name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(FavoriteTeamsResponseDto {
        favorite_teams: updated.favorite_teams,
    }))
}

pub async fn remove_favorite_team(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddleware>,
    Path(team_name): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .db_client
        .remove_favorite_team(user.user.id, &team_name)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(FavoriteTeamsResponseDto {
        favorite_teams: updated.favorite_teams,
    }))
}
