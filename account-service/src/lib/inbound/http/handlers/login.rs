use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| state.errors.reject_body(rejection))?;

    state
        .auth_service
        .login(LoginCommand::new(body.email, body.password))
        .await
        .map_err(|e| state.errors.translate(e))
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub user: PublicUserData,
}

/// Public projection of a user; the password hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_color: String,
}

impl From<&User> for PublicUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            avatar_color: user.avatar_color.as_str().to_string(),
        }
    }
}

impl From<Session> for LoginResponseData {
    fn from(session: Session) -> Self {
        Self {
            token: session.access_token,
            token_type: session.token_type.to_string(),
            user: (&session.user).into(),
        }
    }
}
