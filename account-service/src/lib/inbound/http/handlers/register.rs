use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub const REGISTERED_MESSAGE: &str = "User registered successfully";

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| state.errors.reject_body(rejection))?;

    state
        .auth_service
        .register(body.into())
        .await
        .map_err(|e| state.errors.translate(e))
        .map(|_| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    message: REGISTERED_MESSAGE.to_string(),
                },
            )
        })
}

/// Missing fields are left to the domain validators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl From<RegisterRequestBody> for RegisterCommand {
    fn from(body: RegisterRequestBody) -> Self {
        RegisterCommand::new(body.name, body.email, body.password)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
}
