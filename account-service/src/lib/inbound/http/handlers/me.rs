use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Identity;

/// Echo the identity the gate admitted.
pub async fn me(
    Extension(identity): Extension<Identity>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&identity).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&Identity> for MeResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.as_str().to_string(),
            name: identity.name.as_str().to_string(),
        }
    }
}
