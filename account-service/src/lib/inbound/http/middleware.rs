use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::ports::AuthGatePort;
use crate::inbound::http::router::AppState;

/// Admit the request through the auth gate and expose the resolved
/// `Identity` to handlers via request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let identity = state
        .auth_gate
        .admit(authorization.as_deref())
        .await
        .map_err(|e| state.errors.translate(e))?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
