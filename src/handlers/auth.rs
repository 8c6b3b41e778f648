use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Serialize;

use crate::AppState;
use crate::database::models::LoginInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::bearer_token;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub reset_view: bool,
}

pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = state
        .auth
        .login(request.into_inner())
        .await?
        .ok_or(AppError::Authentication)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(response),
        "Login berhasil!",
    )))
}

/// Always succeeds: a missing, expired or already closed session leaves
/// nothing to clear.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let claims = bearer_token(&req).and_then(|token| state.auth.verify_token(&token).ok());
    if let Some(claims) = claims {
        state.auth.logout(claims.sid).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(LogoutResponse { reset_view: true })))
}
