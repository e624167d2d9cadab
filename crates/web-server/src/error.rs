use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Calculation error: {0}")]
    Calc(#[from] calculators::CalcError),
    #[error("News error: {0}")]
    News(#[from] news::NewsError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Calc(calc_err) => {
                tracing::error!(error = %calc_err, "Calculation error.");
                (StatusCode::UNPROCESSABLE_ENTITY, calc_err.to_string())
            }
            AppError::News(news_err) => {
                tracing::error!(error = ?news_err, "News error.");
                (
                    StatusCode::BAD_GATEWAY,
                    "The news feeds could not be loaded".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
