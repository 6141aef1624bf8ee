use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

pub struct ApiError(pub String, pub StatusCode);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
