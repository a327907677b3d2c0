use crate::errors::ApiError;
use crate::services::reporting::Period;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::Path,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Binary download with `Content-Disposition: attachment`
pub fn attachment_response(bytes: Vec<u8>, content_type: &'static str, filename: &str) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Unwraps a JSON body, turning malformed payloads into a 400 with a JSON error body.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = payload?;
    Ok(value)
}

/// Unwraps path parameters, turning malformed segments into a 400 with a JSON error body.
pub fn path_params<T>(params: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    let Path(value) = params?;
    Ok(value)
}

/// `/:year/:month` segments as a validated month period
pub fn month_period(params: Result<Path<(i32, u32)>, PathRejection>) -> Result<Period, ApiError> {
    let (year, month) = path_params(params)?;
    Ok(Period::month(year, month)?)
}

/// `/:year` segment as a validated year period
pub fn year_period(params: Result<Path<i32>, PathRejection>) -> Result<Period, ApiError> {
    let year = path_params(params)?;
    Ok(Period::year(year)?)
}

/// Size of a ranking
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
pub struct TopQuery {
    /// Number of entries to return (default 10, at most 100)
    pub limit: Option<usize>,
}

impl TopQuery {
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(crate::services::reporting::DEFAULT_TOP_LIMIT)
            .clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn top_limit_defaults_and_clamps() {
        assert_eq!(TopQuery::default().limit(), 10);
        assert_eq!(TopQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(TopQuery { limit: Some(500) }.limit(), 100);
        assert_eq!(TopQuery { limit: Some(3) }.limit(), 3);
    }

    #[tokio::test]
    async fn attachment_sets_download_headers() {
        let response = attachment_response(b"%PDF-1.3".to_vec(), "application/pdf", "r.pdf");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"r.pdf\""
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF"));
    }
}
