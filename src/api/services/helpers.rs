use actix_web::HttpResponse;
use serde::Serialize;

use crate::errors::FlyerlinkError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// Build a JSON envelope response with an explicit code and message.
pub fn json_response<T: Serialize>(code: ErrorCode, message: &str, data: Option<T>) -> HttpResponse {
    let status = match code {
        ErrorCode::Success => actix_web::http::StatusCode::OK,
        ErrorCode::BadRequest
        | ErrorCode::InvalidCampaignName
        | ErrorCode::InvalidUrl
        | ErrorCode::InvalidToken
        | ErrorCode::InvalidMultipartData
        | ErrorCode::FileReadError => actix_web::http::StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => actix_web::http::StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound
        | ErrorCode::CampaignNotFound
        | ErrorCode::FlyerNotFound
        | ErrorCode::ObjectNotFound => actix_web::http::StatusCode::NOT_FOUND,
        ErrorCode::FileTooLarge => actix_web::http::StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::InternalServerError | ErrorCode::PdfProcessingFailed => {
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    HttpResponse::build(status).json(ApiResponse {
        code,
        message: message.to_string(),
        data,
    })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(ErrorCode::Success, "ok", Some(data))
}

pub fn error_response(code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(code, message, None)
}

/// Map a service error onto the wire envelope, logging server faults.
pub fn error_from_flyerlink(err: FlyerlinkError) -> HttpResponse {
    let message = err.to_string();
    let code = ErrorCode::from(err);
    if code == ErrorCode::InternalServerError {
        tracing::error!("Internal error: {}", message);
        return error_response(code, "Internal server error");
    }
    error_response(code, &message)
}

/// Collapse a service result into an HTTP response.
pub fn api_result<T: Serialize>(result: crate::errors::Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(err) => error_from_flyerlink(err),
    }
}
