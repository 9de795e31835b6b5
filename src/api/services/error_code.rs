//! API error codes
//!
//! Serialized as numbers in response bodies, grouped by thousands:
//! - 0: success
//! - 1000-1099: generic
//! - 2000-2099: authentication
//! - 3000-3099: campaign / flyer / scan
//! - 4000-4099: upload parsing

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::FlyerlinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // generic 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    FileTooLarge = 1011,

    // campaign domain 3000-3099
    CampaignNotFound = 3000,
    FlyerNotFound = 3001,
    InvalidCampaignName = 3002,
    InvalidUrl = 3003,
    InvalidToken = 3004,
    ObjectNotFound = 3005,
    PdfProcessingFailed = 3006,

    // upload parsing 4000-4099
    InvalidMultipartData = 4002,
    FileReadError = 4003,
}

impl From<FlyerlinkError> for ErrorCode {
    fn from(err: FlyerlinkError) -> Self {
        match err {
            FlyerlinkError::Validation(_) => ErrorCode::BadRequest,
            FlyerlinkError::Token(_) => ErrorCode::InvalidToken,
            FlyerlinkError::Unauthorized(_) => ErrorCode::Unauthorized,
            FlyerlinkError::NotFound(_) => ErrorCode::NotFound,
            FlyerlinkError::ObjectNotFound(_) => ErrorCode::ObjectNotFound,
            FlyerlinkError::PdfProcessing(_) | FlyerlinkError::QrEncoding(_) => {
                ErrorCode::PdfProcessingFailed
            }
            _ => ErrorCode::InternalServerError,
        }
    }
}
