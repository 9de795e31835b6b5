use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum FlyerlinkError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    ObjectStore(String),
    ObjectNotFound(String),
    PdfProcessing(String),
    QrEncoding(String),
    Token(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Serialization(String),
}

impl FlyerlinkError {
    pub fn code(&self) -> &'static str {
        match self {
            FlyerlinkError::DatabaseConfig(_) => "E001",
            FlyerlinkError::DatabaseConnection(_) => "E002",
            FlyerlinkError::DatabaseOperation(_) => "E003",
            FlyerlinkError::ObjectStore(_) => "E004",
            FlyerlinkError::ObjectNotFound(_) => "E005",
            FlyerlinkError::PdfProcessing(_) => "E006",
            FlyerlinkError::QrEncoding(_) => "E007",
            FlyerlinkError::Token(_) => "E008",
            FlyerlinkError::Validation(_) => "E009",
            FlyerlinkError::NotFound(_) => "E010",
            FlyerlinkError::Unauthorized(_) => "E011",
            FlyerlinkError::Serialization(_) => "E012",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            FlyerlinkError::DatabaseConfig(_) => "Database Configuration Error",
            FlyerlinkError::DatabaseConnection(_) => "Database Connection Error",
            FlyerlinkError::DatabaseOperation(_) => "Database Operation Error",
            FlyerlinkError::ObjectStore(_) => "Object Storage Error",
            FlyerlinkError::ObjectNotFound(_) => "Object Not Found",
            FlyerlinkError::PdfProcessing(_) => "PDF Processing Error",
            FlyerlinkError::QrEncoding(_) => "QR Encoding Error",
            FlyerlinkError::Token(_) => "Tracking Token Error",
            FlyerlinkError::Validation(_) => "Validation Error",
            FlyerlinkError::NotFound(_) => "Resource Not Found",
            FlyerlinkError::Unauthorized(_) => "Unauthorized",
            FlyerlinkError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FlyerlinkError::DatabaseConfig(msg) => msg,
            FlyerlinkError::DatabaseConnection(msg) => msg,
            FlyerlinkError::DatabaseOperation(msg) => msg,
            FlyerlinkError::ObjectStore(msg) => msg,
            FlyerlinkError::ObjectNotFound(msg) => msg,
            FlyerlinkError::PdfProcessing(msg) => msg,
            FlyerlinkError::QrEncoding(msg) => msg,
            FlyerlinkError::Token(msg) => msg,
            FlyerlinkError::Validation(msg) => msg,
            FlyerlinkError::NotFound(msg) => msg,
            FlyerlinkError::Unauthorized(msg) => msg,
            FlyerlinkError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the handler layer maps this error to.
    pub fn http_status(&self) -> StatusCode {
        match self {
            FlyerlinkError::Validation(_) | FlyerlinkError::Token(_) => StatusCode::BAD_REQUEST,
            FlyerlinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            FlyerlinkError::NotFound(_) | FlyerlinkError::ObjectNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for FlyerlinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FlyerlinkError {}

impl FlyerlinkError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::DatabaseOperation(msg.into())
    }

    pub fn object_store<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::ObjectStore(msg.into())
    }

    pub fn object_not_found<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::ObjectNotFound(msg.into())
    }

    pub fn pdf_processing<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::PdfProcessing(msg.into())
    }

    pub fn qr_encoding<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::QrEncoding(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::Token(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        FlyerlinkError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for FlyerlinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        FlyerlinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FlyerlinkError {
    fn from(err: std::io::Error) -> Self {
        FlyerlinkError::ObjectStore(err.to_string())
    }
}

impl From<serde_json::Error> for FlyerlinkError {
    fn from(err: serde_json::Error) -> Self {
        FlyerlinkError::Serialization(err.to_string())
    }
}

impl From<lopdf::Error> for FlyerlinkError {
    fn from(err: lopdf::Error) -> Self {
        FlyerlinkError::PdfProcessing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlyerlinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_carries_code_and_message() {
        let err = FlyerlinkError::validation("flyerCount must be between 1 and 500");

        let colored = err.format_colored();
        assert!(colored.contains("E009"));
        assert!(colored.contains("flyerCount must be between 1 and 500"));

        assert_eq!(
            err.format_simple(),
            "Validation Error: flyerCount must be between 1 and 500"
        );
    }
}
