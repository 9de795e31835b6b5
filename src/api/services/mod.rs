pub mod campaigns;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod location;
pub mod location_prompt;
pub mod process_pdf;
pub mod redirect;
pub mod signed_url;
pub mod types;

pub use error_code::ErrorCode;
pub use types::ApiResponse;
