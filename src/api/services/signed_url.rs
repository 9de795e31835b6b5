use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::objectstore::ObjectStore;

use super::helpers::api_result;
use super::types::{SignedUrlRequest, SignedUrlResponse};

/// `POST /api/get-signed-url`: fresh presigned download link for a stored
/// object. Unknown keys answer 404 rather than a signed URL that would
/// fail later at the bucket.
pub async fn get_signed_url(
    body: web::Json<SignedUrlRequest>,
    objects: web::Data<Arc<dyn ObjectStore>>,
) -> ActixResult<impl Responder> {
    info!("API: signed URL request for {}", body.s3_key);

    Ok(api_result(
        objects
            .signed_url(&body.s3_key)
            .await
            .map(|signed_url| SignedUrlResponse { signed_url }),
    ))
}
