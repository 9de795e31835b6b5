use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::ScanService;

use super::helpers::api_result;
use super::types::UpdateLocationRequest;

/// `POST /api/update-location`: coordinates reported by the prompt page.
pub async fn update_location(
    body: web::Json<UpdateLocationRequest>,
    scan_service: web::Data<Arc<ScanService>>,
) -> ActixResult<impl Responder> {
    info!("API: location report for flyer {}", body.flyer_id);

    Ok(api_result(
        scan_service
            .attach_location(body.flyer_id, body.campaign_id, body.lat, body.lng)
            .await,
    ))
}
