use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;
use uuid::Uuid;

use crate::services::{AnalyticsService, CampaignService};

use super::helpers::api_result;
use super::types::{CampaignDetailResponse, UpdateRedirectUrlRequest, UpdateUrlRequest};

/// `GET /api/campaigns/{id}`: campaign row, flyers and raw scan data.
pub async fn get_campaign(
    path: web::Path<Uuid>,
    campaign_service: web::Data<Arc<CampaignService>>,
) -> ActixResult<impl Responder> {
    let campaign_id = path.into_inner();

    Ok(api_result(
        campaign_service
            .get_detail(campaign_id)
            .await
            .map(|d| CampaignDetailResponse::from(&d)),
    ))
}

/// `GET /api/campaigns/{id}/analytics`: aggregated scan statistics.
pub async fn get_campaign_analytics(
    path: web::Path<Uuid>,
    campaign_service: web::Data<Arc<CampaignService>>,
) -> ActixResult<impl Responder> {
    let campaign_id = path.into_inner();

    Ok(api_result(
        campaign_service
            .get_detail(campaign_id)
            .await
            .map(|d| AnalyticsService::build(&d.campaign, &d.flyers, &d.scans)),
    ))
}

/// `POST /api/campaigns/{id}/update-url`: change the campaign target URL
/// and cascade it to every flyer.
pub async fn update_campaign_url(
    path: web::Path<Uuid>,
    body: web::Json<UpdateUrlRequest>,
    campaign_service: web::Data<Arc<CampaignService>>,
) -> ActixResult<impl Responder> {
    let campaign_id = path.into_inner();
    info!("API: update campaign {} target URL", campaign_id);

    Ok(api_result(
        campaign_service
            .update_target_url(campaign_id, &body.url)
            .await,
    ))
}

/// `POST /api/update-redirect-url`: change one flyer's redirect URL.
pub async fn update_redirect_url(
    body: web::Json<UpdateRedirectUrlRequest>,
    campaign_service: web::Data<Arc<CampaignService>>,
) -> ActixResult<impl Responder> {
    info!("API: update flyer {} redirect URL", body.flyer_id);

    Ok(api_result(
        campaign_service
            .update_flyer_redirect_url(body.flyer_id, &body.new_url)
            .await,
    ))
}
