use std::sync::Arc;

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, warn};

use crate::errors::FlyerlinkError;
use crate::services::{ScanOutcome, ScanService};

pub struct RedirectService;

impl RedirectService {
    /// `GET /r/{token}`: encrypted tracking token form, stamped on flyers.
    pub async fn handle_token(
        path: web::Path<String>,
        scan_service: web::Data<Arc<ScanService>>,
    ) -> ActixResult<impl Responder> {
        let token = path.into_inner();
        Ok(Self::respond(scan_service.scan_by_token(&token).await))
    }

    /// `GET /r/{campaign_name}/{seq}`: human-readable short form.
    pub async fn handle_named(
        path: web::Path<(String, String)>,
        scan_service: web::Data<Arc<ScanService>>,
    ) -> ActixResult<impl Responder> {
        let (campaign_name, seq) = path.into_inner();
        // A non-numeric sequence is the caller's mistake, not a missing
        // resource.
        let Ok(seq) = seq.parse::<i32>() else {
            return Ok(Self::error_page(FlyerlinkError::validation(format!(
                "Flyer sequence is not a number: {}",
                seq
            ))));
        };
        Ok(Self::respond(
            scan_service.scan_by_name(&campaign_name, seq).await,
        ))
    }

    fn respond(result: crate::errors::Result<ScanOutcome>) -> HttpResponse {
        match result {
            Ok(ScanOutcome::Redirect { url }) => {
                info!("Scan redirect -> {}", url);
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", url))
                    .finish()
            }
            Ok(ScanOutcome::Prompt {
                flyer_id,
                campaign_id,
                redirect_url,
            }) => {
                info!("Scan redirect -> location prompt for flyer {}", flyer_id);
                let target = format!(
                    "/location-prompt?flyerId={}&campaignId={}&redirectUrl={}",
                    flyer_id,
                    campaign_id,
                    urlencoding::encode(&redirect_url)
                );
                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", target))
                    .finish()
            }
            Err(err) => Self::error_page(err),
        }
    }

    fn error_page(err: FlyerlinkError) -> HttpResponse {
        warn!("Scan resolution failed: {}", err);
        let status = err.http_status();
        let body = match status.as_u16() {
            404 => "Not Found",
            400 => "Bad Request",
            _ => "Internal Server Error",
        };
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body(body)
    }
}
