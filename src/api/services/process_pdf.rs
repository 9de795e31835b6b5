use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{Responder, Result as ActixResult, web};
use bytes::Bytes;
use futures_util::StreamExt as _;
use tracing::{error, info};

use crate::config::get_config;
use crate::pdf::QrBounds;
use crate::services::{CampaignService, CreateCampaignRequest};

use super::error_code::ErrorCode;
use super::helpers::{error_from_flyerlink, error_response, success_response};
use super::types::ProcessPdfResponse;

/// `POST /api/process-pdf`: upload a base PDF and generate the campaign.
pub async fn process_pdf(
    mut payload: Multipart,
    campaign_service: web::Data<Arc<CampaignService>>,
) -> ActixResult<impl Responder> {
    info!("API: process-pdf request");

    let max_upload_bytes = get_config().tracking.max_upload_bytes;

    let mut pdf_bytes: Option<Vec<u8>> = None;
    let mut base_url: Option<String> = None;
    let mut target_url: Option<String> = None;
    let mut campaign_name: Option<String> = None;
    let mut flyer_count: Option<u32> = None;
    let mut qr_bounds: Option<QrBounds> = None;
    let mut owner: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_response(
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if data.len() + bytes.len() > max_upload_bytes {
                                return Ok(error_response(
                                    ErrorCode::FileTooLarge,
                                    &format!(
                                        "File size exceeds maximum {} MB",
                                        max_upload_bytes / 1024 / 1024
                                    ),
                                ));
                            }
                            data.extend_from_slice(&bytes);
                        }
                        Err(e) => {
                            error!("Failed to read file chunk: {}", e);
                            return Ok(error_response(
                                ErrorCode::FileReadError,
                                &format!("Failed to read file: {}", e),
                            ));
                        }
                    }
                }
                pdf_bytes = Some(data);
            }
            "baseUrl" => base_url = Some(read_text_field(&mut field).await),
            "targetUrl" => target_url = Some(read_text_field(&mut field).await),
            "campaignName" => campaign_name = Some(read_text_field(&mut field).await),
            "owner" => owner = Some(read_text_field(&mut field).await),
            "flyerCount" => {
                let raw = read_text_field(&mut field).await;
                match raw.trim().parse::<u32>() {
                    Ok(n) => flyer_count = Some(n),
                    Err(_) => {
                        return Ok(error_response(
                            ErrorCode::BadRequest,
                            &format!("flyerCount is not a number: {}", raw),
                        ));
                    }
                }
            }
            "qrBounds" => {
                let raw = read_text_field(&mut field).await;
                match serde_json::from_str::<QrBounds>(&raw) {
                    Ok(b) => qr_bounds = Some(b),
                    Err(e) => {
                        return Ok(error_response(
                            ErrorCode::BadRequest,
                            &format!("qrBounds is not valid JSON: {}", e),
                        ));
                    }
                }
            }
            _ => {
                // Ignore unknown fields.
            }
        }
    }

    let pdf_bytes = match pdf_bytes {
        Some(data) if !data.is_empty() => data,
        _ => {
            return Ok(error_response(
                ErrorCode::BadRequest,
                "No PDF file provided",
            ));
        }
    };

    let (Some(target_url), Some(campaign_name), Some(flyer_count), Some(qr_bounds)) =
        (target_url, campaign_name, flyer_count, qr_bounds)
    else {
        return Ok(error_response(
            ErrorCode::BadRequest,
            "Missing required fields: targetUrl, campaignName, flyerCount, qrBounds",
        ));
    };

    // Tracking links fall back to the configured public base URL when the
    // upload does not name one.
    let base_url =
        base_url.unwrap_or_else(|| get_config().tracking.public_base_url.clone());

    let request = CreateCampaignRequest {
        owner: owner.unwrap_or_else(|| "api".to_string()),
        name: campaign_name,
        base_url,
        target_url,
        flyer_count,
        qr_bounds,
        pdf_bytes: Bytes::from(pdf_bytes),
    };

    match campaign_service.create(request).await {
        Ok(result) => {
            info!(
                "API: campaign {} created with {} flyers",
                result.campaign.name,
                result.flyers.len()
            );
            Ok(success_response(ProcessPdfResponse::from(&result)))
        }
        Err(e) => Ok(error_from_flyerlink(e)),
    }
}

async fn read_text_field(field: &mut actix_multipart::Field) -> String {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        if let Ok(bytes) = chunk {
            data.extend_from_slice(&bytes);
        }
    }
    String::from_utf8_lossy(&data).to_string()
}
