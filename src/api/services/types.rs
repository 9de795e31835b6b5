//! Wire types for the JSON API.
//!
//! Request bodies arrive camelCase from the dashboard; responses carry a
//! uniform `{ code, message, data }` envelope.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::{CampaignDetail, CreateCampaignResult, GeneratedFlyer};
use crate::storage::{Campaign, Flyer, Scan};

use super::error_code::ErrorCode;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: ErrorCode,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub flyer_id: Uuid,
    pub campaign_id: Uuid,
    pub lat: f64,
    // Older prompt pages posted "long" instead of "lng".
    #[serde(alias = "long")]
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRedirectUrlRequest {
    pub flyer_id: Uuid,
    pub new_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlRequest {
    pub s3_key: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlResponse {
    pub signed_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerView {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub seq: i32,
    pub tracking_url: Option<String>,
    pub redirect_url: String,
    pub s3_key: Option<String>,
    pub scan_count: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub posted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Flyer> for FlyerView {
    fn from(f: &Flyer) -> Self {
        Self {
            id: f.id,
            campaign_id: f.campaign_id,
            seq: f.seq,
            tracking_url: f.tracking_url.clone(),
            redirect_url: f.redirect_url.clone(),
            s3_key: f.s3_key.clone(),
            scan_count: f.scan_count,
            lat: f.lat,
            lng: f.lng,
            posted_at: f.posted_at,
            created_at: f.created_at,
        }
    }
}

/// A generated flyer plus its time-limited download link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFlyerView {
    #[serde(flatten)]
    pub flyer: FlyerView,
    pub signed_url: String,
}

impl From<&GeneratedFlyer> for GeneratedFlyerView {
    fn from(g: &GeneratedFlyer) -> Self {
        Self {
            flyer: FlyerView::from(&g.flyer),
            signed_url: g.signed_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub target_url: String,
    pub s3_key: String,
    pub flyer_count: i32,
    pub scan_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Campaign> for CampaignView {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id,
            owner: c.owner.clone(),
            name: c.name.clone(),
            target_url: c.target_url.clone(),
            s3_key: c.s3_key.clone(),
            flyer_count: c.flyer_count,
            scan_count: c.scan_count,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanView {
    pub id: Uuid,
    pub flyer_id: Uuid,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub redirect_url: String,
}

impl From<&Scan> for ScanView {
    fn from(s: &Scan) -> Self {
        Self {
            id: s.id,
            flyer_id: s.flyer_id,
            scanned_at: s.scanned_at,
            lat: s.lat,
            lng: s.lng,
            redirect_url: s.redirect_url.clone(),
        }
    }
}

/// `POST /api/process-pdf` success payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPdfResponse {
    pub campaign: CampaignView,
    pub flyers: Vec<GeneratedFlyerView>,
    pub merged_pdf_url: String,
    pub merged_s3_key: String,
}

impl From<&CreateCampaignResult> for ProcessPdfResponse {
    fn from(r: &CreateCampaignResult) -> Self {
        Self {
            campaign: CampaignView::from(&r.campaign),
            flyers: r.flyers.iter().map(GeneratedFlyerView::from).collect(),
            merged_pdf_url: r.merged_pdf_url.clone(),
            merged_s3_key: r.merged_s3_key.clone(),
        }
    }
}

/// `GET /api/campaigns/{id}` success payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetailResponse {
    pub campaign: CampaignView,
    pub flyers: Vec<FlyerView>,
    pub scan_data: Vec<ScanView>,
}

impl From<&CampaignDetail> for CampaignDetailResponse {
    fn from(d: &CampaignDetail) -> Self {
        Self {
            campaign: CampaignView::from(&d.campaign),
            flyers: d.flyers.iter().map(FlyerView::from).collect(),
            scan_data: d.scans.iter().map(ScanView::from).collect(),
        }
    }
}
