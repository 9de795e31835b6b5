use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A batch of flyers sharing a target redirect URL and owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub target_url: String,
    pub pdf_url: String,
    pub s3_key: String,
    pub flyer_count: i32,
    pub scan_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One physical printed sheet bearing a unique tracking QR code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flyer {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub seq: i32,
    pub tracking_url: Option<String>,
    pub redirect_url: String,
    pub pdf_url: Option<String>,
    pub s3_key: Option<String>,
    pub scan_count: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Flyer {
    pub fn has_location(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

/// One recorded visit to a flyer's tracking URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub id: Uuid,
    pub flyer_id: Uuid,
    pub campaign_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub redirect_url: String,
}
