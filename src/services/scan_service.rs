//! Scan resolution and recording.
//!
//! Both scan paths funnel through here: the encrypted token form
//! (`/r/{token}`) and the campaign-name + sequence form
//! (`/r/{campaign_name}/{seq}`). Every resolved hit appends a Scan row;
//! the first hit of a flyer without a stored location is answered with a
//! geolocation prompt instead of the final redirect.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{FlyerlinkError, Result};
use crate::storage::{Flyer, Scan, SeaOrmStorage};
use crate::token::TokenCodec;

/// What the redirect handler should do with a resolved scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// First scan of an unlocated flyer: send the visitor to the
    /// geolocation prompt page first.
    Prompt {
        flyer_id: Uuid,
        campaign_id: Uuid,
        redirect_url: String,
    },
    /// Redirect straight to the target.
    Redirect { url: String },
}

pub struct ScanService {
    storage: Arc<SeaOrmStorage>,
    tokens: Arc<TokenCodec>,
}

impl ScanService {
    pub fn new(storage: Arc<SeaOrmStorage>, tokens: Arc<TokenCodec>) -> Self {
        Self { storage, tokens }
    }

    /// Resolve an encrypted tracking token. Redirect target is the
    /// campaign's URL, matching the token links stamped onto flyers.
    pub async fn scan_by_token(&self, token: &str) -> Result<ScanOutcome> {
        let (campaign_id, flyer_id) = self.tokens.decrypt(token)?;

        let campaign = self
            .storage
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| {
                FlyerlinkError::not_found(format!("Campaign not found: {}", campaign_id))
            })?;

        let flyer = self
            .storage
            .get_flyer(flyer_id)
            .await?
            .filter(|f| f.campaign_id == campaign_id)
            .ok_or_else(|| FlyerlinkError::not_found(format!("Flyer not found: {}", flyer_id)))?;

        self.record(&flyer, campaign.target_url).await
    }

    /// Resolve the short form: campaign name plus per-campaign sequence.
    /// Redirect target is the flyer's own redirect URL.
    pub async fn scan_by_name(&self, campaign_name: &str, seq: i32) -> Result<ScanOutcome> {
        let campaign = self
            .storage
            .get_campaign_by_name(campaign_name)
            .await?
            .ok_or_else(|| {
                FlyerlinkError::not_found(format!("Campaign not found: {}", campaign_name))
            })?;

        let flyer = self
            .storage
            .get_flyer_by_campaign_seq(campaign.id, seq)
            .await?
            .ok_or_else(|| {
                FlyerlinkError::not_found(format!(
                    "Flyer not found: {}/{}",
                    campaign_name, seq
                ))
            })?;

        let redirect_url = flyer.redirect_url.clone();
        self.record(&flyer, redirect_url).await
    }

    async fn record(&self, flyer: &Flyer, redirect_url: String) -> Result<ScanOutcome> {
        // First-scan is decided from the scans table, not from a cached
        // counter, so a stale counter can never suppress the prompt.
        let prior_scans = self.storage.count_scans_for_flyer(flyer.id).await?;

        let scan = Scan {
            id: Uuid::new_v4(),
            flyer_id: flyer.id,
            campaign_id: flyer.campaign_id,
            scanned_at: Utc::now(),
            lat: None,
            lng: None,
            redirect_url: redirect_url.clone(),
        };
        self.storage.insert_scan(&scan).await?;
        self.storage
            .recompute_scan_counts(flyer.id, flyer.campaign_id)
            .await?;

        if prior_scans == 0 && !flyer.has_location() {
            debug!(
                "First scan of flyer {} without location, prompting",
                flyer.id
            );
            return Ok(ScanOutcome::Prompt {
                flyer_id: flyer.id,
                campaign_id: flyer.campaign_id,
                redirect_url,
            });
        }

        Ok(ScanOutcome::Redirect { url: redirect_url })
    }

    /// Store coordinates reported by the geolocation prompt page.
    ///
    /// The coordinates are attached to the flyer and to its most recent
    /// unlocated scan; the prompting visit is never counted twice.
    pub async fn attach_location(
        &self,
        flyer_id: Uuid,
        campaign_id: Uuid,
        lat: f64,
        lng: f64,
    ) -> Result<()> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(FlyerlinkError::validation(format!(
                "Coordinates out of range: ({}, {})",
                lat, lng
            )));
        }

        let flyer = self
            .storage
            .get_flyer(flyer_id)
            .await?
            .filter(|f| f.campaign_id == campaign_id)
            .ok_or_else(|| FlyerlinkError::not_found(format!("Flyer not found: {}", flyer_id)))?;

        self.storage
            .update_flyer_location(flyer_id, lat, lng)
            .await?;

        match self.storage.latest_unlocated_scan(flyer_id).await? {
            Some(scan) => {
                self.storage
                    .update_scan_location(scan.id, lat, lng)
                    .await?;
            }
            None => {
                // Location posted without a preceding scan row (e.g. the
                // prompt page was reloaded much later); record one.
                let scan = Scan {
                    id: Uuid::new_v4(),
                    flyer_id,
                    campaign_id,
                    scanned_at: Utc::now(),
                    lat: Some(lat),
                    lng: Some(lng),
                    redirect_url: flyer.redirect_url.clone(),
                };
                self.storage.insert_scan(&scan).await?;
            }
        }

        self.storage
            .recompute_scan_counts(flyer_id, campaign_id)
            .await?;

        info!("Flyer {} located at ({}, {})", flyer_id, lat, lng);
        Ok(())
    }
}
