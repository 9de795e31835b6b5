//! Campaign management service
//!
//! Owns the flyer generation pipeline: one base PDF in, N stamped flyer
//! PDFs plus a merged batch document out, with campaign/flyer rows
//! persisted along the way. Also serves campaign reads and target URL
//! updates.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{FlyerlinkError, Result};
use crate::objectstore::ObjectStore;
use crate::pdf::{self, QrBounds};
use crate::qr::render_qr;
use crate::storage::{Campaign, Flyer, Scan, SeaOrmStorage};
use crate::token::TokenCodec;
use crate::utils::is_valid_campaign_name;
use crate::utils::url_validator::validate_url;

/// Request to create a campaign and generate its flyers.
#[derive(Debug, Clone)]
pub struct CreateCampaignRequest {
    pub owner: String,
    pub name: String,
    /// Base URL the tracking links are built on, e.g. `https://fly.example`.
    pub base_url: String,
    pub target_url: String,
    pub flyer_count: u32,
    pub qr_bounds: QrBounds,
    pub pdf_bytes: Bytes,
}

/// One generated flyer plus its time-limited download link.
#[derive(Debug, Clone)]
pub struct GeneratedFlyer {
    pub flyer: Flyer,
    pub signed_url: String,
}

#[derive(Debug, Clone)]
pub struct CreateCampaignResult {
    pub campaign: Campaign,
    pub flyers: Vec<GeneratedFlyer>,
    pub merged_pdf_url: String,
    pub merged_s3_key: String,
}

/// Campaign with everything the analytics view needs.
#[derive(Debug, Clone)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub flyers: Vec<Flyer>,
    pub scans: Vec<Scan>,
}

pub struct CampaignService {
    storage: Arc<SeaOrmStorage>,
    objects: Arc<dyn ObjectStore>,
    tokens: Arc<TokenCodec>,
    qr_module_px: u32,
    max_flyer_count: u32,
}

impl CampaignService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        objects: Arc<dyn ObjectStore>,
        tokens: Arc<TokenCodec>,
        qr_module_px: u32,
        max_flyer_count: u32,
    ) -> Self {
        Self {
            storage,
            objects,
            tokens,
            qr_module_px,
            max_flyer_count,
        }
    }

    /// Create a campaign and generate all of its flyers.
    ///
    /// Flyers are processed strictly sequentially. A failure mid-batch
    /// aborts the whole request; rows and objects written before the
    /// failure are left in place.
    pub async fn create(&self, req: CreateCampaignRequest) -> Result<CreateCampaignResult> {
        self.validate(&req)?;

        // Parse once up front so a broken upload fails before any writes.
        let page_count = pdf::page_count(&req.pdf_bytes)
            .map_err(|e| FlyerlinkError::validation(format!("Uploaded file is not a usable PDF: {}", e)))?;
        if page_count == 0 {
            return Err(FlyerlinkError::validation(
                "Uploaded PDF has no pages".to_string(),
            ));
        }

        if self
            .storage
            .get_campaign_by_name(&req.name)
            .await?
            .is_some()
        {
            return Err(FlyerlinkError::validation(format!(
                "Campaign name already taken: {}",
                req.name
            )));
        }

        let original = self
            .objects
            .put_pdf("original.pdf", req.pdf_bytes.clone())
            .await?;

        let campaign = Campaign {
            id: Uuid::new_v4(),
            owner: req.owner.clone(),
            name: req.name.clone(),
            target_url: req.target_url.clone(),
            pdf_url: original.url,
            s3_key: original.key,
            flyer_count: req.flyer_count as i32,
            scan_count: 0,
            created_at: Utc::now(),
        };
        self.storage.insert_campaign(&campaign).await?;

        let base_url = req.base_url.trim_end_matches('/');
        let mut generated = Vec::with_capacity(req.flyer_count as usize);
        let mut flyer_buffers: Vec<Vec<u8>> = Vec::with_capacity(req.flyer_count as usize);

        for seq in 1..=req.flyer_count as i32 {
            let flyer_id = Uuid::new_v4();
            let flyer = Flyer {
                id: flyer_id,
                campaign_id: campaign.id,
                seq,
                tracking_url: None,
                redirect_url: req.target_url.clone(),
                pdf_url: None,
                s3_key: None,
                scan_count: 0,
                lat: None,
                lng: None,
                posted_at: None,
                created_at: Utc::now(),
            };
            self.storage.insert_flyer(&flyer).await?;

            let token = self.tokens.encrypt(campaign.id, flyer_id)?;
            let tracking_url = format!("{}/r/{}", base_url, token);

            let stamped = self
                .stamp(&req.pdf_bytes, &tracking_url, req.qr_bounds)
                .await
                .inspect_err(|e| {
                    error!(
                        "Flyer #{} of campaign {} failed, aborting batch: {}",
                        seq, campaign.name, e
                    );
                })?;

            let uploaded = self
                .objects
                .put_pdf(&format!("flyer-{}.pdf", flyer_id), Bytes::from(stamped.clone()))
                .await?;

            self.storage
                .update_flyer_generated(flyer_id, &tracking_url, &uploaded.url, &uploaded.key)
                .await?;

            let signed_url = self.objects.signed_url(&uploaded.key).await?;

            let flyer = self
                .storage
                .get_flyer(flyer_id)
                .await?
                .ok_or_else(|| FlyerlinkError::not_found(format!("Flyer not found: {}", flyer_id)))?;

            flyer_buffers.push(stamped);
            generated.push(GeneratedFlyer { flyer, signed_url });
        }

        let merged = tokio::task::spawn_blocking(move || pdf::merge_documents(&flyer_buffers))
            .await
            .map_err(|e| FlyerlinkError::pdf_processing(format!("Merge task failed: {}", e)))??;

        let merged_upload = self
            .objects
            .put_pdf(
                &format!("campaign-{}-all-flyers.pdf", campaign.id),
                Bytes::from(merged),
            )
            .await?;
        let merged_pdf_url = self.objects.signed_url(&merged_upload.key).await?;

        info!(
            "Campaign {} generated: {} flyers, {} pages each",
            campaign.name, req.flyer_count, page_count
        );

        Ok(CreateCampaignResult {
            campaign,
            flyers: generated,
            merged_pdf_url,
            merged_s3_key: merged_upload.key,
        })
    }

    /// Stamp one flyer copy off the actix worker thread.
    async fn stamp(
        &self,
        pdf_bytes: &Bytes,
        tracking_url: &str,
        bounds: QrBounds,
    ) -> Result<Vec<u8>> {
        let qr = render_qr(tracking_url, self.qr_module_px)?;
        let pdf_bytes = pdf_bytes.clone();
        tokio::task::spawn_blocking(move || pdf::stamp_document(&pdf_bytes, &qr, &bounds))
            .await
            .map_err(|e| FlyerlinkError::pdf_processing(format!("Stamp task failed: {}", e)))?
    }

    pub async fn get_detail(&self, campaign_id: Uuid) -> Result<CampaignDetail> {
        let campaign = self
            .storage
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| {
                FlyerlinkError::not_found(format!("Campaign not found: {}", campaign_id))
            })?;

        let flyers = self.storage.flyers_for_campaign(campaign_id).await?;
        let scans = self.storage.scans_for_campaign(campaign_id).await?;

        Ok(CampaignDetail {
            campaign,
            flyers,
            scans,
        })
    }

    /// Update the campaign target URL and cascade to every flyer.
    pub async fn update_target_url(&self, campaign_id: Uuid, url: &str) -> Result<()> {
        validate_url(url).map_err(|e| FlyerlinkError::validation(e.to_string()))?;

        self.storage
            .update_campaign_target_url(campaign_id, url)
            .await?;
        let updated = self
            .storage
            .update_flyers_redirect_url(campaign_id, url)
            .await?;

        info!(
            "Campaign {} redirect cascade updated {} flyers",
            campaign_id, updated
        );
        Ok(())
    }

    /// Update one flyer's redirect URL.
    pub async fn update_flyer_redirect_url(&self, flyer_id: Uuid, url: &str) -> Result<()> {
        validate_url(url).map_err(|e| FlyerlinkError::validation(e.to_string()))?;
        self.storage.update_flyer_redirect_url(flyer_id, url).await
    }

    fn validate(&self, req: &CreateCampaignRequest) -> Result<()> {
        if !is_valid_campaign_name(&req.name) {
            return Err(FlyerlinkError::validation(format!(
                "Invalid campaign name '{}': lowercase letters, digits and hyphens only",
                req.name
            )));
        }

        validate_url(&req.target_url)
            .map_err(|e| FlyerlinkError::validation(format!("Invalid target URL: {}", e)))?;
        validate_url(&req.base_url)
            .map_err(|e| FlyerlinkError::validation(format!("Invalid base URL: {}", e)))?;

        if req.flyer_count == 0 || req.flyer_count > self.max_flyer_count {
            return Err(FlyerlinkError::validation(format!(
                "flyerCount must be between 1 and {}",
                self.max_flyer_count
            )));
        }

        req.qr_bounds.validate()?;

        if req.pdf_bytes.is_empty() {
            return Err(FlyerlinkError::validation("Empty PDF upload".to_string()));
        }

        Ok(())
    }
}
