//! Write operations for SeaOrmStorage.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{campaign_to_active_model, flyer_to_active_model, scan_to_active_model};
use crate::errors::{FlyerlinkError, Result};
use crate::storage::models::{Campaign, Flyer, Scan};

use migration::entities::{campaign, flyer, scan};

impl SeaOrmStorage {
    pub async fn insert_campaign(&self, c: &Campaign) -> Result<()> {
        campaign::Entity::insert(campaign_to_active_model(c))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!(
                    "Failed to insert campaign '{}': {}",
                    c.name, e
                ))
            })?;

        info!("Campaign created: {} ({})", c.name, c.id);
        Ok(())
    }

    pub async fn insert_flyer(&self, f: &Flyer) -> Result<()> {
        flyer::Entity::insert(flyer_to_active_model(f))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!(
                    "Failed to insert flyer #{} of campaign {}: {}",
                    f.seq, f.campaign_id, e
                ))
            })?;
        Ok(())
    }

    /// Fill in the generated artifacts after the PDF has been stamped and
    /// uploaded.
    pub async fn update_flyer_generated(
        &self,
        flyer_id: Uuid,
        tracking_url: &str,
        pdf_url: &str,
        s3_key: &str,
    ) -> Result<()> {
        let result = flyer::Entity::update_many()
            .col_expr(flyer::Column::TrackingUrl, Expr::value(tracking_url))
            .col_expr(flyer::Column::PdfUrl, Expr::value(pdf_url))
            .col_expr(flyer::Column::S3Key, Expr::value(s3_key))
            .filter(flyer::Column::Id.eq(flyer_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update flyer: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(FlyerlinkError::not_found(format!(
                "Flyer not found: {}",
                flyer_id
            )));
        }
        Ok(())
    }

    pub async fn update_campaign_target_url(&self, campaign_id: Uuid, url: &str) -> Result<()> {
        let result = campaign::Entity::update_many()
            .col_expr(campaign::Column::TargetUrl, Expr::value(url))
            .filter(campaign::Column::Id.eq(campaign_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update campaign: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(FlyerlinkError::not_found(format!(
                "Campaign not found: {}",
                campaign_id
            )));
        }

        info!("Campaign {} target URL updated", campaign_id);
        Ok(())
    }

    /// Cascade a campaign-level URL change to every flyer.
    pub async fn update_flyers_redirect_url(&self, campaign_id: Uuid, url: &str) -> Result<u64> {
        let result = flyer::Entity::update_many()
            .col_expr(flyer::Column::RedirectUrl, Expr::value(url))
            .filter(flyer::Column::CampaignId.eq(campaign_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update flyers: {}", e))
            })?;
        Ok(result.rows_affected)
    }

    pub async fn update_flyer_redirect_url(&self, flyer_id: Uuid, url: &str) -> Result<()> {
        let result = flyer::Entity::update_many()
            .col_expr(flyer::Column::RedirectUrl, Expr::value(url))
            .filter(flyer::Column::Id.eq(flyer_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update flyer: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(FlyerlinkError::not_found(format!(
                "Flyer not found: {}",
                flyer_id
            )));
        }
        Ok(())
    }

    /// Store the flyer's physical location and mark it as posted.
    pub async fn update_flyer_location(&self, flyer_id: Uuid, lat: f64, lng: f64) -> Result<()> {
        let result = flyer::Entity::update_many()
            .col_expr(flyer::Column::Lat, Expr::value(lat))
            .col_expr(flyer::Column::Lng, Expr::value(lng))
            .col_expr(flyer::Column::PostedAt, Expr::value(chrono::Utc::now()))
            .filter(flyer::Column::Id.eq(flyer_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update flyer: {}", e))
            })?;

        if result.rows_affected == 0 {
            return Err(FlyerlinkError::not_found(format!(
                "Flyer not found: {}",
                flyer_id
            )));
        }
        Ok(())
    }

    pub async fn insert_scan(&self, s: &Scan) -> Result<()> {
        scan::Entity::insert(scan_to_active_model(s))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to insert scan: {}", e))
            })?;
        Ok(())
    }

    pub async fn update_scan_location(&self, scan_id: Uuid, lat: f64, lng: f64) -> Result<()> {
        scan::Entity::update_many()
            .col_expr(scan::Column::Lat, Expr::value(lat))
            .col_expr(scan::Column::Lng, Expr::value(lng))
            .filter(scan::Column::Id.eq(scan_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update scan: {}", e))
            })?;
        Ok(())
    }

    /// Recompute both scan counters from the scans table.
    ///
    /// Counters are never incremented from a previously read value; the
    /// aggregate is the single source of truth, so concurrent scans cannot
    /// lose updates.
    pub async fn recompute_scan_counts(&self, flyer_id: Uuid, campaign_id: Uuid) -> Result<()> {
        let flyer_scans = self.count_scans_for_flyer(flyer_id).await? as i64;
        let campaign_scans = self.count_scans_for_campaign(campaign_id).await? as i64;

        flyer::Entity::update_many()
            .col_expr(flyer::Column::ScanCount, Expr::value(flyer_scans))
            .filter(flyer::Column::Id.eq(flyer_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update scan count: {}", e))
            })?;

        campaign::Entity::update_many()
            .col_expr(campaign::Column::ScanCount, Expr::value(campaign_scans))
            .filter(campaign::Column::Id.eq(campaign_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Failed to update scan count: {}", e))
            })?;

        Ok(())
    }
}
