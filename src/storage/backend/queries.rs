//! Read operations for SeaOrmStorage.

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{campaign_from_model, flyer_from_model, scan_from_model};
use crate::errors::{FlyerlinkError, Result};
use crate::storage::models::{Campaign, Flyer, Scan};

use migration::entities::{campaign, flyer, scan};

impl SeaOrmStorage {
    pub async fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>> {
        let model = campaign::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Campaign lookup failed: {}", e))
            })?;
        Ok(model.map(campaign_from_model))
    }

    pub async fn get_campaign_by_name(&self, name: &str) -> Result<Option<Campaign>> {
        let model = campaign::Entity::find()
            .filter(campaign::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Campaign lookup failed: {}", e))
            })?;
        Ok(model.map(campaign_from_model))
    }

    pub async fn get_flyer(&self, id: Uuid) -> Result<Option<Flyer>> {
        let model = flyer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Flyer lookup failed: {}", e))
            })?;
        Ok(model.map(flyer_from_model))
    }

    /// Lookup for the `/r/{campaign_name}/{seq}` scan path.
    pub async fn get_flyer_by_campaign_seq(
        &self,
        campaign_id: Uuid,
        seq: i32,
    ) -> Result<Option<Flyer>> {
        let model = flyer::Entity::find()
            .filter(flyer::Column::CampaignId.eq(campaign_id))
            .filter(flyer::Column::Seq.eq(seq))
            .one(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Flyer lookup failed: {}", e))
            })?;
        Ok(model.map(flyer_from_model))
    }

    /// All flyers of a campaign in sequence order.
    pub async fn flyers_for_campaign(&self, campaign_id: Uuid) -> Result<Vec<Flyer>> {
        let models = flyer::Entity::find()
            .filter(flyer::Column::CampaignId.eq(campaign_id))
            .order_by_asc(flyer::Column::Seq)
            .all(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Flyer listing failed: {}", e))
            })?;
        Ok(models.into_iter().map(flyer_from_model).collect())
    }

    /// All scans of a campaign, newest first.
    pub async fn scans_for_campaign(&self, campaign_id: Uuid) -> Result<Vec<Scan>> {
        let models = scan::Entity::find()
            .filter(scan::Column::CampaignId.eq(campaign_id))
            .order_by_desc(scan::Column::ScannedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Scan listing failed: {}", e))
            })?;
        Ok(models.into_iter().map(scan_from_model).collect())
    }

    pub async fn count_scans_for_flyer(&self, flyer_id: Uuid) -> Result<u64> {
        scan::Entity::find()
            .filter(scan::Column::FlyerId.eq(flyer_id))
            .count(&self.db)
            .await
            .map_err(|e| FlyerlinkError::database_operation(format!("Scan count failed: {}", e)))
    }

    pub async fn count_scans_for_campaign(&self, campaign_id: Uuid) -> Result<u64> {
        scan::Entity::find()
            .filter(scan::Column::CampaignId.eq(campaign_id))
            .count(&self.db)
            .await
            .map_err(|e| FlyerlinkError::database_operation(format!("Scan count failed: {}", e)))
    }

    /// Most recent scan of a flyer that has no coordinates yet.
    pub async fn latest_unlocated_scan(&self, flyer_id: Uuid) -> Result<Option<Scan>> {
        let model = scan::Entity::find()
            .filter(scan::Column::FlyerId.eq(flyer_id))
            .filter(scan::Column::Lat.is_null())
            .order_by_desc(scan::Column::ScannedAt)
            .one(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Scan lookup failed: {}", e))
            })?;
        Ok(model.map(scan_from_model))
    }

    /// Campaign count, used by the health check.
    pub async fn count_campaigns(&self) -> Result<u64> {
        campaign::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| {
                FlyerlinkError::database_operation(format!("Campaign count failed: {}", e))
            })
    }
}
