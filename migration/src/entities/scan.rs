use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub flyer_id: Uuid,
    pub campaign_id: Uuid,
    pub scanned_at: DateTimeUtc,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Redirect URL in effect at scan time.
    #[sea_orm(column_type = "Text")]
    pub redirect_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::flyer::Entity",
        from = "Column::FlyerId",
        to = "super::flyer::Column::Id"
    )]
    Flyer,
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id"
    )]
    Campaign,
}

impl Related<super::flyer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flyer.def()
    }
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
