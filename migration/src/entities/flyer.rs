use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "flyers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub campaign_id: Uuid,
    /// Per-campaign sequence starting at 1; forms the short scan path
    /// together with the campaign name.
    pub seq: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub tracking_url: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub redirect_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub pdf_url: Option<String>,
    pub s3_key: Option<String>,
    pub scan_count: i64,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub posted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::campaign::Entity",
        from = "Column::CampaignId",
        to = "super::campaign::Column::Id"
    )]
    Campaign,
    #[sea_orm(has_many = "super::scan::Entity")]
    Scan,
}

impl Related<super::campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Campaign.def()
    }
}

impl Related<super::scan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
