use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: String,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub target_url: String,
    #[sea_orm(column_type = "Text")]
    pub pdf_url: String,
    pub s3_key: String,
    pub flyer_count: i32,
    pub scan_count: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::flyer::Entity")]
    Flyer,
    #[sea_orm(has_many = "super::scan::Entity")]
    Scan,
}

impl Related<super::flyer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flyer.def()
    }
}

impl Related<super::scan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
