use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaign::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaign::Owner).string().not_null())
                    .col(
                        ColumnDef::new(Campaign::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Campaign::TargetUrl).text().not_null())
                    .col(ColumnDef::new(Campaign::PdfUrl).text().not_null())
                    .col(ColumnDef::new(Campaign::S3Key).string().not_null())
                    .col(ColumnDef::new(Campaign::FlyerCount).integer().not_null())
                    .col(
                        ColumnDef::new(Campaign::ScanCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Campaign::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Flyer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Flyer::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Flyer::CampaignId).uuid().not_null())
                    .col(ColumnDef::new(Flyer::Seq).integer().not_null())
                    .col(ColumnDef::new(Flyer::TrackingUrl).text().null())
                    .col(ColumnDef::new(Flyer::RedirectUrl).text().not_null())
                    .col(ColumnDef::new(Flyer::PdfUrl).text().null())
                    .col(ColumnDef::new(Flyer::S3Key).string().null())
                    .col(
                        ColumnDef::new(Flyer::ScanCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Flyer::Lat).double().null())
                    .col(ColumnDef::new(Flyer::Lng).double().null())
                    .col(
                        ColumnDef::new(Flyer::PostedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Flyer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_flyers_campaign")
                            .from(Flyer::Table, Flyer::CampaignId)
                            .to(Campaign::Table, Campaign::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_flyers_campaign_seq")
                    .table(Flyer::Table)
                    .col(Flyer::CampaignId)
                    .col(Flyer::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scan::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scan::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Scan::FlyerId).uuid().not_null())
                    .col(ColumnDef::new(Scan::CampaignId).uuid().not_null())
                    .col(
                        ColumnDef::new(Scan::ScannedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scan::Lat).double().null())
                    .col(ColumnDef::new(Scan::Lng).double().null())
                    .col(ColumnDef::new(Scan::RedirectUrl).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_flyer")
                            .from(Scan::Table, Scan::FlyerId)
                            .to(Flyer::Table, Flyer::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scans_campaign")
                            .from(Scan::Table, Scan::CampaignId)
                            .to(Campaign::Table, Campaign::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scan::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Flyer::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Campaign {
    #[sea_orm(iden = "campaigns")]
    Table,
    Id,
    Owner,
    Name,
    TargetUrl,
    PdfUrl,
    S3Key,
    FlyerCount,
    ScanCount,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Flyer {
    #[sea_orm(iden = "flyers")]
    Table,
    Id,
    CampaignId,
    Seq,
    TrackingUrl,
    RedirectUrl,
    PdfUrl,
    S3Key,
    ScanCount,
    Lat,
    Lng,
    PostedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Scan {
    #[sea_orm(iden = "scans")]
    Table,
    Id,
    FlyerId,
    CampaignId,
    ScannedAt,
    Lat,
    Lng,
    RedirectUrl,
}
