use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Counter recomputation and the analytics view both aggregate over
        // scans by flyer, by campaign and by time.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_flyer")
                    .table(Scan::Table)
                    .col(Scan::FlyerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_campaign")
                    .table(Scan::Table)
                    .col(Scan::CampaignId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scans_scanned_at")
                    .table(Scan::Table)
                    .col(Scan::ScannedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_scans_scanned_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scans_campaign").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_scans_flyer").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Scan {
    #[sea_orm(iden = "scans")]
    Table,
    FlyerId,
    CampaignId,
    ScannedAt,
}
