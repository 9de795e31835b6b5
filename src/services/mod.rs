pub mod analytics_service;
pub mod campaign_service;
pub mod scan_service;

pub use analytics_service::{AnalyticsService, CampaignAnalytics};
pub use campaign_service::{
    CampaignDetail, CampaignService, CreateCampaignRequest, CreateCampaignResult, GeneratedFlyer,
};
pub use scan_service::{ScanOutcome, ScanService};
