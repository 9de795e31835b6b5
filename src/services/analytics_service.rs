//! Campaign analytics
//!
//! Read-only aggregation over already-fetched scan rows: per-day and
//! per-hour-of-day histograms, per-flyer totals and the coordinate list
//! for the scan map.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use uuid::Uuid;

use crate::storage::{Campaign, Flyer, Scan};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: NaiveDate,
    pub scans: u64,
}

/// Scans per hour of day, 0-23, across the whole campaign lifetime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour: u32,
    pub scans: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerTotal {
    pub flyer_id: Uuid,
    pub seq: i32,
    pub scans: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPoint {
    pub lat: f64,
    pub lng: f64,
    pub scanned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignAnalytics {
    pub campaign_id: Uuid,
    pub total_scans: u64,
    pub scans_by_day: Vec<DayBucket>,
    pub scans_by_hour: Vec<HourBucket>,
    pub flyer_totals: Vec<FlyerTotal>,
    pub coordinates: Vec<ScanPoint>,
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub fn build(campaign: &Campaign, flyers: &[Flyer], scans: &[Scan]) -> CampaignAnalytics {
        let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        let mut by_hour = [0u64; 24];
        let mut per_flyer: BTreeMap<Uuid, u64> = BTreeMap::new();
        let mut coordinates = Vec::new();

        for scan in scans {
            *by_day.entry(scan.scanned_at.date_naive()).or_default() += 1;
            by_hour[scan.scanned_at.hour() as usize] += 1;
            *per_flyer.entry(scan.flyer_id).or_default() += 1;

            if let (Some(lat), Some(lng)) = (scan.lat, scan.lng) {
                coordinates.push(ScanPoint {
                    lat,
                    lng,
                    scanned_at: scan.scanned_at,
                });
            }
        }

        // Every flyer appears in the totals, including never-scanned ones.
        let flyer_totals = flyers
            .iter()
            .map(|f| FlyerTotal {
                flyer_id: f.id,
                seq: f.seq,
                scans: per_flyer.get(&f.id).copied().unwrap_or(0),
            })
            .collect();

        CampaignAnalytics {
            campaign_id: campaign.id,
            total_scans: scans.len() as u64,
            scans_by_day: by_day
                .into_iter()
                .map(|(date, scans)| DayBucket { date, scans })
                .collect(),
            scans_by_hour: by_hour
                .iter()
                .enumerate()
                .map(|(hour, &scans)| HourBucket {
                    hour: hour as u32,
                    scans,
                })
                .collect(),
            flyer_totals,
            coordinates,
        }
    }
}
