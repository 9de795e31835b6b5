//! Entity/domain conversions for the sea-orm backend.

use sea_orm::ActiveValue::Set;

use crate::storage::models::{Campaign, Flyer, Scan};
use migration::entities::{campaign, flyer, scan};

pub fn campaign_from_model(model: campaign::Model) -> Campaign {
    Campaign {
        id: model.id,
        owner: model.owner,
        name: model.name,
        target_url: model.target_url,
        pdf_url: model.pdf_url,
        s3_key: model.s3_key,
        flyer_count: model.flyer_count,
        scan_count: model.scan_count,
        created_at: model.created_at,
    }
}

pub fn campaign_to_active_model(c: &Campaign) -> campaign::ActiveModel {
    campaign::ActiveModel {
        id: Set(c.id),
        owner: Set(c.owner.clone()),
        name: Set(c.name.clone()),
        target_url: Set(c.target_url.clone()),
        pdf_url: Set(c.pdf_url.clone()),
        s3_key: Set(c.s3_key.clone()),
        flyer_count: Set(c.flyer_count),
        scan_count: Set(c.scan_count),
        created_at: Set(c.created_at),
    }
}

pub fn flyer_from_model(model: flyer::Model) -> Flyer {
    Flyer {
        id: model.id,
        campaign_id: model.campaign_id,
        seq: model.seq,
        tracking_url: model.tracking_url,
        redirect_url: model.redirect_url,
        pdf_url: model.pdf_url,
        s3_key: model.s3_key,
        scan_count: model.scan_count,
        lat: model.lat,
        lng: model.lng,
        posted_at: model.posted_at,
        created_at: model.created_at,
    }
}

pub fn flyer_to_active_model(f: &Flyer) -> flyer::ActiveModel {
    flyer::ActiveModel {
        id: Set(f.id),
        campaign_id: Set(f.campaign_id),
        seq: Set(f.seq),
        tracking_url: Set(f.tracking_url.clone()),
        redirect_url: Set(f.redirect_url.clone()),
        pdf_url: Set(f.pdf_url.clone()),
        s3_key: Set(f.s3_key.clone()),
        scan_count: Set(f.scan_count),
        lat: Set(f.lat),
        lng: Set(f.lng),
        posted_at: Set(f.posted_at),
        created_at: Set(f.created_at),
    }
}

pub fn scan_from_model(model: scan::Model) -> Scan {
    Scan {
        id: model.id,
        flyer_id: model.flyer_id,
        campaign_id: model.campaign_id,
        scanned_at: model.scanned_at,
        lat: model.lat,
        lng: model.lng,
        redirect_url: model.redirect_url,
    }
}

pub fn scan_to_active_model(s: &Scan) -> scan::ActiveModel {
    scan::ActiveModel {
        id: Set(s.id),
        flyer_id: Set(s.flyer_id),
        campaign_id: Set(s.campaign_id),
        scanned_at: Set(s.scanned_at),
        lat: Set(s.lat),
        lng: Set(s.lng),
        redirect_url: Set(s.redirect_url.clone()),
    }
}
