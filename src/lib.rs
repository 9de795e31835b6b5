//! Flyerlink - QR flyer campaign tracking service
//!
//! Takes a flyer PDF, stamps every copy with a unique tracking QR code,
//! and attributes scans back to the physical flyer that earned them.
//!
//! # Architecture
//! - `pdf` / `qr`: QR rendering and PDF stamping/merging
//! - `token`: encrypted tracking tokens embedded in QR URLs
//! - `storage`: sea-orm backed persistence (campaigns, flyers, scans)
//! - `objectstore`: S3 storage for original and generated PDFs
//! - `services`: campaign pipeline, scan resolution, analytics
//! - `api`: HTTP endpoints and middleware
//! - `config`: Configuration management
//! - `system`: logging setup

pub mod api;
pub mod config;
pub mod errors;
pub mod objectstore;
pub mod pdf;
pub mod qr;
pub mod services;
pub mod storage;
pub mod system;
pub mod token;
pub mod utils;
