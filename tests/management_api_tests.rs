//! Management API tests
//!
//! Full HTTP round trips against the bearer-protected surface, with the
//! token injected through the environment before the config is read.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Once;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tempfile::TempDir;
use tokio::sync::RwLock;
use uuid::Uuid;

use flyerlink::api;
use flyerlink::api::services::health::AppStartTime;
use flyerlink::config::init_config;
use flyerlink::errors::{FlyerlinkError, Result};
use flyerlink::objectstore::{ObjectStore, StoredObject};
use flyerlink::services::{CampaignService, ScanService};
use flyerlink::storage::backend::{connect_sqlite, run_migrations};
use flyerlink::storage::{Scan, SeaOrmStorage};
use flyerlink::token::TokenCodec;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();
static TEST_DIR: std::sync::OnceLock<TempDir> = std::sync::OnceLock::new();
static STORAGE: std::sync::OnceLock<Arc<SeaOrmStorage>> = std::sync::OnceLock::new();
static OBJECTS: std::sync::OnceLock<Arc<MockObjectStore>> = std::sync::OnceLock::new();
static DB_INIT: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

const TEST_TOKEN: &str = "management-test-token";
const TEST_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

async fn init_test_env() {
    INIT.call_once(|| {
        unsafe {
            std::env::set_var("FL__TRACKING__API_TOKEN", TEST_TOKEN);
        }
        init_config();
    });

    DB_INIT
        .get_or_init(|| async {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join("management_test.db");
            let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

            let db = connect_sqlite(&db_url)
                .await
                .expect("Failed to connect to SQLite");
            run_migrations(&db)
                .await
                .expect("Failed to run migrations");

            let _ = STORAGE.set(Arc::new(SeaOrmStorage::from_connection(db, "sqlite")));
            let _ = OBJECTS.set(Arc::new(MockObjectStore::new()));
            let _ = TEST_DIR.set(temp_dir);
        })
        .await;
}

fn get_storage() -> Arc<SeaOrmStorage> {
    STORAGE.get().expect("Storage not initialized").clone()
}

fn get_objects() -> Arc<MockObjectStore> {
    OBJECTS.get().expect("Objects not initialized").clone()
}

struct MockObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MockObjectStore {
    fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_pdf(&self, name: &str, body: Bytes) -> Result<StoredObject> {
        let key = format!("pdfs/{}", name);
        self.objects.write().await.insert(key.clone(), body.to_vec());
        Ok(StoredObject {
            url: format!("https://bucket.test/{}", key),
            key,
        })
    }

    async fn signed_url(&self, key: &str) -> Result<String> {
        if self.objects.read().await.contains_key(key) {
            Ok(format!("https://bucket.test/{}?sig=test", key))
        } else {
            Err(FlyerlinkError::object_not_found(format!(
                "No such key: {}",
                key
            )))
        }
    }
}

fn campaign_service() -> Arc<CampaignService> {
    let tokens = Arc::new(TokenCodec::from_base64_key(TEST_KEY).expect("test key"));
    Arc::new(CampaignService::new(
        get_storage(),
        get_objects(),
        tokens,
        4,
        500,
    ))
}

fn scan_service() -> Arc<ScanService> {
    let tokens = Arc::new(TokenCodec::from_base64_key(TEST_KEY).expect("test key"));
    Arc::new(ScanService::new(get_storage(), tokens))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(get_storage()))
                .app_data(web::Data::new(get_objects() as Arc<dyn ObjectStore>))
                .app_data(web::Data::new(campaign_service()))
                .app_data(web::Data::new(scan_service()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: Utc::now(),
                }))
                .configure(api::configure),
        )
        .await
    };
}

fn auth() -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", TEST_TOKEN))
}

fn base_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        Content { operations: vec![] }.encode().expect("encode"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save pdf");
    out
}

const BOUNDARY: &str = "----flyerlinktestboundary";

fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> (String, Vec<u8>) {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(bytes) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"flyer.pdf\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}

fn standard_fields(name: &str) -> Vec<(&'static str, String)> {
    vec![
        ("baseUrl", "https://fly.example".to_string()),
        ("targetUrl", "https://shop.example/landing".to_string()),
        ("campaignName", name.to_string()),
        ("flyerCount", "2".to_string()),
        (
            "qrBounds",
            r#"{"x":450.0,"y":50.0,"width":120.0,"height":120.0}"#.to_string(),
        ),
    ]
}

// =============================================================================
// process-pdf
// =============================================================================

#[actix_rt::test]
async fn test_process_pdf_creates_campaign() {
    init_test_env().await;
    let app = test_app!();

    let fields = standard_fields("http-upload");
    let field_refs: Vec<(&str, &str)> = fields.iter().map(|(n, v)| (*n, v.as_str())).collect();
    let (content_type, body) = multipart_body(&field_refs, Some(&base_pdf()));

    let req = TestRequest::post()
        .uri("/api/process-pdf")
        .insert_header(auth())
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["campaign"]["name"], "http-upload");
    assert_eq!(body["data"]["flyers"].as_array().expect("flyers").len(), 2);
    assert!(
        body["data"]["mergedPdfUrl"]
            .as_str()
            .expect("merged url")
            .contains("sig=")
    );
    for flyer in body["data"]["flyers"].as_array().expect("flyers") {
        assert!(
            flyer["trackingUrl"]
                .as_str()
                .expect("tracking url")
                .starts_with("https://fly.example/r/")
        );
        assert!(flyer["signedUrl"].as_str().expect("signed url").len() > 0);
    }
}

#[actix_rt::test]
async fn test_process_pdf_missing_fields_is_bad_request() {
    init_test_env().await;
    let app = test_app!();

    // No flyerCount.
    let (content_type, body) = multipart_body(
        &[
            ("baseUrl", "https://fly.example"),
            ("targetUrl", "https://shop.example"),
            ("campaignName", "missing-count"),
        ],
        Some(&base_pdf()),
    );

    let req = TestRequest::post()
        .uri("/api/process-pdf")
        .insert_header(auth())
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_process_pdf_without_file_is_bad_request() {
    init_test_env().await;
    let app = test_app!();

    let fields = standard_fields("no-file");
    let field_refs: Vec<(&str, &str)> = fields.iter().map(|(n, v)| (*n, v.as_str())).collect();
    let (content_type, body) = multipart_body(&field_refs, None);

    let req = TestRequest::post()
        .uri("/api/process-pdf")
        .insert_header(auth())
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_process_pdf_defaults_base_url_from_config() {
    init_test_env().await;
    let app = test_app!();

    // No baseUrl field: tracking links fall back to tracking.public_base_url.
    let (content_type, body) = multipart_body(
        &[
            ("targetUrl", "https://shop.example/landing"),
            ("campaignName", "default-base-url"),
            ("flyerCount", "1"),
            (
                "qrBounds",
                r#"{"x":450.0,"y":50.0,"width":120.0,"height":120.0}"#,
            ),
        ],
        Some(&base_pdf()),
    );

    let req = TestRequest::post()
        .uri("/api/process-pdf")
        .insert_header(auth())
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(
        body["data"]["flyers"].as_array().expect("flyers")[0]["trackingUrl"]
            .as_str()
            .expect("tracking url")
            .starts_with("http://localhost:8080/r/")
    );
}

// =============================================================================
// Campaign reads
// =============================================================================

#[actix_rt::test]
async fn test_get_campaign_detail() {
    init_test_env().await;
    let app = test_app!();

    let result = campaign_service()
        .create(flyerlink::services::CreateCampaignRequest {
            owner: "tester".to_string(),
            name: "detail-read".to_string(),
            base_url: "https://fly.example".to_string(),
            target_url: "https://shop.example/landing".to_string(),
            flyer_count: 2,
            qr_bounds: flyerlink::pdf::QrBounds {
                x: 450.0,
                y: 50.0,
                width: 120.0,
                height: 120.0,
            },
            pdf_bytes: Bytes::from(base_pdf()),
        })
        .await
        .expect("create");

    let req = TestRequest::get()
        .uri(&format!("/api/campaigns/{}", result.campaign.id))
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["campaign"]["name"], "detail-read");
    assert_eq!(body["data"]["flyers"].as_array().expect("flyers").len(), 2);
    assert_eq!(
        body["data"]["scanData"].as_array().expect("scans").len(),
        0
    );
}

#[actix_rt::test]
async fn test_get_unknown_campaign_is_not_found() {
    init_test_env().await;
    let app = test_app!();

    let req = TestRequest::get()
        .uri(&format!("/api/campaigns/{}", Uuid::new_v4()))
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_campaign_analytics_endpoint() {
    init_test_env().await;
    let app = test_app!();
    let storage = get_storage();

    let result = campaign_service()
        .create(flyerlink::services::CreateCampaignRequest {
            owner: "tester".to_string(),
            name: "analytics-read".to_string(),
            base_url: "https://fly.example".to_string(),
            target_url: "https://shop.example/landing".to_string(),
            flyer_count: 1,
            qr_bounds: flyerlink::pdf::QrBounds {
                x: 450.0,
                y: 50.0,
                width: 120.0,
                height: 120.0,
            },
            pdf_bytes: Bytes::from(base_pdf()),
        })
        .await
        .expect("create");

    let flyer_id = result.flyers[0].flyer.id;
    for _ in 0..2 {
        storage
            .insert_scan(&Scan {
                id: Uuid::new_v4(),
                flyer_id,
                campaign_id: result.campaign.id,
                scanned_at: Utc::now(),
                lat: Some(52.37),
                lng: Some(4.89),
                redirect_url: "https://shop.example/landing".to_string(),
            })
            .await
            .expect("scan");
    }

    let req = TestRequest::get()
        .uri(&format!("/api/campaigns/{}/analytics", result.campaign.id))
        .insert_header(auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["totalScans"], 2);
    assert_eq!(
        body["data"]["coordinates"]
            .as_array()
            .expect("coords")
            .len(),
        2
    );
    assert_eq!(
        body["data"]["flyerTotals"].as_array().expect("totals")[0]["scans"],
        2
    );
}

// =============================================================================
// URL updates
// =============================================================================

#[actix_rt::test]
async fn test_update_campaign_url_endpoint() {
    init_test_env().await;
    let app = test_app!();

    let result = campaign_service()
        .create(flyerlink::services::CreateCampaignRequest {
            owner: "tester".to_string(),
            name: "url-update".to_string(),
            base_url: "https://fly.example".to_string(),
            target_url: "https://shop.example/old".to_string(),
            flyer_count: 1,
            qr_bounds: flyerlink::pdf::QrBounds {
                x: 450.0,
                y: 50.0,
                width: 120.0,
                height: 120.0,
            },
            pdf_bytes: Bytes::from(base_pdf()),
        })
        .await
        .expect("create");

    let req = TestRequest::post()
        .uri(&format!("/api/campaigns/{}/update-url", result.campaign.id))
        .insert_header(auth())
        .set_json(serde_json::json!({ "url": "https://shop.example/new" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let flyers = get_storage()
        .flyers_for_campaign(result.campaign.id)
        .await
        .expect("flyers");
    assert_eq!(flyers[0].redirect_url, "https://shop.example/new");
}

#[actix_rt::test]
async fn test_update_redirect_url_rejects_bad_scheme() {
    init_test_env().await;
    let app = test_app!();

    let req = TestRequest::post()
        .uri("/api/update-redirect-url")
        .insert_header(auth())
        .set_json(serde_json::json!({
            "flyerId": Uuid::new_v4(),
            "newUrl": "javascript:alert(1)"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Location reporting stays public
// =============================================================================

#[actix_rt::test]
async fn test_update_location_needs_no_bearer_token() {
    init_test_env().await;
    let app = test_app!();

    let result = campaign_service()
        .create(flyerlink::services::CreateCampaignRequest {
            owner: "tester".to_string(),
            name: "public-location".to_string(),
            base_url: "https://fly.example".to_string(),
            target_url: "https://shop.example/landing".to_string(),
            flyer_count: 1,
            qr_bounds: flyerlink::pdf::QrBounds {
                x: 450.0,
                y: 50.0,
                width: 120.0,
                height: 120.0,
            },
            pdf_bytes: Bytes::from(base_pdf()),
        })
        .await
        .expect("create");
    let flyer = &result.flyers[0].flyer;

    // The prompt page runs in the visitor's browser and carries no
    // Authorization header, even with the management API enabled.
    let req = TestRequest::post()
        .uri("/api/update-location")
        .set_json(serde_json::json!({
            "flyerId": flyer.id,
            "campaignId": result.campaign.id,
            "lat": 52.37,
            "lng": 4.89
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let stored = get_storage()
        .get_flyer(flyer.id)
        .await
        .expect("query")
        .expect("flyer");
    assert_eq!(stored.lat, Some(52.37));
    assert_eq!(stored.lng, Some(4.89));
}

// =============================================================================
// Signed URLs
// =============================================================================

#[actix_rt::test]
async fn test_get_signed_url_for_known_key() {
    init_test_env().await;
    let app = test_app!();

    get_objects()
        .put_pdf("stored.pdf", Bytes::from_static(b"%PDF-stub"))
        .await
        .expect("put");

    let req = TestRequest::post()
        .uri("/api/get-signed-url")
        .insert_header(auth())
        .set_json(serde_json::json!({ "s3Key": "pdfs/stored.pdf" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(
        body["data"]["signedUrl"]
            .as_str()
            .expect("url")
            .contains("pdfs/stored.pdf")
    );
}

#[actix_rt::test]
async fn test_get_signed_url_for_missing_key_is_not_found() {
    init_test_env().await;
    let app = test_app!();

    let req = TestRequest::post()
        .uri("/api/get-signed-url")
        .insert_header(auth())
        .set_json(serde_json::json!({ "s3Key": "pdfs/never-uploaded.pdf" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
