use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use tracing::info;

use flyerlink::api;
use flyerlink::api::services::health::AppStartTime;
use flyerlink::config::init_config;
use flyerlink::errors::FlyerlinkError;
use flyerlink::objectstore::ObjectStoreFactory;
use flyerlink::services::{CampaignService, ScanService};
use flyerlink::storage::SeaOrmStorage;
use flyerlink::system::logging::init_logging;
use flyerlink::token::TokenCodec;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenvy::dotenv().ok();
    let config = init_config();
    let _guard = init_logging(config);

    let storage = SeaOrmStorage::new(&config.database.database_url, &config.database.backend)
        .await
        .map_err(into_io)?;
    let storage = Arc::new(storage);
    info!("Using storage backend: {}", storage.backend_name());

    let objects = ObjectStoreFactory::create(&config.object_store)
        .await
        .map_err(into_io)?;
    info!("Object store ready: bucket {}", config.object_store.bucket);

    let tokens = Arc::new(TokenCodec::from_base64_key(&config.tracking.token_key).map_err(into_io)?);

    let campaign_service = Arc::new(CampaignService::new(
        storage.clone(),
        objects.clone(),
        tokens.clone(),
        config.tracking.qr_module_px,
        config.tracking.max_flyer_count,
    ));
    let scan_service = Arc::new(ScanService::new(storage.clone(), tokens));

    if config.tracking.api_token.is_empty() {
        info!("Management API is disabled (tracking.api_token is empty)");
    } else {
        info!("Management API enabled under /api");
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(objects.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(scan_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(api::configure)
    })
    .workers(config.server.cpu_count)
    .bind(bind_address)?
    .run()
    .await
}

fn into_io(err: FlyerlinkError) -> std::io::Error {
    eprintln!("{}", err.format_colored());
    std::io::Error::other(err.format_simple())
}
