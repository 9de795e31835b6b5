pub mod middleware;
pub mod services;

use actix_web::middleware::from_fn;
use actix_web::web;

use crate::api::middleware::AuthMiddleware;
use crate::api::services::{
    campaigns, health, location, location_prompt, process_pdf, redirect, signed_url,
};

/// Full route table, shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // The prompt page posts coordinates with no bearer token, so this
    // route must be registered before the authenticated /api scope:
    // route matching is first-wins and the scope would otherwise swallow
    // the whole /api prefix.
    cfg.route(
        "/api/update-location",
        web::post().to(location::update_location),
    )
    .service(
        web::scope("/api")
            .wrap(from_fn(AuthMiddleware::api_auth))
            .route("/process-pdf", web::post().to(process_pdf::process_pdf))
            .route("/campaigns/{id}", web::get().to(campaigns::get_campaign))
            .route(
                "/campaigns/{id}/analytics",
                web::get().to(campaigns::get_campaign_analytics),
            )
            .route(
                "/campaigns/{id}/update-url",
                web::post().to(campaigns::update_campaign_url),
            )
            .route(
                "/update-redirect-url",
                web::post().to(campaigns::update_redirect_url),
            )
            .route("/get-signed-url", web::post().to(signed_url::get_signed_url)),
    )
    // Remaining scan-facing endpoints, all public.
    .route(
        "/location-prompt",
        web::get().to(location_prompt::location_prompt),
    )
    .route("/health", web::get().to(health::HealthService::health_check))
    .route(
        "/r/{token}",
        web::get().to(redirect::RedirectService::handle_token),
    )
    .route(
        "/r/{campaign_name}/{seq}",
        web::get().to(redirect::RedirectService::handle_named),
    );
}
