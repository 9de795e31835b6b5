use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::config::get_config;

pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Bearer token auth for the management API.
    ///
    /// An empty configured token disables the surface entirely (404), so
    /// an unconfigured deployment never exposes the pipeline endpoints.
    pub async fn api_auth(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        if req.method() == actix_web::http::Method::OPTIONS {
            return Ok(req.into_response(HttpResponse::NoContent().finish()));
        }

        let api_token = &get_config().tracking.api_token;

        if api_token.is_empty() {
            return Ok(req.into_response(
                HttpResponse::NotFound()
                    .insert_header(("Content-Type", "text/html; charset=utf-8"))
                    .body("Not Found"),
            ));
        }

        if let Some(auth_header) = req.headers().get("Authorization")
            && let Some(auth_bytes) = auth_header.as_bytes().strip_prefix(b"Bearer ")
            && bool::from(auth_bytes.ct_eq(api_token.as_bytes()))
        {
            debug!("Management API authentication succeeded");
            return next.call(req).await;
        }

        info!("Management API authentication failed: token mismatch or missing header");
        Ok(req.into_response(
            HttpResponse::Unauthorized()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(serde_json::json!({
                    "code": 1001,
                    "message": "Unauthorized: invalid or missing token",
                    "data": null
                })),
        ))
    }
}
