use std::sync::Arc;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use tracing::info;

use crate::core::error::AppError;
use crate::modules::gateways::models::{CallbackRequest, Gateway};
use crate::modules::gateways::repositories::GatewayRepository;
use crate::modules::gateways::services::{GatewayService, HostUrls, Redirect};
use crate::modules::payments::{PaymentId, PaymentRepository};

/// Shared state for the gateway routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GatewayService>,
    pub payments: Arc<dyn PaymentRepository>,
    pub gateways: Arc<dyn GatewayRepository>,
}

/// List all bundled payment gateway drivers
/// GET /gateways
pub async fn list_gateways(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.service.drivers())
}

/// Active gateway records with every adapter setting key present
/// GET /gateways/configured
pub async fn list_configured(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let mut configured = Vec::new();
    for mut gateway in state.gateways.list_active().await? {
        state.service.merge_config(&mut gateway)?;
        let mut settings: Vec<&str> = gateway.config.keys().collect();
        settings.sort_unstable();
        configured.push(serde_json::json!({
            "endpoint": gateway.endpoint,
            "environment": gateway.environment(),
            "settings": settings,
        }));
    }

    Ok(HttpResponse::Ok().json(configured))
}

/// Send the payer to the provider
/// GET /payment/process/{gateway}/{payment}
pub async fn process_gateway(
    path: web::Path<(String, PaymentId)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (endpoint, payment_id) = path.into_inner();
    let gateway = load_gateway(&state, &endpoint).await?;
    let payment = state
        .payments
        .find_by_id(payment_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Payment {}", payment_id)))?;

    let redirect = state.service.process_gateway(&gateway, &payment).await?;
    Ok(redirect_response(&redirect, state.service.urls()))
}

/// Provider webhook or payer return
/// GET|POST /payment/return/{gateway}
pub async fn return_gateway(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let endpoint = path.into_inner();
    info!(gateway = %endpoint, method = %req.method(), "Received gateway callback");

    let gateway = load_gateway(&state, &endpoint).await?;
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let report = match CallbackRequest::from_parts(req.query_string(), content_type, &body) {
        Ok(request) => state.service.return_gateway(&gateway, &request).await?,
        Err(e) => state.service.reject_callback(&gateway, e)?,
    };
    Ok(redirect_response(&report.redirect, state.service.urls()))
}

async fn load_gateway(state: &AppState, endpoint: &str) -> Result<Gateway, AppError> {
    state
        .gateways
        .find_by_endpoint(endpoint)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Gateway '{}' not found", endpoint)))
}

fn redirect_response(redirect: &Redirect, urls: &HostUrls) -> HttpResponse {
    match redirect.location(urls) {
        Some(location) => HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish(),
        None => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
    }
}

/// Configure gateway routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/gateways", web::get().to(list_gateways))
        .route("/gateways/configured", web::get().to(list_configured))
        .route(
            "/payment/process/{gateway}/{payment}",
            web::get().to(process_gateway),
        )
        .route("/payment/return/{gateway}", web::get().to(return_gateway))
        .route("/payment/return/{gateway}", web::post().to(return_gateway));
}
