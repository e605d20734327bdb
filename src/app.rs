use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::Span;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, dashboard, profile, templates};

/// Hardening headers set on every routed response unless a handler already did.
const SECURITY_HEADERS: [(HeaderName, &str); 12] = [
    (
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        "same-origin",
    ),
    (HeaderName::from_static("origin-agent-cluster"), "?1"),
    (header::REFERRER_POLICY, "no-referrer"),
    (
        header::STRICT_TRANSPORT_SECURITY,
        "max-age=15552000; includeSubDomains",
    ),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_DNS_PREFETCH_CONTROL, "off"),
    (HeaderName::from_static("x-download-options"), "noopen"),
    (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
    (
        HeaderName::from_static("x-permitted-cross-domain-policies"),
        "none",
    ),
    (header::X_XSS_PROTECTION, "0"),
];

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(state.config.allowed_origin.clone());

    let mut app = Router::new()
        .route(
            "/",
            get(|| async { Json(json!({ "message": "AI Builder Server is running!" })) }),
        )
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(profile::router())
                .merge(dashboard::router())
                .merge(templates::router())
                .route(
                    "/status",
                    get(|| async { Json(json!({ "status": "API is working fine." })) }),
                )
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state);

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ));
    }

    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(request_span)
            .on_response(record_response),
    )
}

fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri(),
        status = tracing::field::Empty
    )
}

fn record_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", tracing::field::display(status));
    let latency_ms = latency.as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "response");
    } else {
        tracing::info!(%status, latency_ms, "response");
    }
}

/// Only the configured origin gets CORS headers; without one any origin does.
fn cors_layer(allowed_origin: Option<HeaderValue>) -> CorsLayer {
    let Some(origin) = allowed_origin else {
        return CorsLayer::permissive();
    };
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("parse listen address")?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
