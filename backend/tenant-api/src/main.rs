use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use tenant_api::config::Settings;
use tenant_api::{configure, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=debug".into());

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let settings = Settings::load().context("Failed to load configuration")?;
    let state = web::Data::new(AppState::from_settings(&settings).await?);

    if settings.keys.is_production() {
        info!("Signing key source: secrets manager");
    } else {
        tracing::warn!("Signing key source: static development key");
    }
    if settings.server.emulate_edge {
        tracing::warn!("Edge emulation enabled: tenant context verified in-process");
    }
    info!(
        invalidation_enabled = state.invalidator.config().enabled,
        "CDN invalidation configured"
    );

    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);
    info!("Starting tenant-api on {}", bind_address);

    let origins = settings.server.cors_allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials()
            .max_age(3600);
        for origin in &origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure(state.clone()))
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server error")
}
