#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the heatmap analysis service.
//!
//! Serves synthetic store traffic with zone clusters, ranked candidate
//! city sites with ROI projections, sampled visitor counters, and a
//! combined export report. A WebSocket endpoint at `/ws/realtime` receives
//! a fresh snapshot from a single shared ticker every push interval.

pub mod config;
mod handlers;
pub mod interactive;
pub mod push;
pub mod views;
mod ws;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

pub use config::{ConfigError, ServerConfig};
use push::PushHub;

/// Shared application state.
pub struct AppState {
    /// Runtime configuration.
    pub config: ServerConfig,
    /// Realtime listener registry.
    pub hub: PushHub,
}

/// Initializes `pretty_env_logger`.
///
/// `RUST_LOG` takes precedence; otherwise logs at `debug` when `debug` is
/// set and `info` when it is not.
pub fn init_logger(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(if debug {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Info
            });
        }
    }
    builder.init();
}

/// Registers every API route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::root))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/store/heatmap", web::get().to(handlers::store_heatmap))
                .route("/city/locations", web::get().to(handlers::city_locations))
                .route(
                    "/analytics/summary",
                    web::get().to(handlers::analytics_summary),
                )
                .route("/export/report", web::post().to(handlers::export_report)),
        )
        .route("/ws/realtime", web::get().to(ws::realtime));
}

fn cors(config: &ServerConfig) -> Cors {
    if config.cors_permissive() {
        return Cors::permissive();
    }

    config
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Starts the heatmap API server and the realtime push ticker.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let hub = PushHub::new();

    log::info!(
        "Starting push ticker (every {:?}, up to {} points)",
        config.push_interval,
        config.push_point_limit
    );
    actix_web::rt::spawn(push::run_ticker(
        hub.clone(),
        config.push_interval,
        config.push_point_limit,
    ));

    let bind_addr = config.bind_addr.clone();
    let port = config.port;
    let state = web::Data::new(AppState { config, hub });

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&state.config))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
