//! Backend entry-point: wires the catalog REST endpoints, the document
//! store client, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use greenbasket_backend::ApiDoc;
use greenbasket_backend::inbound::http::health::HealthState;
use greenbasket_backend::inbound::http::{self, HttpState};
use greenbasket_backend::outbound::persistence::{
    MongoCatalogRepository, MongoReferenceRepository, connect,
};

/// Command-line configuration with environment fallbacks.
#[derive(Debug, Parser)]
#[command(name = "greenbasket-backend", about = "Grocery catalog REST API")]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
    /// Document store URI; falls back to `MONGODB_URI`.
    #[arg(long)]
    store_uri: Option<String>,
    /// Database name; falls back to `GREENBASKET_DB`.
    #[arg(long)]
    database: Option<String>,
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let uri = cli
        .store_uri
        .or_else(|| env::var("MONGODB_URI").ok())
        .unwrap_or_else(|| "mongodb://localhost:27017".to_owned());
    let database = cli
        .database
        .or_else(|| env::var("GREENBASKET_DB").ok())
        .unwrap_or_else(|| "greenbasket".to_owned());

    let db = connect(&uri, &database)
        .await
        .map_err(|e| std::io::Error::other(format!("store client init failed: {e}")))?;
    info!(database = %database, "store client initialised");

    let references = Arc::new(MongoReferenceRepository::new(db.clone()));
    let catalog = Arc::new(MongoCatalogRepository::new(db));
    let state = web::Data::new(HttpState::new(references, catalog));
    let health_state = web::Data::new(HealthState::new());

    // Clones for the server factory; the originals stay for readiness.
    let server_state = state.clone();
    let server_health = health_state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_state.clone())
            .app_data(server_health.clone())
            .configure(http::routes);
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(cli.bind.as_str())?;

    // Fail liveness probes as soon as shutdown begins so orchestrators
    // stop routing to a draining instance.
    let draining = health_state.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            draining.mark_unhealthy();
        }
    });

    health_state.mark_ready();
    server.run().await
}
