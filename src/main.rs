use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod service;
mod store;

use crate::auth::gate::AccessGate;
use crate::docs::ApiDoc;
use crate::service::{AttendanceService, Dispatcher, EmployeeRepository};
use crate::store::postgres::PgStore;
use config::Config;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("loading configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, schema = %config.database_schema, "Server starting");

    let pool = db::connect(
        &config.database_url,
        &config.database_schema,
        config.database_max_connections,
    )
    .await
    .context("connecting to the database")?;
    db::bootstrap(&pool, &config.database_schema)
        .await
        .context("creating the attendance schema")?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let dispatcher = Data::new(Dispatcher::new(
        AttendanceService::new(store.clone()),
        EmployeeRepository::new(store),
    ));
    let gate = Data::new(AccessGate::from_config(&config));
    let pool = Data::new(pool);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard serves the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(pool.clone())
            .app_data(gate.clone())
            .app_data(dispatcher.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
