#[macro_use]
extern crate rocket;

use std::sync::Arc;
use std::time::Duration;

use rocket::data::{Limits, ToByteUnit};
use rocket::fs::{FileServer, Options};
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use serde_json::{json, Value};

mod auth;
mod boot;
mod bootstrap;
mod config;
mod cors;
mod db;
mod error;
mod models;
mod routes;
mod store;
mod tasks;
mod uploads;


use config::AppConfig;
use db::DbPool;
use store::sqlite::SqliteSessionStore;
use store::SessionStore;

fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "error": message }))
}

#[catch(400)]
fn bad_request() -> Json<Value> {
    error_body("Requisição inválida.")
}

/// Unparseable forms and bodies are reported as plain 400s.
#[catch(422)]
fn unprocessable() -> status::Custom<Json<Value>> {
    status::Custom(Status::BadRequest, error_body("Requisição inválida."))
}

/// Error responses drop cookies set by guards, so a stale session cookie is
/// cleared here.
#[catch(401)]
fn unauthorized(req: &Request<'_>) -> Json<Value> {
    if auth::session_token(req.cookies()).is_some() {
        auth::clear_session_cookie(req.cookies());
    }
    error_body("Login necessário.")
}

#[catch(404)]
fn not_found() -> Json<Value> {
    error_body("Não encontrado.")
}

#[catch(413)]
fn payload_too_large() -> Json<Value> {
    error_body("Arquivo muito grande.")
}

/// Client-facing message for statuses without a dedicated catcher.
fn fallback_message(status: Status) -> &'static str {
    if status.code >= 500 {
        "Erro interno."
    } else {
        "Requisição inválida."
    }
}

#[catch(default)]
fn server_error(status: Status, _req: &Request<'_>) -> status::Custom<Json<Value>> {
    status::Custom(status, error_body(fallback_message(status)))
}

/// Assembles the server around an already migrated pool.
pub fn build(config: AppConfig, pool: DbPool) -> Rocket<Build> {
    let sessions: Arc<dyn SessionStore> =
        Arc::new(SqliteSessionStore::new(pool.clone(), config.session_ttl()));

    let upload_limit = config.upload_limit_mb.mebibytes();
    let limits = Limits::default()
        .limit("file", upload_limit)
        .limit("data-form", upload_limit + 1.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
        .merge(("secret_key", config.secret_key_hex()))
        .merge(("limits", limits));

    let uploads = FileServer::new(&config.uploads_dir, Options::Missing).rank(9);
    let public = FileServer::new(&config.public_dir, Options::Index | Options::Missing);

    rocket::custom(figment)
        .attach(cors::Cors::new(config.allowed_origin.clone()))
        .attach(tasks::SessionCleanup {
            interval: Duration::from_secs(config.session_cleanup_minutes * 60),
        })
        .manage(pool)
        .manage(sessions)
        .manage(config)
        .mount("/api", routes::routes())
        .mount("/uploads", uploads)
        .mount("/", public)
        .register(
            "/",
            catchers![
                bad_request,
                unprocessable,
                unauthorized,
                not_found,
                payload_too_large,
                server_error
            ],
        )
}

#[launch]
fn rocket() -> _ {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    // Boot check: verify/create directories
    boot::run(&config);

    let pool = db::init_pool(&config.database_path, config.db_pool_size)
        .expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");

    if let Err(e) = bootstrap::ensure_env_admin(&pool, &config) {
        log::error!("[boot] Admin bootstrap failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = SqliteSessionStore::new(pool.clone(), config.session_ttl()).purge_expired() {
        log::warn!("[boot] Could not purge expired sessions: {}", e);
    }

    log::info!("API listening on http://{}:{}", config.address, config.port);
    log::info!("Health: http://{}:{}/api/health", config.address, config.port);

    build(config, pool)
}
