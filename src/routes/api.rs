use std::path::PathBuf;

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

#[get("/health")]
pub fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// CORS preflight. Headers are added by the `Cors` fairing.
#[options("/<_path..>")]
pub fn preflight(_path: PathBuf) -> Status {
    Status::NoContent
}

pub fn routes() -> Vec<rocket::Route> {
    routes![health, preflight]
}
