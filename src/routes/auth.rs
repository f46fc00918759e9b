use std::sync::Arc;

use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, AdminSession};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::admin::Admin;
use crate::models::non_blank;
use crate::store::SessionStore;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    fn credentials(self) -> Option<(String, String)> {
        Some((non_blank(self.username)?, non_blank(self.password)?))
    }
}

/// A missing or unparseable body is reported the same as missing fields.
#[post("/admin/login", data = "<body>")]
pub fn login(
    body: Option<Json<LoginRequest>>,
    pool: &State<DbPool>,
    sessions: &State<Arc<dyn SessionStore>>,
    config: &State<AppConfig>,
    cookies: &CookieJar<'_>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = body
        .and_then(|b| b.into_inner().credentials())
        .ok_or_else(|| ApiError::validation("Campos obrigatórios."))?;

    let invalid = || ApiError::unauthorized("Usuário ou senha inválidos.");

    let admin = Admin::find_by_username(pool, &username)
        .map_err(|e| ApiError::internal("Erro no login.", e))?
        .ok_or_else(invalid)?;

    if !auth::verify_password(&password, &admin.password_hash) {
        log::warn!("Failed login for '{}'", username);
        return Err(invalid());
    }

    // Never carry a pre-login session id across authentication.
    if let Some(previous) = auth::session_token(cookies) {
        if let Err(e) = sessions.destroy(&previous) {
            log::warn!("Could not drop previous session: {}", e);
        }
    }

    let session = sessions
        .create(admin.id, &admin.username)
        .map_err(|e| ApiError::internal("Erro no login.", e))?;
    auth::set_session_cookie(cookies, &session.token, config.production);

    log::info!("Admin '{}' logged in", admin.username);
    Ok(Json(json!({ "ok": true })))
}

#[get("/admin/me")]
pub fn me(session: Result<AdminSession, ApiError>) -> Result<Json<Value>, ApiError> {
    let AdminSession(session) = session.map_err(|e| match e {
        ApiError::Unauthorized(_) => ApiError::unauthorized("Não autenticado."),
        other => other,
    })?;

    Ok(Json(json!({
        "ok": true,
        "adminId": session.admin_id,
        "username": session.username,
        "expiresAt": session.expires_at,
    })))
}

#[post("/admin/logout")]
pub fn logout(sessions: &State<Arc<dyn SessionStore>>, cookies: &CookieJar<'_>) -> Json<Value> {
    if let Some(token) = auth::session_token(cookies) {
        if let Err(e) = sessions.destroy(&token) {
            log::error!("Could not destroy session on logout: {}", e);
        }
    }
    auth::clear_session_cookie(cookies);
    Json(json!({ "ok": true }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login, me, logout]
}
