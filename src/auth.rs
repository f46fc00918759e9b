use std::sync::Arc;

use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;

use crate::error::ApiError;
use crate::store::{Session, SessionStore};

pub const SESSION_COOKIE: &str = "revista_session";

/// The authorization decision on its own, independent of Rocket.
pub fn require_admin(session: Option<Session>) -> Result<Session, ApiError> {
    session.ok_or_else(|| ApiError::unauthorized("Login necessário."))
}

/// Guard that ensures the request carries a live admin session.
///
/// On failure the request errors with 401 (500 if the store is unreachable)
/// before the handler (and its body) is touched; the JSON body comes from
/// the matching catcher.
pub struct AdminSession(pub Session);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let session = match resolve_session(request).await {
            Ok(session) => session,
            Err(e) => return Outcome::Error((e.status(), e)),
        };
        match require_admin(session) {
            Ok(session) => Outcome::Success(AdminSession(session)),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}

/// A store failure is a server error, not a missing login.
async fn resolve_session(request: &Request<'_>) -> Result<Option<Session>, ApiError> {
    let Some(store) = request
        .guard::<&State<Arc<dyn SessionStore>>>()
        .await
        .succeeded()
    else {
        return Ok(None);
    };
    let cookies = request.cookies();
    let Some(token) = cookies.get_private(SESSION_COOKIE).map(|c| c.value().to_string()) else {
        return Ok(None);
    };

    match store.get(&token) {
        Ok(Some(session)) => Ok(Some(session)),
        Ok(None) => {
            cookies.remove_private(Cookie::from(SESSION_COOKIE));
            Ok(None)
        }
        Err(e) => Err(ApiError::internal("Erro interno.", e)),
    }
}

// ── Password utilities ──

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

// ── Cookie helpers ──

pub fn session_token(cookies: &CookieJar<'_>) -> Option<String> {
    cookies
        .get_private(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

pub fn set_session_cookie(cookies: &CookieJar<'_>, token: &str, secure: bool) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if secure {
        cookie.set_secure(true);
    }
    cookies.add_private(cookie);
}

pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn gate_rejects_missing_session() {
        let err = require_admin(None).unwrap_err();
        assert_eq!(err.status(), rocket::http::Status::Unauthorized);
        assert_eq!(err.to_string(), "Login necessário.");
    }

    #[test]
    fn gate_passes_session_through() {
        let session = Session {
            token: "t".into(),
            admin_id: 7,
            username: "editor".into(),
            expires_at: Utc::now().naive_utc(),
        };
        let passed = require_admin(Some(session)).unwrap();
        assert_eq!(passed.admin_id, 7);
        assert_eq!(passed.username, "editor");
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
    }
}
