use chrono::NaiveDateTime;
use rand::RngCore;

use crate::db::DbResult;

pub mod sqlite;

/// An authenticated admin session, keyed by the opaque cookie token.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub admin_id: i64,
    pub username: String,
    pub expires_at: NaiveDateTime,
}

/// Server-side session storage. Handlers reach it through Rocket managed
/// state as `Arc<dyn SessionStore>`; expiry policy belongs to the implementation.
pub trait SessionStore: Send + Sync {
    /// Starts a new session for `admin_id` and returns it with a fresh token.
    fn create(&self, admin_id: i64, username: &str) -> DbResult<Session>;

    /// Looks up a live session. Expired sessions are reported as absent.
    fn get(&self, token: &str) -> DbResult<Option<Session>>;

    fn destroy(&self, token: &str) -> DbResult<()>;

    /// Removes expired sessions, returning how many were dropped.
    fn purge_expired(&self) -> DbResult<usize>;
}

/// 256 bits from the thread-local CSPRNG, hex-encoded.
pub fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
