use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};
use sha2::{Digest, Sha256};

pub const DEFAULT_SESSION_SECRET: &str = "dev-secret";

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub db_pool_size: u32,
    pub public_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub upload_limit_mb: u64,
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub session_cleanup_minutes: u64,
    pub allowed_origin: Option<String>,
    pub production: bool,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let public_dir: PathBuf = try_load("PUBLIC_DIR", "public");
        let uploads_dir = optional("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| public_dir.join("uploads"));

        Self {
            address: try_load("ADDRESS", "0.0.0.0"),
            port: try_load("PORT", "3001"),
            database_path: try_load("DATABASE_PATH", "data/revista.db"),
            db_pool_size: try_load("DB_POOL_SIZE", "10"),
            public_dir,
            uploads_dir,
            upload_limit_mb: try_load("UPLOAD_LIMIT_MB", "10"),
            admin_user: optional("ADMIN_USER"),
            admin_pass: optional("ADMIN_PASS"),
            session_secret: optional("SESSION_SECRET")
                .unwrap_or_else(|| DEFAULT_SESSION_SECRET.to_string()),
            session_ttl_hours: try_load::<i64>("SESSION_TTL_HOURS", "24").max(1),
            session_cleanup_minutes: try_load::<u64>("SESSION_CLEANUP_MINUTES", "30").max(1),
            allowed_origin: optional("ALLOWED_ORIGIN"),
            production: optional("APP_ENV").as_deref() == Some("production"),
            bcrypt_cost: try_load("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string()),
        }
    }

    /// Bootstrap credentials, only when both halves are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_user.as_deref(), self.admin_pass.as_deref()) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }

    /// Hex-encoded 256-bit key material for Rocket's private cookies.
    pub fn secret_key_hex(&self) -> String {
        hex::encode(Sha256::digest(self.session_secret.as_bytes()))
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

/// Unset and blank variables are treated the same.
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let fallback = || {
        default
            .parse::<T>()
            .unwrap_or_else(|e| panic!("invalid built-in default for {key}: {e}"))
    };

    match optional(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}. Using default: {default}");
            fallback()
        }),
        None => {
            info!("{key} not set, using default: {default}");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            address: "127.0.0.1".into(),
            port: 3001,
            database_path: "data/test.db".into(),
            db_pool_size: 2,
            public_dir: "public".into(),
            uploads_dir: "public/uploads".into(),
            upload_limit_mb: 10,
            admin_user: Some("editor".into()),
            admin_pass: None,
            session_secret: DEFAULT_SESSION_SECRET.into(),
            session_ttl_hours: 24,
            session_cleanup_minutes: 30,
            allowed_origin: None,
            production: false,
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn credentials_need_both_halves() {
        let mut config = sample();
        assert!(config.admin_credentials().is_none());
        config.admin_pass = Some("s3cret".into());
        assert_eq!(config.admin_credentials(), Some(("editor", "s3cret")));
    }

    #[test]
    fn secret_key_is_256_bits_of_hex() {
        let config = sample();
        let key = config.secret_key_hex();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(config.uses_default_secret());
    }
}
