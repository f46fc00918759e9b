use log::{info, warn};
use thiserror::Error;

use crate::auth;
use crate::config::AppConfig;
use crate::db::{DbError, DbPool, ADMINS_TABLE};
use crate::models::admin::Admin;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum AdminBootstrap {
    /// Credentials were not configured.
    Skipped,
    /// An admin with the configured username already existed.
    Existing(i64),
    Created(i64),
}

/// Makes sure the admin named in the environment exists.
///
/// Existence check and insert are not atomic: two instances starting at the
/// same time can race. Deployment is assumed to be a single instance.
pub fn ensure_env_admin(pool: &DbPool, config: &AppConfig) -> Result<AdminBootstrap, BootstrapError> {
    let Some((username, password)) = config.admin_credentials() else {
        warn!("[admin] ADMIN_USER/ADMIN_PASS not set, skipping admin bootstrap.");
        return Ok(AdminBootstrap::Skipped);
    };
    ensure_admin(pool, username, password, config.bcrypt_cost)
}

pub fn ensure_admin(
    pool: &DbPool,
    username: &str,
    password: &str,
    cost: u32,
) -> Result<AdminBootstrap, BootstrapError> {
    {
        let conn = pool.get().map_err(DbError::from)?;
        conn.execute_batch(ADMINS_TABLE).map_err(DbError::from)?;
    }

    if let Some(existing) = Admin::find_by_username(pool, username)? {
        info!("[admin] User '{}' already exists (id={}).", username, existing.id);
        return Ok(AdminBootstrap::Existing(existing.id));
    }

    let hash = auth::hash_password(password, cost)?;
    let id = Admin::create(pool, username, &hash)?;
    info!("[admin] Created initial admin '{}' from environment (id={}).", username, id);

    Ok(AdminBootstrap::Created(id))
}
