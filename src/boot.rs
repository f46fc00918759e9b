use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories and aborts if the server could not store
/// its database.
pub fn run(config: &AppConfig) {
    info!("Boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    let db_dir = config
        .database_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty());

    let mut dirs: Vec<&Path> = vec![config.public_dir.as_path(), config.uploads_dir.as_path()];
    dirs.extend(db_dir);

    for dir in dirs {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    if let Some(dir) = db_dir.filter(|d| d.exists()) {
        if let Err(e) = probe_writable(dir) {
            error!("  Database directory not writable: {}", e);
            errors += 1;
        }
    }

    // ── 3. Uploads directory writable ───────────────────
    if config.uploads_dir.exists() {
        if let Err(e) = probe_writable(&config.uploads_dir) {
            warn!("  Uploads directory not writable: {} (image uploads will fail)", e);
            warnings += 1;
        }
    }

    // ── 4. Session secret ───────────────────────────────
    if config.uses_default_secret() {
        if config.production {
            warn!("  SESSION_SECRET is not set in production; session cookies use a well-known key");
        } else {
            info!("  SESSION_SECRET not set, using development default");
        }
        warnings += u32::from(config.production);
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed.");
    }
}

fn probe_writable(dir: &Path) -> std::io::Result<()> {
    let test_file = dir.join(".write_test");
    fs::write(&test_file, "test")?;
    let _ = fs::remove_file(&test_file);
    Ok(())
}
