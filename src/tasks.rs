use rocket::fairing::{Fairing, Info, Kind};
use rocket::tokio;
use rocket::{Orbit, Rocket};
use std::sync::Arc;
use std::time::Duration;

use crate::store::SessionStore;

/// Purges expired sessions on a fixed interval once the server is up.
pub struct SessionCleanup {
    pub interval: Duration,
}

#[rocket::async_trait]
impl Fairing for SessionCleanup {
    fn info(&self) -> Info {
        Info {
            name: "Session cleanup",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let Some(store) = rocket.state::<Arc<dyn SessionStore>>().cloned() else {
            log::warn!("[task] No session store managed; session cleanup disabled");
            return;
        };

        let interval = self.interval;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                match store.purge_expired() {
                    Ok(count) => {
                        if count > 0 {
                            log::info!("[task] Cleaned up {} expired sessions", count);
                        }
                    }
                    Err(e) => log::error!("[task] Session cleanup failed: {}", e),
                }
            }
        });
    }
}
