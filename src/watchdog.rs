//! Process-level store connectivity watchdog.
//!
//! In-flight requests are not retried; they fail until the pool recovers.
//! This loop only probes and logs so operators can see outages, matching
//! the fixed-delay reconnect behavior of the store client.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::db::Store;

pub struct Watchdog {
    store: Store,
    probe_interval: Duration,
    retry_delay: Duration,
}

impl Watchdog {
    #[must_use]
    pub const fn new(store: Store, probe_interval: Duration, retry_delay: Duration) -> Self {
        Self {
            store,
            probe_interval,
            retry_delay,
        }
    }

    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.probe_interval);
        info!("Store connectivity watchdog started");

        loop {
            interval.tick().await;

            if let Err(e) = self.store.ping().await {
                warn!("Store connection lost: {e}. Probing until it recovers");
                self.wait_for_recovery().await;
            }
        }
    }

    async fn wait_for_recovery(&self) {
        loop {
            tokio::time::sleep(self.retry_delay).await;

            match self.store.ping().await {
                Ok(()) => {
                    info!("Store connection restored");
                    return;
                }
                Err(e) => debug!("Store still unreachable: {e}"),
            }
        }
    }
}
