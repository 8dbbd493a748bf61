//! Auction Lifecycle Sweep Job
//!
//! Periodically transitions overdue active auctions to ended and settles
//! their winners. Runs once immediately at process start, then at the
//! configured interval. Supports graceful shutdown via SIGTERM/SIGINT:
//! an in-flight sweep always completes before the task exits.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::env;
use std::sync::Arc;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::{error, info};

use crate::services::lifecycle;
use crate::services::notification::WinnerNotifier;

/// Default sweep interval in seconds (5 minutes)
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Environment variable for sweep interval
const ENV_SWEEP_INTERVAL: &str = "AUCTION_SWEEP_INTERVAL_SECS";

/// Start the auction lifecycle sweep job
///
/// Spawns a background task that:
/// 1. Runs one sweep immediately at startup
/// 2. Repeats at the configured interval (default: 5 minutes)
/// 3. Stops gracefully on shutdown signal, finishing any in-flight sweep
///
/// # Arguments
///
/// * `db` - Database connection
/// * `notifier` - Winner notification port
///
/// # Environment Variables
///
/// * `AUCTION_SWEEP_INTERVAL_SECS` - Interval in seconds (default: 300)
pub async fn start_lifecycle_sweep_job(db: DatabaseConnection, notifier: Arc<dyn WinnerNotifier>) {
    tokio::spawn(async move {
        let sweep_interval_secs: u64 = env::var(ENV_SWEEP_INTERVAL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        info!(
            sweep_interval_secs = sweep_interval_secs,
            "Auction lifecycle sweep job started"
        );

        // The first tick completes immediately, giving the startup run
        let mut interval = interval(TokioDuration::from_secs(sweep_interval_secs));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received, stopping lifecycle sweep job gracefully");
                    break;
                }
                _ = interval.tick() => {
                    match lifecycle::run_sweep(&db, notifier.as_ref(), Utc::now()).await {
                        Ok(stats) => {
                            if stats.scanned > 0 {
                                info!(
                                    ended = stats.ended,
                                    winners_created = stats.winners_created,
                                    failures = stats.failures,
                                    "Lifecycle sweep tick completed"
                                );
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "Lifecycle sweep failed");
                            // Continue - next interval will retry
                        }
                    }
                }
            }
        }

        info!("Auction lifecycle sweep job stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval() {
        assert_eq!(DEFAULT_SWEEP_INTERVAL_SECS, 300);
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(ENV_SWEEP_INTERVAL, "AUCTION_SWEEP_INTERVAL_SECS");
    }
}
