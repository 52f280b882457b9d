//! Scheduler for periodic high-confidence scans

use crate::signals::Scanner;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Cron expression firing exactly every `interval_seconds`, when one exists.
///
/// A step must divide its field evenly (60 seconds, 60 minutes, 24 hours),
/// otherwise the ticks wrap unevenly at the field boundary. Such intervals
/// return `None`.
pub fn cron_expression(interval_seconds: u64) -> Option<String> {
    // Cron format: second minute hour day month weekday
    match interval_seconds {
        0 => None,
        s if s < 60 => (60 % s == 0).then(|| format!("*/{} * * * * *", s)),
        s if s < 3600 => {
            (s % 60 == 0 && 60 % (s / 60) == 0).then(|| format!("0 */{} * * * *", s / 60))
        }
        s if s < 86_400 => {
            (s % 3600 == 0 && 24 % (s / 3600) == 0).then(|| format!("0 0 */{} * * *", s / 3600))
        }
        86_400 => Some("0 0 0 * * *".to_string()),
        _ => None,
    }
}

/// When the scan runs: on cron ticks, or on a fixed period for intervals
/// cron cannot express.
#[derive(Debug, Clone)]
pub enum Cadence {
    Cron(Schedule),
    Every(Duration),
}

impl Cadence {
    pub fn for_interval(
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if interval_seconds == 0 {
            return Err("Scheduler disabled: interval_seconds is 0".into());
        }

        match cron_expression(interval_seconds) {
            Some(cron_expr) => {
                let schedule = Schedule::from_str(&cron_expr).map_err(|e| {
                    Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Invalid cron expression '{}': {}", cron_expr, e),
                    )) as Box<dyn std::error::Error + Send + Sync>
                })?;
                Ok(Cadence::Cron(schedule))
            }
            None => Ok(Cadence::Every(Duration::from_secs(interval_seconds))),
        }
    }
}

/// Runs the scanner on every tick in a background task
pub struct ScanScheduler {
    scanner: Arc<Scanner>,
    cadence: Cadence,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ScanScheduler {
    /// `interval_seconds` of 0 means scanning is disabled and is rejected.
    pub fn new(
        scanner: Arc<Scanner>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let cadence = Cadence::for_interval(interval_seconds)?;

        info!(
            interval = interval_seconds,
            cadence = ?cadence,
            "ScanScheduler: created with interval {}s",
            interval_seconds
        );

        Ok(Self {
            scanner,
            cadence,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    pub async fn start(&self) {
        let scanner = self.scanner.clone();
        let cadence = self.cadence.clone();

        let handle = tokio::spawn(async move {
            info!("ScanScheduler: started, waiting for first tick...");

            match cadence {
                Cadence::Cron(schedule) => loop {
                    let mut upcoming = schedule.upcoming(chrono::Utc);
                    if let Some(next_tick) = upcoming.next() {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            let duration = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(duration).await;
                        }
                    } else {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        continue;
                    }
                    run_scan(&scanner).await;
                },
                Cadence::Every(period) => {
                    let mut ticker =
                        tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        ticker.tick().await;
                        run_scan(&scanner).await;
                    }
                }
            }
        });

        let mut h = self.handle.write().await;
        if let Some(previous) = h.replace(handle) {
            previous.abort();
        }
        info!("ScanScheduler: started successfully");
    }

    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ScanScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}

async fn run_scan(scanner: &Scanner) {
    info!("ScanScheduler: tick, scanning");
    let hits = scanner.scan(None).await;
    if hits.is_empty() {
        info!("ScanScheduler: no signals above the confidence floor");
    }
    for hit in &hits {
        info!(
            symbol = %hit.signal.symbol,
            action = %hit.signal.action,
            confidence = hit.signal.confidence,
            trend = ?hit.trend,
            serial = %hit.signal.serial_number,
            "ScanScheduler: high-confidence signal"
        );
    }
}
