//! In-process sensor loop for `poll --wait`
//!
//! Mirrors how an orchestrator sensor drives a poke: run one tick, stop on a
//! match, otherwise sleep for the poke interval until the timeout elapses.
//! Tick errors are not retried.

use pressloop_core::services::PollOutcome;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSettings {
    pub poke_interval: Duration,
    pub timeout: Duration,
}

#[derive(Debug)]
pub enum SensorResult {
    Matched { outcome: PollOutcome, pokes: u32 },
    TimedOut { pokes: u32 },
}

pub async fn run_sensor<F, Fut>(
    settings: SensorSettings,
    mut poke: F,
) -> pressloop_core::Result<SensorResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = pressloop_core::Result<PollOutcome>>,
{
    let started = Instant::now();
    let mut pokes = 0u32;

    loop {
        pokes += 1;
        let outcome = poke().await?;
        if outcome.matched() {
            return Ok(SensorResult::Matched { outcome, pokes });
        }

        let elapsed = started.elapsed();
        if elapsed >= settings.timeout {
            tracing::warn!(pokes = pokes, "Sensor timed out waiting for button press");
            return Ok(SensorResult::TimedOut { pokes });
        }

        let remaining = settings.timeout - elapsed;
        tracing::debug!(pokes = pokes, "No new press, sleeping");
        tokio::time::sleep(settings.poke_interval.min(remaining)).await;
    }
}
