//! Timer driving the demo animation.
//!
//! The ticker never touches the bar. It only sends `Tick` messages, and the
//! main loop applies them between frames.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick;

/// Send a `Tick` every `period` after waiting `start_delay`.
///
/// Stops on its own once the receiver is gone; abort the handle to stop it
/// earlier. `period` must be non-zero.
pub fn spawn_ticker(
    start_delay: Duration,
    period: Duration,
    tx: UnboundedSender<Tick>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + start_delay, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if tx.send(Tick).is_err() {
                tracing::debug!("Tick receiver dropped, stopping ticker");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_ticks_arrive_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = std::time::Instant::now();
        let handle = spawn_ticker(Duration::from_millis(20), Duration::from_millis(5), tx);

        for _ in 0..3 {
            let tick = time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("tick before timeout");
            assert_eq!(tick, Some(Tick));
        }
        assert!(started.elapsed() >= Duration::from_millis(20));

        handle.abort();
    }

    #[tokio::test]
    async fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let handle = spawn_ticker(Duration::ZERO, Duration::from_millis(1), tx);

        time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("ticker exits")
            .expect("ticker task did not panic");
    }
}
