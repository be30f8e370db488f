use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::AppOp;

struct ActivePump {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Periodic wake-up source for the event loop.
///
/// At most one ticking task exists at a time. Every tick carries the
/// generation of the task that sent it, so ticks still queued after `stop`
/// can be recognised and dropped by the receiver.
pub struct Pump {
    sender: UnboundedSender<AppOp>,
    interval: Duration,
    generation: u64,
    active: Option<ActivePump>,
}

impl Pump {
    pub fn new(sender: UnboundedSender<AppOp>, interval_ms: u64) -> Self {
        let interval_ms = if interval_ms == 0 { 10 } else { interval_ms };
        Self {
            sender,
            interval: Duration::from_millis(interval_ms),
            generation: 0,
            active: None,
        }
    }

    /// Spawns the ticking task. Returns false if one is already active.
    pub fn start(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let sender = self.sender.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if sender.send(AppOp::Pump(generation)).is_err() {
                    // Event loop is gone
                    break;
                }
            }
        });

        log::debug!("pump {} started, period {:?}", generation, period);
        self.active = Some(ActivePump { generation, handle });
        true
    }

    /// Aborts the ticking task. Returns false if none was active.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.handle.abort();
                log::debug!("pump {} stopped", active.generation);
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// True if `generation` belongs to the task that is running now.
    pub fn is_current(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .map(|a| a.generation == generation)
            .unwrap_or(false)
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.stop();
    }
}
