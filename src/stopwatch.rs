use timer_core::{format_hms_cs, Stopwatch};

use crate::clock::Clock;
use crate::pump::Pump;

/// One stopwatch bound to a clock and its sampling pump.
///
/// The pump runs exactly while the stopwatch runs; every mutator keeps the
/// two in step.
pub struct StopwatchSession {
    timer: Stopwatch,
    pump: Pump,
    clock: Clock,
}

impl StopwatchSession {
    pub fn new(pump: Pump, clock: Clock) -> Self {
        Self {
            timer: Stopwatch::new(),
            pump,
            clock,
        }
    }

    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        if self.timer.start(now) {
            self.pump.start();
            log::info!("started at {}", format_hms_cs(self.timer.elapsed_ms()));
        } else {
            log::debug!("start ignored, already running");
        }
    }

    pub fn pause(&mut self) {
        self.pump.stop();
        let now = self.clock.now_ms();
        if self.timer.pause(now) {
            log::info!("paused at {}", format_hms_cs(self.timer.elapsed_ms()));
        } else {
            log::debug!("pause ignored, not running");
        }
    }

    pub fn reset(&mut self) {
        self.pump.stop();
        self.timer.reset();
        log::info!("reset");
    }

    pub fn lap(&mut self) {
        let now = self.clock.now_ms();
        match self.timer.lap(now) {
            Some(ms) => log::info!("lap {} at {} ms", self.timer.laps().len(), ms),
            None => log::debug!("lap ignored, not running"),
        }
    }

    /// Start/Resume when stopped, Pause when running.
    pub fn toggle(&mut self) {
        if self.timer.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Handles one pump tick. Returns true if elapsed time was refreshed.
    pub fn handle_pump(&mut self, generation: u64) -> bool {
        if !self.pump.is_current(generation) {
            log::trace!("dropping stale tick from pump {}", generation);
            return false;
        }
        let now = self.clock.now_ms();
        self.timer.sample(now);
        true
    }

    pub fn timer(&self) -> &Stopwatch {
        &self.timer
    }

    pub fn is_pumping(&self) -> bool {
        self.pump.is_running()
    }

    pub fn shutdown(&mut self) {
        if self.is_pumping() {
            log::debug!("stopping pump on shutdown");
        }
        self.pump.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppOp;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time;

    fn session() -> (StopwatchSession, mpsc::UnboundedReceiver<AppOp>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = StopwatchSession::new(Pump::new(sender, 10), Clock::new());
        (session, receiver)
    }

    /// Feeds every queued tick to the session, returning how many were applied.
    fn pump_all(session: &mut StopwatchSession, receiver: &mut mpsc::UnboundedReceiver<AppOp>) -> usize {
        let mut applied = 0;
        while let Ok(op) = receiver.try_recv() {
            if let AppOp::Pump(generation) = op {
                if session.handle_pump(generation) {
                    applied += 1;
                }
            }
        }
        applied
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_advance_elapsed() {
        let (mut sw, mut rx) = session();
        sw.start();
        assert!(sw.is_pumping());

        time::sleep(Duration::from_millis(1000)).await;
        assert!(pump_all(&mut sw, &mut rx) > 0);
        let elapsed = sw.timer().elapsed_ms();
        assert!((990..=1010).contains(&elapsed), "elapsed {}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_pause_no_drift() {
        let (mut sw, mut rx) = session();
        sw.start();
        sw.pause();
        assert_eq!(sw.timer().elapsed_ms(), 0);
        assert!(!sw.is_pumping());

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(pump_all(&mut sw, &mut rx), 0);
        assert_eq!(sw.timer().elapsed_ms(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_single_pump() {
        let (mut sw, mut rx) = session();
        sw.start();
        sw.start();

        time::sleep(Duration::from_millis(500)).await;
        let applied = pump_all(&mut sw, &mut rx);
        assert!(applied <= 51, "applied {} ticks", applied);
        assert!(sw.timer().elapsed_ms() <= 510);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticks_after_pause() {
        let (mut sw, mut rx) = session();
        sw.start();
        time::sleep(Duration::from_millis(35)).await;
        sw.pause();
        let frozen = sw.timer().elapsed_ms();
        assert!((30..=40).contains(&frozen), "frozen {}", frozen);

        // Ticks queued before the pause must not move elapsed time
        assert_eq!(pump_all(&mut sw, &mut rx), 0);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(pump_all(&mut sw, &mut rx), 0);
        assert_eq!(sw.timer().elapsed_ms(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticks_after_reset() {
        let (mut sw, mut rx) = session();
        sw.start();
        time::sleep(Duration::from_millis(45)).await;
        sw.reset();
        assert_eq!(pump_all(&mut sw, &mut rx), 0);
        assert_eq!(sw.timer().elapsed_ms(), 0);
        assert!(!sw.timer().is_running());
        assert!(!sw.is_pumping());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_preserves_elapsed() {
        let (mut sw, mut rx) = session();
        sw.start();
        time::sleep(Duration::from_millis(300)).await;
        sw.pause();
        let paused_at = sw.timer().elapsed_ms();

        time::sleep(Duration::from_millis(5000)).await;
        sw.start();
        assert_eq!(sw.timer().elapsed_ms(), paused_at);
        time::sleep(Duration::from_millis(200)).await;
        pump_all(&mut sw, &mut rx);
        sw.pause();

        let total = sw.timer().elapsed_ms();
        assert!(total >= paused_at + 190 && total <= paused_at + 210, "total {}", total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_laps_most_recent_first() {
        let (mut sw, mut rx) = session();
        sw.lap();
        assert!(sw.timer().laps().is_empty());

        sw.start();
        time::sleep(Duration::from_millis(120)).await;
        pump_all(&mut sw, &mut rx);
        sw.lap();
        time::sleep(Duration::from_millis(80)).await;
        pump_all(&mut sw, &mut rx);
        sw.lap();
        sw.pause();

        let laps = sw.timer().laps();
        assert_eq!(laps.len(), 2);
        assert!(laps[0] >= laps[1]);

        sw.lap();
        assert_eq!(sw.timer().laps().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle() {
        let (mut sw, _rx) = session();
        sw.toggle();
        assert!(sw.timer().is_running());
        assert!(sw.is_pumping());
        sw.toggle();
        assert!(!sw.timer().is_running());
        assert!(!sw.is_pumping());
    }
}
