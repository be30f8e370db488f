use tokio::time::Instant;

/// Millisecond readings relative to the start of the session.
///
/// Backed by the runtime clock, so it is monotonic and follows virtual
/// time in paused-clock tests.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
