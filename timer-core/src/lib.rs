//! Pure stopwatch logic with no platform dependencies.
//! Every transition takes the current clock reading, so it is testable on host.

use std::fmt;

pub struct Stopwatch {
    running: bool,
    elapsed_ms: u64,
    anchor_ms: Option<u64>,
    laps: Vec<u64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            running: false,
            elapsed_ms: 0,
            anchor_ms: None,
            laps: Vec::new(),
        }
    }

    /// Starts or resumes. Returns false if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.running {
            return false;
        }
        self.anchor_ms = Some(now_ms.saturating_sub(self.elapsed_ms));
        self.running = true;
        true
    }

    /// Freezes elapsed time at `now_ms`. Returns false if not running.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if !self.running {
            return false;
        }
        self.sample(now_ms);
        self.anchor_ms = None;
        self.running = false;
        true
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_ms = 0;
        self.anchor_ms = None;
        self.laps.clear();
    }

    /// Records the elapsed time at `now_ms` as the newest lap.
    pub fn lap(&mut self, now_ms: u64) -> Option<u64> {
        if !self.running {
            return None;
        }
        self.sample(now_ms);
        self.laps.insert(0, self.elapsed_ms);
        Some(self.elapsed_ms)
    }

    /// Refreshes elapsed time from the anchor. Never moves backwards,
    /// even if the clock does.
    pub fn sample(&mut self, now_ms: u64) -> u64 {
        if let Some(anchor) = self.anchor_ms {
            let current = now_ms.saturating_sub(anchor);
            if current > self.elapsed_ms {
                self.elapsed_ms = current;
            }
        }
        self.elapsed_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn anchor_ms(&self) -> Option<u64> {
        self.anchor_ms
    }

    /// Lap snapshots, most recent first.
    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    /// Laps paired with their display number (oldest is 1).
    pub fn numbered_laps(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        let count = self.laps.len();
        self.laps
            .iter()
            .enumerate()
            .map(move |(idx, &ms)| (count - idx, ms))
    }

    /// Time between each lap and the one before it, aligned with `laps()`.
    pub fn splits(&self) -> Vec<u64> {
        self.laps
            .iter()
            .enumerate()
            .map(|(idx, &ms)| {
                let previous = self.laps.get(idx + 1).copied().unwrap_or(0);
                ms.saturating_sub(previous)
            })
            .collect()
    }

    pub fn control_label(&self) -> &'static str {
        if self.running {
            "Pause"
        } else if self.elapsed_ms == 0 {
            "Start"
        } else {
            "Resume"
        }
    }

    pub fn lap_enabled(&self) -> bool {
        self.running
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimeParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub centis: u64,
}

impl TimeParts {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            hours: ms / 3_600_000,
            minutes: (ms / 60_000) % 60,
            seconds: (ms / 1000) % 60,
            centis: (ms % 1000) / 10,
        }
    }

    pub fn to_strings(self) -> [String; 4] {
        [
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
            format!("{:02}", self.centis),
        ]
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

/// Split milliseconds into zero-padded [hours, minutes, seconds, centiseconds].
/// Hours are not wrapped.
pub fn format_time_parts(ms: u64) -> [String; 4] {
    TimeParts::from_ms(ms).to_strings()
}

/// Format milliseconds as "HH:MM:SS.cs" (centiseconds)
pub fn format_hms_cs(ms: u64) -> String {
    let p = TimeParts::from_ms(ms);
    format!("{:02}:{:02}:{:02}.{:02}", p.hours, p.minutes, p.seconds, p.centis)
}
