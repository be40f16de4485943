//! `Clock` implementations and the timestamp format.

use std::sync::Mutex;

use chrono::{Local, NaiveTime};

use crate::traits::Clock;

/// Format used for administration timestamps: zero-padded 24-hour time.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Render `time` as `HH:MM:SS`.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// The device's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock that reports a time set by the caller. Used by tests and the demo.
#[derive(Debug)]
pub struct FixedClock {
    time: Mutex<NaiveTime>,
}

impl FixedClock {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            time: Mutex::new(time),
        }
    }

    /// Clock fixed at `hour:min:sec`; `None` if the components are out of range.
    pub fn at(hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, min, sec).map(Self::new)
    }

    pub fn set(&self, time: NaiveTime) {
        *self.time.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        *self.time.lock().unwrap_or_else(|e| e.into_inner())
    }
}
