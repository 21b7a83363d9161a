use chrono::{Local, NaiveTime};
use std::collections::VecDeque;

const STAMP_FORMAT: &str = "%H:%M:%S";

/// Wall-clock source producing `HH:MM:SS` stamps.
pub trait Clock: Send {
    fn stamp(&mut self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn stamp(&mut self) -> String {
        Local::now().format(STAMP_FORMAT).to_string()
    }
}

fn time_or_midnight(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}

/// Clock frozen at a single time of day.
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: NaiveTime,
}

impl FixedClock {
    pub fn new(time: NaiveTime) -> Self {
        Self { time }
    }

    /// Falls back to midnight for out-of-range components.
    pub fn at(hour: u32, minute: u32, second: u32) -> Self {
        Self::new(time_or_midnight(hour, minute, second))
    }
}

impl Clock for FixedClock {
    fn stamp(&mut self) -> String {
        self.time.format(STAMP_FORMAT).to_string()
    }
}

/// Hands out a fixed sequence of times, one per stamp, then holds the last.
#[derive(Debug, Clone)]
pub struct ScriptedClock {
    times: VecDeque<NaiveTime>,
    current: NaiveTime,
}

impl ScriptedClock {
    pub fn new(times: impl IntoIterator<Item = NaiveTime>) -> Self {
        Self {
            times: times.into_iter().collect(),
            current: NaiveTime::MIN,
        }
    }

    /// Successive seconds starting at `hour:minute:second`.
    pub fn counting_from(hour: u32, minute: u32, second: u32, count: u32) -> Self {
        let start = time_or_midnight(hour, minute, second);
        Self::new(
            (0..count).map(move |offset| start + chrono::Duration::seconds(i64::from(offset))),
        )
    }
}

impl Clock for ScriptedClock {
    fn stamp(&mut self) -> String {
        if let Some(next) = self.times.pop_front() {
            self.current = next;
        }
        self.current.format(STAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_formats_zero_padded() {
        assert_eq!(FixedClock::at(7, 5, 9).stamp(), "07:05:09");
        assert_eq!(FixedClock::at(25, 0, 0).stamp(), "00:00:00");
    }

    #[test]
    fn scripted_clock_steps_then_holds() {
        let mut clock = ScriptedClock::counting_from(23, 59, 58, 3);
        assert_eq!(clock.stamp(), "23:59:58");
        assert_eq!(clock.stamp(), "23:59:59");
        assert_eq!(clock.stamp(), "00:00:00");
        assert_eq!(clock.stamp(), "00:00:00");
    }

    #[test]
    fn system_clock_uses_hms_layout() {
        let stamp = SystemClock.stamp();
        assert_eq!(stamp.len(), 8);
        assert!(NaiveTime::parse_from_str(&stamp, STAMP_FORMAT).is_ok());
    }
}
