//! Frame pacing and FPS tracking.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Fixed-rate frame tick.
///
/// The simulation step is constant, so a late frame is simply late: missed
/// deadlines are dropped rather than replayed in a burst.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next_frame: Instant,
}

impl FrameClock {
    /// First frame is due immediately
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_frame: now,
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_frame
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Record that a frame ran at `now` and schedule the next one
    pub fn tick(&mut self, now: Instant) {
        self.next_frame += self.interval;
        if self.next_frame <= now {
            self.next_frame = now + self.interval;
        }
    }
}

/// Rolling frame-rate average over the last 60 frames
pub struct FpsTracker {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    last_report: Instant,
}

impl FpsTracker {
    pub fn new(now: Instant) -> Self {
        Self {
            frame_times: VecDeque::new(),
            last_frame: now,
            last_report: now,
        }
    }

    /// Record a frame; returns the average FPS once per second
    pub fn record_frame(&mut self, now: Instant) -> Option<f32> {
        let frame_time = now - self.last_frame;
        self.last_frame = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 60 {
            self.frame_times.pop_front();
        }

        if now - self.last_report > Duration::from_secs(1) {
            self.last_report = now;
            Some(self.current_fps())
        } else {
            None
        }
    }

    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total.as_secs_f32() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_due_immediately() {
        let start = Instant::now();
        let clock = FrameClock::new(Duration::from_millis(100), start);
        assert!(clock.is_due(start));
    }

    #[test]
    fn test_tick_schedules_next_interval() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut clock = FrameClock::new(interval, start);

        clock.tick(start);
        assert_eq!(clock.next_deadline(), start + interval);
        assert!(!clock.is_due(start + Duration::from_millis(50)));
        assert!(clock.is_due(start + interval));

        // On-time frame keeps the cadence
        clock.tick(start + interval + Duration::from_millis(5));
        assert_eq!(clock.next_deadline(), start + interval * 2);
    }

    #[test]
    fn test_missed_deadlines_do_not_pile_up() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);
        let mut clock = FrameClock::new(interval, start);

        let late = start + Duration::from_secs(3);
        clock.tick(late);
        assert_eq!(clock.next_deadline(), late + interval);
    }

    #[test]
    fn test_fps_average() {
        let start = Instant::now();
        let mut tracker = FpsTracker::new(start);
        let mut report = None;
        for i in 1..=30 {
            if let Some(fps) = tracker.record_frame(start + Duration::from_millis(50 * i)) {
                report = Some(fps);
            }
        }
        let fps = report.expect("a report after more than one second");
        assert!((fps - 20.0).abs() < 0.01, "{}", fps);
    }
}
