//! Per-dot animation schedule.
//!
//! Each dot pulses restRadius → peakRadius → restRadius once per cycle,
//! restarting from rest on every cycle. Dot `i` waits
//! `i * (cycle / count)` before its first cycle, which staggers the row into
//! a chase.

use crate::config::{DotsConfig, Interpolator};
use std::time::Duration;

/// Where a dot is within its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotPhase {
    /// Not started yet (still inside the start delay)
    Stopped,
    /// Growing toward the peak radius
    Rising,
    /// Shrinking back to the rest radius
    Falling,
}

/// Timing and value range for one dot's pulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotSchedule {
    pub index: usize,
    pub start_delay: Duration,
    pub cycle: Duration,
    pub rest_radius: f32,
    pub peak_radius: f32,
    pub interpolator: Interpolator,
}

impl DotSchedule {
    pub fn for_dot(config: &DotsConfig, index: usize) -> Self {
        Self {
            index,
            start_delay: Duration::from_millis(config.start_delay_ms(index)),
            cycle: config.cycle_duration(),
            rest_radius: config.rest_radius(),
            peak_radius: config.peak_radius(),
            interpolator: config.interpolator(),
        }
    }

    /// Schedules for every dot of `config`, in index order
    pub fn for_config(config: &DotsConfig) -> Vec<Self> {
        (0..config.dot_count())
            .map(|index| Self::for_dot(config, index))
            .collect()
    }

    /// Progress through the current cycle in [0, 1), measured from the end of the start delay
    fn cycle_fraction(&self, running: Duration) -> f32 {
        let cycle_nanos = self.cycle.as_nanos().max(1);
        let into_cycle = running.as_nanos() % cycle_nanos;
        (into_cycle as f64 / cycle_nanos as f64) as f32
    }

    /// Radius after the dot has been running (post-delay) for `running`
    pub fn sample_running(&self, running: Duration) -> f32 {
        let eased = self.interpolator.apply(self.cycle_fraction(running));
        // Keyframes rest -> peak -> rest, each leg half the cycle
        let leg = if eased <= 0.5 {
            eased * 2.0
        } else {
            (1.0 - eased) * 2.0
        };
        let radius = self.rest_radius + (self.peak_radius - self.rest_radius) * leg;
        radius.clamp(self.rest_radius, self.peak_radius)
    }

    /// Radius at `elapsed` since the widget started its animations
    pub fn sample(&self, elapsed: Duration) -> f32 {
        match elapsed.checked_sub(self.start_delay) {
            Some(running) => self.sample_running(running),
            None => self.rest_radius,
        }
    }

    pub fn phase_at(&self, elapsed: Duration) -> DotPhase {
        match elapsed.checked_sub(self.start_delay) {
            None => DotPhase::Stopped,
            Some(running) => {
                if self.interpolator.apply(self.cycle_fraction(running)) < 0.5 {
                    DotPhase::Rising
                } else {
                    DotPhase::Falling
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DotAttributes;

    fn config(count: i64, duration: i64) -> DotsConfig {
        DotsConfig::default().with_attributes(&DotAttributes {
            num_circles: Some(count),
            animation_duration: Some(duration),
            ..Default::default()
        })
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_one_schedule_per_dot() {
        for count in 1..=8 {
            assert_eq!(DotSchedule::for_config(&config(count, 500)).len(), count as usize);
        }
    }

    #[test]
    fn test_staggered_delays() {
        let delays: Vec<Duration> = DotSchedule::for_config(&config(4, 1000))
            .iter()
            .map(|s| s.start_delay)
            .collect();
        assert_eq!(delays, vec![ms(0), ms(250), ms(500), ms(750)]);
    }

    #[test]
    fn test_single_dot_starts_immediately() {
        let schedules = DotSchedule::for_config(&config(1, 500));
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].start_delay, Duration::ZERO);
    }

    #[test]
    fn test_triangular_keyframes() {
        let schedule = DotSchedule::for_dot(&config(3, 500), 0);
        assert_eq!(schedule.sample(ms(0)), 5.0);
        assert!((schedule.sample(ms(125)) - 7.5).abs() < 1e-4);
        assert!((schedule.sample(ms(250)) - 10.0).abs() < 1e-4);
        assert!((schedule.sample(ms(375)) - 7.5).abs() < 1e-4);
        // Restart mode: next cycle begins at rest again
        assert!((schedule.sample(ms(500)) - 5.0).abs() < 1e-4);
        assert!((schedule.sample(ms(625)) - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_rests_during_start_delay() {
        let schedule = DotSchedule::for_dot(&config(3, 500), 2);
        assert_eq!(schedule.start_delay, ms(332));
        assert_eq!(schedule.sample(ms(100)), 5.0);
        assert_eq!(schedule.phase_at(ms(100)), DotPhase::Stopped);
        assert!((schedule.sample(ms(332 + 250)) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_radius_stays_in_range() {
        for interpolator in [Interpolator::Linear, Interpolator::AccelerateDecelerate] {
            let mut schedule = DotSchedule::for_dot(&config(3, 487), 1);
            schedule.interpolator = interpolator;
            for step in 0..5000 {
                let r = schedule.sample(ms(step));
                assert!((5.0..=10.0).contains(&r), "radius {} at {}ms", r, step);
            }
        }
    }

    #[test]
    fn test_phase_alternates() {
        let schedule = DotSchedule::for_dot(&config(2, 400), 1);
        assert_eq!(schedule.phase_at(ms(199)), DotPhase::Stopped);
        assert_eq!(schedule.phase_at(ms(200 + 50)), DotPhase::Rising);
        assert_eq!(schedule.phase_at(ms(200 + 250)), DotPhase::Falling);
        assert_eq!(schedule.phase_at(ms(200 + 450)), DotPhase::Rising);
    }
}
