//! Auto-stop timer state machine for the single-channel player.
//!
//! The machine is driven by explicit once-per-second [`TimerState::tick`]
//! calls so its behavior is fully testable under virtual time. Exactly one
//! tick source may drive an instance; the UI owns that loop.

use serde::{Deserialize, Serialize};

/// Selectable countdown durations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimerPreset {
    minutes: u32,
}

impl TimerPreset {
    pub const fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    pub const fn seconds(self) -> u32 {
        self.minutes * 60
    }

    /// Presets offered by the player view.
    pub const fn all() -> [Self; 5] {
        [
            Self::new(5),
            Self::new(10),
            Self::new(15),
            Self::new(30),
            Self::new(60),
        ]
    }
}

impl std::fmt::Display for TimerPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

/// Result of advancing the timer by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Still counting.
    Running,
    /// A countdown just reached zero; the active sound must be stopped.
    Expired,
}

/// Timer state: idle, counting down to auto-stop, or counting up unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    CountingDown {
        remaining: u32,
    },
    CountingUp {
        elapsed: u32,
    },
}

impl TimerState {
    /// Enter a counting state when playback starts.
    ///
    /// With a preset the timer counts down from its duration; without one it
    /// counts up without bound.
    pub fn start(&mut self, preset: Option<TimerPreset>) {
        *self = match preset {
            Some(p) => Self::CountingDown {
                remaining: p.seconds(),
            },
            None => Self::CountingUp { elapsed: 0 },
        };
    }

    /// Advance by one second.
    ///
    /// Ticking an idle timer is a no-op that reports `Running`.
    pub fn tick(&mut self) -> TimerTick {
        match *self {
            Self::Idle => TimerTick::Running,
            Self::CountingDown { remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    *self = Self::Idle;
                    TimerTick::Expired
                } else {
                    *self = Self::CountingDown { remaining };
                    TimerTick::Running
                }
            }
            Self::CountingUp { elapsed } => {
                *self = Self::CountingUp {
                    elapsed: elapsed.saturating_add(1),
                };
                TimerTick::Running
            }
        }
    }

    /// Return to idle on explicit stop.
    pub fn stop(&mut self) {
        *self = Self::Idle;
    }

    pub const fn is_counting(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Seconds to show on the readout.
    ///
    /// While idle this is the currently selected preset (or 0 with none), so
    /// selecting a new duration while stopped resets the display.
    pub const fn display_seconds(&self, preset: Option<TimerPreset>) -> u32 {
        match *self {
            Self::Idle => match preset {
                Some(p) => p.seconds(),
                None => 0,
            },
            Self::CountingDown { remaining } => remaining,
            Self::CountingUp { elapsed } => elapsed,
        }
    }
}

/// Format seconds as `h:mm:ss` or `m:ss`.
pub fn format_clock(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_with_preset_counts_down() {
        let mut timer = TimerState::default();
        timer.start(Some(TimerPreset::new(5)));
        assert_eq!(timer, TimerState::CountingDown { remaining: 300 });

        // Let the full preset elapse: expiry fires exactly at zero.
        for i in 0..299 {
            assert_eq!(timer.tick(), TimerTick::Running, "tick {i}");
        }
        assert_eq!(timer.tick(), TimerTick::Expired);
        assert_eq!(timer, TimerState::Idle);
    }

    #[test]
    fn test_start_without_preset_counts_up() {
        let mut timer = TimerState::default();
        timer.start(None);
        for _ in 0..1000 {
            assert_eq!(timer.tick(), TimerTick::Running);
        }
        assert_eq!(timer, TimerState::CountingUp { elapsed: 1000 });
        timer.stop();
        assert_eq!(timer, TimerState::Idle);
    }

    #[test]
    fn test_display_resets_to_preset_when_idle() {
        let mut timer = TimerState::default();
        let preset = Some(TimerPreset::new(10));
        assert_eq!(timer.display_seconds(preset), 600);
        assert_eq!(timer.display_seconds(None), 0);

        timer.start(preset);
        timer.tick();
        assert_eq!(timer.display_seconds(preset), 599);

        // Explicit stop goes back to showing the selected preset.
        timer.stop();
        assert_eq!(timer.display_seconds(preset), 600);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut timer = TimerState::Idle;
        assert_eq!(timer.tick(), TimerTick::Running);
        assert_eq!(timer, TimerState::Idle);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(300), "5:00");
        assert_eq!(format_clock(3661), "1:01:01");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn countdown_never_goes_negative(minutes in 1u32..120, ticks in 0usize..10_000) {
                let mut timer = TimerState::default();
                timer.start(Some(TimerPreset::new(minutes)));
                for _ in 0..ticks {
                    timer.tick();
                    if let TimerState::CountingDown { remaining } = timer {
                        prop_assert!(remaining > 0);
                    }
                }
            }

            #[test]
            fn expiry_fires_exactly_once(minutes in 1u32..10) {
                let mut timer = TimerState::default();
                timer.start(Some(TimerPreset::new(minutes)));
                let total = minutes * 60 + 100;
                let expiries = (0..total)
                    .filter(|_| timer.tick() == TimerTick::Expired)
                    .count();
                prop_assert_eq!(expiries, 1);
            }
        }
    }
}
