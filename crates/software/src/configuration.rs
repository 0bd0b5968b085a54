//! Tunable performance parameters. These are compiled in; the device has no persistence and no
//! configuration surface beyond rebuilding the firmware with different values.

use embassy_time::Duration;

/// The knobs a performer (or rather, whoever flashes the firmware) can turn.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    /// How fast the strumming hand must move to trigger a strum, in raw accelerometer units.
    ///
    /// Useful range is 1–1024; lower values make the instrument more sensitive.
    pub strum_threshold: i32,
    /// Interval between Performance Mode ticks.
    pub performance_period: Duration,
    /// Interval between ticks while in Preset Mode or waiting out a release-guard.
    pub preset_period: Duration,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            strum_threshold: 10,
            performance_period: Duration::from_millis(50),
            preset_period: Duration::from_millis(100),
        }
    }
}
