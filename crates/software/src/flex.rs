//! Mapping of the analog flex sensor onto a MIDI continuous controller.
//!
//! The raw 10-bit reading is first shaped into a working range; change detection between ticks
//! happens on that *shaped* value, and only when it moves is the final 7-bit controller value
//! computed and sent. The two stages intentionally disagree at the margins: distinct shaped
//! values can collapse to the same controller value (still resending it), and shaped values far
//! from the rest position map above 127, in which case validation drops the message outright
//! rather than clamping.

/// Shapes a raw ADC reading into the working range used for change detection. The sensor rests
/// near 510; excursions are amplified tenfold and biased by 200.
pub fn shape(raw: u16) -> i32 {
    (i32::from(raw) - 510) * 10 + 200
}

/// Maps a shaped flex value onto a controller value: `floor(abs((shaped + 1024) / 2048 * 127))`.
///
/// Computed in integer arithmetic; every intermediate fits well within `u32`, and because the
/// divisor is a power of two the result is identical to the floating-point expression over the
/// whole 10-bit input domain. The result can exceed 127 at the extremes of ADC travel.
pub fn controller_value(shaped: i32) -> u16 {
    ((shaped + 1024).unsigned_abs() * 127 / 2048) as u16
}
