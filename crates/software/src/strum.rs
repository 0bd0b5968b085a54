//! Strum detection from the accelerometer axis strapped to the strumming hand.

/// Edge-detects strum gestures across consecutive accelerometer samples.
///
/// A strum fires on the tick where the reading reaches the threshold *and* is rising relative to
/// the previous sample. This is deliberately not a level test: holding the hand at high
/// acceleration does not re-trigger every tick, and a fresh strum requires the reading to stop
/// rising (or fall) before climbing again. Ties never fire.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StrumDetector {
    threshold: i32,
    last: i32,
}

impl StrumDetector {
    /// Constructs a detector with the given threshold (useful range 1–1024; lower = more
    /// sensitive).
    pub fn new(threshold: i32) -> Self {
        Self { threshold, last: 0 }
    }

    /// Feeds one sample and reports whether a strum fired on this tick.
    pub fn update(&mut self, current: i32) -> bool {
        let fired = current >= self.threshold && self.last < current;
        self.last = current;
        fired
    }
}
