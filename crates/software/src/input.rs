//! Per-tick capture of the physical inputs.
//!
//! The firmware reads every sensor once per tick and freezes the readings in a
//! [`SensorSnapshot`]. The snapshot is immutable for the duration of the tick and owned by the
//! mode machine that consumes it; nothing in the core ever touches a live pin.

/// The two momentary buttons held by the strumming hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandButton {
    /// The front button, under the middle finger. Selects chords 1–4.
    A,
    /// The rear button, under the ring finger. Selects chords 5–8.
    B,
}

/// The four switches worn on the fretting hand, in strumming priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Finger {
    /// Highest priority.
    Index,
    /// Second priority.
    Middle,
    /// Third priority.
    Ring,
    /// Lowest priority.
    Pinky,
}

impl Finger {
    /// All fingers, highest priority first. When several fingers are flexed at once, the earliest
    /// entry here wins.
    pub const PRIORITY: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];
}

/// The state of the four finger switches on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fingers {
    /// Index finger switch.
    pub index: bool,
    /// Middle finger switch.
    pub middle: bool,
    /// Ring finger switch.
    pub ring: bool,
    /// Pinky finger switch.
    pub pinky: bool,
}

impl Fingers {
    /// Returns whether the given finger's switch is closed.
    pub fn is_flexed(&self, finger: Finger) -> bool {
        match finger {
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }
}

/// Every physical input, frozen at the top of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    /// Hand button A.
    pub button_a: bool,
    /// Hand button B.
    pub button_b: bool,
    /// The finger switches.
    pub fingers: Fingers,
    /// Raw flex sensor reading from a 10-bit ADC (0–1023).
    pub flex: u16,
    /// Raw accelerometer reading for the strumming axis, signed.
    pub accel: i32,
}

impl SensorSnapshot {
    /// Returns whether both hand buttons are pressed — the mode-transition gesture.
    pub fn both_buttons(&self) -> bool {
        self.button_a && self.button_b
    }

    /// Returns the single held hand button, if any. Button A takes priority when both are down,
    /// though callers check [`both_buttons`](Self::both_buttons) first and treat that as a
    /// transition gesture rather than a chord selection.
    pub fn held_button(&self) -> Option<HandButton> {
        if self.button_a {
            Some(HandButton::A)
        } else if self.button_b {
            Some(HandButton::B)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_button_prefers_a() {
        let snapshot = SensorSnapshot {
            button_a: true,
            button_b: true,
            ..Default::default()
        };
        assert_eq!(
            Some(HandButton::A),
            snapshot.held_button(),
            "Expected left but got right"
        );
        assert!(snapshot.both_buttons());
    }

    #[test]
    fn no_button_no_selection() {
        let snapshot = SensorSnapshot::default();
        assert_eq!(None, snapshot.held_button(), "Expected left but got right");
        assert!(!snapshot.both_buttons());
    }

    #[test]
    fn finger_lookup_matches_fields() {
        let fingers = Fingers {
            index: false,
            middle: true,
            ring: false,
            pinky: true,
        };
        assert!(!fingers.is_flexed(Finger::Index));
        assert!(fingers.is_flexed(Finger::Middle));
        assert!(!fingers.is_flexed(Finger::Ring));
        assert!(fingers.is_flexed(Finger::Pinky));
    }
}
