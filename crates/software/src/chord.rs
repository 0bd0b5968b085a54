//! Selection of one of the eight addressable chords from a hand button and a finger switch.

use crate::input::{Finger, Fingers, HandButton};

/// One of the eight chord slots, addressed by (hand button) × (finger).
///
/// Button A covers slots 1–4 and button B slots 5–8, with fingers assigned in
/// [priority order](Finger::PRIORITY) within each button. At most one slot is selected per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChordSlot {
    button: HandButton,
    finger: Finger,
}

impl ChordSlot {
    /// Picks the slot for the first flexed finger in priority order, if any.
    pub fn select(button: HandButton, fingers: &Fingers) -> Option<Self> {
        Finger::PRIORITY
            .into_iter()
            .find(|&finger| fingers.is_flexed(finger))
            .map(|finger| Self { button, finger })
    }

    /// Picks the slot for the first finger showing a rising edge: flexed now and not flagged as
    /// flexed on the previous tick. A held finger whose edge test fails does not shadow
    /// lower-priority fingers.
    pub fn select_edge(button: HandButton, fingers: &Fingers, last: &Fingers) -> Option<Self> {
        Finger::PRIORITY
            .into_iter()
            .find(|&finger| fingers.is_flexed(finger) && !last.is_flexed(finger))
            .map(|finger| Self { button, finger })
    }

    /// The slot number, 1–8.
    pub fn index(&self) -> u8 {
        let base = match self.button {
            HandButton::A => 0,
            HandButton::B => 4,
        };
        base + self.finger as u8 + 1
    }
}
