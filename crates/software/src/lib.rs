//! This crate contains the architecture-agnostic logic for strumbit, a gesture-controlled MIDI air
//! guitar. One hand wears a flex sensor and an accelerometer and holds two momentary buttons; the
//! other hand plays chord gestures on four finger switches. The device translates those inputs into
//! [MIDI](https://midi.org/midi-1-0) Note On/Off and Control Change messages streamed over a serial
//! link to a downstream synthesizer host.
//!
//! Everything here runs one "tick" at a time: the firmware captures a [`SensorSnapshot`] of every
//! input, feeds it to [`mode::AirGuitar::tick`], and transmits whatever frames come back. All
//! gesture recognition (strum detection, chord selection, the Preset Mode state machine) lives in
//! this crate so it can be unit tested on the host without any hardware in the loop.

#![deny(missing_docs)]
#![no_std]

/// Tunable performance parameters.
pub mod configuration;

/// Encoding of MIDI wire frames.
pub mod message;

/// Per-tick capture of the physical inputs.
pub mod input;

/// The mode state machine that turns snapshots into MIDI frames.
pub mod mode;

mod chord;
pub use chord::*;

mod flex;
pub use flex::*;

mod strum;
pub use strum::*;

pub use input::SensorSnapshot;
