//! Encoding of the three MIDI message kinds the instrument produces into raw wire frames.
//!
//! The downstream synthesizer host speaks standard serial MIDI, so frames must be bit-exact:
//! a status byte (`0x90`, `0x80`, or `0xB0` bitwise-OR'd with the channel) followed by two data
//! bytes in 0–127. Field validation happens *before* any byte is assembled, by constructing
//! [`wmidi`] types; a single out-of-range field makes the whole message vanish. Nothing is
//! clamped and nothing is reported — a dropped message is the only error this system has.

use wmidi::{Channel, ControlFunction, MidiMessage, Note, U7};

/// A complete MIDI channel-voice message as it appears on the wire.
pub type Frame = [u8; 3];

/// The kinds of MIDI message the instrument emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// `0x9n`: begin sounding a note.
    NoteOn,
    /// `0x8n`: stop sounding a note.
    NoteOff,
    /// `0xBn`: update a continuous controller.
    ControlChange,
}

/// Encodes a message into a wire [`Frame`], or returns `None` if any field is out of range
/// (`channel > 15`, `data1 > 127`, or `data2 > 127`).
///
/// For note messages `data1` is the note number and `data2` the velocity; for Control Change
/// `data1` is the controller number and `data2` the controller value.
pub fn encode(kind: MessageKind, channel: u8, data1: u8, data2: u8) -> Option<Frame> {
    let channel = Channel::from_index(channel).ok()?;
    let data2 = U7::try_from(data2).ok()?;
    let message = match kind {
        MessageKind::NoteOn => MidiMessage::NoteOn(channel, Note::try_from(data1).ok()?, data2),
        MessageKind::NoteOff => MidiMessage::NoteOff(channel, Note::try_from(data1).ok()?, data2),
        MessageKind::ControlChange => {
            MidiMessage::ControlChange(channel, ControlFunction(U7::try_from(data1).ok()?), data2)
        }
    };

    let mut frame = Frame::default();
    message.copy_to_slice(&mut frame).ok()?;
    Some(frame)
}
