//! Message-level constants and the typed builders and views for every UMP
//! message family.
//!
//! Builders are free functions returning an owned [`UniversalPacket`]; views
//! borrow an existing packet and are only constructible when the packet is
//! of the right kind. The constant modules mirror the status and controller
//! numbering of the MIDI 2.0 specifications.
use crate::packet::{PacketType, UniversalPacket};
use crate::types::{ControllerValue, Pitch79, PitchBend, Velocity};

pub mod channel1;
pub mod channel2;
pub mod data;
pub mod system;
pub mod ump_stream;
pub mod utility;

/// Position of a packet within a multi-packet message.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[repr(u8)]
pub enum PacketFormat {
    /// The message is contained in this single packet.
    Complete = 0x0,
    /// The first packet of a stream.
    Start = 0x1,
    /// A packet in the middle of a stream.
    Continue = 0x2,
    /// The final packet of a stream.
    End = 0x3,
}

impl From<PacketFormat> for u8 {
    fn from(value: PacketFormat) -> u8 {
        value as u8
    }
}

impl From<u8> for PacketFormat {
    fn from(value: u8) -> Self {
        match value & 0x3 {
            0x0 => PacketFormat::Complete,
            0x1 => PacketFormat::Start,
            0x2 => PacketFormat::Continue,
            _ => PacketFormat::End,
        }
    }
}

/// Utility message statuses (packet type 0x0).
pub mod utility_status {
    /// No operation.
    pub const NOOP: u8 = 0x00;
    /// Jitter-reduction clock.
    pub const JR_CLOCK: u8 = 0x10;
    /// Jitter-reduction timestamp.
    pub const JR_TIMESTAMP: u8 = 0x20;
}

/// System common and real-time statuses (packet type 0x1).
#[allow(missing_docs)]
pub mod system_status {
    pub const MTC_QUARTER_FRAME: u8 = 0xF1;
    pub const SONG_POSITION: u8 = 0xF2;
    pub const SONG_SELECT: u8 = 0xF3;
    pub const TUNE_REQUEST: u8 = 0xF6;
    pub const CLOCK: u8 = 0xF8;
    pub const START: u8 = 0xFA;
    pub const CONT: u8 = 0xFB;
    pub const STOP: u8 = 0xFC;
    pub const ACTIVE_SENSE: u8 = 0xFE;
    pub const RESET: u8 = 0xFF;
}

/// MIDI 1 channel-voice statuses (packet type 0x2, high nibble of byte 1).
#[allow(missing_docs)]
pub mod midi1_channel_voice_status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
}

/// MIDI 2 channel-voice statuses (packet type 0x4, high nibble of byte 1).
#[allow(missing_docs)]
pub mod channel_voice_status {
    pub const REGISTERED_PER_NOTE_CONTROLLER: u8 = 0x00;
    pub const ASSIGNABLE_PER_NOTE_CONTROLLER: u8 = 0x10;
    pub const REGISTERED_CONTROLLER: u8 = 0x20;
    pub const ASSIGNABLE_CONTROLLER: u8 = 0x30;
    pub const RELATIVE_REGISTERED_CONTROLLER: u8 = 0x40;
    pub const RELATIVE_ASSIGNABLE_CONTROLLER: u8 = 0x50;
    pub const PER_NOTE_PITCH_BEND: u8 = 0x60;
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const PER_NOTE_MANAGEMENT: u8 = 0xF0;
}

/// SysEx7 data statuses (packet type 0x3, format in the high nibble).
#[allow(missing_docs)]
pub mod data_status {
    pub const SYSEX7_COMPLETE: u8 = 0x00;
    pub const SYSEX7_START: u8 = 0x10;
    pub const SYSEX7_CONTINUE: u8 = 0x20;
    pub const SYSEX7_END: u8 = 0x30;
}

/// Extended data statuses (packet type 0x5).
#[allow(missing_docs)]
pub mod extended_data_status {
    pub const SYSEX8_COMPLETE: u8 = 0x00;
    pub const SYSEX8_START: u8 = 0x10;
    pub const SYSEX8_CONTINUE: u8 = 0x20;
    pub const SYSEX8_END: u8 = 0x30;
    pub const MIXED_DATA_SET_HEADER: u8 = 0x80;
    pub const MIXED_DATA_SET_PAYLOAD: u8 = 0x90;
}

/// Stream message statuses (packet type 0xF, ten bits).
#[allow(missing_docs)]
pub mod stream_status {
    pub const ENDPOINT_DISCOVERY: u16 = 0x00;
    pub const ENDPOINT_INFO: u16 = 0x01;
    pub const DEVICE_IDENTITY: u16 = 0x02;
    pub const ENDPOINT_NAME: u16 = 0x03;
    pub const PRODUCT_INSTANCE_ID: u16 = 0x04;
    pub const STREAM_CONFIGURATION_REQUEST: u16 = 0x05;
    pub const STREAM_CONFIGURATION_NOTIFY: u16 = 0x06;
    pub const FUNCTION_BLOCK_DISCOVERY: u16 = 0x10;
    pub const FUNCTION_BLOCK_INFO: u16 = 0x11;
    pub const FUNCTION_BLOCK_NAME: u16 = 0x12;
}

/// UMP protocol identifiers used in stream configuration.
pub mod protocol {
    /// The MIDI 1.0 protocol.
    pub const MIDI1: u8 = 0x1;
    /// The MIDI 2.0 protocol.
    pub const MIDI2: u8 = 0x2;
}

/// UMP protocol extension bits used in stream configuration.
pub mod extensions {
    /// The endpoint transmits jitter-reduction timestamps.
    pub const JITTER_REDUCTION_TRANSMIT: u8 = 0x1;
    /// The endpoint receives jitter-reduction timestamps.
    pub const JITTER_REDUCTION_RECEIVE: u8 = 0x2;
}

/// MIDI controller numbers.
#[allow(missing_docs)]
pub mod control_change {
    pub const BANK_SELECT_MSB: u8 = 0;
    pub const MODULATION_WHEEL: u8 = 1;
    pub const BREATH_CONTROLLER: u8 = 2;
    pub const FOOT_CONTROLLER: u8 = 4;
    pub const PORTAMENTO_TIME: u8 = 5;
    pub const DATA_ENTRY_MSB: u8 = 6;
    pub const VOLUME: u8 = 7;
    pub const BALANCE: u8 = 8;
    pub const PAN: u8 = 10;
    pub const EXPRESSION_CONTROLLER: u8 = 11;
    pub const EFFECT_CONTROL_1: u8 = 12;
    pub const EFFECT_CONTROL_2: u8 = 13;
    pub const GENERAL_PURPOSE_1: u8 = 16;
    pub const GENERAL_PURPOSE_2: u8 = 17;
    pub const GENERAL_PURPOSE_3: u8 = 18;
    pub const GENERAL_PURPOSE_4: u8 = 19;
    pub const BANK_SELECT_LSB: u8 = 32;
    /// Add to a controller in `0..32` to address its LSB counterpart.
    pub const LSB: u8 = 32;
    pub const DATA_ENTRY_LSB: u8 = 38;
    pub const DAMPER_PEDAL: u8 = 64;
    pub const SUSTAIN: u8 = 64;
    pub const PORTAMENTO_ON_OFF: u8 = 65;
    pub const SUSTENUTO: u8 = 66;
    pub const SOFT_PEDAL: u8 = 67;
    pub const LEGATO_FOOTSWITCH: u8 = 68;
    pub const HOLD_2: u8 = 69;
    pub const SOUND_VARIATION: u8 = 70;
    pub const TIMBRE: u8 = 71;
    pub const RELEASE_TIME: u8 = 72;
    pub const ATTACK_TIME: u8 = 73;
    pub const BRIGHTNESS: u8 = 74;
    pub const DECAY_TIME: u8 = 75;
    pub const VIBRATO_RATE: u8 = 76;
    pub const VIBRATO_DEPTH: u8 = 77;
    pub const VIBRATO_DELAY: u8 = 78;
    pub const SOUND_CONTROLLER_10: u8 = 79;
    pub const GENERAL_PURPOSE_5: u8 = 80;
    pub const GENERAL_PURPOSE_6: u8 = 81;
    pub const GENERAL_PURPOSE_7: u8 = 82;
    pub const GENERAL_PURPOSE_8: u8 = 83;
    pub const PORTAMENTO_CONTROL: u8 = 84;
    pub const REVERB_SEND_LEVEL: u8 = 91;
    pub const EFFECTS_2_DEPTH: u8 = 92;
    pub const CHORUS_SEND_LEVEL: u8 = 93;
    pub const EFFECTS_4_DEPTH: u8 = 94;
    pub const EFFECTS_5_DEPTH: u8 = 95;
    pub const DATA_INCREMENT: u8 = 96;
    pub const DATA_DECREMENT: u8 = 97;
    pub const NRPN_LSB: u8 = 98;
    pub const NRPN_MSB: u8 = 99;
    pub const RPN_LSB: u8 = 100;
    pub const RPN_MSB: u8 = 101;
    pub const ALL_SOUND_OFF: u8 = 120;
    pub const RESET_ALL_CONTROLLERS: u8 = 121;
    pub const LOCAL_CONTROL: u8 = 122;
    pub const ALL_NOTES_OFF: u8 = 123;
    pub const OMNI_MODE_OFF: u8 = 124;
    pub const OMNI_MODE_ON: u8 = 125;
    pub const MONO_MODE_ON: u8 = 126;
    pub const POLY_MODE_ON: u8 = 127;
}

/// Registered parameter numbers (bank 0 of the registered controllers).
#[allow(missing_docs)]
pub mod registered_parameter_number {
    pub const PITCH_BEND_SENSITIVITY: u8 = 0;
    pub const FINE_TUNING: u8 = 1;
    pub const COARSE_TUNING: u8 = 2;
    pub const TUNING_PROGRAM_SELECT: u8 = 3;
    pub const TUNING_BANK_SELECT: u8 = 4;
    pub const PER_NOTE_PITCH_BEND_SENSITIVITY: u8 = 7;
}

/// Registered per-note controller indices.
#[allow(missing_docs)]
pub mod registered_per_note_controller {
    pub const MODULATION: u8 = 1;
    pub const BREATH: u8 = 2;
    /// Absolute note pitch in 7.25 fixed point.
    pub const PITCH_7_25: u8 = 3;
    pub const VOLUME: u8 = 7;
    pub const BALANCE: u8 = 8;
    pub const PAN: u8 = 10;
    pub const EXPRESSION: u8 = 11;
    pub const SOUND_VARIATION: u8 = 70;
    pub const TIMBRE: u8 = 71;
    pub const RELEASE_TIME: u8 = 72;
    pub const ATTACK_TIME: u8 = 73;
    pub const BRIGHTNESS: u8 = 74;
    pub const DECAY_TIME: u8 = 75;
    pub const VIBRATO_RATE: u8 = 76;
    pub const VIBRATO_DEPTH: u8 = 77;
    pub const VIBRATO_DELAY: u8 = 78;
    pub const SOUND_CONTROLLER_10: u8 = 79;
    pub const REVERB_SEND_LEVEL: u8 = 91;
    pub const EFFECTS_2_DEPTH: u8 = 92;
    pub const CHORUS_SEND_LEVEL: u8 = 93;
    pub const EFFECTS_4_DEPTH: u8 = 94;
    pub const EFFECTS_5_DEPTH: u8 = 95;
}

/// Attribute types of MIDI 2 note-on/note-off messages.
pub mod note_attribute {
    /// No attribute data.
    pub const NONE: u8 = 0x0;
    /// Manufacturer-specific attribute data.
    pub const MANUFACTURER_SPECIFIC: u8 = 0x1;
    /// Profile-specific attribute data.
    pub const PROFILE_SPECIFIC: u8 = 0x2;
    /// Note pitch in 7.9 fixed point.
    pub const PITCH_7_9: u8 = 0x3;
}

/// Option flags of the per-note management message.
pub mod note_management {
    /// Reset per-note controllers to their defaults.
    pub const RESET: u8 = 0x1;
    /// Detach per-note controllers from previously received notes.
    pub const DETACH: u8 = 0x2;
    /// Both of the above.
    pub const DETACH_AND_RESET: u8 = 0x3;
}

fn is_channel_voice_with_status(p: &UniversalPacket, midi1: u8, midi2: u8) -> bool {
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => p.status() & 0xF0 == midi1,
        PacketType::Midi2ChannelVoice => p.status() & 0xF0 == midi2,
        _ => false,
    }
}

/// True when `p` is a channel-voice packet (either protocol) whose status
/// nibble matches `status`.
pub fn is_channel_voice_message_with_status(p: &UniversalPacket, status: u8) -> bool {
    p.is_channel_voice_message() && (p.status() & 0xF0) == (status & 0xF0)
}

/// True for note-on messages with a non-zero velocity. A MIDI 1 note-on
/// with velocity zero means note-off and is excluded here.
pub fn is_note_on_message(p: &UniversalPacket) -> bool {
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => {
            p.status() & 0xF0 == midi1_channel_voice_status::NOTE_ON && p.byte4() != 0
        }
        PacketType::Midi2ChannelVoice => p.status() & 0xF0 == channel_voice_status::NOTE_ON,
        _ => false,
    }
}

/// True for note-off messages, including the MIDI 1 note-on-with-velocity-0
/// convention.
pub fn is_note_off_message(p: &UniversalPacket) -> bool {
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => {
            let status = p.status() & 0xF0;
            status == midi1_channel_voice_status::NOTE_OFF
                || (status == midi1_channel_voice_status::NOTE_ON && p.byte4() == 0)
        }
        PacketType::Midi2ChannelVoice => p.status() & 0xF0 == channel_voice_status::NOTE_OFF,
        _ => false,
    }
}

/// True for poly-pressure messages of either protocol.
pub fn is_poly_pressure_message(p: &UniversalPacket) -> bool {
    is_channel_voice_with_status(
        p,
        midi1_channel_voice_status::POLY_PRESSURE,
        channel_voice_status::POLY_PRESSURE,
    )
}

/// True for control-change messages of either protocol.
pub fn is_control_change_message(p: &UniversalPacket) -> bool {
    is_channel_voice_with_status(
        p,
        midi1_channel_voice_status::CONTROL_CHANGE,
        channel_voice_status::CONTROL_CHANGE,
    )
}

/// True for program-change messages of either protocol.
pub fn is_program_change_message(p: &UniversalPacket) -> bool {
    is_channel_voice_with_status(
        p,
        midi1_channel_voice_status::PROGRAM_CHANGE,
        channel_voice_status::PROGRAM_CHANGE,
    )
}

/// True for channel-pressure messages of either protocol.
pub fn is_channel_pressure_message(p: &UniversalPacket) -> bool {
    is_channel_voice_with_status(
        p,
        midi1_channel_voice_status::CHANNEL_PRESSURE,
        channel_voice_status::CHANNEL_PRESSURE,
    )
}

/// True for channel pitch-bend messages of either protocol.
pub fn is_channel_pitch_bend_message(p: &UniversalPacket) -> bool {
    is_channel_voice_with_status(
        p,
        midi1_channel_voice_status::PITCH_BEND,
        channel_voice_status::PITCH_BEND,
    )
}

/// The note number of a note, poly-pressure, per-note controller, or
/// per-note pitch-bend message.
pub fn get_note_nr(p: &UniversalPacket) -> u8 {
    p.byte3() & 0x7F
}

/// The effective pitch of a note message. MIDI 2 notes carrying a pitch 7.9
/// attribute return it; everything else returns the plain note number.
pub fn get_note_pitch(p: &UniversalPacket) -> Pitch79 {
    if channel2::is_note_on_with_pitch_7_9(p) || channel2::is_note_off_with_attribute(p, note_attribute::PITCH_7_9)
    {
        Pitch79((p.word(1) & 0xFFFF) as u16)
    } else {
        Pitch79::from_note(get_note_nr(p))
    }
}

/// The velocity of a note message, widened to 16 bits. A MIDI 1 note-on
/// with velocity zero reads as the note-off default of 64.
pub fn get_note_velocity(p: &UniversalPacket) -> Velocity {
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => {
            let v = p.byte4() & 0x7F;
            if v == 0 && (p.status() & 0xF0) == midi1_channel_voice_status::NOTE_ON {
                Velocity::from_u7(64)
            } else {
                Velocity::from_u7(v)
            }
        }
        _ => Velocity((p.word(1) >> 16) as u16),
    }
}

/// The pressure of a poly-pressure message, widened to 32 bits.
pub fn get_poly_pressure_value(p: &UniversalPacket) -> ControllerValue {
    debug_assert!(is_poly_pressure_message(p));
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => ControllerValue::from_u7(p.byte4()),
        _ => ControllerValue(p.word(1)),
    }
}

/// The controller number of a control-change message.
pub fn get_controller_nr(p: &UniversalPacket) -> u8 {
    debug_assert!(is_control_change_message(p));
    p.byte3() & 0x7F
}

/// The value of a control-change message, widened to 32 bits.
pub fn get_controller_value(p: &UniversalPacket) -> ControllerValue {
    debug_assert!(is_control_change_message(p));
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => ControllerValue::from_u7(p.byte4()),
        _ => ControllerValue(p.word(1)),
    }
}

/// The program number of a program-change message.
pub fn get_program_value(p: &UniversalPacket) -> u8 {
    debug_assert!(is_program_change_message(p));
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => p.byte3() & 0x7F,
        _ => p.get_byte_7bit(4),
    }
}

/// The pressure of a channel-pressure message, widened to 32 bits.
pub fn get_channel_pressure_value(p: &UniversalPacket) -> ControllerValue {
    debug_assert!(is_channel_pressure_message(p));
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => ControllerValue::from_u7(p.byte3()),
        _ => ControllerValue(p.word(1)),
    }
}

/// The value of a channel pitch-bend message, widened to 32 bits.
pub fn get_channel_pitch_bend_value(p: &UniversalPacket) -> PitchBend {
    debug_assert!(is_channel_pitch_bend_message(p));
    match p.packet_type() {
        PacketType::Midi1ChannelVoice => {
            let lsb = u16::from(p.byte3() & 0x7F);
            let msb = u16::from(p.byte4() & 0x7F);
            PitchBend::from_u14((msb << 7) | lsb)
        }
        _ => PitchBend(p.word(1)),
    }
}
