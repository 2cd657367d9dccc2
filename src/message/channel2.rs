//! MIDI 2 channel-voice messages: two-word packets carrying 16 and 32 bit
//! values, per-note controllers, and note attributes.
use crate::message::{
    channel_voice_status as status, note_attribute, registered_parameter_number,
};
use crate::packet::{PacketType, UniversalPacket};
use crate::types::{
    ControllerIncrement, ControllerValue, Pitch79, PitchBend, PitchBendSensitivity, Velocity,
};

/// A MIDI 2 channel-voice packet with arbitrary status, index bytes, and
/// data word.
pub fn voice_message(
    group: u8,
    status: u8,
    channel: u8,
    index1: u8,
    index2: u8,
    data: u32,
) -> UniversalPacket {
    UniversalPacket::from_64(
        0x4000_0000
            | (u32::from(group & 0x0F) << 24)
            | (u32::from((status & 0xF0) | (channel & 0x0F)) << 16)
            | (u32::from(index1) << 8)
            | u32::from(index2),
        data,
    )
}

/// A note-off message.
pub fn note_off(group: u8, channel: u8, note_nr: u8, velocity: Velocity) -> UniversalPacket {
    note_off_with_attribute(group, channel, note_nr, velocity, note_attribute::NONE, 0)
}

/// A note-off message with an attribute byte and 16 bits of attribute data.
pub fn note_off_with_attribute(
    group: u8,
    channel: u8,
    note_nr: u8,
    velocity: Velocity,
    attribute: u8,
    attribute_data: u16,
) -> UniversalPacket {
    voice_message(
        group,
        status::NOTE_OFF,
        channel,
        note_nr & 0x7F,
        attribute,
        (u32::from(velocity.0) << 16) | u32::from(attribute_data),
    )
}

/// A note-on message. Unlike MIDI 1, velocity zero does not mean note-off.
pub fn note_on(group: u8, channel: u8, note_nr: u8, velocity: Velocity) -> UniversalPacket {
    note_on_with_attribute(group, channel, note_nr, velocity, note_attribute::NONE, 0)
}

/// A note-on message carrying the note pitch in 7.9 fixed point.
pub fn note_on_with_pitch(
    group: u8,
    channel: u8,
    note_nr: u8,
    velocity: Velocity,
    pitch: Pitch79,
) -> UniversalPacket {
    note_on_with_attribute(
        group,
        channel,
        note_nr,
        velocity,
        note_attribute::PITCH_7_9,
        pitch.0,
    )
}

/// A note-on message with an attribute byte and 16 bits of attribute data.
pub fn note_on_with_attribute(
    group: u8,
    channel: u8,
    note_nr: u8,
    velocity: Velocity,
    attribute: u8,
    attribute_data: u16,
) -> UniversalPacket {
    voice_message(
        group,
        status::NOTE_ON,
        channel,
        note_nr & 0x7F,
        attribute,
        (u32::from(velocity.0) << 16) | u32::from(attribute_data),
    )
}

/// A polyphonic key pressure message.
pub fn poly_pressure(
    group: u8,
    channel: u8,
    note_nr: u8,
    pressure: ControllerValue,
) -> UniversalPacket {
    voice_message(group, status::POLY_PRESSURE, channel, note_nr & 0x7F, 0, pressure.0)
}

/// A registered per-note controller message.
pub fn registered_per_note_controller(
    group: u8,
    channel: u8,
    note_nr: u8,
    controller: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(
        group,
        status::REGISTERED_PER_NOTE_CONTROLLER,
        channel,
        note_nr & 0x7F,
        controller,
        value.0,
    )
}

/// An assignable per-note controller message.
pub fn assignable_per_note_controller(
    group: u8,
    channel: u8,
    note_nr: u8,
    controller: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(
        group,
        status::ASSIGNABLE_PER_NOTE_CONTROLLER,
        channel,
        note_nr & 0x7F,
        controller,
        value.0,
    )
}

/// A per-note management message (see [`crate::message::note_management`]).
pub fn per_note_management(group: u8, channel: u8, note_nr: u8, flags: u8) -> UniversalPacket {
    voice_message(
        group,
        status::PER_NOTE_MANAGEMENT,
        channel,
        note_nr & 0x7F,
        flags,
        0,
    )
}

/// A control-change message with a 32 bit value.
pub fn control_change(
    group: u8,
    channel: u8,
    controller: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(
        group,
        status::CONTROL_CHANGE,
        channel,
        controller & 0x7F,
        0,
        value.0,
    )
}

/// A registered (RPN) controller message.
pub fn registered_controller(
    group: u8,
    channel: u8,
    bank: u8,
    index: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(
        group,
        status::REGISTERED_CONTROLLER,
        channel,
        bank & 0x7F,
        index & 0x7F,
        value.0,
    )
}

/// An assignable (NRPN) controller message.
pub fn assignable_controller(
    group: u8,
    channel: u8,
    bank: u8,
    index: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(
        group,
        status::ASSIGNABLE_CONTROLLER,
        channel,
        bank & 0x7F,
        index & 0x7F,
        value.0,
    )
}

/// A relative registered controller message carrying a signed increment.
pub fn relative_registered_controller(
    group: u8,
    channel: u8,
    bank: u8,
    index: u8,
    increment: ControllerIncrement,
) -> UniversalPacket {
    voice_message(
        group,
        status::RELATIVE_REGISTERED_CONTROLLER,
        channel,
        bank & 0x7F,
        index & 0x7F,
        increment.0 as u32,
    )
}

/// A relative assignable controller message carrying a signed increment.
pub fn relative_assignable_controller(
    group: u8,
    channel: u8,
    bank: u8,
    index: u8,
    increment: ControllerIncrement,
) -> UniversalPacket {
    voice_message(
        group,
        status::RELATIVE_ASSIGNABLE_CONTROLLER,
        channel,
        bank & 0x7F,
        index & 0x7F,
        increment.0 as u32,
    )
}

/// A program-change message without bank select.
pub fn program_change(group: u8, channel: u8, program: u8) -> UniversalPacket {
    voice_message(
        group,
        status::PROGRAM_CHANGE,
        channel,
        0,
        0,
        u32::from(program & 0x7F) << 24,
    )
}

/// A program-change message with a 14 bit bank; sets the bank-valid option
/// flag.
pub fn program_change_with_bank(group: u8, channel: u8, program: u8, bank: u16) -> UniversalPacket {
    voice_message(
        group,
        status::PROGRAM_CHANGE,
        channel,
        0,
        0x1,
        (u32::from(program & 0x7F) << 24)
            | (u32::from(bank & 0x3F80) << 1)
            | u32::from(bank & 0x7F),
    )
}

/// A channel-pressure message.
pub fn channel_pressure(group: u8, channel: u8, pressure: ControllerValue) -> UniversalPacket {
    voice_message(group, status::CHANNEL_PRESSURE, channel, 0, 0, pressure.0)
}

/// A channel pitch-bend message with a 32 bit value.
pub fn pitch_bend(group: u8, channel: u8, value: PitchBend) -> UniversalPacket {
    voice_message(group, status::PITCH_BEND, channel, 0, 0, value.0)
}

/// A per-note pitch-bend message.
pub fn per_note_pitch_bend(
    group: u8,
    channel: u8,
    note_nr: u8,
    value: PitchBend,
) -> UniversalPacket {
    voice_message(
        group,
        status::PER_NOTE_PITCH_BEND,
        channel,
        note_nr & 0x7F,
        0,
        value.0,
    )
}

/// Read access to a packet known to be a MIDI 2 channel-voice message.
#[derive(Copy, Clone, Debug)]
pub struct Midi2ChannelVoiceView<'a> {
    p: &'a UniversalPacket,
}

impl<'a> Midi2ChannelVoiceView<'a> {
    /// A view of `p`, or `None` when `p` is not a type-4 packet.
    pub fn new(p: &'a UniversalPacket) -> Option<Self> {
        (p.packet_type() == PacketType::Midi2ChannelVoice).then_some(Self { p })
    }

    /// The group nibble.
    pub fn group(&self) -> u8 {
        self.p.group()
    }

    /// The status nibble (high nibble of the status byte).
    pub fn status(&self) -> u8 {
        self.p.status() & 0xF0
    }

    /// The channel nibble.
    pub fn channel(&self) -> u8 {
        self.p.status() & 0x0F
    }

    /// The first index byte, 7 bit masked.
    pub fn byte3(&self) -> u8 {
        self.p.byte3() & 0x7F
    }

    /// The second index byte, 7 bit masked.
    pub fn byte4(&self) -> u8 {
        self.p.byte4() & 0x7F
    }

    /// The 32 bit data word.
    pub fn data(&self) -> u32 {
        self.p.word(1)
    }

    /// The underlying packet.
    pub fn packet(&self) -> &UniversalPacket {
        self.p
    }
}

/// True for type-4 packets.
pub fn is_midi2_channel_voice_message(p: &UniversalPacket) -> bool {
    p.packet_type() == PacketType::Midi2ChannelVoice
}

fn has_midi2_status(p: &UniversalPacket, status: u8) -> bool {
    is_midi2_channel_voice_message(p) && (p.status() & 0xF0) == status
}

/// True for registered (RPN) controller messages.
pub fn is_registered_controller_message(p: &UniversalPacket) -> bool {
    has_midi2_status(p, status::REGISTERED_CONTROLLER)
}

/// True for assignable (NRPN) controller messages.
pub fn is_assignable_controller_message(p: &UniversalPacket) -> bool {
    has_midi2_status(p, status::ASSIGNABLE_CONTROLLER)
}

/// True for registered per-note controller messages.
pub fn is_registered_per_note_controller_message(p: &UniversalPacket) -> bool {
    has_midi2_status(p, status::REGISTERED_PER_NOTE_CONTROLLER)
}

/// True for assignable per-note controller messages.
pub fn is_assignable_per_note_controller_message(p: &UniversalPacket) -> bool {
    has_midi2_status(p, status::ASSIGNABLE_PER_NOTE_CONTROLLER)
}

/// True for per-note pitch-bend messages.
pub fn is_per_note_pitch_bend_message(p: &UniversalPacket) -> bool {
    has_midi2_status(p, status::PER_NOTE_PITCH_BEND)
}

/// True for note-on messages whose attribute byte equals `attribute`.
pub fn is_note_on_with_attribute(p: &UniversalPacket, attribute: u8) -> bool {
    has_midi2_status(p, status::NOTE_ON) && p.byte4() == attribute
}

/// True for note-off messages whose attribute byte equals `attribute`.
pub fn is_note_off_with_attribute(p: &UniversalPacket, attribute: u8) -> bool {
    has_midi2_status(p, status::NOTE_OFF) && p.byte4() == attribute
}

/// True for note-on messages carrying a pitch 7.9 attribute.
pub fn is_note_on_with_pitch_7_9(p: &UniversalPacket) -> bool {
    is_note_on_with_attribute(p, note_attribute::PITCH_7_9)
}

/// The attribute byte of a note message.
pub fn get_midi2_note_attribute(p: &UniversalPacket) -> u8 {
    p.byte4()
}

/// The attribute data of a note message.
pub fn get_midi2_note_attribute_data(p: &UniversalPacket) -> u16 {
    (p.word(1) & 0xFFFF) as u16
}

/// The controller index of a per-note controller message.
pub fn get_per_note_controller_index(p: &UniversalPacket) -> u8 {
    p.byte4()
}

/// True for registered controller messages addressing RPN 0 (pitch-bend
/// sensitivity).
pub fn is_pitch_bend_sensitivity_message(p: &UniversalPacket) -> bool {
    is_registered_controller_message(p)
        && p.byte3() == 0
        && p.byte4() == registered_parameter_number::PITCH_BEND_SENSITIVITY
}

/// True for registered controller messages addressing RPN 7 (per-note
/// pitch-bend sensitivity).
pub fn is_per_note_pitch_bend_sensitivity_message(p: &UniversalPacket) -> bool {
    is_registered_controller_message(p)
        && p.byte3() == 0
        && p.byte4() == registered_parameter_number::PER_NOTE_PITCH_BEND_SENSITIVITY
}

/// The sensitivity carried by an RPN 0 message. RPN 0 transports whole
/// semitones and cents only, so the low bits are cleared.
pub fn get_pitch_bend_sensitivity_value(p: &UniversalPacket) -> PitchBendSensitivity {
    PitchBendSensitivity(crate::types::Pitch725(p.word(1) & 0xFFFC_0000))
}

/// The sensitivity carried by an RPN 7 message.
pub fn get_per_note_pitch_bend_sensitivity_value(p: &UniversalPacket) -> PitchBendSensitivity {
    PitchBendSensitivity(crate::types::Pitch725(p.word(1)))
}

/// The value of a per-note pitch-bend message.
pub fn get_per_note_pitch_bend_value(p: &UniversalPacket) -> PitchBend {
    PitchBend(p.word(1))
}
