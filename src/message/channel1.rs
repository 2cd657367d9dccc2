//! MIDI 1 channel-voice messages: one-word packets with two 7 bit data
//! bytes. Builders accept the wide value types and narrow them.
use crate::message::midi1_channel_voice_status as status;
use crate::packet::{PacketType, UniversalPacket};
use crate::types::{ControllerValue, PitchBend, Velocity};

/// A MIDI 1 channel-voice packet with arbitrary status and data bytes.
pub fn voice_message(group: u8, status: u8, channel: u8, data1: u8, data2: u8) -> UniversalPacket {
    UniversalPacket::from_32(
        0x2000_0000
            | (u32::from(group & 0x0F) << 24)
            | (u32::from((status & 0xF0) | (channel & 0x0F)) << 16)
            | (u32::from(data1 & 0x7F) << 8)
            | u32::from(data2 & 0x7F),
    )
}

/// A note-off message.
pub fn note_off(group: u8, channel: u8, note_nr: u8, velocity: Velocity) -> UniversalPacket {
    voice_message(group, status::NOTE_OFF, channel, note_nr, velocity.as_u7())
}

/// A note-on message. A velocity narrowing to zero means note-off to MIDI 1
/// receivers.
pub fn note_on(group: u8, channel: u8, note_nr: u8, velocity: Velocity) -> UniversalPacket {
    voice_message(group, status::NOTE_ON, channel, note_nr, velocity.as_u7())
}

/// A polyphonic key pressure message.
pub fn poly_pressure(
    group: u8,
    channel: u8,
    note_nr: u8,
    pressure: ControllerValue,
) -> UniversalPacket {
    voice_message(group, status::POLY_PRESSURE, channel, note_nr, pressure.as_u7())
}

/// A control-change message.
pub fn control_change(
    group: u8,
    channel: u8,
    controller: u8,
    value: ControllerValue,
) -> UniversalPacket {
    voice_message(group, status::CONTROL_CHANGE, channel, controller, value.as_u7())
}

/// A program-change message.
pub fn program_change(group: u8, channel: u8, program: u8) -> UniversalPacket {
    voice_message(group, status::PROGRAM_CHANGE, channel, program, 0)
}

/// A channel-pressure message.
pub fn channel_pressure(group: u8, channel: u8, pressure: ControllerValue) -> UniversalPacket {
    voice_message(group, status::CHANNEL_PRESSURE, channel, pressure.as_u7(), 0)
}

/// A pitch-bend message; the value is narrowed to 14 bits and split into
/// LSB/MSB data bytes.
pub fn pitch_bend(group: u8, channel: u8, value: PitchBend) -> UniversalPacket {
    let v = value.as_u14();
    voice_message(
        group,
        status::PITCH_BEND,
        channel,
        (v & 0x7F) as u8,
        ((v >> 7) & 0x7F) as u8,
    )
}

/// Read access to a packet known to be a MIDI 1 channel-voice message.
#[derive(Copy, Clone, Debug)]
pub struct Midi1ChannelVoiceView<'a> {
    p: &'a UniversalPacket,
}

impl<'a> Midi1ChannelVoiceView<'a> {
    /// A view of `p`, or `None` when `p` is not a type-2 packet.
    pub fn new(p: &'a UniversalPacket) -> Option<Self> {
        (p.packet_type() == PacketType::Midi1ChannelVoice).then_some(Self { p })
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

    /// The first data byte.
    pub fn byte3(&self) -> u8 {
        self.p.byte3() & 0x7F
    }

    /// The second data byte.
    pub fn byte4(&self) -> u8 {
        self.p.byte4() & 0x7F
    }

    /// The underlying packet.
    pub fn packet(&self) -> &UniversalPacket {
        self.p
    }
}

/// True for type-2 packets.
pub fn is_midi1_channel_voice_message(p: &UniversalPacket) -> bool {
    p.packet_type() == PacketType::Midi1ChannelVoice
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builders_pack_exact_words() {
        assert_eq!(
            note_on(0, 0, 0x40, Velocity::from_u7(0x7F)),
            UniversalPacket::from_32(0x2090_407F)
        );
        assert_eq!(
            note_off(3, 9, 66, Velocity::from_u7(112)),
            UniversalPacket::from_32(0x2389_4270)
        );
        assert_eq!(
            poly_pressure(5, 5, 0x44, ControllerValue::from_u7(0x03)),
            UniversalPacket::from_32(0x25A5_4403)
        );
        assert_eq!(
            control_change(9, 0, 49, ControllerValue::from_u7(65)),
            UniversalPacket::from_32(0x29B0_3141)
        );
        assert_eq!(program_change(14, 7, 42), UniversalPacket::from_32(0x2EC7_2A00));
        assert_eq!(
            channel_pressure(2, 14, ControllerValue::from_u7(109)),
            UniversalPacket::from_32(0x22DE_6D00)
        );
        // 0x2000 center: lsb 0x00, msb 0x40
        assert_eq!(
            pitch_bend(3, 8, PitchBend::from_u14(0x2000)),
            UniversalPacket::from_32(0x23E8_0040)
        );
    }

    #[test]
    fn wide_values_narrow() {
        assert_eq!(
            note_on(4, 7, 99, Velocity(0x4567)),
            note_on(4, 7, 99, Velocity::from_u7(0x22))
        );
        assert_eq!(
            pitch_bend(2, 14, PitchBend(0xFFFF_FFFF)).byte4(),
            0x7F
        );
    }

    #[test]
    fn view_accessors() {
        let m = note_on(4, 7, 99, Velocity::from_u7(0x22));
        let v = Midi1ChannelVoiceView::new(&m).unwrap();
        assert_eq!(v.group(), 4);
        assert_eq!(v.status(), 0x90);
        assert_eq!(v.channel(), 7);
        assert_eq!(v.byte3(), 99);
        assert_eq!(v.byte4(), 0x22);
    }

    #[test]
    fn view_rejects_other_types() {
        let m2 = crate::message::channel2::note_on(0, 0, 60, Velocity(0x8000));
        assert!(Midi1ChannelVoiceView::new(&m2).is_none());
        assert!(!is_midi1_channel_voice_message(&m2));
    }
}
