//! Translation between MIDI 1 and MIDI 2 channel-voice packets.
//!
//! The two protocols overlap but do not coincide: note attributes, bank
//! select, per-note controllers, and the registered/assignable controller
//! families have no MIDI 1 form, and a handful of controller numbers are
//! reserved for MIDI 2 replacements. Translation returns `None` wherever a
//! packet cannot be represented on the other side.
use crate::message::{
    channel1, channel2, channel_voice_status, midi1_channel_voice_status, note_attribute,
};
use crate::packet::{PacketType, UniversalPacket};
use crate::types::{
    upsample_14_to_32, upsample_7_to_16, upsample_7_to_32, ControllerValue, PitchBend, Velocity,
};

/// Controller numbers that do not translate between the protocols: bank
/// select, (N)RPN data entry and selection, and high-resolution velocity.
pub const RESERVED_CONTROLLERS: [u8; 9] = [0, 6, 32, 38, 88, 98, 99, 100, 101];

/// Promote a MIDI 1 channel-voice packet to its MIDI 2 equivalent.
///
/// A note-on with velocity zero becomes a note-off with velocity 64;
/// 7 and 14 bit values widen with the center-preserving scheme. Returns
/// `None` for reserved controllers, undefined statuses, and packets that
/// are not MIDI 1 channel voice.
pub fn midi1_to_midi2(p: &UniversalPacket) -> Option<UniversalPacket> {
    if p.packet_type() != PacketType::Midi1ChannelVoice {
        return None;
    }
    let group = p.group();
    let channel = p.status() & 0x0F;
    let data1 = p.byte3() & 0x7F;
    let data2 = p.byte4() & 0x7F;

    match p.status() & 0xF0 {
        midi1_channel_voice_status::NOTE_OFF => Some(channel2::note_off(
            group,
            channel,
            data1,
            Velocity(upsample_7_to_16(data2)),
        )),
        midi1_channel_voice_status::NOTE_ON => {
            if data2 == 0 {
                // MIDI 1 note on with velocity 0 means note off
                Some(channel2::note_off(
                    group,
                    channel,
                    data1,
                    Velocity(upsample_7_to_16(64)),
                ))
            } else {
                Some(channel2::note_on(
                    group,
                    channel,
                    data1,
                    Velocity(upsample_7_to_16(data2)),
                ))
            }
        }
        midi1_channel_voice_status::POLY_PRESSURE => Some(channel2::poly_pressure(
            group,
            channel,
            data1,
            ControllerValue(upsample_7_to_32(data2)),
        )),
        midi1_channel_voice_status::CONTROL_CHANGE => {
            if RESERVED_CONTROLLERS.contains(&data1) {
                return None;
            }
            Some(channel2::control_change(
                group,
                channel,
                data1,
                ControllerValue(upsample_7_to_32(data2)),
            ))
        }
        midi1_channel_voice_status::PROGRAM_CHANGE => {
            Some(channel2::program_change(group, channel, data1))
        }
        midi1_channel_voice_status::CHANNEL_PRESSURE => Some(channel2::channel_pressure(
            group,
            channel,
            ControllerValue(upsample_7_to_32(data1)),
        )),
        midi1_channel_voice_status::PITCH_BEND => {
            let value = u16::from(data1) | (u16::from(data2) << 7);
            Some(channel2::pitch_bend(
                group,
                channel,
                PitchBend(upsample_14_to_32(value)),
            ))
        }
        _ => None,
    }
}

/// Demote a MIDI 2 channel-voice packet to its MIDI 1 equivalent.
///
/// A note-on whose velocity narrows to zero emits velocity 1, because a
/// MIDI 1 velocity of zero would read as note-off. Notes with attributes,
/// program changes with a bank, reserved controllers, and the per-note and
/// registered/assignable controller families return `None`.
pub fn midi2_to_midi1(p: &UniversalPacket) -> Option<UniversalPacket> {
    if p.packet_type() != PacketType::Midi2ChannelVoice {
        return None;
    }
    let group = p.group();
    let channel = p.status() & 0x0F;
    let index1 = p.byte3() & 0x7F;
    let index2 = p.byte4();
    let data = p.word(1);

    match p.status() & 0xF0 {
        channel_voice_status::NOTE_OFF => {
            if index2 != note_attribute::NONE {
                return None;
            }
            Some(channel1::note_off(
                group,
                channel,
                index1,
                Velocity((data >> 16) as u16),
            ))
        }
        channel_voice_status::NOTE_ON => {
            if index2 != note_attribute::NONE {
                return None;
            }
            let mut velocity = Velocity((data >> 16) as u16).as_u7();
            if velocity == 0 {
                velocity = 1;
            }
            Some(channel1::note_on(
                group,
                channel,
                index1,
                Velocity::from_u7(velocity),
            ))
        }
        channel_voice_status::POLY_PRESSURE => Some(channel1::poly_pressure(
            group,
            channel,
            index1,
            ControllerValue(data),
        )),
        channel_voice_status::CONTROL_CHANGE => {
            if RESERVED_CONTROLLERS.contains(&index1) {
                return None;
            }
            Some(channel1::control_change(
                group,
                channel,
                index1,
                ControllerValue(data),
            ))
        }
        channel_voice_status::PROGRAM_CHANGE => {
            if index2 & 0x1 != 0 {
                // bank select does not round-trip through MIDI 1
                return None;
            }
            Some(channel1::program_change(group, channel, (data >> 24) as u8))
        }
        channel_voice_status::CHANNEL_PRESSURE => Some(channel1::channel_pressure(
            group,
            channel,
            ControllerValue(data),
        )),
        channel_voice_status::PITCH_BEND => {
            Some(channel1::pitch_bend(group, channel, PitchBend(data)))
        }
        _ => None,
    }
}
