//! The MIDI 1.0 byte-stream codec: a streaming parser turning serial bytes
//! into packets or SysEx messages, and the per-packet serializer for the
//! opposite direction.
use thiserror::Error;

use crate::message::{channel1, data, system, PacketFormat};
use crate::packet::{PacketType, UniversalPacket};
use crate::sysex::Sysex7;

/// Failure of the byte-stream serializer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ByteStreamError {
    /// The output buffer cannot hold the serialized message.
    #[error("output buffer too small")]
    BufferTooSmall,
}

/// Build a group-0 packet from a complete three-byte MIDI 1.0 message.
/// Statuses with no byte-stream equivalent produce a zeroed packet.
pub fn from_midi1_byte_stream(status: u8, data1: u8, data2: u8) -> UniversalPacket {
    let tail = (u32::from(status) << 16) | (u32::from(data1) << 8) | u32::from(data2);
    match status {
        0x80..=0xEF => UniversalPacket::from_32(0x2000_0000 | tail),
        0xF1 | 0xF2 | 0xF3 | 0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE | 0xFF => {
            UniversalPacket::from_32(0x1000_0000 | tail)
        }
        _ => UniversalPacket::default(),
    }
}

/// The number of bytes `p` occupies on a MIDI 1.0 wire; zero for packets
/// with no byte-stream form.
pub fn midi1_byte_stream_size(p: &UniversalPacket) -> usize {
    match p.packet_type() {
        PacketType::System => match p.status() {
            0xF1 | 0xF3 => 2,
            0xF2 => 3,
            0xF6 | 0xF8 | 0xFA | 0xFB | 0xFC | 0xFE | 0xFF => 1,
            _ => 0,
        },
        PacketType::Midi1ChannelVoice => match p.status() & 0xF0 {
            0x80 | 0x90 | 0xA0 | 0xB0 | 0xE0 => 3,
            0xC0 | 0xD0 => 2,
            _ => 0,
        },
        PacketType::Data => {
            let payload = usize::from(p.status() & 0x0F);
            if payload > usize::from(data::SYSEX7_PACKET_CAPACITY) {
                return 0;
            }
            match (p.status() >> 4) & 0x0F {
                0x0 => payload + 2, // F0 .. F7
                0x1 => payload + 1, // F0 ..
                0x2 => payload,
                0x3 => payload + 1, // .. F7
                _ => 0,
            }
        }
        _ => 0,
    }
}

/// Serialize `p` into `buffer` as MIDI 1.0 wire bytes. Returns the number
/// of bytes written; `Ok(0)` when the packet has no byte-stream form.
pub fn to_midi1_byte_stream(
    p: &UniversalPacket,
    buffer: &mut [u8],
) -> Result<usize, ByteStreamError> {
    let size = midi1_byte_stream_size(p);
    if size == 0 {
        return Ok(0);
    }
    if buffer.len() < size {
        return Err(ByteStreamError::BufferTooSmall);
    }

    match p.packet_type() {
        PacketType::System => {
            buffer[0] = p.status();
            if size > 1 {
                buffer[1] = p.byte3() & 0x7F;
            }
            if size > 2 {
                buffer[2] = p.byte4() & 0x7F;
            }
        }
        PacketType::Midi1ChannelVoice => {
            buffer[0] = p.status();
            buffer[1] = p.byte3() & 0x7F;
            if size > 2 {
                buffer[2] = p.byte4() & 0x7F;
            }
        }
        PacketType::Data => {
            let payload = p.status() & 0x0F;
            let format = PacketFormat::from((p.status() >> 4) & 0x0F);
            let mut at = 0;
            if matches!(format, PacketFormat::Complete | PacketFormat::Start) {
                buffer[at] = 0xF0;
                at += 1;
            }
            for i in 0..payload {
                buffer[at] = data::sysex7_payload_byte(p, i);
                at += 1;
            }
            if matches!(format, PacketFormat::Complete | PacketFormat::End) {
                buffer[at] = 0xF7;
            }
        }
        _ => unreachable!(),
    }
    Ok(size)
}

/// A streaming MIDI 1.0 byte parser.
///
/// Bytes go in one at a time; completed messages come out through the
/// `on_packet` callback as group-stamped packets. SysEx is delivered to the
/// optional `on_sysex` callback as one coalesced [`Sysex7`], or — when no
/// SysEx callback is installed — as a stream of SysEx7 data packets.
///
/// Real-time bytes interspersed inside other messages are emitted between
/// the surrounding data bytes and do not disturb the in-progress message.
pub struct Midi1ByteStreamParser<'a> {
    on_packet: Box<dyn FnMut(UniversalPacket) + 'a>,
    on_sysex: Option<Box<dyn FnMut(Sysex7) + 'a>>,
    enabled: bool,
    group: u8,
    // channel-voice or system-common status currently collecting data
    collecting: u8,
    expected_data: u8,
    buffer: [u8; 2],
    buffer_idx: u8,
    in_sysex: bool,
    sysex_accum: Vec<u8>,
    fragment: Vec<u8>,
    fragments_sent: bool,
}

impl<'a> Midi1ByteStreamParser<'a> {
    /// A parser emitting every message, SysEx included, as packets.
    pub fn new(on_packet: impl FnMut(UniversalPacket) + 'a) -> Self {
        Self {
            on_packet: Box::new(on_packet),
            on_sysex: None,
            enabled: true,
            group: 0,
            collecting: 0,
            expected_data: 0,
            buffer: [0; 2],
            buffer_idx: 0,
            in_sysex: false,
            sysex_accum: Vec::new(),
            fragment: Vec::with_capacity(usize::from(data::SYSEX7_PACKET_CAPACITY)),
            fragments_sent: false,
        }
    }

    /// A parser delivering SysEx as coalesced [`Sysex7`] messages.
    pub fn with_sysex(
        on_packet: impl FnMut(UniversalPacket) + 'a,
        on_sysex: impl FnMut(Sysex7) + 'a,
    ) -> Self {
        let mut parser = Self::new(on_packet);
        parser.on_sysex = Some(Box::new(on_sysex));
        parser
    }

    /// The group stamped into emitted packets.
    pub fn group(&self) -> u8 {
        self.group
    }

    /// Change the group stamped into emitted packets.
    pub fn set_group(&mut self, group: u8) {
        debug_assert!(group < 16);
        self.group = group & 0x0F;
    }

    /// Whether callbacks currently fire.
    pub fn callbacks_enabled(&self) -> bool {
        self.enabled
    }

    /// Mute or unmute the callbacks. Parsing state advances either way.
    pub fn enable_callbacks(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Drop all partial state and return to the initial parsing state.
    /// Group and callback settings are kept.
    pub fn reset(&mut self) {
        self.collecting = 0;
        self.expected_data = 0;
        self.buffer_idx = 0;
        self.in_sysex = false;
        self.sysex_accum.clear();
        self.fragment.clear();
        self.fragments_sent = false;
    }

    /// Feed a range of bytes.
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.feed(*byte);
        }
    }

    /// Feed a single byte.
    pub fn feed(&mut self, byte: u8) {
        // Real-time passes through everything, including SysEx.
        if byte >= 0xF8 {
            if byte == 0xF9 || byte == 0xFD {
                log::trace!("ignoring undefined real-time byte {byte:#04x}");
            } else {
                self.emit_packet(system::message(self.group, byte, 0, 0));
            }
            return;
        }

        if self.in_sysex {
            if byte < 0x80 {
                self.sysex_byte(byte);
                return;
            }
            // any non-realtime status terminates the SysEx
            self.flush_sysex();
            if byte == 0xF7 {
                return;
            }
        }

        if byte >= 0x80 {
            self.status_byte(byte);
        } else {
            self.data_byte(byte);
        }
    }

    fn status_byte(&mut self, byte: u8) {
        self.buffer_idx = 0;
        match byte {
            0xF0 => {
                self.in_sysex = true;
                self.sysex_accum.clear();
                self.fragment.clear();
                self.fragments_sent = false;
                self.collecting = 0;
            }
            0xF1 | 0xF3 => {
                self.collecting = byte;
                self.expected_data = 1;
            }
            0xF2 => {
                self.collecting = byte;
                self.expected_data = 2;
            }
            0xF6 => {
                self.collecting = 0;
                self.emit_packet(system::message(self.group, byte, 0, 0));
            }
            0xF4 | 0xF5 | 0xF7 => {
                self.collecting = 0;
                log::trace!("ignoring status byte {byte:#04x}");
            }
            _ => {
                // channel voice; persists as running status
                self.collecting = byte;
                self.expected_data = if (0xC0..=0xDF).contains(&byte) { 1 } else { 2 };
            }
        }
    }

    fn data_byte(&mut self, byte: u8) {
        if self.collecting == 0 {
            log::trace!("discarding data byte {byte:#04x} with no running status");
            return;
        }
        self.buffer[usize::from(self.buffer_idx)] = byte;
        self.buffer_idx += 1;
        if self.buffer_idx < self.expected_data {
            return;
        }

        let data1 = self.buffer[0];
        let data2 = if self.expected_data > 1 { self.buffer[1] } else { 0 };
        self.buffer_idx = 0;
        if self.collecting >= 0xF0 {
            let status = self.collecting;
            self.collecting = 0;
            self.emit_packet(system::message(self.group, status, data1, data2));
        } else {
            // running status persists across messages
            self.emit_packet(channel1::voice_message(
                self.group,
                self.collecting & 0xF0,
                self.collecting & 0x0F,
                data1,
                data2,
            ));
        }
    }

    fn sysex_byte(&mut self, byte: u8) {
        if self.on_sysex.is_some() {
            self.sysex_accum.push(byte);
            return;
        }
        if self.fragment.len() == usize::from(data::SYSEX7_PACKET_CAPACITY) {
            let format = if self.fragments_sent {
                PacketFormat::Continue
            } else {
                PacketFormat::Start
            };
            self.emit_fragment(format);
            self.fragments_sent = true;
        }
        self.fragment.push(byte);
    }

    fn flush_sysex(&mut self) {
        self.in_sysex = false;
        if self.on_sysex.is_some() {
            match Sysex7::manufacturer_from_bytes(&self.sysex_accum) {
                Some((manufacturer, consumed)) => {
                    let sx = Sysex7::with_data(manufacturer, &self.sysex_accum[consumed..]);
                    self.emit_sysex(sx);
                }
                None => {
                    log::trace!(
                        "dropping SysEx with incomplete manufacturer ID ({} bytes)",
                        self.sysex_accum.len()
                    );
                }
            }
            self.sysex_accum.clear();
            return;
        }

        if self.fragments_sent {
            self.emit_fragment(PacketFormat::End);
        } else if !self.fragment.is_empty() {
            self.emit_fragment(PacketFormat::Complete);
        }
        self.fragment.clear();
        self.fragments_sent = false;
    }

    fn emit_fragment(&mut self, format: PacketFormat) {
        let mut packet = data::sysex7_packet(self.group, format);
        for byte in &self.fragment {
            data::sysex7_add_payload_byte(&mut packet, *byte);
        }
        self.fragment.clear();
        self.emit_packet(packet);
    }

    fn emit_packet(&mut self, packet: UniversalPacket) {
        if self.enabled {
            (self.on_packet)(packet);
        }
    }

    fn emit_sysex(&mut self, sx: Sysex7) {
        if self.enabled {
            if let Some(on_sysex) = self.on_sysex.as_mut() {
                on_sysex(sx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysex::manufacturer;
    use crate::types::{ControllerValue, Velocity};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Sink = Rc<RefCell<Vec<UniversalPacket>>>;
    type SysexSink = Rc<RefCell<Vec<Sysex7>>>;

    fn packet_parser(sink: &Sink) -> Midi1ByteStreamParser<'static> {
        let sink = Rc::clone(sink);
        Midi1ByteStreamParser::new(move |p| sink.borrow_mut().push(p))
    }

    fn sysex_parser(sink: &Sink, sysex: &SysexSink) -> Midi1ByteStreamParser<'static> {
        let packets = Rc::clone(sink);
        let messages = Rc::clone(sysex);
        Midi1ByteStreamParser::with_sysex(
            move |p| packets.borrow_mut().push(p),
            move |sx| messages.borrow_mut().push(sx),
        )
    }

    #[test]
    fn from_byte_stream_system() {
        let cases = [
            (0x6876F0u32, UniversalPacket::default()),
            (0x1234F1, UniversalPacket::from_32(0x10F1_3412)),
            (0x4321F2, UniversalPacket::from_32(0x10F2_2143)),
            (0x2B3DF3, UniversalPacket::from_32(0x10F3_3D2B)),
            (0x7C6AF4, UniversalPacket::default()),
            (0x7117F5, UniversalPacket::default()),
            (0x4231F6, UniversalPacket::from_32(0x10F6_3142)),
            (0x6759F7, UniversalPacket::default()),
            (0x6C7BF8, UniversalPacket::from_32(0x10F8_7B6C)),
            (0x2748F9, UniversalPacket::default()),
            (0x1728FA, UniversalPacket::from_32(0x10FA_2817)),
            (0x5C4DFD, UniversalPacket::default()),
            (0x105EFF, UniversalPacket::from_32(0x10FF_5E10)),
        ];
        for (bytes, expected) in cases {
            let m = from_midi1_byte_stream(
                (bytes & 0xFF) as u8,
                ((bytes >> 8) & 0xFF) as u8,
                ((bytes >> 16) & 0xFF) as u8,
            );
            assert_eq!(m, expected, "{bytes:06x}");
        }
    }

    #[test]
    fn from_byte_stream_channel_voice() {
        let cases = [
            (0x687683u32, UniversalPacket::from_32(0x2083_7668)),
            (0x12349E, UniversalPacket::from_32(0x209E_3412)),
            (0x4321A4, UniversalPacket::from_32(0x20A4_2143)),
            (0x2B3DB9, UniversalPacket::from_32(0x20B9_3D2B)),
            (0x7C6ACC, UniversalPacket::from_32(0x20CC_6A7C)),
            (0x7117D5, UniversalPacket::from_32(0x20D5_1771)),
            (0x4231E2, UniversalPacket::from_32(0x20E2_3142)),
        ];
        for (bytes, expected) in cases {
            let m = from_midi1_byte_stream(
                (bytes & 0xFF) as u8,
                ((bytes >> 8) & 0xFF) as u8,
                ((bytes >> 16) & 0xFF) as u8,
            );
            assert_eq!(m, expected, "{bytes:06x}");
        }
        for data_byte in 0..0x80u8 {
            assert_eq!(
                from_midi1_byte_stream(data_byte, 1, 2),
                UniversalPacket::default()
            );
        }
    }

    #[test]
    fn byte_stream_sizes() {
        // utility and everything above type 3 has no byte-stream form
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x0010_0000)), 0);
        assert_eq!(
            midi1_byte_stream_size(&UniversalPacket::from_64(0x4090_0000, 0)),
            0
        );
        assert_eq!(
            midi1_byte_stream_size(&UniversalPacket::from_128(0xF000_0000, 0, 0, 0)),
            0
        );

        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x10F1_0000)), 2);
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x10F2_0000)), 3);
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x10F6_0000)), 1);
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x10F4_0000)), 0);

        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x2090_0000)), 3);
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x20C0_0000)), 2);
        assert_eq!(midi1_byte_stream_size(&UniversalPacket::from_32(0x20E0_0000)), 3);
    }

    #[test]
    fn serialize_channel_voice() {
        let mut buffer = [0u8; 8];
        let m = channel1::note_on(4, 7, 99, Velocity(0x4567));
        assert_eq!(to_midi1_byte_stream(&m, &mut buffer), Ok(3));
        assert_eq!(&buffer[..3], &[0x97, 0x63, 0x22]);

        let m = channel1::program_change(0, 2, 15);
        assert_eq!(to_midi1_byte_stream(&m, &mut buffer), Ok(2));
        assert_eq!(&buffer[..2], &[0xC2, 0x0F]);

        let mut small = [0u8; 2];
        assert_eq!(
            to_midi1_byte_stream(&channel1::note_on(0, 0, 1, Velocity::default()), &mut small),
            Err(ByteStreamError::BufferTooSmall)
        );
    }

    #[test]
    fn serialize_sysex_fragments() {
        let mut buffer = [0u8; 8];

        let complete = UniversalPacket::from_64(0x3405_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&complete, &mut buffer), Ok(7));
        assert_eq!(&buffer[..7], &[0xF0, 1, 2, 3, 4, 5, 0xF7]);

        let complete_full = UniversalPacket::from_64(0x3406_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&complete_full, &mut buffer), Ok(8));
        assert_eq!(&buffer[..8], &[0xF0, 1, 2, 3, 4, 5, 6, 0xF7]);

        let complete_empty = UniversalPacket::from_64(0x3400_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&complete_empty, &mut buffer), Ok(2));
        assert_eq!(&buffer[..2], &[0xF0, 0xF7]);

        let start_one = UniversalPacket::from_64(0x3411_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&start_one, &mut buffer), Ok(2));
        assert_eq!(&buffer[..2], &[0xF0, 1]);

        let start_empty = UniversalPacket::from_64(0x3410_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&start_empty, &mut buffer), Ok(1));
        assert_eq!(&buffer[..1], &[0xF0]);

        let cont = UniversalPacket::from_64(0x3424_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&cont, &mut buffer), Ok(4));
        assert_eq!(&buffer[..4], &[1, 2, 3, 4]);

        let end = UniversalPacket::from_64(0x3433_0102, 0x0304_0506);
        assert_eq!(to_midi1_byte_stream(&end, &mut buffer), Ok(4));
        assert_eq!(&buffer[..4], &[1, 2, 3, 0xF7]);

        // payload counts above six are not serializable
        for status in 0x07..0x10u32 {
            let p = UniversalPacket::from_64(0x3900_0102 + (status << 16), 0);
            assert_eq!(to_midi1_byte_stream(&p, &mut buffer), Ok(0));
        }
    }

    #[test]
    fn parser_stamps_group() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);
        assert_eq!(p.group(), 0);
        p.set_group(9);
        assert_eq!(p.group(), 9);

        p.feed(0xFA);
        assert_eq!(packets.borrow()[..], [system::message(9, 0xFA, 0, 0)]);
    }

    #[test]
    fn parser_enable_callbacks() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);
        assert!(p.callbacks_enabled());

        p.feed(0xF8);
        assert_eq!(packets.borrow().len(), 1);

        p.enable_callbacks(false);
        p.feed(0xF8);
        assert_eq!(packets.borrow().len(), 1);

        p.enable_callbacks(true);
        p.feed(0xFA);
        assert_eq!(packets.borrow().len(), 2);
    }

    #[test]
    fn parser_channel_voice_and_system_common() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[0x91, 0x39, 0x64]);
        p.feed_bytes(&[0xF1, 0x21]);
        p.feed_bytes(&[0xF2, 0x34, 0x12]);
        p.feed_bytes(&[0xC5, 0x07]);
        assert_eq!(
            packets.borrow()[..],
            [
                channel1::voice_message(0, 0x90, 1, 0x39, 0x64),
                system::message(0, 0xF1, 0x21, 0),
                system::message(0, 0xF2, 0x34, 0x12),
                channel1::voice_message(0, 0xC0, 5, 0x07, 0),
            ]
        );
    }

    #[test]
    fn parser_running_status() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[0x90, 0x40, 0x7F, 0x41, 0x60]);
        assert_eq!(
            packets.borrow()[..],
            [
                channel1::voice_message(0, 0x90, 0, 0x40, 0x7F),
                channel1::voice_message(0, 0x90, 0, 0x41, 0x60),
            ]
        );
    }

    #[test]
    fn parser_system_common_cancels_running_status() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[0x90, 0x40, 0x7F, 0xF3, 0x05, 0x41, 0x60]);
        // after song select completes, 0x41 and 0x60 have no status
        assert_eq!(
            packets.borrow()[..],
            [
                channel1::voice_message(0, 0x90, 0, 0x40, 0x7F),
                system::message(0, 0xF3, 0x05, 0),
            ]
        );
    }

    #[test]
    fn parser_real_time_interspersion() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[0x90, 0xF8, 0x40, 0x7F]);
        assert_eq!(
            packets.borrow()[..],
            [
                system::message(0, 0xF8, 0, 0),
                channel1::voice_message(0, 0x90, 0, 0x40, 0x7F),
            ]
        );

        packets.borrow_mut().clear();
        p.feed_bytes(&[0xA5, 0x44, 0x03, 0x44, 0xFA, 0x77]);
        assert_eq!(
            packets.borrow()[..],
            [
                channel1::voice_message(0, 0xA0, 5, 0x44, 0x03),
                system::message(0, 0xFA, 0, 0),
                channel1::voice_message(0, 0xA0, 5, 0x44, 0x77),
            ]
        );
    }

    #[test]
    fn parser_undefined_bytes_are_dropped() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[0xF9, 0xFD, 0x42, 0xF4, 0x10, 0xF7]);
        assert!(packets.borrow().is_empty());
    }

    #[test]
    fn parser_sysex_callback() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        p.feed_bytes(&[0xF0, 0x7D, 0x25, 0x50, 0x44, 0xF7]);
        p.feed_bytes(&[0xF0, 0x00, 0x21, 0x09, 0x44, 0x03, 0xF7]);
        assert!(packets.borrow().is_empty());
        assert_eq!(
            sysex.borrow()[..],
            [
                Sysex7::with_data(manufacturer::EDUCATIONAL, vec![0x25, 0x50, 0x44]),
                Sysex7::with_data(manufacturer::NATIVE_INSTRUMENTS, vec![0x44, 0x03]),
            ]
        );
    }

    #[test]
    fn parser_sysex_packets() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        let byte_stream = [
            0xF0, 0x7D, 0x25, 0x50, 0x44, 0xF7, 0xF0, 0x00, 0x21, 0x09, 0x44, 0x03, 0x44, 0x77,
            0x07, 0x70, 0x72, 0x79, 0xF7, 0xF0, 0x00, 0x02, 0x0B, 0x11, 0x12, 0x14, 0x64, 0x03,
            0x72, 0x08, 0x74, 0x22, 0x37, 0x7D, 0x3A, 0xF7,
        ];
        let expected = [
            UniversalPacket::from_64(0x3004_7D25, 0x5044_0000),
            UniversalPacket::from_64(0x3016_0021, 0x0944_0344),
            UniversalPacket::from_64(0x3035_7707, 0x7072_7900),
            UniversalPacket::from_64(0x3016_0002, 0x0B11_1214),
            UniversalPacket::from_64(0x3026_6403, 0x7208_7422),
            UniversalPacket::from_64(0x3033_377D, 0x3A00_0000),
        ];

        for byte in byte_stream {
            p.feed(byte);
        }
        assert_eq!(packets.borrow()[..], expected);

        packets.borrow_mut().clear();
        p.feed_bytes(&byte_stream);
        assert_eq!(packets.borrow()[..], expected);
    }

    #[test]
    fn parser_sysex_real_time_interspersion() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        p.feed_bytes(&[0xF0, 0x7D, 0x01, 0xF8, 0x02, 0xF7]);
        assert_eq!(packets.borrow()[..], [system::message(0, 0xF8, 0, 0)]);
        assert_eq!(
            sysex.borrow()[..],
            [Sysex7::with_data(manufacturer::EDUCATIONAL, vec![0x01, 0x02])]
        );
    }

    #[test]
    fn parser_sysex_cancelled_by_status() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        // a new status byte terminates the SysEx with the bytes so far
        p.feed_bytes(&[0xF0, 0x7D, 0x11, 0x90, 0x40, 0x50]);
        assert_eq!(
            sysex.borrow()[..],
            [Sysex7::with_data(manufacturer::EDUCATIONAL, vec![0x11])]
        );
        assert_eq!(
            packets.borrow()[..],
            [channel1::voice_message(0, 0x90, 0, 0x40, 0x50)]
        );
    }

    #[test]
    fn parser_invalid_sysex() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        p.feed_bytes(&[
            0xF0, 0xF7, 0xF0, 0x00, 0xF7, 0xF0, 0x00, 0x11, 0xF7, 0xF0, 0x7D, 0xF7, 0xF0, 0x00,
            0x21, 0x09, 0xF7,
        ]);
        assert!(packets.borrow().is_empty());
        assert_eq!(
            sysex.borrow()[..],
            [
                Sysex7::new(manufacturer::EDUCATIONAL),
                Sysex7::new(manufacturer::NATIVE_INSTRUMENTS),
            ]
        );
    }

    #[test]
    fn parser_reset() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        p.feed_bytes(&[0xF0, 0x00, 0x11]);
        p.reset();
        p.feed_bytes(&[0x11, 0xF7]);
        assert!(packets.borrow().is_empty());
        assert!(sysex.borrow().is_empty());
    }

    #[test]
    fn parser_without_sysex_callback_interleaves() {
        let packets: Sink = Rc::default();
        let mut p = packet_parser(&packets);

        p.feed_bytes(&[
            0x83, 0x45, 0x6E, 0xF0, 0x01, 0x02, 0xF7, 0x9E, 0x30, 0x7F, 0xF0, 0xF7,
        ]);
        let mut sysex_packet = data::sysex7_packet(0, PacketFormat::Complete);
        data::sysex7_add_payload_byte(&mut sysex_packet, 0x01);
        data::sysex7_add_payload_byte(&mut sysex_packet, 0x02);
        assert_eq!(
            packets.borrow()[..],
            [
                channel1::voice_message(0, 0x80, 3, 0x45, 0x6E),
                sysex_packet,
                channel1::voice_message(0, 0x90, 14, 0x30, 0x7F),
            ]
        );
    }

    #[test]
    fn parser_large_sysex() {
        let packets: Sink = Rc::default();
        let sysex: SysexSink = Rc::default();
        let mut p = sysex_parser(&packets, &sysex);

        let mut expected = Sysex7::with_capacity(0x10_0000, 1234);
        for i in 0..1234u32 {
            expected.data.push((i % 128) as u8);
        }

        p.feed(0xF0);
        p.feed(0x10);
        p.feed_bytes(&expected.data.clone());
        p.feed(0xF7);
        assert_eq!(sysex.borrow()[..], [expected]);
    }

    #[test]
    fn serializer_parser_symmetry() {
        let messages = [
            channel1::note_on(0, 7, 99, Velocity::from_u7(0x22)),
            channel1::note_off(0, 2, 67, Velocity::from_u7(1)),
            channel1::poly_pressure(0, 5, 0x44, ControllerValue::from_u7(0x03)),
            channel1::control_change(0, 15, 7, ControllerValue::from_u7(19)),
            channel1::program_change(0, 2, 15),
            channel1::channel_pressure(0, 14, ControllerValue::from_u7(109)),
            channel1::pitch_bend(0, 8, crate::types::PitchBend::from_u14(0x2222)),
        ];
        for m in messages {
            let mut buffer = [0u8; 8];
            let size = to_midi1_byte_stream(&m, &mut buffer).unwrap();
            let packets: Sink = Rc::default();
            let mut parser = packet_parser(&packets);
            parser.feed_bytes(&buffer[..size]);
            assert_eq!(packets.borrow()[..], [m]);
        }
    }
}
