//! Data packets: SysEx7 carried in two-word packets and SysEx8 carried in
//! four-word packets.
//!
//! Byte 1 of word 0 holds the packet format in its high nibble and the
//! payload byte count in its low nibble. SysEx7 packets carry up to six
//! 7 bit payload bytes; SysEx8 packets carry a stream ID and up to thirteen
//! 8 bit payload bytes.
use crate::message::PacketFormat;
use crate::packet::{PacketType, UniversalPacket};
use crate::sysex::Sysex7;

/// The maximum payload of one SysEx7 packet.
pub const SYSEX7_PACKET_CAPACITY: u8 = 6;

/// The maximum payload of one SysEx8 packet, excluding the stream ID.
pub const SYSEX8_PACKET_CAPACITY: u8 = 13;

/// An empty SysEx7 packet of the given format.
pub fn sysex7_packet(group: u8, format: PacketFormat) -> UniversalPacket {
    UniversalPacket::from_64(
        0x3000_0000 | (u32::from(group & 0x0F) << 24) | (u32::from(u8::from(format)) << 20),
        0,
    )
}

/// The payload byte count of a SysEx7 packet.
pub fn sysex7_payload_size(p: &UniversalPacket) -> u8 {
    debug_assert!(p.packet_type() == PacketType::Data);
    p.status() & 0x0F
}

/// Overwrite the payload byte count of a SysEx7 packet.
pub fn set_sysex7_payload_size(p: &mut UniversalPacket, size: u8) {
    debug_assert!(size <= SYSEX7_PACKET_CAPACITY);
    let status = (p.status() & 0xF0) | (size & 0x0F);
    p.set_byte(1, status);
}

/// Append one payload byte to a SysEx7 packet. The packet must not be full.
pub fn sysex7_add_payload_byte(p: &mut UniversalPacket, byte: u8) {
    let size = sysex7_payload_size(p);
    debug_assert!(size < SYSEX7_PACKET_CAPACITY);
    p.set_byte_7bit(2 + usize::from(size), byte);
    set_sysex7_payload_size(p, size + 1);
}

/// Read payload byte `index` of a SysEx7 packet.
pub fn sysex7_payload_byte(p: &UniversalPacket, index: u8) -> u8 {
    debug_assert!(index < sysex7_payload_size(p));
    p.get_byte_7bit(2 + usize::from(index))
}

/// The format nibble of a data packet.
pub fn data_packet_format(p: &UniversalPacket) -> PacketFormat {
    PacketFormat::from((p.status() >> 4) & 0x3)
}

/// Fragment a SysEx message into SysEx7 packets: one complete packet when
/// the manufacturer bytes and payload fit in six bytes, otherwise a
/// start/continue/end sequence with six bytes per non-final packet.
pub fn sysex7_packets(group: u8, sx: &Sysex7) -> Vec<UniversalPacket> {
    let mut bytes = sx.manufacturer_bytes();
    bytes.extend_from_slice(&sx.data);

    let capacity = usize::from(SYSEX7_PACKET_CAPACITY);
    let num_packets = bytes.len().div_ceil(capacity).max(1);
    let mut packets = Vec::with_capacity(num_packets);

    for (i, chunk) in bytes.chunks(capacity).enumerate() {
        let format = match (num_packets, i) {
            (1, _) => PacketFormat::Complete,
            (_, 0) => PacketFormat::Start,
            (n, i) if i + 1 == n => PacketFormat::End,
            _ => PacketFormat::Continue,
        };
        let mut p = sysex7_packet(group, format);
        for byte in chunk {
            sysex7_add_payload_byte(&mut p, *byte);
        }
        packets.push(p);
    }
    if bytes.is_empty() {
        packets.push(sysex7_packet(group, PacketFormat::Complete));
    }
    packets
}

/// An empty SysEx8 packet of the given format. The stream ID occupies the
/// first payload position and is included in the payload count.
pub fn sysex8_packet(group: u8, format: PacketFormat, stream_id: u8) -> UniversalPacket {
    let mut p = UniversalPacket::from_128(
        0x5000_0000 | (u32::from(group & 0x0F) << 24) | (u32::from(u8::from(format)) << 20) | (1 << 16),
        0,
        0,
        0,
    );
    p.set_byte(2, stream_id);
    p
}

/// The payload byte count of a SysEx8 packet, including the stream ID.
pub fn sysex8_payload_size(p: &UniversalPacket) -> u8 {
    debug_assert!(p.packet_type() == PacketType::ExtendedData);
    p.status() & 0x0F
}

/// The stream ID of a SysEx8 packet.
pub fn sysex8_stream_id(p: &UniversalPacket) -> u8 {
    p.get_byte(2)
}

/// Append one 8 bit payload byte to a SysEx8 packet.
pub fn sysex8_add_payload_byte(p: &mut UniversalPacket, byte: u8) {
    let size = sysex8_payload_size(p);
    debug_assert!(size <= SYSEX8_PACKET_CAPACITY);
    p.set_byte(2 + usize::from(size), byte);
    let status = (p.status() & 0xF0) | ((size + 1) & 0x0F);
    p.set_byte(1, status);
}

/// Read payload byte `index` (0 is the first byte after the stream ID).
pub fn sysex8_payload_byte(p: &UniversalPacket, index: u8) -> u8 {
    debug_assert!(index + 1 < sysex8_payload_size(p));
    p.get_byte(3 + usize::from(index))
}

/// Fragment an 8 bit payload into SysEx8 packets with the given stream ID.
pub fn sysex8_packets(group: u8, stream_id: u8, payload: &[u8]) -> Vec<UniversalPacket> {
    let capacity = usize::from(SYSEX8_PACKET_CAPACITY);
    let num_packets = payload.len().div_ceil(capacity).max(1);
    let mut packets = Vec::with_capacity(num_packets);

    if payload.is_empty() {
        packets.push(sysex8_packet(group, PacketFormat::Complete, stream_id));
        return packets;
    }
    for (i, chunk) in payload.chunks(capacity).enumerate() {
        let format = match (num_packets, i) {
            (1, _) => PacketFormat::Complete,
            (_, 0) => PacketFormat::Start,
            (n, i) if i + 1 == n => PacketFormat::End,
            _ => PacketFormat::Continue,
        };
        let mut p = sysex8_packet(group, format, stream_id);
        for byte in chunk {
            sysex8_add_payload_byte(&mut p, *byte);
        }
        packets.push(p);
    }
    packets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysex::manufacturer;
    use pretty_assertions::assert_eq;

    #[test]
    fn sysex7_packet_layout() {
        let mut p = sysex7_packet(0, PacketFormat::Complete);
        sysex7_add_payload_byte(&mut p, 0x7D);
        sysex7_add_payload_byte(&mut p, 0x25);
        sysex7_add_payload_byte(&mut p, 0x50);
        sysex7_add_payload_byte(&mut p, 0x44);
        assert_eq!(p, UniversalPacket::from_64(0x3004_7D25, 0x5044_0000));
        assert_eq!(sysex7_payload_size(&p), 4);
        assert_eq!(sysex7_payload_byte(&p, 0), 0x7D);
        assert_eq!(sysex7_payload_byte(&p, 3), 0x44);
        assert_eq!(data_packet_format(&p), PacketFormat::Complete);
    }

    #[test]
    fn sysex7_single_packet_message() {
        let sx = Sysex7::with_data(manufacturer::EDUCATIONAL, vec![0x25, 0x50, 0x44]);
        let packets = sysex7_packets(0, &sx);
        assert_eq!(packets, vec![UniversalPacket::from_64(0x3004_7D25, 0x5044_0000)]);
    }

    #[test]
    fn sysex7_multi_packet_message() {
        // 11 bytes incl. manufacturer: start of 6, end of 5
        let sx = Sysex7::with_data(
            manufacturer::NATIVE_INSTRUMENTS,
            vec![0x44, 0x03, 0x44, 0x77, 0x07, 0x70, 0x72, 0x79],
        );
        let packets = sysex7_packets(0, &sx);
        assert_eq!(
            packets,
            vec![
                UniversalPacket::from_64(0x3016_0021, 0x0944_0344),
                UniversalPacket::from_64(0x3035_7707, 0x7072_7900),
            ]
        );

        // 15 bytes: start, continue, end of 3
        let sx = Sysex7::with_data(
            0x020B, // three-byte ID 0x00 0x02 0x0B
            vec![
                0x11, 0x12, 0x14, 0x64, 0x03, 0x72, 0x08, 0x74, 0x22, 0x37, 0x7D, 0x3A,
            ],
        );
        let packets = sysex7_packets(0, &sx);
        assert_eq!(
            packets,
            vec![
                UniversalPacket::from_64(0x3016_0002, 0x0B11_1214),
                UniversalPacket::from_64(0x3026_6403, 0x7208_7422),
                UniversalPacket::from_64(0x3033_377D, 0x3A00_0000),
            ]
        );
    }

    #[test]
    fn sysex7_empty_message() {
        let sx = Sysex7::new(0);
        // a zero manufacturer still encodes as three wire bytes
        let packets = sysex7_packets(3, &sx);
        assert_eq!(packets.len(), 1);
        assert_eq!(sysex7_payload_size(&packets[0]), 3);
    }

    #[test]
    fn sysex8_packet_layout() {
        let mut p = sysex8_packet(2, PacketFormat::Complete, 0x42);
        assert_eq!(sysex8_payload_size(&p), 1);
        assert_eq!(sysex8_stream_id(&p), 0x42);
        for b in [0xDE, 0xAD, 0xBE, 0xEF] {
            sysex8_add_payload_byte(&mut p, b);
        }
        assert_eq!(sysex8_payload_size(&p), 5);
        assert_eq!(sysex8_payload_byte(&p, 0), 0xDE);
        assert_eq!(sysex8_payload_byte(&p, 3), 0xEF);
        assert_eq!(p.word(0), 0x5205_42DE);
        assert_eq!(p.word(1), 0xADBE_EF00);
    }

    #[test]
    fn sysex8_fragmentation() {
        let payload: Vec<u8> = (0..30).collect();
        let packets = sysex8_packets(1, 7, &payload);
        assert_eq!(packets.len(), 3);
        assert_eq!(data_packet_format(&packets[0]), PacketFormat::Start);
        assert_eq!(data_packet_format(&packets[1]), PacketFormat::Continue);
        assert_eq!(data_packet_format(&packets[2]), PacketFormat::End);
        assert_eq!(sysex8_payload_size(&packets[0]), 14);
        assert_eq!(sysex8_payload_size(&packets[2]), 5);
        for p in &packets {
            assert_eq!(sysex8_stream_id(p), 7);
        }

        let single = sysex8_packets(1, 7, &[1, 2, 3]);
        assert_eq!(single.len(), 1);
        assert_eq!(data_packet_format(&single[0]), PacketFormat::Complete);
    }
}
