//! System common and real-time messages.
use crate::message::system_status;
use crate::packet::{PacketType, UniversalPacket};

/// A system message packet. Statuses that carry no data take zero for the
/// data bytes.
pub fn message(group: u8, status: u8, data1: u8, data2: u8) -> UniversalPacket {
    UniversalPacket::from_32(
        0x1000_0000
            | (u32::from(group & 0x0F) << 24)
            | (u32::from(status) << 16)
            | (u32::from(data1 & 0x7F) << 8)
            | u32::from(data2 & 0x7F),
    )
}

/// A song-position-pointer message from a 14 bit position.
pub fn song_position(group: u8, position: u16) -> UniversalPacket {
    message(
        group,
        system_status::SONG_POSITION,
        (position & 0x7F) as u8,
        ((position >> 7) & 0x7F) as u8,
    )
}

/// Read access to a packet known to be a system message.
#[derive(Copy, Clone, Debug)]
pub struct SystemView<'a> {
    p: &'a UniversalPacket,
}

impl<'a> SystemView<'a> {
    /// A view of `p`, or `None` when `p` is not a type-1 packet.
    pub fn new(p: &'a UniversalPacket) -> Option<Self> {
        (p.packet_type() == PacketType::System).then_some(Self { p })
    }

    /// The group nibble.
    pub fn group(&self) -> u8 {
        self.p.group()
    }

    /// The status byte.
    pub fn status(&self) -> u8 {
        self.p.status()
    }

    /// The MTC quarter-frame value. Status must be `MTC_QUARTER_FRAME`.
    pub fn time_code(&self) -> u8 {
        debug_assert!(self.status() == system_status::MTC_QUARTER_FRAME);
        self.p.byte3() & 0x7F
    }

    /// The 14 bit song position. Status must be `SONG_POSITION`.
    pub fn song_position(&self) -> u16 {
        debug_assert!(self.status() == system_status::SONG_POSITION);
        u16::from(self.p.byte3() & 0x7F) | (u16::from(self.p.byte4() & 0x7F) << 7)
    }

    /// The selected song. Status must be `SONG_SELECT`.
    pub fn song_select(&self) -> u8 {
        debug_assert!(self.status() == system_status::SONG_SELECT);
        self.p.byte3() & 0x7F
    }
}
