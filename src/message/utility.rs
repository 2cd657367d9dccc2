//! Utility messages: no-op and the jitter-reduction clock and timestamp.
use crate::message::utility_status;
use crate::packet::{PacketType, UniversalPacket};

/// A utility packet with a 16 bit payload in the low half of word 0.
pub fn message(group: u8, status: u8, data: u16) -> UniversalPacket {
    UniversalPacket::from_32(
        (u32::from(group & 0x0F) << 24) | (u32::from(status) << 16) | u32::from(data),
    )
}

/// A no-operation packet.
pub fn noop() -> UniversalPacket {
    UniversalPacket::default()
}

/// A jitter-reduction clock message carrying the sender's clock time.
pub fn jr_clock(group: u8, clock_time: u16) -> UniversalPacket {
    message(group, utility_status::JR_CLOCK, clock_time)
}

/// A jitter-reduction timestamp stamping subsequent packets of the group.
pub fn jr_timestamp(group: u8, timestamp: u16) -> UniversalPacket {
    message(group, utility_status::JR_TIMESTAMP, timestamp)
}

/// Read access to a packet known to be a utility message.
#[derive(Copy, Clone, Debug)]
pub struct UtilityView<'a> {
    p: &'a UniversalPacket,
}

impl<'a> UtilityView<'a> {
    /// A view of `p`, or `None` when `p` is not a type-0 packet.
    pub fn new(p: &'a UniversalPacket) -> Option<Self> {
        (p.packet_type() == PacketType::Utility).then_some(Self { p })
    }

    /// The group nibble.
    pub fn group(&self) -> u8 {
        self.p.group()
    }

    /// The status byte.
    pub fn status(&self) -> u8 {
        self.p.status()
    }

    /// The 16 bit clock or timestamp value.
    pub fn jr_value(&self) -> u16 {
        (self.p.word(0) & 0xFFFF) as u16
    }
}
