//! Stream messages: groupless four-word packets for endpoint discovery,
//! function block enumeration, and protocol negotiation.
//!
//! Word 0 carries a two-bit format field at bits 27..26 and a ten-bit
//! status at bits 25..16; there is no group nibble.
use crate::message::{stream_status, PacketFormat};
use crate::packet::{PacketType, UniversalPacket};
use crate::types::DeviceIdentity;

/// The maximum name payload of an endpoint-name or product-instance-id
/// packet.
pub const ENDPOINT_NAME_CAPACITY: usize = 14;

/// The maximum name payload of a function-block-name packet.
pub const FUNCTION_BLOCK_NAME_CAPACITY: usize = 13;

/// An empty stream packet with the given status and format.
pub fn stream_message(status: u16, format: PacketFormat) -> UniversalPacket {
    UniversalPacket::from_128(
        0xF000_0000 | (u32::from(u8::from(format)) << 26) | (u32::from(status & 0x3FF) << 16),
        0,
        0,
        0,
    )
}

/// True for type-0xF packets.
pub fn is_stream_message(p: &UniversalPacket) -> bool {
    p.packet_type() == PacketType::Stream
}

/// The ten-bit status of a stream packet.
pub fn stream_message_status(p: &UniversalPacket) -> u16 {
    debug_assert!(is_stream_message(p));
    ((p.word(0) >> 16) & 0x3FF) as u16
}

/// The format field of a stream packet.
pub fn stream_message_format(p: &UniversalPacket) -> PacketFormat {
    debug_assert!(is_stream_message(p));
    PacketFormat::from(((p.word(0) >> 26) & 0x3) as u8)
}

/// Collect the 7 bit text payload of a packet starting at byte `offset`,
/// stopping at the first NUL.
pub fn payload_as_string(p: &UniversalPacket, offset: usize) -> String {
    let mut result = String::with_capacity(16 - offset);
    for b in offset..16 {
        match p.get_byte_7bit(b) {
            0 => break,
            c => result.push(char::from(c)),
        }
    }
    result
}

fn name_packets(
    status: u16,
    prefix: Option<u8>,
    capacity: usize,
    name: &str,
    seven_bit: bool,
) -> Vec<UniversalPacket> {
    let bytes = name.as_bytes();
    let num_packets = bytes.len().div_ceil(capacity).max(1);
    let mut packets = Vec::with_capacity(num_packets);

    for (i, chunk) in bytes.chunks(capacity).enumerate() {
        let format = match (num_packets, i) {
            (1, _) => PacketFormat::Complete,
            (_, 0) => PacketFormat::Start,
            (n, i) if i + 1 == n => PacketFormat::End,
            _ => PacketFormat::Continue,
        };
        let mut p = stream_message(status, format);
        let mut b = 16 - capacity;
        if let Some(prefix) = prefix {
            p.set_byte(b - 1, prefix);
        }
        for byte in chunk {
            if seven_bit {
                p.set_byte_7bit(b, *byte);
            } else {
                p.set_byte(b, *byte);
            }
            b += 1;
        }
        packets.push(p);
    }
    if bytes.is_empty() {
        let mut p = stream_message(status, PacketFormat::Complete);
        if let Some(prefix) = prefix {
            p.set_byte(15 - capacity, prefix);
        }
        packets.push(p);
    }
    packets
}

/// An endpoint-discovery message requesting the notifications selected by
/// the five-bit `filter`.
pub fn endpoint_discovery(
    filter: u8,
    ump_version_major: u8,
    ump_version_minor: u8,
) -> UniversalPacket {
    let mut m = stream_message(stream_status::ENDPOINT_DISCOVERY, PacketFormat::Complete);
    m.set_byte(2, ump_version_major);
    m.set_byte(3, ump_version_minor);
    m.set_word(1, u32::from(filter & 0x1F));
    m
}

/// An endpoint-info notification.
pub fn endpoint_info(
    num_function_blocks: u8,
    static_function_blocks: bool,
    protocols: u8,
    extensions: u8,
    ump_version_major: u8,
    ump_version_minor: u8,
) -> UniversalPacket {
    let mut m = stream_message(stream_status::ENDPOINT_INFO, PacketFormat::Complete);
    m.set_byte(2, ump_version_major);
    m.set_byte(3, ump_version_minor);
    m.set_byte(
        4,
        (num_function_blocks & 0x7F) | if static_function_blocks { 0x80 } else { 0 },
    );
    m.set_byte(6, protocols);
    m.set_byte(7, extensions);
    m
}

/// A device-identity notification. All fields are carried as 7 bit bytes,
/// with family, model, and revision as little-endian limbs.
pub fn device_identity(identity: &DeviceIdentity) -> UniversalPacket {
    let mut m = stream_message(stream_status::DEVICE_IDENTITY, PacketFormat::Complete);
    let id = (identity.manufacturer >> 16) as u8;
    if id != 0 {
        m.set_byte_7bit(5, id);
    } else {
        m.set_byte_7bit(6, (identity.manufacturer >> 8) as u8);
        m.set_byte_7bit(7, identity.manufacturer as u8);
    }
    m.set_byte_7bit(8, identity.family as u8);
    m.set_byte_7bit(9, (identity.family >> 7) as u8);
    m.set_byte_7bit(10, identity.model as u8);
    m.set_byte_7bit(11, (identity.model >> 7) as u8);
    m.set_byte_7bit(12, identity.revision as u8);
    m.set_byte_7bit(13, (identity.revision >> 7) as u8);
    m.set_byte_7bit(14, (identity.revision >> 14) as u8);
    m.set_byte_7bit(15, (identity.revision >> 21) as u8);
    m
}

/// A single endpoint-name packet; `name` must fit one packet.
pub fn endpoint_name(format: PacketFormat, name: &str) -> UniversalPacket {
    debug_assert!(name.len() <= ENDPOINT_NAME_CAPACITY);
    let mut m = stream_message(stream_status::ENDPOINT_NAME, format);
    for (i, byte) in name.bytes().take(ENDPOINT_NAME_CAPACITY).enumerate() {
        m.set_byte(2 + i, byte);
    }
    m
}

/// Split an endpoint name into the minimum number of packets.
pub fn endpoint_name_packets(name: &str) -> Vec<UniversalPacket> {
    name_packets(
        stream_status::ENDPOINT_NAME,
        None,
        ENDPOINT_NAME_CAPACITY,
        name,
        false,
    )
}

/// A single product-instance-id packet; the text is 7 bit ASCII.
pub fn product_instance_id(format: PacketFormat, id: &str) -> UniversalPacket {
    debug_assert!(id.len() <= ENDPOINT_NAME_CAPACITY);
    debug_assert!(format != PacketFormat::Continue);
    let mut m = stream_message(stream_status::PRODUCT_INSTANCE_ID, format);
    for (i, byte) in id.bytes().take(ENDPOINT_NAME_CAPACITY).enumerate() {
        m.set_byte_7bit(2 + i, byte);
    }
    m
}

/// Split a product instance ID into the minimum number of packets.
pub fn product_instance_id_packets(id: &str) -> Vec<UniversalPacket> {
    name_packets(
        stream_status::PRODUCT_INSTANCE_ID,
        None,
        ENDPOINT_NAME_CAPACITY,
        id,
        true,
    )
}

/// A stream-configuration request for `protocol` with extension bits.
pub fn stream_configuration_request(protocol: u8, extensions: u8) -> UniversalPacket {
    debug_assert!(protocol != 0 && protocol < 0x3);
    let mut m = stream_message(
        stream_status::STREAM_CONFIGURATION_REQUEST,
        PacketFormat::Complete,
    );
    m.set_byte(2, protocol);
    m.set_byte(3, extensions);
    m
}

/// A stream-configuration notification.
pub fn stream_configuration_notification(protocol: u8, extensions: u8) -> UniversalPacket {
    debug_assert!(protocol != 0 && protocol < 0x3);
    let mut m = stream_message(
        stream_status::STREAM_CONFIGURATION_NOTIFY,
        PacketFormat::Complete,
    );
    m.set_byte(2, protocol);
    m.set_byte(3, extensions);
    m
}

/// A function-block discovery message; block `0xFF` addresses all blocks.
pub fn function_block_discovery(function_block: u8, filter: u8) -> UniversalPacket {
    debug_assert!(function_block == 0xFF || function_block < 32);
    let mut m = stream_message(
        stream_status::FUNCTION_BLOCK_DISCOVERY,
        PacketFormat::Complete,
    );
    m.set_byte(2, function_block);
    m.set_byte(3, filter);
    m
}

/// Properties of a function block advertised in a function-block-info
/// notification.
#[derive(Copy, Clone, Debug)]
pub struct FunctionBlockOptions {
    /// Whether the block is currently active.
    pub active: bool,
    /// Direction bits (see the associated constants).
    pub direction: u8,
    /// MIDI 1.0 bandwidth class.
    pub midi1: u8,
    /// UI hint bits; zero means "as direction".
    pub ui_hint: u8,
    /// CI message version supported by the block.
    pub ci_message_version: u8,
    /// Number of simultaneous SysEx8 streams the block supports.
    pub max_num_sysex8_streams: u8,
}

impl FunctionBlockOptions {
    /// The block only receives MIDI messages.
    pub const DIRECTION_INPUT: u8 = 0b01;
    /// The block only transmits MIDI messages.
    pub const DIRECTION_OUTPUT: u8 = 0b10;
    /// Every input group member has a matching output group.
    pub const BIDIRECTIONAL: u8 = 0b11;

    /// Not a MIDI 1.0 block.
    pub const NOT_MIDI1: u8 = 0b00;
    /// MIDI 1.0 without bandwidth restriction.
    pub const MIDI1_UNRESTRICTED: u8 = 0b01;
    /// MIDI 1.0 restricted to 31.25 kbit/s.
    pub const MIDI1_31250: u8 = 0b10;

    /// Present the block as its direction suggests.
    pub const UI_HINT_AS_DIRECTION: u8 = 0b00;
    /// Present the block as a receiver.
    pub const UI_HINT_RECEIVER: u8 = 0b01;
    /// Present the block as a sender.
    pub const UI_HINT_SENDER: u8 = 0b10;
}

impl Default for FunctionBlockOptions {
    fn default() -> Self {
        Self {
            active: true,
            direction: Self::BIDIRECTIONAL,
            midi1: Self::NOT_MIDI1,
            ui_hint: Self::UI_HINT_AS_DIRECTION,
            ci_message_version: 0,
            max_num_sysex8_streams: 0,
        }
    }
}

/// A function-block-info notification with explicit options.
pub fn function_block_info(
    function_block: u8,
    options: &FunctionBlockOptions,
    first_group: u8,
    num_groups_spanned: u8,
) -> UniversalPacket {
    debug_assert!(function_block < 32);
    debug_assert!(options.direction > 0 && options.direction < 4);
    debug_assert!(options.midi1 < 3);
    debug_assert!(options.ui_hint < 4);
    // a UI hint must agree with a direction the block actually has
    debug_assert!(options.ui_hint == 0 || options.direction & options.ui_hint != 0);

    let mut m = stream_message(stream_status::FUNCTION_BLOCK_INFO, PacketFormat::Complete);
    m.set_byte(
        2,
        (function_block & 0x1F) | if options.active { 0x80 } else { 0 },
    );
    let ui_hint = if options.ui_hint != 0 {
        options.ui_hint
    } else {
        options.direction
    };
    m.set_byte(
        3,
        ((ui_hint & 0x3) << 4) | ((options.midi1 & 0x3) << 2) | (options.direction & 0x3),
    );
    m.set_byte(4, first_group & 0xF);
    m.set_byte(5, num_groups_spanned & 0xF);
    m.set_byte(6, options.ci_message_version);
    m.set_byte(7, options.max_num_sysex8_streams);
    m
}

/// A single function-block-name packet; `name` must fit one packet.
pub fn function_block_name(format: PacketFormat, function_block: u8, name: &str) -> UniversalPacket {
    debug_assert!(name.len() <= FUNCTION_BLOCK_NAME_CAPACITY);
    let mut m = stream_message(stream_status::FUNCTION_BLOCK_NAME, format);
    m.set_byte(2, function_block & 0x7F);
    for (i, byte) in name.bytes().take(FUNCTION_BLOCK_NAME_CAPACITY).enumerate() {
        m.set_byte(3 + i, byte);
    }
    m
}

/// Split a function-block name into the minimum number of packets.
pub fn function_block_name_packets(function_block: u8, name: &str) -> Vec<UniversalPacket> {
    name_packets(
        stream_status::FUNCTION_BLOCK_NAME,
        Some(function_block & 0x7F),
        FUNCTION_BLOCK_NAME_CAPACITY,
        name,
        false,
    )
}

macro_rules! stream_view {
    ($(#[$doc:meta])* $name:ident, $($status:expr),+) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'a> {
            p: &'a UniversalPacket,
        }

        impl<'a> $name<'a> {
            /// A view of `p`, or `None` when `p` is not of the right
            /// stream status.
            pub fn new(p: &'a UniversalPacket) -> Option<Self> {
                (is_stream_message(p) && [$($status),+].contains(&stream_message_status(p)))
                    .then_some(Self { p })
            }
        }
    };
}

stream_view!(
    /// Read access to an endpoint-discovery message.
    EndpointDiscoveryView,
    stream_status::ENDPOINT_DISCOVERY
);

impl EndpointDiscoveryView<'_> {
    /// Major UMP version requested.
    pub fn ump_version_major(&self) -> u8 {
        self.p.byte3()
    }

    /// Minor UMP version requested.
    pub fn ump_version_minor(&self) -> u8 {
        self.p.byte4()
    }

    /// Major and minor version as one value.
    pub fn ump_version(&self) -> u16 {
        (self.p.word(0) & 0xFFFF) as u16
    }

    /// The five-bit notification filter.
    pub fn filter(&self) -> u8 {
        (self.p.word(1) & 0x1F) as u8
    }
}

stream_view!(
    /// Read access to an endpoint-info notification.
    EndpointInfoView,
    stream_status::ENDPOINT_INFO
);

impl EndpointInfoView<'_> {
    /// Major UMP version supported.
    pub fn ump_version_major(&self) -> u8 {
        self.p.byte3()
    }

    /// Minor UMP version supported.
    pub fn ump_version_minor(&self) -> u8 {
        self.p.byte4()
    }

    /// Number of function blocks on the endpoint.
    pub fn num_function_blocks(&self) -> u8 {
        self.p.get_byte(4) & 0x7F
    }

    /// True when the function block layout never changes.
    pub fn static_function_blocks(&self) -> bool {
        self.p.get_byte(4) & 0x80 != 0
    }

    /// Supported protocol bits.
    pub fn protocols(&self) -> u8 {
        self.p.get_byte(6) & 0b11
    }

    /// Supported extension bits.
    pub fn extensions(&self) -> u8 {
        self.p.get_byte(7) & 0b11
    }
}

stream_view!(
    /// Read access to a device-identity notification.
    DeviceIdentityView,
    stream_status::DEVICE_IDENTITY
);

impl DeviceIdentityView<'_> {
    /// The advertised identity, reassembled from its 7 bit limbs.
    pub fn identity(&self) -> DeviceIdentity {
        let manufacturer = if self.p.get_byte_7bit(5) != 0 {
            u32::from(self.p.get_byte_7bit(5)) << 16
        } else {
            (u32::from(self.p.get_byte_7bit(6)) << 8) | u32::from(self.p.get_byte_7bit(7))
        };
        DeviceIdentity {
            manufacturer,
            family: u16::from(self.p.get_byte_7bit(8)) | (u16::from(self.p.get_byte_7bit(9)) << 7),
            model: u16::from(self.p.get_byte_7bit(10)) | (u16::from(self.p.get_byte_7bit(11)) << 7),
            revision: u32::from(self.p.get_byte_7bit(12))
                | (u32::from(self.p.get_byte_7bit(13)) << 7)
                | (u32::from(self.p.get_byte_7bit(14)) << 14)
                | (u32::from(self.p.get_byte_7bit(15)) << 21),
        }
    }
}

stream_view!(
    /// Read access to one endpoint-name packet.
    EndpointNameView,
    stream_status::ENDPOINT_NAME
);

impl EndpointNameView<'_> {
    /// The packet's position within the name.
    pub fn format(&self) -> PacketFormat {
        stream_message_format(self.p)
    }

    /// The name bytes carried by this packet.
    pub fn payload(&self) -> String {
        payload_as_string(self.p, 2)
    }
}

stream_view!(
    /// Read access to one product-instance-id packet.
    ProductInstanceIdView,
    stream_status::PRODUCT_INSTANCE_ID
);

impl ProductInstanceIdView<'_> {
    /// The packet's position within the ID.
    pub fn format(&self) -> PacketFormat {
        stream_message_format(self.p)
    }

    /// The ID bytes carried by this packet.
    pub fn payload(&self) -> String {
        payload_as_string(self.p, 2)
    }
}

stream_view!(
    /// Read access to a stream-configuration request or notification.
    StreamConfigurationView,
    stream_status::STREAM_CONFIGURATION_REQUEST,
    stream_status::STREAM_CONFIGURATION_NOTIFY
);

impl StreamConfigurationView<'_> {
    /// The requested or active protocol.
    pub fn protocol(&self) -> u8 {
        self.p.byte3() & 0b11
    }

    /// The requested or active extension bits.
    pub fn extensions(&self) -> u8 {
        self.p.byte4() & 0b11
    }
}

stream_view!(
    /// Read access to a function-block-discovery message.
    FunctionBlockDiscoveryView,
    stream_status::FUNCTION_BLOCK_DISCOVERY
);

impl FunctionBlockDiscoveryView<'_> {
    /// The addressed block, or `0xFF` for all blocks.
    pub fn function_block(&self) -> u8 {
        self.p.byte3()
    }

    /// The four-bit notification filter.
    pub fn filter(&self) -> u8 {
        self.p.byte4() & 0b1111
    }
}

stream_view!(
    /// Read access to a function-block-info notification.
    FunctionBlockInfoView,
    stream_status::FUNCTION_BLOCK_INFO
);

impl FunctionBlockInfoView<'_> {
    /// Whether the block is active.
    pub fn active(&self) -> bool {
        self.p.word(0) & 0x8000 != 0
    }

    /// The block index.
    pub fn function_block(&self) -> u8 {
        self.p.byte3() & 0x1F
    }

    /// Direction bits.
    pub fn direction(&self) -> u8 {
        (self.p.word(0) & 0b11) as u8
    }

    /// MIDI 1.0 bandwidth class.
    pub fn midi1(&self) -> u8 {
        ((self.p.word(0) >> 2) & 0b11) as u8
    }

    /// UI hint bits.
    pub fn ui_hint(&self) -> u8 {
        ((self.p.word(0) >> 4) & 0b11) as u8
    }

    /// First UMP group spanned by the block.
    pub fn first_group(&self) -> u8 {
        self.p.get_byte(4)
    }

    /// Number of groups spanned.
    pub fn num_groups_spanned(&self) -> u8 {
        self.p.get_byte(5)
    }

    /// CI message version supported by the block.
    pub fn ci_message_version(&self) -> u8 {
        self.p.get_byte(6)
    }

    /// Number of simultaneous SysEx8 streams supported.
    pub fn max_num_sysex8_streams(&self) -> u8 {
        self.p.get_byte(7)
    }
}

stream_view!(
    /// Read access to one function-block-name packet.
    FunctionBlockNameView,
    stream_status::FUNCTION_BLOCK_NAME
);

impl FunctionBlockNameView<'_> {
    /// The packet's position within the name.
    pub fn format(&self) -> PacketFormat {
        stream_message_format(self.p)
    }

    /// The block index.
    pub fn function_block(&self) -> u8 {
        self.p.byte3() & 0x7F
    }

    /// The name bytes carried by this packet.
    pub fn payload(&self) -> String {
        payload_as_string(self.p, 3)
    }
}
