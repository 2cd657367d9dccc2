//! System Exclusive payloads and the universal SysEx envelope.
//!
//! A [`Sysex7`] is a manufacturer ID plus a growable sequence of 7 bit data
//! bytes — the bytes between `0xF0` and `0xF7` on a MIDI 1.0 wire, or the
//! payload of a stream of SysEx7 UMPs. Universal SysEx messages give the
//! leading data bytes a fixed meaning (`device_id`, `type`, `subtype`) and
//! carry identity request/reply and all of MIDI-CI.
use crate::types::DeviceIdentity;

/// System Exclusive manufacturer IDs.
///
/// One-byte IDs are stored in the third byte (`id << 16`); three-byte IDs
/// (`0x00 m1 m2` on the wire) occupy the low fourteen bits. The two
/// encodings cannot collide.
#[allow(missing_docs)]
pub mod manufacturer {
    pub const UNIVERSAL_NON_REALTIME: u32 = 0x7E_0000;
    pub const UNIVERSAL_REALTIME: u32 = 0x7F_0000;
    pub const EDUCATIONAL: u32 = 0x7D_0000;
    pub const MOOG: u32 = 0x04_0000;
    pub const ROLAND: u32 = 0x41_0000;
    pub const NATIVE_INSTRUMENTS: u32 = 0x2109;
}

/// A System Exclusive message: manufacturer ID and 7 bit payload.
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq)]
pub struct Sysex7 {
    /// The manufacturer ID (see [`manufacturer`]).
    pub manufacturer: u32,
    /// The payload bytes, each `< 0x80` for a valid message.
    pub data: Vec<u8>,
}

impl Sysex7 {
    /// An empty message for `manufacturer`.
    pub fn new(manufacturer: u32) -> Self {
        Self {
            manufacturer,
            data: Vec::new(),
        }
    }

    /// A message with payload.
    pub fn with_data(manufacturer: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            manufacturer,
            data: data.into(),
        }
    }

    /// An empty message with `capacity` bytes reserved.
    pub fn with_capacity(manufacturer: u32, capacity: usize) -> Self {
        Self {
            manufacturer,
            data: Vec::with_capacity(capacity),
        }
    }

    /// The payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when every payload byte fits in 7 bits.
    pub fn is_7bit(&self) -> bool {
        self.data.iter().all(|b| *b < 0x80)
    }

    /// The manufacturer ID as it appears on a MIDI 1.0 wire: one byte, or
    /// `0x00` plus two bytes.
    pub fn manufacturer_bytes(&self) -> Vec<u8> {
        let id = (self.manufacturer >> 16) as u8;
        if id != 0 {
            vec![id & 0x7F]
        } else {
            vec![
                0,
                ((self.manufacturer >> 8) & 0x7F) as u8,
                (self.manufacturer & 0x7F) as u8,
            ]
        }
    }

    /// Reassemble a manufacturer ID from its leading wire bytes. Returns
    /// the ID and the number of bytes consumed, or `None` when the bytes do
    /// not contain a complete ID.
    pub fn manufacturer_from_bytes(bytes: &[u8]) -> Option<(u32, usize)> {
        match bytes.first()? {
            0 => {
                if bytes.len() < 3 {
                    return None;
                }
                Some(((u32::from(bytes[1] & 0x7F) << 8) | u32::from(bytes[2] & 0x7F), 3))
            }
            id => Some((u32::from(id & 0x7F) << 16, 1)),
        }
    }

    /// The size of the complete MIDI 1.0 byte-stream rendition, including
    /// the `0xF0`/`0xF7` frame.
    pub fn total_byte_stream_size(&self) -> usize {
        2 + self.manufacturer_bytes().len() + self.data.len()
    }

    /// Append a 7 bit value.
    pub fn add_u7(&mut self, value: u8) {
        self.data.push(value & 0x7F);
    }

    /// Append a 14 bit value as two little-endian 7 bit limbs.
    pub fn add_u14(&mut self, value: u16) {
        self.data.push((value & 0x7F) as u8);
        self.data.push(((value >> 7) & 0x7F) as u8);
    }

    /// Append a 28 bit value as four little-endian 7 bit limbs.
    pub fn add_u28(&mut self, value: u32) {
        self.data.push((value & 0x7F) as u8);
        self.data.push(((value >> 7) & 0x7F) as u8);
        self.data.push(((value >> 14) & 0x7F) as u8);
        self.data.push(((value >> 21) & 0x7F) as u8);
    }

    /// Append raw payload bytes.
    pub fn add_data(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append a device identity: three manufacturer bytes, then family,
    /// model, and revision as little-endian limbs (eleven bytes in all).
    pub fn add_device_identity(&mut self, identity: &DeviceIdentity) {
        let id = (identity.manufacturer >> 16) as u8;
        if id != 0 {
            self.data.push(id & 0x7F);
            self.data.push(0);
            self.data.push(0);
        } else {
            self.data.push(0);
            self.data.push(((identity.manufacturer >> 8) & 0x7F) as u8);
            self.data.push((identity.manufacturer & 0x7F) as u8);
        }
        self.add_u14(identity.family);
        self.add_u14(identity.model);
        self.add_u28(identity.revision);
    }

    /// Read the 7 bit value at `offset`.
    pub fn u7_at(&self, offset: usize) -> u8 {
        self.data[offset] & 0x7F
    }

    /// Read a 14 bit value stored as two little-endian limbs at `offset`.
    pub fn u14_at(&self, offset: usize) -> u16 {
        u16::from(self.data[offset] & 0x7F) | (u16::from(self.data[offset + 1] & 0x7F) << 7)
    }

    /// Read a 28 bit value stored as four little-endian limbs at `offset`.
    pub fn u28_at(&self, offset: usize) -> u32 {
        u32::from(self.data[offset] & 0x7F)
            | (u32::from(self.data[offset + 1] & 0x7F) << 7)
            | (u32::from(self.data[offset + 2] & 0x7F) << 14)
            | (u32::from(self.data[offset + 3] & 0x7F) << 21)
    }

    /// Read an eleven-byte device identity at `offset`.
    pub fn device_identity_at(&self, offset: usize) -> DeviceIdentity {
        let manufacturer = if self.data[offset] != 0 {
            u32::from(self.data[offset] & 0x7F) << 16
        } else {
            (u32::from(self.data[offset + 1] & 0x7F) << 8) | u32::from(self.data[offset + 2] & 0x7F)
        };
        DeviceIdentity {
            manufacturer,
            family: self.u14_at(offset + 3),
            model: self.u14_at(offset + 5),
            revision: self.u28_at(offset + 7),
        }
    }
}

/// Universal SysEx type bytes (`data[1]`).
pub mod universal_sysex_type {
    /// Sample dump header (non-realtime).
    pub const SAMPLE_DUMP_HEADER: u8 = 0x01;
    /// General information (non-realtime); identity request/reply.
    pub const GENERAL_INFORMATION: u8 = 0x06;
    /// MIDI Capability Inquiry (non-realtime).
    pub const CAPABILITY_INQUIRY: u8 = 0x0D;
    /// MIDI time code (realtime).
    pub const MIDI_TIME_CODE_REAL_TIME: u8 = 0x01;
}

/// Universal SysEx subtype bytes (`data[2]`).
pub mod universal_sysex_subtype {
    /// Identity request under general information.
    pub const IDENTITY_REQUEST: u8 = 0x01;
    /// Identity reply under general information.
    pub const IDENTITY_REPLY: u8 = 0x02;
    /// Full time code message under MIDI time code.
    pub const MTC_FULL_MESSAGE: u8 = 0x01;
}

/// Broadcast device ID addressing the whole endpoint.
pub const BROADCAST_DEVICE_ID: u8 = 0x7F;

/// True when `sx` is shaped as a universal SysEx message: one of the two
/// universal manufacturer IDs and at least three payload bytes.
pub fn is_universal_sysex_message(sx: &Sysex7) -> bool {
    (sx.manufacturer == manufacturer::UNIVERSAL_NON_REALTIME
        || sx.manufacturer == manufacturer::UNIVERSAL_REALTIME)
        && sx.data.len() >= 3
}

/// The device ID of `sx`, or `0xFF` when `sx` is not universal SysEx.
pub fn universal_sysex_device_id_of(sx: &Sysex7) -> u8 {
    if is_universal_sysex_message(sx) {
        sx.data[0]
    } else {
        0xFF
    }
}

/// The type byte of `sx`, or zero when `sx` is not universal SysEx.
pub fn universal_sysex_type_of(sx: &Sysex7) -> u8 {
    if is_universal_sysex_message(sx) {
        sx.data[1]
    } else {
        0
    }
}

/// The subtype byte of `sx`, or zero when `sx` is not universal SysEx.
pub fn universal_sysex_subtype_of(sx: &Sysex7) -> u8 {
    if is_universal_sysex_message(sx) {
        sx.data[2]
    } else {
        0
    }
}

/// Overwrite the device ID of a universal SysEx message.
pub fn set_universal_sysex_device_id(sx: &mut Sysex7, device_id: u8) {
    debug_assert!(is_universal_sysex_message(sx));
    sx.data[0] = device_id & 0x7F;
}

/// Read access to a [`Sysex7`] known to be a universal SysEx message.
#[derive(Copy, Clone, Debug)]
pub struct UniversalSysexView<'a> {
    sx: &'a Sysex7,
}

impl<'a> UniversalSysexView<'a> {
    /// A view of `sx`, or `None` when `sx` is not universal SysEx.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        is_universal_sysex_message(sx).then_some(Self { sx })
    }

    /// The device ID; `0x7F` addresses the whole endpoint.
    pub fn device_id(&self) -> u8 {
        self.sx.data[0]
    }

    /// The universal SysEx type byte.
    pub fn sysex_type(&self) -> u8 {
        self.sx.data[1]
    }

    /// The universal SysEx subtype byte.
    pub fn subtype(&self) -> u8 {
        self.sx.data[2]
    }

    /// The number of payload bytes following the three envelope bytes.
    pub fn payload_size(&self) -> usize {
        self.sx.data.len() - 3
    }

    /// The payload bytes following the envelope.
    pub fn payload(&self) -> &'a [u8] {
        &self.sx.data[3..]
    }

    /// The underlying message.
    pub fn sysex(&self) -> &'a Sysex7 {
        self.sx
    }
}

/// An identity request addressed to `device_id`.
pub fn identity_request(device_id: u8) -> Sysex7 {
    Sysex7::with_data(
        manufacturer::UNIVERSAL_NON_REALTIME,
        vec![
            device_id & 0x7F,
            universal_sysex_type::GENERAL_INFORMATION,
            universal_sysex_subtype::IDENTITY_REQUEST,
        ],
    )
}

/// An identity reply describing `identity`, sent from `device_id`.
/// One-byte manufacturer IDs use the short form; three-byte IDs are
/// escaped with a leading zero.
pub fn identity_reply(identity: &DeviceIdentity, device_id: u8) -> Sysex7 {
    let mut sx = Sysex7::with_capacity(manufacturer::UNIVERSAL_NON_REALTIME, 14);
    sx.data.extend_from_slice(&[
        device_id & 0x7F,
        universal_sysex_type::GENERAL_INFORMATION,
        universal_sysex_subtype::IDENTITY_REPLY,
    ]);
    let id = (identity.manufacturer >> 16) as u8;
    if id != 0 {
        sx.add_u7(id);
    } else {
        sx.add_u7(0);
        sx.add_u7(((identity.manufacturer >> 8) & 0x7F) as u8);
        sx.add_u7((identity.manufacturer & 0x7F) as u8);
    }
    sx.add_u14(identity.family);
    sx.add_u14(identity.model);
    sx.add_u28(identity.revision);
    sx
}

/// True for identity request messages.
pub fn is_identity_request(sx: &Sysex7) -> bool {
    sx.manufacturer == manufacturer::UNIVERSAL_NON_REALTIME
        && sx.data.len() >= 3
        && sx.data[1] == universal_sysex_type::GENERAL_INFORMATION
        && sx.data[2] == universal_sysex_subtype::IDENTITY_REQUEST
}

/// True for identity reply messages of a valid length.
pub fn is_identity_reply(sx: &Sysex7) -> bool {
    IdentityReplyView::validate(sx)
}

/// Read access to an identity reply.
#[derive(Copy, Clone, Debug)]
pub struct IdentityReplyView<'a> {
    sx: &'a Sysex7,
}

impl<'a> IdentityReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid identity reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then_some(Self { sx })
    }

    /// True when `sx` is an identity reply whose length matches its
    /// manufacturer encoding: twelve bytes plain, fourteen escaped.
    pub fn validate(sx: &Sysex7) -> bool {
        if sx.manufacturer != manufacturer::UNIVERSAL_NON_REALTIME
            || sx.data.len() < 4
            || sx.data[1] != universal_sysex_type::GENERAL_INFORMATION
            || sx.data[2] != universal_sysex_subtype::IDENTITY_REPLY
        {
            return false;
        }
        let expected = if sx.data[3] == 0 { 14 } else { 12 };
        sx.data.len() == expected
    }

    /// The device ID of the replying device.
    pub fn device_id(&self) -> u8 {
        self.sx.data[0]
    }

    /// The reported identity.
    pub fn identity(&self) -> DeviceIdentity {
        let (manufacturer, base) = if self.sx.data[3] == 0 {
            (
                (u32::from(self.sx.data[4] & 0x7F) << 8) | u32::from(self.sx.data[5] & 0x7F),
                6,
            )
        } else {
            (u32::from(self.sx.data[3] & 0x7F) << 16, 4)
        };
        DeviceIdentity {
            manufacturer,
            family: self.sx.u14_at(base),
            model: self.sx.u14_at(base + 2),
            revision: self.sx.u28_at(base + 4),
        }
    }
}
