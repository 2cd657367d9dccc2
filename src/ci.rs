//! MIDI Capability Inquiry: discovery, profile configuration, property
//! exchange, and process inquiry, carried inside universal non-realtime
//! SysEx messages.
//!
//! Every CI message shares a twelve-byte envelope: device ID, the CI
//! sub-ID (`0x0D`), a subtype, a message version, and source and
//! destination MUIDs as little-endian 7 bit limbs. Views validate an
//! incoming [`Sysex7`] before exposing typed accessors; builders always
//! produce well-formed messages.
use crate::muid::{self, Muid};
use crate::sysex::{manufacturer, universal_sysex_type, Sysex7};
use crate::types::DeviceIdentity;

pub mod process_inquiry;
pub mod profiles;
pub mod property_exchange;

/// The first CI message version.
pub const VERSION_1: u8 = 0x01;
/// The second CI message version, the default for built messages.
pub const VERSION_2: u8 = 0x02;
/// The version stamped into built messages.
pub const VERSION: u8 = VERSION_2;

/// Device ID addressing the whole function block.
pub const WHOLE_BLOCK_DEVICE_ID: u8 = 0x7F;

/// Capability categories advertised in discovery messages.
pub mod category {
    /// Profile configuration messages are supported.
    pub const PROFILE_CONFIGURATION: u8 = 1 << 2;
    /// Property exchange messages are supported.
    pub const PROPERTY_EXCHANGE: u8 = 1 << 3;
    /// Process inquiry messages are supported.
    pub const PROCESS_INQUIRY: u8 = 1 << 4;
}

/// CI subtype bytes (`data[2]`).
#[allow(missing_docs)]
pub mod subtype {
    // management
    pub const DISCOVERY_INQUIRY: u8 = 0x70;
    pub const DISCOVERY_REPLY: u8 = 0x71;
    pub const ENDPOINT_INFORMATION_INQUIRY: u8 = 0x72;
    pub const ENDPOINT_INFORMATION_REPLY: u8 = 0x73;
    pub const ACK: u8 = 0x7D;
    pub const INVALIDATE_MUID: u8 = 0x7E;
    pub const NAK: u8 = 0x7F;

    // profile configuration
    pub const PROFILE_INQUIRY: u8 = 0x20;
    pub const PROFILE_INQUIRY_REPLY: u8 = 0x21;
    pub const SET_PROFILE_ON: u8 = 0x22;
    pub const SET_PROFILE_OFF: u8 = 0x23;
    pub const PROFILE_ENABLED: u8 = 0x24;
    pub const PROFILE_DISABLED: u8 = 0x25;
    pub const PROFILE_ADDED: u8 = 0x26;
    pub const PROFILE_REMOVED: u8 = 0x27;
    pub const PROFILE_DETAILS_INQUIRY: u8 = 0x28;
    pub const PROFILE_DETAILS_REPLY: u8 = 0x29;
    pub const PROFILE_SPECIFIC_DATA: u8 = 0x2F;

    // property exchange (0x32 and 0x33 are reserved and rejected)
    pub const PROPERTY_EXCHANGE_CAPABILITIES_INQUIRY: u8 = 0x30;
    pub const PROPERTY_EXCHANGE_CAPABILITIES_REPLY: u8 = 0x31;
    pub const GET_PROPERTY_DATA_INQUIRY: u8 = 0x34;
    pub const GET_PROPERTY_DATA_REPLY: u8 = 0x35;
    pub const SET_PROPERTY_DATA_INQUIRY: u8 = 0x36;
    pub const SET_PROPERTY_DATA_REPLY: u8 = 0x37;
    pub const SUBSCRIPTION_INQUIRY: u8 = 0x38;
    pub const SUBSCRIPTION_REPLY: u8 = 0x39;
    pub const NOTIFY: u8 = 0x3F;

    // process inquiry
    pub const PROCESS_INQUIRY_CAPABILITIES_INQUIRY: u8 = 0x40;
    pub const PROCESS_INQUIRY_CAPABILITIES_REPLY: u8 = 0x41;
    pub const MIDI_MESSAGE_REPORT_INQUIRY: u8 = 0x42;
    pub const MIDI_MESSAGE_REPORT_REPLY: u8 = 0x43;
    pub const MIDI_MESSAGE_REPORT_END: u8 = 0x44;
}

/// Byte offsets inside the CI envelope.
pub mod field_offsets {
    /// The message version byte.
    pub const MESSAGE_VERSION: usize = 3;
    /// First limb of the source MUID.
    pub const SOURCE_MUID: usize = 4;
    /// First limb of the destination MUID.
    pub const DESTINATION_MUID: usize = 8;
    /// First byte of the subtype-specific payload.
    pub const PAYLOAD: usize = 12;
}

/// True when `sx` carries the CI envelope: universal non-realtime, the CI
/// sub-ID, and at least the twelve envelope bytes.
pub fn is_capability_inquiry_message(sx: &Sysex7) -> bool {
    sx.manufacturer == manufacturer::UNIVERSAL_NON_REALTIME
        && sx.data.len() >= field_offsets::PAYLOAD
        && sx.data[1] == universal_sysex_type::CAPABILITY_INQUIRY
}

pub(crate) fn envelope_matches(sx: &Sysex7, subtype: u8, min_len: usize) -> bool {
    sx.manufacturer == manufacturer::UNIVERSAL_NON_REALTIME
        && sx.data.len() >= min_len.max(field_offsets::PAYLOAD)
        && sx.data[1] == universal_sysex_type::CAPABILITY_INQUIRY
        && sx.data[2] == subtype
}

/// A CI message envelope: device ID, sub-ID, subtype, version, MUIDs.
/// `capacity` reserves space for the payload that follows.
pub fn envelope_with_capacity(
    capacity: usize,
    subtype: u8,
    source_muid: Muid,
    destination_muid: Muid,
    device_id: u8,
) -> Sysex7 {
    let mut sx = Sysex7::with_capacity(
        manufacturer::UNIVERSAL_NON_REALTIME,
        field_offsets::PAYLOAD + capacity,
    );
    sx.add_u7(device_id);
    sx.add_u7(universal_sysex_type::CAPABILITY_INQUIRY);
    sx.add_u7(subtype);
    sx.add_u7(VERSION);
    sx.add_data(&source_muid.to_bytes());
    sx.add_data(&destination_muid.to_bytes());
    sx
}

/// Read access to the envelope of any CI message.
#[derive(Copy, Clone, Debug)]
pub struct CapabilityInquiryView<'a> {
    sx: &'a Sysex7,
}

impl<'a> CapabilityInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` has no CI envelope.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then_some(Self { sx })
    }

    /// True when `sx` has the CI envelope.
    pub fn validate(sx: &Sysex7) -> bool {
        is_capability_inquiry_message(sx)
    }

    /// The device ID the message addresses.
    pub fn device_id(&self) -> u8 {
        self.sx.data[0]
    }

    /// The CI subtype.
    pub fn subtype(&self) -> u8 {
        self.sx.data[2]
    }

    /// The message version.
    pub fn message_version(&self) -> u8 {
        self.sx.data[field_offsets::MESSAGE_VERSION]
    }

    /// The MUID of the sender.
    pub fn source_muid(&self) -> Muid {
        Muid(self.sx.u28_at(field_offsets::SOURCE_MUID))
    }

    /// The MUID of the addressee; `0x0FFFFFFF` is broadcast.
    pub fn destination_muid(&self) -> Muid {
        Muid(self.sx.u28_at(field_offsets::DESTINATION_MUID))
    }

    /// The underlying message.
    pub fn sysex(&self) -> &'a Sysex7 {
        self.sx
    }
}

//---- discovery

mod discovery_offsets {
    use super::field_offsets::PAYLOAD;

    pub const IDENTITY: usize = PAYLOAD;
    pub const CATEGORIES: usize = PAYLOAD + 11;
    pub const MAXIMUM_MESSAGE_SIZE: usize = PAYLOAD + 12;
    pub const OUTPUT_PATH_ID: usize = PAYLOAD + 16;
    pub const FUNCTION_BLOCK: usize = PAYLOAD + 17;
}

macro_rules! discovery_accessors {
    () => {
        /// The sender's device identity.
        pub fn identity(&self) -> DeviceIdentity {
            self.0.sysex().device_identity_at(discovery_offsets::IDENTITY)
        }

        /// The supported capability categories (see [`category`]).
        pub fn categories(&self) -> u8 {
            self.0.sysex().u7_at(discovery_offsets::CATEGORIES)
        }

        /// The largest SysEx message the sender can receive.
        pub fn maximum_message_size(&self) -> u32 {
            self.0.sysex().u28_at(discovery_offsets::MAXIMUM_MESSAGE_SIZE)
        }

        /// The sender's output path ID; version 1 messages report zero.
        pub fn output_path_id(&self) -> u8 {
            if self.0.message_version() >= VERSION_2 {
                self.0.sysex().u7_at(discovery_offsets::OUTPUT_PATH_ID)
            } else {
                0
            }
        }
    };
}

/// Read access to a discovery inquiry.
#[derive(Copy, Clone, Debug)]
pub struct DiscoveryInquiryView<'a>(CapabilityInquiryView<'a>);

impl<'a> DiscoveryInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid discovery
    /// inquiry.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for discovery inquiries of sufficient length for their
    /// version.
    pub fn validate(sx: &Sysex7) -> bool {
        let min = discovery_offsets::OUTPUT_PATH_ID
            + if sx.data.len() > field_offsets::MESSAGE_VERSION
                && sx.data[field_offsets::MESSAGE_VERSION] > VERSION_1
            {
                1
            } else {
                0
            };
        envelope_matches(sx, subtype::DISCOVERY_INQUIRY, min)
    }

    discovery_accessors!();

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Read access to a discovery reply.
#[derive(Copy, Clone, Debug)]
pub struct DiscoveryReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> DiscoveryReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid discovery reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for discovery replies of sufficient length for their version.
    pub fn validate(sx: &Sysex7) -> bool {
        let min = discovery_offsets::OUTPUT_PATH_ID
            + if sx.data.len() > field_offsets::MESSAGE_VERSION
                && sx.data[field_offsets::MESSAGE_VERSION] > VERSION_1
            {
                2
            } else {
                0
            };
        envelope_matches(sx, subtype::DISCOVERY_REPLY, min)
    }

    discovery_accessors!();

    /// The function block the reply came from; version 1 messages report
    /// `0x7F`.
    pub fn function_block(&self) -> u8 {
        if self.0.message_version() >= VERSION_2 {
            self.0.sysex().u7_at(discovery_offsets::FUNCTION_BLOCK)
        } else {
            0x7F
        }
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

fn discovery_payload(
    sx: &mut Sysex7,
    identity: &DeviceIdentity,
    categories: u8,
    max_message_size: u32,
) {
    sx.add_device_identity(identity);
    sx.add_u7(categories);
    sx.add_u28(max_message_size);
}

/// A discovery inquiry broadcast to every MUID.
pub fn discovery_inquiry(
    source_muid: Muid,
    identity: &DeviceIdentity,
    categories: u8,
    max_message_size: u32,
    output_path_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        18,
        subtype::DISCOVERY_INQUIRY,
        source_muid,
        muid::BROADCAST,
        WHOLE_BLOCK_DEVICE_ID,
    );
    discovery_payload(&mut sx, identity, categories, max_message_size);
    sx.add_u7(output_path_id);
    sx
}

/// A version 1 discovery inquiry (no output path ID).
pub fn discovery_inquiry_v1(
    source_muid: Muid,
    identity: &DeviceIdentity,
    categories: u8,
    max_message_size: u32,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        16,
        subtype::DISCOVERY_INQUIRY,
        source_muid,
        muid::BROADCAST,
        WHOLE_BLOCK_DEVICE_ID,
    );
    discovery_payload(&mut sx, identity, categories, max_message_size);
    sx.data[field_offsets::MESSAGE_VERSION] = VERSION_1;
    sx
}

/// A discovery reply to `destination_muid`.
#[allow(clippy::too_many_arguments)]
pub fn discovery_reply(
    source_muid: Muid,
    destination_muid: Muid,
    identity: &DeviceIdentity,
    categories: u8,
    max_message_size: u32,
    output_path_id: u8,
    function_block: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        18,
        subtype::DISCOVERY_REPLY,
        source_muid,
        destination_muid,
        WHOLE_BLOCK_DEVICE_ID,
    );
    discovery_payload(&mut sx, identity, categories, max_message_size);
    sx.add_u7(output_path_id);
    sx.add_u7(function_block);
    sx
}

/// A version 1 discovery reply.
pub fn discovery_reply_v1(
    source_muid: Muid,
    destination_muid: Muid,
    identity: &DeviceIdentity,
    categories: u8,
    max_message_size: u32,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        16,
        subtype::DISCOVERY_REPLY,
        source_muid,
        destination_muid,
        WHOLE_BLOCK_DEVICE_ID,
    );
    discovery_payload(&mut sx, identity, categories, max_message_size);
    sx.data[field_offsets::MESSAGE_VERSION] = VERSION_1;
    sx
}

//---- endpoint information

mod endpoint_offsets {
    use super::field_offsets::PAYLOAD;

    pub const STATUS: usize = PAYLOAD;
    pub const INFORMATION_DATA_LENGTH: usize = PAYLOAD + 1;
    pub const INFORMATION_DATA: usize = PAYLOAD + 3;
}

/// Read access to an endpoint information inquiry.
#[derive(Copy, Clone, Debug)]
pub struct EndpointInformationInquiryView<'a>(CapabilityInquiryView<'a>);

impl<'a> EndpointInformationInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid endpoint
    /// information inquiry.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for endpoint information inquiries.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::ENDPOINT_INFORMATION_INQUIRY,
            endpoint_offsets::STATUS + 1,
        )
    }

    /// The requested information status.
    pub fn status(&self) -> u8 {
        self.0.sysex().u7_at(endpoint_offsets::STATUS)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// An endpoint information inquiry.
pub fn endpoint_information_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    status: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        1,
        subtype::ENDPOINT_INFORMATION_INQUIRY,
        source_muid,
        destination_muid,
        WHOLE_BLOCK_DEVICE_ID,
    );
    sx.add_u7(status);
    sx
}

/// Read access to an endpoint information reply.
#[derive(Copy, Clone, Debug)]
pub struct EndpointInformationReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> EndpointInformationReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid endpoint
    /// information reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for endpoint information replies whose embedded length fits
    /// the buffer.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::ENDPOINT_INFORMATION_REPLY,
            endpoint_offsets::INFORMATION_DATA,
        ) && sx.data.len()
            >= endpoint_offsets::INFORMATION_DATA
                + usize::from(sx.u14_at(endpoint_offsets::INFORMATION_DATA_LENGTH))
    }

    /// The information status being answered.
    pub fn status(&self) -> u8 {
        self.0.sysex().u7_at(endpoint_offsets::STATUS)
    }

    /// The length of the information data.
    pub fn information_data_length(&self) -> u16 {
        self.0.sysex().u14_at(endpoint_offsets::INFORMATION_DATA_LENGTH)
    }

    /// The information data bytes.
    pub fn information_data(&self) -> &'a [u8] {
        let start = endpoint_offsets::INFORMATION_DATA;
        &self.0.sysex().data[start..start + usize::from(self.information_data_length())]
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// An endpoint information reply carrying `data`.
pub fn endpoint_information_reply(
    source_muid: Muid,
    destination_muid: Muid,
    status: u8,
    data: &[u8],
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        3 + data.len(),
        subtype::ENDPOINT_INFORMATION_REPLY,
        source_muid,
        destination_muid,
        WHOLE_BLOCK_DEVICE_ID,
    );
    sx.add_u7(status);
    sx.add_u14(data.len() as u16);
    sx.add_data(data);
    sx
}

//---- ACK / NAK

mod nack_offsets {
    use super::field_offsets::PAYLOAD;

    pub const TRANSACTION: usize = PAYLOAD;
    pub const STATUS_CODE: usize = PAYLOAD + 1;
    pub const STATUS_DATA: usize = PAYLOAD + 2;
    pub const DETAILS: usize = PAYLOAD + 3;
    pub const MESSAGE_LENGTH: usize = PAYLOAD + 8;
    pub const MESSAGE_DATA: usize = PAYLOAD + 10;
}

macro_rules! nack_accessors {
    () => {
        /// The subtype of the message being answered.
        pub fn transaction(&self) -> u8 {
            self.0.sysex().u7_at(nack_offsets::TRANSACTION)
        }

        /// The status code.
        pub fn status_code(&self) -> u8 {
            self.0.sysex().u7_at(nack_offsets::STATUS_CODE)
        }

        /// Additional status data.
        pub fn status_data(&self) -> u8 {
            self.0.sysex().u7_at(nack_offsets::STATUS_DATA)
        }

        /// Five bytes of subtype-specific details.
        pub fn details(&self) -> &'a [u8] {
            &self.0.sysex().data[nack_offsets::DETAILS..nack_offsets::DETAILS + 5]
        }

        /// The length of the human-readable message.
        pub fn message_length(&self) -> u16 {
            self.0.sysex().u14_at(nack_offsets::MESSAGE_LENGTH)
        }

        /// The human-readable message.
        pub fn message(&self) -> &'a str {
            let start = nack_offsets::MESSAGE_DATA;
            let bytes = &self.0.sysex().data[start..start + usize::from(self.message_length())];
            core::str::from_utf8(bytes).unwrap_or("")
        }
    };
}

fn nack_shaped(sx: &Sysex7, subtype: u8) -> bool {
    envelope_matches(sx, subtype, nack_offsets::MESSAGE_DATA)
        && sx.data.len()
            >= nack_offsets::MESSAGE_DATA + usize::from(sx.u14_at(nack_offsets::MESSAGE_LENGTH))
}

/// Read access to an ACK message.
#[derive(Copy, Clone, Debug)]
pub struct AckView<'a>(CapabilityInquiryView<'a>);

impl<'a> AckView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid ACK.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for ACK messages whose message length fits the buffer.
    pub fn validate(sx: &Sysex7) -> bool {
        nack_shaped(sx, subtype::ACK)
    }

    nack_accessors!();

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Read access to a version 2 NAK message.
#[derive(Copy, Clone, Debug)]
pub struct NakView<'a>(CapabilityInquiryView<'a>);

impl<'a> NakView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid version 2 NAK.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for version 2 NAK messages. A version 1 NAK is a bare
    /// envelope and carries none of these fields.
    pub fn validate(sx: &Sysex7) -> bool {
        nack_shaped(sx, subtype::NAK) && sx.data[field_offsets::MESSAGE_VERSION] >= VERSION_2
    }

    nack_accessors!();

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

fn nack_message(
    subtype: u8,
    source_muid: Muid,
    destination_muid: Muid,
    device_id: u8,
    transaction: u8,
    status_code: u8,
    status_data: u8,
    details: [u8; 5],
    message: &str,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        10 + message.len(),
        subtype,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_u7(transaction);
    sx.add_u7(status_code);
    sx.add_u7(status_data);
    sx.add_data(&details);
    sx.add_u14(message.len() as u16);
    sx.add_data(message.as_bytes());
    sx
}

/// An ACK answering the message subtype in `transaction`.
#[allow(clippy::too_many_arguments)]
pub fn ack(
    source_muid: Muid,
    destination_muid: Muid,
    device_id: u8,
    transaction: u8,
    status_code: u8,
    status_data: u8,
    details: [u8; 5],
    message: &str,
) -> Sysex7 {
    nack_message(
        subtype::ACK,
        source_muid,
        destination_muid,
        device_id,
        transaction,
        status_code,
        status_data,
        details,
        message,
    )
}

/// A version 2 NAK answering the message subtype in `transaction`.
#[allow(clippy::too_many_arguments)]
pub fn nak(
    source_muid: Muid,
    destination_muid: Muid,
    device_id: u8,
    transaction: u8,
    status_code: u8,
    status_data: u8,
    details: [u8; 5],
    message: &str,
) -> Sysex7 {
    nack_message(
        subtype::NAK,
        source_muid,
        destination_muid,
        device_id,
        transaction,
        status_code,
        status_data,
        details,
        message,
    )
}

/// A NAK answering the received message `r`: MUIDs swapped, device ID
/// kept, the offending subtype in the transaction field.
pub fn nak_for(
    r: &CapabilityInquiryView<'_>,
    status_code: u8,
    status_data: u8,
    details: [u8; 5],
    message: &str,
) -> Sysex7 {
    nack_message(
        subtype::NAK,
        r.destination_muid(),
        r.source_muid(),
        r.device_id(),
        r.subtype(),
        status_code,
        status_data,
        details,
        message,
    )
}

/// A version 1 NAK: a bare envelope.
pub fn nak_v1(source_muid: Muid, destination_muid: Muid, device_id: u8) -> Sysex7 {
    let mut sx = envelope_with_capacity(0, subtype::NAK, source_muid, destination_muid, device_id);
    sx.data[field_offsets::MESSAGE_VERSION] = VERSION_1;
    sx
}

/// A version 1 NAK answering the received message `r`.
pub fn nak_v1_for(r: &CapabilityInquiryView<'_>) -> Sysex7 {
    nak_v1(r.destination_muid(), r.source_muid(), r.device_id())
}

//---- invalidate MUID

/// Read access to an invalidate-MUID message.
#[derive(Copy, Clone, Debug)]
pub struct InvalidateMuidView<'a>(CapabilityInquiryView<'a>);

impl<'a> InvalidateMuidView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid invalidate-MUID
    /// message.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for invalidate-MUID messages carrying the target MUID.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(sx, subtype::INVALIDATE_MUID, field_offsets::PAYLOAD + 4)
    }

    /// The MUID that is no longer valid.
    pub fn target_muid(&self) -> Muid {
        Muid(self.0.sysex().u28_at(field_offsets::PAYLOAD))
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// An invalidate-MUID broadcast naming `target_muid` as stale.
pub fn invalidate_muid(source_muid: Muid, target_muid: Muid) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        4,
        subtype::INVALIDATE_MUID,
        source_muid,
        muid::BROADCAST,
        WHOLE_BLOCK_DEVICE_ID,
    );
    sx.add_data(&target_muid.to_bytes());
    sx
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_identity() -> DeviceIdentity {
        DeviceIdentity {
            manufacturer: manufacturer::NATIVE_INSTRUMENTS,
            family: 0x1730,
            model: 49,
            revision: 0x0001_0005,
        }
    }

    #[test]
    fn envelope_shape() {
        let sx = envelope_with_capacity(0, subtype::PROFILE_INQUIRY, Muid(0x22899C4), Muid(0x22CEAF7), 0x09);
        assert_eq!(sx.data.len(), 12);
        assert_eq!(sx.data[..4], [0x09, 0x0D, 0x20, 0x02]);
        assert!(is_capability_inquiry_message(&sx));

        let v = CapabilityInquiryView::new(&sx).unwrap();
        assert_eq!(v.device_id(), 0x09);
        assert_eq!(v.subtype(), subtype::PROFILE_INQUIRY);
        assert_eq!(v.message_version(), VERSION_2);
        assert_eq!(v.source_muid(), Muid(0x22899C4));
        assert_eq!(v.destination_muid(), Muid(0x22CEAF7));
    }

    #[test]
    fn envelope_rejects_wrong_family() {
        let not_ci = Sysex7::with_data(manufacturer::UNIVERSAL_NON_REALTIME, vec![0x7F, 0x06, 0x01]);
        assert!(!is_capability_inquiry_message(&not_ci));

        let wrong_manufacturer = Sysex7::with_data(
            manufacturer::UNIVERSAL_REALTIME,
            vec![0x7F, 0x0D, 0x70, 0x02, 0, 0, 0, 0, 0, 0, 0, 0],
        );
        assert!(!is_capability_inquiry_message(&wrong_manufacturer));

        let truncated = Sysex7::with_data(
            manufacturer::UNIVERSAL_NON_REALTIME,
            vec![0x7F, 0x0D, 0x70, 0x02, 0, 0, 0],
        );
        assert!(!is_capability_inquiry_message(&truncated));
    }

    #[test]
    fn discovery_inquiry_round_trip() {
        let sx = discovery_inquiry(Muid(0x2435465), &test_identity(), 0x0C, 766, 0);
        assert_eq!(sx.data.len(), 29);
        assert!(is_capability_inquiry_message(&sx));
        assert!(DiscoveryInquiryView::validate(&sx));

        let m = DiscoveryInquiryView::new(&sx).unwrap();
        assert_eq!(m.envelope().device_id(), 0x7F);
        assert_eq!(m.envelope().subtype(), subtype::DISCOVERY_INQUIRY);
        assert_eq!(m.envelope().message_version(), VERSION);
        assert_eq!(m.envelope().source_muid(), Muid(0x2435465));
        assert_eq!(m.envelope().destination_muid(), muid::BROADCAST);
        assert_eq!(m.identity(), test_identity());
        assert_eq!(m.categories(), 0x0C);
        assert_eq!(m.maximum_message_size(), 766);
        assert_eq!(m.output_path_id(), 0);
    }

    #[test]
    fn discovery_inquiry_v1_round_trip() {
        let sx = discovery_inquiry_v1(Muid(0x2435465), &test_identity(), 0x0C, 766);
        assert_eq!(sx.data.len(), 28);
        assert_eq!(sx.data[field_offsets::MESSAGE_VERSION], VERSION_1);
        assert!(DiscoveryInquiryView::validate(&sx));
        let m = DiscoveryInquiryView::new(&sx).unwrap();
        assert_eq!(m.output_path_id(), 0);
        assert_eq!(m.maximum_message_size(), 766);
    }

    #[test]
    fn discovery_view_wire_fixture() {
        let sx = Sysex7::with_data(
            manufacturer::UNIVERSAL_NON_REALTIME,
            vec![
                0x7F, 0x0D, 0x70, 0x01, 0x44, 0x33, 0x22, 0x11, 0x77, 0x55, 0x33, 0x11, 0x00,
                0x21, 0x09, 0x00, 0x30, 25, 0, 0, 0, 4, 0, 0x20, 0x00, 0x08, 0x00, 0x00,
            ],
        );
        assert!(DiscoveryInquiryView::validate(&sx));
        let m = DiscoveryInquiryView::new(&sx).unwrap();
        assert_eq!(m.envelope().message_version(), 1);
        assert_eq!(m.envelope().source_muid(), Muid(0x22899C4));
        assert_eq!(m.envelope().destination_muid(), Muid(0x22CEAF7));
        let identity = m.identity();
        assert_eq!(identity.manufacturer, manufacturer::NATIVE_INSTRUMENTS);
        assert_eq!(identity.family, 0x1800);
        assert_eq!(identity.model, 25);
        assert_eq!(identity.revision, 0x0001_0000);
        assert_eq!(m.categories(), 0x20);
        assert_eq!(m.maximum_message_size(), 0x400);
        assert_eq!(m.output_path_id(), 0);

        // wrong subtype
        let mut wrong = sx.clone();
        wrong.data[2] = subtype::DISCOVERY_REPLY;
        assert!(!DiscoveryInquiryView::validate(&wrong));
    }

    #[test]
    fn discovery_reply_round_trip() {
        let sx = discovery_reply(
            Muid(0x2435465),
            Muid(0x22CEAF7),
            &test_identity(),
            0x0C,
            766,
            0x11,
            0x05,
        );
        assert_eq!(sx.data.len(), 30);
        assert!(DiscoveryReplyView::validate(&sx));
        let m = DiscoveryReplyView::new(&sx).unwrap();
        assert_eq!(m.envelope().destination_muid(), Muid(0x22CEAF7));
        assert_eq!(m.identity(), test_identity());
        assert_eq!(m.output_path_id(), 0x11);
        assert_eq!(m.function_block(), 0x05);

        let v1 = discovery_reply_v1(Muid(1), Muid(2), &test_identity(), 0x0C, 766);
        let m = DiscoveryReplyView::new(&v1).unwrap();
        assert_eq!(m.function_block(), 0x7F);
    }

    #[test]
    fn discovery_length_guard() {
        let mut sx = discovery_inquiry(Muid(1), &test_identity(), 0x0C, 766, 0);
        sx.data.pop();
        assert!(!DiscoveryInquiryView::validate(&sx));

        let mut sx = discovery_reply(Muid(1), Muid(2), &test_identity(), 0x0C, 766, 0, 0);
        sx.data.pop();
        assert!(!DiscoveryReplyView::validate(&sx));
    }

    #[test]
    fn endpoint_information_round_trip() {
        let sx = endpoint_information_inquiry(Muid(1), Muid(2), 0x01);
        assert!(EndpointInformationInquiryView::validate(&sx));
        assert_eq!(EndpointInformationInquiryView::new(&sx).unwrap().status(), 0x01);

        let reply = endpoint_information_reply(Muid(2), Muid(1), 0x01, &[0x11, 0x22, 0x33]);
        assert!(EndpointInformationReplyView::validate(&reply));
        let m = EndpointInformationReplyView::new(&reply).unwrap();
        assert_eq!(m.status(), 0x01);
        assert_eq!(m.information_data_length(), 3);
        assert_eq!(m.information_data(), &[0x11, 0x22, 0x33]);

        // embedded length must fit the buffer
        let mut truncated = reply.clone();
        truncated.data.pop();
        assert!(!EndpointInformationReplyView::validate(&truncated));
    }

    #[test]
    fn ack_round_trip() {
        let sx = ack(
            Muid(1),
            Muid(2),
            0x09,
            subtype::SET_PROFILE_ON,
            0x64,
            0x01,
            [1, 2, 3, 4, 5],
            "OK",
        );
        assert!(AckView::validate(&sx));
        let m = AckView::new(&sx).unwrap();
        assert_eq!(m.transaction(), subtype::SET_PROFILE_ON);
        assert_eq!(m.status_code(), 0x64);
        assert_eq!(m.status_data(), 0x01);
        assert_eq!(m.details(), &[1, 2, 3, 4, 5]);
        assert_eq!(m.message_length(), 2);
        assert_eq!(m.message(), "OK");

        let mut truncated = sx.clone();
        truncated.data.pop();
        assert!(!AckView::validate(&truncated));
    }

    #[test]
    fn nak_derived_from_received_message() {
        let notify = property_exchange::notify(Muid(0x1234), Muid(0x5678), 11, 3, 0x09);
        let received = CapabilityInquiryView::new(&notify).unwrap();
        let sx = nak_for(&received, 88, 15, [5, 4, 3, 2, 1], "What?!?");

        assert!(NakView::validate(&sx));
        let m = NakView::new(&sx).unwrap();
        assert_eq!(m.envelope().source_muid(), Muid(0x5678));
        assert_eq!(m.envelope().destination_muid(), Muid(0x1234));
        assert_eq!(m.envelope().device_id(), 0x09);
        assert_eq!(m.transaction(), subtype::NOTIFY);
        assert_eq!(m.status_code(), 88);
        assert_eq!(m.status_data(), 15);
        assert_eq!(m.details(), &[5, 4, 3, 2, 1]);
        assert_eq!(m.message_length(), 7);
        assert_eq!(m.message(), "What?!?");
    }

    #[test]
    fn nak_v1_is_bare_envelope() {
        let sx = nak_v1(Muid(1), Muid(2), 0x7F);
        assert_eq!(sx.data.len(), 12);
        assert_eq!(sx.data[field_offsets::MESSAGE_VERSION], VERSION_1);
        assert!(is_capability_inquiry_message(&sx));
        // a v1 NAK carries none of the v2 fields
        assert!(!NakView::validate(&sx));

        let inquiry = discovery_inquiry(Muid(7), &test_identity(), 0, 512, 0);
        let received = CapabilityInquiryView::new(&inquiry).unwrap();
        let reply = nak_v1_for(&received);
        assert_eq!(
            CapabilityInquiryView::new(&reply).unwrap().destination_muid(),
            Muid(7)
        );
    }

    #[test]
    fn invalidate_muid_round_trip() {
        let sx = invalidate_muid(Muid(0x1234), Muid(0x2435465));
        assert!(InvalidateMuidView::validate(&sx));
        let m = InvalidateMuidView::new(&sx).unwrap();
        assert_eq!(m.envelope().destination_muid(), muid::BROADCAST);
        assert_eq!(m.target_muid(), Muid(0x2435465));

        let mut truncated = sx.clone();
        truncated.data.truncate(14);
        assert!(!InvalidateMuidView::validate(&truncated));
    }

    #[test]
    fn builders_validate_as_ci() {
        let identity = test_identity();
        let messages = [
            discovery_inquiry(Muid(1), &identity, 0x1C, 512, 0),
            discovery_reply(Muid(1), Muid(2), &identity, 0x1C, 512, 0, 0x7F),
            endpoint_information_inquiry(Muid(1), Muid(2), 0),
            endpoint_information_reply(Muid(1), Muid(2), 0, &[1, 2]),
            ack(Muid(1), Muid(2), 0x7F, 0x34, 100, 0, [0; 5], ""),
            nak(Muid(1), Muid(2), 0x7F, 0x34, 100, 0, [0; 5], "no"),
            invalidate_muid(Muid(1), Muid(2)),
        ];
        for sx in &messages {
            assert!(is_capability_inquiry_message(sx), "{:?}", sx.data);
            assert!(CapabilityInquiryView::validate(sx));
            assert!(sx.is_7bit());
        }
    }
}
