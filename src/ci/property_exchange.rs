//! CI property exchange: chunked request/reply transfers addressed by
//! JSON headers.
//!
//! Headers are emitted in a canonical form — no whitespace, members in
//! insertion order, values either quoted strings or bare integers — because
//! some receivers match replies textually instead of parsing JSON.
//! Incoming headers are parsed with `serde_json` and may use any
//! formatting.
use crate::ci::{
    envelope_with_capacity, field_offsets, is_capability_inquiry_message, subtype,
    CapabilityInquiryView,
};
use crate::muid::Muid;
use crate::sysex::Sysex7;

/// The property-exchange major version advertised in capability messages.
pub const PE_VERSION_MAJOR: u8 = 0x00;
/// The property-exchange minor version advertised in capability messages.
pub const PE_VERSION_MINOR: u8 = 0x00;

/// Canonical header keys.
#[allow(missing_docs)]
pub mod tags {
    pub const RESOURCE: &str = "resource";
    pub const COMMAND: &str = "command";
    pub const STATUS: &str = "status";
    pub const ID: &str = "id";
    pub const OFFSET: &str = "offset";
    pub const LIMIT: &str = "limit";
    pub const ENCODING: &str = "encoding";
    pub const MESSAGE: &str = "message";
    pub const SUBSCRIBE_ID: &str = "subscribeId";
}

/// Common resource names.
#[allow(missing_docs)]
pub mod resources {
    // foundational
    pub const RESOURCE_LIST: &str = "ResourceList";
    pub const DEVICE_INFO: &str = "DeviceInfo";
    pub const CHANNEL_LIST: &str = "ChannelList";
    pub const JSON_SCHEMA: &str = "JSONSchema";
    // basic
    pub const MODE_LIST: &str = "ModeList";
    pub const CURRENT_MODE: &str = "CurrentMode";
    pub const PROGRAM_LIST: &str = "ProgramList";
    // basic simple
    pub const CLOCK_MODE: &str = "ClockMode";
    pub const LOCAL_ON: &str = "LocalOn";
    pub const CHANNEL_MODE: &str = "ChannelMode";
    pub const BASIC_CHANNEL_RX: &str = "BasicChannelRx";
    pub const BASIC_CHANNEL_TX: &str = "BasicChannelTx";
    pub const MAX_SYSEX8_STREAMS: &str = "MaxSysex8Streams";
    // state
    pub const STATE_LIST: &str = "StateList";
    pub const STATE: &str = "State";
    // controllers
    pub const ALL_CTRL_LIST: &str = "AllCtrlList";
    pub const CH_CTRL_LIST: &str = "ChCtrlList";
    pub const CTRL_MAP_LIST: &str = "CtrlMapList";
}

fn looks_like_integer(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn push_options(out: &mut String, options: &[(&str, &str)]) {
    for (key, value) in options {
        out.push_str(",\"");
        out.push_str(key);
        out.push_str("\":");
        if looks_like_integer(value) {
            out.push_str(value);
        } else {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }
    }
}

/// A canonical one-member header: `{"key":"value"}`.
pub fn rjson_str(key: &str, value: &str) -> String {
    format!("{{\"{key}\":\"{value}\"}}")
}

/// A canonical one-member header with an integer value: `{"key":value}`.
pub fn rjson_int(key: &str, value: i32) -> String {
    format!("{{\"{key}\":{value}}}")
}

/// A canonical header with trailing options. Option values that look like
/// integers are emitted unquoted.
pub fn rjson_str_with(key: &str, value: &str, options: &[(&str, &str)]) -> String {
    let mut out = format!("{{\"{key}\":\"{value}\"");
    push_options(&mut out, options);
    out.push('}');
    out
}

/// A canonical integer-valued header with trailing options.
pub fn rjson_int_with(key: &str, value: i32, options: &[(&str, &str)]) -> String {
    let mut out = format!("{{\"{key}\":{value}");
    push_options(&mut out, options);
    out.push('}');
    out
}

/// Parse a received header. Accepts any JSON formatting, not just the
/// canonical form this module emits.
pub fn parse_header(header: &[u8]) -> Option<serde_json::Value> {
    serde_json::from_slice(header).ok()
}

/// Look up one member of a received header.
pub fn header_field(header: &[u8], key: &str) -> Option<serde_json::Value> {
    parse_header(header)?.get(key).cloned()
}

mod pe_offsets {
    use crate::ci::field_offsets::PAYLOAD;

    pub const REQUEST_ID: usize = PAYLOAD;
    pub const HEADER_SIZE: usize = PAYLOAD + 1;
    pub const HEADER_DATA: usize = PAYLOAD + 3;
    // the remaining fields are displaced by the header size
    pub const NUM_CHUNKS: usize = PAYLOAD + 3;
    pub const THIS_CHUNK: usize = PAYLOAD + 5;
    pub const CHUNK_SIZE: usize = PAYLOAD + 7;
    pub const CHUNK_DATA: usize = PAYLOAD + 9;
}

fn is_property_data_subtype(value: u8) -> bool {
    matches!(
        value,
        subtype::GET_PROPERTY_DATA_INQUIRY
            | subtype::GET_PROPERTY_DATA_REPLY
            | subtype::SET_PROPERTY_DATA_INQUIRY
            | subtype::SET_PROPERTY_DATA_REPLY
            | subtype::SUBSCRIPTION_INQUIRY
            | subtype::SUBSCRIPTION_REPLY
            | subtype::NOTIFY
    )
}

/// Read access to the shared shape of every property-data message:
/// request ID, header, chunk bookkeeping, chunk data.
#[derive(Copy, Clone, Debug)]
pub struct PropertyDataMessageView<'a>(CapabilityInquiryView<'a>);

impl<'a> PropertyDataMessageView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid property-data
    /// message.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for the property-data subtypes when both the header and chunk
    /// lengths fit the buffer. The reserved subtypes 0x32 and 0x33 are
    /// rejected.
    pub fn validate(sx: &Sysex7) -> bool {
        if !is_capability_inquiry_message(sx)
            || !is_property_data_subtype(sx.data[2])
            || sx.data.len() < pe_offsets::HEADER_DATA
        {
            return false;
        }
        let header_size = usize::from(sx.u14_at(pe_offsets::HEADER_SIZE));
        if sx.data.len() < pe_offsets::CHUNK_DATA + header_size {
            return false;
        }
        let chunk_size = usize::from(sx.u14_at(pe_offsets::CHUNK_SIZE + header_size));
        sx.data.len() >= pe_offsets::CHUNK_DATA + header_size + chunk_size
    }

    /// The request ID tying inquiry and reply together.
    pub fn request_id(&self) -> u8 {
        self.0.sysex().u7_at(pe_offsets::REQUEST_ID)
    }

    /// The header length in bytes.
    pub fn header_size(&self) -> usize {
        usize::from(self.0.sysex().u14_at(pe_offsets::HEADER_SIZE))
    }

    /// The JSON header bytes.
    pub fn header(&self) -> &'a [u8] {
        let start = pe_offsets::HEADER_DATA;
        &self.0.sysex().data[start..start + self.header_size()]
    }

    /// The total number of chunks; zero signals an unsolicited or empty
    /// body.
    pub fn number_of_chunks(&self) -> u16 {
        self.0.sysex().u14_at(pe_offsets::NUM_CHUNKS + self.header_size())
    }

    /// The 1-based index of this chunk.
    pub fn number_of_this_chunk(&self) -> u16 {
        self.0.sysex().u14_at(pe_offsets::THIS_CHUNK + self.header_size())
    }

    /// The chunk length in bytes.
    pub fn chunk_size(&self) -> usize {
        usize::from(self.0.sysex().u14_at(pe_offsets::CHUNK_SIZE + self.header_size()))
    }

    /// The chunk data bytes.
    pub fn chunk(&self) -> &'a [u8] {
        let start = pe_offsets::CHUNK_DATA + self.header_size();
        &self.0.sysex().data[start..start + self.chunk_size()]
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

macro_rules! property_data_view {
    ($(#[$doc:meta])* $name:ident, $($subtype:expr),+) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'a>(pub PropertyDataMessageView<'a>);

        impl<'a> $name<'a> {
            /// A view of `sx`, or `None` when `sx` is not valid for this
            /// subtype.
            pub fn new(sx: &'a Sysex7) -> Option<Self> {
                Self::validate(sx).then(|| Self(PropertyDataMessageView(CapabilityInquiryView { sx })))
            }

            /// True when the property-data shape checks pass and the
            /// subtype matches.
            pub fn validate(sx: &Sysex7) -> bool {
                PropertyDataMessageView::validate(sx) && [$($subtype),+].contains(&sx.data[2])
            }
        }

        impl<'a> core::ops::Deref for $name<'a> {
            type Target = PropertyDataMessageView<'a>;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

property_data_view!(
    /// Read access to get-property-data inquiries and replies.
    GetPropertyDataView,
    subtype::GET_PROPERTY_DATA_INQUIRY,
    subtype::GET_PROPERTY_DATA_REPLY
);

property_data_view!(
    /// Read access to set-property-data inquiries and replies.
    SetPropertyDataView,
    subtype::SET_PROPERTY_DATA_INQUIRY,
    subtype::SET_PROPERTY_DATA_REPLY
);

property_data_view!(
    /// Read access to subscription inquiries and replies.
    SubscriptionView,
    subtype::SUBSCRIPTION_INQUIRY,
    subtype::SUBSCRIPTION_REPLY
);

property_data_view!(
    /// Read access to notify messages.
    NotifyView,
    subtype::NOTIFY
);

/// The common builder behind every property-data message.
#[allow(clippy::too_many_arguments)]
pub fn property_data_message(
    subtype: u8,
    source_muid: Muid,
    destination_muid: Muid,
    header: &[u8],
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        9 + header.len() + chunk.len(),
        subtype,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_u7(request_id);
    sx.add_u14(header.len() as u16);
    sx.add_data(header);
    sx.add_u14(number_of_chunks);
    sx.add_u14(number_of_this_chunk);
    sx.add_u14(chunk.len() as u16);
    sx.add_data(chunk);
    sx
}

//---- capabilities

mod capability_offsets {
    use crate::ci::field_offsets::PAYLOAD;

    pub const MAX_NUM_REQUESTS: usize = PAYLOAD;
    pub const PE_VERSION_MAJOR: usize = PAYLOAD + 1;
    pub const PE_VERSION_MINOR: usize = PAYLOAD + 2;
}

/// Read access to property-exchange capability inquiries and replies.
#[derive(Copy, Clone, Debug)]
pub struct PropertyExchangeCapabilitiesView<'a>(CapabilityInquiryView<'a>);

impl<'a> PropertyExchangeCapabilitiesView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid capabilities
    /// message.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for capability inquiries and replies; version 2 messages must
    /// also carry the PE version bytes.
    pub fn validate(sx: &Sysex7) -> bool {
        is_capability_inquiry_message(sx)
            && sx.data.len() > capability_offsets::MAX_NUM_REQUESTS
            && matches!(
                sx.data[2],
                subtype::PROPERTY_EXCHANGE_CAPABILITIES_INQUIRY
                    | subtype::PROPERTY_EXCHANGE_CAPABILITIES_REPLY
            )
            && (sx.data[field_offsets::MESSAGE_VERSION] < crate::ci::VERSION_2
                || sx.data.len() > capability_offsets::PE_VERSION_MINOR)
    }

    /// How many simultaneous requests the sender supports.
    pub fn maximum_number_of_requests(&self) -> u8 {
        self.0.sysex().u7_at(capability_offsets::MAX_NUM_REQUESTS)
    }

    /// The PE major version; version 1 messages report zero.
    pub fn pe_version_major(&self) -> u8 {
        if self.0.message_version() >= crate::ci::VERSION_2 {
            self.0.sysex().u7_at(capability_offsets::PE_VERSION_MAJOR)
        } else {
            0
        }
    }

    /// The PE minor version; version 1 messages report zero.
    pub fn pe_version_minor(&self) -> u8 {
        if self.0.message_version() >= crate::ci::VERSION_2 {
            self.0.sysex().u7_at(capability_offsets::PE_VERSION_MINOR)
        } else {
            0
        }
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

fn capabilities_message(
    subtype: u8,
    source_muid: Muid,
    destination_muid: Muid,
    max_num_requests: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(3, subtype, source_muid, destination_muid, device_id);
    sx.add_u7(max_num_requests);
    sx.add_u7(PE_VERSION_MAJOR);
    sx.add_u7(PE_VERSION_MINOR);
    sx
}

/// Ask the addressee for its property-exchange capabilities.
pub fn property_exchange_capabilities_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    max_num_requests: u8,
    device_id: u8,
) -> Sysex7 {
    capabilities_message(
        subtype::PROPERTY_EXCHANGE_CAPABILITIES_INQUIRY,
        source_muid,
        destination_muid,
        max_num_requests,
        device_id,
    )
}

/// Answer a property-exchange capabilities inquiry.
pub fn property_exchange_capabilities_reply(
    source_muid: Muid,
    destination_muid: Muid,
    max_num_requests: u8,
    device_id: u8,
) -> Sysex7 {
    capabilities_message(
        subtype::PROPERTY_EXCHANGE_CAPABILITIES_REPLY,
        source_muid,
        destination_muid,
        max_num_requests,
        device_id,
    )
}

//---- get property data

/// Request `resource` from the addressee.
pub fn get_property_data_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::GET_PROPERTY_DATA_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str(tags::RESOURCE, resource).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

/// Request `resource` with additional header options.
pub fn get_property_data_inquiry_with_options(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    options: &[(&str, &str)],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::GET_PROPERTY_DATA_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str_with(tags::RESOURCE, resource, options).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

/// Answer a get inquiry with an explicit header and one chunk of data.
#[allow(clippy::too_many_arguments)]
pub fn get_property_data_reply(
    source_muid: Muid,
    destination_muid: Muid,
    header: &[u8],
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::GET_PROPERTY_DATA_REPLY,
        source_muid,
        destination_muid,
        header,
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// Answer a get inquiry with a status header.
#[allow(clippy::too_many_arguments)]
pub fn get_property_data_reply_status(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    get_property_data_reply(
        source_muid,
        destination_muid,
        rjson_int(tags::STATUS, status).as_bytes(),
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// A continuation chunk of a multi-chunk get reply; the header is empty.
#[allow(clippy::too_many_arguments)]
pub fn get_property_data_reply_chunk(
    source_muid: Muid,
    destination_muid: Muid,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    get_property_data_reply(
        source_muid,
        destination_muid,
        &[],
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

//---- set property data

/// Write `resource` on the addressee, carrying the first chunk.
#[allow(clippy::too_many_arguments)]
pub fn set_property_data_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SET_PROPERTY_DATA_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str(tags::RESOURCE, resource).as_bytes(),
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// Write `resource` with additional header options.
#[allow(clippy::too_many_arguments)]
pub fn set_property_data_inquiry_with_options(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    options: &[(&str, &str)],
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SET_PROPERTY_DATA_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str_with(tags::RESOURCE, resource, options).as_bytes(),
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// A continuation chunk of a multi-chunk set inquiry; the header is empty.
#[allow(clippy::too_many_arguments)]
pub fn set_property_data_inquiry_chunk(
    source_muid: Muid,
    destination_muid: Muid,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SET_PROPERTY_DATA_INQUIRY,
        source_muid,
        destination_muid,
        &[],
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// Answer a set inquiry with a status.
pub fn set_property_data_reply(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SET_PROPERTY_DATA_REPLY,
        source_muid,
        destination_muid,
        rjson_int(tags::STATUS, status).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

/// Answer a set inquiry with a status and a human-readable message.
pub fn set_property_data_reply_with_message(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    message: &str,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SET_PROPERTY_DATA_REPLY,
        source_muid,
        destination_muid,
        rjson_int_with(tags::STATUS, status, &[(tags::MESSAGE, message)]).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

//---- subscriptions

/// Start or end a subscription on `resource`. Subscription inquiries have
/// no body, signalled by a chunk count of zero.
#[allow(clippy::too_many_arguments)]
pub fn subscription_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    command: &str,
    subscribe_id: &str,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SUBSCRIPTION_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str_with(
            tags::RESOURCE,
            resource,
            &[(tags::COMMAND, command), (tags::SUBSCRIBE_ID, subscribe_id)],
        )
        .as_bytes(),
        0,
        0,
        &[],
        request_id,
        device_id,
    )
}

/// A subscription inquiry carrying a body chunk.
#[allow(clippy::too_many_arguments)]
pub fn subscription_inquiry_with_chunk(
    source_muid: Muid,
    destination_muid: Muid,
    resource: &str,
    command: &str,
    subscribe_id: &str,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SUBSCRIPTION_INQUIRY,
        source_muid,
        destination_muid,
        rjson_str_with(
            tags::RESOURCE,
            resource,
            &[(tags::COMMAND, command), (tags::SUBSCRIBE_ID, subscribe_id)],
        )
        .as_bytes(),
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// A continuation chunk of a multi-chunk subscription inquiry.
#[allow(clippy::too_many_arguments)]
pub fn subscription_inquiry_chunk(
    source_muid: Muid,
    destination_muid: Muid,
    number_of_chunks: u16,
    number_of_this_chunk: u16,
    chunk: &[u8],
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SUBSCRIPTION_INQUIRY,
        source_muid,
        destination_muid,
        &[],
        number_of_chunks,
        number_of_this_chunk,
        chunk,
        request_id,
        device_id,
    )
}

/// Answer a subscription inquiry with a status.
pub fn subscription_reply(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SUBSCRIPTION_REPLY,
        source_muid,
        destination_muid,
        rjson_int(tags::STATUS, status).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

/// Answer a subscription inquiry with a status and message.
pub fn subscription_reply_with_message(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    message: &str,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::SUBSCRIPTION_REPLY,
        source_muid,
        destination_muid,
        rjson_int_with(tags::STATUS, status, &[(tags::MESSAGE, message)]).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

//---- notify

/// A notify message with a status header.
pub fn notify(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::NOTIFY,
        source_muid,
        destination_muid,
        rjson_int(tags::STATUS, status).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

/// A notify message with a status and a human-readable message.
pub fn notify_with_message(
    source_muid: Muid,
    destination_muid: Muid,
    status: i32,
    message: &str,
    request_id: u8,
    device_id: u8,
) -> Sysex7 {
    property_data_message(
        subtype::NOTIFY,
        source_muid,
        destination_muid,
        rjson_int_with(tags::STATUS, status, &[(tags::MESSAGE, message)]).as_bytes(),
        1,
        1,
        &[],
        request_id,
        device_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sysex::manufacturer;
    use pretty_assertions::assert_eq;

    #[test]
    fn rjson_canonical_output() {
        assert_eq!(rjson_str("a", "b"), "{\"a\":\"b\"}");
        assert_eq!(rjson_int("number", 5), "{\"number\":5}");
        assert_eq!(
            rjson_str(tags::RESOURCE, resources::PROGRAM_LIST),
            "{\"resource\":\"ProgramList\"}"
        );
        assert_eq!(rjson_int(tags::STATUS, 12345), "{\"status\":12345}");
        assert_eq!(
            rjson_str_with(
                tags::RESOURCE,
                resources::PROGRAM_LIST,
                &[("a", "b"), ("c", "d"), ("00", "11")]
            ),
            "{\"resource\":\"ProgramList\",\"a\":\"b\",\"c\":\"d\",\"00\":11}"
        );
        assert_eq!(
            rjson_str_with(tags::RESOURCE, "VendorResource", &[("delta", "-10")]),
            "{\"resource\":\"VendorResource\",\"delta\":-10}"
        );
        assert_eq!(
            rjson_int_with(tags::STATUS, 404, &[(tags::MESSAGE, "gone")]),
            "{\"status\":404,\"message\":\"gone\"}"
        );
    }

    #[test]
    fn received_headers_parse_with_any_formatting() {
        let canonical = rjson_str(tags::RESOURCE, resources::DEVICE_INFO);
        assert_eq!(
            header_field(canonical.as_bytes(), tags::RESOURCE),
            Some(serde_json::json!("DeviceInfo"))
        );

        let spaced = b"{ \"resource\" : \"DeviceInfo\" ,\n \"offset\" : 4 }";
        assert_eq!(
            header_field(spaced, tags::RESOURCE),
            Some(serde_json::json!("DeviceInfo"))
        );
        assert_eq!(header_field(spaced, tags::OFFSET), Some(serde_json::json!(4)));
        assert_eq!(header_field(spaced, tags::LIMIT), None);
        assert_eq!(parse_header(b"not json"), None);
    }

    #[test]
    fn property_data_message_layout() {
        let header = rjson_str(tags::RESOURCE, resources::DEVICE_INFO);
        let sx = property_data_message(
            subtype::GET_PROPERTY_DATA_INQUIRY,
            Muid(0x24D2B78),
            Muid(0x22CEAF7),
            header.as_bytes(),
            1,
            1,
            &[],
            0x03,
            0x0A,
        );
        assert_eq!(sx.data[0], 0x0A);
        assert_eq!(sx.data[2], subtype::GET_PROPERTY_DATA_INQUIRY);
        assert_eq!(sx.data[12], 0x03);
        assert_eq!(usize::from(sx.u14_at(13)), header.len());
        assert_eq!(&sx.data[15..15 + header.len()], header.as_bytes());

        assert!(PropertyDataMessageView::validate(&sx));
        let m = PropertyDataMessageView::new(&sx).unwrap();
        assert_eq!(m.request_id(), 0x03);
        assert_eq!(m.header(), header.as_bytes());
        assert_eq!(m.number_of_chunks(), 1);
        assert_eq!(m.number_of_this_chunk(), 1);
        assert_eq!(m.chunk_size(), 0);
        assert!(m.chunk().is_empty());
    }

    #[test]
    fn property_data_wire_fixture() {
        // set-property reply, 8-byte header, one empty chunk
        let sx = Sysex7::with_data(
            manufacturer::UNIVERSAL_NON_REALTIME,
            vec![
                0x0A, 0x0D, 0x34, 0x05, 0x78, 0x56, 0x34, 0x12, 0x12, 0x34, 0x56, 0x78, 0x00,
                0x08, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x01, 0x00, 0x01,
                0x00, 0x00, 0x00,
            ],
        );
        assert!(PropertyDataMessageView::validate(&sx));
        let m = PropertyDataMessageView::new(&sx).unwrap();
        assert_eq!(m.envelope().source_muid(), Muid(0x24D2B78));
        assert_eq!(m.envelope().destination_muid(), Muid(0xF159A12));
        assert_eq!(m.request_id(), 0);
        assert_eq!(m.header_size(), 8);
        assert_eq!(m.number_of_chunks(), 1);
        assert_eq!(m.number_of_this_chunk(), 1);
        assert_eq!(m.chunk_size(), 0);

        // a trailing extension is accepted for forward compatibility
        let mut extended = sx.clone();
        extended.data.extend_from_slice(&[0x01, 0x00, 0x01, 0x00]);
        assert!(PropertyDataMessageView::validate(&extended));

        // 16-byte header displaces the chunk fields
        let sx = Sysex7::with_data(
            manufacturer::UNIVERSAL_NON_REALTIME,
            vec![
                0x0A, 0x0D, 0x37, 0x01, 0x77, 0x55, 0x33, 0x11, 0x12, 0x34, 0x56, 0x78, 0x04,
                0x10, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x00, 0x10, 0x20,
                0x30, 0x40, 0x50, 0x60, 0x70, 0x10, 0x00, 0x01, 0x00, 0x01, 0x00, 0x33,
            ],
        );
        assert!(PropertyDataMessageView::validate(&sx));
        let m = PropertyDataMessageView::new(&sx).unwrap();
        assert_eq!(m.request_id(), 0x04);
        assert_eq!(m.header_size(), 16);
        assert_eq!(m.number_of_chunks(), 16);
        assert_eq!(m.number_of_this_chunk(), 1);
        assert_eq!(m.chunk_size(), 1);
        assert_eq!(m.chunk(), &[0x33]);
    }

    #[test]
    fn property_data_rejections() {
        // header length overruns the buffer
        let sx = Sysex7::with_data(
            manufacturer::UNIVERSAL_NON_REALTIME,
            vec![
                0x0A, 0x0D, 0x36, 0x05, 0x78, 0x56, 0x34, 0x12, 0x12, 0x34, 0x56, 0x78, 0x04,
                0x00, 0x01, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x00, 0x02, 0x00,
                0x01, 0x00, 0x00,
            ],
        );
        assert!(!PropertyDataMessageView::validate(&sx));

        // chunk length overruns the buffer
        let good = property_data_message(
            subtype::SET_PROPERTY_DATA_INQUIRY,
            Muid(1),
            Muid(2),
            b"{}",
            1,
            1,
            &[0x01, 0x02, 0x03],
            0,
            0x7F,
        );
        assert!(PropertyDataMessageView::validate(&good));
        let mut truncated = good.clone();
        truncated.data.pop();
        assert!(!PropertyDataMessageView::validate(&truncated));

        // reserved and foreign subtypes
        for wrong in [0x32, 0x33, 0x3C, subtype::PROFILE_INQUIRY] {
            let mut sx = good.clone();
            sx.data[2] = wrong;
            assert!(!PropertyDataMessageView::validate(&sx), "{wrong:#x}");
        }
    }

    #[test]
    fn capabilities_round_trip() {
        let sx = property_exchange_capabilities_inquiry(Muid(1), Muid(2), 4, 0x7F);
        assert_eq!(sx.data.len(), 15);
        assert!(PropertyExchangeCapabilitiesView::validate(&sx));
        let m = PropertyExchangeCapabilitiesView::new(&sx).unwrap();
        assert_eq!(m.maximum_number_of_requests(), 4);
        assert_eq!(m.pe_version_major(), PE_VERSION_MAJOR);
        assert_eq!(m.pe_version_minor(), PE_VERSION_MINOR);

        let reply = property_exchange_capabilities_reply(Muid(2), Muid(1), 1, 0x7F);
        assert_eq!(
            reply.data[2],
            subtype::PROPERTY_EXCHANGE_CAPABILITIES_REPLY
        );
        assert!(PropertyExchangeCapabilitiesView::validate(&reply));

        // a version 2 message without the PE version bytes is invalid
        let mut short = sx.clone();
        short.data.truncate(13);
        assert!(!PropertyExchangeCapabilitiesView::validate(&short));

        // but a version 1 message of that length is fine
        let mut v1 = short.clone();
        v1.data[field_offsets::MESSAGE_VERSION] = crate::ci::VERSION_1;
        assert!(PropertyExchangeCapabilitiesView::validate(&v1));
        let m = PropertyExchangeCapabilitiesView::new(&v1).unwrap();
        assert_eq!(m.pe_version_major(), 0);
    }

    #[test]
    fn get_property_data_round_trip() {
        let inquiry =
            get_property_data_inquiry(Muid(0x24D2B78), Muid(0x22CEAF7), resources::DEVICE_INFO, 3, 0x0A);
        assert!(GetPropertyDataView::validate(&inquiry));
        let m = GetPropertyDataView::new(&inquiry).unwrap();
        assert_eq!(m.request_id(), 3);
        assert_eq!(m.header(), b"{\"resource\":\"DeviceInfo\"}");
        assert_eq!(
            header_field(m.header(), tags::RESOURCE),
            Some(serde_json::json!("DeviceInfo"))
        );

        let with_options = get_property_data_inquiry_with_options(
            Muid(1),
            Muid(2),
            resources::PROGRAM_LIST,
            &[(tags::OFFSET, "4"), (tags::LIMIT, "8")],
            0,
            0x7F,
        );
        let m = GetPropertyDataView::new(&with_options).unwrap();
        assert_eq!(
            m.header(),
            b"{\"resource\":\"ProgramList\",\"offset\":4,\"limit\":8}"
        );

        let reply = get_property_data_reply_status(
            Muid(2),
            Muid(1),
            200,
            2,
            1,
            b"chunk one",
            3,
            0x0A,
        );
        assert!(GetPropertyDataView::validate(&reply));
        let m = GetPropertyDataView::new(&reply).unwrap();
        assert_eq!(m.header(), b"{\"status\":200}");
        assert_eq!(m.number_of_chunks(), 2);
        assert_eq!(m.chunk(), b"chunk one");

        let continuation =
            get_property_data_reply_chunk(Muid(2), Muid(1), 2, 2, b"chunk two", 3, 0x0A);
        let m = GetPropertyDataView::new(&continuation).unwrap();
        assert_eq!(m.header_size(), 0);
        assert_eq!(m.number_of_this_chunk(), 2);
        assert_eq!(m.chunk(), b"chunk two");

        assert!(SetPropertyDataView::new(&inquiry).is_none());
    }

    #[test]
    fn set_property_data_round_trip() {
        let inquiry = set_property_data_inquiry(
            Muid(1),
            Muid(2),
            resources::STATE,
            1,
            1,
            b"\x01\x02",
            5,
            0x7F,
        );
        assert!(SetPropertyDataView::validate(&inquiry));
        let m = SetPropertyDataView::new(&inquiry).unwrap();
        assert_eq!(m.header(), b"{\"resource\":\"State\"}");
        assert_eq!(m.chunk(), b"\x01\x02");

        let reply = set_property_data_reply_with_message(Muid(2), Muid(1), 400, "bad request", 5, 0x7F);
        let m = SetPropertyDataView::new(&reply).unwrap();
        assert_eq!(m.header(), b"{\"status\":400,\"message\":\"bad request\"}");

        let continuation = set_property_data_inquiry_chunk(Muid(1), Muid(2), 3, 2, b"\x03", 5, 0x7F);
        let m = SetPropertyDataView::new(&continuation).unwrap();
        assert_eq!(m.header_size(), 0);
        assert_eq!(m.number_of_this_chunk(), 2);
    }

    #[test]
    fn subscription_round_trip() {
        let inquiry = subscription_inquiry(
            Muid(1),
            Muid(2),
            resources::CURRENT_MODE,
            "start",
            "sub32847",
            9,
            0x7F,
        );
        assert!(SubscriptionView::validate(&inquiry));
        let m = SubscriptionView::new(&inquiry).unwrap();
        assert_eq!(
            m.header(),
            b"{\"resource\":\"CurrentMode\",\"command\":\"start\",\"subscribeId\":\"sub32847\"}"
        );
        // no body: chunk count zero
        assert_eq!(m.number_of_chunks(), 0);
        assert_eq!(m.number_of_this_chunk(), 0);
        assert_eq!(m.chunk_size(), 0);

        let reply = subscription_reply(Muid(2), Muid(1), 200, 9, 0x7F);
        let m = SubscriptionView::new(&reply).unwrap();
        assert_eq!(m.header(), b"{\"status\":200}");
        assert_eq!(m.number_of_chunks(), 1);

        assert!(NotifyView::new(&reply).is_none());
    }

    #[test]
    fn notify_round_trip() {
        let sx = notify_with_message(Muid(1), Muid(2), 144, "subscription ended", 0, 0x09);
        assert!(NotifyView::validate(&sx));
        let m = NotifyView::new(&sx).unwrap();
        assert_eq!(m.envelope().device_id(), 0x09);
        assert_eq!(
            m.header(),
            b"{\"status\":144,\"message\":\"subscription ended\"}"
        );
    }
}
