//! CI process inquiry: asking a device to report the MIDI messages it is
//! currently acting on.
use crate::ci::{
    envelope_matches, envelope_with_capacity, field_offsets, subtype, CapabilityInquiryView,
};
use crate::muid::{self, Muid};
use crate::sysex::Sysex7;

/// Feature bit of the capabilities reply: MIDI message report supported.
pub const FEATURE_MIDI_MESSAGE_REPORT: u8 = 0x01;

/// Ask the addressee which process-inquiry features it supports.
pub fn process_inquiry_capabilities_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    device_id: u8,
) -> Sysex7 {
    envelope_with_capacity(
        0,
        subtype::PROCESS_INQUIRY_CAPABILITIES_INQUIRY,
        source_muid,
        destination_muid,
        device_id,
    )
}

/// Read access to a process-inquiry capabilities reply.
#[derive(Copy, Clone, Debug)]
pub struct ProcessInquiryCapabilitiesReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProcessInquiryCapabilitiesReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid capabilities
    /// reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for capabilities replies carrying the features byte.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::PROCESS_INQUIRY_CAPABILITIES_REPLY,
            field_offsets::PAYLOAD + 1,
        )
    }

    /// The supported feature bits.
    pub fn supported_features(&self) -> u8 {
        self.0.sysex().u7_at(field_offsets::PAYLOAD)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Answer a process-inquiry capabilities inquiry.
pub fn process_inquiry_capabilities_reply(
    source_muid: Muid,
    destination_muid: Muid,
    features: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        1,
        subtype::PROCESS_INQUIRY_CAPABILITIES_REPLY,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_u7(features);
    sx
}

mod report_offsets {
    use crate::ci::field_offsets::PAYLOAD;

    pub const MESSAGE_DATA_CONTROL: usize = PAYLOAD;
    pub const INQUIRY_SYSTEM_MESSAGE_TYPES: usize = PAYLOAD + 1;
    pub const INQUIRY_CHANNEL_CONTROLLER_TYPES: usize = PAYLOAD + 3;
    pub const INQUIRY_NOTE_DATA_TYPES: usize = PAYLOAD + 4;

    pub const REPLY_SYSTEM_MESSAGE_TYPES: usize = PAYLOAD;
    pub const REPLY_CHANNEL_CONTROLLER_TYPES: usize = PAYLOAD + 2;
    pub const REPLY_NOTE_DATA_TYPES: usize = PAYLOAD + 3;
}

/// Read access to a MIDI message report inquiry.
#[derive(Copy, Clone, Debug)]
pub struct MidiMessageReportInquiryView<'a>(CapabilityInquiryView<'a>);

impl<'a> MidiMessageReportInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid report inquiry.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for report inquiries carrying all five payload bytes.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::MIDI_MESSAGE_REPORT_INQUIRY,
            report_offsets::INQUIRY_NOTE_DATA_TYPES + 1,
        )
    }

    /// How the report should treat current data.
    pub fn message_data_control(&self) -> u8 {
        self.0.sysex().u7_at(report_offsets::MESSAGE_DATA_CONTROL)
    }

    /// The requested system message types.
    pub fn system_message_types(&self) -> u8 {
        self.0.sysex().u7_at(report_offsets::INQUIRY_SYSTEM_MESSAGE_TYPES)
    }

    /// The requested channel controller message types.
    pub fn channel_controller_message_types(&self) -> u8 {
        self.0
            .sysex()
            .u7_at(report_offsets::INQUIRY_CHANNEL_CONTROLLER_TYPES)
    }

    /// The requested note data message types.
    pub fn note_data_message_types(&self) -> u8 {
        self.0.sysex().u7_at(report_offsets::INQUIRY_NOTE_DATA_TYPES)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Ask the addressee to report the selected message types.
pub fn midi_message_report_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    data_control: u8,
    system_messages: u8,
    channel_controller_messages: u8,
    note_data_messages: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        5,
        subtype::MIDI_MESSAGE_REPORT_INQUIRY,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_u7(data_control);
    sx.add_u7(system_messages);
    sx.add_u7(0); // reserved
    sx.add_u7(channel_controller_messages);
    sx.add_u7(note_data_messages);
    sx
}

/// Read access to a MIDI message report reply.
#[derive(Copy, Clone, Debug)]
pub struct MidiMessageReportReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> MidiMessageReportReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid report reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for report replies carrying all four payload bytes.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::MIDI_MESSAGE_REPORT_REPLY,
            report_offsets::REPLY_NOTE_DATA_TYPES + 1,
        )
    }

    /// The system message types that will follow.
    pub fn system_message_types(&self) -> u8 {
        self.0.sysex().u7_at(report_offsets::REPLY_SYSTEM_MESSAGE_TYPES)
    }

    /// The channel controller message types that will follow.
    pub fn channel_controller_message_types(&self) -> u8 {
        self.0
            .sysex()
            .u7_at(report_offsets::REPLY_CHANNEL_CONTROLLER_TYPES)
    }

    /// The note data message types that will follow.
    pub fn note_data_message_types(&self) -> u8 {
        self.0.sysex().u7_at(report_offsets::REPLY_NOTE_DATA_TYPES)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Announce a MIDI message report. Report replies are broadcast.
pub fn midi_message_report_reply(
    source_muid: Muid,
    system_messages: u8,
    channel_controller_messages: u8,
    note_data_messages: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        4,
        subtype::MIDI_MESSAGE_REPORT_REPLY,
        source_muid,
        muid::BROADCAST,
        device_id,
    );
    sx.add_u7(system_messages);
    sx.add_u7(0); // reserved
    sx.add_u7(channel_controller_messages);
    sx.add_u7(note_data_messages);
    sx
}

/// Read access to a MIDI message report end marker.
#[derive(Copy, Clone, Debug)]
pub struct MidiMessageReportEndView<'a>(CapabilityInquiryView<'a>);

impl<'a> MidiMessageReportEndView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid report end.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for report end markers.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(sx, subtype::MIDI_MESSAGE_REPORT_END, field_offsets::PAYLOAD)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Mark the end of a MIDI message report. Broadcast like the reply.
pub fn midi_message_report_end(source_muid: Muid, device_id: u8) -> Sysex7 {
    envelope_with_capacity(
        0,
        subtype::MIDI_MESSAGE_REPORT_END,
        source_muid,
        muid::BROADCAST,
        device_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn capabilities_round_trip() {
        let inquiry = process_inquiry_capabilities_inquiry(Muid(1), Muid(2), 0x7F);
        assert_eq!(inquiry.data.len(), 12);
        assert_eq!(inquiry.data[2], subtype::PROCESS_INQUIRY_CAPABILITIES_INQUIRY);
        assert!(crate::ci::is_capability_inquiry_message(&inquiry));

        let reply =
            process_inquiry_capabilities_reply(Muid(2), Muid(1), FEATURE_MIDI_MESSAGE_REPORT, 0x7F);
        assert!(ProcessInquiryCapabilitiesReplyView::validate(&reply));
        let m = ProcessInquiryCapabilitiesReplyView::new(&reply).unwrap();
        assert_eq!(m.supported_features(), FEATURE_MIDI_MESSAGE_REPORT);

        let mut truncated = reply.clone();
        truncated.data.pop();
        assert!(!ProcessInquiryCapabilitiesReplyView::validate(&truncated));
    }

    #[test]
    fn report_inquiry_round_trip() {
        let sx = midi_message_report_inquiry(Muid(1), Muid(2), 0x01, 0x03, 0x7F, 0x07, 0x05);
        assert_eq!(sx.data.len(), 17);
        assert!(MidiMessageReportInquiryView::validate(&sx));
        let m = MidiMessageReportInquiryView::new(&sx).unwrap();
        assert_eq!(m.envelope().device_id(), 0x05);
        assert_eq!(m.message_data_control(), 0x01);
        assert_eq!(m.system_message_types(), 0x03);
        assert_eq!(m.channel_controller_message_types(), 0x7F);
        assert_eq!(m.note_data_message_types(), 0x07);

        let mut truncated = sx.clone();
        truncated.data.pop();
        assert!(!MidiMessageReportInquiryView::validate(&truncated));
    }

    #[test]
    fn report_reply_round_trip() {
        let sx = midi_message_report_reply(Muid(1), 0x03, 0x7F, 0x07, 0x05);
        assert_eq!(sx.data.len(), 16);
        assert!(MidiMessageReportReplyView::validate(&sx));
        let m = MidiMessageReportReplyView::new(&sx).unwrap();
        assert_eq!(m.envelope().destination_muid(), muid::BROADCAST);
        assert_eq!(m.system_message_types(), 0x03);
        assert_eq!(m.channel_controller_message_types(), 0x7F);
        assert_eq!(m.note_data_message_types(), 0x07);
    }

    #[test]
    fn report_end_round_trip() {
        let sx = midi_message_report_end(Muid(1), 0x05);
        assert_eq!(sx.data.len(), 12);
        assert!(MidiMessageReportEndView::validate(&sx));
        let m = MidiMessageReportEndView::new(&sx).unwrap();
        assert_eq!(m.envelope().destination_muid(), muid::BROADCAST);
        assert_eq!(m.envelope().device_id(), 0x05);
    }
}
