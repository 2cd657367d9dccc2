//! CI profile configuration: advertising, enabling, and describing the
//! standardised behaviour sets a device supports.
use crate::ci::{
    envelope_matches, envelope_with_capacity, field_offsets, subtype, CapabilityInquiryView,
};
use crate::muid::Muid;
use crate::sysex::Sysex7;

/// A five-byte profile identifier: a standard-defined profile number or a
/// manufacturer-specific ID.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct ProfileId {
    /// `0x7E` for standard profiles, or manufacturer SysEx ID byte 1.
    pub byte1: u8,
    /// Profile number MSB, or manufacturer SysEx ID byte 2.
    pub byte2: u8,
    /// Profile number LSB, or manufacturer SysEx ID byte 3.
    pub byte3: u8,
    /// Profile version, or manufacturer-specific data.
    pub byte4: u8,
    /// Profile level, or manufacturer-specific data.
    pub byte5: u8,
}

impl ProfileId {
    /// A profile ID from its five wire bytes.
    pub fn new(byte1: u8, byte2: u8, byte3: u8, byte4: u8, byte5: u8) -> Self {
        Self {
            byte1,
            byte2,
            byte3,
            byte4,
            byte5,
        }
    }

    /// The five wire bytes.
    pub fn bytes(&self) -> [u8; 5] {
        [self.byte1, self.byte2, self.byte3, self.byte4, self.byte5]
    }

    fn read(sx: &Sysex7, offset: usize) -> Self {
        Self::new(
            sx.data[offset],
            sx.data[offset + 1],
            sx.data[offset + 2],
            sx.data[offset + 3],
            sx.data[offset + 4],
        )
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new(0x7E, 0, 0, 0, 0)
    }
}

//---- profile inquiry

/// Read access to a profile inquiry.
#[derive(Copy, Clone, Debug)]
pub struct ProfileInquiryView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid profile inquiry.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for profile inquiries.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(sx, subtype::PROFILE_INQUIRY, field_offsets::PAYLOAD)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// A profile inquiry: which profiles does the addressee have?
pub fn profile_inquiry(source_muid: Muid, destination_muid: Muid, device_id: u8) -> Sysex7 {
    envelope_with_capacity(
        0,
        subtype::PROFILE_INQUIRY,
        source_muid,
        destination_muid,
        device_id,
    )
}

//---- profile inquiry reply

/// Read access to a profile inquiry reply carrying the enabled and
/// disabled profile lists.
#[derive(Copy, Clone, Debug)]
pub struct ProfileInquiryReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileInquiryReplyView<'a> {
    const ENABLED_COUNT: usize = field_offsets::PAYLOAD;
    const ENABLED_LIST: usize = field_offsets::PAYLOAD + 2;

    /// A view of `sx`, or `None` when `sx` is not a valid reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for profile inquiry replies whose two embedded list lengths
    /// both fit the buffer.
    pub fn validate(sx: &Sysex7) -> bool {
        if !envelope_matches(sx, subtype::PROFILE_INQUIRY_REPLY, Self::ENABLED_LIST) {
            return false;
        }
        let num_enabled = usize::from(sx.u14_at(Self::ENABLED_COUNT));
        let disabled_count = Self::ENABLED_LIST + 5 * num_enabled;
        if sx.data.len() < disabled_count + 2 {
            return false;
        }
        let num_disabled = usize::from(sx.u14_at(disabled_count));
        sx.data.len() >= disabled_count + 2 + 5 * num_disabled
    }

    fn offset_of_disabled(&self) -> usize {
        Self::ENABLED_LIST + 5 * usize::from(self.num_enabled_profiles())
    }

    /// True when at least one profile is enabled.
    pub fn has_enabled_profiles(&self) -> bool {
        self.num_enabled_profiles() != 0
    }

    /// True when at least one profile is disabled.
    pub fn has_disabled_profiles(&self) -> bool {
        self.num_disabled_profiles() != 0
    }

    /// The number of enabled profiles.
    pub fn num_enabled_profiles(&self) -> u16 {
        self.0.sysex().u14_at(Self::ENABLED_COUNT)
    }

    /// The number of disabled profiles.
    pub fn num_disabled_profiles(&self) -> u16 {
        self.0.sysex().u14_at(self.offset_of_disabled())
    }

    /// The enabled profiles.
    pub fn enabled_profiles(&self) -> Vec<ProfileId> {
        self.profiles_at(Self::ENABLED_COUNT)
    }

    /// The disabled profiles.
    pub fn disabled_profiles(&self) -> Vec<ProfileId> {
        self.profiles_at(self.offset_of_disabled())
    }

    fn profiles_at(&self, count_offset: usize) -> Vec<ProfileId> {
        let sx = self.0.sysex();
        let count = usize::from(sx.u14_at(count_offset));
        (0..count)
            .map(|i| ProfileId::read(sx, count_offset + 2 + 5 * i))
            .collect()
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// A profile inquiry reply listing enabled and disabled profiles.
pub fn profile_inquiry_reply(
    source_muid: Muid,
    destination_muid: Muid,
    enabled: &[ProfileId],
    disabled: &[ProfileId],
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        4 + 5 * (enabled.len() + disabled.len()),
        subtype::PROFILE_INQUIRY_REPLY,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_u14(enabled.len() as u16);
    for profile in enabled {
        sx.add_data(&profile.bytes());
    }
    sx.add_u14(disabled.len() as u16);
    for profile in disabled {
        sx.add_data(&profile.bytes());
    }
    sx
}

//---- single-profile messages (on/off/enabled/disabled/added/removed)

/// Read access to the profile messages carrying exactly one profile ID:
/// set-on, set-off, enabled, disabled, added, and removed.
#[derive(Copy, Clone, Debug)]
pub struct ProfileIdView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileIdView<'a> {
    /// A view of `sx`, or `None` when `sx` is not one of the
    /// single-profile messages.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for the single-profile subtypes with a complete profile ID.
    pub fn validate(sx: &Sysex7) -> bool {
        crate::ci::is_capability_inquiry_message(sx)
            && sx.data.len() >= field_offsets::PAYLOAD + 5
            && (subtype::SET_PROFILE_ON..=subtype::PROFILE_REMOVED).contains(&sx.data[2])
    }

    /// The profile the message is about.
    pub fn profile(&self) -> ProfileId {
        ProfileId::read(self.0.sysex(), field_offsets::PAYLOAD)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

fn profile_id_message(
    subtype: u8,
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(5, subtype, source_muid, destination_muid, device_id);
    sx.add_data(&profile.bytes());
    sx
}

/// Ask the addressee to enable `profile`.
pub fn profile_on_request(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::SET_PROFILE_ON,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

/// Ask the addressee to disable `profile`.
pub fn profile_off_request(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::SET_PROFILE_OFF,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

/// Report that `profile` is now enabled.
pub fn profile_enabled_notification(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::PROFILE_ENABLED,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

/// Report that `profile` is now disabled.
pub fn profile_disabled_notification(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::PROFILE_DISABLED,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

/// Report that `profile` was added to the addressable set.
pub fn profile_added_notification(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::PROFILE_ADDED,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

/// Report that `profile` was removed from the addressable set.
pub fn profile_removed_notification(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    device_id: u8,
) -> Sysex7 {
    profile_id_message(
        subtype::PROFILE_REMOVED,
        source_muid,
        destination_muid,
        profile,
        device_id,
    )
}

//---- profile details

mod details_offsets {
    use crate::ci::field_offsets::PAYLOAD;

    pub const PROFILE_ID: usize = PAYLOAD;
    pub const TARGET: usize = PAYLOAD + 5;
    pub const TARGET_DATA_LENGTH: usize = PAYLOAD + 6;
    pub const TARGET_DATA: usize = PAYLOAD + 8;
}

/// Read access to a profile details inquiry.
#[derive(Copy, Clone, Debug)]
pub struct ProfileDetailsInquiryView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileDetailsInquiryView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid details inquiry.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for profile details inquiries.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::PROFILE_DETAILS_INQUIRY,
            details_offsets::TARGET + 1,
        )
    }

    /// The profile being asked about.
    pub fn profile(&self) -> ProfileId {
        ProfileId::read(self.0.sysex(), details_offsets::PROFILE_ID)
    }

    /// The inquiry target byte.
    pub fn target(&self) -> u8 {
        self.0.sysex().u7_at(details_offsets::TARGET)
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Ask for details of `profile` regarding `target`.
pub fn profile_details_inquiry(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    target: u8,
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        6,
        subtype::PROFILE_DETAILS_INQUIRY,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_data(&profile.bytes());
    sx.add_u7(target);
    sx
}

/// Read access to a profile details reply.
#[derive(Copy, Clone, Debug)]
pub struct ProfileDetailsReplyView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileDetailsReplyView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid details reply.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for profile details replies whose embedded data length fits
    /// the buffer.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(
            sx,
            subtype::PROFILE_DETAILS_REPLY,
            details_offsets::TARGET_DATA,
        ) && sx.data.len()
            >= details_offsets::TARGET_DATA
                + usize::from(sx.u14_at(details_offsets::TARGET_DATA_LENGTH))
    }

    /// The profile being described.
    pub fn profile(&self) -> ProfileId {
        ProfileId::read(self.0.sysex(), details_offsets::PROFILE_ID)
    }

    /// The inquiry target byte being answered.
    pub fn target(&self) -> u8 {
        self.0.sysex().u7_at(details_offsets::TARGET)
    }

    /// The length of the target data.
    pub fn target_data_length(&self) -> u16 {
        self.0.sysex().u14_at(details_offsets::TARGET_DATA_LENGTH)
    }

    /// The target data bytes.
    pub fn target_data(&self) -> &'a [u8] {
        let start = details_offsets::TARGET_DATA;
        &self.0.sysex().data[start..start + usize::from(self.target_data_length())]
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// Answer a details inquiry with `data`.
pub fn profile_details_reply(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    target: u8,
    data: &[u8],
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        8 + data.len(),
        subtype::PROFILE_DETAILS_REPLY,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_data(&profile.bytes());
    sx.add_u7(target);
    sx.add_u14(data.len() as u16);
    sx.add_data(data);
    sx
}

//---- profile specific data

mod specific_data_offsets {
    use crate::ci::field_offsets::PAYLOAD;

    pub const PROFILE_ID: usize = PAYLOAD;
    pub const DATA_SIZE: usize = PAYLOAD + 5;
    pub const DATA: usize = PAYLOAD + 9;
}

/// Read access to a profile-specific data message.
#[derive(Copy, Clone, Debug)]
pub struct ProfileSpecificDataView<'a>(CapabilityInquiryView<'a>);

impl<'a> ProfileSpecificDataView<'a> {
    /// A view of `sx`, or `None` when `sx` is not a valid
    /// profile-specific data message.
    pub fn new(sx: &'a Sysex7) -> Option<Self> {
        Self::validate(sx).then(|| Self(CapabilityInquiryView { sx }))
    }

    /// True for profile-specific data messages whose embedded length fits
    /// the buffer.
    pub fn validate(sx: &Sysex7) -> bool {
        envelope_matches(sx, subtype::PROFILE_SPECIFIC_DATA, specific_data_offsets::DATA)
            && sx.data.len()
                >= specific_data_offsets::DATA
                    + sx.u28_at(specific_data_offsets::DATA_SIZE) as usize
    }

    /// The profile the data belongs to.
    pub fn profile(&self) -> ProfileId {
        ProfileId::read(self.0.sysex(), specific_data_offsets::PROFILE_ID)
    }

    /// The length of the data.
    pub fn data_size(&self) -> usize {
        self.0.sysex().u28_at(specific_data_offsets::DATA_SIZE) as usize
    }

    /// The profile-specific data bytes.
    pub fn data(&self) -> &'a [u8] {
        let start = specific_data_offsets::DATA;
        &self.0.sysex().data[start..start + self.data_size()]
    }

    /// The shared envelope accessors.
    pub fn envelope(&self) -> &CapabilityInquiryView<'a> {
        &self.0
    }
}

/// A profile-specific data message.
pub fn profile_specific_data(
    source_muid: Muid,
    destination_muid: Muid,
    profile: &ProfileId,
    data: &[u8],
    device_id: u8,
) -> Sysex7 {
    let mut sx = envelope_with_capacity(
        9 + data.len(),
        subtype::PROFILE_SPECIFIC_DATA,
        source_muid,
        destination_muid,
        device_id,
    );
    sx.add_data(&profile.bytes());
    sx.add_u28(data.len() as u32);
    sx.add_data(data);
    sx
}
