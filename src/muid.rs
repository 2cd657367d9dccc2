//! MUIDs: 28 bit identifiers devices use to address each other in
//! Capability Inquiry exchanges.

/// Addresses every device on the transport.
pub const BROADCAST: Muid = Muid(0x0FFF_FFFF);

/// A 28 bit MIDI unique identifier.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Muid(pub u32);

impl Muid {
    /// The raw 28 bit value.
    pub fn value(&self) -> u32 {
        self.0 & 0x0FFF_FFFF
    }

    /// The four little-endian 7 bit limbs carried on the wire.
    pub fn to_bytes(&self) -> [u8; 4] {
        let v = self.value();
        [
            (v & 0x7F) as u8,
            ((v >> 7) & 0x7F) as u8,
            ((v >> 14) & 0x7F) as u8,
            ((v >> 21) & 0x7F) as u8,
        ]
    }

    /// Reassemble from wire limbs.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(
            u32::from(bytes[0] & 0x7F)
                | (u32::from(bytes[1] & 0x7F) << 7)
                | (u32::from(bytes[2] & 0x7F) << 14)
                | (u32::from(bytes[3] & 0x7F) << 21),
        )
    }
}

/// Generate a MUID by hashing the time since `UNIX_EPOCH`. A
/// process-local counter is mixed in so IDs produced in a tight loop stay
/// distinct, and results steer clear of the reserved range at the top of
/// the MUID space. Sufficient for session-unique IDs; persistence is not
/// required.
pub fn new_muid() -> Muid {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SALT: AtomicU32 = AtomicU32::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    let salt = SALT.fetch_add(1, Ordering::Relaxed);

    // FNV-1a over the clock and counter bytes, folded to 28 bits
    let mut hash: u32 = 0x811C_9DC5;
    for byte in nanos.to_le_bytes().into_iter().chain(salt.to_le_bytes()) {
        hash = (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193);
    }

    let mut id = (hash ^ (hash >> 4)) & 0x0FFF_FFFF;
    if id >= 0x0FFF_FF00 {
        id &= 0x00FF_FFFF;
    }
    Muid(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn limb_bytes() {
        assert_eq!(Muid(0x22899C4).to_bytes(), [0x44, 0x33, 0x22, 0x11]);
        assert_eq!(Muid::from_bytes([0x44, 0x33, 0x22, 0x11]), Muid(0x22899C4));
        assert_eq!(BROADCAST.to_bytes(), [0x7F, 0x7F, 0x7F, 0x7F]);
    }

    #[test]
    fn generated_muids_are_not_reserved() {
        for _ in 0..4 {
            let muid = new_muid();
            assert!(muid.value() < 0x0FFF_FF00);
        }
    }

    #[test]
    fn generated_muids_differ_within_a_loop() {
        let a = new_muid();
        let b = new_muid();
        assert_ne!(a, b);
    }
}
