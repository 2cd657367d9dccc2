#![deny(missing_docs)]
//! Packets, codecs, and Capability Inquiry types for building MIDI-2 capable
//! software in Rust.
//!
//! The crate is a pure data-plane library: bytes or packets in, bytes or
//! packets out. [`packet::UniversalPacket`] is the 128-bit container every
//! UMP message lives in; the [`message`] modules build and read the typed
//! messages inside it; [`codec`] converts between MIDI 1.0 byte streams and
//! packets; [`sysex`] and [`ci`] cover System Exclusive payloads and MIDI
//! Capability Inquiry.
pub mod ci;
pub mod codec;
pub mod convert;
pub mod message;
pub mod muid;
pub mod packet;
pub mod sysex;
pub mod types;
