//! CIP electronic key core: segment extraction and key verification.
//!
//! Implements the Format 4 electronic key of the CIP connection path:
//! - Decoding the 10-byte logical segment (`0x34`, format `4`, little-endian fields)
//! - Matching the key against the device identity with zero wildcards
//! - Compatibility-mode revision checks
//! - Extended status codes for the connection manager's rejection response
//! - A C ABI entry point for embedding into existing device stacks

pub mod errors;
pub mod ffi;
pub mod path;
pub mod traits;
pub mod types;
pub mod verifier;

pub use errors::{ConfigError, ConnectionError, KeyError};
pub use path::PathReader;
pub use traits::IdentityRegistry;
pub use types::{
    ConnectionObject, DeviceIdentity, ElectronicKey, ExtendedStatus, Format4Key, GeneralStatus, KeyData,
    Revision, ELECTRONIC_KEY_SEGMENT, FORMAT_4_SEGMENT_SIZE, FORMAT_4_SEGMENT_WORDS, KEY_FORMAT_4,
};
pub use verifier::{check_electronic_key, check_key_data, KeyChecker};

/// Library version string.
pub fn version() -> &'static str { concat!("cip-ekey-core ", env!("CARGO_PKG_VERSION")) }
