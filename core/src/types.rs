use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Logical segment, special type, electronic key (path segment tag byte).
pub const ELECTRONIC_KEY_SEGMENT: u8 = 0x34;
/// Key format byte for the Format 4 electronic key.
pub const KEY_FORMAT_4: u8 = 4;
/// Encoded segment size in bytes: tag, format and the 8-byte payload.
pub const FORMAT_4_SEGMENT_SIZE: usize = 10;
/// Encoded segment size in 16-bit path words.
pub const FORMAT_4_SEGMENT_WORDS: usize = FORMAT_4_SEGMENT_SIZE / 2;

const MAJOR_REVISION_MASK: u8 = 0x7F;
const COMPATIBILITY_MASK: u8 = 0x80;

/// Major/minor revision pair of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub major: u8,
    pub minor: u8,
}

/// Identity the responding device declares about itself.
///
/// Loaded once at startup; read-only for the key checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub revision: Revision,
}

impl DeviceIdentity {
    /// Parse an identity fixture such as
    /// `{"vendor_id":1,"device_type":12,"product_code":65001,"revision":{"major":2,"minor":3}}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}

/// Format 4 electronic key payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Format4Key {
    vendor_id: u16,
    device_type: u16,
    product_code: u16,
    major_revision_compatibility: u8,
    minor_revision: u8,
}

impl Format4Key {
    pub fn new(
        vendor_id: u16,
        device_type: u16,
        product_code: u16,
        major_revision_compatibility: u8,
        minor_revision: u8,
    ) -> Self {
        Self { vendor_id, device_type, product_code, major_revision_compatibility, minor_revision }
    }

    pub fn vendor_id(&self) -> u16 { self.vendor_id }
    pub fn set_vendor_id(&mut self, vendor_id: u16) { self.vendor_id = vendor_id; }

    pub fn device_type(&self) -> u16 { self.device_type }
    pub fn set_device_type(&mut self, device_type: u16) { self.device_type = device_type; }

    pub fn product_code(&self) -> u16 { self.product_code }
    pub fn set_product_code(&mut self, product_code: u16) { self.product_code = product_code; }

    /// Raw byte: major revision in bits 0-6, compatibility flag in bit 7.
    pub fn major_revision_compatibility(&self) -> u8 { self.major_revision_compatibility }
    pub fn set_major_revision_compatibility(&mut self, value: u8) {
        self.major_revision_compatibility = value;
    }

    pub fn major_revision(&self) -> u8 { self.major_revision_compatibility & MAJOR_REVISION_MASK }

    pub fn compatibility(&self) -> bool {
        self.major_revision_compatibility & COMPATIBILITY_MASK == COMPATIBILITY_MASK
    }

    pub fn minor_revision(&self) -> u8 { self.minor_revision }
    pub fn set_minor_revision(&mut self, minor_revision: u8) { self.minor_revision = minor_revision; }

    /// Decode the 8-byte payload that follows the tag and format bytes.
    pub fn decode(payload: &[u8; 8]) -> Self {
        Self {
            vendor_id: u16::from_le_bytes([payload[0], payload[1]]),
            device_type: u16::from_le_bytes([payload[2], payload[3]]),
            product_code: u16::from_le_bytes([payload[4], payload[5]]),
            major_revision_compatibility: payload[6],
            minor_revision: payload[7],
        }
    }

    /// Encode the 8-byte payload in wire order.
    pub fn encode(&self) -> [u8; 8] {
        let v = self.vendor_id.to_le_bytes();
        let d = self.device_type.to_le_bytes();
        let p = self.product_code.to_le_bytes();
        [v[0], v[1], d[0], d[1], p[0], p[1], self.major_revision_compatibility, self.minor_revision]
    }

    /// Full path segment, tag and format byte included.
    pub fn encode_segment(&self) -> [u8; FORMAT_4_SEGMENT_SIZE] {
        let mut out = [0u8; FORMAT_4_SEGMENT_SIZE];
        out[0] = ELECTRONIC_KEY_SEGMENT;
        out[1] = KEY_FORMAT_4;
        out[2..].copy_from_slice(&self.encode());
        out
    }

    /// Hex-encoded full path segment.
    pub fn segment_hex(&self) -> String { hex::encode(self.encode_segment()) }
}

/// Format-specific key contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyData {
    Format4(Format4Key),
    /// A key format this device does not implement; rejected by validation.
    Unsupported(u8),
}

impl KeyData {
    pub fn key_format(&self) -> u8 {
        match self {
            KeyData::Format4(_) => KEY_FORMAT_4,
            KeyData::Unsupported(format) => *format,
        }
    }
}

/// Electronic key descriptor recorded on a connection.
///
/// Holds its own copy of the decoded key, so it stays valid for as long as the
/// connection object lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectronicKey {
    key_data: Option<KeyData>,
}

impl ElectronicKey {
    /// Format discriminant, `None` while no key segment has been seen.
    pub fn key_format(&self) -> Option<u8> { self.key_data.map(|d| d.key_format()) }

    /// Set the discriminant. A format other than the stored payload's discards the
    /// payload, since there is no way to reinterpret it.
    pub fn set_key_format(&mut self, key_format: u8) {
        if self.key_format() == Some(key_format) {
            return;
        }
        self.key_data = Some(match key_format {
            KEY_FORMAT_4 => KeyData::Format4(Format4Key::default()),
            other => KeyData::Unsupported(other),
        });
    }

    pub fn key_data(&self) -> Option<&KeyData> { self.key_data.as_ref() }
    pub fn set_key_data(&mut self, key_data: KeyData) { self.key_data = Some(key_data); }

    pub fn format4(&self) -> Option<&Format4Key> {
        match &self.key_data {
            Some(KeyData::Format4(key)) => Some(key),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool { self.key_data.is_some() }
}

/// Working state of a connection being opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionObject {
    pub electronic_key: ElectronicKey,
}

/// Connection manager extended status codes relevant to electronic keys.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtendedStatus {
    Success = 0x0000,
    VendorOrProductMismatch = 0x0114,
    DeviceTypeMismatch = 0x0115,
    RevisionMismatch = 0x0116,
    InvalidSegmentType = 0x0315,
}

impl ExtendedStatus {
    pub fn code(self) -> u16 { self as u16 }
}

/// CIP general status codes returned with a connection-open response.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneralStatus {
    Success = 0x00,
    ConnectionFailure = 0x01,
    NotEnoughData = 0x13,
}

impl GeneralStatus {
    pub fn code(self) -> u8 { self as u8 }
}
