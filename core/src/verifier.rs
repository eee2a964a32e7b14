use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::{ConnectionError, KeyError};
use crate::path::PathReader;
use crate::traits::IdentityRegistry;
use crate::types::{
    ConnectionObject, DeviceIdentity, Format4Key, KeyData, ELECTRONIC_KEY_SEGMENT,
    FORMAT_4_SEGMENT_SIZE, FORMAT_4_SEGMENT_WORDS, KEY_FORMAT_4,
};

/// Check a decoded key against the device identity. Zero fields act as wildcards,
/// except the minor revision in compatibility mode.
pub fn check_key_data(key_data: &KeyData, identity: &DeviceIdentity) -> Result<(), KeyError> {
    // 1) Format
    let key = match key_data {
        KeyData::Format4(key) => key,
        KeyData::Unsupported(format) => return Err(KeyError::InvalidSegmentType(*format)),
    };

    // 2) Vendor and product code
    let vendor_ok = key.vendor_id() == identity.vendor_id || key.vendor_id() == 0;
    let product_ok = key.product_code() == identity.product_code || key.product_code() == 0;
    if !(vendor_ok && product_ok) {
        return Err(KeyError::VendorOrProductMismatch);
    }

    // 3) Device type
    if key.device_type() != identity.device_type && key.device_type() != 0 {
        return Err(KeyError::DeviceTypeMismatch);
    }

    // 4) Revision
    let major = key.major_revision();
    let minor = key.minor_revision();
    let device = identity.revision;
    let revision_ok = if key.compatibility() {
        // Minor 0 is never a wildcard here.
        major == device.major && minor > 0 && minor <= device.minor
    } else {
        major == 0 || (major == device.major && (minor == device.minor || minor == 0))
    };
    if revision_ok { Ok(()) } else { Err(KeyError::RevisionMismatch) }
}

/// Extract an electronic key segment at the reader's cursor, record it on the
/// connection and check it against the device identity.
///
/// `remaining_path_words` counts the unread path in 16-bit words. Anything other
/// than a Format 4 electronic key segment is left untouched for the path tokenizer.
/// On success the reader and the word counter move past the segment; on failure
/// neither moves.
pub fn check_electronic_key(
    connection: &mut ConnectionObject,
    identity: &DeviceIdentity,
    path: &mut PathReader<'_>,
    remaining_path_words: &mut usize,
) -> Result<(), ConnectionError> {
    if path.peek_at(0) != Some(ELECTRONIC_KEY_SEGMENT) {
        return Ok(());
    }
    let key_format = path.peek_at(1).ok_or(ConnectionError::NotEnoughData)?;
    match key_format {
        KEY_FORMAT_4 => {}
        other => {
            debug!(key_format = other, "electronic key format not handled, passing through");
            return Ok(());
        }
    }

    if *remaining_path_words < FORMAT_4_SEGMENT_WORDS {
        info!(remaining_path_words = *remaining_path_words, "message not long enough for electronic key");
        return Err(ConnectionError::NotEnoughData);
    }
    let payload = path.peek_array::<8>(2).ok_or_else(|| {
        info!(available = path.size(), "path data shorter than electronic key segment");
        ConnectionError::NotEnoughData
    })?;

    let key = Format4Key::decode(&payload);
    info!(
        vendor_id = key.vendor_id(),
        device_type = key.device_type(),
        product_code = key.product_code(),
        major = key.major_revision(),
        minor = key.minor_revision(),
        compatibility = key.compatibility(),
        "electronic key"
    );
    let key_data = KeyData::Format4(key);
    connection.electronic_key.set_key_data(key_data);

    if let Err(e) = check_key_data(&key_data, identity) {
        warn!(error = %e, extended_status = e.extended_status().code(), "electronic key rejected");
        return Err(ConnectionError::ConnectionFailure(e));
    }

    path.skip(FORMAT_4_SEGMENT_SIZE).ok_or(ConnectionError::NotEnoughData)?;
    *remaining_path_words -= FORMAT_4_SEGMENT_WORDS;
    Ok(())
}

/// Runs electronic key checks against an identity registry.
pub struct KeyChecker {
    registry: Arc<dyn IdentityRegistry>,
}

impl KeyChecker {
    /// Create a new `KeyChecker` reading device facts from `registry`.
    pub fn new(registry: Arc<dyn IdentityRegistry>) -> Self { Self { registry } }

    /// Identity the checks currently compare against.
    pub fn identity(&self) -> DeviceIdentity { self.registry.identity() }

    /// See [`check_key_data`].
    pub fn check_key_data(&self, key_data: &KeyData) -> Result<(), KeyError> {
        check_key_data(key_data, &self.identity())
    }

    /// See [`check_electronic_key`].
    pub fn check_electronic_key(
        &self,
        connection: &mut ConnectionObject,
        path: &mut PathReader<'_>,
        remaining_path_words: &mut usize,
    ) -> Result<(), ConnectionError> {
        check_electronic_key(connection, &self.identity(), path, remaining_path_words)
    }
}
