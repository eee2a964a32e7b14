//! C ABI for device stacks written in C.

use std::slice;

use crate::path::PathReader;
use crate::types::{ConnectionObject, DeviceIdentity, ExtendedStatus, GeneralStatus, Revision};
use crate::verifier::check_electronic_key;

/// Device identity as laid out by C callers.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CipDeviceIdentity {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub major_revision: u8,
    pub minor_revision: u8,
}

impl From<CipDeviceIdentity> for DeviceIdentity {
    fn from(c: CipDeviceIdentity) -> Self {
        DeviceIdentity {
            vendor_id: c.vendor_id,
            device_type: c.device_type,
            product_code: c.product_code,
            revision: Revision { major: c.major_revision, minor: c.minor_revision },
        }
    }
}

/// Check the electronic key segment at the start of `path`.
///
/// Returns the CIP general status. On success `remaining_path_words` is decremented
/// and `consumed_bytes` receives the number of bytes the caller must skip (0 when the
/// path does not start with a Format 4 key). `extended_status` is always written.
/// Null pointers yield `NotEnoughData` and nothing is written.
///
/// # Safety
/// Non-null pointers must be valid and aligned; `path` must point to `path_len`
/// readable bytes.
#[no_mangle]
pub unsafe extern "C" fn cip_check_electronic_key(
    identity: *const CipDeviceIdentity,
    path: *const u8,
    path_len: usize,
    remaining_path_words: *mut usize,
    consumed_bytes: *mut usize,
    extended_status: *mut u16,
) -> u8 {
    if identity.is_null()
        || path.is_null()
        || remaining_path_words.is_null()
        || consumed_bytes.is_null()
        || extended_status.is_null()
    {
        return GeneralStatus::NotEnoughData.code();
    }
    let identity = DeviceIdentity::from(*identity);
    let data = slice::from_raw_parts(path, path_len);
    let mut reader = PathReader::new(data);
    let mut connection = ConnectionObject::default();

    let result = check_electronic_key(&mut connection, &identity, &mut reader, &mut *remaining_path_words);
    *consumed_bytes = reader.position();
    match result {
        Ok(()) => {
            *extended_status = ExtendedStatus::Success.code();
            GeneralStatus::Success.code()
        }
        Err(e) => {
            *extended_status = e.extended_status().unwrap_or(ExtendedStatus::Success).code();
            e.general_status().code()
        }
    }
}
