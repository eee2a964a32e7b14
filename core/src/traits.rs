//! Source of the device's own identity. Implementers decide where the facts live
//! (identity object, fixture file, test stub); the checks only ever read them.

use crate::types::DeviceIdentity;

pub trait IdentityRegistry: Send + Sync {
    /// Return the identity this device declares.
    fn identity(&self) -> DeviceIdentity;
}

impl IdentityRegistry for DeviceIdentity {
    fn identity(&self) -> DeviceIdentity { *self }
}
