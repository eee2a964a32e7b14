use thiserror::Error;

use crate::types::{ExtendedStatus, GeneralStatus};

/// Reasons an electronic key is rejected by the validator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid segment type in path: key format {0}")]
    InvalidSegmentType(u8),
    #[error("vendor id or product code mismatch")]
    VendorOrProductMismatch,
    #[error("device type mismatch")]
    DeviceTypeMismatch,
    #[error("revision mismatch")]
    RevisionMismatch,
}

impl KeyError {
    pub fn extended_status(&self) -> ExtendedStatus {
        match self {
            KeyError::InvalidSegmentType(_) => ExtendedStatus::InvalidSegmentType,
            KeyError::VendorOrProductMismatch => ExtendedStatus::VendorOrProductMismatch,
            KeyError::DeviceTypeMismatch => ExtendedStatus::DeviceTypeMismatch,
            KeyError::RevisionMismatch => ExtendedStatus::RevisionMismatch,
        }
    }
}

/// Failures of the electronic key step of a connection open.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("not enough data for electronic key segment")]
    NotEnoughData,
    #[error("connection failure: {0}")]
    ConnectionFailure(#[from] KeyError),
}

impl ConnectionError {
    pub fn general_status(&self) -> GeneralStatus {
        match self {
            ConnectionError::NotEnoughData => GeneralStatus::NotEnoughData,
            ConnectionError::ConnectionFailure(_) => GeneralStatus::ConnectionFailure,
        }
    }

    /// Extended status for the response; `None` when only a general status applies.
    pub fn extended_status(&self) -> Option<ExtendedStatus> {
        match self {
            ConnectionError::NotEnoughData => None,
            ConnectionError::ConnectionFailure(e) => Some(e.extended_status()),
        }
    }
}

/// Errors loading the device identity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("malformed device identity: {0}")]
    Malformed(String),
}
