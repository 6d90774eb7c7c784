//! # Clevo HAL - Firmware Abstraction Layer
//!
//! This crate defines the boundary between the Clevo interface drivers and the
//! firmware/device-management runtime that hosts them.
//!
//! ## Contents
//!
//! - [`acpi`]: ACPI object model, device records and hardware-ID matching
//! - [`firmware`]: the `_DSM` evaluation primitive and scoped reply release
//! - [`guid`]: GUID/UUID representation and parsing
//!
//! Nothing here talks to hardware directly. The runtime implements
//! [`firmware::DsmFirmware`] and hands devices to drivers as
//! [`acpi::AcpiDevice`] records.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod acpi;
pub mod firmware;
pub mod guid;

pub use acpi::{AcpiDevice, AcpiDeviceId, AcpiHandle, AcpiObject};
pub use firmware::{DsmFirmware, DsmReply};
pub use guid::{parse_guid, Guid};

use core::fmt;

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Errors that can occur in HAL operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// A GUID string could not be parsed
    InvalidGuid,
    /// The device has no firmware handle
    NoHandle,
}

impl HalError {
    /// Short name of the error
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidGuid => "InvalidGuid",
            Self::NoHandle => "NoHandle",
        }
    }
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HAL Error: {}", self.name())
    }
}
