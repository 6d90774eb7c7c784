//! # ACPI Device Model
//!
//! Devices discovered by the runtime are handed to drivers as [`AcpiDevice`]
//! records. Drivers declare the hardware IDs they bind to with
//! [`AcpiDeviceId`] tables, and exchange data with firmware methods as
//! [`AcpiObject`] values.

use crate::{HalError, HalResult};
use alloc::collections::TryReserveError;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Maximum length of an ACPI id string, including the terminating NUL
pub const ACPI_ID_LEN: usize = 16;

/// Opaque firmware handle of a namespace object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AcpiHandle(u64);

impl AcpiHandle {
    /// Create a handle from a raw runtime value
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AcpiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An ACPI-typed value exchanged with firmware methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcpiObject {
    /// Integer (up to 64 bits)
    Integer(u64),
    /// String
    String(String),
    /// Raw buffer
    Buffer(Vec<u8>),
    /// Package of nested objects
    Package(Vec<AcpiObject>),
}

impl AcpiObject {
    /// Wrap a single integer in a one-element package
    pub fn integer_package(value: u64) -> Self {
        Self::Package(alloc::vec![Self::Integer(value)])
    }

    /// ACPI type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "Integer",
            Self::String(_) => "String",
            Self::Buffer(_) => "Buffer",
            Self::Package(_) => "Package",
        }
    }
}

/// A device instance discovered by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiDevice {
    /// Runtime-assigned instance number
    pub id: u64,
    /// Primary hardware ID (`_HID`)
    pub hid: String,
    /// Compatible ID (`_CID`), for fallback matching
    pub cid: Option<String>,
    /// Firmware handle, absent until the namespace object is resolved
    pub handle: Option<AcpiHandle>,
}

impl AcpiDevice {
    /// Create a device record with a resolved handle
    pub fn new(id: u64, hid: impl Into<String>, handle: AcpiHandle) -> Self {
        Self {
            id,
            hid: hid.into(),
            cid: None,
            handle: Some(handle),
        }
    }

    /// Set the compatible ID
    pub fn with_cid(mut self, cid: impl Into<String>) -> Self {
        self.cid = Some(cid.into());
        self
    }

    /// Drop the firmware handle
    pub fn without_handle(mut self) -> Self {
        self.handle = None;
        self
    }

    /// Resolve the firmware handle of this device
    pub fn handle(&self) -> HalResult<AcpiHandle> {
        self.handle.ok_or(HalError::NoHandle)
    }

    /// Copy this record, failing instead of aborting if memory runs out
    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        Ok(Self {
            id: self.id,
            hid: try_clone_str(&self.hid)?,
            cid: match &self.cid {
                Some(cid) => Some(try_clone_str(cid)?),
                None => None,
            },
            handle: self.handle,
        })
    }
}

fn try_clone_str(s: &str) -> Result<String, TryReserveError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())?;
    out.push_str(s);
    Ok(out)
}

/// Match table entry for binding a driver to devices by hardware ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiDeviceId {
    id: &'static str,
}

impl AcpiDeviceId {
    /// Create a match entry from a string ID (e.g., `"CLV0001"`)
    pub const fn new(id: &'static str) -> Self {
        assert!(id.len() < ACPI_ID_LEN, "ACPI id exceeds 16 bytes");
        Self { id }
    }

    /// The id string
    pub const fn as_str(&self) -> &'static str {
        self.id
    }

    /// Check if this entry matches a device's `_HID` or `_CID`
    ///
    /// Comparison is exact and case-sensitive.
    pub fn matches(&self, device: &AcpiDevice) -> bool {
        device.hid == self.id || device.cid.as_deref() == Some(self.id)
    }
}
