//! # Clevo Module System
//!
//! Glue between interface drivers and the keyboard subsystem that consumes
//! them. It provides:
//!
//! - The module lifecycle API ([`v2`]) drivers implement
//! - The capability trait interface drivers expose ([`interface::ClevoInterface`])
//! - The keyboard subsystem boundary ([`interface::KeyboardSubsystem`]) and
//!   its in-tree implementation ([`interface::InterfaceRegistry`])
//!
//! ## Module Lifecycle
//!
//! 1. Registration (metadata)
//! 2. Initialization (configuration)
//! 3. Running
//! 4. Shutdown

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

pub mod interface;
pub mod v2;

pub use interface::{
    ClevoInterface, EventCallback, InterfaceError, InterfaceRegistry, InterfaceResult,
    KeyboardSubsystem,
};

use core::sync::atomic::{AtomicU64, Ordering};
use bitflags::bitflags;

/// Module identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(u64);

impl ModuleId {
    /// Create a new module ID
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Module version (semantic versioning)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ModuleVersion {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Patch version
    pub patch: u16,
}

impl ModuleVersion {
    /// Create a new version
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }
}

impl core::fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

bitflags! {
    /// Module flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModuleFlags: u32 {
        /// Module is a driver
        const DRIVER = 1 << 3;
        /// Module handles power-management events
        const POWER_MANAGED = 1 << 4;
    }
}

/// Module state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    /// Module is registered but not initialized
    Registered,
    /// Module is initialized but not started
    Loaded,
    /// Module is running
    Running,
    /// Module is stopped
    Stopped,
}

/// Module errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// Module in wrong state
    WrongState {
        /// State the module is in
        current: ModuleState,
        /// State the operation needs
        required: ModuleState,
    },
    /// Request could not be decoded
    InvalidRequest,
}
