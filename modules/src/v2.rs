//! # Module System v2
//!
//! Module API the runtime drives interface drivers through.
//!
//! A driver describes itself with [`ModuleInfo`], receives its configuration
//! through a [`Context`], and reacts to power-management [`Event`]s and
//! [`Request`]s from the keyboard side.

use crate::{ModuleError, ModuleFlags, ModuleId, ModuleVersion};
use alloc::string::String;
use alloc::vec::Vec;

// =============================================================================
// Module Metadata v2
// =============================================================================

/// Module metadata v2
#[derive(Debug, Clone)]
pub struct ModuleInfo {
    /// Module name (unique identifier string)
    pub name: &'static str,
    /// Version
    pub version: ModuleVersion,
    /// Description
    pub description: &'static str,
    /// Author(s)
    pub author: &'static str,
    /// License
    pub license: &'static str,
    /// Module flags
    pub flags: ModuleFlags,
    /// Capabilities this module provides
    pub provides: &'static [&'static str],
}

impl ModuleInfo {
    /// Create new module info with builder pattern
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            version: ModuleVersion::new(0, 1, 0),
            description: "",
            author: "Unknown",
            license: "GPL",
            flags: ModuleFlags::empty(),
            provides: &[],
        }
    }

    /// Set version
    pub const fn version(mut self, major: u16, minor: u16, patch: u16) -> Self {
        self.version = ModuleVersion::new(major, minor, patch);
        self
    }

    /// Set description
    pub const fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Set author
    pub const fn author(mut self, author: &'static str) -> Self {
        self.author = author;
        self
    }

    /// Set license
    pub const fn license(mut self, license: &'static str) -> Self {
        self.license = license;
        self
    }

    /// Set flags
    pub const fn flags(mut self, flags: ModuleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set provides
    pub const fn provides(mut self, provs: &'static [&'static str]) -> Self {
        self.provides = provs;
        self
    }
}

// =============================================================================
// Events and Requests
// =============================================================================

/// Event types that modules can receive
#[derive(Debug, Clone)]
pub enum Event {
    /// The system is about to suspend
    Suspend,
    /// The system resumed from suspend
    Resume,
    /// System is shutting down
    Shutdown,
}

/// Response to an event
#[derive(Debug, Clone)]
pub enum EventResponse {
    /// Event handled successfully
    Handled,
    /// Event not relevant to this module
    Ignored,
    /// Error handling event
    Error(String),
}

/// Request from one module to another
#[derive(Debug, Clone)]
pub struct Request {
    /// Source module
    pub source: &'static str,
    /// Request type
    pub request_type: String,
    /// Request payload
    pub payload: Vec<u8>,
}

/// Response to a request
#[derive(Debug, Clone)]
pub struct Response {
    /// Success status
    pub success: bool,
    /// Response payload
    pub payload: Vec<u8>,
    /// Error message if failed
    pub error: Option<String>,
}

impl Response {
    /// Create a success response
    pub fn ok(payload: Vec<u8>) -> Self {
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    /// Create an error response
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: Vec::new(),
            error: Some(message.into()),
        }
    }
}

// =============================================================================
// Module Context v2
// =============================================================================

/// Context provided to modules during initialization
pub struct Context<'a> {
    /// Module's assigned ID
    pub id: ModuleId,
    /// Configuration key-value pairs
    config: &'a dyn Fn(&str) -> Option<&'a str>,
}

impl<'a> Context<'a> {
    /// Create a new context
    pub fn new(id: ModuleId, config: &'a dyn Fn(&str) -> Option<&'a str>) -> Self {
        Self { id, config }
    }

    /// Get a configuration value
    pub fn config(&self, key: &str) -> Option<&str> {
        (self.config)(key)
    }

    /// Get a configuration value as a boolean (`true`/`false`, `1`/`0`)
    pub fn config_bool(&self, key: &str) -> Option<bool> {
        match self.config(key)? {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl core::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context").field("id", &self.id).finish_non_exhaustive()
    }
}

// =============================================================================
// Module Trait v2
// =============================================================================

/// The unified Module trait v2
///
/// # Lifecycle
///
/// 1. `info()` - Called to get module metadata
/// 2. `init()` - Called once during module loading
/// 3. `start()` - Called to activate the module
/// 4. `handle_event()` - Called for power-management events
/// 5. `handle_request()` - Called for requests from the keyboard side
/// 6. `stop()` - Called before unloading
pub trait ModuleTrait: Send + Sync {
    /// Get module information (metadata)
    fn info(&self) -> ModuleInfo;

    /// Initialize the module
    ///
    /// Called once, before `start`. Use this to apply configuration.
    fn init(&mut self, ctx: &Context<'_>) -> Result<(), ModuleError>;

    /// Start the module
    fn start(&mut self) -> Result<(), ModuleError>;

    /// Stop the module
    fn stop(&mut self) -> Result<(), ModuleError>;

    /// Handle a system event
    fn handle_event(&mut self, _event: &Event) -> EventResponse {
        EventResponse::Ignored
    }

    /// Handle a request from another module
    fn handle_request(&mut self, _request: &Request) -> Result<Response, ModuleError> {
        Ok(Response::err("Not implemented"))
    }

    /// Check if module is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}
