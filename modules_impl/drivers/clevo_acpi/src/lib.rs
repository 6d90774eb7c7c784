//! # Clevo ACPI Interface Driver
//!
//! Exposes the Clevo vendor `_DSM` control surface to the keyboard subsystem
//! as a [`ClevoInterface`](clevo_modules::ClevoInterface) named `clevo_acpi`.
//!
//! ## Features
//! - `(command, argument)` translation to UUID-scoped `_DSM` calls
//! - Single device binding with last-bind-wins replacement
//! - Firmware notifications forwarded to one subscriber
//! - No-op power-management hooks
//!
//! ## Usage
//!
//! The runtime loads [`ClevoAcpiModule`], calls `init`, and then drives the
//! [`ClevoAcpiDriver`] it exposes with `add`, `remove` and `notify` for every
//! device matching `CLV0001`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod config;
mod descriptor;
mod driver;
mod error;
mod evaluate;

#[cfg(test)]
mod testing;

pub use config::ClevoAcpiConfig;
pub use descriptor::InterfaceDescriptor;
pub use driver::{ClevoAcpiDriver, DriverBinding};
pub use error::{ClevoAcpiError, ClevoAcpiResult};
pub use evaluate::evaluate;

use alloc::sync::Arc;
use bitflags::bitflags;
use clevo_hal::acpi::ACPI_ID_LEN;
use clevo_hal::{AcpiDeviceId, DsmFirmware};
use clevo_modules::v2::{Context, Event, EventResponse, ModuleInfo, ModuleTrait, Request, Response};
use clevo_modules::{KeyboardSubsystem, ModuleError, ModuleFlags, ModuleState};

// =============================================================================
// Device Matching Contract
// =============================================================================

/// Driver name, driver class and interface id
pub const DRIVER_NAME: &str = "clevo_acpi";

/// Hardware ID of the Clevo ACPI device
pub const CLEVO_ACPI_RESOURCE_HID: &str = "CLV0001";

/// UUID of the Clevo `_DSM` method family
pub const CLEVO_ACPI_DSM_UUID: &str = "93f224e4-fbdc-4bbf-add6-db71bdc0afad";

/// `_DSM` revision sent with every call
pub const CLEVO_ACPI_DSM_REVISION: u64 = 0;

static_assertions::const_assert!(CLEVO_ACPI_RESOURCE_HID.len() < ACPI_ID_LEN);

/// Devices this driver binds to
pub static CLEVO_ACPI_DEVICE_IDS: &[AcpiDeviceId] = &[AcpiDeviceId::new(CLEVO_ACPI_RESOURCE_HID)];

bitflags! {
    /// ACPI driver registration flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AcpiDriverFlags: u32 {
        /// Deliver every firmware notification, not only device-class ones
        const ALL_NOTIFY_EVENTS = 1 << 0;
    }
}

/// What the driver registers with the device-management runtime
#[derive(Debug, Clone, Copy)]
pub struct AcpiDriverInfo {
    /// Driver name
    pub name: &'static str,
    /// Driver class
    pub class: &'static str,
    /// Hardware IDs handled
    pub ids: &'static [AcpiDeviceId],
    /// Registration flags
    pub flags: AcpiDriverFlags,
}

// =============================================================================
// Command / Result
// =============================================================================

/// A vendor firmware command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareCommand {
    /// `_DSM` function index
    pub opcode: u8,
    /// Single integer argument
    pub argument: u32,
}

impl FirmwareCommand {
    /// Create a command
    pub const fn new(opcode: u8, argument: u32) -> Self {
        Self { opcode, argument }
    }
}

/// Outcome of a firmware command, in status-code form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareResult {
    /// `0` on success, negative status otherwise
    pub status: i32,
    /// Decoded value, `0` when not present
    pub value: u32,
    /// Whether `value` was produced by the firmware
    pub present: bool,
}

impl FirmwareResult {
    /// Did the command succeed?
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

impl From<ClevoAcpiResult<u32>> for FirmwareResult {
    fn from(result: ClevoAcpiResult<u32>) -> Self {
        match result {
            Ok(value) => Self { status: 0, value, present: true },
            Err(e) => Self { status: e.status(), value: 0, present: false },
        }
    }
}

// =============================================================================
// Module Definition using v2 API
// =============================================================================

/// Clevo ACPI driver module
pub struct ClevoAcpiModule<F: DsmFirmware + 'static> {
    /// Firmware access provided by the runtime
    firmware: Arc<F>,
    /// Keyboard subsystem the interface is registered with
    subsystem: Arc<dyn KeyboardSubsystem>,
    /// Configuration
    config: ClevoAcpiConfig,
    /// The driver, created by `init`
    driver: Option<Arc<ClevoAcpiDriver<F>>>,
    /// Module state
    state: ModuleState,
}

impl<F: DsmFirmware + 'static> ClevoAcpiModule<F> {
    /// Create a new module instance with default configuration
    pub fn new(firmware: Arc<F>, subsystem: Arc<dyn KeyboardSubsystem>) -> Self {
        Self::with_config(firmware, subsystem, ClevoAcpiConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        firmware: Arc<F>,
        subsystem: Arc<dyn KeyboardSubsystem>,
        config: ClevoAcpiConfig,
    ) -> Self {
        Self {
            firmware,
            subsystem,
            config,
            driver: None,
            state: ModuleState::Registered,
        }
    }

    /// The driver, once initialized
    pub fn driver(&self) -> Option<&Arc<ClevoAcpiDriver<F>>> {
        self.driver.as_ref()
    }

    /// Current module state
    pub fn state(&self) -> ModuleState {
        self.state
    }

    fn method_call_request(&self, payload: &[u8]) -> Result<Response, ModuleError> {
        let driver = self.driver.as_ref().ok_or(ModuleError::WrongState {
            current: self.state,
            required: ModuleState::Running,
        })?;

        let &[opcode, a0, a1, a2, a3] = payload else {
            return Err(ModuleError::InvalidRequest);
        };
        let argument = u32::from_le_bytes([a0, a1, a2, a3]);

        match driver.dispatch(opcode, argument) {
            Ok(value) => Ok(Response::ok(value.to_le_bytes().to_vec())),
            Err(e) => Ok(Response::err(alloc::format!("{}", e))),
        }
    }
}

impl<F: DsmFirmware + 'static> core::fmt::Debug for ClevoAcpiModule<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClevoAcpiModule")
            .field("config", &self.config)
            .field("driver", &self.driver)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Module Trait v2 Implementation
// =============================================================================

impl<F: DsmFirmware + 'static> ModuleTrait for ClevoAcpiModule<F> {
    fn info(&self) -> ModuleInfo {
        ModuleInfo::new(DRIVER_NAME)
            .version(0, 0, 1)
            .description("Driver for Clevo ACPI interface")
            .author("TUXEDO Computers GmbH <tux@tuxedocomputers.com>")
            .license("GPL")
            .flags(ModuleFlags::DRIVER.union(ModuleFlags::POWER_MANAGED))
            .provides(&["clevo.interface"])
    }

    fn init(&mut self, ctx: &Context<'_>) -> Result<(), ModuleError> {
        log::info!("[clevo_acpi] Initializing driver module");

        self.config.apply(ctx);

        self.driver = Some(Arc::new(ClevoAcpiDriver::new(
            self.firmware.clone(),
            self.subsystem.clone(),
            self.config.clone(),
        )));
        self.state = ModuleState::Loaded;

        log::info!(
            "[clevo_acpi] Initialized for {} (_DSM {}, revision {})",
            CLEVO_ACPI_RESOURCE_HID,
            CLEVO_ACPI_DSM_UUID,
            CLEVO_ACPI_DSM_REVISION
        );

        Ok(())
    }

    fn start(&mut self) -> Result<(), ModuleError> {
        if self.driver.is_none() {
            return Err(ModuleError::WrongState {
                current: self.state,
                required: ModuleState::Loaded,
            });
        }

        log::info!("[clevo_acpi] Driver started");
        self.state = ModuleState::Running;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ModuleError> {
        log::info!("[clevo_acpi] Stopping driver");

        if let Some(driver) = &self.driver {
            if let Some(device) = driver.bound_device() {
                driver.remove(&device);
            }
        }

        self.state = ModuleState::Stopped;
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> EventResponse {
        let Some(driver) = &self.driver else {
            return EventResponse::Ignored;
        };

        let result = match event {
            Event::Suspend => driver.suspend(),
            Event::Resume => driver.resume(),
            _ => return EventResponse::Ignored,
        };

        match result {
            Ok(()) => EventResponse::Handled,
            Err(e) => EventResponse::Error(alloc::format!("{}", e)),
        }
    }

    fn handle_request(&mut self, request: &Request) -> Result<Response, ModuleError> {
        match request.request_type.as_str() {
            "method_call" => self.method_call_request(&request.payload),
            "is_bound" => {
                let bound = self.driver.as_ref().is_some_and(|d| d.is_bound());
                Ok(Response::ok(alloc::vec![u8::from(bound)]))
            }
            _ => Ok(Response::err("Unknown request type")),
        }
    }

    fn is_healthy(&self) -> bool {
        self.driver.is_some()
    }
}

// =============================================================================
// Module Entry Point
// =============================================================================

/// Create a new instance of this module
pub fn create_module<F: DsmFirmware + 'static>(
    firmware: Arc<F>,
    subsystem: Arc<dyn KeyboardSubsystem>,
) -> ClevoAcpiModule<F> {
    ClevoAcpiModule::new(firmware, subsystem)
}

/// Create module with custom config
pub fn create_module_with_config<F: DsmFirmware + 'static>(
    firmware: Arc<F>,
    subsystem: Arc<dyn KeyboardSubsystem>,
    config: ClevoAcpiConfig,
) -> ClevoAcpiModule<F> {
    ClevoAcpiModule::with_config(firmware, subsystem, config)
}
