//! # Clevo ACPI Driver Configuration
//!
//! The `_DSM` UUID and revision are part of the firmware contract and are not
//! configurable.

use clevo_modules::v2::Context;

/// Configuration for the Clevo ACPI driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClevoAcpiConfig {
    /// Initialize the keyboard subsystem when a device is bound
    pub init_keyboard: bool,
}

impl ClevoAcpiConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self { init_keyboard: true }
    }

    /// Configuration for hosts where the keyboard subsystem is brought up
    /// by someone else
    pub fn without_keyboard_init() -> Self {
        Self { init_keyboard: false }
    }

    /// Override fields from module configuration
    ///
    /// Key: `init_keyboard`. Values that do not parse are ignored.
    pub fn apply(&mut self, ctx: &Context<'_>) {
        if ctx.config("init_keyboard").is_some() {
            match ctx.config_bool("init_keyboard") {
                Some(init) => self.init_keyboard = init,
                None => log::warn!("[clevo_acpi] ignoring malformed init_keyboard"),
            }
        }
    }
}

impl Default for ClevoAcpiConfig {
    fn default() -> Self {
        Self::new()
    }
}
