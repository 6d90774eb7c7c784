//! # Driver Lifecycle
//!
//! [`ClevoAcpiDriver`] binds the interface descriptor to one discovered
//! firmware device, dispatches method calls to the bound device and forwards
//! firmware notifications to the installed subscriber.
//!
//! ## States
//!
//! - **Unbound**: no binding; method calls fail with
//!   [`ClevoAcpiError::NoActiveBinding`] without touching firmware
//! - **Bound**: method calls evaluate `_DSM` on the bound device
//!
//! Only one binding exists. An `add` while bound replaces the previous
//! binding (last bind wins); the previous device is not unbound.

use crate::config::ClevoAcpiConfig;
use crate::descriptor::InterfaceDescriptor;
use crate::error::{ClevoAcpiError, ClevoAcpiResult};
use crate::evaluate::evaluate;
use crate::{AcpiDriverFlags, AcpiDriverInfo, FirmwareCommand, FirmwareResult};
use crate::{CLEVO_ACPI_DEVICE_IDS, DRIVER_NAME};
use alloc::sync::Arc;
use clevo_hal::{AcpiDevice, DsmFirmware};
use clevo_modules::{
    ClevoInterface, EventCallback, InterfaceError, InterfaceResult, KeyboardSubsystem,
};
use core::fmt;
use spin::RwLock;

/// The active device binding
#[derive(Debug)]
pub struct DriverBinding {
    /// The bound device, as recorded at `add`
    pub device: AcpiDevice,
    /// The descriptor registered for this binding
    pub descriptor: Arc<InterfaceDescriptor>,
}

/// Clevo ACPI driver
pub struct ClevoAcpiDriver<F: DsmFirmware> {
    firmware: Arc<F>,
    subsystem: Arc<dyn KeyboardSubsystem>,
    config: ClevoAcpiConfig,
    descriptor: Arc<InterfaceDescriptor>,
    binding: RwLock<Option<Arc<DriverBinding>>>,
}

static_assertions::assert_impl_all!(InterfaceDescriptor: Send, Sync);
static_assertions::assert_impl_all!(DriverBinding: Send, Sync);

impl<F: DsmFirmware + 'static> ClevoAcpiDriver<F> {
    /// Create an unbound driver
    pub fn new(
        firmware: Arc<F>,
        subsystem: Arc<dyn KeyboardSubsystem>,
        config: ClevoAcpiConfig,
    ) -> Self {
        Self {
            firmware,
            subsystem,
            config,
            descriptor: Arc::new(InterfaceDescriptor::new(DRIVER_NAME)),
            binding: RwLock::new(None),
        }
    }

    /// Registration record for the device-management runtime
    pub fn driver_info(&self) -> AcpiDriverInfo {
        AcpiDriverInfo {
            name: DRIVER_NAME,
            class: DRIVER_NAME,
            ids: CLEVO_ACPI_DEVICE_IDS,
            flags: AcpiDriverFlags::ALL_NOTIFY_EVENTS,
        }
    }

    /// Does this driver handle `device`?
    pub fn matches(&self, device: &AcpiDevice) -> bool {
        CLEVO_ACPI_DEVICE_IDS.iter().any(|id| id.matches(device))
    }

    /// The interface descriptor
    pub fn descriptor(&self) -> &Arc<InterfaceDescriptor> {
        &self.descriptor
    }

    /// Active configuration
    pub fn config(&self) -> &ClevoAcpiConfig {
        &self.config
    }

    /// Is a device bound?
    pub fn is_bound(&self) -> bool {
        self.binding.read().is_some()
    }

    /// The currently bound device
    pub fn bound_device(&self) -> Option<AcpiDevice> {
        self.binding.read().as_ref().map(|b| b.device.clone())
    }

    /// Bind to `device` and register the interface with the keyboard subsystem
    ///
    /// Keyboard subsystem failures are logged; they do not undo the binding.
    /// Only the copy of the device record is fallible and reports
    /// [`ClevoAcpiError::OutOfMemory`]; the binding allocation itself aborts
    /// on exhaustion like any other `Arc`.
    ///
    /// The subsystem keeps an `Arc` of this driver while the driver keeps one
    /// of the subsystem. Call [`remove`](Self::remove) (the module does so in
    /// `stop`) before dropping both, or the pair is leaked.
    pub fn add(self: &Arc<Self>, device: &AcpiDevice) -> ClevoAcpiResult<()> {
        let recorded = device.try_clone()?;
        let binding = Arc::new(DriverBinding {
            device: recorded,
            descriptor: self.descriptor.clone(),
        });

        if let Some(previous) = self.binding.write().replace(binding) {
            log::warn!(
                "[clevo_acpi] device {} replaces bound device {}",
                device.id,
                previous.device.id
            );
        }

        log::debug!("[clevo_acpi] acpi add (device {})", device.id);

        if self.config.init_keyboard {
            if let Err(e) = self.subsystem.init() {
                log::warn!("[clevo_acpi] keyboard init failed: {}", e);
            }
        }

        let interface: Arc<dyn ClevoInterface> = self.clone();
        if let Err(e) = self.subsystem.add_interface(interface) {
            log::warn!("[clevo_acpi] failed to add interface: {}", e);
        }

        Ok(())
    }

    /// Unregister the interface and drop the binding
    ///
    /// Always completes. `device` is not compared against the bound device.
    pub fn remove(&self, device: &AcpiDevice) {
        log::debug!("[clevo_acpi] acpi remove (device {})", device.id);

        if let Err(e) = self.subsystem.remove_interface(self) {
            log::debug!("[clevo_acpi] remove interface: {}", e);
        }

        self.binding.write().take();
    }

    /// Evaluate vendor command `cmd` with argument `arg` on the bound device
    pub fn dispatch(&self, cmd: u8, arg: u32) -> ClevoAcpiResult<u32> {
        // The lock is not held across the firmware call.
        let binding = self.binding.read().clone();

        let result = match binding {
            Some(binding) => evaluate(self.firmware.as_ref(), &binding.device, cmd, arg),
            None => {
                log::error!("[clevo_acpi] acpi method call exec, no driver data found");
                log::error!("[clevo_acpi] ..for method_call: {:#04x} arg: {:#010x}", cmd, arg);
                Err(ClevoAcpiError::NoActiveBinding)
            }
        };

        log::debug!(
            "[clevo_acpi] method_call: {:#04x} arg: {:#010x} result: {:#010x}",
            cmd,
            arg,
            result.unwrap_or(0)
        );

        result
    }

    /// [`dispatch`](Self::dispatch), flattened to a [`FirmwareResult`]
    pub fn execute(&self, command: FirmwareCommand) -> FirmwareResult {
        self.dispatch(command.opcode, command.argument).into()
    }

    /// Forward a firmware event to the installed subscriber
    ///
    /// Events with no subscriber are dropped.
    pub fn notify(&self, device: &AcpiDevice, event: u32) {
        log::debug!("[clevo_acpi] event: {:#010x} (device {})", event, device.id);

        match self.descriptor.callback() {
            Some(callback) => callback(event),
            None => log::debug!("[clevo_acpi] no subscriber, event {:#010x} dropped", event),
        }
    }

    /// Power-management suspend hook
    pub fn suspend(&self) -> ClevoAcpiResult<()> {
        log::debug!("[clevo_acpi] driver suspend");
        Ok(())
    }

    /// Power-management resume hook
    pub fn resume(&self) -> ClevoAcpiResult<()> {
        log::debug!("[clevo_acpi] driver resume");
        Ok(())
    }
}

impl<F: DsmFirmware + 'static> ClevoInterface for ClevoAcpiDriver<F> {
    fn string_id(&self) -> &'static str {
        self.descriptor.string_id()
    }

    fn method_call(&self, cmd: u8, arg: u32) -> InterfaceResult<u32> {
        self.dispatch(cmd, arg).map_err(|e| InterfaceError::Driver(e.status()))
    }

    fn subscribe(&self, callback: EventCallback) -> Option<EventCallback> {
        self.descriptor.subscribe(callback)
    }

    fn unsubscribe(&self) -> Option<EventCallback> {
        self.descriptor.unsubscribe()
    }
}

impl<F: DsmFirmware> fmt::Debug for ClevoAcpiDriver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClevoAcpiDriver")
            .field("config", &self.config)
            .field("descriptor", &self.descriptor)
            .field("binding", &*self.binding.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubFirmware, StubReply};
    use clevo_hal::AcpiHandle;
    use clevo_modules::InterfaceRegistry;

    fn driver() -> Arc<ClevoAcpiDriver<StubFirmware>> {
        Arc::new(ClevoAcpiDriver::new(
            Arc::new(StubFirmware::new(StubReply::Integer(1))),
            Arc::new(InterfaceRegistry::new()),
            ClevoAcpiConfig::new(),
        ))
    }

    #[test]
    fn test_matches_hid() {
        let drv = driver();
        assert!(drv.matches(&AcpiDevice::new(1, "CLV0001", AcpiHandle::new(1))));
        assert!(!drv.matches(&AcpiDevice::new(2, "PNP0C09", AcpiHandle::new(2))));
    }

    #[test]
    fn test_driver_info() {
        let info = driver().driver_info();
        assert_eq!(info.name, "clevo_acpi");
        assert_eq!(info.class, "clevo_acpi");
        assert_eq!(info.ids.len(), 1);
        assert_eq!(info.ids[0].as_str(), "CLV0001");
        assert!(info.flags.contains(AcpiDriverFlags::ALL_NOTIFY_EVENTS));
    }

    #[test]
    fn test_pm_hooks_are_noops() {
        let drv = driver();
        assert_eq!(drv.suspend(), Ok(()));
        assert_eq!(drv.resume(), Ok(()));
        assert!(!drv.is_bound());
    }

    #[test]
    fn test_add_records_device() {
        let drv = driver();
        let dev = AcpiDevice::new(4, "CLV0001", AcpiHandle::new(0x40));
        drv.add(&dev).unwrap();
        assert_eq!(drv.bound_device(), Some(dev));
    }
}
