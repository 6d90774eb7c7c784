//! # `_DSM` Call Translation
//!
//! Turns a `(command, argument)` pair into a vendor `_DSM` evaluation and
//! decodes the single-integer reply.
//!
//! Wire contract: UUID [`CLEVO_ACPI_DSM_UUID`], revision
//! [`CLEVO_ACPI_DSM_REVISION`], function index = command, Arg3 = a
//! one-element package holding the argument as an integer. The firmware
//! answers with an integer or nothing.

use crate::error::{ClevoAcpiError, ClevoAcpiResult};
use crate::{CLEVO_ACPI_DSM_REVISION, CLEVO_ACPI_DSM_UUID};
use clevo_hal::{AcpiDevice, AcpiObject, DsmFirmware, DsmReply, Guid};

/// Evaluate vendor command `cmd` with argument `arg` on `device`
///
/// The reply object is always handed back to the firmware before this
/// returns.
pub fn evaluate<F: DsmFirmware + ?Sized>(
    firmware: &F,
    device: &AcpiDevice,
    cmd: u8,
    arg: u32,
) -> ClevoAcpiResult<u32> {
    evaluate_scoped(firmware, device, CLEVO_ACPI_DSM_UUID, cmd, arg)
}

fn evaluate_scoped<F: DsmFirmware + ?Sized>(
    firmware: &F,
    device: &AcpiDevice,
    uuid: &str,
    cmd: u8,
    arg: u32,
) -> ClevoAcpiResult<u32> {
    let uuid = Guid::parse(uuid).map_err(|e| {
        log::error!("[clevo_acpi] malformed _DSM uuid {:?}", uuid);
        ClevoAcpiError::from(e)
    })?;

    let handle = device.handle().map_err(|e| {
        log::error!("[clevo_acpi] device {} has no firmware handle", device.id);
        ClevoAcpiError::from(e)
    })?;

    let argv4 = AcpiObject::integer_package(u64::from(arg));

    log::debug!("[clevo_acpi] evaluate _DSM cmd: {:#04x} arg: {:#010x}", cmd, arg);
    let reply = DsmReply::evaluate(
        firmware,
        handle,
        &uuid,
        CLEVO_ACPI_DSM_REVISION,
        u64::from(cmd),
        &argv4,
    );

    match reply.object() {
        None => {
            log::error!("[clevo_acpi] failed to evaluate _DSM");
            Err(ClevoAcpiError::EvaluationFailed)
        }
        // Truncation to 32 bits is part of the contract.
        Some(AcpiObject::Integer(value)) => Ok(*value as u32),
        Some(other) => {
            log::error!("[clevo_acpi] unknown output from _DSM: {}", other.type_name());
            Err(ClevoAcpiError::UnexpectedReplyType)
        }
    }
}
