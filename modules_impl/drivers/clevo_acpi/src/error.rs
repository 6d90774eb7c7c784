//! Error types for the Clevo ACPI driver

use alloc::collections::TryReserveError;
use clevo_hal::HalError;
use core::fmt;

/// Result type for driver operations
pub type ClevoAcpiResult<T> = Result<T, ClevoAcpiError>;

/// Clevo ACPI driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClevoAcpiError {
    /// The `_DSM` UUID constant is malformed
    ConfigurationError,
    /// The device has no firmware handle
    DeviceNotReady,
    /// The firmware returned no reply
    EvaluationFailed,
    /// The reply was not a single integer
    UnexpectedReplyType,
    /// A method call was issued while no device is bound
    NoActiveBinding,
    /// The bound device record could not be copied
    OutOfMemory,
}

impl ClevoAcpiError {
    /// Negative status code reported to interface callers
    pub fn status(&self) -> i32 {
        match self {
            Self::ConfigurationError => -2,   // ENOENT
            Self::DeviceNotReady => -19,      // ENODEV
            Self::EvaluationFailed => -1,
            Self::UnexpectedReplyType => -61, // ENODATA
            Self::NoActiveBinding => -61,     // ENODATA
            Self::OutOfMemory => -12,         // ENOMEM
        }
    }

    /// Get error name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::DeviceNotReady => "DeviceNotReady",
            Self::EvaluationFailed => "EvaluationFailed",
            Self::UnexpectedReplyType => "UnexpectedReplyType",
            Self::NoActiveBinding => "NoActiveBinding",
            Self::OutOfMemory => "OutOfMemory",
        }
    }
}

impl fmt::Display for ClevoAcpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clevo_acpi: {} ({})", self.name(), self.status())
    }
}

impl From<HalError> for ClevoAcpiError {
    fn from(err: HalError) -> Self {
        match err {
            HalError::InvalidGuid => Self::ConfigurationError,
            HalError::NoHandle => Self::DeviceNotReady,
        }
    }
}

impl From<TryReserveError> for ClevoAcpiError {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ClevoAcpiError::ConfigurationError.status(), -2);
        assert_eq!(ClevoAcpiError::DeviceNotReady.status(), -19);
        assert_eq!(ClevoAcpiError::EvaluationFailed.status(), -1);
        assert_eq!(ClevoAcpiError::UnexpectedReplyType.status(), -61);
        assert_eq!(ClevoAcpiError::NoActiveBinding.status(), -61);
        assert_eq!(ClevoAcpiError::OutOfMemory.status(), -12);
    }

    #[test]
    fn test_hal_conversion() {
        assert_eq!(ClevoAcpiError::from(HalError::InvalidGuid), ClevoAcpiError::ConfigurationError);
        assert_eq!(ClevoAcpiError::from(HalError::NoHandle), ClevoAcpiError::DeviceNotReady);
    }

    #[test]
    fn test_failed_reservation_is_out_of_memory() {
        let err = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        assert_eq!(ClevoAcpiError::from(err.clone()), ClevoAcpiError::OutOfMemory);
        assert_eq!(ClevoAcpiError::from(err).status(), -12);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ClevoAcpiError::NoActiveBinding.to_string(),
            "clevo_acpi: NoActiveBinding (-61)"
        );
    }
}
