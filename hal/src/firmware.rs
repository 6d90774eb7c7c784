//! # Firmware Interface Abstraction
//!
//! The `_DSM` evaluation primitive the runtime provides, and a scoped guard
//! that hands firmware-owned reply objects back on every exit path.

use crate::acpi::{AcpiHandle, AcpiObject};
use crate::guid::Guid;
use core::fmt;

/// Device-specific method evaluation, as provided by the runtime
///
/// Implementations may block for as long as the firmware takes to answer.
pub trait DsmFirmware: Send + Sync {
    /// Evaluate `_DSM(uuid, revision, function, argv4)` on `handle`
    ///
    /// Returns `None` if the method failed or produced no object. A returned
    /// object is owned by the firmware and must be passed to
    /// [`release`](Self::release) once the caller is done with it.
    fn evaluate_dsm(
        &self,
        handle: AcpiHandle,
        uuid: &Guid,
        revision: u64,
        function: u64,
        argv4: &AcpiObject,
    ) -> Option<AcpiObject>;

    /// Return a reply object to the firmware
    fn release(&self, object: AcpiObject);
}

/// Scoped `_DSM` reply
///
/// Holds the reply of one evaluation and releases it to the firmware when
/// dropped, whether the caller decoded it, rejected it, or bailed out early.
pub struct DsmReply<'a, F: DsmFirmware + ?Sized> {
    firmware: &'a F,
    object: Option<AcpiObject>,
}

impl<'a, F: DsmFirmware + ?Sized> DsmReply<'a, F> {
    /// Evaluate a `_DSM` and take ownership of its reply
    pub fn evaluate(
        firmware: &'a F,
        handle: AcpiHandle,
        uuid: &Guid,
        revision: u64,
        function: u64,
        argv4: &AcpiObject,
    ) -> Self {
        let object = firmware.evaluate_dsm(handle, uuid, revision, function, argv4);
        Self { firmware, object }
    }

    /// The reply object, if the firmware produced one
    pub fn object(&self) -> Option<&AcpiObject> {
        self.object.as_ref()
    }
}

impl<F: DsmFirmware + ?Sized> Drop for DsmReply<'_, F> {
    fn drop(&mut self) {
        if let Some(object) = self.object.take() {
            self.firmware.release(object);
        }
    }
}

impl<F: DsmFirmware + ?Sized> fmt::Debug for DsmReply<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsmReply").field("object", &self.object).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    const UUID: Guid = Guid {
        data1: 0x93f2_24e4,
        data2: 0xfbdc,
        data3: 0x4bbf,
        data4: [0xad, 0xd6, 0xdb, 0x71, 0xbd, 0xc0, 0xaf, 0xad],
    };

    struct Echo {
        released: AtomicUsize,
    }

    impl DsmFirmware for Echo {
        fn evaluate_dsm(
            &self,
            _handle: AcpiHandle,
            _uuid: &Guid,
            _revision: u64,
            function: u64,
            _argv4: &AcpiObject,
        ) -> Option<AcpiObject> {
            (function != 0).then_some(AcpiObject::Integer(function))
        }

        fn release(&self, _object: AcpiObject) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_reply_released_on_drop() {
        let fw = Echo { released: AtomicUsize::new(0) };
        {
            let reply = DsmReply::evaluate(&fw, AcpiHandle::new(1), &UUID, 0, 3, &AcpiObject::integer_package(0));
            assert_eq!(reply.object(), Some(&AcpiObject::Integer(3)));
        }
        assert_eq!(fw.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_reply_not_released() {
        let fw = Echo { released: AtomicUsize::new(0) };
        let reply = DsmReply::evaluate(&fw, AcpiHandle::new(1), &UUID, 0, 0, &AcpiObject::integer_package(0));
        assert!(reply.object().is_none());
        drop(reply);
        assert_eq!(fw.released.load(Ordering::SeqCst), 0);
    }
}
