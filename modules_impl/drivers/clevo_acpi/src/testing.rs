//! Scripted firmware for driver tests.

use clevo_hal::{AcpiHandle, AcpiObject, DsmFirmware, Guid};
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Mutex;

/// What the stub answers to every `_DSM`
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Reply with an integer
    Integer(u64),
    /// Reply with nothing
    Nothing,
    /// Reply with an arbitrary object
    Object(AcpiObject),
}

/// One recorded `_DSM` evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub handle: AcpiHandle,
    pub uuid: Guid,
    pub revision: u64,
    pub function: u64,
    pub argv4: AcpiObject,
}

/// Counting [`DsmFirmware`]
#[derive(Debug)]
pub struct StubFirmware {
    reply: Mutex<StubReply>,
    calls: Mutex<Vec<RecordedCall>>,
    allocations: AtomicUsize,
    releases: AtomicUsize,
}

impl StubFirmware {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply: Mutex::new(reply),
            calls: Mutex::new(Vec::new()),
            allocations: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
        }
    }

    pub fn set_reply(&self, reply: StubReply) {
        *self.reply.lock() = reply;
    }

    pub fn evaluations(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    pub fn calls_on(&self, handle: AcpiHandle) -> usize {
        self.calls.lock().iter().filter(|c| c.handle == handle).count()
    }
}

impl DsmFirmware for StubFirmware {
    fn evaluate_dsm(
        &self,
        handle: AcpiHandle,
        uuid: &Guid,
        revision: u64,
        function: u64,
        argv4: &AcpiObject,
    ) -> Option<AcpiObject> {
        self.calls.lock().push(RecordedCall {
            handle,
            uuid: *uuid,
            revision,
            function,
            argv4: argv4.clone(),
        });

        let object = match &*self.reply.lock() {
            StubReply::Integer(value) => AcpiObject::Integer(*value),
            StubReply::Nothing => return None,
            StubReply::Object(object) => object.clone(),
        };
        self.allocations.fetch_add(1, Ordering::SeqCst);
        Some(object)
    }

    fn release(&self, _object: AcpiObject) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}
