use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF32;

use crate::core::document::connection::NodeId;
use crate::core::document::document::Document;
use crate::core::document::processor::ProcessorId;
use crate::core::engine::host::ParameterDescriptor;

/// Host-facing side of one parameter. The host (or a GUI attachment)
/// writes the atomic value and raises the needs-update flag; the
/// coordinator's flush timer copies flagged values into the document.
pub struct WrapperParameter {
    descriptor: ParameterDescriptor,
    value: AtomicF32,
    needs_update: AtomicBool,
}

impl WrapperParameter {
    fn new(descriptor: ParameterDescriptor) -> WrapperParameter {
        let value = descriptor.default_value;
        WrapperParameter {
            descriptor,
            value: AtomicF32::new(value),
            // flush everything into the document once after creation
            needs_update: AtomicBool::new(true),
        }
    }

    pub fn descriptor(&self) -> &ParameterDescriptor {
        &self.descriptor
    }

    pub fn value(&self) -> f32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Host-side write: stores the value and schedules a flush.
    pub fn set_value(&self, value: f32) {
        let clamped = value.clamp(self.descriptor.min_value, self.descriptor.max_value);
        self.value.store(clamped, Ordering::Relaxed);
        self.needs_update.store(true, Ordering::Release);
    }

    /// Document-side write: stores the value without scheduling a flush.
    pub(crate) fn set_value_quiet(&self, value: f32) {
        self.value.store(value, Ordering::Relaxed);
        self.needs_update.store(false, Ordering::Release);
    }

    fn take_needs_update(&self) -> bool {
        self.needs_update.swap(false, Ordering::AcqRel)
    }
}

/// Binds a document processor to its live plugin instance: mirrors the
/// instance's parameters and flushes changed values into the document on
/// the coordinator's timer.
pub struct ProcessorWrapper {
    processor_id: ProcessorId,
    node_id: NodeId,
    parameters: Vec<Arc<WrapperParameter>>,
}

impl ProcessorWrapper {
    pub(crate) fn new(
        processor_id: ProcessorId,
        node_id: NodeId,
        parameter_descriptors: Vec<ParameterDescriptor>,
        initial_values: &[f32],
    ) -> ProcessorWrapper {
        let parameters: Vec<Arc<WrapperParameter>> = parameter_descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let parameter = WrapperParameter::new(descriptor);
                if let Some(&value) = initial_values.get(index) {
                    parameter.value.store(value, Ordering::Relaxed);
                }
                Arc::new(parameter)
            })
            .collect();
        ProcessorWrapper {
            processor_id,
            node_id,
            parameters,
        }
    }

    pub fn processor_id(&self) -> ProcessorId {
        self.processor_id
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn parameters(&self) -> &[Arc<WrapperParameter>] {
        &self.parameters
    }

    pub fn parameter(&self, index: usize) -> Option<&Arc<WrapperParameter>> {
        self.parameters.get(index)
    }

    /// Copy every flagged parameter value into the document. Returns true
    /// if anything was written.
    pub(crate) fn flush_parameter_values(&self, document: &mut Document) -> bool {
        let mut anything_updated = false;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if parameter.take_needs_update() {
                document.set_parameter_value(self.processor_id, index, parameter.value());
                anything_updated = true;
            }
        }
        anything_updated
    }
}
