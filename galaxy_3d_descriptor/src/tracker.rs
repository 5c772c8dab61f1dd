/// Descriptor tracker - handle-keyed state for layouts and sets
///
/// The tracker is what an interception layer talks to: it maps external
/// layout and set handles to their models, forwards layout warnings and
/// update failures to the diagnostic sink, and returns failures to the caller.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::config::TrackerConfig;
use crate::descriptor::{
    CopyDescriptorSet, DescriptorSet, DescriptorSetHandle, DescriptorSetLayout,
    DescriptorSetLayoutDesc, DescriptorSetLayoutHandle, WriteDescriptorSet,
};
use crate::error::{Error, Result};
use crate::log::{LogObject, MessageCode};
use crate::{descriptor_bail, descriptor_debug, descriptor_error, descriptor_trace};

const SOURCE: &str = "galaxy3d::DescriptorTracker";

/// Registry of live descriptor set layouts and descriptor sets
///
/// Sets share ownership of their layout, so destroying a layout handle
/// while sets built from it are alive is safe: those sets keep working.
pub struct DescriptorTracker {
    config: TrackerConfig,
    layouts: FxHashMap<DescriptorSetLayoutHandle, Arc<DescriptorSetLayout>>,
    sets: FxHashMap<DescriptorSetHandle, DescriptorSet>,
}

impl DescriptorTracker {
    /// Create an empty tracker
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            layouts: FxHashMap::default(),
            sets: FxHashMap::default(),
        }
    }

    /// Log a failure concerning `object` before handing it back (internal use)
    fn log_and_return_error(object: LogObject, error: Error) -> Error {
        descriptor_error!(SOURCE, [object, error.code()], "{}", error);
        error
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ===== LAYOUTS =====

    /// Build and register a layout
    ///
    /// Non-fatal construction issues (duplicate binding numbers, malformed
    /// immutable sampler lists) are logged and the layout is still created.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateHandle` if the handle is already registered.
    pub fn create_descriptor_set_layout(
        &mut self,
        desc: DescriptorSetLayoutDesc,
    ) -> Result<Arc<DescriptorSetLayout>> {
        let object = LogObject::layout(desc.handle);
        if self.layouts.contains_key(&desc.handle) {
            descriptor_bail!(SOURCE, object => DuplicateHandle,
                "DescriptorSetLayout {} is already registered", desc.handle);
        }

        let built = DescriptorSetLayout::from_desc(desc);
        for warning in &built.warnings {
            descriptor_error!(SOURCE, [object, MessageCode::InvalidLayout], "{}", warning);
        }

        let layout = Arc::new(built.layout);
        descriptor_debug!(SOURCE,
            "Created DescriptorSetLayout {} ({} bindings, {} descriptors, {} dynamic)",
            layout.handle(), layout.binding_count(),
            layout.total_descriptor_count(), layout.dynamic_descriptor_count());

        self.layouts.insert(layout.handle(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Unregister a layout. Returns false if the handle is unknown.
    pub fn destroy_descriptor_set_layout(&mut self, handle: DescriptorSetLayoutHandle) -> bool {
        self.layouts.remove(&handle).is_some()
    }

    pub fn descriptor_set_layout(&self, handle: DescriptorSetLayoutHandle) -> Option<&Arc<DescriptorSetLayout>> {
        self.layouts.get(&handle)
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    // ===== SETS =====

    /// Allocate the slots of a set from a registered layout
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownHandle` for an unregistered layout,
    /// `Error::DuplicateHandle` if the set handle is already live and
    /// `Error::Unsupported` if the layout's descriptor counts overflowed.
    pub fn allocate_descriptor_set(
        &mut self,
        set: DescriptorSetHandle,
        layout: DescriptorSetLayoutHandle,
    ) -> Result<()> {
        let Some(layout_model) = self.layouts.get(&layout) else {
            descriptor_bail!(SOURCE, LogObject::layout(layout) => UnknownHandle,
                "Cannot allocate descriptor set {}: DescriptorSetLayout {} is not registered", set, layout);
        };
        if self.sets.contains_key(&set) {
            descriptor_bail!(SOURCE, LogObject::set(set) => DuplicateHandle,
                "Descriptor set {} is already allocated", set);
        }

        let descriptor_set = DescriptorSet::new(set, Arc::clone(layout_model))
            .map_err(|e| Self::log_and_return_error(LogObject::set(set), e))?;
        self.sets.insert(set, descriptor_set);
        Ok(())
    }

    /// Release a set. Returns false if the handle is unknown.
    pub fn free_descriptor_set(&mut self, set: DescriptorSetHandle) -> bool {
        self.sets.remove(&set).is_some()
    }

    pub fn descriptor_set(&self, set: DescriptorSetHandle) -> Option<&DescriptorSet> {
        self.sets.get(&set)
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    // ===== UPDATES =====

    /// Apply a batch of writes, then copies, in order
    ///
    /// Stops at the first failing update; updates before it stay applied and
    /// the failing update mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns (and logs) the first validation failure.
    pub fn update_descriptor_sets(
        &mut self,
        writes: &[WriteDescriptorSet],
        copies: &[CopyDescriptorSet],
    ) -> Result<()> {
        for write in writes {
            self.apply_write(write)
                .map_err(|e| Self::log_and_return_error(LogObject::set(write.dst_set), e))?;
        }
        for copy in copies {
            self.apply_copy(copy)
                .map_err(|e| Self::log_and_return_error(LogObject::set(copy.dst_set), e))?;
        }
        Ok(())
    }

    fn apply_write(&mut self, write: &WriteDescriptorSet) -> Result<()> {
        let set = self.sets.get_mut(&write.dst_set)
            .ok_or_else(|| unknown_set(write.dst_set))?;
        set.write_update(write)?;

        if self.config.trace_updates {
            descriptor_trace!(SOURCE,
                "Wrote {} {} descriptors to set {} binding #{} at array element {}",
                write.descriptor_count(), write.descriptor_type,
                write.dst_set, write.dst_binding, write.dst_array_element);
        }
        Ok(())
    }

    fn apply_copy(&mut self, copy: &CopyDescriptorSet) -> Result<()> {
        if copy.src_set == copy.dst_set {
            let set = self.sets.get_mut(&copy.dst_set)
                .ok_or_else(|| unknown_set(copy.dst_set))?;
            set.copy_update_within(copy)?;
        } else {
            if !self.sets.contains_key(&copy.src_set) {
                return Err(unknown_set(copy.src_set));
            }
            let mut dst = self.sets.remove(&copy.dst_set)
                .ok_or_else(|| unknown_set(copy.dst_set))?;
            let result = match self.sets.get(&copy.src_set) {
                Some(src) => dst.copy_update(copy, src),
                None => Err(unknown_set(copy.src_set)),
            };
            self.sets.insert(copy.dst_set, dst);
            result?;
        }

        if self.config.trace_updates {
            descriptor_trace!(SOURCE,
                "Copied {} descriptors from set {} binding #{} to set {} binding #{}",
                copy.descriptor_count, copy.src_set, copy.src_binding,
                copy.dst_set, copy.dst_binding);
        }
        Ok(())
    }

    // ===== COMPATIBILITY =====

    /// Check that a set can be bound where `expected_layout` is declared
    ///
    /// # Errors
    ///
    /// Returns (and logs) `Error::UnknownHandle` or `Error::IncompatibleLayouts`.
    pub fn verify_set_compatibility(
        &self,
        set: DescriptorSetHandle,
        expected_layout: DescriptorSetLayoutHandle,
    ) -> Result<()> {
        let object = LogObject::set(set);
        let descriptor_set = self.sets.get(&set)
            .ok_or_else(|| Self::log_and_return_error(object, unknown_set(set)))?;
        let Some(expected) = self.layouts.get(&expected_layout) else {
            descriptor_bail!(SOURCE, LogObject::layout(expected_layout) => UnknownHandle,
                "DescriptorSetLayout {} is not registered", expected_layout);
        };

        expected
            .is_compatible_with(descriptor_set.layout(), self.config.compatibility_check)
            .map_err(|e| Self::log_and_return_error(object, e))
    }
}

impl Default for DescriptorTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

fn unknown_set(set: DescriptorSetHandle) -> Error {
    Error::UnknownHandle(format!("Descriptor set {} is not allocated", set))
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
