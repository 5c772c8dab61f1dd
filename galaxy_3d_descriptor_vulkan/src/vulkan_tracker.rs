/// Vulkan descriptor tracker - interception hooks over `DescriptorTracker`
///
/// Each hook takes the arguments of the matching Vulkan entry point,
/// converts them and forwards to the core tracker. Conversion failures are
/// logged here; validation failures are logged by the core tracker.

use std::sync::Arc;
use ash::vk;
use galaxy_3d_descriptor::galaxy3d::{DescriptorTracker, Error, Result, TrackerConfig};
use galaxy_3d_descriptor::galaxy3d::descriptor::{DescriptorSet, DescriptorSetLayout};
use galaxy_3d_descriptor::galaxy3d::log::LogObject;
use galaxy_3d_descriptor::{descriptor_bail, descriptor_debug, descriptor_error};
use crate::vulkan_conversion::{
    copy_from_vk, layout_desc_from_vk, layout_handle_from_vk, set_handle_from_vk, write_from_vk,
};

const SOURCE: &str = "galaxy3d::vulkan::DescriptorTracker";

/// Descriptor state of one `VkDevice`
pub struct VulkanDescriptorTracker {
    tracker: DescriptorTracker,
}

impl VulkanDescriptorTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: DescriptorTracker::new(config),
        }
    }

    /// Log a conversion failure concerning `object` before handing it back (internal use)
    fn log_and_return_error(object: LogObject, error: Error) -> Error {
        descriptor_error!(SOURCE, [object, error.code()], "{}", error);
        error
    }

    /// Underlying API-agnostic tracker
    pub fn tracker(&self) -> &DescriptorTracker {
        &self.tracker
    }

    pub fn descriptor_set(&self, set: vk::DescriptorSet) -> Option<&DescriptorSet> {
        self.tracker.descriptor_set(set_handle_from_vk(set))
    }

    /// Hook for a successful `vkCreateDescriptorSetLayout`
    ///
    /// # Safety
    ///
    /// `create_info.p_bindings` must point to `binding_count` valid bindings,
    /// each with a valid immutable sampler array when one is given.
    pub unsafe fn on_create_descriptor_set_layout(
        &mut self,
        create_info: &vk::DescriptorSetLayoutCreateInfo,
        layout: vk::DescriptorSetLayout,
    ) -> Result<Arc<DescriptorSetLayout>> {
        let bindings: &[vk::DescriptorSetLayoutBinding] =
            if create_info.binding_count == 0 || create_info.p_bindings.is_null() {
                &[]
            } else {
                std::slice::from_raw_parts(create_info.p_bindings, create_info.binding_count as usize)
            };

        let desc = layout_desc_from_vk(layout, bindings)
            .map_err(|e| Self::log_and_return_error(LogObject::layout(layout_handle_from_vk(layout)), e))?;
        self.tracker.create_descriptor_set_layout(desc)
    }

    /// Hook for `vkDestroyDescriptorSetLayout`. Returns false for an unknown layout.
    pub fn on_destroy_descriptor_set_layout(&mut self, layout: vk::DescriptorSetLayout) -> bool {
        self.tracker.destroy_descriptor_set_layout(layout_handle_from_vk(layout))
    }

    /// Hook for a successful `vkAllocateDescriptorSets`
    ///
    /// `sets` are the handles the driver returned, one per entry of
    /// `allocate_info.p_set_layouts`. The whole batch is checked before any
    /// set is registered, so a failure leaves the tracker unchanged.
    ///
    /// # Safety
    ///
    /// `allocate_info.p_set_layouts` must point to `descriptor_set_count` layouts.
    pub unsafe fn on_allocate_descriptor_sets(
        &mut self,
        allocate_info: &vk::DescriptorSetAllocateInfo,
        sets: &[vk::DescriptorSet],
    ) -> Result<()> {
        let count = allocate_info.descriptor_set_count as usize;
        if sets.len() != count {
            descriptor_bail!(SOURCE, InvalidPayload,
                "vkAllocateDescriptorSets returned {} sets for {} set layouts", sets.len(), count);
        }
        if count > 0 && allocate_info.p_set_layouts.is_null() {
            descriptor_bail!(SOURCE, InvalidPayload,
                "vkAllocateDescriptorSets has {} sets but a null pSetLayouts", count);
        }
        if count == 0 {
            return Ok(());
        }

        let layouts = std::slice::from_raw_parts(allocate_info.p_set_layouts, count);
        for (i, (&set, &layout)) in sets.iter().zip(layouts).enumerate() {
            let set_handle = set_handle_from_vk(set);
            let layout_handle = layout_handle_from_vk(layout);
            match self.tracker.descriptor_set_layout(layout_handle) {
                None => descriptor_bail!(SOURCE, LogObject::layout(layout_handle) => UnknownHandle,
                    "Cannot allocate descriptor set {}: DescriptorSetLayout {} is not registered",
                    set_handle, layout_handle),
                Some(model) if model.has_count_overflow() => descriptor_bail!(SOURCE, LogObject::layout(layout_handle) => Unsupported,
                    "Cannot allocate descriptor set {}: the descriptor counts of DescriptorSetLayout {} overflow",
                    set_handle, layout_handle),
                Some(_) => {}
            }
            if self.tracker.descriptor_set(set_handle).is_some() || sets[..i].contains(&set) {
                descriptor_bail!(SOURCE, LogObject::set(set_handle) => DuplicateHandle,
                    "Descriptor set {} is already allocated", set_handle);
            }
        }

        for (&set, &layout) in sets.iter().zip(layouts) {
            self.tracker.allocate_descriptor_set(set_handle_from_vk(set), layout_handle_from_vk(layout))?;
        }

        descriptor_debug!(SOURCE, "Allocated {} descriptor sets", count);
        Ok(())
    }

    /// Hook for `vkFreeDescriptorSets`
    ///
    /// Null handles are skipped. Returns the number of sets released.
    pub fn on_free_descriptor_sets(&mut self, sets: &[vk::DescriptorSet]) -> usize {
        let mut freed = 0;
        for &set in sets {
            if set != vk::DescriptorSet::null() && self.tracker.free_descriptor_set(set_handle_from_vk(set)) {
                freed += 1;
            }
        }
        freed
    }

    /// Hook for `vkUpdateDescriptorSets`
    ///
    /// Writes are converted and applied one at a time, then copies, stopping
    /// at the first failure.
    ///
    /// # Safety
    ///
    /// Each write's payload array matching its descriptor type must point to
    /// `descriptor_count` elements.
    pub unsafe fn on_update_descriptor_sets(
        &mut self,
        writes: &[vk::WriteDescriptorSet],
        copies: &[vk::CopyDescriptorSet],
    ) -> Result<()> {
        for write in writes {
            let converted = write_from_vk(write)
                .map_err(|e| Self::log_and_return_error(LogObject::set(set_handle_from_vk(write.dst_set)), e))?;
            self.tracker.update_descriptor_sets(std::slice::from_ref(&converted), &[])?;
        }

        let copies: Vec<_> = copies.iter().map(copy_from_vk).collect();
        self.tracker.update_descriptor_sets(&[], &copies)
    }

    /// Hook for `vkCmdBindDescriptorSets`
    ///
    /// `set_layouts` are the set layouts of the pipeline layout being bound
    /// against; `sets[i]` is checked against `set_layouts[first_set + i]`.
    pub fn on_cmd_bind_descriptor_sets(
        &self,
        set_layouts: &[vk::DescriptorSetLayout],
        first_set: u32,
        sets: &[vk::DescriptorSet],
    ) -> Result<()> {
        for (i, &set) in sets.iter().enumerate() {
            let index = first_set as usize + i;
            let Some(&expected) = set_layouts.get(index) else {
                descriptor_bail!(SOURCE, LogObject::set(set_handle_from_vk(set)) => InvalidPayload,
                    "Binding descriptor set {:#x} at index {} but the pipeline layout only has {} set layouts",
                    vk::Handle::as_raw(set), index, set_layouts.len());
            };
            self.tracker.verify_set_compatibility(set_handle_from_vk(set), layout_handle_from_vk(expected))?;
        }
        Ok(())
    }
}

impl Default for VulkanDescriptorTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
#[path = "vulkan_tracker_tests.rs"]
mod tests;
