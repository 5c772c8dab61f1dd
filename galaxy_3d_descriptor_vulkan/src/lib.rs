/*!
# Galaxy 3D Descriptor - Vulkan Adapter

Vulkan front-end for the galaxy_3d_descriptor tracker.

This crate converts raw Ash `vk` structures (layout bindings, descriptor
writes and copies) into the tracker's API-agnostic types and exposes one hook
per intercepted Vulkan entry point through `VulkanDescriptorTracker`.
*/

mod vulkan_conversion;
mod vulkan_tracker;

pub use vulkan_conversion::{
    copy_from_vk, descriptor_type_from_vk, descriptor_type_to_vk, image_layout_from_vk,
    image_layout_to_vk, layout_desc_from_vk, layout_handle_from_vk, set_handle_from_vk,
    stage_flags_from_vk, stage_flags_to_vk, write_from_vk,
};
pub use vulkan_tracker::VulkanDescriptorTracker;
