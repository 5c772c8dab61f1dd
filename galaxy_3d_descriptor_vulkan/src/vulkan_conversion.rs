/// Vulkan conversions - raw `vk` structures to descriptor tracker types
///
/// Enum and flag conversions are pure. Structure conversions read the
/// pointer arrays of the Vulkan structures and are `unsafe`.

use ash::vk;
use ash::vk::Handle;
use galaxy_3d_descriptor::galaxy3d::{Error, Result};
use galaxy_3d_descriptor::galaxy3d::descriptor::{
    BufferHandle, BufferViewHandle, CopyDescriptorSet, DescriptorBufferInfo, DescriptorImageInfo,
    DescriptorKind, DescriptorSetHandle, DescriptorSetLayoutBinding, DescriptorSetLayoutDesc,
    DescriptorSetLayoutHandle, DescriptorType, ImageLayout, ImageViewHandle, SamplerHandle,
    ShaderStageFlags, WriteDescriptorElements, WriteDescriptorSet,
};

// ===== Enum and flag conversions =====

/// Convert a Vulkan descriptor type
///
/// # Errors
///
/// Returns `Error::Unsupported` for types the tracker does not model
/// (inline uniform blocks, acceleration structures, ...).
pub fn descriptor_type_from_vk(descriptor_type: vk::DescriptorType) -> Result<DescriptorType> {
    match descriptor_type {
        vk::DescriptorType::SAMPLER => Ok(DescriptorType::Sampler),
        vk::DescriptorType::COMBINED_IMAGE_SAMPLER => Ok(DescriptorType::CombinedImageSampler),
        vk::DescriptorType::SAMPLED_IMAGE => Ok(DescriptorType::SampledImage),
        vk::DescriptorType::STORAGE_IMAGE => Ok(DescriptorType::StorageImage),
        vk::DescriptorType::INPUT_ATTACHMENT => Ok(DescriptorType::InputAttachment),
        vk::DescriptorType::UNIFORM_TEXEL_BUFFER => Ok(DescriptorType::UniformTexelBuffer),
        vk::DescriptorType::STORAGE_TEXEL_BUFFER => Ok(DescriptorType::StorageTexelBuffer),
        vk::DescriptorType::UNIFORM_BUFFER => Ok(DescriptorType::UniformBuffer),
        vk::DescriptorType::STORAGE_BUFFER => Ok(DescriptorType::StorageBuffer),
        vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC => Ok(DescriptorType::UniformBufferDynamic),
        vk::DescriptorType::STORAGE_BUFFER_DYNAMIC => Ok(DescriptorType::StorageBufferDynamic),
        other => Err(Error::Unsupported(format!(
            "Descriptor type {:?} ({}) is not tracked",
            other, other.as_raw()
        ))),
    }
}

pub fn descriptor_type_to_vk(descriptor_type: DescriptorType) -> vk::DescriptorType {
    match descriptor_type {
        DescriptorType::Sampler => vk::DescriptorType::SAMPLER,
        DescriptorType::CombinedImageSampler => vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
        DescriptorType::SampledImage => vk::DescriptorType::SAMPLED_IMAGE,
        DescriptorType::StorageImage => vk::DescriptorType::STORAGE_IMAGE,
        DescriptorType::InputAttachment => vk::DescriptorType::INPUT_ATTACHMENT,
        DescriptorType::UniformTexelBuffer => vk::DescriptorType::UNIFORM_TEXEL_BUFFER,
        DescriptorType::StorageTexelBuffer => vk::DescriptorType::STORAGE_TEXEL_BUFFER,
        DescriptorType::UniformBuffer => vk::DescriptorType::UNIFORM_BUFFER,
        DescriptorType::StorageBuffer => vk::DescriptorType::STORAGE_BUFFER,
        DescriptorType::UniformBufferDynamic => vk::DescriptorType::UNIFORM_BUFFER_DYNAMIC,
        DescriptorType::StorageBufferDynamic => vk::DescriptorType::STORAGE_BUFFER_DYNAMIC,
    }
}

/// Stage bits outside the 31 defined bits are dropped
pub fn stage_flags_from_vk(flags: vk::ShaderStageFlags) -> ShaderStageFlags {
    ShaderStageFlags::from_bits_truncate(flags.as_raw())
}

pub fn stage_flags_to_vk(flags: ShaderStageFlags) -> vk::ShaderStageFlags {
    vk::ShaderStageFlags::from_raw(flags.bits())
}

/// Convert a Vulkan image layout; layouts without a named variant map to `Other`
pub fn image_layout_from_vk(layout: vk::ImageLayout) -> ImageLayout {
    match layout {
        vk::ImageLayout::UNDEFINED => ImageLayout::Undefined,
        vk::ImageLayout::GENERAL => ImageLayout::General,
        vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL => ImageLayout::ColorAttachment,
        vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL => ImageLayout::DepthStencilAttachment,
        vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL => ImageLayout::DepthStencilReadOnly,
        vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL => ImageLayout::ShaderReadOnly,
        vk::ImageLayout::TRANSFER_SRC_OPTIMAL => ImageLayout::TransferSrc,
        vk::ImageLayout::TRANSFER_DST_OPTIMAL => ImageLayout::TransferDst,
        vk::ImageLayout::PREINITIALIZED => ImageLayout::Preinitialized,
        vk::ImageLayout::PRESENT_SRC_KHR => ImageLayout::PresentSrc,
        other => ImageLayout::Other(other.as_raw()),
    }
}

pub fn image_layout_to_vk(layout: ImageLayout) -> vk::ImageLayout {
    match layout {
        ImageLayout::Undefined => vk::ImageLayout::UNDEFINED,
        ImageLayout::General => vk::ImageLayout::GENERAL,
        ImageLayout::ColorAttachment => vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilAttachment => vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
        ImageLayout::DepthStencilReadOnly => vk::ImageLayout::DEPTH_STENCIL_READ_ONLY_OPTIMAL,
        ImageLayout::ShaderReadOnly => vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        ImageLayout::TransferSrc => vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
        ImageLayout::TransferDst => vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        ImageLayout::Preinitialized => vk::ImageLayout::PREINITIALIZED,
        ImageLayout::PresentSrc => vk::ImageLayout::PRESENT_SRC_KHR,
        ImageLayout::Other(raw) => vk::ImageLayout::from_raw(raw),
    }
}

// ===== Handle conversions =====

pub fn layout_handle_from_vk(layout: vk::DescriptorSetLayout) -> DescriptorSetLayoutHandle {
    DescriptorSetLayoutHandle(layout.as_raw())
}

pub fn set_handle_from_vk(set: vk::DescriptorSet) -> DescriptorSetHandle {
    DescriptorSetHandle(set.as_raw())
}

fn image_info_from_vk(info: &vk::DescriptorImageInfo) -> DescriptorImageInfo {
    DescriptorImageInfo {
        sampler: SamplerHandle(info.sampler.as_raw()),
        image_view: ImageViewHandle(info.image_view.as_raw()),
        image_layout: image_layout_from_vk(info.image_layout),
    }
}

fn buffer_info_from_vk(info: &vk::DescriptorBufferInfo) -> DescriptorBufferInfo {
    DescriptorBufferInfo {
        buffer: BufferHandle(info.buffer.as_raw()),
        offset: info.offset,
        range: info.range,
    }
}

/// View `count` elements behind a Vulkan array pointer
///
/// # Safety
///
/// A non-null `ptr` must point to at least `count` initialized elements.
unsafe fn raw_slice<'a, T>(ptr: *const T, count: u32) -> Option<&'a [T]> {
    if count == 0 {
        return Some(&[]);
    }
    if ptr.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(ptr, count as usize))
}

// ===== Structure conversions =====

/// Convert the bindings of a `vkCreateDescriptorSetLayout` call
///
/// Immutable samplers are only read for sampler types. A non-null sampler
/// pointer on any other type is kept as an empty list so that layout
/// construction reports it as ignored.
///
/// # Safety
///
/// Every binding's `p_immutable_samplers`, when non-null and the type is
/// `SAMPLER` or `COMBINED_IMAGE_SAMPLER`, must point to `descriptor_count`
/// samplers.
///
/// # Errors
///
/// Returns `Error::Unsupported` for a binding of an untracked type.
pub unsafe fn layout_desc_from_vk(
    layout: vk::DescriptorSetLayout,
    bindings: &[vk::DescriptorSetLayoutBinding],
) -> Result<DescriptorSetLayoutDesc> {
    let mut converted = Vec::with_capacity(bindings.len());

    for binding in bindings {
        let descriptor_type = descriptor_type_from_vk(binding.descriptor_type)?;

        let immutable_samplers = if binding.p_immutable_samplers.is_null() {
            None
        } else if descriptor_type.supports_immutable_samplers() {
            raw_slice(binding.p_immutable_samplers, binding.descriptor_count)
                .map(|samplers| samplers.iter().map(|s| SamplerHandle(s.as_raw())).collect())
        } else {
            Some(Vec::new())
        };

        converted.push(DescriptorSetLayoutBinding {
            binding: binding.binding,
            descriptor_type,
            descriptor_count: binding.descriptor_count,
            stage_flags: stage_flags_from_vk(binding.stage_flags),
            immutable_samplers,
        });
    }

    Ok(DescriptorSetLayoutDesc {
        handle: layout_handle_from_vk(layout),
        bindings: converted,
    })
}

/// Convert one entry of a `vkUpdateDescriptorSets` write array
///
/// The payload array is chosen from the descriptor type: `p_image_info` for
/// sampler and image types, `p_buffer_info` for buffer types and
/// `p_texel_buffer_view` for texel buffer types.
///
/// # Safety
///
/// The payload pointer matching `descriptor_type`, when non-null, must point
/// to `descriptor_count` elements.
///
/// # Errors
///
/// Returns `Error::Unsupported` for an untracked type and
/// `Error::InvalidPayload` when the matching payload pointer is null.
pub unsafe fn write_from_vk(write: &vk::WriteDescriptorSet) -> Result<WriteDescriptorSet> {
    let descriptor_type = descriptor_type_from_vk(write.descriptor_type)?;
    let count = write.descriptor_count;

    let missing = |array: &str| Error::InvalidPayload(format!(
        "Write update to descriptor set {:#x} binding #{} of type {} has {} descriptors but a null {}",
        write.dst_set.as_raw(), write.dst_binding, descriptor_type, count, array
    ));

    let elements = match descriptor_type.kind() {
        DescriptorKind::Sampler | DescriptorKind::ImageSampler | DescriptorKind::Image => {
            let infos = raw_slice(write.p_image_info, count).ok_or_else(|| missing("pImageInfo"))?;
            WriteDescriptorElements::Image(infos.iter().map(image_info_from_vk).collect())
        }
        DescriptorKind::Buffer => {
            let infos = raw_slice(write.p_buffer_info, count).ok_or_else(|| missing("pBufferInfo"))?;
            WriteDescriptorElements::Buffer(infos.iter().map(buffer_info_from_vk).collect())
        }
        DescriptorKind::TexelBuffer => {
            let views = raw_slice(write.p_texel_buffer_view, count).ok_or_else(|| missing("pTexelBufferView"))?;
            WriteDescriptorElements::TexelBufferView(
                views.iter().map(|view| BufferViewHandle(view.as_raw())).collect(),
            )
        }
    };

    Ok(WriteDescriptorSet {
        dst_set: set_handle_from_vk(write.dst_set),
        dst_binding: write.dst_binding,
        dst_array_element: write.dst_array_element,
        descriptor_type,
        elements,
    })
}

/// Convert one entry of a `vkUpdateDescriptorSets` copy array
pub fn copy_from_vk(copy: &vk::CopyDescriptorSet) -> CopyDescriptorSet {
    CopyDescriptorSet {
        src_set: set_handle_from_vk(copy.src_set),
        src_binding: copy.src_binding,
        src_array_element: copy.src_array_element,
        dst_set: set_handle_from_vk(copy.dst_set),
        dst_binding: copy.dst_binding,
        dst_array_element: copy.dst_array_element,
        descriptor_count: copy.descriptor_count,
    }
}

#[cfg(test)]
#[path = "vulkan_conversion_tests.rs"]
mod tests;
