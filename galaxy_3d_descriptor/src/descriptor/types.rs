/// Descriptor vocabulary shared by layouts, sets and updates
///
/// All GPU objects are opaque 64-bit handles: the tracker only checks the
/// shape of bindings and updates, never the objects behind them.

use bitflags::bitflags;
use std::fmt;

// ============================================================================
// Handles
// ============================================================================

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// The null handle
            pub const NULL: Self = Self(0);

            /// Whether this is the null handle
            pub fn is_null(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

define_handle!(
    /// Sampler object
    SamplerHandle
);
define_handle!(
    /// Image view object
    ImageViewHandle
);
define_handle!(
    /// Buffer object
    BufferHandle
);
define_handle!(
    /// Texel buffer view object
    BufferViewHandle
);
define_handle!(
    /// Descriptor set layout object
    DescriptorSetLayoutHandle
);
define_handle!(
    /// Descriptor set object
    DescriptorSetHandle
);

// ============================================================================
// Descriptor types
// ============================================================================

/// Type of resource declared by a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    Sampler,
    CombinedImageSampler,
    SampledImage,
    StorageImage,
    InputAttachment,
    UniformTexelBuffer,
    StorageTexelBuffer,
    UniformBuffer,
    StorageBuffer,
    UniformBufferDynamic,
    StorageBufferDynamic,
}

/// Which descriptor variant backs a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Sampler,
    ImageSampler,
    Image,
    Buffer,
    TexelBuffer,
}

impl DescriptorType {
    /// Descriptor variant used for slots of this type
    pub fn kind(&self) -> DescriptorKind {
        match self {
            DescriptorType::Sampler => DescriptorKind::Sampler,
            DescriptorType::CombinedImageSampler => DescriptorKind::ImageSampler,
            DescriptorType::SampledImage
            | DescriptorType::StorageImage
            | DescriptorType::InputAttachment => DescriptorKind::Image,
            DescriptorType::UniformTexelBuffer
            | DescriptorType::StorageTexelBuffer => DescriptorKind::TexelBuffer,
            DescriptorType::UniformBuffer
            | DescriptorType::StorageBuffer
            | DescriptorType::UniformBufferDynamic
            | DescriptorType::StorageBufferDynamic => DescriptorKind::Buffer,
        }
    }

    /// Dynamic buffers take their offset at bind time
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            DescriptorType::UniformBufferDynamic | DescriptorType::StorageBufferDynamic
        )
    }

    /// Only sampler-bearing types may carry immutable samplers
    pub fn supports_immutable_samplers(&self) -> bool {
        matches!(self, DescriptorType::Sampler | DescriptorType::CombinedImageSampler)
    }

    /// Shader-writable types
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DescriptorType::StorageImage
                | DescriptorType::StorageTexelBuffer
                | DescriptorType::StorageBuffer
                | DescriptorType::StorageBufferDynamic
        )
    }

    /// Name used in validation messages
    pub fn name(&self) -> &'static str {
        match self {
            DescriptorType::Sampler => "VK_DESCRIPTOR_TYPE_SAMPLER",
            DescriptorType::CombinedImageSampler => "VK_DESCRIPTOR_TYPE_COMBINED_IMAGE_SAMPLER",
            DescriptorType::SampledImage => "VK_DESCRIPTOR_TYPE_SAMPLED_IMAGE",
            DescriptorType::StorageImage => "VK_DESCRIPTOR_TYPE_STORAGE_IMAGE",
            DescriptorType::InputAttachment => "VK_DESCRIPTOR_TYPE_INPUT_ATTACHMENT",
            DescriptorType::UniformTexelBuffer => "VK_DESCRIPTOR_TYPE_UNIFORM_TEXEL_BUFFER",
            DescriptorType::StorageTexelBuffer => "VK_DESCRIPTOR_TYPE_STORAGE_TEXEL_BUFFER",
            DescriptorType::UniformBuffer => "VK_DESCRIPTOR_TYPE_UNIFORM_BUFFER",
            DescriptorType::StorageBuffer => "VK_DESCRIPTOR_TYPE_STORAGE_BUFFER",
            DescriptorType::UniformBufferDynamic => "VK_DESCRIPTOR_TYPE_UNIFORM_BUFFER_DYNAMIC",
            DescriptorType::StorageBufferDynamic => "VK_DESCRIPTOR_TYPE_STORAGE_BUFFER_DYNAMIC",
        }
    }
}

impl fmt::Display for DescriptorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Shader stages
// ============================================================================

bitflags! {
    /// Shader stages a binding is visible to (Vulkan bit values)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 0x01;
        const TESSELLATION_CONTROL = 0x02;
        const TESSELLATION_EVALUATION = 0x04;
        const GEOMETRY = 0x08;
        const FRAGMENT = 0x10;
        const COMPUTE = 0x20;
        const ALL_GRAPHICS = 0x1F;
        const ALL = 0x7FFF_FFFF;
    }
}

// ============================================================================
// Image layouts
// ============================================================================

/// Layout an image view is expected to be in when accessed
///
/// Layouts the tracker has no name for are carried verbatim in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageLayout {
    #[default]
    Undefined,
    General,
    ColorAttachment,
    DepthStencilAttachment,
    DepthStencilReadOnly,
    ShaderReadOnly,
    TransferSrc,
    TransferDst,
    Preinitialized,
    PresentSrc,
    Other(i32),
}

// ============================================================================
// Update payloads
// ============================================================================

/// Payload entry for sampler and image descriptor types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptorImageInfo {
    pub sampler: SamplerHandle,
    pub image_view: ImageViewHandle,
    pub image_layout: ImageLayout,
}

/// Payload entry for buffer descriptor types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DescriptorBufferInfo {
    pub buffer: BufferHandle,
    pub offset: u64,
    pub range: u64,
}

/// Per-element payload of a write update
///
/// The variant must match the update's declared type: image infos for
/// sampler and image types, buffer infos for buffer types, views for texel
/// buffer types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteDescriptorElements {
    Image(Vec<DescriptorImageInfo>),
    Buffer(Vec<DescriptorBufferInfo>),
    TexelBufferView(Vec<BufferViewHandle>),
}

impl WriteDescriptorElements {
    /// Number of descriptors written
    pub fn len(&self) -> u32 {
        match self {
            WriteDescriptorElements::Image(infos) => infos.len() as u32,
            WriteDescriptorElements::Buffer(infos) => infos.len() as u32,
            WriteDescriptorElements::TexelBufferView(views) => views.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this payload can feed slots of the given type
    pub fn matches(&self, descriptor_type: DescriptorType) -> bool {
        match (self, descriptor_type.kind()) {
            (
                WriteDescriptorElements::Image(_),
                DescriptorKind::Sampler | DescriptorKind::ImageSampler | DescriptorKind::Image,
            ) => true,
            (WriteDescriptorElements::Buffer(_), DescriptorKind::Buffer) => true,
            (WriteDescriptorElements::TexelBufferView(_), DescriptorKind::TexelBuffer) => true,
            _ => false,
        }
    }

    fn payload_name(&self) -> &'static str {
        match self {
            WriteDescriptorElements::Image(_) => "image infos",
            WriteDescriptorElements::Buffer(_) => "buffer infos",
            WriteDescriptorElements::TexelBufferView(_) => "texel buffer views",
        }
    }
}

impl fmt::Display for WriteDescriptorElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.len(), self.payload_name())
    }
}

/// Direct write into consecutive slots of a descriptor set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteDescriptorSet {
    pub dst_set: DescriptorSetHandle,
    pub dst_binding: u32,
    pub dst_array_element: u32,
    pub descriptor_type: DescriptorType,
    pub elements: WriteDescriptorElements,
}

impl WriteDescriptorSet {
    /// Number of descriptors written (one per payload entry)
    pub fn descriptor_count(&self) -> u32 {
        self.elements.len()
    }
}

/// Copy of consecutive slots from one set (possibly the same) into another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyDescriptorSet {
    pub src_set: DescriptorSetHandle,
    pub src_binding: u32,
    pub src_array_element: u32,
    pub dst_set: DescriptorSetHandle,
    pub dst_binding: u32,
    pub dst_array_element: u32,
    pub descriptor_count: u32,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
