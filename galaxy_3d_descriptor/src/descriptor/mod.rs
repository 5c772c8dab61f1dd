//! Descriptor module
//!
//! Layout model, descriptor slots, descriptor sets and their update engine.

pub mod types;
pub mod layout;
pub mod descriptor_slot;
pub mod descriptor_set;

pub use types::{
    SamplerHandle, ImageViewHandle, BufferHandle, BufferViewHandle,
    DescriptorSetLayoutHandle, DescriptorSetHandle,
    DescriptorType, DescriptorKind, ShaderStageFlags, ImageLayout,
    DescriptorImageInfo, DescriptorBufferInfo,
    WriteDescriptorElements, WriteDescriptorSet, CopyDescriptorSet,
};
pub use layout::{
    DescriptorSetLayout, DescriptorSetLayoutBinding, DescriptorSetLayoutDesc,
    LayoutBuild, LayoutWarning, CompatibilityCheck,
};
pub use descriptor_slot::{
    Descriptor, WriteElement,
    SamplerDescriptor, ImageSamplerDescriptor, ImageDescriptor,
    BufferDescriptor, TexelDescriptor,
};
pub use descriptor_set::DescriptorSet;
