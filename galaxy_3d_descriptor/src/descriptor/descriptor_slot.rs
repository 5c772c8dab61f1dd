/// Descriptor slots
///
/// One `Descriptor` per global index of a set. Each variant carries only the
/// fields of its kind plus the shared `updated` flag. Write and copy dispatch
/// is an exhaustive match; a payload of the wrong kind is an error, never a
/// reinterpretation.

use crate::error::{Error, Result};
use super::types::{
    BufferHandle, BufferViewHandle, DescriptorBufferInfo, DescriptorImageInfo,
    DescriptorKind, DescriptorType, ImageLayout, ImageViewHandle, SamplerHandle,
};

// ===== VARIANTS =====

/// Standalone sampler slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerDescriptor {
    sampler: SamplerHandle,
    immutable: bool,
    updated: bool,
}

impl SamplerDescriptor {
    /// Empty, mutable slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with a layout-baked sampler
    pub fn with_immutable_sampler(sampler: SamplerHandle) -> Self {
        Self { sampler, immutable: true, updated: true }
    }

    pub fn sampler(&self) -> SamplerHandle {
        self.sampler
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn write_update(&mut self, info: &DescriptorImageInfo) {
        if !self.immutable {
            self.sampler = info.sampler;
        }
        self.updated = true;
    }

    pub fn copy_update(&mut self, src: &SamplerDescriptor) {
        if !self.immutable {
            self.sampler = src.sampler;
        }
        self.updated = true;
    }
}

/// Combined image sampler slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSamplerDescriptor {
    sampler: SamplerHandle,
    immutable: bool,
    image_view: ImageViewHandle,
    image_layout: ImageLayout,
    updated: bool,
}

impl ImageSamplerDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with a layout-baked sampler (image still unset)
    pub fn with_immutable_sampler(sampler: SamplerHandle) -> Self {
        Self { sampler, immutable: true, updated: true, ..Self::default() }
    }

    pub fn sampler(&self) -> SamplerHandle {
        self.sampler
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn image_view(&self) -> ImageViewHandle {
        self.image_view
    }

    pub fn image_layout(&self) -> ImageLayout {
        self.image_layout
    }

    pub fn write_update(&mut self, info: &DescriptorImageInfo) {
        if !self.immutable {
            self.sampler = info.sampler;
        }
        self.image_view = info.image_view;
        self.image_layout = info.image_layout;
        self.updated = true;
    }

    pub fn copy_update(&mut self, src: &ImageSamplerDescriptor) {
        if !self.immutable {
            self.sampler = src.sampler;
        }
        self.image_view = src.image_view;
        self.image_layout = src.image_layout;
        self.updated = true;
    }
}

/// Sampled image, storage image or input attachment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageDescriptor {
    storage: bool,
    image_view: ImageViewHandle,
    image_layout: ImageLayout,
    updated: bool,
}

impl ImageDescriptor {
    pub fn new(descriptor_type: DescriptorType) -> Self {
        Self { storage: descriptor_type.is_storage(), ..Self::default() }
    }

    pub fn is_storage(&self) -> bool {
        self.storage
    }

    pub fn image_view(&self) -> ImageViewHandle {
        self.image_view
    }

    pub fn image_layout(&self) -> ImageLayout {
        self.image_layout
    }

    pub fn write_update(&mut self, info: &DescriptorImageInfo) {
        self.image_view = info.image_view;
        self.image_layout = info.image_layout;
        self.updated = true;
    }

    pub fn copy_update(&mut self, src: &ImageDescriptor) {
        self.image_view = src.image_view;
        self.image_layout = src.image_layout;
        self.updated = true;
    }
}

/// Uniform or storage buffer slot (dynamic or not)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDescriptor {
    storage: bool,
    dynamic: bool,
    buffer: BufferHandle,
    offset: u64,
    range: u64,
    updated: bool,
}

impl BufferDescriptor {
    pub fn new(descriptor_type: DescriptorType) -> Self {
        Self {
            storage: descriptor_type.is_storage(),
            dynamic: descriptor_type.is_dynamic(),
            ..Self::default()
        }
    }

    pub fn is_storage(&self) -> bool {
        self.storage
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn range(&self) -> u64 {
        self.range
    }

    pub fn write_update(&mut self, info: &DescriptorBufferInfo) {
        self.buffer = info.buffer;
        self.offset = info.offset;
        self.range = info.range;
        self.updated = true;
    }

    pub fn copy_update(&mut self, src: &BufferDescriptor) {
        self.buffer = src.buffer;
        self.offset = src.offset;
        self.range = src.range;
        self.updated = true;
    }
}

/// Uniform or storage texel buffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TexelDescriptor {
    storage: bool,
    buffer_view: BufferViewHandle,
    updated: bool,
}

impl TexelDescriptor {
    pub fn new(descriptor_type: DescriptorType) -> Self {
        Self { storage: descriptor_type.is_storage(), ..Self::default() }
    }

    pub fn is_storage(&self) -> bool {
        self.storage
    }

    pub fn buffer_view(&self) -> BufferViewHandle {
        self.buffer_view
    }

    pub fn write_update(&mut self, buffer_view: BufferViewHandle) {
        self.buffer_view = buffer_view;
        self.updated = true;
    }

    pub fn copy_update(&mut self, src: &TexelDescriptor) {
        self.buffer_view = src.buffer_view;
        self.updated = true;
    }
}

// ===== DESCRIPTOR =====

/// One addressable slot of a descriptor set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    Sampler(SamplerDescriptor),
    ImageSampler(ImageSamplerDescriptor),
    Image(ImageDescriptor),
    Buffer(BufferDescriptor),
    TexelBuffer(TexelDescriptor),
}

/// Single payload entry of a write update, borrowed from the update
#[derive(Debug, Clone, Copy)]
pub enum WriteElement<'a> {
    Image(&'a DescriptorImageInfo),
    Buffer(&'a DescriptorBufferInfo),
    TexelBufferView(BufferViewHandle),
}

impl Descriptor {
    /// Empty slot of the variant backing `descriptor_type`
    pub fn new(descriptor_type: DescriptorType) -> Self {
        match descriptor_type.kind() {
            DescriptorKind::Sampler => Descriptor::Sampler(SamplerDescriptor::new()),
            DescriptorKind::ImageSampler => Descriptor::ImageSampler(ImageSamplerDescriptor::new()),
            DescriptorKind::Image => Descriptor::Image(ImageDescriptor::new(descriptor_type)),
            DescriptorKind::Buffer => Descriptor::Buffer(BufferDescriptor::new(descriptor_type)),
            DescriptorKind::TexelBuffer => Descriptor::TexelBuffer(TexelDescriptor::new(descriptor_type)),
        }
    }

    /// Slot backed by an immutable sampler
    ///
    /// Returns `None` for types that cannot carry immutable samplers.
    pub fn with_immutable_sampler(descriptor_type: DescriptorType, sampler: SamplerHandle) -> Option<Self> {
        match descriptor_type.kind() {
            DescriptorKind::Sampler => Some(Descriptor::Sampler(
                SamplerDescriptor::with_immutable_sampler(sampler),
            )),
            DescriptorKind::ImageSampler => Some(Descriptor::ImageSampler(
                ImageSamplerDescriptor::with_immutable_sampler(sampler),
            )),
            _ => None,
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Sampler(_) => DescriptorKind::Sampler,
            Descriptor::ImageSampler(_) => DescriptorKind::ImageSampler,
            Descriptor::Image(_) => DescriptorKind::Image,
            Descriptor::Buffer(_) => DescriptorKind::Buffer,
            Descriptor::TexelBuffer(_) => DescriptorKind::TexelBuffer,
        }
    }

    /// Whether any write or copy (or an immutable sampler) has populated this slot
    pub fn is_updated(&self) -> bool {
        match self {
            Descriptor::Sampler(d) => d.updated,
            Descriptor::ImageSampler(d) => d.updated,
            Descriptor::Image(d) => d.updated,
            Descriptor::Buffer(d) => d.updated,
            Descriptor::TexelBuffer(d) => d.updated,
        }
    }

    /// Whether this slot holds a layout-baked sampler
    pub fn is_immutable_sampler(&self) -> bool {
        match self {
            Descriptor::Sampler(d) => d.is_immutable(),
            Descriptor::ImageSampler(d) => d.is_immutable(),
            _ => false,
        }
    }

    /// Whether `element` can be written into this slot
    pub fn accepts(&self, element: &WriteElement<'_>) -> bool {
        matches!(
            (self, element),
            (Descriptor::Sampler(_), WriteElement::Image(_))
                | (Descriptor::ImageSampler(_), WriteElement::Image(_))
                | (Descriptor::Image(_), WriteElement::Image(_))
                | (Descriptor::Buffer(_), WriteElement::Buffer(_))
                | (Descriptor::TexelBuffer(_), WriteElement::TexelBufferView(_))
        )
    }

    /// Apply one write payload entry
    ///
    /// # Errors
    ///
    /// Returns `Error::KindMismatch` if the entry does not fit this slot's kind;
    /// the slot is left untouched.
    pub fn write_update(&mut self, element: WriteElement<'_>) -> Result<()> {
        match (self, element) {
            (Descriptor::Sampler(d), WriteElement::Image(info)) => d.write_update(info),
            (Descriptor::ImageSampler(d), WriteElement::Image(info)) => d.write_update(info),
            (Descriptor::Image(d), WriteElement::Image(info)) => d.write_update(info),
            (Descriptor::Buffer(d), WriteElement::Buffer(info)) => d.write_update(info),
            (Descriptor::TexelBuffer(d), WriteElement::TexelBufferView(view)) => d.write_update(view),
            (slot, element) => {
                return Err(Error::KindMismatch(format!(
                    "cannot write {} payload into a {:?} descriptor",
                    element_kind(&element),
                    slot.kind()
                )));
            }
        }
        Ok(())
    }

    /// Copy the payload of another slot of the same kind
    ///
    /// # Errors
    ///
    /// Returns `Error::KindMismatch` if `src` is a different kind; the slot is
    /// left untouched.
    pub fn copy_update(&mut self, src: &Descriptor) -> Result<()> {
        match (self, src) {
            (Descriptor::Sampler(d), Descriptor::Sampler(s)) => d.copy_update(s),
            (Descriptor::ImageSampler(d), Descriptor::ImageSampler(s)) => d.copy_update(s),
            (Descriptor::Image(d), Descriptor::Image(s)) => d.copy_update(s),
            (Descriptor::Buffer(d), Descriptor::Buffer(s)) => d.copy_update(s),
            (Descriptor::TexelBuffer(d), Descriptor::TexelBuffer(s)) => d.copy_update(s),
            (slot, src) => {
                return Err(Error::KindMismatch(format!(
                    "cannot copy a {:?} descriptor into a {:?} descriptor",
                    src.kind(),
                    slot.kind()
                )));
            }
        }
        Ok(())
    }
}

fn element_kind(element: &WriteElement<'_>) -> &'static str {
    match element {
        WriteElement::Image(_) => "image",
        WriteElement::Buffer(_) => "buffer",
        WriteElement::TexelBufferView(_) => "texel buffer view",
    }
}

#[cfg(test)]
#[path = "descriptor_slot_tests.rs"]
mod tests;
