/// Tests for DescriptorSet
///
/// Slot construction, write updates (bounds, type checks, binding spill,
/// atomicity, immutable samplers) and copy updates between and within sets.

use super::*;
use crate::descriptor::layout::{DescriptorSetLayoutBinding, DescriptorSetLayoutDesc};
use crate::descriptor::types::{
    BufferHandle, BufferViewHandle, DescriptorBufferInfo, DescriptorImageInfo, DescriptorKind,
    DescriptorSetLayoutHandle, DescriptorType, ImageLayout, ImageViewHandle, SamplerHandle,
    ShaderStageFlags,
};
use crate::descriptor::descriptor_slot::Descriptor;

// ============================================================================
// Helper Functions
// ============================================================================

fn binding(number: u32, descriptor_type: DescriptorType, count: u32) -> DescriptorSetLayoutBinding {
    DescriptorSetLayoutBinding {
        binding: number,
        descriptor_type,
        descriptor_count: count,
        stage_flags: ShaderStageFlags::FRAGMENT,
        immutable_samplers: None,
    }
}

fn create_set(handle: u64, bindings: Vec<DescriptorSetLayoutBinding>) -> DescriptorSet {
    let built = DescriptorSetLayout::from_desc(DescriptorSetLayoutDesc {
        handle: DescriptorSetLayoutHandle(handle),
        bindings,
    });
    DescriptorSet::new(DescriptorSetHandle(handle), Arc::new(built.layout)).unwrap()
}

fn buffer_info(buffer: u64) -> DescriptorBufferInfo {
    DescriptorBufferInfo { buffer: BufferHandle(buffer), offset: buffer * 16, range: 256 }
}

fn buffer_write(binding: u32, array_element: u32, buffers: &[u64]) -> WriteDescriptorSet {
    WriteDescriptorSet {
        dst_set: DescriptorSetHandle(1),
        dst_binding: binding,
        dst_array_element: array_element,
        descriptor_type: DescriptorType::UniformBuffer,
        elements: WriteDescriptorElements::Buffer(buffers.iter().map(|&b| buffer_info(b)).collect()),
    }
}

fn image_write(binding: u32, descriptor_type: DescriptorType, infos: Vec<DescriptorImageInfo>) -> WriteDescriptorSet {
    WriteDescriptorSet {
        dst_set: DescriptorSetHandle(1),
        dst_binding: binding,
        dst_array_element: 0,
        descriptor_type,
        elements: WriteDescriptorElements::Image(infos),
    }
}

fn copy(src_binding: u32, src_array_element: u32, dst_binding: u32, dst_array_element: u32, count: u32) -> CopyDescriptorSet {
    CopyDescriptorSet {
        src_set: DescriptorSetHandle(2),
        src_binding,
        src_array_element,
        dst_set: DescriptorSetHandle(1),
        dst_binding,
        dst_array_element,
        descriptor_count: count,
    }
}

fn updated_flags(set: &DescriptorSet) -> Vec<bool> {
    set.descriptors().iter().map(|d| d.is_updated()).collect()
}

fn buffer_of(set: &DescriptorSet, global_index: u32) -> BufferHandle {
    match set.descriptor(global_index) {
        Some(Descriptor::Buffer(d)) => d.buffer(),
        other => panic!("expected a buffer descriptor, got {:?}", other),
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_slot_count_and_kinds() {
    let set = create_set(1, vec![
        binding(4, DescriptorType::SampledImage, 2),
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(1, DescriptorType::StorageTexelBuffer, 3),
    ]);

    assert_eq!(set.descriptors().len(), 6);
    let kinds: Vec<_> = set.descriptors().iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![
        DescriptorKind::Image,
        DescriptorKind::Image,
        DescriptorKind::Buffer,
        DescriptorKind::TexelBuffer,
        DescriptorKind::TexelBuffer,
        DescriptorKind::TexelBuffer,
    ]);
    assert!(updated_flags(&set).iter().all(|u| !u));
    assert!(!set.is_any_updated());
}

#[test]
fn test_immutable_sampler_slots_prepopulated() {
    let mut samplers = binding(0, DescriptorType::CombinedImageSampler, 2);
    samplers.immutable_samplers = Some(vec![SamplerHandle(100), SamplerHandle(101)]);
    let set = create_set(1, vec![samplers, binding(1, DescriptorType::Sampler, 1)]);

    assert_eq!(updated_flags(&set), vec![true, true, false]);
    match set.descriptor(1) {
        Some(Descriptor::ImageSampler(d)) => assert_eq!(d.sampler(), SamplerHandle(101)),
        other => panic!("expected an image sampler descriptor, got {:?}", other),
    }
}

#[test]
fn test_short_immutable_sampler_list_leaves_tail_mutable() {
    let mut samplers = binding(0, DescriptorType::Sampler, 3);
    samplers.immutable_samplers = Some(vec![SamplerHandle(100)]);
    let set = create_set(1, vec![samplers]);

    assert!(set.descriptor(0).unwrap().is_immutable_sampler());
    assert!(!set.descriptor(1).unwrap().is_immutable_sampler());
    assert_eq!(updated_flags(&set), vec![true, false, false]);
}

#[test]
fn test_descriptor_from_binding() {
    let set = create_set(1, vec![
        binding(1, DescriptorType::UniformBuffer, 2),
        binding(0, DescriptorType::StorageImage, 1),
    ]);
    assert_eq!(set.descriptor_from_binding(0, 0).map(|d| d.kind()), Some(DescriptorKind::Image));
    assert!(set.descriptor_from_binding(0, 1).is_none());
    assert!(set.descriptor_from_binding(7, 0).is_none());
}

#[test]
fn test_zero_count_binding_takes_a_slot() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 2),
        binding(1, DescriptorType::StorageImage, 0),
        binding(2, DescriptorType::UniformBuffer, 2),
    ]);

    assert_eq!(set.descriptors().len(), 4);
    let kinds: Vec<_> = set.descriptors().iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![
        DescriptorKind::Buffer,
        DescriptorKind::Buffer,
        DescriptorKind::Image,
        DescriptorKind::Buffer,
    ]);

    // The shifted last element of binding 2 lies past the end of the set
    assert!(set.descriptor_from_binding(2, 1).is_none());
    let err = set.write_update(&buffer_write(2, 0, &[1, 2])).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));

    set.write_update(&buffer_write(2, 0, &[3])).unwrap();
    assert_eq!(buffer_of(&set, 3), BufferHandle(3));
}

#[test]
fn test_overflowed_layout_cannot_back_a_set() {
    let built = DescriptorSetLayout::from_desc(DescriptorSetLayoutDesc {
        handle: DescriptorSetLayoutHandle(1),
        bindings: vec![
            binding(0, DescriptorType::UniformBuffer, 0x8000_0000),
            binding(1, DescriptorType::UniformBuffer, 0x8000_0000),
        ],
    });

    let err = DescriptorSet::new(DescriptorSetHandle(1), Arc::new(built.layout)).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
}

// ============================================================================
// Write updates
// ============================================================================

#[test]
fn test_write_within_binding() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::StorageImage, 1),
        binding(1, DescriptorType::UniformBuffer, 4),
    ]);

    set.write_update(&buffer_write(1, 1, &[10, 11])).unwrap();

    assert_eq!(updated_flags(&set), vec![false, false, true, true, false]);
    assert_eq!(buffer_of(&set, 2), BufferHandle(10));
    assert_eq!(buffer_of(&set, 3), BufferHandle(11));
    assert!(set.is_any_updated());
}

#[test]
fn test_write_spills_into_consistent_next_binding() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 3),
        binding(1, DescriptorType::UniformBuffer, 2),
    ]);

    set.write_update(&buffer_write(0, 2, &[20, 21])).unwrap();

    assert_eq!(updated_flags(&set), vec![false, false, true, true, false]);
    assert_eq!(buffer_of(&set, 2), BufferHandle(20));
    assert_eq!(buffer_of(&set, 3), BufferHandle(21));
}

#[test]
fn test_write_spill_into_mismatched_binding_is_atomic() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 2),
        binding(1, DescriptorType::StorageBuffer, 2),
    ]);
    let before = set.descriptors().to_vec();

    let err = set.write_update(&buffer_write(0, 1, &[1, 2])).unwrap_err();

    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert_eq!(set.descriptors(), &before[..]);
    assert!(!set.is_any_updated());
}

#[test]
fn test_write_spill_with_different_stage_flags_fails() {
    let mut vertex_only = binding(1, DescriptorType::UniformBuffer, 2);
    vertex_only.stage_flags = ShaderStageFlags::VERTEX;
    let mut set = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 1), vertex_only]);

    let err = set.write_update(&buffer_write(0, 0, &[1, 2])).unwrap_err();
    assert!(matches!(err, Error::InconsistentBindings(_)));
}

#[test]
fn test_write_spill_across_several_bindings() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
        binding(2, DescriptorType::UniformBuffer, 0),
        binding(3, DescriptorType::UniformBuffer, 2),
    ]);

    set.write_update(&buffer_write(0, 0, &[1, 2, 3, 4])).unwrap();
    assert_eq!(updated_flags(&set), vec![true; 4]);
    assert_eq!(buffer_of(&set, 3), BufferHandle(4));
}

#[test]
fn test_write_missing_binding() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 1)]);
    let err = set.write_update(&buffer_write(3, 0, &[1])).unwrap_err();
    assert!(matches!(err, Error::NoSuchBinding(_)));
    assert!(err.message().contains("does not have binding 3"));
}

#[test]
fn test_write_type_mismatch_leaves_slots() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::StorageBuffer, 2)]);
    let before = set.descriptors().to_vec();

    let err = set.write_update(&buffer_write(0, 0, &[1])).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(set.descriptors(), &before[..]);
}

#[test]
fn test_write_out_of_bounds() {
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 2),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let err = set.write_update(&buffer_write(1, 0, &[1, 2])).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(updated_flags(&set).iter().all(|u| !u));
}

#[test]
fn test_write_payload_must_match_type() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::UniformTexelBuffer, 1)]);
    let write = WriteDescriptorSet {
        dst_set: DescriptorSetHandle(1),
        dst_binding: 0,
        dst_array_element: 0,
        descriptor_type: DescriptorType::UniformTexelBuffer,
        elements: WriteDescriptorElements::Buffer(vec![buffer_info(1)]),
    };
    let err = set.write_update(&write).unwrap_err();
    assert!(matches!(err, Error::InvalidPayload(_)));
}

#[test]
fn test_write_spill_reaching_other_kind_in_declaration_order() {
    // Binding 1 follows binding 0 by number, but the storage image is
    // declared between them, so the spill lands on an image slot.
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(5, DescriptorType::StorageImage, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let before = set.descriptors().to_vec();

    let err = set.write_update(&buffer_write(0, 0, &[1, 2])).unwrap_err();

    assert!(matches!(err, Error::KindMismatch(_)));
    assert_eq!(set.descriptors(), &before[..]);
}

#[test]
fn test_write_spill_reaching_other_type_of_same_kind_in_declaration_order() {
    // Binding 1 is consistent with binding 0, but the slot after binding 0
    // belongs to binding 2, a compute-only storage buffer.
    let mut compute_storage = binding(2, DescriptorType::StorageBuffer, 1);
    compute_storage.stage_flags = ShaderStageFlags::COMPUTE;
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        compute_storage,
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let before = set.descriptors().to_vec();

    let err = set.write_update(&buffer_write(0, 0, &[1, 2])).unwrap_err();

    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert!(err.message().contains("binding #2"));
    assert_eq!(set.descriptors(), &before[..]);
    assert!(!set.is_any_updated());
}

#[test]
fn test_write_spill_reaching_other_stage_flags_in_declaration_order() {
    let mut vertex_only = binding(2, DescriptorType::UniformBuffer, 1);
    vertex_only.stage_flags = ShaderStageFlags::VERTEX;
    let mut set = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        vertex_only,
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);

    let err = set.write_update(&buffer_write(0, 0, &[1, 2])).unwrap_err();
    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert!(updated_flags(&set).iter().all(|u| !u));
}

#[test]
fn test_write_of_zero_elements_is_not_an_update() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 2)]);

    set.write_update(&buffer_write(0, 1, &[])).unwrap();

    assert!(!set.is_any_updated());
    assert!(updated_flags(&set).iter().all(|u| !u));
}

#[test]
fn test_write_keeps_immutable_sampler() {
    let mut samplers = binding(0, DescriptorType::Sampler, 1);
    samplers.immutable_samplers = Some(vec![SamplerHandle(5)]);
    let mut set = create_set(1, vec![samplers]);

    let info = DescriptorImageInfo {
        sampler: SamplerHandle(99),
        image_view: ImageViewHandle::NULL,
        image_layout: ImageLayout::Undefined,
    };
    set.write_update(&image_write(0, DescriptorType::Sampler, vec![info])).unwrap();

    match set.descriptor(0) {
        Some(Descriptor::Sampler(d)) => {
            assert_eq!(d.sampler(), SamplerHandle(5));
            assert!(d.is_immutable());
        }
        other => panic!("expected a sampler descriptor, got {:?}", other),
    }
    assert!(set.descriptor(0).unwrap().is_updated());
}

#[test]
fn test_write_image_sampler_updates_view_and_layout() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::CombinedImageSampler, 1)]);
    let info = DescriptorImageInfo {
        sampler: SamplerHandle(3),
        image_view: ImageViewHandle(30),
        image_layout: ImageLayout::ShaderReadOnly,
    };
    set.write_update(&image_write(0, DescriptorType::CombinedImageSampler, vec![info])).unwrap();

    match set.descriptor(0) {
        Some(Descriptor::ImageSampler(d)) => {
            assert_eq!(d.sampler(), SamplerHandle(3));
            assert_eq!(d.image_view(), ImageViewHandle(30));
            assert_eq!(d.image_layout(), ImageLayout::ShaderReadOnly);
        }
        other => panic!("expected an image sampler descriptor, got {:?}", other),
    }
}

// ============================================================================
// Copy updates
// ============================================================================

#[test]
fn test_copy_buffer_payload() {
    let mut src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 3)]);
    src.write_update(&buffer_write(0, 0, &[7, 8, 9])).unwrap();
    let mut dst = create_set(1, vec![binding(4, DescriptorType::UniformBuffer, 2)]);

    dst.copy_update(&copy(0, 1, 4, 0, 2), &src).unwrap();

    for (global, expected) in [(0, 8u64), (1, 9)] {
        match dst.descriptor(global) {
            Some(Descriptor::Buffer(d)) => {
                assert_eq!(d.buffer(), BufferHandle(expected));
                assert_eq!(d.offset(), expected * 16);
                assert_eq!(d.range(), 256);
            }
            other => panic!("expected a buffer descriptor, got {:?}", other),
        }
    }
    assert_eq!(updated_flags(&dst), vec![true, true]);
}

#[test]
fn test_copy_texel_and_image_payloads() {
    let mut src = create_set(2, vec![
        binding(0, DescriptorType::StorageTexelBuffer, 1),
        binding(1, DescriptorType::InputAttachment, 1),
    ]);
    src.write_update(&WriteDescriptorSet {
        dst_set: DescriptorSetHandle(2),
        dst_binding: 0,
        dst_array_element: 0,
        descriptor_type: DescriptorType::StorageTexelBuffer,
        elements: WriteDescriptorElements::TexelBufferView(vec![BufferViewHandle(44)]),
    }).unwrap();
    src.write_update(&image_write(1, DescriptorType::InputAttachment, vec![DescriptorImageInfo {
        sampler: SamplerHandle::NULL,
        image_view: ImageViewHandle(55),
        image_layout: ImageLayout::General,
    }])).unwrap();

    let mut dst = create_set(1, vec![
        binding(0, DescriptorType::InputAttachment, 1),
        binding(1, DescriptorType::StorageTexelBuffer, 1),
    ]);
    dst.copy_update(&copy(0, 0, 1, 0, 1), &src).unwrap();
    dst.copy_update(&copy(1, 0, 0, 0, 1), &src).unwrap();

    match (dst.descriptor(0), dst.descriptor(1)) {
        (Some(Descriptor::Image(image)), Some(Descriptor::TexelBuffer(texel))) => {
            assert_eq!((image.image_view(), image.image_layout()), (ImageViewHandle(55), ImageLayout::General));
            assert_eq!(texel.buffer_view(), BufferViewHandle(44));
        }
        other => panic!("unexpected descriptors {:?}", other),
    }
}

#[test]
fn test_copy_type_mismatch_fails() {
    let src = create_set(2, vec![binding(0, DescriptorType::StorageBuffer, 1)]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 1)]);

    let err = dst.copy_update(&copy(0, 0, 0, 0, 1), &src).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch(_)));
    assert!(!dst.descriptor(0).unwrap().is_updated());
}

#[test]
fn test_copy_missing_bindings() {
    let src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 1)]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 1)]);

    let err = dst.copy_update(&copy(0, 0, 3, 0, 1), &src).unwrap_err();
    assert!(matches!(err, Error::NoSuchBinding(_)));
    let err = dst.copy_update(&copy(3, 0, 0, 0, 1), &src).unwrap_err();
    assert!(matches!(err, Error::NoSuchBinding(_)));
}

#[test]
fn test_copy_out_of_bounds_on_either_side() {
    let src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 2)]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 4)]);

    let err = dst.copy_update(&copy(0, 1, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(err.message().contains("source"));

    let err = dst.copy_update(&copy(0, 0, 0, 3, 2), &src).unwrap_err();
    assert!(matches!(err, Error::OutOfBounds(_)));
    assert!(err.message().contains("destination"));
}

#[test]
fn test_copy_inconsistent_spill_fails() {
    let src = create_set(2, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(1, DescriptorType::UniformBufferDynamic, 1),
    ]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 2)]);

    let err = dst.copy_update(&copy(0, 0, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert!(updated_flags(&dst).iter().all(|u| !u));
}

#[test]
fn test_copy_spills_across_consistent_bindings_on_both_sides() {
    let mut src = create_set(2, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(1, DescriptorType::UniformBuffer, 2),
    ]);
    src.write_update(&buffer_write(0, 0, &[1, 2, 3])).unwrap();
    let mut dst = create_set(1, vec![
        binding(3, DescriptorType::UniformBuffer, 2),
        binding(4, DescriptorType::UniformBuffer, 2),
    ]);

    dst.copy_update(&copy(0, 0, 3, 1, 3), &src).unwrap();

    assert_eq!(updated_flags(&dst), vec![false, true, true, true]);
    assert_eq!(buffer_of(&dst, 1), BufferHandle(1));
    assert_eq!(buffer_of(&dst, 2), BufferHandle(2));
    assert_eq!(buffer_of(&dst, 3), BufferHandle(3));
    assert!(dst.is_any_updated());
}

#[test]
fn test_copy_spill_reaching_other_kind_fails_on_either_side() {
    let src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 2)]);
    let mut dst = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(5, DescriptorType::StorageImage, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let before = dst.descriptors().to_vec();

    let err = dst.copy_update(&copy(0, 0, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::KindMismatch(_)));
    assert!(err.message().contains("copy destination"));
    assert_eq!(dst.descriptors(), &before[..]);

    let src = create_set(2, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(5, DescriptorType::SampledImage, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 2)]);

    let err = dst.copy_update(&copy(0, 0, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::KindMismatch(_)));
    assert!(err.message().contains("copy source"));
    assert!(!dst.is_any_updated());
}

#[test]
fn test_copy_spill_reaching_other_type_of_same_kind_fails() {
    let src = create_set(2, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(2, DescriptorType::StorageBuffer, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 2)]);

    let err = dst.copy_update(&copy(0, 0, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert!(err.message().contains("copy source"));

    let src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 2)]);
    let mut dst = create_set(1, vec![
        binding(0, DescriptorType::UniformBuffer, 1),
        binding(2, DescriptorType::StorageBuffer, 1),
        binding(1, DescriptorType::UniformBuffer, 1),
    ]);

    let err = dst.copy_update(&copy(0, 0, 0, 0, 2), &src).unwrap_err();
    assert!(matches!(err, Error::InconsistentBindings(_)));
    assert!(err.message().contains("copy destination"));
    assert!(updated_flags(&dst).iter().all(|u| !u));
}

#[test]
fn test_copy_of_zero_elements_is_not_an_update() {
    let src = create_set(2, vec![binding(0, DescriptorType::UniformBuffer, 1)]);
    let mut dst = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 1)]);

    dst.copy_update(&copy(0, 0, 0, 0, 0), &src).unwrap();
    assert!(!dst.is_any_updated());
}

#[test]
fn test_copy_into_immutable_sampler_keeps_sampler() {
    let mut src = create_set(2, vec![binding(0, DescriptorType::Sampler, 1)]);
    src.write_update(&image_write(0, DescriptorType::Sampler, vec![DescriptorImageInfo {
        sampler: SamplerHandle(77),
        ..DescriptorImageInfo::default()
    }])).unwrap();

    let mut immutable = binding(0, DescriptorType::Sampler, 1);
    immutable.immutable_samplers = Some(vec![SamplerHandle(3)]);
    let mut dst = create_set(1, vec![immutable]);

    dst.copy_update(&copy(0, 0, 0, 0, 1), &src).unwrap();
    match dst.descriptor(0) {
        Some(Descriptor::Sampler(d)) => assert_eq!(d.sampler(), SamplerHandle(3)),
        other => panic!("expected a sampler descriptor, got {:?}", other),
    }
}

#[test]
fn test_copy_within_same_set_overlapping() {
    let mut set = create_set(1, vec![binding(0, DescriptorType::UniformBuffer, 4)]);
    set.write_update(&buffer_write(0, 0, &[1, 2, 3])).unwrap();

    set.copy_update_within(&copy(0, 0, 0, 1, 3)).unwrap();

    assert_eq!(buffer_of(&set, 0), BufferHandle(1));
    assert_eq!(buffer_of(&set, 1), BufferHandle(1));
    assert_eq!(buffer_of(&set, 2), BufferHandle(2));
    assert_eq!(buffer_of(&set, 3), BufferHandle(3));
    assert_eq!(updated_flags(&set), vec![true; 4]);
}
