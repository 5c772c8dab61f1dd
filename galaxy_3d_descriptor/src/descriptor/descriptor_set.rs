/// Descriptor set instance and update engine
///
/// A `DescriptorSet` owns one `Descriptor` slot per global index of its
/// layout and validates write/copy updates against the layout's binding
/// boundaries before mutating anything. Updates are all-or-nothing.
///
/// No internal locking: callers serialize updates to the same set.

use std::sync::Arc;
use crate::error::{Error, Result};
use super::descriptor_slot::{Descriptor, WriteElement};
use super::layout::{DescriptorSetLayout, DescriptorSetLayoutBinding};
use super::types::{
    CopyDescriptorSet, DescriptorSetHandle, WriteDescriptorElements, WriteDescriptorSet,
};

/// Mutable array of descriptor slots shaped by a layout
///
/// Holds a shared reference to its layout, so the layout always outlives
/// every set built from it.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    handle: DescriptorSetHandle,
    layout: Arc<DescriptorSetLayout>,
    descriptors: Vec<Descriptor>,
    /// Declaration index of the binding that owns each slot
    owners: Vec<usize>,
    some_update: bool,
}

impl DescriptorSet {
    /// Allocate the slots of a set
    ///
    /// Walks the layout's bindings in declaration order, one slot per global
    /// index, so a zero-count binding fills its degenerate index too. The set
    /// holds `total_descriptor_count` slots; indices past that are dropped.
    /// Slots backed by an immutable sampler start populated; every other slot
    /// starts empty.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unsupported` for a layout whose descriptor counts
    /// overflowed `u32`.
    pub fn new(handle: DescriptorSetHandle, layout: Arc<DescriptorSetLayout>) -> Result<Self> {
        if layout.has_count_overflow() {
            return Err(Error::Unsupported(format!(
                "Cannot allocate descriptor set {}: the descriptor counts of DescriptorSetLayout {} overflow",
                handle, layout.handle()
            )));
        }

        let total = layout.total_descriptor_count() as usize;
        let mut descriptors = Vec::with_capacity(total);
        let mut owners = Vec::with_capacity(total);

        'bindings: for (index, binding) in layout.bindings().iter().enumerate() {
            let immutable_samplers = binding.immutable_samplers.as_deref();
            for element in 0..binding.descriptor_count.max(1) as usize {
                if descriptors.len() == total {
                    break 'bindings;
                }
                let slot = immutable_samplers
                    .and_then(|samplers| samplers.get(element))
                    .and_then(|&sampler| Descriptor::with_immutable_sampler(binding.descriptor_type, sampler))
                    .unwrap_or_else(|| Descriptor::new(binding.descriptor_type));
                descriptors.push(slot);
                owners.push(index);
            }
        }

        Ok(Self {
            handle,
            layout,
            descriptors,
            owners,
            some_update: false,
        })
    }

    pub fn handle(&self) -> DescriptorSetHandle {
        self.handle
    }

    pub fn layout(&self) -> &Arc<DescriptorSetLayout> {
        &self.layout
    }

    /// All slots, indexed by global index
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// Slot at a global index
    pub fn descriptor(&self, global_index: u32) -> Option<&Descriptor> {
        self.descriptors.get(global_index as usize)
    }

    /// Slot at an array element of a binding (no spill into later bindings)
    pub fn descriptor_from_binding(&self, binding: u32, array_element: u32) -> Option<&Descriptor> {
        if array_element >= self.layout.descriptor_count_from_binding(binding) {
            return None;
        }
        let start = self.layout.global_start_index_from_binding(binding)?;
        self.descriptor(start.checked_add(array_element)?)
    }

    /// Whether any write or copy has succeeded on this set
    pub fn is_any_updated(&self) -> bool {
        self.some_update
    }

    // ===== WRITE =====

    /// Validate and apply a direct write
    ///
    /// Checks, in order: the binding exists, the declared type matches, the
    /// payload fits the type, the span stays within the set, every binding
    /// boundary crossed is consistent, every targeted slot is owned by a
    /// binding declared like the addressed one. Only then are slots mutated.
    ///
    /// # Errors
    ///
    /// Returns the first failed check; no slot is modified on error.
    pub fn write_update(&mut self, update: &WriteDescriptorSet) -> Result<()> {
        let binding = update.dst_binding;
        let count = update.descriptor_count();

        let Some(start) = self.layout.global_start_index_from_binding(binding) else {
            return Err(Error::NoSuchBinding(format!(
                "DescriptorSet {} does not have binding {}",
                self.handle, binding
            )));
        };

        let binding_type = self.layout.type_from_binding(binding)
            .ok_or_else(|| Error::NoSuchBinding(format!(
                "DescriptorSet {} does not have binding {}",
                self.handle, binding
            )))?;
        if binding_type != update.descriptor_type {
            return Err(Error::TypeMismatch(format!(
                "Attempting write update to descriptor set {} binding #{} with type {} but update type is {}",
                self.handle, binding, binding_type, update.descriptor_type
            )));
        }

        if !update.elements.matches(update.descriptor_type) {
            return Err(Error::InvalidPayload(format!(
                "Write update to descriptor set {} binding #{} of type {} carries {}",
                self.handle, binding, update.descriptor_type, update.elements
            )));
        }

        let total = self.layout.total_descriptor_count();
        if start as u64 + update.dst_array_element as u64 + count as u64 > total as u64 {
            return Err(Error::OutOfBounds(format!(
                "Attempting write update to descriptor set {} binding #{} with {} total descriptors but update of {} descriptors starting at binding offset of {} combined with update array element offset of {} oversteps the size of this descriptor set",
                self.handle, binding, total, count, start, update.dst_array_element
            )));
        }

        verify_update_consistency(&self.layout, self.handle, "write", binding, update.dst_array_element, count)?;

        let first = (start + update.dst_array_element) as usize;
        self.verify_slot_owners("write", binding, first, count as usize)?;

        for i in 0..count as usize {
            self.descriptors[first + i].write_update(write_element(&update.elements, i))?;
        }
        if count > 0 {
            self.some_update = true;
        }
        Ok(())
    }

    // ===== COPY =====

    /// Validate and apply a copy from another set
    ///
    /// # Errors
    ///
    /// Returns the first failed check; no slot is modified on error.
    pub fn copy_update(&mut self, update: &CopyDescriptorSet, src_set: &DescriptorSet) -> Result<()> {
        let (src_first, dst_first) = self.validate_copy(update, src_set)?;
        let count = update.descriptor_count as usize;
        self.apply_copy(dst_first, &src_set.descriptors[src_first..src_first + count])
    }

    /// Validate and apply a copy between two ranges of this set
    ///
    /// The source range is read in full before any slot is written, so
    /// overlapping ranges copy the pre-update contents.
    pub fn copy_update_within(&mut self, update: &CopyDescriptorSet) -> Result<()> {
        let (src_first, dst_first) = self.validate_copy(update, self)?;
        let count = update.descriptor_count as usize;
        let src = self.descriptors[src_first..src_first + count].to_vec();
        self.apply_copy(dst_first, &src)
    }

    /// Checks a copy against both layouts; returns (source, destination) first global indices
    fn validate_copy(&self, update: &CopyDescriptorSet, src: &DescriptorSet) -> Result<(usize, usize)> {
        let count = update.descriptor_count;
        let src_handle = src.handle;
        let src_layout = src.layout.as_ref();

        let Some(dst_start) = self.layout.global_start_index_from_binding(update.dst_binding) else {
            return Err(Error::NoSuchBinding(format!(
                "Copy update attempting to update binding #{} that does not exist in descriptor set {}",
                update.dst_binding, self.handle
            )));
        };
        let Some(src_start) = src_layout.global_start_index_from_binding(update.src_binding) else {
            return Err(Error::NoSuchBinding(format!(
                "Copy update attempting to read binding #{} that does not exist in descriptor set {}",
                update.src_binding, src_handle
            )));
        };

        let src_total = src_layout.total_descriptor_count();
        if src_start as u64 + update.src_array_element as u64 + count as u64 > src_total as u64 {
            return Err(Error::OutOfBounds(format!(
                "Copy update of {} descriptors from descriptor set {} binding #{} at array element {} oversteps the {} total descriptors of the source set",
                count, src_handle, update.src_binding, update.src_array_element, src_total
            )));
        }

        let dst_total = self.layout.total_descriptor_count();
        if dst_start as u64 + update.dst_array_element as u64 + count as u64 > dst_total as u64 {
            return Err(Error::OutOfBounds(format!(
                "Copy update of {} descriptors into descriptor set {} binding #{} at array element {} oversteps the {} total descriptors of the destination set",
                count, self.handle, update.dst_binding, update.dst_array_element, dst_total
            )));
        }

        let src_type = src_layout.type_from_binding(update.src_binding);
        let dst_type = self.layout.type_from_binding(update.dst_binding);
        if let (Some(src_type), Some(dst_type)) = (src_type, dst_type) {
            if src_type != dst_type {
                return Err(Error::TypeMismatch(format!(
                    "Copy update to descriptor set {} binding #{} with type {} has source descriptor set {} binding #{} with type {}",
                    self.handle, update.dst_binding, dst_type, src_handle, update.src_binding, src_type
                )));
            }
        }

        verify_update_consistency(src_layout, src_handle, "copy source", update.src_binding, update.src_array_element, count)?;
        verify_update_consistency(&self.layout, self.handle, "copy destination", update.dst_binding, update.dst_array_element, count)?;

        let src_first = (src_start + update.src_array_element) as usize;
        let dst_first = (dst_start + update.dst_array_element) as usize;
        src.verify_slot_owners("copy source", update.src_binding, src_first, count as usize)?;
        self.verify_slot_owners("copy destination", update.dst_binding, dst_first, count as usize)?;

        Ok((src_first, dst_first))
    }

    /// Source slots are owner-checked against the same declared type as the
    /// destination slots, so every pair has the same kind.
    fn apply_copy(&mut self, dst_first: usize, src: &[Descriptor]) -> Result<()> {
        for (i, src_slot) in src.iter().enumerate() {
            self.descriptors[dst_first + i].copy_update(src_slot)?;
        }
        if !src.is_empty() {
            self.some_update = true;
        }
        Ok(())
    }

    /// Check that the slots `first..first + count` belong to bindings declared
    /// like `binding`
    ///
    /// Spill consistency is judged by binding number, but slots are laid out
    /// in declaration order, so a spill can land on a binding other than
    /// `binding + 1`. Every slot is checked against its actual owner.
    fn verify_slot_owners(&self, role: &str, binding: u32, first: usize, count: usize) -> Result<()> {
        let Some(origin) = self.layout.binding_from_binding(binding) else {
            return Err(Error::NoSuchBinding(format!(
                "DescriptorSet {} does not have binding {}",
                self.handle, binding
            )));
        };

        for global_index in first..first + count {
            let Some(owner) = self.owners.get(global_index)
                .and_then(|&index| self.layout.binding_from_index(index))
            else {
                return Err(Error::OutOfBounds(format!(
                    "Attempting {} update to descriptor set {} binding #{} reaches global index {} which has no slot",
                    role, self.handle, binding, global_index
                )));
            };

            if owner.descriptor_type.kind() != origin.descriptor_type.kind() {
                return Err(Error::KindMismatch(format!(
                    "Attempting {} update to descriptor set {} binding #{} reaches global index {} of binding #{} which holds {:?} descriptors",
                    role, self.handle, binding, global_index, owner.binding, owner.descriptor_type.kind()
                )));
            }
            if !is_declared_alike(origin, owner) {
                return Err(Error::InconsistentBindings(format!(
                    "Attempting {} update to descriptor set {} binding #{} reaches global index {} of binding #{} which has a different type, stage flags or immutable sampler use",
                    role, self.handle, binding, global_index, owner.binding
                )));
            }
        }

        Ok(())
    }
}

fn is_declared_alike(a: &DescriptorSetLayoutBinding, b: &DescriptorSetLayoutBinding) -> bool {
    a.descriptor_type == b.descriptor_type
        && a.stage_flags == b.stage_flags
        && a.immutable_samplers.is_some() == b.immutable_samplers.is_some()
}

/// Check that an update spanning past `binding` only crosses into consistent bindings
///
/// The span is measured from the start of `binding`, so an array element
/// offset past the binding's own count also walks into later bindings.
fn verify_update_consistency(
    layout: &DescriptorSetLayout,
    set: DescriptorSetHandle,
    role: &str,
    binding: u32,
    array_element: u32,
    count: u32,
) -> Result<()> {
    let mut span = array_element as u64 + count as u64;
    let mut current = binding;
    let mut remaining = layout.descriptor_count_from_binding(current) as u64;

    while span > remaining {
        if !layout.is_next_binding_consistent(current) {
            return Err(Error::InconsistentBindings(format!(
                "Attempting {} update to descriptor set {} binding #{} with {} descriptors in binding but update of {} descriptors combined with array element offset of {} oversteps binding #{} into binding #{} which is missing or has a different type, stage flags or immutable sampler use",
                role, set, binding, layout.descriptor_count_from_binding(binding),
                count, array_element, current, current as u64 + 1
            )));
        }
        span -= remaining;
        current += 1;
        remaining = layout.descriptor_count_from_binding(current) as u64;
    }

    Ok(())
}

fn write_element(elements: &WriteDescriptorElements, index: usize) -> WriteElement<'_> {
    match elements {
        WriteDescriptorElements::Image(infos) => WriteElement::Image(&infos[index]),
        WriteDescriptorElements::Buffer(infos) => WriteElement::Buffer(&infos[index]),
        WriteDescriptorElements::TexelBufferView(views) => WriteElement::TexelBufferView(views[index]),
    }
}

#[cfg(test)]
#[path = "descriptor_set_tests.rs"]
mod tests;
