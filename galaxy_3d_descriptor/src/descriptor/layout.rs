/// Descriptor set layout model
///
/// An immutable description of a descriptor set's bindings plus the
/// precomputed mapping from binding number to a contiguous range of global
/// slot indices.
///
/// Global indices are assigned by walking bindings in DECLARATION order,
/// not by binding number. A layout declaring bindings 2, 0, 1 places
/// binding 2 first in the global index space. Never sort `bindings`.

use std::fmt;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use super::types::{
    DescriptorSetLayoutHandle, DescriptorType, SamplerHandle, ShaderStageFlags,
};

// ===== DESCRIPTORS =====

/// One declared binding (slot group) of a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetLayoutBinding {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Type of every descriptor in this binding
    pub descriptor_type: DescriptorType,
    /// Array size (may be 0)
    pub descriptor_count: u32,
    /// Shader stages that see this binding
    pub stage_flags: ShaderStageFlags,
    /// Samplers baked into the layout, one per array element
    pub immutable_samplers: Option<Vec<SamplerHandle>>,
}

/// Layout creation descriptor
#[derive(Debug, Clone)]
pub struct DescriptorSetLayoutDesc {
    /// Externally owned handle identifying the layout
    pub handle: DescriptorSetLayoutHandle,
    /// Bindings in declaration order
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}

/// Non-fatal issue found while building a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutWarning {
    /// Binding number declared more than once; the later declaration wins
    DuplicateBinding {
        layout: DescriptorSetLayoutHandle,
        binding: u32,
        previous_index: usize,
        index: usize,
    },
    /// Immutable sampler list length differs from the binding's count
    ImmutableSamplerCountMismatch {
        layout: DescriptorSetLayoutHandle,
        binding: u32,
        descriptor_count: u32,
        sampler_count: u32,
    },
    /// Immutable samplers supplied for a type that cannot use them (discarded)
    ImmutableSamplersIgnored {
        layout: DescriptorSetLayoutHandle,
        binding: u32,
        descriptor_type: DescriptorType,
    },
    /// Descriptor counts sum past `u32::MAX` starting at this binding
    DescriptorCountOverflow {
        layout: DescriptorSetLayoutHandle,
        binding: u32,
    },
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutWarning::DuplicateBinding { layout, binding, previous_index, index } => write!(
                f,
                "Duplicated binding number {} in DescriptorSetLayout {} (declared at indices {} and {}); using index {}",
                binding, layout, previous_index, index, index
            ),
            LayoutWarning::ImmutableSamplerCountMismatch { layout, binding, descriptor_count, sampler_count } => write!(
                f,
                "Binding {} of DescriptorSetLayout {} has a descriptorCount of {} but {} immutable samplers",
                binding, layout, descriptor_count, sampler_count
            ),
            LayoutWarning::ImmutableSamplersIgnored { layout, binding, descriptor_type } => write!(
                f,
                "Binding {} of DescriptorSetLayout {} has type {} which cannot use immutable samplers; they are ignored",
                binding, layout, descriptor_type
            ),
            LayoutWarning::DescriptorCountOverflow { layout, binding } => write!(
                f,
                "Descriptor counts of DescriptorSetLayout {} exceed {} at binding {}; global indices saturate from there",
                layout, u32::MAX, binding
            ),
        }
    }
}

/// Result of building a layout: the layout plus every non-fatal warning
#[derive(Debug)]
pub struct LayoutBuild {
    pub layout: DescriptorSetLayout,
    pub warnings: Vec<LayoutWarning>,
}

/// How `is_compatible_with` compares per-binding descriptor counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompatibilityCheck {
    /// Each binding's count is compared against the other layout's TOTAL
    /// count (historical behavior kept for existing callers)
    #[default]
    TotalCount,
    /// Each binding's count is compared against the same binding's count
    PerBinding,
}

// ===== LAYOUT =====

/// Descriptor set layout: bindings plus binding-to-global-index mapping
#[derive(Debug)]
pub struct DescriptorSetLayout {
    handle: DescriptorSetLayoutHandle,
    bindings: Vec<DescriptorSetLayoutBinding>,
    binding_to_index: FxHashMap<u32, usize>,
    /// Inclusive [start, end] global range per binding number
    binding_to_global_range: FxHashMap<u32, (u32, u32)>,
    descriptor_count: u32,
    dynamic_descriptor_count: u32,
    /// Descriptor counts summed past `u32::MAX`; totals and ranges saturate
    count_overflow: bool,
}

impl DescriptorSetLayout {
    /// Build a layout from its creation descriptor
    ///
    /// Duplicate binding numbers, malformed immutable sampler lists and
    /// descriptor counts overflowing `u32` are reported in
    /// `LayoutBuild::warnings`; construction always completes.
    pub fn from_desc(desc: DescriptorSetLayoutDesc) -> LayoutBuild {
        let handle = desc.handle;
        let mut warnings = Vec::new();
        let mut bindings = Vec::with_capacity(desc.bindings.len());
        let mut binding_to_index = FxHashMap::default();
        let mut binding_to_global_range = FxHashMap::default();
        let mut descriptor_count = 0u32;
        let mut dynamic_descriptor_count = 0u32;
        let mut global_index = 0u32;
        let mut count_overflow = false;

        for (index, mut binding) in desc.bindings.into_iter().enumerate() {
            if let Some(previous_index) = binding_to_index.insert(binding.binding, index) {
                warnings.push(LayoutWarning::DuplicateBinding {
                    layout: handle,
                    binding: binding.binding,
                    previous_index,
                    index,
                });
            }

            // A zero-count binding still takes one index: [start, start]
            let start = global_index;
            let end = start.checked_add(binding.descriptor_count.saturating_sub(1));
            let next = end.and_then(|end| end.checked_add(1));
            let total = descriptor_count.checked_add(binding.descriptor_count);
            if next.is_none() || total.is_none() {
                if !count_overflow {
                    warnings.push(LayoutWarning::DescriptorCountOverflow {
                        layout: handle,
                        binding: binding.binding,
                    });
                }
                count_overflow = true;
            }
            let end = end.unwrap_or(u32::MAX);
            global_index = next.unwrap_or(u32::MAX);
            binding_to_global_range.insert(binding.binding, (start, end));

            descriptor_count = total.unwrap_or(u32::MAX);
            if binding.descriptor_type.is_dynamic() {
                dynamic_descriptor_count += 1;
            }

            if binding.immutable_samplers.is_some() {
                if !binding.descriptor_type.supports_immutable_samplers() {
                    warnings.push(LayoutWarning::ImmutableSamplersIgnored {
                        layout: handle,
                        binding: binding.binding,
                        descriptor_type: binding.descriptor_type,
                    });
                    binding.immutable_samplers = None;
                } else if let Some(samplers) = &binding.immutable_samplers {
                    if samplers.len() as u32 != binding.descriptor_count {
                        warnings.push(LayoutWarning::ImmutableSamplerCountMismatch {
                            layout: handle,
                            binding: binding.binding,
                            descriptor_count: binding.descriptor_count,
                            sampler_count: samplers.len() as u32,
                        });
                    }
                }
            }

            bindings.push(binding);
        }

        LayoutBuild {
            layout: Self {
                handle,
                bindings,
                binding_to_index,
                binding_to_global_range,
                descriptor_count,
                dynamic_descriptor_count,
                count_overflow,
            },
            warnings,
        }
    }

    /// Externally owned handle this layout was built for
    pub fn handle(&self) -> DescriptorSetLayoutHandle {
        self.handle
    }

    /// Bindings in declaration order
    pub fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }

    /// Number of declared bindings (duplicates included)
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Sum of every binding's descriptor count
    pub fn total_descriptor_count(&self) -> u32 {
        self.descriptor_count
    }

    /// Whether the descriptor counts overflowed `u32` (see `LayoutWarning::DescriptorCountOverflow`)
    pub fn has_count_overflow(&self) -> bool {
        self.count_overflow
    }

    /// Number of bindings with a dynamic buffer type
    pub fn dynamic_descriptor_count(&self) -> u32 {
        self.dynamic_descriptor_count
    }

    pub fn has_binding(&self, binding: u32) -> bool {
        self.binding_to_index.contains_key(&binding)
    }

    /// Declaration index of a binding number
    pub fn index_from_binding(&self, binding: u32) -> Option<usize> {
        self.binding_to_index.get(&binding).copied()
    }

    pub fn binding_from_binding(&self, binding: u32) -> Option<&DescriptorSetLayoutBinding> {
        self.index_from_binding(binding).map(|index| &self.bindings[index])
    }

    pub fn binding_from_index(&self, index: usize) -> Option<&DescriptorSetLayoutBinding> {
        self.bindings.get(index)
    }

    /// Descriptor count of a binding (0 if absent)
    pub fn descriptor_count_from_binding(&self, binding: u32) -> u32 {
        self.binding_from_binding(binding)
            .map_or(0, |b| b.descriptor_count)
    }

    /// Descriptor count of the binding at a declaration index (0 if out of range)
    pub fn descriptor_count_from_index(&self, index: usize) -> u32 {
        self.binding_from_index(index)
            .map_or(0, |b| b.descriptor_count)
    }

    pub fn type_from_binding(&self, binding: u32) -> Option<DescriptorType> {
        self.binding_from_binding(binding).map(|b| b.descriptor_type)
    }

    pub fn type_from_index(&self, index: usize) -> Option<DescriptorType> {
        self.binding_from_index(index).map(|b| b.descriptor_type)
    }

    /// Type of the binding whose accumulated descriptor counts cover a global index
    ///
    /// Zero-count bindings cover nothing here. Linear in the number of bindings.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGlobalIndex` if no binding covers the index.
    pub fn type_from_global_index(&self, global_index: u32) -> Result<DescriptorType> {
        let mut end = 0u32;
        for binding in &self.bindings {
            end = end.saturating_add(binding.descriptor_count);
            if global_index < end {
                return Ok(binding.descriptor_type);
            }
        }
        Err(Error::InvalidGlobalIndex(global_index))
    }

    pub fn stage_flags_from_binding(&self, binding: u32) -> Option<ShaderStageFlags> {
        self.binding_from_binding(binding).map(|b| b.stage_flags)
    }

    /// First global index of a binding
    pub fn global_start_index_from_binding(&self, binding: u32) -> Option<u32> {
        self.binding_to_global_range.get(&binding).map(|&(start, _)| start)
    }

    /// Last global index of a binding (inclusive; equals start for zero-count bindings)
    pub fn global_end_index_from_binding(&self, binding: u32) -> Option<u32> {
        self.binding_to_global_range.get(&binding).map(|&(_, end)| end)
    }

    pub fn immutable_samplers_from_binding(&self, binding: u32) -> Option<&[SamplerHandle]> {
        self.binding_from_binding(binding)
            .and_then(|b| b.immutable_samplers.as_deref())
    }

    pub fn immutable_samplers_from_index(&self, index: usize) -> Option<&[SamplerHandle]> {
        self.binding_from_index(index)
            .and_then(|b| b.immutable_samplers.as_deref())
    }

    /// Whether an update may spill from `binding` into `binding + 1`
    ///
    /// True iff `binding + 1` exists and has the same type, stage flags and
    /// immutable-sampler presence as `binding`.
    pub fn is_next_binding_consistent(&self, binding: u32) -> bool {
        let Some(next_number) = binding.checked_add(1) else {
            return false;
        };
        let (Some(current), Some(next)) = (
            self.binding_from_binding(binding),
            self.binding_from_binding(next_number),
        ) else {
            return false;
        };

        current.descriptor_type == next.descriptor_type
            && current.stage_flags == next.stage_flags
            && current.immutable_samplers.is_some() == next.immutable_samplers.is_some()
    }

    /// Layout compatibility for pipeline binding (historical count check)
    pub fn is_compatible(&self, other: &DescriptorSetLayout) -> Result<()> {
        self.is_compatible_with(other, CompatibilityCheck::TotalCount)
    }

    /// Layout compatibility for pipeline binding
    ///
    /// Identical handles are trivially compatible. Otherwise total descriptor
    /// counts must match and, for every binding of `self`, the same binding
    /// number in `other` must exist with matching count (per `check`), type
    /// and stage flags.
    ///
    /// # Errors
    ///
    /// Returns `Error::IncompatibleLayouts` describing the first mismatch.
    pub fn is_compatible_with(
        &self,
        other: &DescriptorSetLayout,
        check: CompatibilityCheck,
    ) -> Result<()> {
        if self.handle == other.handle {
            return Ok(());
        }

        if self.descriptor_count != other.descriptor_count {
            return Err(Error::IncompatibleLayouts(format!(
                "DescriptorSetLayout {} has {} descriptors, but DescriptorSetLayout {} has {} descriptors",
                self.handle, self.descriptor_count, other.handle, other.descriptor_count
            )));
        }

        for binding in &self.bindings {
            let Some(other_binding) = other.binding_from_binding(binding.binding) else {
                return Err(Error::IncompatibleLayouts(format!(
                    "Binding {} for DescriptorSetLayout {} does not exist in DescriptorSetLayout {}",
                    binding.binding, self.handle, other.handle
                )));
            };

            let other_count = match check {
                CompatibilityCheck::TotalCount => other.descriptor_count,
                CompatibilityCheck::PerBinding => other_binding.descriptor_count,
            };

            if binding.descriptor_count != other_count {
                return Err(Error::IncompatibleLayouts(format!(
                    "Binding {} for DescriptorSetLayout {} has a descriptorCount of {} but binding {} for DescriptorSetLayout {} has a descriptorCount of {}",
                    binding.binding, self.handle, binding.descriptor_count,
                    binding.binding, other.handle, other_count
                )));
            }
            if binding.descriptor_type != other_binding.descriptor_type {
                return Err(Error::IncompatibleLayouts(format!(
                    "Binding {} for DescriptorSetLayout {} is type '{}' but binding {} for DescriptorSetLayout {} is type '{}'",
                    binding.binding, self.handle, binding.descriptor_type,
                    binding.binding, other.handle, other_binding.descriptor_type
                )));
            }
            if binding.stage_flags != other_binding.stage_flags {
                return Err(Error::IncompatibleLayouts(format!(
                    "Binding {} for DescriptorSetLayout {} has stageFlags {:#x} but binding {} for DescriptorSetLayout {} has stageFlags {:#x}",
                    binding.binding, self.handle, binding.stage_flags.bits(),
                    binding.binding, other.handle, other_binding.stage_flags.bits()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
