/*!
# Galaxy 3D Descriptor

Descriptor set layout and update tracking for Vulkan-style validation layers.

This crate models what a descriptor set layout declares and what a descriptor
set currently holds, and validates every write and copy update against the
layout before applying it. It is API-agnostic: the Vulkan adapter crate
converts raw `vk` structures into the types defined here.

## Architecture

- **DescriptorSetLayout**: Immutable binding table with global index ranges
- **DescriptorSet**: One slot per global index, validated write/copy updates
- **Descriptor**: Per-kind slot state (sampler, image+sampler, image, buffer, texel)
- **DescriptorTracker**: Handle-keyed registry of layouts and sets
- **Diagnostics**: Global logger receiving validation failures
*/

// Internal modules
mod error;
mod diagnostics;
pub mod log;
pub mod config;
pub mod descriptor;
pub mod tracker;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Diagnostic sink
    pub use crate::diagnostics::Diagnostics;

    // Tracker and its configuration
    pub use crate::config::TrackerConfig;
    pub use crate::tracker::DescriptorTracker;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            LogObject, ObjectType, MessageCode, LAYER_PREFIX,
        };
    }

    // Descriptor sub-module with all layout, set and update types
    pub mod descriptor {
        pub use crate::descriptor::*;
    }
}
