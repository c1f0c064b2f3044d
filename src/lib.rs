//! # vkinfo - Vulkan capability report
//!
//! Queries the Vulkan runtime for instance and device capabilities and
//! renders them as a human-readable text report.
//!
//! ## Features
//!
//! - **Instance scope**: extensions and layers, with each layer's own extensions
//! - **Device scope**: identity, memory heaps and types, queue families,
//!   device extensions and layers
//! - **Trial device creation** proving each device is usable with the
//!   reported capability set
//! - **Runtime seam**: the gatherer runs against the system loader or an
//!   in-memory fake
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let snapshot = vkinfo::gather_system()?;
//!     print!("{snapshot}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod enumerate;
pub mod error;
pub mod gather;
pub mod labels;
pub mod report;
pub mod runtime;
pub mod snapshot;
pub mod version;

// Re-export main API for easy access
pub use config::GatherConfig;
pub use error::{Result, VkInfoError};
pub use gather::gather;
pub use runtime::{InstanceApi, Loader, VulkanLoader};
pub use snapshot::CapabilitySnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gather capabilities from the system Vulkan loader with the default configuration
///
/// # Example
///
/// ```no_run
/// match vkinfo::gather_system() {
///     Ok(snapshot) => println!("{} device(s)", snapshot.devices.len()),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
pub fn gather_system() -> Result<CapabilitySnapshot> {
    let loader = VulkanLoader::load()?;
    gather(&loader, &GatherConfig::default())
}

/// Get library information
///
/// # Example
///
/// ```
/// println!("Using vkinfo v{}", vkinfo::version());
/// ```
pub fn version() -> &'static str {
    VERSION
}


/// Prelude module for convenient imports
///
/// # Example
///
/// ```no_run
/// use vkinfo::prelude::*;
///
/// let snapshot = gather(&VulkanLoader::load()?, &GatherConfig::default())?;
/// # Ok::<(), VkInfoError>(())
/// ```
pub mod prelude {
    pub use crate::config::GatherConfig;
    pub use crate::error::{Result, VkInfoError};
    pub use crate::gather::gather;
    pub use crate::runtime::{InstanceApi, Loader, VulkanLoader};
    pub use crate::snapshot::CapabilitySnapshot;
    pub use crate::{gather_system, version};
}
