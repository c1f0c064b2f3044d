//! Error types for the vkinfo library

use ash::vk;
use thiserror::Error;

use crate::labels::status_name;

/// Main error type for vkinfo operations
#[derive(Error, Debug)]
pub enum VkInfoError {
    /// A capability query or creation call returned a fatal status
    #[error("{call} failed: {} ({})", status_name(*.status), .status.as_raw())]
    Call {
        /// Name of the failing entry point, e.g. `vkCreateInstance`
        call: String,
        /// Status returned by the runtime
        status: vk::Result,
    },

    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan loader: {0}")]
    Load(#[from] ash::LoadingError),
}

impl VkInfoError {
    /// Build a call failure for `call` with `status`
    pub fn call(call: impl Into<String>, status: vk::Result) -> Self {
        VkInfoError::Call {
            call: call.into(),
            status,
        }
    }

    /// Status carried by a call failure
    pub fn status(&self) -> Option<vk::Result> {
        match self {
            VkInfoError::Call { status, .. } => Some(*status),
            VkInfoError::Load(_) => None,
        }
    }
}

/// Result type for vkinfo operations
pub type Result<T> = std::result::Result<T, VkInfoError>;

/// Turn a raw status into a `Result`, treating anything but success as fatal
pub(crate) fn check(call: &str, status: vk::Result) -> Result<()> {
    if status == vk::Result::SUCCESS {
        Ok(())
    } else {
        Err(VkInfoError::call(call, status))
    }
}
