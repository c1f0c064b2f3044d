//! Gathering configuration

use std::ffi::CStr;

/// Instance extensions enabled whenever the runtime offers them
pub const DESIRED_INSTANCE_EXTENSIONS: &[&CStr] = &[ash::ext::debug_report::NAME];

/// Device extensions enabled on the trial device whenever the device offers them
pub const DESIRED_DEVICE_EXTENSIONS: &[&CStr] = &[ash::khr::swapchain::NAME];

/// Gathering configuration
#[derive(Debug, Clone)]
pub struct GatherConfig {
    /// Instance extension allow-list
    pub instance_extensions: Vec<&'static CStr>,
    /// Device extension allow-list for the trial device
    pub device_extensions: Vec<&'static CStr>,
    /// Queue family the trial device's single queue comes from
    pub queue_family_index: u32,
    /// Priority of that queue
    pub queue_priority: f32,
}

impl Default for GatherConfig {
    fn default() -> Self {
        Self {
            instance_extensions: DESIRED_INSTANCE_EXTENSIONS.to_vec(),
            device_extensions: DESIRED_DEVICE_EXTENSIONS.to_vec(),
            queue_family_index: 0,
            queue_priority: 0.0,
        }
    }
}

impl GatherConfig {
    /// Enable no optional extensions at all
    pub fn bare() -> Self {
        Self {
            instance_extensions: Vec::new(),
            device_extensions: Vec::new(),
            ..Self::default()
        }
    }

    /// Also enable `name` on the instance when available
    pub fn with_instance_extension(mut self, name: &'static CStr) -> Self {
        if !self.instance_extensions.contains(&name) {
            self.instance_extensions.push(name);
        }
        self
    }

    /// Also enable `name` on the trial device when available
    pub fn with_device_extension(mut self, name: &'static CStr) -> Self {
        if !self.device_extensions.contains(&name) {
            self.device_extensions.push(name);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_lists() {
        let config = GatherConfig::default();
        assert_eq!(config.instance_extensions, vec![c"VK_EXT_debug_report"]);
        assert_eq!(config.device_extensions, vec![c"VK_KHR_swapchain"]);
        assert_eq!(config.queue_family_index, 0);
        assert_eq!(config.queue_priority, 0.0);
    }

    #[test]
    fn test_builder_skips_duplicates() {
        let config = GatherConfig::bare()
            .with_device_extension(c"VK_KHR_maintenance1")
            .with_device_extension(c"VK_KHR_maintenance1");
        assert!(config.instance_extensions.is_empty());
        assert_eq!(config.device_extensions, vec![c"VK_KHR_maintenance1"]);
    }
}
