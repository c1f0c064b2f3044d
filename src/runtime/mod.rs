//! Runtime seam between the gatherer and the Vulkan loader
//!
//! The gatherer only talks to the two traits in this module. The real
//! implementation in [`vulkan`] goes through `ash`; [`fake`] is an in-memory
//! runtime for tests and benchmarks.
//!
//! Enumeration methods follow the Vulkan two-call idiom: `out == None` asks
//! for the element count, `out == Some(buf)` fetches up to `buf.len()`
//! elements and stores the number written in `count`. Handles returned by
//! the `create_*` methods release themselves on drop.

pub mod fake;
pub mod vulkan;

use std::ffi::CStr;

use ash::vk;

use crate::error::VkInfoError;

pub use fake::{FakeDevice, FakeLoader};
pub use vulkan::{VulkanDevice, VulkanInstance, VulkanLoader};

/// Entry-level queries and instance creation
pub trait Loader {
    /// Owned instance; dropping it destroys the handle
    type Instance: InstanceApi;

    /// `vkEnumerateInstanceExtensionProperties`
    fn enumerate_instance_extension_properties(
        &self,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result;

    /// `vkEnumerateInstanceLayerProperties`
    fn enumerate_instance_layer_properties(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result;

    /// `vkCreateInstance` with the given extensions enabled
    fn create_instance(&self, extensions: &[&CStr]) -> Result<Self::Instance, VkInfoError>;
}

/// Physical-device queries and trial device creation on a live instance
pub trait InstanceApi {
    /// Owned logical device; dropping it destroys the handle
    type Device;

    /// `vkEnumeratePhysicalDevices`
    fn enumerate_physical_devices(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result;

    /// `vkGetPhysicalDeviceProperties`
    fn physical_device_properties(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties;

    /// `vkGetPhysicalDeviceMemoryProperties`
    fn physical_device_memory_properties(
        &self,
        gpu: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceMemoryProperties;

    /// `vkGetPhysicalDeviceFeatures`
    fn physical_device_features(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures;

    /// `vkGetPhysicalDeviceQueueFamilyProperties`; the call has no status
    fn physical_device_queue_family_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::QueueFamilyProperties]>,
    );

    /// `vkEnumerateDeviceLayerProperties`
    fn enumerate_device_layer_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result;

    /// `vkEnumerateDeviceExtensionProperties`
    fn enumerate_device_extension_properties(
        &self,
        gpu: vk::PhysicalDevice,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result;

    /// `vkCreateDevice` with one queue, the given extensions and features
    fn create_device(
        &self,
        gpu: vk::PhysicalDevice,
        request: &DeviceRequest<'_>,
    ) -> Result<Self::Device, VkInfoError>;
}

/// Parameters for a trial logical device
#[derive(Debug, Clone, Copy)]
pub struct DeviceRequest<'a> {
    /// Queue family the single queue comes from
    pub queue_family_index: u32,
    /// Priority of that queue
    pub queue_priority: f32,
    /// Device extensions to enable
    pub extensions: &'a [&'a CStr],
    /// Features to enable
    pub features: &'a vk::PhysicalDeviceFeatures,
}
