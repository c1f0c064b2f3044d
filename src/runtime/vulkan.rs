//! `ash`-backed runtime
//!
//! Enumerations call the raw function pointers so that `VK_INCOMPLETE`
//! reaches [`crate::enumerate::enumerate`] instead of being retried inside
//! `ash`.

use std::ffi::{c_char, CStr};
use std::ptr;

use ash::vk;
use log::debug;

use super::{DeviceRequest, InstanceApi, Loader};
use crate::error::{Result, VkInfoError};

/// System Vulkan loader
pub struct VulkanLoader {
    entry: ash::Entry,
}

/// Live instance, destroyed on drop
pub struct VulkanInstance {
    // Keeps the loader library mapped while the instance is alive
    entry: ash::Entry,
    instance: ash::Instance,
}

/// Trial logical device, destroyed on drop
pub struct VulkanDevice {
    _entry: ash::Entry,
    device: ash::Device,
}

/// Split an optional output slice into the pointer and count the C API expects
///
/// The count always matches the buffer, so the runtime never writes past it.
fn out_ptr<T>(count: &mut u32, out: Option<&mut [T]>) -> *mut T {
    match out {
        Some(buf) => {
            *count = buf.len() as u32;
            buf.as_mut_ptr()
        }
        None => ptr::null_mut(),
    }
}

fn name_ptr(name: Option<&CStr>) -> *const c_char {
    name.map_or(ptr::null(), CStr::as_ptr)
}

impl VulkanLoader {
    /// Load the system Vulkan loader library
    pub fn load() -> Result<Self> {
        // SAFETY: the loader's global initialization has no preconditions
        // beyond being called from a normal process context.
        let entry = unsafe { ash::Entry::load()? };
        debug!("Vulkan loader library loaded");
        Ok(Self { entry })
    }
}

impl Loader for VulkanLoader {
    type Instance = VulkanInstance;

    fn enumerate_instance_extension_properties(
        &self,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        let data = out_ptr(count, out);
        // SAFETY: `data` is null or valid for `*count` elements.
        unsafe {
            (self.entry.fp_v1_0().enumerate_instance_extension_properties)(name_ptr(layer), count, data)
        }
    }

    fn enumerate_instance_layer_properties(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result {
        let data = out_ptr(count, out);
        // SAFETY: `data` is null or valid for `*count` elements.
        unsafe { (self.entry.fp_v1_0().enumerate_instance_layer_properties)(count, data) }
    }

    fn create_instance(&self, extensions: &[&CStr]) -> Result<VulkanInstance> {
        let names: Vec<*const c_char> = extensions.iter().map(|ext| ext.as_ptr()).collect();
        let create_info = vk::InstanceCreateInfo::default().enabled_extension_names(&names);

        // SAFETY: `create_info` and the names it points to outlive the call.
        let instance = unsafe { self.entry.create_instance(&create_info, None) }
            .map_err(|status| VkInfoError::call("vkCreateInstance", status))?;
        debug!("Created instance {:?}", instance.handle());

        Ok(VulkanInstance {
            entry: self.entry.clone(),
            instance,
        })
    }
}

impl InstanceApi for VulkanInstance {
    type Device = VulkanDevice;

    fn enumerate_physical_devices(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result {
        let data = out_ptr(count, out);
        // SAFETY: the instance handle is live and `data` is null or valid for `*count` elements.
        unsafe { (self.instance.fp_v1_0().enumerate_physical_devices)(self.instance.handle(), count, data) }
    }

    fn physical_device_properties(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        // SAFETY: `gpu` was enumerated from this instance.
        unsafe { self.instance.get_physical_device_properties(gpu) }
    }

    fn physical_device_memory_properties(
        &self,
        gpu: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceMemoryProperties {
        // SAFETY: `gpu` was enumerated from this instance.
        unsafe { self.instance.get_physical_device_memory_properties(gpu) }
    }

    fn physical_device_features(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        // SAFETY: `gpu` was enumerated from this instance.
        unsafe { self.instance.get_physical_device_features(gpu) }
    }

    fn physical_device_queue_family_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::QueueFamilyProperties]>,
    ) {
        let data = out_ptr(count, out);
        // SAFETY: `gpu` belongs to this instance and `data` is null or valid for `*count` elements.
        unsafe { (self.instance.fp_v1_0().get_physical_device_queue_family_properties)(gpu, count, data) }
    }

    fn enumerate_device_layer_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result {
        let data = out_ptr(count, out);
        // SAFETY: `gpu` belongs to this instance and `data` is null or valid for `*count` elements.
        unsafe { (self.instance.fp_v1_0().enumerate_device_layer_properties)(gpu, count, data) }
    }

    fn enumerate_device_extension_properties(
        &self,
        gpu: vk::PhysicalDevice,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        let data = out_ptr(count, out);
        // SAFETY: `gpu` belongs to this instance and `data` is null or valid for `*count` elements.
        unsafe {
            (self.instance.fp_v1_0().enumerate_device_extension_properties)(gpu, name_ptr(layer), count, data)
        }
    }

    fn create_device(&self, gpu: vk::PhysicalDevice, request: &DeviceRequest<'_>) -> Result<VulkanDevice> {
        let priorities = [request.queue_priority];
        let queue_infos = [vk::DeviceQueueCreateInfo::default()
            .queue_family_index(request.queue_family_index)
            .queue_priorities(&priorities)];
        let names: Vec<*const c_char> = request.extensions.iter().map(|ext| ext.as_ptr()).collect();
        let create_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&names)
            .enabled_features(request.features);

        // SAFETY: `gpu` belongs to this instance; everything `create_info`
        // points to lives until the call returns.
        let device = unsafe { self.instance.create_device(gpu, &create_info, None) }
            .map_err(|status| VkInfoError::call("vkCreateDevice", status))?;
        debug!("Created trial device {:?}", device.handle());

        Ok(VulkanDevice {
            _entry: self.entry.clone(),
            device,
        })
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        debug!("Destroying instance {:?}", self.instance.handle());
        // SAFETY: every trial device created from this instance is dropped
        // before the instance.
        unsafe { self.instance.destroy_instance(None) };
    }
}

impl Drop for VulkanDevice {
    fn drop(&mut self) {
        debug!("Destroying trial device {:?}", self.device.handle());
        // SAFETY: no objects are ever created from the trial device.
        unsafe { self.device.destroy_device(None) };
    }
}
