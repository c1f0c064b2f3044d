//! In-memory runtime
//!
//! Reports a fixed set of extensions, layers and physical devices, can be
//! told to fail any call with a chosen status, and counts live handles so
//! tests can check that everything created is released.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::ffi::CStr;
use std::rc::Rc;

use ash::vk;
use ash::vk::Handle;

use super::{DeviceRequest, InstanceApi, Loader};
use crate::error::{Result, VkInfoError};
use crate::snapshot::{fixed_str, write_fixed_str};

/// Build extension properties with `name` and `spec_version`
pub fn extension(name: &str, spec_version: u32) -> vk::ExtensionProperties {
    let mut props = vk::ExtensionProperties {
        spec_version,
        ..Default::default()
    };
    write_fixed_str(&mut props.extension_name, name);
    props
}

/// A layer and the extensions it reports
#[derive(Debug, Clone)]
pub struct FakeLayer {
    /// Layer properties
    pub properties: vk::LayerProperties,
    /// Extensions reported when enumerating with this layer's name
    pub extensions: Vec<vk::ExtensionProperties>,
}

impl FakeLayer {
    /// A layer with no extensions
    pub fn new(name: &str, spec_version: u32, implementation_version: u32, description: &str) -> Self {
        let mut properties = vk::LayerProperties {
            spec_version,
            implementation_version,
            ..Default::default()
        };
        write_fixed_str(&mut properties.layer_name, name);
        write_fixed_str(&mut properties.description, description);
        Self {
            properties,
            extensions: Vec::new(),
        }
    }

    /// Add an extension reported by this layer
    pub fn with_extension(mut self, name: &str, spec_version: u32) -> Self {
        self.extensions.push(extension(name, spec_version));
        self
    }

    fn name(&self) -> String {
        fixed_str(&self.properties.layer_name)
    }
}

/// A physical device description
#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    /// Device properties
    pub properties: vk::PhysicalDeviceProperties,
    /// Memory heaps and types
    pub memory: vk::PhysicalDeviceMemoryProperties,
    /// Feature block
    pub features: vk::PhysicalDeviceFeatures,
    /// Queue families
    pub queue_families: Vec<vk::QueueFamilyProperties>,
    /// Base device extensions
    pub extensions: Vec<vk::ExtensionProperties>,
    /// Device layers
    pub layers: Vec<FakeLayer>,
}

impl FakeDevice {
    /// A device with no memory, queues, extensions or layers
    pub fn new(name: &str, device_type: vk::PhysicalDeviceType) -> Self {
        let mut device = Self::default();
        device.properties.device_type = device_type;
        write_fixed_str(&mut device.properties.device_name, name);
        device
    }

    /// Set API version, driver version, vendor and device IDs
    pub fn with_ids(mut self, api_version: u32, driver_version: u32, vendor_id: u32, device_id: u32) -> Self {
        self.properties.api_version = api_version;
        self.properties.driver_version = driver_version;
        self.properties.vendor_id = vendor_id;
        self.properties.device_id = device_id;
        self
    }

    /// Append a memory heap
    ///
    /// # Panics
    ///
    /// Panics past `VK_MAX_MEMORY_HEAPS` heaps.
    pub fn with_heap(mut self, size: u64, flags: vk::MemoryHeapFlags) -> Self {
        let index = self.memory.memory_heap_count as usize;
        self.memory.memory_heaps[index] = vk::MemoryHeap { size, flags };
        self.memory.memory_heap_count += 1;
        self
    }

    /// Append a memory type bound to `heap_index`
    ///
    /// # Panics
    ///
    /// Panics past `VK_MAX_MEMORY_TYPES` types.
    pub fn with_memory_type(mut self, heap_index: u32, property_flags: vk::MemoryPropertyFlags) -> Self {
        let index = self.memory.memory_type_count as usize;
        self.memory.memory_types[index] = vk::MemoryType {
            property_flags,
            heap_index,
        };
        self.memory.memory_type_count += 1;
        self
    }

    /// Append a queue family
    pub fn with_queue_family(
        mut self,
        queue_flags: vk::QueueFlags,
        queue_count: u32,
        timestamp_valid_bits: u32,
        granularity: vk::Extent3D,
    ) -> Self {
        self.queue_families.push(vk::QueueFamilyProperties {
            queue_flags,
            queue_count,
            timestamp_valid_bits,
            min_image_transfer_granularity: granularity,
        });
        self
    }

    /// Add a base device extension
    pub fn with_extension(mut self, name: &str, spec_version: u32) -> Self {
        self.extensions.push(extension(name, spec_version));
        self
    }

    /// Add a device layer
    pub fn with_layer(mut self, layer: FakeLayer) -> Self {
        self.layers.push(layer);
        self
    }
}

/// Handle accounting shared by a loader and everything it creates
#[derive(Debug, Default)]
pub struct FakeTracker {
    live_instances: Cell<usize>,
    live_devices: Cell<usize>,
    devices_created: Cell<usize>,
    instance_extensions: RefCell<Vec<String>>,
    device_requests: RefCell<Vec<RecordedDeviceRequest>>,
}

/// What a trial device was created with
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDeviceRequest {
    /// Index of the physical device in enumeration order
    pub gpu_index: usize,
    /// Queue family of the single queue
    pub queue_family_index: u32,
    /// Priority of the single queue
    pub queue_priority: f32,
    /// Enabled device extensions
    pub extensions: Vec<String>,
}

impl FakeTracker {
    /// Instances created and not yet dropped
    pub fn live_instances(&self) -> usize {
        self.live_instances.get()
    }

    /// Trial devices created and not yet dropped
    pub fn live_devices(&self) -> usize {
        self.live_devices.get()
    }

    /// Trial devices created so far
    pub fn devices_created(&self) -> usize {
        self.devices_created.get()
    }

    /// Extensions enabled on the most recent instance
    pub fn instance_extensions(&self) -> Vec<String> {
        self.instance_extensions.borrow().clone()
    }

    /// Every trial device request, in creation order
    pub fn device_requests(&self) -> Vec<RecordedDeviceRequest> {
        self.device_requests.borrow().clone()
    }
}

/// Failure table keyed by call name, e.g. `"vkCreateDevice"` or
/// `"vkEnumeratePhysicalDevices (data)"`
type Failures = HashMap<String, vk::Result>;

fn failure(failures: &Failures, call: &str, fetching: bool) -> Option<vk::Result> {
    let phase = if fetching { "data" } else { "count" };
    failures
        .get(&format!("{call} ({phase})"))
        .or_else(|| failures.get(call))
        .copied()
}

fn fill<T: Copy>(items: &[T], count: &mut u32, out: Option<&mut [T]>) -> vk::Result {
    match out {
        None => {
            *count = items.len() as u32;
            vk::Result::SUCCESS
        }
        Some(buf) => {
            let written = buf.len().min(items.len());
            buf[..written].copy_from_slice(&items[..written]);
            *count = written as u32;
            if written < items.len() {
                vk::Result::INCOMPLETE
            } else {
                vk::Result::SUCCESS
            }
        }
    }
}

fn layer_extensions<'a>(layers: &'a [FakeLayer], name: &CStr) -> Option<&'a [vk::ExtensionProperties]> {
    let name = name.to_string_lossy();
    layers
        .iter()
        .find(|layer| layer.name() == name)
        .map(|layer| layer.extensions.as_slice())
}

/// Extensions visible for an optional layer filter; an unknown layer yields an error
fn scoped_extensions<'a>(
    base: &'a [vk::ExtensionProperties],
    layers: &'a [FakeLayer],
    layer: Option<&CStr>,
) -> std::result::Result<&'a [vk::ExtensionProperties], vk::Result> {
    match layer {
        None => Ok(base),
        Some(name) => layer_extensions(layers, name).ok_or(vk::Result::ERROR_LAYER_NOT_PRESENT),
    }
}

/// In-memory loader
#[derive(Debug, Clone, Default)]
pub struct FakeLoader {
    /// Base instance extensions
    pub extensions: Vec<vk::ExtensionProperties>,
    /// Instance layers
    pub layers: Vec<FakeLayer>,
    /// Physical devices in enumeration order
    pub devices: Vec<FakeDevice>,
    failures: Failures,
    tracker: Rc<FakeTracker>,
}

impl FakeLoader {
    /// A loader reporting nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base instance extension
    pub fn with_extension(mut self, name: &str, spec_version: u32) -> Self {
        self.extensions.push(extension(name, spec_version));
        self
    }

    /// Add an instance layer
    pub fn with_layer(mut self, layer: FakeLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a physical device
    pub fn with_device(mut self, device: FakeDevice) -> Self {
        self.devices.push(device);
        self
    }

    /// Make `call` return `status`
    ///
    /// `call` is either a bare entry point name, matching every phase, or
    /// `"<name> (count)"` / `"<name> (data)"` for one phase of an enumeration.
    pub fn fail_on(mut self, call: &str, status: vk::Result) -> Self {
        self.failures.insert(call.to_string(), status);
        self
    }

    /// Handle accounting for this loader
    pub fn tracker(&self) -> Rc<FakeTracker> {
        Rc::clone(&self.tracker)
    }
}

impl Loader for FakeLoader {
    type Instance = FakeInstance;

    fn enumerate_instance_extension_properties(
        &self,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        if let Some(status) = failure(&self.failures, "vkEnumerateInstanceExtensionProperties", out.is_some()) {
            return status;
        }
        match scoped_extensions(&self.extensions, &self.layers, layer) {
            Ok(items) => fill(items, count, out),
            Err(status) => status,
        }
    }

    fn enumerate_instance_layer_properties(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result {
        if let Some(status) = failure(&self.failures, "vkEnumerateInstanceLayerProperties", out.is_some()) {
            return status;
        }
        let layers: Vec<vk::LayerProperties> = self.layers.iter().map(|layer| layer.properties).collect();
        fill(&layers, count, out)
    }

    fn create_instance(&self, extensions: &[&CStr]) -> Result<FakeInstance> {
        if let Some(&status) = self.failures.get("vkCreateInstance") {
            return Err(VkInfoError::call("vkCreateInstance", status));
        }
        *self.tracker.instance_extensions.borrow_mut() = extensions
            .iter()
            .map(|ext| ext.to_string_lossy().into_owned())
            .collect();
        self.tracker.live_instances.set(self.tracker.live_instances.get() + 1);
        Ok(FakeInstance {
            devices: self.devices.clone(),
            failures: self.failures.clone(),
            tracker: Rc::clone(&self.tracker),
        })
    }
}

/// Instance created by [`FakeLoader`]
#[derive(Debug)]
pub struct FakeInstance {
    devices: Vec<FakeDevice>,
    failures: Failures,
    tracker: Rc<FakeTracker>,
}

impl FakeInstance {
    fn gpu_index(gpu: vk::PhysicalDevice) -> usize {
        (gpu.as_raw() - 1) as usize
    }

    /// # Panics
    ///
    /// Panics on a handle this instance never handed out.
    fn device(&self, gpu: vk::PhysicalDevice) -> &FakeDevice {
        &self.devices[Self::gpu_index(gpu)]
    }
}

impl InstanceApi for FakeInstance {
    type Device = FakeDeviceHandle;

    fn enumerate_physical_devices(
        &self,
        count: &mut u32,
        out: Option<&mut [vk::PhysicalDevice]>,
    ) -> vk::Result {
        if let Some(status) = failure(&self.failures, "vkEnumeratePhysicalDevices", out.is_some()) {
            return status;
        }
        let handles: Vec<vk::PhysicalDevice> = (1..=self.devices.len() as u64)
            .map(vk::PhysicalDevice::from_raw)
            .collect();
        fill(&handles, count, out)
    }

    fn physical_device_properties(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceProperties {
        self.device(gpu).properties
    }

    fn physical_device_memory_properties(
        &self,
        gpu: vk::PhysicalDevice,
    ) -> vk::PhysicalDeviceMemoryProperties {
        self.device(gpu).memory
    }

    fn physical_device_features(&self, gpu: vk::PhysicalDevice) -> vk::PhysicalDeviceFeatures {
        self.device(gpu).features
    }

    fn physical_device_queue_family_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::QueueFamilyProperties]>,
    ) {
        fill(&self.device(gpu).queue_families, count, out);
    }

    fn enumerate_device_layer_properties(
        &self,
        gpu: vk::PhysicalDevice,
        count: &mut u32,
        out: Option<&mut [vk::LayerProperties]>,
    ) -> vk::Result {
        if let Some(status) = failure(&self.failures, "vkEnumerateDeviceLayerProperties", out.is_some()) {
            return status;
        }
        let layers: Vec<vk::LayerProperties> =
            self.device(gpu).layers.iter().map(|layer| layer.properties).collect();
        fill(&layers, count, out)
    }

    fn enumerate_device_extension_properties(
        &self,
        gpu: vk::PhysicalDevice,
        layer: Option<&CStr>,
        count: &mut u32,
        out: Option<&mut [vk::ExtensionProperties]>,
    ) -> vk::Result {
        if let Some(status) = failure(&self.failures, "vkEnumerateDeviceExtensionProperties", out.is_some()) {
            return status;
        }
        let device = self.device(gpu);
        match scoped_extensions(&device.extensions, &device.layers, layer) {
            Ok(items) => fill(items, count, out),
            Err(status) => status,
        }
    }

    fn create_device(&self, gpu: vk::PhysicalDevice, request: &DeviceRequest<'_>) -> Result<FakeDeviceHandle> {
        if let Some(&status) = self.failures.get("vkCreateDevice") {
            return Err(VkInfoError::call("vkCreateDevice", status));
        }
        let gpu_index = Self::gpu_index(gpu);
        if request.queue_family_index as usize >= self.devices[gpu_index].queue_families.len() {
            return Err(VkInfoError::call("vkCreateDevice", vk::Result::ERROR_INITIALIZATION_FAILED));
        }

        self.tracker.device_requests.borrow_mut().push(RecordedDeviceRequest {
            gpu_index,
            queue_family_index: request.queue_family_index,
            queue_priority: request.queue_priority,
            extensions: request
                .extensions
                .iter()
                .map(|ext| ext.to_string_lossy().into_owned())
                .collect(),
        });
        self.tracker.devices_created.set(self.tracker.devices_created.get() + 1);
        self.tracker.live_devices.set(self.tracker.live_devices.get() + 1);
        Ok(FakeDeviceHandle {
            tracker: Rc::clone(&self.tracker),
        })
    }
}

impl Drop for FakeInstance {
    fn drop(&mut self) {
        self.tracker.live_instances.set(self.tracker.live_instances.get() - 1);
    }
}

/// Trial device created by [`FakeInstance`]
#[derive(Debug)]
pub struct FakeDeviceHandle {
    tracker: Rc<FakeTracker>,
}

impl Drop for FakeDeviceHandle {
    fn drop(&mut self) {
        self.tracker.live_devices.set(self.tracker.live_devices.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_two_call() {
        let items = [1u32, 2, 3];
        let mut count = 0;
        assert_eq!(fill(&items, &mut count, None), vk::Result::SUCCESS);
        assert_eq!(count, 3);

        let mut short = [0u32; 2];
        assert_eq!(fill(&items, &mut count, Some(&mut short)), vk::Result::INCOMPLETE);
        assert_eq!(count, 2);
        assert_eq!(short, [1, 2]);
    }

    #[test]
    fn test_failure_lookup_by_phase() {
        let loader = FakeLoader::new()
            .with_extension("VK_KHR_surface", 25)
            .fail_on("vkEnumerateInstanceExtensionProperties (data)", vk::Result::ERROR_OUT_OF_HOST_MEMORY);

        let mut count = 0;
        assert_eq!(
            loader.enumerate_instance_extension_properties(None, &mut count, None),
            vk::Result::SUCCESS
        );
        let mut buf = vec![vk::ExtensionProperties::default(); count as usize];
        assert_eq!(
            loader.enumerate_instance_extension_properties(None, &mut count, Some(&mut buf)),
            vk::Result::ERROR_OUT_OF_HOST_MEMORY
        );
    }

    #[test]
    fn test_unknown_layer_is_reported() {
        let loader = FakeLoader::new();
        let mut count = 0;
        assert_eq!(
            loader.enumerate_instance_extension_properties(Some(c"VK_LAYER_missing"), &mut count, None),
            vk::Result::ERROR_LAYER_NOT_PRESENT
        );
    }

    #[test]
    fn test_handles_are_tracked() {
        let loader = FakeLoader::new().with_device(
            FakeDevice::new("Fake GPU", vk::PhysicalDeviceType::CPU).with_queue_family(
                vk::QueueFlags::COMPUTE,
                1,
                0,
                vk::Extent3D { width: 1, height: 1, depth: 1 },
            ),
        );
        let tracker = loader.tracker();
        let instance = loader.create_instance(&[]).unwrap();
        assert_eq!(tracker.live_instances(), 1);

        let features = vk::PhysicalDeviceFeatures::default();
        let request = DeviceRequest {
            queue_family_index: 0,
            queue_priority: 0.0,
            extensions: &[],
            features: &features,
        };
        let device = instance
            .create_device(vk::PhysicalDevice::from_raw(1), &request)
            .unwrap();
        assert_eq!(tracker.live_devices(), 1);

        drop(device);
        drop(instance);
        assert_eq!(tracker.live_devices(), 0);
        assert_eq!(tracker.live_instances(), 0);
        assert_eq!(tracker.devices_created(), 1);
    }
}
