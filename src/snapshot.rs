//! Capability snapshot produced by the gatherer and consumed by the report

use std::ffi::c_char;

use ash::vk;

use crate::version::Version;

/// Everything gathered from the runtime in one pass
#[derive(Debug, Clone, Default)]
pub struct CapabilitySnapshot {
    /// Instance extensions not provided by any layer
    pub extensions: Vec<ExtensionInfo>,
    /// Instance layers, each with the extensions it provides
    pub layers: Vec<LayerInfo>,
    /// Physical devices in enumeration order
    pub devices: Vec<DeviceSnapshot>,
}

/// An extension name with its spec version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionInfo {
    /// Extension name, e.g. `VK_KHR_swapchain`
    pub name: String,
    /// Extension spec version
    pub spec_version: u32,
}

/// A layer and the extensions reported for that layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    /// Layer name
    pub name: String,
    /// Packed API version the layer was written against
    pub spec_version: u32,
    /// Layer's own version number
    pub implementation_version: u32,
    /// Free-form description
    pub description: String,
    /// Extensions this layer provides
    pub extensions: Vec<ExtensionInfo>,
}

/// Per-device capabilities
#[derive(Debug, Clone)]
pub struct DeviceSnapshot {
    /// Identity and version fields
    pub properties: DeviceProperties,
    /// Memory heaps and types
    pub memory: MemoryLayout,
    /// Full feature block, as passed to trial device creation
    pub features: vk::PhysicalDeviceFeatures,
    /// Queue families in index order
    pub queue_families: Vec<QueueFamily>,
    /// Device extensions not provided by any layer
    pub extensions: Vec<ExtensionInfo>,
    /// Device layers, each with the device extensions it provides
    pub layers: Vec<LayerInfo>,
}

/// Identity fields of a physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Marketing name reported by the driver
    pub name: String,
    /// Integrated, discrete, virtual, CPU, ...
    pub device_type: vk::PhysicalDeviceType,
    /// Packed supported API version
    pub api_version: u32,
    /// Vendor-specific driver version
    pub driver_version: u32,
    /// PCI vendor ID
    pub vendor_id: u32,
    /// Vendor-specific device ID
    pub device_id: u32,
}

/// Memory heaps and the memory types carved out of them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLayout {
    /// Heaps in index order
    pub heaps: Vec<MemoryHeap>,
    /// Memory types in index order
    pub types: Vec<MemoryType>,
}

/// A memory heap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryHeap {
    /// Size in bytes
    pub size: u64,
    /// Heap flags
    pub flags: vk::MemoryHeapFlags,
}

/// A memory type, bound to one heap by index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryType {
    /// Index into [`MemoryLayout::heaps`]
    pub heap_index: u32,
    /// Memory property flags
    pub flags: vk::MemoryPropertyFlags,
}

/// A queue family descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamily {
    /// Capability flags
    pub flags: vk::QueueFlags,
    /// Number of queues in the family
    pub queue_count: u32,
    /// Meaningful bits in timestamps, 0 if unsupported
    pub timestamp_valid_bits: u32,
    /// Minimum image transfer granularity
    pub min_image_transfer_granularity: vk::Extent3D,
}

impl MemoryLayout {
    /// Memory types bound to `heap`, paired with their type index
    pub fn types_for_heap(&self, heap: u32) -> impl Iterator<Item = (usize, &MemoryType)> {
        self.types
            .iter()
            .enumerate()
            .filter(move |(_, ty)| ty.heap_index == heap)
    }

    /// Memory types whose heap index points past the heap list
    pub fn orphaned_types(&self) -> impl Iterator<Item = (usize, &MemoryType)> {
        let heap_count = self.heaps.len();
        self.types
            .iter()
            .enumerate()
            .filter(move |(_, ty)| ty.heap_index as usize >= heap_count)
    }
}

impl ExtensionInfo {
    /// Whether any of `lists` contains an extension called `name`
    pub fn any_named<'a>(
        name: &str,
        mut lists: impl Iterator<Item = &'a [ExtensionInfo]>,
    ) -> bool {
        lists.any(|list| list.iter().any(|ext| ext.name == name))
    }
}

impl From<&vk::ExtensionProperties> for ExtensionInfo {
    fn from(props: &vk::ExtensionProperties) -> Self {
        Self {
            name: fixed_str(&props.extension_name),
            spec_version: props.spec_version,
        }
    }
}

impl LayerInfo {
    /// Build from raw layer properties and the extensions queried for it
    pub fn new(props: &vk::LayerProperties, extensions: Vec<ExtensionInfo>) -> Self {
        Self {
            name: fixed_str(&props.layer_name),
            spec_version: props.spec_version,
            implementation_version: props.implementation_version,
            description: fixed_str(&props.description),
            extensions,
        }
    }

    /// Unpacked spec version
    pub fn spec(&self) -> Version {
        Version::from_packed(self.spec_version)
    }
}

impl From<&vk::PhysicalDeviceProperties> for DeviceProperties {
    fn from(props: &vk::PhysicalDeviceProperties) -> Self {
        Self {
            name: fixed_str(&props.device_name),
            device_type: props.device_type,
            api_version: props.api_version,
            driver_version: props.driver_version,
            vendor_id: props.vendor_id,
            device_id: props.device_id,
        }
    }
}

impl From<&vk::PhysicalDeviceMemoryProperties> for MemoryLayout {
    fn from(props: &vk::PhysicalDeviceMemoryProperties) -> Self {
        let heap_count = (props.memory_heap_count as usize).min(props.memory_heaps.len());
        let type_count = (props.memory_type_count as usize).min(props.memory_types.len());
        Self {
            heaps: props.memory_heaps[..heap_count]
                .iter()
                .map(|heap| MemoryHeap {
                    size: heap.size,
                    flags: heap.flags,
                })
                .collect(),
            types: props.memory_types[..type_count]
                .iter()
                .map(|ty| MemoryType {
                    heap_index: ty.heap_index,
                    flags: ty.property_flags,
                })
                .collect(),
        }
    }
}

impl From<&vk::QueueFamilyProperties> for QueueFamily {
    fn from(props: &vk::QueueFamilyProperties) -> Self {
        Self {
            flags: props.queue_flags,
            queue_count: props.queue_count,
            timestamp_valid_bits: props.timestamp_valid_bits,
            min_image_transfer_granularity: props.min_image_transfer_granularity,
        }
    }
}

/// Read a NUL-terminated string out of a fixed-size driver array
///
/// A missing terminator takes the whole array; invalid UTF-8 is replaced.
pub fn fixed_str(raw: &[c_char]) -> String {
    let bytes: Vec<u8> = raw
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Copy `value` into a fixed-size driver array, truncating to leave room for NUL
pub fn write_fixed_str(dst: &mut [c_char], value: &str) {
    dst.fill(0);
    let len = value.len().min(dst.len().saturating_sub(1));
    for (slot, byte) in dst.iter_mut().zip(&value.as_bytes()[..len]) {
        *slot = *byte as c_char;
    }
}
