//! Fixed label tables for Vulkan enumerants and flag bits

use ash::vk;

/// Label printed for a device type outside the known set
pub const UNKNOWN_LABEL: &str = "<UNKNOWN>";

/// Label printed for a status code outside the known set
pub const UNKNOWN_STATUS: &str = "<unknown VkResult>";

/// Known status codes and their Vulkan names
pub const STATUS_NAMES: &[(vk::Result, &str)] = &[
    (vk::Result::SUCCESS, "VK_SUCCESS"),
    (vk::Result::NOT_READY, "VK_NOT_READY"),
    (vk::Result::TIMEOUT, "VK_TIMEOUT"),
    (vk::Result::EVENT_SET, "VK_EVENT_SET"),
    (vk::Result::EVENT_RESET, "VK_EVENT_RESET"),
    (vk::Result::INCOMPLETE, "VK_INCOMPLETE"),
    (vk::Result::ERROR_OUT_OF_HOST_MEMORY, "VK_ERROR_OUT_OF_HOST_MEMORY"),
    (vk::Result::ERROR_OUT_OF_DEVICE_MEMORY, "VK_ERROR_OUT_OF_DEVICE_MEMORY"),
    (vk::Result::ERROR_INITIALIZATION_FAILED, "VK_ERROR_INITIALIZATION_FAILED"),
    (vk::Result::ERROR_DEVICE_LOST, "VK_ERROR_DEVICE_LOST"),
    (vk::Result::ERROR_MEMORY_MAP_FAILED, "VK_ERROR_MEMORY_MAP_FAILED"),
    (vk::Result::ERROR_LAYER_NOT_PRESENT, "VK_ERROR_LAYER_NOT_PRESENT"),
    (vk::Result::ERROR_EXTENSION_NOT_PRESENT, "VK_ERROR_EXTENSION_NOT_PRESENT"),
    (vk::Result::ERROR_INCOMPATIBLE_DRIVER, "VK_ERROR_INCOMPATIBLE_DRIVER"),
];

/// Physical device types and their report labels
pub const DEVICE_TYPE_LABELS: &[(vk::PhysicalDeviceType, &str)] = &[
    (vk::PhysicalDeviceType::OTHER, "OTHER"),
    (vk::PhysicalDeviceType::INTEGRATED_GPU, "INTEGRATED_GPU"),
    (vk::PhysicalDeviceType::DISCRETE_GPU, "DISCRETE_GPU"),
    (vk::PhysicalDeviceType::VIRTUAL_GPU, "VIRTUAL_GPU"),
    (vk::PhysicalDeviceType::CPU, "CPU"),
];

/// Queue capability bits, their labels and their single-character codes
///
/// Table order is the character order of the queue flag code.
pub const QUEUE_FLAG_LABELS: &[(vk::QueueFlags, &str, char)] = &[
    (vk::QueueFlags::GRAPHICS, "GRAPHICS", 'G'),
    (vk::QueueFlags::COMPUTE, "COMPUTE", 'C'),
    (vk::QueueFlags::TRANSFER, "TRANSFER", 'T'),
    (vk::QueueFlags::SPARSE_BINDING, "SPARSE", 'S'),
];

/// Memory property bits in report order
pub const MEMORY_PROPERTY_LABELS: &[(vk::MemoryPropertyFlags, &str)] = &[
    (vk::MemoryPropertyFlags::DEVICE_LOCAL, "DEVICE_LOCAL"),
    (vk::MemoryPropertyFlags::HOST_VISIBLE, "HOST_VISIBLE"),
    (vk::MemoryPropertyFlags::HOST_COHERENT, "COHERENT"),
    (vk::MemoryPropertyFlags::HOST_CACHED, "CACHED"),
    (vk::MemoryPropertyFlags::LAZILY_ALLOCATED, "LAZILY_ALLOCATED"),
];

/// Memory heap bits in report order
pub const MEMORY_HEAP_LABELS: &[(vk::MemoryHeapFlags, &str)] =
    &[(vk::MemoryHeapFlags::DEVICE_LOCAL, "DEVICE_LOCAL")];

/// Human-readable name of a status code
pub fn status_name(status: vk::Result) -> &'static str {
    STATUS_NAMES
        .iter()
        .find(|(code, _)| *code == status)
        .map_or(UNKNOWN_STATUS, |&(_, name)| name)
}

/// Report label of a physical device type
pub fn device_type_label(device_type: vk::PhysicalDeviceType) -> &'static str {
    DEVICE_TYPE_LABELS
        .iter()
        .find(|(ty, _)| *ty == device_type)
        .map_or(UNKNOWN_LABEL, |&(_, label)| label)
}

/// Report label of a single queue capability bit
///
/// Anything that is not exactly one of the four known bits maps to
/// [`UNKNOWN_LABEL`].
pub fn queue_flag_label(bit: vk::QueueFlags) -> &'static str {
    QUEUE_FLAG_LABELS
        .iter()
        .find(|(flag, _, _)| *flag == bit)
        .map_or(UNKNOWN_LABEL, |&(_, label, _)| label)
}

/// Labels of every known queue capability set in `flags`, in table order
pub fn queue_flag_labels(flags: vk::QueueFlags) -> Vec<&'static str> {
    QUEUE_FLAG_LABELS
        .iter()
        .filter(|(flag, _, _)| flags.contains(*flag))
        .map(|(_, label, _)| *label)
        .collect()
}

/// Fixed four-character code for queue capabilities, e.g. `GC__`
pub fn queue_flags_code(flags: vk::QueueFlags) -> String {
    QUEUE_FLAG_LABELS
        .iter()
        .map(|(flag, _, code)| if flags.contains(*flag) { *code } else { '_' })
        .collect()
}

/// Labels of every known memory property set in `flags`, in report order
pub fn memory_property_labels(flags: vk::MemoryPropertyFlags) -> Vec<&'static str> {
    MEMORY_PROPERTY_LABELS
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, label)| *label)
        .collect()
}

/// Labels of every known heap flag set in `flags`
pub fn memory_heap_labels(flags: vk::MemoryHeapFlags) -> Vec<&'static str> {
    MEMORY_HEAP_LABELS
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, label)| *label)
        .collect()
}
