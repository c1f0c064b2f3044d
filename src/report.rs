//! Text report rendering
//!
//! The report is the `Display` form of [`CapabilitySnapshot`]. Output order
//! follows the snapshot's collection order; nothing is sorted or filtered.

use std::fmt;

use crate::labels::{device_type_label, memory_heap_labels, memory_property_labels, queue_flags_code};
use crate::snapshot::{CapabilitySnapshot, DeviceSnapshot, ExtensionInfo, LayerInfo, MemoryLayout, QueueFamily};
use crate::version::Version;

const INDENT: &str = "  ";

/// Bytes per MiB, for heap sizes
const MIB: u64 = 1 << 20;

impl fmt::Display for CapabilitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instance Extensions [{}]:", self.extensions.len())?;
        write_extensions(f, &self.extensions, INDENT)?;
        if !self.layers.is_empty() {
            writeln!(f, "Instance Layers [{}]:", self.layers.len())?;
            write_layers(f, &self.layers, INDENT)?;
        }

        writeln!(f, "PhysicalDevices [{}]:", self.devices.len())?;
        for device in &self.devices {
            write!(f, "{device}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeviceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = &self.properties;
        writeln!(
            f,
            "{INDENT}\"{}\" ({}) {}/{:#x} [{:04x}:{:04x}]",
            props.name,
            device_type_label(props.device_type),
            Version::from_packed(props.api_version),
            props.driver_version,
            props.vendor_id,
            props.device_id
        )?;

        write_memory(f, &self.memory)?;
        for (index, family) in self.queue_families.iter().enumerate() {
            write_queue_family(f, index, family)?;
        }

        let nested = INDENT.repeat(3);
        if !self.extensions.is_empty() {
            writeln!(f, "{INDENT}{INDENT}Extensions [{}]:", self.extensions.len())?;
            write_extensions(f, &self.extensions, &nested)?;
        }
        if !self.layers.is_empty() {
            writeln!(f, "{INDENT}{INDENT}Layers [{}]:", self.layers.len())?;
            write_layers(f, &self.layers, &nested)?;
        }
        Ok(())
    }
}

fn write_memory(f: &mut fmt::Formatter<'_>, memory: &MemoryLayout) -> fmt::Result {
    for (index, heap) in memory.heaps.iter().enumerate() {
        write!(
            f,
            "{INDENT}{INDENT}Heap {index}: {} MiB (0x{:x} B)",
            heap.size / MIB,
            heap.size
        )?;
        for label in memory_heap_labels(heap.flags) {
            write!(f, " {label}")?;
        }
        writeln!(f)?;

        for (type_index, ty) in memory.types_for_heap(index as u32) {
            write!(f, "{INDENT}{INDENT}{INDENT}Type {type_index}:")?;
            for label in memory_property_labels(ty.flags) {
                write!(f, " {label}")?;
            }
            writeln!(f)?;
        }
    }
    Ok(())
}

fn write_queue_family(f: &mut fmt::Formatter<'_>, index: usize, family: &QueueFamily) -> fmt::Result {
    let granularity = family.min_image_transfer_granularity;
    writeln!(
        f,
        "{INDENT}{INDENT}Queue Family {index}: {}x {}",
        family.queue_count,
        queue_flags_code(family.flags)
    )?;
    writeln!(f, "{INDENT}{INDENT}{INDENT}timestampValidBits: {}b", family.timestamp_valid_bits)?;
    writeln!(
        f,
        "{INDENT}{INDENT}{INDENT}minImageTransferGranularity: ({},{},{})",
        granularity.width, granularity.height, granularity.depth
    )
}

fn write_extensions(f: &mut fmt::Formatter<'_>, extensions: &[ExtensionInfo], prefix: &str) -> fmt::Result {
    for ext in extensions {
        writeln!(f, "{prefix}{} (v{})", ext.name, ext.spec_version)?;
    }
    Ok(())
}

fn write_layers(f: &mut fmt::Formatter<'_>, layers: &[LayerInfo], prefix: &str) -> fmt::Result {
    let ext_prefix = format!("{prefix}{INDENT}{INDENT}");
    for layer in layers {
        writeln!(f, "{prefix}{} {}/{}", layer.name, layer.spec(), layer.implementation_version)?;
        writeln!(f, "{prefix}{INDENT}{}", layer.description)?;
        if !layer.extensions.is_empty() {
            writeln!(f, "{prefix}{INDENT}Extensions [{}]:", layer.extensions.len())?;
        }
        write_extensions(f, &layer.extensions, &ext_prefix)?;
    }
    Ok(())
}
