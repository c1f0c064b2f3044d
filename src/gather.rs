//! Capability gathering
//!
//! Walks the runtime in a fixed order and builds a [`CapabilitySnapshot`].
//! The first failing call aborts the walk; no partial snapshot is returned.

use std::ffi::{CStr, CString};

use ash::vk;
use log::{debug, info, warn};

use crate::config::GatherConfig;
use crate::enumerate::enumerate;
use crate::error::Result;
use crate::labels::{device_type_label, queue_flag_labels};
use crate::runtime::{DeviceRequest, InstanceApi, Loader};
use crate::snapshot::{
    CapabilitySnapshot, DeviceProperties, DeviceSnapshot, ExtensionInfo, LayerInfo, MemoryLayout,
    QueueFamily,
};

/// Gather instance- and device-level capabilities
pub fn gather<L: Loader>(loader: &L, config: &GatherConfig) -> Result<CapabilitySnapshot> {
    let extensions = instance_extensions(loader, None)?;
    debug!("{} instance extension(s)", extensions.len());

    let layer_props = enumerate("vkEnumerateInstanceLayerProperties", |count, out| {
        loader.enumerate_instance_layer_properties(count, out)
    })?;
    debug!("{} instance layer(s)", layer_props.len());
    let layers = layer_props
        .iter()
        .map(|props| {
            let layer_extensions = instance_extensions(loader, Some(layer_name(props)))?;
            Ok(LayerInfo::new(props, layer_extensions))
        })
        .collect::<Result<Vec<_>>>()?;

    let enabled = select_extensions(&config.instance_extensions, &extensions, &layers);
    info!("Enabling instance extensions: {}", join_names(&enabled));
    let instance = loader.create_instance(&enabled)?;

    let gpus = enumerate("vkEnumeratePhysicalDevices", |count, out| {
        instance.enumerate_physical_devices(count, out)
    })?;
    debug!("{} physical device(s)", gpus.len());

    let devices = gpus
        .iter()
        .map(|&gpu| gather_device(&instance, gpu, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(CapabilitySnapshot {
        extensions,
        layers,
        devices,
    })
}

/// Gather one physical device and prove a logical device can be created on it
pub fn gather_device<I: InstanceApi>(
    instance: &I,
    gpu: vk::PhysicalDevice,
    config: &GatherConfig,
) -> Result<DeviceSnapshot> {
    let properties = DeviceProperties::from(&instance.physical_device_properties(gpu));
    let memory = MemoryLayout::from(&instance.physical_device_memory_properties(gpu));
    let features = instance.physical_device_features(gpu);
    debug!(
        "Gathering \"{}\" ({})",
        properties.name,
        device_type_label(properties.device_type)
    );

    let queue_families: Vec<QueueFamily> = enumerate("vkGetPhysicalDeviceQueueFamilyProperties", |count, out| {
        instance.physical_device_queue_family_properties(gpu, count, out);
        vk::Result::SUCCESS
    })?
    .iter()
    .map(QueueFamily::from)
    .collect();
    for (index, family) in queue_families.iter().enumerate() {
        debug!(
            "  queue family {index}: {}x {}",
            family.queue_count,
            queue_flag_labels(family.flags).join(" | ")
        );
    }

    for (index, ty) in memory.orphaned_types() {
        warn!(
            "\"{}\": memory type {index} references missing heap {}",
            properties.name, ty.heap_index
        );
    }

    let layer_props = enumerate("vkEnumerateDeviceLayerProperties", |count, out| {
        instance.enumerate_device_layer_properties(gpu, count, out)
    })?;
    let extensions = device_extensions(instance, gpu, None)?;
    let layers = layer_props
        .iter()
        .map(|props| {
            let layer_extensions = device_extensions(instance, gpu, Some(layer_name(props)))?;
            Ok(LayerInfo::new(props, layer_extensions))
        })
        .collect::<Result<Vec<_>>>()?;

    let enabled = select_extensions(&config.device_extensions, &extensions, &layers);
    let request = DeviceRequest {
        queue_family_index: config.queue_family_index,
        queue_priority: config.queue_priority,
        extensions: &enabled,
        features: &features,
    };
    debug!(
        "Creating trial device for \"{}\" with extensions: {}",
        properties.name,
        join_names(&enabled)
    );
    drop(instance.create_device(gpu, &request)?);

    Ok(DeviceSnapshot {
        properties,
        memory,
        features,
        queue_families,
        extensions,
        layers,
    })
}

fn instance_extensions<L: Loader>(loader: &L, layer: Option<CString>) -> Result<Vec<ExtensionInfo>> {
    let props = enumerate("vkEnumerateInstanceExtensionProperties", |count, out| {
        loader.enumerate_instance_extension_properties(layer.as_deref(), count, out)
    })?;
    Ok(props.iter().map(ExtensionInfo::from).collect())
}

fn device_extensions<I: InstanceApi>(
    instance: &I,
    gpu: vk::PhysicalDevice,
    layer: Option<CString>,
) -> Result<Vec<ExtensionInfo>> {
    let props = enumerate("vkEnumerateDeviceExtensionProperties", |count, out| {
        instance.enumerate_device_extension_properties(gpu, layer.as_deref(), count, out)
    })?;
    Ok(props.iter().map(ExtensionInfo::from).collect())
}

/// Layer name as an owned C string, for passing back to the runtime
fn layer_name(props: &vk::LayerProperties) -> CString {
    // fixed_str stops at the first NUL, so CString::new cannot fail here
    let name = crate::snapshot::fixed_str(&props.layer_name);
    CString::new(name).unwrap_or_default()
}

/// Keep the desired extensions offered at base level or by any layer
pub fn select_extensions(
    desired: &[&'static CStr],
    base: &[ExtensionInfo],
    layers: &[LayerInfo],
) -> Vec<&'static CStr> {
    desired
        .iter()
        .copied()
        .filter(|name| {
            let name = name.to_string_lossy();
            let lists = std::iter::once(base).chain(layers.iter().map(|layer| layer.extensions.as_slice()));
            ExtensionInfo::any_named(&name, lists)
        })
        .collect()
}

fn join_names(names: &[&CStr]) -> String {
    if names.is_empty() {
        return "(none)".to_string();
    }
    names
        .iter()
        .map(|name| name.to_string_lossy())
        .collect::<Vec<_>>()
        .join(", ")
}
