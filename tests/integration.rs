use ash::vk;
use pretty_assertions::assert_eq;
use vkinfo::runtime::fake::{FakeDevice, FakeLayer, FakeLoader};
use vkinfo::{gather, GatherConfig};

/// Mirror of the binary: report on stdout, one diagnostic line on stderr
fn run(loader: &FakeLoader) -> (String, String, i32) {
    match gather(loader, &GatherConfig::default()) {
        Ok(snapshot) => (snapshot.to_string(), String::new(), 0),
        Err(e) => (String::new(), format!("{e}\n"), 1),
    }
}

fn single_gpu() -> FakeDevice {
    FakeDevice::new("Fake GPU", vk::PhysicalDeviceType::DISCRETE_GPU)
        .with_ids(vk::make_api_version(0, 1, 3, 0), 0x1, 0x10de, 0x2204)
        .with_heap(268435456, vk::MemoryHeapFlags::DEVICE_LOCAL)
        .with_memory_type(
            0,
            vk::MemoryPropertyFlags::DEVICE_LOCAL | vk::MemoryPropertyFlags::HOST_VISIBLE,
        )
        .with_queue_family(
            vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE,
            1,
            36,
            vk::Extent3D { width: 1, height: 1, depth: 1 },
        )
}

#[test]
fn test_single_device_report() {
    let loader = FakeLoader::new().with_device(single_gpu());
    let tracker = loader.tracker();

    let (stdout, stderr, code) = run(&loader);
    assert_eq!(code, 0);
    assert!(stderr.is_empty());

    let expected = "\
Instance Extensions [0]:
PhysicalDevices [1]:
  \"Fake GPU\" (DISCRETE_GPU) 1.3.0/0x1 [10de:2204]
    Heap 0: 256 MiB (0x10000000 B) DEVICE_LOCAL
      Type 0: DEVICE_LOCAL HOST_VISIBLE
    Queue Family 0: 1x GC__
      timestampValidBits: 36b
      minImageTransferGranularity: (1,1,1)
";
    assert_eq!(stdout, expected);
    assert_eq!(tracker.devices_created(), 1);
    assert_eq!(tracker.live_devices(), 0);
    assert_eq!(tracker.live_instances(), 0);
}

#[test]
fn test_first_extension_query_failure() {
    let loader = FakeLoader::new().with_device(single_gpu()).fail_on(
        "vkEnumerateInstanceExtensionProperties (count)",
        vk::Result::ERROR_INITIALIZATION_FAILED,
    );
    let tracker = loader.tracker();

    let (stdout, stderr, code) = run(&loader);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "vkEnumerateInstanceExtensionProperties (count) failed: VK_ERROR_INITIALIZATION_FAILED (-3)\n"
    );
    assert_eq!(tracker.live_instances(), 0);
    assert_eq!(tracker.devices_created(), 0);
}

#[test]
fn test_unknown_status_code() {
    let loader = FakeLoader::new().fail_on("vkEnumerateInstanceLayerProperties (data)", vk::Result::from_raw(-1000001004));

    let (stdout, stderr, code) = run(&loader);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(
        stderr,
        "vkEnumerateInstanceLayerProperties (data) failed: <unknown VkResult> (-1000001004)\n"
    );
}

#[test]
fn test_full_report_ordering() {
    let loader = FakeLoader::new()
        .with_extension("VK_KHR_surface", 25)
        .with_extension("VK_EXT_debug_report", 10)
        .with_layer(
            FakeLayer::new(
                "VK_LAYER_KHRONOS_validation",
                vk::make_api_version(0, 1, 3, 250),
                1,
                "Khronos Validation Layer",
            )
            .with_extension("VK_EXT_debug_utils", 2),
        )
        .with_device(
            FakeDevice::new("llvmpipe", vk::PhysicalDeviceType::CPU)
                .with_ids(vk::make_api_version(0, 1, 3, 255), 0x1, 0x10005, 0)
                .with_heap(2 << 30, vk::MemoryHeapFlags::DEVICE_LOCAL)
                .with_memory_type(
                    0,
                    vk::MemoryPropertyFlags::DEVICE_LOCAL
                        | vk::MemoryPropertyFlags::HOST_VISIBLE
                        | vk::MemoryPropertyFlags::HOST_COHERENT
                        | vk::MemoryPropertyFlags::HOST_CACHED,
                )
                .with_queue_family(
                    vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER,
                    1,
                    64,
                    vk::Extent3D { width: 1, height: 1, depth: 1 },
                )
                .with_extension("VK_KHR_swapchain", 70),
        )
        .with_device(
            FakeDevice::new("Virtual GPU", vk::PhysicalDeviceType::VIRTUAL_GPU)
                .with_heap(1 << 20, vk::MemoryHeapFlags::empty())
                .with_queue_family(
                    vk::QueueFlags::TRANSFER,
                    4,
                    0,
                    vk::Extent3D { width: 8, height: 8, depth: 8 },
                )
                .with_layer(
                    FakeLayer::new("VK_LAYER_dev", vk::make_api_version(0, 1, 0, 0), 2, "Device layer")
                        .with_extension("VK_KHR_swapchain", 68),
                ),
        );
    let tracker = loader.tracker();

    let (stdout, _, code) = run(&loader);
    assert_eq!(code, 0);

    let expected = "\
Instance Extensions [2]:
  VK_KHR_surface (v25)
  VK_EXT_debug_report (v10)
Instance Layers [1]:
  VK_LAYER_KHRONOS_validation 1.3.250/1
    Khronos Validation Layer
    Extensions [1]:
      VK_EXT_debug_utils (v2)
PhysicalDevices [2]:
  \"llvmpipe\" (CPU) 1.3.255/0x1 [10005:0000]
    Heap 0: 2048 MiB (0x80000000 B) DEVICE_LOCAL
      Type 0: DEVICE_LOCAL HOST_VISIBLE COHERENT CACHED
    Queue Family 0: 1x GCT_
      timestampValidBits: 64b
      minImageTransferGranularity: (1,1,1)
    Extensions [1]:
      VK_KHR_swapchain (v70)
  \"Virtual GPU\" (VIRTUAL_GPU) 0.0.0/0x0 [0000:0000]
    Heap 0: 1 MiB (0x100000 B)
    Queue Family 0: 4x __T_
      timestampValidBits: 0b
      minImageTransferGranularity: (8,8,8)
    Layers [1]:
      VK_LAYER_dev 1.0.0/2
        Device layer
        Extensions [1]:
          VK_KHR_swapchain (v68)
";
    assert_eq!(stdout, expected);

    assert_eq!(tracker.instance_extensions(), vec!["VK_EXT_debug_report".to_string()]);
    let requests = tracker.device_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.extensions == vec!["VK_KHR_swapchain".to_string()]));
}

#[test]
fn test_library_version() {
    assert!(!vkinfo::version().is_empty());
}
