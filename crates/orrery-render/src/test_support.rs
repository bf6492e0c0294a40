//! Headless device for GPU unit tests.

/// Request any adapter without a surface. Returns `None` on machines without
/// a usable GPU so that tests can skip themselves.
pub fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    create_test_device_with_limits(wgpu::Limits::default())
}

/// Like [`create_test_device`], with the device capped at `limits`.
pub fn create_test_device_with_limits(
    limits: wgpu::Limits,
) -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_limits: limits,
                ..Default::default()
            })
            .await
            .ok()
    })
}
