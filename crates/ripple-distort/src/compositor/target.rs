/// Intermediate color target written by the scene pass and sampled by the
/// distortion pass.
pub(super) struct SceneTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    size: (u32, u32),
}

impl SceneTarget {
    pub(super) fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: (u32, u32)) -> Self {
        let size = clamp_extent(size);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ripple scene target"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        log::debug!("scene target: {}x{} {:?}", size.0, size.1, format);
        Self { _texture: texture, view, size }
    }

    #[inline]
    pub(super) fn matches(&self, size: (u32, u32)) -> bool {
        self.size == clamp_extent(size)
    }
}

/// wgpu rejects zero-extent textures; a minimized window still renders into
/// a 1x1 target.
fn clamp_extent((w, h): (u32, u32)) -> (u32, u32) {
    (w.max(1), h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_extent_is_padded() {
        assert_eq!(clamp_extent((0, 0)), (1, 1));
        assert_eq!(clamp_extent((640, 0)), (640, 1));
        assert_eq!(clamp_extent((640, 480)), (640, 480));
    }
}
