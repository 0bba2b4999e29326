//! Base texture material: the scene pipeline plus per-mesh texture bindings.

use std::borrow::Cow;
use std::num::NonZeroU64;

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::queue::PixelSource;
use crate::uniforms::{MeshUniformBlock, SceneUniformBlock};

use super::geometry::PlaneVertex;

const IMAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// What actually gets uploaded for `pixels`.
///
/// wgpu rejects zero-sized textures and textures larger than the device
/// limit: an empty source becomes one transparent texel, an oversized one is
/// downscaled to fit. The mesh keeps its own size either way.
fn upload_source(pixels: &PixelSource, max_dim: u32) -> Cow<'_, PixelSource> {
    if pixels.is_empty() {
        return Cow::Owned(PixelSource::solid(1, 1, [0, 0, 0, 0]));
    }
    match pixels.downscaled_to_fit(max_dim) {
        Some(fitted) => {
            log::warn!(
                "image {}x{} exceeds the {max_dim}px texture limit; uploading {}x{}",
                pixels.width(),
                pixels.height(),
                fitted.width(),
                fitted.height()
            );
            Cow::Owned(fitted)
        }
        None => Cow::Borrowed(pixels),
    }
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// Pipeline and layouts shared by every image mesh.
///
/// Group 0 carries the frame-wide camera block, group 1 the mesh's model
/// matrix, texture and sampler.
pub(super) struct MaterialTemplate {
    pub pipeline: wgpu::RenderPipeline,
    pub frame_bgl: wgpu::BindGroupLayout,
    pub mesh_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl MaterialTemplate {
    pub(super) fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ripple texture shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/texture.wgsl").into()),
        });

        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ripple scene frame bgl"),
            entries: &[uniform_entry(0, std::mem::size_of::<SceneUniformBlock>())],
        });

        let mesh_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ripple scene mesh bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<MeshUniformBlock>()),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ripple scene pipeline layout"),
            bind_group_layouts: &[&frame_bgl, &mesh_bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ripple scene pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PlaneVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ripple image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self { pipeline, frame_bgl, mesh_bgl, sampler }
    }

    /// Uploads `pixels` and binds them with `model` into a fresh material.
    pub(super) fn instantiate(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &PixelSource,
        model: Mat4,
    ) -> MeshMaterial {
        let pixels = upload_source(pixels, device.limits().max_texture_dimension_2d);

        let size = wgpu::Extent3d {
            width: pixels.width(),
            height: pixels.height(),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ripple image texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: IMAGE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * pixels.width()),
                rows_per_image: Some(pixels.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let model_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ripple mesh model ubo"),
            contents: bytemuck::bytes_of(&MeshUniformBlock { model: model.to_cols_array_2d() }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple mesh bind group"),
            layout: &self.mesh_bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: model_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::TextureView(&view) },
                wgpu::BindGroupEntry { binding: 2, resource: wgpu::BindingResource::Sampler(&self.sampler) },
            ],
        });

        MeshMaterial {
            _texture: texture,
            _view: view,
            _model_ubo: model_ubo,
            bind_group,
        }
    }
}

/// GPU resources owned by one mesh.
///
/// The texture, view and buffer are kept alive for the bind group.
pub(super) struct MeshMaterial {
    _texture: wgpu::Texture,
    _view: wgpu::TextureView,
    _model_ubo: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pixels_upload_one_clear_texel() {
        let empty = PixelSource::new(0, 0, Vec::new()).unwrap();
        let up = upload_source(&empty, 8192);
        assert_eq!((up.width(), up.height()), (1, 1));
        assert_eq!(up.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn oversized_pixels_upload_within_limit() {
        let wide = PixelSource::solid(16384, 1, [255; 4]);
        let up = upload_source(&wide, 8192);
        assert!(matches!(up, Cow::Owned(_)));
        assert_eq!((up.width(), up.height()), (8192, 1));
    }

    #[test]
    fn fitting_pixels_are_borrowed() {
        let px = PixelSource::solid(4, 3, [255; 4]);
        assert!(matches!(upload_source(&px, 8192), Cow::Borrowed(_)));
    }
}
