use ripple_engine::coords::Viewport;
use ripple_engine::render::{RenderCtx, RenderTarget};

use crate::config::DistortConfig;
use crate::queue::ImageNode;
use crate::uniforms::{DistortUniforms, SceneUniformBlock};

use super::camera::{plane_model, Camera};
use super::distort_pass::DistortPass;
use super::geometry::PlaneGeometry;
use super::material::{MaterialTemplate, MeshMaterial};
use super::target::SceneTarget;
use super::Compositor;

/// wgpu compositor: image planes through a perspective camera into an
/// intermediate target, then the distortion pass into the frame.
pub struct GpuCompositor {
    device: wgpu::Device,
    queue: wgpu::Queue,
    clear_color: wgpu::Color,

    uniforms: DistortUniforms,
    camera: Camera,

    plane: PlaneGeometry,
    template: MaterialTemplate,
    /// Live image planes; the model matrix lives in each material.
    meshes: Vec<MeshMaterial>,

    frame_ubo: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    scene_format: wgpu::TextureFormat,
    scene_target: SceneTarget,
    distort: DistortPass,
}

impl GpuCompositor {
    pub fn new(ctx: &RenderCtx<'_>, config: &DistortConfig) -> Self {
        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        // The scene is an intermediate; the surface format keeps sRGB
        // encoding identical on both sides of the distortion pass.
        let scene_format = ctx.surface_format;

        let template = MaterialTemplate::new(&device, scene_format);
        let plane = PlaneGeometry::new(&device);

        let frame_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ripple scene frame ubo"),
            size: std::mem::size_of::<SceneUniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ripple scene frame bind group"),
            layout: &template.frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let scene_target = SceneTarget::new(&device, scene_format, ctx.surface_size);
        let distort = DistortPass::new(&device, ctx.surface_format, &scene_target);

        let mut uniforms = DistortUniforms::new(config.initial_mode);
        uniforms.set_viewport(ctx.viewport);

        log::info!(
            "compositor ready: {:?}, {}x{} px",
            ctx.surface_format,
            ctx.surface_size.0,
            ctx.surface_size.1
        );

        Self {
            device,
            queue,
            clear_color: config.clear_color,
            uniforms,
            camera: Camera::new(config.camera, ctx.viewport),
            plane,
            template,
            meshes: Vec::new(),
            frame_ubo,
            frame_bind_group,
            scene_format,
            scene_target,
            distort,
        }
    }

    fn write_frame_uniforms(&self) {
        let block = SceneUniformBlock {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
            resolution: self.uniforms.resolution().to_array(),
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(&block));
    }

    fn encode_scene(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ripple scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.scene_target.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if self.meshes.is_empty() {
            return;
        }

        rpass.set_pipeline(&self.template.pipeline);
        rpass.set_bind_group(0, &self.frame_bind_group, &[]);
        rpass.set_vertex_buffer(0, self.plane.vbo.slice(..));
        rpass.set_index_buffer(self.plane.ibo.slice(..), wgpu::IndexFormat::Uint16);

        // Insertion order is paint order.
        for material in &self.meshes {
            rpass.set_bind_group(1, &material.bind_group, &[]);
            rpass.draw_indexed(0..PlaneGeometry::INDEX_COUNT, 0, 0..1);
        }
    }
}

impl Compositor for GpuCompositor {
    type Frame<'f> = RenderTarget<'f>;

    fn add_node(&mut self, node: ImageNode) {
        let ImageNode { width, height, pixels } = node;
        let material = self.template.instantiate(
            &self.device,
            &self.queue,
            &pixels,
            plane_model(width, height),
        );
        log::debug!(
            "mesh {}: {}x{} plane, {:?}",
            self.meshes.len(),
            width,
            height,
            pixels
        );
        self.meshes.push(material);
    }

    fn uniforms(&self) -> &DistortUniforms {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut DistortUniforms {
        &mut self.uniforms
    }

    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn resize(&mut self, viewport: Viewport, surface_size: (u32, u32)) {
        self.uniforms.set_viewport(viewport);
        self.camera.set_viewport(viewport);

        if !self.scene_target.matches(surface_size) {
            self.scene_target = SceneTarget::new(&self.device, self.scene_format, surface_size);
            self.distort.rebind(&self.device, &self.scene_target);
        }
    }

    fn render(&mut self, frame: RenderTarget<'_>) {
        self.write_frame_uniforms();
        self.encode_scene(&mut *frame.encoder);
        self.distort.encode(
            &self.queue,
            frame.encoder,
            frame.color_view,
            &self.uniforms.snapshot(),
        );
    }
}
