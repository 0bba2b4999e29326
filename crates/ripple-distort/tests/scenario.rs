//! End-to-end: commands in through the host, uniform snapshots out of a
//! recording compositor.

use ripple_distort::uniforms::DistortUniformBlock;
use ripple_distort::{
    Command, Compositor, DistortUniforms, FrameScheduler, Host, ImageNode, PixelSource,
    RedrawScheduler, TrackerConfig,
};

const EPS: f32 = 1e-4;

#[derive(Default)]
struct Recording {
    uniforms: DistortUniforms,
    scales: Vec<[f32; 3]>,
    frames: Vec<DistortUniformBlock>,
}

impl Compositor for Recording {
    type Frame<'f> = ();

    fn add_node(&mut self, node: ImageNode) {
        self.scales.push([node.width, node.height, 1.0]);
    }

    fn uniforms(&self) -> &DistortUniforms {
        &self.uniforms
    }

    fn uniforms_mut(&mut self) -> &mut DistortUniforms {
        &mut self.uniforms
    }

    fn mesh_count(&self) -> usize {
        self.scales.len()
    }

    fn render(&mut self, _frame: ()) {
        self.frames.push(self.uniforms.snapshot());
    }
}

fn recording(host: &Host<Recording, RedrawScheduler>) -> &Recording {
    host.render_loop().expect("mounted").compositor()
}

fn photo() -> ImageNode {
    let pixels = PixelSource::new(8, 6, vec![128; 8 * 6 * 4]).expect("valid pixels");
    ImageNode::new(800.0, 600.0, pixels)
}

#[test]
fn pointer_sweep_converges_and_settles() {
    let mut host = Host::new(TrackerConfig::default());
    host.dispatch(Command::EnqueueImage(photo())).unwrap();
    host.mount(Recording::default(), RedrawScheduler::new());

    assert!(host.run_frame(()));
    let rec = recording(&host);
    assert_eq!(rec.mesh_count(), 1);
    assert_eq!(rec.scales[0], [800.0, 600.0, 1.0]);

    host.dispatch(Command::SetPointer {
        x: 800.0,
        y: 0.0,
        surface_width: 800.0,
        surface_height: 600.0,
    })
    .unwrap();

    for _ in 0..40 {
        assert!(host.run_frame(()));
    }

    // frames[0] rendered before the pointer moved.
    let sweep = &recording(&host).frames[1..];
    assert_eq!(sweep.len(), 40);

    let converged_at = sweep
        .iter()
        .position(|f| (f.mouse[0] - 1.0).abs() < EPS && (f.mouse[1] - 1.0).abs() < EPS)
        .expect("pointer converges");
    assert!(converged_at < 29, "converged on tick {}", converged_at + 1);

    for f in &sweep[..converged_at] {
        assert!(f.velocity > 0.0);
        assert!(f.velocity <= 0.05 * 20.0 + EPS);
    }
    for f in &sweep[converged_at + 1..] {
        assert_eq!(f.velocity, 0.0);
        assert_eq!(f.mouse, [1.0, 1.0]);
    }
}

#[test]
fn zero_sized_image_still_becomes_a_mesh() {
    let mut host = Host::new(TrackerConfig::default());
    host.mount(Recording::default(), RedrawScheduler::new());
    let empty = PixelSource::new(0, 0, Vec::new()).expect("empty pixels are valid");
    host.enqueue_image(ImageNode::new(0.0, 0.0, empty));

    assert!(host.run_frame(()));
    let rec = recording(&host);
    assert_eq!(rec.mesh_count(), 1);
    assert_eq!(rec.scales[0], [0.0, 0.0, 1.0]);
    assert!(host.queue().is_empty());
}

#[test]
fn mode_switch_reaches_next_frame() {
    let mut host = Host::new(TrackerConfig::default());
    host.mount(Recording::default(), RedrawScheduler::new());
    host.run_frame(());
    host.dispatch(Command::SetMode(2)).unwrap();
    host.run_frame(());

    let frames = &recording(&host).frames;
    assert_eq!(frames[0].mode, 1);
    assert_eq!(frames[1].mode, 2);
}

#[test]
fn nothing_changes_after_unmount() {
    let mut host = Host::new(TrackerConfig::default());
    let handle = host.mount(Recording::default(), RedrawScheduler::new());
    host.set_pointer(400.0, 300.0, 800.0, 600.0);
    host.run_frame(());

    assert!(host.unmount(handle));
    host.enqueue_image(photo());
    for _ in 0..10 {
        assert!(!host.run_frame(()));
    }
    assert_eq!(host.queue().len(), 1);
    assert!(host.render_loop().is_none());
}

#[test]
fn stopped_loop_ignores_fired_frames() {
    let mut host = Host::new(TrackerConfig::default());
    host.mount(Recording::default(), RedrawScheduler::new());
    host.set_pointer(800.0, 0.0, 800.0, 600.0);
    host.run_frame(());

    let render_loop = host.render_loop_mut().unwrap();
    let request = render_loop.scheduler().pending().unwrap();
    render_loop.stop();
    render_loop.stop();

    let before = *render_loop.compositor().uniforms();
    for _ in 0..10 {
        assert!(!render_loop.run_frame(request, ()));
    }
    assert_eq!(*render_loop.compositor().uniforms(), before);
    assert_eq!(render_loop.compositor().frames.len(), 1);
}
