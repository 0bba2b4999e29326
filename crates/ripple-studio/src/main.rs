use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;

use ripple_distort::{
    CameraConfig, Command, DistortApp, DistortConfig, ImageNode, PixelSource, PixelSourceError,
};
use ripple_engine::input::Key;
use ripple_engine::logging::{init_logging, LoggingConfig};

const IMAGE_W: u32 = 512;
const IMAGE_H: u32 = 384;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DistortConfig {
        camera: CameraConfig {
            fit_viewport: true,
            ..CameraConfig::default()
        },
        ..DistortConfig::default()
    };

    log::info!("move the pointer to distort; 1/2/3 switch mode, N adds an image, Esc quits");

    // Each N press stacks a smaller, shifted-hue copy on top.
    let generation = Rc::new(Cell::new(1u32));
    let first = gradient(IMAGE_W, IMAGE_H, 0)?;

    let result = DistortApp::new(config)
        .title("ripple studio")
        .size(1280.0, 720.0)
        .image(ImageNode::new(960.0, 720.0, first))
        .on_key(Key::N, move || {
            let g = generation.get();
            generation.set(g + 1);
            let scale = 0.8f32.powi(g as i32);
            match gradient(IMAGE_W, IMAGE_H, g) {
                Ok(pixels) => Some(Command::EnqueueImage(ImageNode::new(
                    960.0 * scale,
                    720.0 * scale,
                    pixels,
                ))),
                Err(e) => {
                    log::warn!("image {g} skipped: {e}");
                    None
                }
            }
        })
        .run();

    if let Err(e) = &result {
        log::error!("ripple studio: {e:#}");
    }
    result
}

/// Diagonal colour gradient with a checker overlay so the distortion has
/// edges to act on. `hue_shift` rotates the channels.
fn gradient(width: u32, height: u32, hue_shift: u32) -> Result<PixelSource, PixelSourceError> {
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = x as f32 / (width - 1) as f32;
            let v = y as f32 / (height - 1) as f32;
            let checker = ((x / 32) + (y / 32)) % 2 == 0;
            let lift = if checker { 1.0 } else { 0.75 };

            let mut c = [u, v, 1.0 - 0.5 * (u + v)];
            c.rotate_left((hue_shift % 3) as usize);

            rgba.extend(c.iter().map(|ch| (ch * lift * 255.0) as u8));
            rgba.push(255);
        }
    }
    PixelSource::new(width, height, rgba)
}
