//! Node ingestion: images waiting to become meshes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PixelSourceError {
    #[error("pixel buffer holds {actual} bytes, {width}x{height} RGBA8 needs {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Decoded RGBA8 pixels (sRGB, rows top to bottom) awaiting GPU upload.
///
/// Constructing one marks the pixels ready for upload; the compositor consumes
/// it when it builds the node's material.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelSource {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelSource {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, PixelSourceError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(PixelSourceError::LengthMismatch {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// A `width` x `height` image filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let texels = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: rgba.repeat(texels),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Nearest-neighbour copy whose larger side is at most `max_dim`, keeping
    /// the aspect ratio. `None` when the image already fits.
    pub fn downscaled_to_fit(&self, max_dim: u32) -> Option<PixelSource> {
        let largest = self.width.max(self.height);
        if largest <= max_dim || max_dim == 0 {
            return None;
        }

        let scale = |side: u32| ((side as u64 * max_dim as u64) / largest as u64).max(1) as u32;
        let (w, h) = (scale(self.width), scale(self.height));

        let mut rgba = Vec::with_capacity(w as usize * h as usize * 4);
        for y in 0..h {
            let sy = (y as u64 * self.height as u64 / h as u64) as usize;
            for x in 0..w {
                let sx = (x as u64 * self.width as u64 / w as u64) as usize;
                let i = (sy * self.width as usize + sx) * 4;
                rgba.extend_from_slice(&self.rgba[i..i + 4]);
            }
        }

        Some(PixelSource { width: w, height: h, rgba })
    }
}

impl fmt::Debug for PixelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSource")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// An image to place in the scene.
///
/// `width` and `height` are the rendered size of the plane (logical units),
/// independent of the pixel dimensions of `pixels`. Zero sizes are accepted
/// and produce an invisible mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub width: f32,
    pub height: f32,
    pub pixels: PixelSource,
}

impl ImageNode {
    pub fn new(width: f32, height: f32, pixels: PixelSource) -> Self {
        Self { width, height, pixels }
    }
}

/// Images waiting for the next frame.
///
/// Cloning the handle shares the queue: event callbacks append, the render
/// loop drains. Both run on the event-loop thread and never hold the borrow
/// across a call out, so the `RefCell` cannot be observed mid-drain.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue(Rc<RefCell<Vec<ImageNode>>>);

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, node: ImageNode) {
        self.0.borrow_mut().push(node);
    }

    /// Empties the queue and returns its nodes in arrival order.
    pub fn drain_all(&self) -> Vec<ImageNode> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}
