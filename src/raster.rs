use crate::{
    error::{SeedwalkError, SeedwalkResult},
    walk::{Bounds, Point},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SeedwalkResult<Self> {
        if width == 0 || height == 0 {
            return Err(SeedwalkError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Opaque RGBA8 snapshot of the raster buffer at one sampling instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Pixel buffer with single-pixel plotting: no blending, no anti-aliasing.
///
/// Path vertices are translated by the path's bounding-box center (not the
/// canvas center) so the walk lands mid-canvas wherever it wandered on the
/// lattice. The border insets the drawable region on all four sides, so a
/// path extent of `(width - 2*border) x (height - 2*border)` always fits.
/// Each pixel carries a last-drawn path-index stamp; a plot only lands if
/// its index is higher than the stamp, so the final image is independent of
/// walker interleaving.
pub struct RasterCanvas {
    canvas: Canvas,
    border: i64,
    center_x: f64,
    center_y: f64,
    background: [u8; 3],
    data: Vec<u8>,
    stamp: Vec<i64>,
}

impl RasterCanvas {
    pub fn new(canvas: Canvas, border: i64, path_bounds: &Bounds, background: [u8; 3]) -> Self {
        let mut data = vec![0u8; canvas.pixel_count() * 4];
        for px in data.chunks_exact_mut(4) {
            px[0] = background[0];
            px[1] = background[1];
            px[2] = background[2];
            px[3] = 255;
        }
        Self {
            canvas,
            border,
            center_x: path_bounds.center_x(),
            center_y: path_bounds.center_y(),
            background,
            data,
            stamp: vec![-1; canvas.pixel_count()],
        }
    }

    /// Screen position of a path vertex: centered within the border-inset
    /// region, then shifted by the border. Truncating casts match the
    /// reference's `int()` coordinate math (the still image uses border 0,
    /// where this reduces to the reference formula exactly).
    fn project(&self, p: Point) -> (i64, i64) {
        let inner_w = f64::from(self.canvas.width) - 2.0 * self.border as f64;
        let inner_h = f64::from(self.canvas.height) - 2.0 * self.border as f64;
        let sx = (p.x as f64 - self.center_x + inner_w / 2.0) as i64 + self.border;
        let sy = (p.y as f64 - self.center_y + inner_h / 2.0) as i64 + self.border;
        (sx, sy)
    }

    /// Plots vertex `index` at `p`. Off-canvas positions are skipped;
    /// already-stamped pixels only yield to a higher index.
    pub fn plot(&mut self, index: usize, p: Point, rgb: [u8; 3]) {
        let (sx, sy) = self.project(p);
        if sx < 0 || sy < 0 || sx >= i64::from(self.canvas.width) || sy >= i64::from(self.canvas.height)
        {
            return;
        }
        let pixel = sy as usize * self.canvas.width as usize + sx as usize;
        if self.stamp[pixel] < index as i64 {
            self.stamp[pixel] = index as i64;
            let at = pixel * 4;
            self.data[at] = rgb[0];
            self.data[at + 1] = rgb[1];
            self.data[at + 2] = rgb[2];
        }
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data.clone(),
        }
    }

    /// Background-only frame of the same size, used for start-hold padding.
    pub fn blank_frame(&self) -> Frame {
        let mut data = vec![0u8; self.canvas.pixel_count() * 4];
        for px in data.chunks_exact_mut(4) {
            px[0] = self.background[0];
            px[1] = self.background[1];
            px[2] = self.background[2];
            px[3] = 255;
        }
        Frame {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
        }
    }
}
