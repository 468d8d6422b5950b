use crate::{normalize::IntensityMap, sink::Frame, table::SIZE};

pub const CHANNELS: usize = 4;

/// Row-major RGBA pixels, one per byte pair. Row is the predecessor byte.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn width(&self) -> usize {
        SIZE
    }

    pub fn height(&self) -> usize {
        SIZE
    }

    pub fn stride(&self) -> usize {
        SIZE * CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Pixel in row `pred`, column `succ`.
    pub fn pixel(&self, pred: u8, succ: u8) -> [u8; 4] {
        let offset = (pred as usize * SIZE + succ as usize) * CHANNELS;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        rgba
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            width: SIZE as u32,
            height: SIZE as u32,
            channels: CHANNELS as u8,
            stride: self.stride(),
            pixels: &self.data,
        }
    }
}

pub fn rasterize(map: &IntensityMap) -> PixelBuffer {
    let mut data = Vec::with_capacity(SIZE * SIZE * CHANNELS);
    for &level in map.rows().iter().flatten() {
        data.extend_from_slice(&[level, level, level, u8::MAX]);
    }
    PixelBuffer { data }
}
