//! Logarithmic mapping of pair counts onto 0..=255 intensities.
//!
//! `intensity = floor(ln(count) / ln(max) * 255)`. Empty cells are 0, and so
//! are cells counted exactly once (`ln(1) == 0`) unless one is the maximum.
//! The maximum cell is always 255.

use crate::table::{CountMatrix, SIZE};

pub struct IntensityMap {
    levels: Box<[[u8; SIZE]; SIZE]>,
}

impl IntensityMap {
    fn zeroed() -> Self {
        Self {
            levels: Box::new([[0; SIZE]; SIZE]),
        }
    }

    pub fn get(&self, pred: u8, succ: u8) -> u8 {
        self.levels[pred as usize][succ as usize]
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.levels
    }
}

#[derive(Clone, Copy)]
struct LogScale {
    max: u64,
    log_max: f64,
}

impl LogScale {
    fn new(max: u64) -> Option<Self> {
        if max == 0 {
            return None;
        }
        Some(Self {
            max,
            log_max: (max as f64).ln(),
        })
    }

    fn apply(self, count: u64) -> u8 {
        if count == 0 {
            return 0;
        }
        // ln(1) == 0, every occupied cell is a maximum cell
        if self.max == 1 {
            return u8::MAX;
        }
        let t = (count as f64).ln() / self.log_max;
        (t * 255.0).floor().clamp(0.0, 255.0) as u8
    }
}

/// Intensity of a single cell holding `count` when the largest cell holds `max`.
pub fn intensity(count: u64, max: u64) -> u8 {
    LogScale::new(max).map_or(0, |scale| scale.apply(count))
}

pub fn normalize(counts: &CountMatrix) -> IntensityMap {
    let mut map = IntensityMap::zeroed();
    let Some(scale) = LogScale::new(counts.max()) else {
        return map;
    };
    for (levels, row) in map.levels.iter_mut().zip(counts.rows().iter()) {
        for (level, &count) in levels.iter_mut().zip(row.iter()) {
            *level = scale.apply(count);
        }
    }
    map
}
