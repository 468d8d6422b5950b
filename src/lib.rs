//! Byte-pair density fingerprints.
//!
//! Every adjacent pair of bytes `(a, b)` in a stream lands in cell `[a][b]`
//! of a 256x256 count table. The table is log-scaled onto 0..=255 and drawn
//! as an opaque grayscale image, so headers, padding, text and compressed or
//! encrypted regions each leave a recognizable pattern.
//!
//! ```no_run
//! use std::fs::File;
//!
//! use binviz::sink::{output_path, ImageSink, PngSink};
//!
//! # fn main() -> binviz::Result<()> {
//! let mut file = File::open("a.out")?;
//! let print = binviz::fingerprint(&mut file, binviz::reader::DEFAULT_CHUNK_SIZE)?;
//! PngSink::create(output_path("a.out"))?.write(&print.pixels().frame())?;
//! # Ok(())
//! # }
//! ```

use std::io::Read;

pub mod error;
pub mod normalize;
pub mod raster;
pub mod reader;
pub mod sink;
pub mod table;

pub use error::{Error, Result};

use crate::{
    normalize::normalize,
    raster::{rasterize, PixelBuffer},
    reader::{Chunk, ChunkReader},
    table::BinaryTable,
};

/// Rendered image of one stream together with the figures it was scaled by.
pub struct Fingerprint {
    bytes: u64,
    max: u64,
    pixels: PixelBuffer,
}

impl Fingerprint {
    /// Length of the input stream.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Count of the most frequent byte pair.
    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn into_pixels(self) -> PixelBuffer {
        self.pixels
    }
}

/// Streams `source` to the end in `chunk_size` blocks and renders it.
///
/// `chunk_size` is clamped to `1..=`[`reader::MAX_CHUNK_SIZE`]. Memory use
/// does not depend on the stream length. Any read fault aborts the run
/// without producing an image.
pub fn fingerprint<R>(source: R, chunk_size: usize) -> Result<Fingerprint>
where
    R: Read,
{
    let mut reader = ChunkReader::with_capacity(source, chunk_size);
    let mut table = BinaryTable::new();
    while let Chunk::Data(bytes) = reader.next_chunk()? {
        table.ingest(bytes);
    }
    let bytes = table.bytes();
    let counts = table.finalize();
    let intensities = normalize(&counts);
    Ok(Fingerprint {
        bytes,
        max: counts.max(),
        pixels: rasterize(&intensities),
    })
}
