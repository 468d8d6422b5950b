use std::{
    borrow::Cow,
    ffi::OsString,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::debug;
use png::{BitDepth, ColorType, Encoder};

use crate::{Error, Result};

pub const OUTPUT_SUFFIX: &str = ".binviz.png";

/// Raster handed to an [`ImageSink`]. `stride` is the byte distance between
/// the starts of two consecutive rows.
pub struct Frame<'a> {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub stride: usize,
    pub pixels: &'a [u8],
}

impl Frame<'_> {
    fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidFrame(format!(
                "empty frame {}x{}",
                self.width, self.height
            )));
        }
        if self.channels != 4 {
            return Err(Error::InvalidFrame(format!(
                "expected 4 channels, got {}",
                self.channels
            )));
        }
        let row_len = self.row_len();
        if self.stride < row_len {
            return Err(Error::InvalidFrame(format!(
                "stride {} shorter than row of {row_len} bytes",
                self.stride
            )));
        }
        let needed = self.stride * (self.height as usize - 1) + row_len;
        if self.pixels.len() < needed {
            return Err(Error::InvalidFrame(format!(
                "buffer holds {} bytes, need {needed}",
                self.pixels.len()
            )));
        }
        Ok(())
    }

    /// Rows without stride padding.
    fn packed(&self) -> Cow<'_, [u8]> {
        let row_len = self.row_len();
        if self.stride == row_len {
            return Cow::Borrowed(&self.pixels[..row_len * self.height as usize]);
        }
        let mut data = Vec::with_capacity(row_len * self.height as usize);
        for row in self.pixels.chunks(self.stride).take(self.height as usize) {
            data.extend_from_slice(&row[..row_len]);
        }
        Cow::Owned(data)
    }
}

pub trait ImageSink {
    fn write(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Encodes frames as 8-bit RGBA PNG.
pub struct PngSink<W> {
    writer: W,
}

impl PngSink<BufWriter<File>> {
    pub fn create<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let file = File::create(path.as_ref())?;
        debug!("Writing image to {:?}", path.as_ref());
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> PngSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ImageSink for PngSink<W> {
    fn write(&mut self, frame: &Frame<'_>) -> Result<()> {
        frame.validate()?;
        let mut encoder = Encoder::new(&mut self.writer, frame.width, frame.height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(encode_error)?;
        writer
            .write_image_data(&frame.packed())
            .map_err(encode_error)?;
        writer.finish().map_err(encode_error)?;
        self.writer.flush().map_err(encode_error)?;
        debug!("Encoded {}x{} frame", frame.width, frame.height);
        Ok(())
    }
}

fn encode_error<E: std::fmt::Display>(err: E) -> Error {
    Error::Encoding(err.to_string())
}

/// `input` with [`OUTPUT_SUFFIX`] appended to its file name.
pub fn output_path<P>(input: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let mut name = OsString::from(input.as_ref());
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn decode(bytes: Vec<u8>) -> (u32, u32, ColorType, Vec<u8>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let (width, height, color) = {
            let info = reader.info();
            (info.width, info.height, info.color_type)
        };
        let mut buf = vec![0; width as usize * height as usize * 4];
        reader.next_frame(&mut buf).unwrap();
        (width, height, color, buf)
    }

    #[test]
    fn suffix_is_appended() {
        assert_eq!(output_path("a.out"), PathBuf::from("a.out.binviz.png"));
        assert_eq!(
            output_path("dir/data.bin"),
            PathBuf::from("dir/data.bin.binviz.png")
        );
    }

    #[test]
    fn padded_stride_is_repacked() {
        // 2x2 frame with 4 bytes of row padding
        #[rustfmt::skip]
        let pixels = [
            1, 1, 1, 255,  2, 2, 2, 255,  0xEE, 0xEE, 0xEE, 0xEE,
            3, 3, 3, 255,  4, 4, 4, 255,
        ];
        let frame = Frame {
            width: 2,
            height: 2,
            channels: 4,
            stride: 12,
            pixels: &pixels,
        };
        let mut sink = PngSink::new(Vec::new());
        sink.write(&frame).unwrap();
        let (width, height, color, data) = decode(sink.into_inner());
        assert_eq!((width, height, color), (2, 2, ColorType::Rgba));
        assert_eq!(
            data,
            vec![1, 1, 1, 255, 2, 2, 2, 255, 3, 3, 3, 255, 4, 4, 4, 255]
        );
    }

    #[test]
    fn rejects_bad_frames() {
        let pixels = [0u8; 16];
        let cases = [
            (2, 2, 3, 8),
            (2, 2, 4, 4),
            (4, 4, 4, 16),
            (0, 2, 4, 8),
        ];
        for (width, height, channels, stride) in cases {
            let frame = Frame {
                width,
                height,
                channels,
                stride,
                pixels: &pixels,
            };
            let mut sink = PngSink::new(Vec::new());
            assert!(matches!(sink.write(&frame), Err(Error::InvalidFrame(_))));
            assert!(sink.into_inner().is_empty());
        }
    }

    #[test]
    fn writer_failure_is_an_encoding_error() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "no space"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let pixels = [0u8; 16];
        let frame = Frame {
            width: 2,
            height: 2,
            channels: 4,
            stride: 8,
            pixels: &pixels,
        };
        let mut sink = PngSink::new(Full);
        assert!(matches!(sink.write(&frame), Err(Error::Encoding(_))));
    }
}
