//! Pixel buffer execution
//!
//! Runs a [`Pipeline`] over packed pixel buffers in 8-bit, 16-bit or
//! f32 encodings. Alpha samples bypass the pipeline and are carried
//! over unchanged; integer repacking saturates to the encoding range.

use rayon::prelude::*;

use crate::error::ExecError;
use crate::pipeline::{Pipeline, MAX_CHANNELS};

/// Pixels per work item handed to the thread pool
const PARALLEL_CHUNK: usize = 4096;

/// Sample encoding of a packed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    U8,
    U16,
    F32,
}

impl Encoding {
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::F32 => "f32",
        }
    }
}

/// Layout of one pixel in a packed buffer
///
/// `channels` counts color components only; an alpha sample, when
/// present, follows them and is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub channels: usize,
    pub has_alpha: bool,
    pub encoding: Encoding,
}

impl PixelFormat {
    pub const RGB_8: Self = Self::new(3, false, Encoding::U8);
    pub const RGBA_8: Self = Self::new(3, true, Encoding::U8);
    pub const RGB_16: Self = Self::new(3, false, Encoding::U16);
    pub const RGBA_16: Self = Self::new(3, true, Encoding::U16);
    pub const RGB_F32: Self = Self::new(3, false, Encoding::F32);
    pub const RGBA_F32: Self = Self::new(3, true, Encoding::F32);
    pub const CMYK_8: Self = Self::new(4, false, Encoding::U8);
    pub const CMYK_16: Self = Self::new(4, false, Encoding::U16);
    pub const GRAY_8: Self = Self::new(1, false, Encoding::U8);
    pub const GRAY_16: Self = Self::new(1, false, Encoding::U16);

    pub const fn new(channels: usize, has_alpha: bool, encoding: Encoding) -> Self {
        Self {
            channels,
            has_alpha,
            encoding,
        }
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.channels + usize::from(self.has_alpha)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.samples_per_pixel() * self.encoding.bytes_per_sample()
    }
}

enum Samples<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
    F32(&'a [f32]),
}

impl Samples<'_> {
    #[inline]
    fn get(&self, i: usize) -> f64 {
        match self {
            Self::U8(s) => s[i] as f64 / 255.0,
            Self::U16(s) => s[i] as f64 / 65535.0,
            Self::F32(s) => s[i] as f64,
        }
    }
}

enum SamplesMut<'a> {
    U8(&'a mut [u8]),
    U16(&'a mut [u16]),
    F32(&'a mut [f32]),
}

impl SamplesMut<'_> {
    #[inline]
    fn set(&mut self, i: usize, v: f64) {
        match self {
            Self::U8(s) => s[i] = (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            Self::U16(s) => s[i] = (v.clamp(0.0, 1.0) * 65535.0 + 0.5) as u16,
            Self::F32(s) => s[i] = v as f32,
        }
    }
}

fn cast_input<'a>(
    buf: &'a [u8],
    encoding: Encoding,
    side: &'static str,
) -> Result<Samples<'a>, ExecError> {
    let misaligned = ExecError::Misaligned {
        side,
        encoding: encoding.name(),
    };
    Ok(match encoding {
        Encoding::U8 => Samples::U8(buf),
        Encoding::U16 => Samples::U16(bytemuck::try_cast_slice(buf).map_err(|_| misaligned)?),
        Encoding::F32 => Samples::F32(bytemuck::try_cast_slice(buf).map_err(|_| misaligned)?),
    })
}

fn cast_output<'a>(
    buf: &'a mut [u8],
    encoding: Encoding,
    side: &'static str,
) -> Result<SamplesMut<'a>, ExecError> {
    let misaligned = ExecError::Misaligned {
        side,
        encoding: encoding.name(),
    };
    Ok(match encoding {
        Encoding::U8 => SamplesMut::U8(buf),
        Encoding::U16 => {
            SamplesMut::U16(bytemuck::try_cast_slice_mut(buf).map_err(|_| misaligned)?)
        }
        Encoding::F32 => {
            SamplesMut::F32(bytemuck::try_cast_slice_mut(buf).map_err(|_| misaligned)?)
        }
    })
}

fn validate(
    pipeline: &Pipeline,
    src_format: PixelFormat,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &[u8],
    pixel_count: usize,
) -> Result<(), ExecError> {
    if src_format.channels != pipeline.input_channels() {
        return Err(ExecError::FormatMismatch {
            side: "source",
            expected: pipeline.input_channels(),
            actual: src_format.channels,
        });
    }
    if dst_format.channels != pipeline.output_channels() {
        return Err(ExecError::FormatMismatch {
            side: "destination",
            expected: pipeline.output_channels(),
            actual: dst_format.channels,
        });
    }

    let src_needed = pixel_count * src_format.bytes_per_pixel();
    if src.len() < src_needed {
        return Err(ExecError::BufferTooSmall {
            side: "source",
            expected: src_needed,
            actual: src.len(),
        });
    }
    let dst_needed = pixel_count * dst_format.bytes_per_pixel();
    if dst.len() < dst_needed {
        return Err(ExecError::BufferTooSmall {
            side: "destination",
            expected: dst_needed,
            actual: dst.len(),
        });
    }
    Ok(())
}

fn transform_chunk(
    pipeline: &Pipeline,
    src_format: PixelFormat,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
    pixel_count: usize,
) -> Result<(), ExecError> {
    let input = cast_input(src, src_format.encoding, "source")?;
    let mut output = cast_output(dst, dst_format.encoding, "destination")?;

    let src_spp = src_format.samples_per_pixel();
    let dst_spp = dst_format.samples_per_pixel();

    let mut pixel_in = [0.0f64; MAX_CHANNELS];
    let mut pixel_out = [0.0f64; MAX_CHANNELS];

    for px in 0..pixel_count {
        let src_base = px * src_spp;
        let dst_base = px * dst_spp;

        for c in 0..src_format.channels {
            pixel_in[c] = input.get(src_base + c);
        }
        pipeline.eval(
            &pixel_in[..src_format.channels],
            &mut pixel_out[..dst_format.channels],
        );
        for c in 0..dst_format.channels {
            output.set(dst_base + c, pixel_out[c]);
        }

        if dst_format.has_alpha {
            let alpha = if src_format.has_alpha {
                input.get(src_base + src_format.channels)
            } else {
                1.0
            };
            output.set(dst_base + dst_format.channels, alpha);
        }
    }
    Ok(())
}

/// Transform `pixel_count` pixels from `src` into `dst`
///
/// Channel counts of both formats must match the pipeline endpoints,
/// and both buffers must cover `pixel_count` whole pixels.
pub fn transform(
    pipeline: &Pipeline,
    src_format: PixelFormat,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
    pixel_count: usize,
) -> Result<(), ExecError> {
    validate(pipeline, src_format, src, dst_format, dst, pixel_count)?;
    transform_chunk(
        pipeline,
        src_format,
        &src[..pixel_count * src_format.bytes_per_pixel()],
        dst_format,
        &mut dst[..pixel_count * dst_format.bytes_per_pixel()],
        pixel_count,
    )
}

/// Like [`transform`], splitting the work across the rayon pool
///
/// Chunk boundaries fall on whole pixels, so results are identical to
/// the serial path.
pub fn transform_parallel(
    pipeline: &Pipeline,
    src_format: PixelFormat,
    src: &[u8],
    dst_format: PixelFormat,
    dst: &mut [u8],
    pixel_count: usize,
) -> Result<(), ExecError> {
    validate(pipeline, src_format, src, dst_format, dst, pixel_count)?;

    let src_bpp = src_format.bytes_per_pixel();
    let dst_bpp = dst_format.bytes_per_pixel();
    let src = &src[..pixel_count * src_bpp];
    let dst = &mut dst[..pixel_count * dst_bpp];

    src.par_chunks(PARALLEL_CHUNK * src_bpp)
        .zip(dst.par_chunks_mut(PARALLEL_CHUNK * dst_bpp))
        .try_for_each(|(src_chunk, dst_chunk)| {
            transform_chunk(
                pipeline,
                src_format,
                src_chunk,
                dst_format,
                dst_chunk,
                src_chunk.len() / src_bpp,
            )
        })
}
