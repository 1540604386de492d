//! # Image Carrier Adapter
//!
//! Bridges raster image files and the pixel sequences the codec works on.
//!
//! ## Ingestion
//!
//! Images are decoded with the `image` crate and flattened into a
//! [`Carrier`]: color mode, size and one [`Pixel`] per raster position.
//! Single-channel images become [`Pixel::Scalar`], everything else
//! [`Pixel::Channels`]. Floating point images have no integer LSB and are
//! rejected.
//!
//! ## Output
//!
//! A carrier is always written back as PNG. Any lossy format would destroy
//! the hidden bits, which is also why JPEG input is accepted for encoding
//! but never produced.

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Luma, LumaA, Rgb, Rgba};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::codec::Pixel;

/// Extensions accepted as JPEG input.
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg", "jpe", "JPG", "JPEG", "JPE"];

/// Extensions accepted as PNG input.
pub const PNG_EXTENSIONS: &[&str] = &["png", "PNG"];

/// Errors that can occur while loading or rebuilding a carrier image.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Image load error: {0}")]
    Load(#[source] image::ImageError),

    #[error("Image save error: {0}")]
    Save(#[source] image::ImageError),

    #[error("Unsupported color type: {0}")]
    UnsupportedColor(String),

    #[error("Sample value {value} does not fit in an 8-bit channel")]
    SampleOutOfRange { value: u16 },

    #[error("Pixel data does not match image shape: expected {expected} samples, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
}

/// Lossless or lossy input family, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Classify `path` by its extension. Returns `None` for anything else.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path.as_ref().extension()?.to_str()?;
        if JPEG_EXTENSIONS.contains(&extension) {
            Some(ImageKind::Jpeg)
        } else if PNG_EXTENSIONS.contains(&extension) {
            Some(ImageKind::Png)
        } else {
            None
        }
    }
}

/// Integer color layouts a carrier can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    L8,
    La8,
    Rgb8,
    Rgba8,
    L16,
    La16,
    Rgb16,
    Rgba16,
}

impl ColorMode {
    /// Samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::L8 | ColorMode::L16 => 1,
            ColorMode::La8 | ColorMode::La16 => 2,
            ColorMode::Rgb8 | ColorMode::Rgb16 => 3,
            ColorMode::Rgba8 | ColorMode::Rgba16 => 4,
        }
    }

    pub fn is_16bit(self) -> bool {
        matches!(
            self,
            ColorMode::L16 | ColorMode::La16 | ColorMode::Rgb16 | ColorMode::Rgba16
        )
    }
}

/// A decoded image reduced to what the codec needs, plus the metadata
/// required to write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    pub mode: ColorMode,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl Carrier {
    /// Decode an image file (PNG, JPEG or anything else `image` reads).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CarrierError> {
        let image = image::open(path).map_err(CarrierError::Load)?;
        Self::from_image(&image)
    }

    /// Decode an in-memory image file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CarrierError> {
        let image = image::load_from_memory(bytes).map_err(CarrierError::Load)?;
        Self::from_image(&image)
    }

    /// Flatten a decoded image into raster-order pixels.
    pub fn from_image(image: &DynamicImage) -> Result<Self, CarrierError> {
        let (mode, pixels) = match image {
            DynamicImage::ImageLuma8(buf) => (ColorMode::L8, to_pixels(buf.as_raw(), 1)),
            DynamicImage::ImageLumaA8(buf) => (ColorMode::La8, to_pixels(buf.as_raw(), 2)),
            DynamicImage::ImageRgb8(buf) => (ColorMode::Rgb8, to_pixels(buf.as_raw(), 3)),
            DynamicImage::ImageRgba8(buf) => (ColorMode::Rgba8, to_pixels(buf.as_raw(), 4)),
            DynamicImage::ImageLuma16(buf) => (ColorMode::L16, to_pixels(buf.as_raw(), 1)),
            DynamicImage::ImageLumaA16(buf) => (ColorMode::La16, to_pixels(buf.as_raw(), 2)),
            DynamicImage::ImageRgb16(buf) => (ColorMode::Rgb16, to_pixels(buf.as_raw(), 3)),
            DynamicImage::ImageRgba16(buf) => (ColorMode::Rgba16, to_pixels(buf.as_raw(), 4)),
            other => {
                return Err(CarrierError::UnsupportedColor(format!("{:?}", other.color())));
            }
        };

        let (width, height) = image.dimensions();
        Ok(Self {
            mode,
            width,
            height,
            pixels,
        })
    }

    /// Same mode and size, different pixels.
    pub fn with_pixels(&self, pixels: Vec<Pixel>) -> Self {
        Self {
            mode: self.mode,
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Rebuild an image of the original mode and size from the pixels.
    ///
    /// # Errors
    /// - `ShapeMismatch` if the sample count does not match the mode and size
    /// - `SampleOutOfRange` if an 8-bit mode holds a value above 255
    pub fn to_image(&self) -> Result<DynamicImage, CarrierError> {
        let samples: Vec<u16> = self
            .pixels
            .iter()
            .flat_map(|pixel| pixel.samples().iter().copied())
            .collect();

        let expected = self.width as usize * self.height as usize * self.mode.channels();
        if samples.len() != expected {
            return Err(CarrierError::ShapeMismatch {
                expected,
                found: samples.len(),
            });
        }

        let (w, h) = (self.width, self.height);
        let image = if self.mode.is_16bit() {
            match self.mode {
                ColorMode::L16 => DynamicImage::ImageLuma16(buffer::<Luma<u16>, u16>(w, h, samples)?),
                ColorMode::La16 => DynamicImage::ImageLumaA16(buffer::<LumaA<u16>, u16>(w, h, samples)?),
                ColorMode::Rgb16 => DynamicImage::ImageRgb16(buffer::<Rgb<u16>, u16>(w, h, samples)?),
                _ => DynamicImage::ImageRgba16(buffer::<Rgba<u16>, u16>(w, h, samples)?),
            }
        } else {
            let samples = narrow(samples)?;
            match self.mode {
                ColorMode::L8 => DynamicImage::ImageLuma8(buffer::<Luma<u8>, u8>(w, h, samples)?),
                ColorMode::La8 => DynamicImage::ImageLumaA8(buffer::<LumaA<u8>, u8>(w, h, samples)?),
                ColorMode::Rgb8 => DynamicImage::ImageRgb8(buffer::<Rgb<u8>, u8>(w, h, samples)?),
                _ => DynamicImage::ImageRgba8(buffer::<Rgba<u8>, u8>(w, h, samples)?),
            }
        };

        Ok(image)
    }

    /// Encode the carrier as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, CarrierError> {
        let image = self.to_image()?;
        let mut output_bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)
            .map_err(CarrierError::Save)?;
        Ok(output_bytes)
    }

    /// Write the carrier to `path` as PNG, whatever the extension says.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), CarrierError> {
        self.to_image()?
            .save_with_format(path, ImageFormat::Png)
            .map_err(CarrierError::Save)
    }
}

fn to_pixels<T: Copy + Into<u16>>(raw: &[T], channels: usize) -> Vec<Pixel> {
    if channels == 1 {
        raw.iter().map(|&value| Pixel::Scalar(value.into())).collect()
    } else {
        raw.chunks_exact(channels)
            .map(|chunk| Pixel::Channels(chunk.iter().map(|&value| value.into()).collect()))
            .collect()
    }
}

fn narrow(samples: Vec<u16>) -> Result<Vec<u8>, CarrierError> {
    samples
        .into_iter()
        .map(|value| u8::try_from(value).map_err(|_| CarrierError::SampleOutOfRange { value }))
        .collect()
}

fn buffer<P, T>(width: u32, height: u32, samples: Vec<T>) -> Result<ImageBuffer<P, Vec<T>>, CarrierError>
where
    P: image::Pixel<Subpixel = T>,
    T: image::Primitive,
{
    let found = samples.len();
    ImageBuffer::from_raw(width, height, samples).ok_or(CarrierError::ShapeMismatch {
        expected: width as usize * height as usize * P::CHANNEL_COUNT as usize,
        found,
    })
}
