//! Image decoding and resizing for renditions.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::job::JobFailure;

/// A decoded original, ready to be rendered at several widths.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl SourceImage {
    /// Detect the format of `bytes` and decode them.
    pub fn decode(bytes: &[u8]) -> Result<Self, ImageError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let format = reader.format().unwrap_or(ImageFormat::Png);
        let image = reader.decode()?;
        Ok(Self { image, format })
    }

    /// Width of the original in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the original in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Format the original was encoded in.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Render at `width` pixels, keeping the aspect ratio.
    ///
    /// Images narrower than `width` keep their size. The output uses the
    /// original format, or PNG when that format cannot be encoded.
    pub fn render(&self, width: u32) -> Result<Vec<u8>, ImageError> {
        let resized = if width == 0 || width >= self.image.width() {
            self.image.clone()
        } else {
            let height = (u64::from(self.image.height()) * u64::from(width)
                / u64::from(self.image.width()))
            .max(1) as u32;
            self.image.resize_exact(width, height, FilterType::Triangle)
        };

        match encode(&resized, self.format) {
            Err(ImageError::Unsupported(_)) if self.format != ImageFormat::Png => {
                encode(&resized, ImageFormat::Png)
            }
            other => other,
        }
    }
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}

/// Classify a failure to decode an original.
///
/// The original is already in memory, so decoding it again gives the same
/// result: every decode error is fatal, including limits derived from the
/// dimensions its header declares.
pub fn decode_failure(error: ImageError) -> JobFailure {
    JobFailure::Fatal(format!("undecodable image: {error}"))
}

/// Classify a failure to render a decoded image.
///
/// I/O and resource limit errors while encoding may clear up; anything else
/// will not.
pub fn render_failure(error: ImageError) -> JobFailure {
    match error {
        ImageError::IoError(_) | ImageError::Limits(_) => JobFailure::Retryable(error.to_string()),
        _ => JobFailure::Fatal(error.to_string()),
    }
}
