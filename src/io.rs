use std::path::Path;

use image::{EncodableLayout, GrayImage, ImageBuffer, ImageReader, PixelWithColorType};
use tracing::debug;

use crate::error::{Result, VisionError};

/// Load an image from disk and convert it to 8-bit grayscale
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let load_error = |source| VisionError::ImageLoad {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| load_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(load_error)?;

    debug!(?path, width = img.width(), height = img.height(), "loaded image");

    Ok(img.to_luma8())
}

/// Save an image buffer, inferring the format from the extension
pub fn save_image<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, path: &Path) -> Result<()>
where
    P: PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    img.save(path).map_err(|source| VisionError::ImageSave {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, "saved image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load_grayscale(Path::new("does/not/exist.png"));
        assert!(matches!(result, Err(VisionError::ImageLoad { .. })));
    }

    #[test]
    fn test_save_then_load_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let img = GrayImage::from_pixel(8, 6, Luma([42]));

        save_image(&img, &path).unwrap();
        let loaded = load_grayscale(&path).unwrap();
        assert_eq!(loaded.dimensions(), (8, 6));
        assert_eq!(loaded.get_pixel(3, 3)[0], 42);
    }
}
