use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing::debug;

use crate::error::{Result, VisionError};

/// Warp `img` through `projection` into a `width` x `height` canvas.
///
/// Sampling is bilinear; pixels that land outside the source stay black.
pub fn warp_perspective(
    img: &GrayImage,
    projection: &Projection,
    width: u32,
    height: u32,
) -> Result<GrayImage> {
    let (src_width, src_height) = img.dimensions();
    if src_width == 0 || src_height == 0 {
        return Err(VisionError::EmptyImage {
            width: src_width,
            height: src_height,
        });
    }

    debug!(
        src_width,
        src_height, width, height, "warping through perspective transform"
    );

    let mut output = GrayImage::new(width, height);
    warp_into(img, projection, Interpolation::Bilinear, Luma([0]), &mut output);

    Ok(output)
}

/// Copy the rectangle at (`x`, `y`) of size `width` x `height` out of `img`
pub fn crop(img: &GrayImage, x: u32, y: u32, width: u32, height: u32) -> GrayImage {
    image::imageops::crop_imm(img, x, y, width, height).to_image()
}
