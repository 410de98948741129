use hough_circles_core::{detect_circles, detect_circles_roi, Detection, HoughError, HoughParams, Roi};
use image::GrayImage;

/// Detect circles in a grayscale edge mask (any nonzero luma = edge).
pub fn find_circles_image(
    img: &GrayImage,
    params: &HoughParams,
) -> Result<Vec<Detection>, HoughError> {
    detect_circles(
        img.as_raw(),
        img.width() as usize,
        img.height() as usize,
        params,
    )
}

/// Detect circles inside an ROI of a grayscale edge mask.
pub fn find_circles_image_roi(
    img: &GrayImage,
    roi: Roi,
    params: &HoughParams,
) -> Result<Vec<Detection>, HoughError> {
    detect_circles_roi(
        img.as_raw(),
        img.width() as usize,
        img.height() as usize,
        roi,
        params,
    )
}
