//! Ergonomic wrappers over `hough-circles-core` that accept
//! `image::GrayImage` inputs.
//!
//! This crate is organized into a few focused modules:
//! - [`image`] – GrayImage entry points treating the raw luma buffer as
//!   the binary edge mask (nonzero = edge).
//! - [`app`] – shared I/O plumbing for the CLI and examples: JSON
//!   config, JSON detection dump, PNG overlay.
//! - [`logger`] – a simple `log` implementation used by examples.

pub mod app;
pub mod image;
pub mod logger;

// Re-export a focused subset of core types for convenience. Consumers
// that need lower-level primitives (lookup tables, the raw accumulator,
// etc.) are encouraged to depend on `hough-circles-core` directly.
pub use hough_circles_core::{
    detect_circles, detect_circles_roi, detect_circles_with_trace, AngularMode, Detection,
    HoughError, HoughParams, HoughResult, Roi,
};

pub use crate::image::{find_circles_image, find_circles_image_roi};
