//! Image dimension probing

use crate::error::AnalyzeError;
use crate::ContentStats;
use std::path::Path;

/// Read width and height from the image header
pub fn analyze(path: &Path) -> Result<ContentStats, AnalyzeError> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(ContentStats::Image { width, height })
}
