//! File-level mask generation: load an image, convert a display-space
//! selection to its natural size, write the inpainting mask.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat};

use crate::error::{Error, Result};
use crate::geometry::{Display, ImageGeometry, Natural, Rect};
use crate::mask;

/// Options controlling mask generation.
#[derive(Debug, Clone)]
pub struct MaskOptions {
    /// Selection in display space.
    pub rect: Rect<Display>,
    /// Size the image was displayed at. `None` means its natural size.
    pub display_size: Option<(f64, f64)>,
}

impl MaskOptions {
    /// Options for `rect` selected on an image shown at natural size.
    #[must_use]
    pub fn new(rect: Rect<Display>) -> Self {
        Self {
            rect,
            display_size: None,
        }
    }

    /// Geometry for an image of the given natural size under these options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if any dimension is zero.
    pub fn geometry_for(&self, width: u32, height: u32) -> Result<ImageGeometry> {
        match self.display_size {
            Some((dw, dh)) => ImageGeometry::new(f64::from(width), f64::from(height), dw, dh),
            None => ImageGeometry::identity(width, height),
        }
    }
}

/// Result of generating a mask for one file.
#[derive(Debug)]
pub struct MaskResult {
    /// Path of the source image.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (selection covers no pixels).
    pub skipped: bool,
    /// Selection in the image's natural space, once computed.
    pub selection: Option<Rect<Natural>>,
    /// Human-readable status message.
    pub message: String,
}

impl MaskResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            success: false,
            skipped: false,
            selection: None,
            message,
        }
    }
}

/// Generate and save the mask for a single image file.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &MaskOptions) -> MaskResult {
    let img = match image::open(input) {
        Ok(img) => img,
        Err(e) => return MaskResult::failed(input, format!("Failed to load: {e}")),
    };
    let (w, h) = (img.width(), img.height());

    let geometry = match opts.geometry_for(w, h) {
        Ok(g) => g,
        Err(e) => return MaskResult::failed(input, e.to_string()),
    };
    let selection = geometry.to_natural(&opts.rect);
    log::debug!("{}: {} -> {selection}", input.display(), opts.rect);

    let mut result = MaskResult {
        path: input.to_path_buf(),
        success: false,
        skipped: false,
        selection: Some(selection),
        message: String::new(),
    };

    let (x0, y0, x1, y1) = mask::covered_pixels(w, h, &selection);
    if selection.is_degenerate() || x0 == x1 || y0 == y1 {
        result.skipped = true;
        result.success = true;
        result.message = format!("Selection {selection} covers no pixels of {w}x{h} image");
        return result;
    }

    let mask = mask::render_mask(w, h, &selection);

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.message = format!("Failed to create output directory: {e}");
                return result;
            }
        }
    }

    match save_mask(&mask, output) {
        Ok(()) => {
            result.success = true;
            result.message = format!("Mask written ({}x{} px region)", x1 - x0, y1 - y0);
        }
        Err(e) => result.message = format!("Failed to save: {e}"),
    }
    result
}

/// Generate masks for every supported image in a directory.
///
/// Uses parallel iteration when the `cli` feature is enabled (via rayon).
#[must_use]
pub fn process_directory(input_dir: &Path, output_dir: &Path, opts: &MaskOptions) -> Vec<MaskResult> {
    let entries: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect(),
        Err(e) => {
            return vec![MaskResult::failed(
                input_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![MaskResult::failed(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }
    }

    let job = |input: &PathBuf| {
        let output = output_dir.join(mask_file_name(input));
        process_file(input, &output, opts)
    };

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        entries.par_iter().map(job).collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        entries.iter().map(job).collect()
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save a mask. Masks are always lossless; only PNG and BMP are accepted.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_mask(mask: &GrayImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    match format {
        ImageFormat::Png => std::fs::write(path, mask::encode_png(mask)?)?,
        ImageFormat::Bmp => DynamicImage::ImageLuma8(mask.clone()).save(path)?,
        _ => return Err(Error::UnsupportedFormat(format!("{format:?}"))),
    }
    Ok(())
}

fn mask_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}_mask.png")
}

/// Generate a default mask path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_mask.png"`.
#[must_use]
pub fn default_mask_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(mask_file_name(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mask_path_appends_suffix_and_png() {
        let p = default_mask_path(Path::new("/tmp/photo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/photo_mask.png"));

        let p = default_mask_path(Path::new("image.webp"));
        assert_eq!(p.file_name().unwrap().to_str().unwrap(), "image_mask.png");
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("photo.jpg")));
        assert!(is_supported_image(Path::new("photo.JPEG")));
        assert!(is_supported_image(Path::new("photo.png")));
        assert!(is_supported_image(Path::new("photo.webp")));
        assert!(is_supported_image(Path::new("photo.bmp")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("photo.gif")));
        assert!(!is_supported_image(Path::new("photo.txt")));
        assert!(!is_supported_image(Path::new("photo")));
    }

    #[test]
    fn geometry_defaults_to_identity() {
        let opts = MaskOptions::new(Rect::new(0.0, 0.0, 1.0, 1.0).unwrap());
        let g = opts.geometry_for(640, 480).unwrap();
        assert!((g.scale_x() - 1.0).abs() < 1e-12);
        assert!((g.scale_y() - 1.0).abs() < 1e-12);

        let scaled = MaskOptions {
            display_size: Some((320.0, 240.0)),
            ..opts
        };
        let g = scaled.geometry_for(640, 480).unwrap();
        assert!((g.scale_x() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn save_mask_rejects_lossy_formats() {
        let mask = GrayImage::new(2, 2);
        let err = save_mask(&mask, Path::new("mask.jpg")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }
}
