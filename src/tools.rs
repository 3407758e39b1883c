//! The image tools offered by the site and the prompts sent for each.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One of the AI image tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Cut the subject out onto a transparent background.
    BackgroundRemover,
    /// Inpaint a user-selected watermark region.
    WatermarkRemover,
    /// Sharpen and color-correct; result shown in the compare slider.
    ImageEnhancer,
    /// Restyle a photo as a cartoon.
    ImageToCartoon,
    /// Generate an icon from a text prompt, no upload.
    IconGenerator,
}

impl ToolKind {
    /// Every tool, in home-grid order.
    pub const ALL: [ToolKind; 5] = [
        ToolKind::BackgroundRemover,
        ToolKind::WatermarkRemover,
        ToolKind::ImageEnhancer,
        ToolKind::ImageToCartoon,
        ToolKind::IconGenerator,
    ];

    /// Display title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ToolKind::BackgroundRemover => "Background Remover",
            ToolKind::WatermarkRemover => "Watermark Remover",
            ToolKind::ImageEnhancer => "Image Enhancer",
            ToolKind::ImageToCartoon => "Image to Cartoon",
            ToolKind::IconGenerator => "Icons Generator",
        }
    }

    /// Stable identifier, as used on the command line.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ToolKind::BackgroundRemover => "background-remover",
            ToolKind::WatermarkRemover => "watermark-remover",
            ToolKind::ImageEnhancer => "image-enhancer",
            ToolKind::ImageToCartoon => "image-to-cartoon",
            ToolKind::IconGenerator => "icon-generator",
        }
    }

    /// Instruction sent alongside an uploaded image. `None` for the icon generator.
    #[must_use]
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            ToolKind::BackgroundRemover => Some(
                "Remove the background from this image, leaving only the main subject. \
                 Make the background transparent.",
            ),
            ToolKind::WatermarkRemover => Some(
                "I have provided an image and a mask. Inpaint the area of the image that \
                 corresponds to the white section of the mask. Fill this area seamlessly \
                 based on the surrounding content.",
            ),
            ToolKind::ImageEnhancer => Some(
                "Enhance the quality of this image. Improve sharpness, clarity, and color \
                 balance. Make it look professional.",
            ),
            ToolKind::ImageToCartoon => Some(
                "Convert this photo into a cartoon. Apply a stylized, artistic cartoon effect, \
                 emphasizing outlines and simplifying colors, similar to a classic animated movie.",
            ),
            ToolKind::IconGenerator => None,
        }
    }

    /// Whether the tool works on an uploaded image.
    #[must_use]
    pub fn takes_upload(self) -> bool {
        !matches!(self, ToolKind::IconGenerator)
    }

    /// Whether processing needs a selected region (and therefore a mask).
    #[must_use]
    pub fn requires_selection(self) -> bool {
        matches!(self, ToolKind::WatermarkRemover)
    }

    /// Whether the result is shown in the compare slider.
    #[must_use]
    pub fn compares_result(self) -> bool {
        matches!(self, ToolKind::ImageEnhancer)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ToolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolKind::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownTool(s.to_string()))
    }
}

/// Wrap a user's icon description in the generation template.
#[must_use]
pub fn icon_prompt(description: &str) -> String {
    format!(
        "Generate a high-quality, modern, minimalist icon of {description}. The icon should be \
         on a transparent background, suitable for a web application. Vector style, clean lines."
    )
}
