//! Error types for the image-select-compare crate.

/// Errors that can occur while converting selections, rendering masks and
/// snapshots, or talking to the processing proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Image dimensions are zero or not finite.
    #[error("invalid image geometry: natural {natural_width}x{natural_height}, display {display_width}x{display_height}")]
    InvalidGeometry {
        /// Intrinsic image width.
        natural_width: f64,
        /// Intrinsic image height.
        natural_height: f64,
        /// Rendered image width.
        display_width: f64,
        /// Rendered image height.
        display_height: f64,
    },

    /// A rectangle could not be parsed or has negative/non-finite components.
    #[error("invalid rectangle: {0}")]
    InvalidRect(String),

    /// The tool name is not one of the known tools.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool view is missing an input needed before processing.
    #[error("{0}")]
    NotReady(&'static str),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A proxy request or response could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The proxy answered with a non-success status.
    #[error("proxy error ({status}): {message}")]
    Proxy {
        /// HTTP status code.
        status: u16,
        /// Message forwarded from the proxy body.
        message: String,
    },

    /// The HTTP transport failed.
    #[cfg(feature = "client")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
