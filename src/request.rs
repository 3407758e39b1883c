//! JSON wire format of the image-processing proxy, plus a blocking client.
//!
//! Requests are `{"action": ..., "payload": {...}}`. A successful response
//! carries `resultBase64`; a failed one carries `error`.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Natural, Rect};
use crate::mask;
use crate::tools::{icon_prompt, ToolKind};

/// Path of the proxy function on the site.
pub const PROXY_PATH: &str = "/.netlify/functions/gemini-proxy";

/// A request to the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum ProxyRequest {
    /// Edit an uploaded image.
    ProcessImage(ProcessImagePayload),
    /// Generate an icon from text.
    GenerateIcon(GenerateIconPayload),
}

/// Payload of a `processImage` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImagePayload {
    /// The uploaded image, base64 without a data-URL prefix.
    pub base64_image: String,
    /// MIME type of the uploaded image.
    pub mime_type: String,
    /// Tool instruction.
    pub prompt: String,
    /// Inpainting mask (PNG, base64), watermark remover only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_base64: Option<String>,
}

/// Payload of a `generateIcon` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateIconPayload {
    /// The user's icon description, before templating.
    pub prompt: String,
}

/// Body returned by the proxy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// Result image, base64 PNG.
    pub result_base64: Option<String>,
    /// Error message on failure.
    pub error: Option<String>,
}

impl ProxyResponse {
    /// Turn a status code and body into the result image or an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Proxy`] for a non-2xx status or a body without a result,
    /// and [`Error::Json`] if a successful body is not valid JSON.
    pub fn into_result(status: u16, body: &str) -> Result<String> {
        let parsed: std::result::Result<ProxyResponse, _> = serde_json::from_str(body);
        if !(200..300).contains(&status) {
            let message = parsed
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            return Err(Error::Proxy { status, message });
        }
        parsed?.result_base64.ok_or_else(|| Error::Proxy {
            status,
            message: "No image data found in the AI response.".to_string(),
        })
    }
}

/// MIME type for a file path, from its extension.
#[must_use]
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

impl ProxyRequest {
    /// Build the request for `tool` over an uploaded image.
    ///
    /// The watermark remover gets a mask rendered from `selection` at the
    /// image's natural size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotReady`] if the tool needs no upload or the watermark
    /// remover has no selection, and an image error if mask encoding fails.
    pub fn for_upload(
        tool: ToolKind,
        image_bytes: &[u8],
        mime_type: &str,
        natural_size: (u32, u32),
        selection: Option<&Rect<Natural>>,
    ) -> Result<Self> {
        let prompt = tool
            .prompt()
            .ok_or(Error::NotReady("This tool does not take an uploaded image."))?;
        let mask_base64 = if tool.requires_selection() {
            let rect = selection.ok_or(Error::NotReady(
                "Please select the watermark area on the image.",
            ))?;
            let (w, h) = natural_size;
            Some(mask::encode_png_base64(&mask::render_mask(w, h, rect))?)
        } else {
            None
        };
        Ok(ProxyRequest::ProcessImage(ProcessImagePayload {
            base64_image: base64::engine::general_purpose::STANDARD.encode(image_bytes),
            mime_type: mime_type.to_string(),
            prompt: prompt.to_string(),
            mask_base64,
        }))
    }

    /// Build an icon-generation request.
    #[must_use]
    pub fn icon(description: &str) -> Self {
        ProxyRequest::GenerateIcon(GenerateIconPayload {
            prompt: description.to_string(),
        })
    }

    /// The instruction the model ultimately receives.
    #[must_use]
    pub fn effective_prompt(&self) -> String {
        match self {
            ProxyRequest::ProcessImage(p) => p.prompt.clone(),
            ProxyRequest::GenerateIcon(p) => icon_prompt(&p.prompt),
        }
    }

    /// Serialize to the JSON body sent to the proxy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Blocking client for the proxy endpoint.
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ProxyClient {
    url: String,
    http: reqwest::blocking::Client,
}

#[cfg(feature = "client")]
impl ProxyClient {
    /// Client for the proxy hosted at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}{PROXY_PATH}", base_url.trim_end_matches('/')),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Send a request and return the decoded result image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on transport failure, and [`Error::Proxy`] when
    /// the proxy reports an error or the result is not valid base64.
    pub fn send(&self, request: &ProxyRequest) -> Result<Vec<u8>> {
        log::info!("proxy: POST {} ({})", self.url, action_name(request));
        let response = self.http.post(&self.url).json(request).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        log::debug!("proxy: status {status}, {} bytes", body.len());

        let result = ProxyResponse::into_result(status, &body)?;
        base64::engine::general_purpose::STANDARD
            .decode(result)
            .map_err(|e| Error::Proxy {
                status,
                message: format!("invalid base64 in result: {e}"),
            })
    }
}

#[cfg(feature = "client")]
fn action_name(request: &ProxyRequest) -> &'static str {
    match request {
        ProxyRequest::ProcessImage(_) => "processImage",
        ProxyRequest::GenerateIcon(_) => "generateIcon",
    }
}
