//! URL screenshots. This adapter does not use the envelope: success is raw PNG
//! bytes, failure is a `ScreenshotError` pointing at a placeholder image.

use std::time::Duration;

use url::Url;

use crate::data_models::ScreenshotError;
use crate::render::{RenderError, RenderRequest, Renderer};
use crate::safety::DomainBlocklist;

pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);
pub const VIEWPORT_WIDTH: u32 = 1024;
pub const VIEWPORT_HEIGHT: u32 = 1024;
/// Time given to client-side scripts after the page has loaded.
pub const SETTLE_DELAY: Duration = Duration::from_millis(1000);

const ASSET_BASE: &str = "https://bignutty.gitlab.io/webstorage4/v2/assets/screenshot/brand-update-2024/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    InvalidUrl,
    Nsfw,
    Unavailable,
}

impl Placeholder {
    pub fn image_url(self) -> String {
        let file = match self {
            Placeholder::InvalidUrl => "scr_invalid_url.png",
            Placeholder::Nsfw => "scr_nsfw.png",
            Placeholder::Unavailable => "scr_unavailable.png",
        };
        format!("{ASSET_BASE}{file}")
    }

    fn with_message(self, message: impl Into<String>) -> ScreenshotError {
        ScreenshotError {
            image_url: self.image_url(),
            message: message.into(),
        }
    }
}

/// Prepends `https://` when no http(s) scheme is given.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Runs the checks in order (missing url, malformed url, blocked host unless
/// `nsfw`) and returns the URL to render.
pub fn validate(raw: Option<&str>, nsfw: bool, blocklist: &DomainBlocklist) -> Result<Url, ScreenshotError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Placeholder::InvalidUrl.with_message("missing 'url' query parameter"))?;

    let url = Url::parse(&normalize_url(raw))
        .ok()
        .filter(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .ok_or_else(|| Placeholder::InvalidUrl.with_message("invalid URL format"))?;

    if !nsfw {
        if let Some(host) = url.host_str() {
            if blocklist.is_blocked(host) {
                return Err(Placeholder::Nsfw.with_message("this website is blocked"));
            }
        }
    }
    Ok(url)
}

pub async fn capture(
    renderer: &dyn Renderer,
    blocklist: &DomainBlocklist,
    raw_url: Option<&str>,
    nsfw: bool,
) -> Result<Vec<u8>, ScreenshotError> {
    let url = validate(raw_url, nsfw, blocklist)?;
    tracing::info!(url = %url, nsfw, "rendering screenshot");

    let request = RenderRequest {
        url,
        width: VIEWPORT_WIDTH,
        height: VIEWPORT_HEIGHT,
        settle: SETTLE_DELAY,
    };
    let rendered = match tokio::time::timeout(RENDER_TIMEOUT, renderer.render(&request)).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::TimedOut(RENDER_TIMEOUT)),
    };

    rendered.map_err(|e| {
        tracing::warn!(url = %request.url, error = %e, "screenshot failed");
        Placeholder::Unavailable.with_message(e.to_string())
    })
}
