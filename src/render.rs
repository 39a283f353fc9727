//! The render capability: turn a URL into PNG bytes. The screenshot adapter
//! only sees the `Renderer` trait.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::fetch::{FetchError, UpstreamClient};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render capability is not configured")]
    NotConfigured,

    #[error("render timed out after {0:?}")]
    TimedOut(Duration),

    #[error("render service failed: {0}")]
    Service(#[from] FetchError),

    #[error("browser error: {0}")]
    Browser(String),
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: Url,
    pub width: u32,
    pub height: u32,
    /// Pause after load so client-side scripts can paint.
    pub settle: Duration,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError>;
}

/// Used when neither a capture service nor a browser is available.
#[derive(Debug, Default)]
pub struct UnavailableRenderer;

#[async_trait]
impl Renderer for UnavailableRenderer {
    async fn render(&self, _request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::NotConfigured)
    }
}

/// Client for an HTTP capture service:
/// `GET {base}/capture?url=..&wait=<ms>&width=..&height=..` answers PNG bytes.
#[derive(Debug, Clone)]
pub struct RemoteRenderer {
    client: UpstreamClient,
    base_url: String,
    timeout: Duration,
}

impl RemoteRenderer {
    pub fn new(client: UpstreamClient, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn capture_url(&self) -> String {
        format!("{}/capture", self.base_url)
    }
}

#[async_trait]
impl Renderer for RemoteRenderer {
    async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let wait = request.settle.as_millis().to_string();
        let width = request.width.to_string();
        let height = request.height.to_string();
        let png = self
            .client
            .get(
                &self.capture_url(),
                &[
                    ("url", request.url.as_str()),
                    ("wait", wait.as_str()),
                    ("width", width.as_str()),
                    ("height", height.as_str()),
                ],
            )?
            .timeout(self.timeout)
            .bytes()
            .await?;
        Ok(png)
    }
}

#[cfg(feature = "browser")]
pub use browser::BrowserRenderer;

#[cfg(feature = "browser")]
mod browser {
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig, HeadlessMode};
    use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
    use chromiumoxide::page::ScreenshotParams;
    use futures::StreamExt;
    use tokio::task::JoinHandle;

    use super::{RenderError, RenderRequest, Renderer};

    /// Headless Chromium owned by the process. Each render opens and closes
    /// its own page.
    pub struct BrowserRenderer {
        browser: Browser,
        handle: JoinHandle<()>,
    }

    impl BrowserRenderer {
        pub async fn launch() -> Result<Self, RenderError> {
            let config = BrowserConfig::builder()
                .headless_mode(HeadlessMode::New)
                .no_sandbox()
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .build()
                .map_err(RenderError::Browser)?;

            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| RenderError::Browser(e.to_string()))?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            Ok(Self { browser, handle })
        }
    }

    impl Drop for BrowserRenderer {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    fn browser_err(e: impl std::fmt::Display) -> RenderError {
        RenderError::Browser(e.to_string())
    }

    #[async_trait]
    impl Renderer for BrowserRenderer {
        async fn render(&self, request: &RenderRequest) -> Result<Vec<u8>, RenderError> {
            let page = self.browser.new_page("about:blank").await.map_err(browser_err)?;

            let result = async {
                page.execute(SetDeviceMetricsOverrideParams::new(
                    i64::from(request.width),
                    i64::from(request.height),
                    1.0,
                    false,
                ))
                .await
                .map_err(browser_err)?;

                page.goto(request.url.as_str()).await.map_err(browser_err)?;
                page.wait_for_navigation().await.map_err(browser_err)?;
                tokio::time::sleep(request.settle).await;

                page.screenshot(
                    ScreenshotParams::builder()
                        .format(CaptureScreenshotFormat::Png)
                        .build(),
                )
                .await
                .map_err(browser_err)
            }
            .await;

            if let Err(e) = page.close().await {
                tracing::debug!("failed to close render page: {}", e);
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Endpoints;

    fn request() -> RenderRequest {
        RenderRequest {
            url: Url::parse("https://example.com").unwrap(),
            width: 1024,
            height: 1024,
            settle: Duration::from_millis(1000),
        }
    }

    #[tokio::test]
    async fn test_unavailable_renderer() {
        let err = UnavailableRenderer.render(&request()).await.unwrap_err();
        assert!(matches!(err, RenderError::NotConfigured));
    }

    #[test]
    fn test_remote_capture_url_trims_slash() {
        let client = UpstreamClient::new(Endpoints::default()).unwrap();
        let renderer = RemoteRenderer::new(client, "http://render.local:9000/", Duration::from_secs(30));
        assert_eq!(renderer.capture_url(), "http://render.local:9000/capture");
    }
}
