// src/analyzer/service.rs
// =============================================================================
// This module runs one full page analysis.
//
// How it works:
// 1. Fetch the page with a GET request
// 2. Extract structural features from the HTML (title, headings, links...)
// 3. Split the links into internal and external ones
// 4. Probe both groups for reachability (at the same time)
// 5. Put everything together in an AnalysisResult
//
// Any failure in steps 1-3 aborts the analysis with an AnalysisError.
// Failures in step 4 only show up as inaccessible counts.
// =============================================================================

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

use super::document::{extract_features, StructuralFeatures};
use super::error::{AnalysisError, Result};
use super::links::{classify_links, origin_of};
use super::probe::count_inaccessible;

/// Settings for the HTTP client shared by the page fetch and all probes
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("page-analyzer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// The finished analysis of one page
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub features: StructuralFeatures,
    pub internal_links_count: usize,
    pub external_links_count: usize,
    pub inaccessible_internal_links_count: usize,
    pub inaccessible_external_links_count: usize,
    /// Internal links in their on-page form ("/docs" stays "/docs")
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
}

impl AnalysisResult {
    pub fn inaccessible_links_count(&self) -> usize {
        self.inaccessible_internal_links_count + self.inaccessible_external_links_count
    }
}

pub struct PageAnalyzer {
    client: Client,
}

impl PageAnalyzer {
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    // Analyzes the page at `page_url`
    //
    // Parameters:
    //   cancel: cancelling this token stops the fetch (error) and the probes
    //           (remaining links count as inaccessible)
    //   page_url: absolute http/https URL of the page
    //
    // Returns: AnalysisResult, or the error that stopped the analysis
    pub async fn analyze(
        &self,
        cancel: &CancellationToken,
        page_url: &str,
    ) -> Result<AnalysisResult> {
        info!(url = page_url, "analyzing page");

        let url = parse_page_url(page_url)?;
        // parse_page_url() guarantees a host, so there is always an origin
        let origin = origin_of(&url).ok_or_else(|| AnalysisError::InvalidUrl {
            url: page_url.to_string(),
            reason: "URL has no host".to_string(),
        })?;

        let html = self.fetch_page(cancel, url).await.map_err(|e| {
            warn!(url = page_url, error = %e, "page fetch failed");
            e
        })?;

        let features = extract_features(&html);
        let links = classify_links(&features.raw_links, &origin);

        let internal_links = links.internal_hrefs();
        let internal_targets = links.internal_targets();
        let external_links = links.external;

        let (inaccessible_internal, inaccessible_external) = tokio::join!(
            count_inaccessible(&self.client, internal_targets, cancel),
            count_inaccessible(&self.client, external_links.clone(), cancel),
        );

        let result = AnalysisResult {
            features,
            internal_links_count: internal_links.len(),
            external_links_count: external_links.len(),
            inaccessible_internal_links_count: inaccessible_internal,
            inaccessible_external_links_count: inaccessible_external,
            internal_links,
            external_links,
        };

        info!(
            url = page_url,
            internal = result.internal_links_count,
            external = result.external_links_count,
            inaccessible = result.inaccessible_links_count(),
            "analysis complete"
        );

        Ok(result)
    }

    // Fetches the page body, honoring cancellation
    async fn fetch_page(&self, cancel: &CancellationToken, url: Url) -> Result<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
            result = fetch_body(&self.client, url) => result,
        }
    }
}

// GETs a page and reads the whole body as text
//
// Only 2xx responses are accepted; anything else becomes a Status error.
async fn fetch_body(client: &Client, url: Url) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(AnalysisError::Status(status.as_u16()));
    }

    let html = response.text().await?;
    Ok(html)
}

// Validates the page URL before any request is made
//
// Only absolute http/https URLs with a host can be fetched.
fn parse_page_url(page_url: &str) -> Result<Url> {
    let invalid = |reason: String| AnalysisError::InvalidUrl {
        url: page_url.to_string(),
        reason,
    };

    let url = Url::parse(page_url).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Test Page</title>
</head>
<body>
    <h1>Main Heading</h1>
    <h2>Sub Heading</h2>
    <a href="/internal-link">Internal Link</a>
    <a href="{origin}/internal">Internal Full URL</a>
    <a href="http://127.0.0.1:1/external">External Link</a>
    <form>
        <input type="password" name="password">
    </form>
</body>
</html>"#;

    fn test_analyzer() -> PageAnalyzer {
        PageAnalyzer::with_config(AnalyzerConfig {
            timeout: Duration::from_secs(5),
            ..AnalyzerConfig::default()
        })
        .unwrap()
    }

    async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(status)
                    .insert_header("content-type", "text/html")
                    .set_body_string(body),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn test_parse_page_url() {
        assert!(parse_page_url("https://example.com/page").is_ok());
        assert!(matches!(
            parse_page_url("not a url"),
            Err(AnalysisError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_page_url("ftp://example.com/file"),
            Err(AnalysisError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_page_url("mailto:someone@example.com"),
            Err(AnalysisError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_end_to_end_analysis() {
        let server = MockServer::start().await;
        let origin = server.uri();

        mount_page(&server, "/", 200, SAMPLE_HTML.replace("{origin}", &origin)).await;
        Mock::given(method("HEAD"))
            .and(path("/internal-link"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        // "/internal" is not mounted, so it answers 404

        let cancel = CancellationToken::new();
        let result = test_analyzer().analyze(&cancel, &format!("{}/", origin)).await.unwrap();

        assert_eq!(result.features.html_version.map(|v| v.to_string()), Some("HTML5".to_string()));
        assert_eq!(result.features.title.as_deref(), Some("Test Page"));
        assert_eq!(result.features.headings.get("h1"), Some(&1));
        assert_eq!(result.features.headings.get("h2"), Some(&1));
        assert!(result.features.has_login_form);

        assert_eq!(result.internal_links_count, 2);
        assert_eq!(result.external_links_count, 1);
        assert_eq!(result.internal_links.len(), result.internal_links_count);
        assert_eq!(result.external_links.len(), result.external_links_count);
        assert_eq!(
            result.internal_links,
            vec!["/internal-link".to_string(), format!("{}/internal", origin)]
        );
        assert_eq!(result.external_links, vec!["http://127.0.0.1:1/external"]);

        assert_eq!(result.inaccessible_internal_links_count, 1);
        assert_eq!(result.inaccessible_external_links_count, 1);
        assert_eq!(result.inaccessible_links_count(), 2);
    }

    #[tokio::test]
    async fn test_page_without_links() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/empty",
            200,
            concat!(
                "<html><head><title>Empty</title></head>",
                "<body><p>Nothing here</p></body></html>",
            )
            .to_string(),
        )
        .await;

        let cancel = CancellationToken::new();
        let result = test_analyzer()
            .analyze(&cancel, &format!("{}/empty", server.uri()))
            .await
            .unwrap();

        assert_eq!(result.features.html_version, None);
        assert_eq!(result.internal_links_count, 0);
        assert_eq!(result.external_links_count, 0);
        assert_eq!(result.inaccessible_links_count(), 0);
        assert!(!result.features.has_login_form);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        for status in [400u16, 404, 500] {
            let route = format!("/status/{}", status);
            mount_page(&server, &route, status, String::new()).await;

            let cancel = CancellationToken::new();
            let err = test_analyzer()
                .analyze(&cancel, &format!("{}{}", server.uri(), route))
                .await
                .unwrap_err();

            assert!(matches!(err, AnalysisError::Status(code) if code == status));
            assert!(err.to_string().contains(&status.to_string()));
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let cancel = CancellationToken::new();
        let err = test_analyzer().analyze(&cancel, "://missing-scheme").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let cancel = CancellationToken::new();
        let err = test_analyzer()
            .analyze(&cancel, "http://127.0.0.1:1/")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cancelled_fetch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html></html>")
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = test_analyzer().analyze(&cancel, &server.uri()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let analyzer = PageAnalyzer::with_config(AnalyzerConfig {
            timeout: Duration::from_millis(200),
            ..AnalyzerConfig::default()
        })
        .unwrap();

        let cancel = CancellationToken::new();
        match analyzer.analyze(&cancel, &server.uri()).await {
            Err(AnalysisError::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }
    }
}
