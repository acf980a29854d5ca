use std::net::{IpAddr, SocketAddr};

use axum::async_trait;
use once_cell::sync::Lazy;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Client as ReqwestClient;
use scraper::{Html, Selector};
use url::{Host, Url};

use super::{ExtractError, ExtractOutcome, MetadataExtractor};
use crate::config::ExtractorConfig;
use crate::models::{ImageCandidate, MetaTags, OpenGraph, RawPageMetadata};

const MAX_REDIRECTS: usize = 5;

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src]").expect("img selector is valid"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector is valid"));

// ── Public helpers ─────────────────────────────────────────────────────────

/// Returns `true` if `ip` is a private, loopback, link-local or unspecified
/// address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
                || (o[0] == 100 && (64..=127).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(IpAddr::V4(v4));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
        }
    }
}

/// Parse Open Graph tags, generic meta tags and `<img>` candidates out of
/// `html`. Relative image URLs are resolved against `base`.
pub fn parse_page(html: &str, base: &Url) -> RawPageMetadata {
    let document = Html::parse_document(html);

    let og = OpenGraph {
        title: get_og(&document, "og:title"),
        description: get_og(&document, "og:description"),
        image: get_og(&document, "og:image").and_then(|img| absolutize(base, &img)),
        site_name: get_og(&document, "og:site_name"),
    };

    let meta = MetaTags {
        title: get_title_tag(&document).or_else(|| get_meta_name(&document, "title")),
        description: get_meta_name(&document, "description"),
    };

    let images = document
        .select(&IMG_SELECTOR)
        .filter_map(|el| el.value().attr("src"))
        .filter_map(|src| absolutize(base, src.trim()))
        .map(ImageCandidate::new)
        .collect();

    RawPageMetadata { images, og, meta }
}

// `og:` tags are meant to use `property`, but plenty of pages use `name`.
fn get_og(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(
        r#"meta[property="{property}"], meta[name="{property}"]"#
    ))
    .ok()?;
    first_content(doc, &selector)
}

fn get_meta_name(doc: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}"]"#)).ok()?;
    first_content(doc, &selector)
}

fn first_content(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn get_title_tag(doc: &Html) -> Option<String> {
    doc.select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve `href` against `base`, keeping only http(s) results.
fn absolutize(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    let resolved = base.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.into()),
        _ => None,
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

// ── Extractor ──────────────────────────────────────────────────────────────

/// Fetches a page over HTTP and scrapes its metadata.
///
/// Holds one `reqwest::Client` so connections are pooled across requests.
pub struct HtmlExtractor {
    client: ReqwestClient,
    max_body_bytes: usize,
    allow_private_hosts: bool,
}

impl HtmlExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let client = ReqwestClient::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect_policy(MAX_REDIRECTS, !config.allow_private_hosts))
            .build()
            .map_err(ExtractError::Client)?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    /// Reject hosts that are, or resolve to, private addresses.
    async fn check_host(&self, url: &Url) -> Result<(), ExtractError> {
        if let Some(ip) = literal_ip(url) {
            return reject_if_private(ip, url);
        }
        let host = match url.host_str() {
            Some(host) => host.to_string(),
            None => return Ok(()),
        };

        let port = url.port_or_known_default().unwrap_or(80);
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host.as_str(), port))
            .await
            .map_err(|source| ExtractError::Resolve {
                host: host.clone(),
                source,
            })?
            .collect();

        if addrs.iter().any(|addr| is_private_ip(addr.ip())) {
            return Err(ExtractError::Blocked(host));
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Option<RawPageMetadata>, ExtractError> {
        let parsed = match Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => {
                tracing::debug!(url, "Not a fetchable URL");
                return Ok(None);
            }
        };

        if !self.allow_private_hosts {
            self.check_host(&parsed).await?;
        }

        let mut response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(classify_fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, %status, "Upstream page returned non-success status");
            return Ok(None);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html");
        if !is_html(content_type) {
            tracing::debug!(url, content_type, "Skipping non-HTML response");
            return Ok(None);
        }

        let base = response.url().clone();

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(ExtractError::Body)? {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let html = String::from_utf8_lossy(&body);
        Ok(Some(parse_page(&html, &base)))
    }
}

fn literal_ip(url: &Url) -> Option<IpAddr> {
    match url.host() {
        Some(Host::Ipv4(v4)) => Some(IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => Some(IpAddr::V6(v6)),
        _ => None,
    }
}

/// Raised from the redirect policy when a hop targets a private address.
#[derive(Debug, thiserror::Error)]
#[error("redirect to private address {0}")]
struct PrivateRedirect(String);

/// Follow at most `max` redirects. With `block_private`, any hop to a private
/// IP literal aborts the request. Domain hops are not re-resolved here.
fn redirect_policy(max: usize, block_private: bool) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            return attempt.error("too many redirects");
        }
        if block_private {
            if let Some(ip) = literal_ip(attempt.url()).filter(|ip| is_private_ip(*ip)) {
                return attempt.error(PrivateRedirect(ip.to_string()));
            }
        }
        attempt.follow()
    })
}

/// A redirect refused by `redirect_policy` surfaces as `Blocked`; anything
/// else is a plain fetch failure.
fn classify_fetch_error(e: reqwest::Error) -> ExtractError {
    let mut source = std::error::Error::source(&e);
    while let Some(err) = source {
        if let Some(PrivateRedirect(host)) = err.downcast_ref::<PrivateRedirect>() {
            return ExtractError::Blocked(host.clone());
        }
        source = err.source();
    }
    ExtractError::Fetch(e)
}

fn reject_if_private(ip: IpAddr, url: &Url) -> Result<(), ExtractError> {
    if is_private_ip(ip) {
        Err(ExtractError::Blocked(
            url.host_str().unwrap_or_default().to_string(),
        ))
    } else {
        Ok(())
    }
}

#[async_trait]
impl MetadataExtractor for HtmlExtractor {
    async fn extract(&self, url: &str) -> ExtractOutcome {
        self.fetch(url).await.into()
    }
}

// ── Unit tests ─────────────────────────────────────────────────────────────
