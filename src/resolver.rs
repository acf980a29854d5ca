//! Merges raw page metadata into the canonical preview shape.
//!
//! Every field has an ordered list of candidate sources. The first candidate
//! holding a non-empty value wins; an empty string counts as absent.

use crate::models::{RawPageMetadata, ResolvedPreview};
use crate::normalize::NormalizedUrl;

/// Returns the first candidate that is present and non-empty.
pub fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .map(str::to_owned)
}

pub fn resolve_image(raw: &RawPageMetadata) -> Option<String> {
    first_present([
        raw.og.image.as_deref(),
        raw.images.first().map(|img| img.url.as_str()),
    ])
}

pub fn resolve_description(raw: &RawPageMetadata) -> Option<String> {
    first_present([raw.og.description.as_deref(), raw.meta.description.as_deref()])
}

pub fn resolve_title(raw: &RawPageMetadata) -> String {
    first_present([raw.og.title.as_deref(), raw.meta.title.as_deref()]).unwrap_or_default()
}

pub fn resolve_site_name(raw: &RawPageMetadata) -> String {
    first_present([raw.og.site_name.as_deref()]).unwrap_or_default()
}

/// `None` in, `None` out: a page with no metadata is a not-found outcome.
///
/// `hostname` always comes from `url`, never from the page.
pub fn resolve(url: &NormalizedUrl, raw: Option<&RawPageMetadata>) -> Option<ResolvedPreview> {
    let raw = raw?;

    Some(ResolvedPreview {
        title: resolve_title(raw),
        description: resolve_description(raw),
        image: resolve_image(raw),
        site_name: resolve_site_name(raw),
        hostname: url.hostname().to_string(),
    })
}
