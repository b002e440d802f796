// ABOUTME: Image link extraction and rewriting for markdown text
// ABOUTME: Normalizes ![[embed]] syntax and swaps link targets using a conversion map

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Image basename -> hosted URL
pub type ConversionMap = BTreeMap<String, String>;

lazy_static! {
    /// `![[target]]`
    static ref EMBED_RE: Regex = Regex::new(r"!\[\[(.+?)\]\]").unwrap();
    /// `![description](target)`; a target containing `)` is cut short
    static ref IMAGE_RE: Regex = Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink<'a> {
    pub description: &'a str,
    pub target: &'a str,
}

/// All `![description](target)` links in order of appearance
pub fn image_links(content: &str) -> Vec<ImageLink<'_>> {
    IMAGE_RE
        .captures_iter(content)
        .map(|cap| ImageLink {
            description: cap.get(1).map_or("", |m| m.as_str()),
            target: cap.get(2).map_or("", |m| m.as_str()),
        })
        .collect()
}

/// Image targets in order of appearance, duplicates kept
pub fn extract_image_targets(content: &str) -> Vec<String> {
    image_links(content)
        .into_iter()
        .map(|link| link.target.to_string())
        .collect()
}

/// Rewrite every `![[target]]` to `![caption](target)`
pub fn normalize_embeds(content: &str, caption: &str) -> String {
    EMBED_RE
        .replace_all(content, |cap: &Captures| format!("![{}]({})", caption, &cap[1]))
        .into_owned()
}

/// Point every image link whose target basename is mapped at its new URL.
/// Unmapped links are left exactly as they were.
pub fn rewrite_links(content: &str, mapping: &ConversionMap) -> String {
    IMAGE_RE
        .replace_all(content, |cap: &Captures| {
            let name = basename(&cap[2]);
            match mapping.get(name).filter(|_| !name.is_empty()) {
                Some(url) => format!("![{}]({})", &cap[1], url),
                None => cap[0].to_string(),
            }
        })
        .into_owned()
}

/// Last path component of a path or URL string
pub fn basename(target: &str) -> &str {
    target.rsplit(['/', '\\']).next().unwrap_or(target)
}
