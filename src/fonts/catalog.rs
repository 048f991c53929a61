// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Remote font catalog
//!
//! The catalog lists font families, each with an ordered list of variants
//! (e.g. `regular`, `700italic`) and a file URL per variant. It is fetched
//! once at startup and read-only thereafter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Default catalog service endpoint
pub const CATALOG_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

/// Catalog loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog parse error")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog URL")]
    Url(#[from] url::ParseError),
    #[error("catalog lists no font families")]
    Empty,
}

/// Failure to find a font file in the catalog
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no font family at index {0}")]
    Family(usize),
    #[error("family {family:?} has no variant at index {index}")]
    Variant { family: String, index: usize },
    #[error("family {family:?} has no file for variant {variant:?}")]
    File { family: String, variant: String },
}

/// A font family
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCatalogEntry {
    /// Family name
    pub family: String,
    /// Variant names, in catalog order
    #[serde(default)]
    pub variants: Vec<String>,
    /// File URL per variant name
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

impl FontCatalogEntry {
    /// Construct from `(variant, url)` pairs, in order
    pub fn new<'a>(family: &str, files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entry = FontCatalogEntry {
            family: family.to_string(),
            variants: vec![],
            files: BTreeMap::new(),
        };
        for (variant, url) in files {
            entry.variants.push(variant.to_string());
            entry.files.insert(variant.to_string(), url.to_string());
        }
        entry
    }

    /// Get a variant name by index
    pub fn variant(&self, index: usize) -> Option<&str> {
        self.variants.get(index).map(|s| s.as_str())
    }

    /// Find a variant by name
    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == name)
    }

    /// Get the file URL of a variant, as listed
    pub fn file(&self, variant: &str) -> Option<&str> {
        self.files.get(variant).map(|s| s.as_str())
    }
}

/// The list of available font families
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCatalog {
    #[serde(default)]
    items: Vec<FontCatalogEntry>,
}

impl FontCatalog {
    /// Construct from a list of families
    pub fn new(items: Vec<FontCatalogEntry>) -> Self {
        FontCatalog { items }
    }

    /// Parse the JSON response of the catalog service
    ///
    /// Fields other than `items[].family`, `items[].variants` and
    /// `items[].files` are ignored.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let catalog: FontCatalog = serde_json::from_str(text)?;
        log::info!("FontCatalog: {} families", catalog.len());
        Ok(catalog)
    }

    /// Build the request URL for the catalog service
    pub fn request_url(base: &str, api_key: Option<&str>) -> Result<Url, CatalogError> {
        let mut url = Url::parse(base)?;
        if let Some(key) = api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// Number of families
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the catalog lists no families
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a family by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&FontCatalogEntry> {
        self.items.get(index)
    }

    /// Iterate over families
    pub fn iter(&self) -> std::slice::Iter<'_, FontCatalogEntry> {
        self.items.iter()
    }

    /// Find a family by name
    pub fn family_index(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|entry| entry.family == name)
    }

    /// Resolve the file URL of a family and variant
    ///
    /// The URL is normalised by [`strip_insecure_scheme`].
    pub fn file_url(&self, family: usize, variant: usize) -> Result<String, ResolveError> {
        let entry = self.get(family).ok_or(ResolveError::Family(family))?;
        let name = entry.variant(variant).ok_or_else(|| ResolveError::Variant {
            family: entry.family.clone(),
            index: variant,
        })?;
        let url = entry.file(name).ok_or_else(|| ResolveError::File {
            family: entry.family.clone(),
            variant: name.to_string(),
        })?;
        Ok(strip_insecure_scheme(url).to_string())
    }
}

/// Remove a literal `http:` prefix, leaving a scheme-relative URL
///
/// Other URLs are returned unchanged.
pub fn strip_insecure_scheme(url: &str) -> &str {
    url.strip_prefix("http:").unwrap_or(url)
}

#[cfg(test)]
mod test {
    use super::*;

    fn roboto() -> FontCatalog {
        FontCatalog::new(vec![FontCatalogEntry::new(
            "Roboto",
            [("regular", "http://x/a.ttf"), ("700", "http://x/b.ttf")],
        )])
    }

    #[test]
    fn file_urls() {
        let catalog = roboto();
        assert_eq!(catalog.file_url(0, 0).unwrap(), "//x/a.ttf");
        assert_eq!(catalog.file_url(0, 1).unwrap(), "//x/b.ttf");
        assert_eq!(catalog.file_url(1, 0), Err(ResolveError::Family(1)));
        assert!(matches!(
            catalog.file_url(0, 2),
            Err(ResolveError::Variant { index: 2, .. })
        ));
    }

    #[test]
    fn all_pairs_resolve() {
        let catalog = FontCatalog::new(vec![
            FontCatalogEntry::new("A", [("regular", "http://f/a0"), ("italic", "https://f/a1")]),
            FontCatalogEntry::new("B", [("300", "http://f/b0")]),
        ]);
        for (f, entry) in catalog.iter().enumerate() {
            for (v, name) in entry.variants.iter().enumerate() {
                let listed = entry.file(name).unwrap();
                let url = catalog.file_url(f, v).unwrap();
                assert_eq!(url, strip_insecure_scheme(listed));
                assert!(!url.starts_with("http:"));
            }
        }
    }

    #[test]
    fn missing_file() {
        let mut entry = FontCatalogEntry::new("A", [("regular", "http://f/a0")]);
        entry.variants.push("bold".into());
        let catalog = FontCatalog::new(vec![entry]);
        assert_eq!(
            catalog.file_url(0, 1),
            Err(ResolveError::File {
                family: "A".into(),
                variant: "bold".into()
            })
        );
    }

    #[test]
    fn strip() {
        assert_eq!(strip_insecure_scheme("http://a/b"), "//a/b");
        assert_eq!(strip_insecure_scheme("https://a/b"), "https://a/b");
        assert_eq!(strip_insecure_scheme("//a/b"), "//a/b");
    }

    #[test]
    fn request() {
        let url = FontCatalog::request_url(CATALOG_URL, Some("k&y")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/webfonts/v1/webfonts?key=k%26y"
        );
        assert!(FontCatalog::request_url("not a url", None).is_err());
    }
}
