// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Application configuration

use crate::fonts::{CatalogError, FontCatalog, CATALOG_URL};
use crate::render::KeychainConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Initial values of the form's free-text fields
///
/// These apply before any query-string values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub text: String,
    pub size: String,
    pub filled: bool,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: String,
}

impl Default for FormDefaults {
    fn default() -> Self {
        FormDefaults {
            text: "Hello".to_string(),
            size: "100".to_string(),
            filled: false,
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: "0.25mm".to_string(),
        }
    }
}

/// Configuration of an [`App`](crate::app::App)
///
/// Every field has a default; a JSON document need only name the fields it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the font catalog service
    pub catalog_url: String,
    /// Catalog API key, sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Debounce wait for colour-picker events, in milliseconds
    pub debounce_ms: u64,
    /// Initial form values
    pub defaults: FormDefaults,
    /// Keychain geometry and export
    pub keychain: KeychainConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            catalog_url: CATALOG_URL.to_string(),
            api_key: None,
            debounce_ms: 200,
            defaults: FormDefaults::default(),
            keychain: KeychainConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read from JSON
    ///
    /// The empty string and `null` give the default configuration.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let text = text.trim();
        if text.is_empty() || text == "null" {
            return Ok(AppConfig::default());
        }
        serde_json::from_str(text)
    }

    /// Debounce wait
    #[inline]
    pub fn debounce_wait(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Full catalog request URL
    pub fn catalog_request(&self) -> Result<Url, CatalogError> {
        FontCatalog::request_url(&self.catalog_url, self.api_key.as_deref())
    }
}
