// Test serialization using json

use keychain_text::config::{AppConfig, FormDefaults};
use keychain_text::fonts::{FontCatalog, FontCatalogEntry};
use keychain_text::markup::Presentation;
use keychain_text::render::KeychainConfig;
use pretty_assertions::assert_eq;
use serde::{de::Deserialize, ser::Serialize};
use std::cmp::PartialEq;
use std::fmt::Debug;

fn test<X: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(x: X, t: &str) {
    match serde_json::to_string(&x) {
        Ok(text) => assert_eq!(text, t),
        Err(err) => panic!("Ser of '{x:?}' failed: {err}"),
    }

    match serde_json::from_str::<X>(t) {
        Ok(v) => assert_eq!(v, x),
        Err(err) => panic!("Deser of '{t}' failed: {err}"),
    }
}

#[test]
fn catalog_entry() {
    test(
        FontCatalogEntry::new("Roboto", [("regular", "http://x/a.ttf"), ("700", "http://x/b.ttf")]),
        r#"{"family":"Roboto","variants":["regular","700"],"files":{"700":"http://x/b.ttf","regular":"http://x/a.ttf"}}"#,
    );
}

#[test]
fn catalog_response() {
    // a trimmed response of the catalog service
    let text = r#"{
        "kind": "webfonts#webfontList",
        "items": [
            {
                "family": "ABeeZee",
                "variants": ["regular", "italic"],
                "subsets": ["latin"],
                "version": "v22",
                "files": {
                    "regular": "http://fonts.gstatic.com/s/abeezee/v22/a.ttf",
                    "italic": "http://fonts.gstatic.com/s/abeezee/v22/b.ttf"
                },
                "category": "sans-serif",
                "kind": "webfonts#webfont"
            },
            {
                "family": "Abel",
                "variants": ["regular"],
                "files": { "regular": "http://fonts.gstatic.com/s/abel/v18/c.ttf" }
            }
        ]
    }"#;
    let catalog = FontCatalog::from_json(text).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.family_index("Abel"), Some(1));
    assert_eq!(
        catalog.file_url(0, 1).unwrap(),
        "//fonts.gstatic.com/s/abeezee/v22/b.ttf"
    );
}

#[test]
fn catalog_errors() {
    assert!(FontCatalog::from_json("not json").is_err());
    assert!(FontCatalog::from_json(r#"{"items": [{"variants": []}]}"#).is_err());
    assert!(FontCatalog::from_json("{}").unwrap().is_empty());
}

#[test]
fn presentation() {
    test(
        Presentation::default(),
        r##"{"fill":"none","stroke":"#000","stroke_width":"0.25mm"}"##,
    );
}

#[test]
fn form_defaults() {
    test(
        FormDefaults::default(),
        r##"{"text":"Hello","size":"100","filled":false,"fill":"#000000","stroke":"#000000","stroke_width":"0.25mm"}"##,
    );
}

#[test]
fn keychain_config() {
    let config = KeychainConfig {
        hole_centre: (-30.0, 40.5),
        ..Default::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    assert!(text.contains(r#""hole_centre":[-30.0,40.5]"#));
    assert_eq!(serde_json::from_str::<KeychainConfig>(&text).unwrap(), config);
}

#[test]
fn app_config() {
    let config = AppConfig {
        api_key: Some("secret".to_string()),
        debounce_ms: 50,
        ..Default::default()
    };
    let text = serde_json::to_string(&config).unwrap();
    assert_eq!(AppConfig::from_json(&text).unwrap(), config);
}
