// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Query-string persistence of form state
//!
//! The editable fields are mirrored into the page URL's query component so
//! that the current state may be shared or bookmarked. Values are always
//! strings; the filled toggle is written as `"true"` or `"false"`.

use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

/// A persisted field
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Selected family name
    FontSelect,
    /// Selected variant name
    FontVariant,
    /// Filled toggle
    InputFilled,
    /// Text
    InputText,
    /// Size
    InputSize,
    /// Fill colour
    InputFill,
    /// Stroke colour
    InputStroke,
    /// Stroke width
    InputStrokeWidth,
}

impl Field {
    /// All fields, in serialization order
    pub const ALL: [Field; 8] = [
        Field::FontSelect,
        Field::FontVariant,
        Field::InputFilled,
        Field::InputText,
        Field::InputSize,
        Field::InputFill,
        Field::InputStroke,
        Field::InputStrokeWidth,
    ];

    /// Query parameter name
    pub fn name(self) -> &'static str {
        match self {
            Field::FontSelect => "font-select",
            Field::FontVariant => "font-variant",
            Field::InputFilled => "input-filled",
            Field::InputText => "input-text",
            Field::InputSize => "input-size",
            Field::InputFill => "input-fill",
            Field::InputStroke => "input-stroke",
            Field::InputStrokeWidth => "input-strokeWidth",
        }
    }

    /// Look up a field by query parameter name
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A (partial) set of field values
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryFields(BTreeMap<Field, String>);

impl QueryFields {
    /// Construct an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(|s| s.as_str())
    }

    /// Set a value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no field is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over present fields
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Field, S)> for QueryFields {
    fn from_iter<T: IntoIterator<Item = (Field, S)>>(iter: T) -> Self {
        QueryFields(iter.into_iter().map(|(f, v)| (f, v.into())).collect())
    }
}

fn strip_question(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

/// Write `fields` into the `existing` query string
///
/// Each field overwrites the first parameter of the same name (dropping any
/// later duplicates) or is appended if absent. Unrelated parameters are kept
/// in their original order. The result has no leading `?`.
pub fn encode(existing: &str, fields: &QueryFields) -> String {
    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(strip_question(existing).as_bytes())
            .into_owned()
            .collect();

    for (field, value) in fields.iter() {
        let name = field.name();
        let mut found = false;
        pairs.retain_mut(|(k, v)| {
            if k.as_str() != name {
                true
            } else if found {
                false
            } else {
                found = true;
                *v = value.to_string();
                true
            }
        });
        if !found {
            pairs.push((name.to_string(), value.to_string()));
        }
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(&pairs);
    serializer.finish()
}

/// Read recognised fields from a query string
///
/// Only the first occurrence of each name is considered. Absent and empty
/// parameters are omitted: decoding never clears a field.
pub fn decode(query: &str) -> QueryFields {
    let mut fields = QueryFields::new();
    let mut seen = [false; 8];
    for (name, value) in form_urlencoded::parse(strip_question(query).as_bytes()) {
        let Some(field) = Field::from_name(&name) else {
            continue;
        };
        if std::mem::replace(&mut seen[field.index()], true) {
            continue;
        }
        if !value.is_empty() {
            fields.set(field, value.into_owned());
        }
    }
    fields
}

/// Rewrite the query component of `url` with `fields`
///
/// Suitable for an in-place history replacement.
pub fn replace_query(url: &Url, fields: &QueryFields) -> Url {
    let query = encode(url.query().unwrap_or(""), fields);
    let mut url = url.clone();
    url.set_query(Some(&query));
    url
}
