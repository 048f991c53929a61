// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Form state
//!
//! [`FormState`] holds the user-editable fields. All changes go through
//! [`FormState::update`], which applies a [`FormEvent`] and reports what must
//! happen next as an [`Action`].

use crate::config::FormDefaults;
use crate::data::{effective_size, RenderParameters};
use crate::fonts::FontCatalog;
use crate::query::{Field, QueryFields};
use smallvec::SmallVec;

/// Follow-up required after an update
///
/// Values are ordered: when combining, the larger action wins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Nothing to do
    #[default]
    None,
    /// Render after the debounce wait
    Debounce,
    /// Render now
    Render,
}

impl Action {
    /// True if no follow-up is required
    #[inline]
    pub fn is_none(self) -> bool {
        self == Action::None
    }
}

/// An edit of the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEvent {
    /// A family was selected by index
    FamilySelected(usize),
    /// A variant of the current family was selected by index
    VariantSelected(usize),
    /// The filled toggle changed
    FilledToggled(bool),
    /// Text field edited
    Text(String),
    /// Size field edited
    Size(String),
    /// Fill colour edited
    Fill(String),
    /// Stroke colour edited
    Stroke(String),
    /// Stroke width edited
    StrokeWidth(String),
    /// The colour picker reported a new colour
    ///
    /// Carries the current values of both colour fields.
    ColorPicked { fill: String, stroke: String },
}

/// State of the form
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    family: usize,
    family_name: String,
    variant: usize,
    variants: SmallVec<[String; 4]>,
    filled: bool,
    text: String,
    size: String,
    fill: String,
    stroke: String,
    stroke_width: String,
}

impl FormState {
    /// Construct, selecting the first family and its first variant
    pub fn new(catalog: &FontCatalog, defaults: &FormDefaults) -> Self {
        let mut state = FormState {
            family: 0,
            family_name: String::new(),
            variant: 0,
            variants: SmallVec::new(),
            filled: defaults.filled,
            text: defaults.text.clone(),
            size: defaults.size.clone(),
            fill: defaults.fill.clone(),
            stroke: defaults.stroke.clone(),
            stroke_width: defaults.stroke_width.clone(),
        };
        state.load_variants(catalog, 0);
        state
    }

    /// Select a family and replace the variant list with its variants
    ///
    /// The variant selection resets to index 0. Returns false (making no
    /// change) if `family` is out of range.
    fn load_variants(&mut self, catalog: &FontCatalog, family: usize) -> bool {
        let Some(entry) = catalog.get(family) else {
            return false;
        };
        self.family = family;
        self.family_name.clone_from(&entry.family);
        self.variants = entry.variants.iter().cloned().collect();
        self.variant = 0;
        true
    }

    /// Apply an event
    pub fn update(&mut self, catalog: &FontCatalog, event: FormEvent) -> Action {
        match event {
            FormEvent::FamilySelected(index) => {
                if !self.load_variants(catalog, index) {
                    log::warn!("FormState::update: family index {index} out of range");
                    return Action::None;
                }
            }
            FormEvent::VariantSelected(index) => {
                if index >= self.variants.len() {
                    log::warn!(
                        "FormState::update: variant index {index} out of range for {:?}",
                        self.family_name
                    );
                    return Action::None;
                }
                self.variant = index;
            }
            FormEvent::FilledToggled(filled) => self.filled = filled,
            FormEvent::Text(text) => self.text = text,
            FormEvent::Size(size) => self.size = size,
            FormEvent::Fill(fill) => self.fill = fill,
            FormEvent::Stroke(stroke) => self.stroke = stroke,
            FormEvent::StrokeWidth(width) => self.stroke_width = width,
            FormEvent::ColorPicked { fill, stroke } => {
                self.fill = fill;
                self.stroke = stroke;
                return Action::Debounce;
            }
        }
        Action::Render
    }

    /// Apply values decoded from the query string
    ///
    /// The family is applied first (by name), replacing the variant list;
    /// the variant is then looked up by name in the new list. Names not
    /// found are ignored, as are absent fields.
    pub fn apply_query(&mut self, catalog: &FontCatalog, fields: &QueryFields) {
        if let Some(name) = fields.get(Field::FontSelect) {
            match catalog.family_index(name) {
                Some(index) => {
                    self.load_variants(catalog, index);
                }
                None => log::warn!("FormState::apply_query: unknown family {name:?}"),
            }
        }
        if let Some(name) = fields.get(Field::FontVariant) {
            match self.variants.iter().position(|v| v == name) {
                Some(index) => self.variant = index,
                None => log::warn!("FormState::apply_query: unknown variant {name:?}"),
            }
        }
        if let Some(filled) = fields.get(Field::InputFilled) {
            self.filled = filled == "true";
        }

        let text_fields = [
            (Field::InputText, &mut self.text),
            (Field::InputSize, &mut self.size),
            (Field::InputFill, &mut self.fill),
            (Field::InputStroke, &mut self.stroke),
            (Field::InputStrokeWidth, &mut self.stroke_width),
        ];
        for (field, target) in text_fields {
            if let Some(value) = fields.get(field) {
                *target = value.to_string();
            }
        }
    }

    /// All fields, for the query string
    pub fn to_query(&self) -> QueryFields {
        let filled = if self.filled { "true" } else { "false" };
        [
            (Field::FontSelect, self.family_name.as_str()),
            (Field::FontVariant, self.variant_name().unwrap_or("")),
            (Field::InputFilled, filled),
            (Field::InputText, self.text.as_str()),
            (Field::InputSize, self.size.as_str()),
            (Field::InputFill, self.fill.as_str()),
            (Field::InputStroke, self.stroke.as_str()),
            (Field::InputStrokeWidth, self.stroke_width.as_str()),
        ]
        .into_iter()
        .collect()
    }

    /// Parameters for a render of the current state
    pub fn render_parameters(&self) -> RenderParameters {
        RenderParameters {
            text: self.text.clone(),
            size: effective_size(&self.size),
            filled: self.filled,
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            stroke_width: self.stroke_width.clone(),
        }
    }

    /// Selected family index
    #[inline]
    pub fn family(&self) -> usize {
        self.family
    }

    /// Selected family name
    #[inline]
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Selected variant index
    #[inline]
    pub fn variant(&self) -> usize {
        self.variant
    }

    /// Selected variant name
    pub fn variant_name(&self) -> Option<&str> {
        self.variants.get(self.variant).map(|s| s.as_str())
    }

    /// Variants of the selected family
    #[inline]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    #[inline]
    pub fn filled(&self) -> bool {
        self.filled
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn size(&self) -> &str {
        &self.size
    }

    #[inline]
    pub fn fill(&self) -> &str {
        &self.fill
    }

    #[inline]
    pub fn stroke(&self) -> &str {
        &self.stroke
    }

    #[inline]
    pub fn stroke_width(&self) -> &str {
        &self.stroke_width
    }
}
