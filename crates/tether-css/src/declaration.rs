//! CSSStyleDeclaration
//!
//! Ordered property map behind an element's `style` attribute.

use crate::CssError;

/// Convert a scripting-style property name into its CSS form.
///
/// `backgroundColor` becomes `background-color`, `cssFloat` becomes `float`.
/// Names already in dash-case pass through unchanged.
pub fn normalize_property(name: &str) -> String {
    if name == "cssFloat" {
        return "float".to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('-');
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase();
        }
    }
    out
}

/// Inline style declaration block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssStyleDeclaration {
    properties: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    /// Create an empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `prop: value; prop: value` text.
    ///
    /// Empty segments are skipped; a segment without a colon is an error.
    pub fn parse(text: &str) -> Result<Self, CssError> {
        let mut decl = Self::new();
        for (index, segment) in text.split(';').enumerate() {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let Some((prop, value)) = segment.split_once(':') else {
                return Err(CssError::ParseError {
                    index,
                    message: format!("missing ':' in `{segment}`"),
                });
            };
            let prop = prop.trim();
            if prop.is_empty() {
                return Err(CssError::ParseError {
                    index,
                    message: "empty property name".to_string(),
                });
            }
            decl.set_property(prop, value.trim());
        }
        Ok(decl)
    }

    /// Number of declared properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of a property, or empty string when unset
    pub fn get_property_value(&self, prop: &str) -> &str {
        let prop = normalize_property(prop);
        self.properties
            .iter()
            .find(|(name, _)| *name == prop)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Set a property. An existing property keeps its position.
    pub fn set_property(&mut self, prop: &str, value: &str) {
        let prop = normalize_property(prop);
        if let Some(slot) = self.properties.iter_mut().find(|(name, _)| *name == prop) {
            slot.1 = value.to_string();
        } else {
            self.properties.push((prop, value.to_string()));
        }
    }

    /// Remove a property, returning its previous value or empty string.
    pub fn remove_property(&mut self, prop: &str) -> String {
        let prop = normalize_property(prop);
        match self.properties.iter().position(|(name, _)| *name == prop) {
            Some(pos) => self.properties.remove(pos).1,
            None => String::new(),
        }
    }

    pub fn contains(&self, prop: &str) -> bool {
        let prop = normalize_property(prop);
        self.properties.iter().any(|(name, _)| *name == prop)
    }

    /// Serialized form, e.g. `color: red; width: 1px;`
    pub fn css_text(&self) -> String {
        if self.properties.is_empty() {
            return String::new();
        }
        let mut text = self
            .properties
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        text.push(';');
        text
    }

    /// Copy every property of `other` into this declaration
    pub fn update(&mut self, other: &CssStyleDeclaration) {
        for (name, value) in &other.properties {
            self.set_property(name, value);
        }
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    /// Iterate over `(property, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for CssStyleDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.css_text())
    }
}
