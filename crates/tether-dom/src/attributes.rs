//! Element attributes
//!
//! Insertion-ordered name/value pairs. Names are stored lowercase.

/// Attributes rendered as a bare name when set
const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "async", "autofocus", "autoplay", "checked", "contenteditable", "defer",
    "disabled", "draggable", "dropzone", "formnovalidate", "hidden", "ismap",
    "loop", "multiple", "muted", "novalidate", "readonly", "required",
    "reversed", "spellcheck", "scoped", "selected",
];

/// Check if an attribute is rendered in boolean form
pub fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES.contains(&name)
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a value; an existing attribute keeps its position.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.to_string();
        } else {
            self.entries.push((name, value.to_string()));
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        let pos = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Render as it appears inside a start tag, without leading space
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            if let Some(part) = render_attribute(name, value) {
                parts.push(part);
            }
        }
        parts.join(" ")
    }
}

/// Render one attribute; `None` when a boolean attribute is false.
pub(crate) fn render_attribute(name: &str, value: &str) -> Option<String> {
    if is_boolean_attribute(name) {
        if value == "false" {
            None
        } else {
            Some(name.to_string())
        }
    } else {
        Some(format!("{}=\"{}\"", name, escape_html(value)))
    }
}
