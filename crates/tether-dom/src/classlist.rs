//! ClassList
//!
//! Ordered, de-duplicated class tokens.

use crate::DomError;

/// Ordered set of class tokens preserving first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

/// Anything that can be appended to a [`ClassList`]: a whitespace-separated
/// string, a sequence of such values (nested to any depth), another list, or
/// `None`.
pub trait IntoClasses {
    fn append_to(self, list: &mut ClassList);
}

impl IntoClasses for &str {
    fn append_to(self, list: &mut ClassList) {
        for token in self.split_whitespace() {
            list.push_token(token);
        }
    }
}

impl IntoClasses for String {
    fn append_to(self, list: &mut ClassList) {
        self.as_str().append_to(list);
    }
}

impl IntoClasses for &String {
    fn append_to(self, list: &mut ClassList) {
        self.as_str().append_to(list);
    }
}

impl IntoClasses for &ClassList {
    fn append_to(self, list: &mut ClassList) {
        for token in self.iter() {
            list.push_token(token);
        }
    }
}

impl IntoClasses for ClassList {
    fn append_to(self, list: &mut ClassList) {
        (&self).append_to(list);
    }
}

impl<T: IntoClasses> IntoClasses for Vec<T> {
    fn append_to(self, list: &mut ClassList) {
        for item in self {
            item.append_to(list);
        }
    }
}

impl<T: IntoClasses + Clone> IntoClasses for &[T] {
    fn append_to(self, list: &mut ClassList) {
        for item in self {
            item.clone().append_to(list);
        }
    }
}

impl<T: IntoClasses, const N: usize> IntoClasses for [T; N] {
    fn append_to(self, list: &mut ClassList) {
        for item in self {
            item.append_to(list);
        }
    }
}

impl<T: IntoClasses> IntoClasses for Option<T> {
    fn append_to(self, list: &mut ClassList) {
        if let Some(item) = self {
            item.append_to(list);
        }
    }
}

fn validate_token(token: &str) -> Result<(), DomError> {
    if token.chars().any(char::is_whitespace) {
        return Err(DomError::InvalidToken(token.to_string()));
    }
    Ok(())
}

impl ClassList {
    /// Create empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from anything [`IntoClasses`] accepts
    pub fn from_classes(classes: impl IntoClasses) -> Self {
        let mut list = Self::new();
        list.append(classes);
        list
    }

    /// Append tokens, skipping ones already present
    pub fn append(&mut self, classes: impl IntoClasses) {
        classes.append_to(self);
    }

    fn push_token(&mut self, token: &str) -> bool {
        if token.is_empty() || self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Add a single token. Returns whether it was new.
    pub fn add(&mut self, token: &str) -> Result<bool, DomError> {
        validate_token(token)?;
        Ok(self.push_token(token))
    }

    /// Remove a single token. Returns whether it was present.
    pub fn remove(&mut self, token: &str) -> Result<bool, DomError> {
        validate_token(token)?;
        let before = self.tokens.len();
        self.tokens.retain(|t| t != token);
        Ok(self.tokens.len() != before)
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str) -> Result<bool, DomError> {
        if self.remove(token)? {
            Ok(false)
        } else {
            self.add(token)
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Token at index
    pub fn item(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn reverse(&mut self) {
        self.tokens.reverse();
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|s| s.as_str())
    }

    /// Space separated value
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}
