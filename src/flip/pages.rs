//! Page content lookup
//!
//! Pages are opaque identifiers (sprite names, asset keys, ...). Any index
//! outside the book resolves to the blank identifier.

use serde::{Deserialize, Serialize};

/// Ordered page identifiers plus the placeholder for missing pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pages: Vec<String>,
    blank: String,
}

impl PageContent {
    pub fn new<I, S>(pages: I, blank: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
            blank: blank.into(),
        }
    }

    /// Page at `index`, or the blank identifier when out of range
    pub fn get(&self, index: i32) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.pages.get(i))
            .map_or(self.blank.as_str(), String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn blank(&self) -> &str {
        &self.blank
    }
}

/// Identifiers currently visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Faces<'a> {
    /// Left half of the flat spread
    pub left: &'a str,
    /// Right half of the flat spread
    pub right: &'a str,
    /// Back of the lifted leaf (current-page layer)
    pub lifted_back: Option<&'a str>,
    /// Page uncovered under the leaf (incoming-page clip)
    pub revealed: Option<&'a str>,
}
