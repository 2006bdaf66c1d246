//! Category → color assignment.
//!
//! Colors are handed out first-seen-first-served from a fixed palette and
//! never change for the rest of the session, even if every service in the
//! category disappears from the registry. Once the palette is used up, new
//! categories stay uncolored.

use std::collections::HashMap;

use procdeck_core::ServiceSnapshot;

/// Palette entries, in assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagColor {
    Blue,
    Cyan,
    Green,
    Yellow,
    Magenta,
    Orange,
    Teal,
}

/// Fixed assignment order.
pub const PALETTE: [TagColor; 7] = [
    TagColor::Blue,
    TagColor::Cyan,
    TagColor::Green,
    TagColor::Yellow,
    TagColor::Magenta,
    TagColor::Orange,
    TagColor::Teal,
];

/// Session-lifetime mapping from category to color.
#[derive(Debug, Clone, Default)]
pub struct TagColorMap {
    colors: HashMap<String, TagColor>,
}

impl TagColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `category` if unseen. Empty categories are ignored.
    ///
    /// Returns the color now associated with it, if any.
    pub fn observe(&mut self, category: &str) -> Option<TagColor> {
        if category.is_empty() {
            return None;
        }
        if let Some(color) = self.colors.get(category) {
            return Some(*color);
        }
        let color = PALETTE.get(self.colors.len()).copied()?;
        self.colors.insert(category.to_string(), color);
        Some(color)
    }

    /// Observe the categories of an accepted snapshot in registry order.
    pub fn observe_snapshot(&mut self, services: &[ServiceSnapshot]) {
        for service in services {
            if let Some(category) = service.category() {
                self.observe(category);
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<TagColor> {
        self.colors.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
