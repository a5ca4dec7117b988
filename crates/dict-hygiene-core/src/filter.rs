//! Category filters over classified results.
//!
//! A word stays in the filtered view if *any* of its categories is enabled.
//! Turning every filter off yields an empty view, not an unfiltered one.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One classification dimension a filter can toggle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Category {
    /// Contains an ASCII digit.
    Digits,
    /// Contains a space.
    Spaces,
    /// Contains chars outside the alphabet.
    NonLinguistic,
    /// Contains control or zero-width chars.
    Invisible,
    /// Title case.
    CapitalFirst,
    /// Entirely uppercase.
    AllCaps,
    /// At or under the short-word length limit.
    Short,
    /// Member of a duplicate group.
    Duplicate,
}

impl Category {
    /// Kebab-case name used in CLI flags and JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Digits => "digits",
            Self::Spaces => "spaces",
            Self::NonLinguistic => "non-linguistic",
            Self::Invisible => "invisible",
            Self::CapitalFirst => "capital-first",
            Self::AllCaps => "all-caps",
            Self::Short => "short",
            Self::Duplicate => "duplicate",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified item that can report which categories it belongs to.
pub trait Categorized {
    /// Whether this item has the property behind `category`.
    fn has(&self, category: Category) -> bool;
}

/// The set of currently enabled filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilterSet {
    enabled: BTreeSet<Category>,
}

impl FilterSet {
    /// Every listed category enabled (the default view).
    pub fn all(categories: &[Category]) -> Self {
        Self {
            enabled: categories.iter().copied().collect(),
        }
    }

    /// No category enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Turn a filter on.
    pub fn enable(&mut self, category: Category) {
        self.enabled.insert(category);
    }

    /// Turn a filter off.
    pub fn disable(&mut self, category: Category) {
        self.enabled.remove(&category);
    }

    /// Flip a filter.
    pub fn toggle(&mut self, category: Category) {
        if !self.enabled.remove(&category) {
            self.enabled.insert(category);
        }
    }

    /// Whether `category` is on.
    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled.contains(&category)
    }

    /// Enabled categories in a stable order.
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        self.enabled.iter().copied()
    }

    /// Whether `item` belongs in the filtered view.
    pub fn admits<T: Categorized>(&self, item: &T) -> bool {
        self.enabled.iter().any(|&c| item.has(c))
    }
}

/// Items with at least one enabled category, in their original order.
pub fn apply<'a, T: Categorized>(items: &'a [T], filters: &FilterSet) -> Vec<&'a T> {
    items.iter().filter(|item| filters.admits(*item)).collect()
}

/// Per-category counts over the full, unfiltered result set.
pub fn counts<T: Categorized>(items: &[T], categories: &[Category]) -> BTreeMap<Category, usize> {
    categories
        .iter()
        .map(|&c| (c, items.iter().filter(|item| item.has(c)).count()))
        .collect()
}
