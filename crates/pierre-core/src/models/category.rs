// ABOUTME: Intensity category identifiers and the canonical category catalog
// ABOUTME: Maps category ids to slugs and display names for rules and insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an intensity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u32);

impl CategoryId {
    /// Raw numeric value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CategoryId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// One intensity bucket such as "easy" or "tempo"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCategory {
    /// Stable identifier
    pub id: CategoryId,
    /// `snake_case` slug used in configuration tables
    pub slug: String,
    /// Human-readable name
    pub display_name: String,
}

impl ActivityCategory {
    /// Create a category
    pub fn new(id: u32, slug: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            slug: slug.into(),
            display_name: display_name.into(),
        }
    }

    /// The ten built-in categories, ordered by id
    #[must_use]
    pub fn canonical() -> Vec<Self> {
        CANONICAL_CATEGORIES
            .iter()
            .map(|(id, slug, name)| Self::new(*id, *slug, *name))
            .collect()
    }
}

const CANONICAL_CATEGORIES: [(u32, &str, &str); 10] = [
    (1, "recovery", "Recovery"),
    (2, "easy", "Easy"),
    (3, "steady", "Steady"),
    (4, "tempo", "Tempo"),
    (5, "threshold", "Threshold"),
    (6, "vo2_max", "VO₂ Max"),
    (7, "anaerobic", "Anaerobic"),
    (8, "long", "Long"),
    (9, "race", "Race / Event"),
    (10, "mixed", "Mixed / Structured"),
];

/// Lookup table over a set of categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<ActivityCategory>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::new(ActivityCategory::canonical())
    }
}

impl CategoryCatalog {
    /// Build a catalog; entries are kept sorted by id
    #[must_use]
    pub fn new(mut categories: Vec<ActivityCategory>) -> Self {
        categories.sort_by_key(|c| c.id);
        categories.dedup_by_key(|c| c.id);
        Self { categories }
    }

    /// All categories ordered by id
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &ActivityCategory> {
        self.categories.iter()
    }

    /// Number of categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Find a category by id
    #[must_use]
    pub fn by_id(&self, id: CategoryId) -> Option<&ActivityCategory> {
        self.categories
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .and_then(|index| self.categories.get(index))
    }

    /// Find a category by slug
    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&ActivityCategory> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Slug and display name for `id`, or ("unknown", "Unknown")
    #[must_use]
    pub fn label(&self, id: CategoryId) -> (&str, &str) {
        self.by_id(id).map_or(("unknown", "Unknown"), |c| {
            (c.slug.as_str(), c.display_name.as_str())
        })
    }
}
