//! Reputation categories and the immutable catalog that defines them.

use crate::config::CatalogConfig;
use crate::error::{ReputationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable key identifying a reputation category (its name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CategoryKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A named, bounded dimension of reputation (e.g. Kind, Funny).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    key: CategoryKey,
    description: String,
    max_points: i64,
}

impl Category {
    /// Create a category, rejecting blank names and non-positive upper bounds.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        max_points: i64,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReputationError::invalid_category(name, "name must not be blank"));
        }
        if max_points <= 0 {
            return Err(ReputationError::invalid_category(
                name,
                format!("max_points must be positive, got {}", max_points),
            ));
        }
        Ok(Self {
            key: CategoryKey(name),
            description: description.into(),
            max_points,
        })
    }

    pub fn key(&self) -> &CategoryKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.as_str()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn max_points(&self) -> i64 {
        self.max_points
    }

    /// Saturate `value` into `[0, max_points]`.
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(0, self.max_points)
    }
}

/// The fixed, ordered set of categories known to the engine.
///
/// Built once at startup and never mutated. Iteration follows definition order,
/// which is also the order in which actions are applied.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    index: HashMap<CategoryKey, usize>,
}

impl CategoryCatalog {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Result<Self> {
        let mut catalog = Self::default();
        for category in categories {
            if catalog.index.contains_key(category.key()) {
                return Err(ReputationError::invalid_category(
                    category.name(),
                    "category is defined more than once",
                ));
            }
            catalog
                .index
                .insert(category.key().clone(), catalog.categories.len());
            catalog.categories.push(category);
        }
        Ok(catalog)
    }

    /// Build a catalog from deserialized configuration, validating every entry.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let categories = config
            .categories
            .iter()
            .map(|c| Category::new(c.name.clone(), c.description.clone(), c.max_points))
            .collect::<Result<Vec<_>>>()?;
        Self::new(categories)
    }

    pub fn get(&self, key: &CategoryKey) -> Option<&Category> {
        self.index.get(key).map(|&i| &self.categories[i])
    }

    pub fn contains(&self, key: &CategoryKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CategoryKey> {
        self.categories.iter().map(Category::key)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategoryCatalog {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
