//! Taxonomy configuration loaded from JSON, falling back to the built-in
//! registry when no file exists.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;
use crate::taxonomy::{CategoryDef, CategoryKind, CategoryTaxonomy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Serializable shape of a taxonomy configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    /// Category names treated as loan-family, beyond the base kind.
    #[serde(default)]
    pub loan_categories: Vec<String>,
}

impl TaxonomyConfig {
    /// Loads a config file; a missing file yields the empty config, which
    /// builds the built-in taxonomy.
    pub fn load(path: &Path) -> EngineResult<Self> {
        if path.exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> EngineResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Builds the immutable registry. An empty category list falls back to
    /// the built-in registry; configured loan-family names apply either way.
    pub fn build_taxonomy(&self) -> CategoryTaxonomy {
        let base = if self.categories.is_empty() {
            CategoryTaxonomy::builtin()
        } else {
            let categories: HashMap<String, CategoryDef> = self
                .categories
                .iter()
                .map(|entry| {
                    (
                        entry.name.clone(),
                        CategoryDef {
                            kind: entry.kind,
                            subcategories: entry.subcategories.clone(),
                        },
                    )
                })
                .collect();
            CategoryTaxonomy::new(categories, HashSet::new())
        };
        base.with_loan_categories(self.loan_categories.iter().cloned())
    }
}
