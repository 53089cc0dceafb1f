use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::model::{Category, Tool};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    EmptyId { index: usize },
    DuplicateId(String),
    PopularityOutOfRange { id: String, popularity: u8 },
    InvalidDate { id: String, value: String },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(error) => write!(f, "catalog parse error: {error}"),
            Self::EmptyId { index } => write!(f, "tool #{index} has an empty id"),
            Self::DuplicateId(id) => write!(f, "duplicate tool id: {id}"),
            Self::PopularityOutOfRange { id, popularity } => {
                write!(f, "tool '{id}' popularity {popularity} is outside 0..=100")
            }
            Self::InvalidDate { id, value } => {
                write!(f, "tool '{id}' last_update '{value}' is not YYYY-MM-DD")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Deserialize)]
struct CatalogManifest {
    #[serde(default)]
    tools: Vec<ManifestTool>,
}

#[derive(Debug, Deserialize)]
struct ManifestTool {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    category: Category,
    #[serde(default)]
    popularity: u8,
    #[serde(default)]
    downloads: u64,
    #[serde(default)]
    last_update: String,
}

/// Read-only tool collection. Order is the load order and is what every
/// filtered view preserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tools: Vec<Tool>,
}

impl Catalog {
    pub fn new(tools: Vec<Tool>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            if tool.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if !seen.insert(tool.id.as_str()) {
                return Err(CatalogError::DuplicateId(tool.id.clone()));
            }
            if tool.popularity > 100 {
                return Err(CatalogError::PopularityOutOfRange {
                    id: tool.id.clone(),
                    popularity: tool.popularity,
                });
            }
            if !tool.last_update.is_empty() && !is_iso_date(&tool.last_update) {
                return Err(CatalogError::InvalidDate {
                    id: tool.id.clone(),
                    value: tool.last_update.clone(),
                });
            }
        }

        Ok(Self { tools })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, CatalogError> {
        let manifest: CatalogManifest =
            toml::from_str(input).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let tools = manifest
            .tools
            .into_iter()
            .map(|entry| {
                Tool::from_owned(
                    entry.id,
                    entry.name,
                    entry.description,
                    entry.category,
                    entry.popularity,
                )
                .with_downloads(entry.downloads)
                .with_last_update(&entry.last_update)
            })
            .collect();
        Self::new(tools)
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Strict `YYYY-MM-DD`. The shape check keeps out signed or short fields
/// that `%Y`/`%m` would otherwise accept.
fn is_iso_date(value: &str) -> bool {
    let shape_ok = value.len() == 10
        && value.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
