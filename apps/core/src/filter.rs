use std::fmt::{Display, Formatter};

use crate::model::{normalize_for_match, Category, Tool};

pub const ALL_CATEGORIES: &str = "all";

/// Category selector as typed by the shell. Values that are neither `all`
/// nor a known tag are kept verbatim and match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
    Unknown(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            return Self::All;
        }
        match Category::parse(value) {
            Some(category) => Self::Only(category),
            None => Self::Unknown(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(category) => category.as_str(),
            Self::Unknown(raw) => raw,
        }
    }

    fn admits(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
            Self::Unknown(_) => false,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    pub text: String,
    pub category: CategoryFilter,
}

impl FilterQuery {
    pub fn new(text: &str, category: &str) -> Self {
        Self {
            text: text.to_string(),
            category: CategoryFilter::parse(category),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.text.trim().is_empty()
    }
}

pub fn filter<'a>(tools: &'a [Tool], query: &FilterQuery) -> Vec<&'a Tool> {
    if matches!(query.category, CategoryFilter::Unknown(_)) {
        return Vec::new();
    }

    let needle = normalize_for_match(query.text.trim());
    tools
        .iter()
        .filter(|tool| query.category.admits(tool.category))
        .filter(|tool| text_matches(tool, &needle))
        .collect()
}

fn text_matches(tool: &Tool, needle: &str) -> bool {
    needle.is_empty()
        || tool.normalized_name().contains(needle)
        || tool.normalized_description().contains(needle)
}
