use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub const INSTALL_SCOPE: &str = "@devtools";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Core,
    Debug,
    Build,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Core, Category::Debug, Category::Build];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Debug => "debug",
            Self::Build => "build",
        }
    }

    /// Exact tag match. Tags are lowercase; anything else is not a category.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == tag)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub popularity: u8,
    pub downloads: u64,
    pub last_update: String,
    normalized_name: String,
    normalized_description: String,
}

impl Tool {
    pub fn new(id: &str, name: &str, description: &str, category: Category, popularity: u8) -> Self {
        Self::from_owned(
            id.to_string(),
            name.to_string(),
            description.to_string(),
            category,
            popularity,
        )
    }

    pub fn from_owned(
        id: String,
        name: String,
        description: String,
        category: Category,
        popularity: u8,
    ) -> Self {
        let normalized_name = normalize_for_match(&name);
        let normalized_description = normalize_for_match(&description);
        Self {
            id,
            name,
            description,
            category,
            popularity,
            downloads: 0,
            last_update: String::new(),
            normalized_name,
            normalized_description,
        }
    }

    pub fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn with_last_update(mut self, last_update: &str) -> Self {
        self.last_update = last_update.to_string();
        self
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn normalized_description(&self) -> &str {
        &self.normalized_description
    }

    pub fn install_command(&self) -> String {
        format!("npm install {INSTALL_SCOPE}/{}", self.id)
    }

    pub fn popularity_label(&self) -> String {
        format!("{}% Popular", self.popularity)
    }

    pub fn downloads_label(&self) -> String {
        format!("{} downloads", group_thousands(self.downloads))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Lowercases for case-insensitive substring matching. Unlike a fuzzy
/// normalizer this keeps whitespace and punctuation, so "ai a" still has to
/// appear verbatim (modulo case) in the haystack.
pub fn normalize_for_match(input: &str) -> String {
    input.to_lowercase()
}
