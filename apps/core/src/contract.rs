use serde::{Deserialize, Serialize};

use crate::model::{Category, Tool};
use crate::progress::ProgressState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub popularity: u8,
    pub popularity_label: String,
    pub downloads: u64,
    pub downloads_label: String,
    pub last_update: String,
    pub install_command: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub running: bool,
    pub percent: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub text: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowcaseSnapshot {
    pub query: QuerySnapshot,
    pub categories: Vec<String>,
    pub tools: Vec<ToolCard>,
    pub progress: ProgressSnapshot,
}

impl From<&Tool> for ToolCard {
    fn from(value: &Tool) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            description: value.description.clone(),
            category: value.category,
            popularity: value.popularity,
            popularity_label: value.popularity_label(),
            downloads: value.downloads,
            downloads_label: value.downloads_label(),
            last_update: value.last_update.clone(),
            install_command: value.install_command(),
        }
    }
}

impl From<ProgressState> for ProgressSnapshot {
    fn from(value: ProgressState) -> Self {
        Self {
            running: value.running,
            percent: value.percent,
        }
    }
}
