use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Academic,
    Professional,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Academic => "academic",
            ProjectCategory::Professional => "professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipationRole {
    Frontend,
    Backend,
    Database,
    Fullstack,
    Devops,
    Design,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub programmer_id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: ProjectCategory,
    pub participation: Vec<ParticipationRole>,
    pub technologies: Vec<String>,
    pub repository_url: String,
    pub demo_url: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both creating and replacing a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: ProjectCategory,
    pub participation: Vec<ParticipationRole>,
    pub technologies: Vec<String>,
    pub repository_url: String,
    pub demo_url: String,
    pub image_url: String,
}
