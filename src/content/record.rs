//! Post and project records

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Publish state of a post. Absence of a `status` key is treated the same
/// as `published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
    #[default]
    Unspecified,
}

impl PostStatus {
    /// Map a raw front-matter value to a status. Unknown values are not
    /// published, matching `status == "published" || status missing`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => PostStatus::Unspecified,
            Some("published") => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }

    pub fn is_published(self) -> bool {
        matches!(self, PostStatus::Published | PostStatus::Unspecified)
    }
}

/// Project state. Informational only, never filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    #[default]
    Unspecified,
}

impl ProjectStatus {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("active") => ProjectStatus::Active,
            Some("archived") => ProjectStatus::Archived,
            _ => ProjectStatus::Unspecified,
        }
    }
}

/// A blog post, built fresh from its source file on every call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    /// Identifier, derived from the file stem
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown on listing cards
    pub summary: String,

    /// Publication date; always `Some` for records surfaced by listings,
    /// may be `None` on the lookup path
    pub date: Option<DateTime<Local>>,

    /// Tags in file order, not deduplicated
    pub tags: Vec<String>,

    /// Publish state
    pub status: PostStatus,
}

/// An external link attached to a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectLink {
    pub label: String,
    pub href: String,
}

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Identifier, derived from the file stem
    pub slug: String,

    /// Project title
    pub title: String,

    /// Short summary shown on listing cards
    pub summary: String,

    /// The author's role on the project
    pub role: String,

    /// Technologies used, in file order
    pub stack: Vec<String>,

    /// External links (repository, live site, ...)
    pub links: Vec<ProjectLink>,

    /// Featured projects sort first and are highlighted on the home page
    pub featured: bool,

    /// Project state
    pub status: ProjectStatus,
}
