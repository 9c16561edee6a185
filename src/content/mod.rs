//! Content module - records, front matter and the repository

mod error;
pub mod frontmatter;
mod record;
mod repository;

pub use error::ContentError;
pub use frontmatter::{PostFrontMatter, ProjectFrontMatter};
pub use record::{PostRecord, PostStatus, ProjectLink, ProjectRecord, ProjectStatus};
pub use repository::ContentRepository;
