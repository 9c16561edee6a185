//! folio-rs: a static portfolio and blog site generator
//!
//! Content lives in two flat directories of markdown files with YAML front
//! matter (`content/posts`, `content/projects`). The crate loads and
//! validates those files, compiles post/project bodies through a pluggable
//! rendering-rule table, and generates a static site with a preview server.

pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod generator;
pub mod render;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

use content::ContentRepository;

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding post files
    pub posts_dir: std::path::PathBuf,
    /// Directory holding project files
    pub projects_dir: std::path::PathBuf,
    /// Static asset directory copied verbatim into the output
    pub static_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a site directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let posts_dir = content_dir.join("posts");
        let projects_dir = content_dir.join("projects");
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            projects_dir,
            static_dir,
            public_dir,
        })
    }

    /// Repository over this site's content directories
    pub fn repository(&self) -> ContentRepository {
        ContentRepository::new(self.posts_dir.clone(), self.projects_dir.clone())
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
