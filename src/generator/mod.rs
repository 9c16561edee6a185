//! Generator module - writes the static site into the public directory

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{PostRecord, ProjectRecord};
use crate::render::{self, RuleTable};
use crate::templates;
use crate::Folio;

/// Entry of the search/filter index consumed client-side
#[derive(Serialize)]
struct SearchEntry<'a> {
    slug: &'a str,
    title: &'a str,
    summary: &'a str,
    date: Option<String>,
    tags: &'a [String],
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    rules: RuleTable,
}

impl Generator {
    /// Create a generator with the default rule table
    pub fn new(folio: &Folio) -> Self {
        Self {
            folio: folio.clone(),
            rules: RuleTable::default(),
        }
    }

    /// Create a generator with custom rendering rules
    pub fn with_rules(folio: &Folio, rules: RuleTable) -> Self {
        Self {
            folio: folio.clone(),
            rules,
        }
    }

    /// Generate the entire site
    pub async fn generate(&self, posts: &[PostRecord], projects: &[ProjectRecord]) -> Result<()> {
        let config = &self.folio.config;
        let public = &self.folio.public_dir;
        fs::create_dir_all(public)?;

        fs::write(public.join("style.css"), templates::STYLESHEET)?;

        // Home page
        let featured: Vec<ProjectRecord> = projects
            .iter()
            .filter(|p| p.featured)
            .take(config.home.featured_projects)
            .cloned()
            .collect();
        let recent: Vec<PostRecord> = posts
            .iter()
            .take(config.home.recent_posts)
            .cloned()
            .collect();
        let skills = collect_skills(&featured, &recent);
        write_page(
            &public.join("index.html"),
            &templates::home_page(config, &featured, &recent, &skills),
        )?;

        // Blog
        write_page(
            &public.join("blog/index.html"),
            &templates::post_list_page(config, posts),
        )?;
        for post in posts {
            let body = self.post_body(&post.slug).await;
            write_page(
                &public.join("blog").join(&post.slug).join("index.html"),
                &templates::post_page(config, post, body.as_deref()),
            )?;
        }

        // Projects
        write_page(
            &public.join("projects/index.html"),
            &templates::project_list_page(config, projects),
        )?;
        for project in projects {
            let body = self.project_body(&project.slug).await;
            write_page(
                &public
                    .join("projects")
                    .join(&project.slug)
                    .join("index.html"),
                &templates::project_page(config, project, body.as_deref()),
            )?;
        }

        write_page(
            &public.join("about/index.html"),
            &templates::about_page(config),
        )?;

        write_page(&public.join("404.html"), &templates::not_found_page(config))?;

        self.generate_search_index(posts)?;
        self.copy_static_assets()?;

        tracing::info!(
            "generated {} posts and {} projects into {}",
            posts.len(),
            projects.len(),
            public.display()
        );
        Ok(())
    }

    /// Rendered body HTML of a post, or `None` on any read/render fault
    async fn post_body(&self, slug: &str) -> Option<String> {
        let raw = match self.folio.repository().read_post_source(slug).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("failed to read post {slug}: {e}");
                return None;
            }
        };
        render::render_body(&raw, &self.rules).map(|r| r.html)
    }

    async fn project_body(&self, slug: &str) -> Option<String> {
        let raw = match self.folio.repository().read_project_source(slug).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("failed to read project {slug}: {e}");
                return None;
            }
        };
        render::render_body(&raw, &self.rules).map(|r| r.html)
    }

    /// Write the post index used for client-side search and filtering
    fn generate_search_index(&self, posts: &[PostRecord]) -> Result<()> {
        let entries: Vec<SearchEntry> = posts
            .iter()
            .map(|p| SearchEntry {
                slug: &p.slug,
                title: &p.title,
                summary: &p.summary,
                date: p.date.map(|d| d.format("%Y-%m-%d").to_string()),
                tags: &p.tags,
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(self.folio.public_dir.join("search.json"), json)?;
        Ok(())
    }

    /// Copy the static asset directory verbatim into the output
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(static_dir).unwrap_or(path);
            let target = self.folio.public_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
        }
        Ok(())
    }
}

/// Skills shown as filter chips: featured project stacks plus recent post
/// tags, deduplicated and sorted
fn collect_skills(featured: &[ProjectRecord], recent: &[PostRecord]) -> Vec<String> {
    let mut skills: BTreeSet<String> = BTreeSet::new();
    for project in featured {
        skills.extend(project.stack.iter().cloned());
    }
    for post in recent {
        skills.extend(post.tags.iter().cloned());
    }
    skills.into_iter().collect()
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_content() -> (TempDir, Folio) {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("content/posts");
        let projects = tmp.path().join("content/projects");
        fs::create_dir_all(&posts).unwrap();
        fs::create_dir_all(&projects).unwrap();

        fs::write(
            posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-15\nsummary: First\ntags: [rust]\n---\n\n# Hi\n\nBody text.\n",
        )
        .unwrap();
        fs::write(
            posts.join("broken-body.md"),
            "---\ntitle: Broken\ndate: 2024-01-10\nsummary: Bad body\n---\n\n```rust\nunterminated\n",
        )
        .unwrap();
        fs::write(
            projects.join("folio.md"),
            "---\ntitle: Folio\nsummary: Engine\nrole: Author\nstack: [rust]\nfeatured: true\n---\n\nAbout the project.\n",
        )
        .unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        (tmp, folio)
    }

    #[tokio::test]
    async fn test_generate_writes_all_pages() {
        let (_tmp, folio) = site_with_content();
        let repo = folio.repository();
        let posts = repo.list_posts().await.unwrap();
        let projects = repo.list_projects().await.unwrap();

        Generator::new(&folio)
            .generate(&posts, &projects)
            .await
            .unwrap();

        let public = &folio.public_dir;
        assert!(public.join("index.html").exists());
        assert!(public.join("blog/index.html").exists());
        assert!(public.join("blog/hello/index.html").exists());
        assert!(public.join("projects/folio/index.html").exists());
        assert!(public.join("about/index.html").exists());
        assert!(public.join("404.html").exists());
        assert!(public.join("style.css").exists());
        assert!(public.join("search.json").exists());

        let page = fs::read_to_string(public.join("blog/hello/index.html")).unwrap();
        assert!(page.contains("Body text."));
    }

    #[tokio::test]
    async fn test_render_fault_yields_metadata_only_page() {
        let (_tmp, folio) = site_with_content();
        let repo = folio.repository();
        let posts = repo.list_posts().await.unwrap();

        Generator::new(&folio).generate(&posts, &[]).await.unwrap();

        let page =
            fs::read_to_string(folio.public_dir.join("blog/broken-body/index.html")).unwrap();
        assert!(page.contains("Broken"));
        assert!(page.contains("Bad body"));
        assert!(!page.contains("unterminated"));
    }

    #[tokio::test]
    async fn test_search_index_contents() {
        let (_tmp, folio) = site_with_content();
        let repo = folio.repository();
        let posts = repo.list_posts().await.unwrap();

        Generator::new(&folio).generate(&posts, &[]).await.unwrap();

        let json = fs::read_to_string(folio.public_dir.join("search.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["slug"], "hello");
        assert_eq!(entries[0]["tags"][0], "rust");
    }
}
