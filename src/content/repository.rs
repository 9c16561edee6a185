//! Content repository - listings and lookups over the posts and projects
//! directories
//!
//! The repository holds no state between calls: every listing or lookup
//! re-reads the directory, so results always reflect what is on disk. A
//! missing directory means "no content", not an error; a file with broken
//! front matter is skipped from listings with a warning. Only file-system
//! faults other than "entry does not exist" abort an operation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::ContentError;
use super::frontmatter::{self, PostFrontMatter, ProjectFrontMatter};
use super::record::{PostRecord, PostStatus, ProjectLink, ProjectRecord, ProjectStatus};

/// Supported content extensions, in lookup preference order.
/// `.md` is plain markup, `.mdx` may embed components.
const EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// Read-only access to the two content collections
#[derive(Debug, Clone)]
pub struct ContentRepository {
    posts_dir: PathBuf,
    projects_dir: PathBuf,
}

impl ContentRepository {
    /// Create a repository over explicit content directories
    pub fn new<P: Into<PathBuf>>(posts_dir: P, projects_dir: P) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            projects_dir: projects_dir.into(),
        }
    }

    /// List all published posts with required fields, newest first
    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, ContentError> {
        let mut posts: Vec<PostRecord> = Vec::new();

        for path in content_files(&self.posts_dir).await? {
            let Some(raw) = read_entry(&path).await? else {
                continue;
            };
            let fm = match frontmatter::parse::<PostFrontMatter>(&raw) {
                Ok((fm, _body)) => fm,
                Err(e) => {
                    tracing::warn!("skipping {}: invalid front matter: {}", path.display(), e);
                    continue;
                }
            };

            let post = post_record(file_stem(&path), fm);
            if post.title.is_empty() || post.summary.is_empty() || post.date.is_none() {
                tracing::warn!(
                    "skipping {}: missing title, date or summary",
                    path.display()
                );
                continue;
            }
            if !post.status.is_published() {
                continue;
            }

            upsert(&mut posts, post, |a, b| a.slug == b.slug);
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        Ok(posts)
    }

    /// Look up a single post by slug.
    ///
    /// Unlike listings, no required-field validation is applied: missing
    /// fields come back empty rather than hiding the record. The publish
    /// gate still applies.
    pub async fn get_post(&self, slug: &str) -> Result<Option<PostRecord>, ContentError> {
        let Some((path, raw)) = read_by_slug(&self.posts_dir, slug).await? else {
            return Ok(None);
        };
        let (fm, _body) = frontmatter::parse::<PostFrontMatter>(&raw)
            .map_err(|source| ContentError::ParseFault { path, source })?;

        let post = post_record(slug.to_string(), fm);
        if !post.status.is_published() {
            return Ok(None);
        }
        Ok(Some(post))
    }

    /// List all projects with required fields, featured first then by title
    pub async fn list_projects(&self) -> Result<Vec<ProjectRecord>, ContentError> {
        let mut projects: Vec<ProjectRecord> = Vec::new();

        for path in content_files(&self.projects_dir).await? {
            let Some(raw) = read_entry(&path).await? else {
                continue;
            };
            let fm = match frontmatter::parse::<ProjectFrontMatter>(&raw) {
                Ok((fm, _body)) => fm,
                Err(e) => {
                    tracing::warn!("skipping {}: invalid front matter: {}", path.display(), e);
                    continue;
                }
            };

            let project = project_record(file_stem(&path), fm);
            if project.title.is_empty() || project.summary.is_empty() || project.role.is_empty() {
                tracing::warn!(
                    "skipping {}: missing title, summary or role",
                    path.display()
                );
                continue;
            }

            upsert(&mut projects, project, |a, b| a.slug == b.slug);
        }

        // Projects are never filtered by status
        projects.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(projects)
    }

    /// Look up a single project by slug. No status filter, no field gate.
    pub async fn get_project(&self, slug: &str) -> Result<Option<ProjectRecord>, ContentError> {
        let Some((path, raw)) = read_by_slug(&self.projects_dir, slug).await? else {
            return Ok(None);
        };
        let (fm, _body) = frontmatter::parse::<ProjectFrontMatter>(&raw)
            .map_err(|source| ContentError::ParseFault { path, source })?;

        Ok(Some(project_record(slug.to_string(), fm)))
    }

    /// Raw file contents of a post, for the rendering pipeline
    pub async fn read_post_source(&self, slug: &str) -> Result<Option<String>, ContentError> {
        Ok(read_by_slug(&self.posts_dir, slug).await?.map(|(_, raw)| raw))
    }

    /// Raw file contents of a project, for the rendering pipeline
    pub async fn read_project_source(&self, slug: &str) -> Result<Option<String>, ContentError> {
        Ok(read_by_slug(&self.projects_dir, slug)
            .await?
            .map(|(_, raw)| raw))
    }
}

/// Build a post record from parsed front matter, filling gaps with defaults
fn post_record(slug: String, fm: PostFrontMatter) -> PostRecord {
    let date = fm.parse_date();
    PostRecord {
        slug,
        title: fm.title.unwrap_or_default(),
        summary: fm.summary.unwrap_or_default(),
        date,
        tags: fm.tags,
        status: PostStatus::from_raw(fm.status.as_deref()),
    }
}

/// Build a project record from parsed front matter
fn project_record(slug: String, fm: ProjectFrontMatter) -> ProjectRecord {
    ProjectRecord {
        slug,
        title: fm.title.unwrap_or_default(),
        summary: fm.summary.unwrap_or_default(),
        role: fm.role.unwrap_or_default(),
        stack: fm.stack,
        links: fm
            .links
            .into_iter()
            .map(|l| ProjectLink {
                label: l.label,
                href: l.href,
            })
            .collect(),
        featured: fm.featured,
        status: ProjectStatus::from_raw(fm.status.as_deref()),
    }
}

/// Insert a record, replacing a previous one with the same slug
/// (last-write-wins within a single scan)
fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T, &T) -> bool) {
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Identifier of a content file: its file name minus the extension
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Enumerate supported content files in a directory, non-recursive.
/// A missing directory yields an empty list.
async fn content_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ContentError::StorageFault {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut files = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                let supported = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| EXTENSIONS.contains(&e))
                    .unwrap_or(false);
                let is_file = entry
                    .file_type()
                    .await
                    .map(|t| t.is_file())
                    .unwrap_or(false);
                if supported && is_file {
                    files.push(path);
                }
            }
            Ok(None) => break,
            Err(source) => {
                return Err(ContentError::StorageFault {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
    }

    // Directory order is platform-dependent; sort so that scans, and the
    // last-write-wins rule on slug collisions, are deterministic
    files.sort();
    Ok(files)
}

/// Read one enumerated file. A file that vanished between the directory scan
/// and the read is treated like a missing entry, not a fault.
async fn read_entry(path: &Path) -> Result<Option<String>, ContentError> {
    match fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(raw)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ContentError::StorageFault {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Try each supported extension for a slug, in preference order
async fn read_by_slug(dir: &Path, slug: &str) -> Result<Option<(PathBuf, String)>, ContentError> {
    // Slugs come from file stems; anything with a separator cannot match
    if slug.is_empty() || slug.contains(['/', '\\']) {
        return Ok(None);
    }

    for ext in EXTENSIONS {
        let path = dir.join(format!("{slug}.{ext}"));
        match fs::read_to_string(&path).await {
            Ok(raw) => return Ok(Some((path, raw))),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(source) => return Err(ContentError::StorageFault { path, source }),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, ContentRepository) {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("posts");
        let projects = tmp.path().join("projects");
        std_fs::create_dir_all(&posts).unwrap();
        std_fs::create_dir_all(&projects).unwrap();
        let repo = ContentRepository::new(posts, projects);
        (tmp, repo)
    }

    fn write_post(tmp: &TempDir, name: &str, content: &str) {
        std_fs::write(tmp.path().join("posts").join(name), content).unwrap();
    }

    fn write_project(tmp: &TempDir, name: &str, content: &str) {
        std_fs::write(tmp.path().join("projects").join(name), content).unwrap();
    }

    fn post(title: &str, date: &str, summary: &str, status: Option<&str>) -> String {
        let mut fm = format!("---\ntitle: {title}\ndate: {date}\nsummary: {summary}\n");
        if let Some(status) = status {
            fm.push_str(&format!("status: {status}\n"));
        }
        fm.push_str("---\n\nBody text.\n");
        fm
    }

    #[tokio::test]
    async fn test_list_posts_sorted_newest_first() {
        let (tmp, repo) = site();
        write_post(&tmp, "older.md", &post("Older", "2023-05-01", "s", None));
        write_post(&tmp, "newest.md", &post("Newest", "2024-03-01", "s", None));
        write_post(&tmp, "middle.md", &post("Middle", "2023-12-24", "s", None));

        let posts = repo.list_posts().await.unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn test_drafts_and_invalid_posts_excluded_from_listing() {
        let (tmp, repo) = site();
        write_post(&tmp, "ok.md", &post("Ok", "2024-01-01", "s", None));
        write_post(&tmp, "draft.md", &post("Draft", "2024-01-02", "s", Some("draft")));
        write_post(&tmp, "no-summary.md", "---\ntitle: T\ndate: 2024-01-03\n---\nbody");
        write_post(&tmp, "broken.md", "---\ntitle: [unbalanced\n---\nbody");
        write_post(&tmp, "bad-date.md", &post("BadDate", "someday", "s", None));

        let posts = repo.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "ok");
    }

    #[tokio::test]
    async fn test_missing_status_resolves_published() {
        let (tmp, repo) = site();
        write_post(&tmp, "hello.md", &post("Hello", "2024-01-01", "World", None));

        let posts = repo.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].status.is_published());
    }

    #[tokio::test]
    async fn test_missing_posts_dir_is_empty_listing() {
        let tmp = TempDir::new().unwrap();
        let repo = ContentRepository::new(
            tmp.path().join("nowhere/posts"),
            tmp.path().join("nowhere/projects"),
        );
        assert!(repo.list_posts().await.unwrap().is_empty());
        assert!(repo.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_listing_is_idempotent() {
        let (tmp, repo) = site();
        write_post(&tmp, "a.md", &post("A", "2024-01-01", "s", None));
        write_post(&tmp, "b.md", &post("B", "2024-02-01", "s", None));

        let first = repo.list_posts().await.unwrap();
        let second = repo.list_posts().await.unwrap();
        let a: Vec<_> = first.iter().map(|p| (&p.slug, &p.title, p.date)).collect();
        let b: Vec<_> = second.iter().map(|p| (&p.slug, &p.title, p.date)).collect();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_get_post_missing_slug_is_none() {
        let (_tmp, repo) = site();
        assert!(repo.get_post("missing-slug").await.unwrap().is_none());
        assert!(repo.get_project("missing-slug").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_draft_is_none() {
        let (tmp, repo) = site();
        write_post(&tmp, "wip.md", &post("Wip", "2024-01-01", "s", Some("draft")));
        assert!(repo.get_post("wip").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_falls_back_to_mdx() {
        let (tmp, repo) = site();
        write_post(&tmp, "rich.mdx", &post("Rich", "2024-01-01", "s", None));
        let found = repo.get_post("rich").await.unwrap().unwrap();
        assert_eq!(found.title, "Rich");
    }

    #[tokio::test]
    async fn test_get_post_skips_required_field_gate() {
        // Listing drops a post with an unparseable date; lookup still returns it
        let (tmp, repo) = site();
        write_post(&tmp, "undated.md", &post("Undated", "someday", "s", None));

        assert!(repo.list_posts().await.unwrap().is_empty());
        let found = repo.get_post("undated").await.unwrap().unwrap();
        assert_eq!(found.title, "Undated");
        assert!(found.date.is_none());
    }

    #[tokio::test]
    async fn test_get_post_parse_fault_propagates() {
        let (tmp, repo) = site();
        write_post(&tmp, "broken.md", "---\ntitle: [unbalanced\n---\nbody");
        let err = repo.get_post("broken").await.unwrap_err();
        assert!(matches!(err, ContentError::ParseFault { .. }));
    }

    #[tokio::test]
    async fn test_projects_featured_first_then_title() {
        let (tmp, repo) = site();
        write_project(
            &tmp,
            "zeta.md",
            "---\ntitle: Zeta\nsummary: s\nrole: Author\nfeatured: true\n---\n",
        );
        write_project(
            &tmp,
            "alpha.md",
            "---\ntitle: Alpha\nsummary: s\nrole: Author\n---\n",
        );
        write_project(
            &tmp,
            "beta.md",
            "---\ntitle: Beta\nsummary: s\nrole: Author\nfeatured: true\n---\n",
        );

        let projects = repo.list_projects().await.unwrap();
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Zeta", "Alpha"]);
    }

    #[tokio::test]
    async fn test_projects_not_filtered_by_status() {
        let (tmp, repo) = site();
        write_project(
            &tmp,
            "old.md",
            "---\ntitle: Old\nsummary: s\nrole: Author\nstatus: archived\n---\n",
        );
        let projects = repo.list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].status, ProjectStatus::Archived);
    }

    #[tokio::test]
    async fn test_project_listing_requires_role() {
        let (tmp, repo) = site();
        write_project(&tmp, "norole.md", "---\ntitle: T\nsummary: s\n---\n");
        assert!(repo.list_projects().await.unwrap().is_empty());

        // ... but the lookup path has no field gate
        let found = repo.get_project("norole").await.unwrap().unwrap();
        assert_eq!(found.title, "T");
        assert!(found.role.is_empty());
    }

    #[tokio::test]
    async fn test_project_links_and_stack_preserve_order() {
        let (tmp, repo) = site();
        write_project(
            &tmp,
            "folio.md",
            r#"---
title: Folio
summary: s
role: Author
stack: [rust, axum, tokio]
links:
  - label: Source
    href: https://example.com/src
  - label: Live
    href: https://example.com
---
"#,
        );
        let p = repo.get_project("folio").await.unwrap().unwrap();
        assert_eq!(p.stack, vec!["rust", "axum", "tokio"]);
        assert_eq!(p.links[0].label, "Source");
        assert_eq!(p.links[1].href, "https://example.com");
    }

    #[tokio::test]
    async fn test_slug_collision_last_write_wins() {
        let (tmp, repo) = site();
        write_post(&tmp, "dup.md", &post("From Md", "2024-01-01", "s", None));
        write_post(&tmp, "dup.mdx", &post("From Mdx", "2024-01-01", "s", None));

        let posts = repo.list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        // Scan order is sorted, so dup.mdx is seen last
        assert_eq!(posts[0].title, "From Mdx");
    }

    #[tokio::test]
    async fn test_traversal_slug_is_none() {
        let (_tmp, repo) = site();
        assert!(repo.get_post("../posts/x").await.unwrap().is_none());
    }
}
