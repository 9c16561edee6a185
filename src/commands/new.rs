//! Create a new post or project

use anyhow::Result;
use std::fs;

use crate::Folio;

/// Create a new content file with a front-matter skeleton
pub fn run(folio: &Folio, title: &str, kind: &str) -> Result<()> {
    let now = chrono::Local::now();
    let slug = slug::slugify(title);

    let (target_dir, content) = match kind {
        "post" => (
            folio.posts_dir.clone(),
            format!(
                "---\ntitle: {}\ndate: {}\nsummary: ''\ntags: []\nstatus: draft\n---\n\n",
                title,
                now.format("%Y-%m-%d")
            ),
        ),
        "project" => (
            folio.projects_dir.clone(),
            format!(
                "---\ntitle: {}\nsummary: ''\nrole: ''\nstack: []\nlinks: []\nfeatured: false\n---\n\n",
                title
            ),
        ),
        _ => anyhow::bail!("Unknown kind: {}. Available: post, project", kind),
    };

    fs::create_dir_all(&target_dir)?;
    let file_path = target_dir.join(format!("{slug}.md"));

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_post_starts_as_draft() {
        let tmp = tempfile::TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        run(&folio, "My New Post", "post").unwrap();
        assert!(folio.posts_dir.join("my-new-post.md").exists());

        // Drafts stay out of listings until published
        let posts = folio.repository().list_posts().await.unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_new_refuses_duplicate() {
        let tmp = tempfile::TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        run(&folio, "Twice", "post").unwrap();
        assert!(run(&folio, "Twice", "post").is_err());
    }

    #[test]
    fn test_new_unknown_kind_is_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert!(run(&folio, "X", "page").is_err());
    }
}
