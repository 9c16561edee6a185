//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content/posts"))?;
    fs::create_dir_all(target_dir.join("content/projects"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let config_content = r#"# Folio configuration

# Site
title: Folio
description: ''
author: John Doe
tagline: ''

# URL
url: http://example.com

# Directory
content_dir: content
public_dir: public
static_dir: static

# Home page
home:
  featured_projects: 3
  recent_posts: 3

# Date display format (chrono strftime)
date_format: '%B %-d, %Y'
"#;
    fs::write(&config_path, config_content)?;

    let sample_post = r#"---
title: Hello World
date: 2024-01-01
summary: Welcome to your new site.
tags:
  - meta
---

# Hello World

This is your first post. Edit or delete it, then start writing.

```sh
folio-rs new "My first real post"
```
"#;
    fs::write(target_dir.join("content/posts/hello-world.md"), sample_post)?;

    let sample_project = r#"---
title: My Project
summary: A short description of what it does and why it exists.
role: Author
stack:
  - rust
featured: true
links:
  - label: Source
    href: https://example.com
---

Describe the project here.
"#;
    fs::write(
        target_dir.join("content/projects/my-project.md"),
        sample_project,
    )?;

    println!("Initialized new site in {:?}", target_dir);
    println!("Run `folio-rs generate` to build it.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;

    #[tokio::test]
    async fn test_init_creates_working_site() {
        let tmp = tempfile::TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        assert!(tmp.path().join("_config.yml").exists());

        let folio = Folio::new(tmp.path()).unwrap();
        let posts = folio.repository().list_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");

        let projects = folio.repository().list_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert!(projects[0].featured);
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let tmp = tempfile::TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();
        assert!(init_site(tmp.path()).is_err());
    }
}
