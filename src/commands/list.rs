//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type
pub async fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let repo = folio.repository();

    match content_type {
        "post" | "posts" => {
            let posts = repo.list_posts().await?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = post
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("  {} - {} [{}]", date, post.title, post.slug);
            }
        }
        "project" | "projects" => {
            let projects = repo.list_projects().await?;
            println!("Projects ({}):", projects.len());
            for project in projects {
                let marker = if project.featured { "*" } else { " " };
                println!("  {} {} - {} [{}]", marker, project.title, project.role, project.slug);
            }
        }
        "tag" | "tags" => {
            let posts = repo.list_posts().await?;
            let mut tags: std::collections::HashMap<String, usize> =
                std::collections::HashMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, tag",
                content_type
            );
        }
    }

    Ok(())
}
