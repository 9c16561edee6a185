//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Folio;

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let repo = folio.repository();
    let posts = repo.list_posts().await?;
    let projects = repo.list_projects().await?;

    tracing::info!(
        "Loaded {} posts and {} projects",
        posts.len(),
        projects.len()
    );

    let generator = Generator::new(folio);
    generator.generate(&posts, &projects).await?;

    println!(
        "Generated {} posts and {} projects in {:.2}s",
        posts.len(),
        projects.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
