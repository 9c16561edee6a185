//! Built-in page templates
//!
//! The routing/templating layer around the content core: plain functions that
//! wrap rendered bodies and record metadata into full HTML pages. The
//! stylesheet is embedded in the binary so a generated site is self-contained.

use chrono::{DateTime, Local};

use crate::config::SiteConfig;
use crate::content::{PostRecord, ProjectRecord};
use crate::render::rules::html_escape;

/// Default theme stylesheet, written next to the generated pages
pub const STYLESHEET: &str = include_str!("style.css");

/// Client-side skill filter for the home page: chips toggle visibility of
/// cards by their data-skills attribute
const FILTER_SCRIPT: &str = r#"<script>
(function() {
  var chips = document.querySelectorAll("button.chip[data-skill]");
  var cards = document.querySelectorAll("[data-skills]");
  var active = null;
  chips.forEach(function(chip) {
    chip.addEventListener("click", function() {
      active = active === chip.dataset.skill ? null : chip.dataset.skill;
      chips.forEach(function(c) {
        c.classList.toggle("active", c.dataset.skill === active);
      });
      cards.forEach(function(card) {
        var skills = card.dataset.skills.split(",");
        card.classList.toggle("hidden", active !== null && skills.indexOf(active) < 0);
      });
    });
  });
})();
</script>"#;

/// Wrap page content in the site chrome
pub fn layout(config: &SiteConfig, page_title: &str, content: &str) -> String {
    let title = if page_title.is_empty() {
        config.title.clone()
    } else {
        format!("{} · {}", page_title, config.title)
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="{description}">
<title>{title}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<header class="site-header">
<a class="brand" href="/">{brand}</a>
<nav>
<a href="/blog/">Blog</a>
<a href="/projects/">Projects</a>
<a href="/about/">About</a>
</nav>
</header>
<main>
{content}
</main>
<footer class="site-footer">© {author}</footer>
</body>
</html>
"#,
        description = html_escape(&config.description),
        title = html_escape(&title),
        brand = html_escape(&config.title),
        author = html_escape(&config.author),
        content = content,
    )
}

/// Home page: hero, skill filter chips, featured projects, recent posts
pub fn home_page(
    config: &SiteConfig,
    featured: &[ProjectRecord],
    recent: &[PostRecord],
    skills: &[String],
) -> String {
    let mut content = format!(
        "<section class=\"hero\"><h1>{}</h1><p>{}</p></section>\n",
        html_escape(&config.author),
        html_escape(&config.tagline)
    );

    if !skills.is_empty() {
        content.push_str("<section>\n");
        for skill in skills {
            content.push_str(&format!(
                "<button class=\"chip\" data-skill=\"{0}\">{0}</button>\n",
                html_escape(skill)
            ));
        }
        content.push_str("</section>\n");
    }

    content.push_str("<section><h2>Featured projects</h2>\n");
    if featured.is_empty() {
        content.push_str("<p class=\"empty\">Nothing featured yet.</p>\n");
    }
    for project in featured {
        content.push_str(&project_card(project));
    }
    content.push_str("</section>\n");

    content.push_str("<section><h2>Recent posts</h2>\n");
    if recent.is_empty() {
        content.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }
    for post in recent {
        content.push_str(&post_card(config, post));
    }
    content.push_str("</section>\n");

    content.push_str(FILTER_SCRIPT);
    layout(config, "", &content)
}

/// Blog listing page
pub fn post_list_page(config: &SiteConfig, posts: &[PostRecord]) -> String {
    let mut content = String::from("<h1>Blog</h1>\n");
    if posts.is_empty() {
        content.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }
    for post in posts {
        content.push_str(&post_card(config, post));
    }
    layout(config, "Blog", &content)
}

/// A single post page. `body_html` is `None` when the body failed to render;
/// the page still shows the metadata with an empty content region.
pub fn post_page(config: &SiteConfig, post: &PostRecord, body_html: Option<&str>) -> String {
    let mut content = format!(
        "<article>\n<p class=\"meta\">{}</p>\n<h1>{}</h1>\n<p>{}</p>\n",
        format_date(config, post.date),
        html_escape(&post.title),
        html_escape(&post.summary),
    );
    for tag in &post.tags {
        content.push_str(&format!("<span class=\"chip\">{}</span>", html_escape(tag)));
    }
    content.push('\n');
    if let Some(html) = body_html {
        content.push_str(html);
    }
    content.push_str("</article>\n");
    layout(config, &post.title, &content)
}

/// Projects listing page
pub fn project_list_page(config: &SiteConfig, projects: &[ProjectRecord]) -> String {
    let mut content = String::from("<h1>Projects</h1>\n");
    if projects.is_empty() {
        content.push_str("<p class=\"empty\">No projects yet.</p>\n");
    }
    for project in projects {
        content.push_str(&project_card(project));
    }
    layout(config, "Projects", &content)
}

/// A single project page, metadata-only when the body failed to render
pub fn project_page(
    config: &SiteConfig,
    project: &ProjectRecord,
    body_html: Option<&str>,
) -> String {
    let mut content = format!(
        "<article>\n<p class=\"meta\">{}</p>\n<h1>{}</h1>\n<p>{}</p>\n",
        html_escape(&project.role),
        html_escape(&project.title),
        html_escape(&project.summary),
    );
    for tech in &project.stack {
        content.push_str(&format!("<span class=\"chip\">{}</span>", html_escape(tech)));
    }
    content.push('\n');
    if !project.links.is_empty() {
        content.push_str("<p>");
        for link in &project.links {
            content.push_str(&format!(
                "<a href=\"{}\">{}</a> ",
                html_escape(&link.href),
                html_escape(&link.label)
            ));
        }
        content.push_str("</p>\n");
    }
    if let Some(html) = body_html {
        content.push_str(html);
    }
    content.push_str("</article>\n");
    layout(config, &project.title, &content)
}

/// About page built from the site configuration
pub fn about_page(config: &SiteConfig) -> String {
    let mut content = format!(
        "<article>\n<h1>About {}</h1>\n<p class=\"meta\">{}</p>\n",
        html_escape(&config.author),
        html_escape(&config.tagline),
    );
    if !config.description.is_empty() {
        content.push_str(&format!("<p>{}</p>\n", html_escape(&config.description)));
    }
    content.push_str("</article>\n");
    layout(config, "About", &content)
}

/// 404 page, also used as the preview server's fallback
pub fn not_found_page(config: &SiteConfig) -> String {
    let content = "<h1>Page not found</h1>\n\
         <p class=\"empty\">The page you are looking for does not exist.</p>\n\
         <p><a href=\"/\">Back to the front page</a></p>\n";
    layout(config, "Not found", content)
}

fn post_card(config: &SiteConfig, post: &PostRecord) -> String {
    format!(
        "<div class=\"card\" data-skills=\"{skills}\">\n\
         <p class=\"meta\">{date}</p>\n\
         <h3><a href=\"/blog/{slug}/\">{title}</a></h3>\n\
         <p>{summary}</p>\n\
         </div>\n",
        skills = html_escape(&post.tags.join(",")),
        date = format_date(config, post.date),
        slug = html_escape(&post.slug),
        title = html_escape(&post.title),
        summary = html_escape(&post.summary),
    )
}

fn project_card(project: &ProjectRecord) -> String {
    let chips: String = project
        .stack
        .iter()
        .map(|tech| format!("<span class=\"chip\">{}</span>", html_escape(tech)))
        .collect();
    format!(
        "<div class=\"card{featured}\" data-skills=\"{skills}\">\n\
         <p class=\"meta\">{role}</p>\n\
         <h3><a href=\"/projects/{slug}/\">{title}</a></h3>\n\
         <p>{summary}</p>\n{chips}\n\
         </div>\n",
        featured = if project.featured { " featured" } else { "" },
        skills = html_escape(&project.stack.join(",")),
        role = html_escape(&project.role),
        slug = html_escape(&project.slug),
        title = html_escape(&project.title),
        summary = html_escape(&project.summary),
    )
}

fn format_date(config: &SiteConfig, date: Option<DateTime<Local>>) -> String {
    date.map(|d| d.format(&config.date_format).to_string())
        .unwrap_or_default()
}
