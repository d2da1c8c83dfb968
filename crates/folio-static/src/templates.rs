//! Template engine for rendering blog pages.

use minijinja::{context, Environment};
use serde::Serialize;

/// A navigation item.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Whether this is the active page
    pub active: bool,
}

/// A link to another site.
#[derive(Debug, Clone, Serialize)]
pub struct LinkItem {
    pub name: String,
    pub url: String,
}

/// A table of contents entry.
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// A tag and its anchor on the tag index.
#[derive(Debug, Clone, Serialize)]
pub struct TagLink {
    pub name: String,
    pub id: String,
}

/// A post as shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub path: String,
    pub date: String,
    pub summary: String,
}

/// Posts sharing a tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagGroup {
    pub name: String,
    pub id: String,
    pub posts: Vec<PostSummary>,
}

/// Site-wide values shared by every page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub theme_color: String,
    pub stylesheet: String,
    pub nav: Vec<NavItem>,
    pub external_links: Vec<LinkItem>,
    /// Feed URL when the feed is enabled
    pub feed: Option<String>,
    /// Manifest URL when the manifest is enabled
    pub manifest: Option<String>,
    /// Service worker URL when offline caching is enabled
    pub service_worker: Option<String>,
    /// Tracking id when analytics is enabled
    pub analytics_id: Option<String>,
    /// Tag index URL when the site has one
    pub tags_page: Option<String>,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site-relative path of this page
    pub path: String,
    /// Rendered content HTML
    pub content: String,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Publication date (posts only)
    pub date: Option<String>,
    /// Tags (posts only)
    pub tags: Vec<TagLink>,
    /// Post listing (home and archive)
    pub posts: Vec<PostSummary>,
    /// Tag index
    pub tag_groups: Vec<TagGroup>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        for (name, source) in [
            ("base.html", BASE_TEMPLATE),
            ("post.html", POST_TEMPLATE),
            ("list.html", LIST_TEMPLATE),
            ("tags.html", TAGS_TEMPLATE),
            ("page.html", PAGE_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("built-in templates are valid");
        }

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        site: &SiteContext,
        page: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        let nav: Vec<NavItem> = site
            .nav
            .iter()
            .map(|item| NavItem {
                active: item.path == page.path,
                ..item.clone()
            })
            .collect();

        tmpl.render(context! {
            site => site,
            nav => nav,
            page => page,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ site.language }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% if page.title and page.title != site.title %}{{ page.title }} | {% endif %}{{ site.title }}</title>
  <meta name="description" content="{{ site.description }}">
  {% if site.author %}<meta name="author" content="{{ site.author }}">
  {% endif %}<meta name="theme-color" content="{{ site.theme_color }}">
  <link rel="stylesheet" href="/{{ site.stylesheet }}">
  {% if site.manifest %}<link rel="manifest" href="/{{ site.manifest }}">
  {% endif %}{% if site.feed %}<link rel="alternate" type="application/rss+xml" title="{{ site.title }}" href="/{{ site.feed }}">
  {% endif %}{% if site.analytics_id %}<script async src="https://www.googletagmanager.com/gtag/js?id={{ site.analytics_id }}"></script>
  <script>
    window.dataLayer = window.dataLayer || [];
    function gtag(){dataLayer.push(arguments);}
    gtag("js", new Date());
    gtag("config", "{{ site.analytics_id }}");
  </script>
  {% endif %}
</head>
<body>
  <header class="site-header">
    <a href="/" class="site-title">{{ site.title }}</a>
    <nav class="site-nav">
      <ul>
      {% for item in nav %}
        <li{% if item.active %} class="active"{% endif %}><a href="/{{ item.path }}">{{ item.title }}</a></li>
      {% endfor %}
      </ul>
    </nav>
  </header>
  <main>
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
    {% if site.external_links %}
    <ul>
    {% for link in site.external_links %}
      <li><a href="{{ link.url }}" rel="noopener">{{ link.name }}</a></li>
    {% endfor %}
    </ul>
    {% endif %}
    {% if site.author %}<p>&copy; {{ site.author }}</p>{% endif %}
  </footer>
  {% if site.service_worker %}
  <script>
    if ("serviceWorker" in navigator) {
      navigator.serviceWorker.register("/{{ site.service_worker }}");
    }
  </script>
  {% endif %}
</body>
</html>"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="post">
  <header>
    <h1>{{ page.title }}</h1>
    <p class="post-meta"><time datetime="{{ page.date }}">{{ page.date }}</time></p>
    {% if page.tags %}
    <ul class="tags">
    {% for tag in page.tags %}
      <li>{% if site.tags_page %}<a href="/{{ site.tags_page }}#{{ tag.id }}">{{ tag.name }}</a>{% else %}<span>{{ tag.name }}</span>{% endif %}</li>
    {% endfor %}
    </ul>
    {% endif %}
  </header>

  {% if page.toc %}
  <nav class="toc">
    <ul>
    {% for entry in page.toc %}
      <li class="toc-level-{{ entry.level }}"><a href="#{{ entry.id }}">{{ entry.title }}</a></li>
    {% endfor %}
    </ul>
  </nav>
  {% endif %}

  <div class="content">
    {{ page.content | safe }}
  </div>
</article>
{% endblock %}"##;

const LIST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
{% if page.content %}<div class="content">{{ page.content | safe }}</div>{% endif %}
<ul class="post-list">
{% for post in page.posts %}
  <li>
    <a href="/{{ post.path }}"><strong>{{ post.title }}</strong></a>
    <p class="post-meta"><time datetime="{{ post.date }}">{{ post.date }}</time></p>
    {% if post.summary %}<p>{{ post.summary }}</p>{% endif %}
  </li>
{% else %}
  <li>No posts yet.</li>
{% endfor %}
</ul>
{% endblock %}"##;

const TAGS_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<h1>{{ page.title }}</h1>
{% for group in page.tag_groups %}
<section id="{{ group.id }}">
  <h2>{{ group.name }}</h2>
  <ul class="post-list">
  {% for post in group.posts %}
    <li><a href="/{{ post.path }}">{{ post.title }}</a> <span class="post-meta">{{ post.date }}</span></li>
  {% endfor %}
  </ul>
</section>
{% endfor %}
{% endblock %}"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="page">
  <h1>{{ page.title }}</h1>
  <div class="content">
    {{ page.content | safe }}
  </div>
</article>
{% endblock %}"##;
