//! RSS feed generation.

use folio_config::SiteConfig;
use rss::{validation::Validate, CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder};

use super::Artifact;
use crate::document::{by_date_desc, Document};

/// The generated feed failed validation.
#[derive(Debug, thiserror::Error)]
#[error("rss validation failed: {0}")]
pub struct FeedError(String);

/// Build the RSS feed if enabled in config.
///
/// Items are ordered newest first and capped by `feed.limit`.
pub fn emit(config: &SiteConfig, documents: &[Document]) -> Result<Option<Artifact>, FeedError> {
    if !config.features.rss {
        return Ok(None);
    }

    let limit = config.feed.limit.unwrap_or(usize::MAX);
    let sorted = by_date_desc(documents);
    let items: Vec<rss::Item> = sorted
        .iter()
        .take(limit)
        .map(|doc| document_to_item(doc, config))
        .collect();

    let mut channel = ChannelBuilder::default()
        .title(config.site.title.clone())
        .link(config.absolute_url(""))
        .description(config.site.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some("folio".to_string()))
        .last_build_date(sorted.first().map(|doc| rfc2822(doc)))
        .items(items)
        .build();

    if !config.site.author.is_empty() {
        channel.set_copyright(Some(config.site.author.clone()));
    }

    // Without a site URL every link is relative and cannot validate
    if !config.site.url.is_empty() {
        channel
            .validate()
            .map_err(|e| FeedError(e.to_string()))?;
    }

    Ok(Some(Artifact::new(&config.feed.path, channel.to_string())))
}

fn document_to_item(doc: &Document, config: &SiteConfig) -> rss::Item {
    let link = config.absolute_url(&doc.url_path());
    let categories = doc
        .tags
        .iter()
        .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(doc.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(doc.summary().to_string()))
        .pub_date(Some(rfc2822(doc)))
        .categories(categories)
        .build()
}

fn rfc2822(doc: &Document) -> String {
    doc.date
        .and_time(chrono::NaiveTime::default())
        .and_utc()
        .to_rfc2822()
}
