use super::{ChangeFrequency, SitemapEntry, SitemapError};
use crate::content::PostData;
use chrono::SecondsFormat;
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesText, Event},
};
use std::io::{self, Write};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// Publication block required by Google News sitemaps.
#[derive(Debug, Clone, Copy)]
pub struct NewsPublication<'a> {
    pub name: &'a str,
    pub language: &'a str,
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

fn new_document() -> io::Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, SitemapError> {
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8(bytes)?)
}

fn format_priority(priority: f32) -> String {
    format!("{:.1}", priority)
}

/// Renders a standard `<urlset>` sitemap.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = new_document()?;

    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| -> io::Result<()> {
            for entry in entries {
                w.create_element("url")
                    .write_inner_content(|w| -> io::Result<()> {
                        text_element(w, "loc", &entry.loc)?;
                        if let Some(modified) = entry.last_modified {
                            text_element(
                                w,
                                "lastmod",
                                &modified.to_rfc3339_opts(SecondsFormat::Secs, true),
                            )?;
                        }
                        text_element(w, "changefreq", entry.change_frequency.as_str())?;
                        text_element(w, "priority", &format_priority(entry.priority))?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;

    finish(writer)
}

/// Renders a Google News sitemap for `posts`. Titles are escaped for all
/// five XML special characters; posts with an unparseable date are skipped.
pub fn render_news_sitemap(
    base_url: &str,
    publication: NewsPublication<'_>,
    posts: &[PostData],
) -> Result<String, SitemapError> {
    let base_url = base_url.trim_end_matches('/');
    let mut writer = new_document()?;

    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .with_attribute(("xmlns:news", NEWS_NS))
        .write_inner_content(|w| -> io::Result<()> {
            for post in posts {
                let Some(published) = post.published_at() else {
                    continue;
                };

                w.create_element("url")
                    .write_inner_content(|w| -> io::Result<()> {
                        text_element(w, "loc", &format!("{}/{}", base_url, post.slug))?;
                        w.create_element("news:news")
                            .write_inner_content(|w| -> io::Result<()> {
                                w.create_element("news:publication").write_inner_content(
                                    |w| -> io::Result<()> {
                                        text_element(w, "news:name", publication.name)?;
                                        text_element(w, "news:language", publication.language)?;
                                        Ok(())
                                    },
                                )?;
                                text_element(
                                    w,
                                    "news:publication_date",
                                    &published.to_rfc3339_opts(SecondsFormat::Millis, true),
                                )?;
                                w.create_element("news:title").write_text_content(
                                    BytesText::from_escaped(escape(post.title.as_str())),
                                )?;
                                Ok(())
                            })?;
                        Ok(())
                    })?;
            }
            Ok(())
        })?;

    finish(writer)
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}
