//! # Page Seeding
//!
//! The about, faq, terms and privacy pages are edited as plain HTML files and
//! loaded into the `hikejo:pages` hash with this tool.
//!
//! ## Layout
//! - One file per page, named after its slug: `about.html`, `faq.html`, ...
//! - Missing files are skipped so pages can be loaded one at a time
//! - Every loaded page is stamped with the load time as `updatedAt`
//!
//! ## Cleanup
//! Comments are stripped and runs of blank lines collapsed before storing, so
//! editors can keep notes in the source files.
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use hikejo::database::{Collection, Database};
use indicatif::{ProgressBar, ProgressStyle};
use records::pages::{PageSlug, StaticPage};
use regex::Regex;
use tracing::warn;

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern is valid"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+\n").expect("blank line pattern is valid"));

#[derive(Debug, Default, PartialEq)]
pub struct Report {
    pub loaded: Vec<PageSlug>,
    pub skipped: Vec<PageSlug>,
}

pub fn page_path(dir: &Path, slug: PageSlug) -> PathBuf {
    dir.join(format!("{slug}.html"))
}

pub fn compact(html: &str) -> String {
    let stripped = COMMENTS.replace_all(html, "");
    let trimmed: Vec<&str> = stripped.lines().map(str::trim_end).collect();

    BLANK_LINES
        .replace_all(&trimmed.join("\n"), "\n\n")
        .trim()
        .to_string()
}

/// `None` when the page has no file in `dir`.
pub fn read_page(dir: &Path, slug: PageSlug, now: DateTime<Utc>) -> anyhow::Result<Option<StaticPage>> {
    let path = page_path(dir, slug);

    match fs::read_to_string(&path) {
        Ok(html) => Ok(Some(StaticPage {
            slug,
            html_content: compact(&html),
            updated_at: now,
        })),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

pub async fn load_pages(database: &Database, dir: &Path) -> anyhow::Result<Report> {
    let pb = ProgressBar::new(PageSlug::ALL.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let now = Utc::now();
    let mut report = Report::default();

    for slug in PageSlug::ALL {
        pb.set_message(format!("Loading {slug}"));

        match read_page(dir, slug, now)? {
            Some(page) => {
                database
                    .put(Collection::Pages, slug.as_str(), &page)
                    .await
                    .with_context(|| format!("Failed to store page {slug}"))?;

                report.loaded.push(slug);
            }
            None => {
                warn!("{} not found, skipping", page_path(dir, slug).display());

                report.skipped.push(slug);
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    Ok(report)
}
