//! Catalogue work records and page units.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Publication status of a work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    /// Status not known or not reported by the source.
    #[default]
    Unknown,
    /// Still receiving new chapters/entries.
    Ongoing,
    /// Finished.
    Completed,
    /// Licensed and pulled from the source.
    Licensed,
    /// On hiatus.
    Hiatus,
    /// Cancelled by the publisher.
    Cancelled,
}

/// An identified catalogue item.
///
/// Identity for deduplication is the source-relative `locator`, never the
/// title: two listings with the same title can be different works, and the
/// same work can be listed under title variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Work {
    /// Source-relative locator (URL or ID). The identity key.
    pub locator: String,
    /// Display title.
    pub title: String,
    /// Author, if the listing carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Artist, if the listing carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Description, if the listing carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Genre tags.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Publication status.
    #[serde(default)]
    pub status: WorkStatus,
    /// Thumbnail URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Work {
    /// Creates a work with just a locator and title. Most listings only
    /// expose those two values; that is enough.
    #[must_use]
    pub fn new(locator: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the publication status.
    #[must_use]
    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the thumbnail URL.
    #[must_use]
    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Whether two records point at the same catalogue item.
    #[must_use]
    pub fn same_item(&self, other: &Self) -> bool {
        self.locator == other.locator
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("locator".to_string(), serde_json::json!(self.locator));
        map.insert("title".to_string(), serde_json::json!(self.title));
        map.insert("status".to_string(), serde_json::json!(self.status));
        if let Some(ref author) = self.author {
            map.insert("author".to_string(), serde_json::json!(author));
        }
        if !self.genres.is_empty() {
            map.insert("genres".to_string(), serde_json::json!(self.genres));
        }
        map
    }
}

/// One page of works returned by a catalogue search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkPage {
    /// The works on this page, in listing order.
    pub works: Vec<Work>,
    /// Whether the backend reports further pages.
    pub has_next_page: bool,
}

impl WorkPage {
    /// Creates a page.
    #[must_use]
    pub fn new(works: Vec<Work>, has_next_page: bool) -> Self {
        Self {
            works,
            has_next_page,
        }
    }

    /// An empty terminal page.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of works on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Whether the page carries no works.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }
}
