//! # mt-ui
//!
//! Server-rendered index page. The page itself only displays data; the
//! script in `static/js/app.js` talks to the JSON API for add, edit and
//! delete, and turns pasted or dropped pictures into data URIs.

use askama::Template;
use mt_core::models::{AnalyticsSnapshot, Mistake, MistakeFilter, MistakeType};

/// One `<option>` of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

fn options<'a>(values: impl IntoIterator<Item = &'a str>, current: Option<&str>) -> Vec<SelectOption> {
    values
        .into_iter()
        .map(|value| SelectOption {
            value: value.to_string(),
            selected: current == Some(value),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    /// Choices for the add form
    pub mistake_types: Vec<SelectOption>,
    pub type_filter: Vec<SelectOption>,
    pub topic_filter: Vec<SelectOption>,
    pub mistakes: &'a [Mistake],
    pub analytics: &'a AnalyticsSnapshot,
    pub most_common_type: &'a str,
}

impl<'a> IndexTemplate<'a> {
    pub fn new(
        topics: &'a [String],
        mistakes: &'a [Mistake],
        analytics: &'a AnalyticsSnapshot,
        filter: &'a MistakeFilter,
    ) -> Self {
        let labels = MistakeType::labels();
        Self {
            title: "Mistake Tracker",
            mistake_types: options(labels.iter().copied(), Some(MistakeType::default().as_str())),
            type_filter: options(labels.iter().copied(), filter.mistake_type.as_deref()),
            topic_filter: options(topics.iter().map(String::as_str), filter.topic.as_deref()),
            mistakes,
            analytics,
            most_common_type: analytics.most_common_type.as_deref().unwrap_or("-"),
        }
    }
}
