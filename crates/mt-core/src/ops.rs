//! In-memory half of every store: filtering, topic listing and analytics
//! over an already loaded collection.

use std::collections::BTreeSet;

use crate::models::{AnalyticsSnapshot, Mistake, MistakeFilter, MistakeType};
use crate::tally::Tally;

/// Bucket for records whose topic is blank.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// How many topics `topic_distribution` keeps.
pub const TOP_TOPICS: usize = 10;

fn field_matches(value: &str, wanted: Option<&str>) -> bool {
    match wanted {
        Some(w) if !w.is_empty() => value.to_lowercase() == w.to_lowercase(),
        _ => true,
    }
}

/// Applies `filter` and sorts newest first. The sort is stable, so records
/// sharing a `date_added` keep their stored order.
pub fn filter_and_sort(mistakes: Vec<Mistake>, filter: &MistakeFilter) -> Vec<Mistake> {
    let mut out: Vec<Mistake> = mistakes
        .into_iter()
        .filter(|m| field_matches(&m.topic, filter.topic.as_deref()))
        .filter(|m| field_matches(&m.mistake_type, filter.mistake_type.as_deref()))
        .collect();
    out.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    out
}

pub fn collect_topics(mistakes: &[Mistake]) -> Vec<String> {
    mistakes
        .iter()
        .map(|m| m.topic.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Topic buckets are case-sensitive ("Algebra" and "algebra" count apart),
/// unlike the list filter.
pub fn compute_analytics(mistakes: &[Mistake]) -> AnalyticsSnapshot {
    let mut types = Tally::seeded(MistakeType::ALL.iter().map(MistakeType::as_str));
    let mut topics = Tally::default();

    for m in mistakes {
        types.increment(&m.mistake_type);
        let topic = m.topic.trim();
        topics.increment(if topic.is_empty() { UNCATEGORIZED } else { topic });
    }

    AnalyticsSnapshot {
        total_mistakes: mistakes.len(),
        most_common_type: types.first_max().map(str::to_string),
        type_distribution: types,
        topic_distribution: topics.top(TOP_TOPICS),
    }
}
