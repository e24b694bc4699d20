//! How destination events are recognized as placeholders for source events.

use serde::{Deserialize, Serialize};

use crate::event::{CalendarEvent, EventPatch};
use crate::reconciler::DescriptionPolicy;

/// Identity rule linking placeholders to source events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Placeholders carry the source title; title, start and end must all match.
    /// The title is re-copied from the source on every run, and so is the
    /// description unless placeholders omit it.
    TitleCorrelated,
    /// Placeholders all carry the busy title; only start and end are compared.
    #[default]
    FixedTitle,
}

/// What to do when several placeholders match one source event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep and update every match
    #[default]
    UpdateAll,
    /// Keep the first unclaimed match; the rest are deleted as stale
    KeepFirst,
}

impl MatchingMode {
    /// Title a destination event must carry to be a candidate placeholder for `source`.
    pub fn candidate_title<'a>(&self, source: &'a CalendarEvent, busy_title: &'a str) -> &'a str {
        match self {
            MatchingMode::TitleCorrelated => &source.title,
            MatchingMode::FixedTitle => busy_title,
        }
    }

    /// Whether candidate `placeholder` stands for `source`.
    pub fn is_match(&self, placeholder: &CalendarEvent, source: &CalendarEvent) -> bool {
        let same_title = match self {
            MatchingMode::TitleCorrelated => placeholder.title == source.title,
            MatchingMode::FixedTitle => true,
        };
        same_title && placeholder.same_span(source)
    }

    /// Title for a new placeholder.
    pub fn placeholder_title(&self, source: &CalendarEvent, busy_title: &str) -> String {
        match self {
            MatchingMode::TitleCorrelated => source.title.clone(),
            MatchingMode::FixedTitle => busy_title.to_string(),
        }
    }

    /// Fields to re-copy onto a matched placeholder, if any differ.
    ///
    /// Under [`DescriptionPolicy::Omit`] the description is never written.
    pub fn recopy(
        &self,
        placeholder: &CalendarEvent,
        source: &CalendarEvent,
        description: DescriptionPolicy,
    ) -> Option<EventPatch> {
        match self {
            MatchingMode::FixedTitle => None,
            MatchingMode::TitleCorrelated => {
                let copy_description = description == DescriptionPolicy::Copy
                    && placeholder.description != source.description;
                let patch = EventPatch {
                    title: (placeholder.title != source.title).then(|| source.title.clone()),
                    description: copy_description
                        .then(|| source.description.clone().unwrap_or_default()),
                };
                (!patch.is_empty()).then_some(patch)
            }
        }
    }
}

impl std::fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchingMode::TitleCorrelated => write!(f, "title_correlated"),
            MatchingMode::FixedTitle => write!(f, "fixed_title"),
        }
    }
}
