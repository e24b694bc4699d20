//! One-way placeholder sync between a source and a destination calendar.
//!
//! A pass lists both calendars over the sync window, keeps destination
//! placeholders that still match a source event, creates placeholders for
//! eligible source events without one, and deletes the leftovers. Nothing is
//! remembered between passes: the destination calendar is the only state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BusyBlockResult;
use crate::event::{CalendarEvent, NewEvent};
use crate::filter::EligibilityFilter;
use crate::matching::{DuplicatePolicy, MatchingMode};
use crate::provider::CalendarProvider;
use crate::report::RunReport;
use crate::sync_window::SyncWindow;

/// Whether created placeholders carry the source event's description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionPolicy {
    Omit,
    Copy,
}

/// How new placeholders look.
#[derive(Debug, Clone)]
pub struct PlaceholderTemplate {
    /// Busy title; also the candidacy title in fixed-title mode
    pub title: String,
    pub color_id: Option<String>,
    pub description: DescriptionPolicy,
    pub use_default_reminders: bool,
}

/// Everything that shapes a pass besides the calendars themselves.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub matching: MatchingMode,
    pub duplicates: DuplicatePolicy,
    pub template: PlaceholderTemplate,
    pub filter: EligibilityFilter,
}

/// A calendar on a provider.
pub struct CalendarHandle<'a> {
    pub provider: &'a dyn CalendarProvider,
    pub calendar_id: &'a str,
}

impl<'a> CalendarHandle<'a> {
    pub fn new(provider: &'a dyn CalendarProvider, calendar_id: &'a str) -> Self {
        CalendarHandle {
            provider,
            calendar_id,
        }
    }

    async fn list(&self, window: &SyncWindow) -> BusyBlockResult<Vec<CalendarEvent>> {
        let mut events = self.provider.list_events(self.calendar_id, window).await?;
        events.retain(|e| window.overlaps(e));
        Ok(events)
    }
}

pub struct Reconciler<'a> {
    source: CalendarHandle<'a>,
    destination: CalendarHandle<'a>,
    settings: &'a SyncSettings,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        source: CalendarHandle<'a>,
        destination: CalendarHandle<'a>,
        settings: &'a SyncSettings,
    ) -> Self {
        Reconciler {
            source,
            destination,
            settings,
        }
    }

    /// Run one pass. The source calendar is only ever listed.
    ///
    /// Any provider error aborts the pass; writes issued before it stay applied.
    pub async fn run(&self, window: &SyncWindow) -> BusyBlockResult<RunReport> {
        let settings = self.settings;
        let mode = settings.matching;
        let busy_title = settings.template.title.as_str();

        let source_events = self.source.list(window).await?;
        let dest_events = self.destination.list(window).await?;

        let mut report = RunReport {
            destination_seen: dest_events.len(),
            source_seen: source_events.len(),
            ..RunReport::default()
        };

        // Every destination event ever considered a candidate, in first-seen order
        let mut known: Vec<&CalendarEvent> = Vec::new();
        let mut known_ids: HashSet<&str> = HashSet::new();

        let fixed_candidates: Option<Vec<&CalendarEvent>> = match mode {
            MatchingMode::FixedTitle => {
                Some(dest_events.iter().filter(|d| d.title == busy_title).collect())
            }
            MatchingMode::TitleCorrelated => None,
        };
        if let Some(candidates) = &fixed_candidates {
            remember(candidates, &mut known, &mut known_ids);
        }

        let mut kept: HashSet<String> = HashSet::new();

        for source in &source_events {
            let candidates: Vec<&CalendarEvent> = match &fixed_candidates {
                Some(candidates) => candidates.clone(),
                None => {
                    let title = mode.candidate_title(source, busy_title);
                    let candidates: Vec<_> =
                        dest_events.iter().filter(|d| d.title == title).collect();
                    remember(&candidates, &mut known, &mut known_ids);
                    candidates
                }
            };

            let mut handled = false;
            for placeholder in candidates {
                if !mode.is_match(placeholder, source) {
                    continue;
                }

                if settings.duplicates == DuplicatePolicy::KeepFirst
                    && (handled || kept.contains(&placeholder.id))
                {
                    debug!(
                        placeholder = %placeholder.id,
                        source = %source.id,
                        "Skipping duplicate placeholder"
                    );
                    continue;
                }
                if handled {
                    warn!(
                        placeholder = %placeholder.id,
                        source = %source.id,
                        "Several placeholders match one source event"
                    );
                }

                let patch = mode.recopy(placeholder, source, settings.template.description);
                if let Some(patch) = patch {
                    self.destination
                        .provider
                        .update_event(self.destination.calendar_id, &placeholder.id, &patch)
                        .await?;
                    debug!(placeholder = %placeholder.id, "Re-copied fields from source");
                }

                if kept.insert(placeholder.id.clone()) {
                    report.updated.push(placeholder.id.clone());
                }
                handled = true;
            }

            if handled {
                continue;
            }

            if let Some(reason) = settings.filter.should_ignore(source) {
                debug!(source = %source, %reason, "Ignoring source event");
                report.ignored += 1;
                continue;
            }

            let new_event = self.placeholder_for(source);
            let created = self
                .destination
                .provider
                .create_event(self.destination.calendar_id, &new_event)
                .await?;
            info!(
                placeholder = %created.id,
                title = %created.title,
                start = %created.start,
                end = %created.end,
                "Created placeholder"
            );
            report.created.push(created.id);
        }

        report.pre_existing = known.len();

        for placeholder in known {
            if kept.contains(&placeholder.id) {
                continue;
            }
            self.destination
                .provider
                .delete_event(self.destination.calendar_id, &placeholder.id)
                .await?;
            info!(
                placeholder = %placeholder.id,
                title = %placeholder.title,
                start = %placeholder.start,
                "Deleted placeholder"
            );
            report.deleted.push(placeholder.id.clone());
        }

        Ok(report)
    }

    fn placeholder_for(&self, source: &CalendarEvent) -> NewEvent {
        let template = &self.settings.template;
        NewEvent {
            title: self.settings.matching.placeholder_title(source, &template.title),
            start: source.start,
            end: source.end,
            description: match template.description {
                DescriptionPolicy::Copy => source.description.clone(),
                DescriptionPolicy::Omit => None,
            },
            color_id: template.color_id.clone(),
            use_default_reminders: template.use_default_reminders,
        }
    }
}

fn remember<'e>(
    candidates: &[&'e CalendarEvent],
    known: &mut Vec<&'e CalendarEvent>,
    known_ids: &mut HashSet<&'e str>,
) {
    for &candidate in candidates {
        if known_ids.insert(candidate.id.as_str()) {
            known.push(candidate);
        }
    }
}
