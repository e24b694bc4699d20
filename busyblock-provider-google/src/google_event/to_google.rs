use busyblock_core::event::{EventPatch, EventTime, NewEvent};

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl ToGoogle for NewEvent {
    fn to_google(&self) -> google_calendar::types::Event {
        google_calendar::types::Event {
            summary: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            color_id: self.color_id.clone().unwrap_or_default(),
            start: Some(event_time_to_google(&self.start)),
            end: Some(event_time_to_google(&self.end)),
            reminders: Some(google_calendar::types::Reminders {
                overrides: vec![],
                use_default: self.use_default_reminders,
            }),
            ..Default::default()
        }
    }
}

/// Overwrite the fields a patch carries, leaving the rest of the event untouched.
pub fn apply_patch(event: &mut google_calendar::types::Event, patch: &EventPatch) {
    if let Some(ref title) = patch.title {
        event.summary = title.clone();
    }
    if let Some(ref description) = patch.description {
        event.description = description.clone();
    }
}

fn event_time_to_google(time: &EventTime) -> google_calendar::types::EventDateTime {
    match time {
        EventTime::Date(d) => google_calendar::types::EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::DateTime(dt) => google_calendar::types::EventDateTime {
            date: None,
            date_time: Some(*dt),
            time_zone: String::new(),
        },
    }
}
