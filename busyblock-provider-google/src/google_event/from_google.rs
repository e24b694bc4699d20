use anyhow::{Result, bail};
use busyblock_core::event::{CalendarEvent, EventTime, Guest};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no start time", event.id);
        };

        let Some(end) = event.end.as_ref().and_then(event_time_from_google) else {
            bail!("Event {} has no end time", event.id);
        };

        let guests = event
            .attendees
            .iter()
            .map(|a| Guest {
                name: non_empty(&a.display_name),
                email: a.email.clone(),
            })
            .collect();

        Ok(CalendarEvent {
            description: non_empty(&event.description),
            color_id: non_empty(&event.color_id),
            id: event.id,
            title: event.summary,
            start,
            end,
            guests,
        })
    }
}

fn event_time_from_google(time: &google_calendar::types::EventDateTime) -> Option<EventTime> {
    match (time.date_time, time.date) {
        (Some(dt), _) => Some(EventTime::DateTime(dt)),
        (None, Some(d)) => Some(EventTime::Date(d)),
        (None, None) => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use google_calendar::types::{Event, EventAttendee, EventDateTime};

    fn at(dt: chrono::DateTime<Utc>) -> Option<EventDateTime> {
        Some(EventDateTime {
            date: None,
            date_time: Some(dt),
            time_zone: String::new(),
        })
    }

    #[test]
    fn test_timed_event() {
        let event = Event {
            id: "abc123".into(),
            summary: "1:1 with Sam".into(),
            color_id: "6".into(),
            start: at(Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap()),
            end: at(Utc.with_ymd_and_hms(2025, 3, 17, 9, 30, 0).unwrap()),
            attendees: vec![EventAttendee {
                email: "sam@example.com".into(),
                display_name: "Sam".into(),
                response_status: "accepted".into(),
                additional_guests: 0,
                comment: String::new(),
                id: String::new(),
                optional: false,
                organizer: false,
                resource: false,
                self_: false,
            }],
            ..Default::default()
        };

        let converted = CalendarEvent::from_google(event).unwrap();
        assert_eq!(converted.id, "abc123");
        assert_eq!(converted.title, "1:1 with Sam");
        assert_eq!(converted.description, None);
        assert_eq!(converted.color_id.as_deref(), Some("6"));
        assert!(!converted.is_all_day());
        assert_eq!(converted.guests.len(), 1);
        assert_eq!(converted.guests[0].name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_all_day_event() {
        let day = |d| {
            Some(EventDateTime {
                date: NaiveDate::from_ymd_opt(2025, 3, d),
                date_time: None,
                time_zone: String::new(),
            })
        };
        let event = Event {
            id: "holiday".into(),
            summary: "Offsite".into(),
            description: "Bring a laptop".into(),
            start: day(17),
            end: day(18),
            ..Default::default()
        };

        let converted = CalendarEvent::from_google(event).unwrap();
        assert!(converted.is_all_day());
        assert_eq!(converted.description.as_deref(), Some("Bring a laptop"));
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let event = Event {
            id: "broken".into(),
            ..Default::default()
        };
        let err = CalendarEvent::from_google(event).unwrap_err();
        assert!(err.to_string().contains("no start time"));
    }
}
