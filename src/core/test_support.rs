use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use chrono::NaiveDate;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;
use crate::core::distance::EARTH_RADIUS_M;
use crate::models::{Customer, Lead, Location, Partner};

pub const LEAD_LAT: f64 = 28.65;
pub const LEAD_LNG: f64 = 77.275;

pub fn lead() -> Lead {
    Lead::new("+919876543210", Location::new(LEAD_LAT, LEAD_LNG))
}

/// Location `meters` due north of the test lead
pub fn north_of_lead(meters: f64) -> Location {
    Location::new(LEAD_LAT + (meters / EARTH_RADIUS_M).to_degrees(), LEAD_LNG)
}

pub fn customer(lat: f64, lng: f64) -> Customer {
    customer_at(Location::new(lat, lng))
}

pub fn customer_at(location: Location) -> Customer {
    Customer {
        mobile: "+911234567890".to_string(),
        address: "Test Address".to_string(),
        plan_expiry_dt: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        location,
        installation_speed_in_hrs: 24,
    }
}

pub fn partner_with(
    id: u64,
    active: Vec<Customer>,
    inactive: Vec<Customer>,
    interested: Vec<Location>,
) -> Partner {
    Partner {
        long_lco_account_id: id,
        zone: format!("Zone{}", id),
        active_customers: active,
        inactive_but_geographically_relevant_customers: inactive,
        recent_leads_interested_in: interested
            .into_iter()
            .map(|loc| Lead::new("+919999999999", loc))
            .collect(),
        splitters: vec![],
        tenure: 1,
    }
}

/// Partner whose only reference location is an active customer `meters` north of the lead
pub fn partner_at(id: u64, meters: f64) -> Partner {
    partner_with(id, vec![customer_at(north_of_lead(meters))], vec![], vec![])
}

pub fn ids(partners: &[&Partner]) -> Vec<u64> {
    partners.iter().map(|p| p.id()).collect()
}

/// Target the competition classification is emitted on
pub const COMPETITION_TARGET: &str = "partner_match::competition";

/// Fields of one captured event, values in their `Debug` form
pub type EventFields = HashMap<String, String>;

struct FieldRecorder<'a>(&'a mut EventFields);

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Layer that keeps every event on [`COMPETITION_TARGET`]
#[derive(Clone, Default)]
pub struct CompetitionEvents(Arc<Mutex<Vec<EventFields>>>);

impl CompetitionEvents {
    pub fn take(&self) -> Vec<EventFields> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl<S: Subscriber> Layer<S> for CompetitionEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != COMPETITION_TARGET {
            return;
        }
        let mut fields = EventFields::new();
        event.record(&mut FieldRecorder(&mut fields));
        self.0.lock().unwrap().push(fields);
    }
}

/// Run `f` under a subscriber that captures competition events
pub fn capture_competition_events<T>(f: impl FnOnce() -> T) -> (T, Vec<EventFields>) {
    let events = CompetitionEvents::default();
    let subscriber = Registry::default().with(events.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, events.take())
}
