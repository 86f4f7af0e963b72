// Unit tests for Partner Match

use approx::assert_relative_eq;
use chrono::NaiveDate;
use geo::{HaversineDistance, Point};
use partner_match::core::{
    distance::{haversine_distance, EARTH_RADIUS_M},
    filters::{eligible_partners, ELIGIBILITY_RADIUS_M},
    locations::min_distance,
    scoring::distance_score,
    selection::{select_candidates, RING_QUOTA},
};
use partner_match::models::{Competition, CompetitionLevel, Customer, ExpansionLimit, Lead, Location, Partner};
use proptest::prelude::*;

fn reference_haversine(a: &Location, b: &Location) -> f64 {
    Point::new(a.lng, a.lat).haversine_distance(&Point::new(b.lng, b.lat))
}

fn lead_at(lat: f64, lng: f64) -> Lead {
    Lead::new("+919000000000", Location::new(lat, lng))
}

fn partner_with_customer(id: u64, location: Location) -> Partner {
    Partner {
        long_lco_account_id: id,
        zone: format!("Zone{}", id),
        active_customers: vec![Customer {
            mobile: "+918000000000".to_string(),
            address: "Test".to_string(),
            plan_expiry_dt: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            location,
            installation_speed_in_hrs: 8,
        }],
        inactive_but_geographically_relevant_customers: vec![],
        recent_leads_interested_in: vec![],
        splitters: vec![],
        tenure: 2,
    }
}

fn coordinate() -> impl Strategy<Value = Location> {
    (-89.0f64..89.0, -179.0f64..179.0).prop_map(|(lat, lng)| Location::new(lat, lng))
}

#[test]
fn test_haversine_distance_zero() {
    let a = Location::new(28.65, 77.275);
    assert_eq!(haversine_distance(&a, &a), 0.0);
}

#[test]
fn test_haversine_matches_reference_implementation() {
    let a = Location::new(28.65, 77.275);
    let b = Location::new(28.6512, 77.2771);

    // geo uses the mean earth radius (6371.0088 km), so allow a few ppm
    assert_relative_eq!(haversine_distance(&a, &b), reference_haversine(&a, &b), max_relative = 1e-5);
}

#[test]
fn test_score_anchor_points() {
    assert_eq!(distance_score(0.0), 1.0);
    assert_eq!(distance_score(500.0), 0.5);
    assert_relative_eq!(distance_score(150.0), 0.769_230_769_230_769_2, epsilon = 1e-12);
}

#[test]
fn test_expansion_invariant_reaches_quota() {
    let lead = lead_at(28.65, 77.275);
    let step = (1.0 / EARTH_RADIUS_M).to_degrees();

    for ring_size in 0..RING_QUOTA {
        let needed = RING_QUOTA - ring_size;
        let partners: Vec<Partner> = (0..ring_size)
            .map(|i| partner_with_customer(i as u64, Location::new(28.65 + 50.0 * step, 77.275)))
            .chain((0..needed + 2).map(|i| {
                let meters = 250.0 + 10.0 * i as f64;
                partner_with_customer((100 + i) as u64, Location::new(28.65 + meters * step, 77.275))
            }))
            .collect();
        let eligible: Vec<&Partner> = partners.iter().collect();
        let high = Competition {
            level: CompetitionLevel::High,
            competitor_count: 6,
            close_partner_count: 0,
        };

        let selected = select_candidates(&lead, &eligible, &high, ExpansionLimit::new(needed));
        assert_eq!(selected.len(), RING_QUOTA, "ring of {}", ring_size);
    }
}

proptest! {
    /// Distance from a point to itself is zero.
    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(haversine_distance(&a, &a), 0.0);
    }

    /// Distance is symmetric.
    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        let ab = haversine_distance(&a, &b);
        let ba = haversine_distance(&b, &a);
        prop_assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0));
        prop_assert!(ab >= 0.0);
    }

    /// Agrees with geo's haversine up to the radius difference.
    #[test]
    fn distance_agrees_with_geo(a in coordinate(), b in coordinate()) {
        let ours = haversine_distance(&a, &b);
        let theirs = reference_haversine(&a, &b);
        prop_assert!((ours - theirs).abs() <= 1e-5 * ours.max(1.0), "ours={} geo={}", ours, theirs);
    }

    /// Scores stay in (0, 1] and fall as distance grows.
    #[test]
    fn score_bounded_and_decreasing(d in 0.0f64..100_000.0, delta in 0.001f64..1_000.0) {
        let s = distance_score(d);
        prop_assert!(s > 0.0 && s <= 1.0);
        prop_assert!(distance_score(d + delta) < s);
    }

    /// The filter never admits a partner beyond the radius.
    #[test]
    fn eligible_partners_within_radius(offsets in prop::collection::vec((-0.01f64..0.01, -0.01f64..0.01), 0..20)) {
        let lead = lead_at(28.65, 77.275);
        let partners: Vec<Partner> = offsets
            .iter()
            .enumerate()
            .map(|(i, (dlat, dlng))| partner_with_customer(i as u64, Location::new(28.65 + dlat, 77.275 + dlng)))
            .collect();

        for partner in eligible_partners(&lead, &partners) {
            prop_assert!(min_distance(&lead, partner) <= ELIGIBILITY_RADIUS_M);
        }
    }
}
