use std::collections::HashSet;
use crate::models::{Competition, CompetitionLevel, Lead, Partner};
use crate::core::distance::haversine_distance;
use crate::core::locations::min_distance;

/// Radius within which a partner's customer makes it a competitor, in meters
pub const COMPETITOR_RADIUS_M: f64 = 200.0;

/// Radius for the close-partner density measure, in meters
pub const CLOSE_PARTNER_RADIUS_M: f64 = 100.0;

/// More competitors than this means high competition
pub const MAX_LOW_COMPETITORS: usize = 5;

/// This many close partners means high competition
pub const HIGH_CLOSE_PARTNERS: usize = 3;

/// Number of distinct partners with at least one active or inactive
/// customer within [`COMPETITOR_RADIUS_M`] of the lead
pub fn competitor_count(lead: &Lead, partners: &[Partner]) -> usize {
    let mut competitors: HashSet<u64> = HashSet::new();

    for partner in partners {
        // First customer in range settles it for this partner
        let has_nearby_customer = partner
            .customers()
            .any(|c| haversine_distance(&lead.location, &c.location) <= COMPETITOR_RADIUS_M);

        if has_nearby_customer {
            competitors.insert(partner.id());
        }
    }

    competitors.len()
}

/// Number of partners whose nearest reference location lies within
/// [`CLOSE_PARTNER_RADIUS_M`] of the lead
pub fn close_partner_count(lead: &Lead, partners: &[Partner]) -> usize {
    partners
        .iter()
        .filter(|p| min_distance(lead, p) <= CLOSE_PARTNER_RADIUS_M)
        .count()
}

/// Label the lead's neighborhood using the full partner list
///
/// This is Stage 2 of the matching pipeline. The result is also emitted as
/// a tracing event on the `partner_match::competition` target.
pub fn classify_competition(lead: &Lead, partners: &[Partner]) -> Competition {
    let competitor_count = competitor_count(lead, partners);
    let close_partner_count = close_partner_count(lead, partners);

    let level = if competitor_count > MAX_LOW_COMPETITORS
        || close_partner_count >= HIGH_CLOSE_PARTNERS
    {
        CompetitionLevel::High
    } else {
        CompetitionLevel::Low
    };

    tracing::info!(
        target: "partner_match::competition",
        lead = %lead.mobile,
        lat = lead.location.lat,
        lng = lead.location.lng,
        competitor_count,
        close_partner_count,
        competition = %level,
        "Location deemed {} competition",
        level
    );

    Competition {
        level,
        competitor_count,
        close_partner_count,
    }
}
