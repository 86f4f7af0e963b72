use crate::models::{Lead, Partner, ScoredPartner};
use crate::core::distance::nearest_distance;
use crate::core::filters::ELIGIBILITY_RADIUS_M;
use crate::core::locations::{customer_locations, interested_lead_locations, min_distance};

/// Distance at which the score halves, in meters
pub const SCORE_HALF_DISTANCE_M: f64 = 500.0;

/// A ranked candidate, borrowing the partner from the caller's snapshot
#[derive(Debug, Clone, Copy)]
pub struct PartnerScore<'a> {
    pub partner: &'a Partner,
    pub score: f64,
    pub primary_distance_m: f64,
}

impl PartnerScore<'_> {
    pub fn to_owned_report(&self) -> ScoredPartner {
        ScoredPartner {
            partner_id: self.partner.id(),
            zone: self.partner.zone.clone(),
            score: self.score,
            primary_distance_m: self.primary_distance_m,
        }
    }
}

/// Calculate a match score in (0, 1] from the primary distance
///
/// `score = 1 / (1 + distance / 500)`: 1.0 at the lead, 0.5 at 500 m,
/// strictly decreasing.
#[inline]
pub fn distance_score(primary_distance_m: f64) -> f64 {
    1.0 / (1.0 + primary_distance_m / SCORE_HALF_DISTANCE_M)
}

/// Distance the score is based on: nearest interested lead if the partner
/// has any, otherwise nearest customer. `None` if the partner has neither.
pub fn primary_distance(lead: &Lead, partner: &Partner) -> Option<f64> {
    let to_leads = nearest_distance(&lead.location, interested_lead_locations(partner));
    if to_leads.is_finite() {
        return Some(to_leads);
    }

    let to_customers = nearest_distance(&lead.location, customer_locations(partner));
    to_customers.is_finite().then_some(to_customers)
}

/// Score one candidate, or `None` if it cannot serve the lead
pub fn score_partner<'a>(lead: &Lead, partner: &'a Partner) -> Option<PartnerScore<'a>> {
    // Candidates normally come from the eligibility filter, but the radius is
    // part of this function's contract too
    if min_distance(lead, partner) > ELIGIBILITY_RADIUS_M {
        return None;
    }

    let primary_distance_m = primary_distance(lead, partner)?;

    Some(PartnerScore {
        partner,
        score: distance_score(primary_distance_m),
        primary_distance_m,
    })
}

/// Score and rank candidates, best first
///
/// This is Stage 4 of the matching pipeline. Equal scores are ordered by
/// ascending partner id.
pub fn rank_candidates<'a>(lead: &Lead, candidates: &[&'a Partner]) -> Vec<PartnerScore<'a>> {
    let mut scored: Vec<PartnerScore<'a>> = candidates
        .iter()
        .filter_map(|&p| score_partner(lead, p))
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.partner.id().cmp(&b.partner.id()))
    });

    scored
}
