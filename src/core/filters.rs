use crate::models::{Lead, Partner};
use crate::core::locations::min_distance;

/// Maximum serviceable radius around a lead, in meters
pub const ELIGIBILITY_RADIUS_M: f64 = 500.0;

/// Check if a partner can serve the lead at all
#[inline]
pub fn is_eligible(lead: &Lead, partner: &Partner) -> bool {
    min_distance(lead, partner) <= ELIGIBILITY_RADIUS_M
}

/// Partners within [`ELIGIBILITY_RADIUS_M`] of the lead
///
/// This is Stage 1 of the matching pipeline. Input order is preserved.
/// Partners without any reference location are never eligible.
pub fn eligible_partners<'a>(lead: &Lead, partners: &'a [Partner]) -> Vec<&'a Partner> {
    partners.iter().filter(|p| is_eligible(lead, p)).collect()
}
