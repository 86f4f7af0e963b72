use std::collections::HashSet;
use crate::models::{Lead, Location, NearestPoint, NeighborhoodReport, Partner};
use crate::core::distance::{haversine_distance, local_offset};
use crate::core::locations::{interested_lead_locations, reference_locations};

/// Default survey radius around a lead, in meters
pub const SURVEY_RADIUS_M: f64 = 1000.0;

/// Count distinct locations within `radius_m` of the lead
fn count_unique_within<'a, I>(lead: &Lead, locations: I, radius_m: f64) -> usize
where
    I: IntoIterator<Item = &'a Location>,
{
    locations
        .into_iter()
        .filter(|loc| haversine_distance(&lead.location, loc) <= radius_m)
        .map(Location::coordinate_key)
        .collect::<HashSet<_>>()
        .len()
}

/// Summarize what lies around a lead
///
/// Customer and interested-lead locations are counted once per coordinate
/// across all partners. Each partner contributes its nearest reference
/// location if that is within `radius_m`, with a local east/north offset
/// from the lead.
pub fn survey_neighborhood(lead: &Lead, partners: &[Partner], radius_m: f64) -> NeighborhoodReport {
    let customer_locations = count_unique_within(
        lead,
        partners.iter().flat_map(|p| p.customers().map(|c| &c.location)),
        radius_m,
    );
    let interested_lead_locations = count_unique_within(
        lead,
        partners.iter().flat_map(interested_lead_locations),
        radius_m,
    );

    let nearest = partners
        .iter()
        .filter_map(|partner| {
            let (location, distance_m) = reference_locations(partner)
                .map(|loc| (loc, haversine_distance(&lead.location, loc)))
                .min_by(|a, b| a.1.total_cmp(&b.1))?;

            if distance_m > radius_m {
                return None;
            }

            let (east_m, north_m) = local_offset(&lead.location, location);
            Some(NearestPoint {
                partner_id: partner.id(),
                location: location.clone(),
                distance_m,
                east_m,
                north_m,
            })
        })
        .collect();

    NeighborhoodReport {
        radius_m,
        customer_locations,
        interested_lead_locations,
        nearest,
    }
}
