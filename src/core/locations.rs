use crate::models::{Lead, Location, Partner};
use crate::core::distance::nearest_distance;

/// Active then inactive customer locations
pub fn customer_locations(partner: &Partner) -> impl Iterator<Item = &Location> {
    partner.customers().map(|c| &c.location)
}

/// Locations of the leads the partner is already interested in
pub fn interested_lead_locations(partner: &Partner) -> impl Iterator<Item = &Location> {
    partner.recent_leads_interested_in.iter().map(|l| &l.location)
}

/// Every location a partner is judged by: active customers, inactive
/// customers and interested leads, in that order. Splitters are not part of it.
pub fn reference_locations(partner: &Partner) -> impl Iterator<Item = &Location> {
    customer_locations(partner).chain(interested_lead_locations(partner))
}

/// Distance from the lead to the partner's nearest reference location
///
/// `f64::INFINITY` when the partner has no reference locations.
#[inline]
pub fn min_distance(lead: &Lead, partner: &Partner) -> f64 {
    nearest_distance(&lead.location, reference_locations(partner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{customer, partner_with};

    #[test]
    fn test_reference_locations_order_and_splitters_excluded() {
        let mut partner = partner_with(
            1,
            vec![customer(1.0, 1.0)],
            vec![customer(2.0, 2.0)],
            vec![Location::new(3.0, 3.0)],
        );
        partner.splitters = vec![Location::new(28.65, 77.275)];

        let lats: Vec<f64> = reference_locations(&partner).map(|l| l.lat).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_min_distance_ignores_splitters() {
        let lead = Lead::new("+910000000000", Location::new(28.65, 77.275));
        let mut partner = partner_with(1, vec![], vec![], vec![]);
        partner.splitters = vec![lead.location.clone()];

        assert!(min_distance(&lead, &partner).is_infinite());
    }

    #[test]
    fn test_min_distance_uses_interested_leads() {
        let lead = Lead::new("+910000000000", Location::new(28.65, 77.275));
        let partner = partner_with(1, vec![], vec![], vec![lead.location.clone()]);

        assert_eq!(min_distance(&lead, &partner), 0.0);
    }
}
