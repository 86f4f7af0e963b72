use crate::models::{Competition, CompetitionLevel, ExpansionLimit, Lead, Partner};
use crate::core::locations::min_distance;

/// Radius of the priority ring under high competition, in meters
pub const RING_RADIUS_M: f64 = 200.0;

/// Target candidate count under high competition
pub const RING_QUOTA: usize = 10;

/// Turn the eligible partners into the final candidate list
///
/// This is Stage 3 of the matching pipeline.
///
/// * Low competition: `eligible` is returned unchanged.
/// * High competition: partners within [`RING_RADIUS_M`] come first in their
///   eligible order. If they are fewer than [`RING_QUOTA`], the nearest of
///   the rest are appended, at most `limit` of them and never past the quota.
///   Equal distances keep their eligible order.
pub fn select_candidates<'a>(
    lead: &Lead,
    eligible: &[&'a Partner],
    competition: &Competition,
    limit: ExpansionLimit,
) -> Vec<&'a Partner> {
    if eligible.is_empty() {
        return Vec::new();
    }

    match competition.level {
        CompetitionLevel::Low => eligible.to_vec(),
        CompetitionLevel::High => expand_ring(lead, eligible, limit),
    }
}

fn expand_ring<'a>(lead: &Lead, eligible: &[&'a Partner], limit: ExpansionLimit) -> Vec<&'a Partner> {
    let (mut ring, mut remaining): (Vec<_>, Vec<_>) = eligible
        .iter()
        .map(|&p| (p, min_distance(lead, p)))
        .partition(|(_, distance)| *distance <= RING_RADIUS_M);

    if ring.len() >= RING_QUOTA {
        tracing::debug!(ring = ring.len(), "Ring fills the quota, no expansion");
        return ring.into_iter().map(|(p, _)| p).collect();
    }

    // sort_by is stable, so ties keep their eligible order
    remaining.sort_by(|a, b| a.1.total_cmp(&b.1));

    let take = (RING_QUOTA - ring.len())
        .min(limit.get())
        .min(remaining.len());

    tracing::debug!(
        ring = ring.len(),
        remaining = remaining.len(),
        added = take,
        "Expanding ring"
    );

    ring.extend(remaining.into_iter().take(take));
    ring.into_iter().map(|(p, _)| p).collect()
}
