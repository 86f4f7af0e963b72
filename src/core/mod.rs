// Core algorithm exports
pub mod batch;
pub mod competition;
pub mod distance;
pub mod filters;
pub mod locations;
pub mod matcher;
pub mod neighborhood;
pub mod scoring;
pub mod selection;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{match_batch, BatchOptions};
pub use competition::classify_competition;
pub use distance::{haversine_distance, nearest_distance, local_offset};
pub use filters::eligible_partners;
pub use locations::{reference_locations, min_distance};
pub use matcher::{Matcher, MatchOutcome, Selection};
pub use neighborhood::survey_neighborhood;
pub use scoring::{rank_candidates, PartnerScore};
pub use selection::select_candidates;
pub use validation::MatchError;
