// Model exports
pub mod domain;
pub mod reports;
pub mod snapshot;

pub use domain::{Location, Lead, Customer, Partner, Competition, CompetitionLevel, ExpansionLimit};
pub use reports::{MatchReport, ScoredPartner, NeighborhoodReport, NearestPoint};
pub use snapshot::Snapshot;
