//! Partner Match - lead-to-partner matching for installation assignment
//!
//! This library ranks the installation partners that can serve a new lead,
//! based on how close the lead is to each partner's customers and
//! interested leads. It implements a four-stage pipeline: eligibility,
//! competition classification, ring-and-expansion selection, and scoring.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, MatchOutcome, Selection, PartnerScore, haversine_distance};
pub use models::{Location, Lead, Customer, Partner, Competition, CompetitionLevel, ExpansionLimit, MatchReport};
