use serde::{Deserialize, Serialize};
use crate::models::domain::{Competition, Location};

/// Owned, serializable scoring entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPartner {
    pub partner_id: u64,
    pub zone: String,
    pub score: f64,
    pub primary_distance_m: f64,
}

/// Result of matching one lead, detached from the partner snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub lead_mobile: String,
    /// Absent when no partner was eligible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competition: Option<Competition>,
    /// Selected partner ids in selection order
    pub candidates: Vec<u64>,
    /// Ranked best first
    pub scores: Vec<ScoredPartner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<NeighborhoodReport>,
}

impl MatchReport {
    pub fn best(&self) -> Option<&ScoredPartner> {
        self.scores.first()
    }
}

/// Nearest reference location of one partner around a lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestPoint {
    pub partner_id: u64,
    pub location: Location,
    pub distance_m: f64,
    pub east_m: f64,
    pub north_m: f64,
}

/// What lies around a lead within the survey radius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodReport {
    pub radius_m: f64,
    pub customer_locations: usize,
    pub interested_lead_locations: usize,
    pub nearest: Vec<NearestPoint>,
}
