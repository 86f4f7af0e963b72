use serde::{Deserialize, Serialize};
use crate::models::domain::{Lead, Partner};

/// Partner portfolio plus the leads to match against it
///
/// ```json
/// {
///   "partners": [{ "long_lco_account_id": 1, "zone": "Zone1", "tenure": 4, ... }],
///   "leads": [{ "mobile": "+91...", "location": { "lat": 28.65, "lng": 77.275 } }]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub leads: Vec<Lead>,
}

impl Snapshot {
    pub fn new(partners: Vec<Partner>, leads: Vec<Lead>) -> Self {
        Self { partners, leads }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
