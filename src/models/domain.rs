use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A point on the globe in degrees
///
/// Equality compares coordinates only; the label is descriptive.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, label: None }
    }

    pub fn labeled(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            label: Some(label.into()),
        }
    }

    /// Bit-exact coordinate key, for set membership of locations
    #[inline]
    pub fn coordinate_key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lng.to_bits())
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lng == other.lng
    }
}

/// A prospect waiting to be matched, or one a partner already showed interest in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub mobile: String,
    pub location: Location,
}

impl Lead {
    pub fn new(mobile: impl Into<String>, location: Location) -> Self {
        Self {
            mobile: mobile.into(),
            location,
        }
    }
}

/// A subscriber served by a partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub mobile: String,
    pub address: String,
    pub plan_expiry_dt: NaiveDate,
    pub location: Location,
    pub installation_speed_in_hrs: u32,
}

/// An installation partner and its portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub long_lco_account_id: u64,
    pub zone: String,
    #[serde(default)]
    pub active_customers: Vec<Customer>,
    #[serde(default)]
    pub inactive_but_geographically_relevant_customers: Vec<Customer>,
    #[serde(default)]
    pub recent_leads_interested_in: Vec<Lead>,
    /// Infrastructure points. Never used for distance decisions.
    #[serde(default)]
    pub splitters: Vec<Location>,
    pub tenure: u32,
}

impl Partner {
    #[inline]
    pub fn id(&self) -> u64 {
        self.long_lco_account_id
    }

    /// Active then inactive customers
    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.active_customers
            .iter()
            .chain(self.inactive_but_geographically_relevant_customers.iter())
    }
}

/// Neighborhood density label for a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionLevel {
    Low,
    High,
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Outcome of the competition classifier along with the measures behind it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub level: CompetitionLevel,
    /// Distinct partners with a customer within the competitor radius
    pub competitor_count: usize,
    /// Partners whose nearest reference location is within the close radius
    pub close_partner_count: usize,
}

impl Competition {
    pub fn is_high(&self) -> bool {
        self.level == CompetitionLevel::High
    }
}

/// Cap on below-ring partners admitted under high competition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ExpansionLimit(usize);

impl ExpansionLimit {
    pub const DEFAULT: usize = 5;

    pub fn new(limit: usize) -> Self {
        Self(limit)
    }

    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for ExpansionLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<i64> for ExpansionLimit {
    type Error = crate::core::MatchError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value).map(Self).map_err(|_| {
            crate::core::MatchError::InvalidConfig(format!(
                "expansion limit must be non-negative, got {}",
                value
            ))
        })
    }
}

impl From<ExpansionLimit> for i64 {
    fn from(limit: ExpansionLimit) -> Self {
        limit.0 as i64
    }
}
