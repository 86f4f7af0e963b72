use std::collections::HashSet;
use thiserror::Error;
use validator::Validate;
use crate::models::{Lead, Location, Partner};

/// Errors that can occur while matching
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid location for {context}: lat={lat}, lng={lng}")]
    InvalidLocation {
        context: String,
        lat: f64,
        lng: f64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Duplicate partner id: {0}")]
    DuplicatePartner(u64),

    #[error("Batch task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for MatchError {
    fn from(err: tokio::task::JoinError) -> Self {
        MatchError::TaskFailed(err.to_string())
    }
}

/// Reject coordinates outside lat [-90, 90], lng [-180, 180], or not finite
pub fn validate_location(location: &Location, context: impl FnOnce() -> String) -> Result<(), MatchError> {
    let finite = location.lat.is_finite() && location.lng.is_finite();

    if !finite || location.validate().is_err() {
        return Err(MatchError::InvalidLocation {
            context: context(),
            lat: location.lat,
            lng: location.lng,
        });
    }

    Ok(())
}

pub fn validate_lead(lead: &Lead) -> Result<(), MatchError> {
    validate_location(&lead.location, || format!("lead {}", lead.mobile))
}

/// Check every location a partner carries, splitters included
pub fn validate_partner(partner: &Partner) -> Result<(), MatchError> {
    let id = partner.id();

    for customer in partner.customers() {
        validate_location(&customer.location, || {
            format!("customer {} of partner {}", customer.mobile, id)
        })?;
    }
    for lead in &partner.recent_leads_interested_in {
        validate_location(&lead.location, || {
            format!("interested lead {} of partner {}", lead.mobile, id)
        })?;
    }
    for splitter in &partner.splitters {
        validate_location(splitter, || format!("splitter of partner {}", id))?;
    }

    Ok(())
}

/// Validate a whole partner collection: unique ids and valid locations
pub fn validate_partners<'a, I>(partners: I) -> Result<(), MatchError>
where
    I: IntoIterator<Item = &'a Partner>,
{
    let mut seen = HashSet::new();

    for partner in partners {
        if !seen.insert(partner.id()) {
            return Err(MatchError::DuplicatePartner(partner.id()));
        }
        validate_partner(partner)?;
    }

    Ok(())
}
