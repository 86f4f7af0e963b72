use std::sync::Arc;
use crate::models::{Lead, MatchReport, Partner};
use crate::core::{
    matcher::Matcher,
    validation::{validate_lead, validate_partners, MatchError},
};

/// Options for a batch run
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Attach a neighborhood survey of this radius to every report
    pub survey_radius_m: Option<f64>,
}

/// Match many leads against one partner snapshot
///
/// The snapshot and every lead are validated up front, so a bad input fails
/// the batch before any work starts. Each lead then runs on the blocking
/// pool; reports come back in lead order.
pub async fn match_batch(
    matcher: Matcher,
    partners: Arc<Vec<Partner>>,
    leads: Vec<Lead>,
    options: BatchOptions,
) -> Result<Vec<MatchReport>, MatchError> {
    validate_partners(partners.iter())?;
    for lead in &leads {
        validate_lead(lead)?;
    }

    tracing::info!(
        partners = partners.len(),
        leads = leads.len(),
        "Starting batch match"
    );

    let handles: Vec<_> = leads
        .into_iter()
        .map(|lead| {
            let partners = Arc::clone(&partners);
            tokio::task::spawn_blocking(move || {
                matcher.report_validated(&lead, &partners, options.survey_radius_m)
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await?);
    }

    tracing::info!(reports = reports.len(), "Batch match complete");

    Ok(reports)
}
