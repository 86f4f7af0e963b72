use crate::models::{Competition, ExpansionLimit, Lead, MatchReport, Partner};
use crate::core::{
    competition::classify_competition,
    filters::eligible_partners,
    neighborhood::survey_neighborhood,
    scoring::{rank_candidates, PartnerScore},
    selection::select_candidates,
    validation::{validate_lead, validate_partners, MatchError},
};

/// Candidate list for a lead together with the competition reading behind it
///
/// `competition` is `None` when no partner was eligible: the lead is never
/// classified in that case.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub candidates: Vec<&'a Partner>,
    pub competition: Option<Competition>,
}

impl Selection<'_> {
    /// Empty result for a lead no partner can serve
    pub fn unserved() -> Self {
        Self {
            candidates: Vec::new(),
            competition: None,
        }
    }
}

/// Selection plus ranking for one lead
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    pub selection: Selection<'a>,
    pub scores: Vec<PartnerScore<'a>>,
}

impl MatchOutcome<'_> {
    /// Detach from the partner snapshot
    pub fn to_report(&self, lead: &Lead) -> MatchReport {
        MatchReport {
            lead_mobile: lead.mobile.clone(),
            competition: self.selection.competition,
            candidates: self.selection.candidates.iter().map(|p| p.id()).collect(),
            scores: self.scores.iter().map(PartnerScore::to_owned_report).collect(),
            neighborhood: None,
        }
    }
}

/// Main matching orchestrator - implements the lead matching pipeline
///
/// # Pipeline Stages
/// 1. Eligibility filter (500 m)
/// 2. Competition classification over the full partner list
/// 3. Ring-and-expansion selection
/// 4. Distance scoring and ranking
///
/// Each call validates its inputs and then runs as a pure function of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    expansion_limit: ExpansionLimit,
}

impl Matcher {
    pub fn new(expansion_limit: ExpansionLimit) -> Self {
        Self { expansion_limit }
    }

    pub fn with_default_limit() -> Self {
        Self::default()
    }

    /// Build from a raw configured limit, rejecting negative values
    pub fn from_config(expansion_limit: i64) -> Result<Self, MatchError> {
        Ok(Self::new(ExpansionLimit::try_from(expansion_limit)?))
    }

    pub fn expansion_limit(&self) -> ExpansionLimit {
        self.expansion_limit
    }

    /// Select the partners to notify for a lead
    ///
    /// # Arguments
    /// * `lead` - The prospect to match
    /// * `partners` - The full partner collection
    ///
    /// # Returns
    /// Candidates in selection order, and the competition classification
    pub fn compute_eligible_partners<'a>(
        &self,
        lead: &Lead,
        partners: &'a [Partner],
    ) -> Result<Selection<'a>, MatchError> {
        validate_lead(lead)?;
        validate_partners(partners)?;

        Ok(self.select_validated(lead, partners))
    }

    /// Score and rank candidates for a lead, best first
    ///
    /// Candidates outside the eligibility radius or without any reference
    /// location are dropped.
    pub fn compute_match_scores<'a>(
        &self,
        lead: &Lead,
        candidates: &[&'a Partner],
    ) -> Result<Vec<PartnerScore<'a>>, MatchError> {
        validate_lead(lead)?;
        validate_partners(candidates.iter().copied())?;

        Ok(rank_candidates(lead, candidates))
    }

    /// Run selection and scoring in one go
    pub fn match_lead<'a>(
        &self,
        lead: &Lead,
        partners: &'a [Partner],
    ) -> Result<MatchOutcome<'a>, MatchError> {
        validate_lead(lead)?;
        validate_partners(partners)?;

        Ok(self.match_validated(lead, partners))
    }

    /// Match a lead against partners that were already validated
    pub(crate) fn match_validated<'a>(&self, lead: &Lead, partners: &'a [Partner]) -> MatchOutcome<'a> {
        let selection = self.select_validated(lead, partners);
        let scores = rank_candidates(lead, &selection.candidates);

        tracing::debug!(
            lead = %lead.mobile,
            candidates = selection.candidates.len(),
            scored = scores.len(),
            "Lead matched"
        );

        MatchOutcome { selection, scores }
    }

    /// Same as [`Matcher::match_validated`], owned and with a neighborhood survey attached
    pub(crate) fn report_validated(
        &self,
        lead: &Lead,
        partners: &[Partner],
        survey_radius_m: Option<f64>,
    ) -> MatchReport {
        let mut report = self.match_validated(lead, partners).to_report(lead);
        report.neighborhood = survey_radius_m.map(|radius| survey_neighborhood(lead, partners, radius));
        report
    }

    fn select_validated<'a>(&self, lead: &Lead, partners: &'a [Partner]) -> Selection<'a> {
        let eligible = eligible_partners(lead, partners);
        tracing::debug!(
            lead = %lead.mobile,
            total = partners.len(),
            eligible = eligible.len(),
            "Eligibility filter applied"
        );

        if eligible.is_empty() {
            return Selection::unserved();
        }

        let competition = classify_competition(lead, partners);
        let candidates = select_candidates(lead, &eligible, &competition, self.expansion_limit);

        Selection {
            candidates,
            competition: Some(competition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{capture_competition_events, ids, lead, partner_at, partner_with};
    use crate::models::{CompetitionLevel, Location};

    #[test]
    fn test_match_lead_basic() {
        let matcher = Matcher::with_default_limit();
        let lead = lead();
        let partners = vec![partner_at(1, 300.0), partner_at(2, 800.0), partner_at(3, 120.0)];

        let outcome = matcher.match_lead(&lead, &partners).unwrap();

        assert_eq!(outcome.selection.competition.map(|c| c.level), Some(CompetitionLevel::Low));
        assert_eq!(ids(&outcome.selection.candidates), vec![1, 3]);
        let ranked: Vec<u64> = outcome.scores.iter().map(|s| s.partner.id()).collect();
        assert_eq!(ranked, vec![3, 1]);
    }

    #[test]
    fn test_no_eligible_partner_short_circuits() {
        let matcher = Matcher::with_default_limit();
        let partners = vec![partner_at(1, 900.0), partner_with(2, vec![], vec![], vec![])];

        let outcome = matcher.match_lead(&lead(), &partners).unwrap();
        assert!(outcome.selection.candidates.is_empty());
        assert!(outcome.selection.competition.is_none());
        assert!(outcome.scores.is_empty());

        let report = outcome.to_report(&lead());
        assert!(report.competition.is_none());
        assert!(!serde_json::to_string(&report).unwrap().contains("competition"));
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert!(matches!(Matcher::from_config(-1), Err(MatchError::InvalidConfig(_))));
        assert_eq!(Matcher::from_config(0).unwrap().expansion_limit().get(), 0);
    }

    #[test]
    fn test_invalid_lead_fails_whole_call() {
        let matcher = Matcher::with_default_limit();
        let bad = Lead::new("+91", Location::new(0.0, 190.0));

        assert!(matcher.compute_eligible_partners(&bad, &[partner_at(1, 10.0)]).is_err());
        assert!(matcher.compute_match_scores(&bad, &[]).is_err());
    }

    #[test]
    fn test_report_carries_ids_and_survey() {
        let matcher = Matcher::with_default_limit();
        let lead = lead();
        let partners = vec![partner_at(4, 50.0)];

        let report = matcher.report_validated(&lead, &partners, Some(1000.0));
        assert_eq!(report.candidates, vec![4]);
        assert_eq!(report.best().map(|s| s.partner_id), Some(4));
        assert_eq!(report.neighborhood.map(|n| n.nearest.len()), Some(1));
    }

    #[test]
    fn test_unserved_lead_is_not_classified() {
        let matcher = Matcher::with_default_limit();
        // About 111 km north, far outside the eligibility radius
        let partners = vec![partner_at(1, 111_000.0)];

        let (selection, events) =
            capture_competition_events(|| matcher.compute_eligible_partners(&lead(), &partners).unwrap());

        assert!(selection.candidates.is_empty());
        assert!(selection.competition.is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_served_lead_is_classified_once() {
        let matcher = Matcher::with_default_limit();
        let partners = vec![partner_at(1, 120.0), partner_at(2, 900.0)];

        let (outcome, events) = capture_competition_events(|| matcher.match_lead(&lead(), &partners).unwrap());

        assert_eq!(ids(&outcome.selection.candidates), vec![1]);
        assert!(outcome.selection.competition.is_some());
        assert_eq!(events.len(), 1);
    }
}
