use std::collections::HashSet;
use std::f64::consts::PI;

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;

use crate::config::SeedSettings;
use crate::core::distance::haversine_distance;
use crate::core::filters::ELIGIBILITY_RADIUS_M;
use crate::core::validation::{validate_location, MatchError};
use crate::models::{Customer, Lead, Location, Partner};

/// Approximate meters per degree of latitude
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Placement attempts per point before spacing is given up on
const MAX_PLACEMENT_ATTEMPTS: usize = 1_000;

const CUSTOMER_CLUSTER_SIGMA_M: f64 = 50.0;
const LEAD_CLUSTER_SIGMA_M: f64 = 200.0;
const SPLITTER_CLUSTER_SIGMA_M: f64 = 100.0;

/// Share of customers relocated far from their partner
const OUTLIER_RATE: f64 = 0.02;

/// Share of eligible partners that should be eligible only through an outlier
const SPECIAL_OUTLIER_RATE: f64 = 0.10;

/// Errors that can occur while seeding
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Invalid seed settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    InvalidCenter(#[from] MatchError),

    #[error("Invalid cluster spread: {0}")]
    Distribution(#[from] NormalError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Bucket {
    Active,
    Inactive,
}

/// Position of a customer inside the seeded portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CustomerSlot {
    partner: usize,
    bucket: Bucket,
    index: usize,
}

/// Deterministic generator of a synthetic partner portfolio around a center
///
/// Partners are clustered: each gets a center, inside the radius or in the
/// outer annulus, and its customers, interested leads and splitters are
/// scattered around it. A few customers are then relocated as outliers,
/// some of them right next to the center, so that eligibility through a
/// single stray customer is exercised.
pub struct SyntheticSeeder {
    center: Location,
    radius_m: f64,
    num_partners: usize,
    lead_total: usize,
    customer_total: usize,
    splitter_total: usize,
    reference_date: NaiveDate,
    rng: StdRng,
}

impl SyntheticSeeder {
    pub fn new(settings: &SeedSettings) -> Result<Self, SeedError> {
        let center = Location::labeled(settings.center_lat, settings.center_lng, "Center");
        validate_location(&center, || "seed center".to_string())?;

        if !(settings.radius_m.is_finite() && settings.radius_m > 0.0) {
            return Err(SeedError::InvalidSettings(format!(
                "radius must be positive, got {}",
                settings.radius_m
            )));
        }

        Ok(Self {
            center,
            radius_m: settings.radius_m,
            num_partners: settings.partners,
            lead_total: settings.leads,
            customer_total: settings.customers,
            splitter_total: settings.splitters,
            reference_date: Utc::now().date_naive(),
            rng: StdRng::seed_from_u64(settings.rng_seed),
        })
    }

    /// Fix the date plan expiries are computed from
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn center(&self) -> &Location {
        &self.center
    }

    /// Generate the partner portfolio
    pub fn seed(&mut self) -> Result<Vec<Partner>, SeedError> {
        let n = self.num_partners;

        // Up to half of the partners are centred outside the radius
        let outside_pct: usize = self.rng.gen_range(0..=50);
        let num_outside = ((n * outside_pct) as f64 / 100.0).round() as usize;
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        let outside: HashSet<usize> = order[..num_outside].iter().copied().collect();

        let center = self.center.clone();
        let mut inside_centers = self
            .annulus_locations(&center, n - num_outside, 0.0, self.radius_m, 100.0)
            .into_iter();
        let mut outside_centers = self
            .annulus_locations(&center, num_outside, self.radius_m, self.radius_m * 2.0, 100.0)
            .into_iter();

        let lead_counts = self.uneven_counts(self.lead_total, n);
        let customer_counts = self.uneven_counts(self.customer_total, n);
        let splitter_counts = self.uneven_counts(self.splitter_total, n);

        let mut partners = Vec::with_capacity(n);
        for i in 0..n {
            let partner_center = if outside.contains(&i) {
                outside_centers.next()
            } else {
                inside_centers.next()
            }
            .unwrap_or_else(|| center.clone());

            let recent_leads = self
                .gaussian_locations(&partner_center, lead_counts[i], LEAD_CLUSTER_SIGMA_M)?
                .into_iter()
                .map(|loc| Lead::new(self.fake_mobile(), loc))
                .collect();
            let splitters =
                self.gaussian_locations(&partner_center, splitter_counts[i], SPLITTER_CLUSTER_SIGMA_M)?;
            let customer_locs =
                self.gaussian_locations(&partner_center, customer_counts[i], CUSTOMER_CLUSTER_SIGMA_M)?;

            let (active_customers, inactive_customers) = self.split_customers(i, customer_locs);

            partners.push(Partner {
                long_lco_account_id: (i + 1) as u64,
                zone: format!("Zone{}", i + 1),
                active_customers,
                inactive_but_geographically_relevant_customers: inactive_customers,
                recent_leads_interested_in: recent_leads,
                splitters,
                tenure: self.rng.gen_range(1..=10),
            });
        }

        self.apply_outliers(&mut partners);

        tracing::info!(
            partners = partners.len(),
            outside = num_outside,
            "Synthetic portfolio seeded"
        );

        Ok(partners)
    }

    /// Leads to match: the first sits on the center, the rest within 300 m
    pub fn probe_leads(&mut self, count: usize) -> Vec<Lead> {
        let center = self.center.clone();
        let mut leads = Vec::with_capacity(count);

        if count > 0 {
            leads.push(Lead::new(
                self.fake_mobile(),
                Location::labeled(center.lat, center.lng, "Lead"),
            ));
        }
        for loc in self.annulus_locations(&center, count.saturating_sub(1), 0.0, 300.0, 0.0) {
            leads.push(Lead::new(self.fake_mobile(), loc));
        }

        leads
    }

    fn split_customers(&mut self, partner_idx: usize, locations: Vec<Location>) -> (Vec<Customer>, Vec<Customer>) {
        let total = locations.len();
        let num_active = if total > 0 {
            let base = total / 2;
            let variation = (base / 2).max(1);
            self.rng
                .gen_range(base.saturating_sub(variation)..=(base + variation).min(total))
        } else {
            0
        };

        let active_idx: HashSet<usize> =
            rand::seq::index::sample(&mut self.rng, total, num_active).into_iter().collect();

        let mut active = Vec::with_capacity(num_active);
        let mut inactive = Vec::with_capacity(total - num_active);
        for (idx, loc) in locations.into_iter().enumerate() {
            if active_idx.contains(&idx) {
                let address = format!("Partner {} Active Location", partner_idx);
                active.push(self.customer(true, loc, address));
            } else {
                let address = format!("Partner {} Inactive Location", partner_idx);
                inactive.push(self.customer(false, loc, address));
            }
        }

        (active, inactive)
    }

    fn customer(&mut self, is_active: bool, location: Location, address: String) -> Customer {
        let plan_expiry_dt = if is_active {
            self.reference_date + Duration::days(self.rng.gen_range(1..=730))
        } else {
            self.reference_date - Duration::days(self.rng.gen_range(1..=365))
        };

        Customer {
            mobile: self.fake_mobile(),
            address,
            plan_expiry_dt,
            location,
            installation_speed_in_hrs: self.rng.gen_range(2..=150),
        }
    }

    /// Relocate a few customers: some next to the center for partners that
    /// would otherwise not be eligible, the rest far away
    fn apply_outliers(&mut self, partners: &mut [Partner]) {
        let total_customers: usize = partners.iter().map(|p| p.customers().count()).sum();
        let num_outliers = (OUTLIER_RATE * total_customers as f64).round() as usize;

        // Splitters count here: this is the seeder's notion of proximity, not the matcher's
        let naturally_eligible: HashSet<usize> = partners
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.customers()
                    .map(|c| &c.location)
                    .chain(p.recent_leads_interested_in.iter().map(|l| &l.location))
                    .chain(p.splitters.iter())
                    .any(|loc| haversine_distance(&self.center, loc) <= ELIGIBILITY_RADIUS_M)
            })
            .map(|(i, _)| i)
            .collect();

        let n_natural = naturally_eligible.len();
        let non_candidates: Vec<usize> = (0..partners.len())
            .filter(|i| !naturally_eligible.contains(i))
            .collect();

        let wanted_special = if n_natural == 0 {
            0
        } else {
            ((SPECIAL_OUTLIER_RATE * n_natural as f64) / (1.0 - SPECIAL_OUTLIER_RATE)).floor().max(1.0) as usize
        };
        let num_special = wanted_special.min(non_candidates.len());

        let center = self.center.clone();
        let mut moved: HashSet<CustomerSlot> = HashSet::new();

        let special: Vec<usize> = non_candidates
            .choose_multiple(&mut self.rng, num_special)
            .copied()
            .collect();
        for partner_idx in special {
            let slots = customer_slots(&partners[partner_idx], partner_idx);
            let Some(&slot) = slots.choose(&mut self.rng) else {
                continue;
            };
            let Some(location) = self.annulus_locations(&center, 1, 0.0, 100.0, 0.0).pop() else {
                continue;
            };
            relocate(partners, slot, location);
            moved.insert(slot);
        }

        let remaining = num_outliers.saturating_sub(moved.len());
        if remaining > 0 {
            let candidates: Vec<CustomerSlot> = partners
                .iter()
                .enumerate()
                .flat_map(|(i, p)| customer_slots(p, i))
                .filter(|slot| !moved.contains(slot))
                .collect();

            let far: Vec<CustomerSlot> = candidates
                .choose_multiple(&mut self.rng, remaining.min(candidates.len()))
                .copied()
                .collect();
            for slot in far {
                if let Some(location) = self.annulus_locations(&center, 1, 2_000.0, 10_000.0, 0.0).pop() {
                    relocate(partners, slot, location);
                    moved.insert(slot);
                }
            }
        }

        tracing::debug!(
            special = num_special,
            outliers = moved.len(),
            "Outlier customers relocated"
        );
    }

    /// Split `total` into `n` uneven parts; the last part takes what is left,
    /// so the sum can exceed `total` when the others overshoot
    fn uneven_counts(&mut self, total: usize, n: usize) -> Vec<usize> {
        if n == 0 {
            return Vec::new();
        }
        if total == 0 {
            return vec![0; n];
        }

        let base = total / n;
        let variation = (base / 2).max(1);
        let mut counts: Vec<usize> = (0..n - 1)
            .map(|_| self.rng.gen_range(base.saturating_sub(variation)..=base + variation))
            .collect();
        let assigned: usize = counts.iter().sum();
        counts.push(total.saturating_sub(assigned));
        counts
    }

    /// Uniform-by-area points in the annulus `[r_min, r_max]` around `origin`,
    /// at least `min_spacing_m` apart
    fn annulus_locations(
        &mut self,
        origin: &Location,
        count: usize,
        r_min: f64,
        r_max: f64,
        min_spacing_m: f64,
    ) -> Vec<Location> {
        let mut placed: Vec<Location> = Vec::with_capacity(count);

        while placed.len() < count {
            let mut candidate = self.annulus_point(origin, r_min, r_max);
            for _ in 1..MAX_PLACEMENT_ATTEMPTS {
                if is_spaced(&candidate, &placed, min_spacing_m) {
                    break;
                }
                candidate = self.annulus_point(origin, r_min, r_max);
            }
            placed.push(candidate);
        }

        placed
    }

    fn annulus_point(&mut self, origin: &Location, r_min: f64, r_max: f64) -> Location {
        let theta = self.rng.gen_range(0.0..2.0 * PI);
        let u: f64 = self.rng.gen();
        let r = (u * (r_max.powi(2) - r_min.powi(2)) + r_min.powi(2)).sqrt();

        offset_location(origin, r * theta.cos(), r * theta.sin())
    }

    /// Normally distributed points around `origin`, at least 5 m apart
    fn gaussian_locations(&mut self, origin: &Location, count: usize, sigma_m: f64) -> Result<Vec<Location>, SeedError> {
        let cos_lat = origin.lat.to_radians().cos();
        let sigma_lat = sigma_m / METERS_PER_DEGREE;
        let sigma_lng = if cos_lat > f64::EPSILON { sigma_lat / cos_lat } else { sigma_lat };
        let lat_dist = Normal::new(0.0, sigma_lat)?;
        let lng_dist = Normal::new(0.0, sigma_lng)?;

        let mut placed: Vec<Location> = Vec::with_capacity(count);
        while placed.len() < count {
            let mut candidate = self.gaussian_point(origin, &lat_dist, &lng_dist);
            for _ in 1..MAX_PLACEMENT_ATTEMPTS {
                if is_spaced(&candidate, &placed, 5.0) {
                    break;
                }
                candidate = self.gaussian_point(origin, &lat_dist, &lng_dist);
            }
            placed.push(candidate);
        }

        Ok(placed)
    }

    fn gaussian_point(&mut self, origin: &Location, lat_dist: &Normal<f64>, lng_dist: &Normal<f64>) -> Location {
        let lat = origin.lat + lat_dist.sample(&mut self.rng);
        let lng = origin.lng + lng_dist.sample(&mut self.rng);
        rounded_location(lat, lng)
    }

    fn fake_mobile(&mut self) -> String {
        let digits: String = (0..9)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect();
        format!("+91{}", digits)
    }
}

fn customer_slots(partner: &Partner, partner_idx: usize) -> Vec<CustomerSlot> {
    let active = (0..partner.active_customers.len()).map(move |index| CustomerSlot {
        partner: partner_idx,
        bucket: Bucket::Active,
        index,
    });
    let inactive = (0..partner.inactive_but_geographically_relevant_customers.len()).map(move |index| CustomerSlot {
        partner: partner_idx,
        bucket: Bucket::Inactive,
        index,
    });
    active.chain(inactive).collect()
}

fn relocate(partners: &mut [Partner], slot: CustomerSlot, location: Location) {
    let partner = &mut partners[slot.partner];
    let bucket = match slot.bucket {
        Bucket::Active => &mut partner.active_customers,
        Bucket::Inactive => &mut partner.inactive_but_geographically_relevant_customers,
    };
    if let Some(customer) = bucket.get_mut(slot.index) {
        customer.location = location;
    }
}

fn is_spaced(candidate: &Location, placed: &[Location], min_spacing_m: f64) -> bool {
    placed
        .iter()
        .all(|loc| haversine_distance(candidate, loc) >= min_spacing_m)
}

/// Shift `origin` by east/north meters on a flat local plane
fn offset_location(origin: &Location, east_m: f64, north_m: f64) -> Location {
    let delta_lat = north_m / METERS_PER_DEGREE;
    let delta_lng = east_m / (METERS_PER_DEGREE * origin.lat.to_radians().cos());
    rounded_location(origin.lat + delta_lat, origin.lng + delta_lng)
}

/// Six decimals, about 0.1 m, kept inside valid coordinate ranges
fn rounded_location(lat: f64, lng: f64) -> Location {
    let round6 = |v: f64| (v * 1e6).round() / 1e6;
    Location::new(round6(lat).clamp(-90.0, 90.0), round6(lng).clamp(-180.0, 180.0))
}
