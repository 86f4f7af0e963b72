use crate::models::Location;

/// Earth's radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Approximate meters per degree of latitude, for local projections
const METERS_PER_DEGREE: f64 = 111_000.0;

/// Calculate the Haversine distance between two locations in meters
///
/// # Arguments
/// * `a` - First location, degrees
/// * `b` - Second location, degrees
///
/// # Returns
/// Great-circle distance in meters on a sphere of radius [`EARTH_RADIUS_M`]
#[inline]
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = b.lng.to_radians() - a.lng.to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Smallest distance from `origin` to any of `locations`
///
/// Returns `f64::INFINITY` when `locations` is empty.
#[inline]
pub fn nearest_distance<'a, I>(origin: &Location, locations: I) -> f64
where
    I: IntoIterator<Item = &'a Location>,
{
    locations
        .into_iter()
        .map(|loc| haversine_distance(origin, loc))
        .fold(f64::INFINITY, f64::min)
}

/// Project `point` onto a flat plane centred at `origin`
///
/// Equirectangular approximation, only meaningful within a few kilometers.
///
/// # Returns
/// `(east_m, north_m)` offsets in meters
pub fn local_offset(origin: &Location, point: &Location) -> (f64, f64) {
    let meters_per_degree_lng = METERS_PER_DEGREE * origin.lat.to_radians().cos();
    let east = (point.lng - origin.lng) * meters_per_degree_lng;
    let north = (point.lat - origin.lat) * METERS_PER_DEGREE;
    (east, north)
}
