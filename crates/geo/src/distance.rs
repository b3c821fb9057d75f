//! Great-circle distance and the labels shown next to a whisper.

use crate::coordinate::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Below this distance a whisper is "Right here".
const RIGHT_HERE_KM: f64 = 0.1;

/// Haversine distance between two coordinates, in kilometers.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// "Right here" under 100 m, whole meters under 1 km, else km with one decimal.
pub fn format_distance(km: f64) -> String {
    if km < RIGHT_HERE_KM {
        "Right here".to_string()
    } else if km < 1.0 {
        format!("{}m", (km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", km)
    }
}

/// Distance label relative to the user, as shown on the detail view.
pub fn describe_distance(user: Option<Coordinate>, target: Coordinate) -> String {
    let Some(user) = user else {
        return "Location unknown".to_string();
    };

    let km = distance_km(user, target);
    if km < RIGHT_HERE_KM {
        return format_distance(km);
    }
    format!("{} from you", format_distance(km))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NYC: Coordinate = Coordinate::new(40.7128, -74.0060);
    const LONDON: Coordinate = Coordinate::new(51.5074, -0.1278);

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (NYC, LONDON),
            (Coordinate::new(-33.86, 151.21), Coordinate::new(35.68, 139.69)),
            (Coordinate::new(89.9, 0.0), Coordinate::new(-89.9, 179.9)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_antipodal_pair_is_half_the_circumference() {
        let a = Coordinate::new(-82.0, -179.0);
        let b = Coordinate::new(82.0, 1.0);

        let d = distance_km(a, b);
        assert!(d.is_finite(), "got {d}");
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1.0, "got {d}");
        assert_eq!(distance_km(b, a), d);
        assert_eq!(describe_distance(Some(a), b), "20015.1km from you");
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for c in [NYC, LONDON, Coordinate::new(0.0, 0.0)] {
            assert_eq!(distance_km(c, c), 0.0);
        }
    }

    #[test]
    fn test_nyc_to_london() {
        let d = distance_km(NYC, LONDON);
        assert!((d - 5570.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_format_distance_buckets() {
        assert_eq!(format_distance(0.0), "Right here");
        assert_eq!(format_distance(0.099), "Right here");
        assert_eq!(format_distance(0.1), "100m");
        assert_eq!(format_distance(0.4567), "457m");
        assert_eq!(format_distance(1.0), "1.0km");
        assert_eq!(format_distance(12.345), "12.3km");
    }

    #[test]
    fn test_describe_distance() {
        assert_eq!(describe_distance(None, NYC), "Location unknown");
        assert_eq!(describe_distance(Some(NYC), NYC), "Right here");

        let label = describe_distance(Some(Coordinate::new(0.0, 0.0)), Coordinate::new(0.0, 1.0));
        assert_eq!(label, "111.2km from you");
    }
}
