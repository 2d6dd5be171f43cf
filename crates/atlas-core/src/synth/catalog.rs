/// One named city in the fixed placement catalog.
#[derive(Debug, Clone, Copy)]
pub struct CityLocation {
    pub city: &'static str,
    pub country: &'static str,
    pub lat: f64,
    pub lng: f64,
}

/// Fixed catalog of cities used for deterministic location assignment.
///
/// Read-only shared configuration: the identity hash selects a bucket and
/// a small per-identity jitter is applied on top, so the table itself never
/// changes at runtime. Reordering or resizing it reshuffles every node's
/// assigned location.
pub const CITY_CATALOG: [CityLocation; 15] = [
    CityLocation { city: "New York", country: "USA", lat: 40.7128, lng: -74.006 },
    CityLocation { city: "London", country: "UK", lat: 51.5074, lng: -0.1278 },
    CityLocation { city: "Tokyo", country: "Japan", lat: 35.6762, lng: 139.6503 },
    CityLocation { city: "Singapore", country: "Singapore", lat: 1.3521, lng: 103.8198 },
    CityLocation { city: "Frankfurt", country: "Germany", lat: 50.1109, lng: 8.6821 },
    CityLocation { city: "Sydney", country: "Australia", lat: -33.8688, lng: 151.2093 },
    CityLocation { city: "São Paulo", country: "Brazil", lat: -23.5505, lng: -46.6333 },
    CityLocation { city: "Mumbai", country: "India", lat: 19.076, lng: 72.8777 },
    CityLocation { city: "Toronto", country: "Canada", lat: 43.6532, lng: -79.3832 },
    CityLocation { city: "Amsterdam", country: "Netherlands", lat: 52.3676, lng: 4.9041 },
    CityLocation { city: "Seoul", country: "South Korea", lat: 37.5665, lng: 126.978 },
    CityLocation { city: "Dubai", country: "UAE", lat: 25.2048, lng: 55.2708 },
    CityLocation { city: "Paris", country: "France", lat: 48.8566, lng: 2.3522 },
    CityLocation { city: "Hong Kong", country: "China", lat: 22.3193, lng: 114.1694 },
    CityLocation { city: "Los Angeles", country: "USA", lat: 34.0522, lng: -118.2437 },
];
