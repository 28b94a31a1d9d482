//! Approximate map positions for saunas without stored coordinates.
//!
//! Addresses are matched against a fixed list of Stockholm districts by
//! substring, first hit wins. Anything unrecognised lands on the city centre.

use serde::Serialize;

/// A WGS84 point, serialized GeoJSON-style as `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub fn lng(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

pub const STOCKHOLM_CENTER: LngLat = LngLat(18.0686, 59.3293);

struct District {
    name: &'static str,
    needles: &'static [&'static str],
    position: LngLat,
}

// Order matters: "österhaninge" also contains "haninge".
const DISTRICTS: &[District] = &[
    District {
        name: "City center",
        needles: &["drottninggatan", "stureplan"],
        position: STOCKHOLM_CENTER,
    },
    District {
        name: "Södermalm",
        needles: &["söder", "götgatan"],
        position: LngLat(18.0649, 59.3165),
    },
    District {
        name: "Nacka",
        needles: &["nacka", "hamndalsvägen"],
        position: LngLat(18.1634, 59.3117),
    },
    District {
        name: "Haninge",
        needles: &["haninge", "hellasgården"],
        position: LngLat(18.1344, 59.1687),
    },
    District {
        name: "Tumba",
        needles: &["tumba", "flottsbro"],
        position: LngLat(17.8333, 59.1667),
    },
    District {
        name: "Österhaninge",
        needles: &["österhaninge", "ågesta"],
        position: LngLat(18.1833, 59.1333),
    },
    District {
        name: "Långholmen",
        needles: &["långholmen"],
        position: LngLat(18.0333, 59.3167),
    },
    District {
        name: "Hammarby",
        needles: &["hammarby"],
        position: LngLat(18.0833, 59.3),
    },
    District {
        name: "Blasieholmen",
        needles: &["blasieholmshamnen"],
        position: LngLat(18.0833, 59.3333),
    },
];

fn district_for(address: &str) -> Option<&'static District> {
    let address = address.to_lowercase();
    DISTRICTS
        .iter()
        .find(|d| d.needles.iter().any(|n| address.contains(n)))
}

pub fn approximate_position(address: &str) -> LngLat {
    district_for(address)
        .map(|d| d.position)
        .unwrap_or(STOCKHOLM_CENTER)
}

/// Name of the district an address was placed in, if any matched.
pub fn district_name(address: &str) -> Option<&'static str> {
    district_for(address).map(|d| d.name)
}
