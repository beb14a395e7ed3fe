use serde::{Deserialize, Serialize};

/// A point on the map plus the human-readable place it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution_name: String,
    pub degree: String,
    pub graduation_year: i32,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub current_location: Location,
    /// Ordered as recorded; a candidate may have none.
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub role: String,
}
