use serde::{Deserialize, Serialize};

/// Last known coordinates of a user
///
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
