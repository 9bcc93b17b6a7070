// Station domain model
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    #[serde(rename = "station")]
    pub station_id: String,
    pub name: String,
}

impl Station {
    pub fn new(station_id: String, name: String) -> Self {
        Self { station_id, name }
    }
}
