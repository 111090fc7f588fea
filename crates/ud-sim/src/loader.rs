//! CSV facility loader.
//!
//! # CSV format
//!
//! ```csv
//! id,kind,lat,lon,area
//! ML,teaching,4.6026,-74.0653,820.5
//! PLAZA,shared_area,4.6019,-74.0660,310.0
//! ```
//!
//! `kind` is one of `teaching`, `shared_area`, `eating_place`, `in_out`,
//! `parking_lot`, `workplace` (case-insensitive).  `area` is in m² and is the
//! weight for area-based selection.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use ud_behavior::{Facilities, Facility, FacilityKind};
use ud_core::GeoPoint;

use crate::{SimError, SimResult};

#[derive(Deserialize)]
struct FacilityRecord {
    id:   String,
    kind: String,
    lat:  f32,
    lon:  f32,
    area: f64,
}

/// Load every facility from a CSV file.
pub fn load_facilities_csv(path: &Path) -> SimResult<Facilities> {
    let file = std::fs::File::open(path)?;
    load_facilities_reader(file)
}

/// Like [`load_facilities_csv`] but accepts any `Read` source.
pub fn load_facilities_reader<R: Read>(reader: R) -> SimResult<Facilities> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut facilities = Facilities::new();

    for result in csv_reader.deserialize::<FacilityRecord>() {
        let row = result?;
        let kind: FacilityKind = row.kind.parse()?;
        if !(row.area.is_finite() && row.area >= 0.0) {
            return Err(SimError::Config(format!(
                "facility {:?}: area must be a non-negative number, got {}",
                row.id, row.area
            )));
        }
        let facility = Facility::new(row.id, kind, GeoPoint::new(row.lat, row.lon), row.area);
        if let Some(previous) = facilities.insert(facility) {
            return Err(SimError::Config(format!(
                "duplicate {} facility {}",
                previous.kind, previous.id
            )));
        }
    }

    Ok(facilities)
}
