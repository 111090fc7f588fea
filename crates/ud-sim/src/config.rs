//! `CampusConfig` - everything a run needs besides its input data.
//!
//! Every field has a default, so a TOML file only lists what it changes:
//!
//! ```toml
//! selection = "area_weighted"
//!
//! [sim]
//! seed  = 7
//! weeks = 2
//!
//! [population]
//! students         = 4000
//! staff            = 150
//! initial_infected = 5
//!
//! [leisure]
//! reschedule_at_boundary = true
//!
//! [timing.student_arrival]
//! min = 7.5
//! max = 9.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use ud_behavior::{LeisureConfig, SelectionStrategy, TimingConfig};
use ud_core::SimConfig;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub students:         usize,
    pub staff:            usize,
    /// Members who start in the `Infected` compartment, drawn at random.
    pub initial_infected: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self { students: 200, staff: 20, initial_infected: 1 }
    }
}

impl PopulationConfig {
    pub fn total(&self) -> usize {
        self.students + self.staff
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrollmentConfig {
    /// Target number of groups per student.  Fewer are taken when the roster
    /// runs out of seats or clash-free options.
    pub groups_per_student: usize,
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self { groups_per_student: 4 }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CampusConfig {
    pub sim:        SimConfig,
    pub population: PopulationConfig,
    pub enrollment: EnrollmentConfig,
    /// Strategy for leisure and lunch destinations.
    pub selection:  SelectionStrategy,
    pub leisure:    LeisureConfig,
    pub timing:     TimingConfig,
}

impl CampusConfig {
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        let config: CampusConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        if self.population.initial_infected > self.population.total() {
            return Err(SimError::Config(format!(
                "population.initial_infected ({}) exceeds population ({})",
                self.population.initial_infected,
                self.population.total()
            )));
        }
        self.timing.validate()?;
        self.leisure.validate()?;
        Ok(())
    }
}
