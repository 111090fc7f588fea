//! campus - one simulated week on a small synthetic university campus.
//!
//! Runs a few dozen students and a handful of support staff over an
//! embedded facility layer and group roster, writes the event trace to
//! `output/campus/trace.csv`, and prints a summary.
//!
//! ```text
//! cargo run -p campus                    # built-in defaults
//! cargo run -p campus -- campus.toml     # override any CampusConfig field
//! RUST_LOG=debug cargo run -p campus     # per-member planning logs
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ud_behavior::{AgentAction, CommunityMember, Compartment, MoveLog};
use ud_core::Tick;
use ud_schedule::{load_groups_reader, FiredEvent};
use ud_sim::{load_facilities_reader, CampusConfig, CsvTraceWriter, SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const STUDENTS:         usize = 48;
const STAFF:            usize = 6;
const INITIAL_INFECTED: usize = 2;
const SEED:             u64   = 42;
const OUTPUT_DIR:       &str  = "output/campus";

// ── Embedded inputs ───────────────────────────────────────────────────────────

const FACILITIES_CSV: &str = "\
id,kind,lat,lon,area\n\
ML,teaching,4.60260,-74.06530,1820.0\n\
AU,teaching,4.60310,-74.06480,960.0\n\
W,teaching,4.60180,-74.06590,640.0\n\
PLAZA,shared_area,4.60190,-74.06600,910.0\n\
LAWN,shared_area,4.60150,-74.06570,420.0\n\
CAF,eating_place,4.60220,-74.06440,350.0\n\
KIOSK,eating_place,4.60280,-74.06610,60.0\n\
GATE-N,in_out,4.60400,-74.06500,15.0\n\
GATE-S,in_out,4.60100,-74.06700,15.0\n\
P1,parking_lot,4.60090,-74.06680,2400.0\n\
ADMIN,workplace,4.60280,-74.06410,380.0\n\
LIB,workplace,4.60330,-74.06520,720.0\n\
";

// Monday–Saturday sessions; Saturday only for the lab group.
const ROSTER_CSV: &str = "\
group_id,capacity,day,start_time,end_time,facility_id,room\n\
CALC-1,30,1,7,9,ML,ML-201\n\
CALC-1,30,3,7,9,ML,ML-201\n\
CALC-2,30,2,9,11,ML,ML-202\n\
CALC-2,30,4,9,11,ML,ML-202\n\
PHYS-1,25,1,11,13,AU,AU-104\n\
PHYS-1,25,3,11,13,AU,AU-104\n\
PHYS-LAB,12,6,8,11.5,W,W-LAB1\n\
PROG-1,35,2,14,16,W,W-301\n\
PROG-1,35,4,14,16,W,W-301\n\
HIST-1,40,1,15.5,17,AU,AU-002\n\
HIST-1,40,5,9,10.5,AU,AU-002\n\
ECON-1,35,2,7,8.5,ML,ML-108\n\
ECON-1,35,5,13,14.5,ML,ML-108\n\
ART-1,15,3,15,18,W,W-STUDIO\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards to the CSV trace and tallies actions by name.
struct CountingObserver<W: std::io::Write> {
    inner:     CsvTraceWriter<W>,
    by_action: BTreeMap<&'static str, usize>,
}

impl<W: std::io::Write> CountingObserver<W> {
    fn new(inner: CsvTraceWriter<W>) -> Self {
        Self { inner, by_action: BTreeMap::new() }
    }
}

impl<W: std::io::Write> SimObserver for CountingObserver<W> {
    fn on_event(&mut self, event: &FiredEvent<AgentAction>, member: &CommunityMember) {
        *self.by_action.entry(event.action.name()).or_default() += 1;
        self.inner.on_event(event, member);
    }

    fn on_sim_end(&mut self, final_tick: Tick, dispatched: u64) {
        self.inner.on_sim_end(final_tick, dispatched);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Configuration: a TOML file if given, built-in defaults otherwise.
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => CampusConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            let mut config = CampusConfig::default();
            config.sim.seed = SEED;
            config.population.students = STUDENTS;
            config.population.staff = STAFF;
            config.population.initial_infected = INITIAL_INFECTED;
            config
        }
    };

    println!("=== campus - university dynamics ===");
    println!(
        "Students: {}  |  Staff: {}  |  Weeks: {}  |  Seed: {}",
        config.population.students, config.population.staff, config.sim.weeks, config.sim.seed
    );
    println!();

    // 2. Inputs.
    let facilities = load_facilities_reader(Cursor::new(FACILITIES_CSV))?;
    let groups = load_groups_reader(Cursor::new(ROSTER_CSV))?;
    println!("Loaded {} facilities and {} groups", facilities.len(), groups.len());

    // 3. Build.
    let mut sim = SimBuilder::new(config, facilities, groups, MoveLog::new()).build()?;

    // 4. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let path = Path::new(OUTPUT_DIR).join("trace.csv");
    let file = BufWriter::new(File::create(&path).with_context(|| format!("creating {}", path.display()))?);
    let mut obs = CountingObserver::new(CsvTraceWriter::new(file, sim.converter));

    // 5. Run.
    let t0 = Instant::now();
    let dispatched = sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    info!(dispatched, "run finished");

    let CountingObserver { inner, by_action } = obs;
    let rows = inner.rows_written();
    inner.finish().context("writing trace")?;

    // 6. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  {} : {} rows", path.display(), rows);
    println!();

    println!("{:<18} {:>8}", "Action", "Events");
    println!("{}", "-".repeat(27));
    for (action, count) in &by_action {
        println!("{:<18} {:>8}", action, count);
    }
    println!();

    let mut by_purpose: BTreeMap<&str, usize> = BTreeMap::new();
    for m in sim.geography.moves() {
        *by_purpose.entry(m.purpose.as_str()).or_default() += 1;
    }
    println!("{:<18} {:>8}", "Move purpose", "Moves");
    println!("{}", "-".repeat(27));
    for (purpose, count) in &by_purpose {
        println!("{:<18} {:>8}", purpose, count);
    }
    println!();

    let infected = sim.members.iter().filter(|m| m.compartment() == Compartment::Infected).count();
    let enrolled: u32 = sim.groups.iter().map(|g| g.enrollments_count()).sum();
    let seats: u32 = sim.groups.iter().map(|g| g.capacity()).sum();
    println!("Initially infected : {infected}");
    println!("Seats filled       : {enrolled} / {seats}");

    Ok(())
}
