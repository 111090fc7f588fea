//! Fluent builder for constructing a [`Sim`].

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use ud_behavior::{
    ActionContext, CommunityMember, Compartment, Facilities, FacilityKind, Geography, RandomTiming,
    SelectionStrategy, TimingPolicy,
};
use ud_core::{AgentId, FacilityId, SimRng};
use ud_schedule::{random_enrollment, EventScheduler, Group, Schedule};

use crate::{CampusConfig, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<G>`].
///
/// # Required inputs
///
/// - [`CampusConfig`] - seed, duration, population, policies
/// - [`Facilities`] - every campus facility (see [`crate::load_facilities_csv`])
/// - `Vec<Group>` - the roster, with no enrollments yet
///   (see [`ud_schedule::load_groups_csv`])
/// - `G: Geography` - receives every move
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                                  |
/// |---------------|------------------------------------------|
/// | `.timing(t)`  | `RandomTiming` over `config.timing`      |
///
/// # Build order
///
/// 1. Validate the config and every roster facility id.
/// 2. Enroll each student (capacity-checked), then freeze the groups.
/// 3. Pick each staff member's workplace (area-weighted).
/// 4. Draw the initially infected members.
/// 5. Plan every member's week, students first, before tick 0.
///
/// All draws come from one `SimRng` seeded from `config.sim.seed`, in that
/// order.
pub struct SimBuilder<G: Geography> {
    config:     CampusConfig,
    facilities: Facilities,
    groups:     Vec<Group>,
    geography:  G,
    timing:     Option<Box<dyn TimingPolicy>>,
}

impl<G: Geography> SimBuilder<G> {
    pub fn new(config: CampusConfig, facilities: Facilities, groups: Vec<Group>, geography: G) -> Self {
        Self { config, facilities, groups, geography, timing: None }
    }

    /// Replace the default timing distributions.
    pub fn timing(mut self, timing: impl TimingPolicy + 'static) -> Self {
        self.timing = Some(Box::new(timing));
        self
    }

    pub fn build(self) -> SimResult<Sim<G>> {
        let SimBuilder { config, facilities, mut groups, mut geography, timing } = self;
        config.validate()?;
        validate_roster(&groups, &facilities)?;

        let timing = timing
            .unwrap_or_else(|| Box::new(RandomTiming::new(config.timing.clone())) as Box<dyn TimingPolicy>);
        let mut rng = SimRng::new(config.sim.seed);
        let population = &config.population;

        // ── Enrollment ────────────────────────────────────────────────────
        let target = config.enrollment.groups_per_student;
        let enrollments: Vec<Vec<usize>> = (0..population.students)
            .map(|_| random_enrollment(&mut groups, &mut rng, target))
            .collect();
        let short = enrollments.iter().filter(|e| e.len() < target).count();
        if short > 0 {
            warn!(students = short, target, "roster could not fill every schedule");
        }

        let groups: Vec<Arc<Group>> = groups.into_iter().map(Arc::new).collect();
        let schedules: Vec<Schedule> = enrollments
            .iter()
            .map(|chosen| Schedule::new(chosen.iter().map(|&i| Arc::clone(&groups[i])).collect()))
            .collect();

        // ── Workplaces ────────────────────────────────────────────────────
        let workplaces: Vec<FacilityId> = (0..population.staff)
            .map(|_| {
                facilities
                    .choose(&[FacilityKind::Workplace], SelectionStrategy::AreaWeighted, &mut rng)
                    .map(|f| f.id.clone())
            })
            .collect::<Result<_, _>>()?;

        // ── Compartments ──────────────────────────────────────────────────
        let total = population.total();
        let mut order: Vec<usize> = (0..total).collect();
        rng.shuffle(&mut order);
        let infected: BTreeSet<usize> = order.into_iter().take(population.initial_infected).collect();
        let compartment = |i: usize| {
            if infected.contains(&i) { Compartment::Infected } else { Compartment::Susceptible }
        };

        // ── Members ───────────────────────────────────────────────────────
        let mut members = Vec::with_capacity(total);
        for (i, schedule) in schedules.into_iter().enumerate() {
            members.push(CommunityMember::student(agent_id(i)?, compartment(i), schedule));
        }
        for (j, workplace) in workplaces.into_iter().enumerate() {
            let i = population.students + j;
            members.push(CommunityMember::staff(agent_id(i)?, compartment(i), workplace));
        }

        // ── Weekly plans ──────────────────────────────────────────────────
        let converter = config.sim.converter();
        let mut scheduler = EventScheduler::new();
        for member in &mut members {
            let mut ctx = ActionContext {
                converter,
                scheduler:  &mut scheduler,
                facilities: &facilities,
                rng:        &mut rng,
                timing:     timing.as_ref(),
                selection:  config.selection,
                leisure:    &config.leisure,
                geography:  &mut geography,
            };
            member.plan_weekly_events(&mut ctx);
            debug!(agent = %member.id(), registered = member.registry().len(), "planned week");
        }

        info!(
            students = population.students,
            staff = population.staff,
            infected = infected.len(),
            groups = groups.len(),
            pending = scheduler.pending(),
            "simulation built"
        );

        Ok(Sim {
            config,
            converter,
            scheduler,
            members,
            facilities,
            groups,
            rng,
            timing,
            geography,
            dispatched: 0,
        })
    }
}

/// Every roster session must name a registered teaching facility.
fn validate_roster(groups: &[Group], facilities: &Facilities) -> SimResult<()> {
    for group in groups {
        for activity in group.academic_activities() {
            let facility = activity.teaching_facility_id();
            if !facilities.contains(FacilityKind::Teaching, facility) {
                return Err(SimError::UnknownTeachingFacility {
                    group:    group.id().to_owned(),
                    facility: facility.clone(),
                });
            }
        }
    }
    Ok(())
}

fn agent_id(index: usize) -> SimResult<AgentId> {
    AgentId::try_from(index).map_err(|_| SimError::Config(format!("agent index {index} exceeds u32")))
}
