//! Integration tests for ud-sim.

use std::io::Cursor;

use ud_behavior::{
    AgentAction, Compartment, Facilities, FacilityKind, MemberState, MoveLog, NoopGeography,
};
use ud_core::{AgentId, Tick};
use ud_schedule::{load_groups_reader, Group};

use crate::{
    load_facilities_reader, CampusConfig, CsvTraceWriter, EventTrace, NoopObserver, Sim,
    SimBuilder, SimError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const FACILITIES: &str = "\
id,kind,lat,lon,area
ML,teaching,4.6026,-74.0653,820.5
AU,teaching,4.6031,-74.0648,410.0
PLAZA,shared_area,4.6019,-74.0660,310.0
LAWN,shared_area,4.6015,-74.0657,120.0
CAF,eating_place,4.6022,-74.0644,150.0
GATE,in_out,4.6010,-74.0670,12.0
ADMIN,workplace,4.6028,-74.0641,95.0
LIB,workplace,4.6033,-74.0652,240.0
";

const ROSTER: &str = "\
group_id,capacity,day,start_time,end_time,facility_id,room
MATH-A,3,1,9,11,ML,ML-201
MATH-A,3,3,9,11,ML,ML-201
PHYS-A,3,1,14,16,AU,AU-104
PHYS-A,3,4,14,16,AU,AU-104
CHEM-A,2,2,10,12,ML,ML-310
HIST-A,4,2,15,17,AU,AU-002
HIST-A,4,5,15,17,AU,AU-002
ART-A,2,3,13,15.5,ML,ML-105
";

fn facilities() -> Facilities {
    load_facilities_reader(Cursor::new(FACILITIES)).unwrap()
}

fn roster() -> Vec<Group> {
    load_groups_reader(Cursor::new(ROSTER)).unwrap()
}

fn config(seed: u64, students: usize, staff: usize) -> CampusConfig {
    let mut config = CampusConfig::default();
    config.sim.seed = seed;
    config.population.students = students;
    config.population.staff = staff;
    config.population.initial_infected = 1;
    config.enrollment.groups_per_student = 3;
    config
}

fn build(config: CampusConfig) -> Sim<NoopGeography> {
    SimBuilder::new(config, facilities(), roster(), NoopGeography).build().unwrap()
}

fn trace(seed: u64) -> EventTrace {
    let mut sim = build(config(seed, 6, 2));
    let mut trace = EventTrace::new(sim.converter);
    sim.run(&mut trace).unwrap();
    trace
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use ud_behavior::SelectionStrategy;
    use ud_core::FacilityId;

    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
    struct Workplace {
        facility: FacilityId,
    }

    #[test]
    fn facility_id_is_a_plain_toml_string() {
        let parsed: Workplace = toml::from_str(r#"facility = "ADMIN""#).unwrap();
        assert_eq!(parsed.facility, FacilityId::from("ADMIN"));
        let written = toml::to_string(&parsed).unwrap();
        assert_eq!(written.trim(), r#"facility = "ADMIN""#);
    }

    #[derive(serde::Serialize)]
    struct Purpose {
        purpose: ud_behavior::MovePurpose,
    }

    #[test]
    fn move_purpose_labels_match_serde_names() {
        for purpose in ud_behavior::MovePurpose::ALL {
            let written = toml::to_string(&Purpose { purpose }).unwrap();
            assert_eq!(written.trim(), format!("purpose = \"{}\"", purpose.as_str()));
        }
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config = CampusConfig::from_toml_str("").unwrap();
        assert_eq!(config.sim.weeks, 1);
        assert_eq!(config.population.students, 200);
        assert_eq!(config.population.staff, 20);
        assert_eq!(config.enrollment.groups_per_student, 4);
        assert_eq!(config.selection, SelectionStrategy::Uniform);
        assert!(!config.leisure.reschedule_at_boundary);
    }

    #[test]
    fn toml_overrides_only_what_it_names() {
        let config = CampusConfig::from_toml_str(
            r#"
            selection = "area_weighted"

            [sim]
            seed  = 7
            weeks = 2

            [population]
            students = 40

            [timing.student_arrival]
            min = 7.5
            max = 9.0
            "#,
        )
        .unwrap();
        assert_eq!(config.sim.seed, 7);
        assert_eq!(config.sim.end_tick(), Tick(336.0));
        assert_eq!(config.population.students, 40);
        assert_eq!(config.population.staff, 20);
        assert_eq!(config.selection, SelectionStrategy::AreaWeighted);
        assert_eq!(config.timing.student_arrival.min, 7.5);
        assert_eq!(config.timing.student_departure.min, 15.0);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CampusConfig::from_toml_str("[sim]\nweeks = \"many\"").unwrap_err();
        assert!(matches!(err, SimError::Toml(_)));
    }

    #[test]
    fn zero_weeks_rejected() {
        let err = CampusConfig::from_toml_str("[sim]\nweeks = 0").unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }

    #[test]
    fn more_infected_than_members_rejected() {
        let mut config = config(1, 2, 1);
        config.population.initial_infected = 4;
        assert!(matches!(config.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn inverted_timing_range_rejected() {
        let err = CampusConfig::from_toml_str("[timing.student_departure]\nmin = 20.0\nmax = 15.0").unwrap_err();
        assert!(matches!(err, SimError::Behavior(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.toml");
        std::fs::write(&path, "[population]\nstaff = 3\n").unwrap();
        let config = CampusConfig::load(&path).unwrap();
        assert_eq!(config.population.staff, 3);
    }
}

// ── Facility loader ───────────────────────────────────────────────────────────

#[cfg(test)]
mod loader_tests {
    use ud_core::FacilityId;

    use super::*;

    #[test]
    fn every_kind_is_registered() {
        let f = facilities();
        assert_eq!(f.len(), 8);
        assert_eq!(f.count(FacilityKind::Teaching), 2);
        assert_eq!(f.count(FacilityKind::Workplace), 2);
        assert!(f.contains(FacilityKind::InOut, &FacilityId::from("GATE")));
        assert!(!f.contains(FacilityKind::Teaching, &FacilityId::from("GATE")));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let csv = "id,kind,lat,lon,area\nX,dormitory,0,0,1\n";
        let err = load_facilities_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SimError::Behavior(_)));
    }

    #[test]
    fn duplicate_id_within_a_kind_is_rejected() {
        let csv = "id,kind,lat,lon,area\nML,teaching,0,0,1\nML,teaching,0,0,2\n";
        let err = load_facilities_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn negative_area_is_rejected() {
        let csv = "id,kind,lat,lon,area\nCAF,eating_place,0,0,-5\n";
        assert!(matches!(load_facilities_reader(Cursor::new(csv)), Err(SimError::Config(_))));
    }

    #[test]
    fn malformed_row_is_a_csv_error() {
        let csv = "id,kind,lat,lon,area\nCAF,eating_place,north,0,5\n";
        assert!(matches!(load_facilities_reader(Cursor::new(csv)), Err(SimError::Csv(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = crate::load_facilities_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn students_first_then_staff() {
        let sim = build(config(5, 4, 2));
        assert_eq!(sim.members.len(), 6);
        for (i, m) in sim.members.iter().enumerate() {
            assert_eq!(m.id(), AgentId(i as u32));
            assert_eq!(m.is_student(), i < 4);
            assert_eq!(m.state(), MemberState::AtHome);
        }
    }

    #[test]
    fn enrollment_never_exceeds_capacity() {
        // 14 seats in total, 10 students asking for 3 groups each.
        let sim = build(config(9, 10, 0));
        let mut seats_taken = 0;
        for group in &sim.groups {
            assert!(group.enrollments_count() <= group.capacity(), "{} overfull", group.id());
            seats_taken += group.enrollments_count();
        }
        let scheduled: usize = sim
            .members
            .iter()
            .filter_map(|m| m.as_student())
            .map(|s| s.schedule().groups().len())
            .sum();
        assert_eq!(scheduled as u32, seats_taken);
        assert!(seats_taken <= 14);
    }

    #[test]
    fn initial_infected_count_honored() {
        let mut cfg = config(11, 8, 3);
        cfg.population.initial_infected = 4;
        let sim = build(cfg);
        let infected = sim.members.iter().filter(|m| m.compartment() == Compartment::Infected).count();
        assert_eq!(infected, 4);
    }

    #[test]
    fn staff_work_at_a_workplace() {
        let sim = build(config(13, 0, 5));
        for m in &sim.members {
            let ud_behavior::MemberKind::Staff(staff) = m.kind() else {
                panic!("expected staff");
            };
            assert!(sim.facilities.contains(FacilityKind::Workplace, staff.workplace()));
        }
    }

    #[test]
    fn every_weekly_obligation_registered_before_tick_zero() {
        let sim = build(config(5, 0, 2));
        assert_eq!(sim.scheduler.pending(), 48);
        assert_eq!(sim.now(), Tick(0.0));
    }

    #[test]
    fn unknown_teaching_facility_rejected() {
        let roster = "group_id,capacity,day,start_time,end_time,facility_id,room\nG,5,1,9,10,NOWHERE,R1\n";
        let groups = load_groups_reader(Cursor::new(roster)).unwrap();
        let err = SimBuilder::new(config(1, 2, 0), facilities(), groups, NoopGeography)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::UnknownTeachingFacility { .. }));
    }

    #[test]
    fn staff_without_workplaces_rejected() {
        let csv = "id,kind,lat,lon,area\nML,teaching,0,0,1\nAU,teaching,0,0,1\n";
        let facilities = load_facilities_reader(Cursor::new(csv)).unwrap();
        let err = SimBuilder::new(config(1, 0, 1), facilities, roster(), NoopGeography)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, SimError::Behavior(_)));
    }

    #[test]
    fn invalid_config_rejected_at_build() {
        let mut cfg = config(1, 1, 1);
        cfg.sim.ticks_per_hour = 0.0;
        let result = SimBuilder::new(cfg, facilities(), roster(), NoopGeography).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn staff_week_is_twenty_four_events_each() {
        let mut sim = build(config(21, 0, 3));
        let dispatched = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(dispatched, 72);
        assert_eq!(sim.dispatched(), 72);
    }

    #[test]
    fn two_weeks_repeat_the_plan() {
        let mut cfg = config(21, 0, 1);
        cfg.sim.weeks = 2;
        let mut sim = build(cfg);
        assert_eq!(sim.run(&mut NoopObserver).unwrap(), 48);
    }

    #[test]
    fn scheduler_is_shut_down_after_run() {
        let mut sim = build(config(3, 4, 1));
        sim.run(&mut NoopObserver).unwrap();
        assert!(sim.scheduler.is_shut_down());
        assert_eq!(sim.scheduler.pending(), 0);
        assert_eq!(sim.now(), sim.config.sim.end_tick());
    }

    #[test]
    fn staff_end_every_working_day_at_home() {
        let trace = trace(17);
        for staff in [6, 7] {
            let rows: Vec<_> = trace.rows().iter().filter(|r| r.agent == staff).collect();
            assert_eq!(rows.len(), 24);
            for day in 1..=6 {
                let last = rows.iter().filter(|r| r.day == day).last().unwrap();
                assert_eq!(last.action, "return_home");
                assert_eq!(last.state, "AtHome");
                assert!(last.location.is_empty());
            }
        }
    }

    #[test]
    fn trace_is_in_tick_order() {
        let trace = trace(8);
        assert!(trace.rows().windows(2).all(|w| w[0].tick <= w[1].tick));
        assert!(trace.rows().iter().all(|r| r.tick <= 168.0));
    }

    #[test]
    fn students_attend_their_classes() {
        let trace = trace(4);
        assert!(trace.rows().iter().any(|r| r.action.starts_with("attend_activity")));
        for row in trace.rows().iter().filter(|r| r.action.starts_with("attend_activity")) {
            assert!(row.location == "ML" || row.location == "AU", "{row:?}");
        }
    }

    #[test]
    fn same_seed_same_trace() {
        let a = trace(2024);
        assert!(!a.rows().is_empty());
        assert_eq!(a.rows(), trace(2024).rows());
    }

    #[test]
    fn stepping_matches_a_single_run() {
        let mut stepped = build(config(31, 6, 2));
        let mut trace = EventTrace::new(stepped.converter);
        for day in 1..=7 {
            stepped.run_until(Tick(day as f64 * 24.0), &mut trace).unwrap();
            assert_eq!(stepped.now(), Tick(day as f64 * 24.0));
            assert!(!stepped.scheduler.is_shut_down());
        }
        let mut whole = build(config(31, 6, 2));
        let mut reference = EventTrace::new(whole.converter);
        whole.run(&mut reference).unwrap();
        assert_eq!(trace.rows(), reference.rows());
    }

    #[test]
    fn moves_reach_the_geography() {
        let mut sim = SimBuilder::new(config(12, 0, 1), facilities(), roster(), MoveLog::new())
            .build()
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();
        let agent = sim.members[0].id();
        // Work, lunch, work, exit gate, home.
        assert_eq!(sim.geography.for_agent(agent).count(), 30);
    }

    #[test]
    fn failed_action_names_agent_and_action() {
        let mut sim = build(config(1, 0, 1));
        sim.facilities = load_facilities_reader(Cursor::new("id,kind,lat,lon,area\nML,teaching,0,0,1\n")).unwrap();
        let err = sim.run(&mut NoopObserver).unwrap_err();
        match err {
            SimError::Action { agent, action, .. } => {
                assert_eq!(agent, AgentId(0));
                assert_eq!(action, "work");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn observer_sees_member_after_handling() {
        struct Check(usize);
        impl crate::SimObserver for Check {
            fn on_event(
                &mut self,
                event: &ud_schedule::FiredEvent<AgentAction>,
                member: &ud_behavior::CommunityMember,
            ) {
                if event.action == AgentAction::Work {
                    assert!(member.state().is_on_campus());
                    self.0 += 1;
                }
            }
        }
        let mut sim = build(config(2, 0, 1));
        let mut check = Check(0);
        sim.run(&mut check).unwrap();
        assert_eq!(check.0, 12);
    }
}

// ── Trace output ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace_tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_row_per_event() {
        let mut sim = build(config(6, 4, 1));
        let mut writer = CsvTraceWriter::new(Vec::new(), sim.converter);
        let dispatched = sim.run(&mut writer).unwrap();
        assert_eq!(writer.rows_written(), dispatched);

        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("tick,day,hour,agent,action,location,state"));
        assert_eq!(lines.count() as u64, dispatched);
    }

    #[test]
    fn csv_matches_in_memory_trace() {
        let mut sim = build(config(6, 4, 1));
        let mut writer = CsvTraceWriter::new(Vec::new(), sim.converter);
        sim.run(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let actions: Vec<String> = reader
            .records()
            .map(|r| r.unwrap().get(4).unwrap().to_owned())
            .collect();
        let expected: Vec<String> = trace_of(config(6, 4, 1)).into_iter().map(|r| r.action).collect();
        assert_eq!(actions, expected);
    }

    fn trace_of(config: CampusConfig) -> Vec<crate::TraceRow> {
        let mut sim = build(config);
        let mut trace = EventTrace::new(sim.converter);
        sim.run(&mut trace).unwrap();
        trace.into_rows()
    }

    #[test]
    fn day_and_hour_follow_the_tick() {
        for row in trace(14).rows() {
            let week_hours = (row.day as f64 - 1.0) * 24.0 + row.hour;
            assert!((week_hours - row.tick.rem_euclid(168.0)).abs() < 1e-9, "{row:?}");
        }
    }
}
