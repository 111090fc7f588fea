//! Unit tests for ud-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EventId, FacilityId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(EventId(100) > EventId(99));
    }

    #[test]
    fn oversized_index_is_rejected() {
        assert!(AgentId::try_from(u32::MAX as usize + 1).is_err());
        assert_eq!(EventId::try_from(5usize).unwrap(), EventId(5));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "agent#7");
        assert_eq!(EventId(3).to_string(), "event#3");
        assert_eq!(FacilityId::new("ED-B").to_string(), "ED-B");
    }

    #[test]
    fn facility_ids_compare_by_content() {
        let a = FacilityId::from("ML");
        let b = FacilityId::from(String::from("ML"));
        assert_eq!(a, b);
        assert!(FacilityId::from("AU") < a);
    }
}

#[cfg(test)]
mod time {
    use crate::{DayTime, SimConfig, Tick, TickConverter, TICKS_PER_WEEK};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10.0);
        assert_eq!(t + 5.5, Tick(15.5));
        assert_eq!(Tick(15.0) - Tick(10.0), 5.0);
        assert_eq!(Tick(3.0).since(Tick(5.0)), -2.0);
    }

    #[test]
    fn hourly_week_length() {
        assert_eq!(TickConverter::HOURLY.ticks_per_week(), TICKS_PER_WEEK);
        assert_eq!(TickConverter::new(4.0).ticks_per_week(), 672.0);
    }

    #[test]
    fn day_time_to_ticks_basic() {
        let c = TickConverter::HOURLY;
        assert_eq!(c.day_time_to_ticks(1, 0.0), Tick(0.0));
        assert_eq!(c.day_time_to_ticks(2, 9.5), Tick(33.5));
        assert_eq!(c.day_time_to_ticks(7, 23.0), Tick(167.0));
    }

    #[test]
    fn scaled_resolution() {
        let c = TickConverter::new(2.0);
        assert_eq!(c.day_time_to_ticks(2, 9.5), Tick(67.0));
        let dt = c.ticks_to_day_time(Tick(67.0));
        assert_eq!(dt.day, 2);
        assert_eq!(dt.hour, 9.5);
    }

    #[test]
    fn negative_hour_wraps_to_previous_day() {
        let c = TickConverter::HOURLY;
        // 30 minutes before Tuesday midnight is Monday 23:30.
        assert_eq!(c.day_time_to_ticks(2, -0.5), Tick(23.5));
        // Before Monday midnight wraps to Sunday.
        assert_eq!(c.day_time_to_ticks(1, -1.0), Tick(167.0));
    }

    #[test]
    fn hour_past_midnight_rolls_forward() {
        let c = TickConverter::HOURLY;
        assert_eq!(c.day_time_to_ticks(1, 25.0), Tick(25.0));
        assert_eq!(c.day_time_to_ticks(7, 24.0), Tick(0.0));
    }

    #[test]
    fn out_of_range_day_wraps() {
        let c = TickConverter::HOURLY;
        assert_eq!(c.day_time_to_ticks(8, 1.0), c.day_time_to_ticks(1, 1.0));
        assert_eq!(c.day_time_to_ticks(0, 1.0), c.day_time_to_ticks(7, 1.0));
    }

    #[test]
    fn ticks_to_day_time_reduces_modulo_week() {
        let c = TickConverter::HOURLY;
        let dt = c.ticks_to_day_time(Tick(168.0 * 3.0 + 33.25));
        assert_eq!(dt.day, 2);
        assert_eq!(dt.hour, 9.25);
    }

    #[test]
    fn day_time_new_normalizes() {
        let dt = DayTime::new(3, -2.0);
        assert_eq!(dt.day, 2);
        assert_eq!(dt.hour, 22.0);
        assert_eq!(dt.week_hours(), 46.0);
    }

    #[test]
    fn day_time_display() {
        assert_eq!(DayTime::new(1, 9.5).to_string(), "day 1 09:30");
    }

    #[test]
    fn sim_config_end_tick() {
        let cfg = SimConfig { seed: 1, weeks: 2, ticks_per_hour: 1.0 };
        assert_eq!(cfg.end_tick(), Tick(336.0));
        let fine = SimConfig { ticks_per_hour: 60.0, ..cfg };
        assert_eq!(fine.end_tick(), Tick(336.0 * 60.0));
    }

    #[test]
    fn sim_config_validation() {
        assert!(SimConfig::default().validate().is_ok());
        let zero_weeks = SimConfig { weeks: 0, ..SimConfig::default() };
        assert!(zero_weeks.validate().is_err());
        let frozen = SimConfig { ticks_per_hour: 0.0, ..SimConfig::default() };
        assert!(frozen.validate().is_err());
        let nan = SimConfig { ticks_per_hour: f64::NAN, ..SimConfig::default() };
        assert!(nan.validate().is_err());
    }
}

#[cfg(test)]
mod time_properties {
    use proptest::prelude::*;

    use crate::{DayTime, Tick, TickConverter};

    /// Circular distance between two week positions, in hours.
    fn week_distance(a: DayTime, b: DayTime) -> f64 {
        let d = (a.week_hours() - b.week_hours()).abs();
        d.min(168.0 - d)
    }

    proptest! {
        #[test]
        fn round_trip_is_idempotent(t in 0.0f64..10_000.0, tph in prop::sample::select(vec![1.0, 2.0, 4.0, 60.0])) {
            let c = TickConverter::new(tph);
            let dt = c.ticks_to_day_time(Tick(t));
            let again = c.ticks_to_day_time(c.day_time_to_ticks(dt.day as i32, dt.hour));
            prop_assert!(week_distance(dt, again) < 1e-6, "{dt:?} vs {again:?}");
        }

        #[test]
        fn ticks_stay_within_first_week(day in -20i32..20, hour in -48.0f64..48.0) {
            let c = TickConverter::HOURLY;
            let t = c.day_time_to_ticks(day, hour);
            prop_assert!(t.0 >= 0.0 && t.0 < c.ticks_per_week());
        }

        #[test]
        fn day_time_is_in_range(t in -1_000.0f64..10_000.0) {
            let dt = TickConverter::HOURLY.ticks_to_day_time(Tick(t));
            prop_assert!((1..=7).contains(&dt.day));
            prop_assert!(dt.hour >= 0.0 && dt.hour <= 24.0);
        }
    }
}

#[cfg(test)]
mod hour_range {
    use crate::{HourRange, SimRng};

    #[test]
    fn sample_in_bounds() {
        let mut rng = SimRng::new(7);
        let range = HourRange::new(7.0, 10.0);
        for _ in 0..1000 {
            let v = range.sample(&mut rng);
            assert!((7.0..=10.0).contains(&v));
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut rng = SimRng::new(7);
        assert_eq!(HourRange::new(12.0, 12.0).sample(&mut rng), 12.0);
    }

    #[test]
    fn validity() {
        assert!(HourRange::new(1.0, 2.0).is_valid());
        assert!(!HourRange::new(3.0, 2.0).is_valid());
        assert!(!HourRange::new(f64::NAN, 2.0).is_valid());
        assert_eq!(HourRange::new(11.0, 14.5).span(), 3.5);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.gen_range(0.0..1.0);
            let b: f64 = r2.gen_range(0.0..1.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut r0 = SimRng::new(1);
        let mut r1 = SimRng::new(2);
        let a: Vec<u32> = (0..8).map(|_| r0.gen_range(0..1_000_000)).collect();
        let b: Vec<u32> = (0..8).map(|_| r1.gen_range(0..1_000_000)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SimRng::new(0);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn choose_from_empty_is_none() {
        let mut rng = SimRng::new(0);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[7]), Some(&7));
    }

    #[test]
    fn weighted_single_entry_ignores_weight() {
        let mut rng = SimRng::new(0);
        for w in [0.0, 1.0, 1e9, -3.0, f64::NAN] {
            assert_eq!(rng.choose_weighted_index(&[w]), Some(0));
        }
    }

    #[test]
    fn weighted_empty_is_none() {
        let mut rng = SimRng::new(0);
        assert_eq!(rng.choose_weighted_index(&[]), None);
    }

    #[test]
    fn weighted_zero_weight_never_chosen() {
        let mut rng = SimRng::new(9);
        for _ in 0..500 {
            assert_eq!(rng.choose_weighted_index(&[0.0, 5.0, 0.0]), Some(1));
        }
    }

    #[test]
    fn weighted_all_zero_falls_back_to_uniform() {
        let mut rng = SimRng::new(9);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let i = rng.choose_weighted_index(&[0.0, 0.0, 0.0]).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
