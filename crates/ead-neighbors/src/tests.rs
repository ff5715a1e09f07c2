//! Unit tests for ead-neighbors.
//!
//! Expected values below are worked by hand from the default `EadConfig`
//! (a_max 2.0, lag 1.9 s, operating 15 m/s, limit 20 m/s, buffer 4 s) and a
//! 30 / 3 / 27 s signal cycle.

#[cfg(test)]
mod helpers {
    use ead_core::Node;
    use ead_signal::{
        Intersection, IntersectionSnapshot, PhaseCycle, PhaseOracle, SignalError, SignalPhase,
        SignalResult, SignalState,
    };

    pub fn n(distance: i64, time: i64, speed: i64) -> Node {
        Node::from_internal(distance, time, speed)
    }

    /// Snapshot of `(stop_bar_m, phase, time_remaining_s)` entries.
    pub fn snapshot(entries: &[(f64, SignalPhase, f64)]) -> IntersectionSnapshot {
        let list = entries
            .iter()
            .enumerate()
            .map(|(i, &(stop_bar_m, phase, time_remaining_s))| Intersection {
                id: i as u32 + 1,
                stop_bar_m,
                phase,
                time_remaining_s,
                cycle: PhaseCycle::new(30.0, 3.0, 27.0),
            })
            .collect();
        IntersectionSnapshot::new(list).unwrap()
    }

    /// Reports one stop bar but fails every timing query for it.
    pub struct Vanishing;

    impl PhaseOracle for Vanishing {
        fn intersection_count(&self) -> usize {
            1
        }

        fn stop_bar_m(&self, _index: usize) -> SignalResult<f64> {
            Ok(100.0)
        }

        fn phase_at(&self, index: usize, _time_s: f64) -> SignalResult<SignalState> {
            Err(SignalError::UnknownIntersection(index))
        }

        fn next_green_onset(&self, index: usize, _after_s: f64) -> SignalResult<f64> {
            Err(SignalError::UnknownIntersection(index))
        }

        fn phase_duration(&self, index: usize, _phase: SignalPhase) -> SignalResult<f64> {
            Err(SignalError::UnknownIntersection(index))
        }
    }
}

// ── Timing helpers ────────────────────────────────────────────────────────────

#[cfg(test)]
mod timing {
    use ead_core::EadConfig;

    use super::helpers::n;
    use crate::timing::{Candidates, chord_speed, crossing_time, kinematic_arrival, terminal_hop};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn arrival_with_cruise_segment() {
        let a = kinematic_arrival(200.0, 10.0, &EadConfig::default());
        assert!(close(a.speed_mps, 15.0));
        // 1.9 lag + 2.5 ramp + (200 − 50.25) / 15 cruise.
        assert!(close(a.elapsed_s, 4.4 + 149.75 / 15.0));
    }

    #[test]
    fn arrival_still_accelerating() {
        // From rest no lag distance accrues; v² = 2·2·16.
        let a = kinematic_arrival(16.0, 0.0, &EadConfig::default());
        assert!(close(a.speed_mps, 8.0));
        assert!(close(a.elapsed_s, 1.9 + 4.0));
    }

    #[test]
    fn arrival_inside_lag_distance_keeps_speed() {
        let a = kinematic_arrival(15.0, 10.0, &EadConfig::default());
        assert!(close(a.speed_mps, 10.0));
        assert!(close(a.elapsed_s, 1.5));
    }

    #[test]
    fn candidates_hold_speed_limit_to_half_a_unit() {
        let mut out = Candidates::new(n(0, 0, 100), &EadConfig::default());
        // 20.04 m/s rounds onto the limit; 20.1 m/s is over it.
        assert!(out.push(10.0, 1.0, 20.04));
        assert!(!out.push(12.0, 1.0, 20.1));
        assert!(!out.push(10.0, 1.0, 20.0));
        assert_eq!(out.into_vec(), vec![n(100, 10, 200)]);
    }

    #[test]
    fn arrival_decelerating() {
        // 20 → 15 m/s: the 1.9 s lag at 20 m/s covers 38 m, then
        // v² = 400 − 4·(50 − 38).
        let a = kinematic_arrival(50.0, 20.0, &EadConfig::default());
        assert!(close(a.speed_mps, 352.0_f64.sqrt()));
        assert!(a.speed_mps < 20.0);
        assert!(close(a.elapsed_s, 1.9 + (20.0 - 352.0_f64.sqrt()) / 2.0));
    }

    #[test]
    fn small_speed_change_has_no_lag() {
        let a = kinematic_arrival(150.0, 14.5, &EadConfig::default());
        assert!(close(a.speed_mps, 15.0));
        let ramp_d = 14.5 * 0.25 + 0.5 * 2.0 * 0.0625;
        assert!(close(a.elapsed_s, 0.25 + (150.0 - ramp_d) / 15.0));
    }

    #[test]
    fn chord_formula() {
        assert!(close(chord_speed(200.0, 20.0, 10.0).unwrap(), 10.0));
        assert_eq!(chord_speed(200.0, 0.0, 10.0), None);
    }

    #[test]
    fn terminal_hops() {
        let cfg = EadConfig::default();
        let (d, t) = terminal_hop(5.0, &cfg);
        assert!(close(d, 200.0 / 3.0));
        assert!(close(t, 20.0 / 3.0));

        let (d, t) = terminal_hop(14.0, &cfg);
        assert!(close(d, 40.0));
        assert!(close(t, 2.0 / 3.0 + (40.0 - 29.0 / 3.0) / 15.0));
    }

    #[test]
    fn crossing_time_cases() {
        assert!(close(crossing_time(5.0, 10.0, 10.0, 1.0), 0.5));
        // From rest at 2 m/s²: s = t², so 1 m at 1 s.
        assert!(close(crossing_time(1.0, 0.0, 2.0, 1.0), 1.0));
        assert!(close(crossing_time(0.0, 10.0, 8.0, 1.0), 0.0));
        assert!(close(crossing_time(100.0, 0.0, 0.0, 1.0), 1.0));
    }
}

// ── Coarse generator ──────────────────────────────────────────────────────────

#[cfg(test)]
mod coarse {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use ead_core::{EadConfig, Node};
    use ead_search::NeighborGenerator;
    use ead_signal::{IntersectionSnapshot, SignalError, SignalPhase, SnapshotOracle};

    use super::helpers::{Vanishing, n, snapshot};
    use crate::CoarseNeighbors;

    fn coarse(snap: &IntersectionSnapshot) -> CoarseNeighbors<SnapshotOracle<'_>> {
        CoarseNeighbors::new(EadConfig::default(), SnapshotOracle::new(snap))
    }

    #[test]
    fn green_arrival_fans_until_buffered_phase_end() {
        let snap = snapshot(&[(200.0, SignalPhase::Green, 20.0)]);
        let out = coarse(&snap).neighbors(&n(0, 0, 100)).unwrap();
        // Arrival 14.38 s at 15 m/s, one more second at the chord speed, then
        // the 16 s expiration.  The next green is out of reach at crawl speed.
        assert_eq!(out, vec![n(2_000, 144, 150), n(2_000, 154, 160)]);
    }

    #[test]
    fn red_arrival_targets_next_green() {
        let snap = snapshot(&[(200.0, SignalPhase::Red, 15.0)]);
        let out = coarse(&snap).neighbors(&n(0, 0, 100)).unwrap();

        // Onset 15 s + 4 s buffer; 2·181 / 17.1 − 10 ≈ 11.17 m/s.
        assert_eq!(out[0], n(2_000, 190, 112));
        // One candidate per second until the chord speed drops below 2.2 m/s
        // after t = 32 s.
        assert_eq!(out.len(), 14);
        assert_eq!(out.last().unwrap().time(), 320);
        assert_eq!(out[1], n(2_000, 200, 100));
        for w in out.windows(2) {
            assert_eq!(w[1].time() - w[0].time(), 10);
            assert!(w[1].speed() < w[0].speed());
        }
        assert!(out.iter().all(|x| x.distance() == 2_000 && x.speed() >= 22));
    }

    #[test]
    fn stop_and_wait_inside_lag_distance() {
        // 15 m out at 10 m/s is inside the 19 m lag distance.
        let snap = snapshot(&[(15.0, SignalPhase::Red, 15.0)]);
        let out = coarse(&snap).neighbors(&n(0, 0, 100)).unwrap();
        assert_eq!(out, vec![n(150, 150, 0)]);
    }

    #[test]
    fn stop_and_wait_through_full_red() {
        // Yellow ends before the 1.5 s arrival; red runs 1 s to 28 s.
        let snap = snapshot(&[(15.0, SignalPhase::Yellow, 1.0)]);
        let out = coarse(&snap).neighbors(&n(0, 0, 100)).unwrap();
        assert_eq!(out, vec![n(150, 280, 0)]);
    }

    #[test]
    fn stop_and_wait_is_never_before_next_increment() {
        // Red ends at 0.7 s, sooner than one time increment.
        let snap = snapshot(&[(2.0, SignalPhase::Red, 0.7)]);
        let out = coarse(&snap).neighbors(&n(0, 0, 100)).unwrap();
        assert_eq!(out, vec![n(20, 10, 0)]);
    }

    #[test]
    fn terminal_accelerating() {
        let out = coarse(&IntersectionSnapshot::empty()).neighbors(&n(1_000, 0, 50)).unwrap();
        assert_eq!(out, vec![Node::from_real(100.0 + 200.0 / 3.0, 20.0 / 3.0, 15.0)]);
        assert_eq!(out[0], n(1_667, 67, 150));
    }

    #[test]
    fn terminal_short_hop_is_stretched() {
        let out = coarse(&IntersectionSnapshot::empty()).neighbors(&n(0, 0, 140)).unwrap();
        assert_eq!(out, vec![n(400, 27, 150)]);
    }

    #[test]
    fn terminal_decelerating() {
        let out = coarse(&IntersectionSnapshot::empty()).neighbors(&n(0, 0, 200)).unwrap();
        // 20 → 15 m/s at 1.5 m/s²: 3.33 s over 58.3 m.
        assert_eq!(out, vec![n(583, 33, 150)]);
    }

    #[test]
    fn bar_within_tolerance_counts_as_passed() {
        let snap = snapshot(&[(200.0, SignalPhase::Red, 15.0)]);
        let gen_ = coarse(&snap);
        for at in [1_995, 2_000, 2_004] {
            let out = gen_.neighbors(&n(at, 100, 150)).unwrap();
            assert_eq!(out.len(), 1);
            assert_eq!(out[0].speed(), 150);
            assert_eq!(out[0].distance(), at + 400);
        }
    }

    #[test]
    fn vanished_intersection_falls_back_to_terminal() {
        let gen_ = CoarseNeighbors::new(EadConfig::default(), Vanishing);
        let out = gen_.neighbors(&n(0, 0, 150)).unwrap();
        assert_eq!(out, vec![n(400, 27, 150)]);
    }

    #[test]
    fn phase_step_limit_propagates() {
        let snap = snapshot(&[(200.0, SignalPhase::Green, 20.0)]);
        let oracle = SnapshotOracle::new(&snap).with_max_phase_steps(1);
        let gen_ = CoarseNeighbors::new(EadConfig::default(), oracle);
        let err = gen_.neighbors(&n(0, 0, 100)).unwrap_err();
        assert!(matches!(err, SignalError::PhaseStepLimit { index: 0, .. }));
    }

    #[test]
    fn neighbor_cap() {
        let snap = snapshot(&[(200.0, SignalPhase::Red, 15.0)]);
        let cfg = EadConfig { max_neighbors: 3, ..EadConfig::default() };
        let out = CoarseNeighbors::new(cfg, SnapshotOracle::new(&snap))
            .neighbors(&n(0, 0, 100))
            .unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], n(2_000, 190, 112));
    }

    #[test]
    fn neighbors_are_feasible_and_distinct() {
        let snap = snapshot(&[
            (300.0, SignalPhase::Green, 12.0),
            (700.0, SignalPhase::Red, 20.0),
            (1_100.0, SignalPhase::Yellow, 2.0),
        ]);
        let gen_ = coarse(&snap);
        let mut rng = SmallRng::seed_from_u64(17);
        for _ in 0..2_000 {
            let from = Node::from_real(
                rng.gen_range(0.0..1_300.0),
                rng.gen_range(0.0..300.0),
                rng.gen_range(0.0..20.0),
            );
            let out = gen_.neighbors(&from).unwrap();
            assert!(!out.is_empty(), "no neighbors from {from}");
            for (i, next) in out.iter().enumerate() {
                assert!(next.time() > from.time(), "{from} -> {next}");
                assert!(next.speed() >= 0 && next.speed() <= 200, "{from} -> {next}");
                assert!(next.distance() > from.distance(), "{from} -> {next}");
                assert!(!out[..i].contains(next), "duplicate {next}");
            }
        }
    }

    #[test]
    fn expansion_is_deterministic() {
        let snap = snapshot(&[(300.0, SignalPhase::Green, 25.0), (700.0, SignalPhase::Red, 5.0)]);
        let gen_ = coarse(&snap);
        let from = n(120, 35, 87);
        let first = gen_.neighbors(&from).unwrap();
        for _ in 0..5 {
            assert_eq!(gen_.neighbors(&from).unwrap(), first);
        }
    }
}

// ── Fine generator ────────────────────────────────────────────────────────────

#[cfg(test)]
mod fine {
    use std::collections::HashSet;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use ead_core::{EadConfig, Node};
    use ead_search::NeighborGenerator;
    use ead_signal::{IntersectionSnapshot, SignalPhase, SnapshotOracle};

    use super::helpers::{n, snapshot};
    use crate::FineNeighbors;

    fn fine(snap: &IntersectionSnapshot) -> FineNeighbors<SnapshotOracle<'_>> {
        FineNeighbors::new(EadConfig::default(), SnapshotOracle::new(snap))
    }

    #[test]
    fn open_road_samples_speeds_around_current() {
        let out = fine(&IntersectionSnapshot::empty()).neighbors(&n(0, 0, 100)).unwrap();
        // 8, 9, 10, 11, 12 m/s; the hard-brake entry duplicates 8 m/s.
        assert_eq!(
            out,
            vec![n(90, 10, 80), n(95, 10, 90), n(100, 10, 100), n(105, 10, 110), n(110, 10, 120)]
        );
    }

    #[test]
    fn operating_speed_added_when_reachable() {
        let cfg = EadConfig { fine_speed_steps: 0, ..EadConfig::default() };
        let snap = IntersectionSnapshot::empty();
        let out = FineNeighbors::new(cfg, SnapshotOracle::new(&snap))
            .neighbors(&n(0, 0, 135))
            .unwrap();
        assert_eq!(out, vec![n(135, 10, 135), n(125, 10, 115), n(143, 10, 150)]);
    }

    #[test]
    fn red_bar_is_not_crossed() {
        let snap = snapshot(&[(10.0, SignalPhase::Red, 20.0)]);
        let out = fine(&snap).neighbors(&n(0, 0, 100)).unwrap();
        // Ending on the bar at 10 m/s counts as running the red, as do the
        // hops to 10.5 m and 11 m.
        assert_eq!(out, vec![n(90, 10, 80), n(95, 10, 90)]);
    }

    #[test]
    fn green_bar_is_crossed() {
        let snap = snapshot(&[(10.0, SignalPhase::Green, 20.0)]);
        let out = fine(&snap).neighbors(&n(0, 0, 100)).unwrap();
        assert_eq!(out.len(), 5);
        assert!(out.iter().any(|x| x.distance() > 100));
    }

    #[test]
    fn crossing_checked_at_crossing_time() {
        // Green for another 0.4 s; at 10 m/s the bar 5 m out is reached at 0.5 s.
        let snap = snapshot(&[(5.0, SignalPhase::Green, 0.4)]);
        let out = fine(&snap).neighbors(&n(0, 0, 100)).unwrap();
        // Every hop reaches the bar after 0.45 s, on yellow, so the vehicle
        // brakes to the bar instead.
        assert_eq!(out, vec![n(50, 10, 0)]);
    }

    #[test]
    fn waits_at_rest_before_red() {
        let snap = snapshot(&[(10.0, SignalPhase::Red, 20.0)]);
        let out = fine(&snap).neighbors(&n(100, 0, 0)).unwrap();
        assert_eq!(out, vec![n(100, 10, 0)]);
    }

    #[test]
    fn blocked_hops_brake_to_the_bar() {
        // Every hop from 20 m/s passes the red bar 5 m ahead.
        let snap = snapshot(&[(5.0, SignalPhase::Red, 20.0)]);
        let out = fine(&snap).neighbors(&n(0, 0, 200)).unwrap();
        assert_eq!(out, vec![n(50, 10, 0)]);
    }

    #[test]
    fn moving_vehicle_never_reaches_red_bar() {
        let snap = snapshot(&[(100.0, SignalPhase::Red, 20.0)]);
        let out = fine(&snap).neighbors(&n(960, 0, 40)).unwrap();
        // 4 m/s would end on the bar still rolling.
        assert_eq!(out, vec![n(990, 10, 20), n(995, 10, 30)]);

        // Coming to rest exactly on the bar is allowed.
        let out = fine(&snap).neighbors(&n(990, 0, 20)).unwrap();
        assert_eq!(out, vec![n(1000, 10, 0)]);
    }

    #[test]
    fn rolling_on_red_bar_stops_in_place() {
        let snap = snapshot(&[(100.0, SignalPhase::Red, 20.0)]);
        let out = fine(&snap).neighbors(&n(1000, 0, 50)).unwrap();
        assert_eq!(out, vec![n(1000, 10, 0)]);
    }

    #[test]
    fn leaves_bar_once_green() {
        // Red ends at 2 s.
        let snap = snapshot(&[(100.0, SignalPhase::Red, 2.0)]);
        let gen_ = fine(&snap);
        assert_eq!(gen_.neighbors(&n(1000, 10, 0)).unwrap(), vec![n(1000, 20, 0)]);
        assert_eq!(
            gen_.neighbors(&n(1000, 20, 0)).unwrap(),
            vec![n(1000, 30, 0), n(1005, 30, 10), n(1010, 30, 20)]
        );
    }

    #[test]
    fn hops_respect_accel_and_speed_limits() {
        let snap = snapshot(&[(150.0, SignalPhase::Green, 7.0), (400.0, SignalPhase::Red, 9.0)]);
        let gen_ = fine(&snap);
        let cfg = EadConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..2_000 {
            let from = Node::from_real(
                rng.gen_range(0.0..500.0),
                rng.gen_range(0.0..120.0),
                rng.gen_range(0.0..20.0),
            );
            let out = gen_.neighbors(&from).unwrap();
            assert!(!out.is_empty(), "no neighbors from {from}");
            let unique: HashSet<_> = out.iter().copied().collect();
            assert_eq!(unique.len(), out.len());
            for next in &out {
                assert!(next.time() > from.time());
                assert!(next.speed_mps() <= cfg.speed_limit_mps + 0.05);
                assert!(next.distance() >= from.distance());
                // The safe-stop fallback is the only hop allowed to exceed
                // the acceleration bound.
                if next.time() - from.time() == 10 && next.speed() > 0 {
                    let dv = (next.speed_mps() - from.speed_mps()).abs();
                    assert!(dv <= cfg.max_accel_mps2 + 0.1, "{from} -> {next}");
                }
            }
        }
    }
}
