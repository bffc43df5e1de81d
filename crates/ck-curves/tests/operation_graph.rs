use ck_curves::{CurveSet, CurvesError, GraphDiagnostic, OperationKind};
use proptest::prelude::*;

fn grid(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

#[test]
fn duplicate_curve_rejected_once() {
    let mut set = CurveSet::default();
    assert!(set.add_curve("a", grid(3), vec![1.0, 2.0, 3.0], None, true).is_ok());
    let second = set.add_curve("a", grid(3), vec![1.0, 2.0, 3.0], None, true);
    assert!(matches!(second, Err(CurvesError::DuplicateCurve { .. })));
    assert_eq!(set.len(), 1);
}

#[test]
fn smoothing_follows_subtraction() {
    let mut set = CurveSet::default();
    let n = 200;
    let noisy: Vec<f64> = (0..n).map(|i| 5.0 + if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
    let base = vec![2.0; n];
    let a = set.add_curve("noisy", grid(n), noisy, None, true).unwrap();
    let b = set.add_curve("base", grid(n), base, None, true).unwrap();
    let id_b = set.get(b).unwrap().identity().clone();

    set.set_operation(a, OperationKind::Subtract).unwrap();
    set.set_target(a, Some(id_b)).unwrap();
    set.set_smooth_level(a, 4).unwrap();

    let (_, ys) = set.series(a).unwrap();
    let interior = &ys[20..n - 20];
    for y in interior {
        assert!((y - 3.0).abs() < 0.1, "{y}");
    }
}

#[test]
fn reverse_x_leaves_y_order() {
    let mut set = CurveSet::default();
    let a = set.add_curve("a", grid(4), vec![1.0, 2.0, 3.0, 4.0], None, true).unwrap();
    set.set_reverse_x(a, true).unwrap();
    let (xs, ys) = set.series(a).unwrap();
    assert_eq!(xs, &[3.0, 2.0, 1.0, 0.0]);
    assert_eq!(ys, &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn new_target_loses_its_own_operation() {
    let mut set = CurveSet::default();
    let a = set.add_curve("a", grid(4), vec![1.0, 2.0, 3.0, 4.0], None, true).unwrap();
    let b = set.add_curve("b", grid(4), vec![5.0, 6.0, 7.0, 8.0], None, true).unwrap();
    let c = set.add_curve("c", grid(4), vec![9.0, 8.0, 7.0, 6.0], None, true).unwrap();
    let id_a = set.get(a).unwrap().identity().clone();
    let id_b = set.get(b).unwrap().identity().clone();

    set.set_operation(a, OperationKind::Subtract).unwrap();
    set.set_target(a, Some(id_b)).unwrap();
    set.recompute().unwrap();
    assert!(!set.get(b).unwrap().operation_enabled());

    // c now subtracts a, which still subtracts b.
    set.set_target(c, Some(id_a.clone())).unwrap();
    set.set_operation(c, OperationKind::Subtract).unwrap();
    let report = set.recompute().unwrap();

    assert!(report
        .diagnostics
        .contains(&GraphDiagnostic::TargetLocked { curve: a }));
    let rec_a = set.get(a).unwrap();
    assert_eq!(rec_a.operation(), OperationKind::None);
    assert!(rec_a.target().is_none());
    assert!(!rec_a.operation_enabled());
    assert!(set.get(b).unwrap().operation_enabled());
    let rec_c = set.get(c).unwrap();
    assert_eq!(rec_c.operation(), OperationKind::Subtract);
    assert_eq!(rec_c.target(), Some(&id_a));
    assert_eq!(set.series(a).unwrap().1, &[1.0, 2.0, 3.0, 4.0]);
}

#[derive(Clone, Debug)]
enum Step {
    Subtract { curve: usize, target: usize },
    Clear { curve: usize },
    Remove { curve: usize },
    Grow { curve: usize },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0..6usize, 0..6usize).prop_map(|(curve, target)| Step::Subtract { curve, target }),
        1 => (0..6usize).prop_map(|curve| Step::Clear { curve }),
        1 => (0..6usize).prop_map(|curve| Step::Remove { curve }),
        1 => (0..6usize).prop_map(|curve| Step::Grow { curve }),
    ]
}

proptest! {
    #[test]
    fn dependency_depth_stays_at_most_one(steps in proptest::collection::vec(step(), 1..40)) {
        let mut set = CurveSet::default();
        let handles: Vec<_> = (0..6)
            .map(|i| {
                let ys: Vec<f64> = (0..4).map(|j| (i * 10 + j) as f64).collect();
                set.add_curve(&format!("c{i}"), grid(4), ys, None, true).unwrap()
            })
            .collect();

        for (n, step) in steps.into_iter().enumerate() {
            match step {
                Step::Subtract { curve, target } => {
                    let Some(target_id) = set.get(handles[target]).map(|r| r.identity().clone()) else {
                        continue;
                    };
                    // Rejections are part of the rules under test.
                    let _ = set.set_operation(handles[curve], OperationKind::Subtract);
                    let _ = set.set_target(handles[curve], Some(target_id));
                }
                Step::Clear { curve } => {
                    let _ = set.set_operation(handles[curve], OperationKind::None);
                }
                Step::Remove { curve } => {
                    let _ = set.remove_curve(handles[curve]);
                }
                Step::Grow { curve } => {
                    let ys: Vec<f64> = (0..5).map(|j| (1000 * (n + 1) + j) as f64).collect();
                    let _ = set.update_curve_data(handles[curve], grid(5), ys);
                }
            }
            set.recompute().unwrap();

            for rec in set.iter() {
                if rec.operation() != OperationKind::Subtract {
                    continue;
                }
                let Some(target) = rec.target() else { continue };
                let t = set.find_by_identity(target);
                prop_assert!(t.is_some(), "dangling target");
                let t = t.unwrap();
                prop_assert_eq!(t.len(), rec.len());
                prop_assert_eq!(t.operation(), OperationKind::None);
                prop_assert!(t.target().is_none());
                prop_assert!(!t.operation_enabled());
                prop_assert!(rec.target() != Some(rec.identity()));
            }
        }
    }
}
