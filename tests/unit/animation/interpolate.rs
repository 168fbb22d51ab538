use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn clamp_both_sides_holds_boundaries() {
    let inputs = [0.0, 10.0];
    let outputs = [0.0, 1.0];
    let opts = InterpolateOpts::CLAMP;
    assert_eq!(interpolate(-5.0, &inputs, &outputs, opts).unwrap(), 0.0);
    assert_eq!(interpolate(5.0, &inputs, &outputs, opts).unwrap(), 0.5);
    assert_eq!(interpolate(15.0, &inputs, &outputs, opts).unwrap(), 1.0);
}

#[test]
fn extend_right_continues_slope() {
    let opts = InterpolateOpts {
        left: Extrapolate::Clamp,
        right: Extrapolate::Extend,
        ease: Ease::Linear,
    };
    let v = interpolate(15.0, &[0.0, 10.0], &[0.0, 1.0], opts).unwrap();
    assert!(close(v, 1.5));
}

#[test]
fn default_policy_extends_both_sides() {
    let table = KeyframeTable::from_pairs(&[(0.0, 0.0), (10.0, 1.0)]).unwrap();
    let opts = InterpolateOpts::default();
    assert_eq!(opts, InterpolateOpts::EXTEND);
    assert!(close(table.sample(-5.0, opts), -0.5));
    assert!(close(table.sample(20.0, opts), 2.0));
}

#[test]
fn extension_uses_nearest_segment_slope() {
    // Left segment slope 1/3 per frame, right segment slope -1/8 per frame.
    let table =
        KeyframeTable::new(vec![0.0, 3.0, 12.0, 20.0], vec![0.0, 1.0, 1.0, 0.0]).unwrap();
    let opts = InterpolateOpts::EXTEND;
    assert!(close(table.sample(-3.0, opts), -1.0));
    assert!(close(table.sample(28.0, opts), -1.0));
    assert!(close(table.sample(16.0, opts), 0.5));
    assert!(close(table.sample(7.0, opts), 1.0));
}

#[test]
fn exact_keyframe_inputs_return_declared_outputs() {
    let inputs = [15.0, 25.0, 40.0, 52.0];
    let outputs = [0.0, 1.0, 1.0, 0.0];
    for (i, o) in inputs.iter().zip(outputs) {
        let v = interpolate(*i, &inputs, &outputs, InterpolateOpts::CLAMP).unwrap();
        assert!(close(v, o));
    }
}

#[test]
fn single_keyframe_is_constant_under_both_policies() {
    for opts in [InterpolateOpts::CLAMP, InterpolateOpts::EXTEND] {
        assert_eq!(interpolate(-100.0, &[5.0], &[0.25], opts).unwrap(), 0.25);
        assert_eq!(interpolate(100.0, &[5.0], &[0.25], opts).unwrap(), 0.25);
    }
}

#[test]
fn non_increasing_inputs_are_rejected() {
    assert!(interpolate(0.0, &[0.0, 0.0], &[0.0, 1.0], InterpolateOpts::CLAMP).is_err());
    assert!(interpolate(0.0, &[5.0, 1.0], &[0.0, 1.0], InterpolateOpts::CLAMP).is_err());
    assert!(KeyframeTable::new(vec![], vec![]).is_err());
    assert!(KeyframeTable::new(vec![0.0, 1.0], vec![0.0]).is_err());
    assert!(KeyframeTable::new(vec![0.0, f64::NAN], vec![0.0, 1.0]).is_err());
}

#[test]
fn easing_only_shapes_inside_the_range() {
    let opts = InterpolateOpts::EXTEND.with_ease(Ease::InQuad);
    let table = KeyframeTable::from_pairs(&[(0.0, 0.0), (10.0, 1.0)]).unwrap();
    assert!(close(table.sample(5.0, opts), 0.25));
    assert!(close(table.sample(20.0, opts), 2.0));
}

#[test]
fn table_deserializes_from_pairs_and_rejects_bad_order() {
    let t: KeyframeTable = serde_json::from_str("[[0, 0], [10, 1]]").unwrap();
    assert_eq!(t.inputs(), &[0.0, 10.0]);
    let t: KeyframeTable =
        serde_json::from_str("{\"inputs\": [0, 2, 6], \"outputs\": [0, 1, 0]}").unwrap();
    assert_eq!(t.outputs(), &[0.0, 1.0, 0.0]);
    assert!(serde_json::from_str::<KeyframeTable>("[[10, 0], [0, 1]]").is_err());
}
