pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

pub fn assert_unit_interval(value: f64) {
    assert!(
        value.is_finite() && (-1.0..=1.0).contains(&value),
        "expected value in [-1, 1], got {value}"
    );
}
