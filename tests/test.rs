use hypersci::{
    bi_polygon, bi_polygon_root, current_engineering_value, factorial, factorial_slog,
    hyperscientifify, hyperscientifify_with, hypersplit, inverse_factorial,
    iterated_bi_polygon_root, iterated_factorial, iterated_polygon_root,
    next_engineering_value, polygon, polygon_root, previous_engineering_value, scientifify,
    scientifify_with, tri_polygon, tri_polygon_root, DomainError, EngineeringSet, HyperReal,
    HypersplitOptions, Rounding,
};

fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance * expected.abs().max(1.0)
}

#[test]
fn test_engineering_unit_grid() {
    let unit = EngineeringSet::<f64>::default();

    assert_eq!(current_engineering_value(&5.7, &unit), 5.0);
    assert_eq!(current_engineering_value(&5.0, &unit), 5.0);
    assert_eq!(next_engineering_value(&5.0, &unit), 6.0);
    assert_eq!(next_engineering_value(&5.7, &unit), 6.0);
    assert_eq!(previous_engineering_value(&5.0, &unit), 4.0);
    assert_eq!(previous_engineering_value(&5.7, &unit), 5.0);
    assert_eq!(next_engineering_value(&0.0, &unit), 1.0);
    assert_eq!(previous_engineering_value(&0.0, &unit), -1.0);

    assert_eq!(current_engineering_value(&-5.5, &unit), -6.0);
    assert_eq!(current_engineering_value(&-5.0, &unit), -5.0);
    assert_eq!(next_engineering_value(&-5.5, &unit), -5.0);
    assert_eq!(previous_engineering_value(&-5.0, &unit), -6.0);
}

#[test]
fn test_engineering_grids() {
    let triples = EngineeringSet::single(3.0).unwrap();
    assert_eq!(current_engineering_value(&7.0, &triples), 6.0);
    assert_eq!(next_engineering_value(&6.0, &triples), 9.0);
    assert_eq!(previous_engineering_value(&6.0, &triples), 3.0);
    assert_eq!(previous_engineering_value(&3.0, &triples), 0.0);
    assert_eq!(next_engineering_value(&0.0, &triples), 3.0);

    let mixed = EngineeringSet::new(vec![3.0, 10.0]).unwrap();
    assert_eq!(mixed.steps(), &[10.0, 3.0]);
    assert_eq!(current_engineering_value(&12.0, &mixed), 10.0);
    assert_eq!(next_engineering_value(&9.0, &mixed), 10.0);
    assert_eq!(next_engineering_value(&10.0, &mixed), 13.0);
    assert_eq!(previous_engineering_value(&10.0, &mixed), 9.0);
    assert_eq!(previous_engineering_value(&13.0, &mixed), 10.0);
    assert_eq!(previous_engineering_value(&9.0, &mixed), 6.0);

    // the successor of any bucket value is strictly above it
    for value in [0.0, 0.4, 3.0, 9.0, 11.5, 26.0, 100.3] {
        let current = current_engineering_value(&value, &mixed);
        assert!(next_engineering_value(&current, &mixed) > current);
    }

    assert_eq!(
        EngineeringSet::<f64>::new(vec![]).unwrap_err(),
        DomainError::EmptySteps
    );
    assert_eq!(
        EngineeringSet::new(vec![0.0]).unwrap_err(),
        DomainError::NonPositiveStep
    );
    assert_eq!(
        EngineeringSet::new(vec![1.0, -2.0]).unwrap_err(),
        DomainError::NonPositiveStep
    );
}

#[test]
fn test_scientifify() {
    let split = scientifify(&2357.0, &10.0).unwrap();
    assert!(close(split.mantissa, 2.357, 1e-9));
    assert_eq!(split.exponent, 3.0);

    let negative = scientifify(&-2357.0, &10.0).unwrap();
    assert!(close(negative.mantissa, -2.357, 1e-9));
    assert_eq!(negative.exponent, 3.0);

    let small = scientifify(&0.02, &10.0).unwrap();
    assert!(close(small.mantissa, 2.0, 1e-9));
    assert_eq!(small.exponent, -2.0);

    // round trips and mantissa bounds
    for value in [1.0, 2.5, 42.0, 999.9, 123456.0, 0.004, 7.2e30] {
        let split = scientifify(&value, &10.0).unwrap();
        assert!(split.mantissa >= 1.0 && split.mantissa < 10.0);
        assert!(close(split.reconstruct(&10.0), value, 1e-9));
    }

    // exponents never decrease as the value grows
    let values = [0.5, 1.0, 5.0, 42.0, 999.9, 1000.0, 123456.0, 1e20];
    let mut last = f64::NEG_INFINITY;
    for value in values {
        let split = scientifify(&value, &10.0).unwrap();
        assert!(split.exponent >= last);
        last = split.exponent;
    }
}

#[test]
fn test_scientifify_boundaries() {
    let zero = scientifify(&0.0, &10.0).unwrap();
    assert_eq!(zero.mantissa, 0.0);
    assert_eq!(zero.exponent, f64::NEG_INFINITY);

    let infinite = scientifify(&f64::INFINITY, &10.0).unwrap();
    assert_eq!(infinite.mantissa, f64::INFINITY);
    assert_eq!(infinite.exponent, f64::INFINITY);

    let undefined = scientifify(&f64::NAN, &10.0).unwrap();
    assert!(undefined.mantissa.is_nan() && undefined.exponent.is_nan());

    assert_eq!(
        scientifify(&5.0, &1.2).unwrap_err(),
        DomainError::ConvergentBase
    );
    assert_eq!(
        scientifify(&5.0, &0.9).unwrap_err(),
        DomainError::BaseTooSmall
    );
    assert_eq!(
        scientifify(&5.0, &1.0).unwrap_err(),
        DomainError::BaseTooSmall
    );
}

#[test]
fn test_scientifify_configured() {
    let unit = EngineeringSet::default();
    let triples = EngineeringSet::single(3.0).unwrap();

    // engineering grid of 3, like classic engineering notation
    let split =
        scientifify_with(&1e5, &10.0, &Rounding::None, &0.0, &triples, &1.0).unwrap();
    assert_eq!(split.exponent, 3.0);
    assert!(close(split.mantissa, 100.0, 1e-9));

    // rounding can push the mantissa over the bucket edge
    let rounded = scientifify_with(
        &999_900.0,
        &10.0,
        &Rounding::Multiple(1.0),
        &0.0,
        &unit,
        &1.0,
    )
    .unwrap();
    assert_eq!(rounded.mantissa, 1.0);
    assert_eq!(rounded.exponent, 6.0);

    // mantissa power shifts the mantissa window up a decade
    let shifted =
        scientifify_with(&2357.0, &10.0, &Rounding::None, &1.0, &unit, &1.0).unwrap();
    assert!(close(shifted.mantissa, 23.57, 1e-9));
    assert_eq!(shifted.exponent, 2.0);

    // the exponent multiplier scales the reported exponent
    let scaled =
        scientifify_with(&2357.0, &10.0, &Rounding::None, &0.0, &unit, &2.0).unwrap();
    assert!(close(scaled.mantissa, 2.357, 1e-9));
    assert_eq!(scaled.exponent, 6.0);
}

#[test]
fn test_rounding() {
    assert_eq!(Rounding::<f64>::None.apply(&2.3), 2.3);
    assert_eq!(Rounding::Multiple(0.5).apply(&2.3), 2.5);
    assert_eq!(Rounding::Multiple(0.0).apply(&2.3), 2.3);
    assert_eq!(Rounding::Multiple(-1.0).apply(&2.3), 2.3);

    let coarser_when_large = |value: &f64| if *value < 10.0 { 1.0 } else { 10.0 };
    let rounding = Rounding::Custom(&coarser_when_large);
    assert_eq!(rounding.apply(&7.4), 7.0);
    assert_eq!(rounding.apply(&74.0), 70.0);
}

#[test]
fn test_hyperscientifify() {
    // hyperexponents near zero come back untouched
    let direct = hyperscientifify(&1e9, &10.0).unwrap();
    assert_eq!(direct.mantissa, 1e9);
    assert_eq!(direct.exponent, 0.0);
    assert!(close(direct.reconstruct(&10.0), 1e9, 1e-9));

    let zero = hyperscientifify(&0.0, &10.0).unwrap();
    assert_eq!(zero.mantissa, 0.0);
    assert_eq!(zero.exponent, 0.0);

    // a fine grid narrows the window enough to exercise the slog snap
    let eighths = EngineeringSet::single(0.125).unwrap();
    let split = hyperscientifify_with(
        &1e10,
        &10.0,
        &Rounding::None,
        &0.0,
        &eighths,
        &1.0,
        &1.0,
    )
    .unwrap();
    assert!(close(split.mantissa, 1.0, 1e-9));
    assert_eq!(split.exponent, 2.0);
    assert!(close(split.reconstruct(&10.0), 1e10, 1e-9));

    // convergent towers report their limit instead of looping
    let convergent = hyperscientifify(&5.0, &1.3).unwrap();
    assert!(convergent.exponent.is_infinite());
    assert!(close(convergent.mantissa, 1.4707, 1e-3));

    let infinite = hyperscientifify(&f64::INFINITY, &10.0).unwrap();
    assert_eq!(infinite.mantissa, f64::INFINITY);
    assert_eq!(infinite.exponent, f64::INFINITY);
}

#[test]
fn test_hypersplit_plain_and_scientific() {
    let options = HypersplitOptions::<f64>::default();

    let plain = hypersplit(&2357.0, &options).unwrap();
    assert_eq!(plain.mantissa, 2357.0);
    assert_eq!(plain.exponent, 0.0);
    assert_eq!(plain.tetration, 0.0);
    assert_eq!(plain.pentation, 0.0);

    let scientific = hypersplit(&5e15, &options).unwrap();
    assert!(close(scientific.mantissa, 5.0, 1e-9));
    assert_eq!(scientific.exponent, 15.0);
    assert_eq!(scientific.tetration, 0.0);

    let negative = hypersplit(&-5e15, &options).unwrap();
    assert!(close(negative.mantissa, -5.0, 1e-9));
    assert_eq!(negative.exponent, 15.0);

    // beneath min_value the exponent goes negative instead of vanishing
    let tiny = hypersplit(&1e-8, &options).unwrap();
    assert!(close(tiny.mantissa, 1.0, 1e-9));
    assert_eq!(tiny.exponent, -8.0);
    assert_eq!(tiny.tetration, 0.0);

    let moderate = hypersplit(&0.5, &options).unwrap();
    assert_eq!(moderate.mantissa, 0.5);
    assert_eq!(moderate.exponent, 0.0);

    let zero = hypersplit(&0.0, &options).unwrap();
    assert_eq!(zero.mantissa, 0.0);
    assert_eq!(zero.tetration, 0.0);

    let infinite = hypersplit(&f64::INFINITY, &options).unwrap();
    assert_eq!(infinite.mantissa, f64::INFINITY);
    assert_eq!(infinite.exponent, 0.0);
}

#[test]
fn test_hypersplit_tetration() {
    let options = HypersplitOptions {
        maximums: [10.0, 10.0, 10.0],
        original_maximums: [10.0, 10.0, 10.0],
        ..HypersplitOptions::default()
    };

    // 1e100 sits between 10^^2 = 1e10 and 10^^3
    let split = hypersplit(&1e100, &options).unwrap();
    assert!(close(split.mantissa, 2.0, 1e-9));
    assert_eq!(split.exponent, 0.0);
    assert_eq!(split.tetration, 2.0);
    assert_eq!(split.pentation, 0.0);
    assert!(close(
        10.0.iteratedexp(&split.tetration, &split.mantissa),
        1e100,
        1e-9
    ));

    // under the exponent cap the exponent level holds it alone
    let held = hypersplit(&2.357e9, &options).unwrap();
    assert!(close(held.mantissa, 2.357, 1e-9));
    assert_eq!(held.exponent, 9.0);
    assert_eq!(held.tetration, 0.0);
}

#[test]
fn test_hypersplit_level_configuration() {
    let safe = 9007199254740991.0;

    // mantissa disabled: unit mantissa, exact fractional exponent
    let log_form = HypersplitOptions {
        maximums: [1.0, safe, safe],
        original_maximums: [1.0, safe, safe],
        ..HypersplitOptions::default()
    };
    let split = hypersplit(&1000.0, &log_form).unwrap();
    assert_eq!(split.mantissa, 1.0);
    assert_eq!(split.exponent, 3.0);
    assert_eq!(split.tetration, 0.0);

    // exponent disabled: the mantissa cap hands off straight to tetration
    let tower_form = HypersplitOptions {
        maximums: [1e12, 1.0, safe],
        original_maximums: [1e12, 1.0, safe],
        ..HypersplitOptions::default()
    };
    let split = hypersplit(&1e15, &tower_form).unwrap();
    assert_eq!(split.exponent, 0.0);
    assert_eq!(split.tetration, 2.0);
    assert!(close(split.mantissa, 15f64.log10(), 1e-9));

    // rounding at the very top of the plain range rolls into the exponent
    let rounded_form = HypersplitOptions {
        rounding: Rounding::Multiple(1.0),
        ..HypersplitOptions::default()
    };
    let split = hypersplit(&999_999_999_999.7, &rounded_form).unwrap();
    assert_eq!(split.mantissa, 1.0);
    assert_eq!(split.exponent, 12.0);

    assert_eq!(
        hypersplit(&5.0, &HypersplitOptions { base: 1.2, ..HypersplitOptions::default() })
            .unwrap_err(),
        DomainError::ConvergentBase
    );
}

#[test]
fn test_factorial_family() {
    assert!(close(factorial(&5.0), 120.0, 1e-9));
    assert!(close(factorial(&0.0), 1.0, 1e-9));
    assert!(close(factorial(&0.5), 0.8862269254527581, 1e-9));

    assert!(close(iterated_factorial(&3.0, &2.0).unwrap(), 720.0, 1e-9));
    assert!(close(iterated_factorial(&5.0, &1.0).unwrap(), 120.0, 1e-9));
    assert_eq!(iterated_factorial(&5.0, &0.0).unwrap(), 5.0);

    // fractional counts stay between the neighboring whole counts
    let partial = iterated_factorial(&5.0, &1.5).unwrap();
    assert!(partial > 120.0 && partial < factorial(&120.0));

    assert!(close(inverse_factorial(&120.0, &1.0).unwrap(), 5.0, 1e-9));
    assert!(close(inverse_factorial(&720.0, &2.0).unwrap(), 3.0, 1e-6));
    assert_eq!(
        inverse_factorial(&0.5, &1.0).unwrap_err(),
        DomainError::BelowDomainMinimum
    );

    let twice = iterated_factorial(&3.0, &2.0).unwrap();
    assert!(close(factorial_slog(&twice, &3.0).unwrap(), 2.0, 1e-6));
    assert!(close(factorial_slog(&120.0, &5.0).unwrap(), 1.0, 1e-6));
    assert_eq!(
        factorial_slog(&10.0, &2.0).unwrap_err(),
        DomainError::BaseTooSmall
    );
    assert_eq!(
        factorial_slog(&1.5, &3.0).unwrap_err(),
        DomainError::BelowDomainMinimum
    );
}

#[test]
fn test_polygon_family() {
    assert_eq!(polygon(&6.0, &3.0), 21.0);
    assert_eq!(polygon(&5.0, &4.0), 25.0);
    assert!(close(polygon_root(&21.0, &3.0).unwrap(), 6.0, 1e-9));
    assert!(close(polygon_root(&25.0, &4.0).unwrap(), 5.0, 1e-9));
    assert_eq!(
        polygon_root(&10.0, &2.0).unwrap_err(),
        DomainError::TooFewSides
    );

    assert!(close(bi_polygon(&2.0, &3.0).unwrap(), 6.0, 1e-9));
    assert!(close(bi_polygon(&3.0, &3.0).unwrap(), 21.0, 1e-9));
    assert!(close(bi_polygon_root(&21.0, &3.0).unwrap(), 3.0, 1e-9));
    assert_eq!(
        bi_polygon_root(&0.5, &3.0).unwrap_err(),
        DomainError::BelowDomainMinimum
    );

    // 2 -> 3 -> 6 -> 21 -> 231 -> 26796 -> 359026206 is six applications
    assert!(close(tri_polygon(&2.0, &3.0).unwrap(), 359026206.0, 1e-9));
    assert!(close(
        tri_polygon_root(&359026206.0, &3.0).unwrap(),
        2.0,
        1e-9
    ));
}

#[test]
fn test_iterated_polygon_roots() {
    assert!(close(
        iterated_polygon_root(&21.0, &3.0, &1.0).unwrap(),
        6.0,
        1e-9
    ));
    assert!(close(
        iterated_polygon_root(&21.0, &3.0, &2.0).unwrap(),
        3.0,
        1e-9
    ));

    // fractional counts are chaotic for few-sided polygons
    assert!(iterated_polygon_root(&100.0, &3.0, &1.5).unwrap().is_nan());
    let stable = iterated_polygon_root(&100.0, &8.0, &1.5).unwrap();
    assert!(stable.is_finite());
    let shallower = iterated_polygon_root(&100.0, &8.0, &1.0).unwrap();
    let deeper = iterated_polygon_root(&100.0, &8.0, &2.0).unwrap();
    assert!(stable < shallower && stable > deeper);

    assert!(close(
        iterated_bi_polygon_root(&21.0, &3.0, &2.0).unwrap(),
        1.0,
        1e-9
    ));
    assert!(iterated_bi_polygon_root(&50.0, &3.0, &1.5).unwrap().is_nan());
}

#[test]
fn test_hyperreal_f64() {
    assert!(close(10.0.iteratedexp(&2.0, &1.0), 1e10, 1e-9));
    assert!(close(1e10.slog(&10.0), 2.0, 1e-9));
    assert!(close(1e100.iteratedlog(&10.0, &2.0), 2.0, 1e-9));
    assert!(close(2.0.tetrate(&2.5, &1.0), 2f64.powf(2f64.powf(2f64.powf(0.5))), 1e-9));
    assert!((-1.0).slog(&10.0).is_nan());
    assert_eq!(0.0.slog(&10.0), -1.0);
    assert!(2.0.is_integer());
    assert!(!2.5.is_integer());
}
