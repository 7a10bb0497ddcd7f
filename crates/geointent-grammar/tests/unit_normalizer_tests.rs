use geointent_grammar::{parse_distance, parse_duration, DurationParseError, UnitParseError};

fn assert_all_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "got {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

#[test]
fn test_distances_in_declaration_order() {
    assert_all_close(&parse_distance("1 kilometer 2 m").unwrap(), &[1000.0, 2.0]);
}

#[test]
fn test_foot_mark() {
    assert_all_close(&parse_distance("100'").unwrap(), &[30.48]);
}

#[test]
fn test_feet_then_inches() {
    assert_all_close(&parse_distance("100 ft 1in").unwrap(), &[30.48, 0.0254]);
}

#[test]
fn test_miles_convert_to_meters() {
    assert_all_close(&parse_distance("10 miles").unwrap(), &[16093.4]);
}

#[test]
fn test_no_distance_is_an_error() {
    assert_eq!(
        parse_distance("somewhere nearby"),
        Err(UnitParseError {
            input: "somewhere nearby".to_string()
        })
    );
}

#[test]
fn test_duration_components_are_summed() {
    assert_eq!(parse_duration("1 hour 10 minute 30 second").unwrap(), 4230.0);
}

#[test]
fn test_clock_durations() {
    assert_eq!(parse_duration("1:02").unwrap(), 3720.0);
    assert_eq!(parse_duration("10:09:08").unwrap(), 36548.0);
}

#[test]
fn test_out_of_range_clock_is_rejected() {
    assert_eq!(
        parse_duration("1:75"),
        Err(DurationParseError {
            input: "1:75".to_string()
        })
    );
    assert!(parse_duration("2:30:99").is_err());
}

#[test]
fn test_bad_duration() {
    assert_eq!(
        parse_duration("bad input"),
        Err(DurationParseError {
            input: "bad input".to_string()
        })
    );
}
