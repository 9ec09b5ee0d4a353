use lazyreport_core::{FieldStore, ReportError, Template};

#[test]
fn self_reading_field_is_rejected() {
    let report = FieldStore::new(Template::<i32>::new().derived("A", |report| report.get("A")));

    let err = report.get("A").expect_err("self read must fail");
    assert_eq!(
        err,
        ReportError::CyclicDependency {
            field: "A".to_string(),
            stack: vec!["A".to_string(), "A".to_string()],
        }
    );
    assert!(!report.is_cached("A").expect("A is known"));
}

#[test]
fn indirect_cycle_reports_the_chain() {
    let report = FieldStore::new(
        Template::<i32>::new()
            .derived("A", |report| report.get("B"))
            .derived("B", |report| report.get("C"))
            .derived("C", |report| report.get("A")),
    );

    let err = report.get("B").expect_err("cycle must fail");
    assert_eq!(
        err,
        ReportError::CyclicDependency {
            field: "B".to_string(),
            stack: ["B", "C", "A", "B"].iter().map(|name| name.to_string()).collect(),
        }
    );
    assert_eq!(err.to_string(), "cyclic dependency on field \"B\": B -> C -> A -> B");
}

#[test]
fn store_stays_usable_after_cycle_error() {
    let mut report = FieldStore::new(
        Template::new()
            .stored("X", 1)
            .derived("A", |report| report.get("B"))
            .derived("B", |report| report.get("A"))
            .derived("Y", |report| Ok(report.get("X")? + 1)),
    );

    report.get("A").expect_err("cycle must fail");
    assert_eq!(report.get("Y").expect("Y computes"), 2);

    report.set("X", 5).expect("X is stored");
    assert_eq!(report.get("Y").expect("Y recomputes"), 6);
    report.get("B").expect_err("cycle must still fail");
}

#[test]
fn derivation_can_recover_from_nested_failure() {
    let report = FieldStore::new(
        Template::new()
            .stored("fallback", 7)
            .derived("broken", |report| report.get("broken"))
            .derived("safe", |report| match report.get("broken") {
                Ok(value) => Ok(value),
                Err(ReportError::CyclicDependency { .. }) => report.get("fallback"),
                Err(other) => Err(other),
            }),
    );

    assert_eq!(report.get("safe").expect("safe falls back"), 7);
    assert!(!report.is_cached("broken").expect("broken is known"));
}
