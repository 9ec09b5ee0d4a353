use lazyreport_core::{FieldKind, FieldStore, Template};
use serde_json::json;

fn sample() -> FieldStore<i32> {
    FieldStore::new(
        Template::new()
            .stored("A", 1)
            .derived("B", |report| Ok(report.get("A")? + 1))
            .derived("C", |report| Ok(report.get("B")? + report.get("A")?)),
    )
}

#[test]
fn fresh_snapshot_has_no_cache_or_edges() {
    let snapshot = sample().snapshot();

    assert_eq!(snapshot.fields.len(), 3);
    assert!(snapshot.cached_fields().is_empty());
    assert!(snapshot.fields.iter().all(|field| field.dependents.is_empty()));
    assert_eq!(
        snapshot.field("B").expect("B listed").kind,
        FieldKind::Derived
    );
}

#[test]
fn snapshot_reflects_reads_and_writes() {
    let mut report = sample();
    report.get("C").expect("C computes");

    let snapshot = report.snapshot();
    assert_eq!(snapshot.cached_fields(), vec!["A", "B", "C"]);
    assert_eq!(
        snapshot.field("A").expect("A listed").dependents,
        vec!["B".to_string(), "C".to_string()]
    );

    report.set("A", 2).expect("A is stored");
    assert_eq!(report.snapshot().cached_fields(), vec!["A"]);
}

#[test]
fn snapshot_serializes_to_json() {
    let report = sample();
    report.get("B").expect("B computes");

    let value = serde_json::to_value(report.snapshot()).expect("snapshot serializes");
    assert_eq!(
        value,
        json!({
            "fields": [
                { "name": "A", "kind": "stored", "cached": true, "dependents": ["B"] },
                { "name": "B", "kind": "derived", "cached": true, "dependents": [] },
                { "name": "C", "kind": "derived", "cached": false, "dependents": [] }
            ],
            "stats": { "computations": 1, "cache_hits": 0, "invalidated": 0 }
        })
    );
}
