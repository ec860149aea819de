//! End-to-end exercises of the public `VersionValue` surface, mirroring the
//! seed scenarios used to design the algebra.

use verset::VersionValue;

fn v(s: &str) -> VersionValue {
    s.parse().expect("valid constructor input")
}

#[test]
fn prefix_satisfaction_is_asymmetric() {
    assert!(v("4.7.3").satisfies(&v("4.7")));
    assert!(!v("4.7").satisfies(&v("4.7.3")));
}

#[test]
fn range_satisfaction_extra_clause() {
    assert!(v("4.5:4.7").satisfies(&v("4.7.3:4.8")));
    assert!(!v("4.7.3:4.8").satisfies(&v("4.5:4.7")));
}

#[test]
fn union_merges_integer_adjacent_ranges() {
    assert_eq!(v("1.0:1.5").union(&v("1.6:2.0")).to_string(), "1.0:2.0");
}

#[test]
fn intersection_across_lists() {
    assert_eq!(
        v("1.0:2.0,3.0:4.0").intersection(&v("1.5:3.5")).to_string(),
        "1.5:2.0,3.0:3.5"
    );
}

#[test]
fn star_expansion_and_rejected_inequality() {
    assert_eq!(v("1.2.*").to_string(), "1.2:!1.3");
    assert!("1.2.*:1.5".parse::<VersionValue>().is_err());
}

#[test]
fn infinity_tokens_outrank_numeric_versions() {
    assert!(v("develop").less(&v("99.99.99")) == false);
    assert!(v("99.99.99").less(&v("develop")));
    assert!(v("develop").less(&v("main")));
}

#[test]
fn canonical_string_forms_round_trip() {
    for text in [
        "1.0",
        "1.0:2.0",
        "1.0:!2.0",
        "1.0!:2.0",
        "1.0!:!2.0",
        "1.0:",
        "1.0!:",
        ":2.0",
        ":!2.0",
        ":",
        "1.0:2.0,3.0",
    ] {
        let parsed = v(text);
        assert_eq!(parsed.to_string(), text, "round-trip failed for {text}");
    }
}

#[test]
fn serialized_form_reflects_concrete_vs_disjoint() {
    use verset::SerializedForm;

    let concrete = SerializedForm(v("1.2.3"));
    assert_eq!(
        serde_json::to_value(&concrete).unwrap(),
        serde_json::json!({"version": "1.2.3"})
    );

    let disjoint = SerializedForm(v("1.0:2.0,3.0"));
    assert_eq!(
        serde_json::to_value(&disjoint).unwrap(),
        serde_json::json!({"versions": ["1.0:2.0", "3.0"]})
    );
}

#[test]
fn plain_serde_uses_canonical_string() {
    let value = v("1.0:2.0,3.0");
    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(json, serde_json::json!("1.0:2.0,3.0"));

    let back: VersionValue = serde_json::from_value(json).unwrap();
    assert_eq!(back, value);
}

#[test]
fn algebraic_laws_hold_for_a_sample() {
    let samples = ["1.0", "1.0:2.0", "1.0:2.0,3.0:4.0", "develop", ":"];
    for text in samples {
        let x = v(text);
        assert!(x.satisfies(&x));
        assert!(x.contains(&x));
        assert_eq!(x.union(&x), x);
        assert_eq!(x.intersection(&x), x);
    }
}

#[test]
fn absorption_law_holds() {
    let x = v("1.0:3.0");
    let y = v("2.0:5.0");
    assert_eq!(x.union(&x.intersection(&y)), x);
    assert_eq!(x.intersection(&x.union(&y)), x);
}

#[test]
fn dynamic_json_ingestion_rejects_unrepresentable_shapes() {
    assert!(VersionValue::try_from(&serde_json::json!(true)).is_err());
    assert!(VersionValue::try_from(&serde_json::json!(null)).is_err());
    assert!(VersionValue::try_from(&serde_json::json!({"other": 1})).is_err());

    let from_string = VersionValue::try_from(&serde_json::json!("1.2.3")).unwrap();
    assert_eq!(from_string.to_string(), "1.2.3");

    let from_list = VersionValue::try_from(&serde_json::json!(["1.0:2.0", "3.0"])).unwrap();
    assert_eq!(from_list.to_string(), "1.0:2.0,3.0");
}

#[test]
fn constructor_from_integers() {
    let a: VersionValue = 4i64.into();
    let b: VersionValue = 7u64.into();
    assert_eq!(a.to_string(), "4");
    assert_eq!(b.to_string(), "7");
}

#[test]
fn from_iterator_builds_canonical_disjoint_list() {
    let combined: VersionValue = [v("3.0:4.0"), v("1.0:2.0"), v("1.6:1.9")].into_iter().collect();
    assert_eq!(combined.to_string(), "1.0:2.0,3.0:4.0");
}
