//! End-to-end validation scenarios over the default MCEB table.

use proptest::prelude::*;
use sfaf_core::{FieldNumber, FieldSpecTable, Record, MCEB_FIELDS};
use sfaf_rules::{SfafValidator, Severity, SeverityPolicy};

fn validator() -> SfafValidator {
    SfafValidator::mceb()
        .expect("MCEB rules compile")
        .with_reference_year(2026)
}

fn field(n: u16) -> FieldNumber {
    FieldNumber::new(n).unwrap()
}

fn summary(json: &str) -> sfaf_rules::FormValidationSummary {
    let record: Record = serde_json::from_str(json).unwrap();
    validator().validate_all(&record)
}

#[test]
fn classification_x_is_rejected_with_valid_values() {
    let s = summary(r#"{"field005": "X"}"#);
    assert!(!s.is_valid());
    assert!(s.errors.iter().any(|e| e.contains("U, UE, C, S")), "{:?}", s.errors);
}

#[test]
fn classification_s_is_accepted() {
    let s = summary(r#"{"field005": "S"}"#);
    assert!(s.is_valid());
    assert!(s.errors.is_empty());
}

#[test]
fn frequency_with_reference_is_accepted() {
    assert!(summary(r#"{"field110": "K4726.5(4725)"}"#).is_valid());
}

#[test]
fn frequency_with_two_decimal_points_is_rejected() {
    assert!(!summary(r#"{"field110": "4726.5.5"}"#).is_valid());
}

#[test]
fn coordinates_compact_form_only() {
    let v = validator();
    assert!(v.validate(field(303), "303000N0865000W").valid);
    assert!(!v.validate(field(303), "30N086W").valid);
    assert!(v.validate(field(403), "303000N0865000W").valid);
}

#[test]
fn coordinates_past_the_pole_or_antimeridian_are_rejected() {
    let v = validator();
    assert!(v.validate(field(303), "900000N0865000W").valid);
    assert!(!v.validate(field(303), "903000N0865000W").valid);
    assert!(v.validate(field(403), "303000N1800000E").valid);
    assert!(!v.validate(field(403), "303000N1803000E").valid);
    assert!(!v.validate(field(403), "303000N1800001W").valid);
}

#[test]
fn numeric_fields_accept_ascii_digits_only() {
    let v = validator();
    for (n, value) in [
        (110, "٤٧٢٦"),
        (110, "K٤٧"),
        (114, "١٦K0F3E"),
        (115, "K١٠"),
        (306, "٣٠"),
        (357, "١٢"),
        (457, "１２"),
    ] {
        assert!(!v.validate(field(n), value).valid, "field {n} accepted {value}");
    }
    assert!(v.validate(field(110), "K4726").valid);
    assert!(v.validate(field(114), "16K0F3E").valid);
    assert!(v.validate(field(306), "30").valid);
}

#[test]
fn percent_time_rejects_signed_numbers() {
    let v = validator();
    assert!(v.validate(field(131), "5").valid);
    assert!(!v.validate(field(131), "+5").valid);
}

#[test]
fn open_lists_warn_closed_lists_fail() {
    let v = validator();
    for (n, value) in [(113, "ZZ"), (300, "QQ"), (400, "QQ"), (500, "Z999"), (511, "UNDERWATER BASKETRY")] {
        let r = v.validate(field(n), value);
        assert!(r.valid, "field {n} should only warn");
        assert_eq!(r.warnings.len(), 1, "field {n}");
    }
    for (n, value) in [(5, "Q"), (10, "Z"), (116, "X"), (200, "USSF"), (363, "Q")] {
        assert!(!v.validate(field(n), value).valid, "field {n} should fail");
    }
}

#[test]
fn severity_policy_hardens_station_class() {
    let policy = SeverityPolicy::new().with_override(field(113), Severity::Error);
    let v = validator().with_policy(policy);
    assert!(!v.validate(field(113), "ZZ").valid);
    assert!(v.validate(field(113), "FB").valid);
}

#[test]
fn well_formed_record_is_clean() {
    let s = summary(
        r#"{
            "field005": "U",
            "field010": "N",
            "field102": "AF 192345",
            "field110": "M225.8",
            "field113": ["MO", "FB"],
            "field114": ["16K0F3E", "A3E"],
            "field115": ["W50", "K1"],
            "field200": "USAF",
            "field300": "TX",
            "field301": "FORT HOOD",
            "field303": "310800N0974600W",
            "field340": "G,AN/PRC-117(F)",
            "field500": ["C010", "L116"],
            "field511": "AIR OPERATIONS",
            "field512": "AIR TRAFFIC CONTROL",
            "field140": "20260115"
        }"#,
    );
    assert!(s.is_valid(), "{s}");
    assert!(s.warnings.is_empty(), "{s}");
    assert_eq!(s.total_fields, 16);
}

/// Fields with only generic length checks.
const PLAIN_FIELDS: &[u16] = &[13, 204, 205, 206, 207, 701, 702, 801, 803, 804];

proptest! {
    #![proptest_config(ProptestConfig { max_global_rejects: 16384, ..ProptestConfig::default() })]

    #[test]
    fn max_length_boundary(idx in 0..PLAIN_FIELDS.len(), seed in "[A-Z0-9]{1,60}") {
        let v = validator();
        let f = field(PLAIN_FIELDS[idx]);
        let max = v.table().lookup(f).unwrap().max_length;
        let at_limit: String = seed.chars().cycle().take(max).collect();
        let over_limit: String = seed.chars().cycle().take(max + 1).collect();
        prop_assert!(v.validate(f, &at_limit).valid);
        prop_assert!(!v.validate(f, &over_limit).valid);
    }

    #[test]
    fn allowed_values_decide_validity(idx in 0..MCEB_FIELDS.len(), value in "[A-Za-z]{1,6}") {
        let spec = &MCEB_FIELDS[idx];
        prop_assume!(!spec.allowed_values.is_empty());
        let v = validator();
        let expected = spec.allowed_values.contains(&value.to_uppercase().as_str());
        prop_assert_eq!(v.validate(spec.number, &value).valid, expected);
    }

    #[test]
    fn validation_never_panics(n in 0u16..=999, value in ".{0,80}") {
        let v = validator();
        let r = v.validate(field(n), &value);
        prop_assert_eq!(r.valid, r.errors.is_empty());
    }
}

#[test]
fn required_fields_configured_at_startup() {
    let mut table = FieldSpecTable::mceb();
    table.require(field(5));
    let v = SfafValidator::new(table).unwrap();
    let s = v.validate_all(&Record::new());
    assert_eq!(s.invalid_fields, 1);
}
