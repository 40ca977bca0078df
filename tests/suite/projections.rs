//! Serialization and debug projections

use magic_core::{AttributeBag, Plain, Value};

use crate::common::{ComputingBag, MutatingBag, birthday, colin};

#[test]
fn serializes_stored_attributes_only() {
    let mut bag = AttributeBag::<ComputingBag>::new(colin());
    bag.record("greeting", |_, _| Some(Value::from("hi")));

    let json = serde_json::to_value(&bag).unwrap();
    let fields = json.as_object().unwrap();
    assert_eq!(fields.len(), 2);
    assert_eq!(
        json["name"],
        serde_json::json!({ "type": "text", "value": "Colin" })
    );
    assert_eq!(json["birthday"]["type"], "date");
}

#[test]
fn unserializes_into_an_equivalent_bag() {
    let json = AttributeBag::<Plain>::new(colin()).to_json().unwrap();
    let mut decoded = AttributeBag::<Plain>::from_json(&json).unwrap();

    assert_eq!(decoded.get("name"), Some(Value::from("Colin")));
    assert_eq!(decoded.get("birthday"), Some(Value::from(birthday())));
    assert_eq!(decoded.call("greeting", &[]), None);
}

#[test]
fn round_trip_preserves_raw_reads_after_writes() {
    let mut bag = AttributeBag::<MutatingBag>::new(colin());
    bag.set("birthday", "1981-02-28");
    bag.unset("name");

    let decoded: AttributeBag<MutatingBag> =
        serde_json::from_str(&serde_json::to_string(&bag).unwrap()).unwrap();

    assert_eq!(decoded.to_attributes(), bag.to_attributes());
    assert_eq!(decoded.raw("birthday"), bag.raw("birthday"));
    assert!(decoded.raw("name").is_none());
}

#[test]
fn round_trip_keeps_nested_values() {
    let mut attributes = colin();
    attributes.insert(
        "address".to_string(),
        Value::Map(magic_types::attributes([("city", "Halifax")])),
    );
    attributes.insert(
        "scores".to_string(),
        Value::List(vec![Value::Int(1), Value::Float(2.5), Value::Null]),
    );

    let json = AttributeBag::<Plain>::new(attributes.clone()).to_json().unwrap();
    let decoded = AttributeBag::<Plain>::from_json(&json).unwrap();
    assert_eq!(decoded.to_attributes(), attributes);
}

#[test]
fn debug_projection_includes_mutated_and_computed_values() {
    let mutating = AttributeBag::<MutatingBag>::new(colin()).debug_attributes();
    assert_eq!(mutating["name"], Value::from("COLIN"));
    assert_eq!(mutating["birthday"], Value::from(birthday()));

    let computing = AttributeBag::<ComputingBag>::new(colin());
    let projection = computing.debug_attributes();
    assert!(projection["age"].as_i64().is_some());
    assert_eq!(projection.len(), 3);
    assert_eq!(computing.len(), 2);
}

#[test]
fn debug_format_renders_projection() {
    let bag = AttributeBag::<MutatingBag>::new(colin());
    let rendered = format!("{bag:?}");
    assert!(rendered.starts_with("{\"name\": Text(\"COLIN\")"), "{rendered}");
}

#[test]
fn round_trip_keeps_float_bits() {
    let floats = [
        1.0715660391465826e-75,
        0.1 + 0.2,
        f64::MIN_POSITIVE,
        5e-324,
        f64::MAX,
        -1.0 / 3.0,
        2.0_f64.sqrt(),
    ];
    let attributes = magic_types::attributes(
        floats
            .iter()
            .enumerate()
            .map(|(index, float)| (format!("f{index}"), Value::Float(*float))),
    );

    let json = AttributeBag::<Plain>::new(attributes).to_json().unwrap();
    let decoded = AttributeBag::<Plain>::from_json(&json).unwrap();

    for (index, float) in floats.iter().enumerate() {
        let stored = decoded.raw(&format!("f{index}")).and_then(Value::as_f64);
        assert_eq!(stored.map(f64::to_bits), Some(float.to_bits()), "{float:e}");
    }
}

#[test]
fn non_finite_floats_do_not_serialize() {
    let mut attributes = colin();
    attributes.insert(
        "scores".to_string(),
        Value::List(vec![Value::Float(1.0), Value::Float(f64::NEG_INFINITY)]),
    );
    let bag = AttributeBag::<Plain>::new(attributes);

    assert!(bag.to_json().is_err());
    assert!(serde_json::to_string(&bag).is_err());
}
