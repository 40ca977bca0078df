//! Attribute reads, writes, existence checks and removal

use chrono::{Datelike, Utc};
use magic_core::{AttributeBag, Plain, Value};

use crate::common::{ComputingBag, MutatingBag, birthday, colin};

fn expected_age() -> i64 {
    let today = Utc::now().date_naive();
    let born = birthday();
    let mut age = i64::from(today.year() - born.year());
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

#[test]
fn sets_attributes_when_constructed() {
    let bag: AttributeBag = AttributeBag::new(colin());
    assert_eq!(bag.get("name"), Some(Value::from("Colin")));
    assert_eq!(bag.get("birthday"), Some(Value::from(birthday())));
}

#[test]
fn missing_attribute_reads_as_none() {
    let bag: AttributeBag = AttributeBag::new(colin());
    assert_eq!(bag.get("not_there"), None);
}

#[test]
fn getter_mutates_the_attribute() {
    let bag = AttributeBag::<MutatingBag>::new(colin());
    assert_eq!(bag.get("name"), Some(Value::from("COLIN")));
}

#[test]
fn getter_computes_virtual_attribute() {
    let bag = AttributeBag::<ComputingBag>::new(colin());
    assert_eq!(bag.get("age"), Some(Value::Int(expected_age())));
    assert!(bag.raw("age").is_none());
}

#[test]
fn updates_existing_attribute_without_new_keys() {
    let mut bag: AttributeBag = AttributeBag::new(colin());
    bag.set("name", "Colin DeCarlo");

    assert_eq!(bag.get("name"), Some(Value::from("Colin DeCarlo")));
    let keys: Vec<&str> = bag.keys().collect();
    assert_eq!(keys, ["name", "birthday"]);
}

#[test]
fn does_not_allow_new_attributes_at_runtime() {
    let mut bag: AttributeBag = AttributeBag::new(colin());
    assert_eq!(bag.get("weight"), None);

    bag.set("weight", 165);

    assert_eq!(bag.get("weight"), None);
    assert_eq!(bag.to_attributes(), colin());
}

#[test]
fn setter_modifies_the_value_being_set() {
    let mut bag = AttributeBag::<MutatingBag>::new(colin());
    bag.set("birthday", "1981-02-28");

    let stored = bag.get("birthday").and_then(|value| value.as_date()).unwrap();
    assert_eq!(stored.format("%Y-%m-%d").to_string(), "1981-02-28");
}

#[test]
fn setter_does_not_widen_the_key_set() {
    let mut bag = AttributeBag::<MutatingBag>::new(colin());
    bag.unset("birthday");
    bag.set("birthday", "1981-02-28");
    assert_eq!(bag.get("birthday"), None);
}

#[test]
fn confirms_when_attributes_exist() {
    let bag: AttributeBag = AttributeBag::new(colin());
    assert!(bag.isset("name"));
    assert!(!bag.isset("nope"));
}

#[test]
fn confirms_when_computed_attributes_exist() {
    let bag = AttributeBag::<ComputingBag>::new(colin());
    assert!(bag.isset("age"));
    assert!(!AttributeBag::<Plain>::new(colin()).isset("age"));
}

#[test]
fn allows_attributes_to_be_removed() {
    let mut bag: AttributeBag = AttributeBag::new(colin());
    assert!(bag.isset("name"));

    bag.unset("name");

    assert!(!bag.isset("name"));
    assert_eq!(bag.get("name"), None);
}

#[test]
fn computed_attributes_survive_removal() {
    let mut bag = AttributeBag::<ComputingBag>::new(colin());
    bag.unset("age");
    assert!(bag.isset("age"));

    bag.unset("birthday");
    assert!(bag.isset("age"));
    assert_eq!(bag.get("age"), None);
}
