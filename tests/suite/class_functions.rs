//! Class functions shared across bags and specializations
//!
//! The registry is process-wide, so every test registers unique names.

use magic_core::{AttributeBag, ClassFunctions, Plain, Value};

use crate::common::{ComputingBag, MutatingBag, colin};

#[test]
fn registered_function_is_callable_statically() {
    AttributeBag::<Plain>::register_function("suite_day_of_week", |args| {
        let date = args.first()?.as_date()?;
        Some(Value::from(date.format("%A").to_string()))
    });

    let birthday = colin()["birthday"].clone();
    assert_eq!(
        AttributeBag::<Plain>::call_static("suite_day_of_week", &[birthday]),
        Some(Value::from("Tuesday"))
    );
}

#[test]
fn registration_is_visible_to_every_specialization() {
    let before = AttributeBag::<MutatingBag>::new(colin());

    AttributeBag::<ComputingBag>::register_function("suite_shared", |_| Some(Value::Int(7)));

    let after = AttributeBag::<Plain>::new(colin());
    assert_eq!(
        AttributeBag::<MutatingBag>::call_static("suite_shared", &[]),
        Some(Value::Int(7))
    );
    assert_eq!(
        AttributeBag::<Plain>::call_static("suite_shared", &[]),
        Some(Value::Int(7))
    );
    assert!(ClassFunctions::global().contains("suite_shared"));
    drop((before, after));
}

#[test]
fn unknown_static_call_is_silent() {
    assert_eq!(AttributeBag::<Plain>::call_static("suite_nope", &[]), None);
}

#[test]
fn recordings_and_class_functions_do_not_mix() {
    let mut bag: AttributeBag = AttributeBag::new(colin());
    bag.record("suite_only_recorded", |_, _| Some(Value::Bool(true)));
    AttributeBag::<Plain>::register_function("suite_only_registered", |_| Some(Value::Bool(true)));

    assert_eq!(AttributeBag::<Plain>::call_static("suite_only_recorded", &[]), None);
    assert_eq!(bag.call("suite_only_registered", &[]), None);
}
