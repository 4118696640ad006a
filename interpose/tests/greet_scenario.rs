//! End-to-end walk through attach, remove, disable on one method.

use interpose::Interceptor;
use std::sync::Arc;

mod common;
use common::Greeter;

#[test]
fn test_greet_walkthrough() {
    let interceptor: Interceptor<(), String, String> = Interceptor::new();
    let greeter = Greeter::new("Hi");

    let salutation = greeter.salutation.clone();
    interceptor
        .define(&greeter, "greet", move |_: &(), name: String| {
            format!("{salutation} {name}")
        })
        .unwrap();
    let original = interceptor.current(&greeter, "greet").unwrap();

    let a = interceptor
        .attach_fn(&greeter, "greet", |_, args, next| format!("A:{}", next.run(args)))
        .unwrap();
    let b = interceptor
        .attach_fn(&greeter, "greet", |_, args, next| format!("B:{}", next.run(args)))
        .unwrap();
    let greet = |registry: &Interceptor<(), String, String>| {
        registry.invoke(&greeter, "greet", &(), "Sam".into()).unwrap()
    };

    assert_eq!(greet(&interceptor), "B:A:Hi Sam");

    assert!(b.remove());
    assert_eq!(greet(&interceptor), "A:Hi Sam");

    a.off();
    assert_eq!(greet(&interceptor), "Hi Sam");
    assert!(interceptor.is_intercepted(&greeter, "greet"));

    assert!(a.remove());
    assert_eq!(greet(&interceptor), "Hi Sam");
    assert!(!interceptor.is_intercepted(&greeter, "greet"));
    assert!(Arc::ptr_eq(
        &interceptor.current(&greeter, "greet").unwrap(),
        &original
    ));
}
