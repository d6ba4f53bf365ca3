use sagebridge::setup_logging;

#[test]
fn test_logging_setup() {
    // setup_logging installs the global subscriber, so it may run only once per test binary.
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        tracing::info!("logging initialised");
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
