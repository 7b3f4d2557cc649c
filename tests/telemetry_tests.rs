use chart_pages::telemetry::init_default_tracing;

#[test]
fn subscriber_is_installed_at_most_once() {
    let first = init_default_tracing();
    assert_eq!(first, cfg!(feature = "telemetry"));
    assert!(!init_default_tracing());
}
