use super::*;

#[test]
fn bounds_seed_and_tighten_test() {
    let mut bounds = UsageBounds::default();
    assert!(!bounds.is_set());
    assert_eq!((0, 0), (bounds.min(), bounds.max()));

    bounds.observe(50);
    assert!(bounds.is_set());
    assert_eq!((50, 50), (bounds.min(), bounds.max()));

    bounds.observe(150);
    assert_eq!((50, 150), (bounds.min(), bounds.max()));

    bounds.observe(75);
    assert_eq!((50, 150), (bounds.min(), bounds.max()));
}

#[test]
fn bounds_accept_zero_sample_test() {
    let mut bounds = UsageBounds::default();

    bounds.observe(0);
    assert!(bounds.is_set());

    bounds.observe(80);
    assert_eq!((0, 80), (bounds.min(), bounds.max()));
}

#[test]
fn reset_totals_keeps_bounds_test() {
    let mut resources = PodResources::default();
    resources.usage.cpu = 120;
    resources.usage.memory = 2_048;
    resources.requests.cpu = 500;
    resources.limits.memory = 4_096;
    resources.observe_usage();

    resources.reset_totals();

    assert_eq!(ResourceFigures::default(), resources.requests);
    assert_eq!(ResourceFigures::default(), resources.limits);
    assert_eq!(ResourceFigures::default(), resources.usage);
    assert_eq!((120, 120), (resources.cpu_usage.min(), resources.cpu_usage.max()));
    assert_eq!((2_048, 2_048), (resources.memory_usage.min(), resources.memory_usage.max()));
}

#[test]
fn store_insert_and_iter_test() {
    let mut store = ResourceStore::default();
    assert!(store.is_empty());
    assert!(store.get("team-a", "api-0").is_none());

    store.insert("team-a", "api-0", PodResources::default());
    store.insert("team-a", "api-1", PodResources::default());
    store.insert("team-b", "worker-0", PodResources::default());

    assert_eq!(3, store.pods_count());
    assert!(store.get("team-a", "api-1").is_some());

    let mut pods = store.iter().map(|(ns, pod, _)| format!("{ns}/{pod}")).collect::<Vec<_>>();
    pods.sort();
    assert_eq!(vec!["team-a/api-0", "team-a/api-1", "team-b/worker-0"], pods);
}

#[test]
fn store_insert_replaces_record_test() {
    let mut store = ResourceStore::default();
    store.insert("team-a", "api-0", PodResources::default());

    let mut updated = PodResources::default();
    updated.requests.cpu = 250;
    store.insert("team-a", "api-0", updated.clone());

    assert_eq!(1, store.pods_count());
    assert_eq!(Some(&updated), store.get("team-a", "api-0"));
}
