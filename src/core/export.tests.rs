use super::*;
use crate::core::{PodResources, ResourceFigures};

#[test]
fn export_emits_one_line_per_pod_test() {
    let mut resources = PodResources::default();
    resources.requests = ResourceFigures {
        cpu: 100,
        memory: 134_217_728,
        disk: 0,
    };
    resources.limits = ResourceFigures {
        cpu: 200,
        memory: 268_435_456,
        disk: 0,
    };
    resources.usage = ResourceFigures {
        cpu: 150,
        memory: 209_715_200,
        disk: 0,
    };
    resources.observe_usage();

    let mut store = ResourceStore::default();
    store.insert("team-a", "api-0", resources);
    store.insert("team-b", "worker-1", PodResources::default());

    let mut buffer = Vec::new();
    export(&store, &mut buffer).unwrap();

    let report = String::from_utf8(buffer).unwrap();
    let lines = report.lines().collect::<Vec<_>>();
    assert_eq!(2, lines.len());

    let line = lines.iter().find(|l| l.starts_with("team-a")).unwrap();
    assert_eq!(
        "team-a, api-0, 100, 134217728, 0, 200, 268435456, 0, 150, 150, 150, 209715200, 209715200, 209715200, 0",
        *line
    );
}

#[test]
fn export_field_count_test() {
    let mut store = ResourceStore::default();
    store.insert("default", "empty-0", PodResources::default());

    let mut buffer = Vec::new();
    export(&store, &mut buffer).unwrap();

    let report = String::from_utf8(buffer).unwrap();
    let fields = report.trim_end().split(", ").collect::<Vec<_>>();
    assert_eq!(15, fields.len());
    assert!(fields[2..].iter().all(|f| f.parse::<u64>().is_ok()));
}

#[test]
fn export_empty_store_test() {
    let mut buffer = Vec::new();
    export(&ResourceStore::default(), &mut buffer).unwrap();
    assert!(buffer.is_empty());
}
