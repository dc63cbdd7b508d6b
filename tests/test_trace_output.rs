use std::path::Path;
use std::thread;
use std::time::Duration;

use trace_scope::{ScopedTimer, TraceCollector, TraceError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn read_trace(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("Failed to read trace file");
    serde_json::from_str(&content).expect("Trace file is not valid JSON")
}

fn trace_events(trace: &serde_json::Value) -> &Vec<serde_json::Value> {
    trace["traceEvents"]
        .as_array()
        .expect("traceEvents is not an array")
}

#[test]
fn test_empty_session_produces_empty_event_array() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("empty", &path).unwrap();
    collector.end_session().unwrap();

    let trace = read_trace(&path);
    assert!(trace_events(&trace).is_empty());
}

#[test]
fn test_nested_regions_emit_inner_first_with_expected_durations() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("nested", &path).unwrap();
    {
        let _outer = ScopedTimer::new(&collector, "A");
        thread::sleep(Duration::from_millis(5));
        {
            let _inner = ScopedTimer::new(&collector, "B");
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(5));
    }
    collector.end_session().unwrap();

    let trace = read_trace(&path);
    let events = trace_events(&trace);
    assert_eq!(events.len(), 2);

    // Inner scope closes first, so B precedes A in completion order.
    assert_eq!(events[0]["name"], "B");
    assert_eq!(events[1]["name"], "A");

    let b_dur = events[0]["dur"].as_u64().unwrap();
    let a_dur = events[1]["dur"].as_u64().unwrap();
    // Sleeps only bound durations from below; scheduling adds slack on top.
    assert!(b_dur >= 5_000, "inner region slept 5ms, dur was {b_dur}us");
    assert!(a_dur >= 15_000, "outer region slept 15ms, dur was {a_dur}us");
    assert!(a_dur > b_dur);

    // A starts before B does.
    assert!(events[1]["ts"].as_u64().unwrap() <= events[0]["ts"].as_u64().unwrap());
}

#[test]
fn test_every_event_carries_all_seven_fields() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("fields", &path).unwrap();
    for label in ["first", "second", "third"] {
        let _timer = ScopedTimer::new(&collector, label);
    }
    collector.end_session().unwrap();

    let trace = read_trace(&path);
    let events = trace_events(&trace);
    assert_eq!(events.len(), 3);
    for event in events {
        assert_eq!(event["cat"], "Process Function");
        assert_eq!(event["ph"], "X");
        assert_eq!(event["pid"], "Profiling");
        assert!(event["name"].is_string());
        assert!(event["dur"].is_u64());
        assert!(event["ts"].is_u64());
        assert!(event["tid"].is_u64(), "tid is emitted as a bare integer");
    }
}

#[test]
fn test_quoted_label_is_sanitized() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("quotes", &path).unwrap();
    {
        let _timer = ScopedTimer::new(&collector, "He said \"hi\"");
    }
    collector.end_session().unwrap();

    let trace = read_trace(&path);
    assert_eq!(trace_events(&trace)[0]["name"], "He said 'hi'");
}

#[test]
fn test_event_order_is_completion_order() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("ordering", &path).unwrap();

    let first = ScopedTimer::new(&collector, "constructed_first");
    let second = ScopedTimer::new(&collector, "constructed_second");
    second.stop();
    first.stop();

    collector.end_session().unwrap();

    let trace = read_trace(&path);
    let events = trace_events(&trace);
    assert_eq!(events[0]["name"], "constructed_second");
    assert_eq!(events[1]["name"], "constructed_first");
}

#[test]
fn test_concurrent_timers_produce_valid_json_with_all_events() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("concurrent", &path).unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    let _timer = ScopedTimer::new(&collector, "worker_region");
                }
            });
        }
    });

    assert_eq!(collector.event_count(), 100);
    collector.end_session().unwrap();

    let trace = read_trace(&path);
    let events = trace_events(&trace);
    assert_eq!(events.len(), 100);

    // Four threads should show up as distinct lanes (hash collisions aside).
    let mut tids: Vec<u64> = events.iter().map(|e| e["tid"].as_u64().unwrap()).collect();
    tids.sort_unstable();
    tids.dedup();
    assert!(tids.len() > 1);
}

#[test]
fn test_overlapping_session_is_rejected_and_first_stream_survives() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("one", &first).unwrap();

    let result = collector.begin_session_at("two", &second);
    assert!(matches!(result, Err(TraceError::SessionAlreadyOpen(name)) if name == "one"));
    assert!(!second.exists());

    {
        let _timer = ScopedTimer::new(&collector, "survivor");
    }
    collector.end_session().unwrap();

    let trace = read_trace(&first);
    assert_eq!(trace_events(&trace).len(), 1);
}

#[test]
fn test_partial_trace_is_flushed_before_end_session() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");

    let collector = TraceCollector::new();
    collector.begin_session_at("partial", &path).unwrap();
    {
        let _timer = ScopedTimer::new(&collector, "flushed");
    }

    // Footer not yet written, but the event bytes must already be on disk.
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"flushed\""));

    collector.end_session().unwrap();
}

#[test]
fn test_default_session_path_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    // begin_session resolves DEFAULT_TRACE_PATH against the working
    // directory, so pin it to the scratch dir for the duration of this test.
    let original = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let collector = TraceCollector::new();
    collector.begin_session("default").unwrap();
    {
        let _timer = ScopedTimer::new(&collector, "region");
    }
    collector.end_session().unwrap();

    let trace = read_trace(&dir.path().join(trace_scope::DEFAULT_TRACE_PATH));
    std::env::set_current_dir(original).unwrap();

    assert_eq!(trace_events(&trace).len(), 1);
}
