    use super::*;
    use std::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(5);

    fn next_snapshot(rx: &mpsc::Receiver<RemoteEvent>) -> Snapshot {
        match rx.recv_timeout(WAIT).expect("event") {
            RemoteEvent::Snapshot(s) => s,
            other => panic!("expected snapshot, got {:?}", other),
        }
    }

    #[test]
    fn delivers_initial_tree_then_changes() {
        let store = Arc::new(MemoryStore::with_value(serde_json::json!({ "a": "https://x/a" })));
        let (tx, rx) = mpsc::channel();
        let sub = Subscription::spawn_with_poll(store.clone(), tx, Duration::from_millis(50));

        let first = next_snapshot(&rx);
        assert_eq!(first.revision, 1);
        assert_eq!(first.value, serde_json::json!({ "a": "https://x/a" }));

        store.push(serde_json::json!({ "b": "https://x/b" }));
        let second = next_snapshot(&rx);
        assert_eq!(second.revision, 2);
        assert_eq!(second.value, serde_json::json!({ "b": "https://x/b" }));

        sub.stop();
    }

    #[test]
    fn reports_an_outage_once_and_recovers() {
        let store = Arc::new(MemoryStore::new());
        store.fail_reads(Some("offline"));
        let (tx, rx) = mpsc::channel();
        let sub = Subscription::spawn_with_poll(store.clone(), tx, Duration::from_millis(50));

        match rx.recv_timeout(WAIT).expect("event") {
            RemoteEvent::ReadFailed(msg) => assert!(msg.contains("offline")),
            other => panic!("expected read failure, got {:?}", other),
        }

        store.fail_reads(None);
        let snap = next_snapshot(&rx);
        assert_eq!(snap.revision, 0);
        assert!(snap.value.is_null());

        sub.stop();
    }

    #[test]
    fn exits_when_receiver_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        let (tx, rx) = mpsc::channel();
        let sub = Subscription::spawn_with_poll(store.clone(), tx, Duration::from_millis(20));
        next_snapshot(&rx);
        drop(rx);
        store.push(serde_json::json!({}));

        let start = std::time::Instant::now();
        while sub.is_running() && start.elapsed() < WAIT {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!sub.is_running());
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff(0), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(800));
        assert_eq!(backoff(30), MAX_BACKOFF);
    }
