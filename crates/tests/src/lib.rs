//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 场景回放 e2e 测试（虚拟时钟）
//! - 随机脚本模糊测试

#[cfg(test)]
mod contract_tests {
    use contracts::{InteractionRecord, NodeId, RawRecord, ScrollSource};

    #[test]
    fn test_record_field_set() {
        let (record, diagnostics) = InteractionRecord::from_raw(RawRecord {
            start_time: 12.0,
            first_frame_time: Some(16.0),
            duration: 170.0,
            frames_expected: 11.0,
            frames_produced: 10.0,
            scroll_source: "keyboard".into(),
            target: Some(NodeId::new(4)),
            target_is_element: true,
            distance_x: 0.0,
            distance_y: 120.0,
        });
        assert!(diagnostics.is_empty());

        let json = record.to_json();
        let mut keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "checkerboardTime",
                "distanceX",
                "distanceY",
                "duration",
                "entryType",
                "firstFrameTime",
                "framesDropped",
                "framesExpected",
                "framesProduced",
                "name",
                "scrollSource",
                "startTime",
                "target",
            ]
        );
        assert_eq!(json["entryType"], "scroll");
        assert_eq!(json["checkerboardTime"], 0.0);
        assert_eq!(json["framesDropped"], 1);
        assert_eq!(record.scroll_source(), ScrollSource::Keyboard);
    }

    #[test]
    fn test_invalid_fields_corrected() {
        let (record, diagnostics) = InteractionRecord::from_raw(RawRecord {
            start_time: f64::NAN,
            first_frame_time: None,
            duration: -4.0,
            frames_expected: 2.5,
            frames_produced: -1.0,
            scroll_source: "trackball".into(),
            target: Some(NodeId::new(9)),
            target_is_element: false,
            distance_x: 0.0,
            distance_y: 0.0,
        });
        assert!(!diagnostics.is_empty());
        assert_eq!(record.start_time(), 0.0);
        assert_eq!(record.duration(), 0.0);
        assert_eq!(record.frames_expected(), 2);
        assert_eq!(record.frames_produced(), 0);
        assert_eq!(record.scroll_source(), ScrollSource::Other);
        assert_eq!(record.target(), None);
        assert!(record.first_frame_time() >= record.start_time());
    }
}

/// Helpers shared by the scenario tests
#[cfg(test)]
mod fixtures {
    use contracts::{NodeKind, OverflowMode, Scenario, Step, StepAction, SurfaceConfig};

    pub fn scrollable(id: &str) -> SurfaceConfig {
        SurfaceConfig {
            id: id.to_string(),
            parent: None,
            kind: NodeKind::Element,
            overflow_x: OverflowMode::Auto,
            overflow_y: OverflowMode::Auto,
            content_width: 1000.0,
            content_height: 3000.0,
            visible_width: 300.0,
            visible_height: 600.0,
        }
    }

    pub fn step(at_ms: f64, target: &str, action: StepAction) -> Step {
        Step {
            at_ms,
            target: target.to_string(),
            action,
        }
    }

    pub fn scroll(at_ms: f64, target: &str, dx: f64, dy: f64) -> Step {
        step(at_ms, target, StepAction::Scroll { dx, dy })
    }

    pub fn scenario(surfaces: Vec<SurfaceConfig>, steps: Vec<Step>) -> Scenario {
        Scenario {
            version: Default::default(),
            engine: Default::default(),
            display: Default::default(),
            viewport: Default::default(),
            surfaces,
            steps,
            run_until_ms: None,
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use contracts::{NodeId, ScrollSource, StepAction};
    use sim_host::{FaultConfig, ScenarioRunner};

    use crate::fixtures::{scenario, scroll, scrollable, step};

    /// feed is the first surface after html(1) and body(2)
    const FEED: NodeId = NodeId::new(3);
    const PANEL: NodeId = NodeId::new(4);

    #[test]
    fn test_wheel_hint_sets_source_and_start() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(0.0, "feed", StepAction::Wheel),
                scroll(5.0, "feed", 0.0, 40.0),
            ],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.scroll_source(), ScrollSource::Wheel);
        assert_eq!(record.start_time(), 0.0);
        assert_eq!(record.duration(), 155.0);
        assert_eq!(record.target(), Some(FEED));
    }

    #[test]
    fn test_quiet_window_ends_interaction() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                scroll(0.0, "feed", 0.0, 10.0),
                scroll(50.0, "feed", 0.0, 10.0),
                scroll(100.0, "feed", 0.0, 10.0),
            ],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.start_time(), 0.0);
        assert_eq!(record.duration(), 250.0);
        assert_eq!(record.scroll_source(), ScrollSource::Other);
        assert!(record.frames_produced() > 0);
        assert_eq!(record.frames_dropped(), 0);
    }

    #[test]
    fn test_cumulative_distance() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                // the first notification fixes the baseline
                scroll(0.0, "feed", 50.0, 10.0),
                scroll(10.0, "feed", -5.0, 10.0),
                scroll(20.0, "feed", 3.0, -2.0),
            ],
        ))
        .run()
        .unwrap();

        let record = &report.records[0];
        assert_eq!(record.distance_x(), -2.0);
        assert_eq!(record.distance_y(), 8.0);
    }

    #[test]
    fn test_movement_at_boundary_has_zero_distance() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(0.0, "feed", StepAction::Wheel),
                scroll(4.0, "feed", 0.0, -50.0),
                scroll(20.0, "feed", 0.0, -50.0),
                scroll(36.0, "feed", 0.0, -50.0),
            ],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].distance_x(), 0.0);
        assert_eq!(report.records[0].distance_y(), 0.0);
        assert_eq!(report.records[0].total_distance(), 0.0);
    }

    #[test]
    fn test_hint_ttl_boundary() {
        let inside = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(1000.0, "feed", StepAction::TouchStart),
                scroll(1249.0, "feed", 0.0, 30.0),
            ],
        ))
        .run()
        .unwrap();
        assert_eq!(inside.records[0].scroll_source(), ScrollSource::Touch);
        assert_eq!(inside.records[0].start_time(), 1000.0);

        let outside = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(1000.0, "feed", StepAction::TouchStart),
                scroll(1251.0, "feed", 0.0, 30.0),
            ],
        ))
        .run()
        .unwrap();
        assert_eq!(outside.records[0].scroll_source(), ScrollSource::Other);
        assert_eq!(outside.records[0].start_time(), 1251.0);
    }

    #[test]
    fn test_source_upgrades_at_most_once() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                scroll(0.0, "feed", 0.0, 10.0),
                step(20.0, "feed", StepAction::TouchMove),
                scroll(30.0, "feed", 0.0, 10.0),
                step(40.0, "feed", StepAction::Wheel),
                scroll(50.0, "feed", 0.0, 10.0),
            ],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.scroll_source(), ScrollSource::Touch);
        // start time is not rewritten by the late hint
        assert_eq!(record.start_time(), 0.0);
    }

    #[test]
    fn test_unattributed_interaction_stays_other() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![scroll(0.0, "feed", 0.0, 10.0), scroll(30.0, "feed", 0.0, 10.0)],
        ))
        .run()
        .unwrap();
        assert_eq!(report.records[0].scroll_source(), ScrollSource::Other);
    }

    #[test]
    fn test_non_scroll_key_is_not_a_hint() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(0.0, "feed", StepAction::Key { key: "a".into() }),
                scroll(5.0, "feed", 0.0, 10.0),
            ],
        ))
        .run()
        .unwrap();
        assert_eq!(report.records[0].scroll_source(), ScrollSource::Other);
        assert_eq!(report.records[0].start_time(), 5.0);
    }

    #[test]
    fn test_sequential_interactions_split() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![scroll(0.0, "feed", 0.0, 10.0), scroll(400.0, "feed", 0.0, 10.0)],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].start_time(), 0.0);
        assert_eq!(report.records[1].start_time(), 400.0);
    }

    #[test]
    fn test_concurrent_surfaces_are_independent() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed"), scrollable("panel")],
            vec![
                step(0.0, "feed", StepAction::Wheel),
                scroll(2.0, "feed", 0.0, 10.0),
                step(10.0, "panel", StepAction::TouchStart),
                scroll(12.0, "panel", 0.0, 10.0),
                scroll(100.0, "feed", 0.0, 10.0),
            ],
        ))
        .run()
        .unwrap();

        assert_eq!(report.records.len(), 2);
        let panel = report
            .records
            .iter()
            .find(|r| r.target() == Some(PANEL))
            .unwrap();
        let feed = report
            .records
            .iter()
            .find(|r| r.target() == Some(FEED))
            .unwrap();
        assert_eq!(panel.scroll_source(), ScrollSource::Touch);
        assert_eq!(panel.duration(), 152.0);
        assert_eq!(feed.scroll_source(), ScrollSource::Wheel);
        assert_eq!(feed.duration(), 250.0);
        assert_eq!(feed.distance_y(), 10.0);
    }

    #[test]
    fn test_root_movement_on_document() {
        let report = ScenarioRunner::new(scenario(
            vec![],
            vec![
                step(
                    0.0,
                    "root",
                    StepAction::Key {
                        key: "Space".into(),
                    },
                ),
                step(6.0, "root", StepAction::ScrollRoot { dx: 0.0, dy: 700.0 }),
                step(40.0, "root", StepAction::ScrollRoot { dx: 0.0, dy: 100.0 }),
            ],
        ))
        .run()
        .unwrap();

        let record = &report.records[0];
        assert_eq!(record.scroll_source(), ScrollSource::Keyboard);
        assert_eq!(record.target(), Some(NodeId::new(1)));
        assert_eq!(record.distance_y(), 100.0);
    }

    #[test]
    fn test_refresh_rate_measured_from_display() {
        let mut s = scenario(
            vec![scrollable("feed")],
            vec![
                step(1000.0, "feed", StepAction::Wheel),
                scroll(1002.0, "feed", 0.0, 10.0),
                scroll(1100.0, "feed", 0.0, 10.0),
            ],
        );
        s.display.refresh_hz = 120.0;
        let report = ScenarioRunner::new(s).run().unwrap();

        assert!((report.refresh_rate_hz - 120.0).abs() < 0.5);
        let record = &report.records[0];
        assert_eq!(record.frames_dropped(), 0);
        // ~248 ms of 8.33 ms frames
        assert!(record.frames_produced() >= 28);
    }

    #[test]
    fn test_frame_failure_still_terminates() {
        let report = ScenarioRunner::new(scenario(
            vec![scrollable("feed")],
            vec![
                step(0.0, "feed", StepAction::Wheel),
                scroll(5.0, "feed", 0.0, 10.0),
            ],
        ))
        .with_faults(FaultConfig {
            fail_frames: true,
            fail_timers: false,
        })
        .run()
        .unwrap();

        let record = &report.records[0];
        assert_eq!(record.frames_expected(), 0);
        assert_eq!(record.frames_produced(), 0);
        assert_eq!(record.smoothness(), 1.0);
        assert_eq!(record.first_frame_time(), record.start_time());
        assert_eq!(report.refresh_rate_hz, 60.0);
    }

    #[test]
    fn test_scenario_from_toml() {
        let scenario = config_loader::ConfigLoader::scenario_from_str(
            r#"
run_until_ms = 1500.0

[engine]
quiet_window_ms = 100.0

[[surfaces]]
id = "feed"
overflow_y = "scroll"
content_height = 5000.0
visible_height = 500.0

[[steps]]
at_ms = 1000.0
target = "feed"
action = "key"
key = "ArrowDown"

[[steps]]
at_ms = 1010.0
target = "feed"
action = "scroll"
dy = 40.0
"#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();

        let report = ScenarioRunner::new(scenario).run().unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].scroll_source(), ScrollSource::Keyboard);
        assert_eq!(report.records[0].duration(), 110.0);
        assert_eq!(report.end_ms, 1500.0);
    }
}

#[cfg(test)]
mod session_tests {
    use contracts::{
        Clock, EngineConfig, EventTarget, HostEvent, InputEvent, InteractionId, NodeId,
        ScrollSource, ViewportConfig, Wakeup,
    };
    use scroll_engine::{estimate_from_deltas, ScrollEngine};
    use sim_host::{SimDocument, SimHost};

    use crate::fixtures::scrollable;

    fn session() -> (SimHost, ScrollEngine, NodeId) {
        let mut document = SimDocument::new(ViewportConfig::default());
        let feed = document.add_surface(&scrollable("feed")).unwrap();
        let host = SimHost::new(document, 60.0);
        (host, ScrollEngine::new(EngineConfig::default()), feed)
    }

    fn move_surface(host: &mut SimHost, engine: &mut ScrollEngine, surface: NodeId, dy: f64) {
        host.document_mut().scroll_by(surface, 0.0, dy);
        engine.handle_event(
            host,
            &HostEvent::Scroll {
                target: Some(EventTarget::Node(surface)),
            },
        );
    }

    #[test]
    fn test_one_live_state_per_surface() {
        let (mut host, mut engine, feed) = session();
        move_surface(&mut host, &mut engine, feed, 10.0);
        host.advance_to(&mut engine, None, 20.0);
        move_surface(&mut host, &mut engine, feed, 10.0);
        move_surface(&mut host, &mut engine, feed, 10.0);

        assert_eq!(engine.active_interactions(), 1);
        assert!(engine.is_tracking(feed));
        // one frame callback and one idle timer
        assert_eq!(host.pending_frames(), 1);
        assert_eq!(host.pending_timers(), 1);
    }

    #[test]
    fn test_end_interaction_is_idempotent() {
        let (mut host, mut engine, feed) = session();
        move_surface(&mut host, &mut engine, feed, 10.0);
        host.advance_to(&mut engine, None, 40.0);
        move_surface(&mut host, &mut engine, feed, 15.0);

        let first = engine.end_interaction(&mut host, feed);
        let second = engine.end_interaction(&mut host, feed);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(first.unwrap().distance_y(), 15.0);

        // the idle timer and frame callback are gone
        assert_eq!(host.pending_tasks(), 0);
        assert!(host.advance_to(&mut engine, None, 1000.0).is_empty());
        assert_eq!(engine.records_emitted(), 1);
    }

    #[test]
    fn test_late_wakeups_after_end_are_ignored() {
        let (mut host, mut engine, feed) = session();
        move_surface(&mut host, &mut engine, feed, 10.0);
        assert!(engine.end_interaction(&mut host, feed).is_some());

        let stale_idle = Wakeup::Idle {
            surface: feed,
            interaction: InteractionId(1),
        };
        let stale_frame = Wakeup::Frame {
            surface: feed,
            interaction: InteractionId(1),
        };
        assert!(engine.dispatch(&mut host, stale_frame).is_none());
        assert!(engine.dispatch(&mut host, stale_idle).is_none());
        assert_eq!(engine.active_interactions(), 0);

        // a new interaction is not ended by the old id
        move_surface(&mut host, &mut engine, feed, 10.0);
        assert!(engine.dispatch(&mut host, stale_idle).is_none());
        assert!(engine.is_tracking(feed));
    }

    #[test]
    fn test_hint_then_movement_in_session() {
        let (mut host, mut engine, feed) = session();
        host.set_now(100.0);
        let path = host.document().composed_path(feed);
        engine.handle_event(&mut host, &HostEvent::Wheel(InputEvent::with_path(feed, path)));

        host.set_now(105.0);
        move_surface(&mut host, &mut engine, feed, 20.0);

        let records = host.run_until_idle(&mut engine, None, 10_000.0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scroll_source(), ScrollSource::Wheel);
        assert_eq!(records[0].start_time(), 100.0);
        assert_eq!(host.now(), 255.0);
    }

    #[test]
    fn test_reset_drops_interactions() {
        let (mut host, mut engine, feed) = session();
        engine.start(&mut host);
        move_surface(&mut host, &mut engine, feed, 10.0);
        engine.reset(&mut host);

        assert_eq!(engine.active_interactions(), 0);
        assert_eq!(host.pending_tasks(), 0);
        assert!(host.advance_to(&mut engine, None, 1000.0).is_empty());
    }

    #[test]
    fn test_remeasure_refresh_rate() {
        let mut document = SimDocument::new(ViewportConfig::default());
        document.add_surface(&scrollable("feed")).unwrap();
        let mut host = SimHost::new(document, 50.0);
        let mut engine = ScrollEngine::new(EngineConfig::default());

        engine.start(&mut host);
        assert!(!engine.remeasure_refresh_rate(&mut host));
        host.advance_to(&mut engine, None, 2000.0);
        assert!((engine.refresh_rate_hz() - 50.0).abs() < 0.5);

        assert!(engine.remeasure_refresh_rate(&mut host));
    }

    #[test]
    fn test_slow_display_without_delta_threshold() {
        let mut document = SimDocument::new(ViewportConfig::default());
        document.add_surface(&scrollable("feed")).unwrap();
        // 200ms deltas are all invalid
        let mut host = SimHost::new(document, 5.0);
        let mut config = EngineConfig::default();
        config.refresh.min_valid_deltas = 0;
        let mut engine = ScrollEngine::new(config);

        engine.start(&mut host);
        host.advance_to(&mut engine, None, 20_000.0);
        assert_eq!(engine.refresh_rate_hz(), 60.0);
        assert_eq!(host.pending_tasks(), 0);
    }

    #[test]
    fn test_estimator_from_frame_deltas() {
        let config = EngineConfig::default().refresh;

        let hz = estimate_from_deltas(&[16.67; 60], &config).unwrap();
        assert!((hz - 60.0).abs() < 0.5, "got {hz}");

        let hz = estimate_from_deltas(&[31.3; 60], &config).unwrap();
        assert!((hz - 32.0).abs() < 0.5, "got {hz}");

        assert!(estimate_from_deltas(&[16.67; 5], &config).is_none());
    }
}

#[cfg(test)]
mod observer_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use contracts::StepAction;
    use observer_registry::{
        collecting_observer, NativeObserver, ObserveError, ObserveFilter, ObserverRegistry,
        ScrollAwareObserver,
    };
    use sim_host::ScenarioRunner;

    use crate::fixtures::{scenario, scroll, scrollable, step};

    /// Native mechanism that only knows `paint`
    #[derive(Default)]
    struct PaintObserver {
        observed: Rc<RefCell<Vec<Vec<String>>>>,
        connected: bool,
    }

    impl NativeObserver for PaintObserver {
        fn observe(&mut self, filter: &ObserveFilter) -> Result<(), ObserveError> {
            self.observed.borrow_mut().push(filter.entry_types.clone());
            if let Some(unknown) = filter.entry_types.iter().find(|ty| *ty != "paint") {
                return Err(ObserveError::unsupported(unknown.clone()));
            }
            self.connected = true;
            Ok(())
        }

        fn disconnect(&mut self) {
            self.connected = false;
        }

        fn supported_entry_types(&self) -> Vec<String> {
            vec!["paint".to_string()]
        }
    }

    fn two_interactions() -> contracts::Scenario {
        scenario(
            vec![scrollable("feed")],
            vec![
                step(0.0, "feed", StepAction::Wheel),
                scroll(5.0, "feed", 0.0, 10.0),
                scroll(500.0, "feed", 0.0, 10.0),
            ],
        )
    }

    #[test]
    fn test_facade_routes_scroll_to_registry() {
        let registry = ObserverRegistry::shared();
        let (callback, seen) = collecting_observer();
        let native = PaintObserver::default();
        let observed = Rc::clone(&native.observed);
        let mut observer = ScrollAwareObserver::new(native, Rc::clone(&registry), callback);

        observer
            .observe(ObserveFilter::of_types(["scroll", "paint"]))
            .unwrap();
        assert!(observer.observes_scroll());
        assert!(observer.native().connected);
        // scroll never reaches the native mechanism
        assert_eq!(*observed.borrow(), vec![vec!["paint".to_string()]]);
        assert_eq!(observer.supported_entry_types(), ["paint", "scroll"]);

        let report = ScenarioRunner::new(two_interactions())
            .with_registry(Rc::clone(&registry))
            .run()
            .unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(*seen.borrow(), report.records);
    }

    #[test]
    fn test_facade_propagates_other_errors() {
        let registry = ObserverRegistry::shared();
        let (callback, _) = collecting_observer();
        let mut observer =
            ScrollAwareObserver::new(PaintObserver::default(), Rc::clone(&registry), callback);

        let err = observer
            .observe(ObserveFilter::of_types(["scroll", "layout-shift"]))
            .unwrap_err();
        assert_eq!(err, ObserveError::unsupported("layout-shift"));
        assert!(!observer.observes_scroll());
        assert!(registry.is_empty());
        assert!(matches!(
            observer.observe(ObserveFilter::of_types(Vec::<String>::new())),
            Err(ObserveError::EmptyFilter)
        ));
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let registry = ObserverRegistry::shared();
        let (callback, seen) = collecting_observer();
        let mut observer =
            ScrollAwareObserver::new(PaintObserver::default(), Rc::clone(&registry), callback);
        observer.observe(ObserveFilter::scroll()).unwrap();
        observer.disconnect();
        assert!(!observer.observes_scroll());

        let report = ScenarioRunner::new(two_interactions())
            .with_registry(Rc::clone(&registry))
            .run()
            .unwrap();
        assert_eq!(report.records.len(), 2);
        assert!(seen.borrow().is_empty());
        assert_eq!(report.delivery.unobserved, 2);
    }

    #[test]
    fn test_filter_without_scroll_sees_nothing() {
        let registry = ObserverRegistry::shared();
        let (scroll_cb, scroll_seen) = collecting_observer();
        let (paint_cb, paint_seen) = collecting_observer();
        registry.register(scroll_cb, ObserveFilter::scroll().buffered(true));
        registry.register(paint_cb, ObserveFilter::of_type("paint"));

        let report = ScenarioRunner::new(two_interactions())
            .with_registry(Rc::clone(&registry))
            .run()
            .unwrap();
        assert_eq!(scroll_seen.borrow().len(), 2);
        assert!(paint_seen.borrow().is_empty());
        assert_eq!(report.delivery.delivered, 2);
    }

    #[tokio::test]
    async fn test_channel_subscriber() {
        let registry = ObserverRegistry::shared();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        registry.register(
            observer_registry::channel_observer(tx),
            ObserveFilter::scroll(),
        );

        let report = ScenarioRunner::new(two_interactions())
            .with_registry(Rc::clone(&registry))
            .run()
            .unwrap();
        registry.clear();

        let mut aggregator = observability::InteractionAggregator::new();
        while let Some(record) = rx.recv().await {
            aggregator.update(&record);
        }
        assert_eq!(aggregator.total_interactions, report.records.len() as u64);
        assert_eq!(aggregator.source_counts.get("wheel"), Some(&1));
        assert_eq!(aggregator.source_counts.get("other"), Some(&1));
    }
}

#[cfg(test)]
mod fuzz_tests {
    use contracts::{NodeKind, OverflowMode, Scenario, Step, StepAction, SurfaceConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use sim_host::{FaultConfig, ScenarioRunner};

    use crate::fixtures::{scenario, scrollable, step};

    const TARGETS: [&str; 4] = ["root", "feed", "panel", "caption"];
    const KEYS: [&str; 4] = ["ArrowDown", "PageUp", "Space", "x"];

    fn surfaces() -> Vec<SurfaceConfig> {
        let mut panel = scrollable("panel");
        panel.parent = Some("feed".to_string());
        panel.overflow_x = OverflowMode::Hidden;
        let caption = SurfaceConfig {
            id: "caption".to_string(),
            parent: Some("panel".to_string()),
            kind: NodeKind::Text,
            overflow_x: OverflowMode::Visible,
            overflow_y: OverflowMode::Visible,
            content_width: 0.0,
            content_height: 0.0,
            visible_width: 0.0,
            visible_height: 0.0,
        };
        vec![scrollable("feed"), panel, caption]
    }

    fn random_scenario(rng: &mut StdRng) -> Scenario {
        let mut at_ms = rng.random_range(0.0..200.0);
        let mut steps: Vec<Step> = Vec::new();
        for _ in 0..rng.random_range(1..60) {
            at_ms += rng.random_range(0.0..120.0);
            let target = TARGETS[rng.random_range(0..TARGETS.len())];
            let dx = rng.random_range(-80.0..80.0);
            let dy = rng.random_range(-200.0..200.0);
            let action = match rng.random_range(0..7) {
                0 => StepAction::Wheel,
                1 => StepAction::TouchStart,
                2 => StepAction::TouchMove,
                3 => StepAction::Key {
                    key: KEYS[rng.random_range(0..KEYS.len())].to_string(),
                },
                4 => StepAction::ScrollRoot { dx, dy },
                _ => StepAction::Scroll { dx, dy },
            };
            steps.push(step(at_ms, target, action));
        }
        let mut s = scenario(surfaces(), steps);
        s.display.refresh_hz = [30.0, 60.0, 90.0, 120.0, 144.0][rng.random_range(0..5)];
        s
    }

    #[test]
    fn test_random_scripts_keep_record_invariants() {
        for seed in 0..48u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let scenario = random_scenario(&mut rng);
            let movements = scenario
                .steps
                .iter()
                .filter(|s| {
                    matches!(
                        s.action,
                        StepAction::Scroll { .. } | StepAction::ScrollRoot { .. }
                    )
                })
                .count();
            let faults = FaultConfig {
                fail_frames: rng.random_bool(0.1),
                fail_timers: false,
            };

            let report = ScenarioRunner::new(scenario)
                .with_faults(faults)
                .run()
                .unwrap();

            assert!(report.records.len() <= movements, "seed {seed}");
            assert_eq!(report.delivery.emitted, report.records.len() as u64);
            assert_eq!(report.delivery.unobserved, report.delivery.emitted);

            for record in &report.records {
                assert_eq!(record.entry_type(), "scroll", "seed {seed}");
                assert_eq!(record.name(), "scroll");
                assert!(record.start_time() >= 0.0, "seed {seed}");
                assert!(record.duration() >= 0.0, "seed {seed}");
                assert!(record.first_frame_time() >= record.start_time(), "seed {seed}");
                assert!(
                    record.start_time() + record.duration() <= report.end_ms + 1e-9,
                    "seed {seed}"
                );
                assert_eq!(
                    record.frames_dropped(),
                    record.frames_expected().saturating_sub(record.frames_produced())
                );
                assert!(record.frames_produced() <= record.frames_expected(), "seed {seed}");
                assert_eq!(record.checkerboard_time(), 0.0);
                assert!(record.target().is_some(), "seed {seed}");
                assert!((0.0..=1.0).contains(&record.smoothness()));
                assert_eq!(record.to_json().as_object().unwrap().len(), 13);
            }
        }
    }
}
