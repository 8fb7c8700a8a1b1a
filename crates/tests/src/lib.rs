//! # Integration Tests
//!
//! Integration and end-to-end tests.
//!
//! Covers:
//! - Metadata and config contracts across crates
//! - Mock session -> ingestion thread -> slot -> render thread

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader, MetadataLoader};
    use contracts::{ColumnWindow, SensorInfo, SourceKind};

    #[test]
    fn test_synthetic_metadata_survives_loader() {
        let info = SensorInfo::synthetic(512, 16, 22.5);
        let json = serde_json::to_string(&info).unwrap();

        let loaded = MetadataLoader::load_from_str(&json).unwrap();
        assert_eq!(loaded.width(), 512);
        assert_eq!(loaded.height(), 16);
        assert_eq!(loaded.column_window(), ColumnWindow::full(512));
    }

    #[test]
    fn test_config_defaults_for_mock_viewer() {
        let config = ConfigLoader::load_from_str(
            "[sensor]\nmetadata_path = \"m.json\"\nsource = \"mock\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(config.sensor.source, SourceKind::Mock);
        assert!(config.mock.realtime);
        assert_eq!(config.view.render_interval_ms, 16);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    use contracts::{
        ChanField, ColumnWindow, ContractError, FrameProducts, InputSnapshot, MockConfig,
        Presenter, SensorInfo,
    };
    use ingestion::{IngestionConfig, IngestionLoop, IngestionSummary, MockSession, StopReason};
    use publisher::{
        InputSlot, PublicationSlot, RenderConfig, RenderLoop, RenderSnapshot, SnapshotConfig,
        SnapshotPresenter,
    };
    use scan_products::{ProductComputer, XyzLut};

    /// Presenter that keeps every product set it is shown
    struct CapturingPresenter {
        frames: Arc<Mutex<Vec<FrameProducts>>>,
        input: InputSnapshot,
        max_presents: Option<usize>,
        open: bool,
    }

    impl CapturingPresenter {
        fn new(frames: Arc<Mutex<Vec<FrameProducts>>>) -> Self {
            Self {
                frames,
                input: InputSnapshot::default(),
                max_presents: None,
                open: true,
            }
        }
    }

    impl Presenter for CapturingPresenter {
        fn name(&self) -> &str {
            "capture"
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn input(&self) -> InputSnapshot {
            self.input
        }

        fn present(&mut self, products: &FrameProducts) -> Result<(), ContractError> {
            let mut frames = self.frames.lock().unwrap();
            frames.push(products.clone());
            if self.max_presents.is_some_and(|max| frames.len() >= max) {
                self.open = false;
            }
            Ok(())
        }

        fn close(&mut self) -> Result<(), ContractError> {
            self.open = false;
            Ok(())
        }
    }

    fn fast_mock(frames: u64) -> MockConfig {
        MockConfig {
            frames,
            realtime: false,
            dropout_every: 0,
        }
    }

    /// Run both loops on their own threads and join them
    fn run_viewer<P: Presenter + 'static>(
        info: &SensorInfo,
        mock: MockConfig,
        presenter: P,
        max_frames: Option<u64>,
    ) -> (IngestionSummary, RenderSnapshot) {
        let slot = Arc::new(PublicationSlot::new(info.width(), info.height()));
        let input = Arc::new(InputSlot::new());
        let running = Arc::new(AtomicBool::new(true));

        let computer = ProductComputer::new(Arc::new(XyzLut::new(info)), ChanField::Range);
        let ingestion = IngestionLoop::new(
            MockSession::new(info, mock).unwrap(),
            info.clone(),
            computer,
            Arc::clone(&slot),
            Arc::clone(&input),
            Arc::clone(&running),
            IngestionConfig::new(max_frames),
        );
        let render = RenderLoop::new(
            presenter,
            slot,
            input,
            running,
            RenderConfig {
                interval: Duration::from_millis(1),
            },
        );

        let render_handle = thread::spawn(move || render.run());
        let ingestion_handle = thread::spawn(move || ingestion.run());

        let summary = ingestion_handle.join().unwrap().unwrap();
        let snapshot = render_handle.join().unwrap().unwrap();
        (summary, snapshot)
    }

    /// End-to-end test: MockSession -> IngestionLoop -> slot -> RenderLoop
    #[test]
    fn test_e2e_mock_viewer() {
        let info = SensorInfo::synthetic(64, 8, 30.0);
        let frames = Arc::new(Mutex::new(Vec::new()));

        let (summary, render) = run_viewer(
            &info,
            fast_mock(5),
            CapturingPresenter::new(Arc::clone(&frames)),
            None,
        );

        assert_eq!(summary.stop_reason, StopReason::SessionExit);
        assert_eq!(summary.frames_published, 5);
        assert_eq!(summary.metrics.frames_superseded, 0);
        assert_eq!(summary.metrics.decode_errors, 0);

        let frames = frames.lock().unwrap();
        let sequences: Vec<u64> = frames.iter().map(|f| f.sequence).collect();
        assert!(sequences.windows(2).all(|w| w[0] < w[1]));
        // The render loop shows the final set after ingestion stops
        assert_eq!(sequences.last(), Some(&5));
        assert_eq!(render.presented + render.skipped, 5);

        for frame in frames.iter() {
            assert_eq!(frame.image.len(), 64 * 8);
            assert_eq!(frame.points.len(), 64 * 8);
            assert!(frame.valid_points().count() > 0);
        }
    }

    #[test]
    fn test_e2e_probe_reaches_products() {
        let info = SensorInfo::synthetic(32, 4, 20.0);
        let frames = Arc::new(Mutex::new(Vec::new()));
        let mut presenter = CapturingPresenter::new(Arc::clone(&frames));
        presenter.input = InputSnapshot {
            x: 10,
            y: 2,
            button: true,
        };

        // Realtime pacing gives the render loop time to publish its input
        let mock = MockConfig {
            realtime: true,
            ..fast_mock(5)
        };
        run_viewer(&info, mock, presenter, None);

        let frames = frames.lock().unwrap();
        let last = frames.last().unwrap();
        let probe = last.probe.unwrap();
        assert_eq!((probe.x, probe.y), (10, 2));
    }

    #[test]
    fn test_e2e_partial_window_leaves_outside_columns_empty() {
        let mut info = SensorInfo::synthetic(64, 4, 20.0);
        info.data_format.column_window = ColumnWindow::new(16, 47);
        let frames = Arc::new(Mutex::new(Vec::new()));

        let (summary, _) = run_viewer(
            &info,
            fast_mock(3),
            CapturingPresenter::new(Arc::clone(&frames)),
            None,
        );
        assert_eq!(summary.frames_published, 3);
        assert_eq!(summary.metrics.frames_superseded, 0);

        let frames = frames.lock().unwrap();
        let last = frames.last().unwrap();
        for row in 0..4 {
            assert_eq!(last.points[row * 64], [0.0; 3]);
            assert_eq!(last.points[row * 64 + 63], [0.0; 3]);
        }
    }

    #[test]
    fn test_e2e_max_frames_stops_both_loops() {
        let info = SensorInfo::synthetic(32, 4, 20.0);
        let frames = Arc::new(Mutex::new(Vec::new()));

        let (summary, render) = run_viewer(
            &info,
            fast_mock(0),
            CapturingPresenter::new(Arc::clone(&frames)),
            Some(4),
        );
        assert_eq!(summary.stop_reason, StopReason::MaxFrames);
        assert_eq!(summary.frames_published, 4);
        assert_eq!(render.last_sequence, 4);
    }

    #[test]
    fn test_e2e_closed_presenter_stops_ingestion() {
        let info = SensorInfo::synthetic(32, 4, 20.0);
        let frames = Arc::new(Mutex::new(Vec::new()));
        let mut presenter = CapturingPresenter::new(Arc::clone(&frames));
        presenter.max_presents = Some(2);

        let mock = MockConfig {
            realtime: true,
            ..fast_mock(0)
        };
        let (summary, render) = run_viewer(&info, mock, presenter, None);

        assert_eq!(summary.stop_reason, StopReason::Stopped);
        assert_eq!(render.presented, 2);
        assert_eq!(frames.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_e2e_snapshot_presenter_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let metadata_path = dir.path().join("metadata.json");
        let info = SensorInfo::synthetic(32, 4, 20.0);
        std::fs::write(&metadata_path, serde_json::to_string(&info).unwrap()).unwrap();
        let info = config_loader::MetadataLoader::load_from_path(&metadata_path).unwrap();

        let out = dir.path().join("snapshots");
        let presenter = SnapshotPresenter::new(
            "snapshot",
            SnapshotConfig {
                base_path: out.clone(),
                every: 1,
                max_presents: Some(2),
            },
        )
        .unwrap();

        let mock = MockConfig {
            realtime: true,
            ..fast_mock(0)
        };
        let (_, render) = run_viewer(&info, mock, presenter, None);
        assert_eq!(render.presented, 2);

        let count = |ext: &str| {
            std::fs::read_dir(&out)
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|x| x == ext))
                .count()
        };
        assert_eq!(count("png"), 2);
        assert_eq!(count("ply"), 2);
    }
}
