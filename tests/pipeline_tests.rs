//! Tests for the experiment pipeline, its observers and the comparison framework

mod common;

use std::sync::{Arc, Mutex};

use common::{ScriptedEnvironment, Tick, arrival_script};
use smartcab::{
    Result,
    export::TrialLogCsv,
    pipeline::{
        ComparisonFramework, CsvReportObserver, ExperimentConfig, ExperimentPipeline,
        InformedDriver, JsonlObserver, NaiveDriver, RandomDriver, StepObservation, TrialRecord,
    },
    ports::{Driver, ExportSnapshot, Observer, StepEvent},
    q_learning::QLearningAgent,
    sim::{GridWorld, WorldConfig},
};
use tempfile::tempdir;

/// Observer that records the event sequence into shared storage
#[derive(Clone, Default)]
struct RecordingObserver {
    events: Arc<Mutex<Vec<String>>>,
    exports: Arc<Mutex<Vec<(usize, usize, bool)>>>,
}

impl Observer for RecordingObserver {
    fn on_run_start(&mut self, total_trials: usize) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("run_start:{total_trials}"));
        Ok(())
    }

    fn on_trial_start(&mut self, trial: usize) -> Result<()> {
        self.events.lock().unwrap().push(format!("trial_start:{trial}"));
        Ok(())
    }

    fn on_step(&mut self, event: &StepEvent) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("step:{}:{}", event.trial, event.step));
        Ok(())
    }

    fn on_trial_end(&mut self, record: &TrialRecord) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(format!("trial_end:{}", record.trial));
        Ok(())
    }

    fn on_export(&mut self, snapshot: &ExportSnapshot<'_>) -> Result<()> {
        self.exports.lock().unwrap().push((
            snapshot.completed_trials,
            snapshot.trials.len(),
            snapshot.values.is_some(),
        ));
        Ok(())
    }

    fn on_run_end(&mut self) -> Result<()> {
        self.events.lock().unwrap().push("run_end".to_string());
        Ok(())
    }
}

fn config(num_trials: usize, export_every: Option<usize>) -> ExperimentConfig {
    ExperimentConfig {
        num_trials,
        seed: Some(42),
        arrival_threshold: 5.0,
        export_every,
    }
}

#[test]
fn test_observer_event_order() {
    let observer = RecordingObserver::default();
    let events = Arc::clone(&observer.events);

    let script = vec![Tick::green_forward(1.0), Tick::green_forward(12.0)];
    let mut env = ScriptedEnvironment::new(script, 10);
    let mut driver = InformedDriver::new();

    ExperimentPipeline::new(config(2, None))
        .with_observer(Box::new(observer))
        .run(&mut driver, &mut env)
        .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "run_start:2",
            "trial_start:0",
            "step:0:0",
            "step:0:1",
            "trial_end:0",
            "trial_start:1",
            "step:1:0",
            "step:1:1",
            "trial_end:1",
            "run_end",
        ]
    );
}

#[test]
fn test_export_fires_on_cadence() {
    let observer = RecordingObserver::default();
    let exports = Arc::clone(&observer.exports);

    let mut env = ScriptedEnvironment::new(arrival_script(), 20);
    let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap();

    ExperimentPipeline::new(config(7, Some(3)))
        .with_observer(Box::new(observer))
        .run(&mut agent, &mut env)
        .unwrap();

    let exports = exports.lock().unwrap();
    assert_eq!(*exports, vec![(3, 3, true), (6, 6, true)]);
}

#[test]
fn test_baseline_exports_carry_no_tables() {
    let observer = RecordingObserver::default();
    let exports = Arc::clone(&observer.exports);

    let mut env = ScriptedEnvironment::new(arrival_script(), 20);
    let mut driver = NaiveDriver::new();

    ExperimentPipeline::new(config(2, Some(1)))
        .with_observer(Box::new(observer))
        .run(&mut driver, &mut env)
        .unwrap();

    assert_eq!(*exports.lock().unwrap(), vec![(1, 1, false), (2, 2, false)]);
}

#[test]
fn test_invalid_experiment_config_is_rejected() {
    let mut env = ScriptedEnvironment::new(arrival_script(), 20);
    let mut driver = NaiveDriver::new();

    let bad_cadence = ExperimentConfig {
        export_every: Some(0),
        ..ExperimentConfig::default()
    };
    assert!(
        ExperimentPipeline::new(bad_cadence)
            .run(&mut driver, &mut env)
            .is_err()
    );

    let bad_threshold = ExperimentConfig {
        arrival_threshold: f64::NAN,
        ..ExperimentConfig::default()
    };
    assert!(
        ExperimentPipeline::new(bad_threshold)
            .run(&mut driver, &mut env)
            .is_err()
    );
}

#[test]
fn test_csv_report_observer_writes_named_files() {
    let tmp = tempdir().unwrap();
    let reports = CsvReportObserver::new(tmp.path().join("reports"), "run1").unwrap();

    let mut env = ScriptedEnvironment::new(arrival_script(), 20);
    let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap().with_seed(1);

    let result = ExperimentPipeline::new(config(4, Some(2)))
        .with_observer(Box::new(reports))
        .run(&mut agent, &mut env)
        .unwrap();

    let dir = tmp.path().join("reports");
    assert!(dir.join("Q_run1.csv").exists());
    assert!(dir.join("N_run1.csv").exists());

    let stats = TrialLogCsv::load(dir.join("trial_stats_run1.csv")).unwrap();
    assert_eq!(stats, result.trials);
    assert_eq!(stats.len(), 4);

    let q = std::fs::read_to_string(dir.join("Q_run1.csv")).unwrap();
    assert!(q.starts_with("state,forward,right,left,None"));
}

#[test]
fn test_jsonl_observer_writes_one_line_per_tick() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("steps.jsonl");
    let observer = JsonlObserver::new(&path).unwrap();

    let mut env = ScriptedEnvironment::new(arrival_script(), 20);
    let mut driver = InformedDriver::new();

    let result = ExperimentPipeline::new(config(3, None))
        .with_observer(Box::new(observer))
        .run(&mut driver, &mut env)
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    let ticks: usize = result.trials.iter().map(|t| t.trial_length).sum();
    assert_eq!(lines.len(), ticks);

    let first: StepObservation = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first.trial, 0);
    assert_eq!(first.step, 0);
    assert_eq!(first.light, "green");
    assert_eq!(first.waypoint, "forward");
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut world = GridWorld::new(WorldConfig::default()).unwrap().with_seed(7);
        let mut agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap();
        let config = ExperimentConfig {
            num_trials: 15,
            seed: Some(7),
            export_every: None,
            ..ExperimentConfig::default()
        };
        let result = ExperimentPipeline::new(config)
            .run(&mut agent, &mut world)
            .unwrap();
        (result.trials, agent.store().clone())
    };

    let (trials_a, store_a) = run();
    let (trials_b, store_b) = run();
    assert_eq!(trials_a, trials_b);
    assert_eq!(store_a, store_b);
}

#[test]
fn test_q_learning_improves_on_random_in_grid_world() {
    let experiment = ExperimentConfig {
        num_trials: 100,
        seed: Some(5),
        export_every: None,
        ..ExperimentConfig::default()
    };
    let drivers: Vec<Box<dyn Driver>> = vec![
        Box::new(RandomDriver::with_seed(5)),
        Box::new(InformedDriver::new()),
        Box::new(QLearningAgent::new(0.5, 0.5, 0.5).unwrap()),
    ];

    let mut framework = ComparisonFramework::new(drivers, WorldConfig::default())
        .with_experiment(experiment)
        .with_world_seed(6);
    let result = framework.compare().unwrap();

    let random = &result.outcomes[0];
    let informed = &result.outcomes[1];
    assert_eq!(random.name, "Random");
    assert_eq!(informed.name, "Informed");
    assert_eq!(informed.total_penalty, 0.0);
    assert!(informed.success_rate >= random.success_rate);

    let learned = framework.drivers()[2].value_store().unwrap();
    assert!(learned.state_count() > 0);
}
