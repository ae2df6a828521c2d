//! BDD tests for the experiment configuration controller.
//!
//! These tests verify:
//! - Selector commits flow into the controller and the materialized grid
//! - Step changes and presets
//! - Config-file seeding
//! - Payload validation and dry-run submission
//! - Failure-body classification

use paramlab_core::{
    Domain, Interval, IntervalSelector, PointerEvent, Preset, TrackGeometry,
};
use paramlab_runner::{
    DryRunSubmitter, ExperimentConfigController, ExperimentDraft, ExperimentPayload, LabConfig,
    Provider, SubmissionReceipt, SubmitError, Submitter,
};

#[test]
fn bdd_scenario_selector_drag_updates_grid() {
    // GIVEN a controller with default intervals and a temperature selector
    let mut ctl = ExperimentConfigController::new();
    let mut temp = IntervalSelector::new(Domain::TEMPERATURE, ctl.temperature())
        .with_track(TrackGeometry::new(0.0, 200.0));

    // WHEN the right thumb is dragged from 1.00 to 1.50 (x=100 → 1.00, x=150 → 1.50)
    temp.handle_pointer(&PointerEvent::Down { pointer_id: 1, x: 100.0 }, |iv| {
        ctl.set_temperature_interval(iv)
    });
    temp.handle_pointer(&PointerEvent::Move { pointer_id: 1, x: 150.0 }, |iv| {
        ctl.set_temperature_interval(iv)
    });
    temp.handle_pointer(&PointerEvent::Up { pointer_id: 1 }, |iv| {
        ctl.set_temperature_interval(iv)
    });

    // THEN the controller holds exactly what the selector shows
    assert_eq!(ctl.temperature(), Interval::new(0.7, 1.5));
    assert_eq!(ctl.temperature(), temp.interval());

    // AND the grid samples the new interval
    assert_eq!(ctl.temperature_values(), vec![0.7, 1.1, 1.5]);
    let sets = ctl.materialize();
    assert_eq!(sets.len(), 9);
    assert_eq!(sets[8].temperature, 1.5);
    assert_eq!(sets[8].top_p, 1.0);
}

#[test]
fn bdd_scenario_change_steps_and_preset() {
    // GIVEN a default controller
    let mut ctl = ExperimentConfigController::new();

    // WHEN steps are set to 5 and the Balanced preset is applied
    ctl.set_steps(5);
    ctl.apply_preset(Preset::Balanced);

    // THEN the grid has 25 combinations over the preset intervals
    assert_eq!(ctl.combination_count(), 25);
    assert_eq!(ctl.temperature_values(), vec![0.4, 0.5, 0.6, 0.7, 0.8]);
    assert_eq!(ctl.top_p_values(), vec![0.6, 0.7, 0.8, 0.9, 1.0]);

    // WHEN steps drop to 1
    ctl.set_steps(1);

    // THEN only the lower endpoints remain
    let sets = ctl.materialize();
    assert_eq!(sets.len(), 1);
    assert_eq!((sets[0].temperature, sets[0].top_p), (0.4, 0.6));
}

#[test]
fn bdd_scenario_seed_from_config_file() {
    // GIVEN a config file on disk
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paramlab.toml");
    std::fs::write(
        &path,
        r#"
        [sweep]
        steps = 2
        max_tokens = 512
        temperature = [0.0, 2.0]
        top_p = [0.5, 1.0]

        [experiment]
        title = "Haiku sweep"
        provider = "openai"
        "#,
    )
    .unwrap();

    // WHEN the controller is built from it
    let cfg = LabConfig::from_file(&path).unwrap();
    let ctl = ExperimentConfigController::from_config(&cfg);

    // THEN every param set carries the configured budget
    let sets = ctl.materialize();
    assert_eq!(sets.len(), 4);
    assert!(sets.iter().all(|s| s.max_tokens == 512));
    assert_eq!((sets[1].temperature, sets[1].top_p), (0.0, 1.0));
    assert_eq!(cfg.experiment.provider, Provider::OpenAi);
}

#[test]
fn bdd_scenario_dry_run_submission() {
    // GIVEN a controller and a complete draft
    let ctl = ExperimentConfigController::new();
    let draft = ExperimentDraft {
        title: "  Story test ".into(),
        prompt: "Tell me a story".into(),
        provider: Provider::Groq,
        model: None,
    };

    // WHEN it is submitted through the dry-run submitter
    let receipt = ctl.submit(&draft, &DryRunSubmitter).unwrap();

    // THEN one response per combination is expected
    assert_eq!(receipt.num_responses, 9);

    // AND the payload carries the trimmed title and the provider's model
    let payload = ctl.build_payload(&draft).unwrap();
    assert_eq!(payload.title, "Story test");
    assert_eq!(payload.model.as_deref(), Some("llama-3.1-8b-instant"));
    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["param_sets"].as_array().unwrap().len(), 9);
    assert_eq!(json["param_sets"][0]["max_tokens"], 256);
}

struct QuotaSubmitter;

impl Submitter for QuotaSubmitter {
    fn submit(&self, _payload: &ExperimentPayload) -> Result<SubmissionReceipt, SubmitError> {
        Err(SubmitError::from_failure_body(
            r#"{"detail": {"reason": "insufficient_quota", "experiment_id": "abc123"}}"#,
        ))
    }
}

#[test]
fn bdd_scenario_quota_failure_is_surfaced() {
    // GIVEN a submitter that always runs out of quota
    let ctl = ExperimentConfigController::new();
    let draft = ExperimentDraft {
        prompt: "hi".into(),
        ..ExperimentDraft::default()
    };

    // WHEN the draft is submitted
    let err = ctl.submit(&draft, &QuotaSubmitter).unwrap_err();

    // THEN the error is classified as a quota failure with the experiment id
    assert!(err.is_quota());
    match err {
        SubmitError::Quota { experiment_id, .. } => {
            assert_eq!(experiment_id.as_deref(), Some("abc123"))
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bdd_scenario_invalid_draft_never_reaches_submitter() {
    struct Unreachable;
    impl Submitter for Unreachable {
        fn submit(&self, _: &ExperimentPayload) -> Result<SubmissionReceipt, SubmitError> {
            panic!("submitter called with invalid draft")
        }
    }

    // GIVEN a draft with no prompt
    let ctl = ExperimentConfigController::new();
    let draft = ExperimentDraft::default();

    // WHEN it is submitted
    let err = ctl.submit(&draft, &Unreachable).unwrap_err();

    // THEN validation fails first
    assert!(matches!(err, SubmitError::MissingPrompt));
}
