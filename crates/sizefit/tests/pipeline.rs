use std::collections::BTreeMap;

use sizefit::core::InputError;
use sizefit::fusion::{FusionError, FusionParams};
use sizefit::recommend::{SizeEntry, SizeRange, SizeRecommender};
use sizefit::refine::RejectReason;
use sizefit::{
    AngleObservation, BodyBuild, Gender, Keypoint, KeypointSet, Landmark, Measurement,
    MeasurementRefiner, MeasurementSet, PipelineConfig, PipelineError, Refinement,
    RefinementStatus, RefinerError, ScaleFactor, SizeChart, SizingPipeline, SizingRequest,
    ViewAngle,
};
use tempfile::tempdir;

fn reference_keypoints() -> KeypointSet {
    let pts = [
        (Landmark::Nose, 500.0, 100.0),
        (Landmark::LeftShoulder, 400.0, 200.0),
        (Landmark::RightShoulder, 600.0, 200.0),
        (Landmark::LeftElbow, 350.0, 350.0),
        (Landmark::RightElbow, 650.0, 350.0),
        (Landmark::LeftWrist, 320.0, 500.0),
        (Landmark::RightWrist, 680.0, 500.0),
        (Landmark::LeftHip, 425.0, 550.0),
        (Landmark::RightHip, 575.0, 550.0),
        (Landmark::LeftKnee, 420.0, 800.0),
        (Landmark::RightKnee, 580.0, 800.0),
        (Landmark::LeftAnkle, 415.0, 1050.0),
        (Landmark::RightAnkle, 585.0, 1050.0),
    ];
    let mut set = KeypointSet::new();
    for (landmark, x, y) in pts {
        set.insert(landmark, Keypoint::new(x, y, 0.9)).unwrap();
    }
    set
}

/// Reference pose at 5 px/cm: chest 88.9, shoulder 46.8, arm 59.1.
fn observation(px_per_cm: f64) -> AngleObservation {
    AngleObservation::new(reference_keypoints(), ScaleFactor::new(px_per_cm).unwrap())
}

fn front_only() -> SizingRequest {
    SizingRequest::single(ViewAngle::Front, observation(5.0))
}

struct FixedRefiner(Refinement);

impl MeasurementRefiner for FixedRefiner {
    fn refine(
        &self,
        _angle: ViewAngle,
        _keypoints: &KeypointSet,
        _geometric: &MeasurementSet,
    ) -> Result<Refinement, RefinerError> {
        Ok(self.0.clone())
    }
}

struct Unavailable;

impl MeasurementRefiner for Unavailable {
    fn refine(
        &self,
        _angle: ViewAngle,
        _keypoints: &KeypointSet,
        _geometric: &MeasurementSet,
    ) -> Result<Refinement, RefinerError> {
        Err(RefinerError::new("service timed out"))
    }
}

#[test]
fn single_front_view_end_to_end() {
    let report = SizingPipeline::default().run(&front_only()).unwrap();

    assert_eq!(report.angles.len(), 1);
    let front = &report.angles[0];
    assert_eq!(front.angle, ViewAngle::Front);
    assert_eq!(front.refinement, RefinementStatus::NotConfigured);
    assert_eq!(front.measurements, front.geometric);
    assert!(front.measurements.is_complete());
    assert_eq!(report.fused, front.measurements);
    assert_eq!(report.fused.get(Measurement::Chest), Some(88.9));

    assert!(report.conflicts.is_empty());
    assert_eq!(report.size(), "S");
    assert_eq!(report.recommendation.confidence, 88);
    assert_eq!(report.confidence_boost, 0);
    assert_eq!(report.final_confidence, 88);
}

#[test]
fn three_views_add_a_boost_and_clamp_at_100() {
    let mut request = SizingRequest::default();
    for (angle, quality) in [
        (ViewAngle::Front, 90.0),
        (ViewAngle::Back, 92.0),
        (ViewAngle::Side, 88.0),
    ] {
        request.set(angle, observation(5.0).with_quality(quality));
    }
    let single = SizingPipeline::default().run(&front_only()).unwrap();
    let report = SizingPipeline::default().run(&request).unwrap();

    assert_eq!(report.angles.len(), 3);
    assert_eq!(report.fused, single.fused);
    assert_eq!(report.confidence_boost, 18);
    assert_eq!(report.final_confidence, 100);
}

#[test]
fn partial_quality_scores_do_not_scale_the_boost() {
    let mut request = SizingRequest::default();
    request.set(ViewAngle::Front, observation(5.0).with_quality(90.0));
    request.set(ViewAngle::Back, observation(5.0));
    request.set(ViewAngle::Side, observation(5.0));
    let report = SizingPipeline::default().run(&request).unwrap();
    assert_eq!(report.confidence_boost, 15);

    let mut low = SizingRequest::default();
    for angle in ViewAngle::ALL {
        low.set(angle, observation(5.0).with_quality(60.0));
    }
    let report = SizingPipeline::default().run(&low).unwrap();
    // 15 * 0.8
    assert_eq!(report.confidence_boost, 12);
}

#[test]
fn disagreeing_views_are_flagged() {
    let config = PipelineConfig {
        fusion: FusionParams {
            conflict_threshold_percent: 10.0,
            ..FusionParams::default()
        },
        ..PipelineConfig::default()
    };
    let mut request = front_only();
    request.set(ViewAngle::Side, observation(4.5));

    let report = SizingPipeline::new(config).unwrap().run(&request).unwrap();
    let flagged: Vec<Measurement> = report.conflicts.iter().map(|c| c.measurement).collect();
    assert!(flagged.contains(&Measurement::Chest));
    assert!(!flagged.contains(&Measurement::Rise));
    assert_eq!(report.confidence_boost, 8);
}

#[test]
fn refinement_overrides_and_adjusts_confidence() {
    let refinement = Refinement {
        overrides: BTreeMap::from([(Measurement::Chest, 95.0), (Measurement::Arm, 120.0)]),
        confidence_delta: 5,
        body_build: BodyBuild::Athletic,
        reason: Some("loose clothing".into()),
    };
    let report = SizingPipeline::default()
        .with_refiner(FixedRefiner(refinement))
        .run(&front_only())
        .unwrap();

    let front = &report.angles[0];
    assert_eq!(front.geometric.get(Measurement::Chest), Some(88.9));
    assert_eq!(front.measurements.get(Measurement::Chest), Some(95.0));
    assert_eq!(front.measurements.get(Measurement::Arm), Some(59.1));
    match &front.refinement {
        RefinementStatus::Applied {
            accepted, rejected, ..
        } => {
            assert_eq!(accepted, &vec![Measurement::Chest]);
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].reason, RejectReason::TooFarFromEstimate);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(report.refinement_delta, 5);
    assert_eq!(report.body_build, Some(BodyBuild::Athletic));
    assert_eq!(
        report.final_confidence,
        (report.recommendation.confidence + 5).min(100)
    );
}

#[test]
fn refiner_failure_falls_back_to_geometry() {
    let report = SizingPipeline::default()
        .with_refiner(Unavailable)
        .run(&front_only())
        .unwrap();
    let front = &report.angles[0];
    assert_eq!(front.measurements, front.geometric);
    match &front.refinement {
        RefinementStatus::Failed { reason } => assert!(reason.contains("timed out")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(report.refinement_delta, 0);
    assert_eq!(report.final_confidence, report.recommendation.confidence);
}

#[test]
fn empty_request_is_rejected() {
    let err = SizingPipeline::default()
        .run(&SizingRequest::default())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Fusion(FusionError::EmptyInput)));
}

#[test]
fn missing_landmark_surfaces_as_input_error() {
    let mut keypoints = KeypointSet::new();
    for (landmark, kp) in reference_keypoints().iter() {
        if landmark != Landmark::RightAnkle {
            keypoints.insert(landmark, *kp).unwrap();
        }
    }
    let request = SizingRequest::single(
        ViewAngle::Back,
        AngleObservation::new(keypoints, ScaleFactor::new(5.0).unwrap()),
    );
    match SizingPipeline::default().run(&request).unwrap_err() {
        PipelineError::Input(InputError::MissingLandmarks { missing }) => {
            assert_eq!(missing, vec![Landmark::RightAnkle])
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn calibration_is_scoped_to_the_session() {
    let mut session = SizingPipeline::default();
    let real = MeasurementSet::from_pairs([(Measurement::Chest, 92.0)]).unwrap();
    let updated = session.calibrate(&observation(5.0), None, &real).unwrap();
    assert_eq!(updated, vec![Measurement::Chest]);

    let calibrated = session.run(&front_only()).unwrap();
    assert_eq!(calibrated.fused.get(Measurement::Chest), Some(92.0));

    let other = SizingPipeline::default().run(&front_only()).unwrap();
    assert_eq!(other.fused.get(Measurement::Chest), Some(88.9));

    session.reset_calibration();
    let reset = session.run(&front_only()).unwrap();
    assert_eq!(reset.fused.get(Measurement::Chest), Some(88.9));
}

#[test]
fn request_gender_and_chart_apply_to_one_call() {
    let pipeline = SizingPipeline::default();
    let baseline = pipeline.run(&front_only()).unwrap();

    let mut request = front_only();
    request.gender = Some(Gender::Female);
    let report = pipeline.run(&request).unwrap();
    let expected = SizeRecommender::for_gender(Gender::Female).recommend(&baseline.fused);
    assert_eq!(report.recommendation, expected);

    request.size_chart = Some(
        SizeChart::new(vec![
            SizeEntry::new("Petite", [(Measurement::Chest, SizeRange::new(70.0, 85.0))]),
            SizeEntry::new("Regular", [(Measurement::Chest, SizeRange::new(85.0, 95.0))]),
        ])
        .unwrap(),
    );
    let report = pipeline.run(&request).unwrap();
    assert_eq!(report.size(), "Regular");

    // the session's own chart is untouched
    assert_eq!(pipeline.run(&front_only()).unwrap(), baseline);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = PipelineConfig::default();
    config.measure.joint_to_edge = -1.0;
    assert!(matches!(
        SizingPipeline::new(config),
        Err(PipelineError::Param(_))
    ));
}

#[test]
fn request_and_report_json_files() {
    let dir = tempdir().unwrap();
    let request_path = dir.path().join("request.json");
    let report_path = dir.path().join("report.json");

    let mut request = front_only();
    request.body_type = Some(sizefit::BodyType::Athletic);
    request.write_json(&request_path).unwrap();
    let loaded = SizingRequest::load_json(&request_path).unwrap();
    assert_eq!(loaded, request);

    let report = SizingPipeline::default().run(&loaded).unwrap();
    report.write_json(&report_path).unwrap();
    let back = sizefit::SizingReport::load_json(&report_path).unwrap();
    assert_eq!(back.size(), report.size());
    assert!(back.fused.is_complete());
    assert_eq!(back.final_confidence, report.final_confidence);
}
