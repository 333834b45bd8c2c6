use approx::assert_abs_diff_eq;
use sizefit_core::{InputError, Keypoint, KeypointSet, Landmark, Measurement, ScaleFactor};
use sizefit_measure::{AnthropometricParams, BodyType, MeasurementModel};

/// Front-facing adult, roughly 170 cm tall at 6 px/cm.
fn reference_pose() -> KeypointSet {
    let pts = [
        ("nose", 500.0, 100.0, 0.99),
        ("left_shoulder", 400.0, 200.0, 0.95),
        ("right_shoulder", 600.0, 200.0, 0.95),
        ("left_elbow", 350.0, 350.0, 0.90),
        ("right_elbow", 650.0, 350.0, 0.90),
        ("left_wrist", 320.0, 500.0, 0.85),
        ("right_wrist", 680.0, 500.0, 0.85),
        ("left_hip", 425.0, 550.0, 0.95),
        ("right_hip", 575.0, 550.0, 0.95),
        ("left_knee", 420.0, 800.0, 0.90),
        ("right_knee", 580.0, 800.0, 0.90),
        ("left_ankle", 415.0, 1050.0, 0.85),
        ("right_ankle", 585.0, 1050.0, 0.85),
    ];
    let mut set = KeypointSet::new();
    for (name, x, y, v) in pts {
        let landmark: Landmark = name.parse().expect("landmark name");
        set.insert(landmark, Keypoint::new(x, y, v)).expect("keypoint");
    }
    set
}

fn scale(v: f64) -> ScaleFactor {
    ScaleFactor::new(v).expect("scale")
}

#[test]
fn reference_pose_yields_all_fifteen_measurements() {
    let model = MeasurementModel::default();
    let m = model
        .estimate(&reference_pose(), scale(6.0), None)
        .expect("estimate");

    assert_eq!(m.len(), 15);
    assert!(m.is_complete());
    assert!(m.iter().all(|(_, v)| v >= 0.0));

    let expect = [
        (Measurement::Chest, 74.1),
        (Measurement::Waist, 74.6),
        (Measurement::Hips, 86.3),
        (Measurement::Inseam, 79.2),
        (Measurement::Shoulder, 39.0),
        (Measurement::Arm, 49.3),
        (Measurement::Neck, 35.1),
        (Measurement::Wrist, 15.8),
        (Measurement::Thigh, 43.9),
        (Measurement::Calf, 37.5),
        (Measurement::Bicep, 26.4),
        (Measurement::TorsoLength, 58.3),
        (Measurement::Ankle, 21.7),
    ];
    for (measurement, cm) in expect {
        assert_eq!(m.get(measurement), Some(cm), "{measurement}");
    }
    // 33.15 and 12.65 sit on a rounding boundary.
    assert_abs_diff_eq!(m.get(Measurement::BackWidth).unwrap(), 33.15, epsilon = 0.06);
    assert_abs_diff_eq!(m.get(Measurement::Rise).unwrap(), 12.65, epsilon = 0.06);
}

#[test]
fn scaling_pixels_and_scale_together_changes_nothing() {
    let model = MeasurementModel::default();
    let pose = reference_pose();
    let base = model.estimate(&pose, scale(6.0), None).expect("base");

    for k in [0.5, 2.0, 4.0] {
        let scaled = model
            .estimate(&pose.scaled(k), scale(6.0 * k), Some(BodyType::Unknown))
            .expect("scaled");
        assert_eq!(scaled, base, "k = {k}");
    }
}

#[test]
fn rise_does_not_depend_on_keypoints() {
    let model = MeasurementModel::default();
    let a = model.estimate(&reference_pose(), scale(6.0), None).unwrap();
    let b = model
        .estimate(&reference_pose().scaled(3.0), scale(2.5), None)
        .unwrap();
    assert_eq!(a.get(Measurement::Rise), b.get(Measurement::Rise));
}

#[test]
fn custom_params_flow_through() {
    let params = AnthropometricParams {
        joint_to_edge: 1.0,
        ..AnthropometricParams::default()
    };
    let model = MeasurementModel::new(params);
    let m = model.estimate(&reference_pose(), scale(5.0), None).unwrap();
    // 200 px / 5 px/cm with no edge correction
    assert_eq!(m.get(Measurement::Shoulder), Some(40.0));
    assert_eq!(m.get(Measurement::Chest), Some(76.0));
}

#[test]
fn empty_keypoints_report_all_thirteen_missing() {
    let err = MeasurementModel::default()
        .estimate(&KeypointSet::new(), scale(6.0), None)
        .unwrap_err();
    match err {
        InputError::MissingLandmarks { missing } => assert_eq!(missing, Landmark::ALL.to_vec()),
        other => panic!("unexpected {other:?}"),
    }
}
