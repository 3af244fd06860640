use mograph_animation_core::{
    AnimatableValue, AnimationController, AnimationError, AnimationSnapshot, BoxedSink, Config,
    Easing, Keyframe, KeyframeSnapshot, Path, Point2, Rgba, SinkResolver, TrackSnapshot, ValueCell,
    ValueKind,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn detached(_: &str, _: ValueKind) -> Option<BoxedSink> {
    None
}

/// it should round-trip a scalar track through JSON with an identical keyframe sequence
#[test]
fn scalar_track_round_trip() {
    let mut ctrl = AnimationController::new(2.0).unwrap();
    ctrl.register_track::<f64, _>("x", ValueCell::<f64>::new())
        .unwrap();
    let track = ctrl.track_mut::<f64>("x").unwrap();
    for (t, v) in [(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)] {
        track.add(Keyframe::new(t, v)).unwrap();
    }

    let json = ctrl.snapshot().to_json().unwrap();
    let parsed = AnimationSnapshot::parse_json(&json).unwrap();
    let restored =
        AnimationController::from_snapshot(&parsed, &mut detached, Config::default()).unwrap();

    let before = ctrl.track::<f64>("x").unwrap();
    let after = restored.track::<f64>("x").unwrap();
    assert_eq!(before.keyframes(), after.keyframes());
    assert_eq!(restored.duration(), 2.0);
    assert_eq!(restored.snapshot().to_json().unwrap(), json);
}

/// it should preserve every value kind and easing
#[test]
fn all_kinds_and_easings_round_trip() {
    let mut ctrl = AnimationController::new(1.0).unwrap();
    ctrl.register_track::<Point2, _>("pos", ValueCell::<Point2>::new())
        .unwrap();
    ctrl.register_track::<Rgba, _>("fill", ValueCell::<Rgba>::new())
        .unwrap();
    ctrl.register_track::<Path, _>("outline", ValueCell::<Path>::new())
        .unwrap();
    {
        let pos = ctrl.track_mut::<Point2>("pos").unwrap();
        pos.add(Keyframe::new(0.0, Point2::new(1.0, 2.0))).unwrap();
        pos.add(Keyframe::new(0.5, Point2::new(3.0, 4.0)).with_easing(Easing::css_ease()))
            .unwrap();
    }
    ctrl.track_mut::<Rgba>("fill")
        .unwrap()
        .add(Keyframe::new(0.25, Rgba::opaque(0.2, 0.4, 0.6)).with_easing(Easing::EaseInOut))
        .unwrap();
    ctrl.track_mut::<Path>("outline")
        .unwrap()
        .add(Keyframe::new(
            1.0,
            vec![Point2::ORIGIN, Point2::new(5.0, 5.0)],
        ))
        .unwrap();

    let snap = ctrl.snapshot();
    let ids: Vec<&str> = snap.tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["fill", "outline", "pos"]);

    let back = AnimationSnapshot::parse_json(&snap.to_json().unwrap()).unwrap();
    assert_eq!(back, snap);
    let restored = AnimationController::from_snapshot(&back, &mut detached, Config::default())
        .unwrap();
    assert_eq!(restored.snapshot(), snap);
    assert_eq!(
        restored.track::<Point2>("pos").unwrap().keyframes()[1].easing(),
        Easing::css_ease()
    );
}

/// it should bind sinks through the resolver and detach the rest
#[test]
fn resolver_binds_known_tracks() {
    let json = mograph_test_fixtures::animations::json("title-card").expect("load title-card");
    let snap = AnimationSnapshot::parse_json(&json).expect("valid fixture");

    let opacity = ValueCell::<f64>::new();
    let mut requested: Vec<(String, ValueKind)> = Vec::new();
    let mut resolver = |id: &str, kind: ValueKind| -> Option<BoxedSink> {
        requested.push((id.to_string(), kind));
        (id == "title.opacity").then(|| opacity.boxed())
    };
    let mut ctrl =
        AnimationController::from_snapshot(&snap, &mut resolver, Config::default()).unwrap();
    assert_eq!(requested.len(), 4);
    assert!(requested.contains(&("title.fill".to_string(), ValueKind::Color)));

    let report = ctrl.seek(2.0);
    // only the empty underline track fails; detached tracks still count as applied
    assert_eq!(report.applied, 3);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].track_id, "underline.width");
    assert_eq!(opacity.get(), Some(1.0));

    ctrl.seek(0.5);
    approx(opacity.get().unwrap(), 0.5, 1e-12);

    assert_eq!(
        ctrl.registry().all_keyframe_times(),
        vec![0.0, 1.0, 1.5, 2.5, 3.0]
    );
}

/// it should hold the left path across a point-count change in a saved file
#[test]
fn path_fixture_uses_step_hold() {
    let snap: AnimationSnapshot =
        mograph_test_fixtures::animations::load("path-morph").expect("load path-morph");
    snap.validate().unwrap();
    let ctrl = AnimationController::from_snapshot(&snap, &mut detached, Config::default()).unwrap();

    let left = snap.tracks[0].keyframes[1].value.clone();
    assert_eq!(ctrl.registry().sample("blob.path", 1.5).unwrap(), left);

    let mid = ctrl.registry().sample("blob.path", 0.5).unwrap();
    let points = mid.as_path().unwrap();
    assert_eq!(points.len(), 4);
    assert_eq!(points[2], Point2::new(15.0, 15.0));
    assert_eq!(mid.as_point(), None);

    let file = mograph_test_fixtures::animations::path("path-morph").unwrap();
    assert!(file.ends_with("path-morph.json"));
    assert!(file.is_file());
}

/// it should reject documents that break structural invariants
#[test]
fn invalid_documents_are_rejected() {
    let bad_duration = r#"{ "duration": 0, "tracks": [] }"#;
    assert!(AnimationSnapshot::parse_json(bad_duration).is_err());

    let wrong_kind = r#"{ "duration": 1, "tracks": [
        { "id": "a", "valueType": "color",
          "keyframes": [{ "time": 0, "value": { "type": "scalar", "data": 1 } }] } ] }"#;
    let err = AnimationSnapshot::parse_json(wrong_kind).unwrap_err();
    assert_eq!(err.category(), "serialization");

    assert!(AnimationSnapshot::parse_json("{ not json").is_err());
}

/// it should accept any SinkResolver implementation
#[test]
fn custom_resolver_type() {
    struct AllScalars(Vec<ValueCell<f64>>);

    impl SinkResolver for AllScalars {
        fn resolve(&mut self, _: &str, kind: ValueKind) -> Option<BoxedSink> {
            (kind == ValueKind::Scalar).then(|| {
                let cell = ValueCell::<f64>::new();
                self.0.push(cell.clone());
                cell.boxed()
            })
        }
    }

    let snap: AnimationSnapshot =
        mograph_test_fixtures::animations::load("title-card").unwrap();
    let mut resolver = AllScalars(Vec::new());
    let mut ctrl = AnimationController::from_snapshot(&snap, &mut resolver, Config::default())
        .unwrap();
    assert_eq!(resolver.0.len(), 2);
    ctrl.seek(3.0);
    let delivered: Vec<Option<f64>> = resolver.0.iter().map(ValueCell::get).collect();
    assert!(delivered.contains(&Some(0.0)));
    assert_eq!(
        ctrl.registry().sample("title.fill", 3.0).unwrap(),
        AnimatableValue::Color(Rgba::new(1.0, 0.5, 0.0, 1.0))
    );
}

fn scalar_doc(times: &[(f64, f64)]) -> String {
    let keyframes: Vec<String> = times
        .iter()
        .map(|(t, v)| format!(r#"{{ "time": {t:?}, "value": {{ "type": "scalar", "data": {v:?} }} }}"#))
        .collect();
    format!(
        r#"{{ "duration": 1.0, "tracks": [ {{ "id": "x", "valueType": "scalar", "keyframes": [{}] }} ] }}"#,
        keyframes.join(",")
    )
}

/// it should reject keyframes too close to tell apart instead of merging them
#[test]
fn near_duplicate_times_are_rejected() {
    let err = AnimationSnapshot::parse_json(&scalar_doc(&[(0.0, 1.0), (5e-7, 2.0)])).unwrap_err();
    assert!(matches!(err, AnimationError::InvalidSnapshot { .. }));

    // apart under the default epsilon, but not under a coarser configured one
    let snap = AnimationSnapshot::parse_json(&scalar_doc(&[(0.0, 1.0), (0.005, 2.0)])).unwrap();
    let cfg = Config {
        time_epsilon: 0.01,
        ..Config::default()
    };
    let err = AnimationController::from_snapshot(&snap, &mut detached, cfg).unwrap_err();
    assert!(matches!(err, AnimationError::InvalidSnapshot { .. }));
    assert!(matches!(
        snap.tracks[0].to_track(0.01),
        Err(AnimationError::InvalidSnapshot { .. })
    ));

    let ctrl = AnimationController::from_snapshot(&snap, &mut detached, Config::default()).unwrap();
    assert_eq!(ctrl.snapshot(), snap);
}

/// it should reject colors whose channels fall outside [0,1]
#[test]
fn out_of_range_colors_are_rejected() {
    let json = r#"{ "duration": 1.0, "tracks": [
        { "id": "fill", "valueType": "color",
          "keyframes": [{ "time": 0.0,
                          "value": { "type": "color", "data": { "r": 5.0, "g": -3.0, "b": 0.5, "a": 1.0 } } }] } ] }"#;
    let err = AnimationSnapshot::parse_json(json).unwrap_err();
    assert!(matches!(err, AnimationError::InvalidSnapshot { .. }));

    let mut snap = AnimationSnapshot {
        duration: 1.0,
        tracks: vec![TrackSnapshot {
            id: "fill".into(),
            value_type: ValueKind::Color,
            keyframes: vec![KeyframeSnapshot {
                time: 0.0,
                value: AnimatableValue::Color(Rgba::TRANSPARENT),
                easing: Easing::Linear,
            }],
        }],
    };
    let ctrl = AnimationController::from_snapshot(&snap, &mut detached, Config::default()).unwrap();
    let sampled = ctrl.registry().sample("fill", 0.5).unwrap();
    assert_eq!(sampled.as_color(), Some(Rgba::TRANSPARENT));
    assert_eq!(sampled.as_scalar(), None);

    snap.tracks[0].keyframes[0].value = AnimatableValue::Color(Rgba {
        r: 0.5,
        g: 0.5,
        b: f64::NAN,
        a: 1.0,
    });
    assert!(AnimationController::from_snapshot(&snap, &mut detached, Config::default()).is_err());
}
