use rand::{rngs::StdRng, Rng, SeedableRng};
use strata::{
    Camera2D, CameraInput, CameraMode, ColumnIndex, ColumnMetadata, SpiralMeshBuilder,
    SpiralParams,
};

fn random_index(rng: &mut StdRng) -> ColumnIndex {
    let columns = rng.gen_range(1..40);
    let heights = (0..columns).map(|_| rng.gen_range(0.05..3.0)).collect();
    ColumnIndex::new(&ColumnMetadata {
        width: rng.gen_range(0.01..0.5),
        heights,
    })
    .unwrap()
}

#[test]
fn metadata_parses_from_json() {
    let meta: ColumnMetadata =
        serde_json::from_str(r#"{ "width": 0.1, "heights": [3, 5, 2] }"#).unwrap();
    assert_eq!(meta.heights, vec![3.0, 5.0, 2.0]);

    let idx = ColumnIndex::new(&meta).unwrap();
    assert_eq!(idx.total_height(), 10.0);
}

#[test]
fn sampled_columns_never_decrease() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let idx = random_index(&mut rng);
        let last = idx.column_count() - 1;

        assert_eq!(idx.sample(0.0).column, 0);
        assert_eq!(idx.sample(1.0).column, last);

        let mut prev = 0;
        for k in 0..=2000 {
            let s = idx.sample(k as f64 / 2000.0);
            assert!(s.column >= prev);
            assert!(s.column <= last);
            assert!(s.local_height >= 0.0);
            prev = s.column;
        }
    }
}

#[test]
fn boundary_fraction_lies_inside_the_step() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let idx = random_index(&mut rng);
        for _ in 0..200 {
            let a: f64 = rng.gen_range(0.0..1.0);
            let b: f64 = rng.gen_range(0.0..1.0);
            if a == b {
                continue;
            }
            let (t, next_t) = if a < b { (a, b) } else { (b, a) };

            let same = idx.sample(t).column == idx.sample(next_t).column;
            match idx.crosses_boundary(t, next_t) {
                None => assert!(same),
                Some(f) => {
                    assert!(!same);
                    assert!(f > 0.0 && f < 1.0, "fraction {f} for {t}..{next_t}");

                    let crossings = idx.boundaries_between(t, next_t).count();
                    let expected = idx.sample(next_t).column - idx.sample(t).column;
                    assert_eq!(crossings, expected);
                }
            }
        }
    }
}

#[test]
fn vertex_count_accounts_for_seams() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let idx = random_index(&mut rng);
        let n = rng.gen_range(1..3000);
        let mesh = SpiralMeshBuilder::new(
            &idx,
            SpiralParams {
                num_segment: n,
                ..SpiralParams::default()
            },
        )
        .unwrap()
        .build();

        assert_eq!(mesh.vertex_count() as usize, 2 * n + 4 * mesh.seam_breaks());
    }
}

#[test]
fn seam_break_count_matches_columns_reached() {
    let idx = ColumnIndex::new(&ColumnMetadata {
        width: 0.1,
        heights: vec![3.0, 5.0, 2.0],
    })
    .unwrap();
    let n = 500;
    let mesh = SpiralMeshBuilder::new(
        &idx,
        SpiralParams {
            num_segment: n,
            ..SpiralParams::default()
        },
    )
    .unwrap()
    .build();

    // The last step stops short of t = 1 but past both boundaries (0.3, 0.8).
    assert_eq!(mesh.seam_breaks(), 2);
    assert_eq!(mesh.vertex_count() as usize, 2 * n + 8);
}

#[test]
fn strip_texture_stays_within_one_column_per_quad() {
    let idx = ColumnIndex::new(&ColumnMetadata {
        width: 0.125,
        heights: vec![1.0, 2.0, 0.5, 1.5, 1.0, 3.0, 0.25, 2.0, 1.0, 1.0, 0.75],
    })
    .unwrap();
    let mesh = SpiralMeshBuilder::new(
        &idx,
        SpiralParams {
            num_segment: 400,
            ..SpiralParams::default()
        },
    )
    .unwrap()
    .build();

    // Consecutive inner vertices either sample the same column or are the
    // zero-area pair at a seam break.
    let inner: Vec<_> = mesh.vertices().iter().step_by(2).collect();
    for w in inner.windows(2) {
        let same_column = w[0].tex_coord[0] == w[1].tex_coord[0] && w[0].page == w[1].page;
        let coincident = w[0].spiral_pos == w[1].spiral_pos;
        assert!(same_column || coincident);
    }
}

#[test]
fn zero_segments_is_rejected() {
    let idx = ColumnIndex::new(&ColumnMetadata {
        width: 0.1,
        heights: vec![10.0],
    })
    .unwrap();
    let err = SpiralMeshBuilder::new(
        &idx,
        SpiralParams {
            num_segment: 0,
            ..SpiralParams::default()
        },
    );
    assert!(err.is_err());
}

#[test]
fn zoom_stays_clamped_and_pan_keeps_offset() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut cam = Camera2D::default();
    for _ in 0..500 {
        if rng.gen_bool(0.5) {
            let before = cam.eye().distance(cam.focus());
            let delta = rng.gen_range(-3000.0..3000.0);
            cam.zoom(delta);
            let expected = (before * (1.0 + delta * strata::camera::ZOOM_SPEED))
                .clamp(strata::camera::MIN_ZOOM, strata::camera::MAX_ZOOM);
            assert!((cam.eye().distance(cam.focus()) - expected).abs() < 1e-4);
        } else {
            let offset = cam.eye() - cam.focus();
            let (eye, focus) = (cam.eye(), cam.focus());
            cam.pan(rng.gen_range(-200.0..200.0), rng.gen_range(-200.0..200.0));
            assert!((cam.eye() - cam.focus() - offset).length() < 1e-4);
            // Both points moved by the same translation.
            assert!(((cam.eye() - eye) - (cam.focus() - focus)).length() < 1e-4);
        }
        let z = cam.zoom_level();
        assert!((strata::camera::MIN_ZOOM..=strata::camera::MAX_ZOOM).contains(&z));
    }
}

#[test]
fn reset_converges_until_interrupted() {
    let mut cam = Camera2D::default();
    let (eye0, focus0, up0) = cam.default_pose();

    cam.handle_input(CameraInput::DragStart);
    cam.handle_input(CameraInput::PointerMoved { dx: 800.0, dy: -300.0 });
    cam.handle_input(CameraInput::DragEnd);
    cam.handle_input(CameraInput::Wheel { delta: 900.0 });
    cam.handle_input(CameraInput::Reset);

    let mut last = (cam.eye().distance(eye0), cam.focus().distance(focus0), cam.up().distance(up0));
    for _ in 0..40 {
        cam.update();
        let now = (cam.eye().distance(eye0), cam.focus().distance(focus0), cam.up().distance(up0));
        assert!(now.0 < last.0);
        assert!(now.1 < last.1);
        assert!(now.2 <= last.2);
        last = now;
    }

    // A wheel event stops the easing where it is.
    cam.handle_input(CameraInput::Wheel { delta: 0.0 });
    assert_eq!(cam.mode(), CameraMode::Idle);
    let frozen = cam.eye();
    for _ in 0..10 {
        cam.update();
    }
    assert_eq!(cam.eye(), frozen);
}

#[test]
fn pan_while_resetting_freezes_pose() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..20 {
        let mut cam = Camera2D::default();
        cam.zoom(rng.gen_range(-1500.0..1500.0));
        cam.pan(rng.gen_range(-400.0..400.0), rng.gen_range(-400.0..400.0));
        cam.reset();
        for _ in 0..rng.gen_range(1..10) {
            cam.update();
        }

        cam.pan(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
        assert_eq!(cam.mode(), CameraMode::Idle);

        let (eye, focus) = (cam.eye(), cam.focus());
        cam.update();
        assert_eq!(cam.eye(), eye);
        assert_eq!(cam.focus(), focus);
    }
}
