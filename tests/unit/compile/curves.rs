use super::*;
use crate::foundation::core::FrameIndex;
use crate::script::model::SceneRegistry;

fn timed(text: &str, framenum: u64) -> Action {
    let mut reg = SceneRegistry::default();
    let mut action = if text.starts_with('{') {
        Action::parse_block(text, &mut reg).unwrap()
    } else {
        Action::parse_line(text, &mut reg).unwrap()
    };
    action.initframe = FrameIndex(0);
    action.framenum = framenum;
    action
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0), "{a} != {b}");
}

#[test]
fn rotation_sums_to_angle() {
    let set = action_curves(&timed("rotate angle=360 axis=y t=2", 40)).unwrap();
    let rot = set.by_name("rot").unwrap();
    assert_eq!(rot.len(), 40);
    assert_close(rot.iter().sum(), 360.0);
    assert!(rot[0] < rot[20]);
}

#[test]
fn linear_rotation_is_uniform() {
    let set = action_curves(&timed("rotate angle=90 sigmoid=f t=1", 10)).unwrap();
    let rot = set.by_name("rot").unwrap();
    assert!(rot.iter().all(|v| (v - 9.0).abs() < 1e-12));
}

#[test]
fn bundle_curves_are_keyed_separately() {
    let set = action_curves(&timed(
        "{rotate angle=90 axis=x t=1; rotate angle=-30 axis=z t=1; zoom_in scale=2 t=1}",
        20,
    ))
    .unwrap();
    assert_eq!(set.len(), 3);
    assert_close(set.by_name("rot").unwrap().iter().sum(), 90.0);
    assert_close(set.by_name("rot1").unwrap().iter().sum(), -30.0);
    let zin = set.by_name("zin").unwrap();
    assert_eq!(zin.len(), 20);
    assert_close(zin.iter().product(), 2.0);
}

#[test]
fn zoom_out_multiplies_to_inverse_scale() {
    let set = action_curves(&timed("zoom_out scale=4 sigmoid=sls t=1", 25)).unwrap();
    assert_close(set.by_name("zou").unwrap().iter().product(), 0.25);
}

#[test]
fn opacity_lands_on_limit() {
    let set = action_curves(&timed("make_transparent limit=0.2 t=1", 15)).unwrap();
    let mtr = set.by_name("mtr").unwrap();
    assert_eq!(mtr.len(), 15);
    assert_eq!(*mtr.last().unwrap(), 0.2);
    assert!(mtr.windows(2).all(|w| w[1] <= w[0] + 1e-12));

    let set = action_curves(&timed("make_opaque start=0.5 limit=0.5 t=1", 5)).unwrap();
    assert!(set.by_name("mop").unwrap().iter().all(|v| *v == 0.5));
}

#[test]
fn repeated_opacity_changes_get_slot_suffixes() {
    let set = action_curves(&timed(
        "{make_opaque material=A t=1; make_opaque material=B t=1}",
        4,
    ))
    .unwrap();
    assert!(set.by_name("mop").is_some());
    assert!(set.by_name("mop1").is_some());
}

#[test]
fn animate_produces_integer_frames() {
    let set = action_curves(&timed("animate frames=0:99 t=1", 10)).unwrap();
    let ani = set.by_name("ani").unwrap();
    assert_eq!(ani[0], 0.0);
    assert_eq!(ani[9], 99.0);
    assert!(ani.iter().all(|v| v.fract() == 0.0));
}

#[test]
fn highlight_modes_shape_opacity() {
    let up = action_curves(&timed("highlight selection=protein t=1", 10)).unwrap();
    let hl = up.by_name("hl_highlight0").unwrap();
    assert_eq!(hl[9], 1.0);
    assert!(hl[0] < 0.1);

    let pulse = action_curves(&timed("highlight selection=protein mode=ud t=1", 10)).unwrap();
    let hl = pulse.by_name("hl_highlight0").unwrap();
    assert_eq!(hl.len(), 10);
    assert_eq!(hl[4], 1.0);
    assert_eq!(hl[9], 0.0);
}

#[test]
fn overlay_envelope_and_data_cursor() {
    let set = action_curves(&timed(
        "{add_overlay datafile=d.dat relative_size=0.5 dataframes=0:50 sigmoid=t t=1; do_nothing t=1}",
        20,
    ))
    .unwrap();
    let ovl = set.by_name("ovl_overlay0").unwrap();
    assert_eq!(ovl.len(), 20);
    assert!(ovl[0] < 0.1);
    assert_eq!(ovl[10], 1.0);
    let ovd = set.by_name("ovd_overlay0").unwrap();
    assert_eq!(ovd[19], 50.0);
}

#[test]
fn instantaneous_actions_have_no_curves() {
    assert!(
        action_curves(&timed("center_view selection=protein", 0))
            .unwrap()
            .is_empty()
    );
    assert!(action_curves(&timed("rotate angle=90 t=0.01", 0)).unwrap().is_empty());
}
