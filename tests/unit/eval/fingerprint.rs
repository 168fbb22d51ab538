use super::*;
use crate::{
    composition::presets,
    eval::evaluator::Evaluator,
    foundation::core::FrameIndex,
};

fn frame(f: u64) -> FrameOutput {
    let comp = presets::teaser().unwrap();
    Evaluator::eval_frame(&comp, FrameIndex(f)).unwrap()
}

#[test]
fn fingerprint_is_stable_for_identical_output() {
    let a = frame(640);
    let b = frame(640);
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn frame_index_is_not_hashed() {
    let a = frame(640);
    let mut b = a.clone();
    b.frame = FrameIndex(9999);
    assert_eq!(fingerprint_frame(&a), fingerprint_frame(&b));
}

#[test]
fn visible_changes_change_the_fingerprint() {
    let a = frame(640);

    let mut b = a.clone();
    b.visuals[0].opacity *= 0.5;
    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&b));

    let mut c = a.clone();
    c.audio[0].gain = 0.0;
    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&c));

    let mut d = a.clone();
    d.visuals.pop();
    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&d));

    assert_ne!(fingerprint_frame(&a), fingerprint_frame(&frame(641)));
}

#[test]
fn empty_text_and_missing_text_differ() {
    let a = frame(640);
    let mut with_none = a.clone();
    with_none.visuals[0].text = None;
    let mut with_empty = a;
    with_empty.visuals[0].text = Some(String::new());
    assert_ne!(fingerprint_frame(&with_none), fingerprint_frame(&with_empty));
}
