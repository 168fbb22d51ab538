use super::*;

fn fps30() -> Fps {
    Fps::integer(30).unwrap()
}

fn clip(source: &str, duration_sec: f64) -> ClipDescriptor {
    ClipDescriptor {
        source: source.to_owned(),
        trim_start_sec: 0.0,
        trim_end_sec: 60.0,
        duration_sec,
        playback_rate: 1.0,
        caption: String::new(),
        caption_position: CaptionPosition::default(),
    }
}

fn w(start: u64, len: u64) -> TimeWindow {
    TimeWindow::new(FrameIndex(start), len).unwrap()
}

#[test]
fn layout_is_gap_free_running_sum() {
    let clips = [clip("a", 2.0), clip("b", 3.0), clip("c", 5.0)];
    let windows = layout_clips(&clips, fps30()).unwrap();
    assert_eq!(windows, vec![w(0, 60), w(60, 90), w(150, 150)]);
    assert!(crate::timeline::sequencer::is_contiguous(&windows));
}

#[test]
fn fractional_durations_floor_per_clip_without_drift() {
    // 0.35 s is 10.5 frames; each clip floors to 10 and the sum never catches up.
    let clips: Vec<_> = (0..10).map(|i| clip(&format!("c{i}"), 0.35)).collect();
    let windows = layout_clips(&clips, fps30()).unwrap();
    let expected: Vec<_> = (0..10).map(|i| w(i * 10, 10)).collect();
    assert_eq!(windows, expected);
    assert_eq!(windows.last().unwrap().end(), FrameIndex(100));
    assert!(crate::timeline::sequencer::is_contiguous(&windows));

    let schedule = ClipSchedule::new(&clips, fps30()).unwrap();
    assert_eq!(schedule.total_frames(), 100);
    let (active, local) = schedule.active(FrameIndex(59)).unwrap();
    assert_eq!((active.index, local), (5, FrameIndex(9)));
    assert!(schedule.active(FrameIndex(100)).is_none());
}

#[test]
fn layout_rejects_bad_descriptors() {
    let mut bad_trim = clip("a", 2.0);
    bad_trim.trim_start_sec = 10.0;
    bad_trim.trim_end_sec = 10.0;
    assert!(layout_clips(&[bad_trim], fps30()).is_err());

    let mut bad_rate = clip("a", 2.0);
    bad_rate.playback_rate = 0.0;
    assert!(layout_clips(&[bad_rate], fps30()).is_err());

    assert!(layout_clips(&[clip("a", 0.0)], fps30()).is_err());
    assert!(layout_clips(&[clip("a", 0.01)], fps30()).is_err());
}

#[test]
fn source_time_scales_with_playback_rate() {
    let mut c = clip("timelapse", 5.0);
    c.trim_start_sec = 30.0;
    c.trim_end_sec = 75.0;
    c.playback_rate = 10.0;
    let schedule = ClipSchedule::new(&[c], fps30()).unwrap();
    let scheduled = &schedule.clips()[0];
    assert_eq!(scheduled.source_time_secs(FrameIndex(0), fps30()), 30.0);
    assert!((scheduled.source_time_secs(FrameIndex(30), fps30()) - 40.0).abs() < 1e-9);
    assert!(scheduled.clip.overruns_trim());
}

#[test]
fn active_clip_lookup_is_exclusive_at_ends() {
    let clips = [clip("a", 2.0), clip("b", 3.0), clip("c", 5.0)];
    let schedule = ClipSchedule::new(&clips, fps30()).unwrap();
    assert_eq!(schedule.total_frames(), 300);

    let (c, local) = schedule.active(FrameIndex(20)).unwrap();
    assert_eq!((c.index, local), (0, FrameIndex(20)));
    let (c, local) = schedule.active(FrameIndex(60)).unwrap();
    assert_eq!((c.index, local), (1, FrameIndex(0)));
    let (c, local) = schedule.active(FrameIndex(299)).unwrap();
    assert_eq!((c.index, local), (2, FrameIndex(149)));
    assert!(schedule.active(FrameIndex(300)).is_none());
}

#[test]
fn boundary_cues_skip_the_first_clip() {
    let windows = [w(0, 60), w(60, 90), w(150, 150)];
    let cues = boundary_cues(&windows, 15, Some(30)).unwrap();
    assert_eq!(cues.transitions, vec![w(60, 15), w(150, 15)]);
    assert_eq!(cues.final_clip, Some(w(150, 30)));

    let single = boundary_cues(&windows[..1], 15, None).unwrap();
    assert!(single.transitions.is_empty());
    assert!(single.final_clip.is_none());
}

#[test]
fn descriptor_parses_with_defaults() {
    let c: ClipDescriptor = serde_json::from_str(
        r#"{"source":"a.mp4","trim_end_sec":12,"duration_sec":2,"caption":"hi","caption_position":"center-big"}"#,
    )
    .unwrap();
    assert_eq!(c.trim_start_sec, 0.0);
    assert_eq!(c.playback_rate, 1.0);
    assert_eq!(c.caption_position, CaptionPosition::CenterLarge);
}
