use super::*;

fn line() -> StatusLine {
    StatusLine {
        name: "Ada".to_owned(),
        final_label: "shipped the parser".to_owned(),
        start: 36,
        timing: StatusLineTiming::default(),
    }
}

#[test]
fn absent_before_start() {
    assert!(line().state(35).is_none());
    assert!(line().state(36).is_some());
}

#[test]
fn cycles_through_loading_labels() {
    let l = line();
    assert_eq!(l.state(36).unwrap().label, "initializing...");
    assert_eq!(l.state(39).unwrap().label, "connecting...");
    assert_eq!(l.state(42).unwrap().label, "authenticating...");
    assert!(!l.state(51).unwrap().complete);
}

#[test]
fn completion_locks_in_for_good() {
    let l = line();
    // local 15 is still loading; local 16 completes.
    assert!(!l.state(51).unwrap().complete);
    for frame in 52..400 {
        let s = l.state(frame).unwrap();
        assert!(s.complete);
        assert_eq!(s.label, "shipped the parser");
        assert_eq!(s.dots, 20);
    }
}

#[test]
fn dots_and_fade_fill_up() {
    let l = line();
    let s0 = l.state(36).unwrap();
    assert_eq!(s0.dots, 0);
    assert_eq!(s0.opacity, 0.0);
    let s = l.state(36 + 6).unwrap();
    assert_eq!(s.dots, 8);
    assert_eq!(s.opacity, 1.0);
}

#[test]
fn blink_alternates_on_period() {
    assert!(blink(0, 8));
    assert!(blink(7, 8));
    assert!(!blink(8, 8));
    assert!(!blink(15, 8));
    assert!(blink(16, 8));
    assert!(blink(5, 0));
}

#[test]
fn progress_readout_labels() {
    let start = ProgressReadout::at(0, 18);
    assert_eq!(start.hex_label(), "0x00");
    assert_eq!(start.percent_label(), "0%");

    let half = ProgressReadout::at(9, 18);
    assert_eq!(half.percent, 50);
    assert_eq!(half.hex_label(), "0x7F");

    let done = ProgressReadout::at(40, 18);
    assert_eq!(done.progress, 1.0);
    assert_eq!(done.hex_label(), "0xFF");
    assert_eq!(done.percent_label(), "100%");
}
