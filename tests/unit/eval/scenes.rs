use super::*;
use crate::{
    composition::{build::Composition, presets, scene::SceneContent},
    foundation::core::FrameIndex,
};

fn teaser() -> Composition {
    presets::teaser().unwrap()
}

fn scene_clock(comp: &Composition, id: &str, f: u64) -> FrameClock {
    let window = comp.scene_window(id).unwrap();
    FrameClock::root(FrameIndex(f), comp.fps(), window.len).unwrap()
}

fn run(comp: &Composition, id: &str, f: u64) -> Vec<VisualNode> {
    let clock = scene_clock(comp, id, f);
    let mut sink = NodeSink::new(comp.canvas(), comp.theme());
    let (_, scene) = comp.scenes().iter().find(|(_, s)| s.id == id).unwrap();
    match &scene.content {
        SceneContent::Terminal(t) => eval_terminal(t, &clock, &mut sink),
        SceneContent::Showcase(s) => {
            eval_showcase(s, &clock, comp.caption_timing(), &mut sink).unwrap()
        }
        SceneContent::Outro(o) => eval_outro(o, &clock, &mut sink),
    }
    sink.finish()
}

fn node<'a>(nodes: &'a [VisualNode], id: &str) -> Option<&'a VisualNode> {
    nodes.iter().find(|n| n.id == id)
}

fn text<'a>(nodes: &'a [VisualNode], id: &str) -> &'a str {
    node(nodes, id).and_then(|n| n.text.as_deref()).unwrap()
}

#[test]
fn terminal_opens_with_matrix_title_and_cursor() {
    let comp = teaser();
    let nodes = run(&comp, "terminal", 0);
    let glyphs = nodes
        .iter()
        .filter(|n| matches!(n.kind, VisualKind::Glyph))
        .count();
    assert_eq!(glyphs, 40 * 20);
    assert!(nodes[0].id.starts_with("matrix-"));
    assert_eq!(text(&nodes, "title"), "DxO Labs");
    assert_eq!(node(&nodes, "cursor").unwrap().opacity, 1.0);
    assert!(node(&nodes, "subtitle").is_none());
    assert!(node(&nodes, "tag-0").is_none());
    assert!(node(&nodes, "status-0-name").is_none());
    assert!(node(&nodes, "progress-bar").is_none());

    assert_eq!(node(&run(&comp, "terminal", 8), "cursor").unwrap().opacity, 0.0);
    assert_eq!(node(&run(&comp, "terminal", 16), "cursor").unwrap().opacity, 1.0);
    assert_eq!(node(&run(&comp, "terminal", 19), "cursor").unwrap().opacity, 0.0);
}

#[test]
fn matrix_glyphs_hold_for_their_tick() {
    let comp = teaser();
    let a = run(&comp, "terminal", 3);
    let b = run(&comp, "terminal", 5);
    assert_eq!(text(&a, "matrix-7-3"), text(&b, "matrix-7-3"));
    assert_eq!(
        node(&a, "matrix-7-3").unwrap().opacity,
        node(&run(&comp, "terminal", 90), "matrix-7-3").unwrap().opacity
    );
    assert!(node(&a, "matrix-7-3").unwrap().opacity <= 0.06);
}

#[test]
fn subtitle_types_one_char_per_frame() {
    let comp = teaser();
    assert_eq!(text(&run(&comp, "terminal", 9), "subtitle"), "");
    assert_eq!(text(&run(&comp, "terminal", 14), "subtitle"), ">> In");
    assert_eq!(
        text(&run(&comp, "terminal", 179), "subtitle"),
        ">> Initializing Anthropic Integration..."
    );
}

#[test]
fn tags_pop_in_staggered() {
    let comp = teaser();
    let nodes = run(&comp, "terminal", 21);
    let tag = node(&nodes, "tag-0").unwrap();
    assert_eq!(tag.opacity, 0.0);
    assert_eq!(tag.scale, 0.0);
    assert!(node(&nodes, "tag-1").is_none());

    let nodes = run(&comp, "terminal", 60);
    for i in 0..3 {
        let tag = node(&nodes, &format!("tag-{i}")).unwrap();
        assert_eq!(tag.opacity, 1.0);
        assert!((tag.scale - 1.0).abs() < 0.05, "tag-{i} scale {}", tag.scale);
    }
    assert!(node(&nodes, "tag-0").unwrap().position.x < node(&nodes, "tag-1").unwrap().position.x);
}

#[test]
fn status_lines_cycle_then_lock_in() {
    let comp = teaser();
    let nodes = run(&comp, "terminal", 36);
    assert_eq!(text(&nodes, "status-0-label"), "initializing...");
    assert_eq!(text(&nodes, "status-0-dots"), "");
    assert_eq!(text(&nodes, "status-0-icon"), "◐");
    assert_eq!(node(&nodes, "status-0-name").unwrap().opacity, 0.0);
    assert!(node(&nodes, "status-1-name").is_none());

    let nodes = run(&comp, "terminal", 52);
    assert_eq!(text(&nodes, "status-0-label"), "photography + editing");
    assert_eq!(text(&nodes, "status-0-icon"), "✓");
    assert_eq!(text(&nodes, "status-0-dots").len(), 20);
    assert_eq!(text(&nodes, "status-1-name"), "Iryna Veremenko");
}

#[test]
fn progress_readout_counts_up() {
    let comp = teaser();
    assert!(node(&run(&comp, "terminal", 101), "progress-bar").is_none());

    let nodes = run(&comp, "terminal", 111);
    assert_eq!(text(&nodes, "progress-readout"), "0x7F [50%]");
    assert_eq!(
        node(&nodes, "progress-bar").unwrap().kind,
        VisualKind::Progress { progress: 0.5 }
    );

    let nodes = run(&comp, "terminal", 150);
    assert_eq!(text(&nodes, "progress-readout"), "0xFF [100%]");
    assert_eq!(text(&nodes, "progress-label"), "COMPILING PROJECT");
}

#[test]
fn classified_reveal_decrypts() {
    let comp = teaser();
    let target = "NIK SILVER EFEX ASSISTANT";

    let nodes = run(&comp, "terminal", 122);
    let scrambled = text(&nodes, "reveal");
    assert_eq!(scrambled.chars().count(), target.chars().count());
    for (a, b) in scrambled.chars().zip(target.chars()) {
        assert_eq!(a == ' ', b == ' ');
    }
    assert_eq!(node(&nodes, "reveal").unwrap().opacity, 0.0);
    assert_eq!(text(&nodes, "badge"), "CLASSIFIED");

    let nodes = run(&comp, "terminal", 142);
    assert_eq!(text(&nodes, "reveal"), target);
    assert_eq!(node(&nodes, "reveal").unwrap().opacity, 1.0);
}

#[test]
fn tension_dot_blinks_from_its_own_start() {
    let comp = teaser();
    assert!(node(&run(&comp, "terminal", 149), "tension-dot").is_none());
    assert_eq!(node(&run(&comp, "terminal", 150), "tension-dot").unwrap().opacity, 1.0);
    assert_eq!(node(&run(&comp, "terminal", 162), "tension-dot").unwrap().opacity, 0.3);
}

#[test]
fn showcase_picks_the_active_clip() {
    let comp = teaser();
    let nodes = run(&comp, "showcase", 20);
    let caption = node(&nodes, "caption-0").unwrap();
    assert_eq!(caption.text.as_deref(), Some("Forget about complex UI"));
    assert!((caption.opacity - 0.5).abs() < 1e-9);
    let VisualKind::Caption { layout } = &caption.kind else {
        panic!("expected caption");
    };
    assert_eq!(caption.position, layout.anchor());

    // Clip 2 plays at ten times speed from 30 s.
    let nodes = run(&comp, "showcase", 180);
    let VisualKind::Video {
        source_time_secs,
        playback_rate,
        ..
    } = &node(&nodes, "clip-2").unwrap().kind
    else {
        panic!("expected video");
    };
    assert!((source_time_secs - 40.0).abs() < 1e-9);
    assert_eq!(*playback_rate, 10.0);
}

#[test]
fn outro_lines_fade_in_then_out_together() {
    let comp = teaser();
    let nodes = run(&comp, "outro", 15);
    assert!((node(&nodes, "outro-0").unwrap().opacity - 0.5).abs() < 1e-9);
    assert_eq!(node(&nodes, "outro-1").unwrap().opacity, 0.0);

    let nodes = run(&comp, "outro", 135);
    assert!((node(&nodes, "outro-0").unwrap().opacity - 0.5).abs() < 1e-9);
    assert!((node(&nodes, "outro-1").unwrap().opacity - 0.5).abs() < 1e-9);
    assert_eq!(
        node(&nodes, "outro-1").unwrap().kind,
        VisualKind::Text { font_size: 20.0 }
    );
}

#[test]
fn outro_line_fade_in_follows_its_ease() {
    let comp = teaser();
    // Second line fades over frames 60..75 with out_cubic.
    let nodes = run(&comp, "outro", 67);
    let t: f64 = 7.0 / 15.0;
    let eased = 1.0 - (1.0 - t).powi(3);
    let opacity = node(&nodes, "outro-1").unwrap().opacity;
    assert!((opacity - eased).abs() < 1e-9);
    assert!(opacity > t);

    // First line has no ease and stays linear.
    let nodes = run(&comp, "outro", 7);
    assert!((node(&nodes, "outro-0").unwrap().opacity - 7.0 / 30.0).abs() < 1e-9);
}

#[test]
fn flash_fill_and_bars_follow_their_keyframes() {
    let comp = teaser();
    let timing = FlashTiming::new(12, comp.theme().primary).unwrap();
    let flash = |f: u64| {
        let clock = FrameClock::root(FrameIndex(f), comp.fps(), 12).unwrap();
        let mut sink = NodeSink::new(comp.canvas(), comp.theme());
        eval_flash("cut", &timing, &clock, &mut sink);
        sink.finish()
    };

    let nodes = flash(0);
    assert_eq!(node(&nodes, "cut-fill").unwrap().opacity, 0.0);
    assert_eq!(node(&nodes, "cut-bar-0").unwrap().opacity, 0.0);

    let nodes = flash(3);
    assert_eq!(node(&nodes, "cut-fill").unwrap().opacity, 1.0);
    assert!((node(&nodes, "cut-bar-0").unwrap().opacity - 0.6).abs() < 1e-9);
    assert_eq!(
        node(&nodes, "cut-bar-1").unwrap().position.y,
        0.45 * 1080.0
    );

    let nodes = flash(6);
    assert_eq!(nodes.len(), 1);
    assert!((nodes[0].opacity - 0.8 * 6.0 / 8.4).abs() < 1e-9);
}
