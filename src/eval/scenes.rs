use kurbo::Point;

use crate::{
    animation::{
        interpolate::InterpolateOpts,
        random::{random, random_glyph},
        spring::spring,
    },
    caption::overlay::{CaptionLayout, CaptionTiming, caption_frame},
    composition::{
        model::{Theme, ThemeSlot},
        scene::{FlashTiming, GlyphMatrix, OutroScene, ShowcaseScene, TerminalScene},
    },
    eval::evaluator::{VisualKind, VisualNode},
    foundation::{
        color::ColorDef,
        core::{Canvas, Vec2},
        error::FramewiseResult,
    },
    text::{
        reveal::{SCRAMBLE_ALPHABET, scramble_reveal, typewriter},
        status::{ProgressReadout, blink, fade_in},
    },
    timeline::clock::FrameClock,
};

/// Collects visual nodes for one frame, in painter's order.
pub(crate) struct NodeSink<'a> {
    canvas: Canvas,
    theme: &'a Theme,
    nodes: Vec<VisualNode>,
}

impl<'a> NodeSink<'a> {
    pub(crate) fn new(canvas: Canvas, theme: &'a Theme) -> Self {
        Self {
            canvas,
            theme,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<VisualNode> {
        self.nodes
    }

    fn width(&self) -> f64 {
        f64::from(self.canvas.width)
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height)
    }

    fn slot(&self, slot: ThemeSlot) -> ColorDef {
        self.theme.slot(slot)
    }

    /// Push a fully opaque, unscaled node and hand it back for tweaks.
    fn push(
        &mut self,
        id: impl Into<String>,
        kind: VisualKind,
        color: ColorDef,
        position: Point,
    ) -> &mut VisualNode {
        self.nodes.push(VisualNode {
            id: id.into(),
            kind,
            opacity: 1.0,
            position,
            offset: Vec2::ZERO,
            scale: 1.0,
            text: None,
            color: color.to_rgba8_premul(),
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }
}

fn text_kind(font_size: f64) -> VisualKind {
    VisualKind::Text { font_size }
}

// Terminal panel flow layout; a renderer may reflow it.
const PANEL_WIDTH: f64 = 560.0;
const PANEL_PADDING: f64 = 30.0;
const ROW_HEIGHT: f64 = 24.0;
const MONO_ADVANCE: f64 = 0.6;
const MATRIX_FONT_SIZE: f64 = 14.0;
const MATRIX_LINE_HEIGHT: f64 = 1.2;

struct Panel {
    origin: Point,
}

impl Panel {
    fn centered(sink: &NodeSink<'_>, rows: usize) -> Self {
        let height = rows as f64 * ROW_HEIGHT + 2.0 * PANEL_PADDING;
        Self {
            origin: Point::new(
                (sink.width() - PANEL_WIDTH) / 2.0,
                (sink.height() - height) / 2.0,
            ),
        }
    }

    fn row(&self, n: usize) -> Point {
        Point::new(
            self.origin.x + PANEL_PADDING,
            self.origin.y + PANEL_PADDING + n as f64 * ROW_HEIGHT,
        )
    }

    fn right_edge(&self, n: usize) -> Point {
        Point::new(self.origin.x + PANEL_WIDTH - PANEL_PADDING, self.row(n).y)
    }
}

pub(crate) fn eval_terminal(scene: &TerminalScene, clock: &FrameClock, sink: &mut NodeSink<'_>) {
    let f = clock.frame().0;
    let fps = clock.fps();
    let cues = &scene.cues;

    eval_matrix(&scene.matrix, f, sink);

    let primary = sink.slot(ThemeSlot::Primary);
    let scan_y = ((f as f64 * 2.0) % 100.0) / 100.0 * sink.height();
    sink.push(
        "scan-line",
        VisualKind::Bar { height_px: 1.0 },
        primary,
        Point::new(0.0, scan_y),
    )
    .opacity = 0.015;

    // Rows: title, subtitle, tags, status lines, progress label, progress bar, reveal.
    let status_row = 3;
    let progress_row = status_row + scene.status_lines.len();
    let reveal_row = progress_row + 2;
    let panel = Panel::centered(sink, reveal_row + 1);

    let text = sink.slot(ThemeSlot::Text);
    let muted = sink.slot(ThemeSlot::Muted);
    let title = sink.push("title", text_kind(22.0), text, panel.row(0));
    title.text = Some(scene.title.clone());

    let cursor_x = panel.row(0).x + scene.title.chars().count() as f64 * 22.0 * MONO_ADVANCE;
    let cursor = sink.push(
        "cursor",
        VisualKind::Indicator,
        primary,
        Point::new(cursor_x, panel.row(0).y),
    );
    cursor.text = Some("│".to_owned());
    cursor.opacity = if f < cues.cursor_until && blink(f, cues.cursor_blink) {
        1.0
    } else {
        0.0
    };

    if f >= cues.subtitle {
        let shown = typewriter(&scene.subtitle, f, cues.subtitle, cues.frames_per_char);
        let node = sink.push("subtitle", text_kind(12.0), muted, panel.row(1));
        node.text = Some(shown.to_owned());
    }

    let mut tag_x = panel.row(2).x;
    for (i, tag) in scene.tags.iter().enumerate() {
        let width = tag.text.chars().count() as f64 * 14.0 * MONO_ADVANCE + 30.0;
        let position = Point::new(tag_x, panel.row(2).y);
        tag_x += width;
        let Some(local) = f.checked_sub(tag.start) else {
            continue;
        };
        let glitch = if (f / 4) % 10 == 0 {
            random(&format!("glitch-{f}")) * 2.0 - 1.0
        } else {
            0.0
        };
        let node = sink.push(format!("tag-{i}"), text_kind(14.0), tag.color, position);
        node.text = Some(tag.text.clone());
        node.opacity = fade_in(local, cues.tag_fade);
        node.scale = spring(local as f64, fps, cues.tag_spring);
        node.offset = Vec2::new(glitch, 0.0);
    }

    let subtle = sink.slot(ThemeSlot::Subtle);
    let secondary = sink.slot(ThemeSlot::Secondary);
    for (i, line) in scene.status_lines.iter().enumerate() {
        let Some(state) = line.state(f) else {
            continue;
        };
        let row = panel.row(status_row + i);

        let (icon, icon_color) = if state.complete {
            ("✓", primary)
        } else {
            ("◐", muted)
        };
        let node = sink.push(format!("status-{i}-icon"), VisualKind::Indicator, icon_color, row);
        node.text = Some(icon.to_owned());
        node.opacity = state.opacity;

        let node = sink.push(
            format!("status-{i}-name"),
            text_kind(12.0),
            text,
            Point::new(row.x + 20.0, row.y),
        );
        node.text = Some(line.name.clone());
        node.opacity = state.opacity;

        let node = sink.push(
            format!("status-{i}-dots"),
            text_kind(10.0),
            subtle,
            Point::new(row.x + 160.0, row.y),
        );
        node.text = Some(".".repeat(state.dots as usize));
        node.opacity = state.opacity;

        let label_color = if state.complete { secondary } else { muted };
        let node = sink.push(
            format!("status-{i}-label"),
            text_kind(11.0),
            label_color,
            panel.right_edge(status_row + i),
        );
        node.text = Some(state.label.to_owned());
        node.opacity = state.opacity;
    }

    if let Some(local) = f.checked_sub(cues.progress) {
        let readout = ProgressReadout::at(local, cues.progress_len);
        let node = sink.push("progress-label", text_kind(11.0), muted, panel.row(progress_row));
        node.text = Some(scene.progress_label.clone());

        let node = sink.push(
            "progress-readout",
            text_kind(11.0),
            muted,
            panel.right_edge(progress_row),
        );
        node.text = Some(format!("{} [{}]", readout.hex_label(), readout.percent_label()));

        sink.push(
            "progress-bar",
            VisualKind::Progress {
                progress: readout.progress,
            },
            primary,
            panel.row(progress_row + 1),
        );
    }

    if f >= cues.reveal {
        let alphabet: Vec<char> = SCRAMBLE_ALPHABET.chars().collect();
        let local = f - cues.reveal;
        let opacity = fade_in(local, cues.reveal_fade);
        let on = blink(f, cues.badge_blink);

        let badge_color = if on {
            primary
        } else {
            sink.slot(ThemeSlot::Background)
        };
        let node = sink.push("badge", VisualKind::Indicator, badge_color, panel.row(reveal_row));
        node.text = Some(scene.badge.clone());
        node.opacity = opacity;

        let shown = scramble_reveal(&scene.reveal_text, f, cues.reveal, cues.reveal_len, &alphabet);
        let node = sink.push(
            "reveal",
            text_kind(18.0),
            text,
            Point::new(panel.row(reveal_row).x, panel.row(reveal_row).y + ROW_HEIGHT),
        );
        node.text = shown;
        node.opacity = opacity;
    }

    if let Some(local) = f.checked_sub(cues.tension) {
        let node = sink.push("tension-dot", VisualKind::Indicator, primary, panel.right_edge(0));
        node.text = Some("●".to_owned());
        node.opacity = if blink(local, cues.tension_blink) { 1.0 } else { 0.3 };
    }
}

fn eval_matrix(matrix: &GlyphMatrix, f: u64, sink: &mut NodeSink<'_>) {
    let primary = sink.slot(ThemeSlot::Primary);
    let column_height = f64::from(matrix.rows) * MATRIX_FONT_SIZE * MATRIX_LINE_HEIGHT;
    let tick = f / matrix.hold_frames;

    for c in 0..matrix.columns {
        let x = f64::from(c) / f64::from(matrix.columns) * sink.width();
        let drift_pct = ((f as f64 * 0.5 + f64::from(c) * 7.0) % 100.0) - 50.0;
        let offset = Vec2::new(0.0, drift_pct / 100.0 * column_height);
        for r in 0..matrix.rows {
            let glyph = random_glyph(&format!("{c}-{r}-{tick}"), &matrix.glyphs);
            let cell_opacity = random(&format!("opacity-{c}-{r}")) * 0.8 + 0.2;
            let y = f64::from(r) * MATRIX_FONT_SIZE * MATRIX_LINE_HEIGHT;
            let node = sink.push(
                format!("matrix-{c}-{r}"),
                VisualKind::Glyph,
                primary,
                Point::new(x, y),
            );
            node.text = Some(glyph.to_string());
            node.opacity = cell_opacity * matrix.layer_opacity;
            node.offset = offset;
        }
    }
}

pub(crate) fn eval_showcase(
    scene: &ShowcaseScene,
    clock: &FrameClock,
    timing: &CaptionTiming,
    sink: &mut NodeSink<'_>,
) -> FramewiseResult<()> {
    let Some((clip, local)) = scene.schedule.active(clock.frame()) else {
        return Ok(());
    };
    let fps = clock.fps();

    sink.push(
        format!("clip-{}", clip.index),
        VisualKind::Video {
            source: clip.clip.source.clone(),
            source_time_secs: clip.source_time_secs(local, fps),
            playback_rate: clip.clip.playback_rate,
        },
        ColorDef::rgba(1.0, 1.0, 1.0, 1.0),
        Point::ORIGIN,
    );

    if clip.clip.caption.is_empty() {
        return Ok(());
    }
    let state = caption_frame(local.0, clip.window.len, timing)?;
    let layout = CaptionLayout::resolve(clip.clip.caption_position, sink.canvas);
    let text = sink.slot(ThemeSlot::Text);
    let node = sink.push(
        format!("caption-{}", clip.index),
        VisualKind::Caption { layout },
        text,
        layout.anchor(),
    );
    node.text = Some(clip.clip.caption.clone());
    node.opacity = state.opacity;
    node.offset = state.drift;
    Ok(())
}

pub(crate) fn eval_outro(scene: &OutroScene, clock: &FrameClock, sink: &mut NodeSink<'_>) {
    let f = clock.frame().0 as f64;
    let fade_out = scene.fade_out.sample(f, InterpolateOpts::CLAMP);
    let n = scene.lines.len();
    let center = Point::new(sink.width() / 2.0, sink.height() / 2.0);

    for (i, line) in scene.lines.iter().enumerate() {
        let y = center.y + (i as f64 - (n as f64 - 1.0) / 2.0) * 60.0;
        let node = sink.push(
            format!("outro-{i}"),
            text_kind(line.font_size),
            line.color,
            Point::new(center.x, y),
        );
        node.text = Some(line.text.clone());
        node.opacity = line.fade_in.sample(f, InterpolateOpts::CLAMP.with_ease(line.ease)) * fade_out;
    }
}

pub(crate) fn eval_flash(id: &str, timing: &FlashTiming, clock: &FrameClock, sink: &mut NodeSink<'_>) {
    let f = clock.frame().0;
    let white = ColorDef::rgba(1.0, 1.0, 1.0, 1.0);
    sink.push(format!("{id}-fill"), VisualKind::Fill, white, Point::ORIGIN)
        .opacity = timing.fill.sample(f as f64, InterpolateOpts::CLAMP_RIGHT);

    if (f as f64) >= timing.bar_cutoff {
        return;
    }
    for (i, bar) in timing.bars.iter().enumerate() {
        let pulse = if f > bar.delay {
            timing
                .bar_pulse
                .sample((f - bar.delay) as f64, InterpolateOpts::CLAMP_RIGHT)
        } else {
            0.0
        };
        let y = bar.top * sink.height();
        sink.push(
            format!("{id}-bar-{i}"),
            VisualKind::Bar {
                height_px: bar.height_px,
            },
            timing.bar_color,
            Point::new(0.0, y),
        )
        .opacity = pulse * timing.bar_gain;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/scenes.rs"]
mod tests;
