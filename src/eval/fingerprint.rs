use xxhash_rust::xxh3::Xxh3;

use crate::eval::evaluator::{ActiveCue, FrameOutput, VisualKind, VisualNode};

const XXH3_SEED: u64 = 0x6a09_e667_f3bc_c908;

/// Stable 128-bit fingerprint of an evaluated frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Fingerprint everything a renderer would consume.
///
/// The frame index itself is not hashed, so two identical-looking frames share a fingerprint.
pub fn fingerprint_frame(out: &FrameOutput) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u64(out.visuals.len() as u64);
    for node in &out.visuals {
        write_node(&mut h, node);
    }
    h.write_u64(out.audio.len() as u64);
    for cue in &out.audio {
        write_cue(&mut h, cue);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node(h: &mut StableHasher, node: &VisualNode) {
    h.write_str(&node.id);
    match &node.kind {
        VisualKind::Text { font_size } => {
            h.write_u8(0);
            h.write_f64(*font_size);
        }
        VisualKind::Glyph => h.write_u8(1),
        VisualKind::Indicator => h.write_u8(2),
        VisualKind::Fill => h.write_u8(3),
        VisualKind::Bar { height_px } => {
            h.write_u8(4);
            h.write_f64(*height_px);
        }
        VisualKind::Progress { progress } => {
            h.write_u8(5);
            h.write_f64(*progress);
        }
        VisualKind::Video {
            source,
            source_time_secs,
            playback_rate,
        } => {
            h.write_u8(6);
            h.write_str(source);
            h.write_f64(*source_time_secs);
            h.write_f64(*playback_rate);
        }
        VisualKind::Caption { layout } => {
            h.write_u8(7);
            h.write_f64(layout.left);
            h.write_f64(layout.right);
            h.write_f64(layout.anchor_y);
            h.write_u8(layout.vertical as u8);
            h.write_u8(layout.align as u8);
            h.write_f64(layout.font_size);
            h.write_u64(u64::from(layout.font_weight));
            h.write_f64(layout.letter_spacing);
        }
    }
    h.write_f64(node.opacity);
    h.write_f64(node.position.x);
    h.write_f64(node.position.y);
    h.write_f64(node.offset.x);
    h.write_f64(node.offset.y);
    h.write_f64(node.scale);
    match &node.text {
        Some(t) => {
            h.write_u8(1);
            h.write_str(t);
        }
        None => h.write_u8(0),
    }
    let c = node.color;
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

fn write_cue(h: &mut StableHasher, cue: &ActiveCue) {
    h.write_str(&cue.id);
    h.write_str(&cue.asset);
    h.write_f64(cue.gain);
    h.write_f64(cue.source_offset_secs);
}

#[cfg(test)]
#[path = "../../tests/unit/eval/fingerprint.rs"]
mod tests;
