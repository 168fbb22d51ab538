use crate::animation::random::random_glyph;

/// Symbols shown in place of not-yet-revealed characters.
pub const SCRAMBLE_ALPHABET: &str = "!@#$%^&*()_+-=[]{}|;:',.<>?/~`0123456789";

/// Prefix of `text` revealed at `frame`: `floor((frame - start) / frames_per_char)` characters.
///
/// Empty before `start`; the whole text once every character is out. A non-positive
/// `frames_per_char` reveals everything at `start`. Counts Unicode scalar values, so the
/// returned slice always ends on a char boundary.
pub fn typewriter(text: &str, frame: u64, start: u64, frames_per_char: f64) -> &str {
    let Some(elapsed) = frame.checked_sub(start) else {
        return "";
    };
    let shown = if frames_per_char > 0.0 {
        (elapsed as f64 / frames_per_char).floor() as usize
    } else {
        usize::MAX
    };
    match text.char_indices().nth(shown) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Decrypt-style reveal of `text`, or `None` before `start`.
///
/// After `start`, the first `floor(min(1, elapsed / reveal_frames) * len)` characters are shown
/// as-is; the rest become glyphs from `alphabet` keyed by `(index, frame)`, so they change every
/// frame. Spaces are never scrambled.
pub fn scramble_reveal(
    text: &str,
    frame: u64,
    start: u64,
    reveal_frames: u64,
    alphabet: &[char],
) -> Option<String> {
    let elapsed = frame.checked_sub(start)?;
    let len = text.chars().count();
    let progress = if reveal_frames == 0 {
        1.0
    } else {
        (elapsed as f64 / reveal_frames as f64).min(1.0)
    };
    let revealed = (progress * len as f64).floor() as usize;

    Some(
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                if i < revealed || ch == ' ' {
                    ch
                } else {
                    random_glyph(&format!("scramble-{i}-{frame}"), alphabet)
                }
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/text/reveal.rs"]
mod tests;
