use super::*;

const TITLE: &str = ">> Initializing Anthropic Integration...";

fn alphabet() -> Vec<char> {
    SCRAMBLE_ALPHABET.chars().collect()
}

#[test]
fn typewriter_is_empty_before_start_and_full_at_the_end() {
    assert_eq!(typewriter(TITLE, 4, 9, 1.0), "");
    assert_eq!(typewriter(TITLE, 9, 9, 1.0), "");
    assert_eq!(typewriter(TITLE, 12, 9, 1.0), ">> ");
    assert_eq!(typewriter(TITLE, 500, 9, 1.0), TITLE);
}

#[test]
fn typewriter_is_monotonic_prefix() {
    let mut prev = 0;
    for frame in 0..120 {
        let shown = typewriter(TITLE, frame, 10, 2.0);
        assert!(TITLE.starts_with(shown));
        assert!(shown.len() >= prev, "frame {frame}");
        prev = shown.len();
    }
}

#[test]
fn typewriter_respects_char_boundaries() {
    let text = "アイウエオ";
    assert_eq!(typewriter(text, 2, 0, 1.0), "アイ");
    assert_eq!(typewriter(text, 0, 0, 0.0), text);
}

#[test]
fn scramble_is_absent_before_start() {
    assert!(scramble_reveal("NIK", 10, 11, 20, &alphabet()).is_none());
}

#[test]
fn scramble_keeps_spaces_and_length() {
    let name = "NIK SILVER EFEX ASSISTANT";
    let shown = scramble_reveal(name, 123, 123, 20, &alphabet()).unwrap();
    assert_eq!(shown.chars().count(), name.chars().count());
    for (a, b) in shown.chars().zip(name.chars()) {
        if b == ' ' {
            assert_eq!(a, ' ');
        } else {
            assert!(alphabet().contains(&a));
        }
    }
}

#[test]
fn scramble_locks_in_revealed_prefix() {
    let name = "NIK SILVER EFEX ASSISTANT";
    // Half-way: floor(0.5 * 25) = 12 characters revealed.
    let half = scramble_reveal(name, 10, 0, 20, &alphabet()).unwrap();
    assert_eq!(&half[..12], &name[..12]);
    for frame in 20..40 {
        assert_eq!(scramble_reveal(name, frame, 0, 20, &alphabet()).unwrap(), name);
    }
}

#[test]
fn scramble_is_deterministic_per_frame() {
    let a = scramble_reveal("CLASSIFIED", 3, 0, 20, &alphabet()).unwrap();
    let b = scramble_reveal("CLASSIFIED", 3, 0, 20, &alphabet()).unwrap();
    assert_eq!(a, b);
}
