//! Greedy single-pass word wrap.
//!
//! Words are the pieces of the text split on single spaces, so runs of spaces yield
//! empty words and joining the produced lines with `" "` gives back the input exactly.
//! A line is committed as soon as appending the next word would push it past the
//! budget; the overflowing word starts the next line even when it is wider than the
//! budget on its own. Lines are never re-balanced.

/// Measures the rendered advance width of a single line of text.
pub trait TextMeasure {
    /// Width of `text` in pixels.
    fn width(&mut self, text: &str) -> f32;
}

/// Break `text` into lines no wider than `budget`, except lines that hold a single
/// overflowing word.
///
/// Always returns at least one line; empty text yields one empty line.
pub fn wrap_words<M: TextMeasure + ?Sized>(text: &str, budget: f32, measure: &mut M) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut words_in_line = 0usize;

    for word in text.split(' ') {
        let candidate = if words_in_line == 0 {
            word.to_string()
        } else {
            format!("{line} {word}")
        };

        if words_in_line > 0 && measure.width(&candidate) > budget {
            lines.push(std::mem::replace(&mut line, word.to_string()));
            words_in_line = 1;
        } else {
            line = candidate;
            words_in_line += 1;
        }
    }
    lines.push(line);

    lines
}

#[cfg(test)]
#[path = "../../tests/unit/compose/wrap.rs"]
mod tests;
