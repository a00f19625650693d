use super::*;

/// Every char is `advance` pixels wide.
struct Monospace(f32);

impl TextMeasure for Monospace {
    fn width(&mut self, text: &str) -> f32 {
        text.chars().count() as f32 * self.0
    }
}

#[test]
fn short_text_stays_on_one_line() {
    let lines = wrap_words("HELLO WORLD", 100.0, &mut Monospace(1.0));
    assert_eq!(lines, vec!["HELLO WORLD"]);
}

#[test]
fn lines_break_before_the_overflowing_word() {
    // budget 10 chars
    let lines = wrap_words("aaa bbb ccc ddd eee", 10.0, &mut Monospace(1.0));
    assert_eq!(lines, vec!["aaa bbb", "ccc ddd", "eee"]);
    for line in &lines {
        assert!(Monospace(1.0).width(line) <= 10.0);
    }
}

#[test]
fn a_single_wide_word_gets_its_own_line() {
    let lines = wrap_words("hi supercalifragilistic yo", 8.0, &mut Monospace(1.0));
    assert_eq!(lines, vec!["hi", "supercalifragilistic", "yo"]);
}

#[test]
fn first_word_is_never_pushed_to_a_second_line() {
    let lines = wrap_words("enormous", 2.0, &mut Monospace(1.0));
    assert_eq!(lines, vec!["enormous"]);
}

#[test]
fn empty_text_yields_one_empty_line() {
    assert_eq!(wrap_words("", 50.0, &mut Monospace(1.0)), vec![String::new()]);
}

#[test]
fn greedy_wrap_can_leave_a_short_trailing_line() {
    let lines = wrap_words("abcd efgh i", 9.0, &mut Monospace(1.0));
    assert_eq!(lines, vec!["abcd efgh", "i"]);
}

#[test]
fn words_survive_in_order_with_single_spaces() {
    let texts = [
        "WHEN THE CODE WORKS ON THE FIRST TRY AND YOU DO NOT KNOW WHY",
        "one  two   three",
        " leading and trailing ",
        "x",
    ];
    for budget in [1.0, 5.0, 12.0, 30.0, 500.0] {
        for text in texts {
            let mut m = Monospace(1.0);
            let lines = wrap_words(text, budget, &mut m);
            assert_eq!(lines.join(" "), text, "budget {budget}");

            for line in &lines {
                let fits = m.width(line) <= budget;
                let single_word = !line.contains(' ');
                assert!(fits || single_word, "line {line:?} over budget {budget}");
            }
        }
    }
}
