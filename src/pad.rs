//! Fixed-width padding for the play-count indicator.

/// Width of the `n/N` play-count column.
pub const INDICATOR_WIDTH: usize = 7;

/// Fill character for the play-count column.
pub const INDICATOR_PAD: &str = ".";

/// Right-pads `s` with repetitions of `pad` and truncates to exactly `width`
/// characters.
///
/// Widths are counted in `char`s. An empty `pad` falls back to a single
/// space so the result always has the requested width.
///
/// ```
/// use playlens::pad::pad_right;
///
/// assert_eq!(pad_right("1/3", ".", 7), "1/3....");
/// assert_eq!(pad_right("1000/100", ".", 7), "1000/10");
/// ```
pub fn pad_right(s: &str, pad: &str, width: usize) -> String {
    let pad = if pad.is_empty() { " " } else { pad };
    s.chars().chain(pad.chars().cycle()).take(width).collect()
}

/// Formats the `current/total` indicator shown in front of play names.
pub fn play_count_indicator(current: u32, total: u32) -> String {
    pad_right(&format!("{current}/{total}"), INDICATOR_PAD, INDICATOR_WIDTH)
}
