use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static EMPHASIS_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("(ㅋ|ㅎ){2,}").expect("emphasis pattern must compile"));

const COLLAPSED_EMPHASIS: &str = "ㅋㅋ";

/// Collapses laughter runs (`ㅋㅋㅋㅋ`, `ㅎㅎㅎ`, mixed) to `ㅋㅋ`.
pub fn collapse_emphasis(text: &str) -> Cow<'_, str> {
    EMPHASIS_RUN.replace_all(text, COLLAPSED_EMPHASIS)
}
