use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

// Group-identity terms (gender, orientation, race, nationality, disability,
// age) plus the particles commonly attached to them.
const PROTECTED_CATEGORY_PATTERNS: &[&str] = &[
    r"(여자|남자|게이|레즈|흑인|백인|중국인|일본인|동남아|장애인|정신병자|틀딱|꼰대)(를|들|은|이|야|들아|한테)?",
];

static PROTECTED_CATEGORIES: Lazy<Vec<Regex>> = Lazy::new(|| {
    PROTECTED_CATEGORY_PATTERNS
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("protected-category pattern must compile")
        })
        .collect()
});

/// True when the text refers to a protected group. Never alters the text.
pub fn targets_protected_category(text: &str) -> bool {
    PROTECTED_CATEGORIES
        .iter()
        .any(|pattern| pattern.is_match(text))
}
