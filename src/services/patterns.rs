use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Innocuous substitute written in place of a detected profanity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fruit {
    Apple,
    Banana,
    Strawberry,
    Watermelon,
    Grape,
    Melon,
    Peach,
    Mango,
}

impl Fruit {
    pub const ALL: [Fruit; 8] = [
        Fruit::Apple,
        Fruit::Banana,
        Fruit::Strawberry,
        Fruit::Watermelon,
        Fruit::Grape,
        Fruit::Melon,
        Fruit::Peach,
        Fruit::Mango,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fruit::Apple => "사과",
            Fruit::Banana => "바나나",
            Fruit::Strawberry => "딸기",
            Fruit::Watermelon => "수박",
            Fruit::Grape => "포도",
            Fruit::Melon => "참외",
            Fruit::Peach => "복숭아",
            Fruit::Mango => "망고",
        }
    }

    pub fn from_token(token: &str) -> Option<Fruit> {
        Fruit::ALL.into_iter().find(|fruit| fruit.as_str() == token)
    }

    /// The single original term this fruit is restored to.
    pub fn representative(&self) -> &'static str {
        reverse_entries()
            .iter()
            .find(|entry| entry.token == *self)
            .map(|entry| entry.representative)
            .unwrap_or_else(|| self.as_str())
    }
}

/// One family of profanity spellings, tried against text in declaration order.
pub struct DetectionRule {
    matcher: Regex,
    token: Fruit,
}

impl DetectionRule {
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn token(&self) -> Fruit {
        self.token
    }
}

/// Maps a fruit back to the term it stands for. `aliases` are the other
/// spellings folded into the same fruit; they are never produced on restore.
#[derive(Debug, Clone, Copy)]
pub struct ReverseEntry {
    pub token: Fruit,
    pub representative: &'static str,
    pub aliases: &'static [&'static str],
}

// Order is load-bearing: earlier rules rewrite first and later rules only
// see what is left.
const RULE_SOURCES: &[(&str, Fruit)] = &[
    (r"(씨+|시+)\s*발+", Fruit::Apple),
    (r"(ㅅ+\s*ㅂ+|시+바+|시이?발+|시\W*발+)", Fruit::Apple),
    (r"(\^+\s*ㅣ\s*발+)", Fruit::Apple),
    (r"(포+큐+|뽀+큐+)", Fruit::Apple),
    (r"(ㅗ+)", Fruit::Apple),
    (r"(병+신+|븅+신+|병신같+)", Fruit::Banana),
    (r"(ㅄ|병\W*신)", Fruit::Banana),
    (r"(개+\s*새+끼+|개+새+)", Fruit::Strawberry),
    (r"(개+같+|개+\W*같+)", Fruit::Watermelon),
    (r"(좆+같+|좆|좃|좇)", Fruit::Grape),
    (r"(꺼\s*져|ㄲ\s*ㅈ)", Fruit::Melon),
    (r"(썅+|쌍+놈+)", Fruit::Peach),
    (r"(미+친+|미쳤+)", Fruit::Mango),
    (r"(씹+|씨+이*입+)", Fruit::Grape),
];

const REVERSE_ENTRIES: &[ReverseEntry] = &[
    ReverseEntry {
        token: Fruit::Apple,
        representative: "시발",
        aliases: &["씨발", "시바", "ㅅㅂ"],
    },
    ReverseEntry {
        token: Fruit::Banana,
        representative: "병신",
        aliases: &["븅신", "ㅄ"],
    },
    ReverseEntry {
        token: Fruit::Strawberry,
        representative: "개새끼",
        aliases: &["개새"],
    },
    ReverseEntry {
        token: Fruit::Watermelon,
        representative: "개같네",
        aliases: &["개같은"],
    },
    ReverseEntry {
        token: Fruit::Grape,
        representative: "좆",
        aliases: &["좆같네", "씹"],
    },
    ReverseEntry {
        token: Fruit::Melon,
        representative: "꺼져",
        aliases: &["ㄲㅈ"],
    },
    ReverseEntry {
        token: Fruit::Peach,
        representative: "썅놈",
        aliases: &["쌍놈"],
    },
    ReverseEntry {
        token: Fruit::Mango,
        representative: "미친놈",
        aliases: &["미쳤네"],
    },
];

static DETECTION_RULES: Lazy<Vec<DetectionRule>> = Lazy::new(|| {
    RULE_SOURCES
        .iter()
        .map(|&(pattern, token)| DetectionRule {
            matcher: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("detection pattern must compile"),
            token,
        })
        .collect()
});

static TOKEN_MATCHER: Lazy<Regex> = Lazy::new(|| {
    let alternation = Fruit::ALL
        .iter()
        .map(|fruit| regex::escape(fruit.as_str()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).expect("token alternation must compile")
});

pub fn detection_rules() -> &'static [DetectionRule] {
    &DETECTION_RULES
}

pub fn reverse_entries() -> &'static [ReverseEntry] {
    REVERSE_ENTRIES
}

/// Finds substitute tokens already present in a string.
pub fn token_matcher() -> &'static Regex {
    &TOKEN_MATCHER
}
