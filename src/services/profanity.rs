use crate::services::normalizer::collapse_emphasis;
use crate::services::patterns::{DetectionRule, Fruit, detection_rules, token_matcher};

/// Text split around substitute tokens. Rules only ever see `Raw` pieces, so
/// a fruit is never matched or merged into a neighbouring match.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Raw(String),
    Token(Fruit),
}

/// Replaces every detected profanity with its fruit. Returns the censored
/// text and whether any rule fired.
pub fn filter_profanity(text: &str) -> (String, bool) {
    let normalized = collapse_emphasis(text);
    let mut segments = split_on_tokens(&normalized);
    let mut has_profanity = false;

    for rule in detection_rules() {
        let (rewritten, matched) = apply_rule(rule, segments);
        segments = rewritten;
        has_profanity |= matched;
    }

    (join(&segments), has_profanity)
}

pub fn censor(text: &str) -> String {
    filter_profanity(text).0
}

fn split_on_tokens(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for found in token_matcher().find_iter(text) {
        let Some(fruit) = Fruit::from_token(found.as_str()) else {
            continue;
        };
        if found.start() > last {
            segments.push(Segment::Raw(text[last..found.start()].to_string()));
        }
        segments.push(Segment::Token(fruit));
        last = found.end();
    }

    if last < text.len() {
        segments.push(Segment::Raw(text[last..].to_string()));
    }

    segments
}

fn apply_rule(rule: &DetectionRule, segments: Vec<Segment>) -> (Vec<Segment>, bool) {
    let mut rewritten = Vec::with_capacity(segments.len());
    let mut matched = false;

    for segment in segments {
        let raw = match segment {
            Segment::Raw(raw) => raw,
            token => {
                rewritten.push(token);
                continue;
            }
        };

        let mut last = 0;
        for found in rule.matcher().find_iter(&raw) {
            if found.is_empty() {
                continue;
            }
            if found.start() > last {
                rewritten.push(Segment::Raw(raw[last..found.start()].to_string()));
            }
            rewritten.push(Segment::Token(rule.token()));
            last = found.end();
        }

        if last == 0 {
            rewritten.push(Segment::Raw(raw));
        } else {
            matched = true;
            if last < raw.len() {
                rewritten.push(Segment::Raw(raw[last..].to_string()));
            }
        }
    }

    (rewritten, matched)
}

fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Raw(raw) => raw.as_str(),
            Segment::Token(fruit) => fruit.as_str(),
        })
        .collect()
}
