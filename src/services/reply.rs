use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::services::category_guard::targets_protected_category;
use crate::services::profanity::{censor, filter_profanity};
use crate::services::rewriter::{GenerationParams, RewriteCapability};
use crate::utils::error::RewriteError;

pub const TONE_DOWN_NOTICE: &str =
    "금지 범주가 포함되어 톤다운했습니다. 주장은 대상 일반화 없이 팩트로만 하십시오.";
pub const INSUFFICIENT_CONTENT: &str = "내용이 빈약하다. 주장부터 다시 챙겨와라.";
pub const MAX_FALLBACK_CHARS: usize = 120;
const TRUNCATION_MARKER: &str = "…";
const OUTPUT_MARKER: &str = "[출력]";

pub const ENDING_TOKENS: &[&str] = &["ㅋㅋ", "ㄹㅇ", "ㅇㅈ?", "팩트지", "^^", "ㅇㅋ?"];
pub const SPICY_INSERTS: &[&str] = &[
    "논리도 없네",
    "팩트 앞에선 답 못하냐",
    "뇌절 오지네",
    "찐으로 이게 말이 된다고 생각함?",
    "팩폭 당하니까 말문 막혔냐",
];

const STYLE_DIRECTIVE: &str = "너는 공격적 밈 톤이지만, 인신공격·혐오·차별은 금지. \
욕설은 절대 직접 쓰지 말고 과일명으로 치환. \
핵심만 짧고 직설적으로, 말끝 흐리지 말고, 드립은 건조하게. \
상대 비방 대신 논리/팩트를 근거로 비트는 방식.";

/// Turns user text into a safe reply:
/// guard check, censor, optional rewrite, censor again.
pub struct ReplyOrchestrator {
    capability: RewriteCapability,
    params: GenerationParams,
    timeout: Duration,
}

impl ReplyOrchestrator {
    pub fn new(capability: RewriteCapability, timeout: Duration) -> Self {
        Self {
            capability,
            params: GenerationParams::default(),
            timeout,
        }
    }

    pub fn capability(&self) -> &RewriteCapability {
        &self.capability
    }

    pub async fn generate_reply(&self, user_input: &str) -> String {
        let mut rng = StdRng::from_entropy();
        self.generate_reply_with(user_input, &mut rng).await
    }

    pub async fn generate_reply_with<R>(&self, user_input: &str, rng: &mut R) -> String
    where
        R: Rng + Send,
    {
        if targets_protected_category(user_input) {
            tracing::debug!("Protected category referenced, toning down");
            return tone_down(user_input);
        }

        let (cleaned, has_profanity) = filter_profanity(user_input);
        tracing::debug!("Input censored (profanity substituted: {})", has_profanity);

        let draft = match self.rewrite(user_input, &cleaned).await {
            Some(text) => text,
            None => rule_based_fallback(&cleaned, rng),
        };

        censor(&draft)
    }

    async fn rewrite(&self, user_input: &str, cleaned: &str) -> Option<String> {
        let RewriteCapability::Available(rewriter) = &self.capability else {
            return None;
        };

        let prompt = community_tone_prompt(user_input, cleaned);
        let result = match tokio::time::timeout(
            self.timeout,
            rewriter.rewrite(&prompt, &self.params),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RewriteError::Timeout {
                millis: self.timeout.as_millis(),
            }),
        };

        match result {
            Ok(generated) => {
                let answer = extract_answer(&generated);
                if answer.is_empty() {
                    tracing::warn!("Rewrite returned an empty answer, using fallback");
                    None
                } else {
                    Some(answer.to_string())
                }
            }
            Err(e) => {
                tracing::warn!("Rewrite failed, using fallback: {}", e);
                None
            }
        }
    }
}

pub fn tone_down(user_input: &str) -> String {
    format!("{}\n{}", censor(user_input), TONE_DOWN_NOTICE)
}

pub fn community_tone_prompt(user_input: &str, cleaned: &str) -> String {
    format!(
        "{STYLE_DIRECTIVE}\n\n\
         [유저 입력]\n{user_input}\n\n\
         [규칙]\n\
         1) 욕설은 전부 과일명으로 대체된 상태를 유지.\n\
         2) 특정 집단 비하/차별적 맥락은 배제하고, 사실/논리/풍자 위주.\n\
         3) 한 문단 1~3문장, 직설/간결/도치 표현 가끔 사용.\n\
         4) 결론 먼저, 근거 짧게.\n\n\
         [초안(치환 적용)]\n{cleaned}\n\n\
         {OUTPUT_MARKER}\n초안을 밈 톤으로 다듬되, 과일치환은 그대로 유지해서 최종 답변만 출력."
    )
}

/// Models tend to echo the prompt; keep only what follows the last output marker.
pub fn extract_answer(generated: &str) -> &str {
    match generated.rsplit_once(OUTPUT_MARKER) {
        Some((_, answer)) => answer.trim(),
        None => generated.trim(),
    }
}

pub fn rule_based_fallback<R>(cleaned: &str, rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let base = cleaned.trim();
    if base.is_empty() {
        return INSUFFICIENT_CONTENT.to_string();
    }

    let base = truncate_chars(base, MAX_FALLBACK_CHARS);
    let spice = SPICY_INSERTS.choose(rng).copied().unwrap_or_default();
    let ending = ENDING_TOKENS.choose(rng).copied().unwrap_or_default();

    format!("{base} {spice} {ending}")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rewriter::TextRewriter;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedRewriter {
        output: Result<String, ()>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedRewriter {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                output: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                output: Err(()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn stalled() -> Arc<Self> {
            Arc::new(Self {
                output: Ok("너무 늦은 답".to_string()),
                delay: Duration::from_secs(60),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextRewriter for ScriptedRewriter {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn rewrite(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, RewriteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains(OUTPUT_MARKER));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.output.clone().map_err(|_| RewriteError::EmptyOutput)
        }
    }

    fn orchestrator_with(rewriter: Arc<ScriptedRewriter>) -> ReplyOrchestrator {
        ReplyOrchestrator::new(
            RewriteCapability::Available(rewriter),
            Duration::from_millis(100),
        )
    }

    fn rule_based() -> ReplyOrchestrator {
        ReplyOrchestrator::new(
            RewriteCapability::Unavailable {
                reason: "test".to_string(),
            },
            Duration::from_millis(100),
        )
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn assert_fallback_shape(reply: &str, base: &str) {
        assert!(reply.starts_with(base), "reply: {reply}");
        assert!(
            ENDING_TOKENS.iter().any(|ending| reply.ends_with(ending)),
            "reply: {reply}"
        );
        assert!(
            SPICY_INSERTS.iter().any(|spice| reply.contains(spice)),
            "reply: {reply}"
        );
    }

    #[tokio::test]
    async fn test_protected_category_tones_down_without_rewrite() {
        let rewriter = ScriptedRewriter::replying("쓰면 안 되는 답");
        let orchestrator = orchestrator_with(rewriter.clone());

        let reply = orchestrator
            .generate_reply_with("일본인이 시발 뭐래", &mut seeded())
            .await;

        assert_eq!(reply, format!("일본인이 사과 뭐래\n{TONE_DOWN_NOTICE}"));
        assert_eq!(rewriter.calls(), 0);
    }

    #[tokio::test]
    async fn test_rewrite_output_is_censored_again() {
        let rewriter = ScriptedRewriter::replying("프롬프트 에코 [출력]\n 그건 시발 말이 안 되지 ");
        let orchestrator = orchestrator_with(rewriter.clone());

        let reply = orchestrator
            .generate_reply_with("시발 이게 맞냐", &mut seeded())
            .await;

        assert_eq!(reply, "그건 사과 말이 안 되지");
        assert_eq!(rewriter.calls(), 1);
    }

    #[tokio::test]
    async fn test_rewrite_failure_falls_back() {
        let orchestrator = orchestrator_with(ScriptedRewriter::failing());

        let reply = orchestrator
            .generate_reply_with("병신 같은 주장", &mut seeded())
            .await;

        assert_fallback_shape(&reply, "바나나 같은 주장");
    }

    #[tokio::test]
    async fn test_rewrite_timeout_falls_back() {
        let rewriter = ScriptedRewriter::stalled();
        let orchestrator = orchestrator_with(rewriter.clone());

        let reply = orchestrator
            .generate_reply_with("꺼져 진짜", &mut seeded())
            .await;

        assert_fallback_shape(&reply, "참외 진짜");
        assert_eq!(rewriter.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_answer_falls_back() {
        let orchestrator = orchestrator_with(ScriptedRewriter::replying("에코만 [출력]   "));

        let reply = orchestrator
            .generate_reply_with("그냥 의견", &mut seeded())
            .await;

        assert_fallback_shape(&reply, "그냥 의견");
    }

    #[tokio::test]
    async fn test_rule_based_mode() {
        let reply = rule_based()
            .generate_reply_with("미친 소리 ㅋㅋㅋㅋㅋ", &mut seeded())
            .await;

        assert_fallback_shape(&reply, "망고 소리 ㅋㅋ");
    }

    #[tokio::test]
    async fn test_empty_input_gets_insufficient_content() {
        assert_eq!(rule_based().generate_reply("").await, INSUFFICIENT_CONTENT);
        assert_eq!(rule_based().generate_reply("   ").await, INSUFFICIENT_CONTENT);
    }

    #[test]
    fn test_fallback_truncates_long_input() {
        let long = "가".repeat(200);
        let reply = rule_based_fallback(&long, &mut seeded());
        let expected_base = format!("{}…", "가".repeat(MAX_FALLBACK_CHARS));
        assert!(reply.starts_with(&expected_base));
        assert!(!reply.starts_with(&"가".repeat(MAX_FALLBACK_CHARS + 1)));
    }

    #[test]
    fn test_fallback_keeps_exact_limit() {
        let exact = "나".repeat(MAX_FALLBACK_CHARS);
        let reply = rule_based_fallback(&exact, &mut seeded());
        assert!(reply.starts_with(&format!("{exact} ")));
        assert!(!reply.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_fallback_is_seed_deterministic() {
        let a = rule_based_fallback("같은 입력", &mut StdRng::seed_from_u64(42));
        let b = rule_based_fallback("같은 입력", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_answer() {
        assert_eq!(extract_answer("a [출력] b [출력]  final "), "final");
        assert_eq!(extract_answer("  no marker  "), "no marker");
    }

    #[test]
    fn test_prompt_contains_input_and_draft() {
        let prompt = community_tone_prompt("시발 원문", "사과 원문");
        assert!(prompt.starts_with(STYLE_DIRECTIVE));
        assert!(prompt.contains("[유저 입력]\n시발 원문"));
        assert!(prompt.contains("[초안(치환 적용)]\n사과 원문"));
        assert!(prompt.trim_end().ends_with("최종 답변만 출력."));
    }
}
