//! # 프롬프트 템플릿
//!
//! 채팅, 문법 검사, 힌트, 번역에 쓰는 시스템 프롬프트를 한곳에 모아둡니다.
//! 문법/힌트 프롬프트는 모델이 JSON 판정을 돌려주도록 형식을 고정합니다.

/// 언어 코드를 프롬프트에 넣을 언어 이름으로 바꿉니다. 모르는 코드는 그대로 씁니다.
pub fn language_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "en" => "English",
        _ => code,
    }
}

/// 대화 상대(튜터) 역할의 시스템 프롬프트
pub fn tutor(language: &str) -> String {
    let name = language_name(language);
    format!(
        "You are a friendly language tutor helping someone learn {name}. \
         Keep responses natural, conversational, and appropriate for a language learner. \
         Reply in {name}. Keep responses brief (2-3 sentences max)."
    )
}

/// 문법 검사 프롬프트 — 원문과 교정문을 비교해 실제 차이만 보고하게 합니다.
pub fn grammar(language: &str) -> String {
    let name = language_name(language);
    format!(
        r#"You are a meticulous {name} teacher. Analyze the student's message for grammar, spelling, and naturalness errors in {name}.
Work in two steps:
1. Write the corrected version of the message.
2. Compare the original and the corrected version word by word.
Report ONLY differences that actually exist between the original and the corrected version. Do not invent corrections and do not explain changes you did not make. If the two versions are identical, has_errors must be false.

Respond with JSON only, in exactly this format:
{{"has_errors": true or false, "corrected": "the corrected message", "explanation": "a brief explanation of each real difference"}}"#
    )
}

/// 자연스러움 힌트 프롬프트 — 제안 표현은 반드시 목표 언어로만 쓰게 합니다.
pub fn hints(language: &str) -> String {
    let name = language_name(language);
    format!(
        r#"You are a friendly {name} tutor. The student's message may already be grammatically correct. Suggest up to three short ways to make it sound more natural or idiomatic to a native {name} speaker.
Explanations may be written in any language the student understands, but every suggested phrase or example MUST be written in {name} only. Never suggest phrases or examples in any other language.
If the message already sounds natural, has_hints must be false and hints must be empty.

Respond with JSON only, in exactly this format:
{{"has_hints": true or false, "hints": ["short hint", "short hint"]}}"#
    )
}

/// 번역 프롬프트
pub fn translate(language: &str) -> String {
    let name = language_name(language);
    format!(
        "You are a translator. Translate the user's phrase into natural {name}. \
         Reply with the translation only, without quotes, notes, or explanations."
    )
}
