//! # 구조화된 판정(structured judgment) 추출
//!
//! 모델은 JSON을 설명 문장이나 마크다운 코드 블록으로 감싸서 돌려주는 일이 많습니다.
//! 이 모듈은 답변 텍스트 어디에 있든 처음 나오는 균형 잡힌 `{ ... }` JSON 객체를 찾아
//! 원하는 타입으로 변환합니다.
//!
//! 결과는 예외가 아니라 합 타입(`Judgment`)으로 돌려주며,
//! 호출하는 쪽은 `Unparseable`을 항상 정해진 대체 판정으로 바꿉니다.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// 판정 추출 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Judgment<T> {
    Parsed(T),
    Unparseable,
}

/// 답변 텍스트에서 첫 번째 JSON 객체를 찾아 `T`로 변환합니다.
///
/// `{`가 나올 때마다 짝이 맞는 `}`까지 잘라 JSON 객체로 파싱해 봅니다.
/// 처음으로 파싱에 성공한 객체가 `T`로 변환되지 않으면 `Unparseable`입니다.
pub fn extract<T: DeserializeOwned>(raw: &str) -> Judgment<T> {
    let mut offset = 0;

    while let Some(pos) = raw[offset..].find('{') {
        let start = offset + pos;
        if let Some(end) = balanced_end(&raw[start..]) {
            let candidate = &raw[start..start + end];
            if let Ok(object) = serde_json::from_str::<Map<String, Value>>(candidate) {
                return match serde_json::from_value(Value::Object(object)) {
                    Ok(parsed) => Judgment::Parsed(parsed),
                    Err(_) => Judgment::Unparseable,
                };
            }
        }
        // '{'는 1바이트이므로 다음 위치도 항상 문자 경계입니다.
        offset = start + 1;
    }

    Judgment::Unparseable
}

/// `text`가 `{`로 시작한다고 보고, 짝이 맞는 `}` 바로 뒤의 바이트 위치를 돌려줍니다.
///
/// 문자열 리터럴 안의 중괄호와 이스케이프(`\"`)는 세지 않습니다.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        ok: bool,
        #[serde(default)]
        note: String,
    }

    #[test]
    fn finds_object_wrapped_in_prose_and_fences() {
        let raw = "Sure! Here is my analysis:\n```json\n{\"ok\": true, \"note\": \"fine\"}\n```\nHope it helps.";
        assert_eq!(
            extract::<Probe>(raw),
            Judgment::Parsed(Probe {
                ok: true,
                note: "fine".into()
            })
        );
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let raw = r#"{"ok": false, "note": "use {} and \"quotes\" carefully"} trailing }"#;
        assert_eq!(
            extract::<Probe>(raw),
            Judgment::Parsed(Probe {
                ok: false,
                note: "use {} and \"quotes\" carefully".into()
            })
        );
    }

    #[test]
    fn skips_brace_runs_that_are_not_json() {
        let raw = "Format {like this}. Answer: {\"ok\": true}";
        assert_eq!(
            extract::<Probe>(raw),
            Judgment::Parsed(Probe {
                ok: true,
                note: String::new()
            })
        );
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Outer {
            inner: Probe,
        }
        let raw = r#"result: {"inner": {"ok": true}}"#;
        assert!(matches!(extract::<Outer>(raw), Judgment::Parsed(_)));
    }

    #[test]
    fn missing_or_mismatched_object_is_unparseable() {
        assert_eq!(extract::<Probe>("no json here"), Judgment::Unparseable);
        assert_eq!(extract::<Probe>("{\"ok\": true"), Judgment::Unparseable);
        assert_eq!(extract::<Probe>("{\"ok\": \"yes\"}"), Judgment::Unparseable);
        assert_eq!(extract::<Probe>(""), Judgment::Unparseable);
    }
}
