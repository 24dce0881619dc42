//! # 학습 포인트 피드 HTML 렌더링
//!
//! 교정/힌트 피드를 프론트엔드가 그대로 끼워 넣을 HTML 조각으로 변환합니다.
//!
//! 메시지, 교정문, 설명, 힌트는 모두 사용자나 모델이 만든 신뢰할 수 없는 텍스트입니다.
//! 마크업에 넣기 전에 **모든** 텍스트 필드를 `escape_html()`로 이스케이프해야 합니다 (XSS 방지).

use crate::models::{Correction, Explanation, FeedItem, Hint};

/// 교정도 힌트도 없을 때의 안내 문구
pub const EMPTY_FEED: &str =
    r#"<p class="empty-state">No learning points yet. Keep practicing!</p>"#;

/// `POST /api/save` 성공 조각
pub const SAVED: &str = r#"<span style="color: green;">✓ Saved!</span>"#;

/// `POST /api/save` 대상 세션이 없을 때의 조각
pub const NOTHING_TO_SAVE: &str = r#"<span style="color: red;">No conversation to save</span>"#;

/// HTML 특수문자 5개(`& < > " '`)를 엔티티로 바꿉니다.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 피드 전체를 렌더링합니다. 항목 순서는 그대로 유지합니다.
pub fn render_feed(items: &[FeedItem]) -> String {
    if items.is_empty() {
        return EMPTY_FEED.to_string();
    }

    items
        .iter()
        .map(|item| match item {
            FeedItem::Correction(c) => render_correction(c),
            FeedItem::Hint(h) => render_hint(h),
        })
        .collect()
}

fn render_correction(correction: &Correction) -> String {
    format!(
        r#"
<div class="correction-item">
    <div class="original">{}</div>
    <div class="corrected">✓ {}</div>
    <div class="explanation">{}</div>
</div>
"#,
        escape_html(&correction.source_message),
        escape_html(&correction.corrected_text),
        render_explanation(&correction.explanation),
    )
}

fn render_explanation(explanation: &Explanation) -> String {
    match explanation {
        Explanation::Text(text) => escape_html(text),
        Explanation::Points(points) => render_list(points),
    }
}

fn render_hint(hint: &Hint) -> String {
    format!(
        r#"
<div class="hint-item">
    <div class="original">{}</div>
    <div class="hints">{}</div>
</div>
"#,
        escape_html(&hint.source_message),
        render_list(&hint.hints),
    )
}

fn render_list(items: &[String]) -> String {
    let lis: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    format!("<ul>{}</ul>", lis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("¿Qué tal?"), "¿Qué tal?");
    }

    #[test]
    fn empty_feed_renders_placeholder() {
        assert_eq!(render_feed(&[]), EMPTY_FEED);
    }

    #[test]
    fn script_tags_in_every_field_are_escaped() {
        let payload = "<script>alert(1)</script>";
        let items = vec![
            FeedItem::Hint(Hint {
                source_message: payload.into(),
                hints: vec![payload.into()],
                timestamp: Utc::now(),
            }),
            FeedItem::Correction(Correction {
                source_message: payload.into(),
                corrected_text: payload.into(),
                explanation: Explanation::Points(vec![payload.into()]),
                timestamp: Utc::now(),
            }),
            FeedItem::Correction(Correction {
                source_message: "ok".into(),
                corrected_text: "ok".into(),
                explanation: Explanation::Text(payload.into()),
                timestamp: Utc::now(),
            }),
        ];

        let html = render_feed(&items);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn renders_items_in_given_order_with_kind_markup() {
        let items = vec![
            FeedItem::Hint(Hint {
                source_message: "Estoy bien".into(),
                hints: vec!["Prueba «Todo bien»".into()],
                timestamp: Utc::now(),
            }),
            FeedItem::Correction(Correction {
                source_message: "Yo es".into(),
                corrected_text: "Yo soy".into(),
                explanation: Explanation::Text("ser: yo soy".into()),
                timestamp: Utc::now(),
            }),
        ];

        let html = render_feed(&items);
        let hint = html.find(r#"class="hint-item""#).unwrap();
        let correction = html.find(r#"class="correction-item""#).unwrap();
        assert!(hint < correction);
        assert!(html.contains("<li>Prueba «Todo bien»</li>"));
        assert!(html.contains(r#"<div class="corrected">✓ Yo soy</div>"#));
    }
}
