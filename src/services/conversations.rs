//! # 대화 상태 관리자 (세션 저장소)
//!
//! 세션 ID별 대화 상태(턴, 교정, 힌트)를 메모리에 보관합니다.
//!
//! ## 라이프사이클
//! ```text
//! 첫 채팅 요청 → get_or_create() → append_turn() / record_*() ... → (선택) DB 저장
//! ```
//! 세션은 한 번 만들어지면 프로세스가 끝날 때까지 사라지지 않습니다.
//! 만료(TTL)나 개수 제한은 없으므로 메모리는 세션 수와 대화 길이에 비례해 늘어납니다.
//!
//! ## 동시성
//! `Arc<RwLock<HashMap>>`으로 공유하며, 락은 맵을 읽고 쓰는 짧은 구간에만 잡습니다.
//! `.await` 동안에는 락을 잡지 않으므로, 느린 LLM 호출 중에도
//! 다른 세션의 요청이 막히지 않습니다.

use crate::error::AppError;
use crate::models::{Conversation, Correction, FeedItem, Hint, Role, Turn};
use crate::services::render;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// LLM에 보내는 대화 이력의 최대 턴 수 (시스템 프롬프트 제외)
pub const CONTEXT_WINDOW: usize = 10;

/// 세션 ID → 대화 상태
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    sessions: Arc<RwLock<HashMap<String, Conversation>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    // 다른 스레드가 락을 잡은 채 패닉해도 맵 자체는 일관된 상태이므로 그대로 사용합니다.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Conversation>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Conversation>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// 세션의 대화를 돌려주고, 없으면 `language`로 새로 만듭니다.
    ///
    /// 이미 있는 세션이면 `language`는 무시됩니다.
    pub fn get_or_create(&self, session_id: &str, language: &str) -> Conversation {
        let mut sessions = self.write();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, language, "Creating conversation");
                Conversation::new(session_id, language)
            })
            .clone()
    }

    /// 세션 대화의 복사본 (없으면 None)
    pub fn snapshot(&self, session_id: &str) -> Option<Conversation> {
        self.read().get(session_id).cloned()
    }

    /// 새 턴을 현재 시각으로 덧붙입니다.
    pub fn append_turn(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<Turn, AppError> {
        let turn = Turn::new(role, content);
        self.with_conversation(session_id, |conv| conv.turns.push(turn.clone()))?;
        Ok(turn)
    }

    /// 교정 기록을 덧붙입니다. 중복 제거나 개수 제한은 없습니다.
    pub fn record_correction(
        &self,
        session_id: &str,
        correction: Correction,
    ) -> Result<(), AppError> {
        self.with_conversation(session_id, |conv| conv.corrections.push(correction))
    }

    pub fn record_hint(&self, session_id: &str, hint: Hint) -> Result<(), AppError> {
        self.with_conversation(session_id, |conv| conv.hints.push(hint))
    }

    /// LLM에 보낼 문맥: 시스템 턴 하나 + 최근 최대 10턴 (시간순)
    ///
    /// 잘려 나간 이전 턴은 요약되지 않고 모델에게서만 빠집니다.
    /// 세션과 저장된 기록에는 그대로 남습니다.
    pub fn build_model_context(
        &self,
        session_id: &str,
        system_prompt: &str,
    ) -> Result<Vec<Turn>, AppError> {
        let sessions = self.read();
        let conv = sessions
            .get(session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;

        let start = conv.turns.len().saturating_sub(CONTEXT_WINDOW);
        let mut context = Vec::with_capacity(conv.turns.len() - start + 1);
        context.push(Turn::new(Role::System, system_prompt));
        context.extend_from_slice(&conv.turns[start..]);
        Ok(context)
    }

    /// 교정과 힌트를 하나의 피드로 합칩니다 — 최신 항목이 먼저 옵니다.
    ///
    /// 세션이 없으면 빈 피드입니다.
    /// 시각이 같은 항목은 교정이 힌트보다 먼저 오고, 같은 종류끼리는 기록 순서를 따릅니다.
    pub fn feed(&self, session_id: &str) -> Vec<FeedItem> {
        let sessions = self.read();
        let Some(conv) = sessions.get(session_id) else {
            return Vec::new();
        };

        // 기록 순서의 역순으로 놓은 뒤 안정 정렬(sort_by)합니다.
        let mut items: Vec<FeedItem> = conv
            .corrections
            .iter()
            .rev()
            .cloned()
            .map(FeedItem::Correction)
            .chain(conv.hints.iter().rev().cloned().map(FeedItem::Hint))
            .collect();
        items.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        items
    }

    /// 피드를 HTML 조각으로 렌더링합니다. 비어 있으면 고정 안내 문구입니다.
    pub fn render(&self, session_id: &str) -> String {
        render::render_feed(&self.feed(session_id))
    }

    fn with_conversation<F>(&self, session_id: &str, f: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Conversation),
    {
        let mut sessions = self.write();
        let conv = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?;
        f(conv);
        Ok(())
    }
}
