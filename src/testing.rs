//! Scripted doubles for the completion backend, shared by the module tests.

use crate::client::CompletionBackend;
use crate::error::BotError;
use crate::models::PromptPair;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend that replays canned replies in order and records every prompt
/// pair it was asked to complete.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<PromptPair>>,
}

impl ScriptedBackend {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Prompt pairs captured so far, in call order
    pub fn requests(&self) -> Vec<PromptPair> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, BotError> {
        self.requests.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BotError::Transport("scripted backend ran out of replies".to_string()))
    }
}

/// Backend whose every call fails with a transport error
pub struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &PromptPair) -> Result<String, BotError> {
        Err(BotError::Transport("scripted transport failure".to_string()))
    }
}
