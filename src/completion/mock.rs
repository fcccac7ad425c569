use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Completer, Completion};

/// A scripted reply for [`MockCompleter`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with this text.
    Text(String),
    /// Answer without content.
    Empty,
    /// Fail the call with this message.
    Fail(String),
}

/// A scripted completer for tests. Returns pre-defined replies in order and
/// records every prompt it was sent.
pub struct MockCompleter {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockCompleter {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A completer that always fails, simulating an unreachable service.
    pub fn failing(message: &str) -> Self {
        Self::new(vec![MockReply::Fail(message.to_string())])
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completer for MockCompleter {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        // A single scripted reply repeats forever
        let reply = match self.replies.len() {
            1 => &self.replies[0],
            _ => self.replies.get(i).ok_or_else(|| {
                anyhow!("MockCompleter: no more replies (called {} times)", i + 1)
            })?,
        };

        match reply {
            MockReply::Text(text) => Ok(Completion::text(text.clone())),
            MockReply::Empty => Ok(Completion::empty()),
            MockReply::Fail(message) => bail!("{message}"),
        }
    }
}
