use std::sync::Arc;

use crate::assistant::model::{ChatMessage, ChatModel, ModelError};
use crate::assistant::threads::DialogueThreads;
use crate::tasks::repo::Task;

const SYSTEM_INSTRUCTION: &str = "You are a personal task assistant. Answer the user's \
questions using their task list when it is provided, and keep replies short.";

/// Thread key shared by all unauthenticated demo conversations.
pub const DEMO_THREAD_KEY: &str = "demo";

pub fn user_thread_key(user_id: i64) -> String {
    format!("user-{user_id}")
}

/// Per-caller context gathered from the stores before a submission.
pub struct UserContext {
    pub display_name: String,
    pub tasks: Vec<Task>,
}

fn task_listing(tasks: &[Task]) -> String {
    tasks
        .iter()
        .map(|t| format!("{}: {}", t.title, t.description.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn context_messages(context: &UserContext) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are assisting {}.",
            context.display_name
        )),
        ChatMessage::system(format!(
            "Their current tasks:\n{}",
            task_listing(&context.tasks)
        )),
    ]
}

/// Assembles a submission and drives the external model: system instruction,
/// caller context, prior thread turns, then the new message. The per-thread
/// lock is held across the model call, so a thread is either idle or waiting
/// on exactly one reply.
pub struct Assistant {
    model: Arc<dyn ChatModel>,
    threads: Arc<DialogueThreads>,
    step_budget: u32,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>, threads: Arc<DialogueThreads>, step_budget: u32) -> Self {
        Self {
            model,
            threads,
            step_budget,
        }
    }

    pub async fn chat(
        &self,
        thread_key: &str,
        context: Option<&UserContext>,
        message: &str,
    ) -> Result<String, ModelError> {
        let thread = self.threads.thread(thread_key);
        let mut history = thread.lock().await;

        let mut messages = Vec::with_capacity(history.len() + 4);
        messages.push(ChatMessage::system(SYSTEM_INSTRUCTION));
        if let Some(context) = context {
            messages.extend(context_messages(context));
        }
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(message));

        let reply = self
            .model
            .send(thread_key, &messages, self.step_budget)
            .await?;

        // only committed turns enter the history; context is rebuilt per call
        history.push(ChatMessage::user(message));
        history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    pub fn reset(&self, thread_key: &str) {
        self.threads.reset(thread_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::model::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::OffsetDateTime;

    #[derive(Default)]
    struct FakeModel {
        calls: Mutex<Vec<(String, Vec<ChatMessage>, u32)>>,
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn send(
            &self,
            thread_key: &str,
            messages: &[ChatMessage],
            step_budget: u32,
        ) -> Result<String, ModelError> {
            self.calls.lock().unwrap().push((
                thread_key.to_string(),
                messages.to_vec(),
                step_budget,
            ));
            Ok(format!("reply {}", self.calls.lock().unwrap().len()))
        }
    }

    fn task(title: &str, description: Option<&str>) -> Task {
        Task {
            id: 1,
            title: title.into(),
            description: description.map(Into::into),
            owner_id: 1,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn assistant(model: &Arc<FakeModel>) -> Assistant {
        Assistant::new(
            model.clone() as Arc<dyn ChatModel>,
            Arc::new(DialogueThreads::default()),
            10,
        )
    }

    #[tokio::test]
    async fn context_includes_name_and_flattened_tasks() {
        let model = Arc::new(FakeModel::default());
        let engine = assistant(&model);
        let context = UserContext {
            display_name: "bob".into(),
            tasks: vec![task("Buy milk", None), task("Call mom", Some("on sunday"))],
        };

        engine
            .chat("user-1", Some(&context), "What should I buy?")
            .await
            .expect("chat");

        let calls = model.calls.lock().unwrap();
        let (key, messages, budget) = &calls[0];
        assert_eq!(key, "user-1");
        assert_eq!(*budget, 10);

        let systems: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(systems.len(), 3);
        assert!(systems[1].contains("bob"));
        assert!(systems[2].contains("Buy milk: \n"));
        assert!(systems[2].contains("Call mom: on sunday"));

        let last = messages.last().expect("user message");
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "What should I buy?");
    }

    #[tokio::test]
    async fn demo_submission_carries_no_user_context() {
        let model = Arc::new(FakeModel::default());
        let engine = assistant(&model);

        engine.chat(DEMO_THREAD_KEY, None, "hi").await.expect("chat");

        let calls = model.calls.lock().unwrap();
        let (_, messages, _) = &calls[0];
        let systems = messages.iter().filter(|m| m.role == Role::System).count();
        assert_eq!(systems, 1);
    }

    #[tokio::test]
    async fn history_accumulates_and_reset_clears_it() {
        let model = Arc::new(FakeModel::default());
        let engine = assistant(&model);

        engine.chat("user-1", None, "first").await.expect("chat");
        engine.chat("user-1", None, "second").await.expect("chat");

        {
            let calls = model.calls.lock().unwrap();
            let (_, messages, _) = &calls[1];
            // instruction + first turn pair + new message
            assert_eq!(messages.len(), 4);
            assert!(messages.iter().any(|m| m.content == "first"));
            assert!(messages.iter().any(|m| m.content == "reply 1"));
        }

        engine.reset("user-1");
        engine.chat("user-1", None, "third").await.expect("chat");

        let calls = model.calls.lock().unwrap();
        let (_, messages, _) = &calls[2];
        assert_eq!(messages.len(), 2);
        assert!(!messages.iter().any(|m| m.content == "first"));
    }

    #[tokio::test]
    async fn model_failure_leaves_history_untouched() {
        struct FailingModel;

        #[async_trait]
        impl ChatModel for FailingModel {
            async fn send(
                &self,
                _thread_key: &str,
                _messages: &[ChatMessage],
                _step_budget: u32,
            ) -> Result<String, ModelError> {
                Err(ModelError::Transport("connection refused".into()))
            }
        }

        let threads = Arc::new(DialogueThreads::default());
        let engine = Assistant::new(Arc::new(FailingModel), threads.clone(), 10);
        assert!(engine.chat("user-1", None, "hello").await.is_err());
        assert!(threads.thread("user-1").lock().await.is_empty());
    }
}
