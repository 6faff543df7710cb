use std::{collections::HashMap, sync::Mutex};

use {async_trait::async_trait, uuid::Uuid};

use crate::{
    error::{Error, Result},
    store::{Directory, InsertOutcome},
    types::{CannedResponse, Conversation, NewConversation, Trigger},
};

#[derive(Default)]
struct Inner {
    conversations: Vec<Conversation>,
    triggers: HashMap<String, Trigger>,
    responses: Vec<CannedResponse>,
    offline: bool,
}

/// In-memory session directory for tests and local development.
///
/// All operations go through a single mutex, which makes the conditional
/// insert naturally atomic.
#[derive(Default)]
pub struct MemoryDirectory {
    inner: Mutex<Inner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a trigger record (triggers are created out-of-band in production).
    pub fn seed_trigger(&self, trigger: Trigger) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.triggers.insert(trigger.id.clone(), trigger);
    }

    /// Simulate a store outage: while offline, every operation fails with
    /// [`Error::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.offline = offline;
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.offline {
            return Err(Error::unavailable(
                "memory directory",
                std::io::Error::other("store offline"),
            ));
        }
        Ok(inner)
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn conversation_by_pair(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<Conversation>> {
        let inner = self.guard()?;
        Ok(inner
            .conversations
            .iter()
            .find(|c| c.sender == sender && c.receiver == receiver)
            .cloned())
    }

    async fn conversations_by_channel(&self, channel_id: &str) -> Result<Vec<Conversation>> {
        let inner = self.guard()?;
        Ok(inner
            .conversations
            .iter()
            .filter(|c| c.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn insert_conversation(&self, new: NewConversation) -> Result<InsertOutcome> {
        let mut inner = self.guard()?;
        if let Some(existing) = inner
            .conversations
            .iter()
            .find(|c| c.sender == new.sender && c.receiver == new.receiver)
        {
            return Ok(InsertOutcome::Existing(existing.clone()));
        }

        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            sender: new.sender,
            receiver: new.receiver,
            channel_id: new.channel_id,
            display_name: new.display_name,
            avatar_url: None,
        };
        inner.conversations.push(conversation.clone());
        Ok(InsertOutcome::Created(conversation))
    }

    async fn update_display_name(&self, id: &str, display_name: &str) -> Result<()> {
        let mut inner = self.guard()?;
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("conversation", id))?;
        conversation.display_name = display_name.to_string();
        Ok(())
    }

    async fn update_avatar_url(&self, id: &str, avatar_url: &str) -> Result<()> {
        let mut inner = self.guard()?;
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("conversation", id))?;
        conversation.avatar_url = Some(avatar_url.to_string());
        Ok(())
    }

    async fn trigger(&self, id: &str) -> Result<Option<Trigger>> {
        let inner = self.guard()?;
        Ok(inner.triggers.get(id).cloned())
    }

    async fn canned_response(&self, id: &str) -> Result<Option<CannedResponse>> {
        let inner = self.guard()?;
        Ok(inner.responses.iter().find(|r| r.id == id).cloned())
    }

    async fn list_canned_responses(&self) -> Result<Vec<CannedResponse>> {
        let inner = self.guard()?;
        Ok(inner.responses.clone())
    }

    async fn add_canned_response(&self, message: &str) -> Result<CannedResponse> {
        let mut inner = self.guard()?;
        let response = CannedResponse {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
        };
        inner.responses.push(response.clone());
        Ok(response)
    }
}
