//! Label to id registry
//!
//! Ids are indices into a bounded table. A label keeps its id and its
//! content type for the lifetime of the registry; the table never shrinks.

use heapless::{String, Vec};
use mbitmore_protocol::commands::{MAX_LABEL_LEN, MAX_TEXT_LEN};
use mbitmore_protocol::{MessageContent, MessageType};

/// Default number of labels a registry can hold
pub const DEFAULT_REGISTRY_CAPACITY: usize = 16;

/// Stable handle for a registered label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageId(pub u8);

/// Registry failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// No free slot for a new label
    Full,
    /// Label longer than [`MAX_LABEL_LEN`] bytes
    LabelTooLong,
    /// Outgoing text longer than [`MAX_TEXT_LEN`] bytes
    TextTooLong,
    /// Label is registered with the other content type
    TypeMismatch,
    /// Id does not name a registered label
    UnknownId,
}

#[derive(Debug, Clone)]
enum Content {
    Number(f32),
    Text(String<MAX_TEXT_LEN>),
}

impl Content {
    fn empty(message_type: MessageType) -> Self {
        match message_type {
            MessageType::Number => Content::Number(0.0),
            MessageType::Text => Content::Text(String::new()),
        }
    }

    fn message_type(&self) -> MessageType {
        match self {
            Content::Number(_) => MessageType::Number,
            Content::Text(_) => MessageType::Text,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    label: String<MAX_LABEL_LEN>,
    content: Content,
    /// Set when the controller delivers content, cleared by `take_received`
    fresh: bool,
}

/// Bounded label registry with a single pending outbound message
pub struct MessageRegistry<const N: usize = DEFAULT_REGISTRY_CAPACITY> {
    entries: Vec<Entry, N>,
    pending: Option<MessageId>,
}

impl<const N: usize> MessageRegistry<N> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            pending: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels this registry can hold, never more than 256
    pub fn capacity(&self) -> usize {
        N.min(usize::from(u8::MAX) + 1)
    }

    /// Register `label`, or return its existing id
    ///
    /// An existing label keeps the type it was first registered with.
    pub fn register(
        &mut self,
        label: &str,
        message_type: MessageType,
    ) -> Result<MessageId, RegistryError> {
        if let Some(id) = self.id_of(label) {
            return Ok(id);
        }
        let label = String::try_from(label).map_err(|_| RegistryError::LabelTooLong)?;
        // ids are one byte on the wire, so at most 256 labels
        let id = u8::try_from(self.entries.len())
            .map(MessageId)
            .map_err(|_| {
                warn!("message id space exhausted");
                RegistryError::Full
            })?;
        self.entries
            .push(Entry {
                label,
                content: Content::empty(message_type),
                fresh: false,
            })
            .map_err(|_| {
                warn!("message registry full");
                RegistryError::Full
            })?;
        debug!("registered message {}", id);
        Ok(id)
    }

    pub fn id_of(&self, label: &str) -> Option<MessageId> {
        self.entries
            .iter()
            .position(|e| e.label.as_str() == label)
            .and_then(|i| u8::try_from(i).ok())
            .map(MessageId)
    }

    pub fn label(&self, id: MessageId) -> Option<&str> {
        self.entry(id).map(|e| e.label.as_str())
    }

    pub fn message_type(&self, id: MessageId) -> Option<MessageType> {
        self.entry(id).map(|e| e.content.message_type())
    }

    pub fn content(&self, id: MessageId) -> Option<MessageContent<'_>> {
        self.entry(id).map(|e| match &e.content {
            Content::Number(value) => MessageContent::Number(*value),
            Content::Text(text) => MessageContent::Text(text.as_str()),
        })
    }

    /// Numeric content, or 0.0 for text and unknown ids
    pub fn content_as_number(&self, id: MessageId) -> f32 {
        match self.content(id) {
            Some(MessageContent::Number(value)) => value,
            _ => 0.0,
        }
    }

    /// Text content, or "" for numbers and unknown ids
    pub fn content_as_text(&self, id: MessageId) -> &str {
        match self.content(id) {
            Some(MessageContent::Text(text)) => text,
            _ => "",
        }
    }

    /// Queue a number for the controller, registering the label if unseen
    pub fn send_number(&mut self, label: &str, value: f32) -> Result<MessageId, RegistryError> {
        self.send(label, MessageContent::Number(value))
    }

    /// Queue text for the controller, registering the label if unseen
    pub fn send_text(&mut self, label: &str, text: &str) -> Result<MessageId, RegistryError> {
        if text.len() > MAX_TEXT_LEN {
            return Err(RegistryError::TextTooLong);
        }
        self.send(label, MessageContent::Text(text))
    }

    /// Replaces any message not yet taken by the notify cycle
    fn send(
        &mut self,
        label: &str,
        content: MessageContent<'_>,
    ) -> Result<MessageId, RegistryError> {
        let id = self.store(label, content)?;
        self.pending = Some(id);
        Ok(id)
    }

    /// Store content delivered by the controller
    ///
    /// Text beyond [`MAX_TEXT_LEN`] bytes is cut at a character boundary.
    pub fn receive(
        &mut self,
        label: &str,
        content: MessageContent<'_>,
    ) -> Result<MessageId, RegistryError> {
        let id = self.store(label, content)?;
        if let Some(entry) = self.entry_mut(id) {
            entry.fresh = true;
        }
        Ok(id)
    }

    /// Returns true once per delivery from the controller
    pub fn take_received(&mut self, id: MessageId) -> bool {
        self.entry_mut(id)
            .map(|e| core::mem::replace(&mut e.fresh, false))
            .unwrap_or(false)
    }

    pub fn pending(&self) -> Option<MessageId> {
        self.pending
    }

    pub fn take_pending(&mut self) -> Option<MessageId> {
        self.pending.take()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    fn store(
        &mut self,
        label: &str,
        content: MessageContent<'_>,
    ) -> Result<MessageId, RegistryError> {
        if let Some(id) = self.id_of(label) {
            if self.message_type(id) != Some(content.message_type()) {
                return Err(RegistryError::TypeMismatch);
            }
        }
        let id = self.register(label, content.message_type())?;
        let entry = self.entry_mut(id).ok_or(RegistryError::UnknownId)?;
        entry.content = match content {
            MessageContent::Number(value) => Content::Number(value),
            MessageContent::Text(text) => Content::Text(truncated(text)),
        };
        Ok(id)
    }

    fn entry(&self, id: MessageId) -> Option<&Entry> {
        self.entries.get(usize::from(id.0))
    }

    fn entry_mut(&mut self, id: MessageId) -> Option<&mut Entry> {
        self.entries.get_mut(usize::from(id.0))
    }
}

impl<const N: usize> Default for MessageRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn truncated(text: &str) -> String<MAX_TEXT_LEN> {
    let mut end = text.len().min(MAX_TEXT_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    let _ = out.push_str(&text[..end]);
    out
}
