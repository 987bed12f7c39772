//! Channel abstraction for outbound message delivery.

pub mod whatsapp;

pub use whatsapp::{WhatsAppChannel, WhatsAppConfig};

use async_trait::async_trait;

use crate::error::ChannelError;

/// Pushes a message to the single configured recipient.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Channel name for logging.
    fn name(&self) -> &str;

    async fn send(&self, text: &str) -> Result<(), ChannelError>;
}
