//! Push topic subscription for volunteers.
//!
//! Delivery and display of pushed notifications happen elsewhere; the core
//! only decides when to subscribe.

use anyhow::Result;
use async_trait::async_trait;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Topic volunteers subscribe to for new-report pushes.
pub const NEW_REPORTS_TOPIC: &str = "new_points";

#[async_trait]
pub trait TopicSubscriber: Send + Sync {
    async fn subscribe(&self, topic: &str) -> Result<()>;

    async fn unsubscribe(&self, topic: &str) -> Result<()>;
}

/// Stand-in used when no push service is wired up; records intent in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTopicSubscriber;

#[async_trait]
impl TopicSubscriber for LoggingTopicSubscriber {
    async fn subscribe(&self, topic: &str) -> Result<()> {
        log_info!("subscribed to topic {topic}");
        Ok(())
    }

    async fn unsubscribe(&self, topic: &str) -> Result<()> {
        log_info!("unsubscribed from topic {topic}");
        Ok(())
    }
}
