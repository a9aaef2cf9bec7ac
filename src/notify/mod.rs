//! Notification channels delivering one story per call.
//!
//! A channel reports whether the provider *accepted* the request, not
//! whether the message reached the end recipient. Rejection and transport
//! faults are contained here: a channel logs the failure and returns
//! `false`, it never raises past its own boundary, so one bad send cannot
//! abort the pipeline.

use async_trait::async_trait;

use crate::models::Story;

pub mod email;
pub mod whatsapp;

pub use email::MailgunChannel;
pub use whatsapp::WhatsAppChannel;

/// Pluggable notification backend for the pipeline.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver one story. Returns `true` iff the provider accepted the
    /// request. Never propagates an error.
    async fn send(&self, story: &Story) -> bool;

    /// Short channel name for log attribution.
    fn name(&self) -> &'static str;
}
