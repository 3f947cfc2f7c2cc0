//! Inbound WhatsApp event ingestion and conversation-state reconciliation.
//!
//! This crate turns raw provider webhook deliveries into CRM rows:
//!
//! ```text
//! Webhook delivery (from the webhook crate)
//!          ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                       INGESTOR                           │
//! │                                                          │
//! │  1. Short-circuit echoes / status updates                │
//! │         ↓                                                │
//! │  2. Normalize sender identity (digits-only phone)        │
//! │         ↓                                                │
//! │  3. Classify payload; re-host media (soft-fail)          │
//! │         ↓                                                │
//! │  4. Upsert contact (atomic per tenant+phone)             │
//! │         ↓                                                │
//! │  5. Reuse open deal, or open one (stage + owner policy)  │
//! │         ↓                                                │
//! │  6. Persist message (idempotent on provider id)          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step that can fail without losing data degrades instead of
//! aborting: media re-hosting falls back to the original URL, activity bumps
//! and the final message insert are logged on failure and the event is still
//! acknowledged. Only contact/deal write failures and a missing pipeline
//! stage abort the event.

pub mod classify;
pub mod error;
pub mod event;
pub mod identity;
pub mod ingest;
pub mod media;
pub mod owner;
pub mod resolver;

pub use classify::{Classified, MediaCategory, MediaRef};
pub use error::{IngestError, Result};
pub use event::{EventData, MessageKey, WebhookBody};
pub use ingest::{Ingestor, Outcome};
pub use media::Materializer;
