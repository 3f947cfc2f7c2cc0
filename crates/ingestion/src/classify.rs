//! Message classification.
//!
//! Maps a raw provider payload to one of the fixed message kinds, extracts
//! the display content, and flags which payloads carry fetchable media. Pure
//! except that the caller feeds any [`MediaRef`] through the materializer.

use database::MessageKind;

use crate::event::EventData;

/// Placeholder shown when an audio payload has no fetchable URL
/// (inline-encoded voice notes).
const AUDIO_PLACEHOLDER: &str = "audio received";

/// Placeholder for unrecognized payloads with no text body.
const UNKNOWN_PLACEHOLDER: &str = "[Unknown Media]";

/// Media category of a payload, for content-type decisions downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    Document,
}

/// A reference to remote media carried by an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    /// Remote URL; absent for inline-encoded payloads.
    pub url: Option<String>,
    pub category: MediaCategory,
    /// Provider-reported mimetype, when present.
    pub mime_hint: Option<String>,
}

/// Classification result for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: MessageKind,
    pub content: String,
    pub media: Option<MediaRef>,
}

/// Classify a provider event.
pub fn classify(event: &EventData) -> Classified {
    match event.message_type.as_str() {
        "conversation" | "extendedTextMessage" => Classified {
            kind: MessageKind::Text,
            content: event.text().unwrap_or("").to_string(),
            media: None,
        },
        "imageMessage" => Classified {
            kind: MessageKind::Image,
            content: event.caption("imageMessage").unwrap_or("").to_string(),
            media: Some(media_ref(event, "imageMessage", MediaCategory::Image)),
        },
        "audioMessage" => {
            let media = media_ref(event, "audioMessage", MediaCategory::Audio);
            // Inline voice notes have no URL; keep them visible in the UI
            // instead of rendering a broken link.
            let content = if media.url.is_some() {
                String::new()
            } else {
                AUDIO_PLACEHOLDER.to_string()
            };
            Classified {
                kind: MessageKind::Audio,
                content,
                media: Some(media),
            }
        }
        "videoMessage" => Classified {
            kind: MessageKind::Video,
            content: event.caption("videoMessage").unwrap_or("").to_string(),
            media: Some(media_ref(event, "videoMessage", MediaCategory::Video)),
        },
        "documentMessage" => {
            let media = media_ref(event, "documentMessage", MediaCategory::Document);
            let kind = if media.mime_hint.as_deref() == Some("application/pdf") {
                MessageKind::Pdf
            } else {
                MessageKind::Document
            };
            let content = event
                .file_name()
                .or_else(|| event.caption("documentMessage"))
                .unwrap_or("Document")
                .to_string();
            Classified {
                kind,
                content,
                media: Some(media),
            }
        }
        _ => Classified {
            kind: MessageKind::Text,
            content: event
                .text()
                .unwrap_or(UNKNOWN_PLACEHOLDER)
                .to_string(),
            media: None,
        },
    }
}

fn media_ref(event: &EventData, field: &str, category: MediaCategory) -> MediaRef {
    MediaRef {
        url: event.media_url(field).map(str::to_string),
        category,
        mime_hint: event.mimetype(field).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::WebhookBody;

    fn event(message_type: &str, message: serde_json::Value) -> EventData {
        let body: WebhookBody = serde_json::from_value(serde_json::json!({
            "data": {
                "key": {
                    "remoteJid": "5511999998888@s.whatsapp.net",
                    "fromMe": false,
                    "id": "WAMID.1"
                },
                "messageType": message_type,
                "message": message,
            }
        }))
        .unwrap();
        body.data
    }

    #[test]
    fn plain_text() {
        let c = classify(&event("conversation", serde_json::json!({"conversation": "Hello"})));
        assert_eq!(c.kind, MessageKind::Text);
        assert_eq!(c.content, "Hello");
        assert!(c.media.is_none());
    }

    #[test]
    fn extended_text() {
        let c = classify(&event(
            "extendedTextMessage",
            serde_json::json!({"extendedTextMessage": {"text": "Link: https://x"}}),
        ));
        assert_eq!(c.kind, MessageKind::Text);
        assert_eq!(c.content, "Link: https://x");
    }

    #[test]
    fn image_with_caption() {
        let c = classify(&event(
            "imageMessage",
            serde_json::json!({"imageMessage": {"url": "https://m/x", "mimetype": "image/jpeg", "caption": "Look"}}),
        ));
        assert_eq!(c.kind, MessageKind::Image);
        assert_eq!(c.content, "Look");
        let media = c.media.unwrap();
        assert_eq!(media.category, MediaCategory::Image);
        assert_eq!(media.url.as_deref(), Some("https://m/x"));
        assert_eq!(media.mime_hint.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn audio_with_url_has_empty_content() {
        let c = classify(&event(
            "audioMessage",
            serde_json::json!({"audioMessage": {"url": "https://m/a", "mimetype": "audio/ogg; codecs=opus"}}),
        ));
        assert_eq!(c.kind, MessageKind::Audio);
        assert_eq!(c.content, "");
        assert!(c.media.unwrap().url.is_some());
    }

    #[test]
    fn inline_audio_gets_placeholder() {
        let c = classify(&event(
            "audioMessage",
            serde_json::json!({"audioMessage": {"mimetype": "audio/mp4"}}),
        ));
        assert_eq!(c.kind, MessageKind::Audio);
        assert_eq!(c.content, "audio received");
        assert!(c.media.unwrap().url.is_none());
    }

    #[test]
    fn pdf_document_is_reclassified() {
        let c = classify(&event(
            "documentMessage",
            serde_json::json!({"documentMessage": {"url": "https://m/d", "mimetype": "application/pdf", "fileName": "proposta.pdf"}}),
        ));
        assert_eq!(c.kind, MessageKind::Pdf);
        assert_eq!(c.content, "proposta.pdf");
    }

    #[test]
    fn non_pdf_document_stays_document() {
        let c = classify(&event(
            "documentMessage",
            serde_json::json!({"documentMessage": {"url": "https://m/d", "mimetype": "application/msword"}}),
        ));
        assert_eq!(c.kind, MessageKind::Document);
        assert_eq!(c.content, "Document");
    }

    #[test]
    fn document_content_prefers_file_name_then_caption() {
        let c = classify(&event(
            "documentMessage",
            serde_json::json!({"documentMessage": {"url": "https://m/d", "mimetype": "text/csv", "caption": "planilha"}}),
        ));
        assert_eq!(c.content, "planilha");
    }

    #[test]
    fn video_caption_may_be_empty() {
        let c = classify(&event(
            "videoMessage",
            serde_json::json!({"videoMessage": {"url": "https://m/v", "mimetype": "video/mp4"}}),
        ));
        assert_eq!(c.kind, MessageKind::Video);
        assert_eq!(c.content, "");
    }

    #[test]
    fn unknown_type_without_text_gets_placeholder() {
        let c = classify(&event("stickerMessage", serde_json::json!({"stickerMessage": {}})));
        assert_eq!(c.kind, MessageKind::Text);
        assert_eq!(c.content, "[Unknown Media]");
        assert!(c.media.is_none());
    }

    #[test]
    fn unknown_type_with_text_keeps_text() {
        let c = classify(&event("reactionMessage", serde_json::json!({"conversation": "ok"})));
        assert_eq!(c.content, "ok");
    }
}
