//! Chat replies that never fail.
//!
//! Whatever goes wrong on the way to the backend, the conversation gets an
//! assistant-style apology instead of an error.  The low-level cause is
//! logged only.  Separate wordings let the user tell an image problem from
//! a connection problem, and a failed transcription from either.

use super::client::ChatTransport;
use super::request::{ChatRequest, Endpoint};

/// Shown when a text question could not be answered.
pub const CONNECTION_FALLBACK: &str = "ขออภัยครับ เกิดข้อผิดพลาดในการเชื่อมต่อกับเซิร์ฟเวอร์";

/// Shown when an image question could not be answered.
pub const IMAGE_FALLBACK: &str = "ขออภัยครับ เกิดข้อผิดพลาดในการประมวลผลรูปภาพ";

/// Shown when a recording could not be turned into text.
pub const TRANSCRIPTION_FALLBACK: &str = "ขออภัยครับ ไม่สามารถแปลงเสียงเป็นข้อความได้ กรุณาลองใหม่อีกครั้ง";

/// The apology matching the endpoint a request went to.
pub fn fallback_message(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Image => IMAGE_FALLBACK,
        Endpoint::Text => CONNECTION_FALLBACK,
        Endpoint::Transcribe => TRANSCRIPTION_FALLBACK,
    }
}

/// Send `request` and return the answer, or the matching apology on failure.
///
/// This function never returns an error.
pub async fn answer_with_fallback(transport: &dyn ChatTransport, request: &ChatRequest) -> String {
    match request.send(transport).await {
        Ok(answer) => answer,
        Err(err) => {
            let endpoint = request.endpoint();
            log::warn!("{} failed: {err}", endpoint.path());
            fallback_message(endpoint).to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Attachment;
    use crate::transport::testing::RecordingTransport;
    use crate::transport::TransportError;

    #[tokio::test]
    async fn passes_through_success() {
        let transport = RecordingTransport::answering("ok");
        let answer = answer_with_fallback(&transport, &ChatRequest::chat("hi", None)).await;
        assert_eq!(answer, "ok");
    }

    #[tokio::test]
    async fn text_failure_uses_connection_wording() {
        let transport = RecordingTransport::failing(TransportError::Timeout);
        let answer = answer_with_fallback(&transport, &ChatRequest::chat("hi", None)).await;
        assert_eq!(answer, CONNECTION_FALLBACK);
    }

    #[tokio::test]
    async fn image_failure_uses_image_wording() {
        let transport = RecordingTransport::failing(TransportError::Status(500));
        let image = Attachment::from_bytes("x.jpg", vec![0xFF, 0xD8]).unwrap();
        let answer =
            answer_with_fallback(&transport, &ChatRequest::chat("hi", Some(image))).await;
        assert_eq!(answer, IMAGE_FALLBACK);
    }

    #[test]
    fn each_endpoint_has_its_own_wording() {
        assert_eq!(fallback_message(Endpoint::Text), CONNECTION_FALLBACK);
        assert_eq!(fallback_message(Endpoint::Image), IMAGE_FALLBACK);
        assert_eq!(fallback_message(Endpoint::Transcribe), TRANSCRIPTION_FALLBACK);
    }

    #[tokio::test]
    async fn low_level_detail_never_reaches_the_reply() {
        let transport =
            RecordingTransport::failing(TransportError::Request("dns error: localhost".into()));
        let answer = answer_with_fallback(&transport, &ChatRequest::chat("hi", None)).await;
        assert!(!answer.contains("dns"));
    }
}
