//! Speech-to-text client for an OpenAI-compatible Whisper server
//! (`POST /v1/audio/transcriptions`).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::interview::collaborators::{CollaboratorError, Transcriber, Transcription};

const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    segments: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    avg_logprob: f32,
}

#[derive(Clone)]
pub struct WhisperTranscriber {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(base_url: &str, api_key: Option<String>, model: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            endpoint: format!("{}{TRANSCRIPTIONS_PATH}", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: Bytes) -> Result<Transcription, CollaboratorError> {
        if audio.is_empty() {
            return Err(CollaboratorError::Rejected("empty audio".to_string()));
        }

        let file = Part::bytes(audio.to_vec())
            .file_name("answer.webm")
            .mime_str("application/octet-stream")
            .map_err(|e| CollaboratorError::Rejected(e.to_string()))?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_http_error)?;
        let status = response.status();

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Rejected(format!(
                "transcriber returned {status}: {body}"
            )));
        }
        if !status.is_success() {
            return Err(CollaboratorError::Unavailable(format!(
                "transcriber returned {status}"
            )));
        }

        let body: VerboseTranscription = response.json().await.map_err(map_http_error)?;
        debug!(
            "Transcribed {} segments, language={:?}",
            body.segments.len(),
            body.language
        );
        Ok(into_transcription(body))
    }
}

fn map_http_error(e: reqwest::Error) -> CollaboratorError {
    if e.is_timeout() {
        CollaboratorError::Timeout(e.to_string())
    } else if e.is_decode() {
        CollaboratorError::Rejected(format!("unreadable transcriber reply: {e}"))
    } else {
        CollaboratorError::Unavailable(e.to_string())
    }
}

/// Confidence is the geometric-mean token probability across segments.
fn into_transcription(body: VerboseTranscription) -> Transcription {
    let confidence = if body.segments.is_empty() {
        None
    } else {
        let mean = body.segments.iter().map(|s| s.avg_logprob).sum::<f32>()
            / body.segments.len() as f32;
        Some(mean.exp().clamp(0.0, 1.0))
    };
    Transcription {
        text: body.text.trim().to_string(),
        language: body.language,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_reply_with_segments() {
        let json = r#"{
            "text": " I've been welding for six years. ",
            "language": "en",
            "segments": [{"avg_logprob": -0.1}, {"avg_logprob": -0.3}]
        }"#;
        let body: VerboseTranscription = serde_json::from_str(json).unwrap();
        let t = into_transcription(body);
        assert_eq!(t.text, "I've been welding for six years.");
        assert_eq!(t.language.as_deref(), Some("en"));
        let expected = (-0.2_f32).exp();
        assert!((t.confidence.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_plain_reply_has_no_confidence() {
        let body: VerboseTranscription = serde_json::from_str(r#"{"text": "hola"}"#).unwrap();
        let t = into_transcription(body);
        assert_eq!(t.confidence, None);
        assert_eq!(t.language, None);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let t = WhisperTranscriber::new(
            "http://localhost:8000/",
            None,
            "whisper-1".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(t.endpoint, "http://localhost:8000/v1/audio/transcriptions");
    }

    #[tokio::test]
    async fn test_empty_audio_rejected_without_call() {
        let t = WhisperTranscriber::new(
            "http://127.0.0.1:9",
            None,
            "whisper-1".to_string(),
            Duration::from_secs(1),
        );
        let result = t.transcribe(Bytes::new()).await;
        assert!(matches!(result, Err(CollaboratorError::Rejected(_))));
    }
}
