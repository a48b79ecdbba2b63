//! Azure Speech text-to-speech over the REST API.

use crate::error::{CancellationReason, Result, SpeechError};
use crate::synthesizer::SpeechSynthesizer;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use slidecast_core::Settings;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// WAV, 24 kHz, 16-bit mono PCM.
pub const OUTPUT_FORMAT: &str = "riff-24khz-16bit-mono-pcm";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Synthesis endpoint for a region.
pub fn endpoint_for_region(region: &str) -> String {
    format!(
        "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
        region.trim().to_lowercase()
    )
}

/// Language tag from a voice name: `en-US-AvaMultilingualNeural` gives `en-US`.
pub fn voice_language(voice: &str) -> String {
    let parts: Vec<&str> = voice.splitn(3, '-').collect();
    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        format!("{}-{}", parts[0], parts[1])
    } else {
        "en-US".to_string()
    }
}

/// SSML request body speaking `text` with `voice`.
pub fn build_ssml(text: &str, voice: &str) -> String {
    let lang = voice_language(voice);
    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{lang}\">\
         <voice name=\"{voice}\">{text}</voice></speak>",
        lang = quick_xml::escape::escape(&lang),
        voice = quick_xml::escape::escape(voice),
        text = quick_xml::escape::escape(text),
    )
}

fn reason_for_status(status: StatusCode) -> CancellationReason {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CancellationReason::AuthenticationFailure,
        StatusCode::TOO_MANY_REQUESTS => CancellationReason::TooManyRequests,
        _ => CancellationReason::Error,
    }
}

fn transport_error(e: reqwest::Error) -> SpeechError {
    let reason = if e.is_connect() || e.is_timeout() {
        CancellationReason::ConnectionFailure
    } else {
        CancellationReason::Error
    };
    SpeechError::canceled(reason, e.to_string())
}

/// Blocking Azure Speech client. One request per call, no retries.
pub struct AzureSpeechSynthesizer {
    client: Client,
    key: String,
    voice: String,
    endpoint: String,
}

impl AzureSpeechSynthesizer {
    /// Create a client for a subscription key, region, and voice.
    pub fn new(key: impl Into<String>, region: &str, voice: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SpeechError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            key,
            voice: voice.into(),
            endpoint: endpoint_for_region(region),
        })
    }

    /// Create a client from run settings, failing fast when no key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let key = settings
            .speech_key
            .as_deref()
            .ok_or(SpeechError::MissingCredential)?;
        Self::new(key, &settings.speech_region, settings.voice_name.as_str())
    }

    /// Send requests to a different URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }
}

impl SpeechSynthesizer for AzureSpeechSynthesizer {
    fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let preview: String = text.chars().take(50).collect();
        log::info!("Generating audio for: {}...", preview);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header(USER_AGENT, concat!("slidecast/", env!("CARGO_PKG_VERSION")))
            .body(build_ssml(text, &self.voice))
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let details = match body.trim() {
                "" => format!("HTTP {}", status),
                body => format!("HTTP {}: {}", status, body),
            };
            return Err(SpeechError::canceled(reason_for_status(status), details));
        }

        let audio = response.bytes().map_err(transport_error)?;
        if audio.is_empty() {
            return Err(SpeechError::canceled(
                CancellationReason::Error,
                "service returned no audio",
            ));
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &audio)?;
        log::info!("Audio saved successfully: {}", output.display());

        Ok(())
    }
}
