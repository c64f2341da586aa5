use std::sync::Arc;

use royal_core::domain::contract::BUSINESS_NAME;
use royal_core::domain::playlist::{Playlist, PlaylistRequest, Song};
use royal_core::errors::ApplicationError;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::llm::{LlmClient, LlmError};
use crate::prompts::{playlist_prompt, PromptError};
use crate::schema::playlist_schema;

pub const PLAYLIST_FAILURE_MESSAGE: &str =
    "Failed to generate playlist. The AI might be busy. Please try again.";
pub const INVALID_PLAYLIST_MESSAGE: &str = "The AI returned an invalid playlist format.";

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Llm(LlmError),
    #[error("invalid playlist format: {0}")]
    InvalidFormat(String),
}

impl PlaylistError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => INVALID_PLAYLIST_MESSAGE,
            Self::Prompt(_) | Self::Llm(_) => PLAYLIST_FAILURE_MESSAGE,
        }
    }
}

impl From<LlmError> for PlaylistError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::EmptyResponse => Self::InvalidFormat(value.to_string()),
            other => Self::Llm(other),
        }
    }
}

impl From<PlaylistError> for ApplicationError {
    fn from(value: PlaylistError) -> Self {
        match value {
            PlaylistError::Llm(error) => error.into(),
            PlaylistError::InvalidFormat(message) => Self::InvalidResponse(message),
            PlaylistError::Prompt(error) => Self::Integration(error.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaylistPayload {
    songs: Vec<SongPayload>,
}

#[derive(Debug, Deserialize)]
struct SongPayload {
    title: String,
    artist: String,
}

/// Parses a structured reply. Any mismatch rejects the whole reply; the song
/// count is not enforced and order is kept.
pub fn parse_playlist(raw: &str) -> Result<Playlist, PlaylistError> {
    let payload: PlaylistPayload = serde_json::from_str(raw.trim())
        .map_err(|err| PlaylistError::InvalidFormat(err.to_string()))?;

    let songs = payload
        .songs
        .into_iter()
        .map(|song| Song { title: song.title, artist: song.artist })
        .collect();
    Ok(Playlist::new(songs))
}

pub struct PlaylistGenerator {
    llm: Arc<dyn LlmClient>,
    business_name: String,
}

impl PlaylistGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm, business_name: BUSINESS_NAME.to_string() }
    }

    pub fn with_business_name(mut self, business_name: impl Into<String>) -> Self {
        self.business_name = business_name.into();
        self
    }

    pub async fn generate(&self, request: &PlaylistRequest) -> Result<Playlist, PlaylistError> {
        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "ai.playlist.requested",
            correlation_id = %correlation_id,
            track_count = request.track_count(),
            "generating playlist"
        );

        let prompt = playlist_prompt(request, &self.business_name)?;
        let schema = playlist_schema(request.track_count());

        let raw = self.llm.complete_structured(&prompt, &schema).await.map_err(|err| {
            error!(
                event_name = "ai.playlist.failed",
                correlation_id = %correlation_id,
                error = %err,
                "playlist generation failed"
            );
            PlaylistError::from(err)
        })?;

        let playlist = parse_playlist(&raw).map_err(|err| {
            warn!(
                event_name = "ai.playlist.invalid_format",
                correlation_id = %correlation_id,
                error = %err,
                "playlist reply did not match the response schema"
            );
            err
        })?;

        if playlist.len() != request.track_count() as usize {
            warn!(
                event_name = "ai.playlist.count_mismatch",
                correlation_id = %correlation_id,
                requested = request.track_count(),
                received = playlist.len(),
                "playlist length differs from the requested count"
            );
        }

        info!(
            event_name = "ai.playlist.generated",
            correlation_id = %correlation_id,
            songs = playlist.len(),
            "playlist generated"
        );
        Ok(playlist)
    }
}
