use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

pub const TRACK_COUNT_RANGE: RangeInclusive<u32> = 10..=50;
pub const TRACK_COUNT_STEP: u32 = 5;
pub const DEFAULT_TRACK_COUNT: u32 = 20;

/// What the listener asked the playlist generator for.
///
/// Only the vibe is required. Blank optional fields are normalized to `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PlaylistRequestFields")]
pub struct PlaylistRequest {
    vibe: String,
    genres: Option<String>,
    anchor_song: Option<String>,
    era: Option<String>,
    track_count: u32,
}

impl PlaylistRequest {
    pub fn new(
        vibe: impl Into<String>,
        genres: Option<String>,
        anchor_song: Option<String>,
        era: Option<String>,
        track_count: u32,
    ) -> Result<Self, DomainError> {
        let vibe = vibe.into().trim().to_string();
        if vibe.is_empty() {
            return Err(DomainError::InvariantViolation(
                "playlist vibe description is required".to_string(),
            ));
        }
        validate_track_count(track_count)?;

        Ok(Self {
            vibe,
            genres: non_blank(genres),
            anchor_song: non_blank(anchor_song),
            era: non_blank(era),
            track_count,
        })
    }

    pub fn vibe(&self) -> &str {
        &self.vibe
    }

    pub fn genres(&self) -> Option<&str> {
        self.genres.as_deref()
    }

    pub fn anchor_song(&self) -> Option<&str> {
        self.anchor_song.as_deref()
    }

    pub fn era(&self) -> Option<&str> {
        self.era.as_deref()
    }

    pub fn track_count(&self) -> u32 {
        self.track_count
    }
}

/// Wire shape of a request before validation.
#[derive(Deserialize)]
struct PlaylistRequestFields {
    vibe: String,
    #[serde(default)]
    genres: Option<String>,
    #[serde(default)]
    anchor_song: Option<String>,
    #[serde(default)]
    era: Option<String>,
    track_count: u32,
}

impl TryFrom<PlaylistRequestFields> for PlaylistRequest {
    type Error = DomainError;

    fn try_from(fields: PlaylistRequestFields) -> Result<Self, Self::Error> {
        Self::new(fields.vibe, fields.genres, fields.anchor_song, fields.era, fields.track_count)
    }
}

pub fn validate_track_count(track_count: u32) -> Result<(), DomainError> {
    if !TRACK_COUNT_RANGE.contains(&track_count) || track_count % TRACK_COUNT_STEP != 0 {
        return Err(DomainError::InvalidTrackCount {
            requested: track_count,
            min: *TRACK_COUNT_RANGE.start(),
            max: *TRACK_COUNT_RANGE.end(),
            step: TRACK_COUNT_STEP,
        });
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

/// Ordered songs exactly as the generator returned them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub songs: Vec<Song>,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// One `"{n}. {title} - {artist}"` row per song, for copy and export.
    pub fn numbered_text(&self) -> String {
        self.songs
            .iter()
            .enumerate()
            .map(|(index, song)| format!("{}. {} - {}", index + 1, song.title, song.artist))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
