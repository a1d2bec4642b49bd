//! Genre vocabulary and the stock track for each genre.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed set of genre labels offered to the AI in genre mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Genre {
    #[serde(rename = "Uplifting Cinematic")]
    UpliftingCinematic,
    #[serde(rename = "Ambient Nature")]
    AmbientNature,
    #[serde(rename = "Action Rock")]
    ActionRock,
    #[serde(rename = "Lo-fi Beats")]
    LofiBeats,
    #[serde(rename = "Acoustic Folk")]
    AcousticFolk,
    #[serde(rename = "Epic Orchestral")]
    EpicOrchestral,
    #[serde(rename = "Funky Groove")]
    FunkyGroove,
    #[serde(rename = "Tense Thriller")]
    TenseThriller,
}

impl Genre {
    /// Every genre, in prompt order.
    pub const ALL: [Genre; 8] = [
        Genre::UpliftingCinematic,
        Genre::AmbientNature,
        Genre::ActionRock,
        Genre::LofiBeats,
        Genre::AcousticFolk,
        Genre::EpicOrchestral,
        Genre::FunkyGroove,
        Genre::TenseThriller,
    ];

    /// Display label, as sent to and returned by the AI service.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::UpliftingCinematic => "Uplifting Cinematic",
            Genre::AmbientNature => "Ambient Nature",
            Genre::ActionRock => "Action Rock",
            Genre::LofiBeats => "Lo-fi Beats",
            Genre::AcousticFolk => "Acoustic Folk",
            Genre::EpicOrchestral => "Epic Orchestral",
            Genre::FunkyGroove => "Funky Groove",
            Genre::TenseThriller => "Tense Thriller",
        }
    }

    /// Stock audio track played for this genre.
    pub fn track_url(&self) -> &'static str {
        match self {
            Genre::UpliftingCinematic => {
                "https://cdn.pixabay.com/download/audio/2022/08/04/audio_2bbe649989.mp3"
            }
            Genre::AmbientNature => {
                "https://cdn.pixabay.com/download/audio/2022/11/22/audio_24b26a2671.mp3"
            }
            Genre::ActionRock => {
                "https://cdn.pixabay.com/download/audio/2022/08/03/audio_55118746a5.mp3"
            }
            Genre::LofiBeats => {
                "https://cdn.pixabay.com/download/audio/2022/02/07/audio_c689aad623.mp3"
            }
            Genre::AcousticFolk => {
                "https://cdn.pixabay.com/download/audio/2022/05/23/audio_f8a2a8b309.mp3"
            }
            Genre::EpicOrchestral => {
                "https://cdn.pixabay.com/download/audio/2023/01/01/audio_82073121d1.mp3"
            }
            Genre::FunkyGroove => {
                "https://cdn.pixabay.com/download/audio/2022/08/02/audio_394d2c7f21.mp3"
            }
            Genre::TenseThriller => {
                "https://cdn.pixabay.com/download/audio/2022/10/25/audio_14138e1b32.mp3"
            }
        }
    }

    /// Look up a genre by its exact label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label.trim())
    }

    /// All labels, in prompt order.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Genre::label).collect()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown genre: {}", s))
    }
}

/// Catalog entry pairing a genre with its track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenreTrack {
    pub genre: Genre,
    pub track_url: String,
}

/// The full genre-to-track catalog.
pub fn genre_tracks() -> Vec<GenreTrack> {
    Genre::ALL
        .iter()
        .map(|&genre| GenreTrack {
            genre,
            track_url: genre.track_url().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip_through_serde() {
        for genre in Genre::ALL {
            let json = serde_json::to_string(&genre).unwrap();
            assert_eq!(json, format!("\"{}\"", genre.label()));
            assert_eq!(Genre::from_label(genre.label()), Some(genre));
        }
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Genre::from_label("Polka"), None);
        assert!("Polka".parse::<Genre>().is_err());
    }

    #[test]
    fn test_every_genre_has_a_distinct_track() {
        let tracks = genre_tracks();
        assert_eq!(tracks.len(), 8);

        let mut urls: Vec<_> = tracks.iter().map(|t| t.track_url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), 8);
        assert!(urls.iter().all(|u| u.starts_with("https://") && u.ends_with(".mp3")));
    }

    #[test]
    fn test_labels_trimmed_on_lookup() {
        assert_eq!(Genre::from_label(" Lo-fi Beats "), Some(Genre::LofiBeats));
    }
}
