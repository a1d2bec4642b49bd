//! Analysis results returned by the AI service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::genre::Genre;

/// Number of recommendations requested from the AI service
pub const RECOMMENDATION_COUNT: usize = 5;

/// YouTube results page; the encoded query is appended.
pub const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// Which kind of recommendation a deployment asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Concrete song and artist pairs
    #[default]
    Songs,
    /// Labels from the fixed genre vocabulary, each mapped to a stock track
    Genres,
}

impl RecommendationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Genres => "genres",
        }
    }
}

impl fmt::Display for RecommendationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "songs" | "song" => Ok(Self::Songs),
            "genres" | "genre" => Ok(Self::Genres),
            other => Err(format!("Unknown recommendation mode: {}", other)),
        }
    }
}

/// A suggested song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SongRecommendation {
    #[serde(rename = "songName")]
    pub song_name: String,
    pub artist: String,
}

impl SongRecommendation {
    pub fn new(song_name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song_name: song_name.into(),
            artist: artist.into(),
        }
    }

    /// Search query used to look the song up on a video site.
    pub fn search_query(&self) -> String {
        format!("{} {}", self.song_name, self.artist)
    }

    /// YouTube search link for this song.
    pub fn youtube_search_url(&self) -> String {
        format!(
            "{}{}",
            YOUTUBE_SEARCH_URL,
            urlencoding::encode(&self.search_query())
        )
    }
}

/// Recommendation list, one variant per [`RecommendationMode`].
///
/// Serializes as the bare array so the wire shape matches what the AI
/// service returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Recommendations {
    Songs(Vec<SongRecommendation>),
    Genres(Vec<String>),
}

impl Recommendations {
    pub fn mode(&self) -> RecommendationMode {
        match self {
            Self::Songs(_) => RecommendationMode::Songs,
            Self::Genres(_) => RecommendationMode::Genres,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Songs(songs) => songs.len(),
            Self::Genres(genres) => genres.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// YouTube search link per song, in response order.
    ///
    /// Empty in genre mode.
    pub fn search_urls(&self) -> Vec<String> {
        match self {
            Self::Songs(songs) => songs
                .iter()
                .map(SongRecommendation::youtube_search_url)
                .collect(),
            Self::Genres(_) => Vec::new(),
        }
    }

    /// Genre labels that resolve to a known track, in response order.
    ///
    /// Empty in song mode.
    pub fn playable_genres(&self) -> Vec<Genre> {
        match self {
            Self::Songs(_) => Vec::new(),
            Self::Genres(labels) => labels.iter().filter_map(|l| Genre::from_label(l)).collect(),
        }
    }
}

/// Mood description plus soundtrack suggestions for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub description: String,
    pub recommendations: Recommendations,
}

/// Envelope returned to API callers for a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub mode: RecommendationMode,
    pub frames_analyzed: usize,
    pub description: String,
    pub recommendations: Recommendations,
    /// One YouTube search link per song; omitted in genre mode
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_urls: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn new(run_id: Uuid, frames_analyzed: usize, result: AnalysisResult) -> Self {
        Self {
            run_id,
            mode: result.recommendations.mode(),
            frames_analyzed,
            description: result.description,
            search_urls: result.recommendations.search_urls(),
            recommendations: result.recommendations,
            analyzed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("songs".parse::<RecommendationMode>().unwrap(), RecommendationMode::Songs);
        assert_eq!(" Genres ".parse::<RecommendationMode>().unwrap(), RecommendationMode::Genres);
        assert!("albums".parse::<RecommendationMode>().is_err());
        assert_eq!(RecommendationMode::default(), RecommendationMode::Songs);
    }

    #[test]
    fn test_song_wire_format() {
        let result = AnalysisResult {
            description: "Sunset drive.".to_string(),
            recommendations: Recommendations::Songs(vec![SongRecommendation::new(
                "Midnight City",
                "M83",
            )]),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "description": "Sunset drive.",
                "recommendations": [{ "songName": "Midnight City", "artist": "M83" }]
            })
        );
    }

    #[test]
    fn test_genre_wire_format() {
        let result = AnalysisResult {
            description: "A calm walk in a park.".to_string(),
            recommendations: Recommendations::Genres(vec!["Ambient Nature".to_string()]),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recommendations"], serde_json::json!(["Ambient Nature"]));
    }

    #[test]
    fn test_playable_genres_skip_unknown_labels() {
        let recs = Recommendations::Genres(vec![
            "Ambient Nature".to_string(),
            "Polka".to_string(),
            "Lo-fi Beats".to_string(),
        ]);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs.playable_genres(), vec![Genre::AmbientNature, Genre::LofiBeats]);
        assert_eq!(recs.mode(), RecommendationMode::Genres);
    }

    #[test]
    fn test_search_query() {
        let song = SongRecommendation::new("Holocene", "Bon Iver");
        assert_eq!(song.search_query(), "Holocene Bon Iver");
    }

    #[test]
    fn test_youtube_search_url_encodes_query() {
        let song = SongRecommendation::new("Holocene", "Bon Iver");
        assert_eq!(
            song.youtube_search_url(),
            "https://www.youtube.com/results?search_query=Holocene%20Bon%20Iver"
        );

        let song = SongRecommendation::new("Back in Black", "AC/DC & Friends?");
        assert_eq!(
            song.youtube_search_url(),
            "https://www.youtube.com/results?search_query=Back%20in%20Black%20AC%2FDC%20%26%20Friends%3F"
        );
    }

    #[test]
    fn test_song_report_lists_search_urls() {
        let report = AnalysisReport::new(
            Uuid::new_v4(),
            5,
            AnalysisResult {
                description: "x".to_string(),
                recommendations: Recommendations::Songs(vec![
                    SongRecommendation::new("A", "One"),
                    SongRecommendation::new("B", "Two"),
                ]),
            },
        );

        assert_eq!(
            report.search_urls,
            vec![
                format!("{}A%20One", YOUTUBE_SEARCH_URL),
                format!("{}B%20Two", YOUTUBE_SEARCH_URL),
            ]
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["search_urls"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_report_carries_mode() {
        let report = AnalysisReport::new(
            Uuid::new_v4(),
            5,
            AnalysisResult {
                description: "x".to_string(),
                recommendations: Recommendations::Genres(vec![]),
            },
        );
        assert_eq!(report.mode, RecommendationMode::Genres);
        assert_eq!(report.frames_analyzed, 5);
        assert!(report.search_urls.is_empty());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("search_urls").is_none());
    }
}
