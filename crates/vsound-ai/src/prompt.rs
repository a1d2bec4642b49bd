//! Instruction text sent alongside the frames.

use vsound_models::{Genre, RecommendationMode, RECOMMENDATION_COUNT};

/// Build the analysis instruction for a mode.
pub fn build_prompt(mode: RecommendationMode) -> String {
    let intro = "Analyze these video frames. They are evenly spaced stills from one video, \
                 in chronological order. Describe the overall mood, setting, and actions in a \
                 short paragraph.";

    match mode {
        RecommendationMode::Songs => format!(
            "{intro} Based on your analysis, recommend {n} popular or trending songs that would \
             be a great soundtrack. Include the song name and artist. Return the result as a \
             JSON object with two keys: 'description' (the paragraph) and 'recommendations' \
             (an array of {n} objects, each with 'songName' and 'artist').",
            intro = intro,
            n = RECOMMENDATION_COUNT,
        ),
        RecommendationMode::Genres => format!(
            "{intro} Based on your analysis, recommend the {n} music genres from the following \
             list that would best fit as a soundtrack: {genres}. Use the genre names exactly as \
             written. Return the result as a JSON object with two keys: 'description' (the \
             paragraph) and 'recommendations' (an array of {n} genre names).",
            intro = intro,
            n = RECOMMENDATION_COUNT,
            genres = Genre::labels().join(", "),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_prompt() {
        let prompt = build_prompt(RecommendationMode::Songs);
        assert!(prompt.contains("recommend 5 popular or trending songs"));
        assert!(prompt.contains("'songName'"));
        assert!(!prompt.contains("Lo-fi Beats"));
    }

    #[test]
    fn test_genre_prompt_lists_every_genre() {
        let prompt = build_prompt(RecommendationMode::Genres);
        for genre in Genre::ALL {
            assert!(prompt.contains(genre.label()), "missing {}", genre);
        }
        assert!(!prompt.contains("songName"));
    }
}
