//! Story decks: the slide content and the quizzes attached to it.
//!
//! A deck is a YAML document. The core only ever sees the quiz table built by
//! [`Deck::quizzes`]; everything else is for the renderer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::story::QuizSpec;

/// The deck shown when no file is given.
pub const BUILTIN_SOURCE: &str = include_str!("../../../../sample-decks/rewind-2025.yaml");

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("deck has no slides")]
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Cover,
    #[default]
    Stats,
    Reel,
    Outro,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub kind: SlideKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyebrow: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// The big animated number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<Hero>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<Stat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel: Option<Reel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub value: u64,

    #[serde(default)]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Slot-machine reel that spins and lands on `items[target]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reel {
    pub items: Vec<String>,
    pub target: usize,

    #[serde(default = "default_spins")]
    pub spins: u32,
}

fn default_spins() -> u32 {
    2
}

/// Spins beyond this are drawn as this many.
pub const MAX_SPINS: u32 = 20;

/// Quiz as written in the deck. Validated into a [`QuizSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizData {
    pub question: String,
    pub options: Vec<String>,
    pub answer: usize,
}

/// A slide's `quiz` field. Anything that does not read as a quiz is kept
/// as raw YAML so the rest of the deck still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizEntry {
    Quiz(QuizData),
    Unreadable(serde_yaml::Value),
}

impl Reel {
    pub fn landing_item(&self) -> Option<&str> {
        self.items.get(self.target).map(String::as_str)
    }

    pub fn spin_count(&self) -> u32 {
        self.spins.min(MAX_SPINS)
    }
}

impl Deck {
    pub fn parse(yaml: &str) -> Result<Self, DeckError> {
        let deck: Deck = serde_yaml::from_str(yaml)?;
        if deck.slides.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(deck)
    }

    pub fn load(path: &Path) -> Result<Self, DeckError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let deck = Self::parse(&contents)?;
        tracing::debug!(path = %path.display(), slides = deck.slides.len(), "deck loaded");
        Ok(deck)
    }

    pub fn builtin() -> Result<Self, DeckError> {
        Self::parse(BUILTIN_SOURCE)
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Rewind")
    }

    /// One entry per slide, `Some` where the slide has a usable quiz.
    /// Quizzes that cannot be asked are dropped with a warning.
    pub fn quizzes(&self) -> Vec<Option<QuizSpec>> {
        self.slides
            .iter()
            .enumerate()
            .map(|(index, _)| match self.quiz_for(index) {
                Ok(spec) => spec,
                Err(problem) => {
                    tracing::warn!(slide = index, "dropping quiz: {problem}");
                    None
                }
            })
            .collect()
    }

    fn quiz_for(&self, index: usize) -> Result<Option<QuizSpec>, String> {
        let Some(entry) = self.slides.get(index).and_then(|s| s.quiz.as_ref()) else {
            return Ok(None);
        };
        if index == 0 {
            return Err("the cover cannot carry a quiz".to_string());
        }
        let data = match entry {
            QuizEntry::Quiz(data) => data,
            QuizEntry::Unreadable(_) => {
                return Err(
                    "is not a question with a list of options and a numeric answer".to_string(),
                );
            }
        };
        QuizSpec::new(data.question.clone(), data.options.clone(), data.answer)
            .map(Some)
            .ok_or_else(|| {
                format!(
                    "needs a question, at least two non-empty options and an answer below {}",
                    data.options.len()
                )
            })
    }

    /// Everything that will be silently degraded at runtime, one line each.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            if let Err(problem) = self.quiz_for(index) {
                problems.push(format!("slide {number}: quiz {problem}"));
            }
            if let Some(reel) = slide.reel.as_ref().filter(|r| r.landing_item().is_none()) {
                problems.push(format!(
                    "slide {number}: reel target {} is past its {} items",
                    reel.target,
                    reel.items.len()
                ));
            }
            if let Some(reel) = slide.reel.as_ref().filter(|r| r.spins > MAX_SPINS) {
                problems.push(format!(
                    "slide {number}: reel spins {} will be capped at {MAX_SPINS}",
                    reel.spins
                ));
            }
            if slide.kind == SlideKind::Reel && slide.reel.is_none() {
                problems.push(format!("slide {number}: reel slide without a reel"));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_parses() {
        let deck = Deck::builtin().unwrap();
        assert_eq!(deck.slides.len(), 12);
        assert_eq!(deck.slides[0].kind, SlideKind::Cover);
        assert_eq!(deck.slides[11].kind, SlideKind::Outro);
        assert!(deck.problems().is_empty(), "{:?}", deck.problems());
    }

    #[test]
    fn test_builtin_quizzes() {
        let deck = Deck::builtin().unwrap();
        let quizzes = deck.quizzes();
        assert_eq!(quizzes.len(), 12);
        assert!(quizzes[0].is_none());
        let quiz = quizzes[3].as_ref().unwrap();
        assert_eq!(quiz.correct_index(), 1);
        assert_eq!(quiz.options().len(), 3);
    }

    #[test]
    fn test_builtin_reel_lands_on_tuesday() {
        let deck = Deck::builtin().unwrap();
        let reel = deck.slides[5].reel.as_ref().unwrap();
        assert_eq!(reel.landing_item(), Some("Tuesday"));
        assert_eq!(reel.spins, 2);
    }

    #[test]
    fn test_kind_defaults_to_stats() {
        let deck = Deck::parse("slides:\n  - heading: Hi\n").unwrap();
        assert_eq!(deck.slides[0].kind, SlideKind::Stats);
        assert_eq!(deck.display_title(), "Rewind");
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(matches!(Deck::parse("title: Nothing\n"), Err(DeckError::Empty)));
        assert!(matches!(
            Deck::parse("slides: []\n"),
            Err(DeckError::Empty)
        ));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        assert!(matches!(
            Deck::parse("slides: [\n"),
            Err(DeckError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Deck::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_bad_quizzes_fail_closed() {
        let yaml = r#"
slides:
  - kind: cover
    quiz: { question: "On the cover?", options: [a, b], answer: 0 }
  - quiz: { question: "One option", options: [a], answer: 0 }
  - quiz: { question: "Answer out of range", options: [a, b], answer: 5 }
  - quiz: { question: "", options: [a, b], answer: 0 }
  - quiz: { question: "Fine", options: [a, b], answer: 1 }
"#;
        let deck = Deck::parse(yaml).unwrap();
        let quizzes = deck.quizzes();
        assert!(quizzes[..4].iter().all(Option::is_none));
        assert!(quizzes[4].is_some());
        assert_eq!(deck.problems().len(), 4);
    }

    #[test]
    fn test_unreadable_quizzes_fail_closed() {
        let yaml = r#"
slides:
  - kind: cover
  - quiz: { question: "Q", options: "A or B", answer: 0 }
  - quiz: { question: "Q", options: [a, b], answer: -1 }
  - quiz: { question: "Q", options: [a, b], answer: "b" }
  - quiz: { options: [a, b], answer: 0 }
  - quiz: { question: "Fine", options: [a, b], answer: 0 }
"#;
        let deck = Deck::parse(yaml).unwrap();
        assert_eq!(deck.slides.len(), 6);
        let quizzes = deck.quizzes();
        assert!(quizzes[..5].iter().all(Option::is_none));
        assert_eq!(quizzes[5].as_ref().unwrap().correct_index(), 0);
        let problems = deck.problems();
        assert_eq!(problems.len(), 4, "{problems:?}");
        assert!(problems[0].starts_with("slide 2: quiz"));
    }

    #[test]
    fn test_excessive_spins_are_capped_and_reported() {
        let yaml = r#"
slides:
  - kind: cover
  - kind: reel
    reel: { items: [a, b, c], target: 1, spins: 1000000000 }
"#;
        let deck = Deck::parse(yaml).unwrap();
        let reel = deck.slides[1].reel.as_ref().unwrap();
        assert_eq!(reel.spin_count(), MAX_SPINS);
        let problems = deck.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("capped"));
    }

    #[test]
    fn test_reel_target_past_items_is_reported() {
        let yaml = r#"
slides:
  - kind: cover
  - kind: reel
    reel: { items: [a, b], target: 4 }
  - kind: reel
"#;
        let deck = Deck::parse(yaml).unwrap();
        let problems = deck.problems();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("slide 2"));
        assert!(problems[1].contains("without a reel"));
    }
}
