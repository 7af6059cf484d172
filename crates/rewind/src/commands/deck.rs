use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::DeckCommands;
use crate::deck::{BUILTIN_SOURCE, Deck, SlideKind};

pub fn run(command: DeckCommands) -> Result<()> {
    match command {
        DeckCommands::Check { file } => check(&file),
        DeckCommands::Show => {
            print!("{BUILTIN_SOURCE}");
            Ok(())
        }
    }
}

fn check(file: &Path) -> Result<()> {
    let deck = Deck::load(file).with_context(|| format!("{} is not a valid deck", file.display()))?;
    println!(
        "{} {} ({} slides)",
        "Deck:".bold(),
        deck.display_title(),
        deck.slides.len()
    );
    for line in summary(&deck) {
        println!("  {line}");
    }

    let problems = deck.problems();
    if problems.is_empty() {
        println!("{}", "No problems found.".green());
        return Ok(());
    }
    println!();
    for problem in &problems {
        println!("  {} {problem}", "warning:".yellow().bold());
    }
    anyhow::bail!("{} problem(s) in {}", problems.len(), file.display())
}

fn kind_label(kind: SlideKind) -> &'static str {
    match kind {
        SlideKind::Cover => "cover",
        SlideKind::Stats => "stats",
        SlideKind::Reel => "reel",
        SlideKind::Outro => "outro",
    }
}

/// One line per slide: number, kind, heading and a quiz marker.
fn summary(deck: &Deck) -> Vec<String> {
    deck.slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            let heading = slide.heading.as_deref().unwrap_or("(untitled)");
            let quiz = if slide.quiz.is_some() { "  [quiz]" } else { "" };
            format!("{:>2}. {:<6} {heading}{quiz}", i + 1, kind_label(slide.kind))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_marks_quiz_slides() {
        let deck = Deck::builtin().unwrap();
        let lines = summary(&deck);
        assert_eq!(lines.len(), deck.slides.len());
        assert!(lines[0].contains("cover"));
        assert!(lines[0].contains("Rewind 2025"));
        assert!(lines[3].ends_with("[quiz]"));
        assert!(!lines[1].ends_with("[quiz]"));
    }

    #[test]
    fn test_check_fails_on_problems() {
        let dir = std::env::temp_dir().join(format!("rewind-deck-check-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.yaml");
        std::fs::write(
            &path,
            "slides:\n  - kind: cover\n  - quiz: { question: Q, options: [a], answer: 0 }\n",
        )
        .unwrap();
        assert!(check(&path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
