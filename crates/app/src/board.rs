use std::fmt::Write as _;

use match_core::SessionStatus;
use match_core::model::Card;
use match_core::time::format_elapsed;
use services::GameService;

const COLUMNS: usize = 5;
const CELL_WIDTH: usize = 22;
const RTL_MARKER: &str = "\u{21d0} ";

/// Render the current board, header and footer as plain text.
///
/// Face-down cards show their 1-based position, flipped cards show `[text]`
/// and matched cards `(text)`.
pub fn render(game: &GameService) -> String {
    let session = game.session();
    let mut out = String::new();

    if let Some(setup) = session.setup() {
        let _ = writeln!(
            out,
            "{} ({}) | {} | {} | {}",
            setup.student_name, setup.student_class, setup.list, setup.mode, setup.difficulty
        );
    }
    let _ = writeln!(
        out,
        "Score: {}  Time: {}  Pairs: {}/{}",
        session.score(),
        format_elapsed(session.elapsed_seconds()),
        session.matched_count(),
        session.pair_count()
    );

    for (row, cards) in session.deck().chunks(COLUMNS).enumerate() {
        for (col, card) in cards.iter().enumerate() {
            let position = row * COLUMNS + col;
            let cell = if session.is_matched(position) {
                format!("({})", face(card))
            } else if session.is_flipped(position) {
                format!("[{}]", face(card))
            } else {
                format!("#{}", position + 1)
            };
            let _ = write!(out, "{}", fit(&cell));
        }
        out.push('\n');
    }

    if let Some(hint) = game.active_hint() {
        let _ = writeln!(out, "{hint}");
    } else if game.is_fetching_hint() {
        out.push_str("Fetching hint...\n");
    }

    if session.status() == SessionStatus::Complete {
        let _ = writeln!(
            out,
            "All pairs matched! Final score {} in {}.",
            session.score(),
            format_elapsed(session.elapsed_seconds())
        );
        let label = game.report_status().label();
        if !label.is_empty() {
            let _ = writeln!(out, "{label}");
        }
    }
    out
}

/// Card text as shown face-up. Right-to-left meanings get a marker so they
/// read as the answer side even where the terminal lacks bidi support.
fn face(card: &Card) -> String {
    if card.is_right_to_left() {
        format!("{RTL_MARKER}{}", card.display_text())
    } else {
        card.display_text().to_owned()
    }
}

/// Pad or truncate to a fixed cell width, counting chars rather than bytes.
fn fit(cell: &str) -> String {
    let width = CELL_WIDTH - 1;
    let count = cell.chars().count();
    if count > width {
        let mut cut: String = cell.chars().take(width - 1).collect();
        cut.push('…');
        format!("{cut} ")
    } else {
        format!("{cell}{} ", " ".repeat(width - count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use match_core::model::{Difficulty, ListId, QuizMode, SessionSetup};
    use match_core::time::fixed_now;
    use match_core::{Catalog, Clock};

    #[test]
    fn fresh_board_hides_every_card() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let mut game = GameService::new(catalog, Clock::fixed(fixed_now())).with_seed(1);
        game.start(SessionSetup::new(
            "Omar",
            "7C",
            ListId::ListD,
            QuizMode::EnglishToTranslation,
            Difficulty::Easy,
        ))
        .unwrap();

        let board = render(&game);
        assert!(board.starts_with("Omar (7C) | List D | English-Arabic | Easy\n"));
        assert!(board.contains("Score: 0  Time: 0:00  Pairs: 0/10"));
        assert!(board.contains("#1 "));
        assert!(board.contains("#20 "));
        assert!(!board.contains('['));
    }

    #[test]
    fn flipped_arabic_meaning_carries_marker() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let mut game = GameService::new(catalog, Clock::fixed(fixed_now())).with_seed(2);
        game.start(SessionSetup::new(
            "Omar",
            "7C",
            ListId::ListA,
            QuizMode::EnglishToTranslation,
            Difficulty::Easy,
        ))
        .unwrap();
        let (position, card) = game
            .session()
            .deck()
            .iter()
            .enumerate()
            .find(|(_, card)| card.is_right_to_left())
            .map(|(pos, card)| (pos, card.clone()))
            .unwrap();

        assert!(game.request_flip(position));
        let board = render(&game);
        let expected: String = format!("[{RTL_MARKER}{}]", card.display_text())
            .chars()
            .take(CELL_WIDTH - 2)
            .collect();
        assert!(board.contains(&expected));
    }

    #[test]
    fn term_cards_have_no_marker() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let mut game = GameService::new(catalog, Clock::fixed(fixed_now())).with_seed(3);
        game.start(SessionSetup::new(
            "Omar",
            "7C",
            ListId::ListA,
            QuizMode::EnglishToDefinition,
            Difficulty::Easy,
        ))
        .unwrap();
        assert!(game.request_flip(0));
        assert!(!render(&game).contains(RTL_MARKER));
    }

    #[test]
    fn long_text_is_truncated_to_cell() {
        let cell = fit("a rather long definition that overflows");
        assert_eq!(cell.chars().count(), CELL_WIDTH);
        assert!(cell.ends_with("… "));
        assert_eq!(fit("#3").chars().count(), CELL_WIDTH);
    }
}
