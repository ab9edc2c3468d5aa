use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game on one board, from the blank grid to a win or loss.
///
/// Mines are only placed on the first reveal so that the first cell is always safe. Finished sessions ignore
/// every action; a new game means a new session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    size: BoardSize,
    seed: u64,
    board: Board,
    status: GameStatus,
    flags_placed: CellCount,
    first_click_done: bool,
    elapsed_seconds: u32,
    timer_running: bool,
}

impl GameSession {
    /// Fresh session on a blank board, with the timer stopped at zero.
    pub fn new(size: BoardSize, seed: u64) -> Self {
        let config = size.config();
        debug_assert_eq!(config.validate(), Ok(()));
        Self {
            size,
            seed,
            board: Board::new(config.rows, config.cols),
            status: GameStatus::Playing,
            flags_placed: 0,
            first_click_done: false,
            elapsed_seconds: 0,
            timer_running: false,
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.get(coords)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn total_mines(&self) -> CellCount {
        self.size.config().mines
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flags_placed
    }

    /// Mines minus flags, negative when the player over-flags.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.total_mines()) - i32::from(self.flags_placed)
    }

    pub fn first_click_done(&self) -> bool {
        self.first_click_done
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        let generator = RandomMineGenerator::new(self.seed);
        self.reveal_with(coords, generator)
    }

    /// Like [`reveal`](Self::reveal), but lays the mines with `generator` if this is the first reveal.
    pub fn reveal_with<G: MineGenerator>(&mut self, coords: Coord2, generator: G) -> RevealOutcome {
        if !self.status.is_playing() {
            return RevealOutcome::NoChange;
        }
        match self.board.get(coords) {
            Some(cell) if matches!(cell.cover(), Cover::Hidden) => {}
            _ => return RevealOutcome::NoChange,
        }

        if !self.first_click_done {
            let mines = self.total_mines();
            if let Err(err) = generator.generate(&mut self.board, mines, coords) {
                log::error!("could not lay mines around {:?}: {}", coords, err);
                return RevealOutcome::NoChange;
            }
            self.first_click_done = true;
            self.timer_running = true;
            log::debug!("first reveal at {:?}, timer started", coords);
        }

        let report = self.board.flood_reveal(coords);
        self.flags_placed = self.flags_placed.saturating_sub(report.cleared_flags);
        log::trace!("revealed {} cells from {:?}", report.revealed, coords);

        if report.hit_mine {
            self.finish(GameStatus::Lost);
            RevealOutcome::HitMine
        } else if self.board.check_win() {
            self.finish(GameStatus::Won);
            RevealOutcome::Won
        } else {
            RevealOutcome::Revealed
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if !self.status.is_playing() {
            return MarkOutcome::NoChange;
        }

        match self.board.toggle_flag(coords) {
            Some(true) => self.flags_placed += 1,
            Some(false) => self.flags_placed = self.flags_placed.saturating_sub(1),
            None => return MarkOutcome::NoChange,
        }
        MarkOutcome::Changed
    }

    /// Advances the clock by one second while the timer runs.
    pub fn tick(&mut self) -> bool {
        if self.timer_running {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        }
        self.timer_running
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.timer_running = false;
        log::debug!(
            "game on {} board ended: {:?} after {}s",
            self.size.key(),
            status,
            self.elapsed_seconds
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_session(mines: &[Coord2], first: Coord2) -> (GameSession, RevealOutcome) {
        let mut session = GameSession::new(BoardSize::Small, 0);
        let outcome = session.reveal_with(first, FixedMineGenerator::new(mines));
        (session, outcome)
    }

    #[test]
    fn reset_state() {
        let session = GameSession::new(BoardSize::Large, 1);
        assert_eq!(session.board().size(), (16, 32));
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.flags_placed(), 0);
        assert!(!session.first_click_done());
        assert_eq!(session.elapsed_seconds(), 0);
        assert!(!session.is_timer_running());
        assert_eq!(session.board().mine_count(), 0);
    }

    #[test]
    fn first_reveal_is_safe_and_starts_timer() {
        let mut session = GameSession::new(BoardSize::Small, 99);

        let outcome = session.reveal((0, 0));

        let board = session.board();
        assert!(!board[(0, 0)].has_mine());
        assert!(board[(0, 0)].is_revealed());
        assert_eq!(board.iter().filter(|(_, cell)| cell.has_mine()).count(), 10);
        assert!(session.first_click_done());
        match outcome {
            RevealOutcome::Won => {
                assert_eq!(session.status(), GameStatus::Won);
                assert!(!session.is_timer_running());
            }
            RevealOutcome::Revealed => {
                assert_eq!(session.status(), GameStatus::Playing);
                assert!(session.is_timer_running());
            }
            other => panic!("unexpected first reveal outcome {other:?}"),
        }
    }

    #[test]
    fn later_reveals_keep_the_layout() {
        let (mut session, _) = small_session(&[(7, 7), (7, 6), (6, 7)], (6, 6));
        let before: alloc::vec::Vec<_> = session.board().iter().map(|(_, c)| c.has_mine()).collect();

        assert_eq!(session.reveal((0, 0)), RevealOutcome::Won);

        let after: alloc::vec::Vec<_> = session.board().iter().map(|(_, c)| c.has_mine()).collect();
        assert_eq!(before, after);
        assert_eq!(session.board()[(6, 6)].adjacent_mines(), 3);
    }

    #[test]
    fn revealing_a_mine_loses_and_discloses_mines() {
        let (mut session, outcome) = small_session(&[(7, 7), (0, 7)], (1, 6));
        assert_eq!(outcome, RevealOutcome::Revealed);
        session.toggle_flag((7, 7));
        let safe_before: alloc::vec::Vec<_> = session
            .board()
            .iter()
            .filter(|(_, c)| !c.has_mine())
            .map(|(pos, c)| (pos, c.is_revealed()))
            .collect();

        assert_eq!(session.reveal((0, 7)), RevealOutcome::HitMine);

        assert_eq!(session.status(), GameStatus::Lost);
        assert!(!session.is_timer_running());
        assert!(session.board()[(0, 7)].is_revealed());
        assert!(session.board()[(7, 7)].is_revealed());
        assert_eq!(session.flags_placed(), 0);
        let safe_after: alloc::vec::Vec<_> = session
            .board()
            .iter()
            .filter(|(_, c)| !c.has_mine())
            .map(|(pos, c)| (pos, c.is_revealed()))
            .collect();
        assert_eq!(safe_before, safe_after);
    }

    #[test]
    fn finished_session_ignores_actions() {
        let (mut session, _) = small_session(&[(3, 3)], (0, 0));
        assert_eq!(session.status(), GameStatus::Won);

        assert_eq!(session.reveal((3, 3)), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((3, 3)), MarkOutcome::NoChange);
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.status(), GameStatus::Won);
    }

    #[test]
    fn win_does_not_need_flags() {
        let (mut session, outcome) = small_session(&[(0, 0), (0, 2)], (7, 7));
        assert_eq!(outcome, RevealOutcome::Revealed);
        session.toggle_flag((0, 0));

        assert_eq!(session.reveal((0, 1)), RevealOutcome::Won);
        assert_eq!(session.status(), GameStatus::Won);
        assert!(!session.board()[(0, 2)].is_flagged());
    }

    #[test]
    fn flagged_cell_cannot_be_revealed() {
        let (mut session, _) = small_session(&[(7, 7), (7, 5)], (0, 0));
        assert_eq!(session.toggle_flag((7, 6)), MarkOutcome::Changed);

        assert_eq!(session.reveal((7, 6)), RevealOutcome::NoChange);
        assert!(session.board()[(7, 6)].is_flagged());
    }

    #[test]
    fn toggle_twice_restores_flag_count() {
        let mut session = GameSession::new(BoardSize::Medium, 3);

        assert_eq!(session.toggle_flag((4, 4)), MarkOutcome::Changed);
        assert_eq!(session.flags_placed(), 1);
        assert_eq!(session.mines_left(), 39);
        assert_eq!(session.toggle_flag((4, 4)), MarkOutcome::Changed);

        assert_eq!(session.flags_placed(), 0);
        assert!(!session.board()[(4, 4)].is_flagged());
        assert!(!session.first_click_done());
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let (mut session, _) = small_session(&[(7, 7)], (7, 6));
        assert_eq!(session.toggle_flag((7, 6)), MarkOutcome::NoChange);
        assert_eq!(session.toggle_flag((9, 0)), MarkOutcome::NoChange);
        assert_eq!(session.flags_placed(), 0);
    }

    #[test]
    fn timer_runs_only_between_first_reveal_and_end() {
        let mut session = GameSession::new(BoardSize::Small, 0);
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 0);

        session.reveal_with((6, 6), FixedMineGenerator::new([(7, 7), (7, 6)]));
        assert!(session.tick());
        assert!(session.tick());
        assert_eq!(session.elapsed_seconds(), 2);

        session.reveal((7, 7));
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 2);
    }

    #[test]
    fn failed_mine_layout_leaves_session_untouched() {
        let mut session = GameSession::new(BoardSize::Small, 0);
        let fresh = session.clone();

        let outcome = session.reveal_with((2, 2), FixedMineGenerator::new([(2, 2)]));

        assert_eq!(outcome, RevealOutcome::NoChange);
        assert_eq!(session, fresh);
    }
}
