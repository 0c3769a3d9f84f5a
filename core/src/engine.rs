use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Playing
    }
}

/// Everything about a game that is not stored per cell.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameStatus {
    config: GameConfig,
    mine_generated: bool,
    phase: Phase,
    start_time: Instant,
    ended_at: Option<Instant>,
    triggered_mine: Option<Coord2>,
    mines_placed: Option<CellCount>,
}

impl GameStatus {
    fn new(config: GameConfig) -> Self {
        Self {
            config,
            mine_generated: false,
            phase: Phase::Playing,
            start_time: Instant::now(),
            ended_at: None,
            triggered_mine: None,
            mines_placed: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Mines on the board once they are generated, the requested count before that.
    ///
    /// The two differ when the request does not fit outside the first move's safe zone.
    pub fn mine_count(&self) -> CellCount {
        self.mines_placed.unwrap_or(self.config.mines)
    }

    pub fn mine_generated(&self) -> bool {
        self.mine_generated
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Time since the game was set up, frozen once it is won or lost.
    pub fn elapsed(&self) -> Duration {
        self.ended_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.start_time)
    }

    /// The mine whose reveal ended the game, if any.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }
}

/// Owns a board and runs every player command against it.
///
/// Each command validates its coordinates, mutates the grid, and then runs
/// [`check_status`](Self::check_status) before returning, so the reported [`MoveOutcome`] always
/// reflects the board after the move. Commands that make no sense for the current phase or cell
/// are no-ops.
#[derive(Clone, Debug)]
pub struct BoardEngine<G: MineGenerator = RandomMineGenerator> {
    grid: Grid,
    status: GameStatus,
    generator: G,
}

impl BoardEngine<RandomMineGenerator> {
    pub fn new(config: GameConfig) -> Self {
        Self::with_generator(config, RandomMineGenerator::default())
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_generator(config, RandomMineGenerator::new(seed))
    }
}

impl<G: MineGenerator> BoardEngine<G> {
    pub fn with_generator(config: GameConfig, generator: G) -> Self {
        Self {
            grid: Grid::new(config.size),
            status: GameStatus::new(config),
            generator,
        }
    }

    /// Throws away the current game and sets up a fresh board.
    ///
    /// The config is trusted as is, use [`GameConfig::new`] to validate user input beforehand.
    pub fn reset(&mut self, config: GameConfig) {
        log::debug!("New game: {:?}", config);
        self.grid = Grid::new(config.size);
        self.status = GameStatus::new(config);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn phase(&self) -> Phase {
        self.status.phase
    }

    pub fn is_finished(&self) -> bool {
        self.status.phase.is_finished()
    }

    pub fn mine_generated(&self) -> bool {
        self.status.mine_generated
    }

    pub fn start_time(&self) -> Instant {
        self.status.start_time
    }

    pub fn elapsed(&self) -> Duration {
        self.status.elapsed()
    }

    pub fn config(&self) -> GameConfig {
        self.status.config
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.status.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.grid.flag_count()
    }

    /// How many mines have not been flagged yet, negative when there are too many flags.
    pub fn mines_left(&self) -> isize {
        (self.mine_count() as isize) - (self.flag_count() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.status.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<&Cell> {
        self.grid.cell(coords).ok_or(GameError::InvalidCoords)
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Opens a cell, generating the mines first if this is the opening move.
    ///
    /// Opening a zero cell floods into its connected zero region, opening a mine loses the game.
    /// Revealing an open zero cell again resumes the flood, which picks up cells that were
    /// skipped while flagged.
    pub fn reveal(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        let cell = self.grid[coords];
        if !self.status.phase.is_playing() || cell.flagged {
            return Ok(MoveOutcome::NoChange);
        }

        if cell.revealed {
            let flooded = self.grid.expand_zero(coords);
            log::debug!("Re-opened cell at {:?}, flooded: {}", coords, flooded);
            let outcome = if flooded > 0 {
                MoveOutcome::Changed
            } else {
                MoveOutcome::NoChange
            };
            return Ok(outcome | self.check_status());
        }

        if !self.status.mine_generated {
            self.generate_mines(coords);
        }

        let outcome = self.reveal_single_cell(coords);
        Ok(outcome | self.check_status())
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if !self.status.phase.is_playing() || self.grid[coords].revealed {
            return Ok(MoveOutcome::NoChange);
        }

        let cell = self.grid.cell_mut(coords);
        cell.flagged = !cell.flagged;
        log::debug!("Flag at {:?} set to {}", coords, cell.flagged);

        Ok(MoveOutcome::Changed | self.check_status())
    }

    /// Chords on a revealed number.
    ///
    /// When the flags around it account for every adjacent mine, all other neighbors are opened
    /// the same way [`reveal`](Self::reveal) opens a cell, so a misplaced flag can lose the game.
    /// When the covered neighbors can only be mines, they all get flagged.
    pub fn auto_expand(&mut self, coords: Coord2) -> Result<MoveOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        let cell = self.grid[coords];
        if !self.status.phase.is_playing()
            || !cell.revealed
            || cell.mine
            || cell.adjacent_mines == 0
        {
            return Ok(MoveOutcome::NoChange);
        }

        let mut outcome = MoveOutcome::NoChange;

        if self.grid.count_flagged_neighbors(coords) == cell.adjacent_mines {
            log::debug!("Chord reveal around {:?}", coords);
            for pos in self.grid.neighbor_coords(coords) {
                outcome = outcome | self.reveal_single_cell(pos);
                if !self.status.phase.is_playing() {
                    break;
                }
            }
        }

        if self.status.phase.is_playing() {
            let flagged = self.grid.count_flagged_neighbors(coords);
            let hidden = self.grid.count_hidden_neighbors(coords);
            if hidden > 0 && Some(hidden) == cell.adjacent_mines.checked_sub(flagged) {
                log::debug!("Chord flag around {:?}", coords);
                for pos in self.grid.neighbor_coords(coords) {
                    let neighbor = self.grid.cell_mut(pos);
                    if !neighbor.is_covered_by_player() {
                        neighbor.flagged = true;
                    }
                }
                outcome = outcome | MoveOutcome::Changed;
            }
        }

        Ok(outcome | self.check_status())
    }

    /// Ends the game once every cell is revealed or flagged.
    ///
    /// The game is won when all flags sit on mines and lost otherwise. Does nothing before the
    /// mines exist or after the game ended, so calling it repeatedly is harmless.
    pub fn check_status(&mut self) -> MoveOutcome {
        if !self.status.phase.is_playing() || !self.status.mine_generated {
            return MoveOutcome::NoChange;
        }

        if !self.grid.is_fully_covered() {
            return MoveOutcome::NoChange;
        }

        if self.grid.has_incorrect_flag() {
            log::debug!("Board covered with an incorrect flag");
            self.lose(None);
            MoveOutcome::Lost
        } else {
            log::debug!("Board covered, game won");
            self.end(Phase::Won);
            MoveOutcome::Won
        }
    }

    fn generate_mines(&mut self, anchor: Coord2) {
        let mines = self.generator.generate(self.status.config, anchor);
        let placed = self.grid.place_mines(mines);
        self.grid.update_numbers();
        self.status.mine_generated = true;
        self.status.mines_placed = Some(placed);

        if placed != self.status.config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                placed,
                self.status.config.mines
            );
        }
        log::debug!("Generated {} mines, first move at {:?}", placed, anchor);
    }

    /// Opens one covered, unflagged cell, flooding from it when it has no adjacent mines.
    fn reveal_single_cell(&mut self, coords: Coord2) -> MoveOutcome {
        let cell = self.grid.cell_mut(coords);
        if cell.revealed || cell.flagged {
            return MoveOutcome::NoChange;
        }

        cell.revealed = true;
        if cell.mine {
            log::debug!("Hit a mine at {:?}", coords);
            self.lose(Some(coords));
            return MoveOutcome::Lost;
        }

        let flooded = self.grid.expand_zero(coords);
        log::debug!(
            "Open cell at {:?}, mine count: {}, flooded: {}",
            coords,
            self.grid[coords].adjacent_mines,
            flooded
        );
        MoveOutcome::Changed
    }

    fn lose(&mut self, triggered_mine: Option<Coord2>) {
        self.status.triggered_mine = triggered_mine;
        self.end(Phase::Lost);
        self.grid.reveal_all_mines();
    }

    fn end(&mut self, phase: Phase) {
        if self.status.phase.is_finished() {
            return;
        }
        self.status.phase = phase;
        self.status.ended_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: Coord2, mines: &[Coord2]) -> BoardEngine<FixedMineGenerator> {
        let config = GameConfig::new_unchecked(size, mines.len() as CellCount);
        BoardEngine::with_generator(config, FixedMineGenerator::new(mines))
    }

    fn revealed(engine: &BoardEngine<FixedMineGenerator>, coords: Coord2) -> bool {
        engine.cell_at(coords).unwrap().is_revealed()
    }

    #[test]
    fn first_click_floods_up_to_numbered_border() {
        let mut engine = engine((5, 5), &[(4, 4)]);

        assert_eq!(engine.reveal((0, 0)).unwrap(), MoveOutcome::Changed);

        assert!(engine.mine_generated());
        assert_eq!(engine.cell_at((3, 3)).unwrap().adjacent_mines(), 1);
        assert_eq!(engine.grid().revealed_count(), 24);
        assert!(!revealed(&engine, (4, 4)));
        assert_eq!(engine.phase(), Phase::Playing);

        assert_eq!(engine.toggle_flag((4, 4)).unwrap(), MoveOutcome::Won);
        assert_eq!(engine.phase(), Phase::Won);
    }

    #[test]
    fn board_smaller_than_safe_zone_is_won_on_first_click() {
        let config = GameConfig::new_unchecked((3, 3), 1);
        let mut engine = BoardEngine::with_seed(config, 5);

        assert_eq!(engine.reveal((1, 1)).unwrap(), MoveOutcome::Won);
        assert_eq!(engine.grid().mine_count(), 0);
        assert!(engine.grid().iter().all(Cell::is_revealed));
    }

    #[test]
    fn revealing_a_flagged_cell_does_nothing() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.reveal((2, 2)).unwrap(), MoveOutcome::NoChange);
        assert!(!engine.mine_generated());
        assert!(!revealed(&engine, (2, 2)));
    }

    #[test]
    fn flagging_a_revealed_cell_does_nothing() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), MoveOutcome::NoChange);
        assert!(!engine.cell_at((1, 1)).unwrap().is_flagged());
    }

    #[test]
    fn flag_toggles_back_and_forth() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MoveOutcome::Changed);
        assert_eq!(engine.mines_left(), 0);
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MoveOutcome::Changed);
        assert_eq!(engine.mines_left(), 1);
        assert!(!engine.cell_at((0, 0)).unwrap().is_flagged());
    }

    #[test]
    fn flags_before_generation_never_finish_the_game() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.toggle_flag((1, 0)).unwrap(), MoveOutcome::Changed);

        assert!(engine.grid().is_fully_covered());
        assert_eq!(engine.phase(), Phase::Playing);
        assert_eq!(engine.check_status(), MoveOutcome::NoChange);
    }

    #[test]
    fn hitting_a_mine_loses_and_shows_all_mines() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);

        assert_eq!(engine.reveal((2, 0)).unwrap(), MoveOutcome::Changed);
        assert!(revealed(&engine, (1, 1)));
        assert!(!revealed(&engine, (0, 2)));

        assert_eq!(engine.reveal((0, 0)).unwrap(), MoveOutcome::Lost);
        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert!(revealed(&engine, (2, 2)));
        assert!(!revealed(&engine, (0, 2)));
        assert_eq!(engine.cell_at((2, 2)).unwrap().view(), CellView::Mine);
    }

    #[test]
    fn finished_game_ignores_commands() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 2)]);
        engine.reveal((2, 0)).unwrap();
        engine.reveal((0, 0)).unwrap();
        let elapsed = engine.elapsed();

        assert_eq!(engine.reveal((0, 2)).unwrap(), MoveOutcome::NoChange);
        assert_eq!(engine.toggle_flag((0, 2)).unwrap(), MoveOutcome::NoChange);
        assert_eq!(engine.auto_expand((1, 1)).unwrap(), MoveOutcome::NoChange);
        assert!(!revealed(&engine, (0, 2)));
        assert_eq!(engine.elapsed(), elapsed);
    }

    #[test]
    fn all_safe_cells_open_is_not_yet_a_win() {
        let mut engine = engine((2, 1), &[(0, 0)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), MoveOutcome::Changed);
        assert_eq!(engine.phase(), Phase::Playing);

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MoveOutcome::Won);
        assert!(engine.is_finished());
        assert_eq!(engine.triggered_mine(), None);
    }

    #[test]
    fn covering_the_board_with_a_wrong_flag_loses() {
        let mut engine = engine((3, 1), &[(0, 0)]);

        engine.toggle_flag((2, 0)).unwrap();
        assert_eq!(engine.reveal((1, 0)).unwrap(), MoveOutcome::Changed);
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MoveOutcome::Lost);

        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(engine.triggered_mine(), None);
        assert!(revealed(&engine, (0, 0)));
        assert!(!revealed(&engine, (2, 0)));
        assert!(engine.cell_at((2, 0)).unwrap().is_flagged());
    }

    #[test]
    fn auto_expand_with_correct_flags_opens_neighbors() {
        let mut engine = engine((3, 3), &[(0, 1), (2, 1)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 1)).unwrap();
        engine.toggle_flag((2, 1)).unwrap();

        assert_eq!(engine.auto_expand((1, 1)).unwrap(), MoveOutcome::Won);
        assert_eq!(engine.cell_at((1, 0)).unwrap().view(), CellView::Open(2));
        assert_eq!(engine.cell_at((2, 2)).unwrap().view(), CellView::Open(1));
        assert_eq!(engine.cell_at((0, 1)).unwrap().view(), CellView::Flagged);
    }

    #[test]
    fn auto_expand_with_misplaced_flag_hits_the_mine() {
        let mut engine = engine((3, 3), &[(0, 1), (2, 1)]);

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((0, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();

        assert_eq!(engine.auto_expand((1, 1)).unwrap(), MoveOutcome::Lost);
        assert_eq!(engine.phase(), Phase::Lost);
        assert_eq!(engine.triggered_mine(), Some((2, 1)));
        assert!(revealed(&engine, (0, 1)));
        assert!(!revealed(&engine, (1, 0)));
    }

    #[test]
    fn auto_expand_flags_neighbors_that_must_be_mines() {
        let mut engine = engine((4, 1), &[(0, 0), (2, 0)]);

        assert_eq!(engine.reveal((1, 0)).unwrap(), MoveOutcome::Changed);
        assert_eq!(engine.auto_expand((1, 0)).unwrap(), MoveOutcome::Changed);
        assert!(engine.cell_at((0, 0)).unwrap().is_flagged());
        assert!(engine.cell_at((2, 0)).unwrap().is_flagged());
        assert_eq!(engine.phase(), Phase::Playing);

        assert_eq!(engine.reveal((3, 0)).unwrap(), MoveOutcome::Won);
    }

    #[test]
    fn auto_expand_ignores_cells_without_a_number() {
        let mut engine = engine((5, 5), &[(4, 4)]);

        assert_eq!(engine.auto_expand((0, 0)).unwrap(), MoveOutcome::NoChange);
        engine.reveal((0, 0)).unwrap();
        assert_eq!(engine.auto_expand((0, 0)).unwrap(), MoveOutcome::NoChange);
        assert_eq!(engine.auto_expand((4, 4)).unwrap(), MoveOutcome::NoChange);
    }

    #[test]
    fn auto_expand_without_enough_information_does_nothing() {
        let mut engine = engine((3, 3), &[(0, 0), (2, 0)]);

        engine.reveal((1, 2)).unwrap();
        let before = engine.grid().clone();

        assert_eq!(engine.auto_expand((1, 1)).unwrap(), MoveOutcome::NoChange);
        assert_eq!(engine.grid(), &before);
    }

    #[test]
    fn out_of_bounds_coordinates_are_rejected() {
        let mut engine = engine((3, 3), &[(0, 0)]);

        assert_eq!(engine.reveal((3, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 3)), Err(GameError::InvalidCoords));
        assert_eq!(engine.auto_expand((9, 9)), Err(GameError::InvalidCoords));
        assert_eq!(engine.cell_at((3, 3)), Err(GameError::InvalidCoords));
        assert!(!engine.mine_generated());
    }

    #[test]
    fn reset_replaces_the_whole_board() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.toggle_flag((2, 2)).unwrap();
        engine.reveal((0, 0)).unwrap();
        assert_eq!(engine.phase(), Phase::Lost);
        let first_start = engine.start_time();

        engine.reset(GameConfig::new_unchecked((4, 2), 1));

        assert_eq!(engine.size(), (4, 2));
        assert_eq!(engine.phase(), Phase::Playing);
        assert!(!engine.mine_generated());
        assert_eq!(engine.triggered_mine(), None);
        assert!(engine.start_time() >= first_start);
        assert!(engine.grid().iter().all(|cell| *cell == Cell::new(cell.coords())));
    }

    #[test]
    fn reveal_on_open_number_does_nothing() {
        let mut engine = engine((3, 3), &[(0, 0)]);
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.reveal((1, 1)).unwrap(), MoveOutcome::NoChange);
    }

    #[test]
    fn reveal_on_open_zero_resumes_flood_past_removed_flag() {
        let mut engine = engine((5, 1), &[(4, 0)]);

        engine.toggle_flag((2, 0)).unwrap();
        assert_eq!(engine.reveal((0, 0)).unwrap(), MoveOutcome::Changed);
        assert!(revealed(&engine, (1, 0)));
        assert!(!revealed(&engine, (2, 0)));

        engine.toggle_flag((2, 0)).unwrap();
        assert_eq!(engine.reveal((1, 0)).unwrap(), MoveOutcome::Changed);

        assert!(revealed(&engine, (2, 0)));
        assert_eq!(engine.cell_at((3, 0)).unwrap().view(), CellView::Open(1));
        assert!(!revealed(&engine, (4, 0)));
        assert_eq!(engine.phase(), Phase::Playing);

        assert_eq!(engine.reveal((1, 0)).unwrap(), MoveOutcome::NoChange);
    }

    #[test]
    fn mine_counter_follows_capped_generation() {
        let config = GameConfig::new_unchecked((4, 4), 16);
        let mut engine = BoardEngine::with_seed(config, 3);
        assert_eq!(engine.mines_left(), 16);

        engine.reveal((0, 0)).unwrap();

        // 16 cells minus the 2x2 safe corner
        assert_eq!(engine.grid().mine_count(), 12);
        assert_eq!(engine.mine_count(), 12);
        assert_eq!(engine.mines_left(), 12);
        assert_eq!(engine.config().mines, 16);

        engine.reset(config);
        assert_eq!(engine.mine_count(), 16);
    }
}
