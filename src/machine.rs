use crate::geometry::Direction;
use crate::state::{Bounds, GameState};
use crate::surface::{Border, Key, Region, Surface};
use std::io;
use tracing::{debug, info, trace};

pub const FOOD_GLYPH: char = '+';
pub const BODY_GLYPH: char = '#';
pub const HEAD_GLYPH: char = '@';
pub const EMPTY_GLYPH: char = ' ';

const TITLE: &str = "Snake!";

const MENU_LINES: [(i32, &str); 7] = [
    (0, "SNAKE!"),
    (2, "Eat food to grow!"),
    (3, "Avoid the walls!"),
    (4, "Avoid yourself!"),
    (5, "Press F4 to quit,"),
    (6, "Space to play, and"),
    (7, "Arrows to move!"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Menu,
    Running,
    Paused,
    GameOver,
}

/// Screen regions, created once and destroyed once.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub info: Region,
    pub frame: Region,
    pub menu: Region,
    pub game: Region,
}

impl Layout {
    /// Total footprint of the layout as (height, width).
    pub const MIN_SIZE: (u16, u16) = (14, 20);

    pub fn create<S: Surface>(surface: &mut S) -> io::Result<Self> {
        let info = surface.create_region(5, 20, 0, 0)?;
        let frame = surface.create_region(10, 20, 4, 0)?;
        let menu = surface.create_region(8, 18, 5, 1)?;
        let game = surface.create_region(8, 18, 5, 1)?;

        surface.draw_border(info, Border::Plain)?;
        surface.write_text(info, 1, 1, TITLE)?;
        surface.refresh(info)?;

        surface.draw_border(frame, Border::Joined)?;
        surface.refresh(frame)?;

        Ok(Self {
            info,
            frame,
            menu,
            game,
        })
    }

    pub fn destroy<S: Surface>(self, surface: &mut S) -> io::Result<()> {
        surface.destroy_region(self.game)?;
        surface.destroy_region(self.menu)?;
        surface.destroy_region(self.frame)?;
        surface.destroy_region(self.info)
    }
}

/// The menu/running/paused/game-over machine and the state it drives.
#[derive(Debug)]
pub struct Game {
    pub status: Status,
    pub state: GameState,
    layout: Layout,
}

impl Game {
    pub fn new<S: Surface>(surface: &mut S, seed: u64) -> io::Result<Self> {
        let layout = Layout::create(surface)?;
        let bounds = Self::bounds_of(surface, layout);
        Ok(Self {
            status: Status::Menu,
            state: GameState::new(bounds, seed),
            layout,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Feeds one input event (or its absence) to the handler for the
    /// current status.
    pub fn handle<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        match self.status {
            Status::Menu => self.on_menu(surface, key),
            Status::Running => self.on_running(surface, key),
            Status::Paused => self.on_paused(surface, key),
            Status::GameOver => self.on_game_over(surface, key),
        }
    }

    /// Releases the screen regions.
    pub fn close<S: Surface>(self, surface: &mut S) -> io::Result<()> {
        self.layout.destroy(surface)
    }

    fn bounds_of<S: Surface>(surface: &S, layout: Layout) -> Bounds {
        let (height, width) = surface.size(layout.game);
        Bounds::from_size(height, width)
    }

    fn set_status(&mut self, status: Status) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "status change");
            self.status = status;
        }
    }

    fn on_menu<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        let Layout { menu, game, .. } = self.layout;

        let bounds = Self::bounds_of(surface, self.layout);
        self.state.rebuild(bounds);

        surface.clear(game)?;
        surface.refresh(game)?;

        for (row, line) in MENU_LINES {
            surface.write_text(menu, row, 0, line)?;
        }
        surface.refresh(menu)?;

        if key == Some(Key::Space) {
            info!(rows = bounds.max_row + 1, cols = bounds.max_col + 1, "game started");
            self.set_status(Status::Running);
            surface.clear(menu)?;
            surface.refresh(menu)?;
        }
        Ok(())
    }

    fn on_running<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        let Layout { info, menu, game, .. } = self.layout;

        // Pausing still lets this frame's tick run.
        if key == Some(Key::Space) {
            self.set_status(Status::Paused);
        }
        surface.clear(menu)?;
        surface.refresh(menu)?;

        self.tick(surface, key)?;

        surface.refresh(info)?;
        surface.refresh(game)
    }

    /// One step of the snake.
    ///
    /// A collision flips the status to game over but the rest of the frame
    /// (food, growth, drawing) still runs, so the fatal move is shown.
    fn tick<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        let Layout { info, game, .. } = self.layout;

        if let Some(Key::Arrow(direction)) = key {
            self.turn(direction);
        }

        let state = &mut self.state;
        state.head = state.head.moved(state.direction);
        trace!(row = state.head.row, col = state.head.col, "tick");

        let hit_wall = state.hits_wall();
        let hit_self = state.hits_body();
        if hit_wall || hit_self {
            let cause = if hit_wall { "wall" } else { "self" };
            info!(
                score = self.state.score,
                length = self.state.body.len(),
                cause,
                "game over"
            );
            self.set_status(Status::GameOver);
        }

        let state = &mut self.state;
        state.replenish_food();
        for cell in &state.food {
            surface.write_char(game, cell.row, cell.col, FOOD_GLYPH)?;
        }

        if state.eat() {
            debug!(score = state.score, max_length = state.snake_max_length, "food eaten");
        }

        if let Some(tail) = state.grow_head() {
            surface.write_char(game, tail.row, tail.col, EMPTY_GLYPH)?;
        }

        for cell in &state.body {
            surface.write_char(game, cell.row, cell.col, BODY_GLYPH)?;
        }
        surface.write_char(game, state.head.row, state.head.col, HEAD_GLYPH)?;
        surface.write_text(info, 3, 1, &format!("Score = {:3}", state.score))
    }

    fn turn(&mut self, direction: Direction) {
        if self.state.direction != direction {
            debug!(from = ?self.state.direction, to = ?direction, "turn");
            self.state.direction = direction;
        }
    }

    fn on_paused<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        if key == Some(Key::Space) {
            self.set_status(Status::Running);
            return Ok(());
        }
        let menu = self.layout.menu;
        surface.write_text(menu, 3, 3, "PAUSED")?;
        surface.refresh(menu)
    }

    fn on_game_over<S: Surface>(&mut self, surface: &mut S, key: Option<Key>) -> io::Result<()> {
        if key == Some(Key::Restart) {
            self.set_status(Status::Menu);
            return Ok(());
        }
        let menu = self.layout.menu;
        surface.write_text(menu, 3, 3, "GAME OVER")?;
        surface.write_text(menu, 5, 3, "F2 to restart!")?;
        surface.refresh(menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;
    use crate::state::INITIAL_SNAKE_LENGTH;
    use crate::surface::scripted::ScriptedSurface;
    use proptest::prelude::*;
    use std::collections::VecDeque;

    fn started_game(surface: &mut ScriptedSurface) -> Game {
        let mut game = Game::new(surface, 7).unwrap();
        game.handle(surface, Some(Key::Space)).unwrap();
        assert_eq!(game.status, Status::Running);
        game
    }

    /// A running game on a 5x5 field.
    fn small_game(surface: &mut ScriptedSurface) -> Game {
        let mut game = started_game(surface);
        game.state.rebuild(Bounds::from_size(5, 5));
        game
    }

    fn key_strategy() -> impl Strategy<Value = Option<Key>> {
        prop_oneof![
            Just(None),
            Just(Some(Key::Arrow(Direction::Up))),
            Just(Some(Key::Arrow(Direction::Left))),
            Just(Some(Key::Arrow(Direction::Down))),
            Just(Some(Key::Arrow(Direction::Right))),
            Just(Some(Key::Other)),
        ]
    }

    proptest! {
        /// Length, food and score invariants hold after every tick.
        #[test]
        fn prop_tick_invariants(
            seed in any::<u64>(),
            keys in prop::collection::vec(key_strategy(), 1..200),
        ) {
            let mut surface = ScriptedSurface::new();
            let mut game = Game::new(&mut surface, seed).unwrap();
            game.handle(&mut surface, Some(Key::Space)).unwrap();

            let mut eaten = 0;
            let mut last_score = 0;
            for key in keys {
                if game.status != Status::Running {
                    break;
                }
                let before = game.state.score;
                game.handle(&mut surface, key).unwrap();
                let ate = (game.state.score - before) as usize;
                eaten += ate;

                prop_assert!(game.state.body.len() <= game.state.snake_max_length);
                prop_assert_eq!(game.state.snake_max_length, INITIAL_SNAKE_LENGTH + eaten);
                // Food is topped up before eating, so a meal leaves a gap
                // until the next tick.
                prop_assert_eq!(game.state.food.len() + ate, game.state.max_food);
                prop_assert!(game.state.score >= last_score);
                last_score = game.state.score;
            }
        }

        #[test]
        fn prop_pause_resume_preserves_state(
            seed in any::<u64>(),
            keys in prop::collection::vec(key_strategy(), 0..6),
            idle in 0usize..5,
        ) {
            let mut surface = ScriptedSurface::new();
            let mut game = Game::new(&mut surface, seed).unwrap();
            game.handle(&mut surface, Some(Key::Space)).unwrap();
            for key in keys {
                if game.status != Status::Running {
                    break;
                }
                game.handle(&mut surface, key).unwrap();
            }
            prop_assume!(game.status == Status::Running);

            // The pausing frame itself still ticks; capture after it.
            game.handle(&mut surface, Some(Key::Space)).unwrap();
            prop_assume!(game.status == Status::Paused);
            let paused = game.state.snapshot();

            for _ in 0..idle {
                game.handle(&mut surface, None).unwrap();
                game.handle(&mut surface, Some(Key::Arrow(Direction::Up))).unwrap();
            }
            game.handle(&mut surface, Some(Key::Space)).unwrap();

            prop_assert_eq!(game.status, Status::Running);
            prop_assert_eq!(game.state.snapshot(), paused);
        }
    }

    #[test]
    fn test_new_game_starts_in_menu_with_game_bounds() {
        let mut surface = ScriptedSurface::new();
        let game = Game::new(&mut surface, 1).unwrap();
        assert_eq!(game.status, Status::Menu);
        assert_eq!(game.state.bounds, Bounds::from_size(8, 18));
        assert_eq!(surface.line(game.layout().info, 1), "|Snake!            |");
    }

    #[test]
    fn test_menu_renders_instructions_until_space() {
        let mut surface = ScriptedSurface::new();
        let mut game = Game::new(&mut surface, 1).unwrap();
        let menu = game.layout().menu;

        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.status, Status::Menu);
        assert_eq!(surface.line(menu, 0), "SNAKE!");
        assert_eq!(surface.line(menu, 7), "Arrows to move!");

        game.handle(&mut surface, Some(Key::Arrow(Direction::Up))).unwrap();
        assert_eq!(game.status, Status::Menu);
        assert_eq!(game.state.direction, Direction::Right);

        game.handle(&mut surface, Some(Key::Space)).unwrap();
        assert_eq!(game.status, Status::Running);
        assert_eq!(surface.count(menu, ' '), 8 * 18);
    }

    #[test]
    fn test_menu_reentry_yields_fresh_state() {
        let mut surface = ScriptedSurface::new();
        let mut game = Game::new(&mut surface, 3).unwrap();
        game.handle(&mut surface, None).unwrap();
        let first = game.state.snapshot();
        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.state.snapshot(), first);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.snake_max_length, 3);
        assert!(game.state.body.is_empty());
        assert!(game.state.food.is_empty());
    }

    #[test]
    fn test_first_tick_draws_head_food_and_score() {
        let mut surface = ScriptedSurface::new();
        let mut game = started_game(&mut surface);
        let layout = game.layout();
        game.state.food = vec![Coord::new(5, 5)];

        game.handle(&mut surface, None).unwrap();

        assert_eq!(game.state.head, Coord::new(0, 1));
        assert_eq!(surface.char_at(layout.game, 0, 1), HEAD_GLYPH);
        assert_eq!(surface.char_at(layout.game, 5, 5), FOOD_GLYPH);
        assert_eq!(game.state.food, vec![Coord::new(5, 5)]);
        assert_eq!(surface.line(layout.info, 3), "|Score =   0       |");
    }

    #[test]
    fn test_arrow_changes_direction_before_moving() {
        let mut surface = ScriptedSurface::new();
        let mut game = started_game(&mut surface);
        game.state.head = Coord::new(3, 3);

        game.handle(&mut surface, Some(Key::Arrow(Direction::Down))).unwrap();
        assert_eq!(game.state.direction, Direction::Down);
        assert_eq!(game.state.head, Coord::new(4, 3));

        game.handle(&mut surface, Some(Key::Other)).unwrap();
        assert_eq!(game.state.direction, Direction::Down);
        assert_eq!(game.state.head, Coord::new(5, 3));
    }

    #[test]
    fn test_wall_collision_sets_game_over_and_still_draws() {
        let mut surface = ScriptedSurface::new();
        let mut game = small_game(&mut surface);
        game.state.head = Coord::new(0, 2);
        game.state.direction = Direction::Up;

        game.handle(&mut surface, None).unwrap();

        assert_eq!(game.state.head, Coord::new(-1, 2));
        assert_eq!(game.status, Status::GameOver);
        // The rest of the frame ran.
        assert_eq!(game.state.food.len(), 1);
        assert_eq!(game.state.body.back(), Some(&Coord::new(-1, 2)));
    }

    #[test]
    fn test_self_collision_sets_game_over() {
        let mut surface = ScriptedSurface::new();
        let mut game = small_game(&mut surface);
        game.state.body = VecDeque::from(vec![Coord::new(2, 2), Coord::new(2, 3), Coord::new(2, 4)]);
        game.state.head = Coord::new(2, 4);
        game.state.direction = Direction::Left;

        game.handle(&mut surface, None).unwrap();

        assert_eq!(game.state.head, Coord::new(2, 3));
        assert_eq!(game.status, Status::GameOver);
    }

    #[test]
    fn test_reversing_onto_neck_is_fatal() {
        let mut surface = ScriptedSurface::new();
        let mut game = started_game(&mut surface);
        game.state.head = Coord::new(3, 3);
        game.handle(&mut surface, None).unwrap();
        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.status, Status::Running);

        game.handle(&mut surface, Some(Key::Arrow(Direction::Left))).unwrap();
        assert_eq!(game.status, Status::GameOver);
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut surface = ScriptedSurface::new();
        let mut game = small_game(&mut surface);
        let game_region = game.layout().game;
        game.state.head = Coord::new(2, 1);
        game.state.food = vec![Coord::new(2, 2)];

        game.handle(&mut surface, None).unwrap();

        assert_eq!(game.state.score, 1);
        assert_eq!(game.state.snake_max_length, 4);
        assert!(game.state.food.is_empty());
        assert_eq!(surface.char_at(game_region, 2, 2), HEAD_GLYPH);

        // Replaced at the start of the next tick (which may eat it again).
        game.handle(&mut surface, None).unwrap();
        let eaten_again = game.state.score as usize - 1;
        assert_eq!(game.state.food.len() + eaten_again, 1);
    }

    #[test]
    fn test_tail_is_erased_once_length_exceeded() {
        let mut surface = ScriptedSurface::new();
        let mut game = small_game(&mut surface);
        let game_region = game.layout().game;
        game.state.head = Coord::new(4, 0);
        game.state.food = vec![Coord::new(0, 0)];

        for _ in 0..4 {
            game.handle(&mut surface, None).unwrap();
        }

        assert_eq!(game.state.head, Coord::new(4, 4));
        assert_eq!(game.state.body.len(), 3);
        assert_eq!(surface.char_at(game_region, 4, 1), EMPTY_GLYPH);
        assert_eq!(surface.char_at(game_region, 4, 2), BODY_GLYPH);
        assert_eq!(surface.char_at(game_region, 4, 3), BODY_GLYPH);
        assert_eq!(surface.char_at(game_region, 4, 4), HEAD_GLYPH);
    }

    #[test]
    fn test_space_pauses_after_ticking() {
        let mut surface = ScriptedSurface::new();
        let mut game = started_game(&mut surface);
        let menu = game.layout().menu;

        game.handle(&mut surface, Some(Key::Space)).unwrap();
        assert_eq!(game.status, Status::Paused);
        assert_eq!(game.state.head, Coord::new(0, 1));

        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.state.head, Coord::new(0, 1));
        assert_eq!(surface.line(menu, 3), "   PAUSED");

        game.handle(&mut surface, Some(Key::Space)).unwrap();
        assert_eq!(game.status, Status::Running);
    }

    #[test]
    fn test_game_over_waits_for_restart() {
        let mut surface = ScriptedSurface::new();
        let mut game = small_game(&mut surface);
        let menu = game.layout().menu;
        game.state.direction = Direction::Up;
        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.status, Status::GameOver);

        for key in [None, Some(Key::Space), Some(Key::Other)] {
            game.handle(&mut surface, key).unwrap();
            assert_eq!(game.status, Status::GameOver);
        }
        assert_eq!(surface.line(menu, 3), "   GAME OVER");
        assert_eq!(surface.line(menu, 5), "   F2 to restart!");

        game.handle(&mut surface, Some(Key::Restart)).unwrap();
        assert_eq!(game.status, Status::Menu);

        game.handle(&mut surface, None).unwrap();
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.bounds, Bounds::from_size(8, 18));
        assert_eq!(surface.count(game.layout().game, ' '), 8 * 18);
    }

    #[test]
    fn test_close_destroys_every_region() {
        let mut surface = ScriptedSurface::new();
        let game = Game::new(&mut surface, 1).unwrap();
        game.close(&mut surface).unwrap();
        assert!(surface.regions.iter().all(|canvas| canvas.destroyed));
    }
}
