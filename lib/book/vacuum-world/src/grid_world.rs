/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{Environment, HashMap, HashSet, Rng, VacuumWorldError};

/// A 0-indexed (row, col) square on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridLocation {
    pub row: usize,
    pub col: usize,
}

impl GridLocation {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SquareState {
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    Suck,
    Up,
    Down,
    Left,
    Right,
    NoOp,
}

/// LocalPercept is the Percept that the Agent receives from the Environment for just a single
/// location, e.g. imagine a dirt sensor looking right down. Produced fresh every cycle and never
/// stored by the Environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPercept {
    pub location: GridLocation,
    pub square_state: SquareState,
}

/// A rows x cols grid of squares, each Clean or Dirty, with a single agent on it.
///
/// Movement off the edge of the grid is absorbed: the action is accepted and the position does not
/// change. Attempting an illegal move wastes the turn rather than failing.
#[derive(Debug)]
pub struct GridEnvironment {
    rows: usize,
    cols: usize,
    squares: HashMap<GridLocation, SquareState>,
    agent_location: GridLocation,
    visited: HashSet<GridLocation>,
}

impl GridEnvironment {
    /// Create a grid with every square independently Dirty or Clean, uniformly at random. The
    /// agent starts at (0, 0).
    pub fn new(rows: usize, cols: usize, rng: &mut Rng) -> Result<Self, VacuumWorldError> {
        Self::with_squares(rows, cols, |_, _| {
            if rng.gen_bool(0.5) {
                SquareState::Dirty
            } else {
                SquareState::Clean
            }
        })
    }

    /// Create a grid with every square in the same state. Useful for fixed scenarios.
    pub fn with_uniform_state(
        rows: usize,
        cols: usize,
        state: SquareState,
    ) -> Result<Self, VacuumWorldError> {
        Self::with_squares(rows, cols, |_, _| state)
    }

    fn with_squares(
        rows: usize,
        cols: usize,
        mut state_for: impl FnMut(usize, usize) -> SquareState,
    ) -> Result<Self, VacuumWorldError> {
        if rows == 0 || cols == 0 {
            return Err(VacuumWorldError::InvalidDimensions { rows, cols });
        }

        let mut squares = HashMap::default();
        for row in 0..rows {
            for col in 0..cols {
                squares.insert(GridLocation::new(row, col), state_for(row, col));
            }
        }
        Ok(Self {
            rows,
            cols,
            squares,
            agent_location: GridLocation::new(0, 0),
            visited: HashSet::default(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn agent_location(&self) -> GridLocation {
        self.agent_location
    }

    pub fn square(&self, location: GridLocation) -> Option<SquareState> {
        self.squares.get(&location).copied()
    }

    pub fn square_count(&self) -> usize {
        self.squares.len()
    }

    /// Number of distinct squares the agent has occupied after executing an action. Informational
    /// only; never consulted for termination.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn has_visited(&self, location: GridLocation) -> bool {
        self.visited.contains(&location)
    }

    /// Percentage of squares currently Clean, floored to an integer.
    pub fn progress(&self) -> u8 {
        let clean = self.count_clean_squares() as usize;
        ((clean * 100) / (self.rows * self.cols)) as u8
    }

    fn count_clean_squares(&self) -> i32 {
        self.squares
            .values()
            .filter(|&s| *s == SquareState::Clean)
            .count() as i32
    }
}

impl Environment for GridEnvironment {
    type Action = GridAction;
    type Percept = LocalPercept;
    type Score = i32;

    fn percept(&self) -> Self::Percept {
        LocalPercept {
            location: self.agent_location,
            square_state: *self.squares.get(&self.agent_location).unwrap(),
        }
    }

    fn execute_action(&mut self, action: &Self::Action) {
        let GridLocation { row, col } = self.agent_location;
        match action {
            GridAction::Suck => {
                // Idempotent: sucking an already-Clean square is a valid action that changes
                // nothing.
                self.squares.insert(self.agent_location, SquareState::Clean);
            }
            GridAction::Up if row > 0 => {
                self.agent_location = GridLocation::new(row - 1, col);
            }
            GridAction::Down if row + 1 < self.rows => {
                self.agent_location = GridLocation::new(row + 1, col);
            }
            GridAction::Left if col > 0 => {
                self.agent_location = GridLocation::new(row, col - 1);
            }
            GridAction::Right if col + 1 < self.cols => {
                self.agent_location = GridLocation::new(row, col + 1);
            }
            _ => {}
        }
        self.visited.insert(self.agent_location);
    }

    fn score(&self) -> Self::Score {
        self.count_clean_squares()
    }

    fn is_done(&self) -> bool {
        self.squares.values().all(|&s| s == SquareState::Clean)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    // Disambiguate: both `proptest::prelude::*` and `super::*` glob a `Rng`.
    // The tests intend the crate's RNG type alias.
    use super::Rng;

    #[test]
    fn test_new_environment_has_all_squares_and_agent_at_origin() {
        let mut rng = Rng::seed_from_u64(42);
        let env = GridEnvironment::new(3, 4, &mut rng).unwrap();
        assert_eq!(env.square_count(), 12);
        assert_eq!(env.agent_location(), GridLocation::new(0, 0));
        assert_eq!(env.visited_count(), 0);
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        let mut rng = Rng::seed_from_u64(42);
        assert_eq!(
            GridEnvironment::new(0, 3, &mut rng).unwrap_err(),
            VacuumWorldError::InvalidDimensions { rows: 0, cols: 3 }
        );
        assert_eq!(
            GridEnvironment::new(3, 0, &mut rng).unwrap_err(),
            VacuumWorldError::InvalidDimensions { rows: 3, cols: 0 }
        );
    }

    #[test]
    fn test_suck_cleans_current_square_and_is_idempotent() {
        let mut env = GridEnvironment::with_uniform_state(2, 2, SquareState::Dirty).unwrap();
        env.execute_action(&GridAction::Suck);
        assert_eq!(env.square(GridLocation::new(0, 0)), Some(SquareState::Clean));

        env.execute_action(&GridAction::Suck);
        assert_eq!(env.square(GridLocation::new(0, 0)), Some(SquareState::Clean));
        assert_eq!(env.square(GridLocation::new(1, 1)), Some(SquareState::Dirty));
    }

    #[test]
    fn test_moves_off_each_edge_are_absorbed() {
        let mut env = GridEnvironment::with_uniform_state(2, 2, SquareState::Dirty).unwrap();

        // Top-left corner: Up and Left are absorbed.
        env.execute_action(&GridAction::Up);
        assert_eq!(env.agent_location(), GridLocation::new(0, 0));
        env.execute_action(&GridAction::Left);
        assert_eq!(env.agent_location(), GridLocation::new(0, 0));

        // Bottom-right corner: Down and Right are absorbed.
        env.execute_action(&GridAction::Down);
        env.execute_action(&GridAction::Right);
        assert_eq!(env.agent_location(), GridLocation::new(1, 1));
        env.execute_action(&GridAction::Down);
        assert_eq!(env.agent_location(), GridLocation::new(1, 1));
        env.execute_action(&GridAction::Right);
        assert_eq!(env.agent_location(), GridLocation::new(1, 1));
    }

    #[test]
    fn test_noop_changes_nothing_but_marks_visited() {
        let mut env = GridEnvironment::with_uniform_state(2, 2, SquareState::Dirty).unwrap();
        env.execute_action(&GridAction::NoOp);
        assert_eq!(env.agent_location(), GridLocation::new(0, 0));
        assert_eq!(env.square(GridLocation::new(0, 0)), Some(SquareState::Dirty));
        assert!(env.has_visited(GridLocation::new(0, 0)));
        assert_eq!(env.visited_count(), 1);
    }

    #[test]
    fn test_progress_floors_and_matches_is_done() {
        let mut env = GridEnvironment::with_uniform_state(1, 3, SquareState::Dirty).unwrap();
        assert_eq!(env.progress(), 0);
        assert!(!env.is_done());

        env.execute_action(&GridAction::Suck);
        assert_eq!(env.progress(), 33);

        env.execute_action(&GridAction::Right);
        env.execute_action(&GridAction::Suck);
        assert_eq!(env.progress(), 66);
        assert!(!env.is_done());

        env.execute_action(&GridAction::Right);
        env.execute_action(&GridAction::Suck);
        assert_eq!(env.progress(), 100);
        assert!(env.is_done());
    }

    #[test]
    fn test_fixed_traversal_cleans_everything() {
        let mut env = GridEnvironment::with_uniform_state(3, 3, SquareState::Dirty).unwrap();

        // Serpentine sweep: suck, walk the row, drop down a row, reverse direction.
        for row in 0..3 {
            for _ in 0..3 {
                env.execute_action(&GridAction::Suck);
                let step = if row % 2 == 0 {
                    GridAction::Right
                } else {
                    GridAction::Left
                };
                env.execute_action(&step);
            }
            env.execute_action(&GridAction::Down);
        }

        assert!(env.is_done());
        assert_eq!(env.progress(), 100);
        assert_eq!(env.score(), 9);
        assert_eq!(env.visited_count(), 9);
    }

    #[test]
    fn test_visited_only_grows() {
        let mut env = GridEnvironment::with_uniform_state(1, 2, SquareState::Dirty).unwrap();
        env.execute_action(&GridAction::Right);
        env.execute_action(&GridAction::Left);
        env.execute_action(&GridAction::Right);
        assert_eq!(env.visited_count(), 2);
        assert!(env.has_visited(GridLocation::new(0, 0)));
        assert!(env.has_visited(GridLocation::new(0, 1)));
    }

    #[test]
    fn test_percept_reads_current_square() {
        let mut env = GridEnvironment::with_uniform_state(1, 2, SquareState::Dirty).unwrap();
        let percept = env.percept();
        assert_eq!(percept.location, GridLocation::new(0, 0));
        assert_eq!(percept.square_state, SquareState::Dirty);

        env.execute_action(&GridAction::Suck);
        let percept = env.percept();
        assert_eq!(percept.square_state, SquareState::Clean);

        env.execute_action(&GridAction::Right);
        let percept = env.percept();
        assert_eq!(percept.location, GridLocation::new(0, 1));
        assert_eq!(percept.square_state, SquareState::Dirty);
    }

    fn arbitrary_action() -> impl Strategy<Value = GridAction> {
        prop_oneof![
            Just(GridAction::Suck),
            Just(GridAction::Up),
            Just(GridAction::Down),
            Just(GridAction::Left),
            Just(GridAction::Right),
            Just(GridAction::NoOp),
        ]
    }

    proptest! {
        #[test]
        fn test_fresh_environment_invariants(rows in 1usize..=8, cols in 1usize..=8, seed in 0u64..1000) {
            let mut rng = Rng::seed_from_u64(seed);
            let env = GridEnvironment::new(rows, cols, &mut rng).unwrap();
            prop_assert_eq!(env.square_count(), rows * cols);
            prop_assert_eq!(env.agent_location(), GridLocation::new(0, 0));
        }

        #[test]
        fn test_any_action_sequence_preserves_invariants(
            rows in 1usize..=8,
            cols in 1usize..=8,
            seed in 0u64..1000,
            actions in proptest::collection::vec(arbitrary_action(), 0..64),
        ) {
            let mut rng = Rng::seed_from_u64(seed);
            let mut env = GridEnvironment::new(rows, cols, &mut rng).unwrap();
            let mut last_visited = env.visited_count();
            for action in &actions {
                env.execute_action(action);
                let location = env.agent_location();
                prop_assert!(location.row < rows && location.col < cols);
                prop_assert_eq!(env.square_count(), rows * cols);
                prop_assert!(env.visited_count() >= last_visited);
                last_visited = env.visited_count();
            }
        }
    }
}
