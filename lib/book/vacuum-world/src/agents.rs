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

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::grid_world::{GridAction, GridLocation, LocalPercept, SquareState};
use crate::{Agent, HashMap, Rng};

const MOVES: [GridAction; 4] = [
    GridAction::Up,
    GridAction::Down,
    GridAction::Left,
    GridAction::Right,
];

/// Stateless reflex agent: suck if the current square is Dirty, otherwise wander one square in a
/// uniformly random direction.
///
/// It never returns NoOp, so it never deliberately halts; it may revisit squares it already
/// cleaned and may attempt moves off the grid (the Environment absorbs those). Ending a run is
/// the caller's job, via the Environment's is_done.
pub struct SimpleReflexAgent {
    rng: Rng,
}

impl SimpleReflexAgent {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl Agent for SimpleReflexAgent {
    type Action = GridAction;
    type Percept = LocalPercept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        if percept.square_state == SquareState::Dirty {
            return GridAction::Suck;
        }
        *MOVES.choose(&mut self.rng).unwrap()
    }
}

/// What a ModelBasedAgent believes about a single square. Squares it has never stood on stay
/// Unknown forever; the agent does not infer the state of squares it has not observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquareBelief {
    Unknown,
    Seen(SquareState),
}

/// Reflex agent with an internal model of the grid, updated from each percept at the observed
/// location only. Once its own model reads Clean everywhere it answers NoOp.
///
/// The model can only read all-Clean after every square has been visited and observed clean, so
/// in practice this agent wanders exactly like SimpleReflexAgent until full coverage. That gap is
/// intended: the model is the agent's private belief, not ground truth, and the driving loop's
/// is_done check on the real grid remains the termination authority.
pub struct ModelBasedAgent {
    model: HashMap<GridLocation, SquareBelief>,
    rng: Rng,
}

impl ModelBasedAgent {
    pub fn new(rows: usize, cols: usize, rng: Rng) -> Self {
        let mut model = HashMap::default();
        for row in 0..rows {
            for col in 0..cols {
                model.insert(GridLocation::new(row, col), SquareBelief::Unknown);
            }
        }
        Self { model, rng }
    }

    pub fn belief(&self, location: GridLocation) -> Option<SquareBelief> {
        self.model.get(&location).copied()
    }

    fn model_reads_all_clean(&self) -> bool {
        self.model
            .values()
            .all(|&b| b == SquareBelief::Seen(SquareState::Clean))
    }
}

impl Agent for ModelBasedAgent {
    type Action = GridAction;
    type Percept = LocalPercept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action {
        self.model
            .insert(percept.location, SquareBelief::Seen(percept.square_state));
        if percept.square_state == SquareState::Dirty {
            return GridAction::Suck;
        }
        if self.model_reads_all_clean() {
            return GridAction::NoOp;
        }
        *MOVES.choose(&mut self.rng).unwrap()
    }
}
