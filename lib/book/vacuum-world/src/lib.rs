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

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

pub mod agents;
pub mod grid_world;

pub use agents::{ModelBasedAgent, SimpleReflexAgent, SquareBelief};
pub use grid_world::{GridAction, GridEnvironment, GridLocation, LocalPercept, SquareState};

pub type Rng = rand_pcg::Pcg64;
pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<V> = rustc_hash::FxHashSet<V>;

/// Errors constructing a vacuum world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VacuumWorldError {
    /// Grid dimensions must both be at least 1.
    #[error("grid dimensions must be at least 1x1: {rows}x{cols}")]
    InvalidDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
}

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// If the Agent wants to implement a model-based agent, implementations can
/// store state derived from all previous Perceptions.
///
/// If the Agent wants to implement e.g. SimpleReflexAgent, it does not need
/// to store any world state.
///
/// Notice that the Agent is not aware of an Environment, its only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Self::Action;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action;
    type Percept;
    type Score: num_traits::NumAssign + Copy;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action);

    /// Returns the score of the Environment. This is not cumulative or stateful. This is the score
    /// of the Environment at the current state.
    fn score(&self) -> Self::Score;

    /// Whether the Environment has reached its goal state. Termination authority lives here, never
    /// with an Agent: an Agent that stops acting does not end a run.
    fn is_done(&self) -> bool;
}

/// A Simulation runs a single Agent in multiple Performance, Environment, Action, Sensing (PEAS)
/// cycles, until the Environment reports it is done or a step cap is reached.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    max_steps: u64,
    steps_taken: u64,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    pub fn new(environment: _Environment, agent: _Agent, max_steps: u64) -> Self {
        Self {
            environment,
            agent,
            max_steps,
            steps_taken: 0,
        }
    }

    /// Run until the Environment is done or `max_steps` cycles have elapsed. Returns the number of
    /// steps taken. Idempotent once finished: calling again takes no further steps.
    pub fn run(&mut self) -> u64 {
        while self.steps_taken < self.max_steps && !self.environment.is_done() {
            let percept = self.environment.percept();
            let action = self.agent.act(&percept);
            self.environment.execute_action(&action);
            self.steps_taken += 1;
        }
        self.steps_taken
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn is_done(&self) -> bool {
        self.environment.is_done()
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.environment.score()
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }
}
