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

//! Side-by-side comparison driver for the vacuum world.
//!
//! Runs a SimpleReflexAgent and a ModelBasedAgent against independent grids, one logical step per
//! tick, and hands a render frame to a collaborator after every tick. The driver owns no scheduler
//! and no drawing: any timer, test harness, or manual loop can call [`ComparisonDriver::tick`],
//! and any rendering layer can implement [`Renderer`].

use std::time::Duration;

use rand::SeedableRng;
use serde::Serialize;

use vacuum_world::{
    Agent, Environment, GridAction, GridEnvironment, GridLocation, LocalPercept, ModelBasedAgent,
    Rng, SimpleReflexAgent, SquareState, VacuumWorldError,
};

/// Slider bounds from the dashboard: the inter-tick delay is kept in this range.
pub const MIN_TICK_DELAY: Duration = Duration::from_millis(200);
pub const MAX_TICK_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_TICK_DELAY: Duration = Duration::from_millis(800);

pub const REFLEX_AGENT_LABEL: &str = "Simple Reflex Agent";
pub const MODEL_BASED_AGENT_LABEL: &str = "Model-Based Agent";

/// Errors configuring or starting a comparison run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// Grid size must be at least 1.
    #[error("grid size must be at least 1, got {0}")]
    InvalidGridSize(usize),

    /// The underlying world rejected its configuration.
    #[error(transparent)]
    World(#[from] VacuumWorldError),
}

/// Validated configuration for a comparison run. The grid is square and applies to both lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub grid_size: usize,
    pub tick_delay: Duration,
    pub seed: u64,
}

impl DashboardConfig {
    /// Rejects a zero grid size; clamps the tick delay into the slider range. Out-of-range delays
    /// are not an error because the dashboard's slider makes them unrepresentable.
    pub fn new(
        grid_size: usize,
        tick_delay: Duration,
        seed: u64,
    ) -> Result<Self, DashboardError> {
        if grid_size == 0 {
            return Err(DashboardError::InvalidGridSize(grid_size));
        }
        Ok(Self {
            grid_size,
            tick_delay: clamp_tick_delay(tick_delay),
            seed,
        })
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            grid_size: 3,
            tick_delay: DEFAULT_TICK_DELAY,
            seed: 42,
        }
    }
}

pub fn clamp_tick_delay(tick_delay: Duration) -> Duration {
    tick_delay.clamp(MIN_TICK_DELAY, MAX_TICK_DELAY)
}

/// Run lifecycle. Pause takes effect between ticks only; Done is terminal until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Paused,
    Done,
}

/// Per-lane state for one render frame: everything a rendering layer needs to draw a grid.
#[derive(Debug, Clone, Serialize)]
pub struct LaneView {
    pub label: String,
    pub rows: usize,
    pub cols: usize,
    /// Row-major square states.
    pub squares: Vec<SquareState>,
    pub agent: GridLocation,
    pub progress: u8,
    pub done: bool,
    pub visited: usize,
}

/// Snapshot handed to the [`Renderer`] once per tick.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub step: u64,
    pub lanes: Vec<LaneView>,
}

/// Rendering collaborator. Called synchronously, once per tick, from whatever thread owns the
/// tick scheduler; `complete` fires exactly once per run, when both lanes have finished.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame);
    fn complete(&mut self, final_steps: u64);
}

type BoxedAgent = Box<dyn Agent<Action = GridAction, Percept = LocalPercept>>;

struct Lane {
    label: &'static str,
    environment: GridEnvironment,
    agent: BoxedAgent,
}

impl Lane {
    fn view(&self) -> LaneView {
        let environment = &self.environment;
        let mut squares = Vec::with_capacity(environment.rows() * environment.cols());
        for row in 0..environment.rows() {
            for col in 0..environment.cols() {
                squares.push(environment.square(GridLocation::new(row, col)).unwrap());
            }
        }
        LaneView {
            label: self.label.to_string(),
            rows: environment.rows(),
            cols: environment.cols(),
            squares,
            agent: environment.agent_location(),
            progress: environment.progress(),
            done: environment.is_done(),
            visited: environment.visited_count(),
        }
    }
}

/// Drives two independent environment/agent lanes in lockstep.
///
/// Lanes are constructed on `start` and discarded on `reset`; nothing survives a reset. Within a
/// tick the lanes advance strictly sequentially and share no state, so there is nothing to lock.
pub struct ComparisonDriver {
    config: DashboardConfig,
    phase: RunPhase,
    step: u64,
    final_steps: Option<u64>,
    lanes: Option<[Lane; 2]>,
}

impl ComparisonDriver {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            phase: RunPhase::Idle,
            step: 0,
            final_steps: None,
            lanes: None,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Final step count of a finished run; None until the run reaches Done.
    pub fn final_steps(&self) -> Option<u64> {
        self.final_steps
    }

    /// Current inter-tick delay. Schedulers should re-read this every tick: the speed control may
    /// change it mid-run.
    pub fn tick_delay(&self) -> Duration {
        self.config.tick_delay
    }

    pub fn set_tick_delay(&mut self, tick_delay: Duration) {
        self.config.tick_delay = clamp_tick_delay(tick_delay);
    }

    /// Idle -> Running, constructing both lanes from the configured seed. From Paused this
    /// resumes; from Running or Done it has no effect.
    pub fn start(&mut self) -> Result<(), DashboardError> {
        match self.phase {
            RunPhase::Idle => {
                self.lanes = Some(self.build_lanes()?);
                self.phase = RunPhase::Running;
                tracing::info!(
                    grid_size = self.config.grid_size,
                    seed = self.config.seed,
                    "starting comparison run"
                );
            }
            RunPhase::Paused => {
                self.phase = RunPhase::Running;
                tracing::info!(step = self.step, "resuming comparison run");
            }
            RunPhase::Running | RunPhase::Done => {}
        }
        Ok(())
    }

    /// Running <-> Paused. No effect in Idle or Done.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            RunPhase::Running => {
                self.phase = RunPhase::Paused;
                tracing::info!(step = self.step, "pausing comparison run");
            }
            RunPhase::Paused => {
                self.phase = RunPhase::Running;
                tracing::info!(step = self.step, "resuming comparison run");
            }
            RunPhase::Idle | RunPhase::Done => {}
        }
    }

    /// Any phase -> Idle. Lanes are discarded and the step counter zeroed; a fresh `start`
    /// rebuilds everything from scratch.
    pub fn reset(&mut self) {
        self.lanes = None;
        self.step = 0;
        self.final_steps = None;
        self.phase = RunPhase::Idle;
        tracing::info!("comparison run reset");
    }

    /// Advance one logical step. No-op unless Running.
    ///
    /// When every lane is already done the run transitions to Done, records the final step count,
    /// and emits the one-shot `complete` signal instead of rendering a frame. Otherwise each
    /// unfinished lane runs one percept -> act -> execute cycle (NoOp decisions are not executed),
    /// the shared step counter increments once, and the renderer receives the new frame.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> RunPhase {
        if self.phase != RunPhase::Running {
            return self.phase;
        }
        let Some(lanes) = self.lanes.as_mut() else {
            return self.phase;
        };

        if lanes.iter().all(|lane| lane.environment.is_done()) {
            self.phase = RunPhase::Done;
            self.final_steps = Some(self.step);
            tracing::info!(steps = self.step, "comparison run complete");
            renderer.complete(self.step);
            return self.phase;
        }

        for lane in lanes.iter_mut() {
            if lane.environment.is_done() {
                continue;
            }
            let percept = lane.environment.percept();
            let action = lane.agent.act(&percept);
            if action != GridAction::NoOp {
                lane.environment.execute_action(&action);
            }
        }
        self.step += 1;

        if let Some(frame) = self.render_frame() {
            renderer.render(&frame);
        }
        self.phase
    }

    /// Snapshot of the current lanes; None while Idle.
    pub fn render_frame(&self) -> Option<RenderFrame> {
        self.lanes.as_ref().map(|lanes| RenderFrame {
            step: self.step,
            lanes: lanes.iter().map(Lane::view).collect(),
        })
    }

    // Each lane's environment and agent get their own deterministic stream derived from the
    // configured seed, so the lanes neither mirror each other nor drift between runs.
    fn build_lanes(&self) -> Result<[Lane; 2], DashboardError> {
        let n = self.config.grid_size;
        let seed = self.config.seed;

        let reflex_environment = GridEnvironment::new(n, n, &mut Rng::seed_from_u64(seed))?;
        let reflex_agent = SimpleReflexAgent::new(Rng::seed_from_u64(seed.wrapping_add(1)));

        let model_environment =
            GridEnvironment::new(n, n, &mut Rng::seed_from_u64(seed.wrapping_add(2)))?;
        let model_agent = ModelBasedAgent::new(n, n, Rng::seed_from_u64(seed.wrapping_add(3)));

        Ok([
            Lane {
                label: REFLEX_AGENT_LABEL,
                environment: reflex_environment,
                agent: Box::new(reflex_agent),
            },
            Lane {
                label: MODEL_BASED_AGENT_LABEL,
                environment: model_environment,
                agent: Box::new(model_agent),
            },
        ])
    }
}
