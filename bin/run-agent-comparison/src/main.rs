/*
 * Copyright 2023 Asim Ihsan
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Side-by-side vacuum agent comparison in the terminal.
//!
//! Runs a SimpleReflexAgent and a ModelBasedAgent on independent random grids and redraws both
//! boards every tick until each grid is fully clean. The rendering here is deliberately thin; all
//! simulation state comes from the driver's render frames.

use std::thread;
use std::time::Duration;

use clap::Parser;

use vacuum_dashboard::{
    ComparisonDriver, DashboardConfig, LaneView, RenderFrame, Renderer, RunPhase,
    MODEL_BASED_AGENT_LABEL, REFLEX_AGENT_LABEL,
};
use vacuum_world::SquareState;

/// Command line arguments for the comparison run.
#[derive(Parser, Debug)]
#[command(name = "vacuum-comparison")]
#[command(about = "Compare a simple reflex agent against a model-based agent in the vacuum world")]
struct Args {
    /// Grid dimension N; both agents get their own N x N grid
    #[arg(long, default_value_t = 3)]
    grid_size: usize,

    /// Delay between ticks in milliseconds (clamped to 200-1500)
    #[arg(long, default_value_t = 800)]
    tick_delay_ms: u64,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Skip the inter-tick delay and run flat out
    #[arg(long)]
    fast: bool,

    /// Emit one JSON frame per tick instead of drawing boards
    #[arg(long)]
    json: bool,
}

struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        println!("{}", format_frame(frame));
    }

    fn complete(&mut self, final_steps: u64) {
        println!("Cleaning complete in {} steps", final_steps);
    }
}

struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&mut self, frame: &RenderFrame) {
        let line = serde_json::to_string(frame).expect("render frame serializes to JSON");
        println!("{}", line);
    }

    fn complete(&mut self, final_steps: u64) {
        println!("{}", serde_json::json!({ "complete": { "steps": final_steps } }));
    }
}

// Board drawing: 'x' dirty, '.' clean, '@' the agent's square. Row and column numbers start at 0.
fn lane_lines(lane: &LaneView) -> Vec<String> {
    let mut lines = Vec::with_capacity(lane.rows + 2);
    lines.push(lane.label.clone());

    let mut header = String::from(" ");
    for col in 0..lane.cols {
        header.push_str(&format!(" {}", col));
    }
    lines.push(header);

    for row in 0..lane.rows {
        let mut line = format!("{}", row);
        for col in 0..lane.cols {
            let c = if lane.agent.row == row && lane.agent.col == col {
                '@'
            } else {
                match lane.squares[row * lane.cols + col] {
                    SquareState::Dirty => 'x',
                    SquareState::Clean => '.',
                }
            };
            line.push(' ');
            line.push(c);
        }
        lines.push(line);
    }
    lines
}

fn short_label(label: &str) -> &str {
    match label {
        REFLEX_AGENT_LABEL => "Reflex",
        MODEL_BASED_AGENT_LABEL => "Model-Based",
        other => other,
    }
}

fn format_frame(frame: &RenderFrame) -> String {
    let blocks: Vec<Vec<String>> = frame.lanes.iter().map(lane_lines).collect();
    let widths: Vec<usize> = blocks
        .iter()
        .map(|block| block.iter().map(String::len).max().unwrap_or(0))
        .collect();
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    for i in 0..height {
        let mut line = String::new();
        for (block, &width) in blocks.iter().zip(&widths) {
            let cell = block.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!("{:<width$}", cell, width = width));
            line.push_str("    ");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let progress: Vec<String> = frame
        .lanes
        .iter()
        .map(|lane| format!("{}: {}%", short_label(&lane.label), lane.progress))
        .collect();
    out.push_str(&format!("Step {} | {}", frame.step, progress.join(" | ")));
    out
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = match DashboardConfig::new(
        args.grid_size,
        Duration::from_millis(args.tick_delay_ms),
        args.seed,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    let mut renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer)
    } else {
        Box::new(TextRenderer)
    };

    let mut driver = ComparisonDriver::new(config);
    if let Err(e) = driver.start() {
        eprintln!("failed to start comparison run: {}", e);
        std::process::exit(2);
    }

    while driver.tick(renderer.as_mut()) != RunPhase::Done {
        if !args.fast {
            // Re-read the delay every tick; a future speed control can change it mid-run.
            thread::sleep(driver.tick_delay());
        }
    }
}
