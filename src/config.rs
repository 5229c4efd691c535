use crate::algorithms::Algorithm;
use crate::backend::{LibraryBackend, ReferenceBackend, SearchBackend};
use crate::grid::{rescale, Grid, Position};
use clap::{Parser, ValueEnum};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 30;
pub const ROW_LIMITS: RangeInclusive<usize> = 8..=60;
pub const COL_LIMITS: RangeInclusive<usize> = 8..=100;
/// Default endpoints, laid out for a `DEFAULT_ROWS` x `DEFAULT_COLS` grid.
pub const DEFAULT_START: Position = Position::new(10, 5);
pub const DEFAULT_END: Position = Position::new(10, 20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmChoice {
    Bfs,
    Dijkstra,
    Astar,
    /// Run every algorithm on the same grid and compare them
    All,
}

impl AlgorithmChoice {
    pub fn algorithms(&self) -> Vec<Algorithm> {
        match self {
            AlgorithmChoice::Bfs => vec![Algorithm::Bfs],
            AlgorithmChoice::Dijkstra => vec![Algorithm::UniformCost],
            AlgorithmChoice::Astar => vec![Algorithm::Heuristic],
            AlgorithmChoice::All => Algorithm::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// Built-in search engine
    Reference,
    /// `pathfinding` crate, falling back to the built-in engine on failure
    Library,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    #[arg(long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Start cell as `row,col`
    #[arg(long)]
    pub start: Option<Position>,

    /// End cell as `row,col`
    #[arg(long)]
    pub end: Option<Position>,

    /// ASCII layout to search instead of a random grid ('.', '#', 'S', 'E')
    #[arg(long)]
    pub grid_file: Option<PathBuf>,

    /// Probability that each generated cell is a wall, between 0 and 1
    #[arg(long, default_value_t = 0.25, value_parser = parse_density)]
    pub wall_density: f64,

    /// Extra wall as `row,col`; may be repeated
    #[arg(long = "wall")]
    pub walls: Vec<Position>,

    /// Flip a cell between open and wall as `row,col`; may be repeated
    #[arg(long = "toggle")]
    pub toggles: Vec<Position>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = AlgorithmChoice::Astar)]
    pub algorithm: AlgorithmChoice,

    #[arg(long, value_enum, default_value_t = BackendChoice::Reference)]
    pub backend: BackendChoice,

    /// Largest grid (in cells) the library backend will accept
    #[arg(long)]
    pub cell_limit: Option<usize>,

    #[arg(long, default_value_t = 20)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid density '{}': {}", s, e))?;
    if density.is_finite() && (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("density must be between 0 and 1, got {}", s))
    }
}

impl Config {
    /// Requested grid size, clamped to the supported range.
    pub fn grid_dimensions(&self) -> (usize, usize) {
        (
            self.rows.clamp(*ROW_LIMITS.start(), *ROW_LIMITS.end()),
            self.cols.clamp(*COL_LIMITS.start(), *COL_LIMITS.end()),
        )
    }

    /// Explicit endpoints, or the defaults scaled onto a `dims` sized grid.
    pub fn endpoints(&self, dims: (usize, usize)) -> (Position, Position) {
        let base = (DEFAULT_ROWS, DEFAULT_COLS);
        (
            self.start.unwrap_or_else(|| rescale(DEFAULT_START, base, dims)),
            self.end.unwrap_or_else(|| rescale(DEFAULT_END, base, dims)),
        )
    }

    pub fn backend(&self) -> Box<dyn SearchBackend> {
        match (self.backend, self.cell_limit) {
            (BackendChoice::Reference, _) => Box::new(ReferenceBackend),
            (BackendChoice::Library, Some(limit)) => Box::new(LibraryBackend::with_cell_limit(limit)),
            (BackendChoice::Library, None) => Box::new(LibraryBackend::new()),
        }
    }

    /// Applies `--wall` then `--toggle` edits to `grid`. Edits that land on an
    /// endpoint are skipped with a warning.
    pub fn apply_wall_edits(
        &self,
        grid: &mut Grid,
        start: Position,
        end: Position,
    ) -> crate::Result<()> {
        let edits = self
            .walls
            .iter()
            .map(|&p| (p, true))
            .chain(self.toggles.iter().map(|&p| (p, false)));
        for (cell, add) in edits {
            if cell == start || cell == end {
                warn!(%cell, "refusing to edit an endpoint");
                continue;
            }
            if add {
                grid.set_wall(cell, true)?;
            } else {
                let now = grid.toggle_wall(cell)?;
                debug!(%cell, ?now, "toggled cell");
            }
        }
        Ok(())
    }

    pub fn visualize(&self) -> bool {
        !self.no_visualization && !self.quiet && self.format == OutputFormat::Text
    }
}
