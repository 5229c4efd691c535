use crate::algorithms::Algorithm;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SearchStats {
    pub algorithm: Algorithm,
    pub reached: bool,
    pub visited: usize,
    pub path_cost: Option<usize>,
    pub elapsed: Duration,
}

impl SearchStats {
    /// Visited cells per path edge; lower means a more focused search.
    pub fn exploration_ratio(&self) -> Option<f64> {
        match self.path_cost {
            Some(cost) if cost > 0 => Some(self.visited as f64 / cost as f64),
            _ => None,
        }
    }
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Reached end: {}", if self.reached { "yes" } else { "no" })?;
        writeln!(f, "Cells visited: {}", self.visited)?;
        match self.path_cost {
            Some(cost) => writeln!(f, "Path length: {} steps", cost)?,
            None => writeln!(f, "Path length: -")?,
        }
        if let Some(ratio) = self.exploration_ratio() {
            writeln!(f, "Visited per step: {:.2}", ratio)?;
        }
        writeln!(f, "Search time: {:.2?}", self.elapsed)?;
        Ok(())
    }
}

/// Side-by-side view of several runs on the same grid.
#[derive(Debug, Clone)]
pub struct ComparisonSummary {
    pub rows: Vec<SearchStats>,
}

impl ComparisonSummary {
    pub fn new(rows: Vec<SearchStats>) -> Self {
        ComparisonSummary { rows }
    }

    /// Algorithm that closed the fewest cells (first one wins ties).
    pub fn most_focused(&self) -> Option<&SearchStats> {
        self.rows.iter().min_by_key(|s| s.visited)
    }

    /// True when every run found the same path length, or none found a path.
    pub fn costs_agree(&self) -> bool {
        self.rows
            .windows(2)
            .all(|w| w[0].path_cost == w[1].path_cost)
    }
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:<8} {:<8} {:<8} {:<12}",
            "Algorithm", "Reached", "Visited", "Steps", "Time"
        )?;
        writeln!(f, "{}", "-".repeat(50))?;
        for row in &self.rows {
            let steps = row
                .path_cost
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                f,
                "{:<10} {:<8} {:<8} {:<8} {:<12}",
                row.algorithm.to_string(),
                if row.reached { "yes" } else { "no" },
                row.visited,
                steps,
                format!("{:.2?}", row.elapsed)
            )?;
        }

        if let Some(best) = self.most_focused() {
            writeln!(f)?;
            writeln!(f, "Fewest cells visited: {} ({})", best.algorithm, best.visited)?;
        }
        if !self.costs_agree() {
            writeln!(f, "Warning: path lengths differ between algorithms")?;
        }
        Ok(())
    }
}
