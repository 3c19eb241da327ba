//! Per-turn statistics rows and the table format they are logged in.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Header line of a statistics file
pub const STATS_HEADER: &str = "Population, Food eaten, New creatures";

/// Summary of one completed turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStats {
    pub population: usize,
    pub food_eaten: usize,
    pub new_creatures: usize,
}

impl TurnStats {
    pub fn new(population: usize, food_eaten: usize, new_creatures: usize) -> Self {
        Self {
            population,
            food_eaten,
            new_creatures,
        }
    }

    /// Render as a statistics line, without any line terminator
    pub fn to_row(&self) -> String {
        format!(
            "{}, {}, {}",
            self.population, self.food_eaten, self.new_creatures
        )
    }

    pub fn parse_row(line: &str) -> Result<Self> {
        let values = parse_values(line)?;
        match values.as_slice() {
            [population, food_eaten, new_creatures] => Ok(Self {
                population: *population,
                food_eaten: *food_eaten,
                new_creatures: *new_creatures,
            }),
            _ => Err(Error::Serialization(format!(
                "expected 3 columns, found {} in {:?}",
                values.len(),
                line
            ))),
        }
    }
}

fn parse_values(line: &str) -> Result<Vec<usize>> {
    line.split(',')
        .map(|field| {
            field.trim().parse::<usize>().map_err(|e| {
                Error::Serialization(format!("bad statistics value {:?}: {}", field.trim(), e))
            })
        })
        .collect()
}

/// A statistics file read back for charting: header labels plus one row per turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsTable {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<usize>>,
}

impl StatsTable {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = lines
            .next()
            .ok_or_else(|| Error::Serialization("statistics file is empty".to_string()))?;
        let labels: Vec<String> = header.split(',').map(|l| l.trim().to_string()).collect();

        let mut rows = Vec::new();
        for line in lines {
            let row = parse_values(line)?;
            if row.len() != labels.len() {
                return Err(Error::Serialization(format!(
                    "row {:?} has {} columns, header has {}",
                    line,
                    row.len(),
                    labels.len()
                )));
            }
            rows.push(row);
        }

        Ok(Self { labels, rows })
    }

    /// Values of one named column, indexed by turn
    pub fn column(&self, label: &str) -> Option<Vec<usize>> {
        let index = self.labels.iter().position(|l| l == label)?;
        Some(self.rows.iter().map(|row| row[index]).collect())
    }

    pub fn turns(&self) -> usize {
        self.rows.len()
    }
}
