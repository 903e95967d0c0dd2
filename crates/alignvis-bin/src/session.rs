//! A single alignment view driven by script commands.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use core_selection::ColumnSelection;
use core_visibility::{Axis, Direction, HiddenColumns, HiddenRanges, HiddenRows};
use tracing::{debug, error, info};

use crate::script::{Command, parse_line};

pub struct Session {
    pub columns: HiddenColumns,
    pub rows: HiddenRows,
    pub selection: ColumnSelection,
    /// Absolute column count; 0 when unknown.
    pub width: i64,
    pub show_hidden: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
}

impl Session {
    /// A known `width` also bounds which columns can be selected.
    pub fn new(width: i64, show_hidden: bool) -> Self {
        let selection = if width > 0 {
            ColumnSelection::with_limit(width)
        } else {
            ColumnSelection::new()
        };
        Self {
            columns: HiddenColumns::new(),
            rows: HiddenRows::new(),
            selection,
            width,
            show_hidden,
        }
    }

    /// Hide the configured starting ranges.
    pub fn seed(&mut self, columns: &[(i64, i64)], rows: &[(i64, i64)]) -> Result<()> {
        self.columns
            .hide_list(columns.iter().copied())
            .context("hiding configured columns")?;
        self.rows
            .hide_list(rows.iter().copied())
            .context("hiding configured rows")?;
        info!(
            target: "runtime",
            hidden_columns = self.columns.size(),
            hidden_rows = self.rows.size(),
            "session_seeded"
        );
        Ok(())
    }

    pub fn execute(&mut self, cmd: Command) -> Result<String> {
        debug!(target: "script", ?cmd, "execute");
        let out = match cmd {
            Command::Hide { start, end } => {
                self.columns.hide(start, end)?;
                self.describe(&self.columns)
            }
            Command::HideRows { start, end } => {
                self.rows.hide(start, end)?;
                self.describe(&self.rows)
            }
            Command::Reveal { start } => match self.columns.reveal(start, &mut self.selection) {
                Some(region) => format!("revealed {region}"),
                None => format!("no hidden region starts at {start}"),
            },
            Command::RevealAll => {
                let revealed = self.columns.reveal_all(&mut self.selection);
                format!("revealed {revealed} columns")
            }
            Command::Select { col } => {
                let limit = self.selection.limit();
                if !(0..limit).contains(&col) {
                    bail!("column {col} is outside the selectable range [0, {limit})");
                }
                self.selection.add(col);
                self.describe_selection()
            }
            Command::HideSelected { col } => {
                self.selection.hide_selected_columns(col, &mut self.columns)?;
                self.describe(&self.columns)
            }
            Command::ToVisible { col } => {
                format!("{col} -> {}", self.columns.absolute_to_visible(col))
            }
            Command::ToAbsolute { visible } => {
                format!("{visible} -> {}", self.columns.visible_to_absolute(visible))
            }
            Command::Offset { distance, from } => {
                let to = self.columns.offset_by_visible(distance, from);
                format!("{from} {distance:+} -> {to}")
            }
            Command::Blocks { start, end, frame } => {
                let mut blocks = self.columns.visible_blocks(start, end, frame);
                let mut parts = Vec::new();
                while let Some(block) = blocks.next() {
                    let edge = if blocks.ends_at_hidden() { "|" } else { "" };
                    parts.push(format!("{block}{edge}"));
                }
                join_or_none(parts)
            }
            Command::Starts { start, end } => {
                let starts = self.columns.region_starts(start, end);
                join_or_none(starts.map(|s| s.to_string()).collect())
            }
            Command::Bounds => {
                if self.width <= 0 {
                    bail!("bounds needs a view width (set [view] width or --width)");
                }
                let (first, last) = self.columns.visible_start_and_end(self.width);
                format!("first {first} last {last}")
            }
            Command::Boundary { direction, col } => {
                let side = match direction {
                    Direction::Left => "left",
                    Direction::Right => "right",
                };
                let boundary = self.columns.next_hidden_boundary(direction, col);
                format!("{side} of {col}: {boundary}")
            }
            Command::Show => format!(
                "{}\n{}\n{}",
                self.describe(&self.columns),
                self.describe(&self.rows),
                self.describe_selection()
            ),
        };
        Ok(out)
    }

    /// Run every command in `input`, writing one result per command to `out`.
    /// A failing line is reported with its number and the run continues.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (idx, line) in input.lines().enumerate() {
            let number = idx + 1;
            let line = line.with_context(|| format!("reading script line {number}"))?;
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            summary.executed += 1;
            match parse_line(text).and_then(|cmd| self.execute(cmd)) {
                Ok(result) => writeln!(out, "{result}")?,
                Err(e) => {
                    summary.failed += 1;
                    error!(
                        target: "script",
                        line = number,
                        error = %format!("{e:#}"),
                        "command_failed"
                    );
                    writeln!(out, "line {number}: error: {e:#}")?;
                }
            }
        }
        info!(
            target: "script",
            executed = summary.executed,
            failed = summary.failed,
            "script_complete"
        );
        Ok(summary)
    }

    fn describe<A: Axis>(&self, hidden: &HiddenRanges<A>) -> String {
        if !self.show_hidden {
            return format!("{}: {} hidden", A::NAME, hidden.size());
        }
        let regions = if hidden.has_hidden() {
            hidden.regions().map(|r| r.to_string()).collect::<Vec<_>>().join(" ")
        } else {
            "none".to_string()
        };
        format!("{}: {regions} ({} hidden)", A::NAME, hidden.size())
    }

    fn describe_selection(&self) -> String {
        let cols: Vec<String> = self.selection.selected().iter().map(i64::to_string).collect();
        if cols.is_empty() {
            "selected: none".to_string()
        } else {
            format!("selected: {}", cols.join(","))
        }
    }
}

fn join_or_none(parts: Vec<String>) -> String {
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(" ")
    }
}
