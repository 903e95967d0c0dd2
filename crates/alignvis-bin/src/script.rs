//! Script command grammar.
//!
//! One command per line; blank lines and `#` comments are skipped by the
//! runner before parsing.

use anyhow::{Context, Result, bail};
use core_visibility::{Direction, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hide { start: i64, end: i64 },
    HideRows { start: i64, end: i64 },
    Reveal { start: i64 },
    RevealAll,
    Select { col: i64 },
    HideSelected { col: i64 },
    ToVisible { col: i64 },
    ToAbsolute { visible: i64 },
    Offset { distance: i64, from: i64 },
    Blocks { start: i64, end: i64, frame: Frame },
    Starts { start: i64, end: i64 },
    Bounds,
    Boundary { direction: Direction, col: i64 },
    Show,
}

pub fn parse_line(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        bail!("empty command");
    };
    let args: Vec<&str> = words.collect();
    let cmd = match (name, args.as_slice()) {
        ("hide", [s, e]) => Command::Hide {
            start: number(s, "start")?,
            end: number(e, "end")?,
        },
        ("hide-rows", [s, e]) => Command::HideRows {
            start: number(s, "start")?,
            end: number(e, "end")?,
        },
        ("reveal", [s]) => Command::Reveal {
            start: number(s, "start")?,
        },
        ("reveal-all", []) => Command::RevealAll,
        ("select", [c]) => Command::Select {
            col: number(c, "column")?,
        },
        ("hide-selected", [c]) => Command::HideSelected {
            col: number(c, "column")?,
        },
        ("to-visible", [c]) => Command::ToVisible {
            col: number(c, "column")?,
        },
        ("to-absolute", [v]) => Command::ToAbsolute {
            visible: number(v, "visible position")?,
        },
        ("offset", [n, from]) => Command::Offset {
            distance: number(n, "distance")?,
            from: number(from, "column")?,
        },
        ("blocks", [s, e, rest @ ..]) => Command::Blocks {
            start: number(s, "start")?,
            end: number(e, "end")?,
            frame: match rest {
                [] => Frame::Absolute,
                ["visible"] => Frame::Visible,
                _ => bail!("blocks takes `S E [visible]`"),
            },
        },
        ("starts", [s, e]) => Command::Starts {
            start: number(s, "start")?,
            end: number(e, "end")?,
        },
        ("bounds", []) => Command::Bounds,
        ("boundary", [dir, c]) => Command::Boundary {
            direction: match *dir {
                "left" => Direction::Left,
                "right" => Direction::Right,
                other => bail!("unknown direction `{other}` (expected left or right)"),
            },
            col: number(c, "column")?,
        },
        ("show", []) => Command::Show,
        (
            "hide" | "hide-rows" | "reveal" | "reveal-all" | "select" | "hide-selected"
            | "to-visible" | "to-absolute" | "offset" | "blocks" | "starts" | "bounds"
            | "boundary" | "show",
            _,
        ) => bail!("wrong number of arguments for `{name}`"),
        _ => bail!("unknown command `{name}`"),
    };
    Ok(cmd)
}

fn number(token: &str, what: &str) -> Result<i64> {
    token
        .parse::<i64>()
        .with_context(|| format!("{what} `{token}` is not an integer"))
}
