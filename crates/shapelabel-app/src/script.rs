//! Pointer event scripts for `shapelabel replay`.
//!
//! One command per line; blank lines and `#` comments are skipped.

use kurbo::Point;
use shapelabel_core::ShapeKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Down(Point),
    Up(Point),
    Move(Point),
    Kind(Option<ShapeKind>),
    Delete,
    Cancel,
    Next,
    Prev,
}

#[derive(Debug, Error, PartialEq)]
#[error("script line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

pub fn parse(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command = parse_line(line).map_err(|message| ScriptError {
            line: i + 1,
            message,
        })?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let verb = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    match (verb, args.as_slice()) {
        ("down", [x, y]) => point(x, y).map(Command::Down),
        ("up", [x, y]) => point(x, y).map(Command::Up),
        ("move", [x, y]) => point(x, y).map(Command::Move),
        ("kind", ["poly"]) => Ok(Command::Kind(Some(ShapeKind::Polygon))),
        ("kind", ["circ"]) => Ok(Command::Kind(Some(ShapeKind::Circle))),
        ("kind", ["none"]) => Ok(Command::Kind(None)),
        ("kind", other) => Err(format!("unknown shape kind `{}`", other.join(" "))),
        ("delete", []) => Ok(Command::Delete),
        ("cancel", []) => Ok(Command::Cancel),
        ("next", []) => Ok(Command::Next),
        ("prev", []) => Ok(Command::Prev),
        ("down" | "up" | "move" | "delete" | "cancel" | "next" | "prev", _) => {
            Err(format!("wrong number of arguments for `{}`", verb))
        }
        _ => Err(format!("unknown command `{}`", verb)),
    }
}

fn point(x: &str, y: &str) -> Result<Point, String> {
    let coord = |s: &str| s.parse::<f64>().map_err(|_| format!("bad coordinate `{}`", s));
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = "kind circ\n\n# first circle\ndown 10 10\nup 10 10\nmove 12.5 3 # hover\nnext\n";
        assert_eq!(
            parse(script).unwrap(),
            vec![
                Command::Kind(Some(ShapeKind::Circle)),
                Command::Down(Point::new(10.0, 10.0)),
                Command::Up(Point::new(10.0, 10.0)),
                Command::Move(Point::new(12.5, 3.0)),
                Command::Next,
            ]
        );
    }

    #[test]
    fn test_parse_errors_carry_line() {
        let err = parse("kind poly\ndown 1\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(parse("kind square").is_err());
        assert!(parse("jump 1 2").is_err());
        assert!(parse("up x 2").is_err());
    }
}
