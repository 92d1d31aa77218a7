//! Parsing of the lines typed at the console prompt.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move { row: usize, col: usize },
    Quit,
}

/// Blank lines yield `Ok(None)`. Coordinates may be separated by spaces or a comma.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
        return Ok(Some(Command::Quit));
    }

    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    let [row, col] = parts.as_slice() else {
        return Err(format!("expected `row col` or `quit`, got `{line}`"));
    };
    let row = row
        .parse()
        .map_err(|_| format!("row `{row}` is not a number"))?;
    let col = col
        .parse()
        .map_err(|_| format!("column `{col}` is not a number"))?;
    Ok(Some(Command::Move { row, col }))
}
