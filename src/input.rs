use std::sync::LazyLock;

use regex::Regex;

use crate::board::pos_str_to_index;

static CLICK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?:(?<pos>[a-h][1-8])|(?<index>[0-9]{1,2})",
        r"|(?<file>[0-7])[\s,]+(?<rank>[0-7])|(?<quit>quit|exit))\s*$"
    ))
    .expect("click pattern is valid")
});

/// One line of input from whatever is turning pointer positions into board cells
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum ClickCommand {
    Square(u8),
    /// File then rank, counted from the top left cell
    Grid(u8, u8),
    Quit,
}

/// Accepts algebraic squares (`e2`), square indices (`52`) and grid coordinates (`4 6`).
///
/// Index and coordinate range checks are left to the board so bad values get a proper error.
pub fn parse_click_command(line: &str) -> Option<ClickCommand> {
    let captures = CLICK_PATTERN.captures(line)?;

    if let Some(pos) = captures.name("pos") {
        return pos_str_to_index(pos.as_str()).ok().map(ClickCommand::Square);
    }
    if let Some(index) = captures.name("index") {
        return index.as_str().parse().ok().map(ClickCommand::Square);
    }
    if let (Some(file), Some(rank)) = (captures.name("file"), captures.name("rank")) {
        return Some(ClickCommand::Grid(file.as_str().parse().ok()?, rank.as_str().parse().ok()?));
    }
    if captures.name("quit").is_some() {
        return Some(ClickCommand::Quit);
    }

    None
}
