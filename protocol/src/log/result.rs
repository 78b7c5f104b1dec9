//! Header and result lines: seed, game mode, winner, turns, stars

use crate::ParseError;
use crate::log::LogLine;
use anyhow::Result;

pub(crate) fn parse_seed(value: &str) -> Result<LogLine> {
    let seed = value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("seed: {value}")))?;
    Ok(LogLine::Seed(seed))
}

/// `"BattleWon": "True",` from the trailing JSON result block
pub(crate) fn parse_battle_won(line: &str) -> Result<LogLine> {
    let trimmed = line.trim().trim_end_matches(',');
    let wrapped = format!("{{{trimmed}}}");
    let value: serde_json::Value = serde_json::from_str(&wrapped)
        .map_err(|_| ParseError::InvalidFormat(format!("battle won: {line}")))?;

    let won = match value.get("BattleWon") {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => return Err(ParseError::MissingField("BattleWon".to_string()).into()),
    };

    Ok(LogLine::BattleWon(won))
}

pub(crate) fn parse_winner(value: &str) -> Result<LogLine> {
    let winner = value.trim();
    if winner.is_empty() {
        return Err(ParseError::MissingField("battle winner".to_string()).into());
    }
    Ok(LogLine::Winner(winner.to_string()))
}

pub(crate) fn parse_total_turns(value: &str) -> Result<LogLine> {
    let turns = value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("total battle turns: {value}")))?;
    Ok(LogLine::TotalTurns(turns))
}

pub(crate) fn parse_stars(value: &str) -> Result<LogLine> {
    let stars = value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("battle stars: {value}")))?;
    Ok(LogLine::Stars(stars))
}
