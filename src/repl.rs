//! Interactive session loop
//!
//! Reads one command per line and runs it to completion before reading the
//! next, so a tip request never overlaps another command.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::advisor::TipProvider;
use crate::error::TrackerError;
use crate::models::ActivityInput;
use crate::report::{self, FootprintSummary};
use crate::session::Session;

pub const HELP: &str = "\
Commands:
  calc <km> <transport> <kwh> <diet> <waste_kg>
        transport: gasoline_car | electric_car | public_transport | flight
        diet:      high_meat | medium_meat | low_meat | vegetarian | vegan | none
  tips      ask for reduction tips for the latest result
  latest    show the latest result
  history   show all results of this session
  reset     clear history and the current result
  factors   list emission factors
  help      show this text
  quit      leave the session
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Calc(ActivityInput),
    Tips,
    Latest,
    History,
    Reset,
    Factors,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("usage: calc <km> <transport> <kwh> <diet> <waste_kg>")]
    CalcUsage,

    #[error("{field} must be a number, got '{raw}'")]
    NotANumber { field: &'static str, raw: String },

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, ParseError> {
    raw.parse().map_err(|_| ParseError::NotANumber {
        field,
        raw: raw.to_string(),
    })
}

/// Parse one input line; blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_lowercase().as_str() {
        "calc" => {
            let args: Vec<&str> = words.collect();
            let [km, transport, kwh, diet, waste] = args.as_slice() else {
                return Err(ParseError::CalcUsage);
            };
            Command::Calc(ActivityInput::from_labels(
                parse_number("km", km)?,
                transport,
                parse_number("kwh", kwh)?,
                diet,
                parse_number("waste_kg", waste)?,
            )?)
        }
        "tips" => Command::Tips,
        "latest" => Command::Latest,
        "history" => Command::History,
        "reset" => Command::Reset,
        "factors" => Command::Factors,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// Drive a session from `input` until `quit` or end of input.
pub async fn run<R, W>(
    session: &mut Session,
    provider: &dyn TipProvider,
    target_kg: f64,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(out, "Carbon footprint session. Type 'help' for commands.")?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        match command {
            Command::Calc(activity) => match session.calculate_today(&activity) {
                Ok(record) => write!(
                    out,
                    "{}",
                    FootprintSummary {
                        record: &record,
                        target_kg,
                    }
                )?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            Command::Tips => {
                if session.awaits_tips() {
                    writeln!(out, "Asking for reduction tips...")?;
                    out.flush()?;
                }
                match session.request_tips(provider).await {
                    Some(outcome) => writeln!(out, "{}", report::advice_message(&outcome))?,
                    None => writeln!(out, "Nothing calculated yet. Use 'calc' first.")?,
                }
            }
            Command::Latest => match session.current() {
                Some(record) => write!(out, "{}", FootprintSummary { record, target_kg })?,
                None => writeln!(out, "Nothing calculated yet. Use 'calc' first.")?,
            },
            Command::History => match session.history().all() {
                Ok(records) => write!(out, "{}", report::format_history(&records))?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            Command::Reset => match session.reset() {
                Ok(()) => writeln!(out, "History cleared.")?,
                Err(err) => writeln!(out, "error: {err}")?,
            },
            Command::Factors => write!(out, "{}", report::format_factors(&session.factors().rows()))?,
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => break,
        }
    }

    out.flush()
}
