//! Line parser for the interactive session.

use covscan_core::CategorySelection;

use crate::coverage::KeyCommands;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellCommand {
    Empty,
    Help,
    Quit,
    /// Raw "lat, lon" text.
    Coords(String),
    Height(String),
    /// Manual radius text; empty clears it.
    Radius(String),
    Categories(CategorySelection),
    Search,
    Enrich,
    Cancel,
    Show,
    Status,
    /// 1-based result position.
    Links(usize),
    Locate(usize),
    Classify { address: String, city: String },
    Key(KeyCommands),
}

pub(crate) const HELP: &str = "\
commands:
  coords <lat, lon>          set the antenna position
  height <m>                 set the antenna height and show the radio horizon
  radius <m> | radius clear  override the search radius, or go back to the derived one
  categories <list>          any of: lodging commercial industrial
  search                     run the area search (cancels a running coverage check)
  enrich                     check coverage for the current results
  cancel                     stop the running coverage check
  show                       print the current results
  links <n>                  web and map links for result n
  locate <n>                 look up an address for result n
  classify <address> | <city>
  key save <KEY> | key clear | key show | key test [KEY]
  status                     current parameters and coverage check state
  quit";

fn position(arg: &str) -> Result<usize, String> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("expected a result number, got \"{}\"", arg.trim()))
}

fn categories(arg: &str) -> Result<CategorySelection, String> {
    let mut selection = CategorySelection::default();
    for word in arg.split(|c: char| c == ',' || c.is_whitespace()).filter(|w| !w.is_empty()) {
        match word.to_ascii_lowercase().as_str() {
            "lodging" => selection.lodging = true,
            "commercial" => selection.commercial = true,
            "industrial" => selection.industrial = true,
            "none" => {}
            other => return Err(format!("unknown category \"{other}\"")),
        }
    }
    Ok(selection)
}

fn key(arg: &str) -> Result<KeyCommands, String> {
    let mut words = arg.split_whitespace();
    let action = words.next().unwrap_or_default();
    let value = words.next().map(str::to_owned);
    match (action, value) {
        ("save", Some(key)) => Ok(KeyCommands::Save { key }),
        ("save", None) => Err("usage: key save <KEY>".to_owned()),
        ("clear", _) => Ok(KeyCommands::Clear),
        ("show", _) => Ok(KeyCommands::Show),
        ("test", key) => Ok(KeyCommands::Test { key }),
        _ => Err("usage: key save <KEY> | key clear | key show | key test [KEY]".to_owned()),
    }
}

/// Parse one input line.
///
/// # Errors
///
/// Returns a one-line message for unknown commands or malformed arguments.
pub(crate) fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(ShellCommand::Empty),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        "coords" => Ok(ShellCommand::Coords(rest.to_owned())),
        "height" => Ok(ShellCommand::Height(rest.to_owned())),
        "radius" if rest.eq_ignore_ascii_case("clear") => Ok(ShellCommand::Radius(String::new())),
        "radius" if rest.is_empty() => Err("usage: radius <m> | radius clear".to_owned()),
        "radius" => Ok(ShellCommand::Radius(rest.to_owned())),
        "categories" => categories(rest).map(ShellCommand::Categories),
        "search" => Ok(ShellCommand::Search),
        "enrich" => Ok(ShellCommand::Enrich),
        "cancel" => Ok(ShellCommand::Cancel),
        "show" => Ok(ShellCommand::Show),
        "status" => Ok(ShellCommand::Status),
        "links" => position(rest).map(ShellCommand::Links),
        "locate" => position(rest).map(ShellCommand::Locate),
        "classify" => {
            let (address, city) = rest
                .split_once('|')
                .ok_or_else(|| "usage: classify <address> | <city>".to_owned())?;
            Ok(ShellCommand::Classify {
                address: address.trim().to_owned(),
                city: city.trim().to_owned(),
            })
        }
        "key" => key(rest).map(ShellCommand::Key),
        other => Err(format!("unknown command \"{other}\"; type `help`")),
    }
}
