//! Line-oriented text protocol for driving an engine from another process.
//!
//! The framing follows GTP version 2: one command per line, an optional
//! numeric id, and replies of the form `=id message` or `?id message`
//! followed by a blank line. The command set is specific to wrapped boards,
//! where points are written `x,y` and may be given in any logical form.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`,
//!   `known_command <cmd>`, `quit` - as in GTP
//! - `newgame <topology> <width> <height>` - Start a fresh game
//! - `play <x,y>` - Play a stone for the side to move
//! - `undo` - Take back the last move
//! - `whosemove` - `black` or `white`
//! - `prisoners` - Stones captured by each side
//! - `legal_moves` - Points where the side to move may play
//! - `showboard` - Text diagram of the board
//! - `getstate` - The full game state as JSON
//! - `setstate <json>` - Resume from a JSON game state
//!
//! ## Example
//!
//! ```
//! use wrap_go::protocol::Session;
//!
//! let mut session = Session::new();
//! let input = "newgame klein 5 5\nplay 7,-1\nwhosemove\n";
//! let mut output = Vec::new();
//! session.run(input.as_bytes(), &mut output).unwrap();
//! assert!(String::from_utf8(output).unwrap().contains("= white"));
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::engine::RulesEngine;
use crate::position::GameState;
use crate::topology::{Coord, TopologyKind};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "getstate",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "newgame",
    "play",
    "prisoners",
    "protocol_version",
    "quit",
    "setstate",
    "showboard",
    "undo",
    "version",
    "whosemove",
];

/// Protocol session state.
pub struct Session {
    /// Current game
    engine: RulesEngine,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session holding an empty default-sized torus game.
    pub fn new() -> Self {
        Self::with_engine(Self::default_engine())
    }

    pub fn with_engine(engine: RulesEngine) -> Self {
        Self { engine }
    }

    fn default_engine() -> RulesEngine {
        match RulesEngine::new(TopologyKind::Torus, DEFAULT_WIDTH, DEFAULT_HEIGHT) {
            Ok(engine) => engine,
            Err(e) => unreachable!("default board size is valid: {e}"),
        }
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);

            // `setstate` takes the rest of the line verbatim, since JSON contains spaces.
            let (command, rest) = match command_line.split_once(char::is_whitespace) {
                Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
                None => (command_line.to_lowercase(), ""),
            };
            let args: Vec<&str> = rest.split_whitespace().collect();

            let (success, message) = if command == "setstate" {
                self.set_state(rest)
            } else {
                self.execute(&command, &args)
            };

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n").context("writing response")?;
            output.flush().context("flushing response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "newgame" => {
                if args.len() < 3 {
                    return (false, "usage: newgame <topology> <width> <height>".to_string());
                }
                let kind = match args[0].parse::<TopologyKind>() {
                    Ok(kind) => kind,
                    Err(e) => return (false, e.to_string()),
                };
                let (Ok(width), Ok(height)) = (args[1].parse(), args[2].parse()) else {
                    return (false, "invalid size".to_string());
                };
                match RulesEngine::new(kind, width, height) {
                    Ok(engine) => {
                        self.engine = engine;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "play" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let c = match args[0].parse::<Coord>() {
                    Ok(c) => c,
                    Err(e) => return (false, e.to_string()),
                };
                match self.engine.try_play(c) {
                    Ok(outcome) => (true, outcome.captures.taken_by_mover.to_string()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "undo" => {
                if self.engine.undo() {
                    (true, String::new())
                } else {
                    (false, "cannot undo".to_string())
                }
            }

            "whosemove" => (true, self.engine.turn().to_string()),

            "prisoners" => {
                let p = self.engine.prisoners_taken_by();
                (true, format!("black {} white {}", p.black, p.white))
            }

            "legal_moves" => {
                let moves: Vec<String> = self
                    .engine
                    .legal_moves()
                    .iter()
                    .map(Coord::to_string)
                    .collect();
                (true, moves.join(" "))
            }

            "showboard" => (true, format!("\n{}", self.engine.grid())),

            "getstate" => match serde_json::to_string(self.engine.state()) {
                Ok(json) => (true, json),
                Err(e) => (false, format!("cannot encode state: {e}")),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn set_state(&mut self, json: &str) -> (bool, String) {
        let state: GameState = match serde_json::from_str(json) {
            Ok(state) => state,
            Err(e) => return (false, format!("invalid state: {e}")),
        };
        match RulesEngine::from_state(state) {
            Ok(engine) => {
                self.engine = engine;
                (true, String::new())
            }
            Err(e) => (false, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    fn run(session: &mut Session, input: &str) -> String {
        let mut out = Vec::new();
        session.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = Session::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = Session::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_command() {
        let mut session = Session::new();
        let (success, response) = session.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "wrap-go");
    }

    #[test]
    fn test_known_command() {
        let mut session = Session::new();

        let (success, response) = session.execute("known_command", &["getstate"]);
        assert!(success);
        assert_eq!(response, "true");

        let (success, response) = session.execute("known_command", &["genmove"]);
        assert!(success);
        assert_eq!(response, "false");
    }

    #[test]
    fn test_newgame() {
        let mut session = Session::new();
        let (success, _) = session.execute("newgame", &["mobius", "7", "3"]);
        assert!(success);
        assert_eq!(session.engine().size().x, 7);

        let (success, _) = session.execute("newgame", &["sphere", "7", "3"]);
        assert!(!success);
        let (success, _) = session.execute("newgame", &["torus", "0", "3"]);
        assert!(!success);
    }

    #[test]
    fn test_play_and_undo() {
        let mut session = Session::new();
        let (success, _) = session.execute("play", &["3,4"]);
        assert!(success);
        assert_eq!(session.engine().turn(), Color::White);

        let (success, response) = session.execute("play", &["3,4"]);
        assert!(!success);
        assert!(response.contains("not empty"), "got {response}");

        let (success, _) = session.execute("undo", &[]);
        assert!(success);
        let (success, _) = session.execute("undo", &[]);
        assert!(!success);
    }

    #[test]
    fn test_run_replies_with_ids() {
        let mut session = Session::new();
        let out = run(&mut session, "# comment\n\n1 play 0,0\n2 whosemove\n3 bogus\n");
        assert_eq!(out, "=1 0\n\n=2 white\n\n?3 unknown command: bogus\n\n");
    }

    #[test]
    fn test_run_stops_at_quit() {
        let mut session = Session::new();
        let out = run(&mut session, "quit\nplay 0,0\n");
        assert_eq!(out, "= \n\n");
        assert_eq!(session.engine().move_count(), 0);
    }

    #[test]
    fn test_getstate_setstate() {
        let mut session = Session::new();
        session.execute("newgame", &["cylinder", "4", "3"]);
        session.execute("play", &["1,1"]);
        let (success, json) = session.execute("getstate", &[]);
        assert!(success);
        assert!(json.contains("\"topology\":\"cylinder\""));
        assert!(json.contains("\"isLegalMove\""));

        let mut other = Session::new();
        let out = run(&mut other, &format!("setstate {json}\n"));
        assert_eq!(out, "= \n\n");
        assert_eq!(other.engine().state(), session.engine().state());
    }
}
