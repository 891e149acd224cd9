//! Interactive command-line opening trainer.
//!
//! Reads line commands from stdin, keeps the move history of one practice
//! game, and answers the user's moves with lines drawn from the enabled part
//! of the opening catalog. Move legality is the player's responsibility; the
//! trainer only knows the catalog.

use std::io::{self, BufRead, Write};

use opening_trainer::catalog::tsv_loader;
use opening_trainer::trie::move_key::BoardMove;
use opening_trainer::trie::openings_trie::{OpeningsTrie, SearchMode};

fn main() -> io::Result<()> {
    let openings = match tsv_loader::load_default(true) {
        Ok(openings) => openings,
        Err(e) => {
            eprintln!("cannot load opening catalog: {e}");
            std::process::exit(1);
        }
    };
    let trie = OpeningsTrie::build(openings);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = TrainerSession::new(trie);

    writeln!(
        stdout,
        "opening trainer ready: {} openings loaded (type 'help')",
        session.trie.openings().len()
    )?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = session.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct TrainerSession {
    trie: OpeningsTrie,
    history: Vec<BoardMove>,
}

impl TrainerSession {
    fn new(trie: OpeningsTrie) -> Self {
        Self {
            trie,
            history: Vec::new(),
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let rest = trimmed[cmd.len()..].trim();

        match cmd {
            "play" => self.cmd_play(rest, out)?,
            "next" => self.cmd_next(out)?,
            "moves" => self.cmd_moves(out)?,
            "openings" => self.cmd_openings(out)?,
            "completed" => self.cmd_completed(out)?,
            "list" => self.cmd_list(out)?,
            "toggle" => self.cmd_toggle(rest, out)?,
            "search" => self.cmd_filter(rest, SearchMode::StartsWith, out)?,
            "find" => self.cmd_filter(rest, SearchMode::Contains, out)?,
            "all" => {
                self.trie.enable_all();
                writeln!(out, "enabled all {} openings", self.trie.openings().len())?;
            }
            "none" => {
                self.trie.disable_all();
                writeln!(out, "disabled all openings")?;
            }
            "reset" => {
                self.history.clear();
                writeln!(out, "position reset")?;
            }
            "help" => self.cmd_help(out)?,
            "quit" | "exit" => return Ok(true),
            _ => writeln!(out, "unknown command '{cmd}' (type 'help')")?,
        }

        Ok(false)
    }

    fn cmd_play(&mut self, arg: &str, out: &mut impl Write) -> io::Result<()> {
        let board_move = match BoardMove::from_coordinate(arg) {
            Ok(board_move) => board_move,
            Err(reason) => {
                writeln!(out, "cannot read move '{arg}': {reason}")?;
                return Ok(());
            }
        };

        if !self.trie.is_valid_move(&self.history, board_move) {
            writeln!(out, "note: {arg} leaves every enabled opening")?;
        }
        self.history.push(board_move);
        self.report_completions(out)?;

        self.cmd_next(out)
    }

    fn cmd_next(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.trie.has_moves_to_make(&self.history) {
            writeln!(out, "no enabled opening continues from here")?;
            return Ok(());
        }

        match self.trie.next_move(&self.history) {
            Ok(reply) => {
                self.history.push(reply);
                writeln!(out, "trainer plays {}", render_move(reply))?;
                self.report_completions(out)?;
            }
            Err(e) => writeln!(out, "error: {e}")?,
        }
        Ok(())
    }

    fn cmd_moves(&self, out: &mut impl Write) -> io::Result<()> {
        let ranked = self.trie.ranked_continuations(&self.history);
        if ranked.is_empty() {
            writeln!(out, "no continuations")?;
        }
        for continuation in ranked {
            writeln!(
                out,
                "{} ({} of {} lines, e.g. {})",
                render_move(continuation.board_move),
                continuation.active_openings,
                continuation.total_openings,
                continuation.example_opening
            )?;
        }
        Ok(())
    }

    fn cmd_openings(&self, out: &mut impl Write) -> io::Result<()> {
        let possible = self.trie.possible_openings(&self.history);
        writeln!(out, "{} possible openings", possible.len())?;
        for opening in possible {
            writeln!(out, "  [{}] {}", opening.eco_code, opening.name)?;
        }
        Ok(())
    }

    fn cmd_completed(&self, out: &mut impl Write) -> io::Result<()> {
        let completed = self.trie.completed_openings(&self.history);
        if completed.is_empty() {
            writeln!(out, "no opening ends at this position")?;
        }
        for opening in completed {
            writeln!(out, "  [{}] {}", opening.eco_code, opening.name)?;
        }
        Ok(())
    }

    fn cmd_list(&self, out: &mut impl Write) -> io::Result<()> {
        for opening in self.trie.openings() {
            let mark = if opening.enabled { 'x' } else { ' ' };
            writeln!(out, "[{mark}] [{}] {}", opening.eco_code, opening.name)?;
        }
        writeln!(
            out,
            "{} of {} enabled",
            self.trie.enabled_count(),
            self.trie.openings().len()
        )?;
        Ok(())
    }

    fn cmd_toggle(&mut self, name: &str, out: &mut impl Write) -> io::Result<()> {
        let identities: Vec<(String, String)> = self
            .trie
            .openings()
            .iter()
            .filter(|o| o.name.eq_ignore_ascii_case(name))
            .map(|o| (o.name.clone(), o.starting_position.clone()))
            .collect();

        if identities.is_empty() {
            writeln!(out, "no opening named '{name}'")?;
            return Ok(());
        }

        for (name, starting_position) in identities {
            match self.trie.toggle(&name, &starting_position) {
                Ok(enabled) => writeln!(
                    out,
                    "{name}: {}",
                    if enabled { "enabled" } else { "disabled" }
                )?,
                Err(e) => writeln!(out, "error: {e}")?,
            }
        }
        Ok(())
    }

    fn cmd_filter(&mut self, args: &str, mode: SearchMode, out: &mut impl Write) -> io::Result<()> {
        if args.is_empty() {
            writeln!(out, "usage: search|find <text> [!<excluded-text>]")?;
            return Ok(());
        }

        // A trailing '!word' token hides matches containing that word.
        let (text, exclude) = match args.rsplit_once('!') {
            Some((text, excluded)) if !excluded.is_empty() => (text.trim(), Some(excluded.trim())),
            _ => (args, None),
        };

        self.trie.filter_by_search(text, mode, exclude);
        writeln!(
            out,
            "{} of {} openings enabled",
            self.trie.enabled_count(),
            self.trie.openings().len()
        )?;
        Ok(())
    }

    fn report_completions(&self, out: &mut impl Write) -> io::Result<()> {
        for opening in self.trie.completed_openings(&self.history) {
            writeln!(out, "line complete: [{}] {}", opening.eco_code, opening.name)?;
        }
        Ok(())
    }

    fn cmd_help(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "play <move>   play a coordinate move (e.g. play e2e4); the trainer replies")?;
        writeln!(out, "next          let the trainer play the next move")?;
        writeln!(out, "moves         list ranked continuations from here")?;
        writeln!(out, "openings      list openings still reachable from here")?;
        writeln!(out, "completed     list openings ending exactly here")?;
        writeln!(out, "list          show the catalog with enabled marks")?;
        writeln!(out, "toggle <name> flip one opening on or off")?;
        writeln!(out, "search <text> enable only names starting with <text>")?;
        writeln!(out, "find <text>   enable only names containing <text>")?;
        writeln!(out, "all | none    enable or disable every opening")?;
        writeln!(out, "reset         start a fresh practice game")?;
        writeln!(out, "quit          leave the trainer")?;
        Ok(())
    }
}

fn render_move(board_move: BoardMove) -> String {
    board_move
        .to_coordinate()
        .unwrap_or_else(|_| format!("{}->{}", board_move.from, board_move.to))
}
