use clap::Parser;
use rookie::logger::init_logging;
use rookie::moves::perft::{perft_divide, perft_with_breakdown};
use rookie::session::GameSession;
use rookie::square::Square;
use rookie::status::Status;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{info, warn};

/// Play through a chess game on the console.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,

    /// Log file (created with its directory if missing)
    #[arg(long, default_value = "logs/rookie.log")]
    log_file: String,

    /// tracing filter used when RUST_LOG is not set
    #[arg(long, default_value = "rookie=info")]
    log_filter: String,
}

const HELP: &str = "\
commands:
  new [fen]        start a new game
  fen              print the current FEN
  show             print the board
  moves [square]   list legal moves (of one piece)
  play <move>      play a move in SAN or coordinate form (a bare move works too)
  undo             take back the last move
  status           print the game state
  history          list the moves played
  pgn              print the movetext
  claim            claim a threefold or fifty-move draw
  perft <depth>    count leaf nodes with a breakdown
  divide <depth>   per-move leaf counts
  help             this text
  quit             leave";

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_file, &args.log_filter) {
        eprintln!("warning: logging disabled ({}: {e})", args.log_file);
    }

    let mut session = match GameSession::start(args.fen.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };
    info!(fen = %session.fen(), "cli: started");
    println!("{:#}", session.position());

    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };
        if line.is_empty() {
            prompt();
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let rest = &parts[1..];
        match parts[0] {
            "quit" | "exit" => break,
            "help" | "?" => println!("{HELP}"),
            "new" => handle_new(&mut session, rest),
            "fen" => println!("{}", session.fen()),
            "show" | "d" => println!("{:#}", session.position()),
            "moves" => handle_moves(&session, rest),
            "play" => match rest.first() {
                Some(mv) => handle_play(&mut session, mv),
                None => println!("usage: play <move>"),
            },
            "undo" => match session.try_undo() {
                Ok(mv) => println!("took back {mv}"),
                Err(e) => println!("{e}"),
            },
            "status" => print_status(&session.status()),
            "history" => {
                for (i, (mv, san)) in session.history().iter().enumerate() {
                    println!("{:>3}. {san:<8} {mv}", i + 1);
                }
            }
            "pgn" => println!("{}", session.pgn_movetext()),
            "claim" => match session.claim_draw() {
                Ok(claim) => println!("draw claimed: {claim:?}"),
                Err(e) => println!("{e}"),
            },
            "perft" => handle_perft(&session, rest, false),
            "divide" => handle_perft(&session, rest, true),
            other => handle_play(&mut session, other),
        }
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn handle_new(session: &mut GameSession, rest: &[&str]) {
    let fen = rest.join(" ");
    let fen = (!fen.is_empty()).then_some(fen.as_str());
    match GameSession::start(fen) {
        Ok(s) => {
            *session = s;
            info!(fen = %session.fen(), "cli: new game");
            println!("{:#}", session.position());
        }
        Err(e) => println!("{e}"),
    }
}

fn handle_moves(session: &GameSession, rest: &[&str]) {
    let moves = match rest.first() {
        Some(sq) => match sq.parse::<Square>() {
            Ok(sq) => session.moves_from(sq),
            Err(e) => {
                println!("{e}");
                return;
            }
        },
        None => session.legal_moves(),
    };
    let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
    println!("{} moves: {}", list.len(), list.join(" "));
}

fn handle_play(session: &mut GameSession, text: &str) {
    match session.apply_str(text) {
        Ok(status) => {
            if let Some((_, san)) = session.history().last() {
                println!("played {san}");
            }
            print_status(&status);
        }
        Err(e) => {
            warn!(input = text, error = %e, "cli: move rejected");
            println!("{e}");
        }
    }
}

fn print_status(status: &Status) {
    print!("{}", status.state);
    if status.check && !status.is_game_over() {
        print!(", check");
    }
    if let Some(claim) = status.claimable() {
        print!(", {claim:?} draw claimable");
    }
    if let Some(result) = status.result() {
        print!(" [{result}]");
    }
    println!();
}

fn handle_perft(session: &GameSession, rest: &[&str], divide: bool) {
    let Some(depth) = rest.first().and_then(|d| d.parse::<u32>().ok()) else {
        println!("usage: {} <depth>", if divide { "divide" } else { "perft" });
        return;
    };
    let pos = session.position();
    let start = Instant::now();
    if divide {
        let split = perft_divide(pos, depth);
        for (mv, n) in &split {
            println!("{mv}: {n}");
        }
        println!("Total: {}", split.iter().map(|(_, n)| n).sum::<u64>());
    } else {
        let c = perft_with_breakdown(pos, depth);
        println!(
            "nodes {} captures {} ep {} castles {} promotions {} checks {} mates {}",
            c.nodes, c.captures, c.ep_captures, c.castles, c.promotions, c.checks, c.checkmates
        );
    }
    let elapsed = start.elapsed();
    info!(depth, divide, ms = elapsed.as_millis() as u64, "cli: perft finished");
    println!("time {:.3}s", elapsed.as_secs_f64());
}
