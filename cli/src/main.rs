//! # web2048 CLI
//!
//! Terminal front end for the web2048 engine: play interactively with undo,
//! or replay a fixed move sequence headless for deterministic checks.

use clap::Parser;
use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::rc::Rc;
use web2048_core::{Direction, Engine, EngineConfig, EngineError, GameEvent, Language};

#[derive(Parser, Debug)]
#[command(name = "web2048")]
#[command(author, version, about = "Play 2048 in the terminal or replay a move sequence")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Message language (en or ru)
    #[arg(short, long, default_value = "ru")]
    lang: Language,

    /// Apply these moves headless (letters L, R, U, D) and print the result
    #[arg(short, long)]
    replay: Option<String>,

    /// Record an undo step even for moves that change nothing
    #[arg(long)]
    record_noop_moves: bool,

    /// Leave the score untouched when undoing
    #[arg(long)]
    no_restore_score: bool,

    /// Maximum number of undo steps kept
    #[arg(long)]
    history_limit: Option<usize>,

    /// Tile value that wins the game
    #[arg(long, default_value = "2048")]
    win_tile: u32,

    /// Show board after each move in replay mode
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            win_tile: self.win_tile,
            record_noop_moves: self.record_noop_moves,
            restore_score_on_undo: !self.no_restore_score,
            history_limit: self.history_limit,
            ..EngineConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let game = match Engine::with_config(args.seed, args.config()) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let result = match &args.replay {
        Some(moves) => run_replay(&args, game, moves),
        None => {
            run_interactive(&args, game);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Run interactive mode where user plays with keyboard.
fn run_interactive(args: &Args, mut game: Engine) {
    let texts = args.lang.texts();
    let messages = Rc::new(RefCell::new(Vec::<GameEvent>::new()));
    let sink = Rc::clone(&messages);
    game.subscribe(move |event| sink.borrow_mut().push(*event));

    // Set terminal to raw mode for single-key input
    enable_raw_mode();

    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    redraw(args.lang, &game);

    loop {
        let bytes_read = stdin.read(&mut buffer).unwrap_or(0);
        if bytes_read == 0 {
            continue;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(dir) => {
                let outcome = game.step(dir);
                redraw(args.lang, &game);
                if outcome.gained > 0 {
                    println!("  +{} points!", outcome.gained);
                }
            }
            InputAction::Undo => {
                game.undo();
                redraw(args.lang, &game);
            }
            InputAction::Restart => {
                game.reset();
                redraw(args.lang, &game);
            }
            InputAction::Quit => {
                disable_raw_mode();
                println!("\n{}{}", texts.score_label, game.score());
                break;
            }
            InputAction::None => {}
        }

        for event in messages.borrow_mut().drain(..) {
            println!("\n  *** {} ***", args.lang.message(&event));
            if let GameEvent::Lost { .. } = event {
                println!("  Press R to restart, U to undo or Q to quit");
            }
        }
    }
}

/// Apply a move sequence without a terminal and print a summary.
fn run_replay(args: &Args, mut game: Engine, moves: &str) -> Result<(), EngineError> {
    let directions = parse_moves(moves)?;
    let mut moved = 0;

    for (i, dir) in directions.iter().enumerate() {
        let outcome = game.step(*dir);
        if outcome.moved {
            moved += 1;
        }

        if args.verbose {
            println!("Step {}: {}", i + 1, dir);
            print_game(&game);
        }
        if let Some(event) = outcome.event {
            println!("# {}", args.lang.message(&event));
        }
    }

    print_game(&game);
    println!("=== Replay Results ===");
    println!("seed={}", args.seed);
    println!("moves={}", directions.len());
    println!("moved={}", moved);
    println!("score={}", game.score());
    println!("max_tile={}", game.max_tile());
    println!("won={}", game.has_won());
    println!("over={}", game.is_over());
    Ok(())
}

/// Parse a move string such as `"LLUR"` or `"left,up"`.
fn parse_moves(moves: &str) -> Result<Vec<Direction>, EngineError> {
    if moves.contains(',') {
        return moves
            .split(',')
            .filter(|name| !name.trim().is_empty())
            .map(str::parse)
            .collect();
    }
    moves
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c.to_ascii_uppercase() {
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Undo,
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,
        [b'u'] | [b'U'] | [26] => InputAction::Undo, // u, U, Ctrl+Z

        _ => InputAction::None,
    }
}

fn redraw(lang: Language, game: &Engine) {
    let texts = lang.texts();
    println!("\x1b[2J\x1b[H"); // Clear screen
    println!("=== {} ===", texts.title);
    println!("Controls: WASD or Arrow Keys | U undo | R restart | Q quit\n");
    println!("{}{}", texts.score_label, game.score());
    print_game(game);
}

fn print_game(game: &Engine) {
    print!("{}", game.grid());
    io::stdout().flush().unwrap();
}

// Platform-specific terminal raw mode handling
#[cfg(unix)]
fn enable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(unix)]
fn disable_raw_mode() {
    use std::os::unix::io::AsRawFd;
    unsafe {
        let fd = io::stdin().as_raw_fd();
        let mut termios: libc::termios = std::mem::zeroed();
        libc::tcgetattr(fd, &mut termios);
        termios.c_lflag |= libc::ICANON | libc::ECHO;
        libc::tcsetattr(fd, libc::TCSANOW, &termios);
    }
}

#[cfg(not(unix))]
fn enable_raw_mode() {
    // Without raw mode every key needs Enter
}

#[cfg(not(unix))]
fn disable_raw_mode() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_letter_moves() {
        assert_eq!(
            parse_moves("LrU d").unwrap(),
            vec![
                Direction::Left,
                Direction::Right,
                Direction::Up,
                Direction::Down
            ]
        );
    }

    #[test]
    fn test_parse_named_moves() {
        assert_eq!(
            parse_moves("left,down,").unwrap(),
            vec![Direction::Left, Direction::Down]
        );
        assert!(parse_moves("left,north").is_err());
    }

    #[test]
    fn test_parse_moves_rejects_unknown_letter() {
        assert_eq!(
            parse_moves("LX"),
            Err(EngineError::InvalidDirection("X".to_string()))
        );
    }

    #[test]
    fn test_parse_input_keys() {
        assert_eq!(parse_input(&[27, 91, 68]), InputAction::Move(Direction::Left));
        assert_eq!(parse_input(b"w"), InputAction::Move(Direction::Up));
        assert_eq!(parse_input(b"u"), InputAction::Undo);
        assert_eq!(parse_input(b"r"), InputAction::Restart);
        assert_eq!(parse_input(b"q"), InputAction::Quit);
        assert_eq!(parse_input(b"x"), InputAction::None);
    }

    #[test]
    fn test_args_build_config() {
        let args = Args::parse_from([
            "web2048",
            "--no-restore-score",
            "--history-limit",
            "5",
            "--lang",
            "en",
        ]);
        let config = args.config();
        assert!(!config.restore_score_on_undo);
        assert_eq!(config.history_limit, Some(5));
        assert_eq!(args.lang, Language::En);
        assert!(config.validate().is_ok());
    }
}
