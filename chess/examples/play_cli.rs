// Simple command-line application to play against the computer
//
// Usage: play_cli [CONFIG.toml]
//
// Enter a square (`e2`) to click on it, or a whole move (`e2e4`). Other commands are
// `resign`, `new`, `moves` and `quit`. Set `RUST_LOG=debug` to see the engine's logs.

use minichess::{
    board::PrettyStyle, config::GameConfig, Coord, Driver, Move, Observer, Session, Status,
};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct Console;

impl Observer for Console {
    fn render(&mut self, session: &Session) {
        println!("{}", session.board().pretty(PrettyStyle::Utf8));
        if let Some(sel) = session.selection() {
            let dsts: Vec<_> = session
                .destinations()
                .into_iter()
                .map(|c| c.to_string())
                .collect();
            println!("Selected {}, can move to: {}", sel.coord, dsts.join(" "));
        }
    }

    fn status(&mut self, status: &Status) {
        println!("{}", status);
    }
}

fn print_moves(session: &Session) {
    for line in session.history().lines() {
        println!("{}", line);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };
    println!(
        "Difficulty: {}, time control: {}",
        config.difficulty,
        config.time_control()
    );

    let mut driver = Driver::new(config, Console);
    let mut stdin = io::stdin().lock();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut s = String::new();
        if stdin.read_line(&mut s)? == 0 {
            break;
        }
        let s = s.trim();
        let was_over = driver.session().is_over();

        match s {
            "" => continue,
            "quit" => break,
            "resign" => {
                driver.resign();
            }
            "new" => {
                let config = driver.session().config().clone();
                driver.new_game(config);
            }
            "moves" => print_moves(driver.session()),
            _ => {
                if let Ok(coord) = s.parse::<Coord>() {
                    driver.select(coord);
                } else if let Ok(mv) = s.parse::<Move>() {
                    driver.select(mv.src());
                    driver.select(mv.dst());
                } else {
                    println!("Bad command: {}", s);
                    continue;
                }
            }
        }

        // The opponent replies after a delay; wait for it here.
        while driver.is_waiting() {
            driver.wait_opponent(Duration::from_secs(60));
        }

        if !was_over && driver.session().is_over() {
            println!("Notation:");
            print_moves(driver.session());
            if let Some(report) = driver.session().report() {
                println!("Result: {:?} ({:+})", report.result, report.result.rating_delta());
            }
            println!("Type `new` to play again or `quit` to exit.");
        }
    }

    Ok(())
}
