//! `calcctl` – headless CLI harness for the broken calculator engine.
//!
//! Drives the same engine a GUI would, but from a terminal: one-shot
//! key sequences, an interactive REPL, scripted runs, and a daemon mode
//! over a Unix socket.

mod serve;

use clap::{Parser, Subcommand};
use engine::achievements::ACHIEVEMENTS;
use engine::hints::HINTS;
use engine::types::Status;
use engine::{
    spawn_persist_worker, Action, Calculator, JsonFileStore, MemoryStore, Op, SavedFlags,
    SettingsStore, Snapshot, Theme,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "calcctl",
    version,
    about = "CLI harness for the broken calculator"
)]
struct Cli {
    /// Path to the JSON settings file holding unlock flags.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Keep all state in memory; nothing is read or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a sequence of key presses and print the final state.
    Keys {
        /// Keys to press, e.g. "2+2=" (use C for clear, < for backspace).
        sequence: String,
        /// Output as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive calculator loop.
    Repl,

    /// Run a scripted key sequence from a YAML file.
    Script {
        /// Path to the script YAML file.
        file: PathBuf,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },

    /// List achievements against the saved flags.
    Achievements {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the cheat hints and which ones have been earned.
    Hints,

    /// Show or change the saved theme.
    Theme {
        /// New theme: light | dark | system. Omit to print the current one.
        #[arg(long)]
        set: Option<String>,
    },

    /// Wipe every saved unlock flag and achievement.
    Reset,
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    // Structured logging to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = open_store(&cli);

    match cli.command {
        Commands::Keys { ref sequence, json } => {
            let (mut calc, worker) = boot_engine(store).await;
            cmd_keys(sequence, json, &mut calc);
            shutdown(calc, worker).await;
        }
        Commands::Repl => {
            let (mut calc, worker) = boot_engine(store).await;
            cmd_repl(&mut calc);
            shutdown(calc, worker).await;
        }
        Commands::Script { ref file, json } => {
            let (mut calc, worker) = boot_engine(store).await;
            let status = cmd_script(file, json, &mut calc);
            shutdown(calc, worker).await;
            if status == Status::Fail {
                std::process::exit(1);
            }
        }
        Commands::Serve { socket } => {
            let (calc, _worker) = boot_engine(store).await;
            serve::run_daemon(socket, calc).await;
        }
        Commands::Achievements { json } => {
            let (calc, worker) = boot_engine(store).await;
            cmd_achievements(json, &calc);
            shutdown(calc, worker).await;
        }
        Commands::Hints => {
            let (calc, worker) = boot_engine(store).await;
            cmd_hints(&calc);
            shutdown(calc, worker).await;
        }
        Commands::Theme { ref set } => {
            let (mut calc, worker) = boot_engine(store).await;
            cmd_theme(set.as_deref(), &mut calc);
            shutdown(calc, worker).await;
        }
        Commands::Reset => {
            if let Err(e) = store.reset_operations().await {
                eprintln!("error: reset failed: {}", e);
                std::process::exit(2);
            }
            println!("All operations locked again. Only + remains.");
        }
    }
}

// ===========================================================================
// Engine setup
// ===========================================================================

fn open_store(cli: &Cli) -> Arc<dyn SettingsStore> {
    if cli.ephemeral {
        return Arc::new(MemoryStore::new());
    }
    let path = cli.store.clone().unwrap_or_else(default_store_path);
    Arc::new(JsonFileStore::new(path))
}

fn default_store_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".broken-calc.json"),
        None => PathBuf::from("broken-calc.json"),
    }
}

/// Load saved flags, seed the engine, and spawn the write-behind worker.
async fn boot_engine(store: Arc<dyn SettingsStore>) -> (Calculator, JoinHandle<()>) {
    let flags = match store.load().await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "cannot read settings, starting from defaults");
            SavedFlags::default()
        }
    };
    let (tx, worker) = spawn_persist_worker(store);
    let calc = Calculator::from_flags(&flags).with_persistence(tx);
    (calc, worker)
}

/// Drop the engine (closing the persistence channel) and wait for the
/// queue to drain before the process exits.
async fn shutdown(calc: Calculator, worker: JoinHandle<()>) {
    drop(calc);
    let _ = worker.await;
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_keys(sequence: &str, json: bool, calc: &mut Calculator) {
    for key in sequence.chars() {
        match Action::from_key(&key.to_string()) {
            Some(action) => calc.dispatch(action),
            None => tracing::warn!(key = %key, "ignoring unknown key"),
        }
    }
    output_snapshot(&calc.snapshot(), json);
}

fn cmd_repl(calc: &mut Calculator) {
    println!("broken calculator – only + works until you find the cheats");
    println!("keys: digits . + - * / √ % = C <   meta: :hints :achievements :reset :quit");

    loop {
        let prompt = match calc.preview() {
            Some(p) => format!("{}  ({})", calc.display(), p),
            None => calc.display().to_string(),
        };
        let line: String = match dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(l) => l,
            Err(_) => break,
        };

        match line.trim() {
            ":quit" | ":q" => break,
            ":hints" => cmd_hints(calc),
            ":achievements" => cmd_achievements(false, calc),
            ":reset" => {
                calc.dispatch(Action::Reset);
                println!("everything locked again");
            }
            input => {
                for key in input.chars() {
                    if let Some(action) = Action::from_key(&key.to_string()) {
                        calc.dispatch(action);
                    }
                }
                if let Some(msg) = calc.pending_unlock_message() {
                    println!("★ {}", msg);
                    calc.dispatch(Action::DismissUnlockMessage);
                }
                if calc.show_celebration() {
                    println!("★★★ ALL OPERATIONS UNLOCKED! The calculator is whole. ★★★");
                    calc.dispatch(Action::DismissCelebration);
                }
            }
        }
    }
}

fn cmd_script(file: &PathBuf, json: bool, calc: &mut Calculator) -> Status {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read script file {}: {}", file.display(), e);
            std::process::exit(2);
        }
    };
    let script = match engine::script::load_script(&yaml) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    let result = engine::script::run_script(&script, calc);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).unwrap_or_default()
        );
    } else {
        println!("Script: {}", result.name.as_deref().unwrap_or("<unnamed>"));
        println!("Overall: {:?}", result.overall_status);
        for step in &result.steps {
            let mark = match step.status {
                Status::Pass => "ok",
                Status::Fail => "FAIL",
            };
            print!("  Step {}: press {:?} -> {:?}", step.index, step.key, step.display);
            if let Some(ref p) = step.preview {
                print!(" (preview {:?})", p);
            }
            println!("  [{}]", mark);
            if let Some(ref msg) = step.message {
                println!("      {}", msg);
            }
        }
    }

    result.overall_status
}

fn cmd_achievements(json: bool, calc: &Calculator) {
    if json {
        let entries: Vec<serde_json::Value> = ACHIEVEMENTS
            .iter()
            .map(|a| {
                serde_json::json!({
                    "id": a.id,
                    "title": a.title,
                    "description": a.description,
                    "unlocked": a.is_unlocked(calc),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_default()
        );
        return;
    }
    for a in ACHIEVEMENTS {
        let mark = if a.is_unlocked(calc) { "x" } else { " " };
        println!("[{}] {} – {}", mark, a.title, a.description);
    }
}

fn cmd_theme(set: Option<&str>, calc: &mut Calculator) {
    if let Some(name) = set {
        let theme = match name {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            "system" => Theme::System,
            other => {
                eprintln!("error: unknown theme {:?} (expected light, dark, or system)", other);
                std::process::exit(2);
            }
        };
        calc.set_theme(theme);
    }
    let name = match calc.theme() {
        Theme::Light => "light",
        Theme::Dark => "dark",
        Theme::System => "system",
    };
    println!("theme: {}", name);
}

fn cmd_hints(calc: &Calculator) {
    for hint in HINTS {
        let state = if hint.is_unlocked(calc) {
            "earned"
        } else {
            "locked"
        };
        println!("{} [{}]", hint.description, state);
        println!("    {}", hint.code);
    }
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn output_snapshot(snapshot: &Snapshot, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(snapshot).unwrap_or_default()
        );
        return;
    }

    println!("display: {}", snapshot.display);
    if let Some(ref p) = snapshot.preview {
        println!("preview: {}", p);
    }
    let unlocked: Vec<String> = Op::ALL
        .iter()
        .filter(|op| snapshot.unlocked[&op.symbol().to_string()])
        .map(|op| op.symbol().to_string())
        .collect();
    println!("unlocked: {}", unlocked.join(" "));
    if let Some(ref msg) = snapshot.pending_unlock_message {
        println!("message: {}", msg);
    }
    if snapshot.show_celebration {
        println!("ALL OPERATIONS UNLOCKED!");
    }
}
