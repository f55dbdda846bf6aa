//! ac - autoclicker CLI
//!
//! Record screen positions, group them, and replay them on a schedule.
//! `ac run` listens for the global hotkeys; every other command edits the
//! action file and exits.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use autoclicker::prelude::*;
use autoclicker::settings::default_settings_path;

#[derive(Parser)]
#[command(name = "ac")]
#[command(about = "autoclicker - record clicks and key presses, then replay them")]
#[command(version)]
struct Cli {
    /// Action file (defaults to ~/.autoclicker/click_locations.json)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for hotkeys: record, start and stop from anywhere
    Run {
        #[command(flatten)]
        playback: PlaybackArgs,
    },
    /// Play the actions once and exit (Ctrl+C stops)
    Play {
        #[command(flatten)]
        playback: PlaybackArgs,
        /// Seconds to wait before the first action
        #[arg(long, default_value = "2")]
        delay: u64,
    },
    /// List actions
    List {
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Append a keystroke action
    AddKey {
        key: String,
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Change an action
    Edit {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        click_type: Option<ClickType>,
        #[arg(long)]
        hold: Option<f64>,
        #[arg(long)]
        key: Option<String>,
    },
    /// Delete actions by name
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Delete every action
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Group management
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Write the action list to another file
    Export {
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// List groups
    List,
    /// Create a new group, optionally tagging actions with it
    Create {
        group: String,
        names: Vec<String>,
    },
    /// Tag actions with a group, creating it if needed
    Add {
        group: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Clear the group tag on actions
    Remove {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Playback options; anything left out comes from the settings file
#[derive(Args, Debug, Clone)]
struct PlaybackArgs {
    /// Seconds between actions
    #[arg(short, long)]
    interval: Option<f64>,
    #[arg(short, long)]
    repetitions: Option<u32>,
    /// Repeat until stopped
    #[arg(long)]
    infinite: bool,
    /// Add up to half a second either way to every interval
    #[arg(long)]
    random_delay: bool,
    /// Offset each click by up to this many pixels
    #[arg(long)]
    jitter: Option<i32>,
    /// Seconds to glide the cursor to each target
    #[arg(long)]
    move_duration: Option<f64>,
    /// Only play actions in this group
    #[arg(short, long)]
    group: Option<String>,
}

impl PlaybackArgs {
    fn config(&self, settings: &AppSettings) -> PlaybackConfig {
        let base = PlaybackConfig::from_settings(settings);
        PlaybackConfig {
            interval: self.interval.unwrap_or(base.interval),
            repetitions: self.repetitions.unwrap_or(base.repetitions),
            infinite: self.infinite,
            random_delay: self.random_delay,
            jitter_enabled: self.jitter.is_some(),
            jitter_range: self.jitter.unwrap_or(base.jitter_range),
            move_duration: self.move_duration.unwrap_or(base.move_duration),
        }
    }
}

#[derive(Serialize)]
struct Output<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Error>,
}

impl<T: Serialize> Output<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }
    fn err(e: Error) -> Output<()> {
        Output { success: false, data: None, error: Some(e) }
    }
}

fn print_json<T: Serialize>(output: &T) {
    match serde_json::to_string_pretty(output) {
        Ok(s) => println!("{}", s),
        Err(e) => tracing::error!("failed to encode output: {}", e),
    }
}

#[derive(Serialize)]
struct ActionRow {
    name: String,
    group: Option<String>,
    position: String,
    detail: String,
}

impl From<&Action> for ActionRow {
    fn from(a: &Action) -> Self {
        Self {
            name: a.name.clone(),
            group: a.group.clone(),
            position: a.position_label(),
            detail: a.detail_label(),
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    let result = match open_session(cli.file) {
        Ok(mut session) => dispatch(&mut session, cli.command, json),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        match e.downcast_ref::<Error>() {
            Some(err) if json => print_json(&Output::<()>::err(err.clone())),
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn open_session(file: Option<PathBuf>) -> Result<Session> {
    let store = match file {
        Some(path) => ActionStore::at(path),
        None => ActionStore::new()?,
    };
    let session = Session::open(EnigoDriver::factory(), store);
    tracing::debug!(path = %session.path().display(), "session opened");
    Ok(session)
}

fn dispatch(session: &mut Session, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Run { playback } => run(session, &playback),
        Commands::Play { playback, delay } => play(session, &playback, delay),
        Commands::List { group } => list(session, group.as_deref(), json),
        Commands::AddKey { key, group } => add_key(session, &key, group.as_deref(), json),
        Commands::Edit { name, rename, click_type, hold, key } => {
            let patch = ActionPatch { name: rename, click_type, hold_duration: hold, key };
            edit(session, &name, patch, json)
        }
        Commands::Delete { names } => {
            let removed = session.delete_actions(&names)?;
            report(json, serde_json::json!({ "deleted": removed }), || {
                println!("Deleted {} action(s)", removed)
            });
            Ok(())
        }
        Commands::Clear { yes } => {
            if !yes {
                anyhow::bail!("Refusing to clear all actions without --yes");
            }
            session.clear_all()?;
            report(json, serde_json::json!({ "cleared": true }), || println!("Cleared all actions"));
            Ok(())
        }
        Commands::Group { action } => group(session, action, json),
        Commands::Export { path } => {
            session.save_as(&path)?;
            report(json, serde_json::json!({ "path": path }), || println!("{}", session.status()));
            Ok(())
        }
    }
}

fn report(json: bool, data: serde_json::Value, text: impl FnOnce()) {
    if json {
        print_json(&Output::ok(data));
    } else {
        text();
    }
}

// ── Playback ────────────────────────────────────────────────────────────────

fn load_settings() -> AppSettings {
    match default_settings_path() {
        Ok(path) => AppSettings::load(&path),
        Err(e) => {
            tracing::warn!("no settings directory: {:#}", e);
            AppSettings::default()
        }
    }
}

fn apply_group(session: &mut Session, group: Option<&str>) -> Result<()> {
    if let Some(g) = group {
        if !session.groups().contains(g) {
            return Err(Error::group_not_found(g).into());
        }
        session.set_filter(g);
    }
    Ok(())
}

fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let f = flag.clone();
    ctrlc::set_handler(move || { f.store(true, Ordering::SeqCst); })
        .context("installing Ctrl+C handler")?;
    Ok(flag)
}

fn run(session: &mut Session, args: &PlaybackArgs) -> Result<()> {
    let settings = load_settings();
    apply_group(session, args.group.as_deref())?;
    session.set_config(args.config(&settings));
    session.spawn_hook()?;

    let keys = session.hotkeys().clone();
    println!(
        "{} actions loaded from {}",
        session.actions().len(),
        session.path().display()
    );
    let bound: Vec<String> = HotkeyCommand::ALL
        .iter()
        .map(|&cmd| format!("{}: {}", cmd, keys.get(cmd)))
        .collect();
    println!("{}  (Ctrl+C to quit)", bound.join("  "));

    let quit = interrupt_flag()?;
    let mut last = session.status().to_string();
    println!("{}", last);
    while !quit.load(Ordering::SeqCst) {
        if session.pump() > 0 && session.status() != last {
            last = session.status().to_string();
            println!("{}", last);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    session.shutdown();
    Ok(())
}

fn play(session: &mut Session, args: &PlaybackArgs, delay: u64) -> Result<()> {
    let settings = load_settings();
    apply_group(session, args.group.as_deref())?;
    let config = args.config(&settings);
    let count = session.visible_actions().len();
    if count == 0 {
        return Err(Error::nothing_to_play().into());
    }

    println!(
        "Playing {} actions {} (Ctrl+C to stop)...",
        count,
        if config.infinite {
            "until stopped".to_string()
        } else {
            format!("x{}", config.repetitions)
        }
    );
    let interrupt = interrupt_flag()?;
    if delay > 0 {
        println!("Starting in {} seconds...", delay);
        std::thread::sleep(Duration::from_secs(delay));
    }
    if interrupt.load(Ordering::SeqCst) {
        return Ok(());
    }

    session.start_playback(config)?;
    session.wait_playback(&interrupt);
    println!("{}", session.status());
    Ok(())
}

// ── Editing ─────────────────────────────────────────────────────────────────

fn list(session: &mut Session, group: Option<&str>, json: bool) -> Result<()> {
    apply_group(session, group)?;
    let rows: Vec<ActionRow> = session.visible_actions().iter().map(ActionRow::from).collect();
    if json {
        print_json(&Output::ok(rows));
        return Ok(());
    }
    if rows.is_empty() {
        println!("No actions saved.");
        return Ok(());
    }
    println!("Showing: {}", session.filter().label());
    println!("{:<20} {:<12} {:<14} {}", "NAME", "GROUP", "X, Y", "DETAIL");
    for r in rows {
        println!(
            "{:<20} {:<12} {:<14} {}",
            r.name,
            r.group.as_deref().unwrap_or("-"),
            r.position,
            r.detail
        );
    }
    Ok(())
}

fn add_key(session: &mut Session, key: &str, group: Option<&str>, json: bool) -> Result<()> {
    if let Some(g) = group {
        if !session.groups().contains(g) {
            session.create_group(g)?;
        }
        session.set_filter(g);
    }
    let name = session.add_keystroke(key)?;
    report(json, serde_json::json!({ "name": name, "key": key }), || {
        println!("Added {} ({})", name, key)
    });
    Ok(())
}

fn edit(session: &mut Session, name: &str, patch: ActionPatch, json: bool) -> Result<()> {
    if patch.is_empty() {
        anyhow::bail!("Nothing to change; pass --rename, --click-type, --hold or --key");
    }
    session.edit_action(name, &patch)?;
    let new_name = patch.name.as_deref().map(str::trim).unwrap_or(name);
    let row = session
        .actions()
        .iter()
        .find(|a| a.name == new_name)
        .map(ActionRow::from);
    match row {
        Some(row) if json => print_json(&Output::ok(row)),
        Some(row) => println!("{}: {} {}", row.name, row.position, row.detail),
        None => {}
    }
    Ok(())
}

fn group(session: &mut Session, action: GroupAction, json: bool) -> Result<()> {
    match action {
        GroupAction::List => {
            let groups: Vec<String> = session.groups().into_iter().collect();
            report(json, serde_json::json!(groups), || {
                if groups.is_empty() {
                    println!("No groups.");
                }
                for g in &groups {
                    println!("{}", g);
                }
            });
        }
        GroupAction::Create { group, names } => {
            check_names(session, &names)?;
            let group = session.create_group(&group)?;
            let count = if names.is_empty() {
                0
            } else {
                session.assign_group(&names, &group)?
            };
            report(json, serde_json::json!({ "group": group, "count": count }), || {
                if count == 0 {
                    println!("Group '{}' created (it is kept only while it has members)", group);
                } else {
                    println!("{}", session.status());
                }
            });
        }
        GroupAction::Add { group, names } => {
            check_names(session, &names)?;
            let count = session.add_selection_to_group(&names, &group)?;
            report(json, serde_json::json!({ "group": group, "count": count }), || {
                println!("{}", session.status())
            });
        }
        GroupAction::Remove { names } => {
            check_names(session, &names)?;
            let count = session.remove_selection_from_group(&names)?;
            report(json, serde_json::json!({ "count": count }), || {
                println!("{}", session.status())
            });
        }
    }
    Ok(())
}

fn check_names(session: &Session, names: &[String]) -> Result<()> {
    for n in names {
        if !session.actions().iter().any(|a| &a.name == n) {
            return Err(Error::action_not_found(n).into());
        }
    }
    Ok(())
}
