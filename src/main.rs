use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use threatdeck::shortcuts::{
    Binding, Dispatch, FocusSignal, KeyPress, ShortcutDispatcher, ShortcutMap, ShortcutOptions,
};
use threatdeck::{config, data, menu};

#[derive(Parser, Debug)]
#[command(name = "threatdeck")]
#[command(about = "Keyboard-driven companion for the threat-intelligence dashboard")]
#[command(version)]
struct Args {
    /// Path to config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Override the chained-shortcut quiet period in milliseconds
    #[arg(long)]
    chain_delay: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print aggregate statistics for a JSON threat feed
    Stats {
        /// Feed path (defaults to the configured feed)
        #[arg(long)]
        feed: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("threatdeck=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    match args.command {
        Some(Command::Stats { feed }) => run_stats(&config, feed),
        None => run_interactive(&config, args.chain_delay),
    }
}

fn run_stats(config: &config::Config, feed: Option<PathBuf>) -> Result<()> {
    let path = feed.or_else(|| config.feed.path.clone()).ok_or_else(|| {
        anyhow::anyhow!("No feed path given; pass --feed or set feed.path in the config")
    })?;
    let threats = data::load_feed(&path)?;

    let filters = data::analytics::AnalyticsFilters::last_days(30);
    filters.validate()?;
    let filtered = filters.apply(&threats);
    let now = chrono::Utc::now();
    let stats = data::analytics::compute_stats(filtered.iter().copied(), now);

    println!("Threats (last 30 days): {}", stats.total);
    for slice in data::analytics::severity_breakdown(&stats) {
        println!("  {:<9} {}", slice.name, slice.value);
    }
    println!(
        "In progress: {}   Resolved: {}   New (24h): {}",
        stats.in_progress, stats.resolved, stats.new_last_24h
    );
    println!();
    println!("By type:");
    for entry in data::analytics::type_breakdown(filtered.iter().copied()) {
        println!("  {:<14} {}", entry.name, entry.value);
    }
    let geo = data::analytics::geo_points(filtered.iter().copied());
    if !geo.is_empty() {
        println!();
        println!("Geo markers: {}", geo.len());
    }
    Ok(())
}

fn run_interactive(config: &config::Config, chain_delay: Option<u64>) -> Result<()> {
    let delay = chain_delay.unwrap_or(config.ui.chain_delay_ms);
    let focus = FocusSignal::new();
    let quit = Rc::new(Cell::new(false));
    let query = Rc::new(RefCell::new(String::new()));

    let map = build_shortcuts(&focus, &quit);
    let options = ShortcutOptions {
        chain_delay: Duration::from_millis(delay),
        ..Default::default()
    };
    let mut dispatcher = ShortcutDispatcher::register(map, &focus, options);

    terminal::enable_raw_mode()?;
    say("threatdeck — g-d/g-a/g-t/g-i: jump, /: search, ?: help, q or Ctrl+Q: quit");
    let result = event_loop(&mut dispatcher, &focus, &quit, &query);
    terminal::disable_raw_mode()?;
    result
}

fn event_loop(
    dispatcher: &mut ShortcutDispatcher,
    focus: &FocusSignal,
    quit: &Rc<Cell<bool>>,
    query: &Rc<RefCell<String>>,
) -> Result<()> {
    while !quit.get() {
        let timeout = dispatcher
            .chain_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_millis(250));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let press = KeyPress::from(&key);
                let outcome = dispatcher.on_key(&press);
                // Default action: while an input has focus, unhandled keys
                // edit its text.
                if outcome != Dispatch::Handled && focus.is_focused() {
                    edit_query(&press, query);
                }
            }
        }
        dispatcher.tick();
    }
    Ok(())
}

fn build_shortcuts(focus: &FocusSignal, quit: &Rc<Cell<bool>>) -> ShortcutMap {
    let quit_key = quit.clone();
    let quit_accel = quit.clone();
    let focus_search = focus.clone();
    let blur_search = focus.clone();

    ShortcutMap::new()
        .on("q", move || quit_key.set(true))
        // Authored once with the Meta convention; becomes Ctrl+Q where Ctrl
        // is the primary accelerator.
        .on("meta_q", move || quit_accel.set(true))
        .on("g-d", || goto("/dashboard"))
        .on("g-a", || goto("/analytics"))
        .on("g-t", || goto("/threats"))
        .on("g-i", || goto("/incidents"))
        .on("?", print_help)
        .on("/", move || {
            focus_search.focus("search");
            prompt("");
        })
        .bind(
            "escape",
            Binding::new(move || {
                blur_search.blur();
                say("");
            })
            .using_input("search"),
        )
}

fn goto(link: &str) {
    match menu::find_by_link(link) {
        Some(item) => say(&format!("-> {} ({})", item.title, link)),
        None => say(&format!("-> {link}")),
    }
}

fn print_help() {
    say("");
    for section in menu::NAV_MENU {
        say(section.heading);
        for item in section.items {
            let mut line = format!("  {:<16}", item.title);
            if let Some(link) = item.link {
                line.push_str(link);
            }
            if let Some(badge) = item.badge {
                line.push_str(&format!("  [{}]", badge.content));
            }
            if item.is_new {
                line.push_str("  (new)");
            }
            say(&line);
        }
    }
    say("");
    say("g-d/g-a/g-t/g-i: jump  /: search  Esc: leave search  q or Ctrl+Q: quit");
}

fn edit_query(press: &KeyPress, query: &Rc<RefCell<String>>) {
    let mut query = query.borrow_mut();
    match press.key.as_str() {
        "backspace" => {
            query.pop();
        }
        key if key.chars().count() == 1 && !press.ctrl && !press.meta && !press.alt => {
            query.push_str(key);
        }
        _ => return,
    }
    prompt(&query);
}

/// Print a line in raw mode (explicit carriage return).
fn say(line: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "{line}\r\n");
    let _ = out.flush();
}

/// Redraw the search prompt in place.
fn prompt(query: &str) {
    let mut out = std::io::stdout();
    let _ = write!(out, "\rsearch: {query}\x1b[K");
    let _ = out.flush();
}
