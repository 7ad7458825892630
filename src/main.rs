//! Terminal host for the CodeNexus controller.
//!
//! Runs the sans-IO controller against a live backend: it executes every [`Action`]
//! (reqwest for HTTP, tokio timers, a JSON file for durable keys), paints pages and the
//! skeleton as ANSI text, and turns a small line-oriented command language into
//! [`Event`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Line   ┌─────────────────────────┐  Event   ┌──────────────┐
//! │ stdin reader │ ──────▶ │        host loop        │ ───────▶ │ handle_event │
//! └──────────────┘         │  (single mpsc receiver) │ ◀─────── └──────────────┘
//! ┌──────────────┐  Event  │                         │  Actions
//! │ fetch/timer  │ ──────▶ │  executes actions,      │
//! │    tasks     │         │  spawns tasks, paints   │
//! └──────────────┘         └─────────────────────────┘
//! ```
//!
//! # Commands
//!
//! - `go <path>`: type an address (history entry + dispatch)
//! - `link <href>` / `nav <n>`: follow a link, or skeleton link `L<n>`
//! - `click <id>`: activate control `[id]` of the painted page
//! - `submit <form> name=value; name=value`: submit `search`, `article` or `tool`
//! - `key <k>` / `type <text>`: keystrokes outside any text entry (`esc`, `enter`, `bs`, `del`)
//! - `menu <name>` / `tap [name...]`: toggle a menu / pointer-down inside the named menus
//! - `resize <width>`, `back`, `yes`, `no`, `redraw`, `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use codenexus::api::ApiClient;
use codenexus::app::menus::MenuId;
use codenexus::app::router::Location;
use codenexus::app::timers::TimerHandle;
use codenexus::infrastructure::paths::state_file;
use codenexus::observability::init_tracing;
use codenexus::storage::{DurableState, JsonStorage, MemoryStorage, Storage};
use codenexus::ui::chrome::ChromeItem;
use codenexus::ui::{paint_chrome, paint_page, Chrome, ControlId, FormId, Page};
use codenexus::{handle_event, initialize, Action, AppState, Command, Config, Event, Key, KeyTarget, Theme};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::AbortHandle;

const HELP: &str = "\
go <path>            open an address
link <href>          follow a link
nav <n>              follow skeleton link L<n>
click <id>           activate control [id]
submit <form> k=v; k=v   submit search | article | tool
key <k>              press a key (esc, enter, bs, del, or one character)
type <text>          press each character of <text>
menu <name>          toggle a menu
tap [name...]        pointer-down inside the named menus (none: outside)
resize <width>       change the viewport width
back                 history back
yes | no             answer a confirmation
redraw | help | quit";

#[derive(Debug, Parser)]
#[command(name = "codenexus", version, about = "Terminal host for the CodeNexus portal")]
struct Args {
    /// Address to open.
    #[arg(default_value = "/")]
    path: String,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend origin.
    #[arg(long)]
    api_base: Option<String>,

    #[arg(long)]
    page_size: Option<u32>,

    /// Built-in theme (neon-dark, neon-light).
    #[arg(long)]
    theme: Option<String>,

    #[arg(long)]
    theme_file: Option<String>,

    #[arg(long)]
    trace_level: Option<String>,

    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Keep durable state in memory only.
    #[arg(long)]
    ephemeral: bool,
}

impl Args {
    fn config(&self) -> codenexus::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };

        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.trim_end_matches('/').to_string();
        }
        if let Some(page_size) = self.page_size.filter(|n| *n > 0) {
            config.page_size = page_size;
        }
        if let Some(width) = self.width {
            config.viewport_width = width;
        }
        if self.theme.is_some() {
            config.theme_name.clone_from(&self.theme);
        }
        if self.theme_file.is_some() {
            config.theme_file.clone_from(&self.theme_file);
        }
        if self.trace_level.is_some() {
            config.trace_level.clone_from(&self.trace_level);
        }
        if self.data_dir.is_some() {
            config.data_dir.clone_from(&self.data_dir);
        }
        Ok(config)
    }
}

/// Everything the host loop receives.
#[derive(Debug)]
enum Message {
    Line(String),
    Event(Event),
    InputClosed,
}

/// A parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(Event),
    Go(String),
    Nav(usize),
    Keys(Vec<Key>),
    Back,
    Answer(bool),
    Redraw,
    Help,
    Quit,
}

fn parse_key(name: &str) -> Option<Key> {
    match name {
        "esc" | "escape" => Some(Key::Escape),
        "enter" => Some(Key::Enter),
        "bs" | "backspace" => Some(Key::Backspace),
        "del" | "delete" => Some(Key::Delete),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                (Some(_), Some(_)) => Some(Key::Other(other.to_string())),
                (None, _) => None,
            }
        }
    }
}

fn parse_fields(text: &str) -> BTreeMap<String, String> {
    text.split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Parses one command line.
///
/// # Errors
///
/// Returns a message for the user when the line is not a command.
fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let input = match verb {
        "go" if !rest.is_empty() => Input::Go(rest.to_string()),
        "link" if !rest.is_empty() => Input::Event(Event::LinkClicked { href: rest.to_string() }),
        "nav" => Input::Nav(rest.trim_start_matches('L').parse().map_err(|_| format!("not a link number: {rest}"))?),
        "click" => {
            let id = rest.trim_matches(['[', ']']).parse().map_err(|_| format!("not a control id: {rest}"))?;
            Input::Event(Event::Activate(ControlId(id)))
        }
        "submit" => {
            let (form, fields) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let form = FormId::from_name(form).ok_or_else(|| format!("unknown form: {form}"))?;
            Input::Event(Event::Submit { form, fields: parse_fields(fields) })
        }
        "key" => Input::Keys(vec![parse_key(rest).ok_or("key needs a name")?]),
        "type" => Input::Keys(rest.chars().map(Key::Char).collect()),
        "menu" => {
            let menu = MenuId::from_name(rest).ok_or_else(|| format!("unknown menu: {rest}"))?;
            Input::Event(Event::ToggleMenu(menu))
        }
        "tap" => {
            let inside = rest
                .split_whitespace()
                .map(|name| MenuId::from_name(name).ok_or_else(|| format!("unknown menu: {name}")))
                .collect::<Result<Vec<_>, _>>()?;
            Input::Event(Event::PointerDown { inside })
        }
        "resize" => {
            let width = rest.parse().map_err(|_| format!("not a width: {rest}"))?;
            Input::Event(Event::Resize { width })
        }
        "back" => Input::Back,
        "yes" | "y" => Input::Answer(true),
        "no" | "n" => Input::Answer(false),
        "redraw" => Input::Redraw,
        "help" | "?" => Input::Help,
        "quit" | "q" | "exit" => Input::Quit,
        "" => Input::Redraw,
        other => return Err(format!("unknown command: {other} (try help)")),
    };
    Ok(input)
}

/// Side-effect executor and terminal surface.
struct Host {
    client: Arc<ApiClient>,
    tx: UnboundedSender<Message>,
    storage: Box<dyn Storage>,
    theme: Theme,
    chrome: Chrome,
    page: Page,
    timers: HashMap<TimerHandle, AbortHandle>,
    history: Vec<String>,
    confirm: Option<Command>,
}

impl Host {
    fn send(&self, event: Event) {
        if self.tx.send(Message::Event(event)).is_err() {
            tracing::debug!("host loop closed, event dropped");
        }
    }

    fn execute(&mut self, actions: Vec<Action>) -> bool {
        let mut repaint = false;

        for action in actions {
            match action {
                Action::Fetch(call) => {
                    let client = Arc::clone(&self.client);
                    let tx = self.tx.clone();
                    tokio::spawn(async move {
                        let outcome = client.execute(&call).await;
                        let _ = tx.send(Message::Event(Event::ApiCompleted { call, outcome }));
                    });
                }
                Action::Paint(page) => {
                    self.page = page;
                    repaint = true;
                }
                Action::PatchRegion(patch) => {
                    repaint |= self.page.apply_patch(&patch);
                }
                action @ (Action::HighlightNav(_) | Action::RevealAdminEntry | Action::FillWeeklyMenu(_)) => {
                    repaint |= self.chrome.apply(&action);
                }
                Action::Persist { key, value } => {
                    if let Err(e) = self.storage.set(key, &value) {
                        tracing::warn!(key = key.as_str(), error = %e, "durable write failed");
                    }
                }
                Action::StartTimer { handle, after } => {
                    let tx = self.tx.clone();
                    let task = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = tx.send(Message::Event(Event::TimerFired(handle)));
                    });
                    self.timers.insert(handle, task.abort_handle());
                }
                Action::CancelTimer(handle) => {
                    if let Some(task) = self.timers.remove(&handle) {
                        task.abort();
                    }
                }
                Action::Alert(message) => println!("\n  ⚠ {message}\n"),
                Action::Confirm { message, on_accept } => {
                    println!("\n  ? {message}  (yes/no)\n");
                    self.confirm = Some(on_accept);
                }
                Action::OpenExternal { url } => println!("  ↗ {url}"),
                Action::PushHistory { path } => self.history.push(path),
                Action::HistoryBack => self.back(),
                Action::CopyToClipboard { text, control } => {
                    println!("\n{text}\n");
                    self.send(Event::CopyFinished { control, ok: true });
                }
            }
        }

        self.timers.retain(|_, task| !task.is_finished());
        repaint
    }

    fn back(&mut self) {
        if self.history.len() < 2 {
            println!("  (no earlier address)");
            return;
        }
        self.history.pop();
        if let Some(path) = self.history.last() {
            self.send(Event::Navigate { location: Location::parse(path) });
        }
    }

    fn skeleton_link(&self, state: &AppState, n: usize) -> Option<String> {
        self.chrome
            .items(&state.menus)
            .into_iter()
            .filter_map(|item| match item {
                ChromeItem::Link { href, .. } => Some(href),
                _ => None,
            })
            .nth(n.checked_sub(1)?)
    }

    fn paint(&self, state: &AppState) {
        let rule = "─".repeat(60);
        println!("{}", paint_chrome(&self.chrome, &state.menus, &self.theme));
        println!("{}{rule}{}", Theme::fg(&self.theme.colors.border), Theme::reset());
        println!("{}  {}", Theme::dim(), state.location);
        print!("{}", Theme::reset());
        println!("{}", paint_page(&self.page, &self.theme));
        println!("{}{rule}{}", Theme::fg(&self.theme.colors.border), Theme::reset());
    }
}

async fn run(args: Args) -> codenexus::Result<()> {
    let config = args.config()?;
    init_tracing(&config);

    let storage: Box<dyn Storage> = if args.ephemeral {
        Box::new(MemoryStorage::default())
    } else {
        Box::new(JsonStorage::new(state_file(&config.data_dir()))?)
    };
    let durable = DurableState::load(storage.as_ref())?;
    let mut state = initialize(&config, durable);

    let (tx, mut rx) = unbounded_channel();
    let mut host = Host {
        client: Arc::new(ApiClient::new(&config.api_base)?),
        tx: tx.clone(),
        storage,
        theme: config.theme(),
        chrome: Chrome::default(),
        page: Page::default(),
        timers: HashMap::new(),
        history: vec![Location::parse(&args.path).to_string()],
        confirm: None,
    };

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(Message::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Message::InputClosed);
    });

    let start = Event::Start { location: Location::parse(&args.path) };
    host.send(start);

    while let Some(message) = rx.recv().await {
        let events = match message {
            Message::Event(event) => vec![event],
            Message::InputClosed => break,
            Message::Line(line) => match parse_input(&line) {
                Ok(Input::Quit) => break,
                Ok(Input::Help) => {
                    println!("{HELP}");
                    vec![]
                }
                Ok(Input::Redraw) => {
                    host.paint(&state);
                    vec![]
                }
                Ok(Input::Back) => {
                    host.back();
                    vec![]
                }
                Ok(Input::Answer(accepted)) => match host.confirm.take() {
                    Some(command) if accepted => vec![Event::Confirmed(command)],
                    _ => vec![],
                },
                Ok(Input::Go(path)) => {
                    let location = Location::parse(&path);
                    host.history.push(location.to_string());
                    vec![Event::Navigate { location }]
                }
                Ok(Input::Nav(n)) => match host.skeleton_link(&state, n) {
                    Some(href) => vec![Event::LinkClicked { href }],
                    None => {
                        println!("  no link L{n}");
                        vec![]
                    }
                },
                Ok(Input::Keys(keys)) => {
                    keys.into_iter().map(|key| Event::Key { key, target: KeyTarget::Document }).collect()
                }
                Ok(Input::Event(event)) => vec![event],
                Err(message) => {
                    println!("  {message}");
                    vec![]
                }
            },
        };

        let mut repaint = false;
        for event in events {
            let (chrome_changed, actions) = handle_event(&mut state, &event)?;
            repaint |= chrome_changed;
            repaint |= host.execute(actions);
        }
        if repaint {
            host.paint(&state);
        }
    }

    tracing::info!("terminal host stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("codenexus: {e}");
            ExitCode::FAILURE
        }
    }
}
