//! vedit entrypoint.
//!
//! Headless driver for the editing core: opens a file (or starts an empty
//! document), replays a key script through the modal dispatcher, then
//! either prints the resulting text or writes it out.
use anyhow::{Context, Result, bail};
use clap::Parser;
use core_actions::{Dispatcher, EditSettings, parse_key_script};
use core_config::load_from;
use core_events::DocumentEvent;
use core_state::{Buffer, EditorState};
use core_text::{DocumentError, TextDocument};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vedit", version, about = "Modal text editing core, driven by key scripts")]
struct Args {
    /// File to edit. A missing file starts empty and is created on write.
    pub path: Option<PathBuf>,
    /// Keys to replay, e.g. `ihello<Esc>:w<CR>`.
    #[arg(long = "keys", conflicts_with = "keys_file")]
    pub keys: Option<String>,
    /// Read the key script from a file.
    #[arg(long = "keys-file")]
    pub keys_file: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `vedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Write the final document here instead of printing it.
    #[arg(long = "output", short = 'o')]
    pub output: Option<PathBuf>,
    /// Save the final document back to its own file.
    #[arg(long = "write", short = 'w', conflicts_with = "output")]
    pub write: bool,
}

impl Args {
    fn key_script(&self) -> Result<String> {
        if let Some(keys) = &self.keys {
            return Ok(keys.clone());
        }
        match &self.keys_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading key script {}", path.display())),
            None => Ok(String::new()),
        }
    }
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("vedit.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "vedit.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global subscriber already installed; dropping the guard stops the writer.
            }
        }

        Ok(())
    }

    /// Flush buffered log lines.
    fn shutdown(&mut self) {
        info!(target: "runtime", "shutdown");
        self.log_guard.take();
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// One editing session: state, key handler and a count of content changes
/// observed on the document.
struct Session {
    state: EditorState,
    dispatcher: Dispatcher,
    changes: Rc<Cell<u64>>,
}

impl Session {
    fn load(path: Option<&Path>, settings: EditSettings) -> Result<Self> {
        let mut document = match path {
            Some(path) if path.exists() => TextDocument::open(path)
                .with_context(|| format!("opening {}", path.display()))?,
            Some(path) => {
                info!(target: "runtime", file = %path.display(), "new_file");
                let mut doc = TextDocument::new();
                doc.set_filename(Some(path.to_path_buf()));
                doc
            }
            None => TextDocument::new(),
        };
        let changes = Rc::new(Cell::new(0u64));
        let counter = Rc::clone(&changes);
        document.subscribe(move |_: &TextDocument, event: &DocumentEvent| {
            if matches!(event, DocumentEvent::ContentChanged) {
                counter.set(counter.get() + 1);
            }
        });
        info!(
            target: "runtime",
            lines = document.num_lines(),
            line_ending = ?document.line_ending(),
            history_depth = settings.history_depth,
            "document_loaded"
        );
        let buffer = Buffer::with_history_depth(document, settings.history_depth);
        Ok(Self {
            state: EditorState::new(buffer),
            dispatcher: Dispatcher::new(settings),
            changes,
        })
    }

    /// Replay `script`. Returns true if a key quit the session.
    fn replay(&mut self, script: &str) -> Result<bool> {
        let keys = parse_key_script(script).context("parsing key script")?;
        let quit = self.dispatcher.handle_keys(&mut self.state, &keys);
        info!(
            target: "runtime",
            keys = keys.len(),
            quit,
            changes = self.changes.get(),
            history = self.state.buffer.history().len(),
            mode = %self.state.mode(),
            "replay_complete"
        );
        Ok(quit)
    }

    fn text(&self) -> String {
        self.state.buffer.document().borrow().document_text()
    }

    /// Persist the result. Writes to `output`, or saves in place with
    /// `write`; otherwise hands back the text for printing.
    fn finish(&self, output: Option<&Path>, write: bool) -> Result<Option<String>> {
        let cursor = self.state.buffer.cursor();
        if let Some(output) = output {
            cursor
                .with_document_mut(|doc| doc.save_as(output))
                .with_context(|| format!("writing {}", output.display()))?;
            info!(target: "runtime", file = %output.display(), "written");
            return Ok(None);
        }
        if write {
            match cursor.with_document_mut(|doc| doc.save()) {
                Ok(()) => {
                    info!(target: "runtime", "saved_in_place");
                    return Ok(None);
                }
                Err(DocumentError::MissingDestination) => {
                    bail!("--write needs a file path")
                }
                Err(err) => return Err(err).context("saving document"),
            }
        }
        Ok(Some(self.text()))
    }
}

fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let settings = config.edit_settings();
    let mut session = Session::load(args.path.as_deref(), settings)?;

    let script = args.key_script()?;
    session.replay(&script)?;
    if let Some(status) = session.state.status() {
        warn!(target: "runtime", status, "final_status");
        eprintln!("{status}");
    }
    if let Some(text) = session.finish(args.output.as_deref(), args.write)? {
        print!("{text}");
    }
    startup.shutdown();
    Ok(())
}
