//! Line-oriented editing session
//!
//! Drives one [`EditStore`] from text commands. Playback runs against a
//! [`ClockPlaybackEngine`] advanced by the `tick` command, reconciled through
//! [`PlaybackSync`] exactly like a frame-driven preview would be.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::adapters::{ArgsFilePicker, ClockPlaybackEngine};
use crate::app::{AppContainer, ExportOutcome};
use crate::cli::commands::ConsoleProgress;
use crate::domain::model::{BoundsUpdate, ClipId, NotificationKind};
use crate::domain::store::EditStore;
use crate::playback::PlaybackSync;
use crate::render::ExportScope;
use crate::utils::{format_clock, parse_time};

/// Engine frame interval used by `tick`
const FRAME_SECONDS: f64 = 1.0 / 30.0;

const HELP: &str = "\
Commands:
  import <path>...          add source files to the end of the timeline
  list                      show the timeline
  select <n>                make clip n active (0 clears the selection)
  trim <n> <start|-> <end|-> set clip n's source range; '-' keeps a bound
  split [time]              split the active clip at time (default: cursor)
  move <from> <to>          move a clip to another position
  remove [n]                delete clip n (default: active clip)
  seek <time>               move the cursor within the active clip
  play | pause              start or stop playback
  tick <seconds>            advance playback by that much engine time
  status                    show cursor, transport and notification
  export <path>             render the whole timeline
  export-clip <path>        render only the active clip
  dismiss                   clear the notification
  help                      show this text
  quit                      leave the session
Clips are numbered from 1 as shown by 'list'; times are seconds, MM:SS or HH:MM:SS.";

/// Whether the session continues after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive editing session state
pub struct Session<'a> {
    container: &'a dyn AppContainer,
    store: EditStore,
    sync: PlaybackSync,
    engine: ClockPlaybackEngine,
}

impl<'a> Session<'a> {
    pub fn new(container: &'a dyn AppContainer) -> Self {
        Self {
            container,
            store: EditStore::new(),
            sync: PlaybackSync::new(),
            engine: ClockPlaybackEngine::new(),
        }
    }

    pub fn store(&self) -> &EditStore {
        &self.store
    }

    pub fn engine(&self) -> &ClockPlaybackEngine {
        &self.engine
    }

    /// Read commands from `input` until it ends or `quit` is given
    pub async fn run<R>(&mut self, input: R, out: &mut dyn Write) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(out, "Perseus session. Type 'help' for commands.")?;
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await.context("Failed to read command")? else {
                break;
            };
            match self.execute(&line, out).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {:#}", e)?,
            }
        }
        Ok(())
    }

    /// Execute one command line
    pub async fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        let ttl = self.container.config().ui.notification_ttl();
        self.store.expire_notification(Utc::now(), ttl);

        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!(command, args = ?rest, "Session command");

        match command {
            "import" => self.import(rest, out).await?,
            "list" | "ls" => self.list(out)?,
            "select" => {
                let index = parse_index(rest.first())?;
                let id = if index == 0 {
                    None
                } else {
                    Some(self.clip_at(index)?)
                };
                self.store.set_active_clip(id);
                self.sync.reconcile(&mut self.store, &mut self.engine);
                self.status(out)?;
            }
            "trim" => {
                let id = self.clip_at(parse_index(rest.first())?)?;
                let update = BoundsUpdate {
                    start: parse_optional_time(rest.get(1))?,
                    end: parse_optional_time(rest.get(2))?,
                };
                if update.is_empty() {
                    bail!("trim needs a start or an end");
                }
                self.store.update_clip(id, update);
                self.sync.reconcile(&mut self.store, &mut self.engine);
                self.list(out)?;
            }
            "split" => {
                let id = self
                    .store
                    .active_clip_id()
                    .ok_or_else(|| anyhow!("no active clip"))?;
                let at = match rest.first() {
                    Some(text) => parse_time(text)?,
                    None => self.store.current_time(),
                };
                match self.store.split_clip(id, at) {
                    Some(_) => {
                        self.sync.reconcile(&mut self.store, &mut self.engine);
                        self.list(out)?;
                    }
                    None => writeln!(out, "split point too close to the clip edge")?,
                }
            }
            "move" => {
                let from = parse_index(rest.first())?;
                let to = parse_index(rest.get(1))?;
                let moved = from > 0 && to > 0 && self.store.reorder_clips(from - 1, to - 1);
                if !moved {
                    writeln!(out, "no such position")?;
                }
                self.list(out)?;
            }
            "remove" | "rm" => {
                let id = match rest.first() {
                    Some(_) => self.clip_at(parse_index(rest.first())?)?,
                    None => self
                        .store
                        .active_clip_id()
                        .ok_or_else(|| anyhow!("no active clip"))?,
                };
                self.store.remove_clip(id);
                self.sync.reconcile(&mut self.store, &mut self.engine);
                self.list(out)?;
            }
            "seek" => {
                let text = rest.first().ok_or_else(|| anyhow!("seek needs a time"))?;
                self.store.set_current_time(parse_time(text)?);
                self.sync.reconcile(&mut self.store, &mut self.engine);
                self.status(out)?;
            }
            "play" | "pause" => {
                if self.store.active_clip().is_none() {
                    bail!("no active clip");
                }
                self.store.set_playing(command == "play");
                self.sync.reconcile(&mut self.store, &mut self.engine);
                self.status(out)?;
            }
            "tick" => {
                let text = rest.first().ok_or_else(|| anyhow!("tick needs a duration"))?;
                self.tick(parse_time(text)?);
                self.status(out)?;
            }
            "status" => self.status(out)?,
            "export" | "export-clip" => {
                let path = rest
                    .first()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow!("{} needs an output path", command))?;
                let scope = if command == "export" {
                    ExportScope::Project
                } else {
                    ExportScope::ActiveClip
                };
                self.export(scope, path, out).await?;
            }
            "dismiss" => self.store.dismiss_notification(),
            "help" | "?" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => bail!("unknown command '{}', try 'help'", other),
        }

        Ok(Flow::Continue)
    }

    /// Advance the engine frame by frame, reporting each position
    fn tick(&mut self, seconds: f64) {
        let mut remaining = seconds;
        while remaining > 0.0 && self.store.is_playing() {
            let step = remaining.min(FRAME_SECONDS);
            self.engine.advance(step);
            self.sync.on_engine_position(&mut self.store, &mut self.engine);
            remaining -= step;
        }
    }

    async fn import(&mut self, paths: &[&str], out: &mut dyn Write) -> Result<()> {
        if paths.is_empty() {
            bail!("import needs at least one path");
        }
        let picker = ArgsFilePicker::sources(paths.iter().map(PathBuf::from).collect());
        let added = self
            .container
            .import_interactor()
            .import(&mut self.store, &picker)
            .await?;
        writeln!(out, "Imported {} clip(s)", added.len())?;
        self.list(out)
    }

    async fn export(&mut self, scope: ExportScope, path: PathBuf, out: &mut dyn Write) -> Result<()> {
        let picker = ArgsFilePicker::destination(path);
        let result = self
            .container
            .export_interactor()
            .export(&mut self.store, scope, &picker, &ConsoleProgress)
            .await;

        match result {
            Ok(ExportOutcome::NothingToExport) => writeln!(out, "nothing to export")?,
            Ok(ExportOutcome::Cancelled) => writeln!(out, "export cancelled")?,
            // The store notification carries the outcome in both cases
            Ok(ExportOutcome::Exported(_)) | Err(_) => self.print_notification(out)?,
        }
        Ok(())
    }

    fn clip_at(&self, index: usize) -> Result<ClipId> {
        index
            .checked_sub(1)
            .and_then(|i| self.store.clips().get(i))
            .map(|clip| clip.id())
            .ok_or_else(|| anyhow!("no clip number {}", index))
    }

    fn list(&self, out: &mut dyn Write) -> Result<()> {
        if self.store.is_empty() {
            writeln!(out, "(timeline is empty)")?;
            return Ok(());
        }
        let active = self.store.active_clip_id();
        for (i, clip) in self.store.clips().iter().enumerate() {
            writeln!(
                out,
                "{} {:>2}. {}  [{} - {}]  {:.1}s",
                if Some(clip.id()) == active { "*" } else { " " },
                i + 1,
                clip.name(),
                format_clock(clip.start()),
                format_clock(clip.end()),
                clip.duration()
            )?;
        }
        writeln!(out, "Total: {:.1}s", self.store.total_duration())?;
        Ok(())
    }

    fn status(&self, out: &mut dyn Write) -> Result<()> {
        match self.store.active_clip() {
            Some(clip) => writeln!(
                out,
                "{}  {} / {}  {}",
                clip.name(),
                format_clock(self.store.current_time()),
                format_clock(clip.duration()),
                if self.store.is_playing() { "playing" } else { "paused" }
            )?,
            None => writeln!(out, "no active clip")?,
        }
        self.print_notification(out)
    }

    fn print_notification(&self, out: &mut dyn Write) -> Result<()> {
        if let Some(notification) = self.store.notification() {
            let label = match notification.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Error => "error",
            };
            writeln!(out, "[{}] {}", label, notification.message)?;
        }
        Ok(())
    }
}

fn parse_index(word: Option<&&str>) -> Result<usize> {
    let word = word.ok_or_else(|| anyhow!("missing clip number"))?;
    word.parse()
        .with_context(|| format!("'{}' is not a clip number", word))
}

fn parse_optional_time(word: Option<&&str>) -> Result<Option<f64>> {
    match word {
        None | Some(&"-") => Ok(None),
        Some(text) => Ok(Some(parse_time(text)?)),
    }
}
