//! Interactive session.
//!
//! Keeps the search parameters, the current result list and at most one
//! running coverage check between commands. Progress from the coverage check
//! is printed as it arrives while the prompt stays usable.

mod command;

use std::sync::Arc;

use covscan_core::{
    estimate_radius_m, radius_hint, BusinessRecord, CategorySelection, CoverageState, LatLon,
    SearchParameters,
};
use covscan_coverage::{CoverageError, EnrichmentPhase, EnrichmentTask, EnrichmentUpdate};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::AppContext;
use crate::{coverage, render, search};

pub(crate) use command::{parse_line, ShellCommand, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Session {
    ctx: Arc<AppContext>,
    params: SearchParameters,
    has_center: bool,
    selection: CategorySelection,
    results: Vec<BusinessRecord>,
    enrichment: Option<EnrichmentTask>,
    last_phase: EnrichmentPhase,
}

pub(crate) async fn run_shell(ctx: Arc<AppContext>) -> anyhow::Result<()> {
    let mut session = Session::new(ctx);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("covscan interactive session; type `help` for commands");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if session.handle_line(&line).await == Flow::Quit {
                    break;
                }
            }
            update = next_update(&mut session.enrichment) => session.apply(update),
        }
    }

    session.cancel_enrichment();
    Ok(())
}

/// Next update from the running check; pending forever when there is none.
async fn next_update(task: &mut Option<EnrichmentTask>) -> Option<EnrichmentUpdate> {
    match task {
        Some(task) => task.next_update().await,
        None => std::future::pending().await,
    }
}

impl Session {
    fn new(ctx: Arc<AppContext>) -> Self {
        Self {
            ctx,
            params: SearchParameters {
                center: LatLon { lat: 0.0, lon: 0.0 },
                height_m: f64::NAN,
                manual_radius_m: None,
            },
            has_center: false,
            selection: CategorySelection {
                lodging: true,
                ..CategorySelection::default()
            },
            results: Vec::new(),
            enrichment: None,
            last_phase: EnrichmentPhase::Idle,
        }
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                return Flow::Continue;
            }
        };
        match self.execute(command).await {
            Ok(flow) => flow,
            Err(err) => {
                tracing::debug!(error = ?err, "shell command failed");
                println!("error: {err:#}");
                Flow::Continue
            }
        }
    }

    async fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Coords(raw) => {
                self.params.center = LatLon::parse(&raw)?;
                self.has_center = true;
                println!("center set to {}", self.params.center);
            }
            ShellCommand::Height(raw) => {
                self.params.set_height(&raw);
                println!("{}", radius_hint(estimate_radius_m(self.params.height_m)));
            }
            ShellCommand::Radius(raw) => {
                self.params.set_manual_radius(&raw)?;
                match self.params.manual_radius_m {
                    Some(radius) => println!("search radius fixed at {radius:.0} m"),
                    None => println!(
                        "manual radius cleared; using {:.0} m from antenna height",
                        self.params.derived_radius_m()
                    ),
                }
            }
            ShellCommand::Categories(selection) => {
                self.selection = selection;
                println!(
                    "categories: lodging={} commercial={} industrial={}",
                    selection.lodging, selection.commercial, selection.industrial
                );
            }
            ShellCommand::Search => self.search().await?,
            ShellCommand::Enrich => self.start_enrichment().await?,
            ShellCommand::Cancel => {
                if self.cancel_enrichment() {
                    println!("coverage check cancelled");
                } else {
                    println!("no coverage check running");
                }
            }
            ShellCommand::Show => self.show(),
            ShellCommand::Status => self.status().await,
            ShellCommand::Links(position) => {
                let business = self.result(position)?;
                print!("{}", render::render_links(position, business));
            }
            ShellCommand::Locate(position) => {
                let business = self.result(position)?.clone();
                let address = self
                    .ctx
                    .coverage
                    .locate_address(business.name(), business.lat, business.lon)
                    .await?;
                if address.is_empty() {
                    println!("no address found for {}", business.name());
                } else {
                    println!("{}: {address}", business.name());
                }
            }
            ShellCommand::Classify { address, city } => {
                coverage::run_classify(&self.ctx.coverage, &address, &city).await?;
            }
            ShellCommand::Key(command) => coverage::run_key(&self.ctx.coverage, &command).await?,
        }
        Ok(Flow::Continue)
    }

    fn result(&self, position: usize) -> anyhow::Result<&BusinessRecord> {
        position
            .checked_sub(1)
            .and_then(|i| self.results.get(i))
            .ok_or_else(|| anyhow::anyhow!("no result #{position}; {} result(s) loaded", self.results.len()))
    }

    async fn search(&mut self) -> anyhow::Result<()> {
        if !self.has_center {
            anyhow::bail!("set the antenna position first with `coords <lat, lon>`");
        }
        // A rejected search leaves the running check alone.
        let radius_m = search::validate_search(&self.params, self.selection)?;
        if self.cancel_enrichment() {
            println!("previous coverage check cancelled");
        }

        // Prior results stay in place if the query fails.
        let businesses =
            search::query_area(&self.ctx, &self.params, self.selection, radius_m).await?;
        println!(
            "{} result(s) within {radius_m:.0} m of {}",
            businesses.len(),
            self.params.center
        );
        self.results = businesses;
        self.last_phase = EnrichmentPhase::Idle;
        self.show();
        Ok(())
    }

    async fn start_enrichment(&mut self) -> anyhow::Result<()> {
        if self.results.is_empty() {
            anyhow::bail!("nothing to check; run `search` first");
        }
        if self.ctx.coverage.get().await?.is_none() {
            anyhow::bail!(CoverageError::MissingCredential);
        }
        self.cancel_enrichment();
        for business in &mut self.results {
            business.clear_coverage();
        }
        self.enrichment = Some(EnrichmentTask::spawn(
            Arc::clone(&self.ctx.coverage),
            self.results.clone(),
            self.ctx.enrich_pause(),
        ));
        self.last_phase = EnrichmentPhase::Running;
        println!("checking coverage for {} result(s)...", self.results.len());
        Ok(())
    }

    /// Abort the running check, if any. Returns whether one was running.
    fn cancel_enrichment(&mut self) -> bool {
        let Some(mut task) = self.enrichment.take() else {
            return false;
        };
        let was_running = !task.is_finished();
        task.cancel();
        self.last_phase = task.phase();
        was_running
    }

    fn apply(&mut self, update: Option<EnrichmentUpdate>) {
        match update {
            Some(EnrichmentUpdate::Snapshot { index, businesses }) => {
                if let Some(business) = businesses.get(index) {
                    if business.coverage.is_some_and(|c| c != CoverageState::Checking) {
                        println!("{}", render::render_progress(index, business));
                    }
                }
                self.results = businesses;
            }
            Some(EnrichmentUpdate::Completed(summary)) => {
                println!("{}", render::render_summary(&summary));
            }
            None => {
                if let Some(task) = self.enrichment.take() {
                    self.last_phase = task.phase();
                }
            }
        }
    }

    fn show(&self) {
        if self.results.is_empty() {
            println!("no results");
        } else {
            print!("{}", render::render_table(&self.results));
        }
    }

    async fn status(&self) {
        if self.has_center {
            println!("center: {}", self.params.center);
        } else {
            println!("center: not set");
        }
        println!(
            "radius: {:.0} m ({})",
            self.params.radius_m(),
            if self.params.manual_radius_m.is_some() {
                "manual"
            } else {
                "from antenna height"
            }
        );
        println!(
            "categories: lodging={} commercial={} industrial={}",
            self.selection.lodging, self.selection.commercial, self.selection.industrial
        );
        println!("results: {}", self.results.len());
        let phase = self
            .enrichment
            .as_ref()
            .map_or(self.last_phase, EnrichmentTask::phase);
        println!("coverage check: {phase:?}");
        println!("cached coverage results: {}", self.ctx.coverage.cache_len().await);
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
