//! `search` and `range` command handlers.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;
use covscan_core::{
    estimate_radius_text, radius_hint, BusinessRecord, CategorySelection, CoverageState,
    SearchParameters, ValidationError,
};
use covscan_coverage::{CoverageError, EnrichmentTask, EnrichmentUpdate};
use covscan_overpass::build_query;
use futures::StreamExt;

use crate::context::AppContext;
use crate::render;

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Antenna position as "lat, lon"
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) coords: String,
    /// Antenna height above ground in meters
    #[arg(long, default_value = "")]
    pub(crate) height: String,
    /// Search radius in meters; overrides the height-derived radius
    #[arg(long)]
    pub(crate) radius: Option<String>,
    /// Include hotels, guest houses and hostels
    #[arg(long)]
    pub(crate) lodging: bool,
    /// Include restaurants, shops and offices
    #[arg(long)]
    pub(crate) commercial: bool,
    /// Include industrial areas
    #[arg(long)]
    pub(crate) industrial: bool,
    /// Check internet coverage for every result with an address
    #[arg(long)]
    pub(crate) enrich: bool,
    /// Print web and map links for every result
    #[arg(long)]
    pub(crate) links: bool,
}

impl SearchArgs {
    pub(crate) fn selection(&self) -> CategorySelection {
        CategorySelection {
            lodging: self.lodging,
            commercial: self.commercial,
            industrial: self.industrial,
        }
    }
}

/// Check a search can run and return its radius. Makes no network call.
///
/// # Errors
///
/// Returns a [`ValidationError`] when no category is selected or the radius
/// is not positive.
pub(crate) fn validate_search(
    params: &SearchParameters,
    selection: CategorySelection,
) -> Result<f64, ValidationError> {
    if !selection.any() {
        return Err(ValidationError::NoCategorySelected);
    }
    params.search_radius_m()
}

/// Run the area query for an already validated search.
pub(crate) async fn query_area(
    ctx: &AppContext,
    params: &SearchParameters,
    selection: CategorySelection,
    radius_m: f64,
) -> anyhow::Result<Vec<BusinessRecord>> {
    let clauses = build_query(selection, params.center, radius_m);

    tracing::info!(
        center = %params.center,
        radius_m,
        clauses = clauses.len(),
        "searching area"
    );
    ctx.overpass
        .search(&clauses)
        .await
        .context("map-data query failed")
}

/// Validate, build the clauses and run the area query.
///
/// # Errors
///
/// Returns a [`ValidationError`] (before any network call) when no category is
/// selected or the radius is not positive, and the query error otherwise.
pub(crate) async fn search_businesses(
    ctx: &AppContext,
    params: &SearchParameters,
    selection: CategorySelection,
) -> anyhow::Result<Vec<BusinessRecord>> {
    let radius_m = validate_search(params, selection)?;
    query_area(ctx, params, selection, radius_m).await
}

pub(crate) async fn run_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let params = SearchParameters::parse(
        &args.coords,
        &args.height,
        args.radius.as_deref().unwrap_or_default(),
    )?;
    let businesses = search_businesses(ctx, &params, args.selection()).await?;

    println!(
        "{} result(s) within {:.0} m of {}",
        businesses.len(),
        params.radius_m(),
        params.center
    );
    if businesses.is_empty() {
        return Ok(());
    }
    print!("{}", render::render_table(&businesses));

    let businesses = if args.enrich {
        if ctx.coverage.get().await?.is_none() {
            eprintln!("{}", CoverageError::MissingCredential);
            businesses
        } else {
            enrich_to_completion(ctx, businesses).await
        }
    } else {
        businesses
    };

    if args.links {
        println!();
        for (i, business) in businesses.iter().enumerate() {
            print!("{}", render::render_links(i + 1, business));
        }
    }
    Ok(())
}

/// Stream enrichment progress to stdout and return the final list.
async fn enrich_to_completion(
    ctx: &AppContext,
    businesses: Vec<BusinessRecord>,
) -> Vec<BusinessRecord> {
    let mut latest = businesses.clone();
    let mut task =
        EnrichmentTask::spawn(Arc::clone(&ctx.coverage), businesses, ctx.enrich_pause());

    println!();
    while let Some(update) = task.next().await {
        match update {
            EnrichmentUpdate::Snapshot { index, businesses } => {
                if let Some(business) = businesses.get(index) {
                    if business.coverage.is_some_and(|c| c != CoverageState::Checking) {
                        println!("{}", render::render_progress(index, business));
                    }
                }
                latest = businesses;
            }
            EnrichmentUpdate::Completed(summary) => {
                println!("{}", render::render_summary(&summary));
            }
        }
    }

    println!();
    print!("{}", render::render_table(&latest));
    latest
}

pub(crate) fn run_range(height: &str) {
    println!("{}", radius_hint(estimate_radius_text(height)));
}
