use crate::config::{load_config, BrandCatalog, ConfigFile, ProjectionConfig, WeeklySchedule};
use crate::core::AggregationOutcome;
use crate::error::{RoasError, RoasResult};
use crate::pipeline::Pipeline;
use crate::types::{ProjectionReport, RowValue, TableRow, Tabular, UnattributedLabel};
use crate::writer::export_report;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "roas_forge=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `1234567.891` → `1,234,567.89`
fn format_money(n: f64) -> String {
    let fixed = format!("{:.2}", n.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if n < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

fn format_value(value: &RowValue) -> String {
    match value {
        RowValue::Text(text) => text.clone(),
        RowValue::Money(v) => format_money(*v),
        RowValue::Ratio(v) => format!("{:.2}", v),
        RowValue::Share(v) => format!("{:.1}%", v * 100.0),
        RowValue::Count(v) => format_number(v.round()),
    }
}

/// Print rows as an aligned table: first column left, the rest right.
fn print_table(title: &str, rows: &[TableRow]) {
    println!("\n{}", title.bold().cyan());
    let Some(first) = rows.first() else {
        println!("   (no rows)");
        return;
    };

    let headers = first.headers();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default())
                .collect()
        })
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            cells
                .iter()
                .map(|r| r[idx].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let total_width = widths.iter().sum::<usize>() + 2 * widths.len();

    println!("{}", "─".repeat(total_width));
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .enumerate()
        .map(|(idx, (h, w))| pad(h, *w, idx == 0))
        .collect();
    println!("{}", header_line.join("  ").bold());
    println!("{}", "─".repeat(total_width));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(idx, (cell, w))| {
                let padded = pad(cell, *w, idx == 0);
                if idx == 0 {
                    padded.bright_blue().to_string()
                } else {
                    padded
                }
            })
            .collect();
        println!("{}", line.join("  "));
    }
    println!("{}", "─".repeat(total_width));
}

fn pad(text: &str, width: usize, left: bool) -> String {
    if left {
        format!("{:<width$}", text)
    } else {
        format!("{:>width$}", text)
    }
}

/// Command-line values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub roas_uplift: Option<f64>,
    pub organic_lift: Option<f64>,
    pub spend_growth: Option<f64>,
    pub organic_cap: Option<f64>,
    /// `uniform`, `front_loaded` or a comma list of fractions
    pub weights: Option<String>,
    pub no_traffic: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ProjectionConfig) -> RoasResult<()> {
        if let Some(v) = self.roas_uplift {
            config.roas_uplift_fraction = v;
        }
        if let Some(v) = self.organic_lift {
            config.organic_lift_fraction = v;
        }
        if let Some(v) = self.spend_growth {
            config.spend_growth_fraction = v;
        }
        if let Some(v) = self.organic_cap {
            config.organic_cap = v;
        }
        if let Some(weights) = &self.weights {
            config.weekly_weights = WeeklySchedule::parse(weights)?;
        }
        if self.no_traffic {
            config.project_traffic = false;
        }
        config.validate()
    }
}

/// Everything `roas-forge project` accepts.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub ads: PathBuf,
    pub business: PathBuf,
    pub config: Option<PathBuf>,
    pub brands: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub weekly: bool,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

/// Config file (or defaults), with a separate brand file replacing the catalog.
fn load_settings(
    config: Option<&Path>,
    brands: Option<&Path>,
) -> RoasResult<(ConfigFile, BrandCatalog)> {
    let file = match config {
        Some(path) => load_config(path)?,
        None => ConfigFile::default(),
    };
    let catalog = match brands {
        Some(path) => BrandCatalog::load(path)?,
        None => file.catalog()?,
    };
    Ok((file, catalog))
}

fn build_pipeline(
    config: Option<&Path>,
    brands: Option<&Path>,
    overrides: &ConfigOverrides,
) -> RoasResult<Pipeline> {
    let (file, catalog) = load_settings(config, brands)?;
    let mut projection = file.projection;
    overrides.apply(&mut projection)?;
    Ok(Pipeline::new(projection, catalog, file.columns))
}

/// Execute the project command
pub fn project(options: ProjectOptions) -> RoasResult<()> {
    println!("{}", "📈 ROAS Forge - Projection".bold().green());
    println!("   Ads:      {}", options.ads.display());
    println!("   Business: {}", options.business.display());
    if let Some(ref path) = options.config {
        println!("   Config:   {}", path.display());
    }

    let pipeline = build_pipeline(
        options.config.as_deref(),
        options.brands.as_deref(),
        &options.overrides,
    )?;

    if options.verbose {
        print_assumptions(pipeline.config());
    }

    let report = pipeline.run_files(&options.ads, &options.business)?;
    print_report(&report, options.weekly);

    if let Some(ref output) = options.output {
        let format = export_report(&report, output)?;
        println!(
            "\n{}",
            format!("✅ Exported {} report: {}", format, output.display())
                .bold()
                .green()
        );
    }

    Ok(())
}

fn print_assumptions(config: &ProjectionConfig) {
    println!("\n{}", "⚙️  Assumptions".bold().cyan());
    println!(
        "   ROAS uplift:   {}",
        format_value(&RowValue::Share(config.roas_uplift_fraction))
    );
    println!(
        "   Organic lift:  {}",
        format_value(&RowValue::Share(config.organic_lift_fraction))
    );
    println!(
        "   Spend growth:  {}",
        format_value(&RowValue::Share(config.spend_growth_fraction))
    );
    println!(
        "   Organic cap:   {}",
        format_value(&RowValue::Share(config.organic_cap))
    );
    let weights: Vec<String> = config
        .weekly_weights
        .weights()
        .iter()
        .map(|w| format_number(*w))
        .collect();
    println!("   Weekly split:  [{}]", weights.join(", "));
    println!("   Traffic:       {}", config.project_traffic);
}

/// Current, projection (and optionally weekly) tables plus warnings.
pub fn print_report(report: &ProjectionReport, weekly: bool) {
    let current: Vec<TableRow> = report
        .current
        .iter()
        .chain(std::iter::once(&report.current_total))
        .map(Tabular::to_row)
        .collect();
    print_table("📊 Current Performance", &current);

    let projection: Vec<TableRow> = report
        .brands
        .iter()
        .chain(std::iter::once(&report.total))
        .map(Tabular::to_row)
        .collect();
    print_table("🎯 Monthly Projection", &projection);

    if weekly {
        let rows: Vec<TableRow> = report.weekly.iter().map(Tabular::to_row).collect();
        print_table("🗓️  Weekly Breakdown", &rows);
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "⚠️  Warnings".bold().yellow());
        for warning in &report.warnings {
            println!("   {}", warning.to_string().yellow());
        }
    }
}

/// Execute the classify command
pub fn classify(
    ads: PathBuf,
    business: PathBuf,
    config: Option<PathBuf>,
    brands: Option<PathBuf>,
    verbose: bool,
) -> RoasResult<()> {
    println!("{}", "🏷️  ROAS Forge - Brand Attribution".bold().green());
    println!("   Ads:      {}", ads.display());
    println!("   Business: {}", business.display());

    let pipeline = build_pipeline(
        config.as_deref(),
        brands.as_deref(),
        &ConfigOverrides::default(),
    )?;
    let outcome = pipeline.classify_files(&ads, &business)?;
    print_attribution(&outcome, verbose);
    Ok(())
}

fn print_attribution(outcome: &AggregationOutcome, verbose: bool) {
    let counts: Vec<TableRow> = outcome
        .diagnostics
        .row_counts
        .iter()
        .zip(&outcome.aggregates)
        .map(|(count, agg)| {
            TableRow::new()
                .push("Brand", RowValue::Text(format!("{} ({})", count.name, count.code)))
                .push("Ad Rows", RowValue::Count(count.ad_rows as f64))
                .push("Sales Rows", RowValue::Count(count.sales_rows as f64))
                .push("Spends", RowValue::Money(agg.spend))
                .push("Ad Sales", RowValue::Money(agg.ad_sales))
                .push("Total Sales", RowValue::Money(agg.total_sales))
        })
        .collect();
    print_table("📋 Rows per Brand", &counts);

    let diagnostics = &outcome.diagnostics;
    print_unattributed(
        "❓ Unmapped Campaigns",
        &diagnostics.unmapped_campaigns,
        verbose,
    );
    print_unattributed("❓ Other Titles", &diagnostics.other_titles, verbose);

    if diagnostics.unmapped_rows() == 0 && diagnostics.other_rows() == 0 {
        println!("\n{}", "✅ Every row matched a brand".bold().green());
    }
}

/// Largest first; only the top ten unless `all`.
fn print_unattributed(title: &str, labels: &[UnattributedLabel], all: bool) {
    if labels.is_empty() {
        return;
    }
    let mut sorted: Vec<&UnattributedLabel> = labels.iter().collect();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    let shown = if all { sorted.len() } else { sorted.len().min(10) };

    let rows: Vec<TableRow> = sorted[..shown].iter().map(|l| l.to_row()).collect();
    print_table(title, &rows);
    if shown < sorted.len() {
        println!(
            "   {} more (use --verbose to list all)",
            sorted.len() - shown
        );
    }
}

/// Execute the brands command
pub fn brands(config: Option<PathBuf>, brands: Option<PathBuf>) -> RoasResult<()> {
    let (_, catalog) = load_settings(config.as_deref(), brands.as_deref())?;

    println!("{}", "🏷️  ROAS Forge - Brand Catalog".bold().green());
    println!("   {} brands, matched in this order:\n", catalog.len());
    for (idx, brand) in catalog.iter().enumerate() {
        println!(
            "   {}. {} {}",
            idx + 1,
            brand.code.bright_blue().bold(),
            brand.name
        );
        println!("      prefixes: {}", brand.prefixes.join(", "));
        if !brand.keywords.is_empty() {
            println!("      keywords: {}", brand.keywords.join(", "));
        }
    }
    Ok(())
}

/// Execute the validate command
pub fn validate(files: Vec<PathBuf>) -> RoasResult<()> {
    println!("{}", "✅ Validating configuration".bold().green());

    let mut failed = 0;
    for file in &files {
        match load_config(file) {
            Ok(config) => {
                let brands = config
                    .brands
                    .as_ref()
                    .map(|b| format!("{} brands", b.len()))
                    .unwrap_or_else(|| "bundled brands".to_string());
                println!("   {} {} ({})", "✅".green(), file.display(), brands);
                if config.projection.has_degenerate_cap() {
                    println!(
                        "      {}",
                        "⚠️  organic_cap of 1 lets the paid share reach 0".yellow()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                println!("   {} {}", "❌".red(), file.display());
                println!("      {}", e.to_string().red());
            }
        }
    }

    println!();
    if failed == 0 {
        println!("{}", "✅ All configuration files are valid!".bold().green());
        Ok(())
    } else {
        Err(RoasError::Validation(format!(
            "{} of {} configuration file(s) failed validation",
            failed,
            files.len()
        )))
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
