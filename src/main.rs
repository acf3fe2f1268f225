use clap::{Parser, Subcommand};
use roas_forge::cli::{self, ConfigOverrides, ProjectOptions};
use roas_forge::error::RoasResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roas-forge")]
#[command(about = "Brand attribution and ROAS projection for ads + business reports.")]
#[command(long_about = "ROAS Forge - brand attribution and growth projection

Reads an advertising report (campaign, spend, ad sales, impressions, clicks)
and a business report (title, total sales), attributes every row to a brand,
and projects next month's spend, ROAS, organic share and overall revenue.

COMMANDS:
  project   - Current performance + monthly/weekly projection
  classify  - Attribute rows to brands and list what matched nothing
  brands    - Show the active brand catalog
  validate  - Check configuration files

EXAMPLES:
  roas-forge project ads.csv business.csv
  roas-forge project ads.xlsx business.xlsx --roas-uplift 0.3 --weekly -o plan.xlsx
  roas-forge classify ads.csv business.csv --verbose
  roas-forge validate projection.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Project the next period from two reports.

STEPS:
  1. Read both reports (.csv, .xlsx, .xls, .ods)
  2. Attribute campaigns by prefix and titles by keyword
  3. Sum per brand, compute current ROAS / ACOS / T-ACOS / organic share
  4. Apply the uplift assumptions and split the month into weeks

ASSUMPTIONS (flags override the config file):
  --roas-uplift 0.20     ROAS x 1.20
  --organic-lift 0.05    organic share + 5 points
  --spend-growth 0.0     spend unchanged
  --organic-cap 0.95     organic share never above 95%
  --weights uniform      or front_loaded, or 0.3,0.2,0.2,0.2,0.1

OUTPUT:
  -o plan.xlsx | plan.yaml | plan.json")]
    /// Project spend and revenue for the next period
    Project {
        /// Advertising report (campaign rows)
        ads: PathBuf,

        /// Business report (product rows)
        business: PathBuf,

        /// Configuration file (YAML)
        #[arg(short, long, env = "ROAS_FORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Brand catalog file (YAML with a `brands:` list)
        #[arg(short, long)]
        brands: Option<PathBuf>,

        /// Proportional ROAS uplift (0.20 = +20%)
        #[arg(long, allow_negative_numbers = true)]
        roas_uplift: Option<f64>,

        /// Additive organic share lift (0.05 = +5 points)
        #[arg(long, allow_negative_numbers = true)]
        organic_lift: Option<f64>,

        /// Proportional spend growth (0.10 = +10%)
        #[arg(long, allow_negative_numbers = true)]
        spend_growth: Option<f64>,

        /// Maximum projected organic share
        #[arg(long)]
        organic_cap: Option<f64>,

        /// Weekly split: uniform, front_loaded or comma-separated fractions
        #[arg(short, long)]
        weights: Option<String>,

        /// Skip the impressions / clicks projection
        #[arg(long)]
        no_traffic: bool,

        /// Also print the weekly breakdown
        #[arg(long)]
        weekly: bool,

        /// Export the result (.xlsx, .yaml or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show assumptions and progress logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Attribute report rows to brands without projecting
    Classify {
        /// Advertising report (campaign rows)
        ads: PathBuf,

        /// Business report (product rows)
        business: PathBuf,

        /// Configuration file (YAML)
        #[arg(short, long, env = "ROAS_FORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Brand catalog file (YAML with a `brands:` list)
        #[arg(short, long)]
        brands: Option<PathBuf>,

        /// List every unattributed label and show progress logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the active brand catalog
    Brands {
        /// Configuration file (YAML)
        #[arg(short, long, env = "ROAS_FORGE_CONFIG")]
        config: Option<PathBuf>,

        /// Brand catalog file (YAML with a `brands:` list)
        #[arg(short, long)]
        brands: Option<PathBuf>,
    },

    #[command(long_about = "Validate configuration files.

Each file is checked against the JSON Schema, then semantically:
fractions finite, spend growth >= -1, organic cap within [0, 1],
weekly weights non-negative and summing to 1, brand codes unique.

BATCH VALIDATION:
  roas-forge validate a.yaml b.yaml c.yaml")]
    /// Validate configuration files
    Validate {
        /// Path to YAML file(s) to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> RoasResult<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Project { verbose, .. } | Commands::Classify { verbose, .. } => *verbose,
        _ => false,
    };
    cli::init_tracing(verbose);

    match cli.command {
        Commands::Project {
            ads,
            business,
            config,
            brands,
            roas_uplift,
            organic_lift,
            spend_growth,
            organic_cap,
            weights,
            no_traffic,
            weekly,
            output,
            verbose,
        } => cli::project(ProjectOptions {
            ads,
            business,
            config,
            brands,
            overrides: ConfigOverrides {
                roas_uplift,
                organic_lift,
                spend_growth,
                organic_cap,
                weights,
                no_traffic,
            },
            weekly,
            output,
            verbose,
        }),

        Commands::Classify {
            ads,
            business,
            config,
            brands,
            verbose,
        } => cli::classify(ads, business, config, brands, verbose),

        Commands::Brands { config, brands } => cli::brands(config, brands),

        Commands::Validate { files } => cli::validate(files),
    }
}
