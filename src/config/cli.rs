use crate::domain::model::Role;
use crate::domain::steps::GigStep;
use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gig-wizard")]
#[command(about = "Create gigs and sign up step by step from the terminal")]
pub struct CliConfig {
    /// TOML 設定檔
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `[storage] data_dir`.
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// 以 JSON 格式輸出日誌
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the draft and the next step to fill in
    Status,
    /// Step 1: gig title
    Title { title: String },
    /// Step 2: gig description
    Description { description: String },
    /// Step 3: labels, catalog or custom
    Labels {
        #[arg(required = true)]
        labels: Vec<String>,
    },
    /// Step 4: location and schedule
    LocationTime(LocationTimeArgs),
    /// Step 5: compensation in dollars
    Compensation { amount: String },
    /// Where Back leads from a step
    Back {
        #[arg(value_enum)]
        from: StepArg,
    },
    /// Review the local draft, or an existing gig by id
    Review {
        #[arg(long)]
        id: Option<String>,
    },
    /// Discard the local draft
    Reset,
    /// Register a new account
    SignUp(SignUpArgs),
    /// Look up place suggestions for a venue
    Suggest { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StepArg {
    Title,
    Description,
    Labels,
    LocationTime,
    Compensation,
}

impl From<StepArg> for GigStep {
    fn from(arg: StepArg) -> Self {
        match arg {
            StepArg::Title => GigStep::Title,
            StepArg::Description => GigStep::Description,
            StepArg::Labels => GigStep::Labels,
            StepArg::LocationTime => GigStep::LocationTime,
            StepArg::Compensation => GigStep::Compensation,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct LocationTimeArgs {
    /// Online gig; venue flags are ignored
    #[arg(long = "virtual")]
    pub is_virtual: bool,

    #[arg(long)]
    pub place_id: Option<String>,
    #[arg(long)]
    pub venue_name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub city: Option<String>,

    /// RFC 3339, e.g. 2026-10-20T09:00:00+03:00
    #[arg(long)]
    pub start: Option<DateTime<FixedOffset>>,
    #[arg(long)]
    pub end: Option<DateTime<FixedOffset>>,

    /// IANA name, e.g. Africa/Nairobi
    #[arg(long)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SignUpArgs {
    #[arg(long)]
    pub role: Role,
    #[arg(long)]
    pub full_name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long)]
    pub agree_terms: bool,
}
