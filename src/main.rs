use anyhow::{bail, Context};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use gig_wizard::config::cli::{Command, LocationTimeArgs, SignUpArgs};
use gig_wizard::core::autocomplete::SuggestionFeed;
use gig_wizard::core::compensation;
use gig_wizard::core::labels::LabelPicker;
use gig_wizard::core::reconciler::ReviewOrigin;
use gig_wizard::core::schedule::{city_from_time_zone, offset_label, Schedule};
use gig_wizard::core::sequencer::compute_redirect;
use gig_wizard::core::signup::{validate_sign_up, SubmitFailure};
use gig_wizard::core::validators::{StepForm, StepInput};
use gig_wizard::domain::model::{Geolocation, GigDraft, GigLocation, SignUpInput, Venue};
use gig_wizard::domain::ports::{Clock, SystemClock};
use gig_wizard::domain::steps::{GigStep, GIG_STEPS};
use gig_wizard::utils::error::{ErrorSeverity, WizardError};
use gig_wizard::utils::{logger, validation::Validate};
use gig_wizard::{
    ApiClient, AppConfig, CliConfig, DraftStore, FileStorage, GigWizard, MemoryStorage,
    PlacesClient, Reconciliation, ReviewReconciler, RoleSession, SignUpFlow, SignUpOutcome,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = load_config(&cli);
    let level = config.as_ref().ok().and_then(|c| c.log_level());

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }

    tracing::info!("Starting gig-wizard CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &config).await {
        match e.downcast_ref::<WizardError>() {
            Some(err) => {
                tracing::error!(
                    "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 建議: {}", err.recovery_suggestion());

                // 根據錯誤嚴重程度決定退出碼
                let exit_code = match err.severity() {
                    ErrorSeverity::Low => 1,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                std::process::exit(exit_code);
            }
            None => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

fn load_config(cli: &CliConfig) -> gig_wizard::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Status => show_status(config),
        Command::Title { title } => run_step(config, GigStep::Title, |_, _| StepInput::Title(title)),
        Command::Description { description } => {
            run_step(config, GigStep::Description, |_, _| {
                StepInput::Description(description)
            })
        }
        Command::Labels { labels } => run_step(config, GigStep::Labels, |_, _| {
            StepInput::Labels(LabelPicker::from_selected(&labels).selected())
        }),
        Command::LocationTime(args) => {
            run_step(config, GigStep::LocationTime, |initial, now| {
                location_time_input(initial, args, now)
            })
        }
        Command::Compensation { amount } => run_step(config, GigStep::Compensation, |_, _| {
            StepInput::Compensation(compensation::sanitize(&amount))
        }),
        Command::Back { from } => {
            let mut wizard = open_wizard(config);
            let step = GigStep::from(from);
            if let Some(route) = wizard.enter_step(step).target() {
                println!("↩️  {} is not reachable yet, continue at {}", step, route);
                return Ok(());
            }
            match wizard.go_back().target() {
                Some(route) => println!("⬅️  Back to {}", route),
                None => println!("Already at the first step"),
            }
            Ok(())
        }
        Command::Review { id } => review(config, id.as_deref()).await,
        Command::Reset => {
            open_wizard(config).discard();
            println!("🗑️  Draft discarded");
            Ok(())
        }
        Command::SignUp(args) => sign_up(config, args).await,
        Command::Suggest { input } => suggest(config, &input).await,
    }
}

fn open_wizard(config: &AppConfig) -> GigWizard<FileStorage> {
    let store = DraftStore::new(FileStorage::new(&config.storage.data_dir));
    GigWizard::with_key(store, config.storage.draft_key.clone())
}

fn run_step<F>(config: &AppConfig, step: GigStep, edit: F) -> anyhow::Result<()>
where
    F: FnOnce(StepInput, DateTime<FixedOffset>) -> StepInput,
{
    let now = SystemClock.now();
    let mut wizard = open_wizard(config);

    if let Some(route) = wizard.enter_step(step).target() {
        println!("↩️  Finish the earlier steps first: {}", route);
        bail!("{} is not reachable yet", step);
    }

    let (current, total) = wizard.progress();
    println!("Step {} of {}: {}", current, total, step);

    let form = StepForm::new(edit(wizard.initial_input(step, now), now), now);
    let validated = match form.submit() {
        Ok(validated) => validated,
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  ✗ {}: {}", field.key(), message);
            }
            bail!("{} has invalid input", step);
        }
    };

    let next = wizard.submit_step(validated);
    println!("✅ {} saved", step);
    if let Some(route) = next.target() {
        println!("➡️  Next: {} ({})", step.next_screen_name(), route);
    }
    Ok(())
}

fn location_time_input(
    initial: StepInput,
    args: LocationTimeArgs,
    now: DateTime<FixedOffset>,
) -> StepInput {
    let mut input = match initial {
        StepInput::LocationTime(input) => input,
        other => return other,
    };

    if args.is_virtual {
        input.location = Some(GigLocation::Virtual);
    } else if let Some(name) = args.venue_name {
        input.location = Some(GigLocation::Physical {
            venue: Venue {
                place_id: args.place_id.unwrap_or_default(),
                name,
                address: args.address.unwrap_or_default(),
                location: Geolocation {
                    country: args.country.unwrap_or_default(),
                    state_region: args.state.unwrap_or_default(),
                    city: args.city.unwrap_or_default(),
                },
            },
        });
    }

    let defaults = Schedule::default_for(now);
    let mut schedule = Schedule {
        start: input.start.unwrap_or(defaults.start),
        end: input.end.unwrap_or(defaults.end),
    };
    if let Some(start) = args.start {
        schedule.pick_start(start, now);
    }
    if let Some(end) = args.end {
        schedule.pick_end(end);
    }
    input.start = Some(schedule.start);
    input.end = Some(schedule.end);

    if let Some(time_zone) = args.time_zone {
        input.time_zone = time_zone;
    } else if input.time_zone.is_empty() {
        input.time_zone = std::env::var("TZ").unwrap_or_else(|_| "UTC".to_string());
    }

    StepInput::LocationTime(input)
}

fn show_status(config: &AppConfig) -> anyhow::Result<()> {
    let wizard = open_wizard(config);
    let draft = wizard.draft();

    if draft.is_empty() {
        println!("No draft in progress");
    } else {
        println!("{}", serde_json::to_string_pretty(draft)?);
    }

    match compute_redirect(&GIG_STEPS, GigStep::SCREEN_COUNT, draft) {
        Some(route) => println!("➡️  Continue at {}", route),
        None => println!("✅ Ready for review"),
    }
    Ok(())
}

async fn review(config: &AppConfig, id: Option<&str>) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api.base_url, config.timeout())?;
    let store = DraftStore::new(FileStorage::new(&config.storage.data_dir));
    let clock = SystemClock;

    let outcome = ReviewReconciler::new(&store, &api, &clock)
        .with_key(config.storage.draft_key.clone())
        .reconcile(id)
        .await?;

    match outcome {
        Reconciliation::Review(review) => {
            if let ReviewOrigin::Remote(id) = &review.origin {
                println!("Gig {}", id);
            }
            print_gig(&review.gig);
        }
        Reconciliation::Redirect { route, issues } => {
            for (field, message) in issues.iter() {
                eprintln!("  ✗ {}: {}", field.key(), message);
            }
            println!("↩️  Continue at {}", route);
        }
    }
    Ok(())
}

fn print_gig(gig: &GigDraft) {
    println!("Title:        {}", gig.title.as_deref().unwrap_or("-"));
    println!("Description:  {}", gig.description.as_deref().unwrap_or("-"));
    println!("Labels:       {}", gig.labels.as_deref().unwrap_or_default().join(", "));

    match &gig.location {
        Some(GigLocation::Virtual) => println!("Location:     Virtual"),
        Some(GigLocation::Physical { venue }) => {
            println!("Location:     {}, {}", venue.name, venue.address)
        }
        None => println!("Location:     -"),
    }

    if let (Some(start), Some(end)) = (gig.start_date_time, gig.end_date_time) {
        let zone = gig
            .time_zone
            .as_deref()
            .map(city_from_time_zone)
            .unwrap_or_default();
        println!(
            "Schedule:     {} - {} ({} {})",
            start.format("%a %b %-d, %Y %H:%M"),
            end.format("%a %b %-d, %Y %H:%M"),
            offset_label(start.offset()),
            zone
        );
    }

    if let Some(amount) = gig.compensation {
        println!("Compensation: ${}", compensation::format(amount));
    }
}

async fn sign_up(config: &AppConfig, args: SignUpArgs) -> anyhow::Result<()> {
    let api = ApiClient::new(&config.api.base_url, config.timeout())?;
    let flow = SignUpFlow::new(RoleSession::new(MemoryStorage::new()), api);

    flow.choose_role(args.role);
    if let Some(route) = flow.enter_form().target() {
        bail!("Choose a role first ({})", route);
    }

    let input = SignUpInput {
        full_name: args.full_name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        location: Geolocation {
            country: args.country,
            state_region: args.state,
            city: args.city,
        },
        terms_agreed: args.agree_terms,
    };

    let form = match validate_sign_up(&input) {
        Ok(form) => form,
        Err(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("  ✗ {}: {}", field.path(), message);
            }
            bail!("Sign-up form has invalid input");
        }
    };

    match flow.submit(&form).await {
        SignUpOutcome::Registered { message } => {
            println!("✅ {}", message);
            Ok(())
        }
        SignUpOutcome::Rejected(SubmitFailure::Fields(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("  ✗ {}: {}", field.path(), message);
            }
            bail!("Registration was rejected");
        }
        SignUpOutcome::Rejected(SubmitFailure::Notice(message)) => bail!(message),
        SignUpOutcome::Redirect(route) => bail!("Choose a role first ({})", route),
    }
}

async fn suggest(config: &AppConfig, input: &str) -> anyhow::Result<()> {
    let places = config
        .places
        .as_ref()
        .ok_or_else(|| WizardError::MissingConfigError {
            field: "places.api_key".to_string(),
        })?;
    let client = PlacesClient::new(&places.api_key, places.endpoint.clone(), config.timeout())
        .context("Failed to build places client")?;

    let mut feed = SuggestionFeed::new();
    let suggestions = feed.refresh(&client, input).await;
    if suggestions.is_empty() {
        println!("No places found");
    }
    for suggestion in suggestions {
        println!("📍 {}  [{}]", suggestion.text, suggestion.place_id);
    }
    Ok(())
}
