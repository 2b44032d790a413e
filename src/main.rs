use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use astrocalc::config::LoggingConfig;
use astrocalc::display::{self, render, render_error};
use astrocalc::{
    AppError, AstroApi, AstroApiClient, AstroCalcConfig, CalculationKind, CalculationResult,
    FormData, Geocoder, GeocodingClient, HoroscopeService, InputMode, Language, LocationForm,
    MonthMoonPhasesFormData, MonthMoonPhasesService, TransitFormData, TransitService,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "astrocalc",
    version,
    about = "Horoscope, aspects, moon phase and planet transit calculations"
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/astrocalc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Display language: en or it
    #[arg(long, global = true)]
    lang: Option<Language>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Planet and house positions with the Lenormand card
    Horoscope(BirthArgs),
    /// Aspects between the planets
    Aspects(BirthArgs),
    /// Moon phase at the given instant
    MoonPhase(BirthArgs),
    /// Angle crossings of a planet during one month
    Transit(TransitArgs),
    /// Moon phase of every day of a month
    MonthPhases(MonthArgs),
    /// Look up the coordinates of a city
    Geocode { city: String },
}

#[derive(Args, Debug)]
struct LocationArgs {
    /// City name, geocoded before the calculation
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    city: Option<String>,
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<String>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<String>,
}

#[derive(Args, Debug)]
struct BirthArgs {
    /// Date as YYYY-MM-DD
    #[arg(long, required_unless_present = "now")]
    date: Option<String>,
    /// Time as HH:MM
    #[arg(long, required_unless_present = "now")]
    time: Option<String>,
    /// Use the current local date and time
    #[arg(long, conflicts_with_all = ["date", "time"])]
    now: bool,
    #[command(flatten)]
    location: LocationArgs,
    /// Timezone offset in hours
    #[arg(long, allow_hyphen_values = true, value_parser = parse_offset)]
    tz: Option<f64>,
}

#[derive(Args, Debug)]
struct TransitArgs {
    #[arg(long, required_unless_present = "now")]
    year: Option<String>,
    #[arg(long, required_unless_present = "now")]
    month: Option<String>,
    /// Use the current year and month
    #[arg(long, conflicts_with_all = ["year", "month"])]
    now: bool,
    #[arg(long)]
    planet: String,
    #[command(flatten)]
    location: LocationArgs,
    #[arg(long, allow_hyphen_values = true, value_parser = parse_offset)]
    tz: Option<f64>,
    /// Sampling step in minutes
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1440))]
    step: Option<u32>,
}

#[derive(Args, Debug)]
struct MonthArgs {
    #[arg(long)]
    year: String,
    #[arg(long)]
    month: String,
}

fn parse_offset(value: &str) -> Result<f64, String> {
    let offset: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(-12.0..=14.0).contains(&offset) {
        return Err("timezone offset must be between -12 and 14 hours".to_string());
    }
    Ok(offset)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let json = cli.json;
    let config = match AstroCalcConfig::load_from_path(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e, json);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    let language = match cli.lang {
        Some(language) => language,
        None => config.defaults.language.parse().unwrap_or_default(),
    };

    match run(cli.command, &config, language, json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},astrocalc={level}")))
        .with_context(|| format!("Invalid log level '{level}'"))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install JSON log subscriber")?;
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install log subscriber")?;
    }

    debug!("Logging initialized at level {}", level);
    Ok(())
}

async fn run(
    command: Commands,
    config: &AstroCalcConfig,
    language: Language,
    json: bool,
) -> astrocalc::Result<()> {
    let api: Arc<dyn AstroApi> = Arc::new(AstroApiClient::new(config.api.clone())?);
    let geocoder: Arc<dyn Geocoder> = Arc::new(GeocodingClient::new(&config.geocoding)?);
    let defaults = &config.defaults;
    let offset = defaults.timezone_offset_hours;

    let result = match command {
        Commands::Horoscope(args) => {
            run_birth(CalculationKind::Horoscope, args, api, geocoder, offset).await?
        }
        Commands::Aspects(args) => {
            run_birth(CalculationKind::Aspects, args, api, geocoder, offset).await?
        }
        Commands::MoonPhase(args) => {
            run_birth(CalculationKind::MoonPhase, args, api, geocoder, offset).await?
        }
        Commands::Transit(args) => {
            let mut service = TransitService::new(
                api,
                geocoder,
                args.tz.unwrap_or(offset),
                args.step.unwrap_or(defaults.step_minutes),
            );
            let mut form: LocationForm<TransitFormData> = LocationForm::new();
            if args.now {
                form.fill_current_date_time(Local::now().naive_local());
            } else {
                form.set_field("year", args.year.unwrap_or_default())?;
                form.set_field("month", args.month.unwrap_or_default())?;
            }
            form.set_field("planet", args.planet)?;
            apply_location(&mut form, args.location)?;
            service.calculate_transits(&form).await?
        }
        Commands::MonthPhases(args) => {
            let mut service = MonthMoonPhasesService::new(api);
            let form = MonthMoonPhasesFormData {
                year: args.year,
                month: args.month,
            };
            service.calculate_month_moon_phases(&form).await?
        }
        Commands::Geocode { city } => {
            let mut service = HoroscopeService::new(api, geocoder, offset);
            let mut form: LocationForm<FormData> = LocationForm::new();
            form.set_field("city", city)?;
            let found = service.search_city(&mut form).await?;
            if json {
                print_json(&found);
            } else {
                println!("{}", display::render_geocoding(&found, language));
            }
            return Ok(());
        }
    };

    print_result(&result, language, json);
    Ok(())
}

async fn run_birth(
    kind: CalculationKind,
    args: BirthArgs,
    api: Arc<dyn AstroApi>,
    geocoder: Arc<dyn Geocoder>,
    default_offset: f64,
) -> astrocalc::Result<CalculationResult> {
    let mut service = HoroscopeService::new(api, geocoder, args.tz.unwrap_or(default_offset));
    let mut form: LocationForm<FormData> = LocationForm::new();
    if args.now {
        form.fill_current_date_time(Local::now().naive_local());
    } else {
        form.set_field("date", args.date.unwrap_or_default())?;
        form.set_field("time", args.time.unwrap_or_default())?;
    }
    apply_location(&mut form, args.location)?;
    service.calculate(kind, &form).await
}

fn apply_location<F>(form: &mut LocationForm<F>, location: LocationArgs) -> Result<(), AppError>
where
    F: astrocalc::models::LocationFields + Default,
{
    if let (Some(lat), Some(lon)) = (location.lat, location.lon) {
        form.switch_input_mode(InputMode::Coordinates);
        form.update_coordinates(lat, lon);
    } else {
        form.switch_input_mode(InputMode::City);
        form.set_field("city", location.city.unwrap_or_default())?;
    }
    Ok(())
}

fn print_result(result: &CalculationResult, language: Language, json: bool) {
    if json {
        print_json(result);
    } else {
        println!("{}", render(result, language));
    }
}

fn print_error(error: &AppError, json: bool) {
    if json {
        print_json(error);
    } else {
        eprintln!("{}", render_error(error));
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to serialize output: {e}"),
    }
}
