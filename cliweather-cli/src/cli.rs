use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cliweather_core::{
    Config, DisplayOptions, ForecastRequest, Renderer, config::MIN_DAYS, provider::weatherapi,
    provider_from_config,
};
use inquire::{
    CustomType, CustomUserError, Password, PasswordDisplayMode, Text, validator::Validation,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cliweather", version, about = "Simple, practical weather CLI")]
pub struct Cli {
    /// Disable ANSI colors in the output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable emoji in the output.
    #[arg(long, global = true)]
    pub no_emoji: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather forecast.
    Forecast(ForecastArgs),

    /// Interactively store the API key and defaults in the config file.
    Configure,

    /// Print the binary version.
    Version,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ForecastArgs {
    /// City name or query [default: Vigo, or the configured city].
    #[arg(short, long)]
    pub city: Option<String>,

    /// Forecast days (1-3 on the free tier).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Language code, e.g. es, en, fr.
    #[arg(short, long)]
    pub lang: Option<String>,

    /// WeatherAPI key (or set WEATHER_API_KEY).
    #[arg(long)]
    pub apikey: Option<String>,

    /// Log request details and dump the decoded forecast.
    #[arg(long)]
    pub debug: bool,

    /// Show only this forecast day (0..days-1).
    #[arg(long)]
    pub day_index: Option<usize>,

    /// Print the decoded forecast as indented JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Ask the API for air quality data.
    #[arg(long)]
    pub aqi: bool,

    /// Ask the API for weather alerts.
    #[arg(long)]
    pub alerts: bool,
}

impl ForecastArgs {
    /// Flags win over config file and environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(city) = &self.city {
            config.city = city.clone();
        }
        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(lang) = &self.lang {
            config.language = lang.clone();
        }
        if let Some(key) = &self.apikey {
            config.api_key = Some(key.clone());
        }
    }
}

impl Cli {
    pub fn debug(&self) -> bool {
        matches!(&self.command, Command::Forecast(args) if args.debug)
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            color: !self.no_color && !no_color_env() && io::stdout().is_terminal(),
            emoji: !self.no_emoji,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let options = self.display_options();

        match self.command {
            Command::Forecast(args) => forecast(&args, options).await,
            Command::Configure => configure(),
            Command::Version => {
                println!("cliweather {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

async fn forecast(args: &ForecastArgs, options: DisplayOptions) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    args.apply(&mut config);
    tracing::debug!(
        city = %config.city,
        days = config.days,
        lang = %config.language,
        timeout_secs = config.timeout_secs,
        "configuration resolved"
    );

    let provider = provider_from_config(&config)?;
    let request = ForecastRequest {
        air_quality: args.aqi,
        alerts: args.alerts,
        ..ForecastRequest::from_config(config.city.clone(), &config)
    };

    let snapshot = provider.forecast(&request).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.debug {
        writeln!(out, "{snapshot:#?}\n")?;
    }

    if args.json {
        weatherapi::encode_pretty(&mut out, &snapshot).context("Failed to write forecast JSON")?;
        writeln!(out)?;
        return Ok(());
    }

    let renderer = Renderer::new(options);

    if snapshot.forecast_days.is_empty() {
        renderer.render_all(&snapshot, &mut out)?;
        return Ok(());
    }

    renderer.render_header(&snapshot, &mut out)?;
    match args.day_index {
        Some(index) => {
            renderer.render_day(&snapshot, index, snapshot.forecast_days.len(), &mut out)?
        }
        None => renderer.render_all(&snapshot, &mut out)?,
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    config.language = Text::new("Language:").with_default(&config.language).prompt()?;
    config.city = Text::new("Default city:").with_default(&config.city).prompt()?;
    config.days = CustomType::<u32>::new("Forecast days:")
        .with_default(config.days)
        .with_error_message("Please enter a whole number of days")
        .with_validator(validate_days)
        .prompt()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn validate_days(days: &u32) -> Result<Validation, CustomUserError> {
    if *days >= MIN_DAYS {
        Ok(Validation::Valid)
    } else {
        Ok(Validation::Invalid("At least one forecast day is required".into()))
    }
}

/// https://no-color.org/
fn no_color_env() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}
