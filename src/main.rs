use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use zenclock_alarm::{AlarmBook, AlarmStore, Siren, SirenPattern};
use zenclock_core::{App, AppError, Config, ConfigError};
use zenclock_desk::render::render_alarms;
use zenclock_desk::{runner, Background, DeskClock, WeatherService};
use zenclock_weather::{get_current_location, WeatherResolver};

/// Full-screen desk clock for the terminal
#[derive(Parser)]
#[command(name = "zenclock", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the clock (default)
    Run {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Manage alarms without starting the clock
    Alarm {
        #[command(subcommand)]
        action: AlarmAction,
    },
    /// Look up the weather once and print it
    Weather {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Print a fresh background image URL
    Background,
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Default)]
struct LocationArgs {
    /// Latitude override
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,
    /// Longitude override
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,
}

impl LocationArgs {
    fn apply(&self, config: &mut Config) {
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lon) {
            config.location.latitude = Some(latitude);
            config.location.longitude = Some(longitude);
        }
    }
}

#[derive(Subcommand)]
enum AlarmAction {
    /// Add an alarm at HH:MM
    Add {
        time: String,
        #[arg(short, long)]
        label: Option<String>,
    },
    /// List alarms in time order
    List,
    /// Enable or disable an alarm by id (or unique id prefix)
    Toggle { id: String },
    /// Delete an alarm by id (or unique id prefix)
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the configuration file
    Check,
    /// Print the configuration file path
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    zenclock_core::init()?;

    match cli.command.unwrap_or(Commands::Run {
        location: LocationArgs::default(),
    }) {
        Commands::Run { location } => run_clock(location),
        Commands::Alarm { action } => alarm(action),
        Commands::Weather { location } => weather(location),
        Commands::Background => {
            let config = Config::load()?;
            let background = Background::new(&config.display);
            println!("{}", background.url_for(Local::now().timestamp_millis()));
            Ok(())
        }
        Commands::Config { action } => config_action(action),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}

fn run_clock(location: LocationArgs) -> Result<()> {
    let (mut config, _) = Config::load_validated()?;
    location.apply(&mut config);

    let runtime = runtime()?;
    let mut app = App::with_config(config);

    let siren = Siren::terminal(SirenPattern::from(&app.config().siren));
    let resolver = WeatherResolver::from_config(&app.config().weather)?;
    let (service, rx) = WeatherService::new(resolver);

    app.register(Box::new(siren.clone()));
    app.register(Box::new(service.clone()));
    app.initialize()?;

    let desk = DeskClock::new(app.config(), siren);
    tracing::info!("ZenClock started");

    let config = app.shared_config();
    let result = runtime.block_on(runner::run(desk, service, rx, &config));

    app.shutdown()?;
    result.map(|_| ())
}

fn alarm(action: AlarmAction) -> Result<()> {
    let config = Config::load()?;
    let store = AlarmStore::new(config.alarm_store_path());
    let mut book = AlarmBook::new(store.load());

    let changed = match action {
        AlarmAction::List => {
            print!("{}", render_alarms(book.alarms()));
            false
        }
        AlarmAction::Add { time, label } => {
            let alarm = book.add(&time, label)?;
            println!("Added {} ({})", alarm.time, alarm.id);
            true
        }
        AlarmAction::Toggle { id } => {
            let Some(id) = book.resolve_id(&id).map(str::to_string) else {
                bail!("No alarm matches '{}'", id);
            };
            book.toggle(&id)
        }
        AlarmAction::Delete { id } => {
            let Some(id) = book.resolve_id(&id).map(str::to_string) else {
                bail!("No alarm matches '{}'", id);
            };
            book.delete(&id)
        }
    };

    if changed {
        store.save(book.alarms()).map_err(AppError::from)?;
    }
    Ok(())
}

fn weather(location: LocationArgs) -> Result<()> {
    let mut config = Config::load()?;
    location.apply(&mut config);

    let coords = match get_current_location(&config.location) {
        Ok(coords) => coords,
        Err(e) => {
            let err = AppError::from(zenclock_weather::WeatherError::from(e));
            bail!("{}", err.user_message());
        }
    };

    let resolver = WeatherResolver::from_config(&config.weather)?;
    let data = runtime()?
        .block_on(resolver.resolve(&coords))
        .map_err(AppError::from)?;

    println!("{}  {}  {}", data.location, data.temp, data.condition);
    println!("湿度 {}  {}", data.humidity, data.wind);
    for day in &data.forecast {
        println!("  {}  {}  {}", day.day, day.temp, day.condition);
    }
    Ok(())
}

fn config_action(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
        ConfigAction::Check => {
            let config = Config::load()?;
            let validation = config.validate();
            for warning in &validation.warnings {
                println!("warning: {}", warning);
            }
            if !validation.is_valid() {
                let err = AppError::from(ConfigError::Invalid(validation.error_summary()));
                bail!("{} ({})", err.user_message(), err);
            }
            println!("Configuration OK");
        }
    }
    Ok(())
}
