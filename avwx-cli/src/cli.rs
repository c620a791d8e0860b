use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Text};
use log::debug;

use avwx_core::{
    AvwxClient, Config, Error, MetarOptions, OutputFormat, RequestDefaults, StationQuery,
    TafOptions, TimeEncoding, TimeType, Transport, parse_timestamp,
};

use crate::output::{print_block, project};

const STATION_HELP: &str = "Station tokens: ICAO ids (KORD), prefixes (PH*), \
                            states/provinces (@il) or countries (~au)";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "avwx",
    version,
    about = "A simple tool to access METAR and TAF data.",
    long_about = "Access aviation weather data (METARs, TAFs) provided by the \
                  Aviation Weather Center's Text Data Server."
)]
pub struct Cli {
    /// Server endpoint, overriding the config file.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Get METAR data.
    Metar(MetarArgs),

    /// Get TAF data.
    Taf(TafArgs),

    /// Interactively edit the endpoint, timeout and request defaults.
    Configure,
}

/// Filters shared by `metar` and `taf`.
///
/// Flags left off the command line stay absent from the request; boolean
/// flags given without a value mean `true`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(value_name = "STATION", help = STATION_HELP)]
    pub station_args: Vec<String>,

    /// Comma-separated station tokens, combined with the positional ones.
    #[arg(long = "stations", value_delimiter = ',')]
    pub stations: Vec<String>,

    /// ISO-8601 start of the time window, e.g. 2024-03-01T06:00:00Z.
    #[arg(long = "startTime", value_parser = parse_time)]
    pub start_time: Option<DateTime<Utc>>,

    /// ISO-8601 end of the time window.
    #[arg(long = "endTime", value_parser = parse_time)]
    pub end_time: Option<DateTime<Utc>>,

    #[arg(long = "hoursBeforeNow")]
    pub hours_before_now: Option<u32>,

    #[arg(
        long = "mostRecent",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub most_recent: Option<bool>,

    #[arg(
        long = "mostRecentForEachStation",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub most_recent_for_each_station: Option<bool>,

    #[arg(long = "minLat", allow_negative_numbers = true)]
    pub min_lat: Option<f64>,

    #[arg(long = "maxLat", allow_negative_numbers = true)]
    pub max_lat: Option<f64>,

    #[arg(long = "minLon", allow_negative_numbers = true)]
    pub min_lon: Option<f64>,

    #[arg(long = "maxLon", allow_negative_numbers = true)]
    pub max_lon: Option<f64>,

    /// Radius and center, e.g. "20;-104.65,39.83".
    #[arg(long = "radialDistance", allow_hyphen_values = true)]
    pub radial_distance: Option<String>,

    /// Comma-separated waypoints.
    #[arg(long = "flightPath", value_delimiter = ',', allow_hyphen_values = true)]
    pub flight_path: Option<Vec<String>>,

    #[arg(long = "minDegreeDistance")]
    pub min_degree_distance: Option<f64>,

    /// Comma-separated response fields to return.
    #[arg(long = "fields", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
}

impl QueryArgs {
    /// Build the request filters, then fill configured defaults into the
    /// fields that were not given.
    pub fn into_query(self, defaults: &RequestDefaults) -> Result<StationQuery, Error> {
        let mut stations = self.station_args;
        stations.extend(self.stations);

        let mut query = StationQuery {
            stations: (!stations.is_empty()).then_some(stations),
            start_time: self.start_time,
            end_time: self.end_time,
            hours_before_now: self.hours_before_now,
            most_recent: self.most_recent,
            most_recent_for_each_station: self.most_recent_for_each_station,
            min_lat: self.min_lat,
            max_lat: self.max_lat,
            min_lon: self.min_lon,
            max_lon: self.max_lon,
            radial_distance: self.radial_distance,
            flight_path: self.flight_path,
            min_degree_distance: self.min_degree_distance,
            fields: self.fields,
        };

        if !query.has_stations() && !query.has_spatial_filter() {
            return Err(Error::Configuration(
                "At least one station must be specified.".to_string(),
            ));
        }

        query.validate()?;

        if let (Some(start), Some(end)) = (query.start_time, query.end_time) {
            if start > end {
                return Err(Error::Configuration(format!(
                    "startTime {start} is after endTime {end}"
                )));
            }
        }

        defaults.apply(&mut query);
        Ok(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetarOutput {
    #[value(name = "rawtextonly")]
    RawTextOnly,
    Json,
    JsonPretty,
}

impl From<MetarOutput> for OutputFormat {
    fn from(value: MetarOutput) -> Self {
        match value {
            MetarOutput::RawTextOnly => OutputFormat::RawText,
            MetarOutput::Json => OutputFormat::Json,
            MetarOutput::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TafOutput {
    #[value(name = "rawtextonly")]
    RawTextOnly,
    #[value(name = "rawtextonly-pretty")]
    RawTextOnlyPretty,
    Json,
    JsonPretty,
}

impl From<TafOutput> for OutputFormat {
    fn from(value: TafOutput) -> Self {
        match value {
            TafOutput::RawTextOnly => OutputFormat::RawText,
            TafOutput::RawTextOnlyPretty => OutputFormat::RawTextPretty,
            TafOutput::Json => OutputFormat::Json,
            TafOutput::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeTypeArg {
    Valid,
    Issue,
}

impl From<TimeTypeArg> for TimeType {
    fn from(value: TimeTypeArg) -> Self {
        match value {
            TimeTypeArg::Valid => TimeType::Valid,
            TimeTypeArg::Issue => TimeType::Issue,
        }
    }
}

#[derive(Debug, Args)]
pub struct MetarArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[arg(long, value_enum, default_value_t = MetarOutput::RawTextOnly)]
    pub output: MetarOutput,
}

impl MetarArgs {
    pub fn options(self, config: &Config) -> Result<(MetarOptions, OutputFormat), Error> {
        let query = self.query.into_query(&config.defaults)?;
        Ok((MetarOptions::new(query), self.output.into()))
    }

    async fn run(self, config: &Config) -> Result<()> {
        let (options, format) = self.options(config)?;
        let client = AvwxClient::from_config(config)?;

        debug!("GET {}", client.request_url(&options));
        let response = client.get_metars(&options).await?;
        print_block(&project(&response, format)?);

        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct TafArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Which TAF timestamp startTime/endTime apply to.
    #[arg(long = "timeType", value_enum)]
    pub time_type: Option<TimeTypeArg>,

    /// Send startTime/endTime as Unix seconds (deprecated server encoding).
    #[arg(long = "epochTimes")]
    pub epoch_times: bool,

    #[arg(long, value_enum, default_value_t = TafOutput::RawTextOnly)]
    pub output: TafOutput,

    /// Easier to read TAF format.
    #[arg(short, long)]
    pub pretty: bool,

    /// Include METAR data with TAF.
    #[arg(short, long)]
    pub metar: bool,
}

impl TafArgs {
    pub fn options(self, config: &Config) -> Result<(TafOptions, OutputFormat), Error> {
        let mut options = TafOptions::new(self.query.into_query(&config.defaults)?);
        options.time_type = self.time_type.map(Into::into);
        if self.epoch_times {
            options.time_encoding = TimeEncoding::UnixEpoch;
        }

        let format = match (OutputFormat::from(self.output), self.pretty) {
            (OutputFormat::RawText, true) => OutputFormat::RawTextPretty,
            (OutputFormat::Json, true) => OutputFormat::JsonPretty,
            (format, _) => format,
        };

        Ok((options, format))
    }

    async fn run(self, config: &Config) -> Result<()> {
        let include_metar = self.metar;
        let (options, format) = self.options(config)?;
        let client = AvwxClient::from_config(config)?;

        print_block(&taf_report(&client, &options, format, include_metar).await?);
        Ok(())
    }
}

/// Fetch and render TAFs, optionally followed by METARs for the same
/// filters.
///
/// The METAR block comes after a blank line and is only fetched once the
/// TAF response carried no server errors. Pretty raw text has no METAR
/// form, so that block falls back to plain raw text.
async fn taf_report<T: Transport>(
    client: &AvwxClient<T>,
    options: &TafOptions,
    format: OutputFormat,
    include_metar: bool,
) -> Result<String> {
    debug!("GET {}", client.request_url(options));
    let tafs = client.get_tafs(options).await?;
    let mut text = project(&tafs, format)?;

    if include_metar {
        let metar_options = MetarOptions::from(options);
        let metar_format = match format {
            OutputFormat::RawTextPretty => OutputFormat::RawText,
            other => other,
        };

        debug!("GET {}", client.request_url(&metar_options));
        let metars = client.get_metars(&metar_options).await?;
        let metar_text = project(&metars, metar_format)?;
        if !metar_text.is_empty() {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&metar_text);
        }
    }

    Ok(text)
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(endpoint) = self.endpoint {
            config.set_endpoint(endpoint);
        }

        match self.command {
            Command::Metar(args) => args.run(&config).await,
            Command::Taf(args) => args.run(&config).await,
            Command::Configure => configure(config),
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    let endpoint = Text::new("Text data server endpoint:")
        .with_default(config.endpoint())
        .prompt()?;
    config.set_endpoint(endpoint.trim());
    config.endpoint_url()?;

    let timeout = CustomType::<u64>::new("HTTP timeout in seconds (0 for none):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .prompt()?;
    config.timeout_secs = (timeout > 0).then_some(timeout);

    config.defaults.enabled = Confirm::new("Fill in request defaults for omitted filters?")
        .with_default(config.defaults.enabled)
        .with_help_message("hoursBeforeNow and mostRecentForEachStation")
        .prompt()?;

    if config.defaults.enabled {
        let hours = CustomType::<u32>::new("Default hoursBeforeNow:")
            .with_default(config.defaults.hours_before_now.unwrap_or(6))
            .prompt()?;
        config.defaults.hours_before_now = Some(hours);

        let most_recent = Confirm::new("Default mostRecentForEachStation:")
            .with_default(config.defaults.most_recent_for_each_station.unwrap_or(true))
            .prompt()?;
        config.defaults.most_recent_for_each_station = Some(most_recent);
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).map_err(|e| e.to_string())
}
