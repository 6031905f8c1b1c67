use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use ledpref::*;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default preference record
    Show,
    /// Build a record from the defaults plus the given values and print it
    Set(SetArgs),
    /// Set the preset color of one group on the default record and print it
    Group {
        /// Group index (0-5)
        #[arg(short, long, allow_negative_numbers = true)]
        index: i64,
        /// Color as R,G,B or #rrggbb
        #[arg(short, long)]
        color: Rgb,
    },
}

#[derive(Args, Debug)]
struct SetArgs {
    /// Saved flag (0-255, non-zero means saved)
    #[arg(long, allow_negative_numbers = true)]
    saved: Option<i64>,
    /// Brightness (0-255)
    #[arg(short, long, allow_negative_numbers = true)]
    brightness: Option<i64>,
    /// Color mode (0-255)
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    color_mode: Option<i64>,
    /// Rainbow cycle time (0-255)
    #[arg(short, long, allow_negative_numbers = true)]
    rainbow_time: Option<i64>,
    /// Hue (0-255)
    #[arg(long, allow_negative_numbers = true)]
    hue: Option<i64>,
    /// Saturation (0-255)
    #[arg(short, long, allow_negative_numbers = true)]
    saturation: Option<i64>,
    /// Preset color per group as R,G,B or #rrggbb; omit, or give once per group
    #[arg(short, long = "preset")]
    presets: Vec<Rgb>,
    /// Clamp out-of-range values instead of rejecting them
    #[arg(long)]
    clamp: bool,
}

impl SetArgs {
    /// Defaults overlaid with every value given on the command line
    fn draft(&self) -> PreferenceDraft {
        let defaults = PreferenceDraft::default();
        PreferenceDraft {
            saved: self.saved.unwrap_or(defaults.saved),
            brightness: self.brightness.unwrap_or(defaults.brightness),
            color_mode: self.color_mode.unwrap_or(defaults.color_mode),
            rainbow_time: self.rainbow_time.unwrap_or(defaults.rainbow_time),
            hue: self.hue.unwrap_or(defaults.hue),
            saturation: self.saturation.unwrap_or(defaults.saturation),
            led_preset: if self.presets.is_empty() {
                defaults.led_preset
            } else {
                self.presets.clone()
            },
        }
    }

    fn policy(&self) -> RangePolicy {
        if self.clamp {
            RangePolicy::Clamp
        } else {
            RangePolicy::Reject
        }
    }

    /// Validates the draft into a fresh store under the chosen policy
    #[instrument]
    fn apply(&self) -> ledpref::Result<PreferenceStore> {
        let mut store = PreferenceStore::with_policy(self.policy());
        info!("Applying preference draft with {:?} policy", store.policy());
        store.set(self.draft())?;
        Ok(store)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("ledpref=info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    let store = match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => PreferenceStore::new(),
        Commands::Set(args) => args.apply().wrap_err("Preference record rejected")?,
        Commands::Group { index, color } => {
            let mut store = PreferenceStore::new();
            store
                .set_group_color(index, color)
                .wrap_err("Failed to set group color")?;
            store
        }
    };

    println!("{}", store.get());
    Ok(())
}
