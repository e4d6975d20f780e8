use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use log::info;
use serde::Serialize;

use croprec::{
    ArtifactStore, Crop, Feature, Recommendation, Recommender, RuntimeConfig, SoilReadings,
};

#[derive(Parser)]
#[command(author, version, about = "Crop recommendation from soil and climate readings", long_about = None)]
struct Args {
    /// Directory holding model.onnx, minmaxscaler.json and standscaler.json
    #[arg(long, global = true)]
    artifacts_dir: Option<PathBuf>,

    /// Intra-op threads for the classifier (0 lets ONNX Runtime decide)
    #[arg(long, global = true, default_value_t = 0)]
    threads: usize,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend a crop for the given readings
    Recommend(ReadingArgs),
    /// Prompt for each reading, then recommend a crop
    Interactive,
    /// List the supported crops
    Crops,
    /// Check that the artifacts are present and match their checksums
    Verify,
}

fn reading(feature: Feature) -> impl Fn(&str) -> Result<f64, String> + Clone + Send + Sync + 'static {
    move |s: &str| {
        let value: f64 = s.trim().parse().map_err(|_| format!("'{}' is not a number", s))?;
        feature.check(value).map_err(|e| e.to_string())
    }
}

#[derive(ClapArgs, Debug)]
struct ReadingArgs {
    /// Nitrogen content of the soil
    #[arg(long, value_parser = reading(Feature::Nitrogen), default_value_t = Feature::Nitrogen.default_value())]
    nitrogen: f64,
    /// Phosphorus content of the soil
    #[arg(long, value_parser = reading(Feature::Phosphorus), default_value_t = Feature::Phosphorus.default_value())]
    phosphorus: f64,
    /// Potassium content of the soil
    #[arg(long, value_parser = reading(Feature::Potassium), default_value_t = Feature::Potassium.default_value())]
    potassium: f64,
    /// Temperature in °C
    #[arg(long, allow_negative_numbers = true, value_parser = reading(Feature::Temperature), default_value_t = Feature::Temperature.default_value())]
    temperature: f64,
    /// Relative humidity in %
    #[arg(long, value_parser = reading(Feature::Humidity), default_value_t = Feature::Humidity.default_value())]
    humidity: f64,
    /// Soil pH
    #[arg(long, value_parser = reading(Feature::Ph), default_value_t = Feature::Ph.default_value())]
    ph: f64,
    /// Rainfall in mm
    #[arg(long, value_parser = reading(Feature::Rainfall), default_value_t = Feature::Rainfall.default_value())]
    rainfall: f64,
}

impl From<&ReadingArgs> for SoilReadings {
    fn from(args: &ReadingArgs) -> Self {
        SoilReadings {
            nitrogen: args.nitrogen,
            phosphorus: args.phosphorus,
            potassium: args.potassium,
            temperature: args.temperature,
            humidity: args.humidity,
            ph: args.ph,
            rainfall: args.rainfall,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    readings: &'a SoilReadings,
    recommendation: &'a Recommendation,
    message: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match &args.command {
        Command::Recommend(reading_args) => {
            let readings = SoilReadings::from(reading_args);
            run_recommendation(&args, &readings)
        }
        Command::Interactive => {
            let readings = prompt_readings()?;
            run_recommendation(&args, &readings)
        }
        Command::Crops => {
            print_crops(args.json)
        }
        Command::Verify => {
            verify_artifacts(&args)
        }
    }
}

fn store(args: &Args) -> ArtifactStore {
    let store = match &args.artifacts_dir {
        Some(dir) => ArtifactStore::new(dir),
        None => ArtifactStore::new_default(),
    };
    store.with_runtime_config(RuntimeConfig::with_intra_threads(args.threads))
}

fn run_recommendation(args: &Args, readings: &SoilReadings) -> Result<()> {
    let start_time = Instant::now();
    let store = store(args);
    let artifacts = store.load()
        .with_context(|| format!("Could not load model artifacts from {}", store.artifacts_dir().display()))?;
    let recommender = Recommender::new(artifacts);
    info!("Artifacts loaded in {:.2?}", start_time.elapsed());

    let recommendation = recommender.recommend(readings)?;
    info!("Recommendation produced in {:.2?}", start_time.elapsed());

    if args.json {
        let report = Report {
            readings,
            recommendation: &recommendation,
            message: recommendation.message(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match recommendation.detail() {
        Some(detail) => {
            println!("\n{}", format!("🎯 {}", recommendation.message()).green().bold());
            println!("{}", format!("✅ {}", detail).cyan());
            print_summary(readings);
        }
        None => {
            println!("\n{}", format!("❌ {}", recommendation.message()).red().bold());
        }
    }
    Ok(())
}

fn print_summary(readings: &SoilReadings) {
    println!("\n{}", "📊 Input Summary".bright_white().bold());
    for (title, soil) in [("Soil Nutrients:", true), ("Climate Conditions:", false)] {
        println!("  {}", title.bold());
        for feature in Feature::ALL.into_iter().filter(|f| f.is_soil() == soil) {
            println!("    • {}: {}{}", feature, readings.get(feature), feature.unit());
        }
    }
}

fn prompt_readings() -> Result<SoilReadings> {
    println!("{}", "🌱 Crop Recommendation System".bright_green().bold());
    println!("Enter soil nutrient values and climate conditions.\n");

    let theme = ColorfulTheme::default();
    let mut readings = SoilReadings::default();
    for feature in Feature::ALL {
        let range = feature.range();
        let value: f64 = Input::with_theme(&theme)
            .with_prompt(format!("{} [{} to {}]", feature, range.start(), range.end()))
            .default(feature.default_value())
            .validate_with(|value: &f64| -> Result<(), String> {
                feature.check(*value).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;
        readings.set(feature, value);
    }
    Ok(readings)
}

fn print_crops(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&Crop::ALL)?);
        return Ok(());
    }

    println!("{}", "🌾 Supported Crops:".bright_green().bold());
    for pair in Crop::ALL.chunks(2) {
        let line: Vec<String> = pair.iter().map(|crop| format!("• {}", crop)).collect();
        println!("  {}", line.join(" "));
    }
    Ok(())
}

fn verify_artifacts(args: &Args) -> Result<()> {
    let store = store(args);
    let paths = store.paths();
    println!("Artifacts in {}", store.artifacts_dir().display());
    for path in [&paths.model, &paths.minmax_scaler, &paths.standard_scaler] {
        let status = if path.exists() { "found".green() } else { "missing".red() };
        println!("  {} ({})", path.display(), status);
    }

    if !store.is_complete() {
        anyhow::bail!("Artifact set is incomplete");
    }

    if store.verify()? {
        println!("{}", "Checksums verified".green().bold());
    } else {
        println!("{}", "No checksums.json, integrity not verified".yellow());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("croprec").chain(args.iter().copied()))
    }

    #[test]
    fn test_recommend_defaults() {
        let args = parse(&["recommend"]).unwrap();
        match args.command {
            Command::Recommend(reading_args) => {
                assert_eq!(SoilReadings::from(&reading_args), SoilReadings::default());
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_recommend_flags() {
        let args = parse(&[
            "--json", "recommend",
            "--nitrogen", "90", "--phosphorus", "42", "--potassium", "43",
            "--temperature", "-5.5", "--humidity", "82", "--ph", "6.5", "--rainfall", "202.9",
        ]).unwrap();
        assert!(args.json);
        match args.command {
            Command::Recommend(reading_args) => {
                let readings = SoilReadings::from(&reading_args);
                assert_eq!(readings.temperature, -5.5);
                assert_eq!(readings.rainfall, 202.9);
            }
            _ => panic!("expected recommend"),
        }
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(parse(&["recommend", "--ph", "15"]).is_err());
        assert!(parse(&["recommend", "--temperature", "-11"]).is_err());
        assert!(parse(&["recommend", "--humidity", "abc"]).is_err());
    }

    #[test]
    fn test_other_commands() {
        assert!(matches!(parse(&["crops"]).unwrap().command, Command::Crops));
        let args = parse(&["verify", "--artifacts-dir", "/srv/croprec"]).unwrap();
        assert_eq!(args.artifacts_dir, Some(PathBuf::from("/srv/croprec")));
    }
}
