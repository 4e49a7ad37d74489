use anyhow::{Context, Result, anyhow};
use rtak_header::prelude::*;
use rtak_header::{report, source};
use std::path::PathBuf;
use structopt::StructOpt;

fn main() {
    // Collecting user arguments
    let cli_args = CliArgs::from_args();

    // Setting up log level, RUST_LOG still takes precedence
    let level = match cli_args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = cli_args.command.run() {
        log::error!("{e:?}");
        std::process::exit(1)
    }
}

/// Command line arguments of the RT-AK model file generator.
#[derive(Debug, StructOpt)]
#[structopt(name = "rtak", about = "Generate RT-AK model files from X-CUBE-AI output")]
pub struct CliArgs {
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbosity: usize,
    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Generate rt_ai_<model>_model.h from <model>.h and <model>_data.h
    Header {
        /// C name given to the model by the converter
        #[structopt(short = "n", long = "model-name", default_value = "network")]
        model_name: String,
        /// Directory holding the converter headers (usually X-CUBE-AI/App)
        #[structopt(long = "source-dir", parse(from_os_str))]
        source_dir: PathBuf,
        /// Directory to write the header to (usually <project>/applications)
        #[structopt(long = "dest-dir", parse(from_os_str))]
        destination_dir: PathBuf,
    },
    /// Render rt_ai_<model>_model.c from a model source template
    Source {
        #[structopt(short = "n", long = "model-name", default_value = "network")]
        model_name: String,
        /// Template to render, the bundled one when absent
        #[structopt(long = "template", parse(from_os_str))]
        template: Option<PathBuf>,
        /// Network name the template is written for
        #[structopt(long = "template-name", default_value = "mnist")]
        template_name: String,
        #[structopt(long = "dest-dir", parse(from_os_str))]
        destination_dir: PathBuf,
    },
    /// Check a converter step from its captured output and report
    CheckReport {
        /// analyze, validate or generate
        #[structopt(long = "mode")]
        mode: String,
        /// File holding the captured standard output of the step
        #[structopt(long = "stdout", parse(from_os_str))]
        stdout: PathBuf,
        /// Converter output directory, where reports are written
        #[structopt(long = "output-dir", parse(from_os_str))]
        output_dir: PathBuf,
        #[structopt(short = "n", long = "model-name", default_value = "network")]
        model_name: String,
    },
    /// Print the framework of a trained model file
    Format {
        #[structopt(parse(from_os_str))]
        model: PathBuf,
    },
}

impl Command {
    pub fn run(&self) -> Result<()> {
        match self {
            Command::Header { model_name, source_dir, destination_dir } => {
                let options = GenerateOptions::new(model_name, source_dir, destination_dir);
                rtak_header::generate_header(&options).with_context(|| {
                    anyhow!("Error while generating the header of model {:?}", model_name)
                })?;
            }
            Command::Source { model_name, template, template_name, destination_dir } => {
                rtak_header::config::validate_model_name(model_name)?;
                let text = match template {
                    Some(path) => fs_err::read_to_string(path)?,
                    None => source::TEMPLATE.to_string(),
                };
                source::write_source(&text, template_name, model_name, destination_dir)
                    .with_context(|| {
                        anyhow!("Error while rendering the source of model {:?}", model_name)
                    })?;
            }
            Command::CheckReport { mode, stdout, output_dir, model_name } => {
                let mode = ConversionMode::from_name(mode)
                    .ok_or_else(|| anyhow!("Unknown conversion mode {:?}", mode))?;
                let captured = fs_err::read_to_string(stdout)?;
                report::check_step(mode, &captured, mode.report_path(output_dir, model_name))?;
                log::info!("Model {model_name}: {mode} step succeeded");
            }
            Command::Format { model } => {
                println!("{}", ModelFormat::from_path(model)?);
            }
        }
        Ok(())
    }
}
