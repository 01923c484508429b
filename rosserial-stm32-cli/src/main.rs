//! make_libraries - generate the rosserial library for an STM32CubeIDE project
//!
//! Copies the STM32 runtime, generates the message headers and moves the
//! generated sources into `Core/Src/ROSLib`.

use clap::{CommandFactory, Parser};
use colored::*;
use rosserial_stm32::{
    Config, ExportReport, Exporter, RosPack, RosserialClient, TypeMap, logger::init_logging,
};
use std::path::{Path, PathBuf};

/// Generate the STM32 rosserial library files for STM32CubeIDE
#[derive(Parser, Debug)]
#[command(name = "make_libraries")]
#[command(version)]
#[command(
    about = "Generate the STM32 rosserial library files for STM32CubeIDE",
    long_about = "make_libraries generates the STM32 rosserial library files for STM32CubeIDE.\n\
                  It requires the location of your STM32 project folder.\n\n\
                  rosrun rosserial_stm32 make_libraries <stm32_proj_path>"
)]
struct Args {
    /// Root folder of the STM32 project (the one containing Core/Inc)
    stm32_proj_path: Option<PathBuf>,

    /// Runtime library to stage instead of <rosserial_stm32>/src/ros_lib
    #[arg(long, value_name = "PATH")]
    runtime_lib: Option<PathBuf>,

    /// Resolve a ROS package without rospack, also for the generator (repeatable)
    #[arg(long = "package", value_name = "NAME=PATH", value_parser = parse_package)]
    packages: Vec<(String, PathBuf)>,

    /// Python interpreter running the rosserial generator
    #[arg(long, env = "ROSSERIAL_PYTHON", default_value = "python3")]
    python: PathBuf,

    /// Print the wire type mapping and exit
    #[arg(long)]
    list_types: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mut builder = Config::builder().python(&self.python);
        if let Some(runtime_lib) = &self.runtime_lib {
            builder = builder.runtime_lib(runtime_lib);
        }
        for (name, path) in &self.packages {
            builder = builder.package(name, path);
        }
        builder.build()
    }
}

fn parse_package(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got '{s}'")),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { "info" });

    let types = TypeMap::stm32();
    if args.list_types {
        print_types(&types);
        return;
    }

    let Some(root) = args.stm32_proj_path.as_deref() else {
        // Nothing to do without a project
        Args::command().print_long_help().ok();
        return;
    };

    match run(&args, root, &types) {
        Ok(report) => print_report(&report),
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            std::process::exit(1);
        }
    }
}

fn run(args: &Args, root: &Path, types: &TypeMap) -> rosserial_stm32::Result<ExportReport> {
    let config = args.config();
    let locator = RosPack::new(&config);
    let generator = RosserialClient::new(&config);

    Exporter::new(&config, &locator, &generator, types).export(root)
}

fn print_report(report: &ExportReport) {
    println!(
        "{} {}",
        "Headers:".green().bold(),
        report.output.display()
    );
    println!(
        "{} {} file(s) in {}",
        "Sources:".green().bold(),
        report.relocated.len(),
        report.src_dest.display()
    );
}

fn print_types(types: &TypeMap) {
    println!(
        "{}",
        format!(
            "{:<10} {:<18} {:>4}  {:<18} {}",
            "WIRE TYPE", "C++ TYPE", "SIZE", "CODEC", "DEPENDENCIES"
        )
        .bold()
    );
    for (name, mapping) in types.iter() {
        let size = if mapping.is_variable_length() {
            "var".to_string()
        } else {
            mapping.wire_size.to_string()
        };
        println!(
            "{:<10} {:<18} {:>4}  {:<18} {}",
            name,
            mapping.target_type,
            size,
            mapping.codec.class_name(),
            mapping.dependencies.join(", ")
        );
    }
}
