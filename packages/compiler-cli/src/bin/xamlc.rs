/**
 * Xaml Binding Compiler CLI - xamlc
 *
 * Compiles binding markup extensions in markup files into generated binding
 * containers.
 */
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};
use std::process;

use tracing::{error, warn};
use xaml_compiler::{BindingsOptimizerSettings, TypeCatalog};
use xaml_compiler_cli::compile::{expand_inputs, parallel_compile, write_containers};

fn main() {
    let matches = Command::new("xamlc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Xaml binding compiler")
        .arg(
            Arg::new("types")
                .short('t')
                .long("types")
                .value_name("PATH")
                .required(true)
                .help("Path to the JSON type catalog"),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("PATH")
                .help("Path to the optimizer settings JSON"),
        )
        .arg(
            Arg::new("namespace")
                .long("namespace")
                .value_name("NAMESPACE")
                .help("Namespace of generated containers"),
        )
        .arg(
            Arg::new("assembly")
                .long("assembly")
                .value_name("NAME")
                .help("Assembly the generated containers belong to"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("DIR")
                .help("Directory for generated sources"),
        )
        .arg(
            Arg::new("opt-in")
                .long("opt-in")
                .action(ArgAction::SetTrue)
                .help("Only compile documents that opt in to binding optimizations"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the markup modifications as JSON"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .num_args(1..)
                .required(true)
                .help("Markup files or glob patterns"),
        )
        .get_matches();

    xaml_compiler_cli::init_tracing();

    let types = matches.get_one::<String>("types").cloned().unwrap_or_default();
    let settings = matches.get_one::<String>("settings").map(PathBuf::from);
    let files: Vec<String> = matches
        .get_many::<String>("files")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let options = RunOptions {
        types: PathBuf::from(types),
        settings,
        namespace: matches.get_one::<String>("namespace").cloned(),
        assembly: matches.get_one::<String>("assembly").cloned(),
        out: matches.get_one::<String>("out").map(PathBuf::from),
        opt_in: matches.get_flag("opt-in"),
        json: matches.get_flag("json"),
        files,
    };

    match run(&options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

struct RunOptions {
    types: PathBuf,
    settings: Option<PathBuf>,
    namespace: Option<String>,
    assembly: Option<String>,
    out: Option<PathBuf>,
    opt_in: bool,
    json: bool,
    files: Vec<String>,
}

/// Returns `false` when any file failed structurally.
fn run(options: &RunOptions) -> anyhow::Result<bool> {
    let mut settings = match &options.settings {
        Some(path) => BindingsOptimizerSettings::load(path)?,
        None => BindingsOptimizerSettings::default(),
    };
    if let Some(namespace) = &options.namespace {
        settings.namespace = namespace.clone();
    }
    if let Some(assembly) = &options.assembly {
        settings.assembly_name = assembly.clone();
    }
    settings.opt_in_to_optimizations |= options.opt_in;

    let catalog = TypeCatalog::load(&options.types)?;
    let files = expand_inputs(&options.files)?;
    let results = parallel_compile(&files, &settings, &catalog)?;

    let mut succeeded = true;
    let mut modifications = Vec::new();
    for result in &results {
        let output = match &result.output {
            Ok(Some(output)) => output,
            Ok(None) => {
                println!("{}: skipped (not opted in)", result.path.display());
                continue;
            }
            Err(e) => {
                error!(file = %result.path.display(), error = %e, "compilation failed");
                succeeded = false;
                continue;
            }
        };

        for binding in &output.unconverted {
            warn!(
                file = %result.path.display(),
                element = %binding.element_name,
                attribute = %binding.attribute,
                "{}",
                binding.reason
            );
        }

        let out_dir = options
            .out
            .clone()
            .unwrap_or_else(|| result.path.parent().map(Path::to_path_buf).unwrap_or_default());
        let written = write_containers(&out_dir, output)?;
        if options.json {
            modifications.push(serde_json::json!({
                "file": result.path.display().to_string(),
                "modifications": &output.modifications,
                "unconverted": &output.unconverted,
            }));
        } else {
            println!(
                "{}: {} bindings compiled, {} left to the runtime, {} containers",
                result.path.display(),
                output.converted_count(),
                output.unconverted.len() + output.skipped.len(),
                written.len()
            );
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&modifications)?);
    }

    Ok(succeeded)
}
