//! vjsx
//!
//! Compiles serialized JSX element trees into Vue vnode creation code.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use vue_jsx_compiler::TransformOptions;
use vue_jsx_compiler_cli::compile::{parallel_compile, EmitKind};
use vue_jsx_compiler_cli::logging::init_tracing;

fn command() -> Command {
    Command::new("vjsx")
        .version(vue_jsx_compiler_cli::version())
        .about("Vue JSX to vnode compiler")
        .arg(
            Arg::new("files")
                .value_name("FILES")
                .help("Compilation units as JSON")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .value_name("KIND")
                .value_parser(["js", "json"])
                .default_value("js")
                .help("Print a JavaScript module or the output tree"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("JSON file with transform options; flags override it"),
        )
        .arg(
            Arg::new("optimize")
                .long("optimize")
                .action(ArgAction::SetTrue)
                .help("Emit patch flags and slot flags"),
        )
        .arg(
            Arg::new("no-merge-props")
                .long("no-merge-props")
                .action(ArgAction::SetTrue)
                .help("Keep repeated class, style and on* props separate"),
        )
        .arg(
            Arg::new("no-object-slots")
                .long("no-object-slots")
                .action(ArgAction::SetTrue)
                .help("Never check single children with _isSlot"),
        )
        .arg(
            Arg::new("transform-on")
                .long("transform-on")
                .action(ArgAction::SetTrue)
                .help("Route on / nativeOn through the transform-on helper"),
        )
        .arg(
            Arg::new("pragma")
                .long("pragma")
                .value_name("IDENT")
                .help("Function to call instead of createVNode"),
        )
        .arg(
            Arg::new("custom-element")
                .long("custom-element")
                .value_name("REGEX")
                .action(ArgAction::Append)
                .help("Tags matching this pattern are custom elements"),
        )
        .arg(
            Arg::new("binding")
                .short('b')
                .long("binding")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Name bound in every compilation unit"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Raise log verbosity (-v debug, -vv trace)"),
        )
}

fn options_from(matches: &ArgMatches) -> Result<TransformOptions> {
    let mut options = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let source =
                std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
            TransformOptions::from_json(&source)?
        }
        None => TransformOptions::default(),
    };

    if matches.get_flag("optimize") {
        options.optimize = true;
    }
    if matches.get_flag("no-merge-props") {
        options.merge_props = false;
    }
    if matches.get_flag("no-object-slots") {
        options.enable_object_slots = false;
    }
    if matches.get_flag("transform-on") {
        options.transform_on = true;
    }
    if let Some(pragma) = matches.get_one::<String>("pragma") {
        options.pragma = Some(pragma.clone());
    }
    if let Some(patterns) = matches.get_many::<String>("custom-element") {
        options.is_custom_element.extend(patterns.cloned());
    }
    Ok(options)
}

fn run(matches: &ArgMatches) -> Result<bool> {
    let options = options_from(matches)?;
    let emit: EmitKind = matches
        .get_one::<String>("emit")
        .map(String::as_str)
        .unwrap_or("js")
        .parse()?;
    let bindings: Vec<String> = matches
        .get_many::<String>("binding")
        .map(|names| names.cloned().collect())
        .unwrap_or_default();
    let files: Vec<PathBuf> = matches
        .get_many::<PathBuf>("files")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();

    let mut ok = true;
    let several = files.len() > 1;
    for compiled in parallel_compile(&files, &options, &bindings, emit) {
        match compiled.result {
            Ok(code) => {
                if several {
                    println!("// {}", compiled.path.display());
                }
                println!("{}", code);
            }
            Err(err) => {
                ok = false;
                eprintln!("Error: {:#}", err);
            }
        }
    }
    Ok(ok)
}

fn main() {
    let matches = command().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    }
}
