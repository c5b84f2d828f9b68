mod report;

use clap::{Arg, ArgAction, ArgMatches, Command};
use pulsec_core::{AstNode, ast_from_json, ast_to_json, optimize_program};
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Command::new("pulsec")
        .version("0.1.0")
        .about("Optimizer for event scripts targeting the pulse VM");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    dispatch_commands(&matches)
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand(
        Command::new("optimize")
            .about("Optimize a tree produced by the front end")
            .arg(
                Arg::new("file")
                    .help("JSON-encoded syntax tree")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("verbose")
                    .help("Print every simplification applied")
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("dump")
                    .help("Specify the dump stage (ast, opt)")
                    .short('d')
                    .long("dump")
                    .value_parser(["ast", "opt"])
                    .value_name("STAGE"),
            )
            .arg(
                Arg::new("output")
                    .help("Write the optimized tree as JSON to this file")
                    .short('o')
                    .long("output")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            )
            .arg(source_arg()),
    )
    .subcommand(
        Command::new("check")
            .about("Run the optimizer and only report errors")
            .arg(
                Arg::new("file")
                    .help("JSON-encoded syntax tree")
                    .required(true)
                    .index(1),
            )
            .arg(source_arg()),
    )
}

fn source_arg() -> Arg {
    Arg::new("source")
        .help("Script source, used to quote the offending line in errors")
        .short('s')
        .long("source")
        .value_parser(clap::value_parser!(String))
        .value_name("FILE")
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> ExitCode {
    match matches.subcommand() {
        Some(("optimize", sub_m)) => run_optimize(sub_m, false),
        Some(("check", sub_m)) => run_optimize(sub_m, true),
        _ => {
            println!("No valid subcommand was used. Use --help for more information.");
            ExitCode::FAILURE
        }
    }
}

fn load_tree(path: &str) -> Result<AstNode, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
    ast_from_json(&text).map_err(|e| format!("{} is not a valid syntax tree: {}", path, e))
}

fn load_source(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read source {}: {}", path, e))
}

fn run_optimize(sub_m: &ArgMatches, check_only: bool) -> ExitCode {
    let file = sub_m.get_one::<String>("file").expect("required argument");
    let source = match sub_m.get_one::<String>("source").map(|path| load_source(path)) {
        Some(Ok(text)) => Some(text),
        Some(Err(message)) => {
            report::print_failure(&message);
            return ExitCode::FAILURE;
        }
        None => None,
    };
    let verbose = !check_only && sub_m.get_flag("verbose");
    let dump = if check_only { None } else { sub_m.get_one::<String>("dump") };

    let tree = match load_tree(file) {
        Ok(tree) => tree,
        Err(message) => {
            report::print_failure(&message);
            return ExitCode::FAILURE;
        }
    };

    if dump.map(String::as_str) == Some("ast") {
        print!("{}", tree);
    }

    let program = match optimize_program(tree, verbose) {
        Ok(program) => program,
        Err(e) => {
            report::print_error(&e, source.as_deref());
            return ExitCode::FAILURE;
        }
    };

    for note in &program.diagnostics {
        report::print_note(note);
    }

    if check_only {
        report::print_success(&format!("{}: no errors", file));
        return ExitCode::SUCCESS;
    }

    match &program.root {
        Some(root) => {
            if dump.map(String::as_str) == Some("opt") {
                print!("{}", root);
            }
            if let Some(output_file) = sub_m.get_one::<String>("output") {
                let written = ast_to_json(root)
                    .map_err(|e| e.to_string())
                    .and_then(|json| fs::write(output_file, json).map_err(|e| e.to_string()));
                if let Err(e) = written {
                    report::print_failure(&format!("cannot write {}: {}", output_file, e));
                    return ExitCode::FAILURE;
                }
            }
        }
        None => println!("program fragment eliminated"),
    }
    ExitCode::SUCCESS
}
