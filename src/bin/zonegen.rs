//! Command-line interface for zonegen
//! This binary inspects zone definition command files: it parses them
//! against a YAML type schema and dumps the parsed statements, or dumps the
//! raw token stream.
//!
//! Usage:
//!   zonegen parse `<path>` --types `<schema>`  - Parse a command file and dump statements as JSON
//!   zonegen tokens `<path>`                  - Dump the token stream

use clap::{Arg, Command};
use zonegen::zone::commands::CommandFileParser;
use zonegen::zone::lexer::tokenize;
use zonegen::zone::repository::repository_from_yaml;

fn main() {
    let matches = Command::new("zonegen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting zone definition command files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a command file and dump its statements as JSON")
                .arg(
                    Arg::new("path")
                        .help("Path to the command file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("types")
                        .long("types")
                        .short('t')
                        .help("Path to the YAML type schema")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Dump the token stream of a command file")
                .arg(
                    Arg::new("path")
                        .help("Path to the command file")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let types = parse_matches.get_one::<String>("types").unwrap();
            handle_parse_command(path, types);
        }
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            handle_tokens_command(path);
        }
        _ => unreachable!(),
    }
}

fn read_file(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        std::process::exit(1);
    })
}

/// Handle the parse command
fn handle_parse_command(path: &str, types: &str) {
    let schema_source = read_file(types);
    let repository = repository_from_yaml(&schema_source).unwrap_or_else(|e| {
        eprintln!("Error loading type schema: {}", e);
        std::process::exit(1);
    });

    let source = read_file(path);
    let mut parser = CommandFileParser::new(repository);
    let outputs = parser.parse(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let snapshots: Vec<serde_json::Value> =
        outputs.iter().map(|output| output.to_snapshot()).collect();
    match serde_json::to_string_pretty(&snapshots) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &str) {
    let source = read_file(path);
    let tokens = tokenize(&source).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    for token in tokens {
        println!("{:?} {:?} @ {}..{}", token.kind, token.text, token.span.start, token.span.end);
    }
}
