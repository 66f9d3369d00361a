//! Main CLI application
//!
//! With no tokens the interactive menu opens; with tokens the scripted
//! runner expands macros and drives the pipeline unattended.

use crate::config::find_config_file;
use crate::error::Result;
use crate::runner::{expand_macro_args, load_context, run_chain, run_menu, Registry};
use clap::{Arg, ArgAction, Command};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

/// Build the clap command
fn build_command() -> Command {
    Command::new("utask")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A configuration-driven task automation engine")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to the utask.yml config file"),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(clap::value_parser!(Shell))
                .action(ArgAction::Set)
                .help("Generate shell completions and exit"),
        )
        .arg(
            Arg::new("tokens")
                .value_name("TOKENS")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .help("Task or macro invocations, chained with ','; a=<id> selects a macro"),
        )
}

/// Run the CLI application
pub fn run() -> Result<()> {
    // Project-local .env may provide ENGINE_PATH and friends
    dotenvy::dotenv().ok();

    let matches = build_command().get_matches();

    if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
        let mut command = build_command();
        clap_complete::generate(shell, &mut command, "utask", &mut io::stdout());
        return Ok(());
    }

    let config_path = match matches.get_one::<String>("file") {
        Some(path) => PathBuf::from(path),
        None => find_config_file()?,
    };

    let registry = Registry::builtin();
    let mut ctx = load_context(&config_path, &registry)?;

    let tokens: Vec<String> = matches
        .get_many::<String>("tokens")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if tokens.is_empty() {
        run_menu(&mut ctx, &registry);
    } else {
        let expanded = expand_macro_args(&ctx.autotasks, &tokens);
        run_chain(&mut ctx, &expanded);
    }

    Ok(())
}
