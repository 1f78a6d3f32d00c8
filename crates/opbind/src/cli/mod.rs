pub mod handlers;

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("opbind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render and parse album operations through their contracts and representers")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .help("Config file applied after the global and project files"),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Pretty-print JSON output"),
        )
        .subcommand(cmd_list())
        .subcommand(cmd_render())
        .subcommand(cmd_parse())
}

fn operation_arg() -> Arg {
    Arg::new("operation")
        .required(true)
        .value_name("OPERATION")
        .help("Operation name, see `opbind list`")
}

fn cmd_list() -> Command {
    Command::new("list").about("List operations")
}

fn cmd_render() -> Command {
    Command::new("render")
        .about("Run or present an operation and print its JSON")
        .arg(operation_arg())
        .arg(
            Arg::new("include")
                .long("include")
                .value_name("KEY")
                .action(ArgAction::Append)
                .help("Render only this top-level key (repeatable)"),
        )
        .arg(
            Arg::new("param")
                .long("param")
                .short('p')
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Operation parameter; VALUE is read as JSON when it parses"),
        )
}

fn cmd_parse() -> Command {
    Command::new("parse")
        .about("Parse an album document through a create operation")
        .arg(operation_arg())
        .arg(
            Arg::new("document")
                .required(true)
                .value_name("JSON")
                .help("Album JSON document"),
        )
}
