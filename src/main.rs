use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use tnsed::commands;

fn file_arg() -> Arg {
    Arg::new("file")
        .short('f')
        .long("file")
        .value_name("PATH")
        .help("tnsnames.ora file to operate on (default: configured or discovered path)")
}

fn build_cli() -> Command {
    Command::new("tnsed")
        .version(env!("CARGO_PKG_VERSION"))
        .about("View, edit and reachability-check Oracle tnsnames.ora connection aliases")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List all connection aliases")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Print one alias as a canonical TNS block")
                .arg(
                    Arg::new("alias")
                        .help("Alias name (case-insensitive)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("raw")
                        .long("raw")
                        .help("Print the block as found in the source file instead")
                        .action(ArgAction::SetTrue),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Add a new connection alias")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("NAME")
                        .help("Alias name (letters, digits and underscore)")
                        .required(true),
                )
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Database host")
                        .required(true),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_name("PORT")
                        .help("Listener port")
                        .default_value("1521"),
                )
                .arg(
                    Arg::new("service-name")
                        .long("service-name")
                        .value_name("SERVICE")
                        .help("SERVICE_NAME for CONNECT_DATA"),
                )
                .arg(
                    Arg::new("sid")
                        .long("sid")
                        .value_name("SID")
                        .help("SID for CONNECT_DATA"),
                )
                .arg(
                    Arg::new("protocol")
                        .long("protocol")
                        .value_name("PROTOCOL")
                        .help("Connection protocol")
                        .default_value("TCP"),
                )
                .arg(
                    Arg::new("server")
                        .long("server")
                        .value_name("SERVER")
                        .help("SERVER mode (e.g. DEDICATED); changes the serialized shape"),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit an existing alias (only the passed fields change)")
                .arg(
                    Arg::new("alias")
                        .help("Alias name to edit (case-insensitive)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("rename")
                        .long("rename")
                        .value_name("NAME")
                        .help("New alias name"),
                )
                .arg(Arg::new("host").long("host").value_name("HOST"))
                .arg(Arg::new("port").long("port").value_name("PORT"))
                .arg(
                    Arg::new("service-name")
                        .long("service-name")
                        .value_name("SERVICE"),
                )
                .arg(Arg::new("sid").long("sid").value_name("SID"))
                .arg(Arg::new("protocol").long("protocol").value_name("PROTOCOL"))
                .arg(Arg::new("server").long("server").value_name("SERVER"))
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove an alias")
                .arg(
                    Arg::new("alias")
                        .help("Alias name to remove (case-insensitive)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Merge TNS blocks read from stdin into the file")
                .arg(
                    Arg::new("replace")
                        .long("replace")
                        .help("Overwrite existing aliases with the same name")
                        .action(ArgAction::SetTrue),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("check")
                .about("Check which aliases are reachable (via tnsping)")
                .arg(
                    Arg::new("alias")
                        .help("Restrict the check to these aliases")
                        .num_args(0..)
                        .index(1),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help("Recheck every alias, ignoring cached statuses")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .value_name("N")
                        .help("Maximum concurrent checks")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .help("Per-alias check timeout in seconds")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("command")
                        .long("command")
                        .value_name("CMD")
                        .help("Reachability tool to invoke (default: tnsping)"),
                )
                .arg(
                    Arg::new("watch")
                        .long("watch")
                        .value_name("SECS")
                        .help("Keep rechecking on this interval until interrupted")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("gateway")
                .about("Legacy gateway file integration")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("sync")
                        .about("Mirror alias names into the gateway file's [OraGtwy] section")
                        .arg(
                            Arg::new("gateway-file")
                                .long("gateway-file")
                                .value_name("PATH")
                                .help("Gateway file to update (default: configured path)"),
                        )
                        .arg(file_arg()),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change persisted settings")
                .subcommand(Command::new("show").about("Print the current configuration"))
                .subcommand(
                    Command::new("set")
                        .about("Set a configuration value")
                        .arg(
                            Arg::new("key")
                                .help("One of: file, gateway, parallel, command, timeout")
                                .required(true)
                                .index(1),
                        )
                        .arg(Arg::new("value").help("New value").required(true).index(2)),
                )
                .subcommand(
                    Command::new("unset")
                        .about("Clear a configuration value")
                        .arg(
                            Arg::new("key")
                                .help("One of: file, gateway, parallel, command, timeout")
                                .required(true)
                                .index(1),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Target shell (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() -> Result<()> {
    tnsed::init_logging();

    let mut cli = build_cli();
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("list", sub_matches)) => commands::list::execute(sub_matches),
        Some(("show", sub_matches)) => commands::show::execute(sub_matches),
        Some(("add", sub_matches)) => commands::add::execute(sub_matches),
        Some(("edit", sub_matches)) => commands::edit::execute(sub_matches),
        Some(("remove", sub_matches)) => commands::remove::execute(sub_matches),
        Some(("import", sub_matches)) => commands::import::execute(sub_matches),
        Some(("check", sub_matches)) => commands::check::execute(sub_matches),
        Some(("gateway", sub_matches)) => commands::gateway::execute(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        Some(("completions", sub_matches)) => commands::completions::execute(sub_matches, &mut cli),
        _ => unreachable!("subcommand is required"),
    }
}
