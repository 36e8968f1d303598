use clap::ArgMatches;
use colored::Colorize;
use leadscout::command_argument_builder;
use leadscout::handlers::{
    handle_export, handle_init, handle_run, handle_sites_add, handle_sites_import,
    handle_sites_list, handle_sites_template, resolve_db_path,
};
use leadscout_core::print_banner;
use tracing::Level;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    if let Err(e) = dispatch(&chosen_command, quiet).await {
        eprintln!("{} {:#}", "✗ error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn dispatch(chosen_command: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let db_path = resolve_db_path(chosen_command);

    match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("sites", primary_command)) => match primary_command.subcommand() {
            Some(("add", secondary_command)) => handle_sites_add(secondary_command, &db_path),
            Some(("import", secondary_command)) => {
                handle_sites_import(secondary_command, &db_path)
            }
            Some(("template", secondary_command)) => handle_sites_template(secondary_command),
            Some(("list", _)) => handle_sites_list(&db_path),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("run", primary_command)) => handle_run(primary_command, &db_path, quiet).await,
        Some(("export", primary_command)) => handle_export(primary_command, &db_path),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
