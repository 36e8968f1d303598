use clap::{arg, command};
use leadscout_core::config::{DEFAULT_INPUT_CSV, DEFAULT_OUTPUT_CSV};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("leadscout")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("leadscout")
        .about("Audit small-business websites and turn the weak ones into sales leads")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging on stderr")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"db" <PATH>)
                .required(false)
                .global(true)
                .help("Database file (default: ~/.config/leadscout/leadscout.db)"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the leadscout database and a sample site list")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the leadscout database")
                        .default_value("~/.config/leadscout/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help(
                            "Forces the overwriting of any existing database at the specified \
                        location.",
                        )
                        .required(false),
                ),
        )
        .subcommand(
            command!("sites")
                .about("Manage the sites to audit")
                .subcommand_required(true)
                .subcommand(
                    command!("add")
                        .about("Adds a single site, prompting for anything not given")
                        .arg(
                            arg!(-d --"domain" <DOMAIN>)
                                .required(false)
                                .help("The site's domain, e.g. example.com"),
                        )
                        .arg(
                            arg!(-c --"category" <CATEGORY>)
                                .required(false)
                                .help("Business category"),
                        )
                        .arg(
                            arg!(-l --"location" <LOCATION>)
                                .required(false)
                                .help("Business location"),
                        ),
                )
                .subcommand(
                    command!("import")
                        .about("Imports sites from a CSV file with a domain column")
                        .arg(
                            arg!(-i --"input" <PATH>)
                                .required(false)
                                .help("Path to the CSV file")
                                .value_parser(clap::value_parser!(std::path::PathBuf))
                                .default_value(DEFAULT_INPUT_CSV),
                        ),
                )
                .subcommand(
                    command!("template")
                        .about("Writes a sample CSV to fill in")
                        .arg(
                            arg!(-o --"output" <PATH>)
                                .required(false)
                                .help("Where to write the sample CSV")
                                .value_parser(clap::value_parser!(std::path::PathBuf))
                                .default_value(DEFAULT_INPUT_CSV),
                        ),
                )
                .subcommand(command!("list").about("Lists all sites and their status")),
        )
        .subcommand(
            command!("run")
                .about(
                    "Audits every pending site, scores it and drafts outreach for the ones that \
                qualify.",
                )
                .arg(
                    arg!(--"delay-ms" <MILLISECONDS>)
                        .required(false)
                        .help("Pause between sites")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("1000"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"threshold" <SCORE>)
                        .required(false)
                        .help("Minimum lead score for a site to qualify")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("7"),
                ),
        )
        .subcommand(
            command!("export")
                .about("Exports every audited site with its score and outreach drafts")
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the export")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .default_value(DEFAULT_OUTPUT_CSV),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Export format: csv, json")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                ),
        )
}
