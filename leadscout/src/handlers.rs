use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use leadscout_core::config::{DATABASE_FILE, DEFAULT_CONFIG_DIR, DEFAULT_INPUT_CSV, PipelineConfig};
use leadscout_core::data::{AddOutcome, Database};
use leadscout_core::export::{
    ExportOutcome, ReportFormat, export_sites, format_display_timestamp, sorted_by_score,
};
use leadscout_core::import::{import_sites, load_sites_csv, write_sample_csv};
use leadscout_core::model::{NewSite, SiteStatus};
use leadscout_core::pipeline::{Pipeline, PipelineSummary};
use leadscout_core::scoring::LeadScorer;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// `--db` if given, otherwise the database inside the default config directory.
pub fn resolve_db_path(matches: &ArgMatches) -> PathBuf {
    match matches.get_one::<String>("db") {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => {
            let config_dir = shellexpand::tilde(DEFAULT_CONFIG_DIR);
            Path::new(config_dir.as_ref()).join(DATABASE_FILE)
        }
    }
}

/// Run settings from `run` flags layered over the defaults.
pub fn pipeline_config_from_args(args: &ArgMatches) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(*timeout);
    }
    if let Some(delay_ms) = args.get_one::<u64>("delay-ms") {
        config = config.with_delay(Duration::from_millis(*delay_ms));
    }
    if let Some(threshold) = args.get_one::<u32>("threshold") {
        config = config.with_qualification_score(*threshold);
    }
    config
}

/// Opens an existing database; never creates one behind the user's back.
pub fn open_database(db_path: &Path) -> Result<Database> {
    if !Database::exists(db_path) {
        bail!(
            "no database at {}. Run `leadscout init` first",
            db_path.display()
        );
    }
    Database::new(db_path).with_context(|| format!("opening {}", db_path.display()))
}

/// Database that `init` should create: `--db` when given, otherwise the
/// database file inside the chosen config directory.
pub fn init_db_path(args: &ArgMatches) -> PathBuf {
    if args.get_one::<String>("db").is_some() {
        return resolve_db_path(args);
    }
    let config_dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_DIR);
    Path::new(shellexpand::tilde(config_dir).as_ref()).join(DATABASE_FILE)
}

/// Creates the database at `db_path` and its parent directory, replacing an
/// existing database only when `overwrite` is set.
pub fn initialize_database(db_path: &Path, overwrite: bool) -> Result<()> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    if overwrite && Database::exists(db_path) {
        Database::drop(db_path)?;
        debug!("Dropped existing database at {}", db_path.display());
    }
    Database::new(db_path)?;
    Ok(())
}

/// Creates the config directory and database, replacing an existing
/// database only when `overwrite` is set. Returns the database path.
pub fn initialize(config_dir: &Path, overwrite: bool) -> Result<PathBuf> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating {}", config_dir.display()))?;

    let db_path = config_dir.join(DATABASE_FILE);
    initialize_database(&db_path, overwrite)?;
    Ok(db_path)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_header(title: &str) {
    print_divider();
    println!("{}", format!("  {}", title).bright_white().bold());
    print_divider();
    println!();
}

fn read_input(msg: &str) -> Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_string())
}

fn print_prompt(msg: &str) -> Result<String> {
    Ok(read_input(msg)?.to_lowercase())
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_header("LEADSCOUT INITIALIZATION");

    let config_dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");
    let expanded_config_dir = shellexpand::tilde(config_dir);
    let config_dir = Path::new(expanded_config_dir.as_ref());
    let db_path = init_db_path(args);

    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating {}", config_dir.display()))?;

    println!(
        "{} Target: {}",
        "→".blue(),
        config_dir.display().to_string().bright_white()
    );
    println!();

    let mut overwrite = force;
    if Database::exists(&db_path) && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Database already exists at:");
        println!(
            "  {} {}",
            "•".yellow(),
            db_path.display().to_string().bright_white()
        );
        println!();

        let response = print_prompt("Would you like to overwrite it? [y/N]:")?;
        println!();

        overwrite = response == "y" || response == "yes";
        if !overwrite {
            println!("{} Keeping existing database", "→".blue());
            println!();
        }
    }

    initialize_database(&db_path, overwrite)?;
    println!(
        "{} Database ready: {}",
        "✓".green().bold(),
        db_path.display().to_string().bright_white()
    );

    let sample_path = Path::new(DEFAULT_INPUT_CSV);
    if sample_path.exists() {
        println!(
            "{} Keeping existing site list: {}",
            "→".blue(),
            sample_path.display().to_string().bright_white()
        );
    } else {
        write_sample_csv(sample_path)?;
        println!(
            "{} Sample site list: {}",
            "✓".green().bold(),
            sample_path.display().to_string().bright_white()
        );
    }

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    println!("Next steps:");
    println!("  1. Edit {} with your target sites", DEFAULT_INPUT_CSV);
    println!("  2. leadscout sites import");
    println!("  3. leadscout run");
    println!("  4. leadscout export");
    println!();
    Ok(())
}

pub fn handle_sites_add(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;

    // Prompt for the rest only when working interactively
    let (domain, category, location) = match args.get_one::<String>("domain") {
        Some(domain) => (
            domain.clone(),
            args.get_one::<String>("category").cloned().unwrap_or_default(),
            args.get_one::<String>("location").cloned().unwrap_or_default(),
        ),
        None => {
            let domain = read_input("Domain (e.g. example.com):")?;
            let category = match args.get_one::<String>("category") {
                Some(category) => category.clone(),
                None => read_input("Category (optional):")?,
            };
            let location = match args.get_one::<String>("location") {
                Some(location) => location.clone(),
                None => read_input("Location (optional):")?,
            };
            (domain, category, location)
        }
    };

    if domain.trim().is_empty() {
        bail!("a domain is required");
    }

    let outcome = db.add_site(&NewSite::manual(&domain, &category, &location))?;
    match &outcome {
        AddOutcome::Added(site) => println!(
            "{} {}: {}",
            "✓".green().bold(),
            outcome.message(),
            site.domain.bright_white()
        ),
        AddOutcome::Duplicate => println!(
            "{} {}: {}",
            "⚠".yellow().bold(),
            outcome.message(),
            domain.trim().bright_white()
        ),
    }
    Ok(())
}

pub fn handle_sites_import(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let input = args
        .get_one::<PathBuf>("input")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_CSV));
    let db = open_database(db_path)?;

    let sites =
        load_sites_csv(&input).with_context(|| format!("reading {}", input.display()))?;
    println!(
        "{} Found {} sites in {}",
        "→".blue(),
        sites.len(),
        input.display().to_string().bright_white()
    );

    let summary = import_sites(&db, &sites)?;
    for domain in &summary.added {
        println!("  {} {}", "✓".green(), domain);
    }
    for (domain, reason) in &summary.skipped {
        println!("  {} {} ({})", "⚠".yellow(), domain, reason.dimmed());
    }

    println!();
    println!(
        "{} Imported {} sites, skipped {}",
        "✓".green().bold(),
        summary.added.len().to_string().cyan(),
        summary.skipped.len().to_string().cyan()
    );
    Ok(())
}

pub fn handle_sites_template(args: &ArgMatches) -> Result<()> {
    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_CSV));

    write_sample_csv(&output).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} Sample CSV written to {}",
        "✓".green().bold(),
        output.display().to_string().bright_white()
    );
    Ok(())
}

pub fn handle_sites_list(db_path: &Path) -> Result<()> {
    let db = open_database(db_path)?;
    let sites = db.get_sites()?;

    if sites.is_empty() {
        println!(
            "{} No sites yet. Add some with `leadscout sites add` or `leadscout sites import`",
            "ℹ".blue()
        );
        return Ok(());
    }

    print_header("SITES");
    println!(
        "  {:<32} {:<18} {:<18} {:<10} {}",
        "DOMAIN".bold(),
        "CATEGORY".bold(),
        "LOCATION".bold(),
        "STATUS".bold(),
        "LAST AUDIT".bold()
    );
    for site in &sites {
        let status = match site.status {
            SiteStatus::Audited => site.status.as_str().green(),
            SiteStatus::Failed | SiteStatus::Error => site.status.as_str().red(),
            SiteStatus::Pending | SiteStatus::Validated => site.status.as_str().yellow(),
        };
        let last_audit = site
            .last_audit_at
            .map(format_display_timestamp)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<32} {:<18} {:<18} {:<10} {}",
            site.domain, site.category, site.location, status, last_audit
        );
        if let Some(error) = &site.error {
            println!("    {} {}", "↳".red(), error.dimmed());
        }
    }

    println!();
    let counts = db
        .count_sites_by_status()?
        .into_iter()
        .map(|(status, count)| format!("{} {}", count, status.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} {} sites: {}", "ℹ".blue(), sites.len(), counts);
    Ok(())
}

pub async fn handle_run(args: &ArgMatches, db_path: &Path, quiet: bool) -> Result<()> {
    let config = pipeline_config_from_args(args);
    let db = open_database(db_path)?;

    if !quiet {
        print_header("AUDIT PIPELINE");
        println!(
            "Timeout: {}s  Delay: {}ms  Qualification score: {}",
            config.audit.timeout_secs,
            config.audit.request_delay.as_millis(),
            config.scoring.qualification_score
        );
        println!();
    }

    let pipeline = Pipeline::new(&config)?.with_progress_bars(!quiet);
    let summary = pipeline.run(&db, None).await?;

    if summary.to_audit == 0 {
        println!(
            "{} No pending sites. Add sites with `leadscout sites import`",
            "ℹ".blue()
        );
        return Ok(());
    }

    print_run_summary(&summary);
    Ok(())
}

fn print_run_summary(summary: &PipelineSummary) {
    println!();
    print_divider();
    println!("{}", "  PIPELINE COMPLETE".green().bold());
    print_divider();
    println!("  Total sites:      {}", summary.total_sites);
    println!("  Audited this run: {}", summary.processed.to_string().cyan());
    println!(
        "  Qualified leads:  {}",
        summary.qualified.to_string().green().bold()
    );
    println!("  Failed:           {}", summary.failed.to_string().red());
    println!("  Errors:           {}", summary.errored.to_string().red());
    println!();
    println!("Next: leadscout export");
}

pub fn handle_export(args: &ArgMatches, db_path: &Path) -> Result<()> {
    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .context("missing output path")?;
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("csv");
    let Some(format) = ReportFormat::from_str(format_name) else {
        bail!("unknown export format '{}'", format_name);
    };

    let db = open_database(db_path)?;
    let scorer = LeadScorer::default();

    let pb = spinner("Gathering audited sites...");
    let outcome = export_sites(&db, &scorer, &output, format);
    pb.finish_and_clear();

    match outcome? {
        ExportOutcome::Empty => {
            println!(
                "{} No audited sites to export. Run `leadscout run` first",
                "⚠".yellow().bold()
            );
        }
        ExportOutcome::Written { path, rows, stats } => {
            print_header("EXPORT SUMMARY");
            println!("  Total audited:      {}", stats.total);
            println!(
                "  Qualified leads:    {}",
                stats.qualified.to_string().green().bold()
            );
            println!("  Good sites:         {}", stats.good);
            println!("  With email:         {}", stats.with_email);
            println!("  Without email:      {}", stats.without_email);
            println!("  Average lead score: {:.1}", stats.average_score);
            println!();

            println!("{}", "Sites by lead score:".bold());
            for row in sorted_by_score(&rows) {
                let score = format!("{:>3}", row.lead_score);
                let score = if row.lead_score >= scorer.qualification_score() {
                    score.green().bold()
                } else {
                    score.normal()
                };
                println!("  {}  {:<32} {}", score, row.domain, row.summary.dimmed());
            }

            println!();
            println!(
                "{} Exported {} sites to {}",
                "✓".green().bold(),
                rows.len(),
                path.display().to_string().bright_white()
            );
        }
    }
    Ok(())
}
