use colored::Colorize;

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod outreach;
pub mod pipeline;
pub mod scoring;

pub use error::{CoreError, Result};

const BANNER: &str = r#"
  _                _                 _
 | | ___  __ _  __| |___  ___ ___  _| |_
 | |/ -_)/ _` |/ _` (_-< / _/ _ \ || |  _|
 |_|\___|\__,_|\__,_/__/ \__\___/\_,_|\__|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "website audits -> qualified leads".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
