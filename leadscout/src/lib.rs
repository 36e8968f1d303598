pub mod commands;
pub mod handlers;

pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{
    init_db_path, initialize, initialize_database, open_database, pipeline_config_from_args,
    resolve_db_path,
};
