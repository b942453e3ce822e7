use clap::{Parser, Subcommand};

use hamster_cli::commands::{config_ops, session_ops};

#[derive(Parser)]
#[command(name = "sessiontool", about = "Hamster input session diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deploy the schema directories and list the schemas as JSON
    Schemas {
        /// Directory with the bundled schema files
        #[arg(long)]
        shared_dir: String,
        /// Directory with user schema files (override bundled ones by id)
        #[arg(long, default_value = "Rime")]
        user_dir: String,
    },

    /// Replay a script of key events and print one JSON line per event
    Replay {
        /// Path to the script file
        script_file: String,
        /// Directory with the bundled schema files
        #[arg(long)]
        shared_dir: String,
        /// Directory with user schema files
        #[arg(long, default_value = "Rime")]
        user_dir: String,
        /// Session settings file (TOML); built-in defaults when omitted
        #[arg(long)]
        config: Option<String>,
    },

    /// Print the built-in settings file
    ConfigExport,

    /// Validate a settings file
    ConfigValidate {
        /// Path to the settings file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Schemas {
            shared_dir,
            user_dir,
        } => session_ops::schemas(&shared_dir, &user_dir),
        Command::Replay {
            script_file,
            shared_dir,
            user_dir,
            config,
        } => session_ops::replay(&script_file, &shared_dir, &user_dir, config.as_deref()),
        Command::ConfigExport => config_ops::config_export(),
        Command::ConfigValidate { file } => config_ops::config_validate(&file),
    }
}
