use clap::Parser;

/// Command line interface for the application
#[derive(Parser)]
pub struct Cli {
    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Defaults to the LOG_LEVEL environment variable
    #[arg(long)]
    pub logging_level: Option<String>,

    /// Overrides the API_PORT environment variable
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Overrides the WORKER_COUNT environment variable
    #[arg(long)]
    pub workers: Option<usize>,

    /// Overrides the DATABASE_PATH environment variable
    #[arg(long)]
    pub database_path: Option<String>,

    /// Also writes logs to daily rotating files in the "logs" directory
    #[arg(long, default_value_t = false)]
    pub log_to_file: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_parse() {
        let cli = Cli::try_parse_from([
            "taskqd",
            "--logging-level",
            "debug",
            "--api-port",
            "8080",
            "--workers",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.logging_level.as_deref(), Some("debug"));
        assert_eq!(cli.api_port, Some(8080));
        assert_eq!(cli.workers, Some(2));
        assert!(cli.database_path.is_none());
        assert!(!cli.log_to_file);
    }
}
