use crate::config::toml_config::ConverterConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "catalog-etl")]
#[command(about = "Remaps a vendor catalog CSV onto the column layout of a template CSV")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source catalog CSV
    #[arg(short, long)]
    pub input: Option<String>,

    /// Converted CSV to create
    #[arg(short, long)]
    pub output: Option<String>,

    /// CSV whose header row defines the output columns
    #[arg(short, long)]
    pub template: Option<String>,

    /// Append-only processing log
    #[arg(long, conflicts_with = "no_log_file")]
    pub log_file: Option<String>,

    /// Do not write a processing log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Console log format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Skip rows whose UPC is not at least twelve digits
    #[arg(long)]
    pub strict_upc: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Defaults, then the config file, then command line flags.
    pub fn load(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_file(path)?,
            None => ConverterConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ConverterConfig) {
        if let Some(input) = &self.input {
            config.files.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.files.output = output.clone();
        }
        if let Some(template) = &self.template {
            config.files.template = template.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.logging.file = Some(log_file.clone());
        }
        if self.no_log_file {
            config.logging.file = None;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if self.strict_upc {
            config.transform.strict_upc = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_defaults() {
        let cli = CliConfig::parse_from([
            "catalog-etl",
            "--input",
            "vendor.csv",
            "--no-log-file",
            "--strict-upc",
            "--log-format",
            "json",
        ]);
        let config = cli.load().unwrap();

        assert_eq!(config.files.input, "vendor.csv");
        assert_eq!(config.files.output, "formatted.csv");
        assert_eq!(config.log_file(), None);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.transform.strict_upc);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[files]\ninput = \"from-file.csv\"\noutput = \"out-from-file.csv\"\n")
            .unwrap();

        let cli = CliConfig {
            config: Some(temp_file.path().to_path_buf()),
            output: Some("out-from-cli.csv".to_string()),
            ..Default::default()
        };
        let config = cli.load().unwrap();

        assert_eq!(config.files.input, "from-file.csv");
        assert_eq!(config.files.output, "out-from-cli.csv");
    }

    #[test]
    fn test_log_file_flags_conflict() {
        let result = CliConfig::try_parse_from(["catalog-etl", "--log-file", "a.log", "--no-log-file"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/nonexistent/catalog-etl.toml")),
            ..Default::default()
        };
        assert!(cli.load().is_err());
    }
}
