use crate::core::transformer::TransformOptions;
use crate::domain::model::BooleanTokens;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_delimiter, validate_distinct_paths, validate_non_empty_string, validate_path, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub files: FilesConfig,
    pub csv: CsvConfig,
    pub output: OutputConfig,
    pub transform: TransformConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub input: String,
    pub output: String,
    pub template: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input: "homework.csv".to_string(),
            output: "formatted.csv".to_string(),
            template: "example.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(flatten)]
    pub boolean_tokens: BooleanTokens,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub strict_upc: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only processing log. An empty path disables it.
    pub file: Option<String>,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: Some("csv_processing.log".to_string()),
            format: LogFormat::Compact,
        }
    }
}

impl ConverterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("files.input", &self.files.input)?;
        validate_path("files.output", &self.files.output)?;
        validate_path("files.template", &self.files.template)?;
        validate_distinct_paths("files.output", &self.files.output, "files.input", &self.files.input)?;
        validate_distinct_paths(
            "files.output",
            &self.files.output,
            "files.template",
            &self.files.template,
        )?;

        validate_delimiter("csv.delimiter", &self.csv.delimiter)?;

        let tokens = &self.output.boolean_tokens;
        validate_non_empty_string("output.true_token", &tokens.true_token)?;
        validate_non_empty_string("output.false_token", &tokens.false_token)?;
        if tokens.true_token == tokens.false_token {
            return Err(EtlError::InvalidConfigValueError {
                field: "output.false_token".to_string(),
                value: tokens.false_token.clone(),
                reason: "Must differ from output.true_token".to_string(),
            });
        }

        if let Some(log_file) = self.logging.file.as_deref().filter(|file| !file.is_empty()) {
            validate_path("logging.file", log_file)?;
        }

        Ok(())
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            strict_upc: self.transform.strict_upc,
        }
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.logging
            .file
            .as_deref()
            .filter(|file| !file.is_empty())
            .map(Path::new)
    }
}

impl ConfigProvider for ConverterConfig {
    fn input_path(&self) -> &Path {
        Path::new(&self.files.input)
    }

    fn output_path(&self) -> &Path {
        Path::new(&self.files.output)
    }

    fn template_path(&self) -> &Path {
        Path::new(&self.files.template)
    }

    fn delimiter(&self) -> Result<u8> {
        validate_delimiter("csv.delimiter", &self.csv.delimiter)
    }

    fn boolean_tokens(&self) -> &BooleanTokens {
        &self.output.boolean_tokens
    }
}

impl Validate for ConverterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
