//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/curricula/config.toml` (XDG) or platform config dir
//! 2. Project config: `.curricula.toml`
//! 3. Environment variables: `CURRICULA_*`
//!
//! Every key has a default, so running without any config file reads the
//! workbook sheets as CSV files from the current directory. Setting
//! `workbook.file` reads them from a single `.xlsx` spreadsheet instead.
//!
//! # Example
//!
//! ```toml
//! [workbook]
//! dir = "data/1eso-geografia"
//! delimiter = ";"
//!
//! [workbook.sheets]
//! basics = "SSBB.csv"
//! links = "CE-DO.csv"
//!
//! [export]
//! dir = "out"
//! name = "relaciones_curriculares"
//! ```
//!
//! Environment variables split on `_`, so `CURRICULA_WORKBOOK_DIR=data`
//! sets `workbook.dir`.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub workbook: WorkbookConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Location and layout of the source workbook.
///
/// Either a single `.xlsx` file with one worksheet per sheet (`file`), or a
/// directory of CSV files, one per sheet (`dir` + `sheets`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookConfig {
    /// Spreadsheet holding all six sheets. Takes precedence over `dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Directory holding the sheet files.
    #[serde(default = "default_workbook_dir")]
    pub dir: PathBuf,
    /// Field delimiter of the sheet files.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub sheets: SheetFiles,
}

/// File name of each sheet, relative to the workbook directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetFiles {
    /// Basic knowledge items (`SSBB`).
    #[serde(default = "default_basics")]
    pub basics: String,
    /// SB relations to CE and CEv (`SSBB-CE-CEv`).
    #[serde(default = "default_relations")]
    pub relations: String,
    /// Criteria variants (`CEv`).
    #[serde(default = "default_variants")]
    pub variants: String,
    /// Evaluation criteria (`CE`).
    #[serde(default = "default_criteria")]
    pub criteria: String,
    /// Descriptors (`DO`).
    #[serde(default = "default_descriptors")]
    pub descriptors: String,
    /// CE to DO links (`CE-DO`).
    #[serde(default = "default_links")]
    pub links: String,
}

/// Export destination defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exports are written to.
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
    /// Base file name of exports.
    #[serde(default = "default_export_name")]
    pub name: String,
}

fn default_workbook_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_delimiter() -> char {
    ','
}

fn default_basics() -> String {
    "SSBB.csv".to_string()
}

fn default_relations() -> String {
    "SSBB-CE-CEv.csv".to_string()
}

fn default_variants() -> String {
    "CEv.csv".to_string()
}

fn default_criteria() -> String {
    "CE.csv".to_string()
}

fn default_descriptors() -> String {
    "DO.csv".to_string()
}

fn default_links() -> String {
    "CE-DO.csv".to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_export_name() -> String {
    "relaciones_curriculares".to_string()
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            file: None,
            dir: default_workbook_dir(),
            delimiter: default_delimiter(),
            sheets: SheetFiles::default(),
        }
    }
}

impl Default for SheetFiles {
    fn default() -> Self {
        Self {
            basics: default_basics(),
            relations: default_relations(),
            variants: default_variants(),
            criteria: default_criteria(),
            descriptors: default_descriptors(),
            links: default_links(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
            name: default_export_name(),
        }
    }
}

impl WorkbookConfig {
    /// Full path of a sheet file.
    pub fn sheet_path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// The delimiter as a single byte. CSV delimiters must be ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, AppError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(AppError::Validation(format!(
                "workbook.delimiter '{}' is not an ASCII character",
                self.delimiter
            )))
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(&Self::user_config_path())
            .extract()
            .map_err(ConfigError::from)
    }

    /// Read the workbook from a directory of CSV sheets.
    pub fn with_workbook_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.workbook.file = None;
        self.workbook.dir = dir.as_ref().to_path_buf();
        self
    }

    /// Read the workbook from a single spreadsheet file.
    pub fn with_workbook_file(mut self, file: impl AsRef<Path>) -> Self {
        self.workbook.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Apply the `--workbook` CLI flag: a file is a spreadsheet, anything
    /// else a sheet directory.
    pub fn with_workbook(self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_file() {
            self.with_workbook_file(path)
        } else {
            self.with_workbook_dir(path)
        }
    }

    fn figment(user_config: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(".curricula.toml"))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed("CURRICULA_").split("_"))
    }

    /// User config path: ~/.config/curricula/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("curricula").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("curricula").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_files() {
        Jail::expect_with(|jail| {
            let config: Config = Config::figment(&jail.directory().join("missing.toml"))
                .extract()
                .expect("defaults should extract");
            assert_eq!(config.workbook.dir, PathBuf::from("."));
            assert_eq!(config.workbook.delimiter, ',');
            assert_eq!(config.workbook.sheets.links, "CE-DO.csv");
            assert_eq!(config.export.name, "relaciones_curriculares");
            Ok(())
        });
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                ".curricula.toml",
                r#"
                [workbook]
                dir = "data"
                delimiter = ";"

                [workbook.sheets]
                basics = "saberes.csv"
                "#,
            )?;

            let config: Config = Config::figment(&jail.directory().join("missing.toml"))
                .extract()
                .expect("project config should extract");
            assert_eq!(config.workbook.dir, PathBuf::from("data"));
            assert_eq!(config.workbook.delimiter_byte().unwrap(), b';');
            assert_eq!(config.workbook.sheets.basics, "saberes.csv");
            assert_eq!(config.workbook.sheets.relations, "SSBB-CE-CEv.csv");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".curricula.toml", "[export]\nname = \"from_file\"\n")?;
            jail.set_env("CURRICULA_EXPORT_NAME", "from_env");
            jail.set_env("CURRICULA_WORKBOOK_DIR", "env-data");

            let config: Config = Config::figment(&jail.directory().join("missing.toml"))
                .extract()
                .expect("env config should extract");
            assert_eq!(config.export.name, "from_env");
            assert_eq!(config.workbook.dir, PathBuf::from("env-data"));
            Ok(())
        });
    }

    #[test]
    fn test_env_sets_workbook_file() {
        Jail::expect_with(|jail| {
            jail.set_env("CURRICULA_WORKBOOK_FILE", "SSBB.xlsx");

            let config: Config = Config::figment(&jail.directory().join("missing.toml"))
                .extract()
                .expect("env config should extract");
            assert_eq!(config.workbook.file, Some(PathBuf::from("SSBB.xlsx")));
            Ok(())
        });
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(".curricula.toml", "[workbook]\ndelimiter = \"§\"\n")?;

            let config: Config = Config::figment(&jail.directory().join("missing.toml"))
                .extract()
                .expect("any char extracts");
            let err = config.workbook.delimiter_byte().unwrap_err();
            assert!(matches!(err, AppError::Validation(ref msg) if msg.contains('§')));
            Ok(())
        });
    }

    #[test]
    fn test_with_workbook_picks_file_or_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("SSBB.xlsx");
        std::fs::write(&file, b"").unwrap();

        let config = Config::default().with_workbook(&file);
        assert_eq!(config.workbook.file, Some(file));

        let config = config.with_workbook(tmp.path());
        assert_eq!(config.workbook.file, None);
        assert_eq!(config.workbook.dir, tmp.path());
    }

    #[test]
    fn test_with_workbook_dir() {
        let config = Config::default().with_workbook_dir("elsewhere");
        assert_eq!(config.workbook.sheet_path("CE.csv"), PathBuf::from("elsewhere/CE.csv"));
    }
}
