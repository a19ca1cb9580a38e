mod normalizer;
mod parser;
pub mod vocabulary;

use crate::config::LeadSourceConfig;
use crate::workflows::outreach::domain::LeadTable;
use calamine::{open_workbook_auto, Reader};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub use parser::{
    SourceCell, APPROACHED_AT_COLUMN, CHANNEL_COLUMN, OUTCOME_COLUMN, REQUIRED_COLUMNS,
    SEGMENT_COLUMN,
};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "xlam", "ods"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("lead spreadsheet not found: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid spreadsheet data: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook contains no worksheets")]
    EmptyWorkbook,
    #[error("worksheet '{0}' not found in workbook")]
    SheetNotFound(String),
    #[error("required column '{column}' is missing")]
    MissingColumn { column: &'static str },
    #[error("unsupported source format '{extension}' (expected xlsx, xls, xlsb, ods or csv)")]
    UnsupportedFormat { extension: String },
}

/// Coarse grouping of load failures for user-facing handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    MissingFile,
    Parse,
    GenericLoad,
}

/// User-visible explanation of why the dashboard could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadDiagnostic {
    pub kind: LoadErrorKind,
    pub headline: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<String>,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::MissingFile { .. } => LoadErrorKind::MissingFile,
            LoadError::MissingColumn { .. } => LoadErrorKind::Parse,
            LoadError::Io { .. }
            | LoadError::Spreadsheet(_)
            | LoadError::Csv(_)
            | LoadError::EmptyWorkbook
            | LoadError::SheetNotFound(_)
            | LoadError::UnsupportedFormat { .. } => LoadErrorKind::GenericLoad,
        }
    }

    pub fn diagnostic(&self) -> LoadDiagnostic {
        match self {
            LoadError::MissingFile { path } => {
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                LoadDiagnostic {
                    kind: self.kind(),
                    headline: "File not found!".to_string(),
                    checks: vec![
                        format!("The file `{file_name}` exists in the expected folder"),
                        format!("The path `{}` is correct", path.display()),
                        "You have permission to read the file".to_string(),
                    ],
                }
            }
            LoadError::MissingColumn { column } => LoadDiagnostic {
                kind: self.kind(),
                headline: format!("The spreadsheet has no '{column}' column"),
                checks: vec![format!(
                    "The header row contains the columns {}",
                    REQUIRED_COLUMNS.join(", ")
                )],
            },
            other => LoadDiagnostic {
                kind: self.kind(),
                headline: format!("Error loading the file: {other}"),
                checks: vec!["The error details above may help identify the problem".to_string()],
            },
        }
    }
}

/// Reads outreach spreadsheets into a cleaned [`LeadTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadLoader {
    sheet: Option<String>,
}

impl LoadDiagnostic {
    /// Used when no table reached the presenter at all.
    pub fn no_data() -> Self {
        Self {
            kind: LoadErrorKind::GenericLoad,
            headline: "No lead data loaded".to_string(),
            checks: vec!["Refresh the dashboard after fixing the data source".to_string()],
        }
    }
}

impl LeadLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    pub fn from_config(config: &LeadSourceConfig) -> Self {
        Self {
            sheet: config.sheet.clone(),
        }
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LeadTable, LoadError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading lead spreadsheet");

        match std::fs::metadata(path) {
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LoadError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
            Ok(_) => {}
        }

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if extension == "csv" {
            let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            return self.load_csv(path, file);
        }

        if !WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            return Err(LoadError::UnsupportedFormat { extension });
        }

        let rows = self.read_workbook(path)?;
        self.load_rows(path, rows)
    }

    pub fn load_csv<R: Read>(
        &self,
        source: impl Into<PathBuf>,
        reader: R,
    ) -> Result<LeadTable, LoadError> {
        let rows = parser::read_csv_cells(reader)?;
        self.load_rows(source, rows)
    }

    /// Builds a table from already-extracted cells; the first row is the header.
    pub fn load_rows<I>(&self, source: impl Into<PathBuf>, rows: I) -> Result<LeadTable, LoadError>
    where
        I: IntoIterator<Item = Vec<SourceCell>>,
    {
        let source = source.into();
        let parsed = parser::parse_rows(rows)?;
        if parsed.dropped > 0 {
            warn!(
                path = %source.display(),
                dropped = parsed.dropped,
                "skipped rows without a parseable approach date"
            );
        }
        debug!(path = %source.display(), records = parsed.records.len(), "lead table ready");

        Ok(LeadTable::new(source, parsed.records, parsed.dropped))
    }

    /// Loads the table, logging the diagnostic and returning `None` on failure.
    pub fn load_or_report<P: AsRef<Path>>(&self, path: P) -> Option<LeadTable> {
        match self.load(path.as_ref()) {
            Ok(table) => Some(table),
            Err(err) => {
                let diagnostic = err.diagnostic();
                error!(
                    path = %path.as_ref().display(),
                    kind = ?diagnostic.kind,
                    error = %err,
                    "lead spreadsheet unavailable"
                );
                None
            }
        }
    }

    fn read_workbook(&self, path: &Path) -> Result<Vec<Vec<SourceCell>>, LoadError> {
        let mut workbook = open_workbook_auto(path)?;

        let range = match &self.sheet {
            Some(name) => {
                if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
                    return Err(LoadError::SheetNotFound(name.clone()));
                }
                workbook.worksheet_range(name)?
            }
            None => workbook
                .worksheet_range_at(0)
                .ok_or(LoadError::EmptyWorkbook)??,
        };

        Ok(range
            .rows()
            .map(|row| row.iter().map(SourceCell::from).collect())
            .collect())
    }
}
