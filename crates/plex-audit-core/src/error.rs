use std::fmt;
use thiserror::Error;

/// The query a fatal database error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SectionSummary,
    TopLevelItems,
    GroupRollup,
    ViewEvents,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SectionSummary => "section summary",
            Stage::TopLevelItems => "top-level items",
            Stage::GroupRollup => "group rollup",
            Stage::ViewEvents => "view events",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{stage} query failed: {source}")]
    Query {
        stage: Stage,
        #[source]
        source: rusqlite::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid decay window: {0} months")]
    InvalidWindow(u32),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl Error {
    pub(crate) fn query(stage: Stage) -> impl FnOnce(rusqlite::Error) -> Error {
        move |source| Error::Query { stage, source }
    }
}
