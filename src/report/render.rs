//! Statement renderers

use serde::{Deserialize, Serialize};

use crate::report::StatementReport;
use crate::traits::StatementRenderer;
use crate::types::*;

/// Serializes the statement as JSON. Money stays in exact decimal strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStatementRenderer {
    pub pretty: bool,
}

impl JsonStatementRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl StatementRenderer for JsonStatementRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &StatementReport) -> NjangiResult<Vec<u8>> {
        let rendered = if self.pretty {
            serde_json::to_vec_pretty(report)
        } else {
            serde_json::to_vec(report)
        };
        rendered.map_err(|e| NjangiError::Export(e.to_string()))
    }
}

/// A rendered statement ready to be sent as a download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedStatement {
    pub filename: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// `statement-first-last.ext`, with anything outside `[a-z0-9-]` dropped
pub fn statement_filename(member: &Member, extension: &str) -> String {
    let stem: String = format!("statement-{}-{}", member.first_name, member.last_name)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!("{}.{}", stem.trim_end_matches('-'), extension)
}
