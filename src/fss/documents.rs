//! Finance document metadata and its presentation enrichment.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Metadata for one finance document, as returned by FSS, plus the two
/// presentation fields this backend derives for the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document id, used to fetch the file itself.
    pub id: String,
    /// Stored file name.
    pub file_name: String,
    /// Owning local authority.
    pub local_authority: String,
    /// Financial year the document belongs to.
    pub financial_year: String,
    /// Quarter within the financial year (e.g. `"Q2"`).
    pub quarter: String,
    /// Creation timestamp (RFC 3339).
    pub creation_date: String,
    /// Document type key (`grant`, `remittance`, `notice_of_assessment`).
    pub document_type: String,
    /// Document language.
    pub language: String,
    /// Derived: short display date (`"5 Aug 2026"`). Absent when the
    /// creation date does not parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_date: Option<String>,
    /// Derived: display name (`"Grant letter Q2"`). Absent for unknown
    /// document types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
}

/// Fill in the derived presentation fields on every entry.
pub fn enrich_document_details(documents: &mut [DocumentMetadata]) {
    for doc in documents {
        doc.formatted_date = format_short_date(&doc.creation_date);
        doc.document_name = display_name(&doc.document_type, &doc.quarter);
    }
}

/// `"2026-08-05T09:30:00Z"` -> `"5 Aug 2026"`. `None` when unparseable.
fn format_short_date(iso: &str) -> Option<String> {
    let date = DateTime::parse_from_rfc3339(iso).ok()?;
    Some(date.format("%-d %b %Y").to_string())
}

/// Display name for a document type key plus quarter.
fn display_name(document_type: &str, quarter: &str) -> Option<String> {
    let type_name = match document_type.to_lowercase().as_str() {
        "grant" => "Grant letter",
        "remittance" => "Remittance letter",
        "notice_of_assessment" => "Notice of assessment",
        _ => return None,
    };
    Some(format!("{type_name} {quarter}"))
}
