//! Document-level metadata interpolated into the front matter.

use serde::{Deserialize, Serialize};

/// Approval and identification details of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DocumentDetails {
    /// Controlled document number
    pub document_number: String,

    /// Author
    pub prepared_by: String,

    /// Reviewer name
    pub reviewed_by_name: String,

    /// Reviewer designation
    pub reviewed_by_title: String,

    /// First approver name
    pub first_approver_name: String,

    /// First approver designation
    pub first_approver_title: String,

    /// Second approver name
    pub second_approver_name: String,

    /// Second approver designation
    pub second_approver_title: String,

    /// Whether the EID annexure is expected
    #[serde(rename = "EID")]
    pub eid: bool,

    /// Whether the result-format annexure is expected
    pub result_format: bool,
}

/// Satellite and subsystem identification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SubsystemDetails {
    /// Satellite class, quoted verbatim in the abstract
    pub satellite_class: String,

    /// Satellite name
    pub satellite_name: String,

    /// Subsystem name
    pub subsystem_name: String,

    /// Base64 satellite picture for the cover page
    #[serde(skip_serializing_if = "String::is_empty")]
    pub satellite_image: String,
}

impl SubsystemDetails {
    /// Title used in the page header.
    pub fn document_title(&self) -> String {
        format!(
            "IST Document for {} system of {}",
            self.subsystem_name, self.satellite_name
        )
    }
}
