//! # Project and Engineer Metadata
//!
//! The engine reads only the project fields it stamps onto a quantity
//! report. Project CRUD belongs to the surrounding application.
//!
//! ## Example
//!
//! ```rust
//! use kamiyat_core::project::ProjectInfo;
//!
//! let project = ProjectInfo::new("villa-12", "Villa 12", "Omar Haddad")
//!     .with_owner_email("omar@example.com");
//! assert_eq!(project.linked_owner_email.as_deref(), Some("omar@example.com"));
//! ```

use serde::{Deserialize, Serialize};

/// A project as the report manager sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    /// Property owner shown on the report
    pub client_name: String,
    /// Owner account the report can be sent to
    #[serde(default)]
    pub linked_owner_email: Option<String>,
}

impl ProjectInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, client_name: impl Into<String>) -> Self {
        ProjectInfo {
            id: id.into(),
            name: name.into(),
            client_name: client_name.into(),
            linked_owner_email: None,
        }
    }

    pub fn with_owner_email(mut self, email: impl Into<String>) -> Self {
        self.linked_owner_email = Some(email.into());
        self
    }
}

/// The engineer saving a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineerInfo {
    pub engineer_id: String,
    pub engineer_name: String,
}

impl EngineerInfo {
    pub fn new(engineer_id: impl Into<String>, engineer_name: impl Into<String>) -> Self {
        EngineerInfo {
            engineer_id: engineer_id.into(),
            engineer_name: engineer_name.into(),
        }
    }
}
