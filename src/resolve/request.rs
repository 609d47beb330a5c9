//! What a caller asks for.

use crate::types::LookupError;

/// One package lookup, by exactly one kind of identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupRequest {
    ByIdentity { ecosystem: String, name: String },
    ByPurl { purl: String },
    ByRepositoryUrl { url: String },
}

impl LookupRequest {
    /// Build a request from loosely supplied fields.
    ///
    /// Empty strings count as absent. When several identifiers are present
    /// the purl wins, then ecosystem+name, then the repository URL.
    pub fn from_parts(
        purl: Option<&str>,
        ecosystem: Option<&str>,
        name: Option<&str>,
        repository_url: Option<&str>,
    ) -> Result<Self, LookupError> {
        let present = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(purl) = present(purl) {
            return Ok(Self::ByPurl { purl });
        }
        if let (Some(ecosystem), Some(name)) = (present(ecosystem), present(name)) {
            return Ok(Self::ByIdentity { ecosystem, name });
        }
        if let Some(url) = present(repository_url) {
            return Ok(Self::ByRepositoryUrl { url });
        }

        Err(LookupError::invalid_input(
            "Provide ecosystem+name, purl, or repository_url",
        ))
    }
}
