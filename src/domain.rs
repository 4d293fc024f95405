use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeId(String);

impl GenomeId {
    // TODO: validate identifiers against the release registry once the id scheme stabilizes.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GenomeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GenomeId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Gtf,
    RefGenome,
    RefTrans,
    SalmonIndex,
    StarIndex,
}

impl ResourceKind {
    pub fn index_dir_name(self) -> Option<&'static str> {
        match self {
            ResourceKind::SalmonIndex => Some("salmon_index"),
            ResourceKind::StarIndex => Some("star_index"),
            ResourceKind::Gtf | ResourceKind::RefGenome | ResourceKind::RefTrans => None,
        }
    }

    pub fn is_directory(self) -> bool {
        self.index_dir_name().is_some()
    }

    pub fn describe(self) -> &'static str {
        match self {
            ResourceKind::Gtf => "GTF annotation",
            ResourceKind::RefGenome => "reference genome",
            ResourceKind::RefTrans => "reference transcriptome",
            ResourceKind::SalmonIndex => "salmon index",
            ResourceKind::StarIndex => "STAR index",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Gtf => write!(f, "gtf"),
            ResourceKind::RefGenome => write!(f, "ref-genome"),
            ResourceKind::RefTrans => write!(f, "ref-trans"),
            ResourceKind::SalmonIndex => write!(f, "salmon-index"),
            ResourceKind::StarIndex => write!(f, "star-index"),
        }
    }
}
