use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GenomeId, ResourceKind};
use crate::error::GrmError;

const BUILTIN_GENOMES: &str = include_str!("genomes.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub gtf: String,
    pub ref_genome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_trans: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salmon_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_index: Option<String>,
}

impl GenomeRecord {
    pub fn locator(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Gtf => Some(self.gtf.as_str()),
            ResourceKind::RefGenome => Some(self.ref_genome.as_str()),
            ResourceKind::RefTrans => self.ref_trans.as_deref(),
            ResourceKind::SalmonIndex => self.salmon_index.as_deref(),
            ResourceKind::StarIndex => self.star_index.as_deref(),
        }
    }

    pub fn available_kinds(&self) -> Vec<ResourceKind> {
        [
            ResourceKind::Gtf,
            ResourceKind::RefGenome,
            ResourceKind::RefTrans,
            ResourceKind::SalmonIndex,
            ResourceKind::StarIndex,
        ]
        .into_iter()
        .filter(|kind| self.locator(*kind).is_some())
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Registry {
    genomes: HashMap<String, GenomeRecord>,
}

impl Registry {
    pub fn builtin() -> Result<Self, GrmError> {
        Self::from_json_str(BUILTIN_GENOMES)
    }

    pub fn from_json_str(document: &str) -> Result<Self, GrmError> {
        let genomes: HashMap<String, GenomeRecord> = serde_json::from_str(document)
            .map_err(|err| GrmError::RegistryParse(err.to_string()))?;
        Ok(Self { genomes })
    }

    pub fn from_records(records: impl IntoIterator<Item = (GenomeId, GenomeRecord)>) -> Self {
        Self {
            genomes: records
                .into_iter()
                .map(|(id, record)| (id.as_str().to_string(), record))
                .collect(),
        }
    }

    pub fn lookup(&self, id: &GenomeId) -> Option<&GenomeRecord> {
        self.genomes.get(id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenomeRecord)> {
        self.genomes
            .iter()
            .map(|(id, record)| (id.as_str(), record))
    }

    pub fn summarize(&self) -> RegistrySummary {
        let mut genomes: Vec<GenomeSummary> = self
            .genomes
            .iter()
            .map(|(id, record)| GenomeSummary {
                id: id.clone(),
                resources: record
                    .available_kinds()
                    .into_iter()
                    .map(|kind| kind.to_string())
                    .collect(),
            })
            .collect();
        genomes.sort_by(|a, b| a.id.cmp(&b.id));
        RegistrySummary { genomes }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    pub genomes: Vec<GenomeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenomeSummary {
    pub id: String,
    pub resources: Vec<String>,
}
