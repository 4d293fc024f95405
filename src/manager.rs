use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use url::Url;

use crate::backend::{self, TransferBackend};
use crate::domain::{GenomeId, ResourceKind};
use crate::error::GrmError;
use crate::registry::{GenomeRecord, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPolicy {
    pub single_file: bool,
    pub index_sync: bool,
}

impl ProgressPolicy {
    pub fn all(show: bool) -> Self {
        Self {
            single_file: show,
            index_sync: show,
        }
    }

    fn for_kind(self, kind: ResourceKind) -> bool {
        if kind.is_directory() {
            self.index_sync
        } else {
            self.single_file
        }
    }
}

impl Default for ProgressPolicy {
    // historical defaults: quiet single-file copies, visible index syncs
    fn default() -> Self {
        Self {
            single_file: false,
            index_sync: true,
        }
    }
}

pub struct GenomeManager {
    id: GenomeId,
    registry: Registry,
    backend: Option<Box<dyn TransferBackend>>,
    dest_root: Utf8PathBuf,
    progress: ProgressPolicy,
}

impl GenomeManager {
    pub fn new(id: impl Into<GenomeId>) -> Result<Self, GrmError> {
        Self::with_registry(id, Registry::builtin()?)
    }

    pub fn with_registry(id: impl Into<GenomeId>, registry: Registry) -> Result<Self, GrmError> {
        let backend = backend::select_backend().into_backend();
        if backend.is_none() {
            tracing::warn!(
                "no transfer backend found - install a blobstore CLI (eg. s5cmd or the aws CLI)"
            );
        }
        Ok(Self {
            id: id.into(),
            registry,
            backend,
            dest_root: current_dir_utf8()?,
            progress: ProgressPolicy::default(),
        })
    }

    pub fn new_with_parts(
        id: impl Into<GenomeId>,
        registry: Registry,
        backend: Option<Box<dyn TransferBackend>>,
        dest_root: Utf8PathBuf,
    ) -> Self {
        Self {
            id: id.into(),
            registry,
            backend,
            dest_root,
            progress: ProgressPolicy::default(),
        }
    }

    pub fn with_progress_policy(mut self, progress: ProgressPolicy) -> Self {
        self.progress = progress;
        self
    }

    pub fn genome_id(&self) -> &GenomeId {
        &self.id
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_deref().map(|backend| backend.name())
    }

    pub fn record(&self) -> Result<&GenomeRecord, GrmError> {
        self.registry
            .lookup(&self.id)
            .ok_or_else(|| GrmError::UnregisteredGenome(self.id.to_string()))
    }

    // Concurrent downloads into the same destination root race on directory
    // creation and partial writes; callers must keep destinations disjoint.
    pub fn download(&self, kind: ResourceKind) -> Result<Utf8PathBuf, GrmError> {
        let record = self.record()?;
        let locator = record
            .locator(kind)
            .ok_or_else(|| GrmError::ResourceNotAvailable {
                genome: self.id.to_string(),
                resource: kind.describe().to_string(),
            })?;
        let backend = self.backend.as_deref().ok_or(GrmError::BackendUnavailable)?;

        let root = self.absolute_root()?;
        let show_progress = self.progress.for_kind(kind);
        match kind.index_dir_name() {
            Some(dir_name) => {
                let local = root.join(dir_name);
                create_index_dir(&local)?;
                backend.sync(locator, &local, show_progress)?;
                Ok(local)
            }
            None => {
                let local = root.join(locator_basename(locator)?);
                backend.copy(locator, &local, show_progress)?;
                Ok(local)
            }
        }
    }

    pub fn download_gtf(&self) -> Result<Utf8PathBuf, GrmError> {
        self.download(ResourceKind::Gtf)
    }

    pub fn download_ref_genome(&self) -> Result<Utf8PathBuf, GrmError> {
        self.download(ResourceKind::RefGenome)
    }

    pub fn download_ref_trans(&self) -> Result<Utf8PathBuf, GrmError> {
        self.download(ResourceKind::RefTrans)
    }

    pub fn download_salmon_index(&self) -> Result<Utf8PathBuf, GrmError> {
        self.download(ResourceKind::SalmonIndex)
    }

    pub fn download_star_index(&self) -> Result<Utf8PathBuf, GrmError> {
        self.download(ResourceKind::StarIndex)
    }

    pub fn download_report(&self, kind: ResourceKind) -> Result<DownloadReport, GrmError> {
        let path = self.download(kind)?;
        Ok(DownloadReport {
            genome: self.id.to_string(),
            resource: kind.to_string(),
            backend: self.backend_name().map(str::to_string),
            path: path.to_string(),
        })
    }

    fn absolute_root(&self) -> Result<Utf8PathBuf, GrmError> {
        if self.dest_root.is_absolute() {
            Ok(self.dest_root.clone())
        } else {
            Ok(current_dir_utf8()?.join(&self.dest_root))
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadReport {
    pub genome: String,
    pub resource: String,
    pub backend: Option<String>,
    pub path: String,
}

fn locator_basename(locator: &str) -> Result<String, GrmError> {
    let url = Url::parse(locator).map_err(|_| GrmError::InvalidLocator(locator.to_string()))?;
    url.path_segments()
        .and_then(|mut segments| segments.rev().find(|segment| !segment.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| GrmError::InvalidLocator(locator.to_string()))
}

fn create_index_dir(path: &Utf8Path) -> Result<(), GrmError> {
    if path.as_std_path().exists() {
        return Err(GrmError::DirectoryAlreadyExists(path.to_path_buf()));
    }
    std::fs::create_dir(path.as_std_path()).map_err(|err| match err.kind() {
        std::io::ErrorKind::AlreadyExists => GrmError::DirectoryAlreadyExists(path.to_path_buf()),
        _ => GrmError::Filesystem(err.to_string()),
    })
}

fn current_dir_utf8() -> Result<Utf8PathBuf, GrmError> {
    let cwd = std::env::current_dir().map_err(|err| GrmError::Filesystem(err.to_string()))?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|_| GrmError::Filesystem("non-utf8 working directory".to_string()))
}
