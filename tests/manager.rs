use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};

use genome_resource_manager::backend::TransferBackend;
use genome_resource_manager::domain::{GenomeId, ResourceKind};
use genome_resource_manager::error::GrmError;
use genome_resource_manager::manager::{GenomeManager, ProgressPolicy};
use genome_resource_manager::registry::{GenomeRecord, Registry};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Transfer {
    Copy {
        src: String,
        dst: Utf8PathBuf,
        show_progress: bool,
    },
    Sync {
        src: String,
        dst: Utf8PathBuf,
        show_progress: bool,
    },
}

#[derive(Clone, Default)]
struct RecordingBackend {
    log: Arc<Mutex<Vec<Transfer>>>,
}

impl RecordingBackend {
    fn transfers(&self) -> Vec<Transfer> {
        self.log.lock().unwrap().clone()
    }
}

impl TransferBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn copy(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError> {
        self.log.lock().unwrap().push(Transfer::Copy {
            src: src.to_string(),
            dst: dst.to_path_buf(),
            show_progress,
        });
        Ok(())
    }

    fn sync(&self, src: &str, dst: &Utf8Path, show_progress: bool) -> Result<(), GrmError> {
        self.log.lock().unwrap().push(Transfer::Sync {
            src: src.to_string(),
            dst: dst.to_path_buf(),
            show_progress,
        });
        Ok(())
    }
}

struct FailingBackend;

impl TransferBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn copy(&self, _src: &str, _dst: &Utf8Path, _show_progress: bool) -> Result<(), GrmError> {
        Err(GrmError::TransferFailed {
            tool: "s5cmd".to_string(),
            output: "ERROR \"cp s3://bucket/a.gtf\": AccessDenied".to_string(),
        })
    }

    fn sync(&self, _src: &str, _dst: &Utf8Path, _show_progress: bool) -> Result<(), GrmError> {
        Err(GrmError::TransferFailed {
            tool: "s5cmd".to_string(),
            output: "ERROR \"sync\": AccessDenied".to_string(),
        })
    }
}

fn test_registry() -> Registry {
    Registry::from_records([(
        GenomeId::new("RefSeq_R64"),
        GenomeRecord {
            gtf: "s3://bucket/Saccharomyces cerevisiae/RefSeq/R64/stripped.gtf".to_string(),
            ref_genome: "s3://bucket/Saccharomyces cerevisiae/RefSeq/R64/genome.fna".to_string(),
            ref_trans: None,
            salmon_index: Some(
                "s3://bucket/Saccharomyces cerevisiae/RefSeq/R64/salmon_index/".to_string(),
            ),
            star_index: None,
        },
    )])
}

fn temp_root(temp: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap()
}

fn dir_entry_count(root: &Utf8Path) -> usize {
    std::fs::read_dir(root.as_std_path()).unwrap().count()
}

#[test]
fn unregistered_genome_fails_before_any_transfer() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "unknown_genome_id",
        test_registry(),
        Some(Box::new(backend.clone())),
        temp_root(&temp),
    );

    for kind in [
        ResourceKind::Gtf,
        ResourceKind::RefGenome,
        ResourceKind::RefTrans,
        ResourceKind::SalmonIndex,
        ResourceKind::StarIndex,
    ] {
        let err = manager.download(kind).unwrap_err();
        assert_matches!(err, GrmError::UnregisteredGenome(id) if id == "unknown_genome_id");
    }

    assert!(backend.transfers().is_empty());
    assert_eq!(dir_entry_count(&temp_root(&temp)), 0);
}

#[test]
fn missing_optional_resource_fails_without_filesystem_mutation() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend.clone())),
        temp_root(&temp),
    );

    let err = manager.download_ref_trans().unwrap_err();
    assert_matches!(
        err,
        GrmError::ResourceNotAvailable { genome, .. } if genome == "RefSeq_R64"
    );

    let err = manager.download_star_index().unwrap_err();
    assert_matches!(err, GrmError::ResourceNotAvailable { .. });

    assert!(backend.transfers().is_empty());
    assert_eq!(dir_entry_count(&temp_root(&temp)), 0);
}

#[test]
fn gtf_download_copies_to_the_locator_basename() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend.clone())),
        temp_root(&temp),
    );

    let path = manager.download_gtf().unwrap();
    assert!(path.is_absolute());
    assert_eq!(path, temp_root(&temp).join("stripped.gtf"));

    assert_eq!(
        backend.transfers(),
        vec![Transfer::Copy {
            src: "s3://bucket/Saccharomyces cerevisiae/RefSeq/R64/stripped.gtf".to_string(),
            dst: path,
            show_progress: false,
        }]
    );
}

#[test]
fn salmon_index_download_creates_the_directory_and_syncs() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend.clone())),
        temp_root(&temp),
    );

    let path = manager.download_salmon_index().unwrap();
    assert!(path.is_absolute());
    assert_eq!(path, temp_root(&temp).join("salmon_index"));
    assert!(path.as_std_path().is_dir());

    assert_eq!(
        backend.transfers(),
        vec![Transfer::Sync {
            src: "s3://bucket/Saccharomyces cerevisiae/RefSeq/R64/salmon_index/".to_string(),
            dst: path,
            show_progress: true,
        }]
    );
}

#[test]
fn existing_index_directory_is_left_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp_root(&temp);
    let stale = root.join("salmon_index");
    std::fs::create_dir(stale.as_std_path()).unwrap();
    std::fs::write(stale.join("info.json").as_std_path(), b"stale").unwrap();

    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend.clone())),
        root.clone(),
    );

    let err = manager.download_salmon_index().unwrap_err();
    assert_matches!(err, GrmError::DirectoryAlreadyExists(path) if path == stale);

    assert!(backend.transfers().is_empty());
    let content = std::fs::read(stale.join("info.json").as_std_path()).unwrap();
    assert_eq!(content, b"stale");
}

#[test]
fn missing_backend_only_fails_at_download_time() {
    let temp = tempfile::tempdir().unwrap();
    let manager =
        GenomeManager::new_with_parts("RefSeq_R64", test_registry(), None, temp_root(&temp));

    assert!(manager.backend_name().is_none());
    let err = manager.download_gtf().unwrap_err();
    assert_matches!(err, GrmError::BackendUnavailable);
    assert_eq!(dir_entry_count(&temp_root(&temp)), 0);
}

#[test]
fn progress_policy_override_reaches_the_backend() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend.clone())),
        temp_root(&temp),
    )
    .with_progress_policy(ProgressPolicy::all(true));

    manager.download_gtf().unwrap();
    manager.download_salmon_index().unwrap();

    let transfers = backend.transfers();
    assert_matches!(&transfers[0], Transfer::Copy { show_progress: true, .. });
    assert_matches!(&transfers[1], Transfer::Sync { show_progress: true, .. });
}

#[test]
fn transfer_failures_surface_the_tool_diagnostics() {
    let temp = tempfile::tempdir().unwrap();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(FailingBackend)),
        temp_root(&temp),
    );

    let err = manager.download_ref_genome().unwrap_err();
    assert_matches!(
        err,
        GrmError::TransferFailed { tool, output } if tool == "s5cmd" && output.contains("AccessDenied")
    );
}

#[test]
fn download_report_captures_the_resolved_transfer() {
    let temp = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::default();
    let manager = GenomeManager::new_with_parts(
        "RefSeq_R64",
        test_registry(),
        Some(Box::new(backend)),
        temp_root(&temp),
    );

    let report = manager.download_report(ResourceKind::Gtf).unwrap();
    assert_eq!(report.genome, "RefSeq_R64");
    assert_eq!(report.resource, "gtf");
    assert_eq!(report.backend.as_deref(), Some("recording"));
    assert!(report.path.ends_with("stripped.gtf"));
}
