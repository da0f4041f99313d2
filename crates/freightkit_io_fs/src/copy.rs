//! Report template copy.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::spec::{EnumCopyFileConflictStrategy, EnumCopyOutcome, FsError};
use crate::util::copy_file_with_metadata;

/// Copy `path_file_src` to `path_file_dst`, keeping permissions and
/// timestamps.
///
/// Missing parent directories of the destination are created. An existing
/// destination is handled by `rule_conflict`; a destination directory is
/// always an error.
pub fn copy_template<P, Q>(
    path_file_src: P,
    path_file_dst: Q,
    rule_conflict: EnumCopyFileConflictStrategy,
) -> Result<EnumCopyOutcome, FsError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_src = path_file_src.as_ref();
    let path_dst = path_file_dst.as_ref();

    if !path_src.is_file() {
        return Err(FsError::SourceNotFound(path_src.to_path_buf()));
    }
    if path_dst.is_dir() {
        return Err(FsError::DestinationExists(path_dst.to_path_buf()));
    }
    if path_dst.exists() {
        match rule_conflict {
            EnumCopyFileConflictStrategy::Skip => {
                debug!("Keeping existing report {}", path_dst.display());
                return Ok(EnumCopyOutcome::Skipped);
            }
            EnumCopyFileConflictStrategy::Error => {
                return Err(FsError::DestinationExists(path_dst.to_path_buf()));
            }
            EnumCopyFileConflictStrategy::Overwrite => {}
        }
    }

    if let Some(path_parent) = path_dst.parent()
        && !path_parent.as_os_str().is_empty()
    {
        fs::create_dir_all(path_parent).map_err(|source| FsError::Io {
            path: path_parent.to_path_buf(),
            source,
        })?;
    }

    copy_file_with_metadata(path_src, path_dst).map_err(|source| FsError::Io {
        path: path_dst.to_path_buf(),
        source,
    })?;
    info!(
        "Copied template {} -> {}",
        path_src.display(),
        path_dst.display()
    );
    Ok(EnumCopyOutcome::Copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_template_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_src = tmp.path().join("TEMPLATE.XLSX");
        let path_dst = tmp.path().join("out/2025/REPORT.XLSX");
        fs::write(&path_src, b"tpl").expect("write");

        let outcome =
            copy_template(&path_src, &path_dst, EnumCopyFileConflictStrategy::Overwrite)
                .expect("copy");
        assert_eq!(outcome, EnumCopyOutcome::Copied);
        assert_eq!(fs::read(&path_dst).expect("read"), b"tpl");
    }

    #[test]
    fn copy_template_honors_conflict_rule() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_src = tmp.path().join("TEMPLATE.XLSX");
        let path_dst = tmp.path().join("REPORT.XLSX");
        fs::write(&path_src, b"new").expect("write");
        fs::write(&path_dst, b"old").expect("write");

        let outcome = copy_template(&path_src, &path_dst, EnumCopyFileConflictStrategy::Skip)
            .expect("skip");
        assert_eq!(outcome, EnumCopyOutcome::Skipped);
        assert_eq!(fs::read(&path_dst).expect("read"), b"old");

        let res = copy_template(&path_src, &path_dst, EnumCopyFileConflictStrategy::Error);
        assert!(matches!(res, Err(FsError::DestinationExists(_))));

        let outcome =
            copy_template(&path_src, &path_dst, EnumCopyFileConflictStrategy::Overwrite)
                .expect("overwrite");
        assert_eq!(outcome, EnumCopyOutcome::Copied);
        assert_eq!(fs::read(&path_dst).expect("read"), b"new");
    }

    #[test]
    fn copy_template_missing_source() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let res = copy_template(
            tmp.path().join("absent.xlsx"),
            tmp.path().join("dst.xlsx"),
            EnumCopyFileConflictStrategy::Overwrite,
        );
        assert!(matches!(res, Err(FsError::SourceNotFound(_))));
    }
}
