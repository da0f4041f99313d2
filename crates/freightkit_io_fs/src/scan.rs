//! Input directory enumeration and file-name routing.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::spec::{FsError, SpecInputPatterns};
use crate::util::{SpecCompiledPatterns, should_exclude_by_patterns};

/// List regular files directly under `dir_input` that pass `patterns`,
/// sorted by file name.
///
/// Sub-directories are not descended into.
pub fn list_input_files<P: AsRef<Path>>(
    dir_input: P,
    patterns: &SpecInputPatterns,
) -> Result<Vec<PathBuf>, FsError> {
    let path_dir = dir_input.as_ref();
    if !path_dir.is_dir() {
        return Err(FsError::NotDirectory(path_dir.to_path_buf()));
    }
    let spec_pats =
        SpecCompiledPatterns::from_raw(&patterns.patterns_include, &patterns.patterns_exclude)?;

    let iter_entries = fs::read_dir(path_dir).map_err(|source| FsError::Io {
        path: path_dir.to_path_buf(),
        source,
    })?;

    let mut l_files = Vec::new();
    for entry in iter_entries {
        let entry = entry.map_err(|source| FsError::Io {
            path: path_dir.to_path_buf(),
            source,
        })?;
        let path_entry = entry.path();
        if !path_entry.is_file() {
            continue;
        }
        let name_file = entry.file_name().to_string_lossy().to_string();
        if should_exclude_by_patterns(&name_file, &spec_pats) {
            debug!("Excluded by patterns: {name_file}");
            continue;
        }
        l_files.push(path_entry);
    }

    l_files.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
    Ok(l_files)
}

/// Pick the suffix that ends the file stem (case-insensitive).
///
/// The longest matching suffix wins so `"11"` beats `"1"`. Blank suffixes
/// never match.
pub fn route_by_suffix<'a>(path_file: &Path, suffixes: &[&'a str]) -> Option<&'a str> {
    let c_stem = path_file.file_stem()?.to_string_lossy().to_lowercase();
    suffixes
        .iter()
        .copied()
        .filter(|c_suffix| {
            let c_suffix = c_suffix.trim();
            !c_suffix.is_empty() && c_stem.ends_with(&c_suffix.to_lowercase())
        })
        .max_by_key(|c_suffix| c_suffix.trim().len())
}

/// Partner name: file name up to the first `.`, with a trailing area
/// `suffix` removed, trimmed.
///
/// When nothing is left after removing the suffix (`1.xlsx`), the unstripped
/// name is used instead. Only a blank file name yields an empty string.
pub fn derive_partner_name(path_file: &Path, suffix: &str) -> String {
    let c_name = path_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let c_head = c_name.split('.').next().unwrap_or_default();

    let c_suffix = suffix.trim();
    let n_len_head = c_head.len();
    let n_len_suffix = c_suffix.len();
    let c_partner = if !c_suffix.is_empty()
        && n_len_head >= n_len_suffix
        && c_head.is_char_boundary(n_len_head - n_len_suffix)
        && c_head[n_len_head - n_len_suffix..].eq_ignore_ascii_case(c_suffix)
    {
        &c_head[..n_len_head - n_len_suffix]
    } else {
        c_head
    };
    match c_partner.trim() {
        "" => c_head.trim().to_string(),
        c_trimmed => c_trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").expect("write");
    }

    #[test]
    fn list_input_files_filters_and_sorts() {
        let tmp = tempfile::tempdir().expect("tempdir");
        touch(&tmp.path().join("ZETA 2.xlsx"));
        touch(&tmp.path().join("ALPHA 1.XLS"));
        touch(&tmp.path().join("~$ALPHA 1.xlsx"));
        touch(&tmp.path().join("readme.txt"));
        fs::create_dir(tmp.path().join("nested.xlsx")).expect("mkdir");

        let patterns = SpecInputPatterns {
            patterns_include: vec!["*.xls".to_string(), "*.xlsx".to_string()],
            patterns_exclude: vec!["~$*".to_string()],
        };
        let l_files = list_input_files(tmp.path(), &patterns).expect("list");
        let l_names: Vec<String> = l_files
            .iter()
            .map(|p| p.file_name().expect("name").to_string_lossy().to_string())
            .collect();
        assert_eq!(l_names, vec!["ALPHA 1.XLS", "ZETA 2.xlsx"]);
    }

    #[test]
    fn list_input_files_rejects_missing_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let res = list_input_files(tmp.path().join("absent"), &SpecInputPatterns::default());
        assert!(matches!(res, Err(FsError::NotDirectory(_))));
    }

    #[test]
    fn route_by_suffix_prefers_longest_match() {
        let l_suffixes = ["1", "2", "11"];
        assert_eq!(route_by_suffix(Path::new("ACME 1.xlsx"), &l_suffixes), Some("1"));
        assert_eq!(route_by_suffix(Path::new("ACME 11.xlsb"), &l_suffixes), Some("11"));
        assert_eq!(route_by_suffix(Path::new("ACME 3.xlsx"), &l_suffixes), None);
        assert_eq!(route_by_suffix(Path::new("acme-b.XLSX"), &["B"]), Some("B"));
    }

    #[test]
    fn derive_partner_name_strips_suffix_and_extension() {
        assert_eq!(derive_partner_name(Path::new("in/ACME LOGISTICS 1.xlsx"), "1"), "ACME LOGISTICS");
        assert_eq!(derive_partner_name(Path::new("ACME2.v2.xls"), "2"), "ACME");
        assert_eq!(derive_partner_name(Path::new("ACME.xls"), "1"), "ACME");
        assert_eq!(derive_partner_name(Path::new("acme-b.xls"), "B"), "acme-");
    }

    #[test]
    fn derive_partner_name_keeps_suffix_when_nothing_else_is_left() {
        assert_eq!(derive_partner_name(Path::new("in/1.xlsx"), "1"), "1");
        assert_eq!(derive_partner_name(Path::new(" 1.xlsx"), "1"), "1");
        assert_eq!(derive_partner_name(Path::new(" .xlsx"), "1"), "");
    }
}
