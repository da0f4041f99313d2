use std::fs;
use std::io;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::spec::FsError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone, Default)]
pub(crate) struct SpecCompiledPatterns {
    pub(crate) patterns_include: Option<Vec<GlobMatcher>>,
    pub(crate) patterns_exclude: Option<Vec<GlobMatcher>>,
}

impl SpecCompiledPatterns {
    pub(crate) fn from_raw(
        patterns_include: &[String],
        patterns_exclude: &[String],
    ) -> Result<Self, FsError> {
        Ok(Self {
            patterns_include: _compile(patterns_include)?,
            patterns_exclude: _compile(patterns_exclude)?,
        })
    }
}

fn _compile(patterns: &[String]) -> Result<Option<Vec<GlobMatcher>>, FsError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut l_glob = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let matcher = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| FsError::InvalidPattern(e.to_string()))?
            .compile_matcher();
        l_glob.push(matcher);
    }
    Ok(Some(l_glob))
}

fn _is_pattern_matching(value: &str, patterns: Option<&Vec<GlobMatcher>>) -> bool {
    patterns.is_some_and(|l_glob| l_glob.iter().any(|p| p.is_match(value)))
}

pub(crate) fn should_exclude_by_patterns(value: &str, patterns: &SpecCompiledPatterns) -> bool {
    let if_included = patterns.patterns_include.is_none()
        || _is_pattern_matching(value, patterns.patterns_include.as_ref());
    !if_included || _is_pattern_matching(value, patterns.patterns_exclude.as_ref())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Copy bytes, then permissions and access/modify times.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    fs::copy(path_file_src, path_file_dst)?;

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
