//! Configuration loading, template creation and validation.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use freightkit_io_fs::EnumCopyFileConflictStrategy;
use freightkit_quote::{EnumPartnerBlock, EnumReduceMode, SpecQuotationLayout};
use log::{debug, info};

use crate::conf::C_CONFIG_TEMPLATE;
use crate::spec::{AppError, ConfigError, SpecAppConfig, SpecRunSettings};

/// Read and parse the configuration file.
///
/// A missing file is replaced by [`C_CONFIG_TEMPLATE`] and reported as
/// [`ConfigError::TemplateCreated`] so the caller can stop.
pub fn load_config<P: AsRef<Path>>(path_config: P) -> Result<SpecAppConfig, ConfigError> {
    let path_config = path_config.as_ref();
    if !path_config.exists() {
        create_config_template(path_config)?;
        return Err(ConfigError::TemplateCreated(path_config.to_path_buf()));
    }

    let c_text = fs::read_to_string(path_config).map_err(|source| ConfigError::Io {
        path: path_config.to_path_buf(),
        source,
    })?;
    let config = parse_config(&c_text)?;
    debug!(
        "Loaded configuration {} with {} areas",
        path_config.display(),
        config.areas.len()
    );
    Ok(config)
}

/// Parse configuration text.
pub fn parse_config(c_text: &str) -> Result<SpecAppConfig, ConfigError> {
    Ok(toml::from_str(c_text)?)
}

/// Write the commented template to `path_config`.
pub fn create_config_template(path_config: &Path) -> Result<(), ConfigError> {
    fs::write(path_config, C_CONFIG_TEMPLATE).map_err(|source| ConfigError::Io {
        path: path_config.to_path_buf(),
        source,
    })?;
    info!("Configuration template written to {}", path_config.display());
    Ok(())
}

/// Check values and resolve them into engine settings.
pub fn validate_config(config: &SpecAppConfig) -> Result<SpecRunSettings, ConfigError> {
    let invalid = |key: &str, message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    if config.quotation.input_sheet.trim().is_empty() {
        return Err(invalid("quotation.input_sheet", "must not be empty".to_string()));
    }
    if config.areas.is_empty() {
        return Err(invalid("areas", "at least one area is required".to_string()));
    }
    let mut set_suffixes = BTreeSet::new();
    for (c_area, area) in &config.areas {
        let c_suffix = area.suffix.trim().to_lowercase();
        if c_suffix.is_empty() {
            return Err(invalid(&format!("areas.{c_area}.suffix"), "must not be empty".to_string()));
        }
        if !set_suffixes.insert(c_suffix) {
            return Err(invalid(
                &format!("areas.{c_area}.suffix"),
                format!("suffix {:?} is used by another area", area.suffix),
            ));
        }
        if area.template_file.trim().is_empty() {
            return Err(invalid(
                &format!("areas.{c_area}.template_file"),
                "missing template_file".to_string(),
            ));
        }
    }
    if config.report.top_k == 0 {
        return Err(invalid("report.top_k", "must be >= 1".to_string()));
    }

    let reduce_mode = EnumReduceMode::from_name(&config.quotation.reduce_mode).ok_or_else(|| {
        invalid(
            "quotation.reduce_mode",
            format!("expected \"mean\" or \"min\", got {:?}", config.quotation.reduce_mode),
        )
    })?;
    let partner_block =
        EnumPartnerBlock::from_name(&config.report.partner_block).ok_or_else(|| {
            invalid(
                "report.partner_block",
                format!(
                    "expected \"single\" or \"pair\", got {:?}",
                    config.report.partner_block
                ),
            )
        })?;
    let rule_conflict = EnumCopyFileConflictStrategy::from_name(&config.report.rule_conflict)
        .ok_or_else(|| {
            invalid(
                "report.rule_conflict",
                format!(
                    "expected \"overwrite\", \"skip\" or \"error\", got {:?}",
                    config.report.rule_conflict
                ),
            )
        })?;

    let layout = config.quotation.derive_layout();
    validate_layout(&layout).map_err(|message| invalid("quotation.layout", message))?;

    Ok(SpecRunSettings {
        layout,
        reduce_mode,
        partner_block,
        rule_conflict,
    })
}

fn validate_layout(layout: &SpecQuotationLayout) -> Result<(), String> {
    if layout.cols_cost_20ft.is_empty() || layout.cols_cost_40ft.is_empty() {
        return Err("cost column lists must not be empty".to_string());
    }
    Ok(())
}

/// Fail when input, output or template directories, or the template of a
/// processed area, do not exist.
pub fn validate_environment(config: &SpecAppConfig) -> Result<(), AppError> {
    let l_dirs = [
        ("Input file path", &config.quotation.input_path),
        ("Output file path", &config.report.output_path),
        ("Template file path", &config.report.template_path),
    ];
    for (what, path) in l_dirs {
        if !path.exists() {
            return Err(AppError::MissingPath {
                what: what.to_string(),
                path: path.clone(),
            });
        }
    }

    for area in config.areas.values().filter(|area| area.process) {
        let path_template = config.report.template_path.join(&area.template_file);
        if !path_template.is_file() {
            return Err(AppError::MissingPath {
                what: "Template file".to_string(),
                path: path_template,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_CONFIG_MINIMAL: &str = r#"
[quotation]
input_path = "in"
input_sheet = "2025"

[report]
output_path = "out"
template_path = "tpl"

[areas.area1]
suffix = "1"
template_file = "TEMPLATE_AREA_1.XLSX"
feet20 = { report_sheet = "R20", bestprices_sheet = "B20" }
feet40 = { report_sheet = "R40", bestprices_sheet = "B40" }
"#;

    #[test]
    fn template_parses_and_validates() {
        let config = parse_config(C_CONFIG_TEMPLATE).expect("parse");
        assert_eq!(config.areas.len(), 2);
        assert_eq!(config.areas["area2"].suffix, "2");
        let settings = validate_config(&config).expect("validate");
        assert_eq!(settings.reduce_mode, EnumReduceMode::Mean);
        assert_eq!(settings.partner_block, EnumPartnerBlock::Single);
    }

    #[test]
    fn defaults_fill_optional_keys() {
        let config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        assert_eq!(config.report.top_k, 4);
        assert_eq!(config.quotation.n_rows_skip, 0);
        assert!(config.areas["area1"].process);
        assert_eq!(config.report.audit_file, None);
        assert_eq!(
            config.quotation.patterns_include,
            vec!["*.xls", "*.xlsx", "*.xlsb"]
        );
        let settings = validate_config(&config).expect("validate");
        assert_eq!(settings.rule_conflict, EnumCopyFileConflictStrategy::Overwrite);
        assert_eq!(settings.layout.cols_cost_40ft[0], 3);
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let res = parse_config("[quotation]\ninput_path = \"in\"\ninput_sheet = \"x\"\n");
        assert!(matches!(res, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn bad_values_are_rejected() {
        let mut config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        config.report.top_k = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidValue { key, .. }) if key == "report.top_k"
        ));

        let mut config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        config.quotation.reduce_mode = "median".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidValue { key, .. }) if key == "quotation.reduce_mode"
        ));

        let mut config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        let mut area_dup = config.areas["area1"].clone();
        area_dup.template_file = "OTHER.XLSX".to_string();
        config.areas.insert("area9".to_string(), area_dup);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidValue { key, .. }) if key == "areas.area9.suffix"
        ));

        let mut config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        config.areas.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn missing_file_writes_template() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_config = tmp.path().join("freightkit.toml");

        let res = load_config(&path_config);
        assert!(matches!(res, Err(ConfigError::TemplateCreated(_))));
        assert!(path_config.is_file());

        let config = load_config(&path_config).expect("reload");
        assert_eq!(config.quotation.input_sheet, "2025");
    }

    #[test]
    fn environment_requires_paths_and_templates() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut config = parse_config(C_CONFIG_MINIMAL).expect("parse");
        config.quotation.input_path = tmp.path().join("in");
        config.report.output_path = tmp.path().join("out");
        config.report.template_path = tmp.path().join("tpl");

        assert!(matches!(
            validate_environment(&config),
            Err(AppError::MissingPath { .. })
        ));

        for c_dir in ["in", "out", "tpl"] {
            fs::create_dir(tmp.path().join(c_dir)).expect("mkdir");
        }
        assert!(matches!(
            validate_environment(&config),
            Err(AppError::MissingPath { what, .. }) if what == "Template file"
        ));

        fs::write(tmp.path().join("tpl/TEMPLATE_AREA_1.XLSX"), b"x").expect("write");
        validate_environment(&config).expect("valid");
    }
}
