//! Batch run: quotations into area reports, then best prices.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use freightkit_io_fs::{
    ReportRun, ReportRunBuilder, SpecInputPatterns, copy_template, derive_partner_name,
    list_input_files, route_by_suffix,
};
use freightkit_io_xlsx::{AuditWriter, XlsxWorkbook, read_table};
use freightkit_quote::{
    EnumContainerSize, SpecFillOptions, SpecMergeOptions, SpecPartnerCosts, SpecRankOptions,
    aggregate, derive_best_prices_frame, derive_partner_costs_frame, fill_best_prices,
    merge_partner_columns, rank_best_prices, reduce_ports,
};
use log::{debug, info, warn};

use crate::config::{validate_config, validate_environment};
use crate::spec::{AppError, SpecAppConfig, SpecAreaSection, SpecRunSettings};
use crate::util::derive_report_file_name;

/// Partners collected for one area during the quotation phase.
#[derive(Debug, Default)]
struct SpecAreaBatch {
    path_report: PathBuf,
    partners_20ft: Vec<SpecPartnerCosts>,
    partners_40ft: Vec<SpecPartnerCosts>,
}

impl SpecAreaBatch {
    fn partners(&self, size: EnumContainerSize) -> &[SpecPartnerCosts] {
        match size {
            EnumContainerSize::Feet20 => &self.partners_20ft,
            EnumContainerSize::Feet40 => &self.partners_40ft,
        }
    }

    fn partners_mut(&mut self, size: EnumContainerSize) -> &mut Vec<SpecPartnerCosts> {
        match size {
            EnumContainerSize::Feet20 => &mut self.partners_20ft,
            EnumContainerSize::Feet40 => &mut self.partners_40ft,
        }
    }
}

/// Run every phase for reports named after the month of `date`.
///
/// Configuration and environment problems are fatal; failures of single
/// files, reports or sheets are recorded in the returned report.
pub fn run(config: &SpecAppConfig, date: NaiveDate) -> Result<ReportRun, AppError> {
    let settings = validate_config(config)?;
    validate_environment(config)?;

    let mut builder = ReportRunBuilder::default();
    let mut audit = config
        .report
        .audit_file
        .as_ref()
        .map(|c_name| AuditWriter::new(config.report.output_path.join(c_name)));

    info!("Processing quotations...");
    let dict_batches = run_quotations(config, &settings, date, &mut builder)?;
    write_reports(config, &settings, &dict_batches, audit.as_mut(), &mut builder);

    info!("Processing best prices...");
    run_best_prices(config, date, audit.as_mut(), &mut builder);

    if let Some(writer) = audit.as_mut() {
        match writer.close() {
            Ok(()) => info!("Audit workbook written to {}", writer.file_out().display()),
            Err(err) => record_audit_failure(&mut builder, writer.file_out(), &AppError::from(err)),
        }
    }

    let report = builder.build();
    info!("{report}");
    Ok(report)
}

////////////////////////////////////////////////////////////////////////////////
// #region Quotations

fn run_quotations(
    config: &SpecAppConfig,
    settings: &SpecRunSettings,
    date: NaiveDate,
    builder: &mut ReportRunBuilder,
) -> Result<BTreeMap<String, SpecAreaBatch>, AppError> {
    let patterns = SpecInputPatterns {
        patterns_include: config.quotation.patterns_include.clone(),
        patterns_exclude: config.quotation.patterns_exclude.clone(),
    };
    let l_files = list_input_files(&config.quotation.input_path, &patterns)?;
    info!(
        "{} quotation files in {}",
        l_files.len(),
        config.quotation.input_path.display()
    );

    let dict_area_by_suffix: BTreeMap<&str, (&str, &SpecAreaSection)> = config
        .areas
        .iter()
        .map(|(c_area, area)| (area.suffix.trim(), (c_area.as_str(), area)))
        .collect();
    let l_suffixes: Vec<&str> = dict_area_by_suffix.keys().copied().collect();

    let mut dict_batches: BTreeMap<String, SpecAreaBatch> = BTreeMap::new();
    for path_file in &l_files {
        builder.add_scanned();

        let Some((c_suffix, (c_area, area))) = route_by_suffix(path_file, &l_suffixes)
            .and_then(|c_suffix| dict_area_by_suffix.get(c_suffix).map(|hit| (c_suffix, *hit)))
        else {
            debug!("No area for {}", path_file.display());
            builder.add_skipped();
            continue;
        };
        if !area.process {
            debug!("Area {c_area} disabled; skipping {}", path_file.display());
            builder.add_skipped();
            continue;
        }

        if !dict_batches.contains_key(c_area) {
            match prepare_report(config, settings, c_area, area, date) {
                Ok(path_report) => {
                    dict_batches.insert(
                        c_area.to_string(),
                        SpecAreaBatch {
                            path_report,
                            ..Default::default()
                        },
                    );
                }
                Err(err) => {
                    warn!("Failed to prepare report for {c_area}: {err}");
                    builder.add_error(path_file.clone(), err.to_string());
                    continue;
                }
            }
        }

        let partner_name = derive_partner_name(path_file, c_suffix);
        if partner_name.is_empty() {
            warn!("No partner name in {}", path_file.display());
            builder.add_error(path_file.clone(), "file name yields an empty partner name".to_string());
            continue;
        }
        info!("Processing {partner_name} for {c_area}");
        match process_quotation(path_file, &partner_name, config, settings) {
            Ok(l_costs) => {
                if let Some(batch) = dict_batches.get_mut(c_area) {
                    for (size, partner) in l_costs {
                        batch.partners_mut(size).push(partner);
                    }
                }
                builder.add_processed();
            }
            Err(err) => {
                warn!("Failed to process {}: {err}", path_file.display());
                builder.add_error(path_file.clone(), err.to_string());
            }
        }
    }
    Ok(dict_batches)
}

/// Copy the area template to this month's report path.
fn prepare_report(
    config: &SpecAppConfig,
    settings: &SpecRunSettings,
    c_area: &str,
    area: &SpecAreaSection,
    date: NaiveDate,
) -> Result<PathBuf, AppError> {
    let path_template = config.report.template_path.join(&area.template_file);
    let path_report = config
        .report
        .output_path
        .join(derive_report_file_name(c_area, date));
    let outcome = copy_template(&path_template, &path_report, settings.rule_conflict)?;
    debug!("Report {} for {c_area}: {outcome:?}", path_report.display());
    Ok(path_report)
}

/// Read one partner file and reduce both container sizes.
fn process_quotation(
    path_file: &Path,
    partner_name: &str,
    config: &SpecAppConfig,
    settings: &SpecRunSettings,
) -> Result<Vec<(EnumContainerSize, SpecPartnerCosts)>, AppError> {
    let table = read_table(
        path_file,
        &config.quotation.input_sheet,
        config.quotation.n_rows_skip,
    )?;

    let mut l_costs = Vec::with_capacity(EnumContainerSize::ALL.len());
    for size in EnumContainerSize::ALL {
        let l_port_costs = aggregate(&table, &settings.layout.column_set(size))?;
        let l_reduced = reduce_ports(&l_port_costs, settings.reduce_mode);
        debug!(
            "{partner_name} {}: {} ports from {} priced rows",
            size.label(),
            l_reduced.len(),
            l_port_costs.len()
        );
        l_costs.push((
            size,
            SpecPartnerCosts {
                partner_name: partner_name.to_string(),
                costs: l_reduced,
            },
        ));
    }
    Ok(l_costs)
}

/// Merge collected partners into each area report and save it once.
fn write_reports(
    config: &SpecAppConfig,
    settings: &SpecRunSettings,
    dict_batches: &BTreeMap<String, SpecAreaBatch>,
    mut audit: Option<&mut AuditWriter>,
    builder: &mut ReportRunBuilder,
) {
    let options = SpecMergeOptions {
        partner_block: settings.partner_block,
        ..Default::default()
    };

    for (c_area, batch) in dict_batches {
        let Some(area) = config.areas.get(c_area) else {
            continue;
        };
        let mut workbook = match XlsxWorkbook::open(&batch.path_report) {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!("{err}");
                builder.add_error(batch.path_report.clone(), err.to_string());
                continue;
            }
        };

        for size in EnumContainerSize::ALL {
            let l_partners = batch.partners(size);
            if l_partners.is_empty() {
                continue;
            }
            let c_sheet = &area.sheets(size).report_sheet;
            let res = workbook
                .sheet_mut(c_sheet)
                .map_err(AppError::from)
                .and_then(|mut sheet| Ok(merge_partner_columns(&mut sheet, &options, l_partners)?));
            match res {
                Ok(report) => {
                    info!("{c_area} {} {report}", size.label());
                    if report.if_anchor_fallback {
                        builder.add_warning(format!(
                            "{}[{c_sheet}]: no POD header, merged against column A",
                            batch.path_report.display()
                        ));
                    }
                }
                Err(err) => {
                    warn!("Merge into {c_sheet} failed: {err}");
                    builder.add_error(batch.path_report.clone(), err.to_string());
                }
            }

            if let Some(writer) = audit.as_deref_mut() {
                let c_name = format!("{c_area} {} COSTS", size.label());
                let res = derive_partner_costs_frame(l_partners)
                    .map_err(AppError::from)
                    .and_then(|df| Ok(writer.write_sheet_from_dataframe(&df, &c_name)?));
                if let Err(err) = res {
                    record_audit_failure(builder, &batch.path_report, &err);
                }
            }
        }

        if workbook.is_dirty() {
            match workbook.save() {
                Ok(()) => info!("Saved {}", batch.path_report.display()),
                Err(err) => {
                    warn!("{err}");
                    builder.add_error(batch.path_report.clone(), err.to_string());
                }
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BestPrices

/// Rank every existing report of an enabled area into its summary sheets.
fn run_best_prices(
    config: &SpecAppConfig,
    date: NaiveDate,
    mut audit: Option<&mut AuditWriter>,
    builder: &mut ReportRunBuilder,
) {
    let options_rank = SpecRankOptions {
        top_k: config.report.top_k,
        ..Default::default()
    };
    let options_fill = SpecFillOptions::default();

    for (c_area, area) in config.areas.iter().filter(|(_, area)| area.process) {
        let path_report = config
            .report
            .output_path
            .join(derive_report_file_name(c_area, date));
        if !path_report.is_file() {
            debug!("No report for {c_area}; skipping best prices");
            continue;
        }
        let mut workbook = match XlsxWorkbook::open(&path_report) {
            Ok(workbook) => workbook,
            Err(err) => {
                warn!("{err}");
                builder.add_error(path_report.clone(), err.to_string());
                continue;
            }
        };

        for size in EnumContainerSize::ALL {
            let res = fill_summary_sheet(
                &mut workbook,
                (c_area.as_str(), area),
                size,
                (&options_rank, &options_fill),
                audit.as_deref_mut(),
                builder,
            );
            if let Err(err) = res {
                warn!("Best prices for {c_area} {} failed: {err}", size.label());
                builder.add_error(path_report.clone(), err.to_string());
            }
        }

        if workbook.is_dirty() {
            match workbook.save() {
                Ok(()) => info!("Saved best prices to {}", path_report.display()),
                Err(err) => {
                    warn!("{err}");
                    builder.add_error(path_report.clone(), err.to_string());
                }
            }
        }
    }
}

/// Rank one report sheet of `workbook` and fill the matching summary sheet.
fn fill_summary_sheet(
    workbook: &mut XlsxWorkbook,
    (c_area, area): (&str, &SpecAreaSection),
    size: EnumContainerSize,
    (options_rank, options_fill): (&SpecRankOptions, &SpecFillOptions),
    audit: Option<&mut AuditWriter>,
    builder: &mut ReportRunBuilder,
) -> Result<(), AppError> {
    let sheets = area.sheets(size);
    let report = workbook.snapshot_sheet(&sheets.report_sheet)?;
    let mut book = rank_best_prices(&report, options_rank)?;

    if let Some(writer) = audit {
        let c_name = format!("{c_area} {} BEST", size.label());
        let res = derive_best_prices_frame(&book)
            .map_err(AppError::from)
            .and_then(|df| Ok(writer.write_sheet_from_dataframe(&df, &c_name)?));
        if let Err(err) = res {
            record_audit_failure(builder, workbook.path(), &err);
        }
    }

    let mut summary = workbook.sheet_mut(&sheets.bestprices_sheet)?;
    let report_fill = fill_best_prices(&mut summary, &mut book, options_fill)?;
    info!("{c_area} {} {report_fill}", size.label());
    if report_fill.cnt_entries_unused > 0 {
        builder.add_warning(format!(
            "{}[{}]: {} ranked offers had no summary row",
            workbook.path().display(),
            sheets.bestprices_sheet,
            report_fill.cnt_entries_unused
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

fn record_audit_failure(builder: &mut ReportRunBuilder, path: &Path, err: &AppError) {
    warn!("Audit output failed for {}: {err}", path.display());
    builder.add_warning(format!("audit: {}: {err}", path.display()));
}
