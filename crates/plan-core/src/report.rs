use crate::error::PlanResult;
use crate::summary::PlanVsActualReport;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

const FIXED_COLUMNS: [&str; 4] = ["business_unit", "role_id", "role_name", "total_fte"];

/// One row per (unit, role); one text column per window month.
pub fn report_dataframe(report: &PlanVsActualReport) -> PlanResult<DataFrame> {
    let mut units = Vec::new();
    let mut role_ids = Vec::new();
    let mut role_names = Vec::new();
    let mut totals = Vec::new();
    let mut month_columns: Vec<Vec<String>> = vec![Vec::new(); report.months.len()];

    for unit in &report.units {
        for role in &unit.roles {
            units.push(unit.name.clone());
            role_ids.push(role.role_id.clone());
            role_names.push(role.role_name.clone());
            totals.push(role.total_fte);
            for (column, cell) in month_columns.iter_mut().zip(&role.cells) {
                column.push(cell.display.text.clone());
            }
        }
    }

    let mut series = vec![
        Series::new(FIXED_COLUMNS[0].into(), units),
        Series::new(FIXED_COLUMNS[1].into(), role_ids),
        Series::new(FIXED_COLUMNS[2].into(), role_names),
        Series::new(FIXED_COLUMNS[3].into(), totals),
    ];
    for (month, values) in report.months.iter().zip(month_columns) {
        series.push(Series::new(PlSmallStr::from(month.label.as_str()), values));
    }
    let df = DataFrame::new(series.into_iter().map(Into::into).collect())?;
    Ok(df)
}

/// Writes the rendered cells with a header of fixed columns plus month labels.
pub fn export_report_csv<P: AsRef<Path>>(report: &PlanVsActualReport, path: P) -> PlanResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(report.months.iter().map(|m| m.label.clone()));
    writer.write_record(&header)?;

    for unit in &report.units {
        for role in &unit.roles {
            let mut row = vec![
                unit.name.clone(),
                role.role_id.clone(),
                role.role_name.clone(),
                format!("{:.1}", role.total_fte),
            ];
            row.extend(role.cells.iter().map(|c| c.display.text.clone()));
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Float64(v) => format!("{v:.1}"),
        other => other.to_string(),
    }
}

/// Boxed plain-text rendering of a dataframe.
pub fn render_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let rows: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_line(&mut out, &names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_line(out: &mut String, values: &[String], widths: &[usize]) {
    out.push('|');
    for (value, width) in values.iter().zip(widths) {
        out.push(' ');
        out.push_str(value);
        out.push_str(&" ".repeat(width.saturating_sub(value.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}
