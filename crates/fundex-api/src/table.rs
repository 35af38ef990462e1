//! Plain-text rendering for the CLI

use fundex_core::{DISPLAY_COLUMNS, DisplayRow, FacetIndex};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Columns shown by `fundex list`, as indices into [`DISPLAY_COLUMNS`]
const LIST_COLUMNS: [usize; 7] = [0, 3, 4, 5, 8, 9, 10];

/// Render rows as an aligned text table with a trailing link column
pub fn render_rows(rows: &[DisplayRow]) -> String {
    let mut header: Vec<String> =
        LIST_COLUMNS.iter().map(|&i| DISPLAY_COLUMNS[i].to_string()).collect();
    header.push("Link".to_string());

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let cells = row.cells();
            let mut line: Vec<String> = LIST_COLUMNS.iter().map(|&i| cells[i].clone()).collect();
            line.push(row.detail_link.clone().unwrap_or_default());
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &body {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(&mut out, &rule, &widths);
    for line in &body {
        write_line(&mut out, line, &widths);
    }
    out
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}

/// Render facets as an indented tree followed by the risk levels
pub fn render_facets(facets: &FacetIndex, risks: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for (category, subs) in facets.iter() {
        let _ = writeln!(out, "{category}");
        for sub in subs {
            let _ = writeln!(out, "  {sub}");
        }
    }
    if !risks.is_empty() {
        let _ = writeln!(out, "\nRisk levels:");
        for risk in risks {
            let _ = writeln!(out, "  {risk}");
        }
    }
    out
}
