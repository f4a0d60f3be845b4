//! Plain-text rendering of the procedure table and partner directory.
//!
//! Everything renders to a `String` so the caller decides where it goes.
//! Column widths follow the widest cell, capped at `MAX_CELL_WIDTH`.

use std::fmt::Write;

use copay_core::{
    FieldValue, PartnerCategory, PartnerRecord, ProcedureField, ProcedureRecord, Record,
    visible_columns,
};

/// Shown in place of a section whose data could not be loaded.
pub const LOAD_FAILED: &str = "Falha ao carregar os dados. Por favor, tente novamente.";

const MAX_CELL_WIDTH: usize = 48;
const PREFERRED_MARKER: &str = "★";

// ── Procedures ──

pub fn procedure_count(shown: usize, total: usize) -> String {
    format!("Exibindo {shown} de {total} procedimentos")
}

/// The filtered procedure table, or the message standing in for it.
pub fn render_procedures(records: &[&ProcedureRecord], plan_selected: bool) -> String {
    if !plan_selected {
        return "Selecione um plano para visualizar os procedimentos disponíveis.\n".to_string();
    }
    if records.is_empty() {
        return "Nenhum procedimento encontrado com os filtros selecionados.\n\
                Tente ajustar seus filtros ou realizar uma nova busca.\n"
            .to_string();
    }

    let columns = visible_columns(records);
    let header: Vec<String> = columns.iter().map(|c| c.label().to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|&column| procedure_cell(record, column))
                .collect()
        })
        .collect();
    render_table(&header, &rows)
}

fn procedure_cell(record: &ProcedureRecord, field: ProcedureField) -> String {
    match record.value(field) {
        FieldValue::Text(text) => text.trim().to_string(),
        FieldValue::Flag(true) => "Sim".to_string(),
        FieldValue::Flag(false) => "Não".to_string(),
        FieldValue::Number(n) if n == 0.0 => String::new(),
        FieldValue::Number(n) => format!("{n}%"),
    }
}

// ── Partners ──

/// One directory section: title, then table or message.
///
/// Preferred partners are marked with a star next to their name.
pub fn render_partner_section(
    category: PartnerCategory,
    records: &[&PartnerRecord],
    plan_selected: bool,
) -> String {
    let mut out = section_title(category.title());
    if !plan_selected {
        let _ = writeln!(
            out,
            "Selecione um plano para visualizar os {} disponíveis.",
            category.title().to_lowercase()
        );
        return out;
    }
    if records.is_empty() {
        out.push_str("Nenhum parceiro encontrado com os filtros atuais.\n");
        return out;
    }

    let header = vec![
        "Nome do Parceiro".to_string(),
        "Tipo de Rede".to_string(),
        "Nome do Plano".to_string(),
    ];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let name = if record.is_preferred() {
                format!("{} {PREFERRED_MARKER}", record.partner_name.trim())
            } else {
                record.partner_name.trim().to_string()
            };
            vec![
                name,
                record.network_tier.trim().to_string(),
                record.plan_name.trim().to_string(),
            ]
        })
        .collect();
    out.push_str(&render_table(&header, &rows));
    out
}

/// A section whose fetch failed.
pub fn render_failed_section(title: &str) -> String {
    let mut out = section_title(title);
    let _ = writeln!(out, "{LOAD_FAILED}");
    out
}

// ── Facets ──

pub fn render_facet(title: &str, values: &[String]) -> String {
    let mut out = section_title(title);
    if values.is_empty() {
        out.push_str("  (nenhum)\n");
    }
    for value in values {
        let _ = writeln!(out, "  - {value}");
    }
    out
}

// ── Table layout ──

fn section_title(title: &str) -> String {
    format!("=== {title} ===\n")
}

fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let header: Vec<String> = header.iter().map(|h| truncate(h)).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}
