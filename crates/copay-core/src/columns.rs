//! Which procedure columns are worth showing for a record set.

use std::borrow::Borrow;

use crate::record::{FieldValue, ProcedureField, ProcedureRecord, Record};

/// Columns with at least one non-blank value, in table order.
///
/// Blank means empty text, `false`, zero, or text that reads as zero
/// ("0", "0,00"). The plan name is never a column because records are
/// already partitioned by plan.
pub fn visible_columns<R: Borrow<ProcedureRecord>>(records: &[R]) -> Vec<ProcedureField> {
    ProcedureField::ALL
        .into_iter()
        .filter(|field| *field != ProcedureField::PlanName)
        .filter(|field| {
            records
                .iter()
                .any(|record| has_value(record.borrow().value(*field)))
        })
        .collect()
}

fn has_value(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Text(text) => {
            let text = text.trim();
            !text.is_empty() && text.replace(',', ".").parse::<f64>().map_or(true, |n| n != 0.0)
        }
        FieldValue::Flag(flag) => flag,
        FieldValue::Number(n) => n != 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_blank_columns_and_plan() {
        let data = vec![
            ProcedureRecord {
                code: "P1".into(),
                classification: "Exames".into(),
                cap_value: "0,00".into(),
                plan_name: "Plano A".into(),
                ..Default::default()
            },
            ProcedureRecord {
                code: "P2".into(),
                procedure_percent: 30.0,
                plan_name: "Plano A".into(),
                ..Default::default()
            },
        ];
        assert_eq!(
            visible_columns(&data),
            [
                ProcedureField::Code,
                ProcedureField::Classification,
                ProcedureField::ProcedurePercent,
            ]
        );
    }

    #[test]
    fn copay_column_needs_a_true_value() {
        let mut data = vec![ProcedureRecord {
            code: "P1".into(),
            ..Default::default()
        }];
        assert!(!visible_columns(&data).contains(&ProcedureField::HasCopay));
        data[0].has_copay = true;
        assert!(visible_columns(&data).contains(&ProcedureField::HasCopay));
    }

    #[test]
    fn currency_text_counts_as_value() {
        let data = vec![ProcedureRecord {
            cap_value: "R$ 0,00".into(),
            ..Default::default()
        }];
        assert_eq!(visible_columns(&data), [ProcedureField::CapValue]);
    }

    #[test]
    fn no_records_no_columns() {
        let data: Vec<&ProcedureRecord> = Vec::new();
        assert!(visible_columns(&data).is_empty());
    }
}
