//! Query filtering for the procedure table and the partner directory.
//!
//! Every active facet is an independent gate; a record must pass all of
//! them. Filters borrow from the input and preserve its order.

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::record::{PartnerRecord, ProcedureRecord};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown copay state '{0}' (expected any, yes or no)")]
pub struct UnknownCopayState(pub String);

/// Tri-state constraint on the copay flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopayState {
    #[default]
    Any,
    Yes,
    No,
}

impl CopayState {
    pub fn matches(self, has_copay: bool) -> bool {
        match self {
            CopayState::Any => true,
            CopayState::Yes => has_copay,
            CopayState::No => !has_copay,
        }
    }
}

impl FromStr for CopayState {
    type Err = UnknownCopayState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" => Ok(CopayState::Any),
            "yes" | "sim" | "true" => Ok(CopayState::Yes),
            "no" | "não" | "nao" | "false" => Ok(CopayState::No),
            _ => Err(UnknownCopayState(s.to_string())),
        }
    }
}

/// Filter state of the procedure table. The default constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub classifications: BTreeSet<String>,
    pub copay_state: CopayState,
    pub plan_names: BTreeSet<String>,
    /// Case-insensitive substring over code, classification and exemption rule.
    pub search_text: String,
}

impl FilterSpec {
    pub fn is_unconstrained(&self) -> bool {
        self.classifications.is_empty()
            && self.copay_state == CopayState::Any
            && self.plan_names.is_empty()
            && search_needle(&self.search_text).is_none()
    }

    /// Clear every facet.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn matches_with(&self, record: &ProcedureRecord, needle: Option<&str>) -> bool {
        if !self.classifications.is_empty()
            && !self.classifications.contains(&record.classification)
        {
            return false;
        }
        if !self.copay_state.matches(record.has_copay) {
            return false;
        }
        if !self.plan_names.is_empty() && !self.plan_names.contains(&record.plan_name) {
            return false;
        }
        match needle {
            Some(needle) => [
                &record.code,
                &record.classification,
                &record.exemption_rule,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(needle)),
            None => true,
        }
    }
}

/// Lowercased search text, or `None` when nothing was typed.
///
/// Whitespace is searched for like any other text.
fn search_needle(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_lowercase())
}

/// Lowercased name query, or `None` when it is blank after trimming.
fn name_needle(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_lowercase())
}

/// Procedures matching `spec`, in input order.
pub fn filter_procedures<'a, I>(records: I, spec: &FilterSpec) -> Vec<&'a ProcedureRecord>
where
    I: IntoIterator<Item = &'a ProcedureRecord>,
{
    let needle = search_needle(&spec.search_text);
    records
        .into_iter()
        .filter(|record| spec.matches_with(record, needle.as_deref()))
        .collect()
}

/// Partner categories shown as separate directory sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartnerCategory {
    Hospital,
    Laboratory,
}

impl PartnerCategory {
    pub const ALL: [PartnerCategory; 2] = [PartnerCategory::Hospital, PartnerCategory::Laboratory];

    /// Classify a partner type, ignoring case and the accent in "laboratório".
    pub fn of(partner_type: &str) -> Option<Self> {
        match partner_type.trim().to_lowercase().as_str() {
            "hospital" => Some(PartnerCategory::Hospital),
            "laboratório" | "laboratorio" => Some(PartnerCategory::Laboratory),
            _ => None,
        }
    }

    /// Section title.
    pub fn title(self) -> &'static str {
        match self {
            PartnerCategory::Hospital => "Hospitais",
            PartnerCategory::Laboratory => "Laboratórios",
        }
    }
}

/// Partners split by category. Partners of any other type are left out.
#[derive(Debug, Default)]
pub struct PartnerBuckets<'a> {
    pub hospitals: Vec<&'a PartnerRecord>,
    pub laboratories: Vec<&'a PartnerRecord>,
}

impl<'a> PartnerBuckets<'a> {
    pub fn get(&self, category: PartnerCategory) -> &[&'a PartnerRecord] {
        match category {
            PartnerCategory::Hospital => &self.hospitals,
            PartnerCategory::Laboratory => &self.laboratories,
        }
    }
}

pub fn split_partners<'a, I>(records: I) -> PartnerBuckets<'a>
where
    I: IntoIterator<Item = &'a PartnerRecord>,
{
    let mut buckets = PartnerBuckets::default();
    for record in records {
        match PartnerCategory::of(&record.partner_type) {
            Some(PartnerCategory::Hospital) => buckets.hospitals.push(record),
            Some(PartnerCategory::Laboratory) => buckets.laboratories.push(record),
            None => {}
        }
    }
    buckets
}

/// Filter state of one partner section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerFilter {
    pub plan_names: BTreeSet<String>,
    /// Case-insensitive substring over the partner name.
    pub name_query: String,
}

impl PartnerFilter {
    fn matches_with(&self, record: &PartnerRecord, needle: Option<&str>) -> bool {
        if !self.plan_names.is_empty() && !self.plan_names.contains(&record.plan_name) {
            return false;
        }
        needle.is_none_or(|needle| record.partner_name.to_lowercase().contains(needle))
    }
}

/// Partners matching `filter`, in input order.
pub fn filter_partners<'a, I>(records: I, filter: &PartnerFilter) -> Vec<&'a PartnerRecord>
where
    I: IntoIterator<Item = &'a PartnerRecord>,
{
    let needle = name_needle(&filter.name_query);
    records
        .into_iter()
        .filter(|record| filter.matches_with(record, needle.as_deref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(code: &str, class: &str, copay: bool, rule: &str, plan: &str) -> ProcedureRecord {
        ProcedureRecord {
            code: code.into(),
            classification: class.into(),
            has_copay: copay,
            exemption_rule: rule.into(),
            plan_name: plan.into(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<ProcedureRecord> {
        vec![
            procedure("10101012", "Consultas", true, "", "Plano X"),
            procedure("40304361", "Exames simples", true, "Isento gestantes", "Plano Y"),
            procedure("40901114", "Exames complexos", false, "", "Plano X"),
            procedure("31309054", "Cirurgias", false, "Isento em internação", "Plano Y"),
        ]
    }

    fn codes(records: &[&ProcedureRecord]) -> Vec<String> {
        records.iter().map(|r| r.code.clone()).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn unconstrained_filter_is_identity() {
        let data = sample();
        let spec = FilterSpec::default();
        assert!(spec.is_unconstrained());
        let out = filter_procedures(&data, &spec);
        assert_eq!(out.len(), data.len());
        assert!(out.iter().zip(&data).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn classification_facet() {
        let data = sample();
        let spec = FilterSpec {
            classifications: set(&["Consultas", "Cirurgias"]),
            ..Default::default()
        };
        assert_eq!(codes(&filter_procedures(&data, &spec)), ["10101012", "31309054"]);
    }

    #[test]
    fn copay_facet() {
        let data = sample();
        let yes = FilterSpec {
            copay_state: CopayState::Yes,
            ..Default::default()
        };
        let no = FilterSpec {
            copay_state: CopayState::No,
            ..Default::default()
        };
        assert_eq!(codes(&filter_procedures(&data, &yes)), ["10101012", "40304361"]);
        assert_eq!(codes(&filter_procedures(&data, &no)), ["40901114", "31309054"]);
    }

    #[test]
    fn plan_then_search_narrows() {
        let data = sample();
        let mut spec = FilterSpec {
            plan_names: set(&["Plano X"]),
            ..Default::default()
        };
        let by_plan = filter_procedures(&data, &spec);
        assert_eq!(codes(&by_plan), ["10101012", "40901114"]);
        assert!(by_plan.iter().all(|r| r.plan_name == "Plano X"));

        spec.search_text = "EXAMES".into();
        assert_eq!(codes(&filter_procedures(&data, &spec)), ["40901114"]);
    }

    #[test]
    fn search_covers_code_classification_and_rule() {
        let data = sample();
        let search = |text: &str| {
            let spec = FilterSpec {
                search_text: text.into(),
                ..Default::default()
            };
            codes(&filter_procedures(&data, &spec))
        };
        assert_eq!(search("4030"), ["40304361"]);
        assert_eq!(search("cirurg"), ["31309054"]);
        assert_eq!(search("isento"), ["40304361", "31309054"]);
        assert!(search("ressonância").is_empty());
        assert_eq!(search("").len(), 4);
    }

    #[test]
    fn whitespace_search_is_still_a_search() {
        let data = vec![
            procedure("P1", "Consultas", true, "Isento gestantes", "Plano X"),
            procedure("P2", "Consultas", true, "Isento  gestantes", "Plano X"),
        ];
        let spec = FilterSpec {
            search_text: "  ".into(),
            ..Default::default()
        };
        assert!(!spec.is_unconstrained());
        assert_eq!(codes(&filter_procedures(&data, &spec)), ["P2"]);
    }

    #[test]
    fn search_gate_applies_after_facets() {
        // A record passing every facet must still match an active search.
        let data = sample();
        let spec = FilterSpec {
            copay_state: CopayState::Yes,
            search_text: "cirurg".into(),
            ..Default::default()
        };
        assert!(filter_procedures(&data, &spec).is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut spec = FilterSpec {
            classifications: set(&["Consultas"]),
            copay_state: CopayState::No,
            plan_names: set(&["Plano X"]),
            search_text: "x".into(),
        };
        assert!(!spec.is_unconstrained());
        spec.reset();
        assert_eq!(spec, FilterSpec::default());
    }

    #[test]
    fn copay_state_parsing() {
        assert_eq!("sim".parse(), Ok(CopayState::Yes));
        assert_eq!("Não".parse(), Ok(CopayState::No));
        assert_eq!("any".parse(), Ok(CopayState::Any));
        assert!("talvez".parse::<CopayState>().is_err());
    }

    fn partner(name: &str, kind: &str, tier: &str, plan: &str) -> PartnerRecord {
        PartnerRecord {
            partner_name: name.into(),
            partner_type: kind.into(),
            network_tier: tier.into(),
            plan_name: plan.into(),
        }
    }

    #[test]
    fn categories_accept_accent_and_case_variants() {
        assert_eq!(PartnerCategory::of("Hospital"), Some(PartnerCategory::Hospital));
        assert_eq!(PartnerCategory::of("HOSPITAL"), Some(PartnerCategory::Hospital));
        assert_eq!(PartnerCategory::of("Laboratório"), Some(PartnerCategory::Laboratory));
        assert_eq!(PartnerCategory::of("LABORATÓRIO"), Some(PartnerCategory::Laboratory));
        assert_eq!(PartnerCategory::of("laboratorio"), Some(PartnerCategory::Laboratory));
        assert_eq!(PartnerCategory::of("Clínica"), None);
    }

    #[test]
    fn same_plan_partners_split_into_buckets() {
        let data = vec![
            partner("Hospital Vida", "Hospital", "", "Plano A"),
            partner("Lab Central", "Laboratório", "", "Plano A"),
        ];
        let filter = PartnerFilter {
            plan_names: set(&["Plano A"]),
            ..Default::default()
        };
        let buckets = split_partners(&data);
        let hospitals = filter_partners(
            buckets.get(PartnerCategory::Hospital).iter().copied(),
            &filter,
        );
        let labs = filter_partners(buckets.laboratories.iter().copied(), &filter);
        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].partner_name, "Hospital Vida");
        assert_eq!(labs.len(), 1);
        assert_eq!(labs[0].partner_name, "Lab Central");
    }

    #[test]
    fn unknown_partner_types_are_not_bucketed() {
        let data = vec![partner("Clínica Sul", "Clínica", "", "Plano A")];
        let buckets = split_partners(&data);
        assert!(buckets.hospitals.is_empty());
        assert!(buckets.laboratories.is_empty());
    }

    #[test]
    fn partner_name_query_and_plan() {
        let data = vec![
            partner("Hospital Vida", "Hospital", "", "Plano A"),
            partner("Hospital São Lucas", "Hospital", "", "Plano B"),
            partner("Hospital Vida Nova", "Hospital", "", "Plano B"),
        ];
        let filter = PartnerFilter {
            plan_names: set(&["Plano B"]),
            name_query: "vida".into(),
        };
        let names: Vec<_> = filter_partners(&data, &filter)
            .iter()
            .map(|p| p.partner_name.as_str())
            .collect();
        assert_eq!(names, ["Hospital Vida Nova"]);
    }

    #[test]
    fn blank_name_query_is_trimmed_away() {
        let data = vec![partner("Hospital Vida", "Hospital", "", "Plano A")];
        let filter = PartnerFilter {
            name_query: "   ".into(),
            ..Default::default()
        };
        assert_eq!(filter_partners(&data, &filter).len(), 1);

        let padded = PartnerFilter {
            name_query: "  vida ".into(),
            ..Default::default()
        };
        assert_eq!(filter_partners(&data, &padded).len(), 1);
    }
}
