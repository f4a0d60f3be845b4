//! Sheet layouts: header dictionaries and record construction per entity.
//!
//! The dictionaries are the only extension point for new spreadsheet
//! columns. Adding a tracked column is one entry here plus the record field.

use std::fmt::Debug;
use std::hash::Hash;

use crate::cell::{coerce_flag, coerce_percent, coerce_text};
use crate::mapper::FieldBag;
use crate::record::{PartnerField, PartnerRecord, ProcedureField, ProcedureRecord};

/// Header text of the copay sheet mapped to procedure fields.
pub const PROCEDURE_HEADERS: &[(&str, ProcedureField)] = &[
    ("Código", ProcedureField::Code),
    ("Procedimentos", ProcedureField::ProcedureName),
    ("Classificação dos Procedimentos", ProcedureField::Classification),
    ("Coparticipação Sim/Não", ProcedureField::HasCopay),
    ("Regra de Isenção", ProcedureField::ExemptionRule),
    ("% Valor do Procedimento", ProcedureField::ProcedurePercent),
    ("Valor Limitador", ProcedureField::CapValue),
    ("Valor Rede Preferencial", ProcedureField::PreferredNetworkValue),
    ("Nome do Plano", ProcedureField::PlanName),
];

/// Header text of the partner sheet mapped to partner fields.
pub const PARTNER_HEADERS: &[(&str, PartnerField)] = &[
    ("Nome do Parceiro", PartnerField::PartnerName),
    ("Tipo", PartnerField::PartnerType),
    ("Tipo de Rede", PartnerField::NetworkTier),
    ("Nome do Plano", PartnerField::PlanName),
];

/// A record type that can be read from a spreadsheet grid.
pub trait SheetRecord: Sized {
    type Field: Copy + Eq + Hash + Debug + 'static;

    /// Header text to field. Matching is exact and case-sensitive.
    const HEADERS: &'static [(&'static str, Self::Field)];

    /// Build a record from mapped cells, coercing every field.
    fn from_fields(fields: &FieldBag<'_, Self::Field>) -> Self;

    /// Whether the record carries its required identity fields.
    fn is_retained(&self) -> bool;
}

impl SheetRecord for ProcedureRecord {
    type Field = ProcedureField;

    const HEADERS: &'static [(&'static str, ProcedureField)] = PROCEDURE_HEADERS;

    fn from_fields(fields: &FieldBag<'_, ProcedureField>) -> Self {
        let text = |field| coerce_text(fields.get(field));
        ProcedureRecord {
            code: text(ProcedureField::Code),
            procedure_name: text(ProcedureField::ProcedureName),
            classification: text(ProcedureField::Classification),
            has_copay: coerce_flag(fields.get(ProcedureField::HasCopay)),
            exemption_rule: text(ProcedureField::ExemptionRule),
            procedure_percent: coerce_percent(fields.get(ProcedureField::ProcedurePercent)),
            cap_value: text(ProcedureField::CapValue),
            preferred_network_value: text(ProcedureField::PreferredNetworkValue),
            plan_name: text(ProcedureField::PlanName),
        }
    }

    fn is_retained(&self) -> bool {
        !self.code.trim().is_empty()
    }
}

impl SheetRecord for PartnerRecord {
    type Field = PartnerField;

    const HEADERS: &'static [(&'static str, PartnerField)] = PARTNER_HEADERS;

    fn from_fields(fields: &FieldBag<'_, PartnerField>) -> Self {
        let text = |field| coerce_text(fields.get(field));
        PartnerRecord {
            partner_name: text(PartnerField::PartnerName),
            partner_type: text(PartnerField::PartnerType),
            network_tier: text(PartnerField::NetworkTier),
            plan_name: text(PartnerField::PlanName),
        }
    }

    fn is_retained(&self) -> bool {
        !self.partner_name.trim().is_empty() && !self.partner_type.trim().is_empty()
    }
}
