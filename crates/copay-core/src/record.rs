//! Typed catalog records produced from spreadsheet rows.
//!
//! Both record types serialize to camelCase JSON; that shape is what the
//! `/api/getProcedures` and `/api/getPartners` endpoints return.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Network tier that always sorts ahead of the rest of the partner directory.
pub const PREFERRED_TIER: &str = "Preferencial";

/// One row of the procedure copay table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureRecord {
    /// Procedure code; identity within a plan.
    pub code: String,
    pub procedure_name: String,
    pub classification: String,
    pub has_copay: bool,
    pub exemption_rule: String,
    /// Percentage of the procedure value charged as copay, `0` when unknown.
    pub procedure_percent: f64,
    /// Display text, may carry currency formatting.
    pub cap_value: String,
    pub preferred_network_value: String,
    pub plan_name: String,
}

/// One row of the accredited partner directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    pub partner_name: String,
    /// Canonically "Hospital" or "Laboratório".
    pub partner_type: String,
    pub network_tier: String,
    pub plan_name: String,
}

impl PartnerRecord {
    /// Whether this partner belongs to the preferred network tier.
    ///
    /// Exact match against [`PREFERRED_TIER`].
    pub fn is_preferred(&self) -> bool {
        self.network_tier == PREFERRED_TIER
    }
}

/// A borrowed field value, typed the way the field is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    Number(f64),
}

impl<'a> FieldValue<'a> {
    /// The value if the field is string-typed.
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display form of the value.
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s),
            FieldValue::Flag(true) => Cow::Borrowed("true"),
            FieldValue::Flag(false) => Cow::Borrowed("false"),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

/// Field-addressable access to a record, used by sorting and facet extraction.
pub trait Record {
    type Field: Copy + Eq;

    fn value(&self, field: Self::Field) -> FieldValue<'_>;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} field '{name}'")]
pub struct UnknownField {
    pub kind: &'static str,
    pub name: String,
}

/// Columns of the procedure table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcedureField {
    Code,
    ProcedureName,
    Classification,
    HasCopay,
    ExemptionRule,
    ProcedurePercent,
    CapValue,
    PreferredNetworkValue,
    PlanName,
}

impl ProcedureField {
    /// Every field, in table column order.
    pub const ALL: [ProcedureField; 9] = [
        ProcedureField::Code,
        ProcedureField::ProcedureName,
        ProcedureField::Classification,
        ProcedureField::HasCopay,
        ProcedureField::ExemptionRule,
        ProcedureField::ProcedurePercent,
        ProcedureField::CapValue,
        ProcedureField::PreferredNetworkValue,
        ProcedureField::PlanName,
    ];

    /// JSON field name.
    pub fn name(self) -> &'static str {
        match self {
            ProcedureField::Code => "code",
            ProcedureField::ProcedureName => "procedureName",
            ProcedureField::Classification => "classification",
            ProcedureField::HasCopay => "hasCopay",
            ProcedureField::ExemptionRule => "exemptionRule",
            ProcedureField::ProcedurePercent => "procedurePercent",
            ProcedureField::CapValue => "capValue",
            ProcedureField::PreferredNetworkValue => "preferredNetworkValue",
            ProcedureField::PlanName => "planName",
        }
    }

    /// Column title shown to members.
    pub fn label(self) -> &'static str {
        match self {
            ProcedureField::Code => "Código",
            ProcedureField::ProcedureName => "Procedimentos",
            ProcedureField::Classification => "Classificação dos Procedimentos",
            ProcedureField::HasCopay => "Copart",
            ProcedureField::ExemptionRule => "Regra de Isenção",
            ProcedureField::ProcedurePercent => "% Valor do Procedimento",
            ProcedureField::CapValue => "Valor Limitador",
            ProcedureField::PreferredNetworkValue => "Valor Rede Preferencial",
            ProcedureField::PlanName => "Nome do Plano",
        }
    }
}

impl FromStr for ProcedureField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        ProcedureField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownField {
                kind: "procedure",
                name: s.to_string(),
            })
    }
}

/// Columns of the partner directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PartnerField {
    PartnerName,
    PartnerType,
    NetworkTier,
    PlanName,
}

impl PartnerField {
    pub const ALL: [PartnerField; 4] = [
        PartnerField::PartnerName,
        PartnerField::PartnerType,
        PartnerField::NetworkTier,
        PartnerField::PlanName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PartnerField::PartnerName => "partnerName",
            PartnerField::PartnerType => "partnerType",
            PartnerField::NetworkTier => "networkTier",
            PartnerField::PlanName => "planName",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartnerField::PartnerName => "Nome do Parceiro",
            PartnerField::PartnerType => "Tipo",
            PartnerField::NetworkTier => "Tipo de Rede",
            PartnerField::PlanName => "Nome do Plano",
        }
    }
}

impl FromStr for PartnerField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        PartnerField::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownField {
                kind: "partner",
                name: s.to_string(),
            })
    }
}

/// Accept `plan-name` and `plan_name` as spellings of `planName`.
fn squash(s: &str) -> String {
    s.trim().chars().filter(|c| *c != '-' && *c != '_').collect()
}

impl Record for ProcedureRecord {
    type Field = ProcedureField;

    fn value(&self, field: ProcedureField) -> FieldValue<'_> {
        match field {
            ProcedureField::Code => FieldValue::Text(&self.code),
            ProcedureField::ProcedureName => FieldValue::Text(&self.procedure_name),
            ProcedureField::Classification => FieldValue::Text(&self.classification),
            ProcedureField::HasCopay => FieldValue::Flag(self.has_copay),
            ProcedureField::ExemptionRule => FieldValue::Text(&self.exemption_rule),
            ProcedureField::ProcedurePercent => FieldValue::Number(self.procedure_percent),
            ProcedureField::CapValue => FieldValue::Text(&self.cap_value),
            ProcedureField::PreferredNetworkValue => {
                FieldValue::Text(&self.preferred_network_value)
            }
            ProcedureField::PlanName => FieldValue::Text(&self.plan_name),
        }
    }
}

impl Record for PartnerRecord {
    type Field = PartnerField;

    fn value(&self, field: PartnerField) -> FieldValue<'_> {
        match field {
            PartnerField::PartnerName => FieldValue::Text(&self.partner_name),
            PartnerField::PartnerType => FieldValue::Text(&self.partner_type),
            PartnerField::NetworkTier => FieldValue::Text(&self.network_tier),
            PartnerField::PlanName => FieldValue::Text(&self.plan_name),
        }
    }
}
