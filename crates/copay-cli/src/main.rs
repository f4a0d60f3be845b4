mod display;
mod source;

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use copay_core::{
    CopayState, FilterSpec, PartnerCategory, PartnerField, PartnerFilter, ProcedureField,
    SortDirection, SortSpec, filter_partners, filter_procedures, sort_partners, sort_procedures,
    split_partners, unique_values,
};
use copay_server::AppState;
use tracing::error;

use crate::source::Source;

#[derive(Parser)]
#[command(name = "copay", version, about = "Coparticipation table and partner directory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve /api/getProcedures and /api/getPartners
    Serve {
        #[arg(long, env = "COPAY_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Show the procedure table for one or more plans
    Procedures(ProcedureArgs),
    /// Show hospitals and laboratories for one or more plans
    Partners(PartnerArgs),
    /// List the values available to filter on
    Facets(SourceArgs),
}

#[derive(Args)]
struct SourceArgs {
    /// Read through a running catalog API instead of the spreadsheet
    #[arg(long, env = "COPAY_API")]
    api: Option<String>,
}

#[derive(Args)]
struct ProcedureArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Keep only these classifications (repeatable)
    #[arg(long)]
    classification: Vec<String>,

    /// Copay state: any, yes/sim or no/não
    #[arg(long, default_value = "any")]
    copay: CopayState,

    /// Keep only these plans (repeatable)
    #[arg(long)]
    plan: Vec<String>,

    /// Case-insensitive search over code, classification and exemption rule
    #[arg(long, default_value = "")]
    search: String,

    /// Sort by this field, e.g. code or procedureName
    #[arg(long)]
    sort: Option<ProcedureField>,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl ProcedureArgs {
    fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            classifications: self.classification.iter().cloned().collect(),
            copay_state: self.copay,
            plan_names: self.plan.iter().cloned().collect(),
            search_text: self.search.clone(),
        }
    }

    fn sort_spec(&self) -> Option<SortSpec<ProcedureField>> {
        self.sort.map(|field| SortSpec::new(field, direction(self.desc)))
    }
}

#[derive(Args)]
struct PartnerArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Keep only these plans (repeatable)
    #[arg(long)]
    plan: Vec<String>,

    /// Filter hospitals by name
    #[arg(long, default_value = "")]
    hospital_query: String,

    /// Filter laboratories by name
    #[arg(long, default_value = "")]
    lab_query: String,

    /// Sort by this field; preferred partners always come first
    #[arg(long, default_value = "partnerName")]
    sort: PartnerField,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl PartnerArgs {
    fn filter(&self, category: PartnerCategory) -> PartnerFilter {
        let name_query = match category {
            PartnerCategory::Hospital => &self.hospital_query,
            PartnerCategory::Laboratory => &self.lab_query,
        };
        PartnerFilter {
            plan_names: self.plan.iter().cloned().collect::<BTreeSet<_>>(),
            name_query: name_query.clone(),
        }
    }

    fn sort_spec(&self) -> SortSpec<PartnerField> {
        SortSpec::new(self.sort, direction(self.desc))
    }
}

fn direction(desc: bool) -> SortDirection {
    if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

/// Failure only when nothing at all could be shown.
fn exit_code(sections_ok: &[bool]) -> ExitCode {
    if sections_ok.iter().any(|ok| *ok) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::info!("copay v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { addr } => {
            let state = Arc::new(AppState::from_env());
            copay_server::serve(addr, state)
                .await
                .with_context(|| format!("serving on {addr}"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Procedures(args) => Ok(run_procedures(args).await),
        Command::Partners(args) => Ok(run_partners(args).await),
        Command::Facets(args) => Ok(run_facets(args).await),
    }
}

async fn run_procedures(args: ProcedureArgs) -> ExitCode {
    let source = Source::new(args.source.api.clone());
    let records = match source.procedures().await {
        Ok(records) => records,
        Err(err) => {
            error!(error = %format!("{err:#}"), "loading procedures failed");
            print!("{}", display::render_failed_section("Procedimentos"));
            return exit_code(&[false]);
        }
    };

    let spec = args.filter_spec();
    let mut shown = filter_procedures(&records, &spec);
    if let Some(sort) = args.sort_spec() {
        sort_procedures(&mut shown, sort);
    }

    println!("{}", display::procedure_count(shown.len(), records.len()));
    print!("{}", display::render_procedures(&shown, !spec.plan_names.is_empty()));
    exit_code(&[true])
}

async fn run_partners(args: PartnerArgs) -> ExitCode {
    let source = Source::new(args.source.api.clone());
    let records = match source.partners().await {
        Ok(records) => records,
        Err(err) => {
            error!(error = %format!("{err:#}"), "loading partners failed");
            for category in PartnerCategory::ALL {
                print!("{}", display::render_failed_section(category.title()));
            }
            return exit_code(&[false]);
        }
    };

    let buckets = split_partners(&records);
    for (i, category) in PartnerCategory::ALL.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        let filter = args.filter(category);
        let mut shown = filter_partners(buckets.get(category).iter().copied(), &filter);
        sort_partners(&mut shown, args.sort_spec());
        print!("{}", display::render_partner_section(category, &shown, !args.plan.is_empty()));
    }
    exit_code(&[true])
}

async fn run_facets(args: SourceArgs) -> ExitCode {
    let source = Source::new(args.api);
    let (procedures, partners) = tokio::join!(source.procedures(), source.partners());

    let procedures_ok = match procedures {
        Ok(records) => {
            let classifications = unique_values(&records, ProcedureField::Classification);
            let plans = unique_values(&records, ProcedureField::PlanName);
            print!("{}", display::render_facet("Classificações", &classifications));
            print!("{}", display::render_facet("Planos (procedimentos)", &plans));
            true
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "loading procedures failed");
            print!("{}", display::render_failed_section("Procedimentos"));
            false
        }
    };

    let partners_ok = match partners {
        Ok(records) => {
            let plans = unique_values(&records, PartnerField::PlanName);
            print!("{}", display::render_facet("Planos (parceiros)", &plans));
            true
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "loading partners failed");
            print!("{}", display::render_failed_section("Parceiros"));
            false
        }
    };

    exit_code(&[procedures_ok, partners_ok])
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn procedures_args_build_filter_and_sort() {
        let cli = Cli::try_parse_from([
            "copay",
            "procedures",
            "--plan",
            "Plano A",
            "--plan",
            "Plano B",
            "--classification",
            "Consultas",
            "--copay",
            "sim",
            "--search",
            "1010",
            "--sort",
            "procedure-name",
            "--desc",
        ])
        .unwrap();
        let Command::Procedures(args) = cli.command else {
            panic!("expected procedures");
        };

        let spec = args.filter_spec();
        assert_eq!(spec.plan_names.len(), 2);
        assert!(spec.classifications.contains("Consultas"));
        assert_eq!(spec.copay_state, CopayState::Yes);
        assert_eq!(spec.search_text, "1010");
        assert_eq!(
            args.sort_spec(),
            Some(SortSpec::new(
                ProcedureField::ProcedureName,
                SortDirection::Descending
            ))
        );
        assert_eq!(args.source.api, None);
    }

    #[test]
    fn procedures_defaults_are_unconstrained() {
        let cli = Cli::try_parse_from(["copay", "procedures"]).unwrap();
        let Command::Procedures(args) = cli.command else {
            panic!("expected procedures");
        };
        assert!(args.filter_spec().is_unconstrained());
        assert_eq!(args.sort_spec(), None);
    }

    #[test]
    fn unknown_copay_state_is_rejected() {
        assert!(Cli::try_parse_from(["copay", "procedures", "--copay", "maybe"]).is_err());
    }

    #[test]
    fn partners_default_to_name_ascending() {
        let cli = Cli::try_parse_from([
            "copay",
            "partners",
            "--api",
            "http://localhost:3000",
            "--hospital-query",
            "central",
        ])
        .unwrap();
        let Command::Partners(args) = cli.command else {
            panic!("expected partners");
        };

        assert_eq!(args.sort_spec(), SortSpec::default());
        assert_eq!(args.source.api.as_deref(), Some("http://localhost:3000"));
        assert_eq!(args.filter(PartnerCategory::Hospital).name_query, "central");
        assert_eq!(args.filter(PartnerCategory::Laboratory).name_query, "");
    }

    #[test]
    fn serve_takes_an_address() {
        let cli = Cli::try_parse_from(["copay", "serve", "--addr", "0.0.0.0:8080"]).unwrap();
        let Command::Serve { addr } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn exit_code_fails_only_when_everything_failed() {
        assert_eq!(exit_code(&[true, false]), ExitCode::SUCCESS);
        assert_eq!(exit_code(&[false, false]), ExitCode::FAILURE);
    }
}
