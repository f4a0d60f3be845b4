//! Where the CLI gets its records: the catalog API or the spreadsheet itself.

use anyhow::Context;
use copay_core::{PartnerRecord, ProcedureRecord, SheetRecord, to_records};
use copay_sheets::{CatalogClient, GridSource, Sheet, SheetsClient, SheetsConfig};
use tracing::debug;

pub enum Source {
    Catalog(CatalogClient),
    Sheets {
        config: SheetsConfig,
        client: SheetsClient,
    },
}

impl Source {
    /// The catalog API at `api` when given, else the spreadsheet configured
    /// in the environment.
    pub fn new(api: Option<String>) -> Self {
        match api {
            Some(base_url) => Source::Catalog(CatalogClient::new(base_url)),
            None => {
                let config = SheetsConfig::from_env();
                let client = SheetsClient::new(config.api_base.clone());
                Source::Sheets { config, client }
            }
        }
    }

    pub async fn procedures(&self) -> anyhow::Result<Vec<ProcedureRecord>> {
        match self {
            Source::Catalog(catalog) => Ok(catalog.fetch_procedures().await?),
            Source::Sheets { config, client } => {
                read_sheet(config, client, Sheet::Procedures).await
            }
        }
    }

    pub async fn partners(&self) -> anyhow::Result<Vec<PartnerRecord>> {
        match self {
            Source::Catalog(catalog) => Ok(catalog.fetch_partners().await?),
            Source::Sheets { config, client } => read_sheet(config, client, Sheet::Partners).await,
        }
    }
}

async fn read_sheet<R: SheetRecord>(
    config: &SheetsConfig,
    client: &SheetsClient,
    sheet: Sheet,
) -> anyhow::Result<Vec<R>> {
    let request = config.request(sheet)?;
    let grid = client
        .fetch_grid(&request)
        .await
        .with_context(|| format!("reading the {sheet} range"))?
        .filter(|grid| sheet == Sheet::Procedures || !grid.is_empty())
        .with_context(|| format!("no data in the {sheet} range"))?;
    let records = to_records(&grid);
    debug!(%sheet, rows = grid.len(), records = records.len(), "mapped sheet");
    Ok(records)
}
