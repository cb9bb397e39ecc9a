mod nwb;

use anyhow::{bail, Context, Result};
use brainstem::types::{StemUrl, Username};
use brainstem::{Account, Portal, Query, ResourceType, StemClient};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "BrainSTEM client and NWB conversion-spec tool")]
struct Cli {
    /// BrainSTEM API address
    #[arg(long, default_value = "https://www.brainstem.org/api/")]
    url: StemUrl,

    /// Authorization token
    #[arg(long, env = "BRAINSTEM_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Obtain an authorization token and print it
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Load a record by id, or a collection restricted by query modifiers
    Get {
        model: ResourceType,
        id: Option<String>,

        /// Exact-match filter, e.g. --filter name=mouse-07
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Sort field, prefix with - for descending
        #[arg(long)]
        sort: Vec<String>,

        /// Related field to expand inline
        #[arg(long)]
        include: Vec<String>,

        #[arg(long, default_value_t = Portal::Public)]
        portal: Portal,
    },

    /// Create a record, or update one by id (partial update)
    Save {
        model: ResourceType,

        /// Record fields as a JSON object
        data: String,

        #[arg(long)]
        id: Option<String>,

        #[arg(long, default_value_t = Portal::Private)]
        portal: Portal,
    },

    /// Delete a record by id
    Delete {
        model: ResourceType,
        id: String,

        #[arg(long, default_value_t = Portal::Private)]
        portal: Portal,
    },

    /// Print the aggregated metadata document for a dataset
    Aggregate {
        dataset_id: String,

        #[arg(long, default_value_t = Portal::Public)]
        portal: Portal,
    },

    /// Print the NWB conversion-spec document for a dataset
    Nwbspec {
        dataset_id: String,

        #[arg(long, default_value_t = Portal::Public)]
        portal: Portal,
    },
}

fn parse_filter(given: &str) -> Result<(String, String)> {
    match given.split_once('=') {
        Some((field, value)) => Ok((field.to_string(), value.to_string())),
        None => bail!("\"{}\" is not of the form FIELD=VALUE", given),
    }
}

fn client(url: StemUrl, token: Option<String>) -> Result<StemClient> {
    let token = token.context("no token given, pass --token or set BRAINSTEM_TOKEN")?;
    Ok(StemClient::new(url, token)?)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args: Cli = Cli::parse();

    match args.command {
        Command::Login { username, password } => {
            let account = Account::new(args.url, Username::new(username), password);
            let token = account.get_token().await?;
            println!("{}", token);
        }
        Command::Get {
            model,
            id,
            filters,
            sort,
            include,
            portal,
        } => {
            let mut query = Query::new();
            for given in &filters {
                let (field, value) = parse_filter(given)?;
                query = query.filter(field, value);
            }
            for field in sort {
                query = query.sort(field);
            }
            for field in include {
                query = query.include(field);
            }
            tracing::debug!(model = %model, portal = %portal, "loading");
            let client = client(args.url, args.token)?;
            let body = client.load(model, portal, id.as_deref(), &query).await?;
            print_json(&body)?;
        }
        Command::Save {
            model,
            data,
            id,
            portal,
        } => {
            let data: Value =
                serde_json::from_str(&data).context("record data is not valid JSON")?;
            let client = client(args.url, args.token)?;
            let saved = client.save(model, portal, id.as_deref(), &data).await?;
            print_json(&saved)?;
        }
        Command::Delete { model, id, portal } => {
            let client = client(args.url, args.token)?;
            client.delete(model, portal, &id).await?;
        }
        Command::Aggregate { dataset_id, portal } => {
            let client = client(args.url, args.token)?;
            let document = client.dataset_metadata(portal, &dataset_id).await?;
            print_json(&document)?;
        }
        Command::Nwbspec { dataset_id, portal } => {
            let client = client(args.url, args.token)?;
            let document = client.dataset_metadata(portal, &dataset_id).await?;
            let spec = nwb::build_conversion_spec(&document, None)?;
            print_json(&spec)?;
        }
    };
    Ok(())
}
