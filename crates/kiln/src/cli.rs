//! The `kiln` command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::listing::{self, ListingError};
use crate::output::OutputMode;
use crate::params::{ParamError, SearchParams};
use crate::profile::{ListingProfile, Profiles, PAGE_PARAM};

/// Browse listings with query-string filters, search, sorting and paging.
#[derive(Debug, Parser)]
#[command(name = "kiln", version)]
pub struct Cli {
    /// Load listing profiles from a YAML file instead of the built-in set
    #[arg(long, global = true, value_name = "FILE")]
    pub profiles: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of a listing
    List(ListArgs),

    /// Show the available listings and their parameters
    Profiles,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Listing name, such as `forum` or `portfolio`
    pub listing: String,

    /// Query string, as a listing URL would carry it
    #[arg(long, value_name = "QUERY", default_value = "")]
    pub params: String,

    /// Page number (overrides the query string)
    #[arg(long)]
    pub page: Option<usize>,

    /// Sort option label (overrides the query string)
    #[arg(long)]
    pub sort: Option<String>,

    /// Search term (overrides the query string)
    #[arg(short = 'q', long = "query")]
    pub search: Option<String>,

    /// Set any listing parameter, as PARAM=VALUE
    #[arg(long = "set", value_name = "PARAM=VALUE")]
    pub set: Vec<String>,

    /// Read records from a JSON file instead of the built-in dataset
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,
}

impl ListArgs {
    /// Merges the query string with the flag overrides.
    ///
    /// Flags win over the query string. A flag for a parameter the listing
    /// does not have is an error.
    pub fn search_params(&self, profile: &ListingProfile) -> Result<SearchParams, ParamError> {
        let mut params = SearchParams::parse(&self.params);

        if let Some(page) = self.page {
            params.set(PAGE_PARAM, page.to_string());
        }
        if let Some(label) = &self.sort {
            let sort = profile.sort.as_ref().ok_or_else(|| ParamError::Unsupported {
                param: "--sort".to_string(),
            })?;
            params.set(sort.param.as_str(), label.as_str());
        }
        if let Some(term) = &self.search {
            let search = profile.search.as_ref().ok_or_else(|| ParamError::Unsupported {
                param: "--query".to_string(),
            })?;
            params.set(search.param.as_str(), term.as_str());
        }
        for assignment in &self.set {
            params.assign(assignment)?;
        }

        let known = profile.params();
        if let Some((key, _)) = params.iter().find(|(key, _)| !known.contains(key)) {
            return Err(ParamError::Unsupported {
                param: key.to_string(),
            });
        }
        Ok(params)
    }
}

/// Runs a parsed command and returns what it prints.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let profiles = match &cli.profiles {
        Some(path) => Profiles::from_path(path)?,
        None => Profiles::builtin()?,
    };

    match &cli.command {
        Commands::List(args) => {
            let profile = profiles.get(&args.listing).map_err(ListingError::from)?;
            let params = args.search_params(profile)?;
            Ok(listing::run(profile, &params, args.data.as_deref(), args.output)?)
        }
        Commands::Profiles => Ok(describe(&profiles)),
    }
}

fn describe(profiles: &Profiles) -> String {
    let mut out = String::new();
    for profile in profiles.iter() {
        out.push_str(&profile.name);
        if let Some(description) = &profile.description {
            out.push_str(" - ");
            out.push_str(description);
        }
        out.push('\n');
        out.push_str(&format!("  records: {}, page size: {}\n", profile.records, profile.page_size));
        out.push_str(&format!("  params: {}\n", profile.params().join(", ")));
        if let Some(sort) = &profile.sort {
            out.push_str(&format!("  sort ({}): {}\n", sort.param, sort.labels()));
        }
    }
    out.trim_end().to_string()
}
