use std::path::PathBuf;

use clap::Parser;

use crate::error::{KomikError, Result};
use crate::types::DetailState;

/// Browse a comic's chapters and pick up where you left off.
#[derive(Parser, Debug)]
#[command(name = "komik", version, about)]
pub struct Cli {
    /// Route identifier of the comic; also the history key
    pub route_id: String,

    /// Navigation state as JSON: {"comic": {...}, "processedLink": "..."}
    #[arg(long)]
    pub state: Option<String>,

    /// Link fragment for the detail endpoint; overrides processedLink
    #[arg(long)]
    pub link: Option<String>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// History file (JSON map of route id to last-read chapter)
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Write logs here instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Inbound navigation state assembled from `--state` and `--link`.
    pub fn detail_state(&self) -> Result<DetailState> {
        let mut state = match &self.state {
            Some(json) => serde_json::from_str::<DetailState>(json)
                .map_err(|e| KomikError::Config(format!("invalid --state: {}", e)))?,
            None => DetailState::default(),
        };
        if let Some(link) = &self.link {
            state.processed_link = Some(link.clone());
        }
        Ok(state)
    }
}
