//! Asynchronous leaderboard store.
//!
//! The persistence collaborator for finished battles: scores are
//! submitted and fetched as async operations over a JSON file. The
//! store is fire-and-forget from the simulation's perspective - a
//! submission may be in flight while ticks continue, and its success or
//! failure never touches simulation state, only the caller's UI.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Error type for leaderboard operations.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// Underlying file IO failed.
    #[error("leaderboard io error: {0}")]
    Io(#[from] std::io::Error),
    /// The store file holds malformed JSON.
    #[error("leaderboard data error: {0}")]
    Data(#[from] serde_json::Error),
}

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player-chosen name.
    pub name: String,
    /// Final battle score.
    pub score: u32,
}

/// JSON-file-backed score store.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
}

impl Leaderboard {
    /// Open (or create on first submit) a store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Submit a score.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] when the store cannot be read or
    /// written; the caller surfaces this as a transient notice.
    pub async fn submit_score(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let mut entries = self.read_entries().await?;
        entries.push(ScoreEntry {
            name: name.to_string(),
            score,
        });

        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json).await?;

        info!(name, score, total = entries.len(), "Score submitted");
        Ok(())
    }

    /// Fetch the top scores, ordered by score descending.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError`] when the store cannot be read.
    pub async fn top_scores(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut entries = self.read_entries().await?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn read_entries(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read leaderboard");
                Err(e.into())
            }
        }
    }
}
