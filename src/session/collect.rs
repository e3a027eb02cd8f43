use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::model::Speaker;
use super::parse::{AnalysisBatch, parse_analysis_batch};

pub fn load_batch(path: &Path) -> Result<AnalysisBatch> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read analysis batch {}", path.display()))?;

    let mut batch = parse_analysis_batch(&raw)
        .with_context(|| format!("failed to parse analysis batch {}", path.display()))?;

    batch.speakers = dedupe_speakers(std::mem::take(&mut batch.speakers));
    batch.config = batch.config.map(|config| config.sanitize());

    info!(
        path = %path.display(),
        speakers = batch.speakers.len(),
        interactions = batch.interactions.len(),
        "loaded analysis batch"
    );
    Ok(batch)
}

pub fn dedupe_speakers(speakers: Vec<Speaker>) -> Vec<Speaker> {
    let mut seen = HashSet::with_capacity(speakers.len());
    speakers
        .into_iter()
        .filter(|speaker| {
            let fresh = seen.insert(speaker.id.clone());
            if !fresh {
                warn!(speaker = %speaker.id, "duplicate speaker id, keeping first occurrence");
            }
            fresh
        })
        .collect()
}
