use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::WriterBuilder;

use crate::errors::AppError;
use crate::models::Player;
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// The full roster with raw availability maps, pretty-printed.
pub fn export_json(players: &[Player]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(players)?)
}

/// One `Name,Email,Availability` row per player, availability as `"NN%"`.
pub fn export_csv(players: &[Player]) -> Result<String, AppError> {
    let mut wtr = WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(["Name", "Email", "Availability"])?;
    for player in players {
        let percentage = format!("{}%", stats::availability_percentage(&player.availability));
        wtr.write_record([
            player.name.as_str(),
            player.email.as_str(),
            percentage.as_str(),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render(format: ExportFormat, players: &[Player]) -> Result<String, AppError> {
    match format {
        ExportFormat::Json => export_json(players),
        ExportFormat::Csv => export_csv(players),
    }
}

pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "availability-export-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Writes the export into `dir` and returns the file's path.
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    players: &[Player],
    date: NaiveDate,
) -> Result<PathBuf, AppError> {
    let path = dir.join(export_file_name(format, date));
    fs::write(&path, render(format, players)?)?;
    tracing::info!(path = %path.display(), players = players.len(), "wrote export");
    Ok(path)
}
