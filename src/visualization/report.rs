use serde::Serialize;
use std::fmt;

use crate::binning::Bin;
use crate::engine::DecodeSummary;
use crate::observability::MetricsSnapshot;

use super::scene::Scene;
use super::table::RecordRow;

/// Printable result of decoding and aggregating one dump
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: DecodeSummary,
    pub metrics: MetricsSnapshot,
    pub record_count: usize,
    pub rows: Vec<RecordRow>,
    pub scene: Scene,
    /// Why the scene is empty, when it is
    pub notice: Option<String>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Source:      {}", self.summary.source)?;
        writeln!(f, "Stopped by:  {:?}", self.summary.stop_reason)?;
        writeln!(
            f,
            "Decoded:     {} records from {} bytes ({} resync wraparounds)",
            self.record_count, self.metrics.bytes_read, self.metrics.wraparounds
        )?;

        if !self.rows.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", RecordRow::headers().join("\t"))?;
            for row in &self.rows {
                writeln!(f, "{}", row.cells().join("\t"))?;
            }
        }

        writeln!(f)?;
        if let Some(notice) = &self.notice {
            return writeln!(f, "No points: {}", notice);
        }

        writeln!(f, "Points:      {}", self.scene.points.len())?;
        for point in &self.scene.points {
            writeln!(f, "  {:.4}\t{:.4}\t{:.4}", point.x, point.y, point.z)?;
        }

        write_bins(f, "x", &self.scene.bars.x)?;
        write_bins(f, "y", &self.scene.bars.y)?;
        write_bins(f, "z", &self.scene.bars.z)
    }
}

fn write_bins(f: &mut fmt::Formatter<'_>, label: &str, bins: &[Bin]) -> fmt::Result {
    writeln!(f, "Bars {}:", label)?;
    for bin in bins {
        let (lower, upper) = crate::binning::interval(bin.index);
        writeln!(f, "  [{:.1}, {:.1})\t{}", lower, upper, bin.count)?;
    }
    Ok(())
}
