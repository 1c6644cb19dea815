//! Report rendering (tag_counts.csv, port_protocol_counts.csv).
//!
//! Both artifacts are rendered fully in memory so that nothing touches the
//! output directory until every report is known to be complete.

use std::io;

use crate::aggregate::Tallies;

/// Header row of the tag counts report.
pub const TAG_COUNTS_HEADER: [&str; 2] = ["Tag", "Count"];

/// Header row of the port/protocol counts report.
pub const PORT_PROTOCOL_HEADER: [&str; 3] = ["Port", "Protocol", "Count"];

/// Label of the trailing row carrying the untagged count.
pub const UNTAGGED_LABEL: &str = "Untagged";

/// Errors from report rendering.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to render {report}: {source}")]
    Render {
        report: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush {report}: {source}")]
    Flush {
        report: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Rendered report artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub tag_counts: Vec<u8>,
    pub port_protocol_counts: Vec<u8>,
}

impl Report {
    /// Render both reports from the final tallies.
    pub fn generate(tallies: &Tallies) -> Result<Self, ReportError> {
        Ok(Self {
            tag_counts: render_tag_counts(tallies)?,
            port_protocol_counts: render_port_protocol_counts(tallies)?,
        })
    }
}

/// Render `Tag,Count` rows in first-seen order, then one `Untagged,<n>` row.
pub fn render_tag_counts(tallies: &Tallies) -> Result<Vec<u8>, ReportError> {
    const REPORT: &str = "tag counts";
    let render = |source| ReportError::Render {
        report: REPORT,
        source,
    };

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(TAG_COUNTS_HEADER).map_err(render)?;

    for (tag, count) in tallies.tag_counts.iter() {
        let count = count.to_string();
        writer
            .write_record([tag.as_str(), count.as_str()])
            .map_err(render)?;
    }

    let untagged = tallies.untagged.to_string();
    writer
        .write_record([UNTAGGED_LABEL, untagged.as_str()])
        .map_err(render)?;

    finish(writer, REPORT)
}

/// Render `Port,Protocol,Count` rows in first-seen order.
pub fn render_port_protocol_counts(tallies: &Tallies) -> Result<Vec<u8>, ReportError> {
    const REPORT: &str = "port/protocol counts";
    let render = |source| ReportError::Render {
        report: REPORT,
        source,
    };

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(PORT_PROTOCOL_HEADER).map_err(render)?;

    for (key, count) in tallies.port_protocol_counts.iter() {
        let count = count.to_string();
        writer
            .write_record([key.port(), key.protocol(), count.as_str()])
            .map_err(render)?;
    }

    finish(writer, REPORT)
}

fn finish(writer: csv::Writer<Vec<u8>>, report: &'static str) -> Result<Vec<u8>, ReportError> {
    writer.into_inner().map_err(|e| ReportError::Flush {
        report,
        source: io::Error::new(e.error().kind(), e.to_string()),
    })
}
