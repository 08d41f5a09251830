use std::io;

use pitchrate::{RatingTable, ReportRenderer};

/// Writes rating tables as CSV with header
/// `Player,PeerGroup,Games,<components...>,Rating`.
pub struct CsvRenderer<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvRenderer<W> {
    pub fn new(writer: W) -> CsvRenderer<W> {
        CsvRenderer {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }
}

impl<W: io::Write> ReportRenderer for CsvRenderer<W> {
    type Error = csv::Error;

    fn render(&mut self, table: &RatingTable) -> Result<(), csv::Error> {
        let mut header = vec!["Player", "PeerGroup", "Games"];
        header.extend(table.component_names.iter().map(|name| &**name));
        header.push("Rating");
        self.writer.write_record(&header)?;

        for record in &table.records {
            let mut row = vec![
                record.name.clone(),
                record.peer_group.to_string(),
                record.games_played.to_string(),
            ];
            row.extend(record.components.iter().map(|value| format!("{value:.3}")));
            row.push(record.final_score.to_string());
            self.writer.write_record(&row)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
