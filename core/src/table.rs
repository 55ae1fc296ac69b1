use crate::document::{Document, DocumentId};
use crate::error::{AnalysisError, AnalysisResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const TEXT_COLUMN: &str = "Texto_Documento";
pub const ID_COLUMN: &str = "ID";
pub const DATE_COLUMN: &str = "Data";

#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Field delimiter; sniffed from the header line when `None`.
    pub delimiter: Option<u8>,
    /// Prepended as `{prefix}:{row}` to row-index ids, so tables merged into one batch
    /// keep distinct ids.
    pub fallback_id_prefix: Option<String>,
}

impl TableOptions {
    fn fallback_id(&self, row: usize) -> DocumentId {
        match &self.fallback_id_prefix {
            Some(prefix) => DocumentId::from(format!("{prefix}:{row}")),
            None => DocumentId::from(row),
        }
    }
}

/// Guess the delimiter from the header line: whichever of `,` `;` tab occurs most, comma on ties.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = (b',', header_line.matches(',').count());
    for d in [b';', b'\t'] {
        let n = header_line.matches(d as char).count();
        if n > best.1 { best = (d, n); }
    }
    best.0
}

/// Load documents from a delimited table with a header row.
///
/// `Texto_Documento` is required. `ID` falls back to the 0-based row index when the
/// column or the cell is missing, and `Data` is carried along untouched.
pub fn load_csv<R: Read>(mut reader: R, options: &TableOptions) -> AnalysisResult<Vec<Document>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    let delimiter = options.delimiter.unwrap_or_else(|| {
        let head = String::from_utf8_lossy(&buf);
        sniff_delimiter(head.lines().next().unwrap_or(""))
    });

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(buf.as_slice());
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let position = |name: &str| headers.iter().position(|h| h == name);
    let text_col = position(TEXT_COLUMN).ok_or_else(|| AnalysisError::MissingColumn(TEXT_COLUMN.to_string()))?;
    let id_col = position(ID_COLUMN);
    let date_col = position(DATE_COLUMN);
    if id_col.is_none() {
        tracing::info!("no {ID_COLUMN} column, using row index as document id");
    }

    let mut docs = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let cell = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let id = cell(id_col).map(DocumentId::from).unwrap_or_else(|| options.fallback_id(row));
        let text = record.get(text_col).filter(|s| !s.trim().is_empty()).map(str::to_string);
        docs.push(Document { id, date: cell(date_col), text });
    }
    tracing::debug!(rows = docs.len(), delimiter = %(delimiter as char), "table loaded");
    Ok(docs)
}

pub fn load_csv_path<P: AsRef<Path>>(path: P, options: &TableOptions) -> AnalysisResult<Vec<Document>> {
    let f = File::open(path)?;
    load_csv(f, options)
}
