use crate::constants::{DOCUMENTS_HEADER, DOCUMENTS_SINK, OBJECTS_HEADER, OBJECTS_SINK};
use crate::errors::{AppError, AppResult};
use crate::models::Document;
use csv::{Terminator, WriterBuilder};
use std::io::{self, Write};


/// Row counts of a finished (or failed) write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    /// Data rows in the documents output (header excluded)
    pub documents: u64,
    /// Data rows in the objects output (header excluded)
    pub objects: u64,
}

impl WriteStats {
    pub fn rows(&self) -> u64 {
        self.documents + self.objects
    }
}

/// Encoded bytes buffered per sink before they are handed to it.
const SINK_BATCH_BYTES: usize = 64 * 1024;

/// Serializes documents into two correlated CSV outputs.
///
/// Each document becomes one `id,level` row in the documents sink and one `id,name`
/// row per object in the objects sink, in the object's order within the document.
/// Documents are written in arrival order; nothing is sorted, and rows are handed
/// to each sink in batches of whole rows.
pub struct StreamWriter<D: Write, O: Write> {
    documents: CsvSink<D>,
    objects: CsvSink<O>,
    stats: WriteStats,
}

impl<D: Write, O: Write> StreamWriter<D, O> {
    /// Creates the writer and, if `write_headers` is set, emits both header rows.
    pub fn new(documents_sink: D, objects_sink: O, write_headers: bool) -> AppResult<Self> {
        let mut writer = Self {
            documents: CsvSink::new(DOCUMENTS_SINK, documents_sink),
            objects: CsvSink::new(OBJECTS_SINK, objects_sink),
            stats: WriteStats::default(),
        };

        if write_headers {
            writer.documents.write_header(DOCUMENTS_HEADER)?;
            writer.objects.write_header(OBJECTS_HEADER)?;
        }

        Ok(writer)
    }

    /// Appends one document and all of its objects.
    pub fn write_document(&mut self, document: &Document) -> AppResult<()> {
        let level = document.level.as_deref().unwrap_or("");
        self.documents.write_row([document.id.as_str(), level])?;
        self.stats.documents += 1;

        for object in &document.objects {
            self.objects
                .write_row([document.id.as_str(), object.name.as_str()])?;
            self.stats.objects += 1;
        }

        Ok(())
    }

    /// Rows accepted so far, excluding headers. Some may still be buffered.
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Rows each sink has fully received so far, excluding headers.
    pub fn delivered(&self) -> WriteStats {
        WriteStats {
            documents: self.documents.delivered,
            objects: self.objects.delivered,
        }
    }

    /// Delivers the remaining rows, flushes both outputs and returns the final row counts.
    pub fn finish(self) -> AppResult<WriteStats> {
        self.documents.finish()?;
        self.objects.finish()?;
        Ok(self.stats)
    }
}

/// One CSV output: rows are encoded into a batch and written to the sink once
/// the batch is large enough, or on `finish`.
struct CsvSink<W: Write> {
    name: &'static str,
    encoder: csv::Writer<Vec<u8>>,
    /// End offset of each data row in the current batch
    row_ends: Vec<usize>,
    sink: W,
    /// Data rows the sink has fully received
    delivered: u64,
}

impl<W: Write> CsvSink<W> {
    fn new(name: &'static str, sink: W) -> Self {
        Self {
            name,
            encoder: csv_encoder(),
            row_ends: Vec::new(),
            sink,
            delivered: 0,
        }
    }

    fn write_header(&mut self, header: [&str; 2]) -> AppResult<()> {
        self.encode(header)?;
        Ok(())
    }

    fn write_row(&mut self, row: [&str; 2]) -> AppResult<()> {
        let end = self.encode(row)?;
        self.row_ends.push(end);
        if end >= SINK_BATCH_BYTES {
            self.deliver()?;
        }
        Ok(())
    }

    /// Encodes one record into the batch and returns the batch length after it.
    fn encode(&mut self, record: [&str; 2]) -> AppResult<usize> {
        self.encoder
            .write_record(record)
            .map_err(|e| self.error(e))?;
        self.encoder.flush().map_err(|e| self.error(e))?;
        Ok(self.encoder.get_ref().len())
    }

    /// Writes the current batch to the sink, counting every row it fully accepts.
    fn deliver(&mut self) -> AppResult<()> {
        let encoder = std::mem::replace(&mut self.encoder, csv_encoder());
        let batch = encoder.into_inner().map_err(|e| self.error(e.error()))?;
        let row_ends = std::mem::take(&mut self.row_ends);

        let mut written = 0;
        while written < batch.len() {
            match self.sink.write(&batch[written..]) {
                Ok(0) => {
                    self.delivered += complete_rows(&row_ends, written);
                    return Err(self.error("sink accepted no bytes"));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.delivered += complete_rows(&row_ends, written);
                    return Err(self.error(e));
                }
            }
        }

        self.delivered += row_ends.len() as u64;
        Ok(())
    }

    fn finish(mut self) -> AppResult<u64> {
        self.deliver()?;
        self.sink.flush().map_err(|e| self.error(e))?;
        Ok(self.delivered)
    }

    fn error(&self, err: impl std::fmt::Display) -> AppError {
        AppError::SinkWrite {
            sink: self.name,
            rows_written: self.delivered,
            message: err.to_string(),
        }
    }
}

fn complete_rows(row_ends: &[usize], written: usize) -> u64 {
    row_ends.iter().take_while(|&&end| end <= written).count() as u64
}

fn csv_encoder() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

/// Writes a stream of documents to the two sinks and flushes them.
///
/// Consumes `documents` exactly once. Any sink failure aborts immediately with
/// `SinkWrite`, naming the failing sink and the number of data rows it had fully
/// received before the failure.
pub fn write_documents<I, D, O>(
    documents: I,
    documents_sink: D,
    objects_sink: O,
    write_headers: bool,
) -> AppResult<WriteStats>
where
    I: IntoIterator<Item = Document>,
    D: Write,
    O: Write,
{
    let mut writer = StreamWriter::new(documents_sink, objects_sink, write_headers)?;
    for document in documents {
        writer.write_document(&document)?;
    }
    writer.finish()
}
