use csv::{ReaderBuilder, StringRecordsIntoIter};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::builder::RecordBuilder;
use crate::error::{Result, VacancyError};
use crate::models::Vacancy;
use crate::schema::{resolve_schema, Schema};
use crate::translator::Translator;

/// Open a CSV export and prepare a one-shot stream of its vacancies.
///
/// The header is read and resolved immediately, so an empty file or an
/// unsupported header fails here, before any query parameter is looked at.
pub fn open_dataset<'a, P: AsRef<Path>>(
    path: P,
    translator: &'a Translator,
) -> Result<VacancyStream<'a, File>> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "opening vacancy export");
    let file = File::open(path)?;
    VacancyStream::from_reader(file, translator)
}

/// Lazy, single-pass stream of vacancies read from CSV.
///
/// Rows that fail validation are skipped. The stream counts what it has
/// seen so that, once drained, an empty file can be told apart from a file
/// whose rows were all rejected (see [`VacancyStream::finish`]).
pub struct VacancyStream<'a, R: Read> {
    records: StringRecordsIntoIter<R>,
    builder: RecordBuilder<'a>,
    rows_seen: usize,
    accepted: usize,
}

impl<'a, R: Read> VacancyStream<'a, R> {
    pub fn from_reader(reader: R, translator: &'a Translator) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(VacancyError::EmptyInput);
        }

        let resolved = resolve_schema(&headers)?;
        tracing::info!(schema = ?resolved.schema, columns = headers.len(), "resolved header");

        Ok(Self {
            records: csv_reader.into_records(),
            builder: RecordBuilder::new(resolved, translator),
            rows_seen: 0,
            accepted: 0,
        })
    }

    pub fn schema(&self) -> Schema {
        self.builder.schema()
    }

    pub fn rows_seen(&self) -> usize {
        self.rows_seen
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Check the totals of a drained stream.
    /// No data rows at all is `EmptyInput`; rows that were all rejected is `NoData`.
    pub fn finish(&self) -> Result<()> {
        tracing::info!(
            rows = self.rows_seen,
            accepted = self.accepted,
            "finished reading vacancies"
        );

        if self.rows_seen == 0 {
            Err(VacancyError::EmptyInput)
        } else if self.accepted == 0 {
            Err(VacancyError::NoData)
        } else {
            Ok(())
        }
    }

    /// Drain the stream into memory. Statistics need several looks at the
    /// same records, so they work on the materialized list.
    pub fn collect_vacancies(mut self) -> Result<Vec<Vacancy>> {
        let vacancies = self.by_ref().collect::<Result<Vec<_>>>()?;
        self.finish()?;
        Ok(vacancies)
    }
}

impl<'a, R: Read> Iterator for VacancyStream<'a, R> {
    type Item = Result<Vacancy>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(err) => {
                    self.rows_seen += 1;
                    tracing::debug!(error = %err, "dropping unreadable row");
                    continue;
                }
            };
            self.rows_seen += 1;

            let fields: Vec<&str> = record.iter().collect();
            match self.builder.build(&fields) {
                Ok(Some(vacancy)) => {
                    self.accepted += 1;
                    return Some(Ok(vacancy));
                }
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
