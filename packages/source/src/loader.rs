//! CSV loader and cleaner.
//!
//! Reads an incident export, resolves the columns named by a
//! [`DatasetDefinition`], and keeps only rows with an exactly-formatted
//! timestamp and both coordinates. Dropped rows are tallied by reason in
//! a [`LoadReport`].

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crime_viz_crime_models::IncidentRecord;

use crate::parsing::{normalize_header, parse_flag, parse_lat_lng, parse_timestamp};
use crate::progress::ProgressCallback;
use crate::{DatasetDefinition, SourceError};

/// Rows processed between progress updates.
const PROGRESS_INTERVAL: u64 = 10_000;

/// Row counts from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read (header excluded).
    pub rows_read: u64,
    /// Rows dropped because the timestamp was blank or not in the expected
    /// format.
    pub dropped_invalid_date: u64,
    /// Rows with a valid timestamp dropped for a missing coordinate.
    pub dropped_missing_coordinates: u64,
    /// Rows kept.
    pub kept: u64,
    /// Kept rows whose arrest flag is `true`.
    pub arrests: u64,
}

/// The cleaned dataset plus the counts describing how it was produced.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Cleaned records in file order.
    pub records: Vec<IncidentRecord>,
    /// Row accounting.
    pub report: LoadReport,
}

/// Column positions of the projected fields in the header row.
struct ColumnIndexes {
    category: usize,
    occurred_at: usize,
    latitude: usize,
    longitude: usize,
    arrest: usize,
}

impl ColumnIndexes {
    fn resolve(headers: &[String], definition: &DatasetDefinition) -> Result<Self, SourceError> {
        let mut positions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, header) in headers.iter().enumerate() {
            positions.entry(header.as_str()).or_default().push(i);
        }
        for (header, at) in &positions {
            if at.len() > 1 {
                log::warn!("[{}] Header '{header}' appears at columns {at:?}", definition.id);
            }
        }

        let find = |column: &str| match positions.get(column).map(Vec::as_slice) {
            Some([index]) => Ok(*index),
            Some(_) => Err(SourceError::DuplicateColumn {
                column: column.to_string(),
            }),
            None => Err(SourceError::MissingColumn {
                column: column.to_string(),
                available: headers.join(", "),
            }),
        };

        let fields = &definition.fields;
        Ok(Self {
            category: find(&fields.category)?,
            occurred_at: find(&fields.occurred_at)?,
            latitude: find(&fields.latitude)?,
            longitude: find(&fields.longitude)?,
            arrest: find(&fields.arrest)?,
        })
    }
}

/// Loads and cleans the incident CSV at `path`.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened, is not valid CSV,
/// or lacks a required column.
pub fn load_incidents(
    path: &Path,
    definition: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, SourceError> {
    log::info!("[{}] Reading {}", definition.id, path.display());
    let file = File::open(path)?;
    let total_bytes = file.metadata()?.len();
    read_incidents(BufReader::new(file), definition, progress, Some(total_bytes))
}

/// Loads and cleans incident CSV data from any reader.
///
/// # Errors
///
/// Returns [`SourceError`] if the data is not valid CSV or lacks a
/// required column.
pub fn load_incidents_from_reader<R: Read>(
    reader: R,
    definition: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, SourceError> {
    read_incidents(reader, definition, progress, None)
}

fn read_incidents<R: Read>(
    reader: R,
    definition: &DatasetDefinition,
    progress: &Arc<dyn ProgressCallback>,
    total_bytes: Option<u64>,
) -> Result<Dataset, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| definition.resolve_column(&normalize_header(h)).to_owned())
        .collect();
    log::debug!("[{}] Normalized headers: {headers:?}", definition.id);

    let columns = ColumnIndexes::resolve(&headers, definition)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();
    progress.start(&format!("[{}] loading incidents", definition.id), total_bytes);

    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        report.rows_read += 1;
        if report.rows_read % PROGRESS_INTERVAL == 0 {
            progress.advance(reader.position().byte(), report.rows_read);
        }

        let cell = |i: usize| row.get(i).unwrap_or("");

        let Some(date) = parse_timestamp(cell(columns.occurred_at), &definition.timestamp_format)
        else {
            log::debug!("Row {}: unparseable date, dropped", report.rows_read);
            report.dropped_invalid_date += 1;
            continue;
        };

        let Some((latitude, longitude)) =
            parse_lat_lng(cell(columns.latitude), cell(columns.longitude))
        else {
            log::debug!("Row {}: missing coordinates, dropped", report.rows_read);
            report.dropped_missing_coordinates += 1;
            continue;
        };

        let arrest = parse_flag(cell(columns.arrest));
        if arrest == Some(true) {
            report.arrests += 1;
        }

        records.push(IncidentRecord::new(
            cell(columns.category).trim().to_owned(),
            date,
            latitude,
            longitude,
            arrest,
        ));
    }

    report.kept = records.len() as u64;
    progress.advance(reader.position().byte(), report.rows_read);

    log::info!(
        "[{}] Kept {} of {} rows ({} invalid dates, {} missing coordinates, {} arrests)",
        definition.id,
        report.kept,
        report.rows_read,
        report.dropped_invalid_date,
        report.dropped_missing_coordinates,
        report.arrests,
    );
    progress.finish(format!(
        "[{}] loaded {} incidents",
        definition.id, report.kept
    ));

    Ok(Dataset { records, report })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crime_viz_crime_models::{ColorBucket, DayOfWeek};

    use super::*;
    use crate::progress::null_progress;

    const HEADER: &str =
        "ID, Date  Of Occurrence ,PRIMARY DESCRIPTION,ARREST,LATITUDE,LONGITUDE,BLOCK\n";

    fn load(body: &str) -> Result<Dataset, SourceError> {
        let csv = format!("{HEADER}{body}");
        load_incidents_from_reader(
            csv.as_bytes(),
            &DatasetDefinition::chicago().unwrap(),
            &null_progress(),
        )
    }

    #[test]
    fn keeps_valid_rows_and_drops_bad_dates() {
        let dataset = load(
            "1,01/02/2023 10:15:00 PM,HOMICIDE,Y,41.88,-87.63,100 N STATE ST\n\
             2,03/15/2024 09:05:00 AM,THEFT,N,41.90,-87.70,200 W MADISON ST\n\
             3,not a date,BATTERY,N,41.91,-87.71,300 S DEARBORN ST\n",
        )
        .unwrap();

        assert_eq!(dataset.records.len(), 2);
        assert_eq!(dataset.report.rows_read, 3);
        assert_eq!(dataset.report.dropped_invalid_date, 1);
        assert_eq!(dataset.report.kept, 2);
        assert_eq!(dataset.report.arrests, 1);

        let first = &dataset.records[0];
        assert_eq!(first.primary_description, "HOMICIDE");
        assert_eq!(first.hour, 22);
        assert_eq!(first.weekday, DayOfWeek::Monday);
        assert_eq!(first.month, 1);
        assert_eq!(first.year, 2023);
        assert_eq!(first.arrest, Some(true));
        assert_eq!(first.bucket(), ColorBucket::Homicide);
    }

    #[test]
    fn drops_rows_missing_coordinates() {
        let dataset = load(
            "1,01/02/2023 10:15:00 PM,THEFT,N,,-87.63,X\n\
             2,01/02/2023 10:15:00 PM,THEFT,N,41.88,,X\n\
             3,01/02/2023 10:15:00 PM,THEFT,N,41.88,-87.63,X\n",
        )
        .unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.report.dropped_missing_coordinates, 2);
    }

    #[test]
    fn every_kept_row_has_date_and_coordinates() {
        let dataset = load(
            "1,12/31/2022 11:59:59 PM,ROBBERY,,41.7,-87.5,X\n\
             2,2022-12-31 23:59:59,ROBBERY,,41.7,-87.5,X\n\
             3,06/01/2023 12:30:00 PM,NARCOTICS,true,abc,-87.5,X\n\
             4,06/01/2023 12:30:00 PM,NARCOTICS,false,41.6,-87.4,X\n",
        )
        .unwrap();
        assert_eq!(dataset.records.len(), 2);
        for record in &dataset.records {
            assert!(record.has_coordinates());
        }
        assert_eq!(dataset.records[0].arrest, None);
        assert_eq!(dataset.records[1].arrest, Some(false));
    }

    #[test]
    fn empty_body_yields_empty_dataset() {
        let dataset = load("").unwrap();
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.report, LoadReport::default());
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "ID,DATE OF OCCURRENCE,PRIMARY DESCRIPTION,LATITUDE,LONGITUDE\n";
        let err = load_incidents_from_reader(
            csv.as_bytes(),
            &DatasetDefinition::chicago().unwrap(),
            &null_progress(),
        )
        .unwrap_err();
        // Single space normalizes to `date_of_occurrence`, which is not the
        // synonym, so `date` is reported first.
        match err {
            SourceError::MissingColumn { column, .. } => assert_eq!(column, "date"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn synonym_colliding_with_target_is_fatal() {
        let csv = "ID,DATE,DATE  OF OCCURRENCE,PRIMARY DESCRIPTION,ARREST,LATITUDE,LONGITUDE\n\
                   1,01/02/2023 10:15:00 PM,01/02/2023 10:15:00 PM,THEFT,N,41.88,-87.63\n";
        let err = load_incidents_from_reader(
            csv.as_bytes(),
            &DatasetDefinition::chicago().unwrap(),
            &null_progress(),
        )
        .unwrap_err();
        match err {
            SourceError::DuplicateColumn { column } => assert_eq!(column, "date"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_unused_columns_are_tolerated() {
        let csv = "ID,DATE  OF OCCURRENCE,PRIMARY DESCRIPTION,ARREST,LATITUDE,LONGITUDE,NOTE,NOTE\n\
                   1,01/02/2023 10:15:00 PM,THEFT,N,41.88,-87.63,a,b\n";
        let dataset = load_incidents_from_reader(
            csv.as_bytes(),
            &DatasetDefinition::chicago().unwrap(),
            &null_progress(),
        )
        .unwrap();
        assert_eq!(dataset.records.len(), 1);
    }

    #[derive(Default)]
    struct RecordingProgress {
        total: Mutex<Option<Option<u64>>>,
        advances: Mutex<Vec<(u64, u64)>>,
        finished: Mutex<Option<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn start(&self, _label: &str, total_bytes: Option<u64>) {
            *self.total.lock().unwrap() = Some(total_bytes);
        }

        fn advance(&self, bytes_read: u64, rows_read: u64) {
            self.advances.lock().unwrap().push((bytes_read, rows_read));
        }

        fn finish(&self, summary: String) {
            *self.finished.lock().unwrap() = Some(summary);
        }
    }

    #[test]
    fn file_load_reports_byte_progress() {
        let dir = std::env::temp_dir()
            .join(format!("crime_viz_loader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("incidents.csv");
        let csv = format!(
            "{HEADER}1,01/02/2023 10:15:00 PM,THEFT,N,41.88,-87.63,X\n\
             2,bad,THEFT,N,41.88,-87.63,X\n"
        );
        std::fs::write(&path, &csv).unwrap();

        let recording = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recording.clone();
        let dataset =
            load_incidents(&path, &DatasetDefinition::chicago().unwrap(), &progress).unwrap();
        assert_eq!(dataset.records.len(), 1);

        assert_eq!(*recording.total.lock().unwrap(), Some(Some(csv.len() as u64)));
        let advances = recording.advances.lock().unwrap();
        let &(bytes, rows) = advances.last().unwrap();
        assert_eq!(rows, 2);
        assert!(bytes > 0 && bytes <= csv.len() as u64);
        assert_eq!(
            recording.finished.lock().unwrap().as_deref(),
            Some("[chicago] loaded 1 incidents")
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn reader_load_has_unknown_total() {
        let recording = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recording.clone();
        let csv = format!("{HEADER}1,01/02/2023 10:15:00 PM,THEFT,N,41.88,-87.63,X\n");
        load_incidents_from_reader(
            csv.as_bytes(),
            &DatasetDefinition::chicago().unwrap(),
            &progress,
        )
        .unwrap();
        assert_eq!(*recording.total.lock().unwrap(), Some(None));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_incidents(
            Path::new("definitely/not/here.csv"),
            &DatasetDefinition::chicago().unwrap(),
            &null_progress(),
        )
        .unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }
}
