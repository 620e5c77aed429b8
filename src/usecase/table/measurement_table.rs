use std::path::Path;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::entities::edit::{EditState, PendingDelete};
use crate::domain::entities::measurement::{
    zeroed_values, MeasurementColumn, MeasurementKind, MeasurementRow, MeasurementValues,
};
use crate::domain::entities::table::SortState;
use crate::domain::format::parse_float_lenient;
use crate::domain::schema::{ColumnMapping, RowSchema};
use crate::infra::export::{write_table, ExportCell, ExportTable};
use crate::infra::import::RawSheet;
use crate::usecase::services::import_service::{ImportError, ImportReport, ImportService};
use crate::usecase::table::compare_text;

/// Receives row mutations from a measurement table. The page owning the
/// collection implements it.
pub trait RowSink {
    fn add(&mut self, values: MeasurementValues);
    fn update(&mut self, id: &str, values: MeasurementValues);
    fn delete(&mut self, id: &str);
    fn import(&mut self, rows: Vec<MeasurementValues>);
}

/// Rows of one parent entity. Every mutation swaps in a new collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowCollection {
    parent_id: Option<String>,
    rows: Vec<MeasurementRow>,
    next_seq: u64,
}

impl RowCollection {
    pub fn new(parent_id: Option<String>, rows: Vec<MeasurementRow>) -> Self {
        Self {
            parent_id,
            rows,
            next_seq: 0,
        }
    }

    pub fn rows(&self) -> &[MeasurementRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn new_row(&self, id: String, values: MeasurementValues) -> MeasurementRow {
        MeasurementRow {
            id,
            created_at: Utc::now(),
            parent_id: self.parent_id.clone(),
            values,
        }
    }
}

impl RowSink for RowCollection {
    fn add(&mut self, values: MeasurementValues) {
        self.next_seq += 1;
        let id = format!("row-{}-{}", Utc::now().timestamp_millis(), self.next_seq);
        let mut rows = self.rows.clone();
        rows.push(self.new_row(id, values));
        self.rows = rows;
    }

    fn update(&mut self, id: &str, values: MeasurementValues) {
        self.rows = self
            .rows
            .iter()
            .map(|row| {
                if row.id == id {
                    MeasurementRow {
                        values: values.clone(),
                        ..row.clone()
                    }
                } else {
                    row.clone()
                }
            })
            .collect();
    }

    fn delete(&mut self, id: &str) {
        self.rows = self.rows.iter().filter(|row| row.id != id).cloned().collect();
    }

    fn import(&mut self, rows: Vec<MeasurementValues>) {
        let millis = Utc::now().timestamp_millis();
        let imported: Vec<MeasurementRow> = rows
            .into_iter()
            .enumerate()
            .map(|(index, values)| self.new_row(format!("imported-{millis}-{index}"), values))
            .collect();
        self.rows = self.rows.iter().cloned().chain(imported).collect();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to export rows: {0}")]
    Write(String),
}

/// Transient interaction state of one measurement table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementState {
    pub sort: SortState,
    pub edit: EditState,
    pub pending_delete: PendingDelete,
    /// `Some` while the add dialog is open.
    pub add_form: Option<MeasurementValues>,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub importing: bool,
}

pub struct MeasurementTable {
    pub kind: MeasurementKind,
    pub title: String,
    pub description: String,
    pub columns: Vec<MeasurementColumn>,
    pub schema: RowSchema,
    pub mapping: ColumnMapping,
    pub export_filename: String,
    pub sheet_name: String,
}

impl MeasurementTable {
    pub fn for_kind(kind: MeasurementKind) -> Self {
        Self {
            kind,
            title: kind.sheet_name().to_string(),
            description: kind.description().to_string(),
            columns: kind.columns(),
            schema: kind.schema(),
            mapping: kind.column_mapping(),
            export_filename: kind.export_filename().to_string(),
            sheet_name: kind.sheet_name().to_string(),
        }
    }

    fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|column| column.key == key)
    }

    fn is_sort_key(&self, key: &str) -> bool {
        matches!(key, "id" | "createdAt") || self.has_column(key)
    }

    pub fn toggle_sort(&self, state: &mut MeasurementState, key: &str) -> bool {
        if !self.is_sort_key(key) {
            return false;
        }
        state.sort.toggle(key);
        true
    }

    pub fn sorted_rows<'a>(
        &self,
        rows: &'a [MeasurementRow],
        state: &MeasurementState,
    ) -> Vec<&'a MeasurementRow> {
        let mut sorted: Vec<&MeasurementRow> = rows.iter().collect();
        let Some(spec) = state.sort.active() else {
            return sorted;
        };
        sorted.sort_by(|left, right| {
            let ordering = match spec.key.as_str() {
                "id" => compare_text(&left.id, &right.id),
                "createdAt" => left.created_at.cmp(&right.created_at),
                key => left.value(key).total_cmp(&right.value(key)),
            };
            spec.direction.apply(ordering)
        });
        sorted
    }

    /// Starts editing `row`. Any other edit in progress is discarded.
    pub fn begin_edit(&self, state: &mut MeasurementState, row: &MeasurementRow) {
        if let Some(previous) = state.edit.row_id().filter(|id| *id != row.id) {
            debug!(abandoned = previous, next = %row.id, "edit abandoned without saving");
        }
        let buffer = self
            .columns
            .iter()
            .map(|column| (column.key.clone(), row.value(&column.key)))
            .collect();
        state.edit = EditState::Editing {
            row_id: row.id.clone(),
            buffer,
        };
    }

    pub fn set_edit_value(&self, state: &mut MeasurementState, key: &str, text: &str) -> bool {
        if !self.has_column(key) {
            return false;
        }
        match &mut state.edit {
            EditState::Editing { buffer, .. } => {
                buffer.insert(key.to_string(), parse_float_lenient(text));
                true
            }
            EditState::Idle => false,
        }
    }

    pub fn save_edit(&self, state: &mut MeasurementState, sink: &mut dyn RowSink) -> bool {
        match state.edit.take() {
            Some((row_id, buffer)) => {
                sink.update(&row_id, buffer);
                info!(kind = self.kind.as_str(), row_id = %row_id, "measurement row updated");
                true
            }
            None => false,
        }
    }

    /// The rows `save_edit` would produce. `state` keeps its buffer until
    /// the caller knows the save went through.
    pub fn staged_edit(
        &self,
        state: &MeasurementState,
        rows: &RowCollection,
    ) -> Option<RowCollection> {
        let mut scratch = state.clone();
        let mut next = rows.clone();
        self.save_edit(&mut scratch, &mut next).then_some(next)
    }

    pub fn cancel_edit(&self, state: &mut MeasurementState) -> bool {
        state.edit.take().is_some()
    }

    pub fn open_add(&self, state: &mut MeasurementState) {
        state.add_form = Some(zeroed_values(&self.columns));
    }

    pub fn set_add_value(&self, state: &mut MeasurementState, key: &str, text: &str) -> bool {
        match state.add_form.as_mut() {
            Some(values) if self.has_column(key) => {
                values.insert(key.to_string(), parse_float_lenient(text));
                true
            }
            _ => false,
        }
    }

    pub fn close_add(&self, state: &mut MeasurementState) {
        state.add_form = None;
    }

    /// Hands the entered values to `sink`, then closes the dialog. Reopening
    /// starts from zeros again.
    pub fn submit_add(&self, state: &mut MeasurementState, sink: &mut dyn RowSink) -> bool {
        let Some(values) = state.add_form.take() else {
            return false;
        };
        sink.add(values);
        info!(kind = self.kind.as_str(), "measurement row added");
        true
    }

    /// The rows `submit_add` would produce, with the dialog left open.
    pub fn staged_add(
        &self,
        state: &MeasurementState,
        rows: &RowCollection,
    ) -> Option<RowCollection> {
        let mut scratch = state.clone();
        let mut next = rows.clone();
        self.submit_add(&mut scratch, &mut next).then_some(next)
    }

    pub fn request_delete(&self, state: &mut MeasurementState, id: &str) {
        state.pending_delete.stage(id);
    }

    pub fn confirm_delete(&self, state: &mut MeasurementState, sink: &mut dyn RowSink) -> bool {
        let kind = self.kind.as_str();
        state.pending_delete.confirm(|id| {
            sink.delete(id);
            info!(kind, row_id = id, "measurement row deleted");
        })
    }

    pub fn dismiss_delete(&self, state: &mut MeasurementState) -> bool {
        state.pending_delete.dismiss()
    }

    pub fn begin_import(&self, state: &mut MeasurementState) {
        state.importing = true;
    }

    /// Shows `notice` once the imported rows are in place.
    pub fn complete_import(&self, state: &mut MeasurementState, notice: String) {
        state.importing = false;
        state.notice = Some(notice);
        state.error = None;
    }

    /// Clears any import notice and shows `reason` instead.
    pub fn reject_import(&self, state: &mut MeasurementState, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(kind = self.kind.as_str(), error = %reason, "import rejected");
        state.importing = false;
        state.notice = None;
        state.error = Some(reason);
    }

    fn finish_import(
        &self,
        state: &mut MeasurementState,
        result: Result<ImportReport<MeasurementValues>, ImportError>,
        sink: &mut dyn RowSink,
    ) -> Result<usize, ImportError> {
        match result {
            Ok(report) => {
                let imported = report.rows.len();
                self.complete_import(state, report.summary());
                sink.import(report.rows);
                Ok(imported)
            }
            Err(err) => {
                self.reject_import(state, err.to_string());
                Err(err)
            }
        }
    }

    /// Validates every row of `sheet` and hands the valid ones to `sink` in
    /// one batch. Nothing reaches the sink when no row is valid.
    pub fn import_sheet(
        &self,
        state: &mut MeasurementState,
        sheet: &RawSheet,
        service: &ImportService,
        sink: &mut dyn RowSink,
    ) -> Result<usize, ImportError> {
        let result = service.map_measurements(sheet, &self.schema, &self.mapping);
        self.finish_import(state, result, sink)
    }

    pub fn import_file(
        &self,
        state: &mut MeasurementState,
        path: &Path,
        service: &ImportService,
        sink: &mut dyn RowSink,
    ) -> Result<usize, ImportError> {
        self.begin_import(state);
        let result = service.import_measurements(path, &self.schema, &self.mapping);
        self.finish_import(state, result, sink)
    }

    /// `ID`, one column per field, then `Created At`, in display order.
    pub fn export_table(&self, rows: &[&MeasurementRow]) -> ExportTable {
        let mut headers = vec!["ID".to_string()];
        headers.extend(self.columns.iter().map(|column| column.header().to_string()));
        headers.push("Created At".to_string());

        let mut column_widths = vec![28.0];
        column_widths.extend(self.columns.iter().map(|_| 12.0));
        column_widths.push(28.0);

        let rows = rows
            .iter()
            .map(|row| {
                let mut cells = vec![ExportCell::Text(row.id.clone())];
                cells.extend(
                    self.columns
                        .iter()
                        .map(|column| ExportCell::Number(row.value(&column.key))),
                );
                cells.push(ExportCell::Text(row.created_at.to_rfc3339()));
                cells
            })
            .collect();

        ExportTable {
            sheet_name: self.sheet_name.clone(),
            headers,
            column_widths,
            rows,
        }
    }

    pub fn export_file(
        &self,
        rows: &[MeasurementRow],
        state: &MeasurementState,
        dest: &Path,
    ) -> Result<usize, ExportError> {
        let sorted = self.sorted_rows(rows, state);
        let table = self.export_table(&sorted);
        write_table(dest, &table).map_err(|err| ExportError::Write(format!("{err:#}")))?;
        info!(
            kind = self.kind.as_str(),
            path = %dest.display(),
            rows = sorted.len(),
            "measurement rows exported"
        );
        Ok(sorted.len())
    }

    pub fn summary(&self, rows: &[MeasurementRow]) -> String {
        match rows.len() {
            1 => "1 row".to_string(),
            count => format!("{count} rows"),
        }
    }
}
