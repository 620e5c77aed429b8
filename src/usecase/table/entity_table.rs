use tracing::debug;

use crate::domain::entities::record::Record;
use crate::domain::entities::table::{CellValue, SortDirection, SortState};
use crate::domain::entities::edit::PendingDelete;
use crate::usecase::table::{compare_text, SKELETON_ROWS};

type Render<T> = Box<dyn Fn(&T) -> CellValue>;
type Extract<T> = Box<dyn Fn(&T) -> String>;

pub struct ColumnDescriptor<T> {
    pub key: String,
    pub header: String,
    render: Option<Render<T>>,
    search_text: Option<Extract<T>>,
    pub sortable: bool,
    pub searchable: bool,
}

impl<T: Record> ColumnDescriptor<T> {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            render: None,
            search_text: None,
            sortable: false,
            searchable: true,
        }
    }

    pub fn render(mut self, render: impl Fn(&T) -> CellValue + 'static) -> Self {
        self.render = Some(Box::new(render));
        self
    }

    pub fn search_text(mut self, extract: impl Fn(&T) -> String + 'static) -> Self {
        self.search_text = Some(Box::new(extract));
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn not_searchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    pub fn cell(&self, row: &T) -> CellValue {
        match &self.render {
            Some(render) => render(row),
            None => row.field(&self.key).map(CellValue::from).unwrap_or(CellValue::Empty),
        }
    }

    /// Text used for search and sort: the extractor, else the rendered value
    /// when it is primitive, else the raw field.
    pub fn text(&self, row: &T) -> String {
        if let Some(extract) = &self.search_text {
            return extract(row);
        }
        if let Some(text) = self.render.as_ref().and_then(|render| render(row).primitive_text()) {
            return text;
        }
        row.field(&self.key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }
}

/// Label and renderer for the condensed card layout.
pub struct MobileField<T> {
    pub label: String,
    render: Render<T>,
}

impl<T> MobileField<T> {
    pub fn value(&self, row: &T) -> CellValue {
        (self.render)(row)
    }
}

/// Transient interaction state of one entity table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub search: String,
    pub sort: SortState,
    pub pending_delete: PendingDelete,
    pub loading: bool,
}

impl TableState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub cells: Vec<CellValue>,
    pub card: Vec<(String, CellValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    Loading {
        headers: Vec<String>,
        card_labels: Vec<String>,
        skeleton_rows: usize,
    },
    Empty {
        message: String,
    },
    Rows {
        headers: Vec<HeaderView>,
        rows: Vec<RowView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub id: String,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Configuration for listing any record type: columns, card layout, and
/// the wording used in empty and delete states.
pub struct EntityTable<T> {
    columns: Vec<ColumnDescriptor<T>>,
    mobile_fields: Vec<MobileField<T>>,
    entity_name: Extract<T>,
    entity_type: String,
    empty_message: String,
    search_placeholder: String,
}

impl<T: Record> EntityTable<T> {
    pub fn new(
        entity_type: impl Into<String>,
        entity_name: impl Fn(&T) -> String + 'static,
    ) -> Self {
        let entity_type = entity_type.into();
        Self {
            columns: Vec::new(),
            mobile_fields: Vec::new(),
            entity_name: Box::new(entity_name),
            empty_message: format!("No {entity_type}s found."),
            search_placeholder: "Search...".to_string(),
            entity_type,
        }
    }

    pub fn column(mut self, column: ColumnDescriptor<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn mobile_field(
        mut self,
        label: impl Into<String>,
        render: impl Fn(&T) -> CellValue + 'static,
    ) -> Self {
        self.mobile_fields.push(MobileField {
            label: label.into(),
            render: Box::new(render),
        });
        self
    }

    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn placeholder(&self) -> &str {
        &self.search_placeholder
    }

    pub fn name_of(&self, row: &T) -> String {
        (self.entity_name)(row)
    }

    fn column_by_key(&self, key: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|column| column.key == key)
    }

    /// Rows matching `term` in input order. An empty term matches everything.
    pub fn filter<'a>(&self, data: &'a [T], term: &str) -> Vec<&'a T> {
        if term.is_empty() {
            return data.iter().collect();
        }
        let needle = term.to_lowercase();
        data.iter()
            .filter(|row| {
                self.columns
                    .iter()
                    .filter(|column| column.searchable)
                    .any(|column| column.text(row).to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Stable sort of already-filtered rows by the active sort column.
    pub fn sort_rows(&self, rows: &mut [&T], sort: &SortState) {
        let Some(spec) = sort.active() else {
            return;
        };
        let Some(column) = self.column_by_key(&spec.key) else {
            return;
        };
        rows.sort_by(|left, right| {
            spec.direction
                .apply(compare_text(&column.text(left), &column.text(right)))
        });
    }

    pub fn rows<'a>(&self, data: &'a [T], state: &TableState) -> Vec<&'a T> {
        let mut rows = self.filter(data, &state.search);
        self.sort_rows(&mut rows, &state.sort);
        rows
    }

    pub fn set_search(&self, state: &mut TableState, term: impl Into<String>) -> bool {
        if state.loading {
            return false;
        }
        state.search = term.into();
        true
    }

    pub fn toggle_sort(&self, state: &mut TableState, key: &str) -> bool {
        if state.loading || !self.column_by_key(key).is_some_and(|column| column.sortable) {
            return false;
        }
        state.sort.toggle(key);
        debug!(table = %self.entity_type, key, sort = ?state.sort.active(), "sort toggled");
        true
    }

    pub fn request_delete(&self, state: &mut TableState, id: &str) -> bool {
        if state.loading {
            return false;
        }
        state.pending_delete.stage(id);
        true
    }

    /// Hands the staged id to `on_delete`; returns whether it was called.
    pub fn confirm_delete(&self, state: &mut TableState, on_delete: impl FnOnce(&str)) -> bool {
        if state.loading {
            return false;
        }
        state.pending_delete.confirm(on_delete)
    }

    pub fn dismiss_delete(&self, state: &mut TableState) -> bool {
        if state.loading {
            return false;
        }
        state.pending_delete.dismiss()
    }

    pub fn delete_prompt(&self, state: &TableState) -> Option<DeletePrompt> {
        let id = state.pending_delete.id()?;
        Some(DeletePrompt {
            id: id.to_string(),
            title: "Are you sure?".to_string(),
            message: format!(
                "This action cannot be undone. This will permanently delete the {} and remove its data from the system.",
                self.entity_type
            ),
            confirm_label: format!("Delete {}", capitalize(&self.entity_type)),
        })
    }

    pub fn view(&self, data: &[T], state: &TableState) -> TableView {
        if state.loading {
            return TableView::Loading {
                headers: self.columns.iter().map(|column| column.header.clone()).collect(),
                card_labels: self.mobile_fields.iter().map(|field| field.label.clone()).collect(),
                skeleton_rows: SKELETON_ROWS,
            };
        }

        let rows = self.rows(data, state);
        if rows.is_empty() {
            return TableView::Empty {
                message: self.empty_message.clone(),
            };
        }

        let headers = self
            .columns
            .iter()
            .map(|column| HeaderView {
                key: column.key.clone(),
                label: column.header.clone(),
                sortable: column.sortable,
                direction: state.sort.direction_for(&column.key),
            })
            .collect();
        let rows = rows
            .into_iter()
            .map(|row| RowView {
                id: row.id().to_string(),
                name: self.name_of(row),
                cells: self.columns.iter().map(|column| column.cell(row)).collect(),
                card: self
                    .mobile_fields
                    .iter()
                    .map(|field| (field.label.clone(), field.value(row)))
                    .collect(),
            })
            .collect();
        TableView::Rows { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::FieldValue;
    use crate::domain::entities::table::BadgeTone;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: String,
        name: String,
        age: f64,
        active: bool,
    }

    impl Record for Person {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "id" => Some(FieldValue::Text(self.id.clone())),
                "name" => Some(FieldValue::Text(self.name.clone())),
                "age" => Some(FieldValue::Number(self.age)),
                _ => None,
            }
        }
    }

    fn person(id: &str, name: &str, age: f64, active: bool) -> Person {
        Person {
            id: id.to_string(),
            name: name.to_string(),
            age,
            active,
        }
    }

    fn people() -> Vec<Person> {
        vec![
            person("1", "Alice", 34.0, true),
            person("2", "Bob", 9.0, false),
            person("3", "carol", 120.0, true),
        ]
    }

    fn table() -> EntityTable<Person> {
        EntityTable::new("person", |p: &Person| p.name.clone())
            .column(ColumnDescriptor::new("name", "Name").sortable())
            .column(ColumnDescriptor::new("age", "Age").sortable())
            .column(
                ColumnDescriptor::new("status", "Status")
                    .render(|p: &Person| {
                        if p.active {
                            CellValue::badge("Active", BadgeTone::Positive)
                        } else {
                            CellValue::badge("Inactive", BadgeTone::Neutral)
                        }
                    })
                    .search_text(|p: &Person| {
                        if p.active { "active" } else { "inactive" }.to_string()
                    }),
            )
            .mobile_field("Age", |p: &Person| CellValue::Number(p.age))
    }

    fn ids(rows: &[&Person]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone()).collect()
    }

    #[test]
    fn search_matches_any_searchable_column() {
        let data = people();
        let table = table();

        assert_eq!(ids(&table.filter(&data, "ALI")), vec!["1"]);
        assert_eq!(ids(&table.filter(&data, "inactive")), vec!["2"]);
        assert_eq!(ids(&table.filter(&data, "")), vec!["1", "2", "3"]);
        assert!(table.filter(&data, "zzz").is_empty());
    }

    #[test]
    fn unknown_column_key_renders_empty() {
        let data = people();
        let column = ColumnDescriptor::<Person>::new("missing", "Missing");
        assert_eq!(column.cell(&data[0]), CellValue::Empty);
        assert_eq!(column.text(&data[0]), "");
    }

    #[test]
    fn numeric_sort_and_tri_state_cycle() {
        let data = people();
        let table = table();
        let mut state = TableState::default();

        assert!(table.toggle_sort(&mut state, "age"));
        assert_eq!(ids(&table.rows(&data, &state)), vec!["2", "1", "3"]);

        assert!(table.toggle_sort(&mut state, "age"));
        assert_eq!(ids(&table.rows(&data, &state)), vec!["3", "1", "2"]);

        assert!(table.toggle_sort(&mut state, "age"));
        assert_eq!(state.sort.active(), None);
        assert_eq!(ids(&table.rows(&data, &state)), vec!["1", "2", "3"]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let data = people();
        let table = table();
        let mut state = TableState::default();

        table.toggle_sort(&mut state, "name");
        table.toggle_sort(&mut state, "name");
        assert_eq!(ids(&table.rows(&data, &state)), vec!["3", "2", "1"]);
    }

    #[test]
    fn unsortable_column_is_ignored() {
        let table = table();
        let mut state = TableState::default();
        assert!(!table.toggle_sort(&mut state, "status"));
        assert_eq!(state.sort.active(), None);
    }

    #[test]
    fn delete_needs_confirmation() {
        let table = table();
        let mut state = TableState::default();
        let mut deleted = Vec::new();

        assert!(table.request_delete(&mut state, "2"));
        assert!(deleted.is_empty());
        let prompt = table.delete_prompt(&state).expect("prompt should be shown");
        assert_eq!(prompt.confirm_label, "Delete Person");
        assert!(prompt.message.contains("permanently delete the person"));

        assert!(table.confirm_delete(&mut state, |id| deleted.push(id.to_string())));
        assert!(!table.confirm_delete(&mut state, |id| deleted.push(id.to_string())));
        assert_eq!(deleted, vec!["2"]);
        assert!(table.delete_prompt(&state).is_none());
    }

    #[test]
    fn dismiss_clears_without_deleting() {
        let table = table();
        let mut state = TableState::default();

        table.request_delete(&mut state, "1");
        assert!(table.dismiss_delete(&mut state));
        assert!(!table.confirm_delete(&mut state, |_| panic!("must not delete")));
    }

    #[test]
    fn loading_renders_skeleton_and_blocks_interaction() {
        let data = people();
        let table = table();
        let mut state = TableState::loading();

        assert!(!table.set_search(&mut state, "bob"));
        assert!(!table.toggle_sort(&mut state, "name"));
        assert!(!table.request_delete(&mut state, "1"));
        assert_eq!(
            table.view(&data, &state),
            TableView::Loading {
                headers: vec!["Name".to_string(), "Age".to_string(), "Status".to_string()],
                card_labels: vec!["Age".to_string()],
                skeleton_rows: SKELETON_ROWS,
            }
        );
    }

    #[test]
    fn view_carries_sort_indicator_and_cards() {
        let data = people();
        let table = table();
        let mut state = TableState::default();
        table.toggle_sort(&mut state, "name");
        table.set_search(&mut state, "o");

        let TableView::Rows { headers, rows } = table.view(&data, &state) else {
            panic!("expected rows");
        };
        assert_eq!(headers[0].direction, Some(SortDirection::Asc));
        assert_eq!(headers[1].direction, None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Bob");
        assert_eq!(rows[0].card, vec![("Age".to_string(), CellValue::Number(9.0))]);
    }

    #[test]
    fn no_matches_shows_empty_message() {
        let data = people();
        let table = table().empty_message("Nobody here.");
        let mut state = TableState::default();
        table.set_search(&mut state, "nomatch");
        assert_eq!(
            table.view(&data, &state),
            TableView::Empty {
                message: "Nobody here.".to_string()
            }
        );
    }
}
