use serde::{Deserialize, Serialize};

use crate::reports::{Row, SortDirection, SortSpec, search, sort_rows};

/// Grid state: search text plus the active sort, if any.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableView {
    pub query: String,
    pub sort: Option<SortSpec>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TableAction {
    Search(String),
    ToggleSort(String),
    ClearSort,
}

impl TableView {
    #[must_use]
    pub fn reduce(self, action: TableAction) -> Self {
        match action {
            TableAction::Search(query) => Self { query, ..self },
            TableAction::ToggleSort(column) => {
                let direction = match &self.sort {
                    Some(current) if current.column == column => current.direction.toggled(),
                    _ => SortDirection::Asc,
                };
                Self { sort: Some(SortSpec { column, direction }), ..self }
            }
            TableAction::ClearSort => Self { sort: None, ..self },
        }
    }

    /// Rows that pass the search, in sort order.
    #[must_use]
    pub fn apply<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<&'a Row> {
        let mut visible = search(rows, &self.query);
        if let Some(spec) = &self.sort {
            sort_rows(&mut visible, spec);
        }
        visible
    }
}
