//! Users table widget
//!
//! Paginated table over the full merged user dataset. The page hands it a
//! complete fresh dataset on every refresh (clear-and-reload); the widget
//! owns pagination and per-column sort suppression.

use super::html::escape_html;
use crate::model::User;
use serde::Serialize;

/// One rendered row of the users table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub favorite: bool,
}

impl UserRow {
    /// Flatten a merged user into a row
    pub fn from_user(user: User, favorite: bool) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            city: user.address.city,
            favorite,
        }
    }
}

/// What a column displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Favorite,
    Name,
    Email,
    Phone,
    City,
    Actions,
}

/// Column definition: header, accessor and sortability
#[derive(Debug, Clone)]
pub struct Column {
    pub title: &'static str,
    pub field: ColumnField,
    pub orderable: bool,
}

impl Column {
    const fn new(title: &'static str, field: ColumnField, orderable: bool) -> Self {
        Self {
            title,
            field,
            orderable,
        }
    }

    /// Plain-text cell value
    pub fn text(&self, row: &UserRow) -> String {
        match self.field {
            ColumnField::Favorite => {
                let star = if row.favorite { "★" } else { "☆" };
                star.to_string()
            }
            ColumnField::Name => row.name.clone(),
            ColumnField::Email => row.email.clone(),
            ColumnField::Phone => row.phone.clone(),
            ColumnField::City => row.city.clone(),
            ColumnField::Actions => String::new(),
        }
    }

    /// Cell markup; text content is escaped
    pub fn render(&self, row: &UserRow) -> String {
        match self.field {
            ColumnField::Favorite => format!(
                r##"<a href="#" class="fav-toggle" data-id="{}" title="Toggle favorite"><i class="{} fa-star"></i></a>"##,
                row.id,
                if row.favorite { "fa-solid" } else { "fa-regular" }
            ),
            ColumnField::Actions => format!(
                r#"<button class="btn btn-small btn-edit" data-id="{id}" title="Edit"><i class="fa fa-pen"></i></button><button class="btn btn-small btn-delete" data-id="{id}" title="Delete"><i class="fa fa-trash"></i></button>"#,
                id = row.id
            ),
            _ => escape_html(&self.text(row)),
        }
    }
}

/// Default users table layout
pub fn user_columns() -> Vec<Column> {
    vec![
        Column::new("", ColumnField::Favorite, false),
        Column::new("Name", ColumnField::Name, true),
        Column::new("Email", ColumnField::Email, true),
        Column::new("Phone", ColumnField::Phone, true),
        Column::new("City", ColumnField::City, true),
        Column::new("Actions", ColumnField::Actions, false),
    ]
}

/// Tabular widget collaborator
pub trait TableWidget: Send {
    /// Replace the whole dataset and redraw from the first page
    fn load(&mut self, rows: Vec<UserRow>);

    /// Full current dataset in display order
    fn rows(&self) -> &[UserRow];

    /// Mutable access to a row, for in-place redraws
    fn row_mut(&mut self, id: i64) -> Option<&mut UserRow>;

    fn columns(&self) -> &[Column];

    /// Rows of the zero-based page `index`
    fn page(&self, index: usize) -> &[UserRow];

    fn page_count(&self) -> usize;

    /// Sort by a column; returns false when the column is not orderable
    fn sort(&mut self, column: usize, ascending: bool) -> bool;
}

/// In-process table widget
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: Vec<UserRow>,
    page_length: usize,
    draws: usize,
}

impl DataTable {
    pub fn new(columns: Vec<Column>, page_length: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            page_length: page_length.max(1),
            draws: 0,
        }
    }

    /// Users table with the default columns
    pub fn users(page_length: usize) -> Self {
        Self::new(user_columns(), page_length)
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    /// Number of times the dataset has been (re)loaded
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Markup for the rows of one page
    pub fn render_page(&self, index: usize) -> String {
        render_rows(&self.columns, self.page(index))
    }
}

/// `<tr>` markup for `rows`, one cell per column
pub fn render_rows(columns: &[Column], rows: &[UserRow]) -> String {
    let mut html = String::new();
    for row in rows {
        html.push_str("<tr>");
        for column in columns {
            html.push_str("<td>");
            html.push_str(&column.render(row));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html
}

/// Full table markup: header row plus the given rows
pub fn render_table(columns: &[Column], rows: &[UserRow]) -> String {
    let header: String = columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape_html(c.title)))
        .collect();
    format!(
        "<table class=\"users-table\">\n<thead><tr>{}</tr></thead>\n<tbody>\n{}</tbody>\n</table>\n",
        header,
        render_rows(columns, rows)
    )
}

impl TableWidget for DataTable {
    fn load(&mut self, rows: Vec<UserRow>) {
        self.rows = rows;
        self.draws += 1;
        tracing::debug!(rows = self.rows.len(), "Users table reloaded");
    }

    fn rows(&self) -> &[UserRow] {
        &self.rows
    }

    fn row_mut(&mut self, id: i64) -> Option<&mut UserRow> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn page(&self, index: usize) -> &[UserRow] {
        let start = index.saturating_mul(self.page_length);
        if start >= self.rows.len() {
            return &[];
        }
        let end = (start + self.page_length).min(self.rows.len());
        &self.rows[start..end]
    }

    fn page_count(&self) -> usize {
        (self.rows.len() + self.page_length - 1) / self.page_length
    }

    fn sort(&mut self, column: usize, ascending: bool) -> bool {
        let Some(col) = self.columns.get(column).cloned() else {
            return false;
        };
        if !col.orderable {
            return false;
        }

        self.rows.sort_by(|a, b| {
            let ord = col.text(a).to_lowercase().cmp(&col.text(b).to_lowercase());
            let ord = if ascending { ord } else { ord.reverse() };
            ord.then_with(|| a.id.cmp(&b.id))
        });
        true
    }
}
