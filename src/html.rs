//! Structural accessors over a parsed HTML page.
//!
//! Lookups mirror the shape the scraped pages are read in: tables, their
//! rows, the cells of a row, and the options of a `<select>` control.
//! Absence is reported as `None` or an empty list; callers decide whether
//! that is an upstream format error.

use scraper::{ElementRef, Html};

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(raw: &str) -> Self {
        Self {
            html: Html::parse_document(raw),
        }
    }

    /// All `<table>` elements in document order.
    pub fn tables(&self) -> Vec<Table<'_>> {
        descendants_named(self.html.root_element(), "table")
            .map(Table)
            .collect()
    }

    pub fn first_table(&self) -> Option<Table<'_>> {
        descendants_named(self.html.root_element(), "table")
            .next()
            .map(Table)
    }

    pub fn first_select(&self) -> Option<SelectControl<'_>> {
        descendants_named(self.html.root_element(), "select")
            .next()
            .map(SelectControl)
    }
}

#[derive(Clone, Copy)]
pub struct Table<'a>(ElementRef<'a>);

impl<'a> Table<'a> {
    /// Every `<tr>` under the table, header rows included.
    pub fn rows(&self) -> Vec<Row<'a>> {
        descendants_named(self.0, "tr").map(Row).collect()
    }
}

#[derive(Clone, Copy)]
pub struct Row<'a>(ElementRef<'a>);

impl Row<'_> {
    /// Trimmed text of each `<td>`. Header rows (`<th>` only) yield nothing.
    pub fn cells(&self) -> Vec<String> {
        descendants_named(self.0, "td").map(element_text).collect()
    }
}

#[derive(Clone, Copy)]
pub struct SelectControl<'a>(ElementRef<'a>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Option<String>,
    pub selected: bool,
    pub text: String,
}

impl SelectControl<'_> {
    pub fn options(&self) -> Vec<SelectOption> {
        descendants_named(self.0, "option")
            .map(|el| SelectOption {
                value: el.value().attr("value").map(|v| v.trim().to_string()),
                selected: el.value().attr("selected").is_some(),
                text: element_text(el),
            })
            .collect()
    }
}

fn descendants_named<'a>(
    root: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
