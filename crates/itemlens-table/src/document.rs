// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use crate::TableError;
use crate::schema::{ColumnSet, Record};
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

pub const DEFAULT_OUTPUT_FILE: &str = "interactive_table.html";
pub const DEFAULT_TITLE: &str = "Interactive Table";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    cells: Vec<String>,
}

impl RenderedRow {
    // Cells are aligned with the document's column set, one per column.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn concatenated_text(&self) -> String {
        self.cells.concat()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    columns: ColumnSet,
    rows: Vec<RenderedRow>,
    title: String,
}

impl Document {
    pub fn build(records: &[Record], title: &str) -> Result<Self, TableError> {
        if records.is_empty() {
            return Err(TableError::InvalidInput);
        }

        let columns = ColumnSet::derive(records);
        let rows = records
            .iter()
            .map(|record| RenderedRow {
                cells: columns
                    .names()
                    .iter()
                    .map(|name| {
                        record
                            .get(name)
                            .map(|value| value.display_text())
                            .unwrap_or_default()
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            columns,
            rows,
            title: title.to_owned(),
        })
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[RenderedRow] {
        &self.rows
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn to_html(&self, generated_at: OffsetDateTime) -> String {
        let headers = self
            .columns
            .names()
            .iter()
            .map(|name| {
                format!(
                    "<th data-col=\"{col}\" class=\"sortable\">{col}<span class=\"sort-indicator\"></span></th>",
                    col = escape_html(name),
                )
            })
            .collect::<Vec<_>>()
            .join("\n              ");

        let filters = self
            .columns
            .names()
            .iter()
            .map(|name| {
                format!(
                    "<th><input class=\"col-filter\" data-col=\"{col}\" type=\"text\" placeholder=\"Filter {col}\"/></th>",
                    col = escape_html(name),
                )
            })
            .collect::<Vec<_>>()
            .join("\n              ");

        let body = self
            .rows
            .iter()
            .map(|row| {
                let cells = self
                    .columns
                    .names()
                    .iter()
                    .zip(row.cells())
                    .map(|(name, cell)| {
                        format!(
                            "<td data-col=\"{col}\">{text}</td>",
                            col = escape_html(name),
                            text = escape_cell(cell),
                        )
                    })
                    .collect::<String>();
                format!("<tr>{cells}</tr>")
            })
            .collect::<Vec<_>>()
            .join("\n            ");

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>{title}</title>
<style>{css}</style>
</head>
<body>
  <div class="wrapper">
    <div class="card">
      <div class="header">
        <div class="title">{title} <span id="rowCount" class="badge"></span></div>
        <div class="controls">
          <input id="globalSearch" type="text" placeholder="Global search"/>
          <button id="resetBtn">Reset filters</button>
        </div>
      </div>
      <div class="scroll">
        <table id="dataTable">
          <thead>
            <tr>
              {headers}
            </tr>
            <tr>
              {filters}
            </tr>
          </thead>
          <tbody>
            {body}
          </tbody>
          <tfoot>
            <tr><td colspan="{column_count}">Tip: click a header to sort, type in the filter boxes to filter by column, or use the global search. Generated {generated}.</td></tr>
          </tfoot>
        </table>
      </div>
    </div>
  </div>
<script>{js}</script>
</body>
</html>
"#,
            title = escape_html(&self.title),
            css = PAGE_STYLE,
            js = ENGINE_SCRIPT,
            headers = headers,
            filters = filters,
            body = body,
            column_count = self.columns.len(),
            generated = format_generated_at(generated_at),
        )
    }

    // The artifact is written in one shot; on failure nothing partial is
    // left behind by this call beyond what std::fs::write itself did not
    // complete.
    pub fn write_html(
        &self,
        path: &Path,
        generated_at: OffsetDateTime,
    ) -> Result<PathBuf, TableError> {
        let html = self.to_html(generated_at);
        fs::write(path, html).map_err(|source| TableError::Write {
            path: path.to_owned(),
            source,
        })?;
        Ok(path.to_owned())
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Escape first, then turn real newlines into visual breaks so that record
// content can never be confused with markup structure.
fn escape_cell(text: &str) -> String {
    escape_html(text).replace('\n', "<br/>")
}

fn format_generated_at(generated_at: OffsetDateTime) -> String {
    generated_at
        .date()
        .format(&time::macros::format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| generated_at.date().to_string())
}

const PAGE_STYLE: &str = r##"
  :root {
    --bg: #0b0c10; --card: #16181d; --text: #e6e6e6; --muted: #9aa3ab;
    --accent: #7aa2f7; --border: #2a2f36;
  }
  html, body { margin:0; padding:0; background:var(--bg); color:var(--text);
    font-family: ui-sans-serif, system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial; }
  .wrapper { max-width: 1100px; margin: 32px auto; padding: 0 16px; }
  .card { background: var(--card); border:1px solid var(--border); border-radius:16px; overflow:hidden; }
  .header { display:flex; flex-wrap:wrap; gap:12px; align-items:center; justify-content:space-between;
    padding:16px; border-bottom:1px solid var(--border); }
  .title { font-weight:700; font-size:18px; }
  .controls { display:flex; gap:10px; align-items:center; }
  .scroll { overflow:auto; }
  input[type="text"] { background:#0f1217; color:var(--text); border:1px solid var(--border);
    border-radius:10px; padding:8px 10px; outline:none; }
  input[type="text"]::placeholder { color: var(--muted); }
  button { background:#0f1217; color:var(--text); border:1px solid var(--border);
    border-radius:10px; padding:8px 12px; cursor:pointer; }
  table { width:100%; border-collapse:separate; border-spacing:0; }
  thead th { position:sticky; top:0; background:#13161c; z-index:1; }
  th, td { text-align:left; padding:10px 14px; border-bottom:1px solid var(--border);
    vertical-align:top; font-size:14px; }
  tr:hover td { background: rgba(122,162,247,0.06); }
  th.sortable { user-select:none; cursor:pointer; }
  .sort-indicator { margin-left:8px; opacity:.7; font-size:12px; }
  tfoot td { padding:10px 14px; color:var(--muted); font-size:13px; }
  .badge { background: rgba(122,162,247,0.12); color: var(--accent);
    border:1px solid rgba(122,162,247,0.3); padding:2px 8px; border-radius:999px; font-size:12px; margin-left:8px; }
"##;

// Mirror of the engine module; both sides must keep the same sort, filter,
// and reset semantics.
const ENGINE_SCRIPT: &str = r##"
(function() {
  'use strict';
  var table = document.getElementById('dataTable');
  var tbody = table.querySelector('tbody');
  var headers = Array.prototype.slice.call(table.querySelectorAll('thead th.sortable'));
  var filterInputs = Array.prototype.slice.call(table.querySelectorAll('.col-filter'));
  var globalSearch = document.getElementById('globalSearch');
  var resetButton = document.getElementById('resetBtn');
  var rowCount = document.getElementById('rowCount');

  var originalRows = Array.prototype.slice.call(tbody.querySelectorAll('tr'));
  var rows = originalRows.slice();
  var sortState = { column: null, ascending: true };

  function cellText(row, column) {
    for (var i = 0; i < row.cells.length; i++) {
      if (row.cells[i].getAttribute('data-col') === column) {
        return row.cells[i].textContent;
      }
    }
    return '';
  }

  function tokenize(text) {
    return String(text).match(/\d+|\D+/g) || [];
  }

  function compareDigitRuns(a, b) {
    var ta = a.replace(/^0+(?=\d)/, '');
    var tb = b.replace(/^0+(?=\d)/, '');
    if (ta.length !== tb.length) { return ta.length < tb.length ? -1 : 1; }
    if (ta === tb) { return 0; }
    return ta < tb ? -1 : 1;
  }

  function naturalCompare(a, b) {
    var ta = tokenize(a);
    var tb = tokenize(b);
    var shared = Math.min(ta.length, tb.length);
    for (var i = 0; i < shared; i++) {
      var result;
      if (/^\d/.test(ta[i]) && /^\d/.test(tb[i])) {
        result = compareDigitRuns(ta[i], tb[i]);
      } else if (ta[i] === tb[i]) {
        result = 0;
      } else {
        result = ta[i] < tb[i] ? -1 : 1;
      }
      if (result !== 0) { return result; }
    }
    if (ta.length === tb.length) { return 0; }
    return ta.length < tb.length ? -1 : 1;
  }

  function applySort() {
    if (!sortState.column) { return; }
    var column = sortState.column;
    var sign = sortState.ascending ? 1 : -1;
    rows.sort(function(a, b) {
      return naturalCompare(cellText(a, column), cellText(b, column)) * sign;
    });
  }

  function updateIndicators() {
    headers.forEach(function(header) {
      var indicator = header.querySelector('.sort-indicator');
      if (header.getAttribute('data-col') === sortState.column) {
        indicator.textContent = sortState.ascending ? '↑' : '↓';
      } else {
        indicator.textContent = '';
      }
    });
  }

  function matchesFilters(row) {
    for (var i = 0; i < filterInputs.length; i++) {
      var needle = filterInputs[i].value.toLowerCase();
      if (!needle) { continue; }
      var hay = cellText(row, filterInputs[i].getAttribute('data-col')).toLowerCase();
      if (hay.indexOf(needle) === -1) { return false; }
    }
    var global = globalSearch.value.toLowerCase();
    if (global && row.textContent.toLowerCase().indexOf(global) === -1) { return false; }
    return true;
  }

  function render() {
    applySort();
    updateIndicators();
    tbody.innerHTML = '';
    var visible = 0;
    for (var i = 0; i < rows.length; i++) {
      if (matchesFilters(rows[i])) {
        tbody.appendChild(rows[i]);
        visible++;
      }
    }
    rowCount.textContent = visible + ' / ' + rows.length + ' rows';
  }

  headers.forEach(function(header) {
    header.addEventListener('click', function() {
      var column = header.getAttribute('data-col');
      if (sortState.column === column) {
        sortState.ascending = !sortState.ascending;
      } else {
        sortState = { column: column, ascending: true };
      }
      render();
    });
  });

  filterInputs.forEach(function(input) {
    input.addEventListener('input', render);
  });
  globalSearch.addEventListener('input', render);

  resetButton.addEventListener('click', function() {
    filterInputs.forEach(function(input) { input.value = ''; });
    globalSearch.value = '';
    sortState = { column: null, ascending: true };
    rows = originalRows.slice();
    render();
  });

  render();
})();
"##;

#[cfg(test)]
mod tests {
    use super::{Document, escape_cell, escape_html};
    use crate::TableError;
    use crate::schema::Record;
    use time::OffsetDateTime;

    fn records() -> Vec<Record> {
        vec![
            Record::new()
                .with("ID", "SRS-1")
                .with("Title", "test")
                .with("Description", "test desc\nsecond line"),
            Record::new().with("ID", "SRS-2").with("Labels", "draft"),
        ]
    }

    #[test]
    fn build_rejects_empty_record_list() {
        let error = Document::build(&[], "Empty").expect_err("empty input should fail");
        assert!(matches!(error, TableError::InvalidInput));
    }

    #[test]
    fn build_projects_every_record_onto_the_full_column_set() {
        let document = Document::build(&records(), "Items").expect("build should succeed");

        assert_eq!(
            document.columns().names(),
            ["ID", "Title", "Description", "Labels"]
        );
        for row in document.rows() {
            assert_eq!(row.cells().len(), 4);
        }
        // Missing keys render as empty cells, not errors.
        assert_eq!(document.rows()[1].cell(1), "");
        assert_eq!(document.rows()[1].cell(3), "draft");
    }

    #[test]
    fn to_html_escapes_markup_in_record_content() {
        let records = vec![Record::new().with("ID", "<script>alert('x')</script>")];
        let document = Document::build(&records, "Escaping").expect("build should succeed");
        let html = document.to_html(OffsetDateTime::UNIX_EPOCH);

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn to_html_renders_embedded_newlines_as_visual_breaks() {
        let document = Document::build(&records(), "Items").expect("build should succeed");
        let html = document.to_html(OffsetDateTime::UNIX_EPOCH);

        assert!(html.contains("test desc<br/>second line"));
    }

    #[test]
    fn to_html_emits_headers_filters_counter_and_tagged_cells() {
        let document = Document::build(&records(), "SRS Items").expect("build should succeed");
        let html = document.to_html(OffsetDateTime::UNIX_EPOCH);

        assert!(html.contains("<title>SRS Items</title>"));
        assert!(html.contains(r#"<th data-col="ID" class="sortable">ID"#));
        assert!(html.contains(r#"<input class="col-filter" data-col="Labels""#));
        assert!(html.contains(r#"<td data-col="Description">"#));
        assert!(html.contains(r#"<span id="rowCount" class="badge">"#));
        assert!(html.contains("Generated 1970-01-01."));
        // Self-contained: no external resource references.
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn to_html_is_deterministic_for_identical_input() {
        let document = Document::build(&records(), "Items").expect("build should succeed");
        let first = document.to_html(OffsetDateTime::UNIX_EPOCH);
        let second = document.to_html(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(first, second);
    }

    #[test]
    fn write_html_writes_the_artifact_and_returns_its_path() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("items.html");

        let document = Document::build(&records(), "Items").expect("build should succeed");
        let written = document
            .write_html(&path, OffsetDateTime::UNIX_EPOCH)
            .expect("write should succeed");

        assert_eq!(written, path);
        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with("<!DOCTYPE html>"));
        Ok(())
    }

    #[test]
    fn write_html_surfaces_io_failures_with_the_target_path() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("no-such-dir").join("items.html");

        let document = Document::build(&records(), "Items").expect("build should succeed");
        let error = document
            .write_html(&path, OffsetDateTime::UNIX_EPOCH)
            .expect_err("write into missing directory should fail");

        assert!(matches!(error, TableError::Write { .. }));
        assert!(error.to_string().contains("items.html"));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn escape_helpers_cover_attribute_and_cell_contexts() {
        assert_eq!(escape_html(r#"a"b&c"#), "a&quot;b&amp;c");
        assert_eq!(escape_cell("a\nb"), "a<br/>b");
        assert_eq!(escape_cell("<b>\n</b>"), "&lt;b&gt;<br/>&lt;/b&gt;");
    }
}
