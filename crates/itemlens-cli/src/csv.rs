// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use itemlens_table::Document;
use std::fs;
use std::path::{Path, PathBuf};

const SEPARATOR: char = ';';

// The CSV companion sits next to the HTML artifact: output.html -> output.html.csv.
pub fn sibling_csv_path(html_path: &Path) -> PathBuf {
    let mut name = html_path.as_os_str().to_owned();
    name.push(".csv");
    PathBuf::from(name)
}

pub fn write_csv(document: &Document, path: &Path) -> Result<PathBuf> {
    let mut out = String::new();
    push_line(
        &mut out,
        document.columns().names().iter().map(String::as_str),
    );
    for row in document.rows() {
        push_line(&mut out, row.cells().iter().map(String::as_str));
    }

    fs::write(path, out).with_context(|| format!("write CSV {}", path.display()))?;
    Ok(path.to_owned())
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line = cells.map(quote_cell).collect::<Vec<_>>().join(&SEPARATOR.to_string());
    out.push_str(&line);
    out.push('\n');
}

// Multi-line values collapse to one physical line; the HTML artifact keeps
// the real breaks. Cells carrying the separator, quotes, or edge whitespace
// are quoted.
fn quote_cell(cell: &str) -> String {
    let flat = cell.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if flat.contains(SEPARATOR) || flat.contains('"') || flat.trim() != flat {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::{quote_cell, sibling_csv_path, write_csv};
    use anyhow::Result;
    use itemlens_table::{Document, Record};
    use std::path::{Path, PathBuf};

    fn document() -> Document {
        let records = vec![
            Record::new()
                .with("ID", "SRS-1")
                .with("Title", "Login; with separator")
                .with("Description", "line one\nline two"),
            Record::new().with("ID", "SRS-2").with("Labels", "draft"),
        ];
        Document::build(&records, "Items").expect("build should succeed")
    }

    #[test]
    fn sibling_path_appends_csv_suffix() {
        assert_eq!(
            sibling_csv_path(Path::new("/tmp/output.html")),
            PathBuf::from("/tmp/output.html.csv")
        );
    }

    #[test]
    fn write_csv_emits_header_and_one_line_per_record() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("items.csv");

        write_csv(&document(), &path)?;
        let contents = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID;Title;Description;Labels");
        assert_eq!(lines[1], "SRS-1;\"Login; with separator\";line one line two;");
        assert_eq!(lines[2], "SRS-2;;;draft");
        Ok(())
    }

    #[test]
    fn quote_cell_flattens_newlines_and_escapes_quotes() {
        assert_eq!(quote_cell("a\nb"), "a b");
        assert_eq!(quote_cell("a\r\nb"), "a b");
        assert_eq!(quote_cell("plain"), "plain");
        assert_eq!(quote_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_cell("a;b"), "\"a;b\"");
        assert_eq!(quote_cell(" padded "), "\" padded \"");
        assert_eq!(quote_cell("trailing\n"), "\"trailing \"");
    }
}
