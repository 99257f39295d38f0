// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use crate::document::{Document, RenderedRow};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl<'a> Token<'a> {
    fn text(&self) -> &'a str {
        match self {
            Self::Digits(run) | Self::Text(run) => run,
        }
    }
}

// Splits a string into maximal digit runs and non-digit runs, in order.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let split = self
            .rest
            .char_indices()
            .find(|(_, ch)| ch.is_ascii_digit() != digits)
            .map(|(index, _)| index)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(split);
        self.rest = rest;
        Some(if digits {
            Token::Digits(run)
        } else {
            Token::Text(run)
        })
    }
}

// Digit runs compare as integers of arbitrary size: strip leading zeros,
// then shorter means smaller and equal lengths compare lexicographically.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Tokens { rest: a };
    let mut right = Tokens { rest: b };
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Token::Digits(x)), Some(Token::Digits(y))) => cmp_digit_runs(x, y),
            (Some(x), Some(y)) => x.text().cmp(y.text()),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

// In-memory twin of the script embedded in the artifact. It owns the
// rendered rows after generation and only ever reads their text content;
// every state mutation runs exactly one render cycle.
#[derive(Debug, Clone)]
pub struct TableState {
    columns: Vec<String>,
    rows: Vec<RenderedRow>,
    order: Vec<usize>,
    sort: Option<(String, Direction)>,
    filters: BTreeMap<String, String>,
    search: String,
    visible: Vec<usize>,
}

impl TableState {
    pub fn new(document: &Document) -> Self {
        let mut state = Self {
            columns: document.columns().names().to_vec(),
            rows: document.rows().to_vec(),
            order: (0..document.rows().len()).collect(),
            sort: None,
            filters: BTreeMap::new(),
            search: String::new(),
            visible: Vec::new(),
        };
        state.render();
        state
    }

    pub fn click_header(&mut self, column: &str) {
        self.sort = match self.sort.take() {
            Some((active, direction)) if active == column => Some((active, direction.flipped())),
            _ => Some((column.to_owned(), Direction::Ascending)),
        };
        self.render();
    }

    pub fn set_filter(&mut self, column: &str, needle: &str) {
        if needle.is_empty() {
            self.filters.remove(column);
        } else {
            self.filters.insert(column.to_owned(), needle.to_owned());
        }
        self.render();
    }

    pub fn set_search(&mut self, needle: &str) {
        self.search = needle.to_owned();
        self.render();
    }

    pub fn reset(&mut self) {
        self.filters.clear();
        self.search.clear();
        self.sort = None;
        self.order = (0..self.rows.len()).collect();
        self.render();
    }

    pub fn sort_indicator(&self, column: &str) -> Option<Direction> {
        match &self.sort {
            Some((active, direction)) if active == column => Some(*direction),
            _ => None,
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &RenderedRow> {
        self.visible.iter().map(|&index| &self.rows[index])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total_count(&self) -> usize {
        self.rows.len()
    }

    pub fn counter(&self) -> String {
        format!("{} / {} rows", self.visible.len(), self.rows.len())
    }

    fn cell_text(&self, row: usize, column: &str) -> &str {
        match self.columns.iter().position(|name| name == column) {
            Some(index) => self.rows[row].cell(index),
            None => "",
        }
    }

    fn matches(&self, row: usize) -> bool {
        for (column, needle) in &self.filters {
            let hay = self.cell_text(row, column).to_lowercase();
            if !hay.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if !self.search.is_empty() {
            let hay = self.rows[row].concatenated_text().to_lowercase();
            if !hay.contains(&self.search.to_lowercase()) {
                return false;
            }
        }
        true
    }

    // Stable sort of the persistent order, then the filtered projection in
    // that order. Rendering twice with unchanged state is a no-op.
    fn render(&mut self) {
        if let Some((column, direction)) = self.sort.clone() {
            let index = self.columns.iter().position(|name| *name == column);
            let rows = &self.rows;
            self.order.sort_by(|&a, &b| {
                let left = index.map(|i| rows[a].cell(i)).unwrap_or("");
                let right = index.map(|i| rows[b].cell(i)).unwrap_or("");
                let ordering = natural_cmp(left, right);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }
        let visible: Vec<usize> = self
            .order
            .iter()
            .copied()
            .filter(|&row| self.matches(row))
            .collect();
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, TableState, natural_cmp};
    use crate::document::Document;
    use crate::schema::Record;
    use std::cmp::Ordering;

    fn srs_records() -> Vec<Record> {
        vec![
            Record::new()
                .with("ID", "SRS-1")
                .with("Title", "alpha")
                .with("Status", "Published"),
            Record::new()
                .with("ID", "SRS-2")
                .with("Title", "beta")
                .with("Status", "Draft"),
            Record::new()
                .with("ID", "SRS-10")
                .with("Title", "gamma")
                .with("Status", "Draft"),
        ]
    }

    fn state() -> TableState {
        let document = Document::build(&srs_records(), "SRS").expect("build should succeed");
        TableState::new(&document)
    }

    fn visible_ids(state: &TableState) -> Vec<String> {
        state.visible_rows().map(|row| row.cell(0).to_owned()).collect()
    }

    #[test]
    fn natural_cmp_orders_digit_runs_numerically() {
        assert_eq!(natural_cmp("SRS-2", "SRS-10"), Ordering::Less);
        assert_eq!(natural_cmp("SRS-10", "SRS-2"), Ordering::Greater);
        assert_eq!(natural_cmp("item9", "item10"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_is_reflexive() {
        for value in ["", "SRS-10", "abc", "12", "a1b2c3"] {
            assert_eq!(natural_cmp(value, value), Ordering::Equal);
        }
    }

    #[test]
    fn natural_cmp_sorts_strict_prefixes_first() {
        assert_eq!(natural_cmp("SRS", "SRS-1"), Ordering::Less);
        assert_eq!(natural_cmp("SRS-1", "SRS"), Ordering::Greater);
        assert_eq!(natural_cmp("10", "10a"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_treats_leading_zeros_as_equal_magnitude() {
        assert_eq!(natural_cmp("SRS-010", "SRS-10"), Ordering::Equal);
        assert_eq!(natural_cmp("007", "7"), Ordering::Equal);
        assert_eq!(natural_cmp("0", "00"), Ordering::Equal);
    }

    #[test]
    fn natural_cmp_compares_text_runs_case_sensitively() {
        assert_eq!(natural_cmp("Apple", "apple"), Ordering::Less);
        assert_eq!(natural_cmp("a-1", "b-1"), Ordering::Less);
    }

    #[test]
    fn natural_cmp_handles_digit_runs_beyond_integer_width() {
        let big = "99999999999999999999999999999999999999";
        let bigger = "100000000000000000000000000000000000000";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
    }

    #[test]
    fn sorting_by_id_yields_natural_order_and_descending_reverses_it() {
        let mut state = state();

        state.click_header("ID");
        assert_eq!(visible_ids(&state), ["SRS-1", "SRS-2", "SRS-10"]);
        assert_eq!(state.sort_indicator("ID"), Some(Direction::Ascending));

        state.click_header("ID");
        assert_eq!(visible_ids(&state), ["SRS-10", "SRS-2", "SRS-1"]);
        assert_eq!(state.sort_indicator("ID"), Some(Direction::Descending));
    }

    #[test]
    fn clicking_a_different_header_starts_ascending_again() {
        let mut state = state();

        state.click_header("ID");
        state.click_header("ID");
        state.click_header("Title");

        assert_eq!(state.sort_indicator("Title"), Some(Direction::Ascending));
        assert_eq!(state.sort_indicator("ID"), None);
        assert_eq!(visible_ids(&state), ["SRS-1", "SRS-2", "SRS-10"]);
    }

    #[test]
    fn sorting_is_stable_for_equal_keys() {
        let mut state = state();

        // SRS-2 and SRS-10 share Status "Draft" and keep their input order.
        state.click_header("Status");
        assert_eq!(visible_ids(&state), ["SRS-2", "SRS-10", "SRS-1"]);
    }

    #[test]
    fn filters_are_conjunctive_across_columns_and_global_search() {
        let mut state = state();

        state.set_filter("Status", "draft");
        assert_eq!(visible_ids(&state), ["SRS-2", "SRS-10"]);
        assert_eq!(state.counter(), "2 / 3 rows");

        state.set_search("gamma");
        assert_eq!(visible_ids(&state), ["SRS-10"]);

        state.set_filter("Status", "");
        assert_eq!(visible_ids(&state), ["SRS-10"]);
    }

    #[test]
    fn filtering_is_case_insensitive_substring_containment() {
        let mut state = state();

        state.set_filter("Title", "ALPH");
        assert_eq!(visible_ids(&state), ["SRS-1"]);

        state.set_search("PUBLISHED");
        assert_eq!(visible_ids(&state), ["SRS-1"]);
    }

    #[test]
    fn a_needle_matching_nothing_is_an_ordinary_empty_result() {
        let mut state = state();

        state.set_search("no such text");
        assert_eq!(state.visible_count(), 0);
        assert_eq!(state.counter(), "0 / 3 rows");
    }

    #[test]
    fn columns_with_only_empty_values_still_sort_and_filter() {
        let records = vec![
            Record::new().with("ID", "A-1").with("Notes", ""),
            Record::new().with("ID", "A-2").with("Notes", ""),
        ];
        let document = Document::build(&records, "Notes").expect("build should succeed");
        let mut state = TableState::new(&document);

        state.click_header("Notes");
        assert_eq!(state.visible_count(), 2);
        assert_eq!(visible_ids(&state), ["A-1", "A-2"]);

        state.set_filter("Notes", "x");
        assert_eq!(state.visible_count(), 0);
    }

    #[test]
    fn reset_restores_original_order_and_full_visibility() {
        let mut state = state();

        state.click_header("ID");
        state.click_header("ID");
        state.set_filter("Status", "draft");
        state.set_search("gamma");

        state.reset();
        assert_eq!(visible_ids(&state), ["SRS-1", "SRS-2", "SRS-10"]);
        assert_eq!(state.counter(), "3 / 3 rows");
        assert_eq!(state.sort_indicator("ID"), None);
        assert_eq!(state.sort_indicator("Status"), None);
    }

    #[test]
    fn repeating_an_interaction_with_unchanged_state_is_idempotent() {
        let mut state = state();

        state.click_header("ID");
        state.set_filter("Status", "draft");
        let first = visible_ids(&state);

        state.set_filter("Status", "draft");
        assert_eq!(visible_ids(&state), first);
        assert_eq!(state.counter(), "2 / 3 rows");
    }
}
