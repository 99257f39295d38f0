// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use itemlens_table::Record;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

mod clean;

pub use clean::clean_field_text;

pub const ID_COLUMN: &str = "ID";
pub const TITLE_COLUMN: &str = "Title";

// Folders whose title carries this marker are retired content and are
// skipped together with everything underneath them.
const OBSOLETE_MARKER: &str = "obsolete";

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    project: String,
    token: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, project: &str, token: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("service.base_url must not be empty");
        }
        Url::parse(&base_url)
            .with_context(|| format!("service.base_url {base_url:?} is not a valid URL"))?;
        if project.trim().is_empty() {
            bail!("service.project must not be empty");
        }
        if token.trim().is_empty() {
            bail!("service.token must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            project: project.to_owned(),
            token: token.to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn category_items(&self, category: &str, fields: &[String]) -> Result<Vec<Record>> {
        if category.trim().is_empty() {
            bail!("category must not be empty");
        }
        let response = self.get(&format!("cat/{category}"), &[])?;
        let parsed: CategoryEnvelope = response.json().context("decode category listing")?;
        self.flatten(&parsed.folder.item_list, fields)
    }

    pub fn folder_items(&self, folder_id: &str, fields: &[String]) -> Result<Vec<Record>> {
        if folder_id.trim().is_empty() {
            bail!("folder id must not be empty");
        }
        let response = self.get(
            &format!("item/{folder_id}"),
            &[("children", "yes"), ("fields", "1")],
        )?;
        let parsed: FolderListing = response.json().context("decode folder listing")?;
        self.flatten(&parsed.item_list, fields)
    }

    pub fn folder_name(&self, folder_id: &str) -> Result<String> {
        let response = self.get(&format!("item/{folder_id}"), &[])?;
        let parsed: ItemEnvelope = response.json().context("decode folder item")?;
        Ok(parsed.title)
    }

    pub fn item_field(&self, item_ref: &str, field: &str) -> Result<String> {
        let response = self.get(&format!("field/{item_ref}"), &[("field", field)])?;
        let raw = response.text().context("read field value")?;
        Ok(clean_field_text(&raw))
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}/{}/{path}", self.base_url, self.project);
        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .query(query)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        Ok(response)
    }

    // Depth-first walk over the item tree, producing one record per leaf
    // item in listing order.
    fn flatten(&self, entries: &[TreeEntry], fields: &[String]) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        self.collect_into(entries, fields, &mut records);
        Ok(records)
    }

    fn collect_into(&self, entries: &[TreeEntry], fields: &[String], out: &mut Vec<Record>) {
        for entry in entries {
            if entry.is_folder() {
                if entry.title.to_lowercase().contains(OBSOLETE_MARKER) {
                    continue;
                }
                self.collect_into(&entry.item_list, fields, out);
                continue;
            }

            let Some(item_ref) = entry.item_ref.as_deref() else {
                continue;
            };
            let mut record = Record::new()
                .with(ID_COLUMN, item_ref)
                .with(TITLE_COLUMN, entry.title.as_str());
            for field in fields {
                // One unreadable field becomes an empty cell instead of
                // failing the whole export.
                let value = self.item_field(item_ref, field).unwrap_or_default();
                record.set(field.as_str(), value);
            }
            out.push(record);
        }
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check service.base_url and your network ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if status == StatusCode::UNAUTHORIZED {
        return anyhow!("server returned 401 -- check service.token");
    }

    if body.len() < 200 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Deserialize)]
struct CategoryEnvelope {
    folder: FolderListing,
}

#[derive(Debug, Deserialize)]
struct FolderListing {
    #[serde(rename = "itemList", default)]
    item_list: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    #[serde(rename = "isFolder", default)]
    is_folder: i64,
    #[serde(default)]
    title: String,
    #[serde(rename = "itemRef")]
    item_ref: Option<String>,
    #[serde(rename = "itemList", default)]
    item_list: Vec<TreeEntry>,
}

impl TreeEntry {
    fn is_folder(&self) -> bool {
        self.is_folder != 0
    }
}

#[derive(Debug, Deserialize)]
struct ItemEnvelope {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}
