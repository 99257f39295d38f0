// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

mod config;
mod csv;

use anyhow::{Context, Result, bail};
use config::Config;
use itemlens_client::Client;
use itemlens_table::Document;
use std::env;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `itemlens --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    if options.check_only {
        if !options.demo {
            build_client(&config, &options.config_path)?;
        }
        return Ok(());
    }

    let records = if options.demo {
        itemlens_testkit::sample_records()
    } else {
        let client = build_client(&config, &options.config_path)?;
        let fields = if options.brief {
            Vec::new()
        } else {
            config.export_fields()
        };
        match &options.scope {
            Some(Scope::Folder(folder_id)) => {
                let name = client
                    .folder_name(folder_id)
                    .unwrap_or_else(|_| folder_id.clone());
                println!("Exporting folder {folder_id} ({name})");
                client.folder_items(folder_id, &fields)?
            }
            Some(Scope::Category(category)) => {
                println!("Exporting category {category}");
                client.category_items(category, &fields)?
            }
            None => bail!("nothing to export; pass --folder <ID>, --category <TYPE>, or --demo"),
        }
    };

    let title = options.title.as_deref().unwrap_or(config.export_title());
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.export_output()));

    let document = Document::build(&records, title)?;
    let written = document.write_html(&output, OffsetDateTime::now_utc())?;
    println!("HTML written to: {}", written.display());

    if !options.no_csv {
        let csv_path = csv::sibling_csv_path(&output);
        csv::write_csv(&document, &csv_path)?;
        println!("CSV written to: {}", csv_path.display());
    }

    println!("Exported {} records.", document.rows().len());
    Ok(())
}

fn build_client(config: &Config, config_path: &Path) -> Result<Client> {
    let base_url = config.service_base_url().ok_or_else(|| {
        missing_setting_error("service.base_url", config_path)
    })?;
    let project = config
        .service_project()
        .ok_or_else(|| missing_setting_error("service.project", config_path))?;
    let token = config
        .service_token()
        .ok_or_else(|| missing_setting_error("service.token", config_path))?;

    Client::new(base_url, project, token, config.service_timeout()?).with_context(|| {
        format!(
            "invalid [service] config in {}",
            config_path.display()
        )
    })
}

fn missing_setting_error(setting: &str, config_path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "{setting} is not set in {}; run `itemlens --print-example-config` for a template",
        config_path.display()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scope {
    Folder(String),
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    demo: bool,
    brief: bool,
    no_csv: bool,
    scope: Option<Scope>,
    output: Option<PathBuf>,
    title: Option<String>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        demo: false,
        brief: false,
        no_csv: false,
        scope: None,
        output: None,
        title: None,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--folder" | "-f" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--folder requires a folder id"))?;
                set_scope(&mut options, Scope::Folder(value.as_ref().to_owned()))?;
            }
            "--category" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--category requires a category type"))?;
                set_scope(&mut options, Scope::Category(value.as_ref().to_owned()))?;
            }
            "--output" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--output requires a file path"))?;
                options.output = Some(PathBuf::from(value.as_ref()));
            }
            "--title" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--title requires a value"))?;
                options.title = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--brief" => {
                options.brief = true;
            }
            "--no-csv" => {
                options.no_csv = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn set_scope(options: &mut CliOptions, scope: Scope) -> Result<()> {
    if options.scope.is_some() {
        bail!("pass only one of --folder and --category");
    }
    options.scope = Some(scope);
    Ok(())
}

fn print_help() {
    println!("itemlens");
    println!("  --folder <ID>            Export the items under one folder (alias -f)");
    println!("  --category <TYPE>        Export every item of a category");
    println!("  --output <path>          Write the HTML artifact to this path (alias -o)");
    println!("  --title <text>           Title shown in the exported page");
    println!("  --brief                  Export only ID and Title, skip field lookups");
    println!("  --no-csv                 Skip the CSV companion file");
    println!("  --demo                   Export a built-in sample data set");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and service settings");
    println!("  --help                   Show this help");
}
