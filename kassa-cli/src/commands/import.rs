//! Import command - run the CSV import wizard from the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use kassa_core::config::ImportProfile;
use kassa_core::domain::{CategoryRecord, MissingCategory};
use kassa_core::parse::detect_delimiter;
use kassa_core::services::{ImportProgress, ImportService};
use kassa_core::{ImportPreview, ImportSession};

use super::{get_context, get_kassa_dir};
use crate::output;

/// Per-field column overrides from the command line
#[derive(Debug, Default)]
pub struct ColumnOverrides {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub comment: Option<String>,
}

/// All `kassa import` arguments
pub struct ImportArgs {
    pub file: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub quote: char,
    pub preview: bool,
    pub auto_create_categories: bool,
    pub map: Vec<String>,
    pub currency: Option<String>,
    pub profile: Option<String>,
    pub save_profile: Option<String>,
    pub list_profiles: bool,
    pub no_input: bool,
    pub json: bool,
    pub overrides: ColumnOverrides,
}

pub async fn run(args: ImportArgs) -> Result<()> {
    let ctx = get_context()?;

    if args.list_profiles {
        return list_profiles(&ctx.config.import_profiles, args.json);
    }

    let file = args.file.context("File path required for import")?;
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read CSV file: {:?}", file))?;

    // Default currency: CLI flag, then the active tenant, then config/RUB
    let default_currency = match &args.currency {
        Some(c) => c.clone(),
        None => match ctx
            .import_service
            .default_currency(ctx.config.tenant_id.as_deref())
            .await
        {
            Ok(c) => c,
            Err(e) => {
                let fallback = ctx.config.currency.clone().unwrap_or_else(|| "RUB".to_string());
                output::warning(&format!(
                    "Could not read tenant currency ({}), using {}",
                    e, fallback
                ));
                fallback
            }
        },
    };

    let profile = match &args.profile {
        Some(name) => Some(
            ctx.config
                .import_profiles
                .get(name)
                .with_context(|| format!("Profile not found: {}", name))?
                .clone(),
        ),
        None => None,
    };

    let quote = profile.as_ref().and_then(|p| p.quote).unwrap_or(args.quote);
    let first_line = text.lines().next().unwrap_or("");
    let delimiter = args
        .delimiter
        .or_else(|| profile.as_ref().and_then(|p| p.delimiter))
        .unwrap_or_else(|| detect_delimiter(first_line));

    let mut session = ImportSession::from_text(&text, quote, &default_currency, &ctx.config.locale);
    session.reparse(&text, delimiter, quote);
    session.auto_create_missing_categories = args.auto_create_categories;

    if let Some(profile) = &profile {
        session.mapping = profile.column_mapping.clone();
    }
    apply_overrides(&mut session, &args.overrides);
    session.mapping.validate(&session.table.headers)?;

    for entry in &args.map {
        let (name, id) = entry
            .split_once('=')
            .with_context(|| format!("--map expects NAME=ID, got '{}'", entry))?;
        session
            .manual_category_map
            .insert(name.to_string(), id.to_string());
    }

    let categories = ctx.import_service.load_categories().await?;
    let reconciliation = ctx
        .import_service
        .reconcile_categories(&session, &categories);

    let preview = session.preview();
    if args.json && args.preview {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }
    if !args.json {
        print_preview(&session, &preview, &reconciliation.missing);
    }
    if args.preview {
        return Ok(());
    }

    // Manual resolution of unmatched names, unless the caller opted out
    let interactive = !args.no_input && !args.json && atty::is(atty::Stream::Stdin);
    if !session.auto_create_missing_categories && !reconciliation.missing.is_empty() {
        if interactive {
            resolve_missing_interactively(
                &ctx.import_service,
                &mut session,
                &categories,
                &reconciliation.missing,
            )
            .await?;
        } else if !args.json {
            output::warning(&format!(
                "{} unmatched categories will be left unmapped (use --map or --auto-create-categories)",
                reconciliation.missing.len()
            ));
        }
    }

    if interactive {
        let proceed = Confirm::new()
            .with_prompt(format!("Import {} valid rows?", preview.valid))
            .default(true)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let bar = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(preview.total as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                .expect("valid progress template"),
        );
        bar
    };
    let outcome = ctx
        .import_service
        .commit(&session, &categories, |progress| match progress {
            ImportProgress::Preparing => bar.set_message("preparing"),
            ImportProgress::CreatingCategory { name } => {
                bar.set_message(format!("creating category {}", name));
            }
            ImportProgress::Inserting { current, .. } => {
                bar.set_message("inserting");
                bar.set_position(*current as u64);
            }
        })
        .await?;
    bar.finish_and_clear();

    if let Some(name) = &args.save_profile {
        let mut config = ctx.config.clone();
        config.import_profiles.insert(
            name.clone(),
            ImportProfile {
                column_mapping: session.mapping.clone(),
                delimiter: Some(delimiter),
                quote: Some(quote),
            },
        );
        config.save(&get_kassa_dir())?;
        if !args.json {
            output::info(&format!("Saved import profile '{}'", name));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        if outcome.categories_created > 0 {
            output::info(&format!(
                "Created {} categories",
                outcome.categories_created
            ));
        }
        output::success(&format!(
            "Imported {} of {} rows",
            outcome.inserted, outcome.total_rows
        ));
    }
    Ok(())
}

fn apply_overrides(session: &mut ImportSession, overrides: &ColumnOverrides) {
    let mapping = &mut session.mapping;
    if overrides.date.is_some() {
        mapping.date_column = overrides.date.clone();
    }
    if overrides.amount.is_some() {
        mapping.amount_column = overrides.amount.clone();
    }
    if overrides.currency.is_some() {
        mapping.currency_code_column = overrides.currency.clone();
    }
    if overrides.kind.is_some() {
        mapping.type_column = overrides.kind.clone();
    }
    if overrides.category.is_some() {
        mapping.category_column = overrides.category.clone();
    }
    if overrides.comment.is_some() {
        mapping.comment_column = overrides.comment.clone();
    }
}

fn list_profiles(
    profiles: &std::collections::HashMap<String, ImportProfile>,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(profiles)?);
        return Ok(());
    }
    if profiles.is_empty() {
        println!("No saved profiles.");
        return Ok(());
    }
    println!("Saved import profiles:");
    for (name, profile) in profiles {
        println!();
        println!("  {}", name.green());
        let mapping = &profile.column_mapping;
        let fields = [
            ("Date", &mapping.date_column),
            ("Amount", &mapping.amount_column),
            ("Currency", &mapping.currency_code_column),
            ("Type", &mapping.type_column),
            ("Category", &mapping.category_column),
            ("Comment", &mapping.comment_column),
        ];
        for (label, column) in fields {
            if let Some(column) = column {
                println!("    {}: {}", label, column);
            }
        }
        if let Some(d) = profile.delimiter {
            println!("    Delimiter: {:?}", d);
        }
    }
    Ok(())
}

fn print_preview(session: &ImportSession, preview: &ImportPreview, missing: &[MissingCategory]) {
    println!(
        "Rows: {}  valid: {}  invalid: {}",
        preview.total,
        preview.valid.to_string().green(),
        preview.invalid.to_string().red()
    );

    let mut table = output::create_table();
    table.set_header(vec![
        "date", "amount", "currency", "type", "category", "comment", "ok",
    ]);
    for row in &preview.sample {
        table.add_row(vec![
            row.date.clone(),
            row.amount.clone(),
            row.currency.clone(),
            row.transaction_type.clone(),
            row.category.clone(),
            row.comment.clone(),
            if row.ok { "✓".to_string() } else { "✗".to_string() },
        ]);
    }
    println!("{table}");

    if session.mapping.category_column.is_some() && !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|m| m.name.as_str()).collect();
        output::warning(&format!("Unmatched categories: {}", names.join(", ")));
    }
}

/// Step through unmatched names: pick an existing category of the guessed
/// kind, quick-create one, or leave the name unmapped
async fn resolve_missing_interactively(
    service: &ImportService,
    session: &mut ImportSession,
    categories: &[CategoryRecord],
    missing: &[MissingCategory],
) -> Result<()> {
    let mut created: Vec<CategoryRecord> = Vec::new();

    for entry in missing {
        // A quick-create earlier in this loop may already cover the name
        if let Some(existing) = created.iter().find(|c| c.matches_name(&entry.name)) {
            session
                .manual_category_map
                .insert(entry.name.clone(), existing.id.clone());
            continue;
        }

        let candidates: Vec<&CategoryRecord> = categories
            .iter()
            .filter(|c| c.kind == entry.inferred_kind)
            .collect();
        let mut items: Vec<String> = candidates
            .iter()
            .map(|c| c.display_name().to_string())
            .collect();
        items.push(format!("Quick create '{}'", entry.name));
        items.push("Leave unmapped".to_string());

        let choice = Select::new()
            .with_prompt(format!("Category for '{}'", entry.name))
            .items(&items)
            .default(items.len() - 2)
            .interact()?;

        if choice < candidates.len() {
            session
                .manual_category_map
                .insert(entry.name.clone(), candidates[choice].id.clone());
        } else if choice == candidates.len() {
            let record = service
                .quick_create_category(&entry.name, entry.inferred_kind, &session.locale)
                .await?;
            session
                .manual_category_map
                .insert(entry.name.clone(), record.id.clone());
            created.push(record);
        }
        // Last item: leave unmapped, nothing to record
    }
    Ok(())
}
