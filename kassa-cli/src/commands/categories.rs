//! Categories command - list the tenant's category taxonomy

use anyhow::Result;

use kassa_core::domain::CategoryKind;

use super::get_context;
use crate::output;

pub async fn run(include_inactive: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.import_service;

    let mut categories = Vec::new();
    for kind in [CategoryKind::Income, CategoryKind::Expense] {
        categories.extend(service.list_categories(kind, include_inactive).await?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Name", "Code", "Kind", "Active"]);
    for cat in &categories {
        let kind = match cat.kind {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        };
        table.add_row(vec![
            cat.id.clone(),
            cat.display_name().to_string(),
            cat.code.clone(),
            kind.to_string(),
            if cat.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
