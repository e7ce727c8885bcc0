//! Setup command - configure the backend connection

use anyhow::Result;
use colored::Colorize;

use kassa_core::config::Config;

use super::get_kassa_dir;

pub fn run(
    url: &str,
    token: Option<String>,
    tenant: Option<String>,
    locale: Option<String>,
    currency: Option<String>,
) -> Result<()> {
    let kassa_dir = get_kassa_dir();
    std::fs::create_dir_all(&kassa_dir)?;

    let mut config = Config::load(&kassa_dir).unwrap_or_default();
    config.backend_url = Some(url.to_string());
    if token.is_some() {
        config.auth_token = token;
    }
    if tenant.is_some() {
        config.tenant_id = tenant;
    }
    if let Some(locale) = locale {
        config.locale = locale;
    }
    if currency.is_some() {
        config.currency = currency;
    }
    config.save(&kassa_dir)?;

    println!("{} Backend configured: {}", "Success!".green(), url);
    println!("Run 'kassa categories' to verify connectivity.");
    Ok(())
}
