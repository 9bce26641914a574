use {
    anyhow::{Context, Result},
    clap::Subcommand,
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (secrets redacted).
    Show,
    /// Print the config file in use, if any.
    Path,
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show(),
        ConfigAction::Path => path(),
    }
}

fn show() -> Result<()> {
    let config = forum_config::discover_and_load();
    let rendered = toml::to_string_pretty(&config).context("serialize config")?;
    print!("{rendered}");
    Ok(())
}

fn path() -> Result<()> {
    match forum_config::find_config_file() {
        Some(path) => println!("{}", path.display()),
        None => println!("No config file found; using defaults."),
    }
    Ok(())
}
