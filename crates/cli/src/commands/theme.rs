//! Theme commands.

use volt_storefront::{AppState, Result};

#[allow(clippy::print_stdout)]
pub fn show(app: &AppState) {
    println!("{}", app.theme().theme());
}

#[allow(clippy::print_stdout)]
pub fn toggle(app: &mut AppState) -> Result<()> {
    let theme = app.theme_mut().toggle()?;
    println!("Theme set to {theme}");
    Ok(())
}
