use std::process::ExitCode;

use anyhow::Result;
use tgt_core::permissions::Capability;

use crate::app::App;

/// Checks `capability`, or lists every capability when none is given.
///
/// A single denied capability exits with failure so scripts can branch on it.
pub async fn run(app: &App, capability: Option<Capability>) -> Result<ExitCode> {
    app.ready().await?;
    let capabilities = app.manager.capabilities();

    let Some(capability) = capability else {
        for (capability, granted) in capabilities.iter() {
            println!("{:<24} {}", capability, if granted { "yes" } else { "no" });
        }
        return Ok(ExitCode::SUCCESS);
    };

    if capabilities.can(capability) {
        println!("{}: yes", capability);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}: no", capability);
        Ok(ExitCode::FAILURE)
    }
}
