use anyhow::Result;

use crate::app::App;

pub async fn run(app: &App) -> Result<()> {
    let view = app.ready().await?;
    app.manager.logout().await?;

    match view.session {
        Some(session) => println!("Signed out {}", session.profile.display_name()),
        None => println!("Not signed in"),
    }
    Ok(())
}
