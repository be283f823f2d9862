use anyhow::{Result, bail};

use crate::app::App;

pub async fn run(app: &App, email: &str, password: &str) -> Result<()> {
    app.ready().await?;

    let identity = app.manager.sign_in(email, password).await?;
    app.manager
        .handle_identity_change(Some(identity.clone()))
        .await;

    match app.manager.current_session().session {
        Some(session) => {
            println!("{}", super::describe(&session));
            Ok(())
        }
        None => bail!("Signed in as {} but no profile exists for this account", identity.uid),
    }
}
