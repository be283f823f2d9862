use anyhow::Result;

use crate::app::App;

pub async fn run(app: &App, json: bool) -> Result<()> {
    let view = app.ready().await?;

    match (view.session, json) {
        (Some(session), true) => {
            let value: serde_json::Value = serde_json::from_slice(&session.to_snapshot()?)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        (Some(session), false) => println!("{}", super::describe(&session)),
        (None, true) => println!("null"),
        (None, false) => println!("Not signed in"),
    }
    Ok(())
}
