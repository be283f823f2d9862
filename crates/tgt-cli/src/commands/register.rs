use anyhow::Result;
use clap::Args;
use tgt_application::{RegistrationRequest, RegistrationService};
use tgt_core::user::Role;

use crate::app::App;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Must match --password when given
    #[arg(long)]
    pub confirm_password: Option<String>,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub business_number: String,
    #[arg(long)]
    pub phone: Option<String>,
    /// admin or user
    #[arg(long, default_value = "user")]
    pub role: Role,
}

impl From<RegisterArgs> for RegistrationRequest {
    fn from(args: RegisterArgs) -> Self {
        RegistrationRequest {
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            first_name: args.first_name,
            last_name: args.last_name,
            business_number: args.business_number,
            phone_number: args.phone,
            role: args.role,
        }
    }
}

pub async fn run(app: &App, args: RegisterArgs) -> Result<()> {
    app.ready().await?;

    let service = RegistrationService::new(
        app.identity_provider.clone(),
        app.profile_repository.clone(),
    );
    let session = service.register(&args.into()).await?;

    // The provider notified the manager before the profile existed
    app.manager
        .handle_identity_change(Some(session.identity.clone()))
        .await;

    println!("Registered {}", session.uid());
    match app.manager.current_session().session {
        Some(current) => println!("{}", super::describe(&current)),
        None => println!("Account created but the session could not be loaded"),
    }
    Ok(())
}
