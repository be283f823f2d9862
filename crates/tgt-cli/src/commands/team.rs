use anyhow::Result;
use clap::Subcommand;
use tgt_application::TeamService;
use tgt_core::auth::UserId;
use tgt_core::user::{Targets, VerificationStatus};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum TeamAction {
    /// List team members (admin)
    List,
    /// Set a member's debi check status (admin)
    Status {
        uid: String,
        /// active, pending or inactive
        status: VerificationStatus,
    },
    /// Replace a member's daily targets (admin)
    Targets {
        uid: String,
        #[arg(long, default_value_t = Targets::DEFAULT_INVITES)]
        invites: u32,
        #[arg(long, default_value_t = Targets::DEFAULT_PRESENTATIONS)]
        presentations: u32,
        #[arg(long, default_value_t = Targets::DEFAULT_RECRUITS)]
        recruits: u32,
    },
}

pub async fn run(app: &App, action: TeamAction) -> Result<()> {
    app.ready().await?;
    let service = TeamService::new(app.manager.clone(), app.profile_repository.clone());

    match action {
        TeamAction::List => {
            let members = service.list_members().await?;
            if members.is_empty() {
                println!("No team members");
            }
            for member in members {
                let profile = &member.profile;
                println!(
                    "{:<34} {:<24} {:<9} targets {}/{}/{}",
                    member.uid,
                    profile.display_name(),
                    profile.debi_check_status,
                    profile.targets.invites(),
                    profile.targets.presentations(),
                    profile.targets.recruits()
                );
            }
        }
        TeamAction::Status { uid, status } => {
            service.set_member_status(&UserId::from(uid.as_str()), status).await?;
            println!("{}: {}", uid, status);
        }
        TeamAction::Targets {
            uid,
            invites,
            presentations,
            recruits,
        } => {
            let targets = Targets::new(invites, presentations, recruits);
            service.set_member_targets(&UserId::from(uid.as_str()), targets).await?;
            println!(
                "{}: invites {} | presentations {} | recruits {}",
                uid, invites, presentations, recruits
            );
        }
    }
    Ok(())
}
