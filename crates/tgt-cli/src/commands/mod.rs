pub mod can;
pub mod login;
pub mod logout;
pub mod register;
pub mod status;
pub mod team;
pub mod update;

use tgt_core::session::Session;

/// Human-readable summary of a session.
pub(crate) fn describe(session: &Session) -> String {
    let profile = &session.profile;
    let mut lines = vec![format!(
        "Signed in as {} <{}>",
        profile.display_name(),
        session.email().unwrap_or("no email")
    )];
    lines.push(format!("  uid:             {}", session.uid()));
    lines.push(format!("  role:            {}", profile.role));
    lines.push(format!("  business number: {}", profile.business_number));
    if let Some(phone) = &profile.phone_number {
        lines.push(format!("  phone:           {}", phone));
    }
    lines.push(format!("  debi check:      {}", profile.debi_check_status));
    lines.push(format!(
        "  level {} | invites {} | presentations {} | recruits {}",
        profile.metrics.current_level(),
        profile.metrics.total_invites(),
        profile.metrics.total_presentations(),
        profile.metrics.total_recruits()
    ));
    lines.push(format!(
        "  daily targets: invites {} | presentations {} | recruits {}",
        profile.targets.invites(),
        profile.targets.presentations(),
        profile.targets.recruits()
    ));
    lines.push(format!(
        "  dark mode: {} | language: {}",
        if profile.settings.dark_mode() { "on" } else { "off" },
        profile.settings.language()
    ));
    lines.join("\n")
}
