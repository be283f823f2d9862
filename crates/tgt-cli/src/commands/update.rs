use anyhow::{Context, Result, bail};
use clap::Args;
use tgt_core::session::Session;
use tgt_core::user::{AppSettings, ProfilePatch};

use crate::app::App;

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub business_number: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Keeps the current language
    #[arg(long)]
    pub dark_mode: Option<bool>,
    /// Keeps the current dark mode setting
    #[arg(long)]
    pub language: Option<String>,
    /// Raw camelCase patch, e.g. '{"settings":{"darkMode":true}}'.
    /// Sub-records given here replace the stored ones wholesale; unknown
    /// keys are rejected.
    #[arg(long)]
    pub patch: Option<String>,
}

impl UpdateArgs {
    /// Builds the patch to send, starting from `--patch` and overlaying flags.
    ///
    /// `--dark-mode` and `--language` spread the settings record they start
    /// from so the other setting survives the wholesale replace.
    fn to_patch(&self, current: &Session) -> Result<ProfilePatch> {
        let mut patch: ProfilePatch = match &self.patch {
            Some(raw) => serde_json::from_str(raw).context("Invalid --patch JSON")?,
            None => ProfilePatch::new(),
        };

        if let Some(first_name) = &self.first_name {
            patch.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &self.last_name {
            patch.last_name = Some(last_name.clone());
        }
        if let Some(business_number) = &self.business_number {
            patch.business_number = Some(business_number.clone());
        }
        if let Some(phone) = &self.phone {
            patch.phone_number = Some(phone.clone());
        }

        if self.dark_mode.is_some() || self.language.is_some() {
            let base = patch
                .settings
                .take()
                .unwrap_or_else(|| current.profile.settings.clone());
            patch.settings = Some(AppSettings {
                dark_mode: self.dark_mode.or(base.dark_mode),
                language: self.language.clone().or(base.language),
            });
        }

        Ok(patch)
    }
}

pub async fn run(app: &App, args: UpdateArgs) -> Result<()> {
    let view = app.ready().await?;
    let Some(current) = view.session else {
        bail!("Not signed in");
    };

    let patch = args.to_patch(&current)?;
    if patch.is_empty() {
        bail!("Nothing to update");
    }

    app.manager.update(&patch).await?;

    if let Some(session) = app.manager.current_session().session {
        println!("{}", super::describe(&session));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgt_core::auth::Identity;
    use tgt_core::user::UserProfile;

    fn session() -> Session {
        let mut profile = UserProfile::default();
        profile.settings = AppSettings {
            dark_mode: Some(true),
            language: Some("af".to_string()),
        };
        Session::new(Identity::new("U1", None), profile)
    }

    #[test]
    fn test_dark_mode_flag_keeps_language() {
        let args = UpdateArgs {
            dark_mode: Some(false),
            ..Default::default()
        };
        let patch = args.to_patch(&session()).unwrap();
        assert_eq!(
            patch.settings,
            Some(AppSettings {
                dark_mode: Some(false),
                language: Some("af".to_string()),
            })
        );
    }

    #[test]
    fn test_raw_patch_replaces_settings_wholesale() {
        let args = UpdateArgs {
            patch: Some(r#"{"settings":{"darkMode":true}}"#.to_string()),
            ..Default::default()
        };
        let patch = args.to_patch(&session()).unwrap();
        assert_eq!(
            patch.settings,
            Some(AppSettings {
                dark_mode: Some(true),
                language: None,
            })
        );
    }

    #[test]
    fn test_flags_overlay_raw_patch() {
        let args = UpdateArgs {
            first_name: Some("Lerato".to_string()),
            patch: Some(r#"{"firstName":"Ignored","lastName":"Khumalo"}"#.to_string()),
            ..Default::default()
        };
        let patch = args.to_patch(&session()).unwrap();
        assert_eq!(patch.first_name.as_deref(), Some("Lerato"));
        assert_eq!(patch.last_name.as_deref(), Some("Khumalo"));
        assert!(patch.settings.is_none());
    }

    #[test]
    fn test_no_flags_is_empty() {
        let patch = UpdateArgs::default().to_patch(&session()).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_misspelled_raw_patch_key_is_rejected() {
        let args = UpdateArgs {
            patch: Some(r#"{"settigns":{"darkMode":true}}"#.to_string()),
            ..Default::default()
        };
        let err = args.to_patch(&session()).unwrap_err();
        assert!(format!("{:#}", err).contains("settigns"));
    }

    #[test]
    fn test_invalid_raw_patch() {
        let args = UpdateArgs {
            patch: Some("{not json".to_string()),
            ..Default::default()
        };
        assert!(args.to_patch(&session()).is_err());
    }
}
