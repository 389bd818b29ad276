//! CLI configuration: thin wrapper around `staffdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--base-url,
//! --token, --insecure, --timeout, --offline).

use std::time::Duration;

use secrecy::SecretString;

use staffdesk_api::TlsMode;
use staffdesk_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use staffdesk_config::{
    Config, Profile, config_path, delete_token, load_config_or_default, save_config, store_token,
};

pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

pub fn profile_not_found(config: &Config, name: &str) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Build a `ClientConfig` from the config file, active profile and
/// flag overrides. Flags win over profile values.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match (cfg.profiles.get(&profile_name), global.base_url.as_deref()) {
        (Some(profile), url) => {
            let mut profile = profile.clone();
            if let Some(url) = url {
                url.clone_into(&mut profile.base_url);
            }
            profile
        }
        // Flags alone; the queue still lives under the profile's data dir.
        (None, Some(url)) => Profile::new(url),
        (None, None) if global.profile.is_some() => {
            return Err(profile_not_found(&cfg, &profile_name));
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let mut client =
        staffdesk_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults)?;

    if let Some(ref token) = global.token {
        client.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        client.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    client.start_offline = global.offline;

    tracing::debug!(
        profile = %profile_name,
        base_url = %client.base_url,
        offline = client.start_offline,
        "resolved client config"
    );
    Ok(client)
}
