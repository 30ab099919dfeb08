use crate::{error, info, success};

pub async fn whoami() {
    let mut app = super::session_app().await;
    if app.token().is_none() {
        error!("Not authenticated. Please run sponowcli auth first.");
    }

    let pb = super::spinner("Fetching profile...");
    let result = app.load_profile().await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            if let Some(profile) = app.profile() {
                let name = profile
                    .display_name
                    .clone()
                    .unwrap_or_else(|| profile.id.clone());
                success!("Logged in as {}", name);
                if let Some(email) = &profile.email {
                    info!("Email: {}", email);
                }
                if let Some(country) = &profile.country {
                    info!("Country: {}", country);
                }
                let plan = match profile.product.as_deref() {
                    Some("premium") => "Spotify Premium",
                    _ => "Spotify",
                };
                info!("Plan: {}", plan);
            }
        }
        Err(e) => error!(
            "Could not load profile ({}). The session was cleared; run sponowcli auth again.",
            e
        ),
    }
}
