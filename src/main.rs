mod cli;

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use deckwatch::actions::jenkins::JenkinsSettings;
use deckwatch::config::AppConfig;
use deckwatch::models::appointment::FilterPolicy;
use deckwatch::runtime::{CalendarOptions, JenkinsOptions};

const DEFAULT_RUN_MODE: &str = "both";

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };
    let get_flag = |key: &str| -> bool {
        config
            .get_bool(key)
            .or_else(|| env::var(key).ok().as_deref().map(AppConfig::truthy))
            .unwrap_or(false)
    };

    let run_mode = get_prop("RUN_MODE").unwrap_or(DEFAULT_RUN_MODE.to_string());
    let icon_dir = PathBuf::from(get_prop("ICON_DIR").unwrap_or("./icons".to_string()));
    if let Err(e) = std::fs::create_dir_all(&icon_dir) {
        println!("Unable to create icon directory {}: {}", icon_dir.display(), e);
        return;
    }
    let tz: Tz = get_prop("TIMEZONE")
        .and_then(|v| v.parse().ok())
        .unwrap_or(chrono_tz::UTC);

    let jenkins = if run_mode == "both" || run_mode == "jenkins" {
        let settings = JenkinsSettings {
            jenkins_url: get_prop("JENKINS_URL").unwrap_or_default(),
            job_name: get_prop("JENKINS_JOB").unwrap_or_default(),
            username: get_prop("JENKINS_USERNAME"),
            access_token: get_prop("JENKINS_TOKEN"),
        };
        settings.is_configured().then(|| JenkinsOptions {
            settings,
            icon_path: icon_dir.join("jenkins.svg"),
        })
    } else {
        None
    };

    let calendar = if run_mode == "both" || run_mode == "calendar" {
        get_prop("CALENDAR_FILE").map(|file| CalendarOptions {
            calendar_file: PathBuf::from(file),
            policy: FilterPolicy {
                out_of_office: get_flag("OUT_OF_OFFICE"),
                free: get_flag("FREE"),
                all_day: get_flag("ALL_DAY"),
            },
            tz,
            icon_path: icon_dir.join("calendar.svg"),
        })
    } else {
        None
    };

    if jenkins.is_none() && calendar.is_none() {
        println!("Nothing configured: set JENKINS_URL/JENKINS_JOB or CALENDAR_FILE");
        return;
    }
    cli::run(jenkins, calendar).await;
}
