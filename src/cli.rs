use async_trait::async_trait;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::Value;

use deckwatch::actions::calendar::push_icon;
use deckwatch::actions::jenkins::jenkins_tick;
use deckwatch::clients::calendar::{CalendarStore, JsonFileStore};
use deckwatch::host::DeckConnection;
use deckwatch::runtime::{self, CalendarOptions, JenkinsOptions};
use deckwatch::service::next_appointment::select_next;

#[derive(Parser)]
#[command(name = "deckwatch", about = "Build-status and next-appointment key icons")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured pollers and keep the icon files refreshed
    Watch,
    /// Fetch the Jenkins job once and print the icon as a data URI
    PreviewJenkins,
    /// Read the calendar once and print the icon as a data URI
    PreviewCalendar,
}

/// Connection that prints instead of driving hardware; used by the previews.
struct PrintConnection;

#[async_trait]
impl DeckConnection for PrintConnection {
    async fn set_image(&self, data_uri: &str) -> Result<(), String> {
        println!("{}", data_uri);
        Ok(())
    }

    async fn set_default_image(&self) -> Result<(), String> {
        println!("(default image)");
        Ok(())
    }

    async fn save_settings(&self, _settings: Value) -> Result<(), String> {
        Ok(())
    }
}

pub async fn run(jenkins: Option<JenkinsOptions>, calendar: Option<CalendarOptions>) {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => runtime::run(jenkins, calendar).await,
        Commands::PreviewJenkins => {
            let Some(opts) = jenkins else {
                println!("Jenkins is not configured (JENKINS_URL / JENKINS_JOB)");
                return;
            };
            let Some(client) = opts.settings.build_client() else {
                println!("Jenkins is not configured (JENKINS_URL / JENKINS_JOB)");
                return;
            };
            if let Err(e) = jenkins_tick(
                client.as_ref(),
                &PrintConnection,
                &opts.settings.job_name,
                -1,
                Utc::now(),
            )
            .await
            {
                println!("Preview failed: {}", e);
            }
        }
        Commands::PreviewCalendar => {
            let Some(opts) = calendar else {
                println!("Calendar is not configured (CALENDAR_FILE)");
                return;
            };
            let store = JsonFileStore::new(opts.calendar_file);
            let now = Utc::now();
            let snapshot = match store
                .find_appointments(now, now + chrono::Duration::days(92))
                .await
            {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    println!("Preview failed: {}", e);
                    return;
                }
            };
            match select_next(&snapshot, &opts.policy, now) {
                Some(appointment) => {
                    let _ = push_icon(&PrintConnection, &appointment, opts.tz, now).await;
                }
                None => println!("No upcoming appointment"),
            }
        }
    }
}
