//! `consent-client` command: enrol users, administer consents, list consents.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

use consent_client::config::ClientSettings;
use consent_client::domain::ports::IdentityService;
use consent_client::domain::{
    ConsentAction, ConsentCatalogue, ConsentChange, ConsentTarget, EnrolmentError, EnrolmentForm,
    EnrolmentSequencer, MappingOutcome, UserId, UserUpdate,
};
use consent_client::outbound::graphql::{GraphQlIdentityService, GraphQlMappingService};
use consent_client::telemetry;

/// `consent-client` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "consent-client",
    about = "Enrol users and manage consents against the dynamic consent services",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a user, then map their genomic sample to the new id.
    AddUser(AddUserArgs),
    /// Print the consent catalogue.
    Consents,
    /// Change a user's email or names.
    UpdateUser(UpdateUserArgs),
    /// Delete a user.
    DeleteUser {
        /// Id of the user to delete.
        #[arg(long = "id", value_name = "user-id")]
        id: String,
    },
    /// Add consents to a user.
    GrantConsents(ConsentArgs),
    /// Remove consents from a user.
    RevokeConsents(ConsentArgs),
}

/// Enrolment form values. Missing values are reported by form validation.
#[derive(Debug, Args)]
struct AddUserArgs {
    #[arg(long = "first-name", default_value = "")]
    first_name: String,
    #[arg(long = "last-name", default_value = "")]
    last_name: String,
    #[arg(long = "email", default_value = "")]
    email: String,
    /// Date of birth as `YYYY-MM-DD`.
    #[arg(long = "dob", value_name = "YYYY-MM-DD", value_parser = parse_date_of_birth)]
    dob: Option<NaiveDate>,
    #[arg(long = "sample-id", default_value = "")]
    sample_id: String,
}

#[derive(Debug, Args)]
struct UpdateUserArgs {
    #[arg(long = "id", value_name = "user-id")]
    id: String,
    #[arg(long = "email")]
    email: Option<String>,
    #[arg(long = "first-name")]
    first_name: Option<String>,
    #[arg(long = "last-name")]
    last_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConsentScope {
    Orgs,
    Purposes,
    Hpos,
}

#[derive(Debug, Args)]
struct ConsentArgs {
    #[arg(long = "user-id")]
    user_id: String,
    #[arg(long = "scope", value_enum)]
    scope: ConsentScope,
    /// Consent id; repeat for several. Organisation ids are integers.
    #[arg(long = "consent-id", value_name = "id", required = true)]
    consent_ids: Vec<String>,
}

fn main() -> io::Result<()> {
    telemetry::init();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main(CliArgs::parse()))
}

async fn async_main(args: CliArgs) -> io::Result<()> {
    let settings = ClientSettings::load_from_iter([OsString::from("consent-client")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;

    match args.command {
        Command::AddUser(add) => add_user(&settings, add).await,
        Command::Consents => list_consents(&settings).await,
        Command::UpdateUser(update) => update_user(&settings, update).await,
        Command::DeleteUser { id } => delete_user(&settings, &id).await,
        Command::GrantConsents(change) => {
            change_consents(&settings, ConsentAction::Grant, change).await
        }
        Command::RevokeConsents(change) => {
            change_consents(&settings, ConsentAction::Revoke, change).await
        }
    }
}

async fn add_user(settings: &ClientSettings, args: AddUserArgs) -> io::Result<()> {
    let mut form = EnrolmentForm::new();
    form.set_first_name(args.first_name)
        .set_last_name(args.last_name)
        .set_email(args.email)
        .set_date_of_birth(args.dob)
        .set_sample_id(args.sample_id);

    let sequencer =
        EnrolmentSequencer::new(identity_service(settings)?, mapping_service(settings)?);
    let outcome = sequencer.submit(&mut form).await.map_err(|error| match error {
        EnrolmentError::Validation { errors } => io::Error::new(
            io::ErrorKind::InvalidInput,
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        EnrolmentError::Identity(failure) => io::Error::other(failure.to_string()),
    })?;

    println!("status={:?}", form.status());
    println!("user_id={}", outcome.user.id);
    match outcome.mapping {
        MappingOutcome::Created(mapping) => {
            println!("mapping=created");
            println!("genome_id={}", mapping.genome_id);
        }
        MappingOutcome::Failed(error) => {
            println!("mapping=failed");
            println!("mapping_error={error}");
        }
    }
    Ok(())
}

async fn list_consents(settings: &ClientSettings) -> io::Result<()> {
    let catalogue = ConsentCatalogue::new(identity_service(settings)?);
    let table = catalogue
        .render_table()
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("{table}");
    Ok(())
}

async fn update_user(settings: &ClientSettings, args: UpdateUserArgs) -> io::Result<()> {
    let update = UserUpdate::new(
        parse_user_id(args.id)?,
        args.email,
        args.first_name,
        args.last_name,
    )
    .map_err(invalid_input)?;
    let updated = identity_service(settings)?
        .update_user(&update)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("updated_user_id={updated}");
    Ok(())
}

async fn delete_user(settings: &ClientSettings, id: &str) -> io::Result<()> {
    let id = parse_user_id(id.to_owned())?;
    let deleted = identity_service(settings)?
        .delete_user(&id)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("deleted_user_id={deleted}");
    Ok(())
}

async fn change_consents(
    settings: &ClientSettings,
    action: ConsentAction,
    args: ConsentArgs,
) -> io::Result<()> {
    let target = build_target(args.scope, args.consent_ids).map_err(invalid_input)?;
    let label = target.label();
    let change =
        ConsentChange::new(parse_user_id(args.user_id)?, action, target).map_err(invalid_input)?;
    let user_id = identity_service(settings)?
        .change_consents(&change)
        .await
        .map_err(|error| io::Error::other(error.to_string()))?;
    println!("user_id={user_id}");
    println!("action={action:?}");
    println!("scope={label}");
    Ok(())
}

fn identity_service(settings: &ClientSettings) -> io::Result<Arc<GraphQlIdentityService>> {
    let endpoint = settings.identity_endpoint().map_err(invalid_input)?;
    let options = settings.client_options().map_err(invalid_input)?;
    GraphQlIdentityService::new(endpoint, &options)
        .map(Arc::new)
        .map_err(|error| io::Error::other(format!("build identity client: {error}")))
}

fn mapping_service(settings: &ClientSettings) -> io::Result<Arc<GraphQlMappingService>> {
    let endpoint = settings.mapping_endpoint().map_err(invalid_input)?;
    let options = settings.client_options().map_err(invalid_input)?;
    GraphQlMappingService::new(endpoint, &options)
        .map(Arc::new)
        .map_err(|error| io::Error::other(format!("build mapping client: {error}")))
}

fn invalid_input<E>(error: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

fn parse_user_id(raw: String) -> io::Result<UserId> {
    UserId::new(raw).map_err(invalid_input)
}

fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| format!("date of birth must be YYYY-MM-DD: {error}"))
}

fn build_target(scope: ConsentScope, ids: Vec<String>) -> Result<ConsentTarget, String> {
    match scope {
        ConsentScope::Orgs => ids
            .iter()
            .map(|id| {
                id.trim()
                    .parse::<i64>()
                    .map_err(|error| format!("organisation id `{id}` is not an integer: {error}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ConsentTarget::Organisations),
        ConsentScope::Purposes => Ok(ConsentTarget::Purposes(ids)),
        ConsentScope::Hpos => Ok(ConsentTarget::Hpos(ids)),
    }
}
