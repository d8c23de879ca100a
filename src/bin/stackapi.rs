//! Stack management API CLI binary.
//!
//! A command-line interface for interacting with the stack management API.

use clap::Parser;
use serde::Serialize;
use stackapi::cli::{Cli, Command, StacksCommand};
use stackapi::{
    LeaseOptions, List, ManagedBackup, PrettyPrint, RedeployParams, Stack, StackAction,
    StackClient, StackEnvVar, StackListQuery, StackSetting,
};
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match StackClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set STACKAPI_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &StackClient, cli: Cli) -> stackapi::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Stacks(StacksCommand::List {
            name,
            environment,
            git_repo,
            git_branch,
        }) => {
            let query = StackListQuery {
                name,
                environment,
                git_repo,
                git_branch,
            };
            let stacks = Stack::list_all(client, &query).await?;
            output_list(&stacks, json, |s| StackRow::from(s))
        }
        Command::Stacks(StacksCommand::Show { name, environment }) => {
            let stack = stackapi::stack_info_with_environment(client, &name, &environment).await?;
            output_single(&stack, json)
        }
        Command::Actions {
            stack,
            user_reference,
        } => {
            let actions =
                stackapi::list_stack_actions(client, &stack, user_reference.as_deref()).await?;
            output_list(&actions, json, |a| ActionRow::from(a))
        }
        Command::Settings { stack } => {
            let settings: Vec<StackSetting> = stackapi::get_stack_settings(client, &stack)
                .await?
                .iter()
                .map(StackSetting::redacted)
                .collect();
            output_list(&settings, json, |s| SettingRow::from(s))
        }
        Command::Set { stack, key, value } => {
            let action = stackapi::set_setting(client, &stack, &key, &value).await?;
            output_single(&action, json)
        }
        Command::EnvVars { stack, format } => match format {
            Some(format) => {
                let contents = stackapi::env_vars_string(client, &stack, &format, &[]).await?;
                println!("{contents}");
                Ok(())
            }
            None => {
                let env_vars = stackapi::get_stack_env_vars(client, &stack).await?;
                output_list(&env_vars, json, |v| EnvVarRow::from(v))
            }
        },
        Command::Backups { stack } => {
            let backups = stackapi::get_managed_backups(client, &stack).await?;
            output_list(&backups, json, |b| BackupRow::from(b))
        }
        Command::Lease {
            stack,
            from_ip,
            ttl,
            port,
            server,
            wait,
        } => {
            let options = LeaseOptions {
                from_ip,
                ttl,
                port,
                server_uid: server,
            };
            if wait {
                let outcome = stackapi::lease_sync(client, &stack, &options).await?;
                output_single(&outcome, json)
            } else {
                let action = stackapi::lease(client, &stack, &options).await?;
                output_single(&action, json)
            }
        }
        Command::Redeploy {
            stack,
            git_ref,
            deploy_strategy,
            deployment_profile,
            rollout_strategy,
            canary_percentage,
            services,
            user_reference,
        } => {
            let params = RedeployParams {
                git_ref,
                deploy_strategy,
                rollout_strategy,
                canary_percentage,
                deployment_profile,
                services,
            };
            let response =
                stackapi::redeploy_stack(client, &stack, &params, user_reference.as_deref())
                    .await?;
            output_single(&response, json)
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> stackapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> stackapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct StackRow {
    uid: String,
    name: String,
    environment: String,
    status: String,
    health: String,
}

impl From<&Stack> for StackRow {
    fn from(s: &Stack) -> Self {
        Self {
            uid: s.uid.clone(),
            name: s.name.clone(),
            environment: s.environment.clone(),
            status: s.status().to_string(),
            health: s.health().to_string(),
        }
    }
}

#[derive(Tabled)]
struct ActionRow {
    id: i64,
    action: String,
    started: String,
    finished: String,
    success: bool,
}

impl From<&StackAction> for ActionRow {
    fn from(a: &StackAction) -> Self {
        Self {
            id: a.id,
            action: a.action.clone(),
            started: a.started_at.clone(),
            finished: a.finished_at.clone(),
            success: a.finished_success,
        }
    }
}

#[derive(Tabled)]
struct SettingRow {
    key: String,
    value: String,
    readonly: bool,
}

impl From<&StackSetting> for SettingRow {
    fn from(s: &StackSetting) -> Self {
        Self {
            key: s.key.clone(),
            value: match &s.value {
                serde_json::Value::String(v) => v.clone(),
                other => other.to_string(),
            },
            readonly: s.readonly,
        }
    }
}

#[derive(Tabled)]
struct EnvVarRow {
    key: String,
    value: String,
    readonly: bool,
    versions: usize,
}

impl From<&StackEnvVar> for EnvVarRow {
    fn from(v: &StackEnvVar) -> Self {
        Self {
            key: v.key.clone(),
            value: v.value_string(),
            readonly: v.readonly,
            versions: v.history.len() + 1,
        }
    }
}

#[derive(Tabled)]
struct BackupRow {
    id: i64,
    database: String,
    #[tabled(rename = "type")]
    db_type: String,
    date: String,
    ok: bool,
}

impl From<&ManagedBackup> for BackupRow {
    fn from(b: &ManagedBackup) -> Self {
        Self {
            id: b.id,
            database: b.database_name.clone(),
            db_type: b.db_type.clone(),
            date: b
                .backup_date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            ok: b.succeeded(),
        }
    }
}
