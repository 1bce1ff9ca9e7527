//! Taskflow CLI - Command-line interface for the Taskflow daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Taskflow pipeline CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "TASKFLOW_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new task for processing
    Submit {
        /// Task title
        title: String,
    },

    /// List all tasks, newest first
    List,

    /// Show one task in detail
    Get {
        /// Task ID
        task_id: String,
    },

    /// Remove a task
    Remove {
        /// Task ID
        task_id: String,
    },

    /// Show daemon status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct TaskView {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CREATED")]
    created_at: String,
    // Detail-only fields; the list table stays narrow without them.
    #[serde(default)]
    #[tabled(skip)]
    result: String,
    #[serde(default)]
    #[tabled(skip)]
    processed_at: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn colorize_status(status: &str) -> colored::ColoredString {
    match status {
        "pending" => status.yellow(),
        "processing" => status.cyan(),
        "completed" => status.green(),
        "failed" => status.red(),
        other => other.normal(),
    }
}

fn print_task_detail(task: &TaskView) {
    println!("{}", format!("Task {}", task.id).cyan().bold());
    println!();
    println!("  {} {}", "Title:".bold(), task.title);
    println!("  {} {}", "Status:".bold(), colorize_status(&task.status));
    println!("  {} {}", "Created:".bold(), task.created_at);
    if !task.processed_at.is_empty() {
        println!("  {} {}", "Processed:".bold(), task.processed_at);
    }
    if !task.result.is_empty() {
        println!("  {} {}", "Result:".bold(), task.result);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Submit { title } => {
            let params = json!({
                "title": title,
            });

            let result = call_rpc(&cli.rpc_url, "task.submit.v1", params).await?;
            let task: TaskView = serde_json::from_value(result)?;

            println!("{}", "✓ Task submitted".green().bold());
            println!();

            let table = Table::new(vec![task]).to_string();
            println!("{}", table);
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "task.list.v1", json!({})).await?;
            let tasks: Vec<TaskView> = serde_json::from_value(
                result
                    .get("tasks")
                    .cloned()
                    .unwrap_or_else(|| json!([])),
            )?;

            if tasks.is_empty() {
                println!("{}", "No tasks yet".yellow());
            } else {
                println!("{}", format!("{} task(s)", tasks.len()).cyan().bold());
                println!();
                let table = Table::new(tasks).to_string();
                println!("{}", table);
            }
        }

        Commands::Get { task_id } => {
            let params = json!({
                "taskId": task_id,
            });

            let result = call_rpc(&cli.rpc_url, "task.get.v1", params).await?;
            let task: TaskView = serde_json::from_value(result)?;

            print_task_detail(&task);
        }

        Commands::Remove { task_id } => {
            let params = json!({
                "taskId": task_id,
            });

            call_rpc(&cli.rpc_url, "task.remove.v1", params).await?;

            println!("{}", format!("✓ Task {} removed", task_id).green().bold());
        }

        Commands::Status => {
            println!("{}", "Daemon Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Total Tasks:".bold(), stats["totalTasks"]);
                    println!("  {} {}", "Pending:".bold(), stats["pendingTasks"]);
                    println!("  {} {}", "Processing:".bold(), stats["processingTasks"]);
                    println!("  {} {}", "Completed:".bold(), stats["completedTasks"]);
                    println!("  {} {}", "Failed:".bold(), stats["failedTasks"]);
                    println!();
                    println!("  {} {}", "Observers:".bold(), stats["observers"]);
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptimeSeconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
