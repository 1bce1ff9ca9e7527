//! Watch Example
//!
//! Submits a task and follows its lifecycle over the event subscription.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package taskflow-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --example watch
//!    ```

use taskflow_sdk::{TaskEvent, TaskflowClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Taskflow SDK - Watch Example");
    println!("============================\n");

    // 1. Connect to daemon
    println!("1. Connecting to daemon...");
    let client = TaskflowClient::connect("ws://127.0.0.1:5000").await?;
    println!("   ✓ Connected\n");

    // 2. Open the event stream before submitting so nothing is missed
    println!("2. Subscribing to task events...");
    let mut events = client.subscribe_events().await?;
    println!("   ✓ Subscribed\n");

    // 3. Submit a task
    println!("3. Submitting a task...");
    let task = client.submit("Watch example task").await?;
    println!("   ✓ Task submitted:");
    println!("     - ID: {}", task.id);
    println!("     - Status: {}\n", task.status);

    // 4. Follow the lifecycle until the task finishes
    println!("4. Waiting for lifecycle events...");
    while let Some(event) = events.next().await {
        match event? {
            TaskEvent::TaskCreated { task: created } => {
                println!("   → created   {}", created.id);
            }
            TaskEvent::TaskUpdated {
                task_id,
                status,
                result,
                ..
            } => {
                println!("   → {} {}", status, task_id);
                if task_id == task.id && status.is_terminal() {
                    if let Some(result) = result {
                        println!("     result: {}", result);
                    }
                    break;
                }
            }
            TaskEvent::TaskDeleted { task_id } => {
                println!("   → deleted   {}", task_id);
            }
        }
    }
    println!();

    // 5. Fetch the final record and daemon counters
    println!("5. Fetching final state...");
    let finished = client.get(&task.id).await?;
    println!("   ✓ Task {} is {}", finished.id, finished.status);

    let stats = client.stats().await?;
    println!(
        "   ✓ Daemon has {} task(s), {} observer(s)\n",
        stats.total_tasks, stats.observers
    );

    println!("✓ Example completed successfully!");

    Ok(())
}
