//! Basic example demonstrating the stack API client.
//!
//! Run with:
//! ```
//! STACKAPI_TOKEN=your-token cargo run --example basic
//! ```

use stackapi::{find_stack_by_name, get_stack_env_vars, get_stack_settings, list_stacks, StackClient};

#[tokio::main]
async fn main() -> stackapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating client...");
    let client = StackClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    println!("\n--- Listing Stacks ---");
    let stacks = list_stacks(&client).await?;
    println!("Found {} stacks", stacks.len());

    for stack in &stacks {
        println!(
            "  - {} [{}] {} / {}",
            stack.name,
            stack.environment,
            stack.status(),
            stack.health()
        );
    }

    // Look the first stack up again by name
    if let Some(first) = stacks.first() {
        println!("\n--- Stack Details ---");
        let stack = find_stack_by_name(&client, &first.name, &first.environment).await?;
        println!("Stack: {} ({})", stack.name, stack.uid);

        let settings = get_stack_settings(&client, &stack.uid).await?;
        println!("  Settings: {}", settings.len());
        for setting in settings.iter().filter(|s| !s.hidden).take(5) {
            println!("    {} = {}", setting.key, setting.value);
        }

        let env_vars = get_stack_env_vars(&client, &stack.uid).await?;
        println!("  Environment variables: {}", env_vars.len());
    }

    println!("\nDone!");
    Ok(())
}
