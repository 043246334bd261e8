use std::sync::Arc;
use std::time::Duration;

use localbind::{ ConnectionHandle, Error, Host, TimeService };
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging

    let subscriber = tracing_subscriber::fmt::Subscriber
        ::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    println!("Starting host monitor demo...");

    let host = Host::new();
    host.register_service(TimeService::NAME, TimeService::new)?;
    host.register_service("alarm", TimeService::new)?;

    // Subscribe to lifecycle events before generating any
    let mut subscription = host.subscribe_events();

    let monitor_task = tokio::spawn(async move {
        println!("Waiting for lifecycle events...");

        // Listen for 2 seconds
        let timeout = tokio::time::sleep(Duration::from_secs(2));
        tokio::pin!(timeout);

        loop {
            tokio::select! {
                _ = &mut timeout => {
                    println!("Event listening timeout reached");
                    break;
                }
                Some(event) = subscription.next() => {
                    println!("Received event: {:?}", event);
                }
                else => break,
            }
        }
    });

    // Generate a full lifecycle: two binds to one service, one to the other
    let first = Arc::new(ConnectionHandle::new());
    let second = Arc::new(ConnectionHandle::new());
    let alarm = Arc::new(ConnectionHandle::new());

    let first_binding = host.bind_service(TimeService::NAME, first)?;
    let second_binding = host.bind_service(TimeService::NAME, second)?;
    let alarm_binding = host.bind_service("alarm", alarm)?;

    println!("\nHost snapshot while bound:");
    match serde_json::to_string_pretty(&host.snapshot()) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => println!("Error rendering snapshot: {}", e),
    }

    first_binding.unbind()?;
    second_binding.unbind()?;
    alarm_binding.unbind()?;

    println!("\nHost snapshot after release:");
    match serde_json::to_string_pretty(&host.snapshot()) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => println!("Error rendering snapshot: {}", e),
    }

    // Wait for the monitor to drain the event stream
    monitor_task.await.unwrap();

    println!("Host monitor demo completed successfully");
    Ok(())
}
