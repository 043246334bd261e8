use std::sync::Arc;
use std::time::Duration;

use localbind::{ ConnectionHandle, Error, Host, TimeService };
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging

    let subscriber = tracing_subscriber::fmt::Subscriber
        ::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    println!("Starting clock client demo...");

    // Create a host and register the time service
    let host = Host::new();
    host.register_service(TimeService::NAME, TimeService::new)?;

    // Create a connection handle and watch its state transitions
    let handle = Arc::new(ConnectionHandle::new());
    let mut state_rx = handle.subscribe();
    tokio::spawn(async move {
        println!("Monitoring binding state...");
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow().clone();
            println!("Binding state changed: connected={}", state.connected);
        }
    });

    // Bind to the service by name
    println!("Binding to {:?}...", TimeService::NAME);
    let binding = host.bind_service(TimeService::NAME, handle.clone())?;
    println!("Bound: {}", handle.is_bound());

    // Query the current time a few times through the typed endpoint
    let service = handle.service::<TimeService>()?;
    for _ in 0..3 {
        println!("Current time: {}", service.current_time());
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    // Release the binding; the disconnect callback clears the handle
    println!("\nUnbinding...");
    binding.unbind()?;
    println!("Bound: {}", handle.is_bound());

    match handle.service::<TimeService>() {
        Ok(_) => println!("Unexpected: endpoint still reachable"),
        Err(e) => println!("Query after unbind rejected: {}", e),
    }

    println!("Clock client demo completed successfully");
    Ok(())
}
