//! Basic logger usage example
//!
//! Demonstrates remote routing, degraded mode and cancellation with an
//! in-memory backend and a console fallback sink.
//!
//! Run with: cargo run --example basic_usage

use rust_fallback_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Fallback Logger - Basic Usage Example ===\n");

    // 1. Backend reachable: entries go to the remote client
    println!("1. Logging to a live backend:");
    let ctx = SystemContext::new();
    let backend = MemoryBackend::new();
    let mut logger = Logger::new(
        ctx.clone(),
        &backend,
        "demo-project",
        "api",
        ConsoleSink::stdout().with_prefix("fallback> "),
        ["env", "demo"],
    );
    logger.debug("This is a debug message", ());
    logger.info("Request served", ["path", "/health", "status", "200"]);
    logger.warn("Slow query", [("table", "orders"), ("ms", "950")]);
    logger.error("Payment declined", ["order"]);
    for entry in backend.entries() {
        println!("   remote received {:<8} {}", entry.severity, entry.payload);
    }

    // 2. Cancelling the context reroutes later calls to the fallback sink
    println!("\n2. Logging after cancellation (printed by the fallback sink):");
    ctx.cancel();
    logger.error("Shutdown in progress", ["reason", "SIGTERM"]);
    println!(
        "   remote: {}, fallback: {}",
        logger.metrics().remote_submitted(),
        logger.metrics().fallback_written()
    );
    logger.close()?;

    // 3. Backend unavailable: the logger still works, writing locally
    println!("\n3. Degraded mode (backend unavailable):");
    let mut degraded = Logger::new(
        SystemContext::new().with_timeout(Duration::from_secs(30)),
        &MemoryBackend::unavailable("collector offline"),
        "demo-project",
        "api",
        ConsoleSink::stdout()
            .with_prefix("fallback> ")
            .with_timestamp(TimestampFormat::custom("%H:%M:%S")?),
        (),
    );
    println!("   degraded: {}", degraded.is_degraded());
    degraded.info("Cache warmed", ["entries", "1024"]);
    degraded.close()?;

    // 4. Strict acquisition reports the failure instead
    println!("\n4. Strict acquisition:");
    let strict = LoggerBuilder::new()
        .identity("demo-project")
        .stream_name("api")
        .policy(AcquisitionPolicy::Strict)
        .build(&MemoryBackend::unavailable("collector offline"));
    match strict {
        Ok(_) => println!("   unexpected: acquired"),
        Err(e) => println!("   acquisition failed: {}", e),
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
