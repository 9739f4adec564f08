//! Var Holder Usage Examples
//!
//! Demonstrates lazy initialization and change tracking from several threads.

use propvar::{ThreadSafeLazyVar, TrackChangesVar, VarDelegate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

struct Config {
    workers: ThreadSafeLazyVar<usize, Box<dyn Fn() -> usize + Send + Sync>>,
    banner: TrackChangesVar<String, Box<dyn Fn() -> String + Send + Sync>>,
}

fn main() -> anyhow::Result<()> {
    println!("Var Holder Usage Examples");
    println!("=========================");

    // Example 1: one initialization shared by every thread
    println!("\n1. ThreadSafeLazyVar under contention:");
    let init_count = AtomicUsize::new(0);
    let lazy = ThreadSafeLazyVar::new(|| {
        init_count.fetch_add(1, Ordering::SeqCst);
        println!("  Computing expensive value...");
        (1..=10u64).product::<u64>()
    });

    thread::scope(|s| {
        for id in 0..4 {
            let lazy = &lazy;
            s.spawn(move || println!("  Thread {id} sees {}", lazy.get()));
        }
    });
    println!("  Initializer ran {} time(s)", init_count.load(Ordering::SeqCst));

    // Example 2: fallible initialization is retried
    println!("\n2. Fallible initializer:");
    let attempts = AtomicUsize::new(0);
    let port = ThreadSafeLazyVar::new(|| -> anyhow::Result<u16> {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        anyhow::ensure!(n > 0, "port not assigned yet");
        Ok(8080)
    });
    if let Err(err) = port.try_get() {
        println!("  First attempt failed: {err}");
    }
    println!("  Second attempt: {}", port.try_get()?);

    // Example 3: tracking an explicit override
    println!("\n3. TrackChangesVar:");
    let ticks = AtomicUsize::new(0);
    let tracked = TrackChangesVar::new(|| ticks.fetch_add(1, Ordering::SeqCst) + 1);
    println!("  Reads through: {}, {}", tracked.get(), tracked.get());
    tracked.set(100);
    println!("  After set: {} (written: {})", tracked.get(), tracked.written());

    // Example 4: fields routed through delegates
    println!("\n4. Delegated fields:");
    let config = Config {
        workers: ThreadSafeLazyVar::new(Box::new(|| {
            thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })),
        banner: TrackChangesVar::new(Box::new(|| format!("pid {}", std::process::id()))),
    };
    print_field("workers", &config.workers);
    print_field("banner", &config.banner);
    config.banner.set("custom banner".to_string());
    print_field("banner", &config.banner);

    Ok(())
}

fn print_field<T: std::fmt::Display>(name: &str, var: &impl VarDelegate<T>) {
    println!("  {name} = {}", var.get());
}
