//! Streaming Users Example
//!
//! This example demonstrates:
//! - Opening a SQLite user table
//! - Row-at-a-time streaming with early exit
//! - Batched reads and batch filtering
//! - Lazy offset pagination
//! - Single-pass aggregation
//! - Async consumption
//!
//! Run with: cargo run --example stream_users

use rusqlite::{params, Connection};
use trickle::prelude::*;

fn seed(path: &std::path::Path) -> anyhow::Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE user_data (user_id TEXT PRIMARY KEY, name TEXT, email TEXT, age INTEGER)",
    )?;
    for (i, age) in [67u32, 119, 49, 22, 102].iter().enumerate() {
        conn.execute(
            "INSERT INTO user_data VALUES (?1, ?2, ?3, ?4)",
            params![
                format!("user-{}", i),
                format!("User {}", i),
                format!("user{}@example.com", i),
                age
            ],
        )?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("trickle=debug")
        .init();

    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("users.db");
    seed(&db_path)?;

    let db = TrickleDb::open(&db_path)?;

    println!("Step 1: first two users only");
    for user in db.stream()?.take(2) {
        let user = user?;
        println!("   {} <{}> age {}", user.name, user.email, user.age);
    }
    println!("   open connections: {}", db.open_connections());

    println!("Step 2: batches of 2");
    for batch in db.stream_in_batches(2)? {
        let ages: Vec<u32> = batch?.iter().map(|u| u.age).collect();
        println!("   {:?}", ages);
    }

    println!("Step 3: users older than {}", trickle::AGE_THRESHOLD);
    for user in db.batch_process(2)? {
        println!("   {}", user?.name);
    }

    println!("Step 4: pages of 2");
    for (i, page) in db.lazy_paginate(2)?.enumerate() {
        println!("   page {}: {} users", i, page?.len());
    }

    println!("Step 5: average age = {:?}", db.average_age()?);

    println!("Step 6: async scan");
    let mut users = db.stream_async()?;
    while let Some(user) = users.next().await {
        println!("   {}", user?.user_id);
    }

    Ok(())
}
