//! Suggest titles for a blog post.
//!
//! Usage:
//!   OPENAI_API_KEY=... cargo run --example blog_titles -- path/to/post.md
//!
//! Without a path, a short built-in post is used.

use simplebot::{ProviderConfig, SimpleBot};

const SYSTEM_PROMPT: &str = "You are an expert blogger. \
Whenever you are given a blog post, suggest five catchy titles \
that accurately reflect its content. Return them as a numbered list.";

const SAMPLE_POST: &str = "Rust's ownership model lets the compiler prove memory safety \
without a garbage collector. In this post we walk through moves, borrows and lifetimes \
using a small text-processing tool as the running example.";

fn main() -> simplebot::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let post = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE_POST.to_string(),
    };

    let bot = SimpleBot::builder()
        .system_prompt(SYSTEM_PROMPT)
        .config(ProviderConfig::from_env()?.with_temperature(0.7))
        .build()?;

    // The same bot can be reused for any number of posts.
    let titles = bot.call(&post)?;
    println!("{}", titles);
    Ok(())
}
