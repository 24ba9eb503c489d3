//! Run one collection plan against TMDB and print the ranked items.
//! Usage:
//!   cargo run --bin plan_props -- trending <movie|tv|all|person>
//!   cargo run --bin plan_props -- genre <genre_id>
//!   cargo run --bin plan_props -- search <query...>
//!   cargo run --bin plan_props -- movies | tv | anime
//! Add `--top <n>` to change how many rows are printed (default 20).
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use cinestream::aggregate::aggregate;
use cinestream::config::Config;
use cinestream::models::MediaType;
use cinestream::plan::CollectionPlan;
use cinestream::tmdb::TmdbClient;
use dotenvy::dotenv;
use std::env;

fn parse_args() -> Result<(CollectionPlan, usize)> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut top = 20;
    if let Some(pos) = args.iter().position(|a| a == "--top") {
        let value = args
            .get(pos + 1)
            .ok_or_else(|| anyhow!("--top needs a number"))?;
        top = value.parse().context("--top must be a number")?;
        args.drain(pos..=pos + 1);
    }

    let plan = match args.first().map(String::as_str) {
        Some("trending") => {
            let segment = args
                .get(1)
                .ok_or_else(|| anyhow!("trending needs a type such as 'movie' or 'tv'"))?;
            CollectionPlan::trending(segment)
        }
        Some("genre") => {
            let id = args
                .get(1)
                .ok_or_else(|| anyhow!("genre needs an id"))?
                .parse()
                .context("genre id must be an integer")?;
            CollectionPlan::movie_genre(id)
        }
        Some("search") if args.len() > 1 => CollectionPlan::search(&args[1..].join(" ")),
        Some("movies") => CollectionPlan::movie_collection(),
        Some("tv") => CollectionPlan::tv_collection(),
        Some("anime") => CollectionPlan::anime_collection(),
        _ => return Err(anyhow!("see the usage notes at the top of plan_props.rs")),
    };
    Ok((plan, top))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let (plan, top) = parse_args()?;
    let config = Config::from_env()?;
    let client = TmdbClient::new(config.tmdb_api_key, config.tmdb_base_url)?;

    println!(
        "{} ({} upstream requests)",
        plan.label,
        plan.request_count()
    );
    let results = aggregate(&client, &plan).await;
    println!("{} unique items", results.len());

    for (rank, item) in results.iter().take(top).enumerate() {
        let kind = item.media_type.as_ref().map_or("-", MediaType::as_str);
        let score = item
            .relevance_score
            .map(|s| format!("{s:>3}"))
            .unwrap_or_else(|| "  -".to_string());
        println!(
            "{:>3}. [{:<5}] score {} pop {:>9.3}  {} (id {})",
            rank + 1,
            kind,
            score,
            item.popularity_or_zero(),
            item.label(),
            item.id
        );
    }
    Ok(())
}
