//! Smoke test binary for the live Gemini API
//! This is a utility binary, not part of the main application
//!
//! Usage: `GEMINI_API_KEY=... cargo run --bin scout_smoke -- "Kyoto, Japan"`

use std::env;
use travel_scout_backend::config::ScoutConfig;
use travel_scout_backend::orchestrator::{
    run_briefing, run_hidden_spots, run_itinerary, EventSink, Generation, ServiceContext,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let location = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if location.trim().is_empty() {
        eprintln!("Usage: scout_smoke <location>");
        return Err("no location given".into());
    }

    let config = ScoutConfig::from_env();
    let ctx = ServiceContext::gemini(config)?;
    let events = EventSink::detached();
    let generation = Generation::default().next();

    println!("1. Generating travel plan for '{}'...", location);
    let outcome = run_itinerary(&ctx, generation, &location, &events).await;
    match &outcome.plan {
        Ok(plan) => {
            println!("   ✓ Confidence: {:?}", plan.confidence_level());
            println!("   ✓ Overview: {}", plan.overview);
            println!("   ✓ {} itinerary days", plan.itinerary.len());
        }
        Err(e) => eprintln!("   ✗ {}", e.user_message()),
    }
    println!(
        "   {} of {} preview images ready",
        outcome.preview_images().len(),
        outcome.previews.len()
    );

    println!("\n2. Listing hidden spots...");
    let gems = run_hidden_spots(&ctx, generation, &location, &events).await;
    match &gems.gems {
        Ok(list) => {
            for gem in list {
                let has_image = gems
                    .image_for(&gem.name)
                    .and_then(|status| status.image())
                    .is_some();
                println!(
                    "   ✓ {} ({}){}",
                    gem.name,
                    gem.location_hint,
                    if has_image { "" } else { " [no image]" }
                );
            }
        }
        Err(e) => eprintln!("   ✗ {}", e.user_message()),
    }

    println!("\n3. Fetching map-grounded briefing...");
    match run_briefing(&ctx, generation, &location, &events).await {
        Ok(brief) => {
            println!("   {}", brief.text.trim());
            for source in &brief.sources {
                println!("   - {} <{}>", source.title, source.uri);
            }
        }
        Err(e) => eprintln!("   ✗ {}", e.user_message()),
    }

    Ok(())
}
