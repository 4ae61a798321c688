use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use elevatepath::adapters::gateway::{GeminiConfig, GeminiGateway};
use elevatepath::adapters::store::InMemoryPathwayStore;
use elevatepath::application::Advisor;
use elevatepath::config::AppConfig;
use elevatepath::domain::fields::ExtractedFields;
use elevatepath::domain::pathway::{PathwayPlan, Phase};

const GREETING: &str = "Hi! I'm your academic pathway advisor. Tell me about the career \
you're interested in, and I'll help you map out the education to get there.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load()?;
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        eprintln!("  export ELEVATEPATH__GATEWAY__API_KEY=...");
        std::process::exit(1);
    }

    let gateway_config = GeminiConfig::new(config.gateway.api_key.clone().unwrap_or_default())
        .with_model(&config.gateway.model)
        .with_base_url(&config.gateway.base_url)
        .with_timeout(Duration::from_secs(config.gateway.timeout_secs))
        .with_max_retries(config.gateway.max_retries);

    let gateway = Arc::new(GeminiGateway::new(gateway_config));
    let store = Arc::new(InMemoryPathwayStore::new());
    let advisor = Advisor::new(gateway, store);

    eprintln!("ElevatePath v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.gateway.model);
    eprintln!("   Type a message and press Enter. /quit to exit.\n");

    println!("Advisor: {GREETING}\n");

    let mut conversation = Vec::new();
    let mut fields = ExtractedFields::default();

    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/quit" {
            break;
        }

        match advisor.submit_turn(conversation, fields, message).await {
            Ok(outcome) => {
                println!("\nAdvisor: {}\n", outcome.reply);
                if let Some(pathway) = &outcome.pathway {
                    print_plan(&pathway.plan);
                    if let Some(warning) = &pathway.store_warning {
                        eprintln!("(note: {warning})");
                    }
                }
                conversation = outcome.conversation;
                fields = outcome.fields;
            }
            Err(e) => {
                // Only happens with overlapping turns; the REPL is serial,
                // so surface it and keep the session state unchanged.
                eprintln!("{e}");
                break;
            }
        }
    }

    Ok(())
}

fn print_plan(plan: &PathwayPlan) {
    if let Some(phase) = &plan.two_year_phase {
        print_phase("Two-year phase", phase);
    }
    if let Some(phase) = &plan.four_year_phase {
        print_phase("Four-year phase", phase);
    }
    if let Some(advanced) = &plan.advanced_phase {
        if let Some(masters) = &advanced.masters {
            print_phase("Master's phase", masters);
        }
        if let Some(phd) = &advanced.phd {
            print_phase("Doctoral phase", phd);
        }
    }
    if let Some(summary) = &plan.total_summary {
        println!("Total: {:.1} years, about ${:.0}", summary.total_years, summary.total_cost);
        println!("Outlook: {}\n", summary.career_outlook);
    }
}

fn print_phase(heading: &str, phase: &Phase) {
    println!("== {heading}: {} ==", phase.degree);
    if let Some(college) = &phase.college {
        println!("   at {college}");
    }
    println!(
        "   {} | {} credits | about ${:.0}",
        phase.duration, phase.total_credits, phase.total_cost
    );
    if let (Some(transfer), Some(remaining)) = (phase.transfer_credits, phase.remaining_credits) {
        println!("   {transfer} credits transfer in, {remaining} still to earn");
    }
    for course in &phase.courses {
        println!("   - {} {} ({} cr)", course.code, course.name, course.credits);
    }
    println!();
}
