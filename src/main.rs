use std::error::Error;
use tracing::info;

use wealth_advisor::config::Settings;
use wealth_advisor::investor::{assess_risk, InvestorProfile, RiskProfile};
use wealth_advisor::market::QuoteClient;
use wealth_advisor::report::generate_report;
use wealth_advisor::telemetry::init_tracing;

const USAGE: &str =
    "usage: wealth_advisor <conservative|moderate|aggressive|\"investor brief\"> [TICKER...]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    init_tracing(&settings.log_filter);

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let tickers: Vec<String> = args.map(|t| t.to_uppercase()).collect();

    // A bare risk word is taken as-is; anything else is read as a brief.
    let profile = match input.parse::<RiskProfile>() {
        Ok(risk) => InvestorProfile::new("Investor", risk),
        Err(_) => InvestorProfile::from_message(&input),
    };
    info!(profile = profile.risk_tolerance.as_str(), "resolved investor profile");

    let report = generate_report(&profile);
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", serde_json::to_string_pretty(&assess_risk(&profile))?);

    if !tickers.is_empty() {
        let client = QuoteClient::new(&settings)?;
        match client.fetch_quotes(&tickers).await {
            Ok(quotes) => println!("{}", serde_json::to_string_pretty(&quotes)?),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}
