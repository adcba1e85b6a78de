use std::process;
use clap::Parser;

use newsdesk::cli::Cli;

#[tokio::main]
async fn main() {
    // Provider API keys are commonly supplied through a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.run().await {
        Ok(_) => {
            // Command completed successfully
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
