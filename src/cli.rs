use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand};

use crate::api::{build_report, run_http_server, validate_inputs};
use crate::core::{EngineConfig, FixedScenarioRates, PlanningInputs};

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Retirement savings calculator: required monthly savings across return scenarios"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON HTTP API.
    Serve(ServeArgs),
    /// Run one calculation and print the report as JSON.
    Calculate(CalculateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RateArgs {
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual inflation in percent"
    )]
    pub inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Sustainable annual withdrawal rate in percent (the 4% rule)"
    )]
    pub withdrawal_rate: f64,
    #[arg(long, default_value_t = 4.0, help = "Conservative annual return in percent")]
    pub conservative_return: f64,
    #[arg(long, default_value_t = 7.0, help = "Moderate annual return in percent")]
    pub moderate_return: f64,
    #[arg(long, default_value_t = 10.0, help = "Aggressive annual return in percent")]
    pub aggressive_return: f64,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: IpAddr,
    #[command(flatten)]
    pub rates: RateArgs,
}

#[derive(Args, Debug)]
pub struct CalculateArgs {
    #[arg(long)]
    pub current_age: u32,
    #[arg(long)]
    pub retirement_age: u32,
    #[arg(long, help = "Savings today, in today's money")]
    pub current_savings: f64,
    #[arg(long, help = "Monthly retirement income wanted, in today's money")]
    pub desired_monthly_income: f64,
    #[arg(long, help = "Extra scenario with this annual return in percent, e.g. 8.5")]
    pub custom_return: Option<f64>,
    #[command(flatten)]
    pub rates: RateArgs,
}

pub fn build_engine_config(rates: &RateArgs) -> Result<EngineConfig, String> {
    let config = EngineConfig {
        inflation_rate: rates.inflation_rate / 100.0,
        withdrawal_rate: rates.withdrawal_rate / 100.0,
        fixed_scenarios: FixedScenarioRates {
            conservative: rates.conservative_return / 100.0,
            moderate: rates.moderate_return / 100.0,
            aggressive: rates.aggressive_return / 100.0,
        },
    };
    config.validate()?;
    Ok(config)
}

pub fn build_planning_inputs(args: &CalculateArgs) -> Result<PlanningInputs, String> {
    let inputs = PlanningInputs {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        current_savings: args.current_savings,
        desired_monthly_income: args.desired_monthly_income,
        custom_annual_return_percent: args.custom_return,
    };
    validate_inputs(&inputs)?;
    Ok(inputs)
}

pub fn calculate_json(args: &CalculateArgs) -> Result<String, String> {
    let config = build_engine_config(&args.rates)?;
    let inputs = build_planning_inputs(args)?;
    let report = build_report(inputs, &config).map_err(|e| e.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|e| format!("Failed to render report: {e}"))
}

pub async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Serve(args) => {
            let config = build_engine_config(&args.rates)?;
            let addr = SocketAddr::new(args.bind, args.port);
            run_http_server(addr, config)
                .await
                .map_err(|e| format!("Server error: {e}"))
        }
        Command::Calculate(args) => {
            println!("{}", calculate_json(&args)?);
            Ok(())
        }
    }
}
